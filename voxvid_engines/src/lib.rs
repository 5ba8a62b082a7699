mod lz4_engine;
mod passthrough;
mod zstd_engine;

pub use lz4_engine::Lz4Engine;
pub use passthrough::PassthroughEngine;
pub use zstd_engine::ZstdEngine;
