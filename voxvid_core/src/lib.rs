pub mod codecs;
pub mod container;
pub mod engine;
pub mod error;
pub mod hw;
pub mod metrics;
pub mod params;
pub mod pipeline;
pub mod quant;
pub mod store;

pub use codecs::{Decoder, Encoder};
pub use engine::CodecEngine;
pub use error::{Error, Result};
pub use hw::{validate, FixedProbe, HardwareProbe, SystemProbe, Vendor};
pub use params::{resolve, CodecRequest, ParameterSet, Strictness};
pub use pipeline::ChunkPipeline;
pub use quant::{
    forward, inverse, BitDepth, QuantOptions, QuantizationProfile, Samples, SampleType,
};
pub use store::{auto_chunk_shape, ArrayStore, AttrValue, MemoryStore};
