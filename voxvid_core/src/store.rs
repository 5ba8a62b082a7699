use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::quant::SampleType;

/// Array-level attribute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    U32(u32),
    F64(f64),
}

impl AttrValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            AttrValue::U32(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric attributes may have been written as either width.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::F64(x) => Some(*x),
            AttrValue::U32(n) => Some(*n as f64),
            AttrValue::Bool(_) => None,
        }
    }
}

/// Narrow surface over the chunked array storage.
///
/// The core touches storage only through attributes (quantization profile)
/// and raw chunk bytes. Everything else — dataset layout, chunk grids,
/// cross-chunk concurrency — belongs to the store.
pub trait ArrayStore {
    /// Chunk shape in (depth, height, width) order.
    fn chunk_shape(&self) -> [u32; 3];

    /// Native sample type of the array.
    fn sample_type(&self) -> SampleType;

    fn get_attr(&self, name: &str) -> Option<AttrValue>;

    fn set_attr(&mut self, name: &str, value: AttrValue);

    fn get_chunk(&self, index: u64) -> Result<Vec<u8>>;

    fn set_chunk(&mut self, index: u64, data: &[u8]) -> Result<()>;
}

/// In-memory array store, for tests and round-trip demos.
pub struct MemoryStore {
    chunk_shape: [u32; 3],
    sample_type: SampleType,
    attrs: HashMap<String, AttrValue>,
    chunks: HashMap<u64, Vec<u8>>,
}

impl MemoryStore {
    pub fn new(chunk_shape: [u32; 3], sample_type: SampleType) -> Self {
        Self {
            chunk_shape,
            sample_type,
            attrs: HashMap::new(),
            chunks: HashMap::new(),
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

impl ArrayStore for MemoryStore {
    fn chunk_shape(&self) -> [u32; 3] {
        self.chunk_shape
    }

    fn sample_type(&self) -> SampleType {
        self.sample_type
    }

    fn get_attr(&self, name: &str) -> Option<AttrValue> {
        self.attrs.get(name).copied()
    }

    fn set_attr(&mut self, name: &str, value: AttrValue) {
        self.attrs.insert(name.to_string(), value);
    }

    fn get_chunk(&self, index: u64) -> Result<Vec<u8>> {
        self.chunks
            .get(&index)
            .cloned()
            .ok_or_else(|| Error::Store(format!("chunk {index} is not present")))
    }

    fn set_chunk(&mut self, index: u64, data: &[u8]) -> Result<()> {
        self.chunks.insert(index, data.to_vec());
        Ok(())
    }
}

// ── Chunk sizing ───────────────────────────────────────────────────────────

/// Upper bound on raw bytes per chunk.
pub const MAX_CHUNK_BYTES: u64 = 4 * 1024 * 1024 * 1024;

/// Suggest a chunk shape for an array of the given shape and element size.
///
/// An array at or under [`MAX_CHUNK_BYTES`] compresses as a single chunk;
/// larger arrays are scaled down uniformly per dimension so the chunk stays
/// under the bound while keeping the array's aspect ratio.
pub fn auto_chunk_shape(shape: &[u64], elem_size: u64) -> Vec<u64> {
    let full: u64 = shape.iter().product::<u64>().saturating_mul(elem_size);
    if full <= MAX_CHUNK_BYTES || shape.is_empty() {
        return shape.to_vec();
    }
    let scale = (MAX_CHUNK_BYTES as f64 / full as f64).powf(1.0 / shape.len() as f64);
    shape
        .iter()
        .map(|&dim| ((dim as f64 * scale) as u64).clamp(1, dim))
        .collect()
}
