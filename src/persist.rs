//! Column file codec.
//!
//! A stored column is the postcard encoding of its materialized logical value
//! sequence, framed by a strategy tag and a compressed flag:
//!
//! ```text
//! [strategy: u8] [compressed: u8] [payload...]
//! ```
//!
//! Payloads above [`CompressConfig::threshold`] are Deflate-compressed. The
//! strategy tag records which encoder wrote the file; since the payload is the
//! logical sequence, any encoder can load any column file.

use std::io::Read;
use std::path::Path;

use flate2::bufread::{DeflateDecoder, DeflateEncoder};
use flate2::Compression;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::column::Strategy;
use crate::ColumnError;

const RAW: u8 = 0;
const COMPRESSED: u8 = 1;

const DEFAULT_COMPRESS_THRESHOLD: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct CompressConfig {
    /// Payloads at or below this many bytes are stored uncompressed.
    pub threshold: usize,
    pub compression: Compression,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_COMPRESS_THRESHOLD,
            compression: Compression::default(),
        }
    }
}

impl CompressConfig {
    pub fn from_level(threshold: usize, level: u32) -> Self {
        Self {
            threshold,
            compression: Compression::new(level),
        }
    }
}

pub(crate) fn store_values<T: Serialize>(
    dir: &Path,
    name: &str,
    strategy: Strategy,
    values: &[T],
    config: &CompressConfig,
) -> Result<(), ColumnError> {
    let payload = postcard::to_allocvec(values)?;
    let mut out = Vec::with_capacity(payload.len() + 2);
    out.push(strategy as u8);
    if payload.len() > config.threshold {
        out.push(COMPRESSED);
        let mut encoder = DeflateEncoder::new(payload.as_slice(), config.compression);
        encoder.read_to_end(&mut out)?;
    } else {
        out.push(RAW);
        out.extend_from_slice(&payload);
    }
    let path = dir.join(name);
    std::fs::write(&path, &out)?;
    debug!(column = name, bytes = out.len(), "stored column file");
    Ok(())
}

pub(crate) fn load_values<T: DeserializeOwned>(
    dir: &Path,
    name: &str,
) -> Result<Vec<T>, ColumnError> {
    let path = dir.join(name);
    let bytes = std::fs::read(&path)?;
    if bytes.len() < 2 {
        return Err(ColumnError::CorruptFile(path.display().to_string()));
    }
    Strategy::try_from(bytes[0])?;
    let payload = &bytes[2..];
    let values = match bytes[1] {
        RAW => postcard::from_bytes(payload)?,
        COMPRESSED => {
            let mut output = Vec::new();
            let mut decoder = DeflateDecoder::new(payload);
            decoder.read_to_end(&mut output)?;
            postcard::from_bytes(&output)?
        }
        _ => return Err(ColumnError::CorruptFile(path.display().to_string())),
    };
    debug!(column = name, "loaded column file");
    Ok(values)
}
