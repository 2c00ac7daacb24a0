//! Random-access region I/O for tiled raster images.
//!
//! Tiled raster formats store each image page as a regular grid of fixed-size
//! tiles, which makes it possible to read or write an arbitrary rectangle of
//! pixels without materializing the whole page. This crate implements the
//! hard part of that: exact tile-coordinate mapping, tile assembly on the
//! read path and tile decomposition on the write path, over abstract
//! [`TileSource`]/[`TileSink`] capabilities. Opening the underlying file,
//! decoding compressed tile payloads and navigating between pages stay with
//! the caller.
//!
//! A page with no tile grid is reported as [`TiledRead::NotTiled`] so the
//! caller can branch to its whole-image fallback; this is data, not an error.
//!
//! [`TileSource`]: reader::TileSource
//! [`TileSink`]: writer::TileSink
//! [`TiledRead::NotTiled`]: reader::TiledRead

pub mod buffer;
mod error;
pub mod grid;
pub mod page;
pub mod reader;
pub mod writer;

pub use self::error::{FetchError, RegionError, TilingError, TilingResult, UsageError};

/// An enumeration over the element types a raster page can store.
///
/// One value of this type describes every color sample of a page; pages with
/// mixed per-sample types are not supported.
#[derive(Copy, PartialEq, Eq, Debug, Clone, Hash)]
#[non_exhaustive]
pub enum SampleType {
    /// Unsigned integer samples
    U8,
    U16,
    U32,
    U64,
    /// Signed integer samples
    I8,
    I16,
    I32,
    I64,
    /// IEEE floating point samples, 16 bit backed by [`half::f16`]
    F16,
    F32,
    F64,
}

impl SampleType {
    /// Width of one sample in bytes.
    pub fn byte_len(&self) -> usize {
        match *self {
            SampleType::U8 | SampleType::I8 => 1,
            SampleType::U16 | SampleType::I16 | SampleType::F16 => 2,
            SampleType::U32 | SampleType::I32 | SampleType::F32 => 4,
            SampleType::U64 | SampleType::I64 | SampleType::F64 => 8,
        }
    }
}
