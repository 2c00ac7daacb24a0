//! Sample and pixel buffers.
//!
//! [`SampleBuffer`] is the dtype-tagged unit of storage: one dense vector of
//! samples whose variant matches the page's [`SampleType`]. [`PixelBuffer`]
//! pairs a sample buffer with its `(height, width, channels)` shape and is
//! what region reads return and region writes consume.

use std::ops::Range;

use half::f16;

use crate::error::{TilingResult, UsageError};
use crate::SampleType;

macro_rules! for_each_variant {
    ($value:expr, $inner:pat => $body:expr) => {
        match $value {
            SampleBuffer::U8($inner) => $body,
            SampleBuffer::U16($inner) => $body,
            SampleBuffer::U32($inner) => $body,
            SampleBuffer::U64($inner) => $body,
            SampleBuffer::I8($inner) => $body,
            SampleBuffer::I16($inner) => $body,
            SampleBuffer::I32($inner) => $body,
            SampleBuffer::I64($inner) => $body,
            SampleBuffer::F16($inner) => $body,
            SampleBuffer::F32($inner) => $body,
            SampleBuffer::F64($inner) => $body,
        }
    };
}

/// A dense buffer of samples in one of the supported element types.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleBuffer {
    /// A vector of unsigned bytes
    U8(Vec<u8>),
    /// A vector of unsigned words
    U16(Vec<u16>),
    /// A vector of 32 bit unsigned ints
    U32(Vec<u32>),
    /// A vector of 64 bit unsigned ints
    U64(Vec<u64>),
    /// A vector of 8 bit signed ints
    I8(Vec<i8>),
    /// A vector of 16 bit signed ints
    I16(Vec<i16>),
    /// A vector of 32 bit signed ints
    I32(Vec<i32>),
    /// A vector of 64 bit signed ints
    I64(Vec<i64>),
    /// A vector of 16 bit IEEE floats
    F16(Vec<f16>),
    /// A vector of 32 bit IEEE floats
    F32(Vec<f32>),
    /// A vector of 64 bit IEEE floats
    F64(Vec<f64>),
}

impl SampleBuffer {
    /// Allocates a zero-filled buffer of `len` samples of the given type.
    pub fn zeroed(sample_type: SampleType, len: usize) -> SampleBuffer {
        match sample_type {
            SampleType::U8 => SampleBuffer::U8(vec![0; len]),
            SampleType::U16 => SampleBuffer::U16(vec![0; len]),
            SampleType::U32 => SampleBuffer::U32(vec![0; len]),
            SampleType::U64 => SampleBuffer::U64(vec![0; len]),
            SampleType::I8 => SampleBuffer::I8(vec![0; len]),
            SampleType::I16 => SampleBuffer::I16(vec![0; len]),
            SampleType::I32 => SampleBuffer::I32(vec![0; len]),
            SampleType::I64 => SampleBuffer::I64(vec![0; len]),
            SampleType::F16 => SampleBuffer::F16(vec![f16::ZERO; len]),
            SampleType::F32 => SampleBuffer::F32(vec![0.0; len]),
            SampleType::F64 => SampleBuffer::F64(vec![0.0; len]),
        }
    }

    /// Number of samples in the buffer.
    pub fn len(&self) -> usize {
        for_each_variant!(self, buf => buf.len())
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element type of the stored samples.
    pub fn sample_type(&self) -> SampleType {
        match *self {
            SampleBuffer::U8(_) => SampleType::U8,
            SampleBuffer::U16(_) => SampleType::U16,
            SampleBuffer::U32(_) => SampleType::U32,
            SampleBuffer::U64(_) => SampleType::U64,
            SampleBuffer::I8(_) => SampleType::I8,
            SampleBuffer::I16(_) => SampleType::I16,
            SampleBuffer::I32(_) => SampleType::I32,
            SampleBuffer::I64(_) => SampleType::I64,
            SampleBuffer::F16(_) => SampleType::F16,
            SampleBuffer::F32(_) => SampleType::F32,
            SampleBuffer::F64(_) => SampleType::F64,
        }
    }

    /// Size of the buffer contents in bytes.
    pub fn byte_len(&self) -> usize {
        self.len() * self.sample_type().byte_len()
    }

    /// Copies `src[src_range]` to `self[dst_start..]`.
    ///
    /// Both buffers must hold the same element type and the ranges must lie
    /// within their respective buffers.
    pub fn copy_range(
        &mut self,
        src: &SampleBuffer,
        src_range: Range<usize>,
        dst_start: usize,
    ) -> TilingResult<()> {
        let expected = self.sample_type();

        macro_rules! copy_matching {
            ($($variant:ident),*) => {
                match (self, src) {
                    $(
                        (SampleBuffer::$variant(dst), SampleBuffer::$variant(src)) => {
                            let len = src_range.len();
                            dst[dst_start..dst_start + len].copy_from_slice(&src[src_range]);
                            Ok(())
                        }
                    )*
                    (_, src) => Err(
                        UsageError::SampleTypeMismatch(expected, src.sample_type()).into(),
                    ),
                }
            };
        }

        copy_matching!(U8, U16, U32, U64, I8, I16, I32, I64, F16, F32, F64)
    }
}

/// A dense, row-major pixel rectangle with shape `(height, width, channels)`.
///
/// Single-channel buffers are the rank-2 presentation of a greyscale result;
/// `channels` is never zero. The samples of one pixel are interleaved.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    samples: SampleBuffer,
    height: u32,
    width: u32,
    channels: u8,
}

impl PixelBuffer {
    /// Allocates a zero-filled buffer of the given shape and element type.
    pub fn zeroed(
        sample_type: SampleType,
        height: u32,
        width: u32,
        channels: u8,
    ) -> TilingResult<PixelBuffer> {
        let len = sample_len(height, width, channels)?;
        Ok(PixelBuffer {
            samples: SampleBuffer::zeroed(sample_type, len),
            height,
            width,
            channels,
        })
    }

    /// Wraps an existing sample buffer, checking it against the given shape.
    pub fn from_samples(
        samples: SampleBuffer,
        height: u32,
        width: u32,
        channels: u8,
    ) -> TilingResult<PixelBuffer> {
        let len = sample_len(height, width, channels)?;
        if samples.len() != len {
            return Err(UsageError::TruncatedTile(len, samples.len()).into());
        }
        Ok(PixelBuffer {
            samples,
            height,
            width,
            channels,
        })
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn sample_type(&self) -> SampleType {
        self.samples.sample_type()
    }

    /// The `(height, width, channels)` shape of the buffer.
    pub fn shape(&self) -> (u32, u32, u8) {
        (self.height, self.width, self.channels)
    }

    pub fn samples(&self) -> &SampleBuffer {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut SampleBuffer {
        &mut self.samples
    }

    pub fn into_samples(self) -> SampleBuffer {
        self.samples
    }

    /// Sample range covering the pixels `[x_start, x_stop)` of row `y`.
    pub(crate) fn row_range(&self, y: u32, x_start: u32, x_stop: u32) -> Range<usize> {
        let width = self.width as usize;
        let channels = usize::from(self.channels);
        let row = y as usize * width;
        (row + x_start as usize) * channels..(row + x_stop as usize) * channels
    }
}

fn sample_len(height: u32, width: u32, channels: u8) -> TilingResult<usize> {
    let height = usize::try_from(height)?;
    let width = usize::try_from(width)?;
    height
        .checked_mul(width)
        .and_then(|n| n.checked_mul(usize::from(channels)))
        .ok_or(crate::TilingError::IntSizeError)
}
