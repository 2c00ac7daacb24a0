use std::io;
use std::num::TryFromIntError;

use quick_error::quick_error;

use crate::grid::{Region, TileShape};
use crate::SampleType;

quick_error! {
    /// Tiling error kinds.
    #[derive(Debug)]
    pub enum TilingError {
        /// The requested region violates the page bounds
        InvalidRegion(err: RegionError) {
            from()
            display("invalid region: {}", err)
        }
        /// The caller misused the read or write path
        Usage(err: UsageError) {
            from()
            display("usage error: {}", err)
        }
        /// An I/O error occurred in the underlying storage
        Io(err: io::Error) {
            from()
            display("I/O error: {}", err)
        }
        /// An assembly buffer would exceed the configured limits
        LimitsExceeded {
            display("the assembly buffer would exceed the configured limits")
        }
        /// An integer conversion to or from a platform size failed
        IntSizeError {
            display("platform or format size limits exceeded")
        }
    }
}

quick_error! {
    /// A pixel rectangle that can never be satisfied against its page.
    ///
    /// Always fatal to the call; region errors are detected before any tile
    /// I/O happens and are never retried.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum RegionError {
        /// `stop` exceeds the page dimension on at least one axis
        OutOfBounds(region: Region, image_width: u32, image_height: u32) {
            display("region {} exceeds the {}x{} page", region, image_width, image_height)
        }
        /// `start > stop` on at least one axis
        Inverted(region: Region) {
            display("region {} has an inverted interval", region)
        }
    }
}

quick_error! {
    /// Caller programming errors on the read or write path.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum UsageError {
        /// A buffer does not have the shape its destination requires
        ShapeMismatch(expected: TileShape, height: u32, width: u32) {
            display("buffer is {}x{} but the tile grid requires {}", height, width, expected)
        }
        /// A tile extent is zero or otherwise unusable for the page
        InvalidTileSize(shape: TileShape) {
            display("invalid tile size {}", shape)
        }
        /// The write path only supports single-channel images
        UnsupportedChannelLayout(channels: u8) {
            display("unsupported channel layout: {} channels", channels)
        }
        /// A buffer's element type differs from the page's element type
        SampleTypeMismatch(expected: SampleType, actual: SampleType) {
            display("sample type {:?} does not match the page's {:?}", actual, expected)
        }
        /// A tile buffer is shorter or longer than one full tile extent
        TruncatedTile(expected: usize, actual: usize) {
            display("tile holds {} samples, expected {}", actual, expected)
        }
    }
}

quick_error! {
    /// Failure modes of [`TileSource::fetch`](crate::reader::TileSource::fetch).
    ///
    /// `Unavailable` means the storage layer cannot produce the tile (missing
    /// offset, undecodable payload); the assembler maps it to
    /// [`TiledRead::NotTiled`](crate::reader::TiledRead) for the entire call
    /// since partial fallback is not supported. `Io` is a genuine fault and
    /// propagates as [`TilingError::Io`].
    #[derive(Debug)]
    pub enum FetchError {
        Unavailable {
            display("the tile cannot be produced by the storage layer")
        }
        Io(err: io::Error) {
            from()
            display("I/O error: {}", err)
        }
    }
}

impl From<TryFromIntError> for TilingError {
    fn from(_err: TryFromIntError) -> TilingError {
        TilingError::IntSizeError
    }
}

/// Result of a region read or write.
pub type TilingResult<T> = Result<T, TilingError>;
