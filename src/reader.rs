//! The read path: tile assembly.
//!
//! [`RegionReader`] answers an arbitrary pixel-rectangle request against a
//! tiled page by fetching every tile of the covering grid range through a
//! [`TileSource`], laying the tiles into an oversized buffer aligned to tile
//! boundaries, and cropping to the exact request. Padding introduced by edge
//! tiles is cropped away before return and is never visible to the caller.

use log::{debug, trace};

use crate::buffer::{PixelBuffer, SampleBuffer};
use crate::error::{FetchError, TilingError, TilingResult, UsageError};
use crate::grid::{self, Region, TileIndex};
use crate::page::PageMetadataProvider;

/// Capability producing tiles of the currently selected page.
///
/// A tile is always the full `(tile_height, tile_width, color_channels)`
/// extent in the page's element type; producers zero-fill the part of an
/// edge tile that lies outside the image. Fetches go through the handle's
/// mutable page cursor, so a source is `&mut` for the duration of one
/// assembly and must not be shared across concurrent reads.
pub trait TileSource {
    fn fetch(&mut self, index: TileIndex) -> Result<Tile, FetchError>;
}

/// One fetched tile: a dense buffer of one full tile extent.
#[derive(Debug, Clone)]
pub struct Tile {
    pub samples: SampleBuffer,
}

impl Tile {
    pub fn new(samples: SampleBuffer) -> Tile {
        Tile { samples }
    }
}

/// Result of a region read against a page that may or may not be tiled.
///
/// `NotTiled` tells the caller to use its whole-image fallback path. It is
/// returned both for pages without a tile grid and when any single tile
/// cannot be produced, since tile-by-tile partial fallback is not supported.
#[derive(Debug)]
pub enum TiledRead {
    /// The assembled, exactly-cropped pixel rectangle
    Assembled(PixelBuffer),
    /// The page cannot be served from tiles; use the fallback path
    NotTiled,
}

impl TiledRead {
    pub fn is_not_tiled(&self) -> bool {
        matches!(self, TiledRead::NotTiled)
    }

    /// The assembled buffer, if the page was tiled.
    pub fn assembled(self) -> Option<PixelBuffer> {
        match self {
            TiledRead::Assembled(buffer) => Some(buffer),
            TiledRead::NotTiled => None,
        }
    }
}

/// Reading limits.
#[derive(Clone, Debug)]
pub struct Limits {
    /// The maximum size of the transient assembly buffer in bytes, the
    /// default is 256MiB. The assembly buffer covers the tile-aligned
    /// superset of the request, so this also bounds the largest region one
    /// call can serve.
    pub assembly_buffer_size: usize,
    /// The purpose of this is to prevent all the fields of the struct from
    /// being public, as this would make adding new fields a major version
    /// bump.
    _non_exhaustive: (),
}

impl Limits {
    /// A configuration that does not impose any limits.
    pub fn unlimited() -> Limits {
        Limits {
            assembly_buffer_size: usize::MAX,
            _non_exhaustive: (),
        }
    }
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            assembly_buffer_size: 256 * 1024 * 1024,
            _non_exhaustive: (),
        }
    }
}

/// Assembles exactly-cropped pixel rectangles from a tiled page.
///
/// The reader owns its source for the duration of its life; the source in
/// turn owns the mutable page cursor of the underlying handle, so no other
/// reads may run against the same handle concurrently.
#[derive(Debug)]
pub struct RegionReader<S> {
    source: S,
    limits: Limits,
}

impl<S> RegionReader<S>
where
    S: TileSource + PageMetadataProvider,
{
    pub fn new(source: S) -> RegionReader<S> {
        RegionReader {
            source,
            limits: Limits::default(),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> RegionReader<S> {
        self.limits = limits;
        self
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Reads the pixel rectangle `region` from the currently selected page.
    ///
    /// Returns [`TiledRead::NotTiled`] when the page has no tile grid or any
    /// tile fetch reports [`FetchError::Unavailable`]; the caller then
    /// switches to its whole-image fallback. The assembled result has shape
    /// `(region.height(), region.width(), color_channels)` with edge-tile
    /// padding cropped away.
    pub fn read_region(&mut self, region: Region) -> TilingResult<TiledRead> {
        let meta = *self.source.current();
        meta.check()?;
        region.check(meta.image_width, meta.image_height)?;

        if !meta.is_tiled() {
            return Ok(TiledRead::NotTiled);
        }

        let channels = meta.color_channels();
        if region.is_empty() {
            let empty =
                PixelBuffer::zeroed(meta.sample_type, region.height(), region.width(), channels)?;
            return Ok(TiledRead::Assembled(empty));
        }

        let tile = meta.tile_shape();
        let cover = grid::tile_cover(&region, tile)?;
        trace!(
            "assembling {}x{} tiles of {} for region {}",
            cover.rows(),
            cover.cols(),
            tile,
            region
        );

        let tile_height = usize::try_from(tile.height)?;
        let tile_width = usize::try_from(tile.width)?;
        let ch = usize::from(channels);

        let buffer_width = usize::try_from(cover.cols())?
            .checked_mul(tile_width)
            .ok_or(TilingError::IntSizeError)?;
        let buffer_row_samples = buffer_width
            .checked_mul(ch)
            .ok_or(TilingError::IntSizeError)?;
        let total_samples = usize::try_from(cover.rows())?
            .checked_mul(tile_height)
            .and_then(|h| h.checked_mul(buffer_row_samples))
            .ok_or(TilingError::IntSizeError)?;

        if total_samples.saturating_mul(meta.sample_type.byte_len())
            > self.limits.assembly_buffer_size
        {
            return Err(TilingError::LimitsExceeded);
        }

        let mut assembled = SampleBuffer::zeroed(meta.sample_type, total_samples);
        let tile_samples = tile.samples(channels)?;
        let tile_row_samples = tile_width * ch;

        for index in cover.indices() {
            let fetched = match self.source.fetch(index) {
                Ok(fetched) => fetched,
                Err(FetchError::Unavailable) => {
                    debug!("tile ({}, {}) unavailable, falling back", index.row, index.col);
                    return Ok(TiledRead::NotTiled);
                }
                Err(FetchError::Io(err)) => return Err(err.into()),
            };

            if fetched.samples.sample_type() != meta.sample_type {
                return Err(UsageError::SampleTypeMismatch(
                    meta.sample_type,
                    fetched.samples.sample_type(),
                )
                .into());
            }
            if fetched.samples.len() != tile_samples {
                return Err(UsageError::TruncatedTile(tile_samples, fetched.samples.len()).into());
            }

            // Top-left corner of the tile within the assembly buffer.
            let local_row = usize::try_from(index.row - cover.row_start)?;
            let local_col = usize::try_from(index.col - cover.col_start)?;
            let origin =
                local_row * tile_height * buffer_row_samples + local_col * tile_row_samples;

            for row in 0..tile_height {
                let src = row * tile_row_samples..(row + 1) * tile_row_samples;
                assembled.copy_range(&fetched.samples, src, origin + row * buffer_row_samples)?;
            }
        }

        // Crop the tile-aligned superset down to the exact request.
        let y0 = usize::try_from(region.y_start - cover.pixel_offset_y)?;
        let x0 = usize::try_from(region.x_start - cover.pixel_offset_x)?;
        let out_height = usize::try_from(region.height())?;
        let out_row_samples = usize::try_from(region.width())? * ch;

        let mut output =
            PixelBuffer::zeroed(meta.sample_type, region.height(), region.width(), channels)?;
        for row in 0..out_height {
            let src_start = (y0 + row) * buffer_row_samples + x0 * ch;
            output.samples_mut().copy_range(
                &assembled,
                src_start..src_start + out_row_samples,
                row * out_row_samples,
            )?;
        }

        Ok(TiledRead::Assembled(output))
    }
}
