//! The write path: tile decomposition.
//!
//! [`RegionWriter`] splits an arbitrary-sized image into a regular grid of
//! fixed-size tiles and emits them through a [`TileSink`]. Edge tiles are
//! zero-padded on the bottom/right to the full tile extent; tiles are emitted
//! in row-major order because the directory structure behind the sink is
//! append-only.

use log::trace;

use crate::buffer::PixelBuffer;
use crate::error::{TilingResult, UsageError};
use crate::grid::{self, TileShape};

/// Capability persisting tiles at absolute pixel offsets.
///
/// `y_offset`/`x_offset` are the pixel coordinate of the tile's top-left
/// corner and are always multiples of the tile extent. Implementations
/// enforce their format's own tile-size rules (tile extents that are
/// multiples of 16, for the usual suspects) and report violations as
/// [`UsageError::InvalidTileSize`].
pub trait TileSink {
    fn write(&mut self, y_offset: u32, x_offset: u32, tile: &PixelBuffer) -> TilingResult<()>;
}

/// Decomposes images into fixed-size tiles and hands them to a sink.
///
/// Like the reader, a writer assumes exclusive ownership of the underlying
/// handle's page cursor for the duration of one call.
#[derive(Debug)]
pub struct RegionWriter<S> {
    sink: S,
}

impl<S: TileSink> RegionWriter<S> {
    pub fn new(sink: S) -> RegionWriter<S> {
        RegionWriter { sink }
    }

    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Writes `image` as a grid of `tile`-sized tiles.
    ///
    /// Only single-channel images are supported on this path. Edge tiles are
    /// zero-padded to the full tile extent; the padding is invisible to a
    /// subsequent region read since it lies outside the image bounds.
    pub fn write_image(&mut self, image: &PixelBuffer, tile: TileShape) -> TilingResult<()> {
        if image.channels() != 1 {
            return Err(UsageError::UnsupportedChannelLayout(image.channels()).into());
        }
        if tile.height == 0 || tile.width == 0 {
            return Err(UsageError::InvalidTileSize(tile).into());
        }

        let tile_rows = grid::tiles_spanning(image.height(), tile.height);
        let tile_cols = grid::tiles_spanning(image.width(), tile.width);
        trace!(
            "decomposing {}x{} image into {}x{} tiles of {}",
            image.height(),
            image.width(),
            tile_rows,
            tile_cols,
            tile
        );

        for i in 0..tile_rows {
            let y_offset = i * tile.height;
            let y_stop = (y_offset + tile.height).min(image.height());

            for j in 0..tile_cols {
                let x_offset = j * tile.width;
                let x_stop = (x_offset + tile.width).min(image.width());

                let mut padded =
                    PixelBuffer::zeroed(image.sample_type(), tile.height, tile.width, 1)?;
                for (local_row, y) in (y_offset..y_stop).enumerate() {
                    let src = image.row_range(y, x_offset, x_stop);
                    let dst_start = local_row * tile.width as usize;
                    padded.samples_mut().copy_range(image.samples(), src, dst_start)?;
                }

                self.sink.write(y_offset, x_offset, &padded)?;
            }
        }

        Ok(())
    }

    /// Writes one already-tile-shaped buffer at an absolute pixel position.
    ///
    /// For callers that manage tiling externally, e.g. streaming a large
    /// image tile by tile. No padding is performed; `data` must be exactly
    /// one tile extent.
    pub fn write_tile_at(
        &mut self,
        data: &PixelBuffer,
        y_offset: u32,
        x_offset: u32,
        tile: TileShape,
    ) -> TilingResult<()> {
        if data.height() != tile.height || data.width() != tile.width {
            return Err(UsageError::ShapeMismatch(tile, data.height(), data.width()).into());
        }

        self.sink.write(y_offset, x_offset, data)
    }
}
