//! Pixel-space and tile-space geometry.
//!
//! The mapping from a pixel rectangle to the range of tiles covering it is
//! pure integer arithmetic and performs no I/O: floor division for the first
//! tile touched, ceiling division for the exclusive end, and the pixel
//! coordinate of the cover's top-left corner for translating between
//! assembled-buffer-local and image-global positions.

use std::fmt;

use crate::error::{RegionError, TilingResult, UsageError};

/// A caller-requested pixel rectangle, half-open on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub y_start: u32,
    pub y_stop: u32,
    pub x_start: u32,
    pub x_stop: u32,
}

impl Region {
    pub fn new(y_start: u32, y_stop: u32, x_start: u32, x_stop: u32) -> Region {
        Region {
            y_start,
            y_stop,
            x_start,
            x_stop,
        }
    }

    /// The full extent of a `width` x `height` page.
    pub fn full(width: u32, height: u32) -> Region {
        Region {
            y_start: 0,
            y_stop: height,
            x_start: 0,
            x_stop: width,
        }
    }

    /// Checks `0 <= start <= stop <= dimension` on both axes.
    pub fn check(&self, image_width: u32, image_height: u32) -> Result<(), RegionError> {
        if self.y_start > self.y_stop || self.x_start > self.x_stop {
            return Err(RegionError::Inverted(*self));
        }
        if self.y_stop > image_height || self.x_stop > image_width {
            return Err(RegionError::OutOfBounds(*self, image_width, image_height));
        }
        Ok(())
    }

    /// Height of the rectangle. Only meaningful after [`Region::check`].
    pub fn height(&self) -> u32 {
        self.y_stop - self.y_start
    }

    /// Width of the rectangle. Only meaningful after [`Region::check`].
    pub fn width(&self) -> u32 {
        self.x_stop - self.x_start
    }

    /// Whether the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.y_start >= self.y_stop || self.x_start >= self.x_stop
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}..{}, {}..{}]",
            self.y_start, self.y_stop, self.x_start, self.x_stop
        )
    }
}

/// Grid coordinates of one tile: `row = y / tile_height`, `col = x / tile_width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileIndex {
    pub row: u32,
    pub col: u32,
}

/// The fixed pixel extent of every tile of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileShape {
    pub height: u32,
    pub width: u32,
}

impl TileShape {
    pub fn new(height: u32, width: u32) -> TileShape {
        TileShape { height, width }
    }

    /// Number of samples in one full tile extent with `channels` channels.
    pub(crate) fn samples(&self, channels: u8) -> TilingResult<usize> {
        let height = usize::try_from(self.height)?;
        let width = usize::try_from(self.width)?;
        height
            .checked_mul(width)
            .and_then(|n| n.checked_mul(usize::from(channels)))
            .ok_or(crate::TilingError::IntSizeError)
    }
}

impl fmt::Display for TileShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}

/// The tile-grid range covering a region, with end bounds exclusive, and the
/// pixel coordinate of the cover's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCover {
    pub row_start: u32,
    pub row_end: u32,
    pub col_start: u32,
    pub col_end: u32,
    pub pixel_offset_y: u32,
    pub pixel_offset_x: u32,
}

impl TileCover {
    /// Number of tile rows in the cover.
    pub fn rows(&self) -> u32 {
        self.row_end - self.row_start
    }

    /// Number of tile columns in the cover.
    pub fn cols(&self) -> u32 {
        self.col_end - self.col_start
    }

    /// Iterates the covered indices in row-major order.
    pub fn indices(&self) -> impl Iterator<Item = TileIndex> + '_ {
        let cols = self.col_start..self.col_end;
        (self.row_start..self.row_end)
            .flat_map(move |row| cols.clone().map(move |col| TileIndex { row, col }))
    }
}

/// Computes the tile-grid range covering `region` for the given tile shape.
///
/// Pure arithmetic, no I/O. The region must already be checked against the
/// page bounds; zero tile extents fail with
/// [`UsageError::InvalidTileSize`] since an untiled page has no grid to map
/// into.
pub fn tile_cover(region: &Region, tile: TileShape) -> TilingResult<TileCover> {
    if tile.height == 0 || tile.width == 0 {
        return Err(UsageError::InvalidTileSize(tile).into());
    }

    let row_start = region.y_start / tile.height;
    let col_start = region.x_start / tile.width;

    Ok(TileCover {
        row_start,
        row_end: div_ceil(region.y_stop, tile.height),
        col_start,
        col_end: div_ceil(region.x_stop, tile.width),
        pixel_offset_y: row_start * tile.height,
        pixel_offset_x: col_start * tile.width,
    })
}

/// Number of whole tiles needed to cover `extent` pixels.
pub fn tiles_spanning(extent: u32, tile_extent: u32) -> u32 {
    div_ceil(extent, tile_extent)
}

fn div_ceil(n: u32, d: u32) -> u32 {
    n / d + u32::from(n % d != 0)
}
