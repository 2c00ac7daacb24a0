//! Per-page geometry metadata.

use crate::error::{TilingResult, UsageError};
use crate::grid::TileShape;
use crate::SampleType;

/// Immutable snapshot of the geometry of the currently selected page.
///
/// Built by the metadata layer of the underlying format and replaced
/// wholesale whenever the active page changes. `tile_height`/`tile_width`
/// of zero mean the page stores scanlines instead of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMetadata {
    pub image_height: u32,
    pub image_width: u32,
    /// Zero when the page is not tiled
    pub tile_height: u32,
    /// Zero when the page is not tiled
    pub tile_width: u32,
    pub sample_type: SampleType,
    /// All samples of one pixel, color and extra alike
    pub samples_per_pixel: u8,
    /// Non-color samples (alpha and friends), handled only by the untiled
    /// fallback path
    pub extra_samples: u8,
}

impl PageMetadata {
    /// Whether the page carries a tile grid.
    ///
    /// A pure metadata predicate; tiled-ness is never probed with a read.
    pub fn is_tiled(&self) -> bool {
        self.tile_height > 0 && self.tile_width > 0
    }

    /// Samples per pixel that actually hold color or intensity data.
    pub fn color_channels(&self) -> u8 {
        self.samples_per_pixel.saturating_sub(self.extra_samples)
    }

    /// The tile extent of the page's grid.
    pub fn tile_shape(&self) -> TileShape {
        TileShape::new(self.tile_height, self.tile_width)
    }

    /// Checks the internal consistency of the snapshot.
    ///
    /// The tile extents must be zero together or positive together; a page
    /// with only one of them set has no usable grid and no usable fallback.
    pub fn check(&self) -> TilingResult<()> {
        if (self.tile_height == 0) != (self.tile_width == 0) {
            return Err(UsageError::InvalidTileSize(self.tile_shape()).into());
        }
        if self.color_channels() == 0 {
            return Err(UsageError::UnsupportedChannelLayout(self.samples_per_pixel).into());
        }
        Ok(())
    }
}

/// Capability supplying the metadata of the currently selected page.
///
/// The underlying handle keeps one mutable page cursor shared by all tiles of
/// a call; implementations own that cursor and hand out a snapshot of
/// whatever page it points at. Passed explicitly so tests can substitute
/// fakes.
pub trait PageMetadataProvider {
    fn current(&self) -> &PageMetadata;
}
