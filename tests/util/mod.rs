#![allow(dead_code)] // each test binary uses a different subset of the fixture

//! In-memory tile storage used by the integration tests.
//!
//! `GridStore` stands in for the format layer: it owns the page metadata and
//! a dense map of tiles, implements all three capabilities, and records the
//! order of fetches and writes so tests can assert on the access pattern.

use std::collections::{HashMap, HashSet};

use tiled_raster::buffer::{PixelBuffer, SampleBuffer};
use tiled_raster::grid::TileIndex;
use tiled_raster::page::{PageMetadata, PageMetadataProvider};
use tiled_raster::reader::{Tile, TileSource};
use tiled_raster::writer::TileSink;
use tiled_raster::{FetchError, SampleType, TilingResult, UsageError};

pub struct GridStore {
    pub meta: PageMetadata,
    pub tiles: HashMap<(u32, u32), SampleBuffer>,
    pub unavailable: HashSet<(u32, u32)>,
    pub fetches: Vec<(u32, u32)>,
    pub writes: Vec<(u32, u32)>,
}

impl GridStore {
    pub fn empty(meta: PageMetadata) -> GridStore {
        GridStore {
            meta,
            tiles: HashMap::new(),
            unavailable: HashSet::new(),
            fetches: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// A store holding a single-channel u8 image pre-decomposed into tiles.
    ///
    /// The decomposition here is written independently of the crate's write
    /// path so round trips do not test the code against itself.
    pub fn gray_u8(
        image_height: u32,
        image_width: u32,
        tile_height: u32,
        tile_width: u32,
        pixels: &[u8],
    ) -> GridStore {
        assert_eq!(pixels.len(), (image_height * image_width) as usize);

        let meta = PageMetadata {
            image_height,
            image_width,
            tile_height,
            tile_width,
            sample_type: SampleType::U8,
            samples_per_pixel: 1,
            extra_samples: 0,
        };

        let mut store = GridStore::empty(meta);
        let tile_rows = div_ceil(image_height, tile_height);
        let tile_cols = div_ceil(image_width, tile_width);
        for tr in 0..tile_rows {
            for tc in 0..tile_cols {
                let mut tile = vec![0u8; (tile_height * tile_width) as usize];
                for y in 0..tile_height {
                    for x in 0..tile_width {
                        let gy = tr * tile_height + y;
                        let gx = tc * tile_width + x;
                        if gy < image_height && gx < image_width {
                            tile[(y * tile_width + x) as usize] =
                                pixels[(gy * image_width + gx) as usize];
                        }
                    }
                }
                store.tiles.insert((tr, tc), SampleBuffer::U8(tile));
            }
        }
        store
    }

    /// A store for an untiled page; fetching from it panics the test.
    pub fn untiled_gray_u8(image_height: u32, image_width: u32) -> GridStore {
        GridStore::empty(PageMetadata {
            image_height,
            image_width,
            tile_height: 0,
            tile_width: 0,
            sample_type: SampleType::U8,
            samples_per_pixel: 1,
            extra_samples: 0,
        })
    }
}

impl PageMetadataProvider for GridStore {
    fn current(&self) -> &PageMetadata {
        &self.meta
    }
}

impl TileSource for GridStore {
    fn fetch(&mut self, index: TileIndex) -> Result<Tile, FetchError> {
        assert!(
            self.meta.is_tiled(),
            "fetch on an untiled page: the core must not attempt tile I/O here"
        );
        self.fetches.push((index.row, index.col));
        if self.unavailable.contains(&(index.row, index.col)) {
            return Err(FetchError::Unavailable);
        }
        match self.tiles.get(&(index.row, index.col)) {
            Some(samples) => Ok(Tile::new(samples.clone())),
            None => Err(FetchError::Unavailable),
        }
    }
}

impl TileSink for GridStore {
    fn write(&mut self, y_offset: u32, x_offset: u32, tile: &PixelBuffer) -> TilingResult<()> {
        let shape = self.meta.tile_shape();
        // The underlying format wants tile extents that are multiples of 16.
        if shape.height % 16 != 0 || shape.width % 16 != 0 {
            return Err(UsageError::InvalidTileSize(shape).into());
        }
        if tile.height() != shape.height || tile.width() != shape.width {
            return Err(UsageError::ShapeMismatch(shape, tile.height(), tile.width()).into());
        }
        if tile.sample_type() != self.meta.sample_type {
            return Err(
                UsageError::SampleTypeMismatch(self.meta.sample_type, tile.sample_type()).into(),
            );
        }

        self.writes.push((y_offset, x_offset));
        self.tiles.insert(
            (y_offset / shape.height, x_offset / shape.width),
            tile.samples().clone(),
        );
        Ok(())
    }
}

pub fn div_ceil(n: u32, d: u32) -> u32 {
    n / d + u32::from(n % d != 0)
}

/// A deterministic single-channel u8 gradient.
pub fn gradient_u8(height: u32, width: u32) -> Vec<u8> {
    (0..height * width).map(|i| (i % 251) as u8).collect()
}
