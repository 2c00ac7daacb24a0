mod util;

use tiled_raster::buffer::{PixelBuffer, SampleBuffer};
use tiled_raster::grid::TileShape;
use tiled_raster::page::PageMetadata;
use tiled_raster::writer::RegionWriter;
use tiled_raster::{SampleType, TilingError, UsageError};

use util::GridStore;

fn write_target(
    image_height: u32,
    image_width: u32,
    tile_height: u32,
    tile_width: u32,
    sample_type: SampleType,
) -> GridStore {
    GridStore::empty(PageMetadata {
        image_height,
        image_width,
        tile_height,
        tile_width,
        sample_type,
        samples_per_pixel: 1,
        extra_samples: 0,
    })
}

#[test]
fn float_image_decomposes_into_49_padded_tiles() {
    // 100x100 f32 image over 16x16 tiles: ceil(100/16) = 7 tile rows and
    // columns, with the last row/column zero-padded beyond pixel 99.
    let pixels: Vec<f32> = (0..100 * 100).map(|i| i as f32).collect();
    let image = PixelBuffer::from_samples(SampleBuffer::F32(pixels), 100, 100, 1).unwrap();

    let sink = write_target(100, 100, 16, 16, SampleType::F32);
    let mut writer = RegionWriter::new(sink);
    writer.write_image(&image, TileShape::new(16, 16)).unwrap();

    let store = writer.into_inner();
    assert_eq!(store.writes.len(), 49);
    assert_eq!(store.tiles.len(), 49);

    // Row-major emission order, offsets in pixels.
    assert_eq!(store.writes[0], (0, 0));
    assert_eq!(store.writes[1], (0, 16));
    assert_eq!(store.writes[7], (16, 0));
    assert_eq!(store.writes[48], (96, 96));

    // The bottom-right edge tile holds 4 valid pixels per row and per
    // column; everything beyond is zero padding.
    let corner = match &store.tiles[&(6, 6)] {
        SampleBuffer::F32(samples) => samples.clone(),
        other => panic!("wrong sample type: {:?}", other.sample_type()),
    };
    assert_eq!(corner.len(), 16 * 16);
    for y in 0..16u32 {
        for x in 0..16u32 {
            let value = corner[(y * 16 + x) as usize];
            if y < 4 && x < 4 {
                assert_eq!(value, ((96 + y) * 100 + 96 + x) as f32);
            } else {
                assert_eq!(value, 0.0, "padding at ({}, {}) must be zero", y, x);
            }
        }
    }
}

#[test]
fn interior_tiles_carry_no_padding() {
    let pixels: Vec<u8> = (0..40 * 40).map(|i| (i % 256) as u8).collect();
    let image = PixelBuffer::from_samples(SampleBuffer::U8(pixels.clone()), 40, 40, 1).unwrap();

    let sink = write_target(40, 40, 16, 16, SampleType::U8);
    let mut writer = RegionWriter::new(sink);
    writer.write_image(&image, TileShape::new(16, 16)).unwrap();

    let store = writer.into_inner();
    let tile = match &store.tiles[&(1, 1)] {
        SampleBuffer::U8(samples) => samples.clone(),
        other => panic!("wrong sample type: {:?}", other.sample_type()),
    };
    for y in 0..16u32 {
        for x in 0..16u32 {
            assert_eq!(
                tile[(y * 16 + x) as usize],
                pixels[((16 + y) * 40 + 16 + x) as usize]
            );
        }
    }
}

#[test]
fn multi_channel_images_are_rejected() {
    let image = PixelBuffer::zeroed(SampleType::U8, 32, 32, 3).unwrap();
    let sink = write_target(32, 32, 16, 16, SampleType::U8);
    let mut writer = RegionWriter::new(sink);

    let err = writer
        .write_image(&image, TileShape::new(16, 16))
        .unwrap_err();
    assert!(matches!(
        err,
        TilingError::Usage(UsageError::UnsupportedChannelLayout(3))
    ));
    assert!(writer.get_ref().writes.is_empty());
}

#[test]
fn zero_tile_extent_is_rejected_before_the_sink() {
    let image = PixelBuffer::zeroed(SampleType::U8, 32, 32, 1).unwrap();
    let sink = write_target(32, 32, 16, 16, SampleType::U8);
    let mut writer = RegionWriter::new(sink);

    let err = writer
        .write_image(&image, TileShape::new(0, 16))
        .unwrap_err();
    assert!(matches!(
        err,
        TilingError::Usage(UsageError::InvalidTileSize(_))
    ));
}

#[test]
fn sink_rejects_tile_extents_that_are_not_multiples_of_16() {
    let image = PixelBuffer::zeroed(SampleType::U8, 20, 20, 1).unwrap();
    let sink = write_target(20, 20, 10, 10, SampleType::U8);
    let mut writer = RegionWriter::new(sink);

    let err = writer
        .write_image(&image, TileShape::new(10, 10))
        .unwrap_err();
    assert!(matches!(
        err,
        TilingError::Usage(UsageError::InvalidTileSize(_))
    ));
}

#[test]
fn write_tile_at_places_one_tile_without_padding() {
    let tile_data: Vec<u8> = (0..16 * 16).map(|i| (i % 256) as u8).collect();
    let tile = PixelBuffer::from_samples(SampleBuffer::U8(tile_data.clone()), 16, 16, 1).unwrap();

    let sink = write_target(64, 64, 16, 16, SampleType::U8);
    let mut writer = RegionWriter::new(sink);
    writer
        .write_tile_at(&tile, 32, 16, TileShape::new(16, 16))
        .unwrap();

    let store = writer.into_inner();
    assert_eq!(store.writes, [(32, 16)]);
    assert_eq!(store.tiles[&(2, 1)], SampleBuffer::U8(tile_data));
}

#[test]
fn write_tile_at_rejects_misshaped_buffers() {
    let data = PixelBuffer::zeroed(SampleType::U8, 16, 8, 1).unwrap();
    let sink = write_target(64, 64, 16, 16, SampleType::U8);
    let mut writer = RegionWriter::new(sink);

    let err = writer
        .write_tile_at(&data, 0, 0, TileShape::new(16, 16))
        .unwrap_err();
    assert!(matches!(
        err,
        TilingError::Usage(UsageError::ShapeMismatch(_, 16, 8))
    ));
    assert!(writer.get_ref().writes.is_empty());
}
