//! End to end splits through the public API.

use rstest::rstest;
use texture_copy_split::{
    safe, validate_copy_split, validate_plan, BlockInfo, BufferLayout, CopyDirection, CopyRequest,
    CopySplitSettings, CopySplitValidationError, Extent3D, Origin3D, TextureDimension,
};

const RGBA8: BlockInfo = BlockInfo::new(4, 1, 1);
const BC1: BlockInfo = BlockInfo::new(8, 4, 4);

fn request(
    dimension: TextureDimension,
    texture_offset: Origin3D,
    copy_size: Extent3D,
    block: BlockInfo,
    layout: BufferLayout,
) -> CopyRequest {
    CopyRequest {
        dimension,
        texture_offset,
        copy_size,
        block,
        layout,
        placement_alignment: CopySplitSettings::default().placement_alignment,
    }
}

#[test]
fn aligned_single_row_is_one_region() {
    let regions = safe::split_2d(
        Origin3D::ZERO,
        Extent3D::new(256, 1, 1),
        RGBA8,
        0,
        1024,
        CopySplitSettings::default(),
    )
    .unwrap();

    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].aligned_offset, 0);
    assert_eq!(regions[0].buffer_offset, Origin3D::ZERO);
}

#[test]
fn misaligned_full_rows_share_one_footprint() {
    let copy_size = Extent3D::new(256, 2, 1);
    let layout = BufferLayout::new(32, 1024, 2);
    let regions = safe::split_2d(
        Origin3D::ZERO,
        copy_size,
        RGBA8,
        layout.offset,
        layout.bytes_per_row,
        CopySplitSettings::default(),
    )
    .unwrap();

    assert_eq!(regions.len(), 2);
    assert!(regions.iter().all(|region| region.aligned_offset == 0));
    let request = request(TextureDimension::D2, Origin3D::ZERO, copy_size, RGBA8, layout);
    assert_eq!(validate_copy_split(&request, regions.as_slice()), Ok(()));
}

#[test]
fn odd_sized_copy_at_odd_origin() {
    let texture_offset = Origin3D::new(59, 13, 0);
    let copy_size = Extent3D::new(257, 31, 1);
    // Tightest row pitch for 257 texels, rounded up to 256 bytes.
    let layout = BufferLayout::new(513 * 4, 1280, 31);

    let regions = safe::split_2d(
        texture_offset,
        copy_size,
        RGBA8,
        layout.offset,
        layout.bytes_per_row,
        CopySplitSettings::default(),
    )
    .unwrap();

    let request = request(TextureDimension::D2, texture_offset, copy_size, RGBA8, layout);
    assert_eq!(validate_copy_split(&request, regions.as_slice()), Ok(()));
}

#[rstest]
fn taller_images_than_the_copy(
    #[values(0, 4, 32, 256, 260, 508)] offset: u64,
    #[values(1, 2, 3, 4)] height: u32,
    #[values(0, 1, 2, 7)] extra_rows: u32,
    #[values(1, 2, 5)] depth: u32,
) {
    let copy_size = Extent3D::new(64, height, depth);
    let layout = BufferLayout::new(offset, 256, height + extra_rows);
    let regions = safe::split_3d(
        Origin3D::new(4, 2, 1),
        copy_size,
        RGBA8,
        layout.offset,
        layout.bytes_per_row,
        layout.rows_per_image,
        CopySplitSettings::default(),
    )
    .unwrap();

    let request = request(
        TextureDimension::D3,
        Origin3D::new(4, 2, 1),
        copy_size,
        RGBA8,
        layout,
    );
    assert_eq!(validate_copy_split(&request, regions.as_slice()), Ok(()));
    if extra_rows > 0 && depth > 1 {
        // Slices never need the empty first row fix-ups when images have spare rows.
        assert!(regions.len() <= 2);
    }
}

#[rstest]
fn compressed_arrays_and_volumes(
    #[values(TextureDimension::D1, TextureDimension::D2, TextureDimension::D3)]
    dimension: TextureDimension,
    #[values(0, 8, 256, 264, 504)] offset: u64,
    #[values(1, 3, 4)] layers: u32,
) {
    let copy_size = Extent3D::new(32, 8, layers);
    let layout = BufferLayout::new(offset, 256, 2);
    let texture_offset = Origin3D::new(8, 4, 0);
    let plan = safe::plan_texture_copy(
        dimension,
        texture_offset,
        copy_size,
        BC1,
        layout,
        CopySplitSettings::default(),
    )
    .unwrap();

    let request = request(dimension, texture_offset, copy_size, BC1, layout);
    assert_eq!(validate_plan(&request, &plan), Ok(()));

    let copied: u64 = plan
        .regions()
        .map(|region| region.copy_size.texel_count())
        .sum();
    assert_eq!(copied, copy_size.texel_count());
}

#[test]
fn commands_use_region_footprints() {
    let plan = safe::plan_texture_copy(
        TextureDimension::D3,
        Origin3D::ZERO,
        Extent3D::new(32, 4, 3),
        RGBA8,
        BufferLayout::new(256, 256, 4),
        CopySplitSettings::default(),
    )
    .unwrap();

    for region in plan.regions() {
        let command = region.command(CopyDirection::BufferToTexture, 256);
        assert_eq!(command.footprint.offset % 512, 0);
        assert_eq!(command.destination, region.texture_offset);
        assert_eq!(command.source.extent(), region.copy_size);
    }
}

#[test]
fn rejects_pitch_smaller_than_a_row() {
    assert_eq!(
        safe::split_2d(
            Origin3D::ZERO,
            Extent3D::new(128, 1, 1),
            RGBA8,
            0,
            256,
            CopySplitSettings::default(),
        ),
        Err(CopySplitValidationError::BytesPerRowTooSmall {
            needed: 512,
            actual: 256,
        })
    );
}
