#![no_main]

// Feeds arbitrary values through the checked splitters. Inputs are either rejected
// or produce a valid split; nothing may panic or overflow.

use libfuzzer_sys::{arbitrary, fuzz_target};
use texture_copy_split::{
    safe, validate_copy_split, BlockInfo, BufferLayout, CopyRequest, CopySplitSettings, Extent3D,
    Origin3D, TextureDimension,
};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct RawInput {
    pub volume: bool,
    pub origin: (u32, u32, u32),
    pub size: (u16, u16, u8),
    pub block: (u8, u8, u8),
    pub offset: u32,
    pub bytes_per_row: u32,
    pub rows_per_image: u32,
    pub alignment_log2: u8,
}

fuzz_target!(|input: RawInput| {
    let texture_offset = Origin3D::new(input.origin.0, input.origin.1, input.origin.2);
    let copy_size = Extent3D::new(
        input.size.0 as u32,
        input.size.1 as u32,
        input.size.2 as u32,
    );
    let block = BlockInfo::new(
        input.block.0 as u32,
        input.block.1 as u32,
        input.block.2 as u32,
    );
    let settings =
        CopySplitSettings::new().with_placement_alignment(1 << (input.alignment_log2 % 14));
    let offset = input.offset as u64;

    let (dimension, result) = if input.volume {
        (
            TextureDimension::D3,
            safe::split_3d(
                texture_offset,
                copy_size,
                block,
                offset,
                input.bytes_per_row,
                input.rows_per_image,
                settings,
            ),
        )
    } else {
        (
            TextureDimension::D2,
            safe::split_2d(
                texture_offset,
                copy_size,
                block,
                offset,
                input.bytes_per_row,
                settings,
            ),
        )
    };

    let Ok(regions) = result else {
        return;
    };

    let rows_per_image = match dimension {
        TextureDimension::D3 => input.rows_per_image,
        _ => block.blocks_high(copy_size.height),
    };
    let request = CopyRequest {
        dimension,
        texture_offset,
        copy_size,
        block,
        layout: BufferLayout::new(offset, input.bytes_per_row, rows_per_image),
        placement_alignment: settings.placement_alignment,
    };
    if let Err(violation) = validate_copy_split(&request, regions.as_slice()) {
        panic!("Invalid split: {violation}\nRequest: {request:?}\nRegions: {regions:?}");
    }
});
