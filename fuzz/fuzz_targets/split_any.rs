#![no_main]

// Splits block-aligned copies of every dimension and checks the emitted regions
// against the copy invariants.

use libfuzzer_sys::{arbitrary, fuzz_target};
use texture_copy_split::{
    safe, validate_plan, BlockInfo, BufferLayout, CopyRequest, CopySplitSettings, Extent3D,
    Origin3D, TextureDimension,
};

const BLOCKS: [BlockInfo; 8] = [
    BlockInfo::new(1, 1, 1),
    BlockInfo::new(2, 1, 1),
    BlockInfo::new(4, 1, 1),
    BlockInfo::new(8, 1, 1),
    BlockInfo::new(16, 1, 1),
    BlockInfo::new(8, 4, 4),
    BlockInfo::new(16, 4, 4),
    BlockInfo::new(16, 8, 8),
];

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct SplitInput {
    pub dimension: u8,
    pub block: u8,
    pub origin_blocks: (u8, u8, u8),
    pub size_blocks: (u16, u16, u8),
    pub offset_blocks: u16,
    pub pitch_steps: u8,
    pub extra_rows: u8,
}

fuzz_target!(|input: SplitInput| {
    let dimension = match input.dimension % 3 {
        0 => TextureDimension::D1,
        1 => TextureDimension::D2,
        _ => TextureDimension::D3,
    };
    let block = BLOCKS[input.block as usize % BLOCKS.len()];
    let settings = CopySplitSettings::default();

    let texture_offset = Origin3D::new(
        input.origin_blocks.0 as u32 * block.block_width,
        input.origin_blocks.1 as u32 * block.block_height,
        input.origin_blocks.2 as u32,
    );
    let copy_size = Extent3D::new(
        (input.size_blocks.0 as u32 % 1024 + 1) * block.block_width,
        (input.size_blocks.1 as u32 % 256 + 1) * block.block_height,
        input.size_blocks.2 as u32 % 16 + 1,
    );

    // Tightest legal pitch, plus some slack.
    let pitch = settings.row_pitch_alignment();
    let row_bytes = block.row_bytes(copy_size.width) as u32;
    let bytes_per_row = row_bytes.div_ceil(pitch) * pitch + input.pitch_steps as u32 % 4 * pitch;
    let layout = BufferLayout::new(
        input.offset_blocks as u64 * block.bytes_per_block as u64,
        bytes_per_row,
        block.blocks_high(copy_size.height) + input.extra_rows as u32 % 8,
    );

    let plan = match safe::plan_texture_copy(
        dimension,
        texture_offset,
        copy_size,
        block,
        layout,
        settings,
    ) {
        Ok(plan) => plan,
        Err(error) => panic!("Block-aligned copy was rejected: {error}\n{input:?}"),
    };

    let request = CopyRequest {
        dimension,
        texture_offset,
        copy_size,
        block,
        layout,
        placement_alignment: settings.placement_alignment,
    };
    if let Err(violation) = validate_plan(&request, &plan) {
        panic!("Invalid split: {violation}\nRequest: {request:?}\nPlan: {plan:?}");
    }
});
