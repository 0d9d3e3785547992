use super::parse_triple;
use crate::error::CliError;
use crate::DimensionArg;
use argh::FromArgs;
use texture_copy_split::{
    safe, validate_plan, BlockInfo, BufferLayout, CopyDirection, CopyRegion, CopyRequest,
    CopySplitSettings, Extent3D, Origin3D, TextureCopyPlan, TextureDimension,
};

#[derive(FromArgs, Debug)]
/// Split a single copy and print the resulting regions
#[argh(subcommand, name = "split")]
pub struct SplitCmd {
    /// texture dimension: 1d, 2d or 3d
    #[argh(option, default = "DimensionArg(TextureDimension::D2)")]
    pub dimension: DimensionArg,

    /// texture origin of the copy, as x,y,z
    #[argh(option, default = "[0, 0, 0]", from_str_fn(parse_triple))]
    pub origin: [u32; 3],

    /// copy size, as width,height,depth_or_layers
    #[argh(option, from_str_fn(parse_triple))]
    pub size: [u32; 3],

    /// texel block, as bytes_per_block,block_width,block_height
    #[argh(option, default = "[4, 1, 1]", from_str_fn(parse_triple))]
    pub block: [u32; 3],

    /// byte offset of the copy in the buffer
    #[argh(option, default = "0")]
    pub offset: u64,

    /// byte stride between block rows in the buffer
    #[argh(option)]
    pub bytes_per_row: u32,

    /// block rows per image in the buffer [default: rows of the copy]
    #[argh(option)]
    pub rows_per_image: Option<u32>,

    /// placement alignment of buffer footprints
    #[argh(option, default = "CopySplitSettings::D3D12.placement_alignment")]
    pub alignment: u32,

    /// print texture-to-buffer commands instead of buffer-to-texture
    #[argh(switch)]
    pub readback: bool,
}

pub fn handle_split_command(cmd: SplitCmd) -> Result<(), CliError> {
    let [x, y, z] = cmd.origin;
    let [width, height, depth] = cmd.size;
    let [bytes_per_block, block_width, block_height] = cmd.block;

    let block = BlockInfo::new(bytes_per_block, block_width, block_height);
    if !block.is_valid() {
        return Err(CliError::InvalidArgument(format!(
            "block {bytes_per_block},{block_width},{block_height} has a zero component"
        )));
    }

    let texture_offset = Origin3D::new(x, y, z);
    let copy_size = Extent3D::new(width, height, depth);
    let rows_per_image = cmd
        .rows_per_image
        .unwrap_or_else(|| block.blocks_high(height));
    let layout = BufferLayout::new(cmd.offset, cmd.bytes_per_row, rows_per_image);
    let settings = CopySplitSettings::new().with_placement_alignment(cmd.alignment);
    let dimension = cmd.dimension.0;

    let plan = safe::plan_texture_copy(
        dimension,
        texture_offset,
        copy_size,
        block,
        layout,
        settings,
    )?;

    let direction = if cmd.readback {
        CopyDirection::TextureToBuffer
    } else {
        CopyDirection::BufferToTexture
    };

    match &plan {
        TextureCopyPlan::Volume(regions) => {
            println!("{} region(s)", regions.len());
            for (index, region) in regions.iter().enumerate() {
                print_region(index, region, direction, layout.bytes_per_row);
            }
        }
        TextureCopyPlan::Layers(layers) => {
            println!(
                "{} layer(s), {} byte(s) per layer, {} region(s)",
                layers.layer_count(),
                layers.bytes_per_layer(),
                layers.region_count()
            );
            for (layer, regions) in layers.iter().enumerate() {
                println!("Layer {layer}:");
                for (index, region) in regions.iter().enumerate() {
                    print_region(index, region, direction, layout.bytes_per_row);
                }
            }
        }
    }

    let request = CopyRequest {
        dimension,
        texture_offset,
        copy_size,
        block,
        layout,
        placement_alignment: settings.placement_alignment,
    };
    validate_plan(&request, &plan)?;
    println!("Split is valid.");
    Ok(())
}

fn print_region(index: usize, region: &CopyRegion, direction: CopyDirection, bytes_per_row: u32) {
    let command = region.command(direction, bytes_per_row);
    let footprint = command.footprint;
    let source = command.source;
    println!(
        "  [{index}] texture ({}, {}, {}) size {}x{}x{} <- footprint @{} {}x{}x{} pitch {} at ({}, {}, {})",
        region.texture_offset.x,
        region.texture_offset.y,
        region.texture_offset.z,
        region.copy_size.width,
        region.copy_size.height,
        region.copy_size.depth_or_array_layers,
        footprint.offset,
        footprint.width,
        footprint.height,
        footprint.depth,
        footprint.row_pitch,
        region.buffer_offset.x,
        region.buffer_offset.y,
        region.buffer_offset.z,
    );
    println!(
        "      {:?}: box [{}..{}, {}..{}, {}..{}] -> ({}, {}, {})",
        command.direction,
        source.left,
        source.right,
        source.top,
        source.bottom,
        source.front,
        source.back,
        command.destination.x,
        command.destination.y,
        command.destination.z,
    );
}
