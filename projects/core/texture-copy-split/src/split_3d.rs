//! Splitting of 3D texture copies.
//!
//! A 3D copy is first split like a single 2D slice. The regions are then stretched over every
//! depth slice, which only works when the footprint of a region advances exactly one image
//! (`rows_per_image` block rows) per slice.
//!
//! That breaks when the 2D split placed a region one block row into its footprint (the empty
//! first row). The footprint is then one block row taller than an image and cannot be
//! stretched as-is:
//!
//! ```text
//!   |<------- bytes per row ------->|
//!   |                               |  <- empty first row
//!   |           +++++++++++++++++++|  \
//!   |+++++++++++~~~~~~~~~~~~~~~~~~~|   | slice 0
//!   |~~~~~~~~~~~+++++++++++++++++++|  /
//!   |+++++++++++                   |  <- last row of slice 0 is the first row of slice 1
//! ```
//!
//! The region is then rewritten with up to two extra regions, depending on whether the copy
//! height in block rows is odd or even.

use crate::align::align_down;
use crate::block::BlockInfo;
use crate::geometry::{Extent3D, Origin3D};
use crate::region::{CopyRegion, CopyRegionSet};
use crate::split_2d::{compute_2d_subresource, texel_offset_in_footprint, TailFootprint};

/// Computes the copy regions for a 3D texture copy.
///
/// # Parameters
///
/// - `texture_offset`: Texture-side origin of the copy (block aligned)
/// - `copy_size`: Size of the copy in texels; `depth_or_array_layers` is the number of slices
/// - `block`: Block metadata of the texture format; `bytes_per_block` is a power of two
/// - `buffer_offset`: Byte offset of the first copied block (multiple of `bytes_per_block`)
/// - `bytes_per_row`: Row pitch of the buffer; a multiple of half the placement alignment
/// - `rows_per_image`: Block rows between two slices in the buffer (at least the copy height)
/// - `placement_alignment`: Power of two every emitted footprint offset is aligned to
///
/// # Returns
///
/// Between one and [`MAX_COPY_REGIONS`](crate::region::MAX_COPY_REGIONS) regions whose union
/// is exactly the requested box.
///
/// # Remarks
///
/// Preconditions are only asserted in debug builds. See
/// [`safe::split_3d`](crate::safe::split_3d) for a checked variant.
pub fn split_3d(
    texture_offset: Origin3D,
    copy_size: Extent3D,
    block: BlockInfo,
    buffer_offset: u64,
    bytes_per_row: u32,
    rows_per_image: u32,
    placement_alignment: u32,
) -> CopyRegionSet {
    debug_assert!(matches!(
        crate::safe::check_split(
            texture_offset,
            copy_size,
            block,
            buffer_offset,
            bytes_per_row,
            Some(rows_per_image),
            placement_alignment
        ),
        Ok(()) | Err(crate::safe::CopySplitValidationError::UnalignedBufferOffset(_))
    ));

    let mut regions = compute_2d_subresource(
        texture_offset,
        copy_size,
        block,
        buffer_offset,
        bytes_per_row,
        placement_alignment,
        TailFootprint::Rebased,
    );

    if copy_size.depth_or_array_layers > 1 {
        stretch_over_slices(
            &mut regions,
            texture_offset,
            copy_size,
            block,
            bytes_per_row,
            rows_per_image,
            placement_alignment,
        );
    }

    #[cfg(debug_assertions)]
    crate::validate::debug_check_split(
        crate::geometry::TextureDimension::D3,
        texture_offset,
        copy_size,
        block,
        crate::region::BufferLayout::new(buffer_offset, bytes_per_row, rows_per_image),
        placement_alignment,
        regions.as_slice(),
    );

    regions
}

fn stretch_over_slices(
    regions: &mut CopyRegionSet,
    texture_offset: Origin3D,
    copy_size: Extent3D,
    block: BlockInfo,
    bytes_per_row: u32,
    rows_per_image: u32,
    placement_alignment: u32,
) {
    let rows_per_image_in_texels = rows_per_image * block.block_height;

    // Only the regions of the 2D split are revisited, not the ones appended below.
    let split_count = regions.len();
    for index in 0..split_count {
        let buffer_height = regions[index].buffer_size.height;
        debug_assert!(buffer_height <= rows_per_image_in_texels + block.block_height);

        if buffer_height == rows_per_image_in_texels {
            continue;
        }

        if buffer_height < rows_per_image_in_texels {
            // Partial-height copies still skip a whole image per slice.
            regions.as_mut_slice()[index].buffer_size.height = rows_per_image_in_texels;
            continue;
        }

        // Empty first row. Only reachable when the copy covers the whole image.
        debug_assert_eq!(copy_size.height, rows_per_image_in_texels);
        if block.blocks_high(copy_size.height) % 2 == 1 {
            split_first_slice(regions, index, copy_size, block, bytes_per_row);
        } else {
            split_last_rows(
                regions,
                index,
                texture_offset,
                copy_size,
                block,
                bytes_per_row,
                rows_per_image,
                placement_alignment,
            );
        }
    }
}

/// Odd copy height: the region keeps the first slice only.
///
/// The next slice starts `height + 1` block rows past the footprint, an even number of rows
/// and thus placement aligned, so the remaining slices form a region without empty first row.
fn split_first_slice(
    regions: &mut CopyRegionSet,
    index: usize,
    copy_size: Extent3D,
    block: BlockInfo,
    bytes_per_row: u32,
) {
    let first = &mut regions.as_mut_slice()[index];
    first.copy_size.depth_or_array_layers = 1;
    first.buffer_size.depth_or_array_layers = 1;

    let mut rest = *first;
    rest.aligned_offset +=
        (block.blocks_high(copy_size.height) as u64 + 1) * bytes_per_row as u64;
    rest.texture_offset.z += 1;
    rest.copy_size.depth_or_array_layers = copy_size.depth_or_array_layers - 1;
    rest.buffer_offset.y = 0;
    rest.buffer_size.height = copy_size.height;
    rest.buffer_size.depth_or_array_layers = copy_size.depth_or_array_layers - 1;
    regions.push(rest);
}

/// Even copy height: the last block row of each slice is copied separately.
///
/// ```text
///   region  : rows 0..h-1 of every slice, footprint height = one image
///   region+1: last row of slices 0..d-1, footprint moved two rows down (still aligned)
///   region+2: last row of the last slice, on its own footprint
/// ```
#[allow(clippy::too_many_arguments)]
fn split_last_rows(
    regions: &mut CopyRegionSet,
    index: usize,
    texture_offset: Origin3D,
    copy_size: Extent3D,
    block: BlockInfo,
    bytes_per_row: u32,
    rows_per_image: u32,
    placement_alignment: u32,
) {
    let rows_per_image_in_texels = rows_per_image * block.block_height;
    let last_row_y = copy_size.height - block.block_height;

    let head = &mut regions.as_mut_slice()[index];
    head.copy_size.height = last_row_y;
    head.buffer_size.height = rows_per_image_in_texels;
    let head = *head;

    // Moving the footprint down 2 rows: one for the empty first row, one for the last row
    // of the slice itself.
    let mut last_rows = head;
    last_rows.aligned_offset += 2 * bytes_per_row as u64;
    last_rows.texture_offset.y += last_row_y;
    last_rows.buffer_offset.y = copy_size.height - 2 * block.block_height;
    last_rows.copy_size.height = block.block_height;
    last_rows.copy_size.depth_or_array_layers -= 1;
    last_rows.buffer_size.depth_or_array_layers -= 1;

    let last_row_of_last_slice = head.first_copied_byte(block, bytes_per_row)
        + bytes_per_row as u64
            * (block.blocks_high(last_row_y) as u64
                + rows_per_image as u64 * (copy_size.depth_or_array_layers as u64 - 1));
    let aligned_offset = align_down(last_row_of_last_slice, placement_alignment as u64);
    let texel_offset =
        texel_offset_in_footprint(block, last_row_of_last_slice - aligned_offset, bytes_per_row);

    let final_row = CopyRegion {
        texture_offset: Origin3D {
            z: texture_offset.z + copy_size.depth_or_array_layers - 1,
            ..last_rows.texture_offset
        },
        copy_size: Extent3D {
            depth_or_array_layers: 1,
            ..last_rows.copy_size
        },
        buffer_offset: texel_offset,
        buffer_size: Extent3D {
            width: texel_offset.x + last_rows.copy_size.width,
            height: texel_offset.y + block.block_height,
            depth_or_array_layers: 1,
        },
        aligned_offset,
    };

    regions.push(last_rows);
    regions.push(final_row);
}
