//! Splitting of a single 2D subresource copy.
//!
//! Native copies describe the buffer side with a footprint (row pitch, width, height) that
//! must start at a placement-aligned offset. When the requested buffer offset is not aligned,
//! the footprint is started at the preceding aligned address and the copy is placed inside it
//! with a texel offset:
//!
//! ```text
//! |-----------------------++++++++++++++++++++++++++++++++|
//! ^ aligned address       ^ requested offset             ^ end of copy data
//!
//! Seen with the row pitch, the texel offset is:
//! |YYYYYYYYYYYYYYYY|
//! |XXXXXX++++++++++|
//! |++++++++++++++++|
//! |++++++~~~~~~~~~~|
//! |<---row pitch-->|
//! ```
//!
//! If `X + width` still fits in the row pitch this is a single region. Otherwise the rows of
//! the copy wrap around the row pitch and the copy is cut where they wrap: the head covers
//! the columns up to the end of the pitch, the tail covers the wrapped columns.

use crate::align::align_down;
use crate::block::BlockInfo;
use crate::geometry::{Extent3D, Origin3D};
use crate::region::{CopyRegion, CopyRegionSet};

/// Where the region for the wrapped columns of a 2D split places its footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TailFootprint {
    /// Reuse the head's footprint start while the tail stays within one block row of slack.
    Shared,
    /// Always start a fresh footprint at the aligned address preceding the tail.
    Rebased,
}

/// Computes the copy regions for one 2D subresource.
///
/// The buffer offset does not need to be placement aligned; the regions are described
/// against footprints that are.
///
/// `copy_size.depth_or_array_layers` is forwarded unchanged to every region. For array
/// copies with more than one layer this is **not** a valid multi-layer split: every layer
/// begins its own buffer range and must be split on its own. Use
/// [`split_2d_array`](crate::layers::split_2d_array) for those.
///
/// # Parameters
///
/// - `texture_offset`: Texture-side origin of the copy (block aligned)
/// - `copy_size`: Size of the copy in texels (block aligned, non-zero)
/// - `block`: Block metadata of the texture format; `bytes_per_block` is a power of two
/// - `buffer_offset`: Byte offset of the first copied block. An offset between two block
///   boundaries is placed at the block containing it.
/// - `bytes_per_row`: Row pitch of the buffer; a multiple of half the placement alignment
/// - `placement_alignment`: Power of two every emitted footprint offset is aligned to
///
/// # Returns
///
/// One or two regions whose union is exactly the requested rectangle.
///
/// # Remarks
///
/// Preconditions are only asserted in debug builds. See
/// [`safe::split_2d`](crate::safe::split_2d) for a checked variant.
pub fn split_2d(
    texture_offset: Origin3D,
    copy_size: Extent3D,
    block: BlockInfo,
    buffer_offset: u64,
    bytes_per_row: u32,
    placement_alignment: u32,
) -> CopyRegionSet {
    debug_assert!(matches!(
        crate::safe::check_split(
            texture_offset,
            copy_size,
            block,
            buffer_offset,
            bytes_per_row,
            None,
            placement_alignment
        ),
        Ok(()) | Err(crate::safe::CopySplitValidationError::UnalignedBufferOffset(_))
    ));

    let regions = compute_2d_subresource(
        texture_offset,
        copy_size,
        block,
        buffer_offset,
        bytes_per_row,
        placement_alignment,
        TailFootprint::Shared,
    );

    #[cfg(debug_assertions)]
    crate::validate::debug_check_split(
        crate::geometry::TextureDimension::D2,
        texture_offset,
        copy_size,
        block,
        crate::region::BufferLayout::new(
            buffer_offset,
            bytes_per_row,
            block.blocks_high(copy_size.height),
        ),
        placement_alignment,
        regions.as_slice(),
    );

    regions
}

/// Texel position of `byte_offset` inside a footprint with the given row pitch.
///
/// # Parameters
///
/// - `block`: Block metadata of the texture format
/// - `byte_offset`: Distance in bytes from the start of the footprint
/// - `bytes_per_row`: Row pitch of the footprint
#[inline]
pub(crate) fn texel_offset_in_footprint(
    block: BlockInfo,
    byte_offset: u64,
    bytes_per_row: u32,
) -> Origin3D {
    debug_assert!(bytes_per_row != 0);
    let bytes_per_row = bytes_per_row as u64;
    let byte_offset_x = byte_offset % bytes_per_row;
    let byte_offset_y = byte_offset - byte_offset_x;

    Origin3D {
        x: (byte_offset_x / block.bytes_per_block as u64) as u32 * block.block_width,
        y: (byte_offset_y / bytes_per_row) as u32 * block.block_height,
        z: 0,
    }
}

pub(crate) fn compute_2d_subresource(
    texture_offset: Origin3D,
    copy_size: Extent3D,
    block: BlockInfo,
    buffer_offset: u64,
    bytes_per_row: u32,
    placement_alignment: u32,
    tail_footprint: TailFootprint,
) -> CopyRegionSet {
    let mut regions = CopyRegionSet::new();
    let alignment = placement_alignment as u64;
    let aligned_offset = align_down(buffer_offset, alignment);

    // Already aligned, copy as-is.
    if buffer_offset == aligned_offset {
        regions.push(CopyRegion {
            texture_offset,
            copy_size,
            buffer_offset: Origin3D::ZERO,
            buffer_size: copy_size,
            aligned_offset,
        });
        return regions;
    }

    let texel_offset =
        texel_offset_in_footprint(block, buffer_offset - aligned_offset, bytes_per_row);
    debug_assert!(texel_offset.y <= block.block_height);

    let copy_bytes_per_row = block.row_bytes(copy_size.width);
    let byte_offset_in_row = block.row_bytes(texel_offset.x);
    if copy_bytes_per_row + byte_offset_in_row <= bytes_per_row as u64 {
        // Rows fit inside the row pitch: widen the footprint and place the copy inside it.
        //  |<------------- bytes per row ------------->|
        //  |                 +++++++++++++++++~~~~~~~~~|
        //  |~~~~~~~~~~~~~~~~~+++++++++++++++++~~~~~~~~~|
        //  |~~~~~~~~~~~~~~~~~+++++++++++++++++         |
        regions.push(CopyRegion {
            texture_offset,
            copy_size,
            buffer_offset: texel_offset,
            buffer_size: Extent3D {
                width: copy_size.width + texel_offset.x,
                height: copy_size.height + texel_offset.y,
                depth_or_array_layers: copy_size.depth_or_array_layers,
            },
            aligned_offset,
        });
        return regions;
    }

    // Rows straddle the row pitch. Head takes the columns up to the end of the pitch,
    // tail the columns that wrapped onto the next row.
    //  |<------------- bytes per row ------------->|
    //  |                                   HHHHHHHH|
    //  |TTTTTTTTT~~~~~~~~~~~~~~~~~~~~~~~~~~HHHHHHHH|
    //  |TTTTTTTTT~~~~~~~~~~~~~~~~~~~~~~~~~~HHHHHHHH|
    //  |TTTTTTTTT                                  |
    let texels_per_row = bytes_per_row / block.bytes_per_block * block.block_width;
    debug_assert!(texels_per_row > texel_offset.x);
    let head_width = texels_per_row - texel_offset.x;
    debug_assert!(copy_size.width > head_width);
    let tail_width = copy_size.width - head_width;

    regions.push(CopyRegion {
        texture_offset,
        copy_size: Extent3D {
            width: head_width,
            ..copy_size
        },
        buffer_offset: texel_offset,
        buffer_size: Extent3D {
            width: texels_per_row,
            height: copy_size.height + texel_offset.y,
            depth_or_array_layers: copy_size.depth_or_array_layers,
        },
        aligned_offset,
    });

    let tail_offset = buffer_offset + block.row_bytes(head_width);
    let (tail_aligned_offset, tail_texel_offset) =
        place_tail(block, tail_offset, aligned_offset, bytes_per_row, alignment, tail_footprint);
    debug_assert!(tail_texel_offset.y <= block.block_height);

    regions.push(CopyRegion {
        texture_offset: Origin3D {
            x: texture_offset.x + head_width,
            ..texture_offset
        },
        copy_size: Extent3D {
            width: tail_width,
            ..copy_size
        },
        buffer_offset: tail_texel_offset,
        buffer_size: Extent3D {
            width: tail_texel_offset.x + tail_width,
            height: copy_size.height + tail_texel_offset.y,
            depth_or_array_layers: copy_size.depth_or_array_layers,
        },
        aligned_offset: tail_aligned_offset,
    });

    regions
}

/// Picks the footprint start and in-footprint texel offset for the wrapped tail columns.
fn place_tail(
    block: BlockInfo,
    tail_offset: u64,
    head_aligned_offset: u64,
    bytes_per_row: u32,
    alignment: u64,
    tail_footprint: TailFootprint,
) -> (u64, Origin3D) {
    if tail_footprint == TailFootprint::Shared {
        let shared =
            texel_offset_in_footprint(block, tail_offset - head_aligned_offset, bytes_per_row);
        if shared.y <= block.block_height {
            return (head_aligned_offset, shared);
        }
    }

    let aligned_offset = align_down(tail_offset, alignment);
    (
        aligned_offset,
        texel_offset_in_footprint(block, tail_offset - aligned_offset, bytes_per_row),
    )
}
