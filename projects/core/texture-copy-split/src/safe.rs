//! Checked wrappers around the splitters.
//!
//! The functions in [`crate::split_2d`], [`crate::split_3d`], [`crate::layers`] and
//! [`crate::plan`] trust their caller and only assert their preconditions in debug builds.
//! The functions here validate every input first and report the first problem found as a
//! [`CopySplitValidationError`].

use crate::align::is_power_of_two;
use crate::block::BlockInfo;
use crate::geometry::{Extent3D, Origin3D, TextureDimension};
use crate::layers::LayerSplits;
use crate::plan::TextureCopyPlan;
use crate::region::{BufferLayout, CopyRegionSet};
use crate::settings::CopySplitSettings;
use thiserror::Error;

/// Validation errors for copy split operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CopySplitValidationError {
    /// The copy size has a zero component.
    #[error("Copy size has a zero component: {0:?}")]
    ZeroSizedCopy(Extent3D),

    /// The block metadata has a zero component.
    #[error("Invalid block info: {0:?}")]
    InvalidBlockInfo(BlockInfo),

    /// The bytes per block is not a power of two.
    #[error("Bytes per block {0} is not a power of two")]
    NonPowerOfTwoBytesPerBlock(u32),

    /// The placement alignment is not a power of two.
    #[error("Invalid placement alignment: {0} (must be a power of two)")]
    InvalidPlacementAlignment(u32),

    /// The texture offset does not land on a block boundary.
    #[error("Texture offset ({x}, {y}) is not aligned to the block size")]
    UnalignedTextureOffset {
        /// Texel column of the offset.
        x: u32,
        /// Texel row of the offset.
        y: u32,
    },

    /// The copy size is not a whole number of blocks.
    #[error("Copy size {width}x{height} is not a multiple of the block size")]
    UnalignedCopySize {
        /// Width of the copy.
        width: u32,
        /// Height of the copy.
        height: u32,
    },

    /// The buffer offset is not a multiple of the block size in bytes.
    #[error("Buffer offset {0} is not a multiple of the bytes per block")]
    UnalignedBufferOffset(u64),

    /// The row pitch is not a multiple of the block size in bytes.
    #[error("Bytes per row {0} is not a multiple of the bytes per block")]
    UnalignedBytesPerRow(u32),

    /// The row pitch cannot hold one row of the copy.
    #[error("Bytes per row too small: needed {needed}, got {actual}")]
    BytesPerRowTooSmall {
        /// Bytes in one block row of the copy.
        needed: u64,
        /// The row pitch provided.
        actual: u32,
    },

    /// The row pitch is not a multiple of half the placement alignment.
    #[error("Bytes per row {bytes_per_row} is not a multiple of the row pitch alignment {alignment}")]
    BytesPerRowNotPitchAligned {
        /// The row pitch provided.
        bytes_per_row: u32,
        /// The required row pitch alignment.
        alignment: u32,
    },

    /// Images are shorter than the copy.
    #[error("Rows per image too small: needed {needed}, got {actual}")]
    RowsPerImageTooSmall {
        /// Block rows in the copy.
        needed: u32,
        /// The rows per image provided.
        actual: u32,
    },

    /// A texel coordinate or byte offset of the copy does not fit its integer type.
    #[error("Copy coordinates overflow")]
    CoordinateOverflow,
}

/// Computes the copy regions for one 2D subresource.
///
/// See [`crate::split_2d::split_2d`] for the details of the split.
///
/// # Parameters
///
/// - `texture_offset`: Texture-side origin of the copy
/// - `copy_size`: Size of the copy in texels
/// - `block`: Block metadata of the texture format
/// - `buffer_offset`: Byte offset of the first copied block
/// - `bytes_per_row`: Row pitch of the buffer
/// - `settings`: Placement alignment to split for
///
/// # Errors
///
/// The first [`CopySplitValidationError`] found in the inputs.
///
/// # Examples
///
/// ```
/// use texture_copy_split::safe;
/// use texture_copy_split::{BlockInfo, CopySplitSettings, Extent3D, Origin3D};
/// # use texture_copy_split::CopySplitValidationError;
///
/// # fn main() -> Result<(), CopySplitValidationError> {
/// let regions = safe::split_2d(
///     Origin3D::ZERO,
///     Extent3D::new(256, 2, 1),
///     BlockInfo::uncompressed(4),
///     32,
///     1024,
///     CopySplitSettings::default(),
/// )?;
/// assert_eq!(regions.len(), 2);
/// # Ok(())
/// # }
/// ```
pub fn split_2d(
    texture_offset: Origin3D,
    copy_size: Extent3D,
    block: BlockInfo,
    buffer_offset: u64,
    bytes_per_row: u32,
    settings: CopySplitSettings,
) -> Result<CopyRegionSet, CopySplitValidationError> {
    check_split(
        texture_offset,
        copy_size,
        block,
        buffer_offset,
        bytes_per_row,
        None,
        settings.placement_alignment,
    )?;

    Ok(crate::split_2d::split_2d(
        texture_offset,
        copy_size,
        block,
        buffer_offset,
        bytes_per_row,
        settings.placement_alignment,
    ))
}

/// Computes the copy regions for a 3D texture copy.
///
/// See [`crate::split_3d::split_3d`] for the details of the split.
///
/// # Errors
///
/// The first [`CopySplitValidationError`] found in the inputs.
pub fn split_3d(
    texture_offset: Origin3D,
    copy_size: Extent3D,
    block: BlockInfo,
    buffer_offset: u64,
    bytes_per_row: u32,
    rows_per_image: u32,
    settings: CopySplitSettings,
) -> Result<CopyRegionSet, CopySplitValidationError> {
    check_split(
        texture_offset,
        copy_size,
        block,
        buffer_offset,
        bytes_per_row,
        Some(rows_per_image),
        settings.placement_alignment,
    )?;

    Ok(crate::split_3d::split_3d(
        texture_offset,
        copy_size,
        block,
        buffer_offset,
        bytes_per_row,
        rows_per_image,
        settings.placement_alignment,
    ))
}

/// Computes the per-layer copy regions of a 1D/2D array copy.
///
/// # Errors
///
/// The first [`CopySplitValidationError`] found in the inputs.
pub fn split_2d_array(
    texture_offset: Origin3D,
    copy_size: Extent3D,
    block: BlockInfo,
    buffer_offset: u64,
    bytes_per_row: u32,
    rows_per_image: u32,
    settings: CopySplitSettings,
) -> Result<LayerSplits, CopySplitValidationError> {
    check_split(
        texture_offset,
        copy_size,
        block,
        buffer_offset,
        bytes_per_row,
        Some(rows_per_image),
        settings.placement_alignment,
    )?;

    Ok(crate::layers::split_2d_array(
        texture_offset,
        copy_size,
        block,
        buffer_offset,
        bytes_per_row,
        rows_per_image,
        settings.placement_alignment,
    ))
}

/// Splits a copy between a texture of the given dimension and a linear buffer.
///
/// # Errors
///
/// The first [`CopySplitValidationError`] found in the inputs.
pub fn plan_texture_copy(
    dimension: TextureDimension,
    texture_offset: Origin3D,
    copy_size: Extent3D,
    block: BlockInfo,
    layout: BufferLayout,
    settings: CopySplitSettings,
) -> Result<TextureCopyPlan, CopySplitValidationError> {
    check_split(
        texture_offset,
        copy_size,
        block,
        layout.offset,
        layout.bytes_per_row,
        Some(layout.rows_per_image),
        settings.placement_alignment,
    )?;

    Ok(crate::plan::plan_texture_copy(
        dimension,
        texture_offset,
        copy_size,
        block,
        layout,
        settings.placement_alignment,
    ))
}

/// Checks the preconditions shared by every splitter.
///
/// `rows_per_image` is only checked when given and the copy spans more than one image.
pub(crate) fn check_split(
    texture_offset: Origin3D,
    copy_size: Extent3D,
    block: BlockInfo,
    buffer_offset: u64,
    bytes_per_row: u32,
    rows_per_image: Option<u32>,
    placement_alignment: u32,
) -> Result<(), CopySplitValidationError> {
    if !block.is_valid() {
        return Err(CopySplitValidationError::InvalidBlockInfo(block));
    }

    // Footprints start on placement boundaries, which only land on block boundaries when
    // the block size divides the placement alignment or is a multiple of it.
    if !is_power_of_two(block.bytes_per_block as u64) {
        return Err(CopySplitValidationError::NonPowerOfTwoBytesPerBlock(
            block.bytes_per_block,
        ));
    }

    if !is_power_of_two(placement_alignment as u64) {
        return Err(CopySplitValidationError::InvalidPlacementAlignment(
            placement_alignment,
        ));
    }

    if copy_size.is_empty() {
        return Err(CopySplitValidationError::ZeroSizedCopy(copy_size));
    }

    if !block.is_block_aligned(texture_offset.x, texture_offset.y) {
        return Err(CopySplitValidationError::UnalignedTextureOffset {
            x: texture_offset.x,
            y: texture_offset.y,
        });
    }

    if !block.is_block_aligned(copy_size.width, copy_size.height) {
        return Err(CopySplitValidationError::UnalignedCopySize {
            width: copy_size.width,
            height: copy_size.height,
        });
    }

    let bytes_per_block = block.bytes_per_block;
    if buffer_offset % bytes_per_block as u64 != 0 {
        return Err(CopySplitValidationError::UnalignedBufferOffset(buffer_offset));
    }

    if bytes_per_row % bytes_per_block != 0 {
        return Err(CopySplitValidationError::UnalignedBytesPerRow(bytes_per_row));
    }

    let row_bytes = block.row_bytes(copy_size.width);
    if (bytes_per_row as u64) < row_bytes {
        return Err(CopySplitValidationError::BytesPerRowTooSmall {
            needed: row_bytes,
            actual: bytes_per_row,
        });
    }

    if (2 * bytes_per_row as u64) % placement_alignment as u64 != 0 {
        return Err(CopySplitValidationError::BytesPerRowNotPitchAligned {
            bytes_per_row,
            alignment: CopySplitSettings::new()
                .with_placement_alignment(placement_alignment)
                .row_pitch_alignment(),
        });
    }

    let height_in_blocks = block.blocks_high(copy_size.height);
    let rows_per_image = match rows_per_image {
        Some(rows) if copy_size.depth_or_array_layers > 1 => {
            if rows < height_in_blocks {
                return Err(CopySplitValidationError::RowsPerImageTooSmall {
                    needed: height_in_blocks,
                    actual: rows,
                });
            }
            rows
        }
        _ => height_in_blocks,
    };

    check_coordinates(
        texture_offset,
        copy_size,
        block,
        buffer_offset,
        bytes_per_row,
        rows_per_image,
    )
    .ok_or(CopySplitValidationError::CoordinateOverflow)
}

/// Checks that every intermediate value a split computes fits its integer type.
fn check_coordinates(
    texture_offset: Origin3D,
    copy_size: Extent3D,
    block: BlockInfo,
    buffer_offset: u64,
    bytes_per_row: u32,
    rows_per_image: u32,
) -> Option<()> {
    texture_offset.x.checked_add(copy_size.width)?;
    texture_offset.y.checked_add(copy_size.height)?;
    texture_offset.z.checked_add(copy_size.depth_or_array_layers)?;

    // Footprints may start up to one block row above, and span one row pitch across.
    copy_size.height.checked_add(block.block_height)?;
    rows_per_image
        .checked_mul(block.block_height)?
        .checked_add(block.block_height)?;
    (bytes_per_row / block.bytes_per_block).checked_mul(block.block_width)?;

    // The buffer range of the whole copy, plus one image of slack.
    let bytes_per_image = (bytes_per_row as u64).checked_mul(rows_per_image as u64)?;
    bytes_per_image
        .checked_mul(copy_size.depth_or_array_layers as u64 + 1)?
        .checked_add(buffer_offset)?;
    Some(())
}
