//! Invariant checks for emitted region sets.
//!
//! [`validate_copy_split`] is the oracle every splitter is tested against: given the unsplit
//! request and the emitted regions it checks that executing the regions copies exactly the
//! requested texels, each from/to the byte it would have used without splitting, and that no
//! region reads or writes past the bytes the unsplit copy needs.

use crate::align::required_bytes_in_copy;
use crate::block::BlockInfo;
use crate::geometry::{Extent3D, Origin3D, TextureDimension};
use crate::plan::TextureCopyPlan;
use crate::region::{BufferLayout, CopyRegion};
use thiserror::Error;

/// A buffer/texture copy as requested by the caller, before splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CopyRequest {
    /// Dimension of the texture.
    pub dimension: TextureDimension,
    /// Texture-side origin of the copy.
    pub texture_offset: Origin3D,
    /// Size of the copy in texels.
    pub copy_size: Extent3D,
    /// Block metadata of the texture format.
    pub block: BlockInfo,
    /// Buffer-side layout of the copy.
    pub layout: BufferLayout,
    /// Placement alignment the regions were computed for.
    pub placement_alignment: u32,
}

impl CopyRequest {
    /// The single-layer request for array layer `layer` of a layered request.
    pub fn layer(&self, layer: u32) -> CopyRequest {
        CopyRequest {
            texture_offset: Origin3D {
                z: self.texture_offset.z + layer,
                ..self.texture_offset
            },
            copy_size: Extent3D {
                depth_or_array_layers: 1,
                ..self.copy_size
            },
            layout: BufferLayout {
                offset: self.layout.offset + layer as u64 * self.layout.bytes_per_image(),
                ..self.layout
            },
            ..*self
        }
    }

    /// Minimum buffer size the unsplit copy needs.
    pub fn required_buffer_size(&self) -> u64 {
        self.layout.offset
            + required_bytes_in_copy(
                self.layout.bytes_per_row as u64,
                self.layout.rows_per_image as u64,
                self.block.blocks_wide(self.copy_size.width) as u64,
                self.block.blocks_high(self.copy_size.height) as u64,
                self.copy_size.depth_or_array_layers as u64,
                self.block.bytes_per_block as u64,
            )
    }
}

/// An invariant broken by a set of regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CopySplitViolation {
    /// No region was emitted.
    #[error("no copy region was emitted")]
    NoRegions,

    /// A region copies nothing.
    #[error("region {index} has an empty copy size")]
    EmptyRegion {
        /// Index of the region.
        index: usize,
    },

    /// The copied texels do not fit inside the region's footprint.
    #[error("region {index} does not fit inside its footprint")]
    FootprintOverflow {
        /// Index of the region.
        index: usize,
    },

    /// The footprint reaches bytes past the end of the unsplit copy.
    #[error("region {index} reads up to byte {end}, but the copy ends at byte {limit}")]
    FootprintOutOfBounds {
        /// Index of the region.
        index: usize,
        /// End of the footprint's data.
        end: u64,
        /// End of the unsplit copy's data.
        limit: u64,
    },

    /// The footprint does not advance one image per slice.
    #[error("region {index} spans several slices with a footprint height of {height} texels instead of {expected}")]
    FootprintStrideMismatch {
        /// Index of the region.
        index: usize,
        /// Height of the footprint.
        height: u32,
        /// Height of one image of the buffer layout.
        expected: u32,
    },

    /// A region offset or size does not land on a block boundary.
    #[error("region {index} is not block aligned")]
    UnalignedRegion {
        /// Index of the region.
        index: usize,
    },

    /// A footprint does not start at a placement-aligned offset.
    #[error("region {index} footprint starts at {aligned_offset}, which is not placement aligned")]
    UnalignedFootprint {
        /// Index of the region.
        index: usize,
        /// The offending footprint offset.
        aligned_offset: u64,
    },

    /// A footprint is offset on the z axis.
    #[error("region {index} has a non-zero buffer offset on z")]
    NonZeroBufferDepth {
        /// Index of the region.
        index: usize,
    },

    /// A 2D footprint has more than one block row of slack before the copy.
    #[error("region {index} starts {rows} texel rows into its footprint")]
    ExcessRowSlack {
        /// Index of the region.
        index: usize,
        /// Rows of slack before the copy.
        rows: u32,
    },

    /// A region touches texels outside the requested box.
    #[error("region {index} copies texels outside the requested copy")]
    OutsideCopy {
        /// Index of the region.
        index: usize,
    },

    /// Two regions copy the same texel.
    #[error("regions {first} and {second} overlap")]
    Overlap {
        /// Index of the first region.
        first: usize,
        /// Index of the second region.
        second: usize,
    },

    /// Regions do not add up to the requested number of texels.
    #[error("regions copy {actual} texels, expected {expected}")]
    TexelCountMismatch {
        /// Texels in the requested copy.
        expected: u64,
        /// Texels covered by the regions.
        actual: u64,
    },

    /// A region's first texel would be read from the wrong buffer byte.
    #[error("region {index} starts at the wrong buffer byte for its texture offset")]
    MisplacedBufferOffset {
        /// Index of the region.
        index: usize,
    },
}

/// Checks that `regions` is a correct split of `request`.
///
/// For 1D/2D requests with more than one array layer, the regions are treated as the output
/// of a single-subresource split with the layer count forwarded; the byte bound is skipped
/// for those, as each layer really starts its own buffer range.
///
/// # Errors
///
/// Returns the first [`CopySplitViolation`] found.
pub fn validate_copy_split(
    request: &CopyRequest,
    regions: &[CopyRegion],
) -> Result<(), CopySplitViolation> {
    if regions.is_empty() {
        return Err(CopySplitViolation::NoRegions);
    }

    let requested_end = region_end(request.texture_offset, request.copy_size);
    let check_byte_bound =
        !request.dimension.is_layered() || request.copy_size.depth_or_array_layers <= 1;
    let limit = request.required_buffer_size();

    let mut copied = 0u64;
    for (index, region) in regions.iter().enumerate() {
        validate_region(request, index, region, requested_end, check_byte_bound, limit)?;
        copied += region.copy_size.texel_count();
    }

    for (first, a) in regions.iter().enumerate() {
        for (offset, b) in regions[first + 1..].iter().enumerate() {
            if regions_intersect(a, b) {
                return Err(CopySplitViolation::Overlap {
                    first,
                    second: first + 1 + offset,
                });
            }
        }
    }

    // Disjoint regions inside the requested box with the same texel count cover it exactly.
    let expected = request.copy_size.texel_count();
    if copied != expected {
        return Err(CopySplitViolation::TexelCountMismatch {
            expected,
            actual: copied,
        });
    }

    Ok(())
}

/// Returns `true` if `regions` is a correct split of `request`.
#[inline]
pub fn is_valid_copy_split(request: &CopyRequest, regions: &[CopyRegion]) -> bool {
    validate_copy_split(request, regions).is_ok()
}

/// Checks every region of a plan against the request it was computed for.
///
/// Layered plans are checked layer by layer, each against its own single-layer request.
///
/// # Errors
///
/// Returns the first [`CopySplitViolation`] found.
pub fn validate_plan(
    request: &CopyRequest,
    plan: &TextureCopyPlan,
) -> Result<(), CopySplitViolation> {
    match plan {
        TextureCopyPlan::Volume(regions) => validate_copy_split(request, regions.as_slice()),
        TextureCopyPlan::Layers(layers) => {
            for (layer, regions) in (0..).zip(layers.iter()) {
                validate_copy_split(&request.layer(layer), regions.as_slice())?;
            }
            Ok(())
        }
    }
}

fn validate_region(
    request: &CopyRequest,
    index: usize,
    region: &CopyRegion,
    requested_end: (u64, u64, u64),
    check_byte_bound: bool,
    limit: u64,
) -> Result<(), CopySplitViolation> {
    let block = request.block;
    let layout = request.layout;

    if region.copy_size.is_empty() {
        return Err(CopySplitViolation::EmptyRegion { index });
    }

    let footprint_end = region_end(region.buffer_offset, region.copy_size);
    if footprint_end.0 > region.buffer_size.width as u64
        || footprint_end.1 > region.buffer_size.height as u64
        || footprint_end.2 > region.buffer_size.depth_or_array_layers as u64
    {
        return Err(CopySplitViolation::FootprintOverflow { index });
    }

    if !block.is_block_aligned(region.texture_offset.x, region.texture_offset.y)
        || !block.is_block_aligned(region.copy_size.width, region.copy_size.height)
        || !block.is_block_aligned(region.buffer_offset.x, region.buffer_offset.y)
        || !block.is_block_aligned(region.buffer_size.width, region.buffer_size.height)
    {
        return Err(CopySplitViolation::UnalignedRegion { index });
    }

    if region
        .aligned_offset
        .checked_rem(request.placement_alignment as u64)
        != Some(0)
    {
        return Err(CopySplitViolation::UnalignedFootprint {
            index,
            aligned_offset: region.aligned_offset,
        });
    }

    if region.buffer_offset.z != 0 {
        return Err(CopySplitViolation::NonZeroBufferDepth { index });
    }

    if request.dimension.is_layered() && region.buffer_offset.y > block.block_height {
        return Err(CopySplitViolation::ExcessRowSlack {
            index,
            rows: region.buffer_offset.y,
        });
    }

    let start = region.texture_offset;
    let end = region_end(start, region.copy_size);
    if start.x < request.texture_offset.x
        || start.y < request.texture_offset.y
        || start.z < request.texture_offset.z
        || end.0 > requested_end.0
        || end.1 > requested_end.1
        || end.2 > requested_end.2
    {
        return Err(CopySplitViolation::OutsideCopy { index });
    }

    if check_byte_bound {
        let end = region.aligned_offset
            + required_bytes_in_copy(
                layout.bytes_per_row as u64,
                block.blocks_high(region.buffer_size.height) as u64,
                block.blocks_wide(footprint_end.0 as u32) as u64,
                block.blocks_high(footprint_end.1 as u32) as u64,
                region.buffer_size.depth_or_array_layers as u64,
                block.bytes_per_block as u64,
            );
        if end > limit {
            return Err(CopySplitViolation::FootprintOutOfBounds { index, end, limit });
        }
    }

    if request.dimension == TextureDimension::D3 && region.copy_size.depth_or_array_layers > 1 {
        let expected = layout.rows_per_image * block.block_height;
        if region.buffer_size.height != expected {
            return Err(CopySplitViolation::FootprintStrideMismatch {
                index,
                height: region.buffer_size.height,
                expected,
            });
        }
    }

    validate_buffer_offset(request, index, region)
}

/// Decodes the buffer byte of the region's first texel back into a texture position.
fn validate_buffer_offset(
    request: &CopyRequest,
    index: usize,
    region: &CopyRegion,
) -> Result<(), CopySplitViolation> {
    let block = request.block;
    let layout = request.layout;
    let bytes_per_row = layout.bytes_per_row as u64;

    let first_byte = region.first_copied_byte(block, layout.bytes_per_row);
    let Some(relative) = first_byte.checked_sub(layout.offset) else {
        return Err(CopySplitViolation::MisplacedBufferOffset { index });
    };

    let bytes_per_image = layout.bytes_per_image();
    // Single-slice copies ignore rows_per_image.
    let sliced = request.dimension == TextureDimension::D3
        && request.copy_size.depth_or_array_layers > 1
        && bytes_per_image != 0;
    let (z, in_image) = if sliced {
        (relative / bytes_per_image, relative % bytes_per_image)
    } else {
        (0, relative)
    };
    if bytes_per_row == 0 {
        return Err(CopySplitViolation::MisplacedBufferOffset { index });
    }
    let y = in_image / bytes_per_row;
    let x = (in_image % bytes_per_row) / block.bytes_per_block as u64;

    let expected = (
        block.blocks_wide(region.texture_offset.x - request.texture_offset.x) as u64,
        block.blocks_high(region.texture_offset.y - request.texture_offset.y) as u64,
        (region.texture_offset.z - request.texture_offset.z) as u64,
    );
    if (x, y, z) != expected {
        return Err(CopySplitViolation::MisplacedBufferOffset { index });
    }

    Ok(())
}

/// Exclusive end of a box, widened so corrupt inputs cannot overflow.
#[inline]
fn region_end(origin: Origin3D, size: Extent3D) -> (u64, u64, u64) {
    (
        origin.x as u64 + size.width as u64,
        origin.y as u64 + size.height as u64,
        origin.z as u64 + size.depth_or_array_layers as u64,
    )
}

#[inline]
fn regions_intersect(a: &CopyRegion, b: &CopyRegion) -> bool {
    let (a_start, a_end) = (a.texture_offset, region_end(a.texture_offset, a.copy_size));
    let (b_start, b_end) = (b.texture_offset, region_end(b.texture_offset, b.copy_size));
    (a_start.x as u64) < b_end.0
        && (b_start.x as u64) < a_end.0
        && (a_start.y as u64) < b_end.1
        && (b_start.y as u64) < a_end.1
        && (a_start.z as u64) < b_end.2
        && (b_start.z as u64) < a_end.2
}

#[cfg(debug_assertions)]
pub(crate) fn debug_check_split(
    dimension: TextureDimension,
    texture_offset: Origin3D,
    copy_size: Extent3D,
    block: BlockInfo,
    layout: BufferLayout,
    placement_alignment: u32,
    regions: &[CopyRegion],
) {
    // Offsets between block boundaries are tolerated by the splitters but cannot be validated.
    if crate::safe::check_split(
        texture_offset,
        copy_size,
        block,
        layout.offset,
        layout.bytes_per_row,
        Some(layout.rows_per_image),
        placement_alignment,
    )
    .is_err()
    {
        return;
    }

    let request = CopyRequest {
        dimension,
        texture_offset,
        copy_size,
        block,
        layout,
        placement_alignment,
    };
    if let Err(violation) = validate_copy_split(&request, regions) {
        panic!("invalid copy split: {violation}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    const RGBA8: BlockInfo = BlockInfo::new(4, 1, 1);

    fn request_2d() -> CopyRequest {
        CopyRequest {
            dimension: TextureDimension::D2,
            texture_offset: Origin3D::ZERO,
            copy_size: Extent3D::new(256, 2, 1),
            block: RGBA8,
            layout: BufferLayout::new(32, 1024, 2),
            placement_alignment: PLACEMENT,
        }
    }

    fn head() -> CopyRegion {
        CopyRegion {
            texture_offset: Origin3D::ZERO,
            copy_size: Extent3D::new(248, 2, 1),
            buffer_offset: Origin3D::new(8, 0, 0),
            buffer_size: Extent3D::new(256, 2, 1),
            aligned_offset: 0,
        }
    }

    fn tail() -> CopyRegion {
        CopyRegion {
            texture_offset: Origin3D::new(248, 0, 0),
            copy_size: Extent3D::new(8, 2, 1),
            buffer_offset: Origin3D::new(0, 1, 0),
            buffer_size: Extent3D::new(8, 3, 1),
            aligned_offset: 0,
        }
    }

    #[test]
    fn accepts_correct_split() {
        assert_eq!(validate_copy_split(&request_2d(), &[head(), tail()]), Ok(()));
        assert!(is_valid_copy_split(&request_2d(), &[tail(), head()]));
    }

    #[test]
    fn rejects_empty_output() {
        assert_eq!(
            validate_copy_split(&request_2d(), &[]),
            Err(CopySplitViolation::NoRegions)
        );
    }

    #[test]
    fn rejects_missing_texels() {
        assert_eq!(
            validate_copy_split(&request_2d(), &[head()]),
            Err(CopySplitViolation::TexelCountMismatch {
                expected: 512,
                actual: 496,
            })
        );
    }

    #[test]
    fn rejects_duplicated_region() {
        assert_eq!(
            validate_copy_split(&request_2d(), &[head(), tail(), tail()]),
            Err(CopySplitViolation::Overlap {
                first: 1,
                second: 2
            })
        );
    }

    #[test]
    fn rejects_unaligned_footprint() {
        let mut region = tail();
        region.aligned_offset = 256;
        region.buffer_offset.y = 0;
        assert_eq!(
            validate_copy_split(&request_2d(), &[head(), region]),
            Err(CopySplitViolation::UnalignedFootprint {
                index: 1,
                aligned_offset: 256,
            })
        );
    }

    #[test]
    fn rejects_wrong_buffer_byte() {
        // Starts four texels before the requested buffer offset.
        let mut region = head();
        region.buffer_offset.x = 4;
        assert_eq!(
            validate_copy_split(&request_2d(), &[region, tail()]),
            Err(CopySplitViolation::MisplacedBufferOffset { index: 0 })
        );
    }

    #[test]
    fn rejects_footprint_past_the_copy() {
        // A second footprint slice lies past the end of the copy.
        let mut region = tail();
        region.buffer_size.depth_or_array_layers = 2;
        assert_eq!(
            validate_copy_split(&request_2d(), &[head(), region]),
            Err(CopySplitViolation::FootprintOutOfBounds {
                index: 1,
                end: 1024 * 3 + 1024 * 2 + 32,
                limit: 32 + 1024 + 1024,
            })
        );
    }

    #[test]
    fn rejects_region_outside_footprint() {
        let mut region = head();
        region.buffer_size.width = 255;
        assert_eq!(
            validate_copy_split(&request_2d(), &[region, tail()]),
            Err(CopySplitViolation::FootprintOverflow { index: 0 })
        );
    }

    #[test]
    fn rejects_two_rows_of_slack_in_2d() {
        let request = CopyRequest {
            copy_size: Extent3D::new(8, 2, 1),
            layout: BufferLayout::new(512 + 64 * 4, 256, 2),
            ..request_2d()
        };
        let region = CopyRegion {
            texture_offset: Origin3D::ZERO,
            copy_size: Extent3D::new(8, 2, 1),
            buffer_offset: Origin3D::new(0, 3, 0),
            buffer_size: Extent3D::new(8, 5, 1),
            aligned_offset: 0,
        };
        assert_eq!(
            validate_copy_split(&request, &[region]),
            Err(CopySplitViolation::ExcessRowSlack { index: 0, rows: 3 })
        );
    }

    #[test]
    fn checks_volume_stride() {
        let request = CopyRequest {
            dimension: TextureDimension::D3,
            texture_offset: Origin3D::ZERO,
            copy_size: Extent3D::new(16, 2, 3),
            block: RGBA8,
            layout: BufferLayout::new(0, 256, 4),
            placement_alignment: PLACEMENT,
        };
        let region = CopyRegion {
            texture_offset: Origin3D::ZERO,
            copy_size: Extent3D::new(16, 2, 3),
            buffer_offset: Origin3D::ZERO,
            buffer_size: Extent3D::new(16, 2, 3),
            aligned_offset: 0,
        };
        assert_eq!(
            validate_copy_split(&request, &[region]),
            Err(CopySplitViolation::FootprintStrideMismatch {
                index: 0,
                height: 2,
                expected: 4,
            })
        );

        let stretched = CopyRegion {
            buffer_size: Extent3D::new(16, 4, 3),
            ..region
        };
        assert_eq!(validate_copy_split(&request, &[stretched]), Ok(()));
    }

    #[test]
    fn validates_layered_plans_per_layer() {
        let request = CopyRequest {
            copy_size: Extent3D::new(256, 2, 3),
            ..request_2d()
        };
        let plan = crate::plan::plan_texture_copy(
            request.dimension,
            request.texture_offset,
            request.copy_size,
            request.block,
            request.layout,
            request.placement_alignment,
        );
        assert_eq!(validate_plan(&request, &plan), Ok(()));
    }
}
