//! Dispatch of a copy to the splitter matching the texture dimension.

use crate::block::BlockInfo;
use crate::geometry::{Extent3D, Origin3D, TextureDimension};
use crate::layers::{split_2d_array, LayerSplits};
use crate::region::{BufferLayout, CopyRegion, CopyRegionSet};
use crate::split_3d::split_3d;

/// All regions needed to execute one texture copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureCopyPlan {
    /// A 3D copy; the regions span every depth slice.
    Volume(CopyRegionSet),
    /// A 1D/2D copy; one split per array layer.
    Layers(LayerSplits),
}

impl TextureCopyPlan {
    /// Iterates over every region of the plan.
    ///
    /// For layered plans, the regions of layer 0 come first.
    pub fn regions(&self) -> impl Iterator<Item = CopyRegion> + '_ {
        let (volume, layers) = match self {
            TextureCopyPlan::Volume(regions) => (Some(*regions), None),
            TextureCopyPlan::Layers(layers) => (None, Some(layers.iter().flatten())),
        };
        volume.into_iter().flatten().chain(layers.into_iter().flatten())
    }

    /// Total number of regions.
    pub fn region_count(&self) -> usize {
        match self {
            TextureCopyPlan::Volume(regions) => regions.len(),
            TextureCopyPlan::Layers(layers) => layers.region_count(),
        }
    }
}

/// Splits a copy between a texture of the given dimension and a linear buffer.
///
/// 1D and 2D copies are split per array layer with [`split_2d_array`]; 3D copies with
/// [`split_3d`].
///
/// # Parameters
///
/// - `dimension`: Dimension of the texture
/// - `texture_offset`: Texture-side origin of the copy
/// - `copy_size`: Size of the copy in texels
/// - `block`: Block metadata of the texture format
/// - `layout`: Buffer-side layout of the copy
/// - `placement_alignment`: Power of two every emitted footprint offset is aligned to
///
/// # Remarks
///
/// Preconditions are only asserted in debug builds. See
/// [`safe::plan_texture_copy`](crate::safe::plan_texture_copy) for a checked variant.
pub fn plan_texture_copy(
    dimension: TextureDimension,
    texture_offset: Origin3D,
    copy_size: Extent3D,
    block: BlockInfo,
    layout: BufferLayout,
    placement_alignment: u32,
) -> TextureCopyPlan {
    match dimension {
        TextureDimension::D1 | TextureDimension::D2 => TextureCopyPlan::Layers(split_2d_array(
            texture_offset,
            copy_size,
            block,
            layout.offset,
            layout.bytes_per_row,
            layout.rows_per_image,
            placement_alignment,
        )),
        TextureDimension::D3 => TextureCopyPlan::Volume(split_3d(
            texture_offset,
            copy_size,
            block,
            layout.offset,
            layout.bytes_per_row,
            layout.rows_per_image,
            placement_alignment,
        )),
    }
}
