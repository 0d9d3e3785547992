#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![no_std]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

/// Integer alignment and block/byte conversion helpers.
pub mod align;
/// Texel block metadata.
pub mod block;
/// Recorder-facing descriptors derived from copy regions.
pub mod footprint;
/// Plain geometric value types.
pub mod geometry;
/// Per-layer splitting of 2D array copies.
pub mod layers;
/// Dimension dispatch.
pub mod plan;
/// Copy region types and the fixed-capacity region set.
pub mod region;
/// Checked wrappers around the splitters.
pub mod safe;
/// Placement alignment configuration.
pub mod settings;
/// Splitting of a single 2D subresource copy.
pub mod split_2d;
/// Splitting of a 3D volume copy.
pub mod split_3d;
/// Invariant checks for emitted region sets.
pub mod validate;

/// Deterministic property matrix over copy geometries.
#[cfg(any(test, feature = "sweep"))]
pub mod sweep;

#[cfg(test)]
pub mod test_prelude;

pub use block::BlockInfo;
pub use footprint::{CopyBox, CopyDirection, PlacedFootprint, RegionCopyCommand};
pub use geometry::{Extent3D, Origin3D, TextureDimension};
pub use layers::{split_2d_array, LayerSplits};
pub use plan::{plan_texture_copy, TextureCopyPlan};
pub use region::{BufferLayout, CopyRegion, CopyRegionSet, MAX_COPY_REGIONS};
pub use safe::CopySplitValidationError;
pub use settings::{
    CopySplitSettings, D3D12_TEXTURE_DATA_PITCH_ALIGNMENT, D3D12_TEXTURE_DATA_PLACEMENT_ALIGNMENT,
};
pub use split_2d::split_2d;
pub use split_3d::split_3d;
pub use validate::{validate_copy_split, validate_plan, CopyRequest, CopySplitViolation};
