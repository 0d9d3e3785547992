//! Common imports and helpers for tests.

pub use crate::block::BlockInfo;
pub use crate::geometry::{Extent3D, Origin3D, TextureDimension};
pub use crate::region::{BufferLayout, CopyRegion, CopyRegionSet};
pub use crate::validate::{validate_copy_split, CopyRequest};
pub use rstest::rstest;

/// Placement alignment used by most tests.
pub const PLACEMENT: u32 = 512;

/// Asserts that `regions` is a correct split of `request`, printing the regions on failure.
#[track_caller]
pub fn assert_valid_split(request: &CopyRequest, regions: &[CopyRegion]) {
    if let Err(violation) = validate_copy_split(request, regions) {
        panic!("{violation}\nrequest: {request:#?}\nregions: {regions:#?}");
    }
}
