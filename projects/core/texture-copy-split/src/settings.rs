//! Placement alignment configuration.
//!
//! The raw splitters take the placement alignment as a plain parameter; [`CopySplitSettings`]
//! bundles it for the checked API in [`crate::safe`] and for tools.

/// Alignment D3D12 requires for the offset of a placed subresource footprint.
pub const D3D12_TEXTURE_DATA_PLACEMENT_ALIGNMENT: u32 = 512;

/// Alignment D3D12 requires for the row pitch of a placed subresource footprint.
pub const D3D12_TEXTURE_DATA_PITCH_ALIGNMENT: u32 = 256;

/// Settings shared by every split of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CopySplitSettings {
    /// Power of two every emitted `aligned_offset` is a multiple of.
    pub placement_alignment: u32,
}

impl CopySplitSettings {
    /// Settings matching the D3D12 copy rules.
    pub const D3D12: Self = Self {
        placement_alignment: D3D12_TEXTURE_DATA_PLACEMENT_ALIGNMENT,
    };

    /// Creates settings using the D3D12 defaults.
    pub const fn new() -> Self {
        Self::D3D12
    }

    /// Overrides the placement alignment.
    pub const fn with_placement_alignment(mut self, placement_alignment: u32) -> Self {
        self.placement_alignment = placement_alignment;
        self
    }

    /// Row pitch alignment implied by the placement alignment.
    ///
    /// Row pitches must be a multiple of this so that rows two apart are a
    /// placement-aligned distance apart.
    pub const fn row_pitch_alignment(&self) -> u32 {
        if self.placement_alignment > 1 {
            self.placement_alignment / 2
        } else {
            1
        }
    }
}

impl Default for CopySplitSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn defaults_to_d3d12() {
        let settings = CopySplitSettings::default();
        assert_eq!(settings.placement_alignment, D3D12_TEXTURE_DATA_PLACEMENT_ALIGNMENT);
        assert_eq!(settings.row_pitch_alignment(), D3D12_TEXTURE_DATA_PITCH_ALIGNMENT);
    }

    #[rstest]
    #[case(1, 1)]
    #[case(2, 1)]
    #[case(256, 128)]
    #[case(4096, 2048)]
    fn derives_row_pitch_alignment(#[case] placement: u32, #[case] pitch: u32) {
        let settings = CopySplitSettings::new().with_placement_alignment(placement);
        assert_eq!(settings.row_pitch_alignment(), pitch);
    }
}
