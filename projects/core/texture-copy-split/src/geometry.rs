//! Geometric value types shared by every splitter.
//!
//! All values are in texels and are passed around by value.

use derive_enum_all_values::AllValues;

/// A point in a texture (or in a buffer footprint), in texels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Origin3D {
    /// Texel column.
    pub x: u32,
    /// Texel row.
    pub y: u32,
    /// Depth slice (3D) or array layer (2D arrays).
    pub z: u32,
}

impl Origin3D {
    /// The origin at `(0, 0, 0)`.
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    /// Creates a new origin.
    #[inline]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
}

/// The size of a texture region (or of a buffer footprint), in texels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent3D {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Depth in slices (3D) or number of array layers (2D arrays).
    pub depth_or_array_layers: u32,
}

impl Extent3D {
    /// Creates a new extent.
    #[inline]
    pub const fn new(width: u32, height: u32, depth_or_array_layers: u32) -> Self {
        Self {
            width,
            height,
            depth_or_array_layers,
        }
    }

    /// Returns `true` if any of the components is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.depth_or_array_layers == 0
    }

    /// Number of texels covered by this extent.
    #[inline]
    pub const fn texel_count(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.depth_or_array_layers as u64
    }
}

/// Dimensionality of the texture taking part in a copy.
///
/// 1D and 2D textures are split layer by layer, 3D textures as one volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum TextureDimension {
    /// One dimensional texture.
    D1,
    /// Two dimensional texture, optionally with array layers.
    D2,
    /// Three dimensional (volume) texture.
    D3,
}

impl TextureDimension {
    /// Returns `true` for the dimensions whose `z` axis addresses array layers.
    #[inline]
    pub const fn is_layered(self) -> bool {
        matches!(self, TextureDimension::D1 | TextureDimension::D2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(Extent3D::new(4, 4, 1), false, 16)]
    #[case(Extent3D::new(0, 4, 1), true, 0)]
    #[case(Extent3D::new(4, 0, 1), true, 0)]
    #[case(Extent3D::new(4, 4, 0), true, 0)]
    #[case(Extent3D::new(1024, 1024, 1024), false, 1 << 30)]
    fn extent_counts_texels(#[case] extent: Extent3D, #[case] empty: bool, #[case] texels: u64) {
        assert_eq!(extent.is_empty(), empty);
        assert_eq!(extent.texel_count(), texels);
    }

    #[test]
    fn only_volumes_are_not_layered() {
        for &dimension in TextureDimension::all_values() {
            assert_eq!(dimension.is_layered(), dimension != TextureDimension::D3);
        }
    }
}
