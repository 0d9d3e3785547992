//! Splitting of 1D/2D copies spanning multiple array layers.
//!
//! Every array layer is its own subresource, so its data starts its own buffer range
//! `bytes_per_row * rows_per_image` bytes after the previous one. Layers are split one by one,
//! but only two distinct splits ever exist: when the layer stride is placement aligned every
//! layer splits like layer 0, otherwise layers alternate between the split of layer 0 and the
//! split of layer 1 (the stride is a multiple of half the placement alignment).

use crate::block::BlockInfo;
use crate::geometry::{Extent3D, Origin3D};
use crate::region::CopyRegionSet;
use crate::split_2d::{compute_2d_subresource, TailFootprint};

/// Per-layer splits of a 1D/2D array copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerSplits {
    subresources: [CopyRegionSet; 2],
    texture_z: u32,
    layer_count: u32,
    bytes_per_layer: u64,
}

impl LayerSplits {
    /// Number of array layers covered.
    #[inline]
    pub const fn layer_count(&self) -> u32 {
        self.layer_count
    }

    /// Byte stride between two layers in the buffer.
    #[inline]
    pub const fn bytes_per_layer(&self) -> u64 {
        self.bytes_per_layer
    }

    /// Regions copying array layer `layer`, counted from the first copied layer.
    ///
    /// # Panics
    ///
    /// If `layer >= self.layer_count()`.
    pub fn layer(&self, layer: u32) -> CopyRegionSet {
        assert!(layer < self.layer_count, "array layer out of range");

        let parity = layer % 2;
        let base_offset = (layer - parity) as u64 * self.bytes_per_layer;
        let mut regions = self.subresources[parity as usize];
        for region in regions.as_mut_slice() {
            region.aligned_offset += base_offset;
            region.texture_offset.z = self.texture_z + layer;
        }
        regions
    }

    /// Iterates over the regions of every layer, in layer order.
    pub fn iter(&self) -> impl Iterator<Item = CopyRegionSet> + '_ {
        (0..self.layer_count).map(move |layer| self.layer(layer))
    }

    /// Total number of regions over every layer.
    pub fn region_count(&self) -> usize {
        let even = self.layer_count.div_ceil(2) as usize;
        let odd = (self.layer_count / 2) as usize;
        even * self.subresources[0].len() + odd * self.subresources[1].len()
    }
}

/// Computes the copy regions of a 1D/2D copy over `copy_size.depth_or_array_layers` layers.
///
/// # Parameters
///
/// - `texture_offset`: Texture-side origin; `z` is the first array layer
/// - `copy_size`: Size of the copy; `depth_or_array_layers` is the number of layers
/// - `block`: Block metadata of the texture format; `bytes_per_block` is a power of two
/// - `buffer_offset`: Byte offset of the first copied block of layer 0
/// - `bytes_per_row`: Row pitch of the buffer; a multiple of half the placement alignment
/// - `rows_per_image`: Block rows between two layers in the buffer (at least the copy height)
/// - `placement_alignment`: Power of two every emitted footprint offset is aligned to
///
/// # Remarks
///
/// Preconditions are only asserted in debug builds. See
/// [`safe::split_2d_array`](crate::safe::split_2d_array) for a checked variant.
pub fn split_2d_array(
    texture_offset: Origin3D,
    copy_size: Extent3D,
    block: BlockInfo,
    buffer_offset: u64,
    bytes_per_row: u32,
    rows_per_image: u32,
    placement_alignment: u32,
) -> LayerSplits {
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

    let bytes_per_layer = bytes_per_row as u64 * rows_per_image as u64;
    let layer_size = Extent3D {
        depth_or_array_layers: 1,
        ..copy_size
    };
    let layer_origin = Origin3D {
        z: 0,
        ..texture_offset
    };

    let first = compute_2d_subresource(
        layer_origin,
        layer_size,
        block,
        buffer_offset,
        bytes_per_row,
        placement_alignment,
        TailFootprint::Shared,
    );

    let second = if copy_size.depth_or_array_layers <= 1 {
        CopyRegionSet::new()
    } else if bytes_per_layer % placement_alignment as u64 == 0 {
        let mut second = first;
        for region in second.as_mut_slice() {
            region.aligned_offset += bytes_per_layer;
        }
        second
    } else {
        compute_2d_subresource(
            layer_origin,
            layer_size,
            block,
            buffer_offset + bytes_per_layer,
            bytes_per_row,
            placement_alignment,
            TailFootprint::Shared,
        )
    };

    LayerSplits {
        subresources: [first, second],
        texture_z: texture_offset.z,
        layer_count: copy_size.depth_or_array_layers,
        bytes_per_layer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    const RGBA8: BlockInfo = BlockInfo::new(4, 1, 1);

    fn assert_layers_valid(
        splits: &LayerSplits,
        texture_offset: Origin3D,
        copy_size: Extent3D,
        block: BlockInfo,
        layout: BufferLayout,
    ) {
        for (layer, regions) in splits.iter().enumerate() {
            let request = CopyRequest {
                dimension: TextureDimension::D2,
                texture_offset: Origin3D {
                    z: texture_offset.z + layer as u32,
                    ..texture_offset
                },
                copy_size: Extent3D {
                    depth_or_array_layers: 1,
                    ..copy_size
                },
                block,
                layout: BufferLayout {
                    offset: layout.offset + layer as u64 * layout.bytes_per_image(),
                    ..layout
                },
                placement_alignment: PLACEMENT,
            };
            assert_valid_split(&request, regions.as_slice());
        }
    }

    #[rstest]
    #[case(0, 256, 2, 5)]
    #[case(0, 256, 3, 5)]
    #[case(32, 1024, 2, 4)]
    #[case(32, 256, 3, 6)]
    #[case(260, 512, 7, 3)]
    fn every_layer_is_a_valid_split(
        #[case] offset: u64,
        #[case] bytes_per_row: u32,
        #[case] rows_per_image: u32,
        #[case] layers: u32,
    ) {
        let texture_offset = Origin3D::new(0, 0, 2);
        let copy_size = Extent3D::new(64, 2, layers);
        let layout = BufferLayout::new(offset, bytes_per_row, rows_per_image);
        let splits = split_2d_array(
            texture_offset,
            copy_size,
            RGBA8,
            offset,
            bytes_per_row,
            rows_per_image,
            PLACEMENT,
        );

        assert_eq!(splits.layer_count(), layers);
        assert_eq!(splits.iter().count(), layers as usize);
        assert_layers_valid(&splits, texture_offset, copy_size, RGBA8, layout);
    }

    #[test]
    fn aligned_layer_stride_reuses_first_split() {
        let splits = split_2d_array(
            Origin3D::ZERO,
            Extent3D::new(256, 2, 4),
            RGBA8,
            32,
            1024,
            2,
            PLACEMENT,
        );

        assert_eq!(splits.bytes_per_layer(), 2048);
        let first = splits.layer(0);
        let third = splits.layer(2);
        assert_eq!(first.len(), third.len());
        for (a, b) in first.iter().zip(third.iter()) {
            assert_eq!(b.aligned_offset, a.aligned_offset + 2 * 2048);
            assert_eq!(b.texture_offset.z, 2);
            assert_eq!(a.buffer_offset, b.buffer_offset);
        }
        assert_eq!(splits.region_count(), 8);
    }

    #[test]
    fn odd_layer_stride_alternates_splits() {
        // Layer stride of 768 bytes: odd layers start 256 bytes past an aligned address.
        let splits = split_2d_array(
            Origin3D::ZERO,
            Extent3D::new(64, 3, 3),
            RGBA8,
            0,
            256,
            3,
            PLACEMENT,
        );

        let layer0 = splits.layer(0);
        let layer1 = splits.layer(1);
        let layer2 = splits.layer(2);
        assert_eq!(layer0[0].buffer_offset, Origin3D::ZERO);
        assert_eq!(layer1[0].aligned_offset, 512);
        assert_eq!(layer1[0].buffer_offset, Origin3D::new(0, 1, 0));
        assert_eq!(layer2[0].aligned_offset, 1536);
        assert_eq!(layer2[0].buffer_offset, Origin3D::ZERO);
        assert_eq!(layer2[0].texture_offset.z, 2);
    }

    #[test]
    #[should_panic(expected = "array layer out of range")]
    fn rejects_layers_past_the_copy() {
        let splits = split_2d_array(
            Origin3D::ZERO,
            Extent3D::new(4, 1, 2),
            RGBA8,
            0,
            256,
            1,
            PLACEMENT,
        );
        splits.layer(2);
    }
}
