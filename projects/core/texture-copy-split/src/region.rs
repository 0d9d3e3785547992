//! Copy regions emitted by the splitters.
//!
//! A [`CopyRegion`] is one sub-copy that a native copy primitive can execute as-is. The
//! regions for one subresource are collected in a [`CopyRegionSet`], a fixed-capacity inline
//! array so that splitting never allocates.

use crate::align::blocks_to_bytes;
use crate::block::BlockInfo;
use crate::geometry::{Extent3D, Origin3D};
use core::ops::Index;

/// Upper bound on the number of regions emitted for one subresource.
///
/// A 2D split emits at most 2 regions; the 3D fix-ups can add at most 2 more.
pub const MAX_COPY_REGIONS: usize = 4;

/// How the linear buffer side of a copy is laid out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferLayout {
    /// Byte offset of the first copied block.
    pub offset: u64,
    /// Byte stride between two block rows.
    pub bytes_per_row: u32,
    /// Number of block rows between two images (3D slices or array layers).
    pub rows_per_image: u32,
}

impl BufferLayout {
    /// Creates a new buffer layout.
    #[inline]
    pub const fn new(offset: u64, bytes_per_row: u32, rows_per_image: u32) -> Self {
        Self {
            offset,
            bytes_per_row,
            rows_per_image,
        }
    }

    /// Byte stride between two images.
    #[inline]
    pub const fn bytes_per_image(&self) -> u64 {
        self.bytes_per_row as u64 * self.rows_per_image as u64
    }
}

/// One sub-copy between a texture and a placement-aligned buffer footprint.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CopyRegion {
    /// Texture-side origin of the sub-copy.
    pub texture_offset: Origin3D,
    /// Size of the sub-copy, identical on both sides.
    pub copy_size: Extent3D,
    /// Where the sub-copy starts inside the footprint. `z` is always `0`.
    pub buffer_offset: Origin3D,
    /// Dimensions of the footprint the sub-copy is described against.
    pub buffer_size: Extent3D,
    /// Byte offset of the footprint in the buffer. Always a multiple of the placement alignment.
    pub aligned_offset: u64,
}

impl CopyRegion {
    /// Byte offset in the buffer of the first block this region copies.
    ///
    /// # Parameters
    ///
    /// - `block`: Block metadata of the texture format
    /// - `bytes_per_row`: Row pitch of the footprint
    #[inline]
    pub fn first_copied_byte(&self, block: BlockInfo, bytes_per_row: u32) -> u64 {
        debug_assert_eq!(self.buffer_offset.z, 0);
        self.aligned_offset
            + blocks_to_bytes(
                block.blocks_wide(self.buffer_offset.x) as u64,
                block.bytes_per_block,
            )
            + block.blocks_high(self.buffer_offset.y) as u64 * bytes_per_row as u64
    }
}

/// Ordered collection of at most [`MAX_COPY_REGIONS`] regions.
///
/// The order is deterministic for a given input, but carries no meaning for correctness.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CopyRegionSet {
    regions: [CopyRegion; MAX_COPY_REGIONS],
    count: usize,
}

impl CopyRegionSet {
    /// Creates an empty set.
    #[inline]
    pub const fn new() -> Self {
        Self {
            regions: [CopyRegion {
                texture_offset: Origin3D::ZERO,
                copy_size: Extent3D::new(0, 0, 0),
                buffer_offset: Origin3D::ZERO,
                buffer_size: Extent3D::new(0, 0, 0),
                aligned_offset: 0,
            }; MAX_COPY_REGIONS],
            count: 0,
        }
    }

    /// Appends a region.
    ///
    /// # Panics
    ///
    /// If the set already holds [`MAX_COPY_REGIONS`] regions. The splitters never get there.
    #[inline]
    pub(crate) fn push(&mut self, region: CopyRegion) {
        assert!(self.count < MAX_COPY_REGIONS, "copy region set is full");
        self.regions[self.count] = region;
        self.count += 1;
    }

    /// Number of regions in the set.
    #[inline]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the set holds no region.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The regions as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[CopyRegion] {
        &self.regions[..self.count]
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [CopyRegion] {
        &mut self.regions[..self.count]
    }

    /// Iterates over the regions in emission order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, CopyRegion> {
        self.as_slice().iter()
    }
}

impl Index<usize> for CopyRegionSet {
    type Output = CopyRegion;

    #[inline]
    fn index(&self, index: usize) -> &CopyRegion {
        &self.as_slice()[index]
    }
}

impl IntoIterator for CopyRegionSet {
    type Item = CopyRegion;
    type IntoIter = core::iter::Take<core::array::IntoIter<CopyRegion, MAX_COPY_REGIONS>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.regions.into_iter().take(self.count)
    }
}

impl<'a> IntoIterator for &'a CopyRegionSet {
    type Item = &'a CopyRegion;
    type IntoIter = core::slice::Iter<'a, CopyRegion>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
