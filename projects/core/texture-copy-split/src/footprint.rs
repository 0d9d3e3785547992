//! Descriptors handed to a native copy recorder.
//!
//! A region maps onto one `CopyTextureRegion`-style call: the buffer side is a placed
//! footprint, one side is addressed with a destination point and the other with a source box.

use crate::geometry::{Extent3D, Origin3D};
use crate::region::CopyRegion;

/// Linear buffer footprint of a region.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacedFootprint {
    /// Byte offset of the footprint in the buffer; placement aligned.
    pub offset: u64,
    /// Width of the footprint in texels.
    pub width: u32,
    /// Height of the footprint in texels.
    pub height: u32,
    /// Depth of the footprint in slices.
    pub depth: u32,
    /// Byte stride between two block rows.
    pub row_pitch: u32,
}

/// Half-open box in texels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CopyBox {
    /// Inclusive start on x.
    pub left: u32,
    /// Inclusive start on y.
    pub top: u32,
    /// Inclusive start on z.
    pub front: u32,
    /// Exclusive end on x.
    pub right: u32,
    /// Exclusive end on y.
    pub bottom: u32,
    /// Exclusive end on z.
    pub back: u32,
}

impl CopyBox {
    /// Box starting at `origin` with the given `size`.
    #[inline]
    pub const fn new(origin: Origin3D, size: Extent3D) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            front: origin.z,
            right: origin.x + size.width,
            bottom: origin.y + size.height,
            back: origin.z + size.depth_or_array_layers,
        }
    }

    /// Size of the box.
    #[inline]
    pub const fn extent(&self) -> Extent3D {
        Extent3D::new(
            self.right - self.left,
            self.bottom - self.top,
            self.back - self.front,
        )
    }
}

/// Direction of a copy between a texture and a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyDirection {
    /// The buffer is read, the texture written.
    BufferToTexture,
    /// The texture is read, the buffer written.
    TextureToBuffer,
}

/// Everything a recorder needs to issue the native copy of one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionCopyCommand {
    /// Direction of the copy.
    pub direction: CopyDirection,
    /// Buffer-side footprint.
    pub footprint: PlacedFootprint,
    /// Where the copy lands in the destination (texture texels or footprint texels).
    pub destination: Origin3D,
    /// What is read from the source (footprint texels or texture texels).
    pub source: CopyBox,
}

impl CopyRegion {
    /// Buffer footprint of this region for a buffer with `bytes_per_row` row pitch.
    #[inline]
    pub const fn placed_footprint(&self, bytes_per_row: u32) -> PlacedFootprint {
        PlacedFootprint {
            offset: self.aligned_offset,
            width: self.buffer_size.width,
            height: self.buffer_size.height,
            depth: self.buffer_size.depth_or_array_layers,
            row_pitch: bytes_per_row,
        }
    }

    /// Texels of the texture covered by this region.
    #[inline]
    pub const fn texture_box(&self) -> CopyBox {
        CopyBox::new(self.texture_offset, self.copy_size)
    }

    /// Texels of the footprint covered by this region.
    #[inline]
    pub const fn buffer_box(&self) -> CopyBox {
        CopyBox::new(self.buffer_offset, self.copy_size)
    }

    /// Builds the native copy command of this region.
    pub const fn command(&self, direction: CopyDirection, bytes_per_row: u32) -> RegionCopyCommand {
        let footprint = self.placed_footprint(bytes_per_row);
        match direction {
            CopyDirection::BufferToTexture => RegionCopyCommand {
                direction,
                footprint,
                destination: self.texture_offset,
                source: self.buffer_box(),
            },
            CopyDirection::TextureToBuffer => RegionCopyCommand {
                direction,
                footprint,
                destination: self.buffer_offset,
                source: self.texture_box(),
            },
        }
    }
}
