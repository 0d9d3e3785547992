//! Texel block metadata.
//!
//! The splitter never looks formats up itself; callers hand it the [`BlockInfo`] of the
//! texture's format (1x1 for uncompressed formats, e.g. 4x4 for BC formats).

/// Size and footprint of one texel block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockInfo {
    /// Bytes occupied by one block.
    pub bytes_per_block: u32,
    /// Width of one block in texels.
    pub block_width: u32,
    /// Height of one block in texels.
    pub block_height: u32,
}

impl BlockInfo {
    /// Creates block metadata from its byte size and texel dimensions.
    #[inline]
    pub const fn new(bytes_per_block: u32, block_width: u32, block_height: u32) -> Self {
        Self {
            bytes_per_block,
            block_width,
            block_height,
        }
    }

    /// Block metadata of an uncompressed format with `bytes_per_texel` bytes per texel.
    #[inline]
    pub const fn uncompressed(bytes_per_texel: u32) -> Self {
        Self::new(bytes_per_texel, 1, 1)
    }

    /// Returns `true` if no component is zero.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.bytes_per_block != 0 && self.block_width != 0 && self.block_height != 0
    }

    /// Number of blocks spanned by `width` texels.
    #[inline]
    pub const fn blocks_wide(&self, width: u32) -> u32 {
        width / self.block_width
    }

    /// Number of block rows spanned by `height` texels.
    #[inline]
    pub const fn blocks_high(&self, height: u32) -> u32 {
        height / self.block_height
    }

    /// Bytes taken by one row of blocks that is `width` texels wide.
    #[inline]
    pub const fn row_bytes(&self, width: u32) -> u64 {
        self.blocks_wide(width) as u64 * self.bytes_per_block as u64
    }

    /// Returns `true` if `x` and `y` both land on a block boundary.
    #[inline]
    pub const fn is_block_aligned(&self, x: u32, y: u32) -> bool {
        x % self.block_width == 0 && y % self.block_height == 0
    }
}
