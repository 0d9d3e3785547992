//! Integer alignment helpers and block/byte conversions.
//!
//! Alignments passed here are always powers of two; this is a caller precondition and
//! is only checked in debug builds.

/// Returns `true` if `value` is a non-zero power of two.
#[inline(always)]
pub const fn is_power_of_two(value: u64) -> bool {
    value != 0 && (value & (value - 1)) == 0
}

/// Rounds `value` up to the next multiple of `alignment`.
///
/// `align_up(0, alignment)` is `0`.
///
/// # Parameters
///
/// - `value`: The value to align
/// - `alignment`: A power of two
#[inline(always)]
pub const fn align_up(value: u64, alignment: u64) -> u64 {
    debug_assert!(is_power_of_two(alignment));
    (value + (alignment - 1)) & !(alignment - 1)
}

/// Rounds `value` down to the previous multiple of `alignment`.
///
/// # Parameters
///
/// - `value`: The value to align
/// - `alignment`: A power of two
#[inline(always)]
pub const fn align_down(value: u64, alignment: u64) -> u64 {
    debug_assert!(is_power_of_two(alignment));
    value & !(alignment - 1)
}

/// Converts a byte offset into a whole number of blocks.
///
/// `byte_offset` must be a multiple of `bytes_per_block`; this is the caller's
/// responsibility and is only asserted in debug builds.
#[inline(always)]
pub const fn bytes_to_blocks(byte_offset: u64, bytes_per_block: u32) -> u64 {
    debug_assert!(byte_offset % bytes_per_block as u64 == 0);
    byte_offset / bytes_per_block as u64
}

/// Converts a number of blocks into bytes.
#[inline(always)]
pub const fn blocks_to_bytes(blocks: u64, bytes_per_block: u32) -> u64 {
    blocks * bytes_per_block as u64
}

/// Minimum number of bytes a linear buffer needs for a copy of the given size.
///
/// The last row and the last image are not padded out to `bytes_per_row` / `rows_per_image`,
/// matching how WebGPU sizes copies.
///
/// # Parameters
///
/// - `bytes_per_row`: Byte stride between block rows
/// - `rows_per_image`: Block rows between two images
/// - `width_in_blocks`: Width of the copy in blocks
/// - `height_in_blocks`: Height of the copy in blocks
/// - `depth`: Number of images
/// - `bytes_per_block`: Bytes in one block
pub const fn required_bytes_in_copy(
    bytes_per_row: u64,
    rows_per_image: u64,
    width_in_blocks: u64,
    height_in_blocks: u64,
    depth: u64,
    bytes_per_block: u64,
) -> u64 {
    if depth == 0 {
        return 0;
    }

    let bytes_per_image = bytes_per_row * rows_per_image;
    let mut required = bytes_per_image * (depth - 1);
    if height_in_blocks != 0 {
        let last_row_bytes = width_in_blocks * bytes_per_block;
        let last_image_bytes = bytes_per_row * (height_in_blocks - 1) + last_row_bytes;
        required += last_image_bytes;
    }

    required
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(0, 512, 0)]
    #[case(1, 512, 512)]
    #[case(511, 512, 512)]
    #[case(512, 512, 512)]
    #[case(513, 512, 1024)]
    #[case(1028, 256, 1280)]
    fn aligns_up(#[case] value: u64, #[case] alignment: u64, #[case] expected: u64) {
        assert_eq!(align_up(value, alignment), expected);
    }

    #[rstest]
    #[case(0, 512, 0)]
    #[case(31, 512, 0)]
    #[case(512, 512, 512)]
    #[case(2052, 512, 2048)]
    #[case(1023, 256, 768)]
    fn aligns_down(#[case] value: u64, #[case] alignment: u64, #[case] expected: u64) {
        assert_eq!(align_down(value, alignment), expected);
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(256, true)]
    #[case(384, false)]
    #[case(512, true)]
    fn detects_powers_of_two(#[case] value: u64, #[case] expected: bool) {
        assert_eq!(is_power_of_two(value), expected);
    }

    #[test]
    fn converts_between_bytes_and_blocks() {
        assert_eq!(bytes_to_blocks(2052, 4), 513);
        assert_eq!(bytes_to_blocks(64, 16), 4);
        assert_eq!(blocks_to_bytes(513, 4), 2052);
    }

    #[test]
    fn required_bytes_skip_trailing_padding() {
        // 3 images of 4 rows, row pitch 256, each row 16 bytes of data.
        assert_eq!(required_bytes_in_copy(256, 4, 4, 4, 3, 4), 256 * 4 * 2 + 256 * 3 + 16);
        // Single row copies only need the row itself.
        assert_eq!(required_bytes_in_copy(1024, 1, 256, 1, 1, 4), 1024);
        assert_eq!(required_bytes_in_copy(1024, 1, 256, 1, 0, 4), 0);
    }
}
