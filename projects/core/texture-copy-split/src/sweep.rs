//! Deterministic property matrix over copy geometries.
//!
//! A fixed list of base texture specs is combined with a fixed list of buffer layouts
//! (aligned and unaligned offsets, tight and doubled image heights). Each [`SweepAxis`] then
//! varies one property of the texture or the buffer over a list of check values chosen to hit
//! powers of two and the values right around them. Every case is split and run through
//! [`validate_copy_split`] (and [`validate_plan`] for layered copies).

use crate::align::align_up;
use crate::block::BlockInfo;
use crate::geometry::{Extent3D, Origin3D, TextureDimension};
use crate::region::BufferLayout;
use crate::safe::{self, CopySplitValidationError};
use crate::settings::CopySplitSettings;
use crate::validate::{validate_copy_split, validate_plan, CopyRequest, CopySplitViolation};
use core::fmt;
use derive_enum_all_values::AllValues;
use thiserror::Error;

/// Texture side of a sweep case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureSpec {
    /// Texture-side origin of the copy.
    pub origin: Origin3D,
    /// Size of the copy in texels.
    pub size: Extent3D,
    /// Block metadata of the texture format.
    pub block: BlockInfo,
}

impl TextureSpec {
    const fn new(x: u32, y: u32, z: u32, width: u32, height: u32, depth: u32, bpb: u32) -> Self {
        Self::compressed(x, y, z, width, height, depth, bpb, 1, 1)
    }

    #[allow(clippy::too_many_arguments)]
    const fn compressed(
        x: u32,
        y: u32,
        z: u32,
        width: u32,
        height: u32,
        depth: u32,
        bpb: u32,
        block_width: u32,
        block_height: u32,
    ) -> Self {
        Self {
            origin: Origin3D::new(x, y, z),
            size: Extent3D::new(width, height, depth),
            block: BlockInfo::new(bpb, block_width, block_height),
        }
    }

    /// Tightest row pitch for this texture, rounded up to `pitch_alignment`.
    pub fn tight_bytes_per_row(&self, pitch_alignment: u32) -> u32 {
        align_up(self.block.row_bytes(self.size.width), pitch_alignment as u64) as u32
    }
}

/// Base texture specs every axis starts from.
pub const BASE_TEXTURE_SPECS: [TextureSpec; 39] = [
    TextureSpec::new(0, 0, 0, 1, 1, 1, 4),
    TextureSpec::new(0, 0, 0, 64, 1, 1, 4),
    TextureSpec::new(0, 0, 0, 128, 1, 1, 4),
    TextureSpec::new(0, 0, 0, 192, 1, 1, 4),
    TextureSpec::new(31, 16, 0, 1, 1, 1, 4),
    TextureSpec::new(64, 16, 0, 1, 1, 1, 4),
    TextureSpec::new(64, 16, 8, 1, 1, 1, 4),
    // Several rows and slices.
    TextureSpec::new(0, 0, 0, 64, 2, 1, 4),
    TextureSpec::new(0, 0, 0, 64, 1, 2, 4),
    TextureSpec::new(0, 0, 0, 64, 2, 2, 4),
    TextureSpec::new(0, 0, 0, 128, 2, 1, 4),
    TextureSpec::new(0, 0, 0, 128, 1, 2, 4),
    TextureSpec::new(0, 0, 0, 128, 2, 2, 4),
    TextureSpec::new(0, 0, 0, 192, 2, 1, 4),
    TextureSpec::new(0, 0, 0, 192, 1, 2, 4),
    TextureSpec::new(0, 0, 0, 192, 2, 2, 4),
    // Large.
    TextureSpec::new(0, 0, 0, 1024, 1024, 1, 4),
    TextureSpec::new(256, 512, 0, 1024, 1024, 1, 4),
    TextureSpec::new(64, 48, 0, 1024, 1024, 1, 4),
    TextureSpec::new(64, 48, 16, 1024, 1024, 1024, 4),
    // Odd sizes.
    TextureSpec::new(0, 0, 0, 257, 31, 1, 4),
    TextureSpec::new(0, 0, 0, 17, 93, 1, 4),
    TextureSpec::new(59, 13, 0, 257, 31, 1, 4),
    TextureSpec::new(17, 73, 0, 17, 93, 1, 4),
    TextureSpec::new(17, 73, 59, 17, 93, 99, 4),
    // Block compressed.
    TextureSpec::compressed(0, 0, 0, 4, 4, 1, 8, 4, 4),
    TextureSpec::compressed(64, 16, 0, 4, 4, 1, 8, 4, 4),
    TextureSpec::compressed(64, 16, 8, 4, 4, 1, 8, 4, 4),
    TextureSpec::compressed(0, 0, 0, 4, 4, 1, 16, 4, 4),
    TextureSpec::compressed(64, 16, 0, 4, 4, 1, 16, 4, 4),
    TextureSpec::compressed(64, 16, 8, 4, 4, 1, 16, 4, 4),
    TextureSpec::compressed(0, 0, 0, 1024, 1024, 1, 8, 4, 4),
    TextureSpec::compressed(256, 512, 0, 1024, 1024, 1, 8, 4, 4),
    TextureSpec::compressed(64, 48, 0, 1024, 1024, 1, 8, 4, 4),
    TextureSpec::compressed(64, 48, 16, 1024, 1024, 1, 8, 4, 4),
    TextureSpec::compressed(0, 0, 0, 1024, 1024, 1, 16, 4, 4),
    TextureSpec::compressed(256, 512, 0, 1024, 1024, 1, 16, 4, 4),
    TextureSpec::compressed(64, 48, 0, 1024, 1024, 1, 4, 16, 4),
    TextureSpec::compressed(64, 48, 16, 1024, 1024, 1, 16, 4, 4),
];

/// Values each axis is swept over: small values, powers of two and their neighbours.
pub const CHECK_VALUES: [u32; 32] = [
    1, 2, 3, 4, 5, 6, 7, 8, //
    16, 32, 64, 128, 256, 512, 1024, 2048, //
    15, 31, 63, 127, 257, 511, 1023, 2047, //
    17, 33, 65, 129, 257, 513, 1025, 2049,
];

/// Bytes per block swept by [`SweepAxis::TexelSize`].
pub const TEXEL_SIZES: [u32; 5] = [4, 8, 16, 32, 64];

/// Buffer offsets of the base buffer layouts, paired with whether the image height is doubled.
const BASE_BUFFER_OFFSETS: [(u64, bool); 15] = [
    (0, false),
    (256, false),
    (512, false),
    (1024, false),
    (1024, true),
    (32, false),
    (64, false),
    (64, true),
    (31, false),
    (257, false),
    (384, false),
    (511, false),
    (513, false),
    (1023, false),
    (1023, true),
];

/// Increments swept by [`SweepAxis::RowPitch`] and [`SweepAxis::ImageHeight`].
const STRIDE_STEPS: [u32; 5] = [0, 1, 2, 3, 4];

/// Base buffer layouts for a texture, with the tightest row pitch the settings allow.
///
/// Offsets are rounded up to a multiple of the block size.
pub fn base_buffer_layouts(
    texture: TextureSpec,
    settings: CopySplitSettings,
) -> impl Iterator<Item = BufferLayout> {
    let bytes_per_row = texture.tight_bytes_per_row(settings.row_pitch_alignment());
    let rows = texture.block.blocks_high(texture.size.height);
    let bytes_per_block = texture.block.bytes_per_block as u64;
    BASE_BUFFER_OFFSETS
        .into_iter()
        .map(move |(offset, doubled)| {
            BufferLayout::new(
                offset.div_ceil(bytes_per_block) * bytes_per_block,
                bytes_per_row,
                if doubled { rows * 2 } else { rows },
            )
        })
}

/// One property varied across the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum SweepAxis {
    /// Base specs and base layouts only.
    General,
    /// Copy width.
    TextureWidth,
    /// Copy height.
    TextureHeight,
    /// Texture-side x origin.
    TextureX,
    /// Texture-side y origin.
    TextureY,
    /// Bytes per block.
    TexelSize,
    /// Buffer offset, as a multiple of the bytes per block.
    BufferOffset,
    /// Row pitch, in steps of the row pitch alignment.
    RowPitch,
    /// Rows per image, in steps of 256 rows.
    ImageHeight,
}

impl SweepAxis {
    fn texture_values(self) -> &'static [u32] {
        match self {
            SweepAxis::TextureWidth
            | SweepAxis::TextureHeight
            | SweepAxis::TextureX
            | SweepAxis::TextureY => &CHECK_VALUES,
            SweepAxis::TexelSize => &TEXEL_SIZES,
            _ => &[0],
        }
    }

    fn buffer_values(self) -> &'static [u32] {
        match self {
            SweepAxis::BufferOffset => &CHECK_VALUES,
            SweepAxis::RowPitch | SweepAxis::ImageHeight => &STRIDE_STEPS,
            _ => &[0],
        }
    }

    /// Applies `value` to the texture; `None` if the value is not block aligned.
    fn vary_texture(self, mut texture: TextureSpec, value: u32) -> Option<TextureSpec> {
        let block = texture.block;
        match self {
            SweepAxis::TextureWidth => texture.size.width = value,
            SweepAxis::TextureHeight => texture.size.height = value,
            SweepAxis::TextureX => texture.origin.x = value,
            SweepAxis::TextureY => texture.origin.y = value,
            SweepAxis::TexelSize => texture.block.bytes_per_block = value,
            _ => {}
        }

        let aligned = block.is_block_aligned(texture.size.width, texture.size.height)
            && block.is_block_aligned(texture.origin.x, texture.origin.y);
        aligned.then_some(texture)
    }

    fn vary_buffer(
        self,
        texture: TextureSpec,
        mut layout: BufferLayout,
        value: u32,
        settings: CopySplitSettings,
    ) -> BufferLayout {
        match self {
            SweepAxis::BufferOffset => {
                layout.offset = texture.block.bytes_per_block as u64 * value as u64
            }
            SweepAxis::RowPitch => {
                layout.bytes_per_row += value * settings.row_pitch_alignment()
            }
            SweepAxis::ImageHeight => layout.rows_per_image += value * 256,
            _ => {}
        }
        layout
    }

    /// Parses the kebab-case axis name used on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        SweepAxis::all_values()
            .iter()
            .copied()
            .find(|axis| axis.name() == name)
    }

    /// Kebab-case name of the axis.
    pub const fn name(self) -> &'static str {
        match self {
            SweepAxis::General => "general",
            SweepAxis::TextureWidth => "width",
            SweepAxis::TextureHeight => "height",
            SweepAxis::TextureX => "x",
            SweepAxis::TextureY => "y",
            SweepAxis::TexelSize => "texel-size",
            SweepAxis::BufferOffset => "offset",
            SweepAxis::RowPitch => "row-pitch",
            SweepAxis::ImageHeight => "image-height",
        }
    }
}

/// One copy of the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SweepCase {
    /// Dimension the copy is split for.
    pub dimension: TextureDimension,
    /// Texture side of the copy.
    pub texture: TextureSpec,
    /// Buffer side of the copy.
    pub layout: BufferLayout,
}

/// Why a sweep case failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SweepFailureReason {
    /// The checked splitter refused the inputs.
    #[error("rejected: {0}")]
    Rejected(#[from] CopySplitValidationError),

    /// The emitted regions break an invariant.
    #[error("invalid split: {0}")]
    Invalid(#[from] CopySplitViolation),
}

/// A failed sweep case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("{case}: {reason}")]
pub struct SweepFailure {
    /// The case that failed.
    pub case: SweepCase,
    /// Why it failed.
    pub reason: SweepFailureReason,
}

impl SweepCase {
    /// The request this case splits.
    pub fn request(&self, settings: CopySplitSettings) -> CopyRequest {
        CopyRequest {
            dimension: self.dimension,
            texture_offset: self.texture.origin,
            copy_size: self.texture.size,
            block: self.texture.block,
            layout: self.layout,
            placement_alignment: settings.placement_alignment,
        }
    }

    /// Splits the case and validates the result.
    ///
    /// 1D/2D cases are split as one subresource with the layer count forwarded, and then
    /// again layer by layer.
    ///
    /// # Errors
    ///
    /// A [`SweepFailure`] describing the first problem found.
    pub fn run(&self, settings: CopySplitSettings) -> Result<(), SweepFailure> {
        self.check(settings).map_err(|reason| SweepFailure {
            case: *self,
            reason,
        })
    }

    fn check(&self, settings: CopySplitSettings) -> Result<(), SweepFailureReason> {
        let request = self.request(settings);
        let texture = self.texture;
        let layout = self.layout;

        if self.dimension == TextureDimension::D3 {
            let regions = safe::split_3d(
                texture.origin,
                texture.size,
                texture.block,
                layout.offset,
                layout.bytes_per_row,
                layout.rows_per_image,
                settings,
            )?;
            validate_copy_split(&request, regions.as_slice())?;
            return Ok(());
        }

        let regions = safe::split_2d(
            texture.origin,
            texture.size,
            texture.block,
            layout.offset,
            layout.bytes_per_row,
            settings,
        )?;
        validate_copy_split(&request, regions.as_slice())?;

        let plan = safe::plan_texture_copy(
            self.dimension,
            texture.origin,
            texture.size,
            texture.block,
            layout,
            settings,
        )?;
        validate_plan(&request, &plan)?;
        Ok(())
    }
}

impl fmt::Display for SweepCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let TextureSpec {
            origin,
            size,
            block,
        } = self.texture;
        write!(
            f,
            "{:?} texture [({}, {}, {}), ({}, {}, {})] block {}B {}x{}, buffer ({}, {}, {})",
            self.dimension,
            origin.x,
            origin.y,
            origin.z,
            size.width,
            size.height,
            size.depth_or_array_layers,
            block.bytes_per_block,
            block.block_width,
            block.block_height,
            self.layout.offset,
            self.layout.bytes_per_row,
            self.layout.rows_per_image,
        )
    }
}

/// Every case of `axis` for `dimension`, in a fixed order.
///
/// Row pitches are laid out for the row pitch alignment of `settings`.
pub fn cases(
    axis: SweepAxis,
    dimension: TextureDimension,
    settings: CopySplitSettings,
) -> impl Iterator<Item = SweepCase> {
    BASE_TEXTURE_SPECS
        .into_iter()
        .flat_map(move |base| {
            axis.texture_values()
                .iter()
                .filter_map(move |&value| axis.vary_texture(base, value))
        })
        .flat_map(move |texture| {
            base_buffer_layouts(texture, settings).flat_map(move |layout| {
                axis.buffer_values()
                    .iter()
                    .map(move |&value| axis.vary_buffer(texture, layout, value, settings))
            })
            .map(move |layout| SweepCase {
                dimension,
                texture,
                layout,
            })
        })
}

/// Every case of every axis for `dimension`.
pub fn all_cases(
    dimension: TextureDimension,
    settings: CopySplitSettings,
) -> impl Iterator<Item = SweepCase> {
    SweepAxis::all_values()
        .iter()
        .flat_map(move |&axis| cases(axis, dimension, settings))
}

/// Runs every case of `axis` for `dimension`, returning the number of cases and the first
/// failure.
pub fn run_axis(
    axis: SweepAxis,
    dimension: TextureDimension,
    settings: CopySplitSettings,
) -> (usize, Option<SweepFailure>) {
    let mut count = 0;
    for case in cases(axis, dimension, settings) {
        count += 1;
        if let Err(failure) = case.run(settings) {
            return (count, Some(failure));
        }
    }
    (count, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    fn every_case_splits_correctly(
        #[values(
            SweepAxis::General,
            SweepAxis::TextureWidth,
            SweepAxis::TextureHeight,
            SweepAxis::TextureX,
            SweepAxis::TextureY,
            SweepAxis::TexelSize,
            SweepAxis::BufferOffset,
            SweepAxis::RowPitch,
            SweepAxis::ImageHeight
        )]
        axis: SweepAxis,
        #[values(TextureDimension::D2, TextureDimension::D3)] dimension: TextureDimension,
        #[values(256, 512, 1024, 4096)] placement_alignment: u32,
    ) {
        let settings = CopySplitSettings::new().with_placement_alignment(placement_alignment);
        let (count, failure) = run_axis(axis, dimension, settings);
        assert!(count > 0);
        if let Some(failure) = failure {
            panic!("{failure}");
        }
    }

    #[rstest]
    #[case(SweepAxis::General, 39 * 15)]
    #[case(SweepAxis::TexelSize, 39 * 5 * 15)]
    #[case(SweepAxis::RowPitch, 39 * 15 * 5)]
    #[case(SweepAxis::BufferOffset, 39 * 15 * 32)]
    fn case_counts(#[case] axis: SweepAxis, #[case] expected: usize) {
        assert_eq!(
            cases(axis, TextureDimension::D2, CopySplitSettings::default()).count(),
            expected
        );
    }

    #[test]
    fn skips_origins_off_the_block_grid() {
        let settings = CopySplitSettings::default();
        assert!(cases(SweepAxis::TextureX, TextureDimension::D3, settings)
            .all(|case| case.texture.origin.x % case.texture.block.block_width == 0));
    }

    #[test]
    fn rounds_offsets_to_whole_blocks() {
        let texture = BASE_TEXTURE_SPECS[28];
        assert_eq!(texture.block.bytes_per_block, 16);
        assert!(base_buffer_layouts(texture, CopySplitSettings::default())
            .all(|layout| layout.offset % 16 == 0));
        assert_eq!(texture.tight_bytes_per_row(256), 256);
    }

    #[rstest]
    #[case(256, 128)]
    #[case(512, 256)]
    #[case(4096, 2048)]
    fn row_pitches_follow_placement_alignment(
        #[case] placement_alignment: u32,
        #[case] pitch_alignment: u32,
    ) {
        let settings = CopySplitSettings::new().with_placement_alignment(placement_alignment);
        assert!(cases(SweepAxis::RowPitch, TextureDimension::D2, settings)
            .all(|case| case.layout.bytes_per_row % pitch_alignment == 0));
    }

    #[rstest]
    #[case("general", SweepAxis::General)]
    #[case("texel-size", SweepAxis::TexelSize)]
    #[case("image-height", SweepAxis::ImageHeight)]
    fn parses_axis_names(#[case] name: &str, #[case] axis: SweepAxis) {
        assert_eq!(SweepAxis::from_name(name), Some(axis));
        assert_eq!(axis.name(), name);
    }
}
