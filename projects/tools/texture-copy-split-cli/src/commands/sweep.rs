use crate::error::CliError;
use crate::DimensionArg;
use argh::FromArgs;
use std::str::FromStr;
use std::time::Instant;
use texture_copy_split::sweep::{cases, SweepAxis, SweepCase, SweepFailure};
use texture_copy_split::{CopySplitSettings, TextureDimension};

/// Sweep axis as written on the command line.
#[derive(Debug, Clone, Copy)]
pub struct AxisArg(pub SweepAxis);

impl FromStr for AxisArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SweepAxis::from_name(&s.to_lowercase())
            .map(AxisArg)
            .ok_or_else(|| {
                let names: Vec<&str> = SweepAxis::all_values()
                    .iter()
                    .map(|axis| axis.name())
                    .collect();
                format!("Invalid sweep axis: {s}. Valid axes are: {}", names.join(", "))
            })
    }
}

#[derive(FromArgs, Debug)]
/// Split and validate every copy of the property matrix
#[argh(subcommand, name = "sweep")]
pub struct SweepCmd {
    /// axis to sweep [default: all axes]
    #[argh(option)]
    pub axis: Option<AxisArg>,

    /// texture dimension to sweep: 2d or 3d [default: both]
    #[argh(option)]
    pub dimension: Option<DimensionArg>,

    /// placement alignment of buffer footprints
    #[argh(option, default = "CopySplitSettings::D3D12.placement_alignment")]
    pub alignment: u32,

    /// number of failures to print per axis
    #[argh(option, default = "5")]
    pub show: usize,
}

pub fn handle_sweep_command(cmd: SweepCmd) -> Result<(), CliError> {
    let settings = CopySplitSettings::new().with_placement_alignment(cmd.alignment);
    let axes: Vec<SweepAxis> = match cmd.axis {
        Some(AxisArg(axis)) => vec![axis],
        None => SweepAxis::all_values().to_vec(),
    };
    let dimensions: Vec<TextureDimension> = match cmd.dimension {
        Some(DimensionArg(dimension)) => vec![dimension],
        None => vec![TextureDimension::D2, TextureDimension::D3],
    };

    let start = Instant::now();
    let mut total_cases = 0;
    let mut total_failures = 0;

    for &dimension in &dimensions {
        for &axis in &axes {
            let axis_cases: Vec<SweepCase> = cases(axis, dimension, settings).collect();
            let failures = run_cases(&axis_cases, settings);

            println!(
                "{} ({:?}): {} case(s), {} failure(s)",
                axis.name(),
                dimension,
                axis_cases.len(),
                failures.len()
            );
            for failure in failures.iter().take(cmd.show) {
                println!("  {failure}");
            }

            total_cases += axis_cases.len();
            total_failures += failures.len();
        }
    }

    println!("Swept {total_cases} case(s) in {:.2?}", start.elapsed());

    if total_failures > 0 {
        return Err(CliError::SweepFailed {
            failures: total_failures,
            cases: total_cases,
        });
    }
    Ok(())
}

fn run_cases(sweep_cases: &[SweepCase], settings: CopySplitSettings) -> Vec<SweepFailure> {
    #[cfg(feature = "multithreaded")]
    {
        use rayon::prelude::*;
        sweep_cases
            .par_iter()
            .filter_map(|case| case.run(settings).err())
            .collect()
    }

    #[cfg(not(feature = "multithreaded"))]
    {
        sweep_cases
            .iter()
            .filter_map(|case| case.run(settings).err())
            .collect()
    }
}
