#![allow(unexpected_cfgs)]
#![cfg(not(tarpaulin_include))]

mod commands;
mod error;
use argh::FromArgs;
use core::error::Error;
use std::str::FromStr;
use texture_copy_split::TextureDimension;

/// Texture dimension as written on the command line.
#[derive(Debug, Clone, Copy)]
pub struct DimensionArg(pub TextureDimension);

// Implement FromStr to allow parsing from command line arguments
impl FromStr for DimensionArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1d" | "d1" => Ok(DimensionArg(TextureDimension::D1)),
            "2d" | "d2" => Ok(DimensionArg(TextureDimension::D2)),
            "3d" | "d3" => Ok(DimensionArg(TextureDimension::D3)),
            _ => Err(format!(
                "Invalid texture dimension: {s}. Valid dimensions are: 1d, 2d, 3d"
            )),
        }
    }
}

#[derive(FromArgs, Debug)]
/// Splits buffer<->texture copies into placement-aligned copy regions
struct TopLevel {
    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Split(commands::split::SplitCmd),
    Sweep(commands::sweep::SweepCmd),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli: TopLevel = argh::from_env();

    match cli.command {
        Commands::Split(cmd) => {
            commands::split::handle_split_command(cmd)?;
        }
        Commands::Sweep(cmd) => {
            commands::sweep::handle_sweep_command(cmd)?;
        }
    }

    Ok(())
}
