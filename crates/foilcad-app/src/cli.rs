//! 命令行参数定义

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use foilcad_core::transform::Mirror;

#[derive(Debug, Parser)]
#[command(name = "foilcad", version, about = "Import aerofoil .dat profiles into CAD sketches")]
pub struct Cli {
    /// 输出调试日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a .dat file and print a summary
    Info(InfoArgs),
    /// List reference planes and sketches of a drawing
    Targets(TargetsArgs),
    /// Transform a profile and add it to a drawing as one spline
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Aerofoil coordinate file
    pub dat: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct TargetsArgs {
    /// DXF drawing
    pub document: PathBuf,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Aerofoil coordinate file
    pub dat: PathBuf,

    /// DXF drawing, created if it does not exist
    pub document: PathBuf,

    /// TOML settings file; flags below override its values
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Add the spline to an existing sketch
    #[arg(long, conflicts_with = "plane")]
    pub sketch: Option<String>,

    /// Create a new sketch on this reference plane (e.g. "xy", "Front (XZ)")
    #[arg(long)]
    pub plane: Option<String>,

    /// Name of the sketch created on --plane
    #[arg(long)]
    pub sketch_name: Option<String>,

    /// Scale uniformly to this chord width (mm)
    #[arg(long, allow_negative_numbers = true)]
    pub width: Option<f64>,

    /// Scale factor applied to Y only
    #[arg(long, allow_negative_numbers = true)]
    pub y_scale: Option<f64>,

    #[arg(long, value_enum)]
    pub mirror: Option<MirrorArg>,

    /// Clockwise rotation about the origin (degrees)
    #[arg(long, allow_negative_numbers = true)]
    pub rotate: Option<f64>,

    /// X offset (mm)
    #[arg(long, allow_negative_numbers = true)]
    pub dx: Option<f64>,

    /// Y offset (mm)
    #[arg(long, allow_negative_numbers = true)]
    pub dy: Option<f64>,

    /// Spline order
    #[arg(long)]
    pub order: Option<u32>,

    /// Show the transformed profile without touching the drawing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MirrorArg {
    None,
    Horizontal,
    Vertical,
}

impl From<MirrorArg> for Mirror {
    fn from(arg: MirrorArg) -> Self {
        match arg {
            MirrorArg::None => Mirror::None,
            MirrorArg::Horizontal => Mirror::Horizontal,
            MirrorArg::Vertical => Mirror::Vertical,
        }
    }
}
