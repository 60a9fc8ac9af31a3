use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use slicemark_core::image::ProjectionGeometry;
use slicemark_core::io::import_grayscale;
use slicemark_core::session::Session;
use slicemark_core::workspace;

#[derive(Args)]
pub struct ImportArgs {
    /// Input grayscale image (PNG, TIFF, ...)
    pub image: PathBuf,

    /// Workspace file to create
    #[arg(short, long)]
    pub output: PathBuf,

    /// Pixel spacing in mm, x then y
    #[arg(long, num_args = 2, value_names = ["SX", "SY"], default_values = ["1.0", "1.0"])]
    pub spacing: Vec<f64>,

    /// World position of the first pixel, x then y
    #[arg(long, num_args = 2, value_names = ["OX", "OY"], default_values = ["0.0", "0.0"])]
    pub origin: Vec<f64>,

    /// Source-to-axis distance in mm; rescales spacing to the isocenter
    /// plane when given together with --sid
    #[arg(long, requires = "sid")]
    pub sad: Option<f64>,

    /// Source-to-detector distance in mm
    #[arg(long, requires = "sad")]
    pub sid: Option<f64>,
}

pub fn run(args: &ImportArgs) -> Result<()> {
    if args.output.exists() {
        bail!("{} already exists", args.output.display());
    }

    let geometry = match (args.sad, args.sid) {
        (Some(sad), Some(sid)) => Some(ProjectionGeometry { sad, sid }),
        _ => None,
    };

    let base = import_grayscale(
        &args.image,
        (args.spacing[0], args.spacing[1]),
        (args.origin[0], args.origin[1]),
        geometry,
    )?;

    let mut session = Session::new();
    session.import_image(base.pixels().clone(), base.spacing(), base.origin(), None)?;
    workspace::save(&mut session, &args.output)?;

    let base = session.base().map(|b| (b.width(), b.height()));
    if let Some((w, h)) = base {
        println!("Imported {w}x{h} -> {}", args.output.display());
    }
    Ok(())
}
