use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use slicemark_core::view::ViewTransform;
use slicemark_core::workspace;

#[derive(Args)]
pub struct RenderArgs {
    /// Workspace file (workspace.json)
    pub workspace: PathBuf,

    /// Output PNG file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Override the stored window level
    #[arg(long)]
    pub level: Option<f64>,

    /// Override the stored window width
    #[arg(long)]
    pub width: Option<f64>,

    /// Hide a layer for this render (repeatable)
    #[arg(long = "hide")]
    pub hidden: Vec<String>,
}

pub fn run(args: &RenderArgs) -> Result<()> {
    let (mut session, report) = workspace::load(&args.workspace)?;
    for failure in &report.skipped {
        eprintln!("warning: skipped layer {}: {}", failure.name, failure.reason);
    }

    if args.level.is_some() || args.width.is_some() {
        let current = session.window();
        let level = args.level.unwrap_or(current.level);
        let width = args.width.unwrap_or(current.width);
        session.set_window(level, width)?;
    }

    for name in &args.hidden {
        if !session.store.set_visible(name, false) {
            bail!("no layer named {name:?}");
        }
    }

    let frame = session.render(&ViewTransform::default(), None)?;
    frame.to_rgb_image().save(&args.output)?;

    println!(
        "Rendered {}x{} -> {}",
        frame.width(),
        frame.height(),
        args.output.display()
    );
    Ok(())
}
