use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use slicemark_core::workspace;

use crate::summary::print_workspace_summary;

#[derive(Args)]
pub struct InfoArgs {
    /// Workspace file (workspace.json)
    pub workspace: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let (session, report) = workspace::load(&args.workspace)?;
    print_workspace_summary(&session, &report);
    Ok(())
}
