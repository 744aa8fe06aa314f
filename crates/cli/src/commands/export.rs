//! The `export` command - writes a configuration as JSON.

use super::compile::build_session;
use crate::options::{FieldArgs, SourceArgs};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    fields: FieldArgs,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

pub fn run(args: ExportArgs) -> anyhow::Result<()> {
    let session = build_session(args.source, args.fields)?;
    let text = session.export()?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, format!("{text}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "configuration exported");
        }
        None => println!("{text}"),
    }
    Ok(())
}
