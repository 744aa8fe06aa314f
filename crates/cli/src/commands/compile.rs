//! The `compile` command - prints the isolate command line.

use super::warn_violations;
use crate::options::{FieldArgs, SourceArgs};
use clap::Args;
use isocfg::EditingSession;

#[derive(Args)]
pub struct CompileArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    fields: FieldArgs,

    /// Do not print validation warnings
    #[arg(long, short)]
    quiet: bool,
}

pub fn run(args: CompileArgs) -> anyhow::Result<()> {
    let session = build_session(args.source, args.fields)?;

    if !args.quiet {
        warn_violations(&session.violations());
    }
    println!("{}", session.command());
    Ok(())
}

pub(crate) fn build_session(
    source: SourceArgs,
    fields: FieldArgs,
) -> anyhow::Result<EditingSession> {
    let mut session = EditingSession::with_config(source.load()?);
    session.update(|c| fields.apply(c));
    Ok(session)
}
