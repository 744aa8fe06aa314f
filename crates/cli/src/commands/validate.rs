//! The `validate` command - reports advisory configuration issues.

use super::compile::build_session;
use crate::options::{FieldArgs, SourceArgs};
use clap::Args;
use isocfg::Violation;

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    fields: FieldArgs,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Exit with an error when any violation is found
    #[arg(long)]
    strict: bool,
}

pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let violations = build_session(args.source, args.fields)?.violations();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&violations)?);
    } else {
        print_text(&violations);
    }

    if args.strict && !violations.is_empty() {
        anyhow::bail!("{} violation(s) found", violations.len());
    }
    Ok(())
}

fn print_text(violations: &[Violation]) {
    if violations.is_empty() {
        println!("No issues found.");
        return;
    }

    for violation in violations {
        println!("  {:<12} {}", violation.field, violation.code);
    }
}
