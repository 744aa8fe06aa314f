pub mod compile;
pub mod export;
pub mod presets;
pub mod validate;
pub mod version;

use isocfg::Violation;

/// Prints advisory violations to stderr without failing the command.
pub(crate) fn warn_violations(violations: &[Violation]) {
    for violation in violations {
        eprintln!("warning: {violation}");
    }
}
