//! Advisory lint rules over a [`Configuration`].
//!
//! None of these rules block compilation. They describe combinations the
//! compiler resolves silently (by suppressing or omitting flags) so callers
//! can surface them.

use crate::config::Configuration;
use serde::Serialize;
use std::fmt;

/// Configuration field a violation refers to, named as in the export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    StderrPath,
    QuotaBlocks,
    QuotaInodes,
    CgMem,
    Arguments,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StderrPath => "stderrPath",
            Self::QuotaBlocks => "quotaBlocks",
            Self::QuotaInodes => "quotaInodes",
            Self::CgMem => "cgMem",
            Self::Arguments => "arguments",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    /// A stderr path is set together with stderr-to-stdout.
    MutuallyExclusiveStderr,
    /// Only one half of the disk quota is set; no quota is compiled.
    IncompleteQuotaPair,
    /// A control-group memory limit is set while control groups are off.
    CgMemWithoutCg,
    /// Arguments are set without a program; neither is compiled.
    ArgumentsWithoutProgram,
}

impl ViolationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MutuallyExclusiveStderr => "MUTUALLY_EXCLUSIVE_STDERR",
            Self::IncompleteQuotaPair => "INCOMPLETE_QUOTA_PAIR",
            Self::CgMemWithoutCg => "CG_MEM_WITHOUT_CG",
            Self::ArgumentsWithoutProgram => "ARGUMENTS_WITHOUT_PROGRAM",
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: Field,
    pub code: ViolationCode,
}

impl Violation {
    pub fn new(field: Field, code: ViolationCode) -> Self {
        Self { field, code }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.code)
    }
}

/// Checks every rule and returns all violations, in rule order.
pub fn validate(config: &Configuration) -> Vec<Violation> {
    let mut violations = Vec::new();

    if !config.stderr_path.is_empty() && config.stderr_to_stdout {
        violations.push(Violation::new(
            Field::StderrPath,
            ViolationCode::MutuallyExclusiveStderr,
        ));
    }

    match (config.quota_blocks.is_empty(), config.quota_inodes.is_empty()) {
        (false, true) => violations.push(Violation::new(
            Field::QuotaInodes,
            ViolationCode::IncompleteQuotaPair,
        )),
        (true, false) => violations.push(Violation::new(
            Field::QuotaBlocks,
            ViolationCode::IncompleteQuotaPair,
        )),
        _ => {}
    }

    if !config.enable_cg && !config.cg_mem.is_empty() {
        violations.push(Violation::new(Field::CgMem, ViolationCode::CgMemWithoutCg));
    }

    if config.program.is_empty() && !config.arguments.is_empty() {
        violations.push(Violation::new(
            Field::Arguments,
            ViolationCode::ArgumentsWithoutProgram,
        ));
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(config: &Configuration) -> Vec<ViolationCode> {
        validate(config).into_iter().map(|v| v.code).collect()
    }

    #[test]
    fn default_configuration_is_clean() {
        assert!(validate(&Configuration::default()).is_empty());
    }

    #[test]
    fn stderr_path_with_stderr_to_stdout() {
        let config = Configuration {
            stderr_path: "err.txt".to_string(),
            stderr_to_stdout: true,
            ..Configuration::default()
        };
        assert_eq!(
            validate(&config),
            vec![Violation::new(
                Field::StderrPath,
                ViolationCode::MutuallyExclusiveStderr
            )]
        );
    }

    #[test]
    fn quota_blocks_without_inodes() {
        let config = Configuration::default().with_quota("10", "");
        assert_eq!(
            validate(&config),
            vec![Violation::new(
                Field::QuotaInodes,
                ViolationCode::IncompleteQuotaPair
            )]
        );
    }

    #[test]
    fn quota_inodes_without_blocks() {
        let config = Configuration::default().with_quota("", "5");
        assert_eq!(
            validate(&config),
            vec![Violation::new(
                Field::QuotaBlocks,
                ViolationCode::IncompleteQuotaPair
            )]
        );
    }

    #[test]
    fn complete_quota_is_clean() {
        let config = Configuration::default().with_quota("10", "5");
        assert!(validate(&config).is_empty());
    }

    #[test]
    fn cg_mem_without_cg() {
        let config = Configuration {
            cg_mem: "65536".to_string(),
            ..Configuration::default()
        };
        assert_eq!(codes(&config), vec![ViolationCode::CgMemWithoutCg]);

        let enabled = Configuration {
            enable_cg: true,
            ..config
        };
        assert!(validate(&enabled).is_empty());
    }

    #[test]
    fn arguments_without_program() {
        let config = Configuration::default().with_program("", "-c 'echo hi'");
        assert_eq!(codes(&config), vec![ViolationCode::ArgumentsWithoutProgram]);
    }

    #[test]
    fn reports_every_violation() {
        let config = Configuration {
            stderr_path: "err.txt".to_string(),
            stderr_to_stdout: true,
            quota_blocks: "10".to_string(),
            cg_mem: "1024".to_string(),
            arguments: "x".to_string(),
            ..Configuration::default()
        };
        assert_eq!(
            codes(&config),
            vec![
                ViolationCode::MutuallyExclusiveStderr,
                ViolationCode::IncompleteQuotaPair,
                ViolationCode::CgMemWithoutCg,
                ViolationCode::ArgumentsWithoutProgram,
            ]
        );
    }

    #[test]
    fn validate_does_not_mutate() {
        let config = Configuration::default().with_quota("10", "");
        let before = config.clone();
        let _ = validate(&config);
        assert_eq!(config, before);
    }

    #[test]
    fn display_uses_field_and_code() {
        let violation = Violation::new(Field::CgMem, ViolationCode::CgMemWithoutCg);
        assert_eq!(violation.to_string(), "cgMem: CG_MEM_WITHOUT_CG");
    }

    #[test]
    fn serializes_with_export_names() {
        let violation = Violation::new(Field::QuotaBlocks, ViolationCode::IncompleteQuotaPair);
        assert_eq!(
            serde_json::to_string(&violation).unwrap(),
            r#"{"field":"quotaBlocks","code":"INCOMPLETE_QUOTA_PAIR"}"#
        );
    }
}
