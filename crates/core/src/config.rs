use serde::{Deserialize, Serialize};
use std::fmt;

/// Box identifier used when none is given.
pub const DEFAULT_BOX_ID: &str = "0";

/// An environment variable injected into the box with `--env`.
///
/// Entries with an empty name are kept in the configuration but never
/// compiled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parses `NAME` or `NAME=VALUE`. Everything after the first `=` is the
    /// value.
    pub fn parse(s: impl AsRef<str>) -> Self {
        let s = s.as_ref();
        match s.split_once('=') {
            Some((key, value)) => Self::new(key, value),
            None => Self::new(s, ""),
        }
    }

    pub fn is_inert(&self) -> bool {
        self.key.is_empty()
    }
}

impl fmt::Display for EnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}={}", self.key, self.value)
        }
    }
}

/// Which component of an [`EnvVar`] to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvVarField {
    Key,
    Value,
}

/// A directory rule compiled to `--dir=INSIDE[=OUTSIDE][:OPTIONS]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryRule {
    /// Path inside the box. Rules without one are not compiled.
    pub inside: String,
    /// Path on the host. Empty means the same path as `inside`.
    pub outside: String,
    /// Comma-separated rule options such as `rw`, `dev`, `noexec`, `maybe`.
    pub options: String,
}

impl DirectoryRule {
    pub fn new(
        inside: impl Into<String>,
        outside: impl Into<String>,
        options: impl Into<String>,
    ) -> Self {
        Self {
            inside: inside.into(),
            outside: outside.into(),
            options: options.into(),
        }
    }

    /// Parses `INSIDE[=OUTSIDE][:OPTIONS]`.
    ///
    /// The options part starts at the last `:` so that host paths containing
    /// `=` still parse. A rule whose outside path contains `:` therefore does
    /// not survive [`Display`](fmt::Display) then `parse` unless it carries
    /// options: `/a=/b:c` reads as outside `/b` with options `c`. Write
    /// `/a=/b:c:` to keep the whole path and no options.
    pub fn parse(s: impl AsRef<str>) -> Self {
        let s = s.as_ref();
        let (paths, options) = match s.rsplit_once(':') {
            Some((paths, options)) => (paths, options),
            None => (s, ""),
        };
        let (inside, outside) = match paths.split_once('=') {
            Some((inside, outside)) => (inside, outside),
            None => (paths, ""),
        };
        Self::new(inside, outside, options)
    }

    pub fn is_inert(&self) -> bool {
        self.inside.is_empty()
    }
}

impl fmt::Display for DirectoryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inside)?;
        if !self.outside.is_empty() {
            write!(f, "={}", self.outside)?;
        }
        if !self.options.is_empty() {
            write!(f, ":{}", self.options)?;
        }
        Ok(())
    }
}

/// Which component of a [`DirectoryRule`] to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryField {
    Inside,
    Outside,
    Options,
}

/// Complete description of one isolate invocation.
///
/// Every limit and path is kept as raw text: an empty string means "not
/// set", anything else is passed through to the compiled flag verbatim.
/// Equality is structural.
///
/// The `with_*` methods are functional updates: they consume the value and
/// return the replacement, keeping the model's invariants (non-empty box id,
/// exclusive stderr redirection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    // Identity and redirection
    pub box_id: String,
    pub meta_file: String,
    pub stdin: String,
    pub stdout: String,
    pub stderr_path: String,
    pub stderr_to_stdout: bool,
    pub chdir: String,

    // Execution control
    pub verbose: bool,
    pub silent: bool,
    pub wait: bool,

    // Resource limits
    pub memory: String,
    pub time: String,
    pub wall_time: String,
    pub extra_time: String,
    pub stack: String,
    pub open_files: String,
    pub file_size: String,
    pub quota_blocks: String,
    pub quota_inodes: String,
    pub core_size: String,
    pub processes: String,

    // Environment
    pub env_vars: Vec<EnvVar>,
    pub full_env: bool,

    // Filesystem
    pub directories: Vec<DirectoryRule>,
    pub no_default_dirs: bool,

    // Control groups
    pub enable_cg: bool,
    pub cg_mem: String,

    // Relaxations
    pub share_net: bool,
    pub inherit_fds: bool,
    pub special_files: bool,
    pub tty_hack: bool,
    pub as_uid: String,
    pub as_gid: String,

    // Payload
    pub program: String,
    pub arguments: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            box_id: DEFAULT_BOX_ID.to_string(),
            meta_file: String::new(),
            stdin: String::new(),
            stdout: String::new(),
            stderr_path: String::new(),
            stderr_to_stdout: false,
            chdir: String::new(),
            verbose: false,
            silent: false,
            wait: false,
            memory: String::new(),
            time: String::new(),
            wall_time: String::new(),
            extra_time: String::new(),
            stack: String::new(),
            open_files: String::new(),
            file_size: String::new(),
            quota_blocks: String::new(),
            quota_inodes: String::new(),
            core_size: String::new(),
            processes: String::new(),
            env_vars: Vec::new(),
            full_env: false,
            directories: Vec::new(),
            no_default_dirs: false,
            enable_cg: false,
            cg_mem: String::new(),
            share_net: false,
            inherit_fds: false,
            special_files: false,
            tty_hack: false,
            as_uid: String::new(),
            as_gid: String::new(),
            program: String::new(),
            arguments: String::new(),
        }
    }
}

impl Configuration {
    /// Creates the canonical default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the box id. An empty id restores [`DEFAULT_BOX_ID`].
    pub fn with_box_id(mut self, id: impl Into<String>) -> Self {
        self.box_id = id.into();
        self.normalize_box_id();
        self
    }

    /// Sets the stderr redirection path, clearing stderr-to-stdout when the
    /// path is non-empty.
    pub fn with_stderr_path(mut self, path: impl Into<String>) -> Self {
        self.stderr_path = path.into();
        if !self.stderr_path.is_empty() {
            self.stderr_to_stdout = false;
        }
        self
    }

    /// Enables or disables stderr-to-stdout, clearing the stderr path when
    /// enabled.
    pub fn with_stderr_to_stdout(mut self, enabled: bool) -> Self {
        self.stderr_to_stdout = enabled;
        if enabled {
            self.stderr_path.clear();
        }
        self
    }

    pub fn with_quota(mut self, blocks: impl Into<String>, inodes: impl Into<String>) -> Self {
        self.quota_blocks = blocks.into();
        self.quota_inodes = inodes.into();
        self
    }

    pub fn with_program(mut self, program: impl Into<String>, arguments: impl Into<String>) -> Self {
        self.program = program.into();
        self.arguments = arguments.into();
        self
    }

    pub fn with_env_var(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_env_var(EnvVar::new(key, value))
    }

    pub fn push_env_var(mut self, var: EnvVar) -> Self {
        self.env_vars.push(var);
        self
    }

    /// Removes the entry at `index`. Out-of-range indices leave the
    /// configuration unchanged.
    pub fn remove_env_var(mut self, index: usize) -> Self {
        if index < self.env_vars.len() {
            self.env_vars.remove(index);
        }
        self
    }

    pub fn update_env_var(
        mut self,
        index: usize,
        field: EnvVarField,
        value: impl Into<String>,
    ) -> Self {
        if let Some(var) = self.env_vars.get_mut(index) {
            match field {
                EnvVarField::Key => var.key = value.into(),
                EnvVarField::Value => var.value = value.into(),
            }
        }
        self
    }

    pub fn with_directory(mut self, rule: DirectoryRule) -> Self {
        self.directories.push(rule);
        self
    }

    /// Removes the rule at `index`. Out-of-range indices leave the
    /// configuration unchanged.
    pub fn remove_directory(mut self, index: usize) -> Self {
        if index < self.directories.len() {
            self.directories.remove(index);
        }
        self
    }

    pub fn update_directory(
        mut self,
        index: usize,
        field: DirectoryField,
        value: impl Into<String>,
    ) -> Self {
        if let Some(rule) = self.directories.get_mut(index) {
            match field {
                DirectoryField::Inside => rule.inside = value.into(),
                DirectoryField::Outside => rule.outside = value.into(),
                DirectoryField::Options => rule.options = value.into(),
            }
        }
        self
    }

    /// Returns true when both halves of the disk quota are set.
    pub fn has_quota(&self) -> bool {
        !self.quota_blocks.is_empty() && !self.quota_inodes.is_empty()
    }

    pub(crate) fn normalize_box_id(&mut self) {
        if self.box_id.is_empty() {
            self.box_id = DEFAULT_BOX_ID.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod env_var {
        use super::*;

        #[test]
        fn parse_name_only() {
            assert_eq!(EnvVar::parse("HOME"), EnvVar::new("HOME", ""));
        }

        #[test]
        fn parse_name_and_value() {
            assert_eq!(EnvVar::parse("PATH=/bin"), EnvVar::new("PATH", "/bin"));
        }

        #[test]
        fn parse_keeps_extra_equals_in_value() {
            assert_eq!(EnvVar::parse("OPTS=a=b"), EnvVar::new("OPTS", "a=b"));
        }

        #[test]
        fn display_omits_empty_value() {
            assert_eq!(EnvVar::new("B", "").to_string(), "B");
            assert_eq!(EnvVar::new("A", "1").to_string(), "A=1");
        }

        #[test]
        fn empty_name_is_inert() {
            assert!(EnvVar::new("", "x").is_inert());
            assert!(!EnvVar::new("A", "").is_inert());
        }
    }

    mod directory_rule {
        use super::*;

        #[test]
        fn parse_inside_only() {
            assert_eq!(
                DirectoryRule::parse("/box/data"),
                DirectoryRule::new("/box/data", "", "")
            );
        }

        #[test]
        fn parse_inside_outside_options() {
            assert_eq!(
                DirectoryRule::parse("/box/data=/home/u/data:rw"),
                DirectoryRule::new("/box/data", "/home/u/data", "rw")
            );
        }

        #[test]
        fn parse_inside_with_options() {
            assert_eq!(
                DirectoryRule::parse("/tmp:rw,dev"),
                DirectoryRule::new("/tmp", "", "rw,dev")
            );
        }

        #[test]
        fn display_matches_flag_grammar() {
            let rule = DirectoryRule::new("/box/data", "/home/u/data", "rw");
            assert_eq!(rule.to_string(), "/box/data=/home/u/data:rw");
            assert_eq!(DirectoryRule::new("/tmp", "", "").to_string(), "/tmp");
            assert_eq!(DirectoryRule::new("/tmp", "", "rw").to_string(), "/tmp:rw");
        }

        #[test]
        fn display_then_parse_keeps_rule() {
            for rule in [
                DirectoryRule::new("/box/data", "/home/u/data", "rw"),
                DirectoryRule::new("/tmp", "", "rw,dev"),
                DirectoryRule::new("/opt", "/srv/a=b", ""),
                DirectoryRule::new("/a", "/b:c", "noexec"),
            ] {
                assert_eq!(DirectoryRule::parse(rule.to_string()), rule);
            }
        }

        #[test]
        fn colon_in_outside_path_needs_trailing_colon() {
            let rule = DirectoryRule::new("/a", "/b:c", "");
            assert_eq!(rule.to_string(), "/a=/b:c");
            assert_eq!(
                DirectoryRule::parse(rule.to_string()),
                DirectoryRule::new("/a", "/b", "c")
            );
            assert_eq!(DirectoryRule::parse("/a=/b:c:"), rule);
        }
    }

    mod configuration {
        use super::*;

        #[test]
        fn default_values() {
            let config = Configuration::default();
            assert_eq!(config.box_id, "0");
            assert!(config.meta_file.is_empty());
            assert!(!config.stderr_to_stdout);
            assert!(config.env_vars.is_empty());
            assert!(config.directories.is_empty());
            assert!(!config.enable_cg);
            assert!(config.program.is_empty());
        }

        #[test]
        fn new_equals_default() {
            assert_eq!(Configuration::new(), Configuration::default());
        }

        #[test]
        fn empty_box_id_restores_default() {
            let config = Configuration::new().with_box_id("7").with_box_id("");
            assert_eq!(config.box_id, "0");
        }

        #[test]
        fn stderr_path_clears_stderr_to_stdout() {
            let config = Configuration::new()
                .with_stderr_to_stdout(true)
                .with_stderr_path("err.txt");
            assert_eq!(config.stderr_path, "err.txt");
            assert!(!config.stderr_to_stdout);
        }

        #[test]
        fn stderr_to_stdout_clears_stderr_path() {
            let config = Configuration::new()
                .with_stderr_path("err.txt")
                .with_stderr_to_stdout(true);
            assert!(config.stderr_path.is_empty());
            assert!(config.stderr_to_stdout);
        }

        #[test]
        fn clearing_stderr_path_keeps_stderr_to_stdout() {
            let config = Configuration::new()
                .with_stderr_to_stdout(true)
                .with_stderr_path("");
            assert!(config.stderr_to_stdout);
        }

        #[test]
        fn has_quota_requires_both_halves() {
            assert!(Configuration::new().with_quota("10", "20").has_quota());
            assert!(!Configuration::new().with_quota("10", "").has_quota());
            assert!(!Configuration::new().with_quota("", "20").has_quota());
        }

        #[test]
        fn env_vars_keep_insertion_order() {
            let config = Configuration::new()
                .with_env_var("B", "2")
                .with_env_var("A", "1");
            let keys: Vec<_> = config.env_vars.iter().map(|v| v.key.as_str()).collect();
            assert_eq!(keys, vec!["B", "A"]);
        }

        #[test]
        fn update_env_var_edits_one_component() {
            let config = Configuration::new()
                .push_env_var(EnvVar::default())
                .update_env_var(0, EnvVarField::Key, "LANG")
                .update_env_var(0, EnvVarField::Value, "C");
            assert_eq!(config.env_vars, vec![EnvVar::new("LANG", "C")]);
        }

        #[test]
        fn remove_env_var_out_of_range_is_noop() {
            let config = Configuration::new().with_env_var("A", "1");
            assert_eq!(config.clone().remove_env_var(5), config);
            assert!(config.remove_env_var(0).env_vars.is_empty());
        }

        #[test]
        fn directory_editing() {
            let config = Configuration::new()
                .with_directory(DirectoryRule::default())
                .with_directory(DirectoryRule::new("/tmp", "", ""))
                .update_directory(0, DirectoryField::Inside, "/box/data")
                .update_directory(0, DirectoryField::Outside, "/srv/data")
                .update_directory(0, DirectoryField::Options, "rw")
                .remove_directory(1);
            assert_eq!(
                config.directories,
                vec![DirectoryRule::new("/box/data", "/srv/data", "rw")]
            );
        }

        #[test]
        fn update_out_of_range_is_noop() {
            let config = Configuration::new().update_directory(3, DirectoryField::Inside, "/x");
            assert_eq!(config, Configuration::default());
        }
    }
}
