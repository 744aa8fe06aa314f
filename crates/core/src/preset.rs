//! Named presets and the field-by-field overlay they are built from.

use crate::config::{Configuration, DirectoryRule, EnvVar};
use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// A partial [`Configuration`]: `Some` fields replace the base value, `None`
/// fields keep it.
///
/// [`ConfigOverlay::apply`] destructures the overlay exhaustively, so a field
/// added to the overlay must also be merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverlay {
    pub box_id: Option<String>,
    pub meta_file: Option<String>,
    pub stdin: Option<String>,
    pub stdout: Option<String>,
    pub stderr_path: Option<String>,
    pub stderr_to_stdout: Option<bool>,
    pub chdir: Option<String>,
    pub verbose: Option<bool>,
    pub silent: Option<bool>,
    pub wait: Option<bool>,
    pub memory: Option<String>,
    pub time: Option<String>,
    pub wall_time: Option<String>,
    pub extra_time: Option<String>,
    pub stack: Option<String>,
    pub open_files: Option<String>,
    pub file_size: Option<String>,
    pub quota_blocks: Option<String>,
    pub quota_inodes: Option<String>,
    pub core_size: Option<String>,
    pub processes: Option<String>,
    pub env_vars: Option<Vec<EnvVar>>,
    pub full_env: Option<bool>,
    pub directories: Option<Vec<DirectoryRule>>,
    pub no_default_dirs: Option<bool>,
    pub enable_cg: Option<bool>,
    pub cg_mem: Option<String>,
    pub share_net: Option<bool>,
    pub inherit_fds: Option<bool>,
    pub special_files: Option<bool>,
    pub tty_hack: Option<bool>,
    pub as_uid: Option<String>,
    pub as_gid: Option<String>,
    pub program: Option<String>,
    pub arguments: Option<String>,
}

fn merge<T>(base: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *base = value;
    }
}

impl ConfigOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlays the set fields onto `base`.
    ///
    /// Fields are merged verbatim. An overlay that sets both a stderr path and
    /// stderr-to-stdout produces a configuration the validator will flag, and
    /// an empty box id falls back to the default.
    pub fn apply(self, mut base: Configuration) -> Configuration {
        let Self {
            box_id,
            meta_file,
            stdin,
            stdout,
            stderr_path,
            stderr_to_stdout,
            chdir,
            verbose,
            silent,
            wait,
            memory,
            time,
            wall_time,
            extra_time,
            stack,
            open_files,
            file_size,
            quota_blocks,
            quota_inodes,
            core_size,
            processes,
            env_vars,
            full_env,
            directories,
            no_default_dirs,
            enable_cg,
            cg_mem,
            share_net,
            inherit_fds,
            special_files,
            tty_hack,
            as_uid,
            as_gid,
            program,
            arguments,
        } = self;

        merge(&mut base.box_id, box_id);
        merge(&mut base.meta_file, meta_file);
        merge(&mut base.stdin, stdin);
        merge(&mut base.stdout, stdout);
        merge(&mut base.stderr_path, stderr_path);
        merge(&mut base.stderr_to_stdout, stderr_to_stdout);
        merge(&mut base.chdir, chdir);
        merge(&mut base.verbose, verbose);
        merge(&mut base.silent, silent);
        merge(&mut base.wait, wait);
        merge(&mut base.memory, memory);
        merge(&mut base.time, time);
        merge(&mut base.wall_time, wall_time);
        merge(&mut base.extra_time, extra_time);
        merge(&mut base.stack, stack);
        merge(&mut base.open_files, open_files);
        merge(&mut base.file_size, file_size);
        merge(&mut base.quota_blocks, quota_blocks);
        merge(&mut base.quota_inodes, quota_inodes);
        merge(&mut base.core_size, core_size);
        merge(&mut base.processes, processes);
        merge(&mut base.env_vars, env_vars);
        merge(&mut base.full_env, full_env);
        merge(&mut base.directories, directories);
        merge(&mut base.no_default_dirs, no_default_dirs);
        merge(&mut base.enable_cg, enable_cg);
        merge(&mut base.cg_mem, cg_mem);
        merge(&mut base.share_net, share_net);
        merge(&mut base.inherit_fds, inherit_fds);
        merge(&mut base.special_files, special_files);
        merge(&mut base.tty_hack, tty_hack);
        merge(&mut base.as_uid, as_uid);
        merge(&mut base.as_gid, as_gid);
        merge(&mut base.program, program);
        merge(&mut base.arguments, arguments);

        base.normalize_box_id();
        base
    }
}

/// The fixed preset catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Basic,
    StrictLimits,
    PermissiveDevelopment,
}

impl Preset {
    pub const ALL: [Preset; 3] = [
        Preset::Basic,
        Preset::StrictLimits,
        Preset::PermissiveDevelopment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::StrictLimits => "strict-limits",
            Self::PermissiveDevelopment => "permissive-development",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Basic => "Typical judge run with redirected I/O and modest limits",
            Self::StrictLimits => "Tight resource ceilings with control groups enabled",
            Self::PermissiveDevelopment => {
                "Relaxed box for debugging: full environment, network, writable /tmp"
            }
        }
    }

    pub fn overlay(&self) -> ConfigOverlay {
        match self {
            Self::Basic => ConfigOverlay {
                meta_file: Some("meta.txt".to_string()),
                stdin: Some("input.txt".to_string()),
                stdout: Some("output.txt".to_string()),
                stderr_to_stdout: Some(true),
                memory: Some("262144".to_string()),
                time: Some("1".to_string()),
                wall_time: Some("2".to_string()),
                extra_time: Some("0.5".to_string()),
                processes: Some("1".to_string()),
                ..ConfigOverlay::default()
            },
            Self::StrictLimits => ConfigOverlay {
                silent: Some(true),
                memory: Some("65536".to_string()),
                time: Some("1".to_string()),
                wall_time: Some("2".to_string()),
                extra_time: Some("0.2".to_string()),
                stack: Some("8192".to_string()),
                open_files: Some("16".to_string()),
                file_size: Some("1024".to_string()),
                quota_blocks: Some("1000".to_string()),
                quota_inodes: Some("100".to_string()),
                core_size: Some("0".to_string()),
                processes: Some("1".to_string()),
                enable_cg: Some(true),
                cg_mem: Some("65536".to_string()),
                ..ConfigOverlay::default()
            },
            Self::PermissiveDevelopment => ConfigOverlay {
                verbose: Some(true),
                wait: Some(true),
                memory: Some("1048576".to_string()),
                time: Some("10".to_string()),
                wall_time: Some("30".to_string()),
                processes: Some("64".to_string()),
                full_env: Some(true),
                directories: Some(vec![DirectoryRule::new("/tmp", "", "rw")]),
                share_net: Some(true),
                inherit_fds: Some(true),
                special_files: Some(true),
                tty_hack: Some(true),
                ..ConfigOverlay::default()
            },
        }
    }

    /// Returns the defaults with this preset's overlay applied.
    ///
    /// The result never depends on any previously active configuration.
    pub fn apply(&self) -> Configuration {
        self.overlay().apply(Configuration::default())
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| Error::UnknownPreset {
                name: s.to_string(),
            })
    }
}

/// Applies the preset called `name`.
pub fn apply_preset(name: &str) -> crate::Result<Configuration> {
    Ok(name.parse::<Preset>()?.apply())
}
