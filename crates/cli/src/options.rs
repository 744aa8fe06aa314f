//! Arguments shared by every command that builds a configuration.

use anyhow::Context;
use clap::Args;
use isocfg::{ConfigOverlay, Configuration, DirectoryRule, EnvVar, Preset, from_text};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the starting configuration comes from.
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Start from a named preset (see `isocfg presets`)
    #[arg(long, short, value_parser = parse_preset, conflicts_with = "config")]
    pub preset: Option<Preset>,

    /// Start from an exported JSON configuration ("-" reads stdin)
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

impl SourceArgs {
    pub fn load(&self) -> anyhow::Result<Configuration> {
        match (&self.preset, &self.config) {
            (Some(preset), _) => {
                debug!(preset = %preset, "starting from preset");
                Ok(preset.apply())
            }
            (None, Some(path)) => load_config_file(path),
            (None, None) => Ok(Configuration::default()),
        }
    }
}

pub fn load_config_file(path: &Path) -> anyhow::Result<Configuration> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read configuration from stdin")?;
        text
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    debug!(path = %path.display(), "importing configuration");
    from_text(&text).with_context(|| format!("failed to import {}", path.display()))
}

/// Per-field overrides applied on top of the starting configuration.
///
/// Flag names follow isolate's own options. Value flags replace the base
/// value; switches only turn options on. `--env` and `--dir` append to the
/// base lists.
#[derive(Args, Debug, Default)]
pub struct FieldArgs {
    /// Box identifier
    #[arg(long)]
    pub box_id: Option<String>,

    /// Meta file path
    #[arg(long)]
    pub meta: Option<String>,

    /// Redirect stdin from a file
    #[arg(long)]
    pub stdin: Option<String>,

    /// Redirect stdout to a file
    #[arg(long)]
    pub stdout: Option<String>,

    /// Redirect stderr to a file (clears --stderr-to-stdout)
    #[arg(long, conflicts_with = "stderr_to_stdout")]
    pub stderr: Option<String>,

    /// Redirect stderr to stdout (clears --stderr)
    #[arg(long)]
    pub stderr_to_stdout: bool,

    /// Working directory inside the box
    #[arg(long)]
    pub chdir: Option<String>,

    /// Pass --verbose to isolate
    #[arg(long)]
    pub verbose_box: bool,

    /// Pass --silent to isolate
    #[arg(long)]
    pub silent: bool,

    /// Pass --wait to isolate
    #[arg(long)]
    pub wait: bool,

    /// Memory limit in KB
    #[arg(long)]
    pub mem: Option<String>,

    /// CPU time limit in seconds
    #[arg(long)]
    pub time: Option<String>,

    /// Wall clock time limit in seconds
    #[arg(long)]
    pub wall_time: Option<String>,

    /// Extra grace time in seconds
    #[arg(long)]
    pub extra_time: Option<String>,

    /// Stack size limit in KB
    #[arg(long)]
    pub stack: Option<String>,

    /// Maximum number of open files
    #[arg(long)]
    pub open_files: Option<String>,

    /// Maximum file size in KB
    #[arg(long)]
    pub fsize: Option<String>,

    /// Disk quota (format: BLOCKS,INODES)
    #[arg(long, value_parser = parse_quota)]
    pub quota: Option<(String, String)>,

    /// Core dump size limit in KB
    #[arg(long)]
    pub core: Option<String>,

    /// Maximum number of processes
    #[arg(long)]
    pub processes: Option<String>,

    /// Environment rule (format: NAME or NAME=VALUE)
    #[arg(long, value_parser = parse_env)]
    pub env: Vec<EnvVar>,

    /// Inherit the full environment
    #[arg(long)]
    pub full_env: bool,

    /// Directory rule (format: INSIDE[=OUTSIDE][:OPTIONS])
    #[arg(long, value_parser = parse_dir)]
    pub dir: Vec<DirectoryRule>,

    /// Do not bind the default directories
    #[arg(long)]
    pub no_default_dirs: bool,

    /// Enable control groups
    #[arg(long)]
    pub cg: bool,

    /// Control group memory limit in KB
    #[arg(long)]
    pub cg_mem: Option<String>,

    /// Share the host network namespace
    #[arg(long)]
    pub share_net: bool,

    /// Inherit file descriptors
    #[arg(long)]
    pub inherit_fds: bool,

    /// Keep special files
    #[arg(long)]
    pub special_files: bool,

    /// Enable the TTY hack
    #[arg(long)]
    pub tty_hack: bool,

    /// Run the program as this uid
    #[arg(long)]
    pub as_uid: Option<String>,

    /// Run the program as this gid
    #[arg(long)]
    pub as_gid: Option<String>,

    /// Program to run inside the box
    #[arg(long)]
    pub program: Option<String>,

    /// Raw argument string passed after the program
    #[arg(long = "args", allow_hyphen_values = true)]
    pub arguments: Option<String>,
}

fn switch(enabled: bool) -> Option<bool> {
    enabled.then_some(true)
}

impl FieldArgs {
    /// Applies these overrides to `base`.
    pub fn apply(self, base: Configuration) -> Configuration {
        let (quota_blocks, quota_inodes) = match self.quota {
            Some((blocks, inodes)) => (Some(blocks), Some(inodes)),
            None => (None, None),
        };

        let overlay = ConfigOverlay {
            box_id: self.box_id,
            meta_file: self.meta,
            stdin: self.stdin,
            stdout: self.stdout,
            chdir: self.chdir,
            verbose: switch(self.verbose_box),
            silent: switch(self.silent),
            wait: switch(self.wait),
            memory: self.mem,
            time: self.time,
            wall_time: self.wall_time,
            extra_time: self.extra_time,
            stack: self.stack,
            open_files: self.open_files,
            file_size: self.fsize,
            quota_blocks,
            quota_inodes,
            core_size: self.core,
            processes: self.processes,
            full_env: switch(self.full_env),
            no_default_dirs: switch(self.no_default_dirs),
            enable_cg: switch(self.cg),
            cg_mem: self.cg_mem,
            share_net: switch(self.share_net),
            inherit_fds: switch(self.inherit_fds),
            special_files: switch(self.special_files),
            tty_hack: switch(self.tty_hack),
            as_uid: self.as_uid,
            as_gid: self.as_gid,
            program: self.program,
            arguments: self.arguments,
            ..ConfigOverlay::default()
        };

        let mut config = overlay.apply(base);
        if let Some(path) = self.stderr {
            config = config.with_stderr_path(path);
        }
        if self.stderr_to_stdout {
            config = config.with_stderr_to_stdout(true);
        }
        config = self.env.into_iter().fold(config, Configuration::push_env_var);
        self.dir.into_iter().fold(config, Configuration::with_directory)
    }
}

fn parse_preset(s: &str) -> Result<Preset, String> {
    s.parse::<Preset>().map_err(|e| {
        let names: Vec<_> = Preset::ALL.iter().map(|p| p.name()).collect();
        format!("{e}, expected one of: {}", names.join(", "))
    })
}

fn parse_quota(s: &str) -> Result<(String, String), String> {
    let (blocks, inodes) = s
        .split_once(',')
        .ok_or_else(|| "quota format must be 'BLOCKS,INODES'".to_string())?;
    if blocks.is_empty() || inodes.is_empty() {
        return Err("quota needs both blocks and inodes".to_string());
    }
    Ok((blocks.to_string(), inodes.to_string()))
}

fn parse_env(s: &str) -> Result<EnvVar, String> {
    let var = EnvVar::parse(s);
    if var.key.is_empty() {
        return Err("environment variable name cannot be empty".to_string());
    }
    Ok(var)
}

fn parse_dir(s: &str) -> Result<DirectoryRule, String> {
    let rule = DirectoryRule::parse(s);
    if rule.inside.is_empty() {
        return Err("directory rule needs an inside path".to_string());
    }
    Ok(rule)
}
