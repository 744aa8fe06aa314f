use crate::config::Configuration;
use std::fmt;
use tracing::trace;

/// Name of the executor every compiled command starts with.
pub const PROGRAM_NAME: &str = "isolate";

/// Mode flag appended after all options.
pub const RUN_FLAG: &str = "run";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdlineArg {
    KeyValue { key: String, value: String },
    Flag(String),
}

impl CmdlineArg {
    pub fn kv(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::KeyValue {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn flag(name: impl Into<String>) -> Self {
        Self::Flag(name.into())
    }
}

impl fmt::Display for CmdlineArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyValue { key, value } => write!(f, "--{key}={value}"),
            Self::Flag(name) => write!(f, "--{name}"),
        }
    }
}

/// Program and raw argument string run inside the box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub program: String,
    pub arguments: String,
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-- {}", self.program)?;
        if !self.arguments.is_empty() {
            write!(f, " {}", self.arguments)?;
        }
        Ok(())
    }
}

/// Ordered isolate command line.
///
/// Arguments render in insertion order. Repeated keys are kept, since
/// `--env` and `--dir` may appear many times. The `--run` flag always
/// follows the options and precedes the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IsolateCmdline {
    args: Vec<CmdlineArg>,
    payload: Option<Payload>,
}

impl IsolateCmdline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the command line for `config` in the fixed group order.
    pub fn from_config(config: &Configuration) -> Self {
        let mut cmdline = Self::new();
        cmdline
            .push_identity(config)
            .push_limits(config)
            .push_environment(config)
            .push_filesystem(config)
            .push_cgroups(config)
            .push_relaxations(config);

        if !config.program.is_empty() {
            cmdline.payload(&config.program, &config.arguments);
        }
        cmdline
    }

    pub fn arg(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.args.push(CmdlineArg::kv(key, value));
        self
    }

    pub fn flag(&mut self, name: impl Into<String>) -> &mut Self {
        self.args.push(CmdlineArg::flag(name));
        self
    }

    /// Adds `--key=value` only when `value` is non-empty.
    pub fn arg_if_set(&mut self, key: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.arg(key, value);
        }
        self
    }

    /// Adds `--name` only when `enabled`.
    pub fn flag_if(&mut self, name: &str, enabled: bool) -> &mut Self {
        if enabled {
            self.flag(name);
        }
        self
    }

    pub fn payload(&mut self, program: impl Into<String>, arguments: impl Into<String>) -> &mut Self {
        self.payload = Some(Payload {
            program: program.into(),
            arguments: arguments.into(),
        });
        self
    }

    pub fn args(&self) -> &[CmdlineArg] {
        &self.args
    }

    pub fn build(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 3);
        parts.push(PROGRAM_NAME.to_string());
        parts.extend(self.args.iter().map(|a| a.to_string()));
        parts.push(CmdlineArg::flag(RUN_FLAG).to_string());
        if let Some(payload) = &self.payload {
            parts.push(payload.to_string());
        }
        parts.join(" ")
    }

    fn push_identity(&mut self, config: &Configuration) -> &mut Self {
        self.arg_if_set("box-id", &config.box_id)
            .arg_if_set("meta", &config.meta_file)
            .arg_if_set("stdin", &config.stdin)
            .arg_if_set("stdout", &config.stdout);

        // stderr-to-stdout wins over any stderr path
        if config.stderr_to_stdout {
            self.flag("stderr-to-stdout");
        } else {
            self.arg_if_set("stderr", &config.stderr_path);
        }

        self.arg_if_set("chdir", &config.chdir)
            .flag_if("verbose", config.verbose)
            .flag_if("silent", config.silent)
            .flag_if("wait", config.wait)
    }

    fn push_limits(&mut self, config: &Configuration) -> &mut Self {
        self.arg_if_set("mem", &config.memory)
            .arg_if_set("time", &config.time)
            .arg_if_set("wall-time", &config.wall_time)
            .arg_if_set("extra-time", &config.extra_time)
            .arg_if_set("stack", &config.stack)
            .arg_if_set("open-files", &config.open_files)
            .arg_if_set("fsize", &config.file_size);

        if config.has_quota() {
            self.arg(
                "quota",
                format!("{},{}", config.quota_blocks, config.quota_inodes),
            );
        }

        self.arg_if_set("core", &config.core_size)
            .arg_if_set("processes", &config.processes)
    }

    fn push_environment(&mut self, config: &Configuration) -> &mut Self {
        for var in config.env_vars.iter().filter(|v| !v.is_inert()) {
            self.arg("env", var.to_string());
        }
        self.flag_if("full-env", config.full_env)
    }

    fn push_filesystem(&mut self, config: &Configuration) -> &mut Self {
        for rule in config.directories.iter().filter(|r| !r.is_inert()) {
            self.arg("dir", rule.to_string());
        }
        self.flag_if("no-default-dirs", config.no_default_dirs)
    }

    fn push_cgroups(&mut self, config: &Configuration) -> &mut Self {
        // cg-mem is emitted even when --cg is off; isolate treats them separately
        self.flag_if("cg", config.enable_cg)
            .arg_if_set("cg-mem", &config.cg_mem)
    }

    fn push_relaxations(&mut self, config: &Configuration) -> &mut Self {
        self.flag_if("share-net", config.share_net)
            .flag_if("inherit-fds", config.inherit_fds)
            .flag_if("special-files", config.special_files)
            .flag_if("tty-hack", config.tty_hack)
            .arg_if_set("as-uid", &config.as_uid)
            .arg_if_set("as-gid", &config.as_gid)
    }
}

impl fmt::Display for IsolateCmdline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

/// Compiles `config` into a single isolate command line.
///
/// Total for every configuration: field text is passed through verbatim and
/// unset fields are omitted rather than defaulted.
///
/// The box id counts as set whenever it is non-empty, so the default
/// configuration (box id `"0"`) compiles to `isolate --box-id=0 --run`. Only a
/// configuration with every field empty, box id included, compiles to the bare
/// `isolate --run`.
pub fn compile(config: &Configuration) -> String {
    let cmdline = IsolateCmdline::from_config(config);
    trace!(args = cmdline.args().len(), "compiled isolate command line");
    cmdline.build()
}
