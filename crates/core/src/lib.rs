pub mod cmdline;
pub mod config;
pub mod error;
pub mod export;
pub mod preset;
pub mod validate;

pub use cmdline::{CmdlineArg, IsolateCmdline, Payload, compile};
pub use config::{
    Configuration, DEFAULT_BOX_ID, DirectoryField, DirectoryRule, EnvVar, EnvVarField,
};
pub use error::{Error, ImportError, Result};
pub use export::{from_text, to_text};
pub use preset::{ConfigOverlay, Preset, apply_preset};
pub use validate::{Field, Violation, ViolationCode, validate};
