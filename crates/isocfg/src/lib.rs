//! Typed configuration compiler for the `isolate` sandbox.
//!
//! An isolate invocation is described by a [`Configuration`]. From it this
//! crate derives the command line ([`compile`]), advisory lint results
//! ([`validate`]) and a JSON export ([`to_text`] / [`from_text`]). Named
//! [`Preset`]s reset a configuration to a known starting point.
//!
//! # Quick Start
//!
//! ```rust
//! use isocfg::{EditingSession, Preset};
//!
//! let mut session = EditingSession::from_preset(Preset::Basic);
//! session.update(|c| c.with_program("./solution", ""));
//!
//! assert!(session.command().ends_with("--run -- ./solution"));
//! assert!(session.violations().is_empty());
//! ```
//!
//! Everything here is a pure value transform: nothing executes isolate or
//! touches the filesystem.

mod session;

// ============================================================================
// Core API
// ============================================================================

pub use session::EditingSession;

pub use isocfg_core::{
    Configuration, DEFAULT_BOX_ID, DirectoryField, DirectoryRule, EnvVar, EnvVarField,
};
pub use isocfg_core::{Field, Violation, ViolationCode, validate};
pub use isocfg_core::{Preset, apply_preset};
pub use isocfg_core::{compile, from_text, to_text};

// Errors
pub use isocfg_core::{Error, ImportError, Result};

// ============================================================================
// Advanced API
// ============================================================================

// Command line construction
pub use isocfg_core::{CmdlineArg, IsolateCmdline, Payload};

// Partial configurations
pub use isocfg_core::ConfigOverlay;
