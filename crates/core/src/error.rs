/// Reasons an exported configuration could not be imported.
///
/// Import is all-or-nothing: any of these leaves the caller's current
/// configuration untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("nothing to import: input is empty")]
    Empty,

    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("not a configuration (line {line}, column {column}): {message}")]
    Shape {
        line: usize,
        column: usize,
        message: String,
    },
}

/// Errors that can occur when working with isolate configurations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown preset '{name}'")]
    UnknownPreset { name: String },

    #[error("import failed: {0}")]
    Import(#[from] ImportError),

    #[error("export failed: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
