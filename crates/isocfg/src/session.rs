use isocfg_core::{
    Configuration, ImportError, Preset, Result, Violation, compile, from_text, to_text, validate,
};
use tracing::{debug, warn};

/// An editing session owning exactly one [`Configuration`].
///
/// Every replacement of the configuration recompiles the command line
/// immediately, so [`command`](Self::command) always reflects the current
/// value. Nothing else is cached.
///
/// # Example
///
/// ```rust
/// use isocfg::EditingSession;
///
/// let mut session = EditingSession::new();
/// assert_eq!(session.command(), "isolate --box-id=0 --run");
///
/// session.update(|c| c.with_env_var("LANG", "C"));
/// assert_eq!(session.command(), "isolate --box-id=0 --env=LANG=C --run");
///
/// // A failed import leaves the session as it was.
/// assert!(session.import("{ not json").is_err());
/// assert_eq!(session.config().env_vars.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct EditingSession {
    config: Configuration,
    command: String,
}

impl EditingSession {
    /// Starts a session from the default configuration.
    pub fn new() -> Self {
        Self::with_config(Configuration::default())
    }

    pub fn with_config(config: Configuration) -> Self {
        let command = compile(&config);
        Self { config, command }
    }

    pub fn from_preset(preset: Preset) -> Self {
        Self::with_config(preset.apply())
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// The command line compiled from the current configuration.
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn violations(&self) -> Vec<Violation> {
        validate(&self.config)
    }

    /// Replaces the configuration with the value returned by `f`.
    pub fn update<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(Configuration) -> Configuration,
    {
        let next = f(self.config.clone());
        self.replace(next)
    }

    pub fn replace(&mut self, config: Configuration) -> &mut Self {
        self.command = compile(&config);
        self.config = config;
        debug!(command = %self.command, "configuration replaced");
        self
    }

    /// Resets to the defaults, then applies `preset`.
    pub fn apply_preset(&mut self, preset: Preset) -> &mut Self {
        debug!(preset = %preset, "applying preset");
        self.replace(preset.apply())
    }

    pub fn reset(&mut self) -> &mut Self {
        self.replace(Configuration::default())
    }

    /// Replaces the configuration with one decoded from exported text.
    ///
    /// On error the current configuration and command are left untouched.
    pub fn import(&mut self, text: &str) -> std::result::Result<(), ImportError> {
        match from_text(text) {
            Ok(config) => {
                self.replace(config);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "import rejected, keeping current configuration");
                Err(err)
            }
        }
    }

    pub fn export(&self) -> Result<String> {
        to_text(&self.config)
    }
}

impl Default for EditingSession {
    fn default() -> Self {
        Self::new()
    }
}
