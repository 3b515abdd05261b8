// Configuration for the Tern runtime

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::RuntimeResult;

/// File searched for by `RuntimeConfig::from_dir`
pub const CONFIG_FILE_NAME: &str = "tern-runtime.json";

/// Environment variable overriding the panic mode
pub const CONTINUE_ON_PANIC_ENV: &str = "TERN_CONTINUE_ON_PANIC";

/// What the panic primitive does after reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanicMode {
    /// Report, then terminate the process
    Abort,
    /// Report, then hand the (otherwise invalid) result back to the caller.
    /// Meant for fuzzing and testing builds.
    Continue,
}

impl Default for PanicMode {
    fn default() -> Self {
        if cfg!(feature = "continue-on-panic") {
            PanicMode::Continue
        } else {
            PanicMode::Abort
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Panic behaviour; defaults to the build-time choice
    #[serde(default)]
    pub panic_mode: PanicMode,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            panic_mode: PanicMode::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn with_panic_mode(panic_mode: PanicMode) -> Self {
        Self { panic_mode }
    }

    /// Load configuration from a tern-runtime.json file
    pub fn from_file<P: AsRef<Path>>(path: P) -> RuntimeResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: RuntimeConfig = serde_json::from_str(&content)?;
        log::debug!(
            "loaded runtime config from {}: {:?}",
            path.as_ref().display(),
            config
        );
        Ok(config)
    }

    /// Load configuration from directory (searches for tern-runtime.json)
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> RuntimeResult<Self> {
        let mut current = Some(dir.as_ref());
        while let Some(candidate) = current {
            let config_path = candidate.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Self::from_file(config_path);
            }
            current = candidate.parent();
        }

        log::trace!(
            "no {} above {}, using defaults",
            CONFIG_FILE_NAME,
            dir.as_ref().display()
        );
        Ok(Self::default())
    }

    /// Defaults with the environment override applied
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Self {
        let raw = std::env::var(CONTINUE_ON_PANIC_ENV).ok();
        self.with_env_value(raw.as_deref())
    }

    /// Apply a raw `TERN_CONTINUE_ON_PANIC` value. Unrecognized values leave
    /// the configuration unchanged.
    pub fn with_env_value(mut self, raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return self;
        };

        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => self.panic_mode = PanicMode::Continue,
            "0" | "false" | "no" | "off" => self.panic_mode = PanicMode::Abort,
            other => log::warn!(
                "ignoring {}={:?}: expected a boolean",
                CONTINUE_ON_PANIC_ENV,
                other
            ),
        }
        self
    }

    pub fn to_json(&self) -> RuntimeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> RuntimeResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Create example configuration file
    pub fn example() -> RuntimeResult<String> {
        Self::default().to_json()
    }
}
