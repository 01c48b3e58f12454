use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::engine::RulesEngine;
use crate::error::RulesError;

impl<C> RulesEngine<C> {
    /// Remember `path` as the rules file and load it.
    ///
    /// The path is kept even if loading fails, so a corrected file can be
    /// picked up with [`reload_rules()`](Self::reload_rules).
    ///
    /// # Errors
    ///
    /// See [`reload_rules()`](Self::reload_rules).
    pub fn load_rules_file(&self, path: impl Into<PathBuf>) -> Result<usize, RulesError> {
        *self.rules_file() = Some(path.into());
        self.reload_rules()
    }

    /// Re-read the rules file and make it the active ruleset. A file that
    /// does not exist is first created with the default rules text.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NoRulesFile`] if no file was set, and the I/O or
    /// parse error otherwise. On error the active ruleset is unchanged.
    pub fn reload_rules(&self) -> Result<usize, RulesError> {
        let path = self.rules_file().clone().ok_or(RulesError::NoRulesFile)?;
        let result = self.load_from(&path);
        match &result {
            Ok(count) => info!("{}: Loaded {count} rules.", path.display()),
            Err(err) => error!("{}: {err}", path.display()),
        }
        result
    }

    fn load_from(&self, path: &Path) -> Result<usize, RulesError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                fs::write(path, &self.domain.default_rules)?;
                self.domain.default_rules.clone()
            }
            Err(err) => return Err(err.into()),
        };

        #[cfg(feature = "fingerprint")]
        {
            let active = self.ruleset();
            if active.source_hash() == Some(&blake3::hash(text.as_bytes())) {
                tracing::debug!(path = %path.display(), "rules file unchanged");
                return Ok(active.len());
            }
        }

        Ok(self.load_rules_raw(&text)?)
    }
}
