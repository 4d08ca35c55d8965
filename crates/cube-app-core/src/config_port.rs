// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config port for loading/saving client preferences.

use crate::config::{ConfigService, ConfigStore};
use crate::prefs::{ClientPrefs, CLIENT_PREFS_KEY};

/// Config-facing port for loading/saving client preferences.
pub trait ConfigPort {
    /// Load client preferences (returns None if missing or unreadable).
    fn load_prefs(&self) -> Option<ClientPrefs>;
    /// Persist client preferences (best-effort; failures are logged).
    fn save_prefs(&self, prefs: &ClientPrefs);
}

impl<S> ConfigPort for ConfigService<S>
where
    S: ConfigStore,
{
    fn load_prefs(&self) -> Option<ClientPrefs> {
        match self.load(CLIENT_PREFS_KEY) {
            Ok(prefs) => prefs,
            Err(err) => {
                tracing::warn!(%err, "client prefs unreadable; using defaults");
                None
            }
        }
    }

    fn save_prefs(&self, prefs: &ClientPrefs) {
        if let Err(err) = self.save(CLIENT_PREFS_KEY, prefs) {
            tracing::warn!(%err, "failed to persist client prefs");
        }
    }
}
