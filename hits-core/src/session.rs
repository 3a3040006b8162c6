//! Process-wide session state shared by the interpreter, advisory client and renderer

use crate::config::{Preferences, DEFAULT_OVERLAY_DURATION, DEFAULT_SERVER, OVERLAY_MODE_OFF};

/// Mutable state for one plugin lifetime.
///
/// Built by [`SessionContext::from_preferences`], which resolves every
/// persisted value to a usable default before anything reads it:
/// `server` is never empty and `overlay_ttl_secs` is always set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Star system the host last reported
    pub current_system: Option<String>,
    /// Commander the host last reported
    pub current_commander: Option<String>,
    /// HITS server as `host:port`
    pub server: String,
    /// Overlay message lifetime in seconds
    pub overlay_ttl_secs: u64,
    /// Whether location advisories are shown
    pub advisory_enabled: bool,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::from_preferences(&Preferences::default())
    }
}

impl SessionContext {
    /// Resolve a context from stored preferences, falling back to defaults
    pub fn from_preferences(preferences: &Preferences) -> Self {
        let mut ctx = Self {
            current_system: None,
            current_commander: None,
            server: DEFAULT_SERVER.to_string(),
            overlay_ttl_secs: DEFAULT_OVERLAY_DURATION,
            advisory_enabled: true,
        };
        ctx.apply_preferences(preferences);
        ctx
    }

    /// Apply edited preferences, keeping the transient fields
    pub fn apply_preferences(&mut self, preferences: &Preferences) {
        self.server = preferences
            .server
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SERVER)
            .to_string();

        self.overlay_ttl_secs = preferences
            .overlay_duration
            .as_deref()
            .and_then(|d| d.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_OVERLAY_DURATION);

        self.advisory_enabled = preferences
            .overlay_mode
            .as_deref()
            .map(|mode| mode.trim() != OVERLAY_MODE_OFF)
            .unwrap_or(true);
    }

    /// The persisted subset of this context, in stored string form
    pub fn to_preferences(&self) -> Preferences {
        Preferences {
            server: Some(self.server.clone()),
            overlay_duration: Some(self.overlay_ttl_secs.to_string()),
            overlay_mode: Some(
                if self.advisory_enabled {
                    "on"
                } else {
                    OVERLAY_MODE_OFF
                }
                .to_string(),
            ),
        }
    }

    /// Record the ambient commander and system that accompany every journal entry
    pub fn observe(&mut self, commander: Option<&str>, system: Option<&str>) {
        self.current_commander = commander.map(str::to_string);
        self.current_system = system.map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_nothing_stored() {
        let ctx = SessionContext::default();
        assert_eq!(ctx.server, "edmc.edhits.space:8080");
        assert_eq!(ctx.overlay_ttl_secs, 4);
        assert!(ctx.advisory_enabled);
        assert!(ctx.current_system.is_none());
        assert!(ctx.current_commander.is_none());
    }

    #[test]
    fn test_malformed_preferences_fall_back() {
        let prefs = Preferences {
            server: Some("   ".to_string()),
            overlay_duration: Some("soon".to_string()),
            overlay_mode: Some("maybe".to_string()),
        };
        let ctx = SessionContext::from_preferences(&prefs);
        assert_eq!(ctx.server, DEFAULT_SERVER);
        assert_eq!(ctx.overlay_ttl_secs, DEFAULT_OVERLAY_DURATION);
        // Anything but "off" keeps advisories on
        assert!(ctx.advisory_enabled);
    }

    #[test]
    fn test_stored_preferences_are_used() {
        let prefs = Preferences {
            server: Some("localhost:8080".to_string()),
            overlay_duration: Some(" 9 ".to_string()),
            overlay_mode: Some("off".to_string()),
        };
        let ctx = SessionContext::from_preferences(&prefs);
        assert_eq!(ctx.server, "localhost:8080");
        assert_eq!(ctx.overlay_ttl_secs, 9);
        assert!(!ctx.advisory_enabled);
        assert_eq!(
            ctx.to_preferences(),
            Preferences {
                server: Some("localhost:8080".to_string()),
                overlay_duration: Some("9".to_string()),
                overlay_mode: Some("off".to_string()),
            }
        );
    }

    #[test]
    fn test_apply_preferences_keeps_transient_state() {
        let mut ctx = SessionContext::default();
        ctx.observe(Some("Jameson"), Some("Sol"));

        ctx.apply_preferences(&Preferences {
            server: Some("other:1".to_string()),
            ..Default::default()
        });

        assert_eq!(ctx.server, "other:1");
        assert_eq!(ctx.current_system.as_deref(), Some("Sol"));
        assert_eq!(ctx.current_commander.as_deref(), Some("Jameson"));
    }

    #[test]
    fn test_observe_overwrites_ambient_fields() {
        let mut ctx = SessionContext::default();
        ctx.observe(Some("Jameson"), Some("Sol"));
        ctx.observe(Some("Jameson"), None);
        assert!(ctx.current_system.is_none());
    }
}
