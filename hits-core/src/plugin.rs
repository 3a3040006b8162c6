//! Plugin lifecycle and the advisory pipeline
//!
//! [`Plugin`] is what the host talks to: `start`, one `journal_entry` call per
//! journal line, `prefs_changed` when the user edits settings, and `stop`.
//! Everything runs on the caller's thread; network calls block it through a
//! private current-thread runtime.
//!
//! `journal_entry` is the error boundary. Advisory and overlay failures are
//! logged (and, for location checks, shown as a diagnostic line) but never
//! returned to the host.

use std::path::PathBuf;
use std::time::Duration;

use crate::advisory::{AdvisoryClient, CrimeReport, LocationAdvisory};
use crate::config::{Config, Preferences};
use crate::error::{Error, Result};
use crate::interpreter::{interpret, Action};
use crate::journal::JournalEvent;
use crate::overlay::{OverlaySink, Renderer, Slot};
use crate::session::SessionContext;

/// Counters for one plugin lifetime
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PluginStats {
    /// Journal entries handled
    pub entries: usize,
    /// Location checks sent to the server
    pub locations_checked: usize,
    /// Crime reports accepted by the server
    pub crimes_reported: usize,
    /// Failed or rejected advisory calls
    pub failures: usize,
}

/// The ED:HITS plugin
pub struct Plugin<S> {
    config: Config,
    config_path: PathBuf,
    ctx: SessionContext,
    client: AdvisoryClient,
    renderer: Renderer<S>,
    runtime: tokio::runtime::Runtime,
    stats: PluginStats,
}

impl<S: OverlaySink> Plugin<S> {
    /// Build the plugin without touching the overlay or the network
    ///
    /// The session context is resolved from the stored preferences here, so
    /// every default is in place before the first entry is handled.
    pub fn new(config: Config, sink: S) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Config(format!("failed to create runtime: {}", e)))?;

        let client = AdvisoryClient::new(&config.advisory)?;
        let ctx = SessionContext::from_preferences(&config.preferences);

        Ok(Self {
            config,
            config_path: Config::config_path(),
            ctx,
            client,
            renderer: Renderer::new(sink),
            runtime,
            stats: PluginStats::default(),
        })
    }

    /// Persist preference edits to this file instead of the default config path
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Acquire the overlay and announce the plugin
    pub fn start(&mut self) {
        if let Err(e) = self.renderer.sink_mut().connect() {
            tracing::warn!(error = %e, "Overlay not reachable at startup");
        }

        let settle = Duration::from_millis(self.config.overlay.settle_ms);
        if !settle.is_zero() {
            std::thread::sleep(settle);
        }

        tracing::info!(
            server = %self.ctx.server,
            ttl = self.ctx.overlay_ttl_secs,
            advisory_enabled = self.ctx.advisory_enabled,
            "ED:HITS plugin started"
        );
        self.renderer
            .notify("ED:HITS Plugin Loaded", self.ctx.overlay_ttl_secs);
    }

    /// Shut the overlay down
    pub fn stop(&mut self) {
        tracing::info!(
            entries = self.stats.entries,
            locations_checked = self.stats.locations_checked,
            crimes_reported = self.stats.crimes_reported,
            failures = self.stats.failures,
            "ED:HITS plugin stopping"
        );
        self.renderer.exit();
    }

    /// Handle one journal entry with the ambient commander and star system
    pub fn journal_entry(
        &mut self,
        commander: Option<&str>,
        system: Option<&str>,
        event: &JournalEvent,
    ) {
        self.ctx.observe(commander, system);
        self.stats.entries += 1;
        tracing::trace!(kind = event.kind(), ?commander, ?system, "Journal entry");

        for action in interpret(event, &self.ctx) {
            match action {
                Action::CheckLocation { system, announce } => {
                    if announce {
                        self.renderer.header(
                            &format!("Checking HITS for {}", system),
                            self.ctx.overlay_ttl_secs,
                        );
                    }
                    self.check_location(&system);
                }
                Action::ReportCrime(report) => self.submit_crime(&report),
            }
        }
    }

    /// Handle one raw journal line; malformed lines are logged and skipped
    pub fn journal_entry_json(&mut self, commander: Option<&str>, system: Option<&str>, line: &str) {
        match JournalEvent::from_json(line) {
            Ok(event) => self.journal_entry(commander, system, &event),
            Err(e) => tracing::warn!(error = %e, "Skipping malformed journal entry"),
        }
    }

    /// Query the server about a system and render the result
    pub fn check_location(&mut self, system: &str) {
        if !self.ctx.advisory_enabled {
            tracing::debug!(system = %system, "Traffic reports off, skipping location check");
            return;
        }

        let ttl = self.ctx.overlay_ttl_secs;
        self.renderer
            .info(None, Some(&format!("Checking location {}..", system)), None, ttl);

        self.stats.locations_checked += 1;
        match self.fetch_location(system) {
            Ok(Some(advisory)) => {
                for (slot, text) in advisory_lines(system, &advisory, self.client.hours()) {
                    self.renderer.show(slot, &text, ttl);
                }
            }
            Ok(None) => {}
            Err(e) => {
                self.stats.failures += 1;
                tracing::warn!(system = %system, error = %e, "Location check failed");
                self.renderer.info(
                    None,
                    None,
                    Some(&format!("Error.. {} {}", e.kind(), e)),
                    ttl,
                );
            }
        }
    }

    fn fetch_location(&self, system: &str) -> Result<Option<LocationAdvisory>> {
        let pacing = Duration::from_millis(self.config.advisory.pacing_ms);
        let server = self.ctx.server.as_str();

        self.runtime.block_on(async {
            tokio::time::sleep(pacing).await;
            self.client.check_location(system, server).await
        })
    }

    /// Send a crime report; failures are logged and dropped
    pub fn submit_crime(&mut self, report: &CrimeReport) {
        let server = self.ctx.server.as_str();
        let result = self
            .runtime
            .block_on(self.client.submit_crime(report, server));

        match result {
            Ok(true) => {
                self.stats.crimes_reported += 1;
                self.renderer.info(
                    None,
                    None,
                    Some(&format!("Reported {}", report.criminal)),
                    self.ctx.overlay_ttl_secs,
                );
            }
            Ok(false) => self.stats.failures += 1,
            Err(e) => {
                self.stats.failures += 1;
                tracing::warn!(criminal = %report.criminal, error = %e, "Crime report failed");
            }
        }
    }

    /// Apply and persist edited preferences
    ///
    /// The new values take effect on the next call; a failed save is logged
    /// and the in-memory values are kept.
    pub fn prefs_changed(&mut self, preferences: Preferences) {
        self.ctx.apply_preferences(&preferences);
        self.config.preferences = self.ctx.to_preferences();

        if let Err(e) = self.config.save_to(&self.config_path) {
            tracing::warn!(path = %self.config_path.display(), error = %e, "Failed to save preferences");
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self) -> &PluginStats {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        self.renderer.sink()
    }
}

/// Overlay lines for a location advisory
///
/// The advice line and the three traffic lines are independent: either group
/// is drawn only when its part of the response is present.
pub fn advisory_lines(
    system: &str,
    advisory: &LocationAdvisory,
    hours: u32,
) -> Vec<(Slot, String)> {
    let mut lines = Vec::new();

    match advisory.advice() {
        Some("") => lines.push((
            Slot::Notify,
            format!("System '{}' is verified low risk.", system),
        )),
        Some(advice) => lines.push((Slot::Warn, advice.to_string())),
        None => {}
    }

    if advisory.has_traffic() {
        let period = advisory.period_hours.unwrap_or(u64::from(hours));
        lines.push((Slot::Info1, format!("Data for last {} hrs", period)));
        lines.push((
            Slot::Info2,
            format!("{} destroyed", advisory.destroyed.unwrap_or(0)),
        ));
        lines.push((
            Slot::Info3,
            format!("{} arrived safely", advisory.arrived.unwrap_or(0)),
        ));
    }

    lines
}
