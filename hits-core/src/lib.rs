//! # hits-core
//!
//! Core library for ED:HITS - traffic advisories and crime reporting for
//! Elite Dangerous.
//!
//! This library provides:
//! - The journal event model consumed from the host application
//! - The event interpreter that turns journal entries into advisory actions
//! - An HTTP client for the HITS advisory service
//! - An overlay renderer speaking the EDMCOverlay line protocol
//! - Configuration management and logging infrastructure
//!
//! ## Pipeline
//!
//! The host delivers one journal entry at a time:
//! - **Interpret:** update the [`SessionContext`] and decide on zero or more [`Action`]s
//! - **Advise:** location checks and crime reports go to the HITS server
//! - **Render:** results are pushed to the overlay as short-lived text
//!
//! No failure on the advise or render steps ever escapes [`Plugin::journal_entry`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use hits_core::{Config, Plugin, TcpOverlay};
//!
//! let config = Config::load().expect("failed to load config");
//! let overlay = TcpOverlay::new(&config.overlay);
//! let mut plugin = Plugin::new(config, overlay).expect("failed to create plugin");
//! plugin.start();
//!
//! let entry = r#"{"event":"SendText","Message":"!location Deciat"}"#;
//! plugin.journal_entry_json(Some("Jameson"), Some("Sol"), entry);
//! plugin.stop();
//! ```

// Re-export commonly used items at the crate root
pub use advisory::{AdvisoryClient, CrimeReport, LocationAdvisory, Offence};
pub use config::{Config, Preferences};
pub use error::{Error, Result};
pub use interpreter::{interpret, Action};
pub use journal::{JournalEvent, Killer};
pub use overlay::{OverlayCommand, OverlaySink, Renderer, Slot, TcpOverlay};
pub use plugin::{Plugin, PluginStats};
pub use session::SessionContext;

// Public modules
pub mod advisory;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod journal;
pub mod logging;
pub mod overlay;
pub mod plugin;
pub mod session;

/// Protocol version announced to the HITS server in the `User-Agent` header
pub const HITS_VERSION: &str = "0.9.0";
