//! On-screen overlay output
//!
//! Text is pushed to an EDMCOverlay-compatible service, one JSON object per
//! line over TCP. Each kind of line ([`Slot`]) has a fixed screen position,
//! and the message id is derived from that position, so re-sending a kind
//! replaces its previous text instead of stacking.

mod channel;
mod renderer;

pub use channel::{OverlayCommand, OverlayMessage, OverlaySink, TcpOverlay};
pub use renderer::{Renderer, Slot};
