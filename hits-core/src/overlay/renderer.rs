//! Slot-based text rendering on top of an [`OverlaySink`]

use super::channel::{OverlayCommand, OverlayMessage, OverlaySink};

const HEADER_ROW: u32 = 380;
const INFO_ROW: u32 = 420;
const DETAIL1_ROW: u32 = INFO_ROW + 25;
const DETAIL2_ROW: u32 = DETAIL1_ROW + 25;
const DETAIL3_ROW: u32 = DETAIL2_ROW + 25;

const HEADER_COL: u32 = 80;
const BODY_COL: u32 = 95;

/// Screen slot for one kind of overlay line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// "Checking HITS for ..." above everything else
    Header,
    /// Green status line (low risk, plugin loaded)
    Notify,
    /// Red advice line; shares the notify position
    Warn,
    /// First detail line (reporting period)
    Info1,
    /// Second detail line (destroyed count, "Checking location ..")
    Info2,
    /// Third detail line (arrivals, crime confirmations, errors)
    Info3,
}

impl Slot {
    pub fn row(self) -> u32 {
        match self {
            Slot::Header => HEADER_ROW,
            Slot::Notify | Slot::Warn => INFO_ROW,
            Slot::Info1 => DETAIL1_ROW,
            Slot::Info2 => DETAIL2_ROW,
            Slot::Info3 => DETAIL3_ROW,
        }
    }

    pub fn col(self) -> u32 {
        match self {
            Slot::Header => HEADER_COL,
            _ => BODY_COL,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Slot::Notify => "#00ff00",
            Slot::Warn => "red",
            _ => "yellow",
        }
    }

    pub fn size(self) -> &'static str {
        match self {
            Slot::Notify | Slot::Warn => "large",
            _ => "normal",
        }
    }

    /// Overlay id for this slot; equal positions share an id
    pub fn id(self) -> String {
        message_id(self.row(), self.col())
    }
}

fn message_id(row: u32, col: u32) -> String {
    format!("hits_{}_{}", row, col)
}

/// Renders text lines to the overlay
///
/// Rendering never fails: an unreachable overlay is logged at debug level and
/// otherwise ignored, because there is nowhere else to report it.
pub struct Renderer<S> {
    sink: S,
}

impl<S: OverlaySink> Renderer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Show text at an explicit position
    pub fn display(&mut self, text: &str, row: u32, col: u32, color: &str, size: &str, ttl: u64) {
        let command = OverlayCommand::Message(OverlayMessage {
            id: message_id(row, col),
            text: text.to_string(),
            color: color.to_string(),
            x: col,
            y: row,
            ttl,
            size: size.to_string(),
        });

        if let Err(e) = self.sink.send(&command) {
            tracing::debug!(error = %e, text = %text, "Overlay unavailable, message dropped");
        }
    }

    /// Show text in one of the fixed slots
    pub fn show(&mut self, slot: Slot, text: &str, ttl: u64) {
        self.display(text, slot.row(), slot.col(), slot.color(), slot.size(), ttl);
    }

    pub fn header(&mut self, text: &str, ttl: u64) {
        self.show(Slot::Header, text, ttl);
    }

    pub fn notify(&mut self, text: &str, ttl: u64) {
        self.show(Slot::Notify, text, ttl);
    }

    pub fn warn(&mut self, text: &str, ttl: u64) {
        self.show(Slot::Warn, text, ttl);
    }

    /// Show any subset of the three detail lines
    pub fn info(
        &mut self,
        line1: Option<&str>,
        line2: Option<&str>,
        line3: Option<&str>,
        ttl: u64,
    ) {
        let lines = [(Slot::Info1, line1), (Slot::Info2, line2), (Slot::Info3, line3)];
        for (slot, line) in lines {
            if let Some(text) = line.filter(|text| !text.is_empty()) {
                self.show(slot, text, ttl);
            }
        }
    }

    /// Tell the overlay process to exit
    pub fn exit(&mut self) {
        if let Err(e) = self.sink.send(&OverlayCommand::exit()) {
            tracing::debug!(error = %e, "Overlay unavailable for exit");
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[cfg(test)]
    fn into_sink(self) -> S {
        self.sink
    }
}
