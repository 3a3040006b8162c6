//! Host-side journal handling
//!
//! The game writes one JSON object per line to `Journal.*.log` files. This
//! module tracks the commander and star system the way the host application
//! does, follows the newest journal file, and hands each entry to the plugin.

use hits_core::{JournalEvent, OverlaySink, Plugin};
use serde_json::Value;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Ambient state the host passes along with every entry
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostState {
    pub commander: Option<String>,
    pub system: Option<String>,
}

impl HostState {
    /// Update commander/system from an entry, before the plugin sees it
    pub fn observe(&mut self, entry: &Value) {
        let field = |name: &str| entry.get(name).and_then(Value::as_str).map(str::to_string);

        match entry.get("event").and_then(Value::as_str) {
            Some("LoadGame") => {
                if let Some(name) = field("Commander") {
                    self.commander = Some(name);
                }
            }
            Some("Commander") => {
                if let Some(name) = field("Name") {
                    self.commander = Some(name);
                }
            }
            Some("Location") | Some("FSDJump") | Some("CarrierJump") => {
                if let Some(system) = field("StarSystem") {
                    self.system = Some(system);
                }
            }
            _ => {}
        }
    }
}

/// Parse a journal line, update the host state and dispatch it
///
/// Returns false for lines that are blank or not valid JSON.
pub fn dispatch<S: OverlaySink>(plugin: &mut Plugin<S>, host: &mut HostState, line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return false;
    }

    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping malformed journal line");
            return false;
        }
    };

    host.observe(&value);

    match JournalEvent::from_value(value) {
        Ok(event) => {
            plugin.journal_entry(host.commander.as_deref(), host.system.as_deref(), &event);
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "Skipping journal entry without a usable event");
            false
        }
    }
}

/// Newest `Journal.*.log` in a directory, by modification time then name
pub fn latest_journal(dir: &Path) -> io::Result<Option<PathBuf>> {
    let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !(name.starts_with("Journal.") && name.ends_with(".log")) {
            continue;
        }

        let modified = entry.metadata()?.modified()?;
        let path = entry.path();
        let is_newer = match &newest {
            Some((time, best)) => (modified, &path) > (*time, best),
            None => true,
        };
        if is_newer {
            newest = Some((modified, path));
        }
    }

    Ok(newest.map(|(_, path)| path))
}

/// Follows the newest journal file in a directory
pub struct JournalTail {
    dir: PathBuf,
    started: bool,
    current: Option<PathBuf>,
    offset: u64,
    partial: Vec<u8>,
}

/// Lines read by one poll
#[derive(Debug, Default)]
pub struct TailBatch {
    /// Entries written before the tail started; used only to rebuild host state
    pub backlog: Vec<String>,
    /// Entries appended since the last poll
    pub fresh: Vec<String>,
}

impl JournalTail {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            started: false,
            current: None,
            offset: 0,
            partial: Vec::new(),
        }
    }

    /// Journal currently followed
    pub fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    /// Read complete lines appended since the last poll
    ///
    /// Only a journal that already existed at the first poll is returned as
    /// backlog. Any journal found later is read from its beginning as fresh
    /// entries.
    pub fn poll(&mut self) -> io::Result<TailBatch> {
        let mut batch = TailBatch::default();

        let first = !self.started;
        self.started = true;

        let Some(latest) = latest_journal(&self.dir)? else {
            return Ok(batch);
        };

        if self.current.as_ref() != Some(&latest) {
            tracing::info!(path = %latest.display(), "Following journal");
            self.current = Some(latest.clone());
            self.offset = 0;
            self.partial.clear();
        }

        let lines = self.read_new_lines(&latest)?;
        if first {
            batch.backlog = lines;
        } else {
            batch.fresh = lines;
        }

        Ok(batch)
    }

    fn read_new_lines(&mut self, path: &Path) -> io::Result<Vec<String>> {
        let mut file = File::open(path)?;
        let len = file.metadata()?.len();
        if len < self.offset {
            // Truncated or replaced in place
            self.offset = 0;
            self.partial.clear();
        }

        file.seek(SeekFrom::Start(self.offset))?;
        let read = file.read_to_end(&mut self.partial)?;
        self.offset += read as u64;

        // Decode only whole lines; a trailing fragment may end mid-character
        let mut lines = Vec::new();
        while let Some(pos) = self.partial.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.partial.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\r', '\n']);
            if !line.is_empty() {
                lines.push(line.to_string());
            }
        }

        Ok(lines)
    }
}
