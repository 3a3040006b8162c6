//! Journal entries consumed from the host
//!
//! Only the entry kinds that drive advisories or crime reports are modelled;
//! every other `event` value deserializes to [`JournalEvent::Other`]. Field
//! names follow the game's journal format (`PascalCase`, lowercase `timestamp`).

use serde::Deserialize;

use crate::error::Result;

/// Jump type of a long-range (system to system) jump
pub const HYPERSPACE: &str = "Hyperspace";

/// A single journal entry, tagged by its `event` field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event")]
pub enum JournalEvent {
    /// FSD charge complete, jump about to start
    #[serde(rename = "StartJump", rename_all = "PascalCase")]
    JumpStarted {
        /// `Hyperspace` or `Supercruise`
        jump_type: String,
        /// Destination; only present for hyperspace jumps
        #[serde(default)]
        star_system: Option<String>,
    },

    /// The commander sent a chat message
    #[serde(rename = "SendText", rename_all = "PascalCase")]
    TextMessageSent {
        #[serde(default)]
        message: String,
    },

    /// The commander's ship was pulled out of supercruise
    #[serde(rename_all = "PascalCase")]
    Interdicted {
        #[serde(rename = "timestamp", default)]
        timestamp: String,
        #[serde(default)]
        interdictor: String,
        #[serde(default)]
        is_player: bool,
    },

    /// The commander's ship was destroyed
    #[serde(rename_all = "PascalCase")]
    Died {
        #[serde(rename = "timestamp", default)]
        timestamp: String,
        /// Single attacker
        #[serde(default)]
        killer_name: Option<String>,
        /// Wing of attackers; replaces `KillerName` when present
        #[serde(default)]
        killers: Option<Vec<Killer>>,
    },

    /// Any entry kind the plugin does not act on
    #[serde(other)]
    Other,
}

/// One attacker in a multi-killer `Died` entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Killer {
    pub name: String,
}

impl JournalEvent {
    /// Parse a journal line
    pub fn from_json(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }

    /// Interpret an already-parsed journal entry
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Journal name of this entry kind
    pub fn kind(&self) -> &'static str {
        match self {
            JournalEvent::JumpStarted { .. } => "StartJump",
            JournalEvent::TextMessageSent { .. } => "SendText",
            JournalEvent::Interdicted { .. } => "Interdicted",
            JournalEvent::Died { .. } => "Died",
            JournalEvent::Other => "Other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hyperspace_jump() {
        let event = JournalEvent::from_json(
            r#"{"timestamp":"2016-06-10T14:32:03Z","event":"StartJump","JumpType":"Hyperspace","StarSystem":"Deciat","StarClass":"K"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            JournalEvent::JumpStarted {
                jump_type: "Hyperspace".to_string(),
                star_system: Some("Deciat".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_supercruise_jump_without_system() {
        let event = JournalEvent::from_json(
            r#"{"timestamp":"2016-06-10T14:32:03Z","event":"StartJump","JumpType":"Supercruise"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            JournalEvent::JumpStarted {
                jump_type: "Supercruise".to_string(),
                star_system: None,
            }
        );
    }

    #[test]
    fn test_parse_send_text() {
        let event =
            JournalEvent::from_json(r#"{"event":"SendText","To":"local","Message":"!location"}"#)
                .unwrap();
        assert_eq!(
            event,
            JournalEvent::TextMessageSent {
                message: "!location".to_string()
            }
        );
    }

    #[test]
    fn test_parse_interdicted() {
        let event = JournalEvent::from_json(
            r#"{"timestamp":"2017-01-01T10:00:00Z","event":"Interdicted","Submitted":false,"Interdictor":"Cmdr Bad Guy","IsPlayer":true,"CombatRank":5}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            JournalEvent::Interdicted {
                timestamp: "2017-01-01T10:00:00Z".to_string(),
                interdictor: "Cmdr Bad Guy".to_string(),
                is_player: true,
            }
        );
    }

    #[test]
    fn test_parse_died_with_wing() {
        let event = JournalEvent::from_json(
            r#"{"timestamp":"2017-01-01T10:00:00Z","event":"Died","Killers":[{"Name":"Cmdr Alice","Ship":"anaconda","Rank":"Elite"},{"Name":"NPC Bob","Ship":"viper","Rank":"Novice"}]}"#,
        )
        .unwrap();
        match event {
            JournalEvent::Died {
                killers: Some(killers),
                killer_name: None,
                ..
            } => {
                assert_eq!(killers.len(), 2);
                assert_eq!(killers[0].name, "Cmdr Alice");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parse_died_single_killer() {
        let event = JournalEvent::from_json(
            r#"{"timestamp":"2017-01-01T10:00:00Z","event":"Died","KillerName":"Cmdr Alice","KillerShip":"python"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            JournalEvent::Died {
                timestamp: "2017-01-01T10:00:00Z".to_string(),
                killer_name: Some("Cmdr Alice".to_string()),
                killers: None,
            }
        );
    }

    #[test]
    fn test_unknown_events_are_other() {
        let event =
            JournalEvent::from_json(r#"{"event":"Docked","StationName":"Jameson Memorial"}"#)
                .unwrap();
        assert_eq!(event, JournalEvent::Other);
        assert_eq!(event.kind(), "Other");
    }

    #[test]
    fn test_missing_event_tag_is_an_error() {
        let err = JournalEvent::from_json(r#"{"timestamp":"2017-01-01T10:00:00Z"}"#).unwrap_err();
        assert_eq!(err.kind(), "json");
    }
}
