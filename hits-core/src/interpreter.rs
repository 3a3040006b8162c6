//! Event interpreter
//!
//! Turns one journal entry into the advisory work it calls for. The decision
//! is pure: [`interpret`] reads the entry and the session context and returns
//! [`Action`]s; performing them (network, overlay) is the plugin's job.
//!
//! Rules are independent; a single entry may produce several actions.
//!
//! | Entry | Condition | Action |
//! |-------|-----------|--------|
//! | `StartJump` | jump type `Hyperspace` | announced location check of the destination |
//! | `SendText` | message starts with `!location` | location check of the argument, else current system |
//! | `Interdicted` | `IsPlayer` | interdiction report against the interdictor |
//! | `Died` | killer named `Cmdr ...` | murder report per player killer |

use crate::advisory::{CrimeReport, Offence};
use crate::journal::{JournalEvent, Killer, HYPERSPACE};
use crate::session::SessionContext;

/// Chat command that requests a location check
pub const LOCATION_COMMAND: &str = "!location";

/// Prefix the game puts on player (as opposed to NPC) names
pub const PLAYER_PREFIX: &str = "Cmdr ";

/// Work requested by a journal entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Query the HITS server about a system
    CheckLocation {
        system: String,
        /// Show the "Checking HITS for ..." header first (hyperspace jumps)
        announce: bool,
    },
    /// Submit a crime report
    ReportCrime(CrimeReport),
}

/// Decide what a journal entry calls for
///
/// `ctx` must already reflect the ambient commander and system that
/// accompanied this entry.
pub fn interpret(event: &JournalEvent, ctx: &SessionContext) -> Vec<Action> {
    let mut actions = Vec::new();

    match event {
        JournalEvent::JumpStarted {
            jump_type,
            star_system,
        } => {
            if jump_type == HYPERSPACE {
                match star_system {
                    Some(system) => actions.push(Action::CheckLocation {
                        system: system.clone(),
                        announce: true,
                    }),
                    None => tracing::debug!("Hyperspace jump without a destination"),
                }
            }
        }
        JournalEvent::TextMessageSent { message } => {
            if let Some(system) = location_command(message, ctx.current_system.as_deref()) {
                actions.push(Action::CheckLocation {
                    system,
                    announce: false,
                });
            }
        }
        JournalEvent::Interdicted {
            timestamp,
            interdictor,
            is_player,
        } => {
            if *is_player {
                actions.push(crime(ctx, interdictor.clone(), timestamp, Offence::Interdiction));
            }
        }
        JournalEvent::Died {
            timestamp,
            killer_name,
            killers,
        } => {
            for criminal in player_killers(killer_name.as_deref(), killers.as_deref()) {
                actions.push(crime(ctx, criminal, timestamp, Offence::Murder));
            }
        }
        JournalEvent::Other => {}
    }

    actions
}

/// Resolve the target of a `!location` chat command
///
/// Returns None if the message is not the command, or if it has no argument
/// and no current system is known.
pub fn location_command(message: &str, current_system: Option<&str>) -> Option<String> {
    if message.is_empty() || !message.starts_with(LOCATION_COMMAND) {
        return None;
    }

    let argument = message
        .split_once(' ')
        .map(|(_, rest)| rest.trim())
        .filter(|rest| !rest.is_empty());

    match argument {
        Some(system) => Some(system.to_string()),
        None => {
            if current_system.is_none() {
                tracing::debug!("!location without argument and no current system");
            }
            current_system.map(str::to_string)
        }
    }
}

/// Names of the player killers in a `Died` entry, prefix stripped
///
/// A wing list takes precedence over the single `KillerName` field.
pub fn player_killers(killer_name: Option<&str>, killers: Option<&[Killer]>) -> Vec<String> {
    match killers {
        Some(killers) => killers
            .iter()
            .filter_map(|killer| player_name(&killer.name))
            .collect(),
        None => killer_name.and_then(player_name).into_iter().collect(),
    }
}

/// Strip the `Cmdr ` prefix from a player name; NPC names yield None
pub fn player_name(name: &str) -> Option<String> {
    name.strip_prefix(PLAYER_PREFIX).map(str::to_string)
}

fn crime(ctx: &SessionContext, criminal: String, timestamp: &str, offence: Offence) -> Action {
    if ctx.current_system.is_none() {
        tracing::debug!(criminal = %criminal, ?offence, "Reporting crime without a current system");
    }

    Action::ReportCrime(CrimeReport {
        criminal,
        star_system: ctx.current_system.clone(),
        timestamp: timestamp.to_string(),
        offence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_in(system: &str) -> SessionContext {
        let mut ctx = SessionContext::default();
        ctx.observe(Some("Jameson"), Some(system));
        ctx
    }

    fn died(killer_name: Option<&str>, killers: Option<&[&str]>) -> JournalEvent {
        JournalEvent::Died {
            timestamp: "2017-01-01T10:00:00Z".to_string(),
            killer_name: killer_name.map(str::to_string),
            killers: killers.map(|names| {
                names
                    .iter()
                    .map(|name| Killer {
                        name: name.to_string(),
                    })
                    .collect()
            }),
        }
    }

    fn murder(criminal: &str, system: &str) -> Action {
        Action::ReportCrime(CrimeReport {
            criminal: criminal.to_string(),
            star_system: Some(system.to_string()),
            timestamp: "2017-01-01T10:00:00Z".to_string(),
            offence: Offence::Murder,
        })
    }

    #[test]
    fn test_wing_kill_reports_only_players() {
        let event = died(None, Some(&["Cmdr Alice", "NPC Bob"][..]));
        let actions = interpret(&event, &ctx_in("Sol"));
        assert_eq!(actions, vec![murder("Alice", "Sol")]);
    }

    #[test]
    fn test_wing_kill_reports_every_player() {
        let event = died(
            Some("Cmdr Ignored"),
            Some(&["Cmdr Alice", "Cmdr Carol", "Pirate Lord"][..]),
        );
        let actions = interpret(&event, &ctx_in("Sol"));
        assert_eq!(actions, vec![murder("Alice", "Sol"), murder("Carol", "Sol")]);
    }

    #[test]
    fn test_single_killer() {
        let actions = interpret(&died(Some("Cmdr Alice"), None), &ctx_in("Lave"));
        assert_eq!(actions, vec![murder("Alice", "Lave")]);

        let actions = interpret(&died(Some("Federal Security Service"), None), &ctx_in("Lave"));
        assert!(actions.is_empty());

        let actions = interpret(&died(None, None), &ctx_in("Lave"));
        assert!(actions.is_empty());
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        assert_eq!(player_name("Cmdr Alice"), Some("Alice".to_string()));
        assert_eq!(player_name("CMDR Alice"), None);
        assert_eq!(player_name("Cmdr"), None);
    }

    #[test]
    fn test_interdiction_requires_player() {
        let by_player = JournalEvent::Interdicted {
            timestamp: "2017-01-01T10:00:00Z".to_string(),
            interdictor: "Cmdr Bad Guy".to_string(),
            is_player: true,
        };
        assert_eq!(
            interpret(&by_player, &ctx_in("Sol")),
            vec![Action::ReportCrime(CrimeReport {
                criminal: "Cmdr Bad Guy".to_string(),
                star_system: Some("Sol".to_string()),
                timestamp: "2017-01-01T10:00:00Z".to_string(),
                offence: Offence::Interdiction,
            })]
        );

        let by_npc = JournalEvent::Interdicted {
            timestamp: "2017-01-01T10:00:00Z".to_string(),
            interdictor: "Pirate".to_string(),
            is_player: false,
        };
        assert!(interpret(&by_npc, &ctx_in("Sol")).is_empty());
    }

    #[test]
    fn test_crime_without_current_system_is_still_reported() {
        let ctx = SessionContext::default();
        let actions = interpret(&died(Some("Cmdr Alice"), None), &ctx);
        assert_eq!(actions.len(), 1);
        match &actions[0] {
            Action::ReportCrime(report) => {
                assert_eq!(report.criminal, "Alice");
                assert_eq!(report.star_system, None);
            }
            other => panic!("expected a crime report, got {:?}", other),
        }
    }

    #[test]
    fn test_hyperspace_jump_checks_destination() {
        let event = JournalEvent::JumpStarted {
            jump_type: "Hyperspace".to_string(),
            star_system: Some("Deciat".to_string()),
        };
        assert_eq!(
            interpret(&event, &ctx_in("Sol")),
            vec![Action::CheckLocation {
                system: "Deciat".to_string(),
                announce: true,
            }]
        );
    }

    #[test]
    fn test_supercruise_jump_does_nothing() {
        let event = JournalEvent::JumpStarted {
            jump_type: "Supercruise".to_string(),
            star_system: None,
        };
        assert!(interpret(&event, &ctx_in("Sol")).is_empty());
    }

    #[test]
    fn test_location_command_argument() {
        assert_eq!(
            location_command("!location Deciat", Some("Sol")),
            Some("Deciat".to_string())
        );
        assert_eq!(
            location_command("!location Col 285 Sector AB-C d1-2", Some("Sol")),
            Some("Col 285 Sector AB-C d1-2".to_string())
        );
    }

    #[test]
    fn test_location_command_defaults_to_current_system() {
        assert_eq!(location_command("!location", Some("Sol")), Some("Sol".to_string()));
        assert_eq!(location_command("!location   ", Some("Sol")), Some("Sol".to_string()));
        assert_eq!(location_command("!location", None), None);
    }

    #[test]
    fn test_other_messages_are_ignored() {
        assert_eq!(location_command("", Some("Sol")), None);
        assert_eq!(location_command("o7 commander", Some("Sol")), None);
        assert_eq!(location_command(" !location Sol", Some("Sol")), None);

        let event = JournalEvent::TextMessageSent {
            message: String::new(),
        };
        assert!(interpret(&event, &ctx_in("Sol")).is_empty());
    }

    #[test]
    fn test_text_message_uses_argument_not_ambient() {
        let event = JournalEvent::TextMessageSent {
            message: "!location Deciat".to_string(),
        };
        assert_eq!(
            interpret(&event, &ctx_in("Sol")),
            vec![Action::CheckLocation {
                system: "Deciat".to_string(),
                announce: false,
            }]
        );
    }

    #[test]
    fn test_unmodelled_entries_do_nothing() {
        assert!(interpret(&JournalEvent::Other, &ctx_in("Sol")).is_empty());
    }
}
