//! Line-oriented operator commands.

use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::orchestrator::{ActionOrchestrator, Confirm, ResetOutcome, DEFAULT_RELEASE_REASON};
use crate::scheduler::Scheduler;
use crate::session::DashboardSession;
use crate::state::{history_lines, StatCards};

pub const HELP: &str = "\
Commands:
  generate SITE PARTITION TYPE      issue the next sequence number
  release NUMBER SITE PARTITION [REASON]
                                    return a number to the gap pool
  reset                             wipe all sequence data (asks first)
  demo TYPE                         run a server-side demonstration
  hide | show                       pause or resume live updates
  status                            print the current dashboard
  help                              show this text
  quit                              exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate {
        site_id: String,
        partition_id: String,
        invoice_type: String,
    },
    Release {
        sequence_number: u64,
        site_id: String,
        partition_id: String,
        reason: String,
    },
    Reset,
    Demo {
        demo_type: String,
    },
    Hide,
    Show,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a valid sequence number")]
    InvalidSequence(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;
        let args: Vec<&str> = words.collect();

        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("generate" | "gen", [site, partition, invoice_type]) => Command::Generate {
                site_id: site.to_string(),
                partition_id: partition.to_string(),
                invoice_type: invoice_type.to_string(),
            },
            ("generate" | "gen", _) => {
                return Err(CommandError::Usage("generate SITE PARTITION TYPE"))
            }
            ("release", [number, site, partition, reason @ ..]) => Command::Release {
                sequence_number: number
                    .parse()
                    .map_err(|_| CommandError::InvalidSequence(number.to_string()))?,
                site_id: site.to_string(),
                partition_id: partition.to_string(),
                reason: if reason.is_empty() {
                    DEFAULT_RELEASE_REASON.to_string()
                } else {
                    reason.join(" ")
                },
            },
            ("release", _) => {
                return Err(CommandError::Usage(
                    "release NUMBER SITE PARTITION [REASON]",
                ))
            }
            ("reset", []) => Command::Reset,
            ("demo", [demo_type]) => Command::Demo {
                demo_type: demo_type.to_string(),
            },
            ("demo", _) => return Err(CommandError::Usage("demo TYPE")),
            ("hide", []) => Command::Hide,
            ("show", []) => Command::Show,
            ("status", []) => Command::Status,
            ("help" | "?", _) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            (other, _) => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// What the caller should do after a command ran.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Continue(Vec<String>),
    Quit,
}

/// Runs parsed commands against one session.
pub struct Console {
    session: DashboardSession,
    orchestrator: ActionOrchestrator,
    scheduler: Arc<Scheduler>,
}

impl Console {
    pub fn new(session: DashboardSession, scheduler: Arc<Scheduler>) -> Self {
        Self {
            orchestrator: ActionOrchestrator::new(session.clone()),
            session,
            scheduler,
        }
    }

    /// Action outcomes arrive as notifications, so most replies are empty.
    pub async fn execute(&self, command: Command, confirm: &dyn Confirm) -> Reply {
        let lines = match command {
            Command::Generate {
                site_id,
                partition_id,
                invoice_type,
            } => {
                let _ = self
                    .orchestrator
                    .generate(&site_id, &partition_id, &invoice_type)
                    .await;
                Vec::new()
            }
            Command::Release {
                sequence_number,
                site_id,
                partition_id,
                reason,
            } => {
                self.orchestrator
                    .release(sequence_number, &site_id, &partition_id, &reason)
                    .await;
                Vec::new()
            }
            Command::Reset => match self.orchestrator.reset(confirm).await {
                ResetOutcome::Declined => vec!["Reset cancelled".to_string()],
                ResetOutcome::Completed | ResetOutcome::Failed => Vec::new(),
            },
            Command::Demo { demo_type } => {
                let _ = self.orchestrator.run_demo(&demo_type).await;
                Vec::new()
            }
            Command::Hide => {
                self.scheduler.set_visible(false);
                vec!["Updates paused".to_string()]
            }
            Command::Show => {
                self.scheduler.set_visible(true);
                vec!["Updates resumed".to_string()]
            }
            Command::Status => self.status(),
            Command::Help => HELP.lines().map(str::to_string).collect(),
            Command::Quit => return Reply::Quit,
        };
        Reply::Continue(lines)
    }

    /// Snapshot of every panel as text.
    pub fn status(&self) -> Vec<String> {
        self.session.with_state(|state| {
            let cards = StatCards::from_snapshot(state.stats.as_ref());
            let mut lines = vec![
                format!("Health: {}", state.health.label()),
                format!(
                    "Last sequence: {} ({})",
                    state.last_sequence.headline(),
                    state.last_sequence.details()
                ),
                format!(
                    "Counter: {} | Generated: {} | Gaps: {} | Avg latency: {}ms",
                    cards.current_counter,
                    cards.total_generated,
                    cards.available_gaps,
                    cards.average_latency_ms
                ),
                "Recent sequences:".to_string(),
            ];
            lines.extend(history_lines(&state.history).into_iter().map(|l| format!("  {l}")));
            if !state.visible {
                lines.push("(updates paused)".to_string());
            }
            lines
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::gateway::Operation;
    use crate::scheduler::PollCadence;
    use crate::state::EMPTY_HISTORY_MESSAGE;
    use crate::testing::{issued, session_with, FakeGateway};

    fn parse(line: &str) -> Result<Command, CommandError> {
        line.parse()
    }

    #[test]
    fn parses_generate() {
        assert_eq!(
            parse("generate S1 P1 INV").unwrap(),
            Command::Generate {
                site_id: "S1".to_string(),
                partition_id: "P1".to_string(),
                invoice_type: "INV".to_string(),
            }
        );
        assert_eq!(
            parse("generate S1 P1"),
            Err(CommandError::Usage("generate SITE PARTITION TYPE"))
        );
    }

    #[test]
    fn release_reason_defaults() {
        match parse("release 1042 S1 P1").unwrap() {
            Command::Release { reason, .. } => assert_eq!(reason, "manual-release"),
            other => panic!("unexpected {other:?}"),
        }
        match parse("release 7 S1 P1 customer voided order").unwrap() {
            Command::Release {
                sequence_number,
                reason,
                ..
            } => {
                assert_eq!(sequence_number, 7);
                assert_eq!(reason, "customer voided order");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse("   "), Err(CommandError::Empty));
        assert_eq!(
            parse("release abc S1 P1"),
            Err(CommandError::InvalidSequence("abc".to_string()))
        );
        assert_eq!(
            parse("launch"),
            Err(CommandError::Unknown("launch".to_string()))
        );
        assert_eq!(parse("QUIT").unwrap(), Command::Quit);
    }

    #[tokio::test(start_paused = true)]
    async fn status_reflects_session() {
        let gateway = FakeGateway::new();
        let session = session_with(&gateway, &Config::default());
        let scheduler = Arc::new(Scheduler::new(session.clone(), PollCadence::default()));
        let console = Console::new(session, scheduler);

        let status = console.status();
        assert_eq!(status[1], "Last sequence: - (Waiting for the first sequence)");
        assert!(status.iter().any(|l| l.contains(EMPTY_HISTORY_MESSAGE)));

        gateway.next_reply(Ok(issued(12, true)));
        let reply = console
            .execute(parse("generate S1 P1 INV").unwrap(), &|_: &str| false)
            .await;
        assert_eq!(reply, Reply::Continue(Vec::new()));
        assert!(console.status().iter().any(|l| l.starts_with("  #12 [Gap Filled]")));
    }

    #[tokio::test(start_paused = true)]
    async fn declined_reset_reports_cancel() {
        let gateway = FakeGateway::new();
        let session = session_with(&gateway, &Config::default());
        let scheduler = Arc::new(Scheduler::new(session.clone(), PollCadence::default()));
        let console = Console::new(session, scheduler);

        let reply = console.execute(Command::Reset, &|_: &str| false).await;
        assert_eq!(reply, Reply::Continue(vec!["Reset cancelled".to_string()]));
        assert_eq!(gateway.calls(Operation::Reset), 0);
        assert_eq!(console.execute(Command::Quit, &|_: &str| false).await, Reply::Quit);
    }

    #[tokio::test(start_paused = true)]
    async fn hide_and_show_toggle_visibility() {
        let gateway = FakeGateway::new();
        let session = session_with(&gateway, &Config::default());
        let scheduler = Arc::new(Scheduler::new(session.clone(), PollCadence::default()));
        let console = Console::new(session.clone(), scheduler);

        console.execute(Command::Hide, &|_: &str| false).await;
        assert!(!session.is_visible());
        assert_eq!(console.status().last().unwrap(), "(updates paused)");
        console.execute(Command::Show, &|_: &str| false).await;
        assert!(session.is_visible());
    }
}
