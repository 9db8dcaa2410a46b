use std::io;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sequence_dashboard::console::{Command, Console, Reply, HELP};
use sequence_dashboard::gateway::HttpGateway;
use sequence_dashboard::orchestrator::RESET_PROMPT;
use sequence_dashboard::render::{self, TerminalRenderer};
use sequence_dashboard::scheduler::{PollCadence, Scheduler};
use sequence_dashboard::{Config, DashboardError, DashboardSession};

fn is_yes(answer: Option<&str>) -> bool {
    matches!(
        answer.map(|a| a.trim().to_ascii_lowercase()).as_deref(),
        Some("y" | "yes")
    )
}

#[tokio::main]
async fn main() -> Result<(), DashboardError> {
    // Logs go to stderr so they never interleave with the dashboard on stdout
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::load().await;
    let gateway = HttpGateway::new(&config)?;
    info!(api = gateway.base_url(), "Starting sequence dashboard");

    let session = DashboardSession::new(Arc::new(gateway), &config);
    let renderer = TerminalRenderer::new(io::stdout());
    tokio::spawn(render::run(renderer, session.events().subscribe()));

    let scheduler = Arc::new(Scheduler::new(
        session.clone(),
        PollCadence::from_config(&config),
    ));
    scheduler.start();

    let console = Console::new(session, scheduler.clone());
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command: Command = match line.parse() {
            Ok(command) => command,
            Err(err) => {
                warn!(input = %line.trim(), "{err}");
                continue;
            }
        };

        // Confirmation is read up front so the orchestrator sees a plain answer
        let confirmed = if command == Command::Reset {
            println!("{RESET_PROMPT} [y/N]");
            let answer = lines.next_line().await?;
            is_yes(answer.as_deref())
        } else {
            false
        };

        match console.execute(command, &move |_: &str| confirmed).await {
            Reply::Continue(output) => {
                for line in output {
                    println!("{line}");
                }
            }
            Reply::Quit => break,
        }
    }

    scheduler.shutdown();
    info!("Dashboard stopped");
    Ok(())
}
