//! expense-agent binary entry point.

use std::io::Write;
use std::sync::Arc;

use expense_agent::config::AgentConfig;
use expense_agent::data::DataSource;
use expense_agent::orchestrator::Orchestrator;
use expense_agent::tools::ConsoleEmailSender;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    init_tracing();
    clear_console();

    let config = AgentConfig::from_env();

    // Missing input is fatal and happens before anything remote.
    let document = match DataSource::from_config(&config).load() {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("Here is the expenses data in your file:\n\n{document} \n");
    println!("What would you like me to do with it?");

    let mut line = String::new();
    if let Err(e) = BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let orchestrator = Orchestrator::new(config, Arc::new(ConsoleEmailSender::stdout()));
    orchestrator
        .process(&line, &document, &mut std::io::stdout())
        .await;
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn clear_console() {
    let mut stdout = std::io::stdout();
    let _ = write!(stdout, "\x1b[2J\x1b[H");
    let _ = stdout.flush();
}
