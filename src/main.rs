mod console;

use std::sync::Arc;

use anyhow::Result;
use skylog_core::Config;
use skylog_services::WeatherApiClient;
use skylog_ui::{FormCoordinator, TokioScheduler};
use tokio::io::{AsyncBufReadExt, BufReader};

use console::{Command, ConsoleView};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    skylog_core::init()?;

    let (config, _) = Config::load_validated()?;
    let client = Arc::new(WeatherApiClient::from_config(&config.api)?);
    tracing::info!("Skylog started against {}", client.base_url());

    let runtime = tokio::runtime::Handle::current();
    let scheduler = Arc::new(TokioScheduler::new(runtime.clone()));
    let mut coordinator = FormCoordinator::new(
        client,
        runtime,
        scheduler,
        &config.suggestions,
        Box::new(ConsoleView),
    );

    println!("Skylog - weather history client. Type 'help' for commands.");
    coordinator.load_config();
    coordinator.refresh_history();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match console::parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => console::apply(&mut coordinator, command),
                    Err(e) => eprintln!("{:#}", e),
                }
            }
            alive = coordinator.process_next() => {
                if !alive {
                    break;
                }
            }
        }
    }

    tracing::info!("Skylog shutting down");
    Ok(())
}
