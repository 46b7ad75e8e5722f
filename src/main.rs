use anyhow::Result;
use clap::Parser;
use crewlink::agents::{prebuilt_crew, AgentLookup};
use crewlink::cli::{Cli, Commands};
use crewlink::{utils, Orchestrator, Settings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Crew { name } => handle_crew(&name),
        Commands::FetchAgent { url } => handle_fetch_agent(&url).await,
        command => {
            let orchestrator = Orchestrator::from_settings(&settings).await?;
            let result = run(&orchestrator, command).await;

            // Close regardless of the command outcome
            if let Err(e) = orchestrator.close().await {
                utils::print_error(&format!("Failed to close cleanly: {}", e));
            }
            result
        }
    }
}

async fn run(orchestrator: &Orchestrator, command: Commands) -> Result<()> {
    match command {
        Commands::Send { agent, message } => {
            orchestrator.send(&agent, &message).await?;
            let queue = orchestrator.queue_for(&agent)?;
            utils::print_success(&format!("Sent to {} via '{}'", agent, queue));
        }
        Commands::Monitor { agent } => {
            let handled = orchestrator.monitor(&agent).await?;
            utils::print_success(&format!("Logged {} message(s) for {}", handled, agent));
        }
        Commands::History { queue, json } => {
            let records = match queue {
                Some(queue) => orchestrator.log().fetch_queue(&queue)?,
                None => orchestrator.log().fetch_all()?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                utils::print_info("No messages logged yet");
            } else {
                utils::print_header(&format!(
                    "Communication log ({})",
                    orchestrator.log().path().display()
                ));
                for record in &records {
                    utils::print_record(record);
                }
            }
        }
        Commands::Agents => {
            let agents = orchestrator.agents();
            if agents.is_empty() {
                utils::print_info("No agents configured (add them as [[agents]] entries)");
            }
            for (name, queue) in agents {
                println!("  {} -> {}", name, queue);
            }
        }
        Commands::Crew { .. } | Commands::FetchAgent { .. } => {
            anyhow::bail!("command does not use the message bus");
        }
    }
    Ok(())
}

fn handle_crew(name: &str) -> Result<()> {
    let crew = prebuilt_crew(name)?;
    utils::print_header(&format!("Crew: {}", name));
    for agent in &crew.agents {
        utils::print_agent(agent);
    }
    Ok(())
}

async fn handle_fetch_agent(url: &str) -> Result<()> {
    utils::print_info("Fetching agent definition...");
    let agent = AgentLookup::new().fetch_agent_definition(url).await?;
    println!("{}", serde_json::to_string_pretty(&agent)?);
    Ok(())
}
