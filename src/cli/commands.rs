use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "crewlink")]
#[command(author, version, about = "Route messages between agents and inspect the communication log", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Publish a message to an agent's queue and log it
    Send {
        agent: String,
        message: String,
    },

    /// Drain an agent's queue once, logging every message received
    Monitor {
        agent: String,
    },

    /// Show logged messages
    History {
        /// Only show messages of this queue
        #[arg(short, long)]
        queue: Option<String>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// List configured agent registrations
    Agents,

    /// Show a prebuilt crew
    Crew {
        name: String,
    },

    /// Fetch an agent definition from a URL
    FetchAgent {
        url: String,
    },
}
