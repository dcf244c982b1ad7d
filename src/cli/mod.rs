pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "anygym")]
#[command(about = "AnyGym CLI - inspect entities and query generation, check a running API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List registered entities")]
    Entities,

    #[command(about = "Show an entity's fields, types and filter operators")]
    Describe {
        #[arg(help = "Entity name, e.g. plans")]
        entity: String,
    },

    #[command(about = "Print the SELECT a list query would run, without a database")]
    Explain {
        #[arg(help = "Entity name")]
        entity: String,

        #[arg(help = "Query string, e.g. 'plan_name=Gold&sort=-price'", default_value = "")]
        query: String,
    },

    #[command(about = "Health check a running server")]
    Ping {
        #[arg(long, env = "ANYGYM_API_URL", default_value = "http://localhost:3000")]
        url: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Entities => commands::describe::list(output_format),
        Commands::Describe { entity } => commands::describe::show(&entity, output_format),
        Commands::Explain { entity, query } => commands::explain::handle(&entity, &query, output_format),
        Commands::Ping { url } => commands::ping::handle(&url, output_format).await,
    }
}
