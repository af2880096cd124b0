//! human-in-mcp CLI entry point.

use clap::Parser;

use human_in_mcp::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => human_in_mcp::cli::commands::serve::execute(args, cli.json).await,
        Commands::Config(command) => {
            human_in_mcp::cli::commands::config::execute(command, cli.json).await
        }
    };

    if let Err(err) = result {
        human_in_mcp::cli::handle_error(err, cli.json);
    }
}
