//! Daily astronomy reel bot binary.

use clap::{Parser, Subcommand};
use tracing::{error, info};

use astroreel_bot::{init_tracing, run_forever, run_once, BotContext, Settings};

#[derive(Parser)]
#[command(name = "astroreel", version, about = "Daily astronomy reel bot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch, render and publish one reel, then exit
    Post,
    /// Run the daily scheduler until interrupted
    Run,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let _guard = init_tracing(&settings.log_dir, settings.log_json);
    info!("Starting astroreel");

    let mut ctx = match BotContext::from_settings(settings) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Failed to initialize: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Command::Post => {
            let published = run_once(&mut ctx).await;
            std::process::exit(if published { 0 } else { 1 });
        }
        Command::Run => {
            run_forever(&mut ctx).await;
            info!("Scheduler stopped");
        }
    }
}
