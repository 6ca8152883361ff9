use clap::{Parser, Subcommand};
use std::io::Write;
use wylds_cli::commands;
use wylds_cli::readline;
use wylds_cli::CliContext;

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let ctx = CliContext::new();
    ctx.tasks.lock().await.sweeper = Some(ctx.start_sweeper());

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    if let Some(sweeper) = ctx.tasks.lock().await.sweeper.take() {
        sweeper.abort();
    }
    Ok(())
}

#[derive(Parser)]
#[command(version, about = "co-op arena")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the encounter ladder as a player sees it
    Encounters {
        #[arg(short, long)]
        player: String,
    },
    /// Queue for an encounter
    Join {
        #[arg(short, long)]
        player: String,
        #[arg(short, long)]
        encounter: String,
    },
    /// Leave the matchmaking queue
    Leave {
        #[arg(short, long)]
        player: String,
    },
    /// Submit a combat action (attack, power_strike, defend, heal)
    Act {
        #[arg(short, long)]
        player: String,
        #[arg(short, long)]
        action: String,
    },
    /// Show the player's active battle
    Status {
        #[arg(short, long)]
        player: String,
    },
    /// Show accumulated rewards and cleared encounters
    Progress {
        #[arg(short, long)]
        player: String,
    },
    Config,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "wylds".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Encounters { player }) => commands::encounters(ctx, player).await,
        Some(Commands::Join { player, encounter }) => commands::join(ctx, player, encounter).await,
        Some(Commands::Leave { player }) => commands::leave(ctx, player).await,
        Some(Commands::Act { player, action }) => commands::act(ctx, player, action).await,
        Some(Commands::Status { player }) => commands::status(ctx, player).await,
        Some(Commands::Progress { player }) => commands::progress(ctx, player).await,
        Some(Commands::Config) => commands::show_settings(ctx).await,
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
