use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use uuid::Uuid;

use netherald_db::{Database, DbConfig};

#[derive(Parser)]
#[command(name = "netherald", about = "Netherald user and guild store", version)]
struct Cli {
    /// Database location, overrides NETHERALD_DB_HOST.
    #[arg(long)]
    host: Option<String>,

    /// Overrides NETHERALD_DB_USER.
    #[arg(long)]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a user with no guild and no friends.
    InitUser { uuid: Uuid },
    /// Create a guild owned by (and containing only) the given user.
    InitGuild { name: String, owner: Uuid },
    /// Print a user with its guild and friends.
    GetUser { uuid: Uuid },
    /// Print a guild with its member list.
    GetGuild { id: i64 },
}

fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging (stderr, so stdout stays JSON)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netherald=info,netherald_db=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = DbConfig::from_env().context("reading NETHERALD_DB_* configuration")?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(user) = cli.user {
        config.username = user;
    }

    let mut db = Database::connect(&config).context("connecting to the netherald store")?;
    let output = run(&db, cli.command);
    db.close();

    println!("{}", output?);
    Ok(())
}

fn run(db: &Database, command: Command) -> Result<String> {
    let output = match command {
        Command::InitUser { uuid } => {
            db.init_user(uuid)
                .with_context(|| format!("creating user {}", uuid))?;
            info!("User {} created", uuid);
            serde_json::to_string_pretty(&db.get_user(uuid)?)?
        }
        Command::InitGuild { name, owner } => {
            let id = db
                .init_guild(&name, owner)
                .with_context(|| format!("creating guild {:?}", name))?;
            info!("Guild {:?} created with id {}", name, id);
            id.to_string()
        }
        Command::GetUser { uuid } => {
            let user = db
                .get_user(uuid)
                .with_context(|| format!("loading user {}", uuid))?;
            serde_json::to_string_pretty(&user)?
        }
        Command::GetGuild { id } => {
            let guild = db
                .get_guild(id)
                .with_context(|| format!("loading guild {}", id))?;
            serde_json::to_string_pretty(&guild)?
        }
    };

    Ok(output)
}
