//! inmo-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `INMO_*`
//! environment variables, opens the SQLite store and serves the API.
//!
//! # Seeding the first admin
//!
//! ```text
//! inmo-server issue-session --email root@inmo.example --role admin
//! ```
//!
//! prints a bearer token for that identity.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use inmo_api::AppState;
use inmo_core::{actor::Role, store::ResourceStore};
use inmo_server::{LocalObjects, ServerConfig, expand_tilde};
use inmo_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Inmo marketplace server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Register an identity with a role and print a new session token.
  IssueSession {
    #[arg(long)]
    email: String,
    /// admin, agent or user.
    #[arg(long, default_value = "user")]
    role:  Role,
  },
  /// End the session behind a token.
  RevokeSession {
    #[arg(long)]
    token: String,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = ServerConfig::load(&cli.config)?;

  let store_path = expand_tilde(&cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(cfg, store).await,
    Command::IssueSession { email, role } => issue_session(&cfg, &store, &email, role).await,
    Command::RevokeSession { token } => {
      let revoked = store
        .revoke_session(&token)
        .await
        .context("failed to revoke session")?;
      if !revoked {
        anyhow::bail!("no such session");
      }
      tracing::info!("session revoked");
      Ok(())
    }
  }
}

async fn serve(cfg: ServerConfig, store: SqliteStore) -> anyhow::Result<()> {
  let media_dir = expand_tilde(&cfg.media_dir);
  tokio::fs::create_dir_all(&media_dir)
    .await
    .with_context(|| format!("failed to create media dir {media_dir:?}"))?;

  let objects = LocalObjects::new(&media_dir, cfg.media_base_url.clone());
  let state = AppState::new(Arc::new(store), Arc::new(objects));
  let app = inmo_server::app(state, &media_dir);

  let address = cfg.address();
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

async fn issue_session(
  cfg: &ServerConfig,
  store: &SqliteStore,
  email: &str,
  role: Role,
) -> anyhow::Result<()> {
  if role == Role::Anonymous {
    anyhow::bail!("role must be admin, agent or user");
  }

  let identity = store
    .register_identity(email)
    .await
    .context("failed to register identity")?;
  store
    .create_profile(identity.user_id, role)
    .await
    .context("failed to write profile")?;
  let token = store
    .issue_session(identity.user_id, cfg.session_ttl())
    .await
    .context("failed to issue session")?;

  tracing::info!(user = %identity.user_id, %role, "identity ready");
  println!("{token}");
  Ok(())
}
