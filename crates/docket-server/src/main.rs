//! `docket`, the law-office record keeper server.
//!
//! Reads `docket.toml` (or the path given with `--config`), opens the SQLite
//! store, and serves the JSON API under `/api`.
//!
//! # Staff accounts
//!
//! Accounts are provisioned from the command line; the password is read
//! from stdin:
//!
//! ```text
//! docket add-user --name "Grace Okafor" --email grace@example.com --role lawyer
//! ```

mod settings;

use std::{
  io::{self, BufRead, Write},
  path::PathBuf,
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::Router;
use clap::{Parser, Subcommand};
use docket_core::{
  identity::{NewUser, Role},
  service::Office,
  store::OfficeStore,
};
use docket_store_sqlite::SqliteStore;
use rand_core::OsRng;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Docket case and client record keeper")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "docket.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Print the argon2 hash for a password entered on stdin and exit.
  HashPassword,
  /// Create a staff account; the password is read from stdin.
  AddUser {
    #[arg(long)]
    name:  String,
    #[arg(long)]
    email: String,
    /// One of `admin`, `lawyer`, `paralegal`.
    #[arg(long)]
    role:  Role,
    #[arg(long)]
    phone: Option<String>,
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

  match cli.command.unwrap_or(Command::Serve) {
    Command::HashPassword => {
      println!("{}", hash_password(&read_password()?)?);
      Ok(())
    }
    Command::AddUser { name, email, role, phone } => {
      let cfg = ServerConfig::load(&cli.config)?;
      let store = open_store(&cfg).await?;
      let password_hash = hash_password(&read_password()?)?;
      let user = store
        .add_user(NewUser { name, email: email.trim().to_owned(), role, phone, password_hash })
        .await
        .context("failed to add user")?;
      tracing::info!(user_id = %user.id, email = %user.email, role = %user.role, "user added");
      println!("{}", user.id);
      Ok(())
    }
    Command::Serve => serve(ServerConfig::load(&cli.config)?).await,
  }
}

async fn serve(cfg: ServerConfig) -> anyhow::Result<()> {
  let store = open_store(&cfg).await?;
  let office = Office::new(Arc::new(store));

  let app = Router::new()
    .nest("/api", docket_api::api_router(office))
    .layer(TraceLayer::new_for_http());

  let address = cfg.address();
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn open_store(cfg: &ServerConfig) -> anyhow::Result<SqliteStore> {
  if let Some(parent) = cfg.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))
}

fn hash_password(password: &str) -> anyhow::Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string(),
  )
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  eprint!("Password: ");
  io::stderr().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  let password = line.trim_end_matches(['\r', '\n']).to_owned();
  anyhow::ensure!(!password.is_empty(), "password must not be empty");
  Ok(password)
}
