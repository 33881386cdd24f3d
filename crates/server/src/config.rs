//! Command-line interface and environment fallbacks for the binary.

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

/// Default port for the server.
pub const DEFAULT_PORT: u16 = 47893;

/// Days of demo data generated by `seed` when `--days` is omitted.
pub const DEFAULT_SEED_DAYS: u32 = 28;

#[derive(Debug, Parser)]
#[command(name = "copilot-dash", version, about = "Copilot usage analytics dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve(ServeArgs),
    /// Load a JSON usage bundle into the database.
    Import(ImportArgs),
    /// Fill the database with deterministic demo data ending today.
    Seed(SeedArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct DbArgs {
    /// SQLite database path. Falls back to $COPILOT_DASH_DB, then the cache dir.
    #[arg(long)]
    pub db: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    /// Listen port. Falls back to $COPILOT_DASH_PORT, then $PORT.
    #[arg(long)]
    pub port: Option<u16>,
    /// Frontend bundle directory. Falls back to $STATIC_DIR, then ./dist.
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
    #[command(flatten)]
    pub db: DbArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ImportArgs {
    /// JSON file with dailyUsage, weeklyUsage, chatModeRequests, modelUsage, agentAdoption.
    pub file: PathBuf,
    #[command(flatten)]
    pub db: DbArgs,
}

#[derive(Debug, Clone, Args)]
pub struct SeedArgs {
    #[arg(long, default_value_t = DEFAULT_SEED_DAYS)]
    pub days: u32,
    #[command(flatten)]
    pub db: DbArgs,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve the listen port: flag, then `COPILOT_DASH_PORT`, then `PORT`.
pub fn resolve_port(flag: Option<u16>) -> u16 {
    flag.or_else(|| {
        env_var("COPILOT_DASH_PORT")
            .or_else(|| env_var("PORT"))
            .and_then(|p| p.parse().ok())
    })
    .unwrap_or(DEFAULT_PORT)
}

/// Bind address from `COPILOT_DASH_HOST`, default loopback.
pub fn resolve_host() -> IpAddr {
    env_var("COPILOT_DASH_HOST")
        .and_then(|h| h.parse().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Database path from the flag or `COPILOT_DASH_DB`. `None` means the default location.
pub fn resolve_db_path(args: &DbArgs) -> Option<PathBuf> {
    args.db
        .clone()
        .or_else(|| env_var("COPILOT_DASH_DB").map(PathBuf::from))
}

/// Static directory for serving frontend files.
///
/// Priority:
/// 1. `--static-dir`
/// 2. STATIC_DIR environment variable
/// 3. ./dist directory (if it exists)
/// 4. None (API-only mode)
pub fn resolve_static_dir(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| env_var("STATIC_DIR").map(PathBuf::from))
        .or_else(|| {
            let dist = Path::new("dist");
            dist.exists().then(|| dist.to_path_buf())
        })
}
