// crates/server/src/main.rs
//! copilot-dash binary: serve the dashboard API, import usage bundles, or seed demo data.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use copilot_dash_core::UsageBundle;
use copilot_dash_db::{Database, IngestReport, UsageTable};
use copilot_dash_observability::{init_tracing, LogConfig};
use copilot_dash_server::config::{
    resolve_db_path, resolve_host, resolve_port, resolve_static_dir, Cli, Command, DbArgs,
    ImportArgs, SeedArgs, ServeArgs,
};
use copilot_dash_server::{create_app_full, init_metrics};

async fn open_database(args: &DbArgs) -> Result<Database> {
    let db = match resolve_db_path(args) {
        Some(path) => Database::new(&path).await,
        None => Database::open_default().await,
    }
    .context("failed to open database")?;
    Ok(db)
}

fn log_report(report: &IngestReport) {
    for table in UsageTable::ALL {
        let counts = report.table(table);
        tracing::info!(
            table = table.name(),
            inserted = counts.inserted,
            skipped = counts.skipped,
            "ingest"
        );
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    init_metrics();

    let db = open_database(&args.db).await?;
    for (table, rows) in db.table_counts().await? {
        tracing::debug!(table = table.name(), rows, "table size");
    }

    let static_dir = resolve_static_dir(args.static_dir);
    let app = create_app_full(db, static_dir);

    let addr = SocketAddr::new(resolve_host(), resolve_port(args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, version = env!("CARGO_PKG_VERSION"), "copilot-dash listening");
    eprintln!("\n  copilot-dash v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("  \u{2192} http://{addr}\n");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

fn read_bundle(path: &Path) -> Result<UsageBundle> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid usage bundle {}", path.display()))
}

async fn import(args: ImportArgs) -> Result<()> {
    let bundle = read_bundle(&args.file)?;
    let db = open_database(&args.db).await?;
    let report = db.ingest_bundle(&bundle).await?;
    log_report(&report);
    eprintln!(
        "Imported {} rows ({} already present) from {}",
        report.inserted(),
        report.skipped(),
        args.file.display()
    );
    Ok(())
}

async fn seed(args: SeedArgs) -> Result<()> {
    let db = open_database(&args.db).await?;
    let today = chrono::Local::now().date_naive();
    let report = db.seed_demo(today, args.days).await?;
    log_report(&report);
    eprintln!(
        "Seeded {} days of demo data ({} rows inserted) into {}",
        args.days,
        report.inserted(),
        display_path(db.db_path())
    );
    Ok(())
}

fn display_path(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        ":memory:".to_string()
    } else {
        path.display().to_string()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = init_tracing(&LogConfig::from_env())?;

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => serve(args).await,
        Command::Import(args) => import(args).await,
        Command::Seed(args) => seed(args).await,
    }
}
