//! shoppulse - sales workspace CLI
//!
//! Thin caller over the core: ingests spreadsheet exports into a per-project
//! ledger, lists records, runs demand forecasts and purges stores. Domain
//! failures (bad files, too little history) are rendered as messages, not
//! crashes.

use anyhow::Result;
use clap::{Parser, Subcommand};
use shoppulse::{
    forecast, ingest, uploads, IngestMode, ProjectRef, PurgeScope, Recommendation, Workspace,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "shoppulse", version, about = "Sales-data workspace and demand forecaster")]
struct Cli {
    /// Workspace root folder (defaults to SHOPPULSE_ROOT or the platform data dir)
    #[arg(long, global = true)]
    root: Option<String>,

    /// User workspace to operate on
    #[arg(long, short, global = true, default_value = "DefaultUser")]
    user: String,

    /// Named project within the user workspace (omit for the default project)
    #[arg(long, short, global = true)]
    project: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a CSV export into the project ledger
    Ingest {
        /// Path to the file to ingest
        file: std::path::PathBuf,
        /// Wipe the ledger before inserting instead of merging by key
        #[arg(long)]
        replace: bool,
        /// Skip archiving the file alongside the ledger
        #[arg(long)]
        no_archive: bool,
    },
    /// Print every ledger record
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Forecast short-term demand for one product
    Forecast {
        /// Product name, matched case-sensitively
        product: String,
        /// Days to project forward
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Remove ledger data
    Purge {
        /// Delete the backing database file instead of just emptying it
        #[arg(long)]
        hard: bool,
    },
    /// List this user's named projects
    Projects,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let workspace = Workspace::resolve(cli.root.as_deref());
    let project = ProjectRef::new(cli.user.clone(), cli.project.clone());
    info!(root = %workspace.root().display(), user = cli.user, "Workspace resolved");

    if let Err(err) = run(&workspace, &project, cli.command).await {
        // Domain failures are guidance for the user, not process failures
        if err.is_recoverable() {
            eprintln!("{err}");
            std::process::exit(1);
        }
        return Err(err.into());
    }
    Ok(())
}

async fn run(
    workspace: &Workspace,
    project: &ProjectRef,
    command: Command,
) -> shoppulse::Result<()> {
    match command {
        Command::Ingest {
            file,
            replace,
            no_archive,
        } => {
            let data = std::fs::read(&file)?;

            if !no_archive {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let dir = workspace.upload_dir(project)?;
                let stored = uploads::store_upload(&dir, &name, &data)?;
                println!("Archived upload as {stored}");
            }

            let ledger = workspace.open_ledger(project).await?;
            let mode = if replace {
                IngestMode::Replace
            } else {
                IngestMode::Append
            };
            let report = ingest(&ledger, &data, mode).await?;
            println!("{}", report.message);
        }
        Command::List { json } => {
            let ledger = workspace.open_ledger(project).await?;
            let mut records = ledger.query_all().await?;
            records.sort_by(|a, b| {
                a.date
                    .cmp(&b.date)
                    .then_with(|| a.product_name.cmp(&b.product_name))
            });

            if json {
                println!("{}", serde_json::to_string_pretty(&records).map_err(|e| {
                    shoppulse::Error::InvalidInput(format!("JSON encoding failed: {e}"))
                })?);
            } else {
                println!("{:<12} {:<30} {:>10} {:>12}", "date", "product", "quantity", "revenue");
                for r in &records {
                    println!(
                        "{:<12} {:<30} {:>10} {:>12.2}",
                        r.date, r.product_name, r.quantity, r.revenue
                    );
                }
                println!("{} record(s)", records.len());
            }
        }
        Command::Forecast { product, days } => {
            let ledger = workspace.open_ledger(project).await?;
            let records = ledger.query_all().await?;
            let result = forecast(&records, &product, days)?;

            println!("Forecast for {product} ({days} days)");
            println!("  fit: R^2 = {:.3}, confidence = {:.1}%", result.r_squared, result.confidence_pct);
            match result.growth_pct {
                Some(g) => println!("  expected growth: {g:+.1}%"),
                None => println!("  expected growth: undefined (no historical volume)"),
            }
            println!("  suggested stock for horizon: {:.0} units", result.projected_total);
            let advice = match result.recommendation {
                Recommendation::SurgeAlert => {
                    "High demand alert: increase inventory orders to avoid stockouts"
                }
                Recommendation::SteadyGrowth => {
                    "Steady growth: maintain healthy stock levels and monitor"
                }
                Recommendation::Stable => "Stable demand: standard restocking recommended",
                Recommendation::Decline => {
                    "Declining trend: consider a promotion or reduced orders"
                }
            };
            println!("  {advice}");
        }
        Command::Purge { hard } => {
            let ledger = workspace.open_ledger(project).await?;
            let scope = if hard {
                PurgeScope::EntireStore
            } else {
                PurgeScope::AllRecords
            };
            ledger.purge(scope).await?;
            println!("Purge complete");
        }
        Command::Projects => {
            for name in workspace.list_projects(&project.user)? {
                println!("{name}");
            }
        }
    }
    Ok(())
}
