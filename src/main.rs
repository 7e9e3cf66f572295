use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use structopt::StructOpt;

use timetable_solver::display::{print_report, render_json, write_report_to_file};
use timetable_solver::parser::load_catalog;
use timetable_solver::schedule::{SearchLimits, Solver};
use timetable_solver::web;

const DEFAULT_CATALOG: &str = "data/catalog.csv";

#[derive(StructOpt)]
#[structopt(about = "Lists every clash-free combination of class options")]
struct Args {
    #[structopt(subcommand)]
    command: Option<Command>,
}

#[derive(StructOpt)]
enum Command {
    /// Solve a catalog and print the result
    Solve(SolveArgs),
    /// Serve the solver over HTTP
    Web {
        /// Port to listen on
        #[structopt(long, env = "PORT", default_value = "8080")]
        port: u16,
        /// Catalog to solve at startup
        #[structopt(long)]
        catalog: Option<PathBuf>,
        /// Stop each search after this many seconds
        #[structopt(long)]
        time_limit: Option<u64>,
    },
}

#[derive(StructOpt, Default)]
struct SolveArgs {
    /// The path to a CSV or JSON catalog
    #[structopt(long)]
    catalog: Option<PathBuf>,
    /// Print the result as JSON
    #[structopt(long)]
    json: bool,
    /// Stop the search after this many seconds
    #[structopt(long)]
    time_limit: Option<u64>,
    /// Also write the result to this file
    #[structopt(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::from_args();
    match args.command {
        Some(Command::Web {
            port,
            catalog,
            time_limit,
        }) => {
            let initial = match catalog {
                Some(path) => Some(
                    load_catalog(&path)
                        .with_context(|| format!("loading catalog {}", path.display()))?,
                ),
                None => None,
            };
            info!("Starting web server on http://localhost:{}", port);
            web::start_server(port, initial, time_limit.map(Duration::from_secs)).await?;
            Ok(())
        }
        Some(Command::Solve(solve_args)) => solve(solve_args).await,
        None => solve(SolveArgs::default()).await,
    }
}

async fn solve(args: SolveArgs) -> Result<()> {
    let path = args
        .catalog
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG));
    let classes =
        load_catalog(&path).with_context(|| format!("loading catalog {}", path.display()))?;
    info!("Loaded {} classes from {}", classes.len(), path.display());

    let solver = Solver::new(classes)?;
    let stop = Arc::new(AtomicBool::new(false));

    // Ctrl-C stops the search; whatever was found so far is still reported.
    let signal_stop = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping search");
            signal_stop.store(true, Ordering::Relaxed);
        }
    });

    let time_limit = args.time_limit.map(Duration::from_secs);
    let search_stop = stop.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let mut limits = SearchLimits::new().with_stop_flag(&search_stop);
        if let Some(limit) = time_limit {
            limits = limits.with_time_limit(limit);
        }
        solver.solve_with(&limits)
    })
    .await
    .context("search task failed")?;

    if args.json {
        println!("{}", render_json(&outcome)?);
    } else {
        print_report(&outcome);
    }

    if let Some(output) = args.output {
        write_report_to_file(&output, &outcome, args.json)
            .map_err(|e| anyhow::anyhow!("writing {}: {}", output.display(), e))?;
        info!("Result saved to {}", output.display());
    }

    Ok(())
}
