use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use ledgerfeed_core::render_ledger;
use ledgerfeed_ingest::{extract_all, identify_with};
use ledgerfeed_prices::{BeanPrice, PriceJob};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod config;

use config::{init_config, load_config, Config};

#[derive(Parser, Debug)]
#[command(
    name = "ledgerfeed",
    version,
    about = "Bank statement import and price backfill for plain-text ledgers"
)]
struct Cli {
    /// Config file with the importer list and price settings
    #[arg(long, global = true, default_value = "ledgerfeed.toml")]
    config: PathBuf,

    /// Log level when RUST_LOG is not set
    #[arg(
        long,
        global = true,
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter config file
    Init,

    /// Show which importer recognizes each file
    Identify {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the latest transaction date of each recognized statement
    FileDate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Convert recognized statements into ledger transactions
    Extract {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Emit JSON instead of ledger text
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Fetch missing daily prices and append them to the price history
    Prices {
        /// Price tool executable (default: [prices].tool)
        #[arg(long)]
        tool: Option<PathBuf>,

        /// Commodity declarations with `price` metadata (default: [prices].commodities)
        #[arg(long)]
        commodities: Option<PathBuf>,

        /// Price history file (default: [prices].history)
        #[arg(long)]
        history: Option<PathBuf>,

        /// First day to fetch, YYYY-MM-DD (default: day after the last history entry)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Last day to fetch, YYYY-MM-DD (default: two days ago)
        #[arg(long)]
        end_date: Option<NaiveDate>,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Command::Init = cli.command {
        return init_config(&cli.config);
    }

    let cfg = load_config(&cli.config)?;

    match cli.command {
        Command::Init => {}

        Command::Identify { files } => {
            let importers = cfg.importers()?;
            for f in &files {
                match identify_with(&importers, f) {
                    Some(imp) => println!("{}\t{}", f.display(), imp.name()),
                    None => println!("{}\t(unidentified)", f.display()),
                }
            }
        }

        Command::FileDate { files } => {
            let importers = cfg.importers()?;
            for f in &files {
                let Some(imp) = identify_with(&importers, f) else {
                    println!("{}\t(unidentified)", f.display());
                    continue;
                };
                match imp.file_date(f)? {
                    Some(d) => println!("{}\t{}", f.display(), d),
                    None => println!("{}\t(no transactions)", f.display()),
                }
            }
        }

        Command::Extract { files, json } => {
            let importers = cfg.importers()?;
            if importers.is_empty() {
                bail!(
                    "No importers configured in {} (run: ledgerfeed init)",
                    cli.config.display()
                );
            }
            let txns = extract_all(&importers, &files)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&txns)?);
            } else {
                print!("{}", render_ledger(&txns));
            }
        }

        Command::Prices {
            tool,
            commodities,
            history,
            start_date,
            end_date,
        } => {
            let job = price_job(&cfg, tool, commodities, history)?;
            run_prices(&job, start_date, end_date)?;
        }
    }

    Ok(())
}

fn price_job(
    cfg: &Config,
    tool: Option<PathBuf>,
    commodities: Option<PathBuf>,
    history: Option<PathBuf>,
) -> Result<PriceJob> {
    let pick =
        |arg: Option<PathBuf>, configured: &Option<PathBuf>, flag: &str| -> Result<PathBuf> {
            arg.or_else(|| configured.clone())
                .with_context(|| format!("pass --{flag} or set prices.{flag} in the config"))
        };
    Ok(PriceJob {
        tool: pick(tool, &cfg.prices.tool, "tool")?,
        commodities: pick(commodities, &cfg.prices.commodities, "commodities")?,
        history: pick(history, &cfg.prices.history, "history")?,
    })
}

fn run_prices(job: &PriceJob, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    job.validate()?;

    let today = chrono::Local::now().date_naive();
    let report = job.run(&BeanPrice::new(&job.tool), start, end, today)?;

    println!(
        "Fetched {} day(s) for {}..={}; appended {} bytes to {}",
        report.fetched.len(),
        report.range.start,
        report.range.end,
        report.bytes_written,
        job.history.display()
    );

    if let Some(write) = report.write_failure {
        if let Some(failure) = &report.failure {
            error!(error = %failure, "price backfill also stopped early");
        }
        return Err(write).context("fetched prices could not be appended; re-run to retry");
    }
    if let Some(failure) = report.failure {
        return Err(failure).context("price backfill stopped early; re-run to resume");
    }
    Ok(())
}
