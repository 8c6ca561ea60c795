use analytics::dashboards::d402_ecommerce_kpi::{generate_report, load_prepared};
use analytics::shared::{config, logger};
use clap::Parser;
use contracts::dashboards::d402_ecommerce_kpi::{ReportOutcome, ReportRequest};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "ecom-report",
    about = "Compute e-commerce KPIs for a period against the previous year"
)]
struct Cli {
    /// Configuration file (defaults to config.toml next to the executable)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the CSV sources
    #[arg(long)]
    data: Option<PathBuf>,

    /// Report year
    #[arg(long)]
    year: Option<i32>,

    /// Report month; omit for the whole year
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Print the years that have delivered orders and exit
    #[arg(long)]
    list_years: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = config::load_config(cli.config.as_deref())?;
    logger::init(Path::new(&config.logging.dir))?;

    if let Some(data) = &cli.data {
        config.data.path = data.to_string_lossy().into_owned();
    }
    if let Some(year) = cli.year {
        config.report.year = year;
        // a new year without --month means the whole year
        config.report.month = cli.month;
    } else if cli.month.is_some() {
        config.report.month = cli.month;
    }

    let data_path = config::resolve_data_path(&config)?;
    tracing::info!("Using data directory {}", data_path.display());

    if cli.list_years {
        let dataset = load_prepared(&data_path)?;
        for year in dataset.available_years() {
            println!("{}", year);
        }
        return Ok(());
    }

    let request = ReportRequest {
        year: config.report.year,
        month: config.report.month,
    };
    let outcome = generate_report(&data_path, &request)?;

    if let ReportOutcome::NoData { period, message } = &outcome {
        tracing::warn!("{} ({})", message, period);
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string(&outcome)?
    };
    println!("{}", json);

    Ok(())
}
