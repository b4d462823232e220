//! Dust Snapshot CLI
//!
//! Runs one polling cycle against Open-Meteo and prints the report as JSON.
//!
//! Usage:
//!   dust-snapshot --region "Middle East" --scope region --output report.json

use anyhow::Result;
use clap::Parser;
use dust_feed::{Aggregator, FeedConfig, OpenMeteoClient};
use dust_risk::{RiskComponents, TierScope};
use dust_sites::{RegionFilter, SiteRegistry};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "dust-snapshot",
    about = "Fetch, score and tier dust storm risk for the monitored cities"
)]
struct Args {
    /// Region to report ("Global" for every city)
    #[arg(short, long, default_value = "Global")]
    region: RegionFilter,

    /// Ranking scope: global or region (overrides DUST_TIER_SCOPE)
    #[arg(short, long)]
    scope: Option<TierScope>,

    /// Only print High-tier cities
    #[arg(long)]
    alerts_only: bool,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays valid JSON
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = FeedConfig::from_env()?;
    if let Some(scope) = args.scope {
        config.tier_scope = scope;
    }

    let registry = Arc::new(SiteRegistry::dust_belt());
    let client = OpenMeteoClient::new(&config)?;
    let aggregator = Aggregator::new(Arc::new(client), registry, &config);

    info!(
        "Fetching {} sites ({} tiering)",
        aggregator.registry().len(),
        aggregator.scope()
    );
    let report = aggregator.run_cycle().await.for_region(args.region);

    for loc in &report.locations {
        let c = RiskComponents::from_observation(&loc.observation());
        debug!(
            "  {:6} {:.2} | {:20} | pm10 {:.2} dust {:.2} wind {:.2} dry {:.2}",
            loc.risk.as_str(),
            loc.score,
            loc.name,
            c.pm10,
            c.dust,
            c.wind,
            c.dryness
        );
    }

    let json = if args.alerts_only {
        serde_json::to_string_pretty(&report.alerts(RegionFilter::Global))?
    } else {
        serde_json::to_string_pretty(&report)?
    };

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            writeln!(writer, "{}", json)?;
            info!("Wrote {} ({} cities)", path.display(), report.locations.len());
        }
        None => println!("{}", json),
    }

    Ok(())
}
