use anyhow::Context;
use clap::Parser;
use geoloc_util::batch;
use geoloc_util::config;
use geoloc_util::location::LocationResolver;
use geoloc_util::output;
use tracing_subscriber::EnvFilter;

/// geoloc: look up latitude/longitude for US locations.
///
/// Each location is either a 5-digit ZIP code or "City, State" with a
/// two-letter state abbreviation. Invalid entries are reported inline and
/// never stop the rest of the batch.
///
/// Examples:
///   geoloc --locations "Madison, WI" 83686
///   geoloc --locations "Chicago, IL" "Nope, XX" 1234
///
/// Requires an OpenWeather API key in GEOLOC_API_KEY (or OPENWEATHER_API_KEY,
/// a .env file, or ~/.geoloc/config.json).
#[derive(Parser)]
#[command(name = "geoloc", version, about, long_about)]
struct Cli {
    /// One or more locations: "City, State" or a ZIP code.
    #[arg(long, required = true, num_args = 1..)]
    locations: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = config::load_config().context("failed to load configuration")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    let resolver = LocationResolver::new(&config);
    let results = batch::process(&resolver, &cli.locations);

    let stdout = std::io::stdout();
    output::write_results(&mut stdout.lock(), &results).context("failed to write results")?;
    Ok(())
}
