use biodiversity_rust::{report, AnalysisConfig, BiodiversityAnalysis};
use std::env;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "biodiversity_rust=info,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Optional single argument: path to a JSON config file
    let config = match env::args().nth(1) {
        Some(path) => AnalysisConfig::load(Path::new(&path))?,
        None => AnalysisConfig::default(),
    };

    tracing::info!(
        species = ?config.species_path,
        observations = ?config.observations_path,
        "starting biodiversity analysis"
    );

    let analysis = BiodiversityAnalysis::new(config.clone())?;
    let results = analysis.run()?;

    results.print()?;

    report::render_conservation_chart(
        &results.ranked_conservation_counts,
        &config.output_dir.join("conservation_status_by_species.png"),
    )?;
    report::render_observation_chart(
        &results.observations_by_park,
        &config.output_dir.join("sheep_observations_by_park.png"),
    )?;

    tracing::info!(output_dir = ?config.output_dir, "analysis complete");
    Ok(())
}
