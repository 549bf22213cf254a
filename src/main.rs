use clap::Parser;
use std::sync::Arc;
use teamform::utils::logger;
use teamform::{
    load_snapshot, CliArgs, FormationConfig, FormationOrchestrator, HashEmbedding,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting teamform");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let config = match &args.config {
        Some(path) => FormationConfig::from_toml_file(path)?,
        None => FormationConfig::default(),
    };

    let pool = load_snapshot(&args.input)?;
    tracing::info!("Loaded {} participants from {}", pool.len(), args.input);

    let orchestrator = FormationOrchestrator::new(Arc::new(HashEmbedding::default()), config)?;
    let outcome = orchestrator.form_teams(&pool).await?;

    let json = serde_json::to_string_pretty(&outcome)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!("Outcome written to {}", path);
        }
        None => println!("{json}"),
    }

    Ok(())
}
