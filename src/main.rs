use clap::Parser;
use retro_etl::utils::{logger, validation::Validate};
use retro_etl::{
    open_source, BoardPipeline, CliConfig, ExportEngine, ExportError, LocalStorage, OutputNamer,
};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose, config.json_logs);

    tracing::info!("Starting retro-etl");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ Export failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(e.exit_code());
    }
}

async fn run(config: &CliConfig) -> Result<(), ExportError> {
    config.validate()?;
    let export_config = config.export_config()?;

    let source = open_source(config.source()?, &export_config)?;

    let mut namer =
        OutputNamer::from_current_dir()?.with_extension(export_config.output.extension.clone());
    if let Some(directory) = &export_config.output.directory {
        namer = namer.with_directory(directory);
    }

    let pipeline = BoardPipeline::new(source, LocalStorage::new(), namer)
        .with_output(config.output.clone())
        .with_escaping(export_config.format.escaping);

    let engine = ExportEngine::new_with_monitoring(pipeline, config.monitor);

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        let document = engine.preview().await?;
        print!("{}", document.text);
        return Ok(());
    }

    let output_path = engine.run().await?;
    tracing::info!("✅ Export completed");
    println!(
        "Successfully written to file at: {}",
        output_path.display()
    );

    Ok(())
}
