use anyhow::Context;
use clap::Parser;
use launch_lens::utils::logger;
use launch_lens::utils::validation::{validate_required_field, Validate};
use launch_lens::{CliConfig, Command, LaunchLens, LensError, RpcClient};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose, cli.json_logs);
    tracing::info!("Starting launch-lens");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!("❌ {:#}", e);
        eprintln!("❌ {:#}", e);

        // 依錯誤類型決定結束碼
        let exit_code = e
            .downcast_ref::<LensError>()
            .map(LensError::exit_code)
            .unwrap_or(1);
        std::process::exit(exit_code);
    }
}

async fn run(cli: &CliConfig) -> anyhow::Result<()> {
    let settings = cli.load_settings().context("loading configuration")?;
    settings.validate()?;

    if matches!(cli.command, Command::Collect { .. }) {
        validate_required_field("registry.address", &settings.registry)?;
    }

    let client = Arc::new(RpcClient::from_config(&settings));
    let lens = LaunchLens::new(
        Arc::clone(&client),
        client,
        settings.capabilities(),
        settings.concurrent_requests,
    );

    let output = match &cli.command {
        Command::Classify { record } => {
            let profile = lens.classify(record).await;
            serde_json::json!({ "record": record, "profile": profile })
        }
        Command::Aggregate { record, requester } => {
            let composite = lens
                .aggregate(*record, *requester)
                .await
                .with_context(|| format!("aggregating {}", record))?;
            serde_json::to_value(composite)?
        }
        Command::Collect {
            type_tag,
            offset,
            limit,
            requester,
        } => {
            let page = lens
                .collect_page(*type_tag, *offset, *limit, *requester)
                .await
                .with_context(|| format!("collecting type {} from offset {}", type_tag, offset))?;
            serde_json::to_value(page)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
