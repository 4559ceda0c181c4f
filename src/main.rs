use cep_lookup::app::commands;
use cep_lookup::core::ConfigProvider;
use cep_lookup::utils::error::{CepError, ErrorSeverity};
use cep_lookup::utils::{logger, validation::Validate};
use cep_lookup::{AddressHistoryManager, CliConfig, LocalStorage, TomlConfig, ViaCepClient};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.json_logs);

    tracing::info!("Starting cep-lookup CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 有指定設定檔時以設定檔為準
    let result = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(config) => execute(&config, &cli).await,
                Err(e) => Err(e),
            }
        }
        None => execute(&cli, &cli).await,
    };

    match result {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 地址已查到，照常顯示
            if let CepError::NotSaved { address, .. } = &e {
                println!("{}", address);
            }

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn execute<C>(config: &C, cli: &CliConfig) -> cep_lookup::Result<String>
where
    C: ConfigProvider + Validate,
{
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e);
    }

    let storage = LocalStorage::new(config.storage_path());
    let client = ViaCepClient::from_config(config);
    let manager = AddressHistoryManager::initialize(client, storage).await?;

    commands::run(&manager, &cli.command).await
}
