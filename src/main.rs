use cc_secgroup::utils::error::{ErrorSeverity, SecGroupError};
use cc_secgroup::utils::logger;
use cc_secgroup::{execute, Action, ActionResult, CliConfig, Command, TomlConfig};
use clap::Parser;

async fn run(config: &CliConfig) -> Result<ActionResult, SecGroupError> {
    let action = match config.command {
        Command::Apply => Action::Apply,
        Command::Remove => Action::Remove,
    };
    let group_id = config.group_id.as_deref();

    match &config.config {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path);
            let mut file_config = TomlConfig::from_file(path)?;
            config.apply_overrides(&mut file_config);
            execute(&file_config, action, group_id).await
        }
        None => execute(config, action, group_id).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting cc-secgroup {:?}", config.command);

    match run(&config).await {
        Ok(ActionResult::Applied(outcome)) => {
            let verb = if outcome.created { "created" } else { "updated" };
            println!("✅ Security group {} ({})", verb, outcome.guid);
        }
        Ok(ActionResult::Removed) => {
            println!("✅ Security group removed");
        }
        Err(e) => {
            tracing::error!(
                "❌ {:?} failed: {} (Category: {:?}, Severity: {:?})",
                config.command,
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
