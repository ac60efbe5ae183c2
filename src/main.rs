use channel_registry::config::toml_config::ChannelManifest;
use channel_registry::utils::error::ErrorSeverity;
use channel_registry::utils::{logger, validation::Validate};
use channel_registry::{
    configure_channels, BootstrapReport, ChannelDefinition, ChannelRegistry, CliConfig,
    FileNotificationHost, InMemoryNotificationHost, NotificationHost, Registration,
};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("🚀 Starting channel-registry");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證命令列參數
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let manifest = match &config.manifest {
        Some(path) => {
            tracing::info!("📁 Loading channel manifest from: {}", path);
            match ChannelManifest::from_file(path) {
                Ok(manifest) => manifest,
                Err(e) => {
                    eprintln!("❌ Failed to load manifest '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            }
        }
        None => {
            tracing::info!("📁 No manifest given, using the built-in channel");
            ChannelManifest::builtin()
        }
    };

    if let Err(e) = manifest.validate() {
        tracing::error!("❌ Manifest validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let api_level = config.api_level.unwrap_or_else(|| manifest.api_level());
    let state_file = config
        .state_file
        .clone()
        .or_else(|| manifest.state_file().map(str::to_string));
    let definitions = manifest.definitions();

    display_summary(&manifest, &definitions, api_level, state_file.as_deref(), &config);

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - platform will not be touched");
        perform_dry_run(&definitions, api_level);
        return Ok(());
    }

    let reports = match &state_file {
        Some(path) => run_passes(
            FileNotificationHost::new(path, api_level),
            &definitions,
            config.passes,
        ),
        None => run_passes(
            InMemoryNotificationHost::new(api_level),
            &definitions,
            config.passes,
        ),
    };

    let worst = reports
        .iter()
        .filter_map(BootstrapReport::worst_failure)
        .max_by_key(|e| e.severity());

    match worst {
        None => {
            tracing::info!("✅ Notification channels configured");
            println!("✅ Notification channels configured");
        }
        Some(e) => {
            tracing::error!(
                "❌ Channel configuration incomplete: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
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

/// 模擬多個初始化流程共用同一個 registry
fn run_passes<H: NotificationHost>(
    host: H,
    definitions: &[ChannelDefinition],
    passes: usize,
) -> Vec<BootstrapReport> {
    let mut registry = ChannelRegistry::new(host);
    let mut reports = Vec::with_capacity(passes);

    for pass in 1..=passes {
        let report = configure_channels(&mut registry, definitions);
        print_report(pass, &report);
        reports.push(report);
    }

    reports
}

fn print_report(pass: usize, report: &BootstrapReport) {
    println!("📋 Pass {}:", pass);
    for (id, registration) in &report.outcomes {
        println!("  {} -> {}", id, registration);
    }
    for (id, error) in report.failures() {
        println!("  {} -> failed: {}", id, error);
    }
    println!(
        "  created: {}, updated: {}, unchanged: {}, failed: {}",
        report.created(),
        report.count(Registration::Updated) + report.count(Registration::Refreshed),
        report.count(Registration::Unchanged),
        report.failures().len()
    );
}

fn display_summary(
    manifest: &ChannelManifest,
    definitions: &[ChannelDefinition],
    api_level: u32,
    state_file: Option<&str>,
    config: &CliConfig,
) {
    println!("📋 Configuration Summary:");
    println!("  App: {}", manifest.app.name);
    println!("  API level: {}", api_level);
    println!("  Channels: {}", definitions.len());
    match state_file {
        Some(path) => println!("  Platform: file ({})", path),
        None => println!("  Platform: in-memory"),
    }
    println!("  Passes: {}", config.passes);

    if config.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(definitions: &[ChannelDefinition], api_level: u32) {
    let probe = InMemoryNotificationHost::new(api_level);

    println!("🔍 Dry Run Analysis:");
    if !probe.supports_channels() {
        println!(
            "  ⚠️ API level {} has no notification channels; registration would be skipped",
            api_level
        );
        return;
    }

    for definition in definitions {
        println!(
            "  {} \"{}\" importance={} (level {})",
            definition.id(),
            definition.display_name(),
            definition.importance(),
            definition.importance().platform_level()
        );
        if !definition.description().is_empty() {
            println!("    {}", definition.description());
        }
    }

    println!();
    println!("✅ Dry run analysis complete.");
}
