use anyhow::Context;
use clap::Parser;
use fpl_cup::core::{ResultSource, RosterProvider};
use fpl_cup::render::{self, OutputFormat};
use fpl_cup::utils::error::ErrorSeverity;
use fpl_cup::utils::{logger, validation::Validate};
use fpl_cup::{
    CliConfig, CupError, FplClient, LeagueSnapshot, ResultsFile, TournamentConfig,
    TournamentEngine,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting fpl-cup");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = TournamentConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    // 套用命令列覆蓋設定
    if let Some(current) = args.current_gameweek {
        config.tournament.current_gameweek = Some(current);
        tracing::info!("🔧 Current gameweek overridden to: {}", current);
    }
    if let Some(seed) = args.seed {
        config.tournament.seed = Some(seed);
        tracing::info!("🔧 Draw seed overridden to: {}", seed);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
    tracing::info!("✅ Configuration loaded and validated successfully");

    let format = args.format.unwrap_or_else(|| config.output_format());
    let show_fixtures = args.fixtures || config.show_fixtures();

    let outcome = match config.source.r#type.as_str() {
        "file" => {
            let roster = LeagueSnapshot::new(config.source.roster_path.clone().unwrap_or_default());
            let results = ResultsFile::new(
                config.source.results_path.clone().unwrap_or_default(),
                config.current_slot(),
            );
            execute(roster, results, &config, &args, format, show_fixtures).await
        }
        _ => {
            let timeout = Duration::from_secs(config.source.timeout_seconds.unwrap_or(30));
            let client = FplClient::with_timeout(
                config.base_url(),
                config.source.league_id.unwrap_or_default(),
                timeout,
            )?;
            execute(client.clone(), client, &config, &args, format, show_fixtures).await
        }
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ fpl-cup failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 依錯誤嚴重程度決定退出碼
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

    Ok(())
}

async fn execute<P: RosterProvider, S: ResultSource>(
    roster: P,
    results: S,
    config: &TournamentConfig,
    args: &CliConfig,
    format: OutputFormat,
    show_fixtures: bool,
) -> Result<(), CupError> {
    let engine = TournamentEngine::new(roster, results, config.settings()?);
    let stdout = std::io::stdout();

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - drawing groups and fixtures only");
        let tournament = engine.draw().await?;
        match format {
            OutputFormat::Csv | OutputFormat::Tsv => {
                render::write_fixtures_delimited(stdout.lock(), &tournament, format)?
            }
            OutputFormat::Json => serde_json::to_writer_pretty(stdout.lock(), &tournament)?,
            OutputFormat::Table => print!("{}", render::render_fixtures(&tournament)),
        }
        return Ok(());
    }

    let report = engine.run(config.current_slot()).await?;
    tracing::info!(
        "✅ Standings computed for {} groups up to {}",
        report.standings.len(),
        report.current_slot
    );
    render::write_report(stdout.lock(), &report, format, show_fixtures)?;
    Ok(())
}
