// src/main.rs

use std::error::Error;
use std::io::Write;

use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use mslguide::simulation::csv::*;
use mslguide::simulation::framework::*;
use mslguide::simulation::load_parameters::*;

/// 誘導コアを模擬交戦シナリオで実行する
#[derive(Parser, Debug)]
#[command(name = "mslguide", version, about)]
struct Cli {
    /// ミサイルパラメータのYAML
    #[arg(long, default_value = "config/missile_parameters.yaml")]
    params: String,

    /// シナリオのYAML
    #[arg(long, default_value = "config/scenario.yaml")]
    scenario: String,

    /// 出力CSV
    #[arg(long, default_value = "output/engagement.csv")]
    output: String,

    /// ログレベル
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 設定とシナリオの読み込み
    let params = load_missile_parameters(&cli.params)?;
    let scenario = load_scenario(&cli.scenario)?;

    let mut state = initialize_engagement(params, &scenario)?;

    // CSV出力の設定
    let mut writer = setup_csv_output(&cli.output)?;

    // 交戦のメインループ
    let outcome = run_engagement(&mut state, scenario.max_ticks, |record| {
        writer.write_all(create_csv_row(record).as_bytes())?;
        Ok(())
    })?;
    writer.flush()?;

    match outcome {
        Some(tick) => info!(tick, output = %cli.output, "simulation finished with detonation"),
        None => warn!(output = %cli.output, "simulation finished without detonation"),
    }

    Ok(())
}
