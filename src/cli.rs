//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{validate_backtest_config, validate_strategy_config};
use crate::domain::error::TinytraderError;
use crate::domain::metrics::TradeStats;
use crate::domain::record::CLOSE_FIELD;
use crate::domain::strategy::{Strategy, StrategyKind, Threshold};
use crate::ports::config_port::ConfigPort;
use crate::ports::record_source::RecordSource;

#[derive(Parser, Debug)]
#[command(name = "tinytrader", about = "Single-position strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// CSV price file, overrides [backtest] data
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Inclusive start timestamp, overrides [backtest] start
        #[arg(long)]
        start: Option<String>,
        /// Inclusive end timestamp, overrides [backtest] end
        #[arg(long)]
        end: Option<String>,
    },
    /// Validate a configuration file without running
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            data,
            start,
            end,
        } => run_backtest(&config, data.as_ref(), start.as_deref(), end.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TinytraderError> {
    FileConfigAdapter::from_file(path).map_err(|e| TinytraderError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn fail(err: TinytraderError) -> ExitCode {
    error!("{err}");
    ExitCode::from(&err)
}

fn run_backtest(
    config_path: &Path,
    data_override: Option<&PathBuf>,
    start_override: Option<&str>,
    end_override: Option<&str>,
) -> ExitCode {
    info!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };

    let overrides = BoundOverrides {
        start: start_override,
        end: end_override,
    };
    let prepared = validate_all(&adapter, &overrides).and_then(|()| {
        let bt_config = build_backtest_config(&adapter, &overrides)?;
        let strategy = build_strategy(&adapter)?;
        let data_path = resolve_data_path(data_override, config_path, &adapter)?;
        Ok((bt_config, strategy, data_path))
    });
    let (bt_config, strategy, data_path) = match prepared {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    info!("Loading prices from {}", data_path.display());
    let source = CsvAdapter::new(data_path);
    run_backtest_pipeline(&source, &strategy, &bt_config)
}

pub fn run_backtest_pipeline(
    source: &dyn RecordSource,
    strategy: &Strategy<StrategyKind>,
    bt_config: &BacktestConfig,
) -> ExitCode {
    info!(
        "Running {} ({:?}) from {} to {}",
        strategy.name, strategy.rules, bt_config.start, bt_config.end
    );
    match backtest_engine::run_backtest(source, bt_config, strategy) {
        Ok(result) => {
            print!("{}", format_summary(&result, bt_config));
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

/// Human-readable summary and trade log.
pub fn format_summary(result: &BacktestResult, bt_config: &BacktestConfig) -> String {
    let stats = TradeStats::compute(&result.trades);
    let mut out = String::new();

    out.push_str("=== Results ===\n");
    out.push_str(&format!("Initial Capital:  {:.2}\n", bt_config.initial_capital));
    out.push_str(&format!("Final Capital:    {:.2}\n", result.final_capital));
    out.push_str(&format!("Profit:           {:.2}\n", result.profit));
    out.push_str(&format!("Return:           {:.2}%\n", result.return_pct));
    out.push_str(&format!("Trades:           {}\n", result.trades.len()));
    out.push_str(&format!("Round Trips:      {}\n", stats.round_trips));
    out.push_str(&format!("Win Rate:         {:.1}%\n", stats.win_rate * 100.0));
    if stats.open_at_end {
        out.push_str("Open position valued at final close\n");
    }

    if !result.trades.is_empty() {
        out.push_str("\n=== Trades ===\n");
        for trade in &result.trades {
            out.push_str(&format!("{}  {:<4}  {:.4}\n", trade.date, trade.action, trade.price));
        }
    }
    out
}

fn run_validate(config_path: &Path) -> ExitCode {
    info!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };

    let checked = validate_all(&adapter, &BoundOverrides::default())
        .and_then(|()| build_strategy(&adapter));
    match checked {
        Ok(strategy) => {
            println!(
                "Configuration is valid: {} on {}",
                strategy.name, strategy.price_field
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

/// Range bounds supplied on the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoundOverrides<'a> {
    pub start: Option<&'a str>,
    pub end: Option<&'a str>,
}

/// Layers command-line bounds over the file so validation sees what will run.
struct OverlayConfig<'a> {
    base: &'a dyn ConfigPort,
    overrides: &'a BoundOverrides<'a>,
}

impl ConfigPort for OverlayConfig<'_> {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        let overridden = match (section, key) {
            ("backtest", "start") => self.overrides.start,
            ("backtest", "end") => self.overrides.end,
            _ => None,
        };
        overridden
            .map(str::to_string)
            .or_else(|| self.base.get_string(section, key))
    }
}

pub fn validate_all(
    adapter: &dyn ConfigPort,
    overrides: &BoundOverrides<'_>,
) -> Result<(), TinytraderError> {
    let overlay = OverlayConfig {
        base: adapter,
        overrides,
    };
    validate_backtest_config(&overlay)?;
    validate_strategy_config(&overlay)
}

pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    overrides: &BoundOverrides<'_>,
) -> Result<BacktestConfig, TinytraderError> {
    let overlay = OverlayConfig {
        base: adapter,
        overrides,
    };
    let bound = |key: &str| {
        overlay
            .get_string("backtest", key)
            .map(|s| s.trim().to_string())
            .ok_or_else(|| TinytraderError::ConfigMissing {
                section: "backtest".into(),
                key: key.into(),
            })
    };

    let initial_capital = adapter
        .get_number("backtest", "initial_capital")?
        .ok_or_else(|| TinytraderError::ConfigMissing {
            section: "backtest".into(),
            key: "initial_capital".into(),
        })?;

    Ok(BacktestConfig {
        initial_capital,
        start: bound("start")?,
        end: bound("end")?,
        slippage: adapter.get_number("backtest", "slippage")?.unwrap_or(0.0),
        fee: adapter.get_number("backtest", "fee")?.unwrap_or(0.0),
    })
}

pub fn build_strategy(adapter: &dyn ConfigPort) -> Result<Strategy<StrategyKind>, TinytraderError> {
    let kind_str = adapter
        .get_string("strategy", "kind")
        .map(|k| k.trim().to_lowercase())
        .ok_or_else(|| TinytraderError::ConfigMissing {
            section: "strategy".into(),
            key: "kind".into(),
        })?;

    let kind = match kind_str.as_str() {
        "reversal" => StrategyKind::Reversal,
        "momentum" => StrategyKind::Momentum,
        "threshold" => StrategyKind::Threshold(Threshold {
            buy_below: required_number(adapter, "buy_below")?,
            sell_above: required_number(adapter, "sell_above")?,
        }),
        other => {
            return Err(TinytraderError::ConfigInvalid {
                section: "strategy".into(),
                key: "kind".into(),
                reason: format!("unknown strategy kind '{other}'"),
            });
        }
    };

    let name = adapter
        .get_string("strategy", "name")
        .unwrap_or_else(|| kind_str.clone());
    let price_field = adapter
        .get_string("strategy", "price_field")
        .map(|f| f.trim().to_string())
        .unwrap_or_else(|| CLOSE_FIELD.to_string());

    Ok(Strategy::new(name, kind).with_price_field(price_field))
}

fn required_number(adapter: &dyn ConfigPort, key: &str) -> Result<f64, TinytraderError> {
    adapter
        .get_number("strategy", key)?
        .ok_or_else(|| TinytraderError::ConfigMissing {
            section: "strategy".into(),
            key: key.into(),
        })
}

/// CLI flag first, then `[backtest] data` resolved against the config file's directory.
pub fn resolve_data_path(
    data_override: Option<&PathBuf>,
    config_path: &Path,
    config: &dyn ConfigPort,
) -> Result<PathBuf, TinytraderError> {
    if let Some(p) = data_override {
        return Ok(p.clone());
    }
    let configured = config
        .get_string("backtest", "data")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| TinytraderError::ConfigMissing {
            section: "backtest".into(),
            key: "data".into(),
        })?;
    let path = PathBuf::from(configured);
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(match config_path.parent() {
        Some(dir) => dir.join(path),
        None => path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[backtest]
initial_capital = 10000
start = 2022-01-01
end = 2022-01-04

[strategy]
kind = threshold
buy_below = 101
sell_above = 107.5
price_field = open
"#;

    #[test]
    fn overlay_prefers_overrides() {
        let adapter = FileConfigAdapter::from_string(CONFIG).unwrap();
        let overrides = BoundOverrides {
            start: Some("2022-01-02"),
            end: None,
        };
        let bt = build_backtest_config(&adapter, &overrides).unwrap();
        assert_eq!(bt.start, "2022-01-02");
        assert_eq!(bt.end, "2022-01-04");
        assert_eq!(bt.fee, 0.0);
    }

    #[test]
    fn threshold_strategy_from_config() {
        let adapter = FileConfigAdapter::from_string(CONFIG).unwrap();
        let strategy = build_strategy(&adapter).unwrap();
        assert_eq!(strategy.name, "threshold");
        assert_eq!(strategy.price_field, "open");
        assert_eq!(
            strategy.rules,
            StrategyKind::Threshold(Threshold {
                buy_below: 101.0,
                sell_above: 107.5
            })
        );
    }

    #[test]
    fn summary_mentions_open_position() {
        let result = BacktestResult {
            trades: vec![crate::domain::signal::Trade {
                date: "2022-01-02".into(),
                action: crate::domain::signal::Action::Buy,
                price: 105.0,
            }],
            final_capital: 10_285.71,
            profit: 285.71,
            return_pct: 2.8571,
        };
        let bt = BacktestConfig::new(10_000.0, "2022-01-01", "2022-01-04");
        let text = format_summary(&result, &bt);
        assert!(text.contains("Final Capital:    10285.71"));
        assert!(text.contains("Open position valued at final close"));
        assert!(text.contains("2022-01-02  buy   105.0000"));
    }
}
