//! Backtest entry point and per-bar loop.
//!
//! A run owns all of its state: the series, the engine and the trade log are
//! built fresh per call and dropped when it returns.

use log::{info, warn};

use super::error::TinytraderError;
use super::execution::{CostModel, EngineState, PositionState};
use super::record::is_valid_price;
use super::series::Series;
use super::signal::Trade;
use super::strategy::SignalGenerator;
use crate::ports::record_source::RecordSource;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Inclusive lower bound, same lexical format as record dates.
    pub start: String,
    /// Inclusive upper bound.
    pub end: String,
    pub slippage: f64,
    pub fee: f64,
}

impl BacktestConfig {
    /// Frictionless config over `[start, end]`.
    pub fn new(initial_capital: f64, start: impl Into<String>, end: impl Into<String>) -> Self {
        BacktestConfig {
            initial_capital,
            start: start.into(),
            end: end.into(),
            slippage: 0.0,
            fee: 0.0,
        }
    }

    pub fn with_costs(mut self, slippage: f64, fee: f64) -> Self {
        self.slippage = slippage;
        self.fee = fee;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub final_capital: f64,
    pub profit: f64,
    pub return_pct: f64,
}

impl BacktestResult {
    fn summarize(trades: Vec<Trade>, final_capital: f64, initial_capital: f64) -> Self {
        BacktestResult {
            trades,
            final_capital,
            profit: final_capital - initial_capital,
            return_pct: (final_capital / initial_capital - 1.0) * 100.0,
        }
    }

    /// `(trades, final_capital, profit, return_pct)`.
    pub fn into_parts(self) -> (Vec<Trade>, f64, f64, f64) {
        (self.trades, self.final_capital, self.profit, self.return_pct)
    }
}

/// Simulate `strategy` over the rows of `data` that fall in `[config.start, config.end]`.
///
/// An open position at the end is valued at the last close, net of costs,
/// but is not recorded as a trade.
pub fn run_backtest<D, G>(
    data: &D,
    config: &BacktestConfig,
    strategy: &G,
) -> Result<BacktestResult, TinytraderError>
where
    D: RecordSource + ?Sized,
    G: SignalGenerator + ?Sized,
{
    if !(config.initial_capital > 0.0 && config.initial_capital.is_finite()) {
        return Err(TinytraderError::InvalidParameter {
            name: "initial_capital".to_string(),
            reason: format!("must be positive, got {}", config.initial_capital),
        });
    }
    let costs = CostModel::new(config.fee, config.slippage)?;

    let series = Series::from_records(data.to_records()?, &config.start, &config.end)?;
    info!(
        "Running backtest: {} bars, {} to {}",
        series.len(),
        series.date_at(0),
        series.date_at(series.last_index())
    );

    let mut engine = EngineState::new(config.initial_capital);
    let mut trades = Vec::new();

    for index in 0..series.len() {
        let Some(signal) = strategy.generate(&series, index)? else {
            continue;
        };
        let price = match signal.price {
            Some(p) if !is_valid_price(p) => {
                return Err(TinytraderError::InvalidPrice {
                    index,
                    field: strategy.price_field().to_string(),
                    value: Some(p.to_string()),
                });
            }
            Some(p) => p,
            None => series.price_at(index, strategy.price_field())?,
        };
        if let Some(trade) = engine.apply(signal.action, price, series.date_at(index), &costs) {
            trades.push(trade);
        }
    }

    let final_capital = match engine.state() {
        PositionState::Flat => engine.cash,
        PositionState::Long => {
            let last = series.last_index();
            let last_close = series.close_at(last)?;
            warn!(
                "Position still open at {}, valuing at close {last_close}",
                series.date_at(last)
            );
            engine.liquidation_value(last_close, &costs)
        }
    };

    let result = BacktestResult::summarize(trades, final_capital, config.initial_capital);
    info!(
        "Backtest complete: {} trades, final capital {:.2} ({:+.2}%)",
        result.trades.len(),
        result.final_capital,
        result.return_pct
    );
    Ok(result)
}
