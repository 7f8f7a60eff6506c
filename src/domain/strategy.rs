//! Pluggable signal generation.
//!
//! [`TradingRules`] is the buy/sell predicate pair a strategy author writes.
//! [`Strategy`] wraps a rule set with the per-bar policy: hold on the first
//! bar, buy checked before sell, fill at the configured price field.

use super::error::TinytraderError;
use super::record::CLOSE_FIELD;
use super::series::Series;
use super::signal::Signal;

/// Buy/sell predicates over a series. An unimplemented predicate never fires.
pub trait TradingRules {
    fn should_buy(&self, _series: &Series, _index: usize) -> Result<bool, TinytraderError> {
        Ok(false)
    }

    fn should_sell(&self, _series: &Series, _index: usize) -> Result<bool, TinytraderError> {
        Ok(false)
    }
}

/// Decides, bar by bar, whether to buy, sell or hold.
pub trait SignalGenerator {
    /// Field used for fills when a signal carries no explicit price.
    fn price_field(&self) -> &str;

    /// `Ok(None)` means hold.
    fn generate(&self, series: &Series, index: usize) -> Result<Option<Signal>, TinytraderError>;
}

#[derive(Debug, Clone)]
pub struct Strategy<R> {
    pub name: String,
    pub rules: R,
    pub price_field: String,
}

impl<R: TradingRules> Strategy<R> {
    pub fn new(name: impl Into<String>, rules: R) -> Self {
        Strategy {
            name: name.into(),
            rules,
            price_field: CLOSE_FIELD.to_string(),
        }
    }

    pub fn with_price_field(mut self, field: impl Into<String>) -> Self {
        self.price_field = field.into();
        self
    }
}

impl<R: TradingRules> SignalGenerator for Strategy<R> {
    fn price_field(&self) -> &str {
        &self.price_field
    }

    fn generate(&self, series: &Series, index: usize) -> Result<Option<Signal>, TinytraderError> {
        if index == 0 {
            return Ok(None);
        }
        // Coerced before the rules run so a bad price surfaces even on a hold.
        let price = series.price_at(index, &self.price_field)?;
        if self.rules.should_buy(series, index)? {
            return Ok(Some(Signal::buy(price)));
        }
        if self.rules.should_sell(series, index)? {
            return Ok(Some(Signal::sell(price)));
        }
        Ok(None)
    }
}

/// Buy after a down close, sell after an up close.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloseReversal;

impl TradingRules for CloseReversal {
    fn should_buy(&self, series: &Series, index: usize) -> Result<bool, TinytraderError> {
        Ok(series.close_at(index)? < series.close_at(index - 1)?)
    }

    fn should_sell(&self, series: &Series, index: usize) -> Result<bool, TinytraderError> {
        Ok(series.close_at(index)? > series.close_at(index - 1)?)
    }
}

/// Buy after an up close, sell after a down close.
#[derive(Debug, Clone, Copy, Default)]
pub struct Momentum;

impl TradingRules for Momentum {
    fn should_buy(&self, series: &Series, index: usize) -> Result<bool, TinytraderError> {
        Ok(series.close_at(index)? > series.close_at(index - 1)?)
    }

    fn should_sell(&self, series: &Series, index: usize) -> Result<bool, TinytraderError> {
        Ok(series.close_at(index)? < series.close_at(index - 1)?)
    }
}

/// Buy when the close is at or below `buy_below`, sell at or above `sell_above`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub buy_below: f64,
    pub sell_above: f64,
}

impl TradingRules for Threshold {
    fn should_buy(&self, series: &Series, index: usize) -> Result<bool, TinytraderError> {
        Ok(series.close_at(index)? <= self.buy_below)
    }

    fn should_sell(&self, series: &Series, index: usize) -> Result<bool, TinytraderError> {
        Ok(series.close_at(index)? >= self.sell_above)
    }
}

type RuleFn = dyn Fn(&Series, usize) -> Result<bool, TinytraderError>;

/// Rules built from closures; either side may be left out.
#[derive(Default)]
pub struct FnRules {
    buy: Option<Box<RuleFn>>,
    sell: Option<Box<RuleFn>>,
}

impl FnRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buy<F>(mut self, rule: F) -> Self
    where
        F: Fn(&Series, usize) -> Result<bool, TinytraderError> + 'static,
    {
        self.buy = Some(Box::new(rule));
        self
    }

    pub fn sell<F>(mut self, rule: F) -> Self
    where
        F: Fn(&Series, usize) -> Result<bool, TinytraderError> + 'static,
    {
        self.sell = Some(Box::new(rule));
        self
    }
}

impl TradingRules for FnRules {
    fn should_buy(&self, series: &Series, index: usize) -> Result<bool, TinytraderError> {
        match &self.buy {
            Some(rule) => rule(series, index),
            None => Ok(false),
        }
    }

    fn should_sell(&self, series: &Series, index: usize) -> Result<bool, TinytraderError> {
        match &self.sell {
            Some(rule) => rule(series, index),
            None => Ok(false),
        }
    }
}

/// Rule sets selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrategyKind {
    Reversal,
    Momentum,
    Threshold(Threshold),
}

impl TradingRules for StrategyKind {
    fn should_buy(&self, series: &Series, index: usize) -> Result<bool, TinytraderError> {
        match self {
            StrategyKind::Reversal => CloseReversal.should_buy(series, index),
            StrategyKind::Momentum => Momentum.should_buy(series, index),
            StrategyKind::Threshold(t) => t.should_buy(series, index),
        }
    }

    fn should_sell(&self, series: &Series, index: usize) -> Result<bool, TinytraderError> {
        match self {
            StrategyKind::Reversal => CloseReversal.should_sell(series, index),
            StrategyKind::Momentum => Momentum.should_sell(series, index),
            StrategyKind::Threshold(t) => t.should_sell(series, index),
        }
    }
}
