//! Fill simulation and single-position capital tracking.
//!
//! The engine is either flat (all capital in cash) or long (all capital in
//! units). Fee and slippage are fractions applied on both entry and exit.

use log::debug;

use super::error::TinytraderError;
use super::signal::{Action, Trade};

/// Transaction cost fractions, each in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostModel {
    pub fee: f64,
    pub slippage: f64,
}

impl CostModel {
    pub fn new(fee: f64, slippage: f64) -> Result<Self, TinytraderError> {
        validate_fraction("fee", fee)?;
        validate_fraction("slippage", slippage)?;
        Ok(CostModel { fee, slippage })
    }

    /// Units bought with `cash` at quoted price `price`.
    /// units = cash * (1 - fee) / (price * (1 + slippage))
    pub fn entry_units(&self, cash: f64, price: f64) -> f64 {
        cash * (1.0 - self.fee) / (price * (1.0 + self.slippage))
    }

    /// Cash received for `units` at quoted price `price`.
    /// cash = units * price * (1 - slippage) * (1 - fee)
    pub fn exit_proceeds(&self, units: f64, price: f64) -> f64 {
        units * price * (1.0 - self.slippage) * (1.0 - self.fee)
    }
}

fn validate_fraction(name: &str, value: f64) -> Result<(), TinytraderError> {
    if !(0.0..1.0).contains(&value) {
        return Err(TinytraderError::InvalidParameter {
            name: name.to_string(),
            reason: format!("must be a fraction in [0, 1), got {value}"),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
}

/// Capital held by one backtest run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    pub cash: f64,
    pub position: f64,
}

impl EngineState {
    pub fn new(initial_capital: f64) -> Self {
        EngineState {
            cash: initial_capital,
            position: 0.0,
        }
    }

    pub fn state(&self) -> PositionState {
        if self.position == 0.0 {
            PositionState::Flat
        } else {
            PositionState::Long
        }
    }

    /// Apply one signal. Returns the fill, or `None` when the signal would
    /// pyramid a long or sell from flat; those are ignored and cost nothing.
    pub fn apply(
        &mut self,
        action: Action,
        price: f64,
        date: &str,
        costs: &CostModel,
    ) -> Option<Trade> {
        match (action, self.state()) {
            (Action::Buy, PositionState::Flat) => {
                self.position = costs.entry_units(self.cash, price);
                self.cash = 0.0;
                debug!("{date}: buy {:.6} units at {price}", self.position);
            }
            (Action::Sell, PositionState::Long) => {
                self.cash = costs.exit_proceeds(self.position, price);
                self.position = 0.0;
                debug!("{date}: sell at {price}, cash {:.2}", self.cash);
            }
            (action, state) => {
                debug!("{date}: ignoring {action} signal while {state:?}");
                return None;
            }
        }
        Some(Trade {
            date: date.to_string(),
            action,
            price,
        })
    }

    /// Cash plus the open position valued as an exit at `last_close`.
    pub fn liquidation_value(&self, last_close: f64, costs: &CostModel) -> f64 {
        if self.state() == PositionState::Flat {
            return self.cash;
        }
        self.cash + costs.exit_proceeds(self.position, last_close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cost_model_rejects_out_of_range() {
        assert!(CostModel::new(0.0, 0.0).is_ok());
        assert!(CostModel::new(0.999, 0.5).is_ok());
        assert!(matches!(
            CostModel::new(1.0, 0.0),
            Err(TinytraderError::InvalidParameter { ref name, .. }) if name == "fee"
        ));
        assert!(matches!(
            CostModel::new(0.0, -0.01),
            Err(TinytraderError::InvalidParameter { ref name, .. }) if name == "slippage"
        ));
        assert!(CostModel::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn entry_units_without_costs() {
        let costs = CostModel::default();
        assert_relative_eq!(costs.entry_units(10_000.0, 105.0), 10_000.0 / 105.0);
    }

    #[test]
    fn entry_units_with_costs() {
        let costs = CostModel::new(0.01, 0.02).unwrap();
        // 10000 * 0.99 / (100 * 1.02)
        assert_relative_eq!(costs.entry_units(10_000.0, 100.0), 9900.0 / 102.0);
    }

    #[test]
    fn exit_proceeds_with_costs() {
        let costs = CostModel::new(0.01, 0.02).unwrap();
        // 50 * 100 * 0.98 * 0.99
        assert_relative_eq!(costs.exit_proceeds(50.0, 100.0), 4851.0);
    }

    #[test]
    fn buy_then_sell() {
        let costs = CostModel::default();
        let mut engine = EngineState::new(10_000.0);
        assert_eq!(engine.state(), PositionState::Flat);

        let buy = engine.apply(Action::Buy, 105.0, "2022-01-02", &costs).unwrap();
        assert_eq!(buy.action, Action::Buy);
        assert_eq!(engine.state(), PositionState::Long);
        assert_eq!(engine.cash, 0.0);

        let sell = engine.apply(Action::Sell, 102.0, "2022-01-03", &costs).unwrap();
        assert_eq!(sell.date, "2022-01-03");
        assert_eq!(engine.state(), PositionState::Flat);
        assert_relative_eq!(engine.cash, 10_000.0 / 105.0 * 102.0, max_relative = 1e-12);
    }

    #[test]
    fn buy_while_long_is_ignored() {
        let costs = CostModel::new(0.01, 0.01).unwrap();
        let mut engine = EngineState::new(1_000.0);
        engine.apply(Action::Buy, 10.0, "d1", &costs).unwrap();
        let before = engine.clone();
        assert!(engine.apply(Action::Buy, 5.0, "d2", &costs).is_none());
        assert_eq!(engine, before);
    }

    #[test]
    fn sell_while_flat_is_ignored() {
        let costs = CostModel::new(0.01, 0.01).unwrap();
        let mut engine = EngineState::new(1_000.0);
        assert!(engine.apply(Action::Sell, 10.0, "d1", &costs).is_none());
        assert_eq!(engine, EngineState::new(1_000.0));
    }

    #[test]
    fn liquidation_value_when_flat() {
        let engine = EngineState::new(500.0);
        assert_eq!(engine.liquidation_value(123.0, &CostModel::default()), 500.0);
    }

    #[test]
    fn liquidation_value_when_long() {
        let costs = CostModel::new(0.01, 0.02).unwrap();
        let engine = EngineState {
            cash: 0.0,
            position: 50.0,
        };
        assert_relative_eq!(engine.liquidation_value(100.0, &costs), 4851.0);
    }
}
