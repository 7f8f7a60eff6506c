//! Signals emitted per bar and the trades they turn into.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => f.pad("buy"),
            Action::Sell => f.pad("sell"),
        }
    }
}

/// A buy or sell instruction for one bar.
///
/// `price: None` means "fill at the bar's configured price field".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    pub action: Action,
    pub price: Option<f64>,
}

impl Signal {
    pub fn buy(price: f64) -> Self {
        Signal {
            action: Action::Buy,
            price: Some(price),
        }
    }

    pub fn sell(price: f64) -> Self {
        Signal {
            action: Action::Sell,
            price: Some(price),
        }
    }

    /// An action with no explicit price.
    pub fn bare(action: Action) -> Self {
        Signal { action, price: None }
    }
}

/// An executed fill.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub date: String,
    pub action: Action,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_display() {
        assert_eq!(Action::Buy.to_string(), "buy");
        assert_eq!(Action::Sell.to_string(), "sell");
    }

    #[test]
    fn constructors() {
        assert_eq!(Signal::buy(105.0).price, Some(105.0));
        assert_eq!(Signal::sell(102.0).action, Action::Sell);
        assert_eq!(Signal::bare(Action::Buy).price, None);
    }
}
