//! Round-trip statistics over a trade log.

use super::signal::{Action, Trade};

#[derive(Debug, Clone, PartialEq)]
pub struct TradeStats {
    pub round_trips: usize,
    pub winners: usize,
    pub losers: usize,
    pub win_rate: f64,
    /// A buy with no matching sell, i.e. the run ended long.
    pub open_at_end: bool,
}

impl TradeStats {
    /// Pair each buy with the sell that follows it. Winners and losers are
    /// judged on quoted prices, before fee and slippage.
    pub fn compute(trades: &[Trade]) -> Self {
        let mut round_trips = 0usize;
        let mut winners = 0usize;
        let mut losers = 0usize;
        let mut entry: Option<f64> = None;

        for trade in trades {
            match (trade.action, entry) {
                (Action::Buy, None) => entry = Some(trade.price),
                (Action::Sell, Some(entry_price)) => {
                    round_trips += 1;
                    if trade.price > entry_price {
                        winners += 1;
                    } else if trade.price < entry_price {
                        losers += 1;
                    }
                    entry = None;
                }
                _ => {}
            }
        }

        let win_rate = if round_trips > 0 {
            winners as f64 / round_trips as f64
        } else {
            0.0
        };

        TradeStats {
            round_trips,
            winners,
            losers,
            win_rate,
            open_at_end: entry.is_some(),
        }
    }
}
