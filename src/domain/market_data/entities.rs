use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

pub use super::value_objects::{OHLCV, Price, Timestamp, Volume};

/// Domain entity - Candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: Timestamp,
    pub ohlcv: OHLCV,
}

impl Candle {
    pub fn new(timestamp: Timestamp, ohlcv: OHLCV) -> Self {
        Self { timestamp, ohlcv }
    }

    /// Flat candles count as rising, matching the volume bar colouring.
    pub fn is_rising(&self) -> bool {
        self.ohlcv.close >= self.ohlcv.open
    }

    pub fn is_falling(&self) -> bool {
        !self.is_rising()
    }
}

/// Order side as reported by the bot. Stop orders are tracked separately
/// because they are drawn in their own colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    #[strum(serialize = "buy")]
    Buy,
    #[strum(serialize = "sell")]
    Sell,
    #[strum(serialize = "stop")]
    Stop,
}

impl OrderSide {
    /// Accepts plain sides plus stop variants such as `stop_loss` or `STOP-LOSS`.
    pub fn parse(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_ascii_lowercase();
        if lowered.contains("stop") {
            Some(Self::Stop)
        } else if lowered == "buy" {
            Some(Self::Buy)
        } else if lowered == "sell" {
            Some(Self::Sell)
        } else {
            None
        }
    }
}

/// Executed trade shown as a marker over the price series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub timestamp: Timestamp,
    pub price: Price,
    pub description: String,
    pub side: OrderSide,
}

/// Open order as listed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub timestamp: Timestamp,
    pub price: Price,
    pub description: String,
    pub side: OrderSide,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_parsing_accepts_stop_variants() {
        assert_eq!(OrderSide::parse("buy"), Some(OrderSide::Buy));
        assert_eq!(OrderSide::parse(" SELL "), Some(OrderSide::Sell));
        assert_eq!(OrderSide::parse("stop_loss"), Some(OrderSide::Stop));
        assert_eq!(OrderSide::parse("Stop-Loss"), Some(OrderSide::Stop));
        assert_eq!(OrderSide::parse("hold"), None);
    }

    #[test]
    fn flat_candle_is_rising() {
        let flat = Candle::new(
            Timestamp::from_millis(0),
            OHLCV::new(Price::new(1.0), Price::new(1.0), Price::new(1.0), Price::new(1.0), Volume::new(3.0)),
        );
        assert!(flat.is_rising());
        assert!(!flat.is_falling());
    }
}
