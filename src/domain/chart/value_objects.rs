use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::domain::market_data::{Candle, ChartKey, OrderSide};

/// Value Object - where a batch of trades came from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString, AsRefStr,
    Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TradeSource {
    #[display(fmt = "live")]
    #[strum(serialize = "live")]
    Live,
    #[display(fmt = "simulated")]
    #[strum(serialize = "simulated")]
    Simulated,
}

impl TradeSource {
    pub fn from_simulated_flag(simulated: bool) -> Self {
        if simulated { Self::Simulated } else { Self::Live }
    }
}

/// Value Object - axis scale understood by the charting library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    #[display(fmt = "date")]
    #[strum(serialize = "date")]
    Date,
    #[display(fmt = "linear")]
    #[strum(serialize = "linear")]
    Linear,
    #[display(fmt = "log")]
    #[strum(serialize = "log")]
    Log,
}

/// Colours for derived series. Any CSS colour string is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartPalette {
    pub rising_volume: String,
    pub falling_volume: String,
    pub buy: String,
    pub sell: String,
    pub stop: String,
    pub buy_order: String,
    pub sell_order: String,
    pub stop_order: String,
}

impl Default for ChartPalette {
    fn default() -> Self {
        Self {
            rising_volume: "#17BECF".to_string(),
            falling_volume: "#7F7F7F".to_string(),
            buy: "#00c853".to_string(),
            sell: "#d50000".to_string(),
            stop: "#ff9100".to_string(),
            buy_order: "rgba(0, 200, 83, 0.6)".to_string(),
            sell_order: "rgba(213, 0, 0, 0.6)".to_string(),
            stop_order: "rgba(255, 145, 0, 0.6)".to_string(),
        }
    }
}

impl ChartPalette {
    pub fn volume_color(&self, candle: &Candle) -> &str {
        if candle.is_rising() { &self.rising_volume } else { &self.falling_volume }
    }

    pub fn trade_color(&self, side: OrderSide) -> &str {
        match side {
            OrderSide::Buy => &self.buy,
            OrderSide::Sell => &self.sell,
            OrderSide::Stop => &self.stop,
        }
    }

    pub fn order_color(&self, side: OrderSide) -> &str {
        match side {
            OrderSide::Buy => &self.buy_order,
            OrderSide::Sell => &self.sell_order,
            OrderSide::Stop => &self.stop_order,
        }
    }
}

/// Metadata handed to the renderer next to the chart state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartMeta {
    pub title: String,
    pub x_axis: AxisType,
    pub y_axis: AxisType,
}

impl ChartMeta {
    pub fn for_key(key: &ChartKey, y_axis: AxisType) -> Self {
        Self {
            title: format!("{} ({}) - {}", key.symbol, key.time_frame, key.exchange),
            x_axis: AxisType::Date,
            y_axis,
        }
    }
}
