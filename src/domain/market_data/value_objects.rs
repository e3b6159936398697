use derive_more::{Constructor, Display, From, Into};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

use crate::domain::errors::ChartError;

/// Value Object - price
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, From, Into, Constructor, Serialize, Deserialize)]
pub struct Price(f64);

impl Price {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - traded volume
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, From, Into, Constructor, Serialize, Deserialize)]
pub struct Volume(f64);

impl Volume {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - epoch milliseconds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Constructor, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn from_millis(value: u64) -> Self {
        Self(value)
    }
}

/// Value Object - OHLCV
#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct OHLCV {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Volume,
}

impl OHLCV {
    pub fn is_finite(&self) -> bool {
        [self.open.value(), self.high.value(), self.low.value(), self.close.value(), self.volume.value()]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Value Object - trading pair as the bot names it, e.g. `BTC/USDT`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: &str) -> Result<Self, ChartError> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err(ChartError::InvalidConfig("symbol cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    /// Path-safe form: the backend routes use `|` in place of `/`.
    pub fn url_segment(&self) -> String {
        self.0.replace('/', "|")
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

/// Value Object - exchange identifier assigned by the bot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct ExchangeId(String);

impl ExchangeId {
    pub fn new(id: &str) -> Result<Self, ChartError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ChartError::InvalidConfig("exchange id cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ExchangeId {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

/// Value Object - candle time frame
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum TimeFrame {
    #[strum(serialize = "1m")]
    #[serde(rename = "1m")]
    OneMinute,
    #[strum(serialize = "3m")]
    #[serde(rename = "3m")]
    ThreeMinutes,
    #[strum(serialize = "5m")]
    #[serde(rename = "5m")]
    FiveMinutes,
    #[strum(serialize = "15m")]
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[strum(serialize = "30m")]
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    OneHour,
    #[strum(serialize = "2h")]
    #[serde(rename = "2h")]
    TwoHours,
    #[strum(serialize = "3h")]
    #[serde(rename = "3h")]
    ThreeHours,
    #[strum(serialize = "4h")]
    #[serde(rename = "4h")]
    FourHours,
    #[strum(serialize = "6h")]
    #[serde(rename = "6h")]
    SixHours,
    #[strum(serialize = "8h")]
    #[serde(rename = "8h")]
    EightHours,
    #[strum(serialize = "12h")]
    #[serde(rename = "12h")]
    TwelveHours,
    #[strum(serialize = "1d")]
    #[serde(rename = "1d")]
    OneDay,
    #[strum(serialize = "3d")]
    #[serde(rename = "3d")]
    ThreeDays,
    #[strum(serialize = "1w")]
    #[serde(rename = "1w")]
    OneWeek,
    #[strum(serialize = "1M")]
    #[serde(rename = "1M")]
    OneMonth,
}

impl TimeFrame {
    pub fn parse(raw: &str) -> Result<Self, ChartError> {
        raw.trim()
            .parse::<TimeFrame>()
            .map_err(|_| ChartError::InvalidConfig(format!("unknown time frame: {raw}")))
    }
}

/// Identity of one chart: switching any part of it resets the chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{}:{}@{}", exchange, symbol, time_frame)]
pub struct ChartKey {
    pub exchange: ExchangeId,
    pub symbol: Symbol,
    pub time_frame: TimeFrame,
}

impl ChartKey {
    pub fn new(exchange: ExchangeId, symbol: Symbol, time_frame: TimeFrame) -> Self {
        Self { exchange, symbol, time_frame }
    }

    pub fn parse(exchange: &str, symbol: &str, time_frame: &str) -> Result<Self, ChartError> {
        Ok(Self::new(ExchangeId::new(exchange)?, Symbol::new(symbol)?, TimeFrame::parse(time_frame)?))
    }
}
