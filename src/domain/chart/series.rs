//! Column-oriented series, laid out the way charting libraries consume them.
//!
//! Every series keeps its parallel columns the same length: rows are only
//! ever pushed or overwritten as a whole.

use serde::Serialize;

use crate::domain::market_data::{Candle, Timestamp, Trade};

/// Price columns, ascending by time
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandleSeries {
    time: Vec<u64>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
}

impl CandleSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn times(&self) -> &[u64] {
        &self.time
    }

    pub fn opens(&self) -> &[f64] {
        &self.open
    }

    pub fn highs(&self) -> &[f64] {
        &self.high
    }

    pub fn lows(&self) -> &[f64] {
        &self.low
    }

    pub fn closes(&self) -> &[f64] {
        &self.close
    }

    pub fn first_time(&self) -> Option<Timestamp> {
        self.time.first().copied().map(Timestamp::from_millis)
    }

    pub fn last_time(&self) -> Option<Timestamp> {
        self.time.last().copied().map(Timestamp::from_millis)
    }

    pub(crate) fn push(&mut self, candle: &Candle) {
        self.time.push(candle.timestamp.value());
        self.open.push(candle.ohlcv.open.value());
        self.high.push(candle.ohlcv.high.value());
        self.low.push(candle.ohlcv.low.value());
        self.close.push(candle.ohlcv.close.value());
    }

    /// Returns false on an empty series.
    pub(crate) fn overwrite_last(&mut self, candle: &Candle) -> bool {
        let Some(last) = self.time.len().checked_sub(1) else {
            return false;
        };
        self.time[last] = candle.timestamp.value();
        self.open[last] = candle.ohlcv.open.value();
        self.high[last] = candle.ohlcv.high.value();
        self.low[last] = candle.ohlcv.low.value();
        self.close[last] = candle.ohlcv.close.value();
        true
    }

    pub fn is_consistent(&self) -> bool {
        let n = self.time.len();
        self.open.len() == n && self.high.len() == n && self.low.len() == n && self.close.len() == n
    }
}

/// Volume bars, one per candle, coloured by candle direction
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VolumeSeries {
    volume: Vec<f64>,
    color: Vec<String>,
}

impl VolumeSeries {
    pub fn len(&self) -> usize {
        self.volume.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volume.is_empty()
    }

    pub fn volumes(&self) -> &[f64] {
        &self.volume
    }

    pub fn colors(&self) -> &[String] {
        &self.color
    }

    pub(crate) fn push(&mut self, volume: f64, color: &str) {
        self.volume.push(volume);
        self.color.push(color.to_string());
    }

    pub(crate) fn overwrite_last(&mut self, volume: f64, color: &str) -> bool {
        match (self.volume.last_mut(), self.color.last_mut()) {
            (Some(v), Some(c)) => {
                *v = volume;
                *c = color.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.volume.len() == self.color.len()
    }
}

/// Trade marker columns for one trade source
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TradeSeries {
    time: Vec<u64>,
    price: Vec<f64>,
    text: Vec<String>,
    color: Vec<String>,
}

impl TradeSeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn times(&self) -> &[u64] {
        &self.time
    }

    pub fn prices(&self) -> &[f64] {
        &self.price
    }

    pub fn texts(&self) -> &[String] {
        &self.text
    }

    pub fn colors(&self) -> &[String] {
        &self.color
    }

    pub(crate) fn push(&mut self, trade: &Trade, color: &str) {
        self.time.push(trade.timestamp.value());
        self.price.push(trade.price.value());
        self.text.push(trade.description.clone());
        self.color.push(color.to_string());
    }

    pub fn is_consistent(&self) -> bool {
        let n = self.time.len();
        self.price.len() == n && self.text.len() == n && self.color.len() == n
    }
}
