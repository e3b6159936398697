use serde::Serialize;
use std::collections::BTreeMap;

use super::series::{CandleSeries, TradeSeries, VolumeSeries};
use super::value_objects::{ChartPalette, TradeSource};
use crate::domain::market_data::{Candle, ChartKey, Order, OrderSide, Price, Timestamp, Trade};

/// Payload received from the backend, already validated column by column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSnapshot {
    pub candles: Vec<Candle>,
    pub trades: Vec<Trade>,
    pub orders: Vec<Order>,
    pub simulated: bool,
}

impl ChartSnapshot {
    pub fn trade_source(&self) -> TradeSource {
        TradeSource::from_simulated_flag(self.simulated)
    }
}

/// What a fetch produced: data, or the backend saying it has none
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Data(ChartSnapshot),
    NoData(String),
}

/// Delta pushed over the live channel, tagged with the chart it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct LiveUpdate {
    pub key: ChartKey,
    pub snapshot: ChartSnapshot,
}

/// Horizontal segment drawn at an open order's price
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderMarker {
    pub start: Timestamp,
    pub end: Timestamp,
    pub price: Price,
    pub description: String,
    pub side: OrderSide,
    pub color: String,
}

impl OrderMarker {
    pub fn time_range(&self) -> [Timestamp; 2] {
        [self.start, self.end]
    }
}

/// Everything drawn on one chart. Created on the first snapshot of a chart
/// key and replaced wholesale when the key changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartState {
    candles: CandleSeries,
    volume: VolumeSeries,
    trades: BTreeMap<TradeSource, TradeSeries>,
    orders: Vec<OrderMarker>,
}

impl ChartState {
    pub fn candles(&self) -> &CandleSeries {
        &self.candles
    }

    pub fn volume(&self) -> &VolumeSeries {
        &self.volume
    }

    pub fn trades(&self, source: TradeSource) -> Option<&TradeSeries> {
        self.trades.get(&source)
    }

    pub fn trade_sources(&self) -> impl Iterator<Item = TradeSource> + '_ {
        self.trades.keys().copied()
    }

    pub fn orders(&self) -> &[OrderMarker] {
        &self.orders
    }

    pub fn candle_count(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// All parallel columns agree on their length.
    pub fn is_consistent(&self) -> bool {
        self.candles.is_consistent()
            && self.volume.is_consistent()
            && self.candles.len() == self.volume.len()
            && self.trades.values().all(TradeSeries::is_consistent)
    }

    pub(crate) fn push_candle(&mut self, candle: &Candle, palette: &ChartPalette) {
        self.candles.push(candle);
        self.volume.push(candle.ohlcv.volume.value(), palette.volume_color(candle));
    }

    pub(crate) fn overwrite_last_candle(&mut self, candle: &Candle, palette: &ChartPalette) -> bool {
        if self.candles.is_empty() {
            return false;
        }
        self.candles.overwrite_last(candle);
        self.volume.overwrite_last(candle.ohlcv.volume.value(), palette.volume_color(candle));
        true
    }

    pub(crate) fn trade_series_mut(&mut self, source: TradeSource) -> &mut TradeSeries {
        self.trades.entry(source).or_default()
    }

    pub(crate) fn set_orders(&mut self, orders: Vec<OrderMarker>) {
        self.orders = orders;
    }
}
