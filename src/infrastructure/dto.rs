//! Wire format of the dashboard backend.
//!
//! Series arrive column-wise (`{time: [..], open: [..], ..}`); conversion to
//! domain objects checks that every column of a group has the same length
//! before anything is built.

use serde::Deserialize;

use crate::domain::{
    chart::{ChartSnapshot, LiveUpdate, Snapshot},
    errors::ChartError,
    market_data::{Candle, ChartKey, OHLCV, Order, OrderSide, Price, Timestamp, Trade, Volume},
};

/// Body of the graph update endpoint
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SnapshotResponse {
    NoData { error: String },
    Data(SnapshotDto),
}

#[derive(Debug, Deserialize)]
pub struct SnapshotDto {
    pub candles: CandleColumnsDto,
    #[serde(default)]
    pub trades: TradeColumnsDto,
    #[serde(default)]
    pub orders: OrderColumnsDto,
    #[serde(default)]
    pub simulated: bool,
}

#[derive(Debug, Deserialize)]
pub struct CandleColumnsDto {
    pub time: Vec<f64>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    #[serde(alias = "volume")]
    pub vol: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TradeColumnsDto {
    pub time: Vec<f64>,
    pub price: Vec<f64>,
    pub trade_description: Vec<String>,
    pub order_side: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrderColumnsDto {
    pub time: Vec<f64>,
    pub price: Vec<f64>,
    pub description: Vec<String>,
    pub order_side: Vec<String>,
}

/// Frame pushed on the live channel
#[derive(Debug, Deserialize)]
pub struct LiveUpdateDto {
    pub exchange_id: String,
    pub symbol: String,
    pub time_frame: String,
    #[serde(flatten)]
    pub data: SnapshotDto,
}

pub fn parse_snapshot(body: &str) -> Result<Snapshot, ChartError> {
    let response: SnapshotResponse = serde_json::from_str(body)
        .map_err(|e| ChartError::MalformedSnapshot(format!("unexpected response body: {e}")))?;
    response.into_domain()
}

pub fn parse_live_update(frame: &str) -> Result<LiveUpdate, ChartError> {
    let dto: LiveUpdateDto = serde_json::from_str(frame)
        .map_err(|e| ChartError::MalformedSnapshot(format!("unexpected live update: {e}")))?;
    dto.into_domain()
}

impl SnapshotResponse {
    pub fn into_domain(self) -> Result<Snapshot, ChartError> {
        match self {
            SnapshotResponse::NoData { error } => Ok(Snapshot::NoData(error)),
            SnapshotResponse::Data(dto) => Ok(Snapshot::Data(dto.into_domain()?)),
        }
    }
}

impl LiveUpdateDto {
    pub fn into_domain(self) -> Result<LiveUpdate, ChartError> {
        let key = ChartKey::parse(&self.exchange_id, &self.symbol, &self.time_frame)
            .map_err(|e| ChartError::MalformedSnapshot(format!("bad chart key: {e}")))?;
        Ok(LiveUpdate { key, snapshot: self.data.into_domain()? })
    }
}

impl SnapshotDto {
    pub fn into_domain(self) -> Result<ChartSnapshot, ChartError> {
        Ok(ChartSnapshot {
            candles: self.candles.into_domain()?,
            trades: self.trades.into_domain()?,
            orders: self.orders.into_domain()?,
            simulated: self.simulated,
        })
    }
}

impl CandleColumnsDto {
    pub fn into_domain(self) -> Result<Vec<Candle>, ChartError> {
        let n = self.time.len();
        check_len("candles", "open", self.open.len(), n)?;
        check_len("candles", "high", self.high.len(), n)?;
        check_len("candles", "low", self.low.len(), n)?;
        check_len("candles", "close", self.close.len(), n)?;
        check_len("candles", "vol", self.vol.len(), n)?;

        (0..n)
            .map(|i| {
                Ok(Candle::new(
                    to_timestamp(self.time[i])?,
                    OHLCV::new(
                        Price::new(self.open[i]),
                        Price::new(self.high[i]),
                        Price::new(self.low[i]),
                        Price::new(self.close[i]),
                        Volume::new(self.vol[i]),
                    ),
                ))
            })
            .collect()
    }
}

impl TradeColumnsDto {
    pub fn into_domain(self) -> Result<Vec<Trade>, ChartError> {
        let n = self.time.len();
        check_len("trades", "price", self.price.len(), n)?;
        check_len("trades", "trade_description", self.trade_description.len(), n)?;
        check_len("trades", "order_side", self.order_side.len(), n)?;

        self.time
            .into_iter()
            .zip(self.price)
            .zip(self.trade_description)
            .zip(self.order_side)
            .map(|(((time, price), description), side)| {
                Ok(Trade {
                    timestamp: to_timestamp(time)?,
                    price: Price::new(price),
                    description,
                    side: to_side(&side)?,
                })
            })
            .collect()
    }
}

impl OrderColumnsDto {
    pub fn into_domain(self) -> Result<Vec<Order>, ChartError> {
        let n = self.time.len();
        check_len("orders", "price", self.price.len(), n)?;
        check_len("orders", "description", self.description.len(), n)?;
        check_len("orders", "order_side", self.order_side.len(), n)?;

        self.time
            .into_iter()
            .zip(self.price)
            .zip(self.description)
            .zip(self.order_side)
            .map(|(((time, price), description), side)| {
                Ok(Order {
                    timestamp: to_timestamp(time)?,
                    price: Price::new(price),
                    description,
                    side: to_side(&side)?,
                })
            })
            .collect()
    }
}

fn check_len(group: &str, column: &str, actual: usize, expected: usize) -> Result<(), ChartError> {
    if actual != expected {
        return Err(ChartError::MalformedSnapshot(format!(
            "{group}: '{column}' has {actual} entries, expected {expected}"
        )));
    }
    Ok(())
}

fn to_timestamp(raw: f64) -> Result<Timestamp, ChartError> {
    if !raw.is_finite() || raw < 0.0 {
        return Err(ChartError::MalformedSnapshot(format!("invalid time value: {raw}")));
    }
    Ok(Timestamp::from_millis(raw.round() as u64))
}

fn to_side(raw: &str) -> Result<OrderSide, ChartError> {
    OrderSide::parse(raw).ok_or_else(|| ChartError::MalformedSnapshot(format!("unknown order side: {raw}")))
}
