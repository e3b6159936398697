#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use dashboard_chart_wasm::application::{ChartRenderer, ChartSession, Timer};
use dashboard_chart_wasm::domain::chart::{ChartMeta, ChartSnapshot, ChartState, Snapshot, SnapshotSource};
use dashboard_chart_wasm::domain::errors::ChartError;
use dashboard_chart_wasm::domain::market_data::{
    Candle, ChartKey, OHLCV, Order, OrderSide, Price, Timestamp, Trade, Volume,
};
use futures::channel::oneshot;

pub fn candle(t: u64, open: f64, close: f64) -> Candle {
    Candle::new(
        Timestamp::from_millis(t),
        OHLCV::new(
            Price::from(open),
            Price::from(open.max(close) + 1.0),
            Price::from(open.min(close) - 1.0),
            Price::from(close),
            Volume::from(5.0),
        ),
    )
}

/// `count` candles spaced 10ms apart, starting at `start`.
pub fn candles(start: u64, count: usize) -> Vec<Candle> {
    (0..count as u64).map(|i| candle(start + i * 10, 10.0, 11.0)).collect()
}

pub fn trade(t: u64, price: f64, side: OrderSide) -> Trade {
    Trade {
        timestamp: Timestamp::from_millis(t),
        price: Price::from(price),
        description: format!("{side:?} @ {price}"),
        side,
    }
}

pub fn order(t: u64, price: f64, side: OrderSide) -> Order {
    Order {
        timestamp: Timestamp::from_millis(t),
        price: Price::from(price),
        description: format!("open {side:?}"),
        side,
    }
}

pub fn data(candles: Vec<Candle>) -> Snapshot {
    Snapshot::Data(ChartSnapshot { candles, ..Default::default() })
}

pub fn key() -> ChartKey {
    ChartKey::parse("binance", "BTC/USDT", "1h").unwrap()
}

pub fn other_key() -> ChartKey {
    ChartKey::parse("binance", "ETH/USDT", "1h").unwrap()
}

pub fn session() -> Rc<RefCell<ChartSession>> {
    Rc::new(RefCell::new(ChartSession::new(key(), Default::default())))
}

/// Replays queued results; answers `NoData` once the script runs out.
#[derive(Default)]
pub struct ScriptedSource {
    responses: RefCell<VecDeque<Result<Snapshot, ChartError>>>,
    calls: Cell<usize>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Result<Snapshot, ChartError>>) -> Self {
        Self { responses: RefCell::new(responses.into()), calls: Cell::new(0) }
    }

    pub fn push(&self, response: Result<Snapshot, ChartError>) {
        self.responses.borrow_mut().push_back(response);
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl SnapshotSource for ScriptedSource {
    async fn fetch_snapshot(&self, _key: &ChartKey) -> Result<Snapshot, ChartError> {
        self.calls.set(self.calls.get() + 1);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(Snapshot::NoData("script exhausted".to_string())))
    }
}

/// Each fetch waits for a result sent through the matching `respond_with` sender.
#[derive(Default)]
pub struct ChannelSource {
    pending: RefCell<VecDeque<oneshot::Receiver<Result<Snapshot, ChartError>>>>,
}

impl ChannelSource {
    pub fn respond_with(&self) -> oneshot::Sender<Result<Snapshot, ChartError>> {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push_back(rx);
        tx
    }
}

impl SnapshotSource for ChannelSource {
    async fn fetch_snapshot(&self, _key: &ChartKey) -> Result<Snapshot, ChartError> {
        let receiver = self.pending.borrow_mut().pop_front();
        match receiver {
            Some(receiver) => receiver
                .await
                .unwrap_or_else(|_| Err(ChartError::Transport("sender dropped".to_string()))),
            None => Err(ChartError::Transport("no response queued".to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Draw { candles: usize, replace: bool, title: String },
    Error(ChartError),
    NoData(String),
}

#[derive(Default)]
pub struct RecordingRenderer {
    calls: RefCell<Vec<RenderCall>>,
    failures: Cell<usize>,
}

impl RecordingRenderer {
    /// Fails the first `failures` draws, as a throwing JS callback would.
    pub fn failing(failures: usize) -> Self {
        Self { calls: RefCell::default(), failures: Cell::new(failures) }
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.borrow().clone()
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(&self, state: &ChartState, meta: &ChartMeta, replace: bool) -> Result<(), ChartError> {
        self.calls.borrow_mut().push(RenderCall::Draw {
            candles: state.candle_count(),
            replace,
            title: meta.title.clone(),
        });
        if self.failures.get() > 0 {
            self.failures.set(self.failures.get() - 1);
            return Err(ChartError::Render("draw callback threw".to_string()));
        }
        Ok(())
    }

    fn show_error(&self, error: &ChartError) {
        self.calls.borrow_mut().push(RenderCall::Error(error.clone()));
    }

    fn show_no_data(&self, reason: &str) {
        self.calls.borrow_mut().push(RenderCall::NoData(reason.to_string()));
    }
}

/// Records requested delays and resolves immediately. Optionally stops a
/// session once a number of sleeps has been reached.
#[derive(Default)]
pub struct RecordingTimer {
    sleeps: RefCell<Vec<Duration>>,
    stop_after: Cell<Option<usize>>,
    session: RefCell<Option<Rc<RefCell<ChartSession>>>>,
}

impl RecordingTimer {
    pub fn stopping(session: &Rc<RefCell<ChartSession>>, after: usize) -> Self {
        Self {
            sleeps: RefCell::default(),
            stop_after: Cell::new(Some(after)),
            session: RefCell::new(Some(session.clone())),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Timer for RecordingTimer {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        if self.stop_after.get() == Some(self.sleeps.borrow().len()) {
            if let Some(session) = self.session.borrow().as_ref() {
                session.borrow_mut().stop();
            }
        }
    }
}
