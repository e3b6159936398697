use super::entities::{ChartSnapshot, ChartState, OrderMarker, Snapshot};
use super::value_objects::{ChartPalette, TradeSource};
use crate::domain::{
    errors::ChartError,
    logging::{LogComponent, get_logger},
    market_data::{Candle, Order, Trade},
};

/// Reconciles a rendered chart with freshly received data without
/// discarding the history it already holds.
#[derive(Debug, Clone, Default)]
pub struct ChartStateMerger {
    palette: ChartPalette,
}

impl ChartStateMerger {
    pub fn new(palette: ChartPalette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &ChartPalette {
        &self.palette
    }

    /// Applies `snapshot` to the chart held in `slot`.
    ///
    /// An empty slot or `replace == true` rebuilds every series from the
    /// snapshot. Otherwise candles are merged, trades appended and order
    /// markers recomputed. On error the slot is left exactly as it was.
    pub fn apply_snapshot<'a>(
        &self,
        slot: &'a mut Option<ChartState>,
        snapshot: Snapshot,
        replace: bool,
    ) -> Result<&'a ChartState, ChartError> {
        let data = match snapshot {
            Snapshot::Data(data) => data,
            Snapshot::NoData(reason) => return Err(ChartError::NoDataAvailable(reason)),
        };
        validate_candles(&data.candles)?;

        let rebuild = replace || slot.is_none();
        let state = slot.get_or_insert_with(ChartState::default);
        if rebuild {
            *state = self.build(data);
            get_logger().debug(
                LogComponent::Domain("ChartStateMerger"),
                &format!("Rebuilt chart with {} candles", state.candle_count()),
            );
        } else {
            self.merge_into(state, data);
        }
        Ok(state)
    }

    fn build(&self, data: ChartSnapshot) -> ChartState {
        let mut state = ChartState::default();
        for candle in &data.candles {
            state.push_candle(candle, &self.palette);
        }
        self.append_trades(&mut state, data.trade_source(), &data.trades);
        self.rebuild_orders(&mut state, &data.orders);
        state
    }

    fn merge_into(&self, state: &mut ChartState, data: ChartSnapshot) {
        self.merge_candles(state, &data.candles);
        self.append_trades(state, data.trade_source(), &data.trades);
        self.rebuild_orders(state, &data.orders);
    }

    /// The backend resends the open candle every cycle and, once it closes,
    /// the closed one followed by the newly opened one. Only the last two
    /// candles of a batch are considered. A candle at the current last time
    /// overwrites it, a newer one is appended and an older one is stale and
    /// dropped, so times stay strictly ascending.
    pub fn merge_candles(&self, state: &mut ChartState, batch: &[Candle]) {
        let Some(last) = state.candles().last_time() else {
            for candle in batch {
                state.push_candle(candle, &self.palette);
            }
            return;
        };

        let tail = &batch[batch.len().saturating_sub(2)..];
        if let [closed, _] = tail {
            if closed.timestamp != last {
                get_logger().warn(
                    LogComponent::Domain("ChartStateMerger"),
                    &format!(
                        "Closing candle {} does not match in-construction candle {}",
                        closed.timestamp.value(),
                        last.value()
                    ),
                );
            }
        }

        for candle in tail {
            match state.candles().last_time() {
                Some(current) if candle.timestamp == current => {
                    state.overwrite_last_candle(candle, &self.palette);
                }
                Some(current) if candle.timestamp < current => {
                    get_logger().debug(
                        LogComponent::Domain("ChartStateMerger"),
                        &format!(
                            "Dropping stale candle {} (last is {})",
                            candle.timestamp.value(),
                            current.value()
                        ),
                    );
                }
                _ => state.push_candle(candle, &self.palette),
            }
        }
    }

    /// Trades are immutable once recorded: existing rows are never touched.
    pub fn append_trades(&self, state: &mut ChartState, source: TradeSource, trades: &[Trade]) {
        if trades.is_empty() {
            return;
        }
        let series = state.trade_series_mut(source);
        for trade in trades {
            series.push(trade, self.palette.trade_color(trade.side));
        }
    }

    /// Each order spans from its creation (clamped to the first candle)
    /// to the last candle.
    pub fn rebuild_orders(&self, state: &mut ChartState, orders: &[Order]) {
        let first = state.candles().first_time();
        let last = state.candles().last_time();
        let markers = orders
            .iter()
            .map(|order| {
                let start = first.map_or(order.timestamp, |first| first.max(order.timestamp));
                let end = last.map_or(start, |last| last.max(start));
                OrderMarker {
                    start,
                    end,
                    price: order.price,
                    description: order.description.clone(),
                    side: order.side,
                    color: self.palette.order_color(order.side).to_string(),
                }
            })
            .collect();
        state.set_orders(markers);
    }
}

fn validate_candles(candles: &[Candle]) -> Result<(), ChartError> {
    if let Some(bad) = candles.iter().find(|c| !c.ohlcv.is_finite()) {
        return Err(ChartError::MalformedSnapshot(format!(
            "candle {} has non-finite values",
            bad.timestamp.value()
        )));
    }
    if let Some(pair) = candles.windows(2).find(|w| w[0].timestamp >= w[1].timestamp) {
        return Err(ChartError::MalformedSnapshot(format!(
            "candle times not ascending: {} then {}",
            pair[0].timestamp.value(),
            pair[1].timestamp.value()
        )));
    }
    Ok(())
}
