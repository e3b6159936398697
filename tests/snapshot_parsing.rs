use dashboard_chart_wasm::domain::chart::{AxisType, ChartMeta, ChartStateMerger, Snapshot, TradeSource};
use dashboard_chart_wasm::domain::errors::ChartError;
use dashboard_chart_wasm::domain::market_data::{ChartKey, OrderSide, TimeFrame};
use dashboard_chart_wasm::infrastructure::dto::{parse_live_update, parse_snapshot};

const BODY: &str = r#"{
    "candles": {
        "time": [1700000000000, 1700003600000],
        "open": [10.5, 11.5],
        "high": [12.5, 12.75],
        "low": [9.5, 11.25],
        "close": [11.5, 12.25],
        "vol": [3.5, 1.25]
    },
    "trades": {
        "time": [1700000000000],
        "price": [10.75],
        "trade_description": ["bought 0.1 BTC"],
        "order_side": ["buy"]
    },
    "orders": {
        "time": [1699990000000],
        "price": [9.5],
        "description": ["stop loss"],
        "order_side": ["stop_loss"]
    },
    "simulated": false
}"#;

#[test]
fn parses_column_wise_snapshot() {
    let Snapshot::Data(data) = parse_snapshot(BODY).unwrap() else {
        panic!("expected data");
    };
    assert_eq!(data.candles.len(), 2);
    assert_eq!(data.candles[1].timestamp.value(), 1_700_003_600_000);
    assert_eq!(data.candles[1].ohlcv.volume.value(), 1.25);
    assert_eq!(data.trades[0].side, OrderSide::Buy);
    assert_eq!(data.orders[0].side, OrderSide::Stop);
    assert_eq!(data.trade_source(), TradeSource::Live);
}

#[test]
fn order_marker_serializes_for_the_renderer() {
    let merger = ChartStateMerger::default();
    let mut slot = None;
    let state = merger.apply_snapshot(&mut slot, parse_snapshot(BODY).unwrap(), true).unwrap();

    insta::assert_json_snapshot!(state.orders()[0], @r###"
    {
      "start": 1700000000000,
      "end": 1700003600000,
      "price": 9.5,
      "description": "stop loss",
      "side": "stop",
      "color": "rgba(255, 145, 0, 0.6)"
    }
    "###);
}

#[test]
fn chart_meta_names_the_chart() {
    let key = ChartKey::parse("binance", "BTC/USDT", "4h").unwrap();
    let meta = ChartMeta::for_key(&key, AxisType::Linear);
    insta::assert_json_snapshot!(meta, @r###"
    {
      "title": "BTC/USDT (4h) - binance",
      "x_axis": "date",
      "y_axis": "linear"
    }
    "###);
}

#[test]
fn error_body_is_no_data() {
    let snapshot = parse_snapshot(r#"{"error": "no data for BTC/USDT on binance"}"#).unwrap();
    assert_eq!(snapshot, Snapshot::NoData("no data for BTC/USDT on binance".to_string()));
}

#[test]
fn trades_and_orders_may_be_absent() {
    let body = r#"{"candles": {"time": [1], "open": [1.5], "high": [2.5], "low": [0.5], "close": [2.0], "vol": [1.0]}}"#;
    let Snapshot::Data(data) = parse_snapshot(body).unwrap() else {
        panic!("expected data");
    };
    assert!(data.trades.is_empty());
    assert!(data.orders.is_empty());
    assert!(!data.simulated);
}

#[test]
fn ragged_columns_are_malformed() {
    let body = r#"{"candles": {"time": [1, 2], "open": [1.0], "high": [2.0, 2.0], "low": [0.5, 0.5], "close": [1.0, 1.0], "vol": [1.0, 1.0]}}"#;
    let err = parse_snapshot(body).unwrap_err();
    assert_eq!(err, ChartError::MalformedSnapshot("candles: 'open' has 1 entries, expected 2".to_string()));
}

#[test]
fn unknown_side_and_garbage_are_malformed() {
    let body = BODY.replace("\"buy\"", "\"hold\"");
    assert!(matches!(parse_snapshot(&body), Err(ChartError::MalformedSnapshot(_))));
    assert!(matches!(parse_snapshot("<html>502</html>"), Err(ChartError::MalformedSnapshot(_))));
    assert!(matches!(parse_snapshot(r#"{"candles": 3}"#), Err(ChartError::MalformedSnapshot(_))));
}

#[test]
fn negative_time_is_malformed() {
    let body = r#"{"candles": {"time": [-5], "open": [1.0], "high": [2.0], "low": [0.5], "close": [1.0], "vol": [1.0]}}"#;
    assert!(matches!(parse_snapshot(body), Err(ChartError::MalformedSnapshot(_))));
}

#[test]
fn live_update_carries_its_chart_key() {
    let frame = r#"{
        "exchange_id": "binance",
        "symbol": "ETH/USDT",
        "time_frame": "15m",
        "candles": {"time": [60000], "open": [1.5], "high": [2.5], "low": [0.5], "close": [2.0], "vol": [4.0]},
        "simulated": true
    }"#;
    let update = parse_live_update(frame).unwrap();
    assert_eq!(update.key.symbol.value(), "ETH/USDT");
    assert_eq!(update.key.time_frame, TimeFrame::FifteenMinutes);
    assert_eq!(update.snapshot.trade_source(), TradeSource::Simulated);
}

#[test]
fn live_update_with_bad_key_is_malformed() {
    let frame = r#"{"exchange_id": "binance", "symbol": "ETH/USDT", "time_frame": "7m",
        "candles": {"time": [], "open": [], "high": [], "low": [], "close": [], "vol": []}}"#;
    assert!(matches!(parse_live_update(frame), Err(ChartError::MalformedSnapshot(_))));
}
