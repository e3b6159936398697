mod common;

use std::time::Duration;

use common::{RecordingRenderer, RecordingTimer, ScriptedSource, candles, data, session};
use dashboard_chart_wasm::application::{ChartConfig, ChartRefresher, ChartStatus};
use dashboard_chart_wasm::domain::errors::ChartError;
use futures::executor::block_on;

#[test]
fn polls_at_the_configured_interval_until_stopped() {
    let session = session();
    let source = ScriptedSource::new(vec![
        Ok(data(candles(0, 3))),
        Ok(data(candles(20, 1))),
        Ok(data(candles(30, 1))),
    ]);
    let config = ChartConfig { poll_interval_ms: 1_500, ..Default::default() };
    let refresher =
        ChartRefresher::new(source, RecordingRenderer::default(), RecordingTimer::stopping(&session, 3), config);

    block_on(refresher.poll(&session));

    assert_eq!(refresher.source().calls(), 3);
    assert_eq!(refresher.timer().sleeps(), vec![Duration::from_millis(1_500); 3]);
    assert_eq!(session.borrow().state().map(|s| s.candle_count()), Some(4));
    assert_eq!(session.borrow().status(), &ChartStatus::Loaded);
}

#[test]
fn polling_survives_failed_cycles() {
    let session = session();
    let source = ScriptedSource::new(vec![
        Err(ChartError::MalformedSnapshot("truncated".to_string())),
        Ok(data(candles(0, 2))),
    ]);
    let refresher = ChartRefresher::new(
        source,
        RecordingRenderer::default(),
        RecordingTimer::stopping(&session, 2),
        ChartConfig::default(),
    );

    block_on(refresher.poll(&session));

    assert_eq!(refresher.source().calls(), 2);
    assert_eq!(session.borrow().state().map(|s| s.candle_count()), Some(2));
}
