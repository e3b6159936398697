use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{AbortHandle, Abortable};
use gloo::events::EventListener;
use gloo::utils::format::JsValueSerdeExt;
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

use crate::application::{ChartConfig, ChartRefresher, ChartSession, ChartStatus, UpdateOutcome};
use crate::domain::{
    errors::ChartError,
    logging::{LogComponent, get_logger},
    market_data::ChartKey,
};
use crate::infrastructure::{
    dto::parse_live_update,
    http::BackendHttpClient,
    rendering::JsChartRenderer,
    services::GlooTimer,
    ui::ChartNotificationService,
    websocket::LiveUpdateStream,
};

type BrowserRefresher = ChartRefresher<BackendHttpClient, JsChartRenderer, GlooTimer>;

/// One dashboard chart bound to a JS draw callback.
///
/// ```js
/// const chart = new DashboardChart({ backend_url: "" }, payload => Plotly.react(el, ...));
/// chart.load("binance", "BTC/USDT", "1h");
/// ```
#[wasm_bindgen]
pub struct DashboardChart {
    config: ChartConfig,
    refresher: Rc<BrowserRefresher>,
    session: Option<Rc<RefCell<ChartSession>>>,
    live_handle: Option<AbortHandle>,
    visibility_listener: Option<EventListener>,
}

#[wasm_bindgen]
impl DashboardChart {
    /// `config` may be `undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, render_callback: js_sys::Function) -> Result<DashboardChart, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            ChartConfig::default()
        } else {
            config
                .into_serde::<ChartConfig>()
                .map_err(|e| ChartError::InvalidConfig(format!("failed to read config: {e}")))?
        };
        config.validate()?;

        let renderer = JsChartRenderer::new(
            render_callback,
            ChartNotificationService::new(config.elements.clone()),
        );
        let source = BackendHttpClient::new(&config.backend_url, &config.mode);
        let refresher = Rc::new(ChartRefresher::new(source, renderer, GlooTimer, config.clone()));

        Ok(Self { config, refresher, session: None, live_handle: None, visibility_listener: None })
    }

    /// Shows a chart and starts polling it. Calling again switches the
    /// chart: pending work for the previous one is cancelled and its
    /// state discarded.
    pub fn load(&mut self, exchange: &str, symbol: &str, time_frame: &str) -> Result<(), JsValue> {
        let key = ChartKey::parse(exchange, symbol, time_frame)?;
        let session = match &self.session {
            Some(session) => {
                session.borrow_mut().switch_to(key);
                session.clone()
            }
            None => {
                crate::log_info!(LogComponent::Presentation("DashboardChart"), "Loading chart {key}");
                let session = Rc::new(RefCell::new(ChartSession::new(key, self.config.palette.clone())));
                self.session = Some(session.clone());
                session
            }
        };

        self.start_polling(&session);
        self.watch_visibility(&session);
        Ok(())
    }

    /// Single out-of-band update. Resolves to the outcome label.
    pub fn refresh(&self) -> Promise {
        let session = self.session.clone();
        let refresher = self.refresher.clone();
        future_to_promise(async move {
            let session = session.ok_or_else(not_loaded)?;
            let replace = session.borrow().state().is_none();
            let outcome = refresher.refresh(&session, replace).await;
            Ok(JsValue::from_str(outcome.label()))
        })
    }

    /// Merges one pushed frame. Returns whether the chart changed.
    #[wasm_bindgen(js_name = applyLiveUpdate)]
    pub fn apply_live_update(&self, frame: &str) -> Result<bool, JsValue> {
        let session = self.session.as_ref().ok_or_else(not_loaded)?;
        let update = parse_live_update(frame)?;
        match self.refresher.apply_live(session, update) {
            UpdateOutcome::Applied { .. } => Ok(true),
            UpdateOutcome::Failed(error) => Err(error.into()),
            _ => Ok(false),
        }
    }

    /// Subscribes to pushed deltas. A reconnect triggers a refresh so
    /// nothing missed while disconnected is lost.
    #[wasm_bindgen(js_name = connectLive)]
    pub fn connect_live(&mut self, url: &str) -> Result<(), JsValue> {
        let session = self.session.clone().ok_or_else(not_loaded)?;
        if let Some(previous) = self.live_handle.take() {
            previous.abort();
        }

        let stream = LiveUpdateStream::new(url);
        let refresher = self.refresher.clone();
        let (handle, registration) = AbortHandle::new_pair();
        self.live_handle = Some(handle);

        spawn_local(async move {
            let on_update = {
                let refresher = refresher.clone();
                let session = session.clone();
                move |update| {
                    refresher.apply_live(&session, update);
                }
            };
            let on_reconnect = move || spawn_refresh(refresher.clone(), session.clone());
            let _ = Abortable::new(stream.run(on_update, on_reconnect), registration).await;
        });
        Ok(())
    }

    /// Cancels polling, the live stream and visibility refreshes. The last
    /// drawn chart stays on screen.
    pub fn stop(&mut self) {
        if let Some(session) = &self.session {
            session.borrow_mut().stop();
        }
        if let Some(handle) = self.live_handle.take() {
            handle.abort();
        }
        self.visibility_listener = None;
        crate::log_info!(
            LogComponent::Presentation("DashboardChart"),
            "Stopped {}",
            self.chart_key().unwrap_or_default()
        );
    }

    /// `uninitialized`, `loaded`, `updating` or `error`.
    pub fn status(&self) -> String {
        self.session
            .as_ref()
            .map(|session| session.borrow().status().label())
            .unwrap_or("uninitialized")
            .to_string()
    }

    /// Message of the last failed update, if the chart is in error.
    #[wasm_bindgen(js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        let session = self.session.as_ref()?.borrow();
        match session.status() {
            ChartStatus::Error(error) => Some(error.to_string()),
            _ => None,
        }
    }

    /// Key of the current chart as `exchange:symbol@tf`.
    #[wasm_bindgen(js_name = chartKey)]
    pub fn chart_key(&self) -> Option<String> {
        self.session.as_ref().map(|session| session.borrow().key().to_string())
    }

    /// Effective configuration after defaults were applied.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        JsValue::from_serde(&self.config)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to serialize config: {e}")).into())
    }
}

impl DashboardChart {
    fn start_polling(&self, session: &Rc<RefCell<ChartSession>>) {
        let (handle, registration) = AbortHandle::new_pair();
        session.borrow_mut().set_poll_handle(handle);

        let refresher = self.refresher.clone();
        let session = session.clone();
        spawn_local(async move {
            let _ = Abortable::new(async move { refresher.poll(&session).await }, registration).await;
        });
    }

    /// Refresh as soon as the tab becomes visible again.
    fn watch_visibility(&mut self, session: &Rc<RefCell<ChartSession>>) {
        if self.visibility_listener.is_some() {
            return;
        }
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return;
        };

        let refresher = self.refresher.clone();
        let session = session.clone();
        let listener = EventListener::new(&document, "visibilitychange", move |_| {
            let visible = web_sys::window()
                .and_then(|window| window.document())
                .map(|document| !document.hidden())
                .unwrap_or(false);
            if visible {
                spawn_refresh(refresher.clone(), session.clone());
            }
        });
        self.visibility_listener = Some(listener);
    }
}

fn spawn_refresh(refresher: Rc<BrowserRefresher>, session: Rc<RefCell<ChartSession>>) {
    spawn_local(async move {
        let outcome = refresher.refresh(&session, false).await;
        get_logger().debug(
            LogComponent::Presentation("DashboardChart"),
            &format!("Resync finished: {}", outcome.label()),
        );
    });
}

fn not_loaded() -> JsValue {
    ChartError::InvalidConfig("no chart loaded, call load() first".to_string()).into()
}
