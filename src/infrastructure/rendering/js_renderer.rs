use gloo::utils::format::JsValueSerdeExt;
use serde::Serialize;
use wasm_bindgen::JsValue;

use crate::application::ChartRenderer;
use crate::domain::{
    chart::{ChartMeta, ChartState},
    errors::ChartError,
    logging::{LogComponent, get_logger},
};
use crate::infrastructure::ui::ChartNotificationService;

/// Object passed to the JS draw callback. `replace` tells the library to
/// create a new plot instead of patching the existing one.
#[derive(Debug, Serialize)]
pub struct RenderPayload<'a> {
    pub meta: &'a ChartMeta,
    pub replace: bool,
    pub state: &'a ChartState,
}

/// Calls a user supplied `function(payload)` for every draw and manages the
/// surrounding DOM status.
pub struct JsChartRenderer {
    callback: js_sys::Function,
    notifications: ChartNotificationService,
}

impl JsChartRenderer {
    pub fn new(callback: js_sys::Function, notifications: ChartNotificationService) -> Self {
        Self { callback, notifications }
    }
}

impl ChartRenderer for JsChartRenderer {
    fn render(&self, state: &ChartState, meta: &ChartMeta, replace: bool) -> Result<(), ChartError> {
        let payload = RenderPayload { meta, replace, state };
        let value = JsValue::from_serde(&payload)
            .map_err(|e| ChartError::Render(format!("failed to serialize chart: {e}")))?;
        self.callback
            .call1(&JsValue::NULL, &value)
            .map_err(|e| ChartError::Render(format!("draw callback threw: {e:?}")))?;
        if let Err(e) = self.notifications.show_chart() {
            get_logger().warn(LogComponent::Infrastructure("JsChartRenderer"), &e.to_string());
        }
        Ok(())
    }

    fn show_error(&self, error: &ChartError) {
        if let Err(e) = self.notifications.show_inline_error(&error.to_string()) {
            get_logger().warn(LogComponent::Infrastructure("JsChartRenderer"), &e.to_string());
        }
    }

    fn show_no_data(&self, reason: &str) {
        if let Err(e) = self.notifications.show_no_data(reason) {
            get_logger().warn(LogComponent::Infrastructure("JsChartRenderer"), &e.to_string());
        }
    }
}
