//! Hand-off from reconciled chart state to the JavaScript charting library.

pub mod js_renderer;

pub use js_renderer::*;
