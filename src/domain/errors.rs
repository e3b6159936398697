/// Everything that can go wrong between the backend and the rendered chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartError {
    /// The backend has no candles for this exchange/symbol/time frame.
    NoDataAvailable(String),
    /// Network or HTTP failure. The only retryable kind.
    Transport(String),
    /// Payload is missing fields or has inconsistent columns.
    MalformedSnapshot(String),
    InvalidConfig(String),
    Render(String),
}

impl ChartError {
    pub fn kind(&self) -> &'static str {
        match self {
            ChartError::NoDataAvailable(_) => "no_data",
            ChartError::Transport(_) => "transport",
            ChartError::MalformedSnapshot(_) => "malformed_snapshot",
            ChartError::InvalidConfig(_) => "invalid_config",
            ChartError::Render(_) => "render",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ChartError::Transport(_))
    }
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartError::NoDataAvailable(msg) => write!(f, "No data available: {}", msg),
            ChartError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ChartError::MalformedSnapshot(msg) => write!(f, "Malformed snapshot: {}", msg),
            ChartError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            ChartError::Render(msg) => write!(f, "Rendering error: {}", msg),
        }
    }
}

impl std::error::Error for ChartError {}

impl From<ChartError> for wasm_bindgen::JsValue {
    fn from(error: ChartError) -> Self {
        wasm_bindgen::JsValue::from_str(&error.to_string())
    }
}

pub type ChartResult<T> = Result<T, ChartError>;
