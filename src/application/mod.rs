pub mod config;
pub mod session;
pub mod use_cases;

pub use config::*;
pub use session::*;
pub use use_cases::*;
