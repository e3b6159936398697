//! Chart aggregate: the rendered state, its series and the merger that keeps
//! it in sync with the backend.

pub mod entities;
pub mod repositories;
pub mod series;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use repositories::*;
pub use series::*;
pub use services::*;
pub use value_objects::*;
