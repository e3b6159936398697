//! Market data: candles, trades, orders and the value objects they carry.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
