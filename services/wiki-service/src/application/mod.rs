//! 应用层

mod metrics;
mod service;

pub use self::metrics::*;
pub use service::*;
