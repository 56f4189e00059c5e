//! ports - 抽象 trait 层
//!
//! 定义存储基础设施的抽象接口

mod storage;
mod unit_of_work;

pub use storage::*;
pub use unit_of_work::*;
