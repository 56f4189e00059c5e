//! common - 通用类型库
//!
//! 用户与帖子实体记录，由存储层分配 ID 与创建时间

pub mod types;

pub use types::*;
