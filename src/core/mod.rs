//! 核心层：框架相关的公共部件

pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;
