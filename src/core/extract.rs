//! 自定义提取器

use super::error::AppError;
use axum::extract::{FromRequest, FromRequestParts};

/// 与 `axum::Json` 相同，但解析失败时返回 400 和统一的错误主体
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// 查询字符串版本
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
