//! 架构演示程序
//! 在进程内对每种存储后端依次执行 创建 → 查询 → 列表 → 更新 → 历史 → 删除 → 确认删除

use anyhow::{bail, Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;
use users_arch::infrastructure::{Config, StorageBackend};

struct Architecture {
    name: &'static str,
    backend: StorageBackend,
    description: &'static str,
}

const ARCHITECTURES: &[Architecture] = &[
    Architecture {
        name: "分层 / 六边形 / 洋葱 / 整洁 / CQRS / DDD",
        backend: StorageBackend::Memory,
        description: "处理器 → 服务 → 存储端口 → 内存 HashMap",
    },
    Architecture {
        name: "事件溯源 + 事件驱动",
        backend: StorageBackend::EventSourced,
        description: "写操作追加事件，读操作查询折叠出的投影",
    },
];

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== 用户 CRUD 多架构演示 ===");

    for arch in ARCHITECTURES {
        println!();
        println!("{} ({})", arch.name, arch.backend);
        println!("{}", arch.description);
        println!("{}", "=".repeat(60));

        let mut config = Config::default();
        config.storage.backend = arch.backend;
        let app = users_arch::build_router(users_arch::build_state(&config), Duration::from_secs(5));

        walkthrough(&app).await.with_context(|| format!("{} 演示失败", arch.name))?;
    }

    println!();
    println!("✅ 所有架构演示完成");
    Ok(())
}

async fn walkthrough(app: &Router) -> Result<()> {
    let user = expect(
        app,
        Method::POST,
        "/api/users",
        Some(json!({ "name": "John Doe", "email": "john@example.com" })),
        StatusCode::CREATED,
    )
    .await?;
    println!("✓ 创建用户: {}", user);
    let id = user["id"].as_str().context("响应中缺少 id")?.to_string();
    let path = format!("/api/users/{}", id);

    let fetched = expect(app, Method::GET, &path, None, StatusCode::OK).await?;
    println!("✓ 查询用户: {}", fetched);

    let all = expect(app, Method::GET, "/api/users", None, StatusCode::OK).await?;
    println!("✓ 用户列表: {} 条", all.as_array().map_or(0, Vec::len));

    let updated = expect(
        app,
        Method::PUT,
        &path,
        Some(json!({ "name": "John Updated", "email": "john.updated@example.com" })),
        StatusCode::OK,
    )
    .await?;
    println!("✓ 更新用户: {}", updated);

    match request(app, Method::GET, &format!("{}/history", path), None).await? {
        (StatusCode::OK, history) => {
            println!("✓ 事件历史: {} 条", history.as_array().map_or(0, Vec::len))
        }
        (status, body) => println!("- 事件历史不可用 ({}): {}", status, body),
    }

    expect(app, Method::DELETE, &path, None, StatusCode::OK).await?;
    println!("✓ 删除用户");

    expect(app, Method::GET, &path, None, StatusCode::NOT_FOUND).await?;
    println!("✓ 删除后查询返回 404");

    Ok(())
}

async fn expect(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    expected: StatusCode,
) -> Result<Value> {
    let (status, value) = request(app, method.clone(), uri, body).await?;
    if status != expected {
        bail!("{} {} 返回 {}，期望 {}: {}", method, uri, status, expected, value);
    }
    Ok(value)
}

async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, value))
}
