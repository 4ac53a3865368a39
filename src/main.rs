pub mod account;
pub mod config;
pub mod console;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod quota;
pub mod routing;
pub mod settings;

use anyhow::Context;
use axum::Router;
use axum::routing::{delete, get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::Config::load();

    init_tracing(&cfg);

    let accounts = Arc::new(account::store::Store::new(&cfg.data_dir));
    if let Err(e) = accounts.load().await {
        tracing::warn!("加载 accounts.json 失败: {e:#}");
    }
    tracing::info!("已加载 {} 个账号", accounts.count().await);

    let routes = Arc::new(routing::RouteStore::new(&cfg.data_dir));
    if let Err(e) = routes.load().await {
        tracing::warn!("加载 routes.json 失败: {e:#}");
    }

    let settings = Arc::new(settings::SettingsStore::new(&cfg.data_dir));
    if let Err(e) = settings.load().await {
        tracing::warn!("加载 config.json 失败: {e:#}");
    }

    let state = Arc::new(console::ConsoleState {
        accounts,
        routes,
        settings,
    });

    let app = Router::new()
        .route("/health", get(handle_health))
        .route(
            "/api/accounts",
            get(console::handle_list_accounts).post(console::handle_create_account),
        )
        .route(
            "/api/accounts/import",
            post(console::handle_import_accounts),
        )
        .route(
            "/api/accounts/export",
            get(console::handle_export_accounts),
        )
        .route("/api/accounts/{id}", delete(console::handle_delete_account))
        .route(
            "/api/routes",
            get(console::handle_get_routes).put(console::handle_put_routes),
        )
        .route("/api/routes/preset", post(console::handle_apply_preset))
        .route("/api/routes/resolve", get(console::handle_resolve_model))
        .route(
            "/api/config",
            get(console::handle_get_config).put(console::handle_put_config),
        )
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], cfg.port)));

    tracing::info!("Admin console listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("绑定监听端口失败")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("服务异常退出")?;

    Ok(())
}

async fn handle_health() -> &'static str {
    "ok"
}

fn init_tracing(cfg: &config::Config) {
    // 依赖库日志默认压到 warn，本 crate 的等级由 DEBUG 控制；
    // 环境里已有 RUST_LOG 时以它为准，但保证本 crate 的指令存在。
    let directive = cfg.log_level().directive();
    let env = std::env::var("RUST_LOG").unwrap_or_default();
    let env = env.trim();
    let filter = if env.is_empty() {
        EnvFilter::new(format!("warn,aigw_admin={directive}"))
    } else if env.contains("aigw_admin") {
        EnvFilter::new(env)
    } else {
        EnvFilter::new(format!("{env},aigw_admin={directive}"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .try_init();
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("收到退出信号，准备关闭服务...");
}
