//! 管理 API 处理器。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::account::store::Store;
use crate::account::types::{AccountExport, AccountInput, AccountType, AccountView};
use crate::error::AppError;
use crate::ingest;
use crate::routing::RouteStore;
use crate::routing::table::RouteRule;
use crate::settings::{GatewaySettings, SettingsStore};

/// 管理 API 共享状态。
pub struct ConsoleState {
    pub accounts: Arc<Store>,
    pub routes: Arc<RouteStore>,
    pub settings: Arc<SettingsStore>,
}

// ============================================================================
// 账号
// ============================================================================

/// GET /api/accounts - 账号列表（含派生的配额标签，不含 refresh_token）。
pub async fn handle_list_accounts(
    State(state): State<Arc<ConsoleState>>,
) -> Json<Vec<AccountView>> {
    let accounts = state.accounts.get_all().await;
    Json(accounts.iter().map(AccountView::from_account).collect())
}

/// POST /api/accounts - 创建单个账号。
pub async fn handle_create_account(
    State(state): State<Arc<ConsoleState>>,
    Json(input): Json<AccountInput>,
) -> Result<Json<AccountView>, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::bad_request("name 不能为空"));
    }
    if input.refresh_token.trim().is_empty() {
        return Err(AppError::bad_request("refresh_token 不能为空"));
    }

    let account = state.accounts.add(input).await?;
    tracing::info!("账号已创建: {}", account.name);
    Ok(Json(AccountView::from_account(&account)))
}

/// DELETE /api/accounts/{id} - 删除账号。
pub async fn handle_delete_account(
    State(state): State<Arc<ConsoleState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.accounts.delete(&id).await? {
        return Err(AppError::not_found(format!("账号不存在: {id}")));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}

/// 批量导入请求。
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub text: String,
    #[serde(default)]
    pub account_type: AccountType,
}

/// 批量导入结果。
#[derive(Debug, Serialize)]
pub struct ImportResult {
    /// 解析出的去重 token 数。
    pub parsed: usize,
    pub imported: usize,
    pub failed: usize,
}

/// POST /api/accounts/import - 解析粘贴文本并逐 token 创建账号。
///
/// 没有识别出任何 token 是正常结果（parsed=0），由前端提示
/// 「没有可导入的内容」，不作为错误返回。
pub async fn handle_import_accounts(
    State(state): State<Arc<ConsoleState>>,
    Json(req): Json<ImportRequest>,
) -> Result<Json<ImportResult>, AppError> {
    let tokens = ingest::parse_token_input(&req.text);
    if tokens.is_empty() {
        return Ok(Json(ImportResult {
            parsed: 0,
            imported: 0,
            failed: 0,
        }));
    }

    let (imported, failed) = state
        .accounts
        .import_tokens(&tokens, req.account_type)
        .await;
    tracing::info!("批量导入完成: 解析 {} / 成功 {imported} / 失败 {failed}", tokens.len());

    Ok(Json(ImportResult {
        parsed: tokens.len(),
        imported,
        failed,
    }))
}

/// GET /api/accounts/export - 导出账号（含 refresh_token，备份/迁移用）。
pub async fn handle_export_accounts(
    State(state): State<Arc<ConsoleState>>,
) -> Json<Vec<AccountExport>> {
    Json(state.accounts.export().await)
}

// ============================================================================
// 路由
// ============================================================================

/// GET /api/routes - 按存储顺序返回规则列表。
pub async fn handle_get_routes(State(state): State<Arc<ConsoleState>>) -> Json<Vec<RouteRule>> {
    Json(state.routes.rules().await)
}

/// PUT /api/routes - 整表替换并落盘（保存时剔除空 pattern/target 的规则）。
pub async fn handle_put_routes(
    State(state): State<Arc<ConsoleState>>,
    Json(rules): Json<Vec<RouteRule>>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.routes.replace_all(rules).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/routes/preset - 应用内置预设（整表替换）。
pub async fn handle_apply_preset(
    State(state): State<Arc<ConsoleState>>,
) -> Result<Json<Vec<RouteRule>>, AppError> {
    let rules = state.routes.apply_preset().await?;
    Ok(Json(rules))
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct ResolveResult {
    pub model: String,
    pub target: String,
    pub matched: bool,
}

/// GET /api/routes/resolve?model=... - 解析入站模型名。
///
/// 无匹配时采用 passthrough-on-no-match 策略：target 回退为入站
/// 模型名本身。该策略属于这里（调用方），解析器只报告「无匹配」，
/// 替换为 reject / default-route 策略时改动只在本函数。
pub async fn handle_resolve_model(
    State(state): State<Arc<ConsoleState>>,
    Query(query): Query<ResolveQuery>,
) -> Json<ResolveResult> {
    let resolved = state.routes.resolve(&query.model).await;
    let matched = resolved.is_some();
    let target = resolved.unwrap_or_else(|| query.model.clone());

    Json(ResolveResult {
        model: query.model,
        target,
        matched,
    })
}

// ============================================================================
// 设置
// ============================================================================

/// GET /api/config - 当前网关配置快照。
pub async fn handle_get_config(State(state): State<Arc<ConsoleState>>) -> Json<GatewaySettings> {
    Json((*state.settings.get()).clone())
}

/// PUT /api/config - 整体替换网关配置。
/// 这些值对控制面是不透明的，原样落盘，由网关服务端解释。
pub async fn handle_put_config(
    State(state): State<Arc<ConsoleState>>,
    Json(settings): Json<GatewaySettings>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.settings.update(settings).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
