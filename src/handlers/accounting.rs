// src/handlers/accounting.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, tenancy::TenantContext},
    models::accounting::{AccountType, NewJournalEntry, NormalBalance},
};

// ---
// Validações customizadas
// ---
fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() || val.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: CreateAccount (setup do plano de contas — o razão só LÊ contas)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountPayload {
    #[validate(length(min = 1, message = "O código da conta é obrigatório."))]
    #[schema(example = "1110")]
    pub code: String,

    #[validate(length(min = 1, message = "O nome da conta é obrigatório."))]
    #[schema(example = "Caixa")]
    pub name: String,

    pub account_type: AccountType,

    pub normal_balance: NormalBalance,
}

// ---
// Query: intervalo de datas opcional (balancete e razão)
// ---
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    #[param(value_type = Option<String>, example = "2025-01-01")]
    pub start_date: Option<NaiveDate>,

    #[param(value_type = Option<String>, example = "2025-12-31")]
    pub end_date: Option<NaiveDate>,
}

// ---
// Handler: create_account
// ---
#[utoipa::path(
    post,
    path = "/api/accounting/accounts",
    request_body = CreateAccountPayload,
    responses(
        (status = 201, description = "Conta criada"),
        (status = 409, description = "Código já existe para a empresa")
    ),
    security(("bearer_auth" = [])),
    tag = "accounting"
)]
pub async fn create_account(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Json(payload): Json<CreateAccountPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let account = app_state
        .accounting_repo
        .create_account(
            app_state.accounting_repo.pool(),
            tenant.0,
            &payload.code,
            &payload.name,
            payload.account_type,
            payload.normal_balance,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

// ---
// Handler: list_accounts
// ---
#[utoipa::path(
    get,
    path = "/api/accounting/accounts",
    responses((status = 200, description = "Plano de contas da empresa")),
    security(("bearer_auth" = [])),
    tag = "accounting"
)]
pub async fn list_accounts(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let accounts = app_state
        .accounting_repo
        .get_all_accounts(app_state.accounting_repo.pool(), tenant.0)
        .await?;

    Ok(Json(accounts))
}

// ---
// Handler: post_journal_entry
// Qualquer falha (desbalanceado, conta inexistente, natureza errada,
// auditoria) desfaz a transação inteira: zero linhas persistem.
// ---
#[utoipa::path(
    post,
    path = "/api/accounting/entries",
    request_body = NewJournalEntry,
    responses(
        (status = 201, description = "Lançamento postado"),
        (status = 404, description = "Conta não encontrada"),
        (status = 422, description = "Desbalanceado ou natureza da conta violada")
    ),
    security(("bearer_auth" = [])),
    tag = "accounting"
)]
pub async fn post_journal_entry(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Json(payload): Json<NewJournalEntry>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let posted = app_state
        .accounting_service
        .post_journal_entry(&app_state.db_pool, tenant.0, payload, user.0)
        .await?;

    Ok((StatusCode::CREATED, Json(posted)))
}

// ---
// Handler: reverse_journal_entry (correção = lançamento de estorno, nunca UPDATE)
// ---
#[utoipa::path(
    post,
    path = "/api/accounting/entries/{id}/reverse",
    params(("id" = Uuid, Path, description = "Id do lançamento original")),
    responses(
        (status = 201, description = "Estorno postado"),
        (status = 404, description = "Lançamento original não encontrado")
    ),
    security(("bearer_auth" = [])),
    tag = "accounting"
)]
pub async fn reverse_journal_entry(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Path(entry_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let posted = app_state
        .accounting_service
        .reverse_journal_entry(&app_state.db_pool, tenant.0, entry_id, user.0)
        .await?;

    Ok((StatusCode::CREATED, Json(posted)))
}

// ---
// Handler: get_trial_balance
// ---
#[utoipa::path(
    get,
    path = "/api/accounting/trial-balance",
    params(DateRangeQuery),
    responses((status = 200, description = "Balancete de verificação do período")),
    security(("bearer_auth" = [])),
    tag = "accounting"
)]
pub async fn get_trial_balance(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Query(range): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = app_state.db_pool.acquire().await?;

    let trial_balance = app_state
        .accounting_service
        .trial_balance(&mut *conn, tenant.0, range.start_date, range.end_date)
        .await?;

    Ok(Json(trial_balance))
}

// ---
// Handler: get_general_ledger
// ---
#[utoipa::path(
    get,
    path = "/api/accounting/ledger/{account_code}",
    params(
        ("account_code" = String, Path, description = "Código da conta no plano", example = "1110"),
        DateRangeQuery
    ),
    responses(
        (status = 200, description = "Razão da conta com saldo acumulado"),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("bearer_auth" = [])),
    tag = "accounting"
)]
pub async fn get_general_ledger(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Path(account_code): Path<String>,
    Query(range): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = app_state.db_pool.acquire().await?;

    let ledger = app_state
        .accounting_service
        .general_ledger(
            &mut *conn,
            tenant.0,
            &account_code,
            range.start_date,
            range.end_date,
        )
        .await?;

    Ok(Json(ledger))
}

// =========================================================================
//  EVENTOS DE NEGÓCIO (lançamentos derivados)
// =========================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PosSalePayload {
    pub sale_id: Uuid,

    #[schema(example = 1042)]
    pub display_id: i32,

    #[schema(value_type = String, format = Date, example = "2025-03-15")]
    pub transaction_date: NaiveDate,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "150.00")]
    pub total: Decimal,

    // Custo zero é permitido (serviço puro, sem baixa de estoque)
    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    #[schema(example = "90.00")]
    pub cogs_cost: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPurchasePayload {
    pub purchase_order_id: Uuid,

    pub display_id: i32,

    #[schema(value_type = String, format = Date, example = "2025-03-15")]
    pub transaction_date: NaiveDate,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "500.00")]
    pub amount: Decimal,

    // true = pagamento à vista (Caixa); false = a prazo (Fornecedores)
    pub paid_in_cash: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EarlyPaymentPayload {
    pub invoice_id: Uuid,

    pub display_id: i32,

    #[schema(value_type = String, format = Date, example = "2025-03-15")]
    pub transaction_date: NaiveDate,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "200.00")]
    pub gross_amount: Decimal,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "10.00")]
    pub discount: Decimal,
}

impl EarlyPaymentPayload {
    // Regra: o desconto precisa ser menor que o valor bruto do título.
    fn validate_consistency(&self) -> Result<(), ValidationError> {
        if self.discount >= self.gross_amount {
            return Err(ValidationError::new("DiscountExceedsGross"));
        }
        Ok(())
    }
}

#[utoipa::path(
    post,
    path = "/api/accounting/events/pos-sale",
    request_body = PosSalePayload,
    responses((status = 201, description = "Receita (e CMV) da venda lançados")),
    security(("bearer_auth" = [])),
    tag = "accounting-events"
)]
pub async fn record_pos_sale(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Json(payload): Json<PosSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let posted = app_state
        .posting_service
        .record_pos_sale(
            &app_state.db_pool,
            tenant.0,
            payload.sale_id,
            payload.display_id,
            payload.transaction_date,
            payload.total,
            payload.cogs_cost,
            user.0,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(posted)))
}

#[utoipa::path(
    post,
    path = "/api/accounting/events/inventory-purchase",
    request_body = InventoryPurchasePayload,
    responses((status = 201, description = "Compra de estoque lançada")),
    security(("bearer_auth" = [])),
    tag = "accounting-events"
)]
pub async fn record_inventory_purchase(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Json(payload): Json<InventoryPurchasePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let posted = app_state
        .posting_service
        .record_inventory_purchase(
            &app_state.db_pool,
            tenant.0,
            payload.purchase_order_id,
            payload.display_id,
            payload.transaction_date,
            payload.amount,
            payload.paid_in_cash,
            user.0,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(posted)))
}

#[utoipa::path(
    post,
    path = "/api/accounting/events/early-payment",
    request_body = EarlyPaymentPayload,
    responses((status = 201, description = "Recebimento antecipado com desconto lançado")),
    security(("bearer_auth" = [])),
    tag = "accounting-events"
)]
pub async fn record_early_payment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Json(payload): Json<EarlyPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    payload.validate_consistency().map_err(|e| {
        let mut errors = validator::ValidationErrors::new();
        errors.add("discount", e);
        AppError::ValidationError(errors)
    })?;

    let posted = app_state
        .posting_service
        .record_early_payment_discount(
            &app_state.db_pool,
            tenant.0,
            payload.invoice_id,
            payload.display_id,
            payload.transaction_date,
            payload.gross_amount,
            payload.discount,
            user.0,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(posted)))
}
