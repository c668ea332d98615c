// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Plano de Contas ---
        handlers::accounting::create_account,
        handlers::accounting::list_accounts,

        // --- Lançamentos ---
        handlers::accounting::post_journal_entry,
        handlers::accounting::reverse_journal_entry,

        // --- Relatórios ---
        handlers::accounting::get_trial_balance,
        handlers::accounting::get_general_ledger,

        // --- Eventos de negócio (lançamentos derivados) ---
        handlers::accounting::record_pos_sale,
        handlers::accounting::record_inventory_purchase,
        handlers::accounting::record_early_payment,
    ),
    components(schemas(
        models::accounting::AccountType,
        models::accounting::NormalBalance,
        models::accounting::EntrySide,
        models::accounting::ReferenceSource,
        models::accounting::Account,
        models::accounting::JournalEntry,
        models::accounting::JournalEntryLine,
        models::accounting::GeneralLedgerEntry,
        models::accounting::NewJournalEntry,
        models::accounting::NewJournalEntryLine,
        models::accounting::PostedJournalEntry,
        models::accounting::TrialBalance,
        models::accounting::TrialBalanceRow,
        models::accounting::TrialBalanceSummary,
        models::accounting::GeneralLedgerView,
        models::accounting::LedgerEntryView,
        handlers::accounting::CreateAccountPayload,
        handlers::accounting::PosSalePayload,
        handlers::accounting::InventoryPurchasePayload,
        handlers::accounting::EarlyPaymentPayload,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "accounting", description = "Razão contábil de partida dobrada"),
        (name = "accounting-events", description = "Lançamentos derivados de eventos de negócio")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
