// src/models/accounting.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "account_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Asset,     // Ativo
    Liability, // Passivo
    Equity,    // Patrimônio Líquido
    Revenue,   // Receita
    Expense,   // Despesa
}

/// A polaridade que AUMENTA o saldo da conta por convenção contábil.
/// Ativo/Despesa: débito. Passivo/PL/Receita: crédito.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "normal_balance", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NormalBalance {
    Debit,
    Credit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "entry_side", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntrySide {
    Debit,
    Credit,
}

impl NormalBalance {
    /// A perna "casa" com a polaridade natural da conta?
    pub fn matches(self, side: EntrySide) -> bool {
        matches!(
            (self, side),
            (NormalBalance::Debit, EntrySide::Debit) | (NormalBalance::Credit, EntrySide::Credit)
        )
    }
}

/// Tolerância de arredondamento monetário (um centavo).
pub fn balance_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Contribuição assinada de uma perna para o saldo da conta:
/// +amount se a perna casa com a polaridade natural, senão -amount.
pub fn signed_contribution(amount: Decimal, side: EntrySide, normal: NormalBalance) -> Decimal {
    if normal.matches(side) { amount } else { -amount }
}

// --- Origem do lançamento ---

/// O evento de negócio que originou o lançamento. Conjunto FECHADO:
/// substitui o par frouxo (reference_type, reference_id) do banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", content = "id", rename_all = "camelCase")]
pub enum ReferenceSource {
    Invoice(Uuid),
    PosSale(Uuid),
    Expense(Uuid),
    PurchaseOrder(Uuid),
    /// Estorno de um lançamento anterior (aponta para o lançamento original)
    Reversal(Uuid),
    #[default]
    None,
}

impl ReferenceSource {
    /// Decompõe para as colunas (reference_type, reference_id).
    pub fn as_parts(&self) -> (Option<&'static str>, Option<Uuid>) {
        match self {
            ReferenceSource::Invoice(id) => (Some("INVOICE"), Some(*id)),
            ReferenceSource::PosSale(id) => (Some("POS_SALE"), Some(*id)),
            ReferenceSource::Expense(id) => (Some("EXPENSE"), Some(*id)),
            ReferenceSource::PurchaseOrder(id) => (Some("PURCHASE_ORDER"), Some(*id)),
            ReferenceSource::Reversal(id) => (Some("REVERSAL"), Some(*id)),
            ReferenceSource::None => (None, None),
        }
    }
}

// --- Structs (linhas do banco) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "1110")]
    pub code: String,

    #[schema(example = "Caixa")]
    pub name: String,

    pub account_type: AccountType,
    pub normal_balance: NormalBalance,

    #[schema(example = true)]
    pub is_active: Option<bool>,

    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "Venda PDV #1042")]
    pub description: String,

    #[schema(value_type = String, format = Date, example = "2025-03-15")]
    pub transaction_date: NaiveDate,

    #[schema(example = "POS_SALE")]
    pub reference_type: Option<String>,
    pub reference_id: Option<Uuid>,

    // Igual à soma dos débitos (== soma dos créditos, por construção)
    #[schema(example = "150.00")]
    pub total_amount: Decimal,

    pub created_by: Uuid,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryLine {
    pub id: Uuid,

    pub journal_entry_id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    pub account_id: Uuid,

    #[schema(example = "150.00")]
    pub amount: Decimal,

    pub side: EntrySide,

    pub description: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneralLedgerEntry {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    pub account_id: Uuid,
    pub journal_entry_id: Uuid,
    pub journal_entry_line_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2025-03-15")]
    pub transaction_date: NaiveDate,

    #[schema(example = "150.00")]
    pub debit_amount: Decimal,

    #[schema(example = "0.00")]
    pub credit_amount: Decimal,

    // Cache de leitura: +amount se a perna casa com a polaridade, senão -amount.
    // A fonte de verdade continua sendo journal_entry_lines.
    pub signed_amount: Decimal,

    // Desempate determinístico no replay (dois lançamentos no mesmo dia)
    pub sequence_number: i64,

    pub description: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
}

// --- Payloads de entrada ---

fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() || val.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor da perna deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

/// Uma perna (débito ou crédito) de um lançamento proposto.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewJournalEntryLine {
    #[validate(length(min = 1, message = "O código da conta é obrigatório."))]
    #[schema(example = "1110")]
    pub account_code: String,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "150.00")]
    pub amount: Decimal,

    pub side: EntrySide,

    pub description: Option<String>,
}

/// Lançamento contábil proposto (ainda não validado nem persistido).
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewJournalEntry {
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    #[schema(example = "Venda PDV #1042")]
    pub description: String,

    #[schema(value_type = String, format = Date, example = "2025-03-15")]
    pub transaction_date: NaiveDate,

    #[serde(default)]
    pub reference: ReferenceSource,

    // Partida dobrada: no mínimo duas pernas
    #[validate(
        length(min = 2, message = "Um lançamento precisa de pelo menos 2 pernas."),
        nested
    )]
    pub lines: Vec<NewJournalEntryLine>,
}

// --- Tipos validados / de saída ---

/// Uma perna já validada, com a conta resolvida (o poster não re-consulta).
#[derive(Debug, Clone)]
pub struct ValidatedLine {
    pub line: NewJournalEntryLine,
    pub account: Account,
}

/// Resultado do validador: pernas resolvidas + total balanceado.
#[derive(Debug, Clone)]
pub struct ValidatedJournalEntry {
    pub description: String,
    pub transaction_date: NaiveDate,
    pub reference: ReferenceSource,
    pub total_amount: Decimal,
    pub lines: Vec<ValidatedLine>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostedJournalEntry {
    pub entry: JournalEntry,
    pub lines: Vec<JournalEntryLine>,
}

// --- Balancete de verificação ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceRow {
    pub account_id: Uuid,

    #[schema(example = "1110")]
    pub account_code: String,

    #[schema(example = "Caixa")]
    pub account_name: String,

    pub account_type: AccountType,
    pub normal_balance: NormalBalance,

    #[schema(example = "150.00")]
    pub total_debits: Decimal,

    #[schema(example = "0.00")]
    pub total_credits: Decimal,

    // Saldo assinado pela polaridade natural da conta
    #[schema(example = "150.00")]
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceSummary {
    pub total_debits: Decimal,
    pub total_credits: Decimal,

    // Propriedade permanente do sistema: sempre true se todo lançamento
    // passou pelo poster.
    pub is_balanced: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalance {
    pub accounts: Vec<TrialBalanceRow>,
    pub summary: TrialBalanceSummary,
}

// --- Razão geral (replay por conta) ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryView {
    pub entry: GeneralLedgerEntry,

    #[schema(example = "150.00")]
    pub running_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneralLedgerView {
    pub account: Account,
    pub entries: Vec<LedgerEntryView>,
    pub ending_balance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn signed_contribution_follows_polarity() {
        // Conta devedora (Caixa): débito aumenta, crédito diminui
        assert_eq!(
            signed_contribution(dec(10000), EntrySide::Debit, NormalBalance::Debit),
            dec(10000)
        );
        assert_eq!(
            signed_contribution(dec(10000), EntrySide::Credit, NormalBalance::Debit),
            dec(-10000)
        );
        // Conta credora (Receita): crédito aumenta, débito diminui
        assert_eq!(
            signed_contribution(dec(10000), EntrySide::Credit, NormalBalance::Credit),
            dec(10000)
        );
        assert_eq!(
            signed_contribution(dec(10000), EntrySide::Debit, NormalBalance::Credit),
            dec(-10000)
        );
    }

    #[test]
    fn reference_source_round_trips_to_columns() {
        let id = Uuid::new_v4();
        assert_eq!(
            ReferenceSource::PosSale(id).as_parts(),
            (Some("POS_SALE"), Some(id))
        );
        assert_eq!(
            ReferenceSource::Reversal(id).as_parts(),
            (Some("REVERSAL"), Some(id))
        );
        assert_eq!(ReferenceSource::None.as_parts(), (None, None));
    }

    #[test]
    fn payload_rejects_single_leg_entry() {
        let entry = NewJournalEntry {
            description: "Lançamento torto".to_string(),
            transaction_date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            reference: ReferenceSource::None,
            lines: vec![NewJournalEntryLine {
                account_code: "1110".to_string(),
                amount: dec(10000),
                side: EntrySide::Debit,
                description: None,
            }],
        };
        let errs = entry.validate().unwrap_err();
        assert!(errs.field_errors().contains_key("lines"));
    }

    #[test]
    fn line_rejects_zero_amount() {
        let line = NewJournalEntryLine {
            account_code: "1110".to_string(),
            amount: Decimal::ZERO,
            side: EntrySide::Debit,
            description: None,
        };
        assert!(line.validate().is_err());
    }
}
