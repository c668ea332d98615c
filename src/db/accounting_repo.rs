// src/db/accounting_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::accounting::{
        Account, AccountType, EntrySide, GeneralLedgerEntry, JournalEntry, JournalEntryLine,
        NormalBalance,
    },
};

/// Movimentação agregada de uma conta no período (linha do GROUP BY).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountMovementRow {
    pub account_id: Uuid,
    pub total_debits: Decimal,
    pub total_credits: Decimal,
}

#[derive(Clone)]
pub struct AccountingRepository {
    pool: PgPool,
}

impl AccountingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // =========================================================================
    //  PLANO DE CONTAS (setup; o núcleo do razão só LÊ estas linhas)
    // =========================================================================

    pub async fn create_account<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        code: &str,
        name: &str,
        account_type: AccountType,
        normal_balance: NormalBalance,
    ) -> Result<Account, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (tenant_id, code, name, account_type, normal_balance)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(code)
        .bind(name)
        .bind(account_type)
        .bind(normal_balance)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Converte violação de chave única em erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::AccountCodeAlreadyExists;
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn get_all_accounts<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Vec<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let accounts = sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE tenant_id = $1 ORDER BY code ASC",
        )
        .bind(tenant_id)
        .fetch_all(executor)
        .await?;

        Ok(accounts)
    }

    /// Resolve um código de conta para a linha viva do plano de contas.
    /// Leitura pura, sem efeitos colaterais.
    pub async fn find_account_by_code<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        code: &str,
    ) -> Result<Option<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let account = sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE tenant_id = $1 AND code = $2",
        )
        .bind(tenant_id)
        .bind(code)
        .fetch_optional(executor)
        .await?;

        Ok(account)
    }

    pub async fn find_account_by_id<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        account_id: Uuid,
    ) -> Result<Option<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let account = sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE tenant_id = $1 AND id = $2",
        )
        .bind(tenant_id)
        .bind(account_id)
        .fetch_optional(executor)
        .await?;

        Ok(account)
    }

    // =========================================================================
    //  LANÇAMENTOS (append-only)
    // =========================================================================

    pub async fn insert_journal_entry<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        description: &str,
        transaction_date: NaiveDate,
        reference_type: Option<&str>,
        reference_id: Option<Uuid>,
        total_amount: Decimal,
        created_by: Uuid,
    ) -> Result<JournalEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, JournalEntry>(
            r#"
            INSERT INTO journal_entries (
                tenant_id, description, transaction_date,
                reference_type, reference_id, total_amount, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(description)
        .bind(transaction_date)
        .bind(reference_type)
        .bind(reference_id)
        .bind(total_amount)
        .bind(created_by)
        .fetch_one(executor)
        .await?;

        Ok(entry)
    }

    pub async fn insert_journal_entry_line<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        journal_entry_id: Uuid,
        account_id: Uuid,
        amount: Decimal,
        side: EntrySide,
        description: Option<&str>,
    ) -> Result<JournalEntryLine, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let line = sqlx::query_as::<_, JournalEntryLine>(
            r#"
            INSERT INTO journal_entry_lines (
                journal_entry_id, tenant_id, account_id, amount, side, description
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(journal_entry_id)
        .bind(tenant_id)
        .bind(account_id)
        .bind(amount)
        .bind(side)
        .bind(description)
        .fetch_one(executor)
        .await?;

        Ok(line)
    }

    /// Grava a linha materializada do razão. `signed_amount` chega pronto
    /// do serviço; `sequence_number` vem da identity do banco.
    pub async fn insert_general_ledger_entry<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        account_id: Uuid,
        journal_entry_id: Uuid,
        journal_entry_line_id: Uuid,
        transaction_date: NaiveDate,
        debit_amount: Decimal,
        credit_amount: Decimal,
        signed_amount: Decimal,
        description: Option<&str>,
    ) -> Result<GeneralLedgerEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let gl_entry = sqlx::query_as::<_, GeneralLedgerEntry>(
            r#"
            INSERT INTO general_ledger_entries (
                tenant_id, account_id, journal_entry_id, journal_entry_line_id,
                transaction_date, debit_amount, credit_amount, signed_amount, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(account_id)
        .bind(journal_entry_id)
        .bind(journal_entry_line_id)
        .bind(transaction_date)
        .bind(debit_amount)
        .bind(credit_amount)
        .bind(signed_amount)
        .bind(description)
        .fetch_one(executor)
        .await?;

        Ok(gl_entry)
    }

    pub async fn find_journal_entry<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        entry_id: Uuid,
    ) -> Result<Option<JournalEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, JournalEntry>(
            "SELECT * FROM journal_entries WHERE tenant_id = $1 AND id = $2",
        )
        .bind(tenant_id)
        .bind(entry_id)
        .fetch_optional(executor)
        .await?;

        Ok(entry)
    }

    pub async fn get_lines_for_entry<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        journal_entry_id: Uuid,
    ) -> Result<Vec<JournalEntryLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lines = sqlx::query_as::<_, JournalEntryLine>(
            r#"
            SELECT * FROM journal_entry_lines
            WHERE tenant_id = $1 AND journal_entry_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(tenant_id)
        .bind(journal_entry_id)
        .fetch_all(executor)
        .await?;

        Ok(lines)
    }

    // =========================================================================
    //  CONSULTAS AGREGADAS (balancete e razão)
    // =========================================================================

    /// Totais de débito/crédito por conta no período, recomputados a partir
    /// de journal_entry_lines (a fonte de verdade), nunca do cache do razão.
    pub async fn account_movements<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<AccountMovementRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, AccountMovementRow>(
            r#"
            SELECT
                jel.account_id,
                COALESCE(SUM(jel.amount) FILTER (WHERE jel.side = 'DEBIT'), 0)  AS total_debits,
                COALESCE(SUM(jel.amount) FILTER (WHERE jel.side = 'CREDIT'), 0) AS total_credits
            FROM journal_entry_lines jel
            JOIN journal_entries je ON je.id = jel.journal_entry_id
            WHERE je.tenant_id = $1
              AND ($2::date IS NULL OR je.transaction_date >= $2)
              AND ($3::date IS NULL OR je.transaction_date <= $3)
            GROUP BY jel.account_id
            "#,
        )
        .bind(tenant_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }

    /// Linhas do razão de uma conta em ordem de replay determinística:
    /// (transaction_date, sequence_number).
    pub async fn ledger_entries_for_account<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        account_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<GeneralLedgerEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, GeneralLedgerEntry>(
            r#"
            SELECT * FROM general_ledger_entries
            WHERE tenant_id = $1
              AND account_id = $2
              AND ($3::date IS NULL OR transaction_date >= $3)
              AND ($4::date IS NULL OR transaction_date <= $4)
            ORDER BY transaction_date ASC, sequence_number ASC
            "#,
        )
        .bind(tenant_id)
        .bind(account_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(executor)
        .await?;

        Ok(entries)
    }

    // =========================================================================
    //  SERIALIZAÇÃO DE POSTAGENS CONCORRENTES
    // =========================================================================

    /// Lock consultivo transacional por tenant: postagens concorrentes para
    /// as mesmas contas entram em fila em vez de intercalar. Liberado
    /// automaticamente no commit/rollback.
    pub async fn acquire_posting_lock<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(tenant_id.to_string())
            .execute(executor)
            .await?;

        Ok(())
    }
}
