// src/services/accounting_service.rs
//
// O núcleo do razão: validação (partida dobrada + natureza da conta),
// postagem atômica, estorno, balancete de verificação e replay do razão.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::{Acquire, PgConnection, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AccountMovementRow, AccountingRepository, AuditRepository},
    models::accounting::{
        Account, EntrySide, GeneralLedgerEntry, GeneralLedgerView, LedgerEntryView,
        NewJournalEntry, NewJournalEntryLine, NormalBalance, PostedJournalEntry, ReferenceSource,
        TrialBalance, TrialBalanceRow, TrialBalanceSummary, ValidatedJournalEntry, ValidatedLine,
        balance_tolerance, signed_contribution,
    },
};

#[derive(Clone)]
pub struct AccountingService {
    repo: AccountingRepository,
    audit_repo: AuditRepository,
}

impl AccountingService {
    pub fn new(repo: AccountingRepository, audit_repo: AuditRepository) -> Self {
        Self { repo, audit_repo }
    }

    // =========================================================================
    //  VALIDAÇÃO (portão puro: nenhum efeito colateral)
    // =========================================================================

    /// Valida um lançamento proposto: débitos == créditos (com tolerância de
    /// um centavo) e cada perna conforme a natureza da conta. Devolve as
    /// contas resolvidas junto, para o poster não re-consultar.
    pub async fn validate_entry(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        entry: &NewJournalEntry,
    ) -> Result<ValidatedJournalEntry, AppError> {
        let (debit_total, _credit_total) = ensure_balanced(&entry.lines)?;

        let mut validated_lines = Vec::with_capacity(entry.lines.len());
        for line in &entry.lines {
            let account = self
                .repo
                .find_account_by_code(&mut *conn, tenant_id, &line.account_code)
                .await?
                .ok_or_else(|| AppError::AccountNotFound {
                    code: line.account_code.clone(),
                    tenant_id,
                })?;

            check_line_polarity(&account, line.side)?;

            validated_lines.push(ValidatedLine {
                line: line.clone(),
                account,
            });
        }

        Ok(ValidatedJournalEntry {
            description: entry.description.clone(),
            transaction_date: entry.transaction_date,
            reference: entry.reference,
            total_amount: debit_total,
            lines: validated_lines,
        })
    }

    // =========================================================================
    //  POSTAGEM (uma transação: cabeçalho + pernas + razão + auditoria)
    // =========================================================================

    /// Posta um lançamento. Tudo ou nada: qualquer falha (inclusive na
    /// auditoria) desfaz cabeçalho, pernas e linhas do razão.
    pub async fn post_journal_entry<'e, A>(
        &self,
        executor: A,
        tenant_id: Uuid,
        entry: NewJournalEntry,
        user_id: Uuid,
    ) -> Result<PostedJournalEntry, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let posted = self.post_in_tx(&mut tx, tenant_id, &entry, user_id).await?;

        tx.commit().await?;

        tracing::info!(
            "Lançamento {} postado ({} pernas, total {})",
            posted.entry.id,
            posted.lines.len(),
            posted.entry.total_amount
        );

        Ok(posted)
    }

    /// Estorna um lançamento já postado criando um NOVO lançamento com as
    /// pernas invertidas e referência Reversal(original). Linhas postadas
    /// nunca sofrem UPDATE: correção é sempre lançamento de estorno.
    pub async fn reverse_journal_entry<'e, A>(
        &self,
        executor: A,
        tenant_id: Uuid,
        original_id: Uuid,
        user_id: Uuid,
    ) -> Result<PostedJournalEntry, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let original = self
            .repo
            .find_journal_entry(&mut *tx, tenant_id, original_id)
            .await?
            .ok_or(AppError::JournalEntryNotFound)?;

        let original_lines = self
            .repo
            .get_lines_for_entry(&mut *tx, tenant_id, original_id)
            .await?;

        // Reconstrói as pernas com o lado invertido. Um estorno lança de
        // propósito contra a natureza das contas, então a postagem abaixo
        // pula só a checagem de natureza (o balanceamento continua).
        let mut reversal_lines = Vec::with_capacity(original_lines.len());
        for line in &original_lines {
            let account = self
                .repo
                .find_account_by_id(&mut *tx, tenant_id, line.account_id)
                .await?
                .ok_or_else(|| {
                    // Plano de contas é imutável; se sumiu, algo gravíssimo
                    AppError::InternalServerError(anyhow::anyhow!(
                        "Conta {} do lançamento original não existe mais",
                        line.account_id
                    ))
                })?;

            reversal_lines.push(NewJournalEntryLine {
                account_code: account.code,
                amount: line.amount,
                side: flip_side(line.side),
                description: line.description.clone(),
            });
        }

        let reversal = NewJournalEntry {
            description: format!("Estorno: {}", original.description),
            transaction_date: Utc::now().date_naive(),
            reference: ReferenceSource::Reversal(original_id),
            lines: reversal_lines,
        };

        let posted = self
            .post_reversal_in_tx(&mut tx, tenant_id, &reversal, user_id)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Lançamento {} estornado pelo lançamento {}",
            original_id,
            posted.entry.id
        );

        Ok(posted)
    }

    /// Caminho compartilhado da postagem, já dentro da transação do chamador.
    async fn post_in_tx(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        entry: &NewJournalEntry,
        user_id: Uuid,
    ) -> Result<PostedJournalEntry, AppError> {
        // Serializa postagens concorrentes do mesmo tenant: garante ordem de
        // replay determinística em (transaction_date, sequence_number).
        self.repo.acquire_posting_lock(&mut *conn, tenant_id).await?;

        let validated = self.validate_entry(&mut *conn, tenant_id, entry).await?;

        self.write_validated(&mut *conn, tenant_id, validated, user_id)
            .await
    }

    /// Igual ao post_in_tx, mas SEM a checagem de natureza por perna: um
    /// estorno deliberadamente lança contra a polaridade natural da conta.
    /// O balanceamento débito == crédito continua obrigatório.
    async fn post_reversal_in_tx(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        entry: &NewJournalEntry,
        user_id: Uuid,
    ) -> Result<PostedJournalEntry, AppError> {
        self.repo.acquire_posting_lock(&mut *conn, tenant_id).await?;

        let (debit_total, _) = ensure_balanced(&entry.lines)?;

        let mut validated_lines = Vec::with_capacity(entry.lines.len());
        for line in &entry.lines {
            let account = self
                .repo
                .find_account_by_code(&mut *conn, tenant_id, &line.account_code)
                .await?
                .ok_or_else(|| AppError::AccountNotFound {
                    code: line.account_code.clone(),
                    tenant_id,
                })?;

            validated_lines.push(ValidatedLine {
                line: line.clone(),
                account,
            });
        }

        let validated = ValidatedJournalEntry {
            description: entry.description.clone(),
            transaction_date: entry.transaction_date,
            reference: entry.reference,
            total_amount: debit_total,
            lines: validated_lines,
        };

        self.write_validated(&mut *conn, tenant_id, validated, user_id)
            .await
    }

    /// Escreve cabeçalho, pernas, linhas do razão e auditoria. Assume que a
    /// entrada já passou pelo portão de validação.
    async fn write_validated(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        validated: ValidatedJournalEntry,
        user_id: Uuid,
    ) -> Result<PostedJournalEntry, AppError> {
        let (reference_type, reference_id) = validated.reference.as_parts();

        let header = self
            .repo
            .insert_journal_entry(
                &mut *conn,
                tenant_id,
                &validated.description,
                validated.transaction_date,
                reference_type,
                reference_id,
                validated.total_amount,
                user_id,
            )
            .await?;

        let mut lines = Vec::with_capacity(validated.lines.len());
        for ValidatedLine { line, account } in &validated.lines {
            let persisted_line = self
                .repo
                .insert_journal_entry_line(
                    &mut *conn,
                    tenant_id,
                    header.id,
                    account.id,
                    line.amount,
                    line.side,
                    line.description.as_deref(),
                )
                .await?;

            let (debit_amount, credit_amount) = match line.side {
                EntrySide::Debit => (line.amount, Decimal::ZERO),
                EntrySide::Credit => (Decimal::ZERO, line.amount),
            };
            let signed =
                signed_contribution(line.amount, line.side, account.normal_balance);

            self.repo
                .insert_general_ledger_entry(
                    &mut *conn,
                    tenant_id,
                    account.id,
                    header.id,
                    persisted_line.id,
                    validated.transaction_date,
                    debit_amount,
                    credit_amount,
                    signed,
                    Some(&validated.description),
                )
                .await?;

            lines.push(persisted_line);
        }

        // Auditoria DENTRO da transação: se falhar, a postagem inteira
        // é desfeita (acoplamento estrito, comportamento de referência).
        self.audit_repo
            .log_action(
                &mut *conn,
                tenant_id,
                user_id,
                "CREATE",
                "journal_entry",
                header.id,
                &json!({
                    "description": &header.description,
                    "transactionDate": header.transaction_date,
                    "totalAmount": header.total_amount,
                    "lineCount": lines.len(),
                }),
            )
            .await?;

        Ok(PostedJournalEntry {
            entry: header,
            lines,
        })
    }

    // =========================================================================
    //  BALANCETE DE VERIFICAÇÃO
    // =========================================================================

    /// Balancete por conta no período. Recomputa dos journal_entry_lines
    /// (nunca confia no cache do razão); contas sem movimento aparecem
    /// zeradas.
    pub async fn trial_balance(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<TrialBalance, AppError> {
        let accounts = self.repo.get_all_accounts(&mut *conn, tenant_id).await?;
        let movements = self
            .repo
            .account_movements(&mut *conn, tenant_id, start_date, end_date)
            .await?;

        Ok(assemble_trial_balance(accounts, movements))
    }

    // =========================================================================
    //  RAZÃO GERAL (replay por conta)
    // =========================================================================

    /// Replay cronológico do razão de uma conta com saldo acumulado.
    /// Dobra pura sobre um log append-only: rodar duas vezes sobre os
    /// mesmos dados produz exatamente a mesma saída.
    pub async fn general_ledger(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        account_code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<GeneralLedgerView, AppError> {
        let account = self
            .repo
            .find_account_by_code(&mut *conn, tenant_id, account_code)
            .await?
            .ok_or_else(|| AppError::AccountNotFound {
                code: account_code.to_string(),
                tenant_id,
            })?;

        let entries = self
            .repo
            .ledger_entries_for_account(&mut *conn, tenant_id, account.id, start_date, end_date)
            .await?;

        let (entries, ending_balance) = replay_ledger(account.normal_balance, entries);

        Ok(GeneralLedgerView {
            account,
            entries,
            ending_balance,
        })
    }
}

// =========================================================================
//  Núcleo puro (testável sem banco)
// =========================================================================

fn flip_side(side: EntrySide) -> EntrySide {
    match side {
        EntrySide::Debit => EntrySide::Credit,
        EntrySide::Credit => EntrySide::Debit,
    }
}

/// Verifica a ALEGAÇÃO do chamador contra a natureza configurada da conta;
/// o sistema nunca infere a polaridade sozinho.
fn check_line_polarity(account: &Account, side: EntrySide) -> Result<(), AppError> {
    if !account.normal_balance.matches(side) {
        return Err(AppError::NormalBalanceMismatch {
            code: account.code.clone(),
            side,
            normal_balance: account.normal_balance,
        });
    }
    Ok(())
}

/// Soma as pernas por lado (decimal, nunca float binário) e exige
/// |débitos - créditos| <= tolerância. Devolve (débitos, créditos).
/// Partida dobrada: menos de duas pernas nem entra na conta.
fn ensure_balanced(lines: &[NewJournalEntryLine]) -> Result<(Decimal, Decimal), AppError> {
    if lines.len() < 2 {
        return Err(AppError::TooFewLines { count: lines.len() });
    }

    let mut debit_total = Decimal::ZERO;
    let mut credit_total = Decimal::ZERO;

    for line in lines {
        match line.side {
            EntrySide::Debit => debit_total += line.amount,
            EntrySide::Credit => credit_total += line.amount,
        }
    }

    if (debit_total - credit_total).abs() > balance_tolerance() {
        return Err(AppError::Unbalanced {
            debit_total,
            credit_total,
        });
    }

    Ok((debit_total, credit_total))
}

/// Monta o balancete: uma linha por conta do plano (zerada se não houve
/// movimento), saldo assinado pela polaridade natural, e o resumo global.
fn assemble_trial_balance(
    accounts: Vec<Account>,
    movements: Vec<AccountMovementRow>,
) -> TrialBalance {
    let by_account: HashMap<Uuid, &AccountMovementRow> =
        movements.iter().map(|m| (m.account_id, m)).collect();

    let mut rows = Vec::with_capacity(accounts.len());
    let mut total_debits = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;

    for account in accounts {
        let (debits, credits) = match by_account.get(&account.id) {
            Some(m) => (m.total_debits, m.total_credits),
            None => (Decimal::ZERO, Decimal::ZERO),
        };

        let balance = match account.normal_balance {
            NormalBalance::Debit => debits - credits,
            NormalBalance::Credit => credits - debits,
        };

        total_debits += debits;
        total_credits += credits;

        rows.push(TrialBalanceRow {
            account_id: account.id,
            account_code: account.code,
            account_name: account.name,
            account_type: account.account_type,
            normal_balance: account.normal_balance,
            total_debits: debits,
            total_credits: credits,
            balance,
        });
    }

    let is_balanced = (total_debits - total_credits).abs() < balance_tolerance();

    TrialBalance {
        accounts: rows,
        summary: TrialBalanceSummary {
            total_debits,
            total_credits,
            is_balanced,
        },
    }
}

/// Dobra o log ordenado acumulando o saldo:
/// conta devedora soma (débito - crédito), credora soma (crédito - débito).
fn replay_ledger(
    normal_balance: NormalBalance,
    entries: Vec<GeneralLedgerEntry>,
) -> (Vec<LedgerEntryView>, Decimal) {
    let mut running = Decimal::ZERO;
    let mut views = Vec::with_capacity(entries.len());

    for entry in entries {
        running += match normal_balance {
            NormalBalance::Debit => entry.debit_amount - entry.credit_amount,
            NormalBalance::Credit => entry.credit_amount - entry.debit_amount,
        };
        views.push(LedgerEntryView {
            entry,
            running_balance: running,
        });
    }

    (views, running)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::accounting::AccountType;
    use chrono::NaiveDate;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn leg(code: &str, cents: i64, side: EntrySide) -> NewJournalEntryLine {
        NewJournalEntryLine {
            account_code: code.to_string(),
            amount: dec(cents),
            side,
            description: None,
        }
    }

    fn account(code: &str, account_type: AccountType, normal: NormalBalance) -> Account {
        Account {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            code: code.to_string(),
            name: code.to_string(),
            account_type,
            normal_balance: normal,
            is_active: Some(true),
            created_at: None,
        }
    }

    fn gl_entry(
        account_id: Uuid,
        day: u32,
        seq: i64,
        debit_cents: i64,
        credit_cents: i64,
    ) -> GeneralLedgerEntry {
        GeneralLedgerEntry {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            account_id,
            journal_entry_id: Uuid::new_v4(),
            journal_entry_line_id: Uuid::new_v4(),
            transaction_date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            debit_amount: dec(debit_cents),
            credit_amount: dec(credit_cents),
            signed_amount: dec(debit_cents - credit_cents),
            sequence_number: seq,
            description: None,
            created_at: None,
        }
    }

    #[test]
    fn balanced_entry_passes_the_gate() {
        let lines = vec![
            leg("1110", 10000, EntrySide::Debit),
            leg("4100", 10000, EntrySide::Credit),
        ];
        let (debits, credits) = ensure_balanced(&lines).unwrap();
        assert_eq!(debits, dec(10000));
        assert_eq!(credits, dec(10000));
    }

    #[test]
    fn unbalanced_entry_is_rejected() {
        // débitos 100,00 x créditos 90,00
        let lines = vec![
            leg("1110", 10000, EntrySide::Debit),
            leg("4100", 9000, EntrySide::Credit),
        ];
        match ensure_balanced(&lines) {
            Err(AppError::Unbalanced {
                debit_total,
                credit_total,
            }) => {
                assert_eq!(debit_total, dec(10000));
                assert_eq!(credit_total, dec(9000));
            }
            other => panic!("esperava Unbalanced, veio {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn one_cent_drift_is_within_tolerance() {
        let lines = vec![
            leg("1110", 10000, EntrySide::Debit),
            leg("4100", 9999, EntrySide::Credit),
        ];
        assert!(ensure_balanced(&lines).is_ok());

        // Dois centavos já estoura
        let lines = vec![
            leg("1110", 10000, EntrySide::Debit),
            leg("4100", 9998, EntrySide::Credit),
        ];
        assert!(ensure_balanced(&lines).is_err());
    }

    #[test]
    fn multi_leg_entries_sum_per_side() {
        // Venda PDV: caixa 150 / receita 150 + CMV 90 / estoque 90
        let lines = vec![
            leg("1110", 15000, EntrySide::Debit),
            leg("4100", 15000, EntrySide::Credit),
            leg("5100", 9000, EntrySide::Debit),
            leg("1300", 9000, EntrySide::Credit),
        ];
        let (debits, credits) = ensure_balanced(&lines).unwrap();
        assert_eq!(debits, dec(24000));
        assert_eq!(credits, dec(24000));
    }

    #[test]
    fn entry_with_fewer_than_two_legs_is_rejected() {
        // Vec vazio soma 0 == 0 dos dois lados; sem o portão de pernas
        // ele passaria "balanceado"
        match ensure_balanced(&[]) {
            Err(AppError::TooFewLines { count }) => assert_eq!(count, 0),
            other => panic!("esperava TooFewLines, veio {:?}", other.map(|_| ())),
        }

        let single = vec![leg("1110", 10000, EntrySide::Debit)];
        match ensure_balanced(&single) {
            Err(AppError::TooFewLines { count }) => assert_eq!(count, 1),
            other => panic!("esperava TooFewLines, veio {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn normal_balance_matches_only_its_own_side() {
        assert!(NormalBalance::Debit.matches(EntrySide::Debit));
        assert!(NormalBalance::Credit.matches(EntrySide::Credit));
        assert!(!NormalBalance::Debit.matches(EntrySide::Credit));
        assert!(!NormalBalance::Credit.matches(EntrySide::Debit));
    }

    #[test]
    fn polarity_check_rejects_leg_against_account_nature() {
        // Receita (credora) recebendo perna de débito
        let revenue = account("4100", AccountType::Revenue, NormalBalance::Credit);

        assert!(check_line_polarity(&revenue, EntrySide::Credit).is_ok());

        match check_line_polarity(&revenue, EntrySide::Debit) {
            Err(AppError::NormalBalanceMismatch {
                code,
                side,
                normal_balance,
            }) => {
                assert_eq!(code, "4100");
                assert_eq!(side, EntrySide::Debit);
                assert_eq!(normal_balance, NormalBalance::Credit);
            }
            other => panic!(
                "esperava NormalBalanceMismatch, veio {:?}",
                other.map(|_| ())
            ),
        }
    }

    #[test]
    fn flip_side_inverts_each_leg() {
        assert_eq!(flip_side(EntrySide::Debit), EntrySide::Credit);
        assert_eq!(flip_side(EntrySide::Credit), EntrySide::Debit);
    }

    #[test]
    fn reversal_nets_each_account_to_zero() {
        // Venda de 100: débito em caixa, crédito em receita. O estorno
        // espelha cada perna com o lado invertido; dobrando original +
        // estorno, cada conta termina zerada nas duas polaridades.
        let cash = account("1110", AccountType::Asset, NormalBalance::Debit);
        let revenue = account("4100", AccountType::Revenue, NormalBalance::Credit);

        let cash_log = vec![
            gl_entry(cash.id, 1, 1, 10000, 0),
            // estorno: flip_side(Debit) == Credit, mesmo valor
            gl_entry(cash.id, 2, 2, 0, 10000),
        ];
        let revenue_log = vec![
            gl_entry(revenue.id, 1, 1, 0, 10000),
            gl_entry(revenue.id, 2, 2, 10000, 0),
        ];

        let (cash_views, cash_ending) = replay_ledger(cash.normal_balance, cash_log);
        assert_eq!(cash_views[0].running_balance, dec(10000));
        assert_eq!(cash_ending, Decimal::ZERO);

        let (revenue_views, revenue_ending) =
            replay_ledger(revenue.normal_balance, revenue_log);
        assert_eq!(revenue_views[0].running_balance, dec(10000));
        assert_eq!(revenue_ending, Decimal::ZERO);

        // A mesma simetria vista pela contribuição assinada de cada perna
        let net = signed_contribution(dec(10000), EntrySide::Debit, cash.normal_balance)
            + signed_contribution(
                dec(10000),
                flip_side(EntrySide::Debit),
                cash.normal_balance,
            );
        assert_eq!(net, Decimal::ZERO);
    }

    #[test]
    fn replay_folds_debit_normal_account() {
        // Caixa (devedora): débito de 100, depois crédito de 30
        let cash = account("1110", AccountType::Asset, NormalBalance::Debit);
        let entries = vec![
            gl_entry(cash.id, 1, 1, 10000, 0),
            gl_entry(cash.id, 2, 2, 0, 3000),
        ];

        let (views, ending) = replay_ledger(cash.normal_balance, entries);
        assert_eq!(views[0].running_balance, dec(10000));
        assert_eq!(views[1].running_balance, dec(7000));
        assert_eq!(ending, dec(7000));
    }

    #[test]
    fn replay_folds_credit_normal_account() {
        // Receita (credora): crédito de 100 deixa saldo +100
        let revenue = account("4100", AccountType::Revenue, NormalBalance::Credit);
        let entries = vec![gl_entry(revenue.id, 1, 1, 0, 10000)];

        let (views, ending) = replay_ledger(revenue.normal_balance, entries);
        assert_eq!(views[0].running_balance, dec(10000));
        assert_eq!(ending, dec(10000));
    }

    #[test]
    fn replay_is_idempotent() {
        let cash = account("1110", AccountType::Asset, NormalBalance::Debit);
        let entries = vec![
            gl_entry(cash.id, 1, 1, 10000, 0),
            gl_entry(cash.id, 1, 2, 0, 2500),
            gl_entry(cash.id, 3, 3, 5000, 0),
        ];

        let (first, ending_first) = replay_ledger(cash.normal_balance, entries.clone());
        let (second, ending_second) = replay_ledger(cash.normal_balance, entries);

        assert_eq!(ending_first, ending_second);
        let firsts: Vec<Decimal> = first.iter().map(|v| v.running_balance).collect();
        let seconds: Vec<Decimal> = second.iter().map(|v| v.running_balance).collect();
        assert_eq!(firsts, seconds);
    }

    #[test]
    fn trial_balance_zero_fills_and_balances() {
        let cash = account("1110", AccountType::Asset, NormalBalance::Debit);
        let revenue = account("4100", AccountType::Revenue, NormalBalance::Credit);
        let idle = account("2100", AccountType::Liability, NormalBalance::Credit);

        let movements = vec![
            AccountMovementRow {
                account_id: cash.id,
                total_debits: dec(10000),
                total_credits: Decimal::ZERO,
            },
            AccountMovementRow {
                account_id: revenue.id,
                total_debits: Decimal::ZERO,
                total_credits: dec(10000),
            },
        ];

        let tb = assemble_trial_balance(vec![cash, revenue, idle], movements);

        assert_eq!(tb.accounts.len(), 3);
        // Conta sem movimento aparece zerada
        let idle_row = tb.accounts.iter().find(|r| r.account_code == "2100").unwrap();
        assert_eq!(idle_row.total_debits, Decimal::ZERO);
        assert_eq!(idle_row.balance, Decimal::ZERO);

        // Cada saldo segue a polaridade da própria conta
        let cash_row = tb.accounts.iter().find(|r| r.account_code == "1110").unwrap();
        assert_eq!(cash_row.balance, dec(10000));
        let revenue_row = tb.accounts.iter().find(|r| r.account_code == "4100").unwrap();
        assert_eq!(revenue_row.balance, dec(10000));

        // Propriedade permanente do sistema
        assert!(tb.summary.is_balanced);
        assert_eq!(tb.summary.total_debits, tb.summary.total_credits);
    }
}
