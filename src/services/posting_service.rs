// src/services/posting_service.rs
//
// Construtores de lançamentos derivados: eventos de negócio (venda PDV,
// compra de estoque, desconto por pagamento antecipado) viram pedidos de
// lançamento bem formados e passam pelo MESMO portão de postagem. O razão
// trata os códigos como strings opacas — nenhuma lógica especial por conta.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::accounting::{
        EntrySide, NewJournalEntry, NewJournalEntryLine, PostedJournalEntry, ReferenceSource,
    },
    services::accounting_service::AccountingService,
};

// Códigos documentados do plano de contas padrão
pub const ACC_CASH: &str = "1110"; // Caixa
pub const ACC_RECEIVABLES: &str = "1200"; // Contas a Receber
pub const ACC_INVENTORY: &str = "1300"; // Estoque
pub const ACC_PAYABLES: &str = "2100"; // Fornecedores
pub const ACC_SALES_REVENUE: &str = "4100"; // Receita de Vendas
pub const ACC_DISCOUNTS_GIVEN: &str = "4900"; // Descontos Concedidos (redutora, natureza devedora)
pub const ACC_COGS: &str = "5100"; // CMV

fn leg(code: &str, amount: Decimal, side: EntrySide, description: &str) -> NewJournalEntryLine {
    NewJournalEntryLine {
        account_code: code.to_string(),
        amount,
        side,
        description: Some(description.to_string()),
    }
}

/// Venda PDV: reconhece a receita e, se houver custo, baixa o estoque.
/// Caixa D / Receita C; CMV D / Estoque C.
pub fn pos_sale_entry(
    sale_id: Uuid,
    display_id: i32,
    transaction_date: NaiveDate,
    total: Decimal,
    cogs_cost: Decimal,
) -> NewJournalEntry {
    let description = format!("Venda PDV #{}", display_id);

    let mut lines = vec![
        leg(ACC_CASH, total, EntrySide::Debit, "Recebimento em caixa"),
        leg(ACC_SALES_REVENUE, total, EntrySide::Credit, "Receita de venda"),
    ];

    if cogs_cost > Decimal::ZERO {
        lines.push(leg(ACC_COGS, cogs_cost, EntrySide::Debit, "Custo da mercadoria vendida"));
        lines.push(leg(ACC_INVENTORY, cogs_cost, EntrySide::Credit, "Baixa de estoque"));
    }

    NewJournalEntry {
        description,
        transaction_date,
        reference: ReferenceSource::PosSale(sale_id),
        lines,
    }
}

/// Compra de estoque: Estoque D / (Caixa ou Fornecedores) C.
pub fn inventory_purchase_entry(
    purchase_order_id: Uuid,
    display_id: i32,
    transaction_date: NaiveDate,
    amount: Decimal,
    paid_in_cash: bool,
) -> NewJournalEntry {
    let counterparty = if paid_in_cash { ACC_CASH } else { ACC_PAYABLES };

    NewJournalEntry {
        description: format!("Compra de estoque OC #{}", display_id),
        transaction_date,
        reference: ReferenceSource::PurchaseOrder(purchase_order_id),
        lines: vec![
            leg(ACC_INVENTORY, amount, EntrySide::Debit, "Entrada de estoque"),
            leg(counterparty, amount, EntrySide::Credit, "Contrapartida da compra"),
        ],
    }
}

/// Recebimento antecipado com desconto: o cliente paga (bruto - desconto),
/// o desconto vai para a conta redutora e o título a receber baixa pelo
/// valor bruto. Caixa D (líquido) + Descontos D / Contas a Receber C (bruto).
pub fn early_payment_discount_entry(
    invoice_id: Uuid,
    display_id: i32,
    transaction_date: NaiveDate,
    gross_amount: Decimal,
    discount: Decimal,
) -> NewJournalEntry {
    NewJournalEntry {
        description: format!("Recebimento antecipado NF #{}", display_id),
        transaction_date,
        reference: ReferenceSource::Invoice(invoice_id),
        lines: vec![
            leg(
                ACC_CASH,
                gross_amount - discount,
                EntrySide::Debit,
                "Recebimento líquido",
            ),
            leg(
                ACC_DISCOUNTS_GIVEN,
                discount,
                EntrySide::Debit,
                "Desconto por pagamento antecipado",
            ),
            leg(
                ACC_RECEIVABLES,
                gross_amount,
                EntrySide::Credit,
                "Baixa do título",
            ),
        ],
    }
}

/// Serviço fino: constrói o lançamento derivado e posta pelo núcleo.
/// Qualquer erro do razão sobe intacto — quem decide re-tentar a operação
/// de negócio é o chamador.
#[derive(Clone)]
pub struct DerivedPostingService {
    accounting: AccountingService,
}

impl DerivedPostingService {
    pub fn new(accounting: AccountingService) -> Self {
        Self { accounting }
    }

    pub async fn record_pos_sale<'e, A>(
        &self,
        executor: A,
        tenant_id: Uuid,
        sale_id: Uuid,
        display_id: i32,
        transaction_date: NaiveDate,
        total: Decimal,
        cogs_cost: Decimal,
        user_id: Uuid,
    ) -> Result<PostedJournalEntry, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let entry = pos_sale_entry(sale_id, display_id, transaction_date, total, cogs_cost);
        self.accounting
            .post_journal_entry(executor, tenant_id, entry, user_id)
            .await
    }

    pub async fn record_inventory_purchase<'e, A>(
        &self,
        executor: A,
        tenant_id: Uuid,
        purchase_order_id: Uuid,
        display_id: i32,
        transaction_date: NaiveDate,
        amount: Decimal,
        paid_in_cash: bool,
        user_id: Uuid,
    ) -> Result<PostedJournalEntry, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let entry = inventory_purchase_entry(
            purchase_order_id,
            display_id,
            transaction_date,
            amount,
            paid_in_cash,
        );
        self.accounting
            .post_journal_entry(executor, tenant_id, entry, user_id)
            .await
    }

    pub async fn record_early_payment_discount<'e, A>(
        &self,
        executor: A,
        tenant_id: Uuid,
        invoice_id: Uuid,
        display_id: i32,
        transaction_date: NaiveDate,
        gross_amount: Decimal,
        discount: Decimal,
        user_id: Uuid,
    ) -> Result<PostedJournalEntry, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let entry = early_payment_discount_entry(
            invoice_id,
            display_id,
            transaction_date,
            gross_amount,
            discount,
        );
        self.accounting
            .post_journal_entry(executor, tenant_id, entry, user_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    fn totals(entry: &NewJournalEntry) -> (Decimal, Decimal) {
        entry.lines.iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(d, c), line| match line.side {
                EntrySide::Debit => (d + line.amount, c),
                EntrySide::Credit => (d, c + line.amount),
            },
        )
    }

    #[test]
    fn pos_sale_builds_balanced_revenue_and_cogs() {
        let entry = pos_sale_entry(Uuid::new_v4(), 1042, date(), dec(15000), dec(9000));

        assert_eq!(entry.lines.len(), 4);
        let (debits, credits) = totals(&entry);
        assert_eq!(debits, credits);
        assert_eq!(debits, dec(24000));
        assert!(matches!(entry.reference, ReferenceSource::PosSale(_)));
    }

    #[test]
    fn pos_sale_without_cost_skips_cogs_legs() {
        let entry = pos_sale_entry(Uuid::new_v4(), 1, date(), dec(15000), Decimal::ZERO);
        assert_eq!(entry.lines.len(), 2);
        let (debits, credits) = totals(&entry);
        assert_eq!(debits, credits);
    }

    #[test]
    fn inventory_purchase_picks_counterparty() {
        let cash = inventory_purchase_entry(Uuid::new_v4(), 7, date(), dec(50000), true);
        assert_eq!(cash.lines[1].account_code, ACC_CASH);

        let on_credit = inventory_purchase_entry(Uuid::new_v4(), 7, date(), dec(50000), false);
        assert_eq!(on_credit.lines[1].account_code, ACC_PAYABLES);

        let (debits, credits) = totals(&on_credit);
        assert_eq!(debits, credits);
    }

    #[test]
    fn early_payment_discount_balances_gross_against_net_plus_discount() {
        // Bruto 200, desconto 10: caixa 190 + desconto 10 = 200
        let entry =
            early_payment_discount_entry(Uuid::new_v4(), 88, date(), dec(20000), dec(1000));

        let (debits, credits) = totals(&entry);
        assert_eq!(debits, credits);
        assert_eq!(credits, dec(20000));
        assert_eq!(entry.lines[0].amount, dec(19000));
    }
}
