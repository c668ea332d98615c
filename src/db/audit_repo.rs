// src/db/audit_repo.rs

use serde_json::Value;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;

// Sempre escreve dentro da transação de quem chama, por isso não
// carrega pool próprio.
#[derive(Clone)]
pub struct AuditRepository;

impl AuditRepository {
    pub fn new() -> Self {
        Self
    }

    /// Grava um registro de auditoria. Chamado DENTRO da transação de
    /// postagem: se a auditoria falhar, o lançamento inteiro é desfeito.
    pub async fn log_action<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        user_id: Uuid,
        action: &str,
        resource_type: &str,
        resource_id: Uuid,
        new_values: &Value,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (
                tenant_id, user_id, action, resource_type, resource_id, new_values
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(tenant_id)
        .bind(user_id)
        .bind(action)
        .bind(resource_type)
        .bind(resource_id)
        .bind(new_values)
        .execute(executor)
        .await?;

        Ok(())
    }
}
