//! Policy rule persistence backed by the `policy_rules` table.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use bookstore_core::error::{AppError, ErrorKind};
use bookstore_core::result::AppResult;
use bookstore_core::traits::PolicyAdapter;
use bookstore_core::types::{Action, PolicyRule};

/// Durable [`PolicyAdapter`] over PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgPolicyAdapter {
    pool: PgPool,
}

impl PgPolicyAdapter {
    /// Create a new adapter over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
        move |e| AppError::with_source(ErrorKind::Database, message, e)
    }
}

/// Converts a raw `(subject, resource, action)` row into a rule.
fn row_to_rule((subject, resource, action): (String, String, String)) -> AppResult<PolicyRule> {
    let action: Action = action.parse().map_err(|e: AppError| {
        AppError::database(format!(
            "Corrupt policy row ({subject}, {resource}): {}",
            e.message
        ))
    })?;
    Ok(PolicyRule::new(subject, resource, action))
}

#[async_trait]
impl PolicyAdapter for PgPolicyAdapter {
    async fn load_all(&self) -> AppResult<Vec<PolicyRule>> {
        let rows = sqlx::query_as::<_, (String, String, String)>(
            "SELECT subject, resource, action FROM policy_rules \
             ORDER BY subject, resource, action",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Self::map_err("Failed to load policy rules"))?;

        rows.into_iter().map(row_to_rule).collect()
    }

    async fn add_rule(&self, rule: &PolicyRule) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO policy_rules (subject, resource, action) VALUES ($1, $2, $3) \
             ON CONFLICT DO NOTHING",
        )
        .bind(&rule.subject)
        .bind(&rule.resource)
        .bind(rule.action.as_str())
        .execute(&self.pool)
        .await
        .map_err(Self::map_err("Failed to insert policy rule"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove_rule(&self, rule: &PolicyRule) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM policy_rules WHERE subject = $1 AND resource = $2 AND action = $3",
        )
        .bind(&rule.subject)
        .bind(&rule.resource)
        .bind(rule.action.as_str())
        .execute(&self.pool)
        .await
        .map_err(Self::map_err("Failed to delete policy rule"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn save_all(&self, rules: &[PolicyRule]) -> AppResult<()> {
        // Dropping the transaction without commit rolls it back, so a
        // cancelled save leaves the previous rule set in place.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(Self::map_err("Failed to begin policy transaction"))?;

        sqlx::query("DELETE FROM policy_rules")
            .execute(&mut *tx)
            .await
            .map_err(Self::map_err("Failed to clear policy rules"))?;

        for rule in rules {
            sqlx::query(
                "INSERT INTO policy_rules (subject, resource, action) VALUES ($1, $2, $3)",
            )
            .bind(&rule.subject)
            .bind(&rule.resource)
            .bind(rule.action.as_str())
            .execute(&mut *tx)
            .await
            .map_err(Self::map_err("Failed to insert policy rule"))?;
        }

        tx.commit()
            .await
            .map_err(Self::map_err("Failed to commit policy rules"))?;

        debug!(count = rules.len(), "Policy rules saved");
        Ok(())
    }
}
