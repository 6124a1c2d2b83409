use crate::model::role::Role;
use sqlx::MySqlPool;

/// Users holding owner or admin in the company, ordered by id.
pub async fn company_admins(pool: &MySqlPool, company_id: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT user_id
        FROM company_members
        WHERE company_id = ?
        AND role IN (?, ?)
        ORDER BY user_id
        "#,
    )
    .bind(company_id)
    .bind(Role::Owner.to_string())
    .bind(Role::Admin.to_string())
    .fetch_all(pool)
    .await
}

/// Every company, for the scheduled scan.
pub async fn company_ids(pool: &MySqlPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT id FROM companies ORDER BY id")
        .fetch_all(pool)
        .await
}
