use crate::model::notification::NotificationPayload;
use sqlx::{MySql, MySqlPool, QueryBuilder};

/// Keeps each statement well under MySQL's placeholder limit.
const INSERT_BATCH_SIZE: usize = 500;

/// Inserts the payloads, returning the number of rows written.
pub async fn insert_notifications(
    pool: &MySqlPool,
    payloads: &[NotificationPayload],
) -> Result<u64, sqlx::Error> {
    let mut inserted = 0;

    for batch in payloads.chunks(INSERT_BATCH_SIZE) {
        let mut query: QueryBuilder<MySql> = QueryBuilder::new(
            "INSERT INTO notifications (company_id, user_id, title, message, type, entity_type, entity_id) ",
        );
        query.push_values(batch, |mut row, n| {
            row.push_bind(n.company_id.clone())
                .push_bind(n.user_id.clone())
                .push_bind(n.title.clone())
                .push_bind(n.message.clone())
                .push_bind(n.notification_type)
                .push_bind(n.entity_type)
                .push_bind(n.entity_id.clone());
        });

        inserted += query.build().execute(pool).await?.rows_affected();
    }

    Ok(inserted)
}
