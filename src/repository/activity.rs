use crate::analytics::{CompanyActivity, EmployeeHistory};
use crate::error::AnalyticsError;
use crate::model::{
    absence::Absence,
    incident::Incident,
    scheduled_shift::ScheduledShift,
    time_event::{TimeEvent, TimeEventRow},
    work_session::WorkSession,
};
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use tracing::{debug, warn};

/// Shift times are read through TIME_FORMAT so TIME and VARCHAR columns both
/// come back as "HH:MM".
const SHIFT_COLUMNS: &str = r#"
    user_id,
    date,
    expected_hours,
    TIME_FORMAT(start_time, '%H:%i') AS start_time,
    TIME_FORMAT(end_time, '%H:%i') AS end_time
"#;

fn into_events(rows: Vec<TimeEventRow>) -> Vec<TimeEvent> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id.clone();
            match TimeEvent::try_from(row) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(error = %e, event_id = %id, "Skipping time event");
                    None
                }
            }
        })
        .collect()
}

/// Company's configured offset from UTC in minutes, if any.
pub async fn company_utc_offset(
    pool: &MySqlPool,
    company_id: &str,
) -> Result<Option<i32>, AnalyticsError> {
    let row = sqlx::query_as::<_, (Option<i32>,)>(
        "SELECT utc_offset_minutes FROM companies WHERE id = ?",
    )
    .bind(company_id)
    .fetch_optional(pool)
    .await
    .map_err(AnalyticsError::upstream("Failed to load company"))?;

    Ok(row.and_then(|(offset,)| offset))
}

/// Events, member names and approved absences of a company since `since`.
pub async fn load_company_activity(
    pool: &MySqlPool,
    company_id: &str,
    since: DateTime<Utc>,
) -> Result<CompanyActivity, AnalyticsError> {
    let rows = sqlx::query_as::<_, TimeEventRow>(
        r#"
        SELECT id, user_id, event_type, event_time, latitude, longitude
        FROM time_events
        WHERE company_id = ?
        AND event_time >= ?
        ORDER BY event_time, id
        "#,
    )
    .bind(company_id)
    .bind(since)
    .fetch_all(pool)
    .await
    .map_err(AnalyticsError::upstream("Failed to load time events"))?;

    let names = sqlx::query_as::<_, (String, Option<String>)>(
        r#"
        SELECT p.id, p.full_name
        FROM company_members cm
        JOIN profiles p ON p.id = cm.user_id
        WHERE cm.company_id = ?
        "#,
    )
    .bind(company_id)
    .fetch_all(pool)
    .await
    .map_err(AnalyticsError::upstream("Failed to load company members"))?;

    let absences = sqlx::query_as::<_, Absence>(
        r#"
        SELECT a.user_id, a.start_date, a.end_date, a.status
        FROM absences a
        JOIN company_members cm ON cm.user_id = a.user_id
        WHERE cm.company_id = ?
        AND a.status = 'approved'
        AND a.end_date >= ?
        ORDER BY a.start_date
        "#,
    )
    .bind(company_id)
    .bind(since.date_naive())
    .fetch_all(pool)
    .await
    .map_err(AnalyticsError::upstream("Failed to load absences"))?;

    let events = into_events(rows);
    debug!(company_id, events = events.len(), absences = absences.len(), "Company activity loaded");

    Ok(CompanyActivity {
        company_id: company_id.to_string(),
        employee_names: names
            .into_iter()
            .filter_map(|(id, name)| name.map(|n| (id, n)))
            .collect(),
        events,
        absences,
    })
}

/// Trailing history of one employee within one company.
pub async fn load_employee_history(
    pool: &MySqlPool,
    employee_id: &str,
    company_id: &str,
    since: DateTime<Utc>,
) -> Result<EmployeeHistory, AnalyticsError> {
    let name = sqlx::query_scalar::<_, Option<String>>("SELECT full_name FROM profiles WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool)
        .await
        .map_err(AnalyticsError::upstream("Failed to load employee profile"))?
        .flatten();

    let rows = sqlx::query_as::<_, TimeEventRow>(
        r#"
        SELECT id, user_id, event_type, event_time, latitude, longitude
        FROM time_events
        WHERE user_id = ?
        AND company_id = ?
        AND event_time >= ?
        ORDER BY event_time, id
        "#,
    )
    .bind(employee_id)
    .bind(company_id)
    .bind(since)
    .fetch_all(pool)
    .await
    .map_err(AnalyticsError::upstream("Failed to load time events"))?;

    let sessions = sqlx::query_as::<_, WorkSession>(
        r#"
        SELECT user_id, clock_in_time, clock_out_time, total_pause_duration
        FROM work_sessions
        WHERE user_id = ?
        AND clock_in_time >= ?
        ORDER BY clock_in_time
        "#,
    )
    .bind(employee_id)
    .bind(since)
    .fetch_all(pool)
    .await
    .map_err(AnalyticsError::upstream("Failed to load work sessions"))?;

    let absences = sqlx::query_as::<_, Absence>(
        r#"
        SELECT user_id, start_date, end_date, status
        FROM absences
        WHERE user_id = ?
        AND status = 'approved'
        AND end_date >= ?
        ORDER BY start_date
        "#,
    )
    .bind(employee_id)
    .bind(since.date_naive())
    .fetch_all(pool)
    .await
    .map_err(AnalyticsError::upstream("Failed to load absences"))?;

    let shifts = sqlx::query_as::<_, ScheduledShift>(&format!(
        "SELECT {SHIFT_COLUMNS} FROM scheduled_shifts WHERE user_id = ? AND date >= ? ORDER BY date"
    ))
    .bind(employee_id)
    .bind(since.date_naive())
    .fetch_all(pool)
    .await
    .map_err(AnalyticsError::upstream("Failed to load scheduled shifts"))?;

    let incidents = sqlx::query_as::<_, Incident>(
        r#"
        SELECT user_id, status, created_at
        FROM incidents
        WHERE user_id = ?
        AND created_at >= ?
        "#,
    )
    .bind(employee_id)
    .bind(since)
    .fetch_all(pool)
    .await
    .map_err(AnalyticsError::upstream("Failed to load incidents"))?;

    Ok(EmployeeHistory {
        employee_id: employee_id.to_string(),
        employee_name: name.unwrap_or_else(|| employee_id.to_string()),
        events: into_events(rows),
        sessions,
        absences,
        shifts,
        incidents,
    })
}
