use crate::feedback::{SessionLogEntry, validate_session_entry};
use crate::outdoor::{OutdoorSessionEntry, validate_outdoor_entry};
use crate::LogbookError;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

/// Validate and append a session feedback entry.
pub async fn append_feedback(
    pool: &SqlitePool,
    entry: &SessionLogEntry,
) -> Result<(), LogbookError> {
    let errors = validate_session_entry(entry);
    if !errors.is_empty() {
        return Err(LogbookError::InvalidEntry(errors));
    }
    sqlx::query(
        "INSERT INTO feedback_log (date, session_id, entry, created_at)
         VALUES (?1, ?2, ?3, datetime('now'))",
    )
    .bind(entry.date.to_string())
    .bind(&entry.session_id)
    .bind(serde_json::to_string(entry)?)
    .execute(pool)
    .await?;
    Ok(())
}

/// Feedback entries with `since <= date <= until`, oldest first.
pub async fn load_feedback_range(
    pool: &SqlitePool,
    since: NaiveDate,
    until: NaiveDate,
) -> Result<Vec<SessionLogEntry>, LogbookError> {
    let rows = sqlx::query(
        "SELECT entry FROM feedback_log WHERE date >= ?1 AND date <= ?2 ORDER BY date, id",
    )
    .bind(since.to_string())
    .bind(until.to_string())
    .fetch_all(pool)
    .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let raw: String = row.get("entry");
        entries.push(serde_json::from_str(&raw)?);
    }
    Ok(entries)
}

/// Validate and append an outdoor session entry.
pub async fn append_outdoor(
    pool: &SqlitePool,
    entry: &OutdoorSessionEntry,
) -> Result<(), LogbookError> {
    let errors = validate_outdoor_entry(entry);
    if !errors.is_empty() {
        return Err(LogbookError::InvalidEntry(errors));
    }
    sqlx::query(
        "INSERT INTO outdoor_log (date, spot_name, discipline, duration_minutes, entry, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))",
    )
    .bind(entry.date.to_string())
    .bind(&entry.spot_name)
    .bind(&entry.discipline)
    .bind(entry.duration_minutes)
    .bind(serde_json::to_string(entry)?)
    .execute(pool)
    .await?;
    Ok(())
}

/// Outdoor entries with `date >= since` (all of them when `since` is
/// None), oldest first.
pub async fn load_outdoor(
    pool: &SqlitePool,
    since: Option<NaiveDate>,
) -> Result<Vec<OutdoorSessionEntry>, LogbookError> {
    let since = since.map(|d| d.to_string()).unwrap_or_default();
    let rows = sqlx::query("SELECT entry FROM outdoor_log WHERE date >= ?1 ORDER BY date, id")
        .bind(since)
        .fetch_all(pool)
        .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let raw: String = row.get("entry");
        entries.push(serde_json::from_str(&raw)?);
    }
    Ok(entries)
}
