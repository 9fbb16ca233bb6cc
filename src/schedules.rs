//! Schedule records: persisted definitions of when and to whom a
//! template-based report goes out.
//!
//! This module manages the records only. Nothing here evaluates the
//! frequency fields or computes `next_run_at`; the manual run-now path
//! stamps `last_run_at` and records a send-log row, and that is the full
//! extent of in-process "execution".

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use rusqlite::{params, Connection, Row};

use crate::db::DatabaseError;
use crate::models::{
    Frequency, LogDraft, RunScheduleOutcome, Schedule, ScheduleDraft, ValidationError,
};
use crate::{report_logs, templates, CoreError};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

const SCHEDULE_COLUMNS: &str = "s.id, s.schedule_name, s.template_id, s.email_to, s.email_cc, \
     s.email_bcc, s.frequency, s.schedule_days, s.start_date, s.end_date, s.start_time, \
     s.timezone, s.is_active, s.last_run_at, s.next_run_at, s.search_criteria, \
     s.export_format, s.created_at, s.updated_at, s.created_by, s.updated_by, t.template_name";

const SCHEDULE_FROM: &str = "FROM schedules s LEFT JOIN templates t ON s.template_id = t.id";

fn schedule_from_row(row: &Row) -> rusqlite::Result<Schedule> {
    let frequency: String = row.get(6)?;
    let criteria: String = row.get(15)?;
    Ok(Schedule {
        id: row.get(0)?,
        schedule_name: row.get(1)?,
        template_id: row.get(2)?,
        email_to: row.get(3)?,
        email_cc: row.get(4)?,
        email_bcc: row.get(5)?,
        frequency: Frequency::from_str(&frequency).unwrap_or(Frequency::Daily),
        schedule_days: string_list(row.get(7)?),
        start_date: row.get(8)?,
        end_date: row.get(9)?,
        start_time: row.get(10)?,
        timezone: row.get(11)?,
        is_active: row.get(12)?,
        last_run_at: row.get::<_, Option<NaiveDateTime>>(13)?,
        next_run_at: row.get::<_, Option<NaiveDateTime>>(14)?,
        search_criteria: serde_json::from_str(&criteria)
            .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new())),
        export_format: row.get(16)?,
        created_at: row.get::<_, NaiveDateTime>(17)?,
        updated_at: row.get::<_, NaiveDateTime>(18)?,
        created_by: row.get(19)?,
        updated_by: row.get(20)?,
        template_name: row.get(21)?,
    })
}

fn string_list(raw: String) -> Vec<String> {
    serde_json::from_str(&raw).unwrap_or_default()
}

fn json_text(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

fn validate_draft(conn: &Connection, draft: &ScheduleDraft) -> Result<Frequency, CoreError> {
    if draft.schedule_name.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: "schedule_name",
        }
        .into());
    }
    let frequency = Frequency::from_str(&draft.frequency)
        .map_err(|_| ValidationError::InvalidFrequency(draft.frequency.clone()))?;
    if !EMAIL_RE.is_match(draft.email_to.trim()) {
        return Err(ValidationError::InvalidEmail(draft.email_to.clone()).into());
    }

    // The template reference must resolve to a live (not soft-deleted)
    // template at every write.
    templates::get(conn, draft.template_id)?;

    Ok(frequency)
}

/// Not-deleted schedules, newest first, template names joined in.
pub fn list(conn: &Connection) -> Result<Vec<Schedule>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SCHEDULE_COLUMNS} {SCHEDULE_FROM} WHERE s.is_deleted = 0 \
         ORDER BY s.created_at DESC, s.id DESC"
    ))?;
    let rows = stmt.query_map([], schedule_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn get(conn: &Connection, id: i64) -> Result<Schedule, DatabaseError> {
    let sql = format!(
        "SELECT {SCHEDULE_COLUMNS} {SCHEDULE_FROM} WHERE s.id = ?1 AND s.is_deleted = 0"
    );
    match conn.query_row(&sql, params![id], schedule_from_row) {
        Ok(schedule) => Ok(schedule),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(DatabaseError::not_found("schedule", id)),
        Err(e) => Err(e.into()),
    }
}

pub fn create(
    conn: &Connection,
    draft: &ScheduleDraft,
    created_by: &str,
) -> Result<Schedule, CoreError> {
    let frequency = validate_draft(conn, draft)?;

    conn.execute(
        "INSERT INTO schedules (
            schedule_name, template_id, email_to, email_cc, email_bcc, frequency,
            schedule_days, start_date, end_date, start_time, timezone, is_active,
            search_criteria, export_format, created_by
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            draft.schedule_name,
            draft.template_id,
            draft.email_to,
            draft.email_cc,
            draft.email_bcc,
            frequency.as_str(),
            json_text(&draft.schedule_days),
            draft.start_date,
            draft.end_date,
            draft.start_time,
            draft.timezone,
            draft.is_active,
            draft.search_criteria.to_string(),
            draft.export_format,
            created_by,
        ],
    )
    .map_err(DatabaseError::from_sqlite)?;

    Ok(get(conn, conn.last_insert_rowid())?)
}

pub fn update(
    conn: &Connection,
    id: i64,
    draft: &ScheduleDraft,
    updated_by: &str,
) -> Result<Schedule, CoreError> {
    get(conn, id)?;
    let frequency = validate_draft(conn, draft)?;

    conn.execute(
        "UPDATE schedules SET
            schedule_name = ?1, template_id = ?2, email_to = ?3, email_cc = ?4,
            email_bcc = ?5, frequency = ?6, schedule_days = ?7, start_date = ?8,
            end_date = ?9, start_time = ?10, timezone = ?11, is_active = ?12,
            search_criteria = ?13, export_format = ?14, updated_by = ?15,
            updated_at = datetime('now')
         WHERE id = ?16 AND is_deleted = 0",
        params![
            draft.schedule_name,
            draft.template_id,
            draft.email_to,
            draft.email_cc,
            draft.email_bcc,
            frequency.as_str(),
            json_text(&draft.schedule_days),
            draft.start_date,
            draft.end_date,
            draft.start_time,
            draft.timezone,
            draft.is_active,
            draft.search_criteria.to_string(),
            draft.export_format,
            updated_by,
            id,
        ],
    )
    .map_err(DatabaseError::from_sqlite)?;

    Ok(get(conn, id)?)
}

pub fn delete(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE schedules SET is_deleted = 1, updated_at = datetime('now') \
         WHERE id = ?1 AND is_deleted = 0",
        params![id],
    )?;
    if affected == 0 {
        return Err(DatabaseError::not_found("schedule", id));
    }
    Ok(())
}

/// Schedules an external runner should consider: active, not deleted,
/// and inside their active window. Ordered by `next_run_at` ascending.
pub fn list_active(conn: &Connection) -> Result<Vec<Schedule>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SCHEDULE_COLUMNS} {SCHEDULE_FROM} \
         WHERE s.is_active = 1 AND s.is_deleted = 0 \
           AND (s.end_date IS NULL OR s.end_date >= date('now')) \
         ORDER BY s.next_run_at ASC"
    ))?;
    let rows = stmt.query_map([], schedule_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Stamp `last_run_at`. `next_run_at` is intentionally left alone — no
/// frequency evaluation happens in this process.
pub fn touch_last_run(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE schedules SET last_run_at = datetime('now'), updated_at = datetime('now') \
         WHERE id = ?1 AND is_deleted = 0",
        params![id],
    )?;
    if affected == 0 {
        return Err(DatabaseError::not_found("schedule", id));
    }
    Ok(())
}

/// Manual run-now: stamps `last_run_at` and records the attempt in the
/// send log. Report generation and mail dispatch stay with the external
/// runner, so the log row is left `pending` with no record count.
pub fn run_now(conn: &Connection, id: i64) -> Result<RunScheduleOutcome, CoreError> {
    let schedule = get(conn, id)?;
    touch_last_run(conn, id)?;

    report_logs::create(
        conn,
        &LogDraft {
            template_id: schedule.template_id,
            schedule_id: Some(schedule.id),
            recipients: schedule.email_to.clone(),
            subject: Some(format!("Scheduled Report: {}", schedule.schedule_name)),
            file_name: None,
            file_size_kb: None,
            export_format: Some(schedule.export_format.clone()),
            total_records: None,
            status: "pending".to_string(),
            error_message: None,
            retry_count: 0,
            execution_time_ms: None,
        },
    )?;

    Ok(RunScheduleOutcome {
        message: "Schedule executed successfully".to_string(),
        executed_at: chrono::Utc::now().naive_utc(),
        recipients: schedule.email_to,
        record_count: 0,
        file_size: "0 KB".to_string(),
        status: "success".to_string(),
    })
}
