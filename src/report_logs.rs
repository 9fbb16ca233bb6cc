//! Sent-report log: an append-only trail of report-send attempts.
//!
//! Rows are written once per attempt, may have their status corrected
//! afterwards, and are never deleted.

use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, params_from_iter, Connection, Row};

use crate::db::{DatabaseError, Predicates};
use crate::models::{
    page_offset, LogDraft, LogFilter, SendStatus, SentReportLog, ValidationError,
};
use crate::CoreError;

const LOG_COLUMNS: &str = "l.id, l.template_id, l.schedule_id, l.recipients, l.subject, \
     l.file_name, l.file_size_kb, l.export_format, l.total_records, l.sent_at, l.status, \
     l.error_message, l.retry_count, l.execution_time_ms, t.template_name, s.schedule_name";

const LOG_FROM: &str = "FROM sent_report_logs l \
     LEFT JOIN templates t ON l.template_id = t.id \
     LEFT JOIN schedules s ON l.schedule_id = s.id";

fn log_from_row(row: &Row) -> rusqlite::Result<SentReportLog> {
    let status: String = row.get(10)?;
    Ok(SentReportLog {
        id: row.get(0)?,
        template_id: row.get(1)?,
        schedule_id: row.get(2)?,
        recipients: row.get(3)?,
        subject: row.get(4)?,
        file_name: row.get(5)?,
        file_size_kb: row.get(6)?,
        export_format: row.get(7)?,
        total_records: row.get(8)?,
        sent_at: row.get::<_, NaiveDateTime>(9)?,
        status: SendStatus::from_str(&status).unwrap_or(SendStatus::Pending),
        error_message: row.get(11)?,
        retry_count: row.get(12)?,
        execution_time_ms: row.get(13)?,
        template_name: row.get(14)?,
        schedule_name: row.get(15)?,
    })
}

fn filter_predicates(filter: &LogFilter) -> Predicates {
    let mut preds = Predicates::new();

    if let Some(template_id) = filter.template_id {
        let i = preds.bind(template_id);
        preds.push(format!("l.template_id = ?{i}"));
    }
    if let Some(schedule_id) = filter.schedule_id {
        let i = preds.bind(schedule_id);
        preds.push(format!("l.schedule_id = ?{i}"));
    }
    if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
        let i = preds.bind(status.to_string());
        preds.push(format!("l.status = ?{i}"));
    }
    if let Some(from) = filter.date_from {
        let i = preds.bind(from.format("%Y-%m-%d").to_string());
        preds.push(format!("l.sent_at >= ?{i}"));
    }
    if let Some(to) = filter.date_to {
        let i = preds.bind(format!("{} 23:59:59", to.format("%Y-%m-%d")));
        preds.push(format!("l.sent_at <= ?{i}"));
    }

    preds
}

/// Filtered, paginated listing; the total is counted before pagination.
pub fn search(
    conn: &Connection,
    filter: &LogFilter,
) -> Result<(Vec<SentReportLog>, i64), DatabaseError> {
    let mut preds = filter_predicates(filter);

    let count_sql = format!(
        "SELECT COUNT(*) FROM sent_report_logs l WHERE 1=1{}",
        preds.clause()
    );
    let total: i64 = conn.query_row(&count_sql, params_from_iter(preds.params()), |row| {
        row.get(0)
    })?;

    let limit = filter.limit();
    let offset = page_offset(filter.page(), limit);
    let clause = preds.clause();
    let li = preds.bind(limit as i64);
    let oi = preds.bind(offset);
    let sql = format!(
        "SELECT {LOG_COLUMNS} {LOG_FROM} WHERE 1=1{clause} \
         ORDER BY l.sent_at DESC, l.id DESC LIMIT ?{li} OFFSET ?{oi}"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(preds.params()), log_from_row)?;
    let logs = rows.collect::<rusqlite::Result<Vec<_>>>()?;

    Ok((logs, total))
}

pub fn get(conn: &Connection, id: i64) -> Result<SentReportLog, DatabaseError> {
    let sql = format!("SELECT {LOG_COLUMNS} {LOG_FROM} WHERE l.id = ?1");
    match conn.query_row(&sql, params![id], log_from_row) {
        Ok(log) => Ok(log),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(DatabaseError::not_found("sent report log", id))
        }
        Err(e) => Err(e.into()),
    }
}

/// Record one send attempt.
pub fn create(conn: &Connection, draft: &LogDraft) -> Result<SentReportLog, CoreError> {
    let status = SendStatus::from_str(&draft.status)
        .map_err(|_| ValidationError::InvalidStatus(draft.status.clone()))?;
    if draft.recipients.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: "recipients",
        }
        .into());
    }

    conn.execute(
        "INSERT INTO sent_report_logs (
            template_id, schedule_id, recipients, subject, file_name, file_size_kb,
            export_format, total_records, status, error_message, retry_count,
            execution_time_ms
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            draft.template_id,
            draft.schedule_id,
            draft.recipients,
            draft.subject,
            draft.file_name,
            draft.file_size_kb,
            draft.export_format,
            draft.total_records,
            status.as_str(),
            draft.error_message,
            draft.retry_count,
            draft.execution_time_ms,
        ],
    )
    .map_err(DatabaseError::from_sqlite)?;

    Ok(get(conn, conn.last_insert_rowid())?)
}

/// Correct the status of a recorded attempt after the fact.
pub fn update_status(
    conn: &Connection,
    id: i64,
    status: SendStatus,
    error_message: Option<&str>,
) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE sent_report_logs SET status = ?2, error_message = ?3 WHERE id = ?1",
        params![id, status.as_str(), error_message],
    )?;
    if affected == 0 {
        return Err(DatabaseError::not_found("sent report log", id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::models::TemplateDraft;
    use crate::templates;

    fn seed_template(conn: &Connection) -> i64 {
        let draft = TemplateDraft {
            template_name: "Log fixture".to_string(),
            is_standard: false,
            description: None,
            header_fields: Vec::new(),
            data_fields: vec!["provider_code".to_string()],
            summary_fields: Vec::new(),
            field_positions: None,
        };
        templates::create(conn, &draft, "tests").unwrap().id
    }

    fn log_draft(template_id: i64, status: &str) -> LogDraft {
        LogDraft {
            template_id,
            schedule_id: None,
            recipients: "ops@example.com".to_string(),
            subject: Some("Provider report".to_string()),
            file_name: Some("provider_report_20240315_080000.xlsx".to_string()),
            file_size_kb: Some(42),
            export_format: Some("excel".to_string()),
            total_records: Some(120),
            status: status.to_string(),
            error_message: None,
            retry_count: 0,
            execution_time_ms: Some(350),
        }
    }

    #[test]
    fn create_and_get_round_trip() {
        let conn = open_memory_database().unwrap();
        let template_id = seed_template(&conn);

        let created = create(&conn, &log_draft(template_id, "success")).unwrap();
        let fetched = get(&conn, created.id).unwrap();

        assert_eq!(fetched.status, SendStatus::Success);
        assert_eq!(fetched.total_records, Some(120));
        assert_eq!(fetched.template_name.as_deref(), Some("Log fixture"));
        assert!(fetched.schedule_name.is_none());
    }

    #[test]
    fn create_rejects_unknown_status() {
        let conn = open_memory_database().unwrap();
        let template_id = seed_template(&conn);

        let err = create(&conn, &log_draft(template_id, "maybe")).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidStatus(_))
        ));
    }

    #[test]
    fn search_filters_by_status_and_template() {
        let conn = open_memory_database().unwrap();
        let template_id = seed_template(&conn);
        create(&conn, &log_draft(template_id, "success")).unwrap();
        create(&conn, &log_draft(template_id, "failed")).unwrap();
        create(&conn, &log_draft(template_id, "failed")).unwrap();

        let filter = LogFilter {
            status: Some("failed".to_string()),
            ..Default::default()
        };
        let (logs, total) = search(&conn, &filter).unwrap();
        assert_eq!(total, 2);
        assert!(logs.iter().all(|l| l.status == SendStatus::Failed));

        let filter = LogFilter {
            template_id: Some(template_id + 1),
            ..Default::default()
        };
        let (_, total) = search(&conn, &filter).unwrap();
        assert_eq!(total, 0);
    }

    #[test]
    fn pagination_keeps_total_stable() {
        let conn = open_memory_database().unwrap();
        let template_id = seed_template(&conn);
        for _ in 0..15 {
            create(&conn, &log_draft(template_id, "success")).unwrap();
        }

        let filter = LogFilter {
            page: Some(2),
            limit: Some(10),
            ..Default::default()
        };
        let (logs, total) = search(&conn, &filter).unwrap();
        assert_eq!(total, 15);
        assert_eq!(logs.len(), 5);
    }

    #[test]
    fn status_can_be_corrected_later() {
        let conn = open_memory_database().unwrap();
        let template_id = seed_template(&conn);
        let created = create(&conn, &log_draft(template_id, "pending")).unwrap();

        update_status(&conn, created.id, SendStatus::Failed, Some("SMTP timeout")).unwrap();
        let fetched = get(&conn, created.id).unwrap();
        assert_eq!(fetched.status, SendStatus::Failed);
        assert_eq!(fetched.error_message.as_deref(), Some("SMTP timeout"));

        assert!(matches!(
            update_status(&conn, 999, SendStatus::Failed, None),
            Err(DatabaseError::NotFound { .. })
        ));
    }
}
