//! Report templates: named bundles of field codes grouped into
//! header/data/summary buckets.
//!
//! Create and update validate every referenced code against the field
//! registry before anything is written — an invalid or inactive code
//! aborts the whole operation, so a template row never exists in a
//! half-valid state. Templates are soft-deleted.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};

use crate::db::DatabaseError;
use crate::fields;
use crate::models::{Template, TemplateDraft, ValidationError};
use crate::CoreError;

/// Upper bound on data fields per template, to keep export width sane.
pub const MAX_DATA_FIELDS: usize = 50;

const TEMPLATE_COLUMNS: &str = "id, template_name, is_standard, description, header_fields, \
     data_fields, summary_fields, field_positions, created_at, updated_at, created_by, \
     updated_by";

fn template_from_row(row: &Row) -> rusqlite::Result<Template> {
    Ok(Template {
        id: row.get(0)?,
        template_name: row.get(1)?,
        is_standard: row.get(2)?,
        description: row.get(3)?,
        header_fields: string_list(row.get(4)?),
        data_fields: string_list(row.get(5)?),
        summary_fields: string_list(row.get(6)?),
        field_positions: row.get(7)?,
        created_at: row.get::<_, NaiveDateTime>(8)?,
        updated_at: row.get::<_, NaiveDateTime>(9)?,
        created_by: row.get(10)?,
        updated_by: row.get(11)?,
    })
}

fn string_list(raw: String) -> Vec<String> {
    serde_json::from_str(&raw).unwrap_or_default()
}

fn json_text(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// Validate a template's three field buckets against the registry.
///
/// The buckets are checked concatenated in (header, data, summary) order
/// and the first invalid code fails the whole operation.
pub fn validate_field_codes(
    conn: &Connection,
    header_fields: &[String],
    data_fields: &[String],
    summary_fields: &[String],
) -> Result<(), CoreError> {
    if data_fields.is_empty() {
        return Err(ValidationError::MissingDataFields.into());
    }
    if data_fields.len() > MAX_DATA_FIELDS {
        return Err(ValidationError::TooManyDataFields {
            count: data_fields.len(),
            max: MAX_DATA_FIELDS,
        }
        .into());
    }

    let mut all_codes =
        Vec::with_capacity(header_fields.len() + data_fields.len() + summary_fields.len());
    all_codes.extend_from_slice(header_fields);
    all_codes.extend_from_slice(data_fields);
    all_codes.extend_from_slice(summary_fields);

    for result in fields::validate(conn, &all_codes)? {
        if !result.is_valid {
            return Err(ValidationError::InvalidFieldCode {
                code: result.field_code,
                reason: result
                    .message
                    .unwrap_or_else(|| "unknown field code".to_string()),
            }
            .into());
        }
    }

    Ok(())
}

/// Not-deleted templates, standard ones first, then newest.
pub fn list(conn: &Connection) -> Result<Vec<Template>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TEMPLATE_COLUMNS} FROM templates WHERE is_deleted = 0 \
         ORDER BY is_standard DESC, created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map([], template_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Fetch one template. Soft-deleted templates are indistinguishable from
/// missing ones.
pub fn get(conn: &Connection, id: i64) -> Result<Template, DatabaseError> {
    let sql = format!("SELECT {TEMPLATE_COLUMNS} FROM templates WHERE id = ?1 AND is_deleted = 0");
    match conn.query_row(&sql, params![id], template_from_row) {
        Ok(template) => Ok(template),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(DatabaseError::not_found("template", id)),
        Err(e) => Err(e.into()),
    }
}

pub fn create(
    conn: &Connection,
    draft: &TemplateDraft,
    created_by: &str,
) -> Result<Template, CoreError> {
    if draft.template_name.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: "template_name",
        }
        .into());
    }
    validate_field_codes(
        conn,
        &draft.header_fields,
        &draft.data_fields,
        &draft.summary_fields,
    )?;

    conn.execute(
        "INSERT INTO templates (
            template_name, is_standard, description, header_fields, data_fields,
            summary_fields, field_positions, created_by
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            draft.template_name,
            draft.is_standard,
            draft.description,
            json_text(&draft.header_fields),
            json_text(&draft.data_fields),
            json_text(&draft.summary_fields),
            draft.field_positions,
            created_by,
        ],
    )
    .map_err(DatabaseError::from_sqlite)?;

    Ok(get(conn, conn.last_insert_rowid())?)
}

pub fn update(
    conn: &Connection,
    id: i64,
    draft: &TemplateDraft,
    updated_by: &str,
) -> Result<Template, CoreError> {
    // Resolve first so a missing id reports NotFound, not a validation error.
    get(conn, id)?;

    if draft.template_name.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: "template_name",
        }
        .into());
    }
    validate_field_codes(
        conn,
        &draft.header_fields,
        &draft.data_fields,
        &draft.summary_fields,
    )?;

    conn.execute(
        "UPDATE templates SET
            template_name = ?1, is_standard = ?2, description = ?3, header_fields = ?4,
            data_fields = ?5, summary_fields = ?6, field_positions = ?7,
            updated_by = ?8, updated_at = datetime('now')
         WHERE id = ?9 AND is_deleted = 0",
        params![
            draft.template_name,
            draft.is_standard,
            draft.description,
            json_text(&draft.header_fields),
            json_text(&draft.data_fields),
            json_text(&draft.summary_fields),
            draft.field_positions,
            updated_by,
            id,
        ],
    )
    .map_err(DatabaseError::from_sqlite)?;

    Ok(get(conn, id)?)
}

/// Soft delete: the row stays for sent-report history, but disappears
/// from listing, lookup and schedule references.
pub fn delete(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE templates SET is_deleted = 1, updated_at = datetime('now') \
         WHERE id = ?1 AND is_deleted = 0",
        params![id],
    )?;
    if affected == 0 {
        return Err(DatabaseError::not_found("template", id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn draft(name: &str, data_fields: &[&str]) -> TemplateDraft {
        TemplateDraft {
            template_name: name.to_string(),
            is_standard: false,
            description: None,
            header_fields: Vec::new(),
            data_fields: codes(data_fields),
            summary_fields: Vec::new(),
            field_positions: None,
        }
    }

    #[test]
    fn create_persists_field_lists_in_caller_order() {
        let conn = open_memory_database().unwrap();
        let mut d = draft("Monthly", &["province", "provider_code", "name_local"]);
        d.header_fields = codes(&["report_title", "generated_date"]);
        d.summary_fields = codes(&["total_records"]);

        let created = create(&conn, &d, "tests").unwrap();
        let fetched = get(&conn, created.id).unwrap();

        // Exact order, no dedup, no registry reordering.
        assert_eq!(
            fetched.data_fields,
            vec!["province", "provider_code", "name_local"]
        );
        assert_eq!(fetched.header_fields, vec!["report_title", "generated_date"]);
        assert_eq!(fetched.summary_fields, vec!["total_records"]);
    }

    #[test]
    fn duplicate_codes_survive_the_round_trip() {
        let conn = open_memory_database().unwrap();
        let d = draft("Dup", &["provider_code", "provider_code"]);
        let created = create(&conn, &d, "tests").unwrap();
        assert_eq!(
            get(&conn, created.id).unwrap().data_fields,
            vec!["provider_code", "provider_code"]
        );
    }

    #[test]
    fn unknown_code_aborts_create_without_partial_write() {
        let conn = open_memory_database().unwrap();
        let err = create(&conn, &draft("Bad", &["provider_code", "bogus"]), "tests").unwrap_err();

        match err {
            CoreError::Validation(ValidationError::InvalidFieldCode { code, .. }) => {
                assert_eq!(code, "bogus")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(list(&conn).unwrap().is_empty());
    }

    #[test]
    fn inactive_code_aborts_create() {
        let conn = open_memory_database().unwrap();
        let field = crate::fields::get_by_code(&conn, "email").unwrap().unwrap();
        crate::fields::deactivate(&conn, field.id).unwrap();

        let err = create(&conn, &draft("Stale", &["email"]), "tests").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidFieldCode { .. })
        ));
    }

    #[test]
    fn first_invalid_code_is_reported_in_bucket_order() {
        let conn = open_memory_database().unwrap();
        let mut d = draft("Order", &["also_bad"]);
        d.header_fields = codes(&["first_bad"]);

        let err = create(&conn, &d, "tests").unwrap_err();
        match err {
            CoreError::Validation(ValidationError::InvalidFieldCode { code, .. }) => {
                assert_eq!(code, "first_bad")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn data_fields_must_not_be_empty() {
        let conn = open_memory_database().unwrap();
        let err = create(&conn, &draft("Empty", &[]), "tests").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MissingDataFields)
        ));
    }

    #[test]
    fn data_fields_are_capped() {
        let conn = open_memory_database().unwrap();
        let many: Vec<String> = (0..=MAX_DATA_FIELDS).map(|_| "provider_code".to_string()).collect();
        let mut d = draft("Wide", &[]);
        d.data_fields = many;

        let err = create(&conn, &d, "tests").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::TooManyDataFields { .. })
        ));
    }

    #[test]
    fn update_revalidates_and_overwrites() {
        let conn = open_memory_database().unwrap();
        let created = create(&conn, &draft("V1", &["provider_code"]), "tests").unwrap();

        let err = update(&conn, created.id, &draft("V2", &["bogus"]), "tests").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        // Failed update leaves the stored template untouched.
        assert_eq!(get(&conn, created.id).unwrap().template_name, "V1");

        let updated = update(&conn, created.id, &draft("V2", &["province"]), "editor").unwrap();
        assert_eq!(updated.template_name, "V2");
        assert_eq!(updated.data_fields, vec!["province"]);
        assert_eq!(updated.updated_by.as_deref(), Some("editor"));
    }

    #[test]
    fn soft_deleted_template_is_gone_from_lookup_and_listing() {
        let conn = open_memory_database().unwrap();
        let created = create(&conn, &draft("Gone", &["provider_code"]), "tests").unwrap();

        delete(&conn, created.id).unwrap();
        assert!(matches!(
            get(&conn, created.id),
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(list(&conn).unwrap().is_empty());
        // Double delete reports missing.
        assert!(matches!(
            delete(&conn, created.id),
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[test]
    fn listing_puts_standard_templates_first() {
        let conn = open_memory_database().unwrap();
        create(&conn, &draft("Custom", &["provider_code"]), "tests").unwrap();
        let mut std_draft = draft("Standard", &["provider_code"]);
        std_draft.is_standard = true;
        create(&conn, &std_draft, "tests").unwrap();

        let listed = list(&conn).unwrap();
        assert_eq!(listed[0].template_name, "Standard");
    }
}
