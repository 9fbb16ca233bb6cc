//! Field registry: the catalogue of exportable/selectable provider
//! attributes that templates and exports refer to by `field_code`.
//!
//! Two resolution modes exist on purpose and must stay asymmetric:
//! `validate` is strict and reports every unknown or inactive code
//! (template creation), while `resolve_for_export` is lenient and drops
//! them silently (a stale template must still export its valid columns).

use std::collections::HashSet;
use std::str::FromStr;

use rusqlite::{params, params_from_iter, Connection, Row};

use crate::db::DatabaseError;
use crate::models::{
    AvailableField, FieldCategory, FieldDraft, FieldType, FieldValidation, ValidationError,
};
use crate::CoreError;

const FIELD_COLUMNS: &str = "id, field_code, field_name_local, field_name_en, field_type, \
     field_category, data_source, format_example, is_required, is_active, sort_order, \
     description";

struct FieldRow {
    id: i64,
    field_code: String,
    field_name_local: String,
    field_name_en: String,
    field_type: String,
    field_category: String,
    data_source: Option<String>,
    format_example: Option<String>,
    is_required: bool,
    is_active: bool,
    sort_order: i64,
    description: Option<String>,
}

fn read_field(row: &Row) -> rusqlite::Result<FieldRow> {
    Ok(FieldRow {
        id: row.get(0)?,
        field_code: row.get(1)?,
        field_name_local: row.get(2)?,
        field_name_en: row.get(3)?,
        field_type: row.get(4)?,
        field_category: row.get(5)?,
        data_source: row.get(6)?,
        format_example: row.get(7)?,
        is_required: row.get(8)?,
        is_active: row.get(9)?,
        sort_order: row.get(10)?,
        description: row.get(11)?,
    })
}

fn field_from_row(row: FieldRow) -> Result<AvailableField, DatabaseError> {
    Ok(AvailableField {
        id: row.id,
        field_code: row.field_code,
        field_name_local: row.field_name_local,
        field_name_en: row.field_name_en,
        field_type: FieldType::from_str(&row.field_type)?,
        field_category: FieldCategory::from_str(&row.field_category)?,
        data_source: row.data_source,
        format_example: row.format_example,
        is_required: row.is_required,
        is_active: row.is_active,
        sort_order: row.sort_order,
        description: row.description,
    })
}

fn collect_fields(
    stmt: &mut rusqlite::Statement<'_>,
    params: impl rusqlite::Params,
) -> Result<Vec<AvailableField>, DatabaseError> {
    let rows = stmt.query_map(params, read_field)?;
    let mut fields = Vec::new();
    for row in rows {
        fields.push(field_from_row(row?)?);
    }
    Ok(fields)
}

/// All active registry entries, grouped by category then sort order.
pub fn list_active(conn: &Connection) -> Result<Vec<AvailableField>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {FIELD_COLUMNS} FROM available_fields WHERE is_active = 1 \
         ORDER BY field_category, sort_order"
    ))?;
    collect_fields(&mut stmt, [])
}

/// Active entries in one category, by sort order. Category strings are
/// validated at the API boundary; an empty result is not an error.
pub fn list_by_category(
    conn: &Connection,
    category: FieldCategory,
) -> Result<Vec<AvailableField>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {FIELD_COLUMNS} FROM available_fields \
         WHERE field_category = ?1 AND is_active = 1 ORDER BY sort_order"
    ))?;
    collect_fields(&mut stmt, params![category.as_str()])
}

pub fn list_required(conn: &Connection) -> Result<Vec<AvailableField>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {FIELD_COLUMNS} FROM available_fields \
         WHERE is_required = 1 AND is_active = 1 ORDER BY field_category, sort_order"
    ))?;
    collect_fields(&mut stmt, [])
}

pub fn list_by_type(
    conn: &Connection,
    field_type: FieldType,
) -> Result<Vec<AvailableField>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {FIELD_COLUMNS} FROM available_fields \
         WHERE field_type = ?1 AND is_active = 1 ORDER BY field_category, sort_order"
    ))?;
    collect_fields(&mut stmt, params![field_type.as_str()])
}

/// Distinct categories that currently have active entries.
pub fn list_categories(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT field_category FROM available_fields WHERE is_active = 1 \
         ORDER BY field_category",
    )?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn get(conn: &Connection, id: i64) -> Result<AvailableField, DatabaseError> {
    let sql = format!("SELECT {FIELD_COLUMNS} FROM available_fields WHERE id = ?1");
    match conn.query_row(&sql, params![id], read_field) {
        Ok(row) => field_from_row(row),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(DatabaseError::not_found("field", id)),
        Err(e) => Err(e.into()),
    }
}

pub fn get_by_code(
    conn: &Connection,
    field_code: &str,
) -> Result<Option<AvailableField>, DatabaseError> {
    let sql = format!(
        "SELECT {FIELD_COLUMNS} FROM available_fields WHERE field_code = ?1 AND is_active = 1"
    );
    match conn.query_row(&sql, params![field_code], read_field) {
        Ok(row) => Ok(Some(field_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Strict check: one verdict per input code, in input order. Duplicates
/// are each evaluated on their own — callers see exactly what they sent.
pub fn validate(
    conn: &Connection,
    field_codes: &[String],
) -> Result<Vec<FieldValidation>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT field_code FROM available_fields WHERE is_active = 1")?;
    let active: HashSet<String> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<_>>()?;

    Ok(field_codes
        .iter()
        .map(|code| {
            if active.contains(code) {
                FieldValidation {
                    field_code: code.clone(),
                    is_valid: true,
                    message: Some("Field is valid".to_string()),
                }
            } else {
                FieldValidation {
                    field_code: code.clone(),
                    is_valid: false,
                    message: Some("Field code not found or inactive".to_string()),
                }
            }
        })
        .collect())
}

/// Lenient resolution for export: unknown and inactive codes are dropped
/// without error, and the survivors come back grouped by
/// (category, sort_order) — the column order every renderer uses.
pub fn resolve_for_export(
    conn: &Connection,
    field_codes: &[String],
) -> Result<Vec<AvailableField>, DatabaseError> {
    if field_codes.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = (1..=field_codes.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(",");
    let sql = format!(
        "SELECT {FIELD_COLUMNS} FROM available_fields \
         WHERE field_code IN ({placeholders}) AND is_active = 1 \
         ORDER BY field_category, sort_order"
    );

    let mut stmt = conn.prepare(&sql)?;
    collect_fields(&mut stmt, params_from_iter(field_codes.iter()))
}

pub fn create(conn: &Connection, draft: &FieldDraft) -> Result<AvailableField, CoreError> {
    let code = draft
        .field_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or(ValidationError::MissingField {
            field: "field_code",
        })?;
    let (field_type, category) = parse_type_and_category(draft)?;

    conn.execute(
        "INSERT INTO available_fields (
            field_code, field_name_local, field_name_en, field_type, field_category,
            data_source, format_example, is_required, is_active, sort_order, description
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            code,
            draft.field_name_local,
            draft.field_name_en,
            field_type.as_str(),
            category.as_str(),
            draft.data_source,
            draft.format_example,
            draft.is_required,
            draft.is_active,
            draft.sort_order,
            draft.description,
        ],
    )
    .map_err(DatabaseError::from_sqlite)?;

    Ok(get(conn, conn.last_insert_rowid())?)
}

pub fn update(
    conn: &Connection,
    id: i64,
    draft: &FieldDraft,
) -> Result<AvailableField, CoreError> {
    let (field_type, category) = parse_type_and_category(draft)?;

    let affected = conn
        .execute(
            "UPDATE available_fields SET
                field_name_local = ?1, field_name_en = ?2, field_type = ?3,
                field_category = ?4, data_source = ?5, format_example = ?6,
                is_required = ?7, is_active = ?8, sort_order = ?9, description = ?10
             WHERE id = ?11",
            params![
                draft.field_name_local,
                draft.field_name_en,
                field_type.as_str(),
                category.as_str(),
                draft.data_source,
                draft.format_example,
                draft.is_required,
                draft.is_active,
                draft.sort_order,
                draft.description,
                id,
            ],
        )
        .map_err(DatabaseError::from_sqlite)?;

    if affected == 0 {
        return Err(DatabaseError::not_found("field", id).into());
    }
    Ok(get(conn, id)?)
}

/// Registry entries referenced by stored templates are never hard-deleted;
/// deactivation removes them from validation and listing only.
pub fn deactivate(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE available_fields SET is_active = 0 WHERE id = ?1",
        params![id],
    )?;
    if affected == 0 {
        return Err(DatabaseError::not_found("field", id));
    }
    Ok(())
}

fn parse_type_and_category(
    draft: &FieldDraft,
) -> Result<(FieldType, FieldCategory), ValidationError> {
    let field_type = FieldType::from_str(&draft.field_type)
        .map_err(|_| ValidationError::InvalidFieldType(draft.field_type.clone()))?;
    let category = FieldCategory::from_str(&draft.field_category)
        .map_err(|_| ValidationError::InvalidCategory(draft.field_category.clone()))?;
    Ok((field_type, category))
}
