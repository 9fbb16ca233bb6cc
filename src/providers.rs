//! Provider store: CRUD, filtered search with pagination, and the
//! summary/stat aggregates.
//!
//! Search builds a conjunction of predicates from whichever filter fields
//! were supplied — absent or empty fields contribute nothing. The total is
//! always counted over the same predicate set before pagination, so
//! page/limit never change it. Ordering is fixed: creation timestamp
//! descending (id descending as tiebreak within one second).

use chrono::NaiveDateTime;
use rusqlite::{params, params_from_iter, Connection, Row};

use crate::db::{DatabaseError, Predicates};
use crate::models::{
    page_offset, Provider, ProviderDraft, ProviderFilter, ProviderStats, ProviderSummary,
};
use crate::CoreError;

/// Fixed owner label stamped on every summary payload.
const SUMMARY_TYPE: &str = "Government";

const PROVIDER_COLUMNS: &str = "p.id, p.provider_code, p.title_local, p.name_local, p.title_en, \
     p.name_en, p.provider_type, p.register_status, p.business_type, p.bed_size, \
     p.eligibility_method, p.province, p.region, p.country, p.tax_id, p.wh_tax_percent, \
     p.exempt_percent, p.opening_time, p.provider_status, p.building_no, p.village_no, p.road, \
     p.sub_district, p.district, p.post_code, p.general_phone_no, p.direct_phone_no, p.email, \
     p.payment_method, p.payee_name, p.bank_account_number, p.bank_account_type, \
     p.bank_branch_name, p.bank_name, p.is_tpa_network, p.has_incident, p.discount_categories, \
     p.pricing_categories, p.created_at, p.updated_at, p.created_by, p.updated_by";

fn provider_from_row(row: &Row) -> rusqlite::Result<Provider> {
    Ok(Provider {
        id: row.get(0)?,
        provider_code: row.get(1)?,
        title_local: row.get(2)?,
        name_local: row.get(3)?,
        title_en: row.get(4)?,
        name_en: row.get(5)?,
        provider_type: row.get(6)?,
        register_status: row.get(7)?,
        business_type: row.get(8)?,
        bed_size: row.get(9)?,
        eligibility_method: row.get(10)?,
        province: row.get(11)?,
        region: row.get(12)?,
        country: row.get(13)?,
        tax_id: row.get(14)?,
        wh_tax_percent: row.get(15)?,
        exempt_percent: row.get(16)?,
        opening_time: row.get(17)?,
        provider_status: row.get(18)?,
        building_no: row.get(19)?,
        village_no: row.get(20)?,
        road: row.get(21)?,
        sub_district: row.get(22)?,
        district: row.get(23)?,
        post_code: row.get(24)?,
        general_phone_no: row.get(25)?,
        direct_phone_no: row.get(26)?,
        email: row.get(27)?,
        payment_method: row.get(28)?,
        payee_name: row.get(29)?,
        bank_account_number: row.get(30)?,
        bank_account_type: row.get(31)?,
        bank_branch_name: row.get(32)?,
        bank_name: row.get(33)?,
        is_tpa_network: row.get(34)?,
        has_incident: row.get(35)?,
        discount_categories: string_list(row.get(36)?),
        pricing_categories: string_list(row.get(37)?),
        created_at: row.get::<_, NaiveDateTime>(38)?,
        updated_at: row.get::<_, NaiveDateTime>(39)?,
        created_by: row.get(40)?,
        updated_by: row.get(41)?,
    })
}

fn string_list(raw: String) -> Vec<String> {
    serde_json::from_str(&raw).unwrap_or_default()
}

fn json_text(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// Build the predicate set shared by search, count and summary.
fn filter_predicates(filter: &ProviderFilter) -> Predicates {
    let mut preds = Predicates::new();

    if let Some(name) = filter.provider_name.as_deref().filter(|s| !s.is_empty()) {
        let i = preds.bind(format!("%{}%", name.to_lowercase()));
        preds.push(format!(
            "(LOWER(p.name_local) LIKE ?{i} OR LOWER(p.name_en) LIKE ?{i})"
        ));
    }

    if let Some(province) = filter.province_name.as_deref().filter(|s| !s.is_empty()) {
        let i = preds.bind(format!("%{}%", province.to_lowercase()));
        preds.push(format!("LOWER(p.province) LIKE ?{i}"));
    }

    if let Some(ptype) = filter.provider_type.as_deref().filter(|s| !s.is_empty()) {
        let i = preds.bind(ptype.to_string());
        preds.push(format!("p.provider_type = ?{i}"));
    }

    if let Some(btype) = filter.business_type.as_deref().filter(|s| !s.is_empty()) {
        let i = preds.bind(btype.to_string());
        preds.push(format!("p.business_type = ?{i}"));
    }

    if let Some(tpa) = filter.is_tpa_network {
        let i = preds.bind(tpa);
        preds.push(format!("p.is_tpa_network = ?{i}"));
    }

    if let Some(from) = filter.created_from {
        let i = preds.bind(from.format("%Y-%m-%d").to_string());
        preds.push(format!("p.created_at >= ?{i}"));
    }

    // Inclusive upper bound: extend to the end of the given day.
    if let Some(to) = filter.created_to {
        let i = preds.bind(format!("{} 23:59:59", to.format("%Y-%m-%d")));
        preds.push(format!("p.created_at <= ?{i}"));
    }

    preds
}

/// Filtered, paginated search. Returns the page of rows plus the total
/// match count across all pages.
pub fn search(
    conn: &Connection,
    filter: &ProviderFilter,
) -> Result<(Vec<Provider>, i64), DatabaseError> {
    let mut preds = filter_predicates(filter);

    let count_sql = format!("SELECT COUNT(*) FROM providers p WHERE 1=1{}", preds.clause());
    let total: i64 = conn.query_row(&count_sql, params_from_iter(preds.params()), |row| {
        row.get(0)
    })?;

    let limit = filter.limit();
    let offset = page_offset(filter.page(), limit);
    let clause = preds.clause();
    let li = preds.bind(limit as i64);
    let oi = preds.bind(offset);
    let sql = format!(
        "SELECT {PROVIDER_COLUMNS} FROM providers p WHERE 1=1{clause} \
         ORDER BY p.created_at DESC, p.id DESC LIMIT ?{li} OFFSET ?{oi}"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(preds.params()), provider_from_row)?;
    let providers = rows.collect::<rusqlite::Result<Vec<_>>>()?;

    Ok((providers, total))
}

/// Conditional-count aggregate over the same predicate set as [`search`].
/// Never paginates.
pub fn summary(
    conn: &Connection,
    filter: &ProviderFilter,
) -> Result<ProviderSummary, DatabaseError> {
    let preds = filter_predicates(filter);
    let sql = format!(
        "SELECT \
            COUNT(CASE WHEN p.provider_type = 'Hospital' THEN 1 END), \
            COUNT(CASE WHEN p.provider_type = 'Clinic' THEN 1 END), \
            COUNT(*) \
         FROM providers p WHERE 1=1{}",
        preds.clause()
    );

    let (hospital, clinic, grand_total) =
        conn.query_row(&sql, params_from_iter(preds.params()), |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?;

    Ok(ProviderSummary {
        summary_type: SUMMARY_TYPE.to_string(),
        hospital,
        clinic,
        grand_total,
        province: filter
            .province_name
            .clone()
            .filter(|s| !s.is_empty()),
    })
}

pub fn get(conn: &Connection, id: i64) -> Result<Provider, DatabaseError> {
    let sql = format!("SELECT {PROVIDER_COLUMNS} FROM providers p WHERE p.id = ?1");
    match conn.query_row(&sql, params![id], provider_from_row) {
        Ok(provider) => Ok(provider),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(DatabaseError::not_found("provider", id)),
        Err(e) => Err(e.into()),
    }
}

fn validate_draft(draft: &ProviderDraft) -> Result<(), crate::models::ValidationError> {
    use crate::models::ValidationError;

    if draft.name_local.trim().is_empty() {
        return Err(ValidationError::MissingField { field: "name_local" });
    }
    if draft.provider_type.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: "provider_type",
        });
    }
    if draft.province.trim().is_empty() {
        return Err(ValidationError::MissingField { field: "province" });
    }
    Ok(())
}

pub fn create(
    conn: &Connection,
    provider_code: &str,
    draft: &ProviderDraft,
    created_by: &str,
) -> Result<Provider, CoreError> {
    if provider_code.trim().is_empty() {
        return Err(crate::models::ValidationError::MissingField {
            field: "provider_code",
        }
        .into());
    }
    validate_draft(draft)?;

    let status = draft
        .provider_status
        .clone()
        .unwrap_or_else(|| "Active".to_string());

    conn.execute(
        "INSERT INTO providers (
            provider_code, title_local, name_local, title_en, name_en, provider_type,
            register_status, business_type, bed_size, eligibility_method, province,
            region, country, tax_id, wh_tax_percent, exempt_percent, opening_time,
            provider_status, building_no, village_no, road, sub_district, district,
            post_code, general_phone_no, direct_phone_no, email, payment_method,
            payee_name, bank_account_number, bank_account_type, bank_branch_name,
            bank_name, is_tpa_network, has_incident, discount_categories,
            pricing_categories, created_by
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
            ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30,
            ?31, ?32, ?33, ?34, ?35, ?36, ?37, ?38
        )",
        params![
            provider_code,
            draft.title_local,
            draft.name_local,
            draft.title_en,
            draft.name_en,
            draft.provider_type,
            draft.register_status,
            draft.business_type,
            draft.bed_size,
            draft.eligibility_method,
            draft.province,
            draft.region,
            draft.country,
            draft.tax_id,
            draft.wh_tax_percent,
            draft.exempt_percent,
            draft.opening_time,
            status,
            draft.building_no,
            draft.village_no,
            draft.road,
            draft.sub_district,
            draft.district,
            draft.post_code,
            draft.general_phone_no,
            draft.direct_phone_no,
            draft.email,
            draft.payment_method,
            draft.payee_name,
            draft.bank_account_number,
            draft.bank_account_type,
            draft.bank_branch_name,
            draft.bank_name,
            draft.is_tpa_network,
            draft.has_incident,
            json_text(&draft.discount_categories),
            json_text(&draft.pricing_categories),
            created_by,
        ],
    )
    .map_err(DatabaseError::from_sqlite)?;

    let id = conn.last_insert_rowid();
    Ok(get(conn, id)?)
}

/// Full overwrite of the editable attribute set. The business code is
/// fixed at creation and never changes here.
pub fn update(
    conn: &Connection,
    id: i64,
    draft: &ProviderDraft,
    updated_by: &str,
) -> Result<Provider, CoreError> {
    validate_draft(draft)?;

    let status = draft
        .provider_status
        .clone()
        .unwrap_or_else(|| "Active".to_string());

    let affected = conn
        .execute(
            "UPDATE providers SET
                title_local = ?1, name_local = ?2, title_en = ?3, name_en = ?4,
                provider_type = ?5, register_status = ?6, business_type = ?7,
                bed_size = ?8, eligibility_method = ?9, province = ?10, region = ?11,
                country = ?12, tax_id = ?13, wh_tax_percent = ?14, exempt_percent = ?15,
                opening_time = ?16, provider_status = ?17, building_no = ?18,
                village_no = ?19, road = ?20, sub_district = ?21, district = ?22,
                post_code = ?23, general_phone_no = ?24, direct_phone_no = ?25,
                email = ?26, payment_method = ?27, payee_name = ?28,
                bank_account_number = ?29, bank_account_type = ?30,
                bank_branch_name = ?31, bank_name = ?32, is_tpa_network = ?33,
                has_incident = ?34, discount_categories = ?35, pricing_categories = ?36,
                updated_by = ?37, updated_at = datetime('now')
             WHERE id = ?38",
            params![
                draft.title_local,
                draft.name_local,
                draft.title_en,
                draft.name_en,
                draft.provider_type,
                draft.register_status,
                draft.business_type,
                draft.bed_size,
                draft.eligibility_method,
                draft.province,
                draft.region,
                draft.country,
                draft.tax_id,
                draft.wh_tax_percent,
                draft.exempt_percent,
                draft.opening_time,
                status,
                draft.building_no,
                draft.village_no,
                draft.road,
                draft.sub_district,
                draft.district,
                draft.post_code,
                draft.general_phone_no,
                draft.direct_phone_no,
                draft.email,
                draft.payment_method,
                draft.payee_name,
                draft.bank_account_number,
                draft.bank_account_type,
                draft.bank_branch_name,
                draft.bank_name,
                draft.is_tpa_network,
                draft.has_incident,
                json_text(&draft.discount_categories),
                json_text(&draft.pricing_categories),
                updated_by,
                id,
            ],
        )
        .map_err(DatabaseError::from_sqlite)?;

    if affected == 0 {
        return Err(DatabaseError::not_found("provider", id).into());
    }

    Ok(get(conn, id)?)
}

/// Hard delete — providers carry no soft-delete flag.
pub fn delete(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let affected = conn.execute("DELETE FROM providers WHERE id = ?1", params![id])?;
    if affected == 0 {
        return Err(DatabaseError::not_found("provider", id));
    }
    Ok(())
}

pub fn list_provinces(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT province FROM providers WHERE province IS NOT NULL ORDER BY province",
    )?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn list_provider_types(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT provider_type FROM providers WHERE provider_type IS NOT NULL \
         ORDER BY provider_type",
    )?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn stats(conn: &Connection) -> Result<ProviderStats, DatabaseError> {
    conn.query_row(
        "SELECT \
            COUNT(*), \
            COUNT(CASE WHEN provider_type = 'Hospital' THEN 1 END), \
            COUNT(CASE WHEN provider_type = 'Clinic' THEN 1 END), \
            COUNT(CASE WHEN is_tpa_network = 1 THEN 1 END), \
            COUNT(CASE WHEN provider_status = 'Active' THEN 1 END), \
            COUNT(CASE WHEN provider_status = 'Inactive' THEN 1 END) \
         FROM providers",
        [],
        |row| {
            Ok(ProviderStats {
                total_providers: row.get(0)?,
                total_hospitals: row.get(1)?,
                total_clinics: row.get(2)?,
                tpa_network_providers: row.get(3)?,
                active_providers: row.get(4)?,
                inactive_providers: row.get(5)?,
            })
        },
    )
    .map_err(DatabaseError::from)
}
