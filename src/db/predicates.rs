//! Dynamic WHERE-clause construction for filtered queries.
//!
//! Filter endpoints build a conjunction of predicates from whichever
//! filter fields the caller supplied. Conditions reference parameters by
//! 1-based index (`?1`, `?2`, …) so one bound value can appear in more
//! than one column comparison.

use rusqlite::types::ToSql;

/// An accumulating set of AND-ed SQL conditions with positional parameters.
///
/// ```
/// use provider_report::db::Predicates;
///
/// let mut preds = Predicates::new();
/// let idx = preds.bind("Hospital".to_string());
/// preds.push(format!("p.provider_type = ?{idx}"));
/// assert_eq!(preds.clause(), " AND p.provider_type = ?1");
/// ```
#[derive(Default)]
pub struct Predicates {
    conditions: Vec<String>,
    params: Vec<Box<dyn ToSql>>,
}

impl Predicates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a parameter value and return its 1-based placeholder index.
    pub fn bind(&mut self, value: impl ToSql + 'static) -> usize {
        self.params.push(Box::new(value));
        self.params.len()
    }

    /// Add a condition. The condition references previously bound
    /// parameters by `?N` placeholder.
    pub fn push(&mut self, condition: impl Into<String>) {
        self.conditions.push(condition.into());
    }

    /// Render the conditions as an ` AND …` suffix for a `WHERE 1=1`
    /// base query. Empty when no filters were supplied.
    pub fn clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" AND {}", self.conditions.join(" AND "))
        }
    }

    /// Parameters in bind order, for `rusqlite::params_from_iter`.
    pub fn params(&self) -> impl Iterator<Item = &dyn ToSql> {
        self.params.iter().map(|p| p.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_renders_nothing() {
        let preds = Predicates::new();
        assert_eq!(preds.clause(), "");
        assert!(preds.is_empty());
        assert_eq!(preds.params().count(), 0);
    }

    #[test]
    fn conditions_join_with_and() {
        let mut preds = Predicates::new();
        let i = preds.bind("Hospital".to_string());
        preds.push(format!("p.provider_type = ?{i}"));
        let j = preds.bind(true);
        preds.push(format!("p.is_tpa_network = ?{j}"));

        assert_eq!(
            preds.clause(),
            " AND p.provider_type = ?1 AND p.is_tpa_network = ?2"
        );
        assert_eq!(preds.params().count(), 2);
    }

    #[test]
    fn one_bind_can_back_two_column_comparisons() {
        let mut preds = Predicates::new();
        let i = preds.bind("%bangkok%".to_string());
        preds.push(format!(
            "(LOWER(p.name_local) LIKE ?{i} OR LOWER(p.name_en) LIKE ?{i})"
        ));

        assert_eq!(
            preds.clause(),
            " AND (LOWER(p.name_local) LIKE ?1 OR LOWER(p.name_en) LIKE ?1)"
        );
        assert_eq!(preds.params().count(), 1);
    }

    #[test]
    fn predicates_execute_against_sqlite() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (a TEXT, b INTEGER);
             INSERT INTO t VALUES ('x', 1), ('y', 2), ('x', 3);",
        )
        .unwrap();

        let mut preds = Predicates::new();
        let i = preds.bind("x".to_string());
        preds.push(format!("a = ?{i}"));
        let j = preds.bind(2i64);
        preds.push(format!("b < ?{j}"));

        let sql = format!("SELECT COUNT(*) FROM t WHERE 1=1{}", preds.clause());
        let count: i64 = conn
            .query_row(
                &sql,
                rusqlite::params_from_iter(preds.params()),
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
