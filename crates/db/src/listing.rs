//! Shared list-query plumbing: raw query parameters, their resolved form,
//! the paginated result envelope, and a dynamic WHERE builder with typed
//! bind values.

use medtour_core::cpt::ContentType;
use medtour_core::error::CoreError;
use medtour_core::listing::{clamp_limit, clamp_offset, parse_order, search_pattern, SortOrder};
use medtour_core::status::{validate_content_status, validate_submission_status};
use medtour_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{FromRow, PgPool, Postgres};

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Listing query parameters as sent by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Validated listing parameters for one content type.
#[derive(Debug, Clone)]
pub struct ListParams {
    /// ILIKE pattern, already escaped.
    pub search: Option<String>,
    /// Columns the search pattern is matched against.
    pub search_columns: &'static [&'static str],
    pub status: Option<String>,
    /// Whitelisted sort column.
    pub sort: &'static str,
    pub order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

impl ListParams {
    /// Validate `query` against the Listing configuration of `ct`.
    pub fn resolve(ct: ContentType, query: &ListQuery) -> Result<Self, CoreError> {
        let listing = ct.listing();
        let status = query
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let status = match ct {
            ContentType::Submission => {
                validate_submission_status(status)?;
                status
            }
            ContentType::Media | ContentType::User => None,
            _ => {
                validate_content_status(status)?;
                status
            }
        };
        Ok(Self {
            search: search_pattern(query.q.as_deref()),
            search_columns: listing.search_columns,
            status: status.map(str::to_string),
            sort: ct.resolve_sort(query.sort.as_deref())?,
            order: parse_order(query.order.as_deref(), listing.default_order)?,
            limit: clamp_limit(query.limit),
            offset: clamp_offset(query.offset),
        })
    }

    /// Same as [`ListParams::resolve`] but pinned to published rows.
    pub fn resolve_published(ct: ContentType, query: &ListQuery) -> Result<Self, CoreError> {
        let mut params = Self::resolve(ct, query)?;
        params.status = Some(medtour_core::status::STATUS_PUBLISHED.to_string());
        Ok(params)
    }

    /// `ORDER BY` body for a table aliased as `t`; `id` breaks ties.
    pub fn order_by(&self) -> String {
        let dir = self.order.as_sql();
        format!("t.{} {dir} NULLS LAST, t.id {dir}", self.sort)
    }
}

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter builder
// ---------------------------------------------------------------------------

/// A typed value bound to a numbered placeholder.
#[derive(Debug, Clone)]
pub enum BindValue {
    BigInt(i64),
    SmallInt(i16),
    Text(String),
    Timestamp(Timestamp),
}

/// Accumulates `AND`-joined conditions and their bind values.
///
/// Conditions are written with `{}` where the placeholder goes; the builder
/// substitutes `$n` in bind order.
#[derive(Debug, Default)]
pub struct ListFilter {
    conditions: Vec<String>,
    binds: Vec<BindValue>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a filter with the common status and free-text search conditions.
    pub fn from_params(params: &ListParams) -> Self {
        let mut filter = Self::new();
        filter.eq_text("t.status", params.status.as_deref());
        filter.search(params.search_columns, params.search.as_deref());
        filter
    }

    /// Add a condition with a single bound value.
    pub fn push(&mut self, template: &str, value: BindValue) {
        let placeholder = format!("${}", self.binds.len() + 1);
        self.conditions.push(template.replace("{}", &placeholder));
        self.binds.push(value);
    }

    /// Add a condition that needs no bound value.
    pub fn condition(&mut self, sql: impl Into<String>) {
        self.conditions.push(sql.into());
    }

    pub fn eq_id(&mut self, column: &str, value: Option<i64>) {
        if let Some(v) = value {
            self.push(&format!("{column} = {{}}"), BindValue::BigInt(v));
        }
    }

    pub fn eq_text(&mut self, column: &str, value: Option<&str>) {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.push(&format!("{column} = {{}}"), BindValue::Text(v.to_string()));
        }
    }

    /// Case-insensitive equality on a text column.
    pub fn eq_text_ci(&mut self, column: &str, value: Option<&str>) {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.push(
                &format!("LOWER({column}) = LOWER({{}})"),
                BindValue::Text(v.to_string()),
            );
        }
    }

    /// `pattern` must already be an escaped ILIKE pattern.
    pub fn search(&mut self, columns: &[&str], pattern: Option<&str>) {
        let Some(pattern) = pattern else { return };
        if columns.is_empty() {
            return;
        }
        let clause = columns
            .iter()
            .map(|c| format!("t.{c} ILIKE {{}}"))
            .collect::<Vec<_>>()
            .join(" OR ");
        self.push(&format!("({clause})"), BindValue::Text(pattern.to_string()));
    }

    pub fn since(&mut self, column: &str, value: Option<Timestamp>) {
        if let Some(v) = value {
            self.push(&format!("{column} >= {{}}"), BindValue::Timestamp(v));
        }
    }

    pub fn until(&mut self, column: &str, value: Option<Timestamp>) {
        if let Some(v) = value {
            self.push(&format!("{column} <= {{}}"), BindValue::Timestamp(v));
        }
    }

    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Index of the next free placeholder.
    pub fn next_idx(&self) -> usize {
        self.binds.len() + 1
    }

    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }
}

/// Bind filter values to a `query_as`.
pub fn bind_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments> {
    for val in values {
        q = match val {
            BindValue::BigInt(v) => q.bind(*v),
            BindValue::SmallInt(v) => q.bind(*v),
            BindValue::Text(v) => q.bind(v.as_str()),
            BindValue::Timestamp(v) => q.bind(*v),
        };
    }
    q
}

/// Bind filter values to a `query_scalar` returning a count.
pub fn bind_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, Postgres, i64, PgArguments>,
    values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, Postgres, i64, PgArguments> {
    for val in values {
        q = match val {
            BindValue::BigInt(v) => q.bind(*v),
            BindValue::SmallInt(v) => q.bind(*v),
            BindValue::Text(v) => q.bind(v.as_str()),
            BindValue::Timestamp(v) => q.bind(*v),
        };
    }
    q
}

/// Run the page query and the matching count for `FROM {from}`.
///
/// `from` must alias the main table as `t`.
pub async fn fetch_page<T>(
    pool: &PgPool,
    columns: &str,
    from: &str,
    filter: &ListFilter,
    order_by: &str,
    limit: i64,
    offset: i64,
) -> Result<Page<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let where_clause = filter.where_clause();
    let idx = filter.next_idx();

    let query = format!(
        "SELECT {columns} FROM {from} {where_clause} \
         ORDER BY {order_by} LIMIT ${idx} OFFSET ${}",
        idx + 1
    );
    let items = bind_values(sqlx::query_as::<_, T>(&query), filter.binds())
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let count_query = format!("SELECT COUNT(*)::BIGINT FROM {from} {where_clause}");
    let total = bind_values_scalar(sqlx::query_scalar::<_, i64>(&count_query), filter.binds())
        .fetch_one(pool)
        .await?;

    Ok(Page {
        items,
        total,
        limit,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_follow_bind_order() {
        let mut f = ListFilter::new();
        f.eq_text("t.status", Some("published"));
        f.eq_id("t.specialty_id", None);
        f.eq_id("t.specialty_id", Some(4));
        f.search(&["name", "summary"], Some("%knee%"));
        assert_eq!(
            f.where_clause(),
            "WHERE t.status = $1 AND t.specialty_id = $2 AND (t.name ILIKE $3 OR t.summary ILIKE $3)"
        );
        assert_eq!(f.next_idx(), 4);
    }

    #[test]
    fn empty_filter_has_no_where() {
        let mut f = ListFilter::new();
        f.eq_text("t.status", Some("  "));
        assert_eq!(f.where_clause(), "");
        assert_eq!(f.next_idx(), 1);
    }

    #[test]
    fn resolve_rejects_bad_status_and_sort() {
        let bad_status = ListQuery {
            status: Some("live".into()),
            ..Default::default()
        };
        assert!(ListParams::resolve(ContentType::Hospital, &bad_status).is_err());

        let bad_sort = ListQuery {
            sort: Some("password_hash".into()),
            ..Default::default()
        };
        assert!(ListParams::resolve(ContentType::Hospital, &bad_sort).is_err());
    }

    #[test]
    fn resolve_applies_defaults() {
        let params = ListParams::resolve(ContentType::Treatment, &ListQuery::default()).unwrap();
        assert_eq!(params.sort, "updated_at");
        assert_eq!(params.order, SortOrder::Desc);
        assert_eq!(params.limit, 50);
        assert_eq!(params.order_by(), "t.updated_at DESC NULLS LAST, t.id DESC");
    }

    #[test]
    fn published_pin_overrides_status() {
        let q = ListQuery {
            status: Some("draft".into()),
            ..Default::default()
        };
        let params = ListParams::resolve_published(ContentType::Doctor, &q).unwrap();
        assert_eq!(params.status.as_deref(), Some("published"));
    }

    #[test]
    fn search_uses_registry_columns() {
        let q = ListQuery {
            q: Some("knee".into()),
            ..Default::default()
        };
        let params = ListParams::resolve(ContentType::Doctor, &q).unwrap();
        assert_eq!(params.search_columns, ContentType::Doctor.listing().search_columns);
        assert_eq!(
            ListFilter::from_params(&params).where_clause(),
            "WHERE (t.name ILIKE $1 OR t.title ILIKE $1 OR t.qualifications ILIKE $1)"
        );
    }
}
