//! Listing search SQL assembly.
//!
//! A [`ListingFilter`] becomes one predicate with `$n` placeholders and a
//! [`NamedParams`] map holding the values. The same predicate feeds both the
//! page query and the `COUNT(*)` query; only the page query carries
//! `LIMIT`/`OFFSET`. User input only ever travels as a bound parameter.

use sqlx::{Postgres, postgres::PgArguments, query::QueryAs};
use uuid::Uuid;

use crate::{
    models::{Category, ListingStatus},
    schema::{Field, FieldType, account, listing},
};

pub const DEFAULT_PAGE_SIZE: i64 = 12;
pub const MAX_PAGE_SIZE: i64 = 100;
/// Highest page number accepted; keeps `offset` far inside `i64`.
pub const MAX_PAGE: i64 = 1_000_000_000;

/// Columns of a listing row, qualified with the `l` alias.
pub const LISTING_COLUMNS: &str = "l.id, l.owner_id, l.title, l.description, l.category, \
     l.quantity, l.unit, l.location, l.price, l.image_url, l.status, l.created_at";

const LISTING_FROM: &str = "FROM listings l JOIN accounts a ON a.id = l.owner_id";

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    BigInt(i64),
    Uuid(Uuid),
}

impl SqlValue {
    /// Whether this value may be bound to a column of the given type.
    pub fn fits(&self, ty: FieldType) -> bool {
        match self {
            SqlValue::Text(_) => matches!(
                ty,
                FieldType::Text
                    | FieldType::LongText
                    | FieldType::Email
                    | FieldType::Category
                    | FieldType::Status
            ),
            SqlValue::BigInt(_) => false,
            SqlValue::Uuid(_) => ty == FieldType::Uuid,
        }
    }
}

/// Ordered name → value map; a value's position is its `$n` placeholder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedParams {
    entries: Vec<(&'static str, SqlValue)>,
}

impl NamedParams {
    /// Returns the placeholder for `name`, adding the value on first use.
    pub fn bind(&mut self, name: &'static str, value: SqlValue) -> String {
        if let Some(pos) = self.entries.iter().position(|(n, _)| *n == name) {
            debug_assert_eq!(self.entries[pos].1, value, "parameter {name} bound twice");
            return format!("${}", pos + 1);
        }
        self.entries.push((name, value));
        format!("${}", self.entries.len())
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binds every value, in placeholder order.
    pub fn bind_to<'q, O>(
        &'q self,
        mut query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for (_, value) in &self.entries {
            query = match value {
                SqlValue::Text(v) => query.bind(v.as_str()),
                SqlValue::BigInt(v) => query.bind(*v),
                SqlValue::Uuid(v) => query.bind(*v),
            };
        }
        query
    }
}

/// Page number (from 1) and page size, already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Search criteria; `None` imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub owner: Option<Uuid>,
    pub category: Option<Category>,
    pub status: Option<ListingStatus>,
    pub search: Option<String>,
    pub location: Option<String>,
}

impl ListingFilter {
    /// Public marketplace search: an omitted status means "available".
    pub fn marketplace(
        category: Option<Category>,
        status: Option<ListingStatus>,
        search: Option<String>,
        location: Option<String>,
    ) -> Self {
        Self {
            owner: None,
            category,
            status: Some(status.unwrap_or_default()),
            search: non_blank(search),
            location: non_blank(location),
        }
    }

    /// Every listing of one owner, whatever its status.
    pub fn owned_by(owner: Uuid) -> Self {
        Self {
            owner: Some(owner),
            ..Self::default()
        }
    }

    /// AND of every present criterion, plus the parameters it references.
    pub fn predicate(&self) -> Predicate {
        let mut params = NamedParams::default();
        let mut clauses: Vec<String> = Vec::new();

        if let Some(owner) = self.owner {
            clauses.push(equals(&mut params, "l", &listing::OWNER_ID, SqlValue::Uuid(owner)));
        }
        if let Some(category) = self.category {
            clauses.push(equals(
                &mut params,
                "l",
                &listing::CATEGORY,
                SqlValue::Text(category.as_str().to_string()),
            ));
        }
        if let Some(status) = self.status {
            clauses.push(equals(
                &mut params,
                "l",
                &listing::STATUS,
                SqlValue::Text(status.as_str().to_string()),
            ));
        }
        if let Some(search) = &self.search {
            clauses.push(contains_any(
                &mut params,
                "search",
                &[("l", &listing::TITLE), ("l", &listing::DESCRIPTION)],
                search,
            ));
        }
        if let Some(location) = &self.location {
            clauses.push(contains_any(
                &mut params,
                "location",
                &[("l", &listing::LOCATION), ("a", &account::LOCATION)],
                location,
            ));
        }

        let sql = if clauses.is_empty() {
            "TRUE".to_string()
        } else {
            clauses.join(" AND ")
        };
        Predicate { sql, params }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub sql: String,
    pub params: NamedParams,
}

/// Page query and its mirrored count query.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSearch {
    pub select_sql: String,
    pub select_params: NamedParams,
    pub count_sql: String,
    pub count_params: NamedParams,
    pub page: PageRequest,
}

pub fn build_listing_search(filter: &ListingFilter, page: PageRequest) -> ListingSearch {
    let Predicate { sql, params } = filter.predicate();

    let count_sql = format!("SELECT COUNT(*) {LISTING_FROM} WHERE {sql}");
    let count_params = params.clone();

    let mut select_params = params;
    let limit = select_params.bind("limit", SqlValue::BigInt(page.limit));
    let offset = select_params.bind("offset", SqlValue::BigInt(page.offset()));
    let select_sql = format!(
        "SELECT {LISTING_COLUMNS}, a.company_name, a.location AS user_location \
         {LISTING_FROM} WHERE {sql} \
         ORDER BY l.created_at DESC, l.id DESC LIMIT {limit} OFFSET {offset}"
    );

    ListingSearch {
        select_sql,
        select_params,
        count_sql,
        count_params,
        page,
    }
}

/// Escapes `LIKE` metacharacters and wraps the text for a substring match.
pub fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn equals(params: &mut NamedParams, alias: &str, field: &Field, value: SqlValue) -> String {
    debug_assert!(value.fits(field.ty), "{} bound with wrong type", field.name);
    let placeholder = params.bind(field.name, value);
    format!("{alias}.{} = {placeholder}", field.name)
}

fn contains_any(
    params: &mut NamedParams,
    name: &'static str,
    columns: &[(&str, &Field)],
    text: &str,
) -> String {
    let placeholder = params.bind(name, SqlValue::Text(like_pattern(text)));
    let alternatives: Vec<String> = columns
        .iter()
        .map(|(alias, field)| {
            debug_assert!(
                matches!(field.ty, FieldType::Text | FieldType::LongText),
                "{} is not a text column",
                field.name
            );
            format!("{alias}.{} ILIKE {placeholder} ESCAPE '\\'", field.name)
        })
        .collect();
    format!("({})", alternatives.join(" OR "))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_status_defaults_to_available() {
        let filter = ListingFilter::marketplace(None, None, None, None);
        let predicate = filter.predicate();

        assert_eq!(predicate.sql, "l.status = $1");
        assert_eq!(
            predicate.params.get("status"),
            Some(&SqlValue::Text("available".into()))
        );
    }

    #[test]
    fn explicit_status_replaces_the_default() {
        let filter = ListingFilter::marketplace(None, Some(ListingStatus::Sold), None, None);
        let predicate = filter.predicate();
        assert_eq!(
            predicate.params.get("status"),
            Some(&SqlValue::Text("sold".into()))
        );
        assert_eq!(predicate.params.len(), 1);
    }

    #[test]
    fn filters_are_anded_in_a_fixed_order() {
        let filter = ListingFilter::marketplace(
            Some(Category::Metal),
            None,
            Some("copper".into()),
            Some("Bogotá".into()),
        );
        let predicate = filter.predicate();

        assert_eq!(
            predicate.sql,
            "l.category = $1 AND l.status = $2 \
             AND (l.title ILIKE $3 ESCAPE '\\' OR l.description ILIKE $3 ESCAPE '\\') \
             AND (l.location ILIKE $4 ESCAPE '\\' OR a.location ILIKE $4 ESCAPE '\\')"
        );
        assert_eq!(
            predicate.params.names().collect::<Vec<_>>(),
            vec!["category", "status", "search", "location"]
        );
        assert_eq!(
            predicate.params.get("search"),
            Some(&SqlValue::Text("%copper%".into()))
        );
    }

    #[test]
    fn user_text_never_reaches_the_sql() {
        let hostile = "x' OR 1=1; DROP TABLE accounts; --";
        let filter = ListingFilter::marketplace(None, None, Some(hostile.into()), Some(hostile.into()));
        let search = build_listing_search(&filter, PageRequest::default());

        assert!(!search.select_sql.contains("DROP TABLE"));
        assert!(!search.count_sql.contains("DROP TABLE"));
        assert_eq!(
            search.count_params.get("search"),
            Some(&SqlValue::Text(format!("%{hostile}%")))
        );
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn blank_search_terms_impose_no_constraint() {
        let filter = ListingFilter::marketplace(None, None, Some("   ".into()), Some(String::new()));
        assert_eq!(filter.search, None);
        assert_eq!(filter.location, None);
        assert_eq!(filter.predicate().params.len(), 1);
    }

    #[test]
    fn owner_filter_has_no_status_constraint() {
        let owner = Uuid::new_v4();
        let predicate = ListingFilter::owned_by(owner).predicate();
        assert_eq!(predicate.sql, "l.owner_id = $1");
        assert_eq!(predicate.params.get("owner_id"), Some(&SqlValue::Uuid(owner)));
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert_eq!(ListingFilter::default().predicate().sql, "TRUE");
    }

    #[test]
    fn count_query_mirrors_predicate_without_pagination() {
        let filter = ListingFilter::marketplace(Some(Category::Wood), None, None, None);
        let search = build_listing_search(&filter, PageRequest::new(Some(3), Some(12)));

        assert_eq!(
            search.count_sql,
            "SELECT COUNT(*) FROM listings l JOIN accounts a ON a.id = l.owner_id \
             WHERE l.category = $1 AND l.status = $2"
        );
        assert_eq!(search.count_params.len(), 2);
        assert!(!search.count_sql.contains("LIMIT"));

        assert!(search.select_sql.ends_with("LIMIT $3 OFFSET $4"));
        assert_eq!(search.select_params.get("limit"), Some(&SqlValue::BigInt(12)));
        assert_eq!(search.select_params.get("offset"), Some(&SqlValue::BigInt(24)));
    }

    #[test]
    fn pagination_is_clamped() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, limit: 12 });
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, limit: 1 });
        assert_eq!(PageRequest::new(Some(-4), Some(5000)), PageRequest { page: 1, limit: 100 });
        assert_eq!(PageRequest::new(Some(3), Some(12)).offset(), 24);
    }

    #[test]
    fn huge_page_numbers_are_capped() {
        let page = PageRequest::new(Some(i64::MAX), Some(MAX_PAGE_SIZE));
        assert_eq!(page.page, MAX_PAGE);
        assert_eq!(page.offset(), (MAX_PAGE - 1) * MAX_PAGE_SIZE);

        let search = build_listing_search(&ListingFilter::default(), page);
        assert_eq!(
            search.select_params.get("offset"),
            Some(&SqlValue::BigInt((MAX_PAGE - 1) * MAX_PAGE_SIZE))
        );
    }

    #[test]
    fn repeated_name_reuses_its_placeholder() {
        let mut params = NamedParams::default();
        assert_eq!(params.bind("a", SqlValue::BigInt(1)), "$1");
        assert_eq!(params.bind("b", SqlValue::BigInt(2)), "$2");
        assert_eq!(params.bind("a", SqlValue::BigInt(1)), "$1");
        assert_eq!(params.len(), 2);
    }
}
