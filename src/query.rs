//! SQL for the two query modes.
//!
//! Values reach PostgreSQL only as positional parameters. A placeholder is
//! allocated at the moment its clause is appended, so `$n` always names the
//! n-th bound value. The sort direction is the only text interpolated, and it
//! comes from [`SortOrder`].

use bytes::BytesMut;
use postgres_types::{IsNull, ToSql, Type};

use crate::error::ApiError;
use crate::models::search::{SearchRequest, SortOrder};

pub const BLOG_POST_TABLE: &str = "blog_page.blog_post";

/// The query issued when the request carries no query-string parameters.
pub const LATEST_POSTS_SQL: &str = "SELECT * FROM blog_page.blog_post ORDER BY id DESC LIMIT 5";

/// A value bound to one placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    BigInt(i64),
}

impl ToSql for SqlParam {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            SqlParam::Text(value) => value.to_sql(ty, out),
            SqlParam::BigInt(value) => value.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        <String as ToSql>::accepts(ty) || <i64 as ToSql>::accepts(ty)
    }

    // Dispatch per variant so a text value is never written into an int8 slot.
    fn to_sql_checked(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            SqlParam::Text(value) => value.to_sql_checked(ty, out),
            SqlParam::BigInt(value) => value.to_sql_checked(ty, out),
        }
    }
}

/// SQL text plus its parameters, in bind order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    sql: String,
    params: Vec<SqlParam>,
}

impl PostQuery {
    /// Five most recent posts.
    pub fn latest() -> Self {
        PostQuery {
            sql: LATEST_POSTS_SQL.to_string(),
            params: Vec::new(),
        }
    }

    /// Filtered, ordered and paginated search.
    ///
    /// Clauses are appended as searchTerm, searchTags, searchKeywords, ORDER BY,
    /// LIMIT, OFFSET. Fails with [`ApiError::Validation`] if `page` or `limit` is
    /// not a usable integer.
    pub fn search(request: &SearchRequest) -> Result<Self, ApiError> {
        let limit = request.page_size()?;
        let offset = request.offset()?;

        let mut builder = SelectBuilder::new(BLOG_POST_TABLE);

        if let Some(pattern) = request.content_pattern() {
            builder.filter(SqlParam::Text(pattern), |p| format!("content ILIKE {}", p));
        }

        if let Some(ref tag) = request.search_tags {
            builder.filter(SqlParam::Text(tag.clone()), |p| format!("tags @> ARRAY[{}]::text[]", p));
        }

        if let Some(ref keyword) = request.search_keywords {
            builder.filter(SqlParam::Text(keyword.clone()), |p| {
                format!("keywords @> ARRAY[{}]::text[]", p)
            });
        }

        builder.order_by("id", request.sort_order());
        builder.limit(limit);
        builder.offset(offset);

        Ok(builder.build())
    }

    /// Picks the query mode: `None` means the event had no query-string parameters.
    pub fn for_request(request: Option<&SearchRequest>) -> Result<Self, ApiError> {
        match request {
            Some(request) => Self::search(request),
            None => Ok(Self::latest()),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// Parameters in the shape `tokio_postgres::Client::query` expects.
    pub fn bind_params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect()
    }
}

/// Accumulates a `SELECT *` statement clause by clause.
struct SelectBuilder {
    sql: String,
    params: Vec<SqlParam>,
    has_where: bool,
}

impl SelectBuilder {
    fn new(table: &str) -> Self {
        SelectBuilder {
            sql: format!("SELECT * FROM {}", table),
            params: Vec::new(),
            has_where: false,
        }
    }

    /// Binds `value` and returns its placeholder.
    fn bind(&mut self, value: SqlParam) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    /// Appends a predicate; the first one opens `WHERE`, later ones chain with `AND`.
    fn filter(&mut self, value: SqlParam, predicate: impl FnOnce(&str) -> String) {
        let placeholder = self.bind(value);
        let keyword = if self.has_where { "AND" } else { "WHERE" };
        self.has_where = true;
        self.sql.push_str(&format!(" {} {}", keyword, predicate(&placeholder)));
    }

    fn order_by(&mut self, column: &str, order: SortOrder) {
        self.sql.push_str(&format!(" ORDER BY {} {}", column, order.as_sql()));
    }

    fn limit(&mut self, limit: i64) {
        let placeholder = self.bind(SqlParam::BigInt(limit));
        self.sql.push_str(&format!(" LIMIT {}", placeholder));
    }

    fn offset(&mut self, offset: i64) {
        let placeholder = self.bind(SqlParam::BigInt(offset));
        self.sql.push_str(&format!(" OFFSET {}", placeholder));
    }

    fn build(self) -> PostQuery {
        PostQuery {
            sql: self.sql,
            params: self.params,
        }
    }
}
