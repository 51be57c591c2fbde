//! PostgREST query builder.

/// Sort direction for `order=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// A table query: column selection, row filters, ordering and a limit.
///
/// Filters are kept in insertion order so the generated URL is stable.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    table: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<(String, Direction)>,
    limit: Option<usize>,
}

impl Query {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            select: None,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Restrict the returned columns. Embedded resources such as
    /// `page:page_id(slug)` are passed through untouched.
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = Some(columns.into());
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn neq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("neq.{}", value.to_string())));
        self
    }

    pub fn is_null(mut self, column: &str) -> Self {
        self.filters.push((column.to_string(), "is.null".to_string()));
        self
    }

    /// `column=in.("a","b")`. Values are quoted so commas and parentheses
    /// inside them do not break the list.
    pub fn in_list<I, S>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let quoted: Vec<String> = values
            .into_iter()
            .map(|v| format!("\"{}\"", v.as_ref().replace('\\', "\\\\").replace('"', "\\\"")))
            .collect();
        self.filters
            .push((column.to_string(), format!("in.({})", quoted.join(","))));
        self
    }

    /// Add a sort key. Multiple calls produce `order=a.asc,b.desc`.
    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order.push((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Only the row filters, for update and delete requests.
    pub fn filter_params(&self) -> Vec<(String, String)> {
        self.filters.clone()
    }

    /// Full parameter list for a read.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 3);
        if let Some(select) = &self.select {
            params.push(("select".to_string(), select.clone()));
        }
        params.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|(column, direction)| format!("{}.{}", column, direction.as_str()))
                .collect::<Vec<_>>()
                .join(",");
            params.push(("order".to_string(), order));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(params: &[(String, String)]) -> Vec<(&str, &str)> {
        params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn test_navigation_query() {
        let q = Query::table("pages")
            .select("id,title,title_native,slug,parent_id,order,only_for_admin")
            .eq("only_for_admin", false)
            .order("order", Direction::Asc);

        assert_eq!(q.table_name(), "pages");
        assert_eq!(
            pairs(&q.to_params()),
            vec![
                ("select", "id,title,title_native,slug,parent_id,order,only_for_admin"),
                ("only_for_admin", "eq.false"),
                ("order", "order.asc"),
            ]
        );
    }

    #[test]
    fn test_multiple_order_keys_and_limit() {
        let q = Query::table("pages")
            .is_null("parent_id")
            .order("order", Direction::Asc)
            .order("created_at", Direction::Desc)
            .limit(1);
        assert_eq!(
            pairs(&q.to_params()),
            vec![
                ("parent_id", "is.null"),
                ("order", "order.asc,created_at.desc"),
                ("limit", "1"),
            ]
        );
    }

    #[test]
    fn test_in_list_quotes_values() {
        let q = Query::table("pages").in_list("id", ["a", "b,c", "d\"e"]);
        assert_eq!(
            pairs(&q.filter_params()),
            vec![("id", r#"in.("a","b,c","d\"e")"#)]
        );
    }

    #[test]
    fn test_neq_and_filters_only() {
        let q = Query::table("sections")
            .eq("page_id", "p1")
            .neq("id", "s1")
            .order("order", Direction::Desc);
        assert!(q.has_filters());
        assert_eq!(
            pairs(&q.filter_params()),
            vec![("page_id", "eq.p1"), ("id", "neq.s1")]
        );
    }

    #[test]
    fn test_empty_query_has_no_params() {
        let q = Query::table("portfolio_content");
        assert!(!q.has_filters());
        assert!(q.to_params().is_empty());
    }
}
