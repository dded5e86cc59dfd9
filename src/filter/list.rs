use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use super::error::FilterError;
use super::types::{value_text, SortOrder};
use crate::api::ResourceKind;

/// Facet value that disables the facet
pub const ALL: &str = "all";

/// Client-side search, facet filter and ordering of a collection page
#[derive(Debug, Clone)]
pub struct ListFilter {
    kind: ResourceKind,
    search: String,
    facets: BTreeMap<String, String>,
    order: Option<SortOrder>,
}

impl ListFilter {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            search: String::new(),
            facets: BTreeMap::new(),
            order: None,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn search(&mut self, text: &str) -> &mut Self {
        self.search = text.trim().to_lowercase();
        self
    }

    /// Restrict `field` to `value`; `all` clears the restriction
    pub fn facet(&mut self, field: &str, value: &str) -> Result<&mut Self, FilterError> {
        let field = field.trim();
        if !self.kind.facets().contains(&field) {
            return Err(FilterError::UnknownFacet {
                kind: self.kind.segment().to_string(),
                field: field.to_string(),
                expected: self.kind.facets().join(", "),
            });
        }

        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL) {
            self.facets.remove(field);
        } else {
            self.facets.insert(field.to_string(), value.to_string());
        }
        Ok(self)
    }

    /// Apply a `field=value` pair as typed on the command line
    pub fn assign(&mut self, pair: &str) -> Result<&mut Self, FilterError> {
        let (field, value) = pair
            .split_once('=')
            .ok_or_else(|| FilterError::InvalidAssignment(pair.to_string()))?;
        self.facet(field, value)
    }

    pub fn order(&mut self, spec: &str) -> Result<&mut Self, FilterError> {
        self.order = Some(SortOrder::parse(spec)?);
        Ok(self)
    }

    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || !self.facets.is_empty()
    }

    pub fn matches(&self, item: &Value) -> bool {
        self.matches_search(item) && self.matches_facets(item)
    }

    /// Matching items, in the requested order (or the server's order)
    pub fn apply(&self, items: &[Value]) -> Vec<Value> {
        let mut kept: Vec<Value> = items.iter().filter(|item| self.matches(item)).cloned().collect();
        if let Some(order) = &self.order {
            kept.sort_by(|a, b| order.compare(a, b));
        }
        kept
    }

    fn matches_search(&self, item: &Value) -> bool {
        if self.search.is_empty() {
            return true;
        }
        self.kind.search_fields().iter().any(|field| {
            item.get(*field)
                .and_then(Value::as_str)
                .is_some_and(|text| text.to_lowercase().contains(&self.search))
        })
    }

    fn matches_facets(&self, item: &Value) -> bool {
        self.facets.iter().all(|(field, wanted)| {
            item.get(field)
                .and_then(value_text)
                .is_some_and(|actual| actual.eq_ignore_ascii_case(wanted))
        })
    }
}

/// Distinct non-empty values of `field`, sorted; the choices of a facet drop-down
pub fn facet_values(items: &[Value], field: &str) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.get(field).and_then(value_text))
        .filter(|value| !value.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn files() -> Vec<Value> {
        vec![
            json!({ "id": 1, "name": "Budget.xlsx", "description": "Annual budget", "department": "finance", "file_type": "xlsx" }),
            json!({ "id": 2, "name": "Logo.png", "description": "Club logo", "department": "marketing", "file_type": "png" }),
            json!({ "id": 3, "name": "Minutes.pdf", "description": "Board meeting", "department": "finance", "file_type": "pdf" }),
            json!({ "id": 4, "name": "Notes.txt", "description": null, "department": "", "file_type": "txt" }),
        ]
    }

    fn ids(items: &[Value]) -> Vec<i64> {
        items.iter().filter_map(|item| item["id"].as_i64()).collect()
    }

    #[test]
    fn search_is_case_insensitive_over_search_fields() {
        let mut filter = ListFilter::new(ResourceKind::File);
        filter.search("BUDGET");
        assert_eq!(ids(&filter.apply(&files())), vec![1]);

        filter.search("meeting");
        assert_eq!(ids(&filter.apply(&files())), vec![3]);

        filter.search("  ");
        assert_eq!(filter.apply(&files()).len(), 4);
    }

    #[test]
    fn all_disables_a_facet() {
        let mut filter = ListFilter::new(ResourceKind::File);
        filter.assign("department=finance").unwrap();
        assert_eq!(ids(&filter.apply(&files())), vec![1, 3]);

        filter.facet("file_type", "pdf").unwrap();
        assert_eq!(ids(&filter.apply(&files())), vec![3]);

        filter.facet("file_type", "all").unwrap();
        filter.facet("department", "ALL").unwrap();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&files()).len(), 4);
    }

    #[test]
    fn rejects_unknown_facets() {
        let mut filter = ListFilter::new(ResourceKind::File);
        let err = filter.assign("colour=red").unwrap_err();
        assert!(matches!(err, FilterError::UnknownFacet { .. }));
        assert!(err.to_string().contains("department, file_type"));
        assert_eq!(
            filter.assign("department").unwrap_err(),
            FilterError::InvalidAssignment("department".into())
        );
    }

    #[test]
    fn facets_match_non_string_values() {
        let polls = vec![
            json!({ "id": 1, "question": "A?", "is_active": true }),
            json!({ "id": 2, "question": "B?", "is_active": false }),
        ];
        let mut filter = ListFilter::new(ResourceKind::Poll);
        filter.facet("is_active", "true").unwrap();
        assert_eq!(ids(&filter.apply(&polls)), vec![1]);
    }

    #[test]
    fn orders_results() {
        let mut filter = ListFilter::new(ResourceKind::File);
        filter.order("-name").unwrap();
        assert_eq!(ids(&filter.apply(&files())), vec![4, 3, 2, 1]);

        filter.order("id:asc").unwrap();
        assert_eq!(ids(&filter.apply(&files())), vec![1, 2, 3, 4]);

        assert!(filter.order("name:sideways").is_err());
    }

    #[test]
    fn distinct_facet_values_drop_empties() {
        assert_eq!(facet_values(&files(), "department"), vec!["finance", "marketing"]);
        assert_eq!(facet_values(&files(), "missing"), Vec::<String>::new());
    }
}
