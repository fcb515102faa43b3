//! HTTP DTOs for risk register endpoints.

use serde::Deserialize;

use crate::domain::risk::{RiskFilter, RiskStatus};

/// Query parameters for listing risks. Empty values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListRisksQuery {
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<RiskStatus>,
}

impl From<ListRisksQuery> for RiskFilter {
    fn from(query: ListRisksQuery) -> Self {
        RiskFilter {
            department: query.department.filter(|d| !d.is_empty()),
            category: query.category.filter(|c| !c.is_empty()),
            status: query.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_values_match_everything() {
        let query = ListRisksQuery {
            department: Some(String::new()),
            category: Some("Financial".to_string()),
            status: None,
        };

        let filter = RiskFilter::from(query);

        assert_eq!(filter.department, None);
        assert_eq!(filter.category.as_deref(), Some("Financial"));
    }

    #[test]
    fn status_parses_from_display_name() {
        let query: ListRisksQuery = serde_json::from_str(r#"{"status": "Controlled"}"#).unwrap();
        assert_eq!(query.status, Some(RiskStatus::Controlled));
    }
}
