//! # Deletion Policies
//!
//! What happens to dependents when a catalog record is deleted.
//!
//! ```text
//! ┌──────────────────────────┬──────────────────────────────────────────────┐
//! │ CategoryDeletePolicy     │                                              │
//! │   Detach (default)       │ products keep existing, category_id = NULL   │
//! │   Reject                 │ refuse while any product references it       │
//! ├──────────────────────────┼──────────────────────────────────────────────┤
//! │ ProductDeletePolicy      │                                              │
//! │   Cascade (default)      │ stock row and movements go with the product  │
//! │   RetainHistory          │ refuse while the product has movements       │
//! └──────────────────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Both defaults keep the ledger invariant trivially: either the whole
//! product ledger disappears or none of it does.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryDeletePolicy {
    #[default]
    Detach,
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductDeletePolicy {
    #[default]
    Cascade,
    RetainHistory,
}

/// The pair of policies the catalog manager runs with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPolicy {
    #[serde(default)]
    pub category_delete: CategoryDeletePolicy,
    #[serde(default)]
    pub product_delete: ProductDeletePolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = CatalogPolicy::default();
        assert_eq!(policy.category_delete, CategoryDeletePolicy::Detach);
        assert_eq!(policy.product_delete, ProductDeletePolicy::Cascade);
    }

    #[test]
    fn test_config_spelling() {
        let policy: ProductDeletePolicy = serde_json::from_str("\"retain_history\"").unwrap();
        assert_eq!(policy, ProductDeletePolicy::RetainHistory);
        let policy: CategoryDeletePolicy = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(policy, CategoryDeletePolicy::Reject);
    }
}
