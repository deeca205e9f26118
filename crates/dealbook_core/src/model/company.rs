//! Company records and their read-time projections.

use serde::{Deserialize, Serialize};

/// Integer identity assigned by the company store.
pub type CompanyId = i64;

/// Company record as held by the company store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    /// Serialized as `company_name` to match the external schema.
    #[serde(rename = "company_name")]
    pub name: String,
}

impl Company {
    pub fn new(id: CompanyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Projects this record with an explicit liked flag.
    pub fn with_liked(self, liked: bool) -> CompanyView {
        CompanyView {
            id: self.id,
            name: self.name,
            liked,
        }
    }
}

/// Enriched company projection `{id, company_name, liked}`.
///
/// Computed per request; correct relative to the membership index at the
/// moment of the read and not beyond it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyView {
    pub id: CompanyId,
    #[serde(rename = "company_name")]
    pub name: String,
    pub liked: bool,
}

/// Company list envelope with the total independent of paging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyBatch {
    pub companies: Vec<CompanyView>,
    pub total: u64,
}
