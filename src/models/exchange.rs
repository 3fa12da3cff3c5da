//! Bulk export/import document and import report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{person::Person, sale::Sale, show::Show};

pub const EXPORT_VERSION: &str = "1.0";

/// Full backup document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub shows: Vec<Show>,
    pub people: Vec<Person>,
    pub sales: Vec<Sale>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

/// What happened to one collection during import.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImportAction {
    Replaced,
    /// Field absent or not an array
    Missing,
    /// Array present but its records did not parse
    Malformed,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CollectionImport {
    pub collection: String,
    pub action: ImportAction,
    pub count: usize,
}

/// Report returned after an import
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportReport {
    pub collections: Vec<CollectionImport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ImportReport {
    pub fn replaced(&self, collection: &str) -> Option<usize> {
        self.collections
            .iter()
            .find(|c| c.collection == collection && c.action == ImportAction::Replaced)
            .map(|c| c.count)
    }
}
