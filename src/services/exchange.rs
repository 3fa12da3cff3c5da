//! Exchange service: whole-database JSON backup and restore

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::exchange::{
        CollectionImport, ExportDocument, ImportAction, ImportReport, EXPORT_VERSION,
    },
    repository::{Repository, PEOPLE, SALES, SHOWS},
};

/// `haletix_backup_2026-10-18_10-00-00.json`
pub fn backup_file_name(now: DateTime<Utc>) -> String {
    format!("haletix_backup_{}.json", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Outcome of reading one collection out of an import document
enum Parsed<T> {
    Records(Vec<T>),
    Missing,
    Malformed(String),
}

fn parse_collection<T: DeserializeOwned>(doc: &Value, name: &str) -> Parsed<T> {
    match doc.get(name) {
        None | Some(Value::Null) => Parsed::Missing,
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| T::deserialize(item))
            .collect::<Result<Vec<T>, _>>()
            .map(Parsed::Records)
            .unwrap_or_else(|e| Parsed::Malformed(format!("{}: {}", name, e))),
        Some(_) => Parsed::Malformed(format!("{}: expected an array", name)),
    }
}

#[derive(Clone)]
pub struct ExchangeService {
    repository: Repository,
}

impl ExchangeService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Shows, people and sales as one document. The waitlist is not exported.
    pub async fn export(&self, now: DateTime<Utc>) -> ExportDocument {
        let snapshot = self.repository.snapshot().await;
        ExportDocument {
            shows: snapshot.shows,
            people: snapshot.people,
            sales: snapshot.sales,
            export_date: now,
            version: EXPORT_VERSION.to_string(),
        }
    }

    /// Restore from an exported document.
    ///
    /// Invalid JSON changes nothing. Otherwise every collection present as an
    /// array of valid records replaces the stored one; the others are left
    /// alone and listed in the report.
    pub async fn import(&self, body: &[u8]) -> AppResult<ImportReport> {
        let doc: Value = serde_json::from_slice(body)
            .map_err(|e| AppError::Import(format!("Invalid JSON file: {}", e)))?;
        if !doc.is_object() {
            return Err(AppError::Import("Expected a JSON object".to_string()));
        }

        let mut report = ImportReport {
            collections: Vec::new(),
            warnings: Vec::new(),
        };

        let _gate = self.repository.write_gate().await;
        let shows = parse_collection(&doc, SHOWS);
        let people = parse_collection(&doc, PEOPLE);
        let sales = parse_collection(&doc, SALES);

        let count = match shows {
            Parsed::Records(records) => Some(self.repository.shows.replace_all(records).await?.len()),
            other => report.skip(SHOWS, other),
        };
        report.record(SHOWS, count);

        let count = match people {
            Parsed::Records(records) => Some(self.repository.people.replace_all(records).await?.len()),
            other => report.skip(PEOPLE, other),
        };
        report.record(PEOPLE, count);

        let count = match sales {
            Parsed::Records(records) => Some(self.repository.sales.replace_all(records).await?.len()),
            other => report.skip(SALES, other),
        };
        report.record(SALES, count);

        tracing::info!(
            "Import finished: shows={:?} people={:?} sales={:?}",
            report.replaced(SHOWS),
            report.replaced(PEOPLE),
            report.replaced(SALES)
        );
        for warning in &report.warnings {
            tracing::warn!("Import skipped {}", warning);
        }
        Ok(report)
    }
}

impl ImportReport {
    /// Note a skipped collection; always returns `None`
    fn skip<T>(&mut self, name: &str, parsed: Parsed<T>) -> Option<usize> {
        let action = match parsed {
            Parsed::Malformed(reason) => {
                self.warnings.push(reason);
                ImportAction::Malformed
            }
            _ => ImportAction::Missing,
        };
        self.collections.push(CollectionImport {
            collection: name.to_string(),
            action,
            count: 0,
        });
        None
    }

    fn record(&mut self, name: &str, replaced: Option<usize>) {
        if let Some(count) = replaced {
            self.collections.push(CollectionImport {
                collection: name.to_string(),
                action: ImportAction::Replaced,
                count,
            });
        }
    }
}
