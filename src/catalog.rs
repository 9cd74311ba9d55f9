//! Metrics catalog accessor.
//!
//! The catalog is a `;`-delimited reference table of the metrics the engine
//! computes: identifier, type (value/couple/patch), and the process family
//! the metric applies to (qualitative or quantitative rasters). A copy ships
//! with the crate; callers can load a newer table from disk. Read-only.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const BUNDLED_CATALOG: &str = include_str!("../data/metrics.csv");

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDescriptor {
    pub identifier: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub process: String,
}

/// The loaded table, in file order.
#[derive(Debug, Clone)]
pub struct MetricsCatalog {
    metrics: Vec<MetricDescriptor>,
}

impl MetricsCatalog {
    /// Load a catalog file. Any I/O or parse failure is fatal for the call:
    /// no metric request can be serviced without the table.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::CatalogUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    /// The copy compiled into the crate.
    pub fn bundled() -> Result<Self> {
        Self::parse(BUNDLED_CATALOG, Path::new("data/metrics.csv"))
    }

    fn parse(content: &str, origin: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .from_reader(content.as_bytes());
        let mut metrics = Vec::new();
        for row in reader.deserialize() {
            let descriptor: MetricDescriptor = row.map_err(|e| Error::CatalogUnavailable {
                path: origin.to_path_buf(),
                reason: e.to_string(),
            })?;
            metrics.push(descriptor);
        }
        if metrics.is_empty() {
            return Err(Error::CatalogUnavailable {
                path: origin.to_path_buf(),
                reason: "catalog holds no metric rows".to_string(),
            });
        }
        Ok(Self { metrics })
    }

    pub fn all(&self) -> &[MetricDescriptor] {
        &self.metrics
    }

    /// Rows matching every supplied filter, in original file order.
    pub fn filter(&self, kind: Option<&str>, process: Option<&str>) -> Vec<&MetricDescriptor> {
        self.metrics
            .iter()
            .filter(|m| kind.is_none_or(|k| m.kind == k))
            .filter(|m| process.is_none_or(|p| m.process == p))
            .collect()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.metrics.iter().any(|m| m.identifier == identifier)
    }
}

/// Convenience wrapper over the bundled table.
pub fn list_metrics(
    kind: Option<&str>,
    process: Option<&str>,
) -> Result<Vec<MetricDescriptor>> {
    let catalog = MetricsCatalog::bundled()?;
    Ok(catalog
        .filter(kind, process)
        .into_iter()
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn bundled_catalog_parses() {
        let catalog = MetricsCatalog::bundled().unwrap();
        assert!(catalog.contains("SHDI"));
        assert!(catalog.contains("NP"));
    }

    #[test]
    fn filter_by_type_preserves_order() {
        let catalog = MetricsCatalog::bundled().unwrap();
        let values = catalog.filter(Some("value"), None);
        assert!(!values.is_empty());
        assert!(values.iter().all(|m| m.kind == "value"));
        // Same relative order as the unfiltered table.
        let all_values: Vec<&MetricDescriptor> = catalog
            .all()
            .iter()
            .filter(|m| m.kind == "value")
            .collect();
        assert_eq!(values, all_values);
    }

    #[test]
    fn filter_by_both_columns() {
        let catalog = MetricsCatalog::bundled().unwrap();
        let rows = catalog.filter(Some("value"), Some("quantitative"));
        assert!(rows.iter().any(|m| m.identifier == "average"));
        assert!(rows.iter().all(|m| m.process == "quantitative"));
    }

    #[test]
    fn missing_file_is_catalog_unavailable() {
        let err = MetricsCatalog::load(Path::new("/nonexistent/metrics.csv")).unwrap_err();
        assert!(matches!(err, Error::CatalogUnavailable { .. }));
    }

    #[test]
    fn load_reads_a_table_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "identifier;type;process").unwrap();
        writeln!(file, "SHDI;value;qualitative").unwrap();
        writeln!(file, "NP;patch;qualitative").unwrap();
        file.flush().unwrap();
        let catalog = MetricsCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.all().len(), 2);
        assert_eq!(catalog.filter(Some("patch"), None)[0].identifier, "NP");
    }
}
