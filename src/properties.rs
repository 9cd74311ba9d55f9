//! Properties serializer: turn a built record into the file the engine reads.
//!
//! Every file starts with a single comment line carrying the generation
//! timestamp, then the record's `key=value` lines in build order. The write
//! is direct; the record is fully rendered in memory before the file is
//! created, so a validation failure never leaves a file behind.
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::record::PropertiesRecord;
use crate::error::{Error, Result};

/// File suffix the engine expects.
pub const PROPERTIES_SUFFIX: &str = ".properties";

/// Serialize `record` to `target`, or to a fresh uniquely-named scratch file
/// when no target is given. Returns the written path.
pub fn write_record(record: &PropertiesRecord, target: Option<&Path>) -> Result<PathBuf> {
    let body = record.to_text();
    let header = format!("# generated {}\n", chrono::Utc::now().to_rfc3339());

    let path = match target {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| Error::SerializationIo {
                        path: path.to_path_buf(),
                        source: e,
                    })?;
                }
            }
            path.to_path_buf()
        }
        None => scratch_path()?,
    };

    let mut file = std::fs::File::create(&path).map_err(|e| Error::SerializationIo {
        path: path.clone(),
        source: e,
    })?;
    file.write_all(header.as_bytes())
        .and_then(|_| file.write_all(body.as_bytes()))
        .map_err(|e| Error::SerializationIo {
            path: path.clone(),
            source: e,
        })?;

    debug!("properties written to {}", path.display());
    Ok(path)
}

/// A unique `landpro_*.properties` path in the scratch directory. The file is
/// created immediately so concurrent callers never collide, and kept on disk
/// for the engine to read.
fn scratch_path() -> Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix("landpro_")
        .suffix(PROPERTIES_SUFFIX)
        .tempfile()
        .map_err(|e| Error::SerializationIo {
            path: std::env::temp_dir(),
            source: e,
        })?;
    let (_, path) = file.keep().map_err(|e| Error::SerializationIo {
        path: e.file.path().to_path_buf(),
        source: e.error,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::Value;
    use crate::types::TreatmentKind;

    fn sample_record() -> PropertiesRecord {
        let mut rec = PropertiesRecord::new(TreatmentKind::Map);
        rec.push("treatment", Value::text("map")).unwrap();
        rec.push("input_raster", Value::text("land.tif")).unwrap();
        rec.push("metrics", Value::text_list(["SHDI"])).unwrap();
        rec
    }

    #[test]
    fn header_then_lines() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("map.properties");
        let written = write_record(&sample_record(), Some(&target)).unwrap();
        assert_eq!(written, target);

        let content = std::fs::read_to_string(&written).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("# generated "));
        let stamp = header.trim_start_matches("# generated ");
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
        assert_eq!(lines.next(), Some("treatment=map"));
        assert_eq!(lines.next(), Some("input_raster=land.tif"));
        assert_eq!(lines.next(), Some("metrics={SHDI}"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("deep").join("nested").join("map.properties");
        write_record(&sample_record(), Some(&target)).unwrap();
        assert!(target.is_file());
    }

    #[test]
    fn generated_scratch_file_is_unique_and_named() {
        let a = write_record(&sample_record(), None).unwrap();
        let b = write_record(&sample_record(), None).unwrap();
        assert_ne!(a, b);
        for path in [&a, &b] {
            let name = path.file_name().unwrap().to_string_lossy();
            assert!(name.starts_with("landpro_"));
            assert!(name.ends_with(".properties"));
            std::fs::remove_file(path).unwrap();
        }
    }

    #[test]
    fn round_trip_preserves_keys_and_values() {
        let rec = sample_record();
        let path = write_record(&rec, None).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let parsed = PropertiesRecord::parse(&content);
        let expected: Vec<(String, String)> = rec
            .lines()
            .map(|l| {
                let (k, v) = l.split_once('=').unwrap();
                (k.to_string(), v.to_string())
            })
            .collect();
        assert_eq!(parsed, expected);
    }
}
