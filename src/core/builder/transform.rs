//! Whole-map summaries and pixel-level transforms: map, search_and_replace,
//! classification, combine.
use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::builder::{
    TreatmentRequest, check_output_target, check_value_filter, emit_output_target,
    emit_value_filter, record_for,
};
use crate::core::record::{PropertiesRecord, Value};
use crate::error::{Error, Result};
use crate::types::TreatmentKind;

/// Whole-map metric summary, written to a CSV by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapRequest {
    pub input_raster: PathBuf,
    pub metrics: Vec<String>,
    pub filters: Option<Vec<i64>>,
    pub unfilters: Option<Vec<i64>>,
    pub output_csv: Option<PathBuf>,
}

impl MapRequest {
    pub fn new<M>(input_raster: impl Into<PathBuf>, metrics: M) -> Self
    where
        M: IntoIterator<Item = String>,
    {
        Self {
            input_raster: input_raster.into(),
            metrics: metrics.into_iter().collect(),
            filters: None,
            unfilters: None,
            output_csv: None,
        }
    }
}

impl TreatmentRequest for MapRequest {
    fn kind(&self) -> TreatmentKind {
        TreatmentKind::Map
    }

    fn build(&self) -> Result<PropertiesRecord> {
        if self.metrics.is_empty() {
            return Err(Error::missing("metrics"));
        }
        check_value_filter(&self.filters, &self.unfilters)?;

        let mut rec = record_for(self.kind(), "map")?;
        rec.push("input_raster", Value::path(&self.input_raster))?;
        rec.push("metrics", Value::text_list(self.metrics.iter().cloned()))?;
        emit_value_filter(&mut rec, &self.filters, &self.unfilters)?;
        if let Some(p) = &self.output_csv {
            rec.push("output_csv", Value::path(p))?;
        }
        Ok(rec)
    }
}

/// Replace pixel values wholesale: each `(old,new)` pair rewrites one code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchAndReplaceRequest {
    pub input_raster: PathBuf,
    pub changes: Vec<(i64, i64)>,
    pub nodata_value: Option<i64>,
    pub output_raster: Option<PathBuf>,
    pub output_folder: Option<PathBuf>,
}

impl SearchAndReplaceRequest {
    pub fn new<C>(input_raster: impl Into<PathBuf>, changes: C) -> Self
    where
        C: IntoIterator<Item = (i64, i64)>,
    {
        Self {
            input_raster: input_raster.into(),
            changes: changes.into_iter().collect(),
            nodata_value: None,
            output_raster: None,
            output_folder: None,
        }
    }
}

impl TreatmentRequest for SearchAndReplaceRequest {
    fn kind(&self) -> TreatmentKind {
        TreatmentKind::SearchAndReplace
    }

    fn build(&self) -> Result<PropertiesRecord> {
        if self.changes.is_empty() {
            return Err(Error::missing("changes"));
        }
        check_output_target(&self.output_raster, &self.output_folder, true)?;

        let mut rec = record_for(self.kind(), "search_and_replace")?;
        rec.push("input_raster", Value::path(&self.input_raster))?;
        rec.push("changes", Value::int_pairs(self.changes.iter().copied()))?;
        if let Some(n) = self.nodata_value {
            rec.push("nodata_value", Value::Int(n))?;
        }
        emit_output_target(&mut rec, &self.output_raster, &self.output_folder)?;
        Ok(rec)
    }
}

/// One classification bucket: the inclusive value range `[min, max]` maps to
/// the integer class code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassDomain {
    pub min: f64,
    pub max: f64,
    pub class: i64,
}

impl ClassDomain {
    pub fn new(min: f64, max: f64, class: i64) -> Self {
        Self { min, max, class }
    }
}

/// Classify continuous pixel values into integer classes by range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub input_raster: PathBuf,
    pub domains: Vec<ClassDomain>,
    pub output_raster: Option<PathBuf>,
    pub output_folder: Option<PathBuf>,
}

impl ClassificationRequest {
    pub fn new<D>(input_raster: impl Into<PathBuf>, domains: D) -> Self
    where
        D: IntoIterator<Item = ClassDomain>,
    {
        Self {
            input_raster: input_raster.into(),
            domains: domains.into_iter().collect(),
            output_raster: None,
            output_folder: None,
        }
    }
}

impl TreatmentRequest for ClassificationRequest {
    fn kind(&self) -> TreatmentKind {
        TreatmentKind::Classification
    }

    fn build(&self) -> Result<PropertiesRecord> {
        if self.domains.is_empty() {
            return Err(Error::missing("domains"));
        }
        check_output_target(&self.output_raster, &self.output_folder, true)?;

        let mut rec = record_for(self.kind(), "classification")?;
        rec.push("input_raster", Value::path(&self.input_raster))?;
        let domains = self
            .domains
            .iter()
            .map(|d| {
                Value::Pair(
                    Box::new(Value::text(format!("{}-{}", d.min, d.max))),
                    Box::new(Value::Int(d.class)),
                )
            })
            .collect();
        rec.push("domains", Value::List(domains))?;
        emit_output_target(&mut rec, &self.output_raster, &self.output_folder)?;
        Ok(rec)
    }
}

/// Algebraic combination of named input rasters into a single output,
/// evaluated by the engine from the `combination` expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineRequest {
    /// `(name, raster)` pairs; names are the variables of the expression and
    /// must be unique.
    pub factors: Vec<(String, PathBuf)>,
    pub combination: String,
    pub output_raster: Option<PathBuf>,
    pub output_folder: Option<PathBuf>,
}

impl CombineRequest {
    pub fn new<F>(factors: F, combination: impl Into<String>) -> Self
    where
        F: IntoIterator<Item = (String, PathBuf)>,
    {
        Self {
            factors: factors.into_iter().collect(),
            combination: combination.into(),
            output_raster: None,
            output_folder: None,
        }
    }
}

impl TreatmentRequest for CombineRequest {
    fn kind(&self) -> TreatmentKind {
        TreatmentKind::Combine
    }

    fn build(&self) -> Result<PropertiesRecord> {
        if self.factors.is_empty() {
            return Err(Error::missing("factors"));
        }
        if self.combination.trim().is_empty() {
            return Err(Error::missing("combination"));
        }
        let mut seen = HashSet::new();
        for (name, _) in &self.factors {
            if !seen.insert(name.as_str()) {
                return Err(Error::DuplicateKey { key: name.clone() });
            }
        }
        check_output_target(&self.output_raster, &self.output_folder, true)?;

        let mut rec = record_for(self.kind(), "combine")?;
        let factors = self
            .factors
            .iter()
            .map(|(name, raster)| {
                Value::Pair(Box::new(Value::text(name)), Box::new(Value::path(raster)))
            })
            .collect();
        rec.push("factors", Value::List(factors))?;
        rec.push("combination", Value::text(&self.combination))?;
        emit_output_target(&mut rec, &self.output_raster, &self.output_folder)?;
        Ok(rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_record_has_metrics_and_no_output() {
        let req = MapRequest::new("land.tif", ["SHDI".to_string()]);
        let rec = req.build().unwrap();
        assert_eq!(
            rec.to_text(),
            "treatment=map\ninput_raster=land.tif\nmetrics={SHDI}\n"
        );
    }

    #[test]
    fn map_without_metrics_fails() {
        let req = MapRequest::new("land.tif", Vec::<String>::new());
        let err = req.build().unwrap_err();
        assert!(matches!(err, Error::MissingParameter { name } if name == "metrics"));
    }

    #[test]
    fn search_and_replace_requires_an_output() {
        let req = SearchAndReplaceRequest::new("land.tif", [(1, 10)]);
        let err = req.build().unwrap_err();
        assert!(matches!(err, Error::MissingParameter { .. }));
    }

    #[test]
    fn search_and_replace_renders_change_pairs() {
        let mut req = SearchAndReplaceRequest::new("land.tif", [(1, 10), (2, 20)]);
        req.output_raster = Some(PathBuf::from("out.tif"));
        let rec = req.build().unwrap();
        assert_eq!(rec.get("treatment"), Some("search_and_replace"));
        assert_eq!(rec.get("changes"), Some("{(1,10);(2,20)}"));
        assert_eq!(rec.get("output_raster"), Some("out.tif"));
    }

    #[test]
    fn classification_domains_render_range_to_class() {
        let mut req = ClassificationRequest::new(
            "land.tif",
            [ClassDomain::new(0.0, 50.0, 1), ClassDomain::new(50.0, 100.0, 2)],
        );
        req.output_folder = Some(PathBuf::from("out/"));
        let rec = req.build().unwrap();
        assert_eq!(rec.get("domains"), Some("{(0-50,1);(50-100,2)}"));
        assert_eq!(rec.get("output_folder"), Some("out/"));
    }

    #[test]
    fn combine_renders_factors_and_expression() {
        let mut req = CombineRequest::new(
            [
                ("a".to_string(), PathBuf::from("x.tif")),
                ("b".to_string(), PathBuf::from("y.tif")),
            ],
            "min(a,b)",
        );
        req.output_raster = Some(PathBuf::from("out.tif"));
        let rec = req.build().unwrap();
        assert_eq!(rec.get("factors"), Some("{(a,x.tif);(b,y.tif)}"));
        assert_eq!(rec.get("combination"), Some("min(a,b)"));
    }

    #[test]
    fn combine_rejects_duplicate_factor_names() {
        let mut req = CombineRequest::new(
            [
                ("a".to_string(), PathBuf::from("x.tif")),
                ("a".to_string(), PathBuf::from("y.tif")),
            ],
            "a+a",
        );
        req.output_raster = Some(PathBuf::from("out.tif"));
        let err = req.build().unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { key } if key == "a"));
    }
}
