//! One validated builder per treatment kind.
//!
//! Each request struct checks presence, exclusivity and the documented
//! derivations against its schema, then emits `key=value` lines in a fixed
//! order. Validation happens before emission, so a failing build never
//! yields a partial record.
pub mod cluster;
pub mod generate;
pub mod procedures;
pub mod transform;
pub mod window;

use std::path::PathBuf;

use crate::core::record::{PropertiesRecord, Value};
use crate::error::{Error, Result};
use crate::types::TreatmentKind;

pub use cluster::{ClusterRequest, DistanceRequest};
pub use generate::{Georeference, GridExtent, RasterFromCsvRequest, RasterFromShapefileRequest};
pub use procedures::{
    EcolandscapeRequest, EphestiaRequest, ErosionRequest, GrainBocagerRequest,
};
pub use transform::{
    ClassDomain, ClassificationRequest, CombineRequest, MapRequest, SearchAndReplaceRequest,
};
pub use window::{GridRequest, SelectedRequest, SlidingRequest, WindowOptions};

/// A treatment request that can validate itself and render a properties
/// record. `build` is pure: no I/O, no shared state, deterministic output.
pub trait TreatmentRequest {
    fn kind(&self) -> TreatmentKind;
    fn build(&self) -> Result<PropertiesRecord>;
}

/// Start a record with its mandatory `treatment=` line.
pub(crate) fn record_for(kind: TreatmentKind, treatment: &str) -> Result<PropertiesRecord> {
    let mut rec = PropertiesRecord::new(kind);
    rec.push("treatment", Value::text(treatment))?;
    Ok(rec)
}

/// `filters` and `unfilters` are mutually exclusive.
pub(crate) fn check_value_filter(
    filters: &Option<Vec<i64>>,
    unfilters: &Option<Vec<i64>>,
) -> Result<()> {
    if filters.is_some() && unfilters.is_some() {
        return Err(Error::conflicting(&["filters", "unfilters"]));
    }
    Ok(())
}

pub(crate) fn emit_value_filter(
    rec: &mut PropertiesRecord,
    filters: &Option<Vec<i64>>,
    unfilters: &Option<Vec<i64>>,
) -> Result<()> {
    if let Some(values) = filters {
        rec.push("filters", Value::int_list(values.iter().copied()))?;
    }
    if let Some(values) = unfilters {
        rec.push("unfilters", Value::int_list(values.iter().copied()))?;
    }
    Ok(())
}

/// `output_raster` and `output_folder` are mutually exclusive; some kinds
/// require exactly one, the rest accept neither (engine defaults apply).
pub(crate) fn check_output_target(
    output_raster: &Option<PathBuf>,
    output_folder: &Option<PathBuf>,
    required: bool,
) -> Result<()> {
    match (output_raster, output_folder) {
        (Some(_), Some(_)) => Err(Error::conflicting(&["output_raster", "output_folder"])),
        (None, None) if required => Err(Error::missing("output_raster/output_folder")),
        _ => Ok(()),
    }
}

pub(crate) fn emit_output_target(
    rec: &mut PropertiesRecord,
    output_raster: &Option<PathBuf>,
    output_folder: &Option<PathBuf>,
) -> Result<()> {
    if let Some(p) = output_raster {
        rec.push("output_raster", Value::path(p))?;
    }
    if let Some(p) = output_folder {
        rec.push("output_folder", Value::path(p))?;
    }
    Ok(())
}
