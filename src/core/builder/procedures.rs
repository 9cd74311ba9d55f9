//! Composite procedure kinds: grain_bocager, ecolandscape, erosion and
//! ephestia_toulouse.
//!
//! For grain_bocager and ecolandscape the dispatched `treatment=` value is
//! derived from which terminal outputs the caller supplied. The precedence
//! lists below are scanned in order and the LAST supplied output wins; when a
//! caller requests outputs of two different stages in one call, the later
//! stage is dispatched. That resolution is pinned by the tests here.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::builder::{TreatmentRequest, record_for};
use crate::core::record::{PropertiesRecord, Value};
use crate::error::{Error, Result};
use crate::types::TreatmentKind;

fn select_stage<'a>(
    candidates: &[(&'static str, Option<&'a PathBuf>)],
) -> Result<&'static str> {
    let mut stage = None;
    for (name, output) in candidates {
        if output.is_some() {
            stage = Some(*name);
        }
    }
    stage.ok_or(Error::MissingParameter {
        name: "terminal output",
    })
}

/// Hedgerow-network ("bocage grain") indicator pipeline over a wood-height
/// raster: height recovery, wood-type detection, influence distances, grain
/// computation, functional clustering, and global issue indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrainBocagerRequest {
    pub wood_height_raster: PathBuf,
    pub output_folder: PathBuf,
    pub landcover_raster: Option<PathBuf>,
    /// Influence reach of woody structures, in map units.
    pub influence_max_distance: Option<f64>,
    /// Radius of the grain analysis window, in map units.
    pub grain_radius: Option<f64>,
    pub clustering_distances: Option<Vec<f64>>,
    // Terminal outputs, in stage order.
    pub recovered_height_raster: Option<PathBuf>,
    pub wood_type_raster: Option<PathBuf>,
    pub influence_raster: Option<PathBuf>,
    pub grain_raster: Option<PathBuf>,
    pub clustering_raster: Option<PathBuf>,
    pub issues_csv: Option<PathBuf>,
}

impl GrainBocagerRequest {
    pub fn new(
        wood_height_raster: impl Into<PathBuf>,
        output_folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            wood_height_raster: wood_height_raster.into(),
            output_folder: output_folder.into(),
            landcover_raster: None,
            influence_max_distance: None,
            grain_radius: None,
            clustering_distances: None,
            recovered_height_raster: None,
            wood_type_raster: None,
            influence_raster: None,
            grain_raster: None,
            clustering_raster: None,
            issues_csv: None,
        }
    }

    fn stage(&self) -> Result<&'static str> {
        select_stage(&[
            ("wood_height_recovery", self.recovered_height_raster.as_ref()),
            ("wood_type_detection", self.wood_type_raster.as_ref()),
            (
                "influence_distance_calculation",
                self.influence_raster.as_ref(),
            ),
            ("grain_bocager_calculation", self.grain_raster.as_ref()),
            ("functional_clustering", self.clustering_raster.as_ref()),
            ("global_issues_calculation", self.issues_csv.as_ref()),
        ])
    }
}

impl TreatmentRequest for GrainBocagerRequest {
    fn kind(&self) -> TreatmentKind {
        TreatmentKind::GrainBocager
    }

    fn build(&self) -> Result<PropertiesRecord> {
        let stage = self.stage()?;
        let mut rec = record_for(self.kind(), stage)?;
        rec.push("wood_height_raster", Value::path(&self.wood_height_raster))?;
        rec.push("output_folder", Value::path(&self.output_folder))?;
        if let Some(p) = &self.landcover_raster {
            rec.push("landcover_raster", Value::path(p))?;
        }
        if let Some(d) = self.influence_max_distance {
            rec.push("influence_max_distance", Value::Real(d))?;
        }
        if let Some(r) = self.grain_radius {
            rec.push("grain_radius", Value::Real(r))?;
        }
        if let Some(ds) = &self.clustering_distances {
            rec.push("clustering_distances", Value::real_list(ds.iter().copied()))?;
        }
        if let Some(p) = &self.recovered_height_raster {
            rec.push("recovered_height_raster", Value::path(p))?;
        }
        if let Some(p) = &self.wood_type_raster {
            rec.push("wood_type_raster", Value::path(p))?;
        }
        if let Some(p) = &self.influence_raster {
            rec.push("influence_raster", Value::path(p))?;
        }
        if let Some(p) = &self.grain_raster {
            rec.push("grain_raster", Value::path(p))?;
        }
        if let Some(p) = &self.clustering_raster {
            rec.push("clustering_raster", Value::path(p))?;
        }
        if let Some(p) = &self.issues_csv {
            rec.push("issues_csv", Value::path(p))?;
        }
        Ok(rec)
    }
}

/// Ecological landscape-unit pipeline: metric computation, standardization,
/// clustering, gradient, mapping, rupture detection — in that stage order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcolandscapeRequest {
    pub landcover_raster: PathBuf,
    pub output_folder: PathBuf,
    pub metrics: Option<Vec<String>>,
    /// Analysis window sizes, in pixels.
    pub scales: Option<Vec<i64>>,
    /// Number of landscape classes for the clustering stage.
    pub class_count: Option<i64>,
    // Terminal outputs, in stage order.
    pub metrics_folder: Option<PathBuf>,
    pub standardized_folder: Option<PathBuf>,
    pub clusters_raster: Option<PathBuf>,
    pub gradient_folder: Option<PathBuf>,
    pub map_raster: Option<PathBuf>,
    pub rupture_raster: Option<PathBuf>,
}

impl EcolandscapeRequest {
    pub fn new(
        landcover_raster: impl Into<PathBuf>,
        output_folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            landcover_raster: landcover_raster.into(),
            output_folder: output_folder.into(),
            metrics: None,
            scales: None,
            class_count: None,
            metrics_folder: None,
            standardized_folder: None,
            clusters_raster: None,
            gradient_folder: None,
            map_raster: None,
            rupture_raster: None,
        }
    }

    fn stage(&self) -> Result<&'static str> {
        select_stage(&[
            ("calcul_metrics", self.metrics_folder.as_ref()),
            ("standardization", self.standardized_folder.as_ref()),
            ("clustering", self.clusters_raster.as_ref()),
            ("gradient", self.gradient_folder.as_ref()),
            ("mapping", self.map_raster.as_ref()),
            ("rupture", self.rupture_raster.as_ref()),
        ])
    }
}

impl TreatmentRequest for EcolandscapeRequest {
    fn kind(&self) -> TreatmentKind {
        TreatmentKind::Ecolandscape
    }

    fn build(&self) -> Result<PropertiesRecord> {
        let stage = self.stage()?;
        let mut rec = record_for(self.kind(), stage)?;
        rec.push("landcover_raster", Value::path(&self.landcover_raster))?;
        rec.push("output_folder", Value::path(&self.output_folder))?;
        if let Some(m) = &self.metrics {
            rec.push("metrics", Value::text_list(m.iter().cloned()))?;
        }
        if let Some(s) = &self.scales {
            rec.push("scales", Value::int_list(s.iter().copied()))?;
        }
        if let Some(c) = self.class_count {
            rec.push("class_count", Value::Int(c))?;
        }
        if let Some(p) = &self.metrics_folder {
            rec.push("metrics_folder", Value::path(p))?;
        }
        if let Some(p) = &self.standardized_folder {
            rec.push("standardized_folder", Value::path(p))?;
        }
        if let Some(p) = &self.clusters_raster {
            rec.push("clusters_raster", Value::path(p))?;
        }
        if let Some(p) = &self.gradient_folder {
            rec.push("gradient_folder", Value::path(p))?;
        }
        if let Some(p) = &self.map_raster {
            rec.push("map_raster", Value::path(p))?;
        }
        if let Some(p) = &self.rupture_raster {
            rec.push("rupture_raster", Value::path(p))?;
        }
        Ok(rec)
    }
}

/// Erosion-risk model over elevation and land cover, parameterized by
/// per-class infiltration coefficients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErosionRequest {
    pub elevation_raster: PathBuf,
    pub landcover_raster: PathBuf,
    /// `(class, coefficient)` pairs.
    pub infiltration: Vec<(i64, f64)>,
    pub output_folder: PathBuf,
    pub displacement: Option<i64>,
    pub slope_threshold: Option<f64>,
}

impl TreatmentRequest for ErosionRequest {
    fn kind(&self) -> TreatmentKind {
        TreatmentKind::Erosion
    }

    fn build(&self) -> Result<PropertiesRecord> {
        if self.infiltration.is_empty() {
            return Err(Error::missing("infiltration"));
        }
        let mut rec = record_for(self.kind(), "erosion")?;
        rec.push("elevation_raster", Value::path(&self.elevation_raster))?;
        rec.push("landcover_raster", Value::path(&self.landcover_raster))?;
        let pairs = self
            .infiltration
            .iter()
            .map(|(class, coef)| {
                Value::Pair(Box::new(Value::Int(*class)), Box::new(Value::Real(*coef)))
            })
            .collect();
        rec.push("infiltration", Value::List(pairs))?;
        if let Some(d) = self.displacement {
            rec.push("displacement", Value::Int(d))?;
        }
        if let Some(s) = self.slope_threshold {
            rec.push("slope_threshold", Value::Real(s))?;
        }
        rec.push("output_folder", Value::path(&self.output_folder))?;
        Ok(rec)
    }
}

/// Host-patch connectivity procedure for Ephestia dispersal studies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EphestiaRequest {
    pub landcover_raster: PathBuf,
    /// Land-cover codes attractive to the moth.
    pub attractive_values: Vec<i64>,
    pub release_points: Option<PathBuf>,
    pub output_folder: PathBuf,
}

impl TreatmentRequest for EphestiaRequest {
    fn kind(&self) -> TreatmentKind {
        TreatmentKind::EphestiaToulouse
    }

    fn build(&self) -> Result<PropertiesRecord> {
        if self.attractive_values.is_empty() {
            return Err(Error::missing("attractive_values"));
        }
        let mut rec = record_for(self.kind(), "ephestia_toulouse")?;
        rec.push("landcover_raster", Value::path(&self.landcover_raster))?;
        rec.push(
            "attractive_values",
            Value::int_list(self.attractive_values.iter().copied()),
        )?;
        if let Some(p) = &self.release_points {
            rec.push("release_points", Value::path(p))?;
        }
        rec.push("output_folder", Value::path(&self.output_folder))?;
        Ok(rec)
    }
}
