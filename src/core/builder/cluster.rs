//! Patch clustering and map-wide distance transforms.
//!
//! Both kinds share the friction discipline of the window scans: a supplied
//! friction raster forces the functional distance model, an explicitly
//! functional model without a friction raster falls back to euclidian.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::builder::{
    TreatmentRequest, check_output_target, emit_output_target, record_for,
};
use crate::core::record::{PropertiesRecord, Value};
use crate::error::{Error, Result};
use crate::types::{ClusterDistance, DistanceType, TreatmentKind};

/// Group pixels of the listed values into connected clusters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterRequest {
    pub input_raster: PathBuf,
    pub cluster_values: Vec<i64>,
    pub cluster_distance: Option<ClusterDistance>,
    /// Maximum gap, in map units, across which two patches still merge.
    pub max_gap: Option<f64>,
    pub friction_raster: Option<PathBuf>,
    /// Drop clusters smaller than this area, in map units squared.
    pub minimum_area: Option<f64>,
    pub output_raster: Option<PathBuf>,
    pub output_folder: Option<PathBuf>,
}

impl ClusterRequest {
    pub fn new<V>(input_raster: impl Into<PathBuf>, cluster_values: V) -> Self
    where
        V: IntoIterator<Item = i64>,
    {
        Self {
            input_raster: input_raster.into(),
            cluster_values: cluster_values.into_iter().collect(),
            cluster_distance: None,
            max_gap: None,
            friction_raster: None,
            minimum_area: None,
            output_raster: None,
            output_folder: None,
        }
    }
}

impl TreatmentRequest for ClusterRequest {
    fn kind(&self) -> TreatmentKind {
        TreatmentKind::Cluster
    }

    fn build(&self) -> Result<PropertiesRecord> {
        if self.cluster_values.is_empty() {
            return Err(Error::missing("cluster_values"));
        }
        check_output_target(&self.output_raster, &self.output_folder, false)?;

        let distance = if self.friction_raster.is_some() {
            Some(ClusterDistance::Functional)
        } else if self.cluster_distance == Some(ClusterDistance::Functional) {
            Some(ClusterDistance::Euclidian)
        } else {
            self.cluster_distance
        };

        let mut rec = record_for(self.kind(), "cluster")?;
        rec.push("input_raster", Value::path(&self.input_raster))?;
        rec.push(
            "cluster_values",
            Value::int_list(self.cluster_values.iter().copied()),
        )?;
        if let Some(d) = distance {
            rec.push("cluster_distance", Value::text(d.to_string()))?;
        }
        if let Some(g) = self.max_gap {
            rec.push("max_gap", Value::Real(g))?;
        }
        if let Some(p) = &self.friction_raster {
            rec.push("friction_raster", Value::path(p))?;
        }
        if let Some(a) = self.minimum_area {
            rec.push("minimum_area", Value::Real(a))?;
        }
        emit_output_target(&mut rec, &self.output_raster, &self.output_folder)?;
        Ok(rec)
    }
}

/// Distance transform from every pixel to the nearest source-value pixel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceRequest {
    pub input_raster: PathBuf,
    pub source_values: Vec<i64>,
    pub distance_type: Option<DistanceType>,
    pub distance_function: Option<String>,
    pub friction_raster: Option<PathBuf>,
    pub max_distance: Option<f64>,
    pub output_raster: Option<PathBuf>,
    pub output_folder: Option<PathBuf>,
}

impl DistanceRequest {
    pub fn new<V>(input_raster: impl Into<PathBuf>, source_values: V) -> Self
    where
        V: IntoIterator<Item = i64>,
    {
        Self {
            input_raster: input_raster.into(),
            source_values: source_values.into_iter().collect(),
            distance_type: None,
            distance_function: None,
            friction_raster: None,
            max_distance: None,
            output_raster: None,
            output_folder: None,
        }
    }
}

impl TreatmentRequest for DistanceRequest {
    fn kind(&self) -> TreatmentKind {
        TreatmentKind::Distance
    }

    fn build(&self) -> Result<PropertiesRecord> {
        if self.source_values.is_empty() {
            return Err(Error::missing("source_values"));
        }
        if self.distance_function.is_some() && self.friction_raster.is_some() {
            return Err(Error::conflicting(&["distance_function", "friction_raster"]));
        }
        check_output_target(&self.output_raster, &self.output_folder, false)?;

        let mut distance_type = self.distance_type;
        if self.distance_function.is_some() && distance_type != Some(DistanceType::Weighted) {
            distance_type = Some(DistanceType::Weighted);
        }
        if distance_type == Some(DistanceType::Weighted) && self.distance_function.is_none() {
            return Err(Error::missing("distance_function"));
        }
        if self.friction_raster.is_some() {
            distance_type = Some(DistanceType::Functional);
        } else if distance_type == Some(DistanceType::Functional) {
            distance_type = Some(DistanceType::Euclidian);
        }

        let mut rec = record_for(self.kind(), "distance")?;
        rec.push("input_raster", Value::path(&self.input_raster))?;
        rec.push(
            "source_values",
            Value::int_list(self.source_values.iter().copied()),
        )?;
        if let Some(d) = distance_type {
            rec.push("distance_type", Value::text(d.to_string()))?;
        }
        if let Some(f) = &self.distance_function {
            rec.push("distance_function", Value::text(f))?;
        }
        if let Some(p) = &self.friction_raster {
            rec.push("friction_raster", Value::path(p))?;
        }
        if let Some(m) = self.max_distance {
            rec.push("max_distance", Value::Real(m))?;
        }
        emit_output_target(&mut rec, &self.output_raster, &self.output_folder)?;
        Ok(rec)
    }
}
