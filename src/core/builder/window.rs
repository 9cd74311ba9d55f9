//! Window-scan treatments: sliding, selected and grid.
//!
//! The three kinds share one option group, `WindowOptions`. Its derivation
//! rules are part of the engine contract:
//! 1. a `distance_function` upgrades any non-weighted `distance_type` to
//!    `WEIGHTED`;
//! 2. `WEIGHTED` without a function is a validation error;
//! 3. a `friction_raster` forces `shape=FUNCTIONAL`, overriding the caller;
//! 4. an explicit `FUNCTIONAL` shape without a friction raster falls back to
//!    `CIRCLE`.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::builder::{
    TreatmentRequest, check_output_target, check_value_filter, emit_output_target,
    emit_value_filter, record_for,
};
use crate::core::record::{PropertiesRecord, Value};
use crate::error::{Error, Result};
use crate::types::{DistanceType, TreatmentKind, WindowShape};

/// Options common to every window scan. `metrics` and `sizes` are required;
/// everything else is carried only when supplied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowOptions {
    pub metrics: Vec<String>,
    /// Window sizes in pixels. The engine expects odd counts; the values are
    /// carried opaquely.
    pub sizes: Vec<i64>,
    pub distance_type: Option<DistanceType>,
    pub distance_function: Option<String>,
    pub shape: Option<WindowShape>,
    pub friction_raster: Option<PathBuf>,
    pub filters: Option<Vec<i64>>,
    pub unfilters: Option<Vec<i64>>,
    pub output_raster: Option<PathBuf>,
    pub output_folder: Option<PathBuf>,
}

struct DerivedWindow {
    distance_type: Option<DistanceType>,
    shape: Option<WindowShape>,
}

impl WindowOptions {
    pub fn new<M, S>(metrics: M, sizes: S) -> Self
    where
        M: IntoIterator<Item = String>,
        S: IntoIterator<Item = i64>,
    {
        Self {
            metrics: metrics.into_iter().collect(),
            sizes: sizes.into_iter().collect(),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<DerivedWindow> {
        if self.metrics.is_empty() {
            return Err(Error::missing("metrics"));
        }
        if self.sizes.is_empty() {
            return Err(Error::missing("sizes"));
        }
        check_value_filter(&self.filters, &self.unfilters)?;
        check_output_target(&self.output_raster, &self.output_folder, false)?;

        let mut distance_type = self.distance_type;
        if self.distance_function.is_some() && distance_type != Some(DistanceType::Weighted) {
            distance_type = Some(DistanceType::Weighted);
        }
        if distance_type == Some(DistanceType::Weighted) && self.distance_function.is_none() {
            return Err(Error::missing("distance_function"));
        }

        let shape = if self.friction_raster.is_some() {
            Some(WindowShape::Functional)
        } else if self.shape == Some(WindowShape::Functional) {
            Some(WindowShape::Circle)
        } else {
            self.shape
        };

        Ok(DerivedWindow {
            distance_type,
            shape,
        })
    }

    fn emit(&self, rec: &mut PropertiesRecord, derived: &DerivedWindow) -> Result<()> {
        rec.push("metrics", Value::text_list(self.metrics.iter().cloned()))?;
        rec.push("sizes", Value::int_list(self.sizes.iter().copied()))?;
        if let Some(d) = derived.distance_type {
            rec.push("distance_type", Value::text(d.to_string()))?;
        }
        if let Some(f) = &self.distance_function {
            rec.push("distance_function", Value::text(f))?;
        }
        if let Some(s) = derived.shape {
            rec.push("shape", Value::text(s.to_string()))?;
        }
        if let Some(p) = &self.friction_raster {
            rec.push("friction_raster", Value::path(p))?;
        }
        emit_value_filter(rec, &self.filters, &self.unfilters)?;
        Ok(())
    }
}

/// Sliding-window metric scan over the whole raster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlidingRequest {
    pub input_raster: PathBuf,
    pub window: WindowOptions,
    /// Step between window centers, in pixels. 1 when absent.
    pub delta_displacement: Option<i64>,
    /// Interpolate metric values between displaced centers.
    pub interpolate_values: Option<bool>,
}

impl SlidingRequest {
    pub fn new(input_raster: impl Into<PathBuf>, window: WindowOptions) -> Self {
        Self {
            input_raster: input_raster.into(),
            window,
            delta_displacement: None,
            interpolate_values: None,
        }
    }
}

impl TreatmentRequest for SlidingRequest {
    fn kind(&self) -> TreatmentKind {
        TreatmentKind::Sliding
    }

    fn build(&self) -> Result<PropertiesRecord> {
        let derived = self.window.validate()?;
        let mut rec = record_for(self.kind(), "sliding")?;
        rec.push("input_raster", Value::path(&self.input_raster))?;
        self.window.emit(&mut rec, &derived)?;
        if let Some(d) = self.delta_displacement {
            rec.push("delta_displacement", Value::Int(d))?;
        }
        if let Some(b) = self.interpolate_values {
            rec.push("interpolate_values", Value::Flag(b))?;
        }
        emit_output_target(&mut rec, &self.window.output_raster, &self.window.output_folder)?;
        Ok(rec)
    }
}

/// Metric scan over caller-selected window centers: either inline `(col,row)`
/// pairs or a file of pixel coordinates, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedRequest {
    pub input_raster: PathBuf,
    pub window: WindowOptions,
    pub pixels: Option<Vec<(i64, i64)>>,
    pub pixels_file: Option<PathBuf>,
}

impl SelectedRequest {
    pub fn new(input_raster: impl Into<PathBuf>, window: WindowOptions) -> Self {
        Self {
            input_raster: input_raster.into(),
            window,
            pixels: None,
            pixels_file: None,
        }
    }
}

impl TreatmentRequest for SelectedRequest {
    fn kind(&self) -> TreatmentKind {
        TreatmentKind::Selected
    }

    fn build(&self) -> Result<PropertiesRecord> {
        let derived = self.window.validate()?;
        match (&self.pixels, &self.pixels_file) {
            (Some(_), Some(_)) => return Err(Error::conflicting(&["pixels", "pixels_file"])),
            (None, None) => return Err(Error::missing("pixels")),
            _ => {}
        }

        let mut rec = record_for(self.kind(), "selected")?;
        rec.push("input_raster", Value::path(&self.input_raster))?;
        self.window.emit(&mut rec, &derived)?;
        if let Some(pixels) = &self.pixels {
            rec.push("pixels", Value::int_pairs(pixels.iter().copied()))?;
        }
        if let Some(p) = &self.pixels_file {
            rec.push("pixels_file", Value::path(p))?;
        }
        emit_output_target(&mut rec, &self.window.output_raster, &self.window.output_folder)?;
        Ok(rec)
    }
}

/// Metric scan over a regular grid of non-overlapping windows; the grid step
/// is the window size itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridRequest {
    pub input_raster: PathBuf,
    pub window: WindowOptions,
}

impl GridRequest {
    pub fn new(input_raster: impl Into<PathBuf>, window: WindowOptions) -> Self {
        Self {
            input_raster: input_raster.into(),
            window,
        }
    }
}

impl TreatmentRequest for GridRequest {
    fn kind(&self) -> TreatmentKind {
        TreatmentKind::Grid
    }

    fn build(&self) -> Result<PropertiesRecord> {
        let derived = self.window.validate()?;
        let mut rec = record_for(self.kind(), "grid")?;
        rec.push("input_raster", Value::path(&self.input_raster))?;
        self.window.emit(&mut rec, &derived)?;
        emit_output_target(&mut rec, &self.window.output_raster, &self.window.output_folder)?;
        Ok(rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_window() -> WindowOptions {
        WindowOptions::new(
            ["SHDI".to_string(), "HET".to_string()],
            [51, 101],
        )
    }

    #[test]
    fn sliding_basic_record() {
        let mut window = base_window();
        window.distance_type = Some(DistanceType::FastGaussian);
        let req = SlidingRequest::new("land.tif", window);
        let rec = req.build().unwrap();
        assert_eq!(
            rec.to_text(),
            "treatment=sliding\n\
             input_raster=land.tif\n\
             metrics={SHDI;HET}\n\
             sizes={51;101}\n\
             distance_type=FAST_GAUSSIAN\n"
        );
        assert!(rec.get("distance_function").is_none());
    }

    #[test]
    fn sliding_is_deterministic() {
        let req = SlidingRequest::new("land.tif", base_window());
        assert_eq!(req.build().unwrap().to_text(), req.build().unwrap().to_text());
    }

    #[test]
    fn friction_raster_forces_functional_shape() {
        let mut window = base_window();
        window.shape = Some(WindowShape::Circle);
        window.friction_raster = Some(PathBuf::from("f.tif"));
        let rec = SlidingRequest::new("land.tif", window).build().unwrap();
        assert_eq!(rec.get("shape"), Some("FUNCTIONAL"));
        assert_eq!(rec.get("friction_raster"), Some("f.tif"));
    }

    #[test]
    fn functional_shape_without_friction_falls_back_to_circle() {
        let mut window = base_window();
        window.shape = Some(WindowShape::Functional);
        let rec = SlidingRequest::new("land.tif", window).build().unwrap();
        assert_eq!(rec.get("shape"), Some("CIRCLE"));
    }

    #[test]
    fn distance_function_upgrades_to_weighted() {
        let mut window = base_window();
        window.distance_type = Some(DistanceType::Threshold);
        window.distance_function = Some("exp(-d/20)".to_string());
        let rec = SlidingRequest::new("land.tif", window).build().unwrap();
        assert_eq!(rec.get("distance_type"), Some("WEIGHTED"));
        assert_eq!(rec.get("distance_function"), Some("exp(-d/20)"));
    }

    #[test]
    fn weighted_without_function_is_missing_parameter() {
        let mut window = base_window();
        window.distance_type = Some(DistanceType::Weighted);
        let err = SlidingRequest::new("land.tif", window).build().unwrap_err();
        assert!(
            matches!(err, Error::MissingParameter { name } if name == "distance_function")
        );
    }

    #[test]
    fn empty_metrics_is_missing_parameter() {
        let window = WindowOptions::new(Vec::<String>::new(), [51]);
        let err = SlidingRequest::new("land.tif", window).build().unwrap_err();
        assert!(matches!(err, Error::MissingParameter { name } if name == "metrics"));
    }

    #[test]
    fn filters_and_unfilters_conflict() {
        let mut window = base_window();
        window.filters = Some(vec![1, 2]);
        window.unfilters = Some(vec![3]);
        let err = SlidingRequest::new("land.tif", window).build().unwrap_err();
        assert!(matches!(err, Error::ConflictingParameters { .. }));
    }

    #[test]
    fn both_output_targets_conflict() {
        let mut window = base_window();
        window.output_raster = Some(PathBuf::from("out.tif"));
        window.output_folder = Some(PathBuf::from("out/"));
        let err = GridRequest::new("land.tif", window).build().unwrap_err();
        assert!(matches!(err, Error::ConflictingParameters { .. }));
    }

    #[test]
    fn selected_requires_exactly_one_pixel_source() {
        let req = SelectedRequest::new("land.tif", base_window());
        let err = req.build().unwrap_err();
        assert!(matches!(err, Error::MissingParameter { name } if name == "pixels"));

        let mut req = SelectedRequest::new("land.tif", base_window());
        req.pixels = Some(vec![(10, 12)]);
        req.pixels_file = Some(PathBuf::from("pixels.csv"));
        let err = req.build().unwrap_err();
        assert!(matches!(err, Error::ConflictingParameters { .. }));
    }

    #[test]
    fn selected_inline_pixels_render_as_pairs() {
        let mut req = SelectedRequest::new("land.tif", base_window());
        req.pixels = Some(vec![(10, 12), (40, 7)]);
        let rec = req.build().unwrap();
        assert_eq!(rec.get("treatment"), Some("selected"));
        assert_eq!(rec.get("pixels"), Some("{(10,12);(40,7)}"));
    }

    #[test]
    fn grid_emits_window_core() {
        let rec = GridRequest::new("land.tif", base_window()).build().unwrap();
        assert_eq!(rec.get("treatment"), Some("grid"));
        assert_eq!(rec.get("sizes"), Some("{51;101}"));
    }
}
