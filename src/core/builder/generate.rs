//! Raster generation from tabular and vector sources.
//!
//! Both kinds need a georeference for the output grid, from exactly one of
//! three sources: a header file (`entete=`), a reference raster, or an
//! explicit width/height/origin/cellsize grid. Zero sources is a missing
//! parameter, two or more a conflict; nothing is silently resolved.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::builder::{TreatmentRequest, record_for};
use crate::core::record::{PropertiesRecord, Value};
use crate::error::{Error, Result};
use crate::types::TreatmentKind;

/// Explicit output grid: pixel dimensions, lower-left origin, cell size in
/// map units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridExtent {
    pub width: i64,
    pub height: i64,
    pub xmin: f64,
    pub ymin: f64,
    pub cellsize: f64,
}

/// Where the output grid's georeference comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Georeference {
    /// ESRI-style header file, emitted as `entete=`.
    pub header_file: Option<PathBuf>,
    pub ref_raster: Option<PathBuf>,
    pub grid: Option<GridExtent>,
}

impl Georeference {
    pub fn header(path: impl Into<PathBuf>) -> Self {
        Self {
            header_file: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn raster(path: impl Into<PathBuf>) -> Self {
        Self {
            ref_raster: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn grid(extent: GridExtent) -> Self {
        Self {
            grid: Some(extent),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<()> {
        let mut set: Vec<&'static str> = Vec::new();
        if self.header_file.is_some() {
            set.push("entete");
        }
        if self.ref_raster.is_some() {
            set.push("ref_raster");
        }
        if self.grid.is_some() {
            set.push("width/height/xmin/ymin/cellsize");
        }
        match set.len() {
            0 => Err(Error::missing("georeference")),
            1 => Ok(()),
            _ => Err(Error::ConflictingParameters { names: set }),
        }
    }

    fn emit(&self, rec: &mut PropertiesRecord) -> Result<()> {
        if let Some(p) = &self.header_file {
            rec.push("entete", Value::path(p))?;
        }
        if let Some(p) = &self.ref_raster {
            rec.push("ref_raster", Value::path(p))?;
        }
        if let Some(g) = &self.grid {
            rec.push("width", Value::Int(g.width))?;
            rec.push("height", Value::Int(g.height))?;
            rec.push("xmin", Value::Real(g.xmin))?;
            rec.push("ymin", Value::Real(g.ymin))?;
            rec.push("cellsize", Value::Real(g.cellsize))?;
        }
        Ok(())
    }
}

/// Rasterize one column of a point CSV onto a fresh grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterFromCsvRequest {
    pub csv_file: PathBuf,
    /// Column holding the pixel value.
    pub variable: String,
    pub georeference: Georeference,
    pub output_raster: PathBuf,
}

impl TreatmentRequest for RasterFromCsvRequest {
    fn kind(&self) -> TreatmentKind {
        TreatmentKind::RasterFromCsv
    }

    fn build(&self) -> Result<PropertiesRecord> {
        if self.variable.trim().is_empty() {
            return Err(Error::missing("variable"));
        }
        self.georeference.validate()?;

        let mut rec = record_for(self.kind(), "raster_from_csv")?;
        rec.push("csv_file", Value::path(&self.csv_file))?;
        rec.push("variable", Value::text(&self.variable))?;
        self.georeference.emit(&mut rec)?;
        rec.push("output_raster", Value::path(&self.output_raster))?;
        Ok(rec)
    }
}

/// Rasterize one attribute of a shapefile onto a fresh grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterFromShapefileRequest {
    pub shapefile: PathBuf,
    pub attribute: String,
    pub georeference: Georeference,
    pub output_raster: PathBuf,
}

impl TreatmentRequest for RasterFromShapefileRequest {
    fn kind(&self) -> TreatmentKind {
        TreatmentKind::RasterFromShapefile
    }

    fn build(&self) -> Result<PropertiesRecord> {
        if self.attribute.trim().is_empty() {
            return Err(Error::missing("attribute"));
        }
        self.georeference.validate()?;

        let mut rec = record_for(self.kind(), "raster_from_shapefile")?;
        rec.push("shapefile", Value::path(&self.shapefile))?;
        rec.push("attribute", Value::text(&self.attribute))?;
        self.georeference.emit(&mut rec)?;
        rec.push("output_raster", Value::path(&self.output_raster))?;
        Ok(rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_with_header_georeference() {
        let req = RasterFromCsvRequest {
            csv_file: PathBuf::from("points.csv"),
            variable: "height".to_string(),
            georeference: Georeference::header("grid.hdr"),
            output_raster: PathBuf::from("out.tif"),
        };
        let rec = req.build().unwrap();
        assert_eq!(
            rec.to_text(),
            "treatment=raster_from_csv\n\
             csv_file=points.csv\n\
             variable=height\n\
             entete=grid.hdr\n\
             output_raster=out.tif\n"
        );
    }

    #[test]
    fn explicit_grid_emits_five_lines() {
        let req = RasterFromShapefileRequest {
            shapefile: PathBuf::from("hedges.shp"),
            attribute: "TYPE".to_string(),
            georeference: Georeference::grid(GridExtent {
                width: 1000,
                height: 800,
                xmin: 250000.0,
                ymin: 6700000.0,
                cellsize: 5.0,
            }),
            output_raster: PathBuf::from("out.tif"),
        };
        let rec = req.build().unwrap();
        assert_eq!(rec.get("width"), Some("1000"));
        assert_eq!(rec.get("height"), Some("800"));
        assert_eq!(rec.get("xmin"), Some("250000"));
        assert_eq!(rec.get("ymin"), Some("6700000"));
        assert_eq!(rec.get("cellsize"), Some("5"));
    }

    #[test]
    fn missing_georeference_is_missing_parameter() {
        let req = RasterFromCsvRequest {
            csv_file: PathBuf::from("points.csv"),
            variable: "height".to_string(),
            georeference: Georeference::default(),
            output_raster: PathBuf::from("out.tif"),
        };
        let err = req.build().unwrap_err();
        assert!(matches!(err, Error::MissingParameter { name } if name == "georeference"));
    }

    #[test]
    fn two_georeference_sources_conflict() {
        let mut geo = Georeference::header("grid.hdr");
        geo.ref_raster = Some(PathBuf::from("ref.tif"));
        let req = RasterFromCsvRequest {
            csv_file: PathBuf::from("points.csv"),
            variable: "height".to_string(),
            georeference: geo,
            output_raster: PathBuf::from("out.tif"),
        };
        let err = req.build().unwrap_err();
        assert!(matches!(err, Error::ConflictingParameters { .. }));
    }
}
