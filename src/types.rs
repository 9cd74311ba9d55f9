//! Shared types and enums used across LANDPRO.
//! Includes `TreatmentKind`, `DistanceType`, `WindowShape`, and `ClusterDistance`.
//! The `Display` impls yield the exact literals the engine expects in a
//! properties record.
use serde::{Deserialize, Serialize};

/// Every treatment the engine understands, including the composite
/// procedure kinds whose final `treatment=` value is a derived sub-treatment.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum TreatmentKind {
    Sliding,
    Selected,
    Grid,
    Map,
    SearchAndReplace,
    Classification,
    Combine,
    Cluster,
    Distance,
    RasterFromCsv,
    RasterFromShapefile,
    GrainBocager,
    Ecolandscape,
    Erosion,
    EphestiaToulouse,
}

impl std::fmt::Display for TreatmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TreatmentKind::Sliding => "sliding",
            TreatmentKind::Selected => "selected",
            TreatmentKind::Grid => "grid",
            TreatmentKind::Map => "map",
            TreatmentKind::SearchAndReplace => "search_and_replace",
            TreatmentKind::Classification => "classification",
            TreatmentKind::Combine => "combine",
            TreatmentKind::Cluster => "cluster",
            TreatmentKind::Distance => "distance",
            TreatmentKind::RasterFromCsv => "raster_from_csv",
            TreatmentKind::RasterFromShapefile => "raster_from_shapefile",
            TreatmentKind::GrainBocager => "grain_bocager",
            TreatmentKind::Ecolandscape => "ecolandscape",
            TreatmentKind::Erosion => "erosion",
            TreatmentKind::EphestiaToulouse => "ephestia_toulouse",
        };
        write!(f, "{}", s)
    }
}

/// How window distances are computed by the engine. `Weighted` requires a
/// weighting-function string; supplying a function upgrades any other choice
/// to `Weighted` (see the builder derivation rules).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum DistanceType {
    Threshold,
    Euclidian,
    Functional,
    Weighted,
    FastGaussian,
    FastSquare,
}

impl std::fmt::Display for DistanceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DistanceType::Threshold => "THRESHOLD",
            DistanceType::Euclidian => "EUCLIDIAN",
            DistanceType::Functional => "FUNCTIONAL",
            DistanceType::Weighted => "WEIGHTED",
            DistanceType::FastGaussian => "FAST_GAUSSIAN",
            DistanceType::FastSquare => "FAST_SQUARE",
        };
        write!(f, "{}", s)
    }
}

/// Analysis window footprint. `Functional` only makes sense with a friction
/// raster; without one the builders fall back to `Circle`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum WindowShape {
    Circle,
    Square,
    Functional,
}

impl std::fmt::Display for WindowShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WindowShape::Circle => "CIRCLE",
            WindowShape::Square => "SQUARE",
            WindowShape::Functional => "FUNCTIONAL",
        };
        write!(f, "{}", s)
    }
}

/// Distance model for the cluster treatment. The engine accepts nothing
/// beyond these two, so the invalid combinations are unrepresentable.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum ClusterDistance {
    Euclidian,
    Functional,
}

impl std::fmt::Display for ClusterDistance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ClusterDistance::Euclidian => "EUCLIDIAN",
            ClusterDistance::Functional => "FUNCTIONAL",
        };
        write!(f, "{}", s)
    }
}
