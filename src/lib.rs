#![doc = r#"
LANDPRO — a typed front-end for an external landscape-metrics analysis engine.

This crate turns high-level treatment requests (sliding/selected/grid window
metric scans, whole-map summaries, classifications, algebraic combinations,
clusterings, distance transforms, raster generation, and composite ecological
procedures such as the bocage-grain pipeline) into validated `key=value`
properties records, serializes them, and launches the pre-built engine
artifact as a synchronous subprocess. All raster I/O and metric computation
happens inside the engine; this crate owns the configuration contract.

Stability
---------
The public library API is experimental in initial releases. It powers the
LANDPRO CLI and can be embedded in your own Rust applications, but may evolve
as the crate stabilizes. Breaking changes can occur.

Requirements
------------
- A Java runtime to launch the engine artifact (resolved from the settings
  store or PATH; see [`runtime`]).
- The engine jar, bundled next to the executable or registered via the
  `engine_path` setting.

Quick start: build a properties file
------------------------------------
```rust,no_run
use landpro::{DistanceType, SlidingRequest, WindowOptions, api};

fn main() -> landpro::Result<()> {
    let mut window = WindowOptions::new(
        ["SHDI".to_string(), "HET".to_string()],
        [51, 101],
    );
    window.distance_type = Some(DistanceType::FastGaussian);

    let request = SlidingRequest::new("land.tif", window);
    let path = api::build_properties(&request, None)?;
    println!("properties written to {}", path.display());
    Ok(())
}
```

Run a composite procedure end to end
------------------------------------
```rust,no_run
use std::path::PathBuf;
use landpro::GrainBocagerRequest;
use landpro::api::Session;

fn main() -> landpro::Result<()> {
    let mut request = GrainBocagerRequest::new("wood_height.tif", "out/");
    request.grain_raster = Some(PathBuf::from("out/grain.tif"));

    // Builds the record, serializes it to a scratch file, launches the
    // engine, and surfaces its exit status.
    Session::new().run(&request)
}
```

Query the metrics catalog
-------------------------
```rust
use landpro::catalog::MetricsCatalog;

let catalog = MetricsCatalog::bundled().unwrap();
let value_metrics = catalog.filter(Some("value"), None);
assert!(value_metrics.iter().any(|m| m.identifier == "SHDI"));
```

Error handling
--------------
All public functions return [`Result`]; match on [`Error`] to handle specific
cases. Validation errors (`MissingParameter`, `ConflictingParameters`) fire
before any file is written; a non-zero engine exit comes back as
`EngineExit { code }` and is never retried.

Useful modules
--------------
- [`api`] — high-level entry points (`Session`, `build_properties`).
- [`core`] — the value model, properties record, and per-kind builders.
- [`catalog`] — the read-only metrics reference table.
- [`runtime`] / [`settings`] — runtime resolution and the persistent store.
- [`dispatch`] — the subprocess dispatcher.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod catalog;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod properties;
pub mod runtime;
pub mod settings;
pub mod types;

// Curated public API surface
// Types
pub use error::{Error, Result};
pub use types::{ClusterDistance, DistanceType, TreatmentKind, WindowShape};

// Record model
pub use crate::core::record::{PropertiesRecord, Value};

// Builders
pub use crate::core::builder::{
    ClassDomain, ClassificationRequest, ClusterRequest, CombineRequest, DistanceRequest,
    EcolandscapeRequest, EphestiaRequest, ErosionRequest, Georeference, GrainBocagerRequest,
    GridExtent, GridRequest, MapRequest, RasterFromCsvRequest, RasterFromShapefileRequest,
    SearchAndReplaceRequest, SelectedRequest, SlidingRequest, TreatmentRequest, WindowOptions,
};

// Catalog
pub use catalog::{MetricDescriptor, MetricsCatalog, list_metrics};

// Settings and runtime resolution
pub use runtime::{ENGINE_KEY, RUNTIME_KEY, RuntimeLocator};
pub use settings::{
    FileBackend, MemoryBackend, SettingsBackend, SettingsStore, default_settings_path,
};

// Serializer and dispatcher
pub use dispatch::Dispatcher;
pub use properties::write_record;

// High-level API re-exports
pub use api::{Session, build_properties};
