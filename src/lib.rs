//! Zoomable circle-packing chart engine.
//!
//! Converts a weighted hierarchy into nested, non-overlapping circles, splits
//! each circle's outline into pie-style angular sectors, and drives smooth
//! camera transitions between focus nodes. Rendering, input handling, and
//! color scales live outside this crate: a renderer consumes the packed
//! snapshot, the per-frame arc geometry, and the camera's view and label
//! states.
//!
//! ```no_run
//! use zoompack::config::ChartConfig;
//! use zoompack::domain::{augment, pack, Camera, Hierarchy};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ChartConfig::default();
//! let input = std::fs::read_to_string("flare.json")?;
//! let hierarchy = Hierarchy::from_json_str(&input, &config.pie_source_field)?;
//! let packed = pack(&hierarchy, &config)?;
//! let sectors = augment(&packed);
//! let camera = Camera::new(&packed, &config);
//! # let _ = (sectors, camera);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use config::ChartConfig;
pub use domain::{
    augment, pack, ring, Camera, Circle, Hierarchy, LabelState, LayoutError, NodeId, NodeKind,
    PackedNode, PackedTree, Ring, SectorNode, SectorSpec, TransitionError, TransitionSpeed,
    ZoomView,
};
