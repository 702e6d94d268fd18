//! Layout engine for stacked protein feature diagrams.
//!
//! A [`FeatureTable`] of annotated features is turned into a [`Scene`]: a
//! canvas frame shared by all proteins plus ordered layers of rectangles,
//! points and labels. Backends in `protrack_render` draw the scene.

pub mod canvas_frame;
pub mod compositor;
pub mod error;
pub mod feature_table;
pub mod geometry;
pub mod phospho_sites;
pub mod settings;
pub mod table_io;
pub mod track_layout;

pub use canvas_frame::compute_frame;
pub use compositor::{compose, draw};
pub use error::{LayoutError, LayoutResult};
pub use feature_table::FeatureTable;
pub use phospho_sites::{ModifiedResidue, extract_phospho_sites};
pub use protrack_protocol::{
    Band, CanvasFrame, FeatureRow, FeatureType, Layer, LayerKind, Paint, PhosphoSite, Primitive,
    Scene, SceneLayer, TextAnchor,
};
pub use settings::{DrawSettings, FillSpec, LabelSource, LayerOptions, LayerRequest};
pub use track_layout::TrackLayout;
