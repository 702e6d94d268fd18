//! Shared machine-readable contracts between the protrack layout engine and
//! its rendering backends.
//!
//! Coordinates are expressed in data space: `x` is a residue position and
//! `y` is a track index (`order`). Backends own the mapping to pixels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Annotated feature kinds understood by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    Chain,
    Domain,
    Region,
    Motif,
    Repeat,
    TopoDom,
    Transmem,
}

impl FeatureType {
    pub const ALL: [FeatureType; 7] = [
        FeatureType::Chain,
        FeatureType::Domain,
        FeatureType::Region,
        FeatureType::Motif,
        FeatureType::Repeat,
        FeatureType::TopoDom,
        FeatureType::Transmem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Chain => "CHAIN",
            FeatureType::Domain => "DOMAIN",
            FeatureType::Region => "REGION",
            FeatureType::Motif => "MOTIF",
            FeatureType::Repeat => "REPEAT",
            FeatureType::TopoDom => "TOPO_DOM",
            FeatureType::Transmem => "TRANSMEM",
        }
    }

    /// Parses the upper-case UniProt feature key. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|t| t.as_str() == key)
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One annotated feature of one protein.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    #[serde(default)]
    pub description: String,
    pub begin: Option<i64>,
    pub end: Option<i64>,
    pub length: i64,
    #[serde(default)]
    pub accession: String,
    #[serde(default, rename = "entryName")]
    pub entry_name: String,
    #[serde(default)]
    pub taxid: String,
    pub order: u32,
}

impl FeatureRow {
    pub fn new(feature_type: FeatureType, order: u32, begin: i64, end: i64, length: i64) -> Self {
        Self {
            feature_type,
            description: String::new(),
            begin: Some(begin),
            end: Some(end),
            length,
            accession: String::new(),
            entry_name: String::new(),
            taxid: String::new(),
            order,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_identity(
        mut self,
        accession: impl Into<String>,
        entry_name: impl Into<String>,
        taxid: impl Into<String>,
    ) -> Self {
        self.accession = accession.into();
        self.entry_name = entry_name.into();
        self.taxid = taxid.into();
        self
    }

    pub fn is_chain(&self) -> bool {
        self.feature_type == FeatureType::Chain
    }
}

/// A phosphorylated residue, derived from modified-residue annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhosphoSite {
    pub order: u32,
    pub begin: i64,
}

impl PhosphoSite {
    pub fn end(&self) -> i64 {
        self.begin
    }
}

/// Data-space bounds shared by every track on one plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasFrame {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl CanvasFrame {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Vertical extent occupied by a feature inside its track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub ymin: f64,
    pub ymax: f64,
}

impl Band {
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

/// Fill or outline color of a primitive.
///
/// `Category` keys are resolved to concrete colors by the backend, using one
/// mapping for the whole scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paint {
    Color(String),
    Category(String),
}

impl Paint {
    pub fn color(color: impl Into<String>) -> Self {
        Paint::Color(color.into())
    }

    pub fn category(key: impl Into<String>) -> Self {
        Paint::Category(key.into())
    }

    pub fn category_key(&self) -> Option<&str> {
        match self {
            Paint::Category(key) => Some(key),
            Paint::Color(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_svg(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Rect {
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
        fill: Paint,
        outline: Paint,
    },
    Point {
        x: f64,
        y: f64,
        fill: Paint,
        outline: Paint,
    },
    Label {
        x: f64,
        y: f64,
        text: String,
        size: f64,
        anchor: TextAnchor,
    },
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Rect { .. } => PrimitiveKind::Rect,
            Primitive::Point { .. } => PrimitiveKind::Point,
            Primitive::Label { .. } => PrimitiveKind::Label,
        }
    }

    pub fn fill(&self) -> Option<&Paint> {
        match self {
            Primitive::Rect { fill, .. } | Primitive::Point { fill, .. } => Some(fill),
            Primitive::Label { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Rect,
    Point,
    Label,
}

/// Which builder produced a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Chains,
    Domains,
    Regions,
    Motifs,
    Repeats,
    ReceptorDomains,
    Phospho,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Chains => "chains",
            LayerKind::Domains => "domains",
            LayerKind::Regions => "regions",
            LayerKind::Motifs => "motifs",
            LayerKind::Repeats => "repeats",
            LayerKind::ReceptorDomains => "receptor_domains",
            LayerKind::Phospho => "phospho",
        }
    }
}

/// Stroke and marker attributes shared by all primitives of one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    pub stroke_width: f64,
    pub point_size: f64,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            stroke_width: 0.5,
            point_size: 2.0,
        }
    }
}

/// A homogeneous set of primitives of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub source: LayerKind,
    pub primitive_kind: PrimitiveKind,
    pub style: LayerStyle,
    pub primitives: Vec<Primitive>,
}

impl Layer {
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }
}

/// One entry of a scene in drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum SceneLayer<'a> {
    Canvas(&'a CanvasFrame),
    Shapes(&'a Layer),
}

/// A canvas plus shape layers in drawing order. The canvas is always drawn
/// first; later layers paint over earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    frame: CanvasFrame,
    layers: Vec<Layer>,
}

impl Scene {
    pub fn new(frame: CanvasFrame) -> Self {
        Self {
            frame,
            layers: vec![],
        }
    }

    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn frame(&self) -> &CanvasFrame {
        &self.frame
    }

    pub fn draw_order(&self) -> impl Iterator<Item = SceneLayer<'_>> {
        std::iter::once(SceneLayer::Canvas(&self.frame))
            .chain(self.layers.iter().map(SceneLayer::Shapes))
    }

    pub fn shape_layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Category keys in first-seen order, without duplicates.
    pub fn category_keys(&self) -> Vec<&str> {
        let mut ret: Vec<&str> = vec![];
        for primitive in self.layers.iter().flat_map(|layer| layer.primitives.iter()) {
            if let Some(key) = primitive.fill().and_then(Paint::category_key) {
                if !ret.contains(&key) {
                    ret.push(key);
                }
            }
        }
        ret
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
