//! Per-layer drawing options and the persisted draw settings.
//!
//! A [`LayerRequest`] only carries overrides; defaults for the layer kind are
//! applied when the request is resolved, so a JSON config can name just the
//! options it wants to change.

use crate::error::LayoutResult;
use protrack_protocol::{FeatureRow, LayerKind};
use protrack_render::SvgOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a label's text comes from.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSource {
    EntryName,
    Accession,
    Description,
    Taxid,
    Fixed(String),
    #[serde(skip)]
    Custom(fn(&FeatureRow) -> String),
}

impl LabelSource {
    pub fn text_for(&self, row: &FeatureRow) -> String {
        match self {
            LabelSource::EntryName => row.entry_name.clone(),
            LabelSource::Accession => row.accession.clone(),
            LabelSource::Description => row.description.clone(),
            LabelSource::Taxid => row.taxid.clone(),
            LabelSource::Fixed(text) => text.clone(),
            LabelSource::Custom(f) => f(row),
        }
    }
}

impl fmt::Debug for LabelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelSource::EntryName => f.write_str("EntryName"),
            LabelSource::Accession => f.write_str("Accession"),
            LabelSource::Description => f.write_str("Description"),
            LabelSource::Taxid => f.write_str("Taxid"),
            LabelSource::Fixed(text) => f.debug_tuple("Fixed").field(text).finish(),
            LabelSource::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillSpec {
    /// One color category per distinct description.
    ByDescription,
    Color(String),
}

/// Fully resolved options for one layer.
#[derive(Debug, Clone)]
pub struct LayerOptions {
    pub outline_color: String,
    pub fill: FillSpec,
    pub show_labels: bool,
    pub label_size: f64,
    pub point_size: f64,
    pub stroke_width: f64,
    pub label_source: LabelSource,
}

impl LayerOptions {
    pub fn defaults_for(kind: LayerKind) -> Self {
        let base = Self {
            outline_color: "black".to_string(),
            fill: FillSpec::ByDescription,
            show_labels: false,
            label_size: 4.0,
            point_size: 2.0,
            stroke_width: 0.5,
            label_source: LabelSource::Description,
        };
        match kind {
            LayerKind::Chains => Self {
                fill: FillSpec::Color("grey".to_string()),
                show_labels: true,
                label_source: LabelSource::EntryName,
                ..base
            },
            LayerKind::Domains => Self {
                show_labels: true,
                ..base
            },
            LayerKind::Regions | LayerKind::Motifs | LayerKind::ReceptorDomains => base,
            LayerKind::Repeats => Self {
                outline_color: "dimgrey".to_string(),
                fill: FillSpec::Color("dimgrey".to_string()),
                show_labels: true,
                label_size: 2.0,
                ..base
            },
            LayerKind::Phospho => Self {
                fill: FillSpec::Color("yellow".to_string()),
                ..base
            },
        }
    }
}

/// Caller overrides for one layer; unset fields keep the layer defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_labels: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_source: Option<LabelSource>,
}

impl LayerOverrides {
    pub fn resolve(&self, kind: LayerKind) -> LayerOptions {
        let defaults = LayerOptions::defaults_for(kind);
        LayerOptions {
            outline_color: self.outline_color.clone().unwrap_or(defaults.outline_color),
            fill: self.fill.clone().unwrap_or(defaults.fill),
            show_labels: self.show_labels.unwrap_or(defaults.show_labels),
            label_size: self.label_size.unwrap_or(defaults.label_size),
            point_size: self.point_size.unwrap_or(defaults.point_size),
            stroke_width: self.stroke_width.unwrap_or(defaults.stroke_width),
            label_source: self.label_source.clone().unwrap_or(defaults.label_source),
        }
    }
}

/// One layer to draw, in the position it should be stacked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerRequest {
    pub kind: LayerKind,
    #[serde(flatten)]
    pub overrides: LayerOverrides,
}

impl LayerRequest {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            overrides: LayerOverrides::default(),
        }
    }

    pub fn show_labels(mut self, show: bool) -> Self {
        self.overrides.show_labels = Some(show);
        self
    }

    pub fn label_size(mut self, size: f64) -> Self {
        self.overrides.label_size = Some(size);
        self
    }

    pub fn point_size(mut self, size: f64) -> Self {
        self.overrides.point_size = Some(size);
        self
    }

    pub fn outline_color(mut self, color: impl Into<String>) -> Self {
        self.overrides.outline_color = Some(color.into());
        self
    }

    pub fn fill(mut self, fill: FillSpec) -> Self {
        self.overrides.fill = Some(fill);
        self
    }

    pub fn label_source(mut self, source: LabelSource) -> Self {
        self.overrides.label_source = Some(source);
        self
    }

    pub fn options(&self) -> LayerOptions {
        self.overrides.resolve(self.kind)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawSettings {
    pub layers: Vec<LayerRequest>,
    pub svg: SvgOptions,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            layers: vec![
                LayerRequest::new(LayerKind::Chains),
                LayerRequest::new(LayerKind::Domains),
                LayerRequest::new(LayerKind::Regions),
                LayerRequest::new(LayerKind::Motifs),
                LayerRequest::new(LayerKind::Repeats),
                LayerRequest::new(LayerKind::ReceptorDomains),
                LayerRequest::new(LayerKind::Phospho),
            ],
            svg: SvgOptions::default(),
        }
    }
}

impl DrawSettings {
    pub fn from_json_str(json: &str) -> LayoutResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_path(path: &str) -> LayoutResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn save_to_path(&self, path: &str) -> LayoutResult<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
