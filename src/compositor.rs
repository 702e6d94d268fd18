//! Orders built geometry into the layers of a scene.

use crate::{
    error::LayoutResult,
    feature_table::FeatureTable,
    geometry::{self, Geometry},
    settings::{LayerOptions, LayerRequest},
    track_layout::TrackLayout,
};
use protrack_protocol::{
    CanvasFrame, FeatureRow, Layer, LayerKind, LayerStyle, PhosphoSite, PrimitiveKind, Scene,
};
use rayon::prelude::*;
use tracing::debug;

/// Builds every requested layer and stacks them over the canvas in request
/// order: each request adds its shape layer, then its label layer when
/// labels are enabled. Requests for feature types missing from `rows` add
/// empty layers.
///
/// Layers are built in parallel; any error aborts the whole scene, and the
/// error reported is the one of the earliest failing request.
pub fn compose(
    frame: CanvasFrame,
    requests: &[LayerRequest],
    rows: &[FeatureRow],
    sites: &[PhosphoSite],
) -> LayoutResult<Scene> {
    let layout = TrackLayout::from_rows(rows);
    let built: Vec<LayoutResult<Vec<Layer>>> = requests
        .par_iter()
        .map(|request| build_layers(request, rows, sites, &layout))
        .collect();

    let mut scene = Scene::new(frame);
    for layers in built {
        for layer in layers? {
            debug!(
                source = layer.source.as_str(),
                kind = ?layer.primitive_kind,
                primitives = layer.len(),
                "composed layer"
            );
            scene.push(layer);
        }
    }
    Ok(scene)
}

/// Frame, layers and scene for a validated table in one call.
pub fn draw(
    table: &FeatureTable,
    sites: &[PhosphoSite],
    requests: &[LayerRequest],
) -> LayoutResult<Scene> {
    compose(table.frame()?, requests, table.rows(), sites)
}

fn build_layers(
    request: &LayerRequest,
    rows: &[FeatureRow],
    sites: &[PhosphoSite],
    layout: &TrackLayout,
) -> LayoutResult<Vec<Layer>> {
    let options = request.options();
    let geometry = build_geometry(request.kind, rows, sites, layout, &options)?;
    let style = LayerStyle {
        stroke_width: options.stroke_width,
        point_size: options.point_size,
    };
    let shape_kind = match request.kind {
        LayerKind::Phospho => PrimitiveKind::Point,
        _ => PrimitiveKind::Rect,
    };

    let mut ret = vec![Layer {
        source: request.kind,
        primitive_kind: shape_kind,
        style: style.clone(),
        primitives: geometry.shapes,
    }];
    if options.show_labels && request.kind != LayerKind::Phospho {
        ret.push(Layer {
            source: request.kind,
            primitive_kind: PrimitiveKind::Label,
            style,
            primitives: geometry.labels,
        });
    }
    Ok(ret)
}

fn build_geometry(
    kind: LayerKind,
    rows: &[FeatureRow],
    sites: &[PhosphoSite],
    layout: &TrackLayout,
    options: &LayerOptions,
) -> LayoutResult<Geometry> {
    match kind {
        LayerKind::Chains => geometry::chains(rows, layout, options),
        LayerKind::Domains => geometry::domains(rows, layout, options),
        LayerKind::Regions => geometry::regions(rows, layout, options),
        LayerKind::Motifs => geometry::motifs(rows, layout, options),
        LayerKind::Repeats => geometry::repeats(rows, layout, options),
        LayerKind::ReceptorDomains => geometry::receptor_domains(rows, layout, options),
        LayerKind::Phospho => geometry::phospho_sites(sites, layout, options),
    }
}
