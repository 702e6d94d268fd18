//! One pure builder per feature type, turning table rows into primitives.
//!
//! Every builder accepts the full, unfiltered row set and keeps only the
//! rows of its own type(s). A type with no rows yields empty geometry.

use crate::{
    error::{LayoutError, LayoutResult},
    settings::{FillSpec, LayerOptions},
    track_layout::TrackLayout,
};
use protrack_protocol::{FeatureRow, FeatureType, Paint, PhosphoSite, Primitive, TextAnchor};

/// Chain labels are right-aligned just left of residue 1.
pub const CHAIN_LABEL_X: f64 = -10.0;
pub const TRANSMEM_LABEL: &str = "TM";
const PHOSPHO_CATEGORY: &str = "Phosphorylation";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub shapes: Vec<Primitive>,
    pub labels: Vec<Primitive>,
}

impl Geometry {
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.labels.is_empty()
    }

    fn push_label(
        &mut self,
        x: f64,
        y: f64,
        text: String,
        options: &LayerOptions,
        anchor: TextAnchor,
    ) {
        if text.trim().is_empty() {
            return;
        }
        self.labels.push(Primitive::Label {
            x,
            y,
            text,
            size: options.label_size,
            anchor,
        });
    }
}

pub fn chains(
    rows: &[FeatureRow],
    layout: &TrackLayout,
    options: &LayerOptions,
) -> LayoutResult<Geometry> {
    let mut ret = Geometry::default();
    for row in of_type(rows, &[FeatureType::Chain]) {
        ret.shapes.push(rect(row, layout, options)?);
        if options.show_labels {
            ret.push_label(
                CHAIN_LABEL_X,
                row.order as f64,
                options.label_source.text_for(row),
                options,
                TextAnchor::End,
            );
        }
    }
    Ok(ret)
}

pub fn domains(
    rows: &[FeatureRow],
    layout: &TrackLayout,
    options: &LayerOptions,
) -> LayoutResult<Geometry> {
    overlay(rows, &[FeatureType::Domain], layout, options, |row| {
        options.label_source.text_for(row)
    })
}

pub fn regions(
    rows: &[FeatureRow],
    layout: &TrackLayout,
    options: &LayerOptions,
) -> LayoutResult<Geometry> {
    overlay(rows, &[FeatureType::Region], layout, options, |row| {
        options.label_source.text_for(row)
    })
}

pub fn motifs(
    rows: &[FeatureRow],
    layout: &TrackLayout,
    options: &LayerOptions,
) -> LayoutResult<Geometry> {
    overlay(rows, &[FeatureType::Motif], layout, options, |row| {
        options.label_source.text_for(row)
    })
}

/// Repeat numbering is not part of the label: every digit is removed.
pub fn repeats(
    rows: &[FeatureRow],
    layout: &TrackLayout,
    options: &LayerOptions,
) -> LayoutResult<Geometry> {
    overlay(rows, &[FeatureType::Repeat], layout, options, |row| {
        strip_digits(&options.label_source.text_for(row))
    })
}

/// Topological domains and transmembrane segments. Transmembrane labels
/// always read "TM".
pub fn receptor_domains(
    rows: &[FeatureRow],
    layout: &TrackLayout,
    options: &LayerOptions,
) -> LayoutResult<Geometry> {
    overlay(
        rows,
        &[FeatureType::TopoDom, FeatureType::Transmem],
        layout,
        options,
        |row| match row.feature_type {
            FeatureType::Transmem => TRANSMEM_LABEL.to_string(),
            _ => options.label_source.text_for(row),
        },
    )
}

pub fn phospho_sites(
    sites: &[PhosphoSite],
    layout: &TrackLayout,
    options: &LayerOptions,
) -> LayoutResult<Geometry> {
    let mut ret = Geometry::default();
    for site in sites {
        let y = layout.point_offset_for(site.order)?;
        let length = layout.length_of(site.order)?;
        if site.begin < 1 || site.begin > length {
            return Err(LayoutError::invalid_coordinate(
                "PHOSPHO",
                site.order,
                format!("position {} outside 1..={length}", site.begin),
            ));
        }
        ret.shapes.push(Primitive::Point {
            x: site.begin as f64,
            y,
            fill: fill_paint(&options.fill, PHOSPHO_CATEGORY),
            outline: Paint::color(options.outline_color.clone()),
        });
    }
    Ok(ret)
}

pub fn strip_digits(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_digit()).collect()
}

fn of_type<'a>(
    rows: &'a [FeatureRow],
    types: &'a [FeatureType],
) -> impl Iterator<Item = &'a FeatureRow> {
    rows.iter().filter(|row| types.contains(&row.feature_type))
}

fn overlay(
    rows: &[FeatureRow],
    types: &[FeatureType],
    layout: &TrackLayout,
    options: &LayerOptions,
    label_text: impl Fn(&FeatureRow) -> String,
) -> LayoutResult<Geometry> {
    let mut ret = Geometry::default();
    for row in of_type(rows, types) {
        let shape = rect(row, layout, options)?;
        if options.show_labels {
            if let Primitive::Rect { xmin, xmax, .. } = shape {
                ret.push_label(
                    xmin + (xmax - xmin) / 2.0,
                    row.order as f64,
                    label_text(row),
                    options,
                    TextAnchor::Middle,
                );
            }
        }
        ret.shapes.push(shape);
    }
    Ok(ret)
}

fn rect(row: &FeatureRow, layout: &TrackLayout, options: &LayerOptions) -> LayoutResult<Primitive> {
    let band = layout.band_for(row.feature_type, row.order)?;
    let (begin, end) = span(row, layout)?;
    Ok(Primitive::Rect {
        xmin: begin as f64,
        xmax: end as f64,
        ymin: band.ymin,
        ymax: band.ymax,
        fill: fill_paint(&options.fill, &row.description),
        outline: Paint::color(options.outline_color.clone()),
    })
}

fn span(row: &FeatureRow, layout: &TrackLayout) -> LayoutResult<(i64, i64)> {
    let invalid =
        |reason: String| LayoutError::invalid_coordinate(row.feature_type, row.order, reason);
    let (Some(begin), Some(end)) = (row.begin, row.end) else {
        return Err(invalid("missing begin or end".to_string()));
    };
    if begin < 1 || begin > end {
        return Err(invalid(format!("span {begin}..{end}")));
    }
    let length = layout.length_of(row.order)?;
    if end > length {
        return Err(invalid(format!("end {end} beyond protein length {length}")));
    }
    Ok((begin, end))
}

fn fill_paint(fill: &FillSpec, category: &str) -> Paint {
    match fill {
        FillSpec::ByDescription => Paint::category(category),
        FillSpec::Color(color) => Paint::color(color.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protrack_protocol::LayerKind;

    fn table() -> Vec<FeatureRow> {
        vec![
            FeatureRow::new(FeatureType::Chain, 1, 1, 500, 500)
                .with_identity("P00001", "P1", "9606"),
            FeatureRow::new(FeatureType::Domain, 1, 50, 120, 500).with_description("Kinase"),
            FeatureRow::new(FeatureType::Chain, 2, 1, 300, 300)
                .with_identity("P00002", "P2", "9606"),
            FeatureRow::new(FeatureType::Repeat, 2, 10, 40, 300).with_description("ANK1"),
            FeatureRow::new(FeatureType::Repeat, 2, 41, 70, 300)
                .with_description("ANK 2; approximate"),
            FeatureRow::new(FeatureType::TopoDom, 2, 1, 99, 300).with_description("Extracellular"),
            FeatureRow::new(FeatureType::Transmem, 2, 100, 120, 300).with_description("Helical"),
        ]
    }

    fn opts(kind: LayerKind) -> LayerOptions {
        LayerOptions::defaults_for(kind)
    }

    #[test]
    fn chain_rect_and_label() {
        let rows = table();
        let layout = TrackLayout::from_rows(&rows);
        let g = chains(&rows, &layout, &opts(LayerKind::Chains)).unwrap();
        assert_eq!(g.shapes.len(), 2);
        assert_eq!(
            g.shapes[0],
            Primitive::Rect {
                xmin: 1.0,
                xmax: 500.0,
                ymin: 0.8,
                ymax: 1.2,
                fill: Paint::color("grey"),
                outline: Paint::color("black"),
            }
        );
        assert_eq!(
            g.labels[1],
            Primitive::Label {
                x: -10.0,
                y: 2.0,
                text: "P2".to_string(),
                size: 4.0,
                anchor: TextAnchor::End,
            }
        );
        for shape in &g.shapes {
            let Primitive::Rect { ymin, ymax, .. } = shape else {
                panic!("chains emit rects");
            };
            assert!((ymax - ymin - 0.4).abs() < 1e-9);
        }
    }

    #[test]
    fn domain_is_colored_and_labeled_by_description() {
        let rows = table();
        let layout = TrackLayout::from_rows(&rows);
        let g = domains(&rows, &layout, &opts(LayerKind::Domains)).unwrap();
        assert_eq!(
            g.shapes,
            vec![Primitive::Rect {
                xmin: 50.0,
                xmax: 120.0,
                ymin: 0.75,
                ymax: 1.25,
                fill: Paint::category("Kinase"),
                outline: Paint::color("black"),
            }]
        );
        assert_eq!(
            g.labels,
            vec![Primitive::Label {
                x: 85.0,
                y: 1.0,
                text: "Kinase".to_string(),
                size: 4.0,
                anchor: TextAnchor::Middle,
            }]
        );

        let mut quiet = opts(LayerKind::Domains);
        quiet.show_labels = false;
        assert!(domains(&rows, &layout, &quiet).unwrap().labels.is_empty());
    }

    #[test]
    fn repeat_labels_drop_digits_and_use_fixed_fill() {
        let rows = table();
        let layout = TrackLayout::from_rows(&rows);
        let g = repeats(&rows, &layout, &opts(LayerKind::Repeats)).unwrap();
        let texts: Vec<&str> = g
            .labels
            .iter()
            .map(|l| match l {
                Primitive::Label { text, .. } => text.as_str(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(texts, vec!["ANK", "ANK ; approximate"]);
        assert!(texts.iter().all(|t| !t.chars().any(|c| c.is_ascii_digit())));
        assert!(g
            .shapes
            .iter()
            .all(|s| s.fill() == Some(&Paint::color("dimgrey"))));
    }

    #[test]
    fn transmembrane_label_is_always_tm() {
        let rows = table();
        let layout = TrackLayout::from_rows(&rows);
        let mut options = opts(LayerKind::ReceptorDomains);
        options.show_labels = true;
        let g = receptor_domains(&rows, &layout, &options).unwrap();
        assert_eq!(g.shapes.len(), 2);
        let texts: Vec<String> = g
            .labels
            .iter()
            .filter_map(|l| match l {
                Primitive::Label { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["Extracellular".to_string(), "TM".to_string()]);
        assert_eq!(g.shapes[1].fill(), Some(&Paint::category("Helical")));
    }

    #[test]
    fn absent_types_yield_empty_geometry() {
        let rows = table();
        let layout = TrackLayout::from_rows(&rows);
        assert!(motifs(&rows, &layout, &opts(LayerKind::Motifs)).unwrap().is_empty());
        assert!(regions(&rows, &layout, &opts(LayerKind::Regions)).unwrap().is_empty());
        assert!(phospho_sites(&[], &layout, &opts(LayerKind::Phospho)).unwrap().is_empty());
    }

    #[test]
    fn regions_and_motifs_are_colored_by_description_without_labels() {
        let mut rows = table();
        rows.push(
            FeatureRow::new(FeatureType::Region, 1, 300, 420, 500).with_description("Disordered"),
        );
        rows.push(
            FeatureRow::new(FeatureType::Motif, 2, 280, 290, 300)
                .with_description("Nuclear localization signal"),
        );
        let layout = TrackLayout::from_rows(&rows);

        let g = regions(&rows, &layout, &opts(LayerKind::Regions)).unwrap();
        assert_eq!(
            g.shapes,
            vec![Primitive::Rect {
                xmin: 300.0,
                xmax: 420.0,
                ymin: 0.75,
                ymax: 1.25,
                fill: Paint::category("Disordered"),
                outline: Paint::color("black"),
            }]
        );
        assert!(g.labels.is_empty());

        let g = motifs(&rows, &layout, &opts(LayerKind::Motifs)).unwrap();
        assert_eq!(
            g.shapes,
            vec![Primitive::Rect {
                xmin: 280.0,
                xmax: 290.0,
                ymin: 1.75,
                ymax: 2.25,
                fill: Paint::category("Nuclear localization signal"),
                outline: Paint::color("black"),
            }]
        );
        assert!(g.labels.is_empty());
    }

    #[test]
    fn builders_are_repeatable() {
        let rows = table();
        let layout = TrackLayout::from_rows(&rows);
        let options = opts(LayerKind::Domains);
        assert_eq!(
            domains(&rows, &layout, &options).unwrap(),
            domains(&rows, &layout, &options).unwrap()
        );
    }

    #[test]
    fn phospho_points_sit_above_track() {
        let rows = table();
        let layout = TrackLayout::from_rows(&rows);
        let sites = [PhosphoSite { order: 2, begin: 15 }];
        let g = phospho_sites(&sites, &layout, &opts(LayerKind::Phospho)).unwrap();
        assert_eq!(
            g.shapes,
            vec![Primitive::Point {
                x: 15.0,
                y: 2.25,
                fill: Paint::color("yellow"),
                outline: Paint::color("black"),
            }]
        );
        let stray = [PhosphoSite { order: 9, begin: 15 }];
        assert!(matches!(
            phospho_sites(&stray, &layout, &opts(LayerKind::Phospho)),
            Err(LayoutError::UnknownTrack { order: 9 })
        ));
    }

    #[test]
    fn bad_rows_abort_the_builder() {
        let mut rows = table();
        rows[1].begin = None;
        let layout = TrackLayout::from_rows(&rows);
        assert!(matches!(
            domains(&rows, &layout, &opts(LayerKind::Domains)),
            Err(LayoutError::InvalidCoordinate { .. })
        ));

        let mut rows = table();
        rows[1].order = 5;
        let layout = TrackLayout::from_rows(&rows);
        assert!(matches!(
            domains(&rows, &layout, &opts(LayerKind::Domains)),
            Err(LayoutError::UnknownTrack { order: 5 })
        ));
    }
}
