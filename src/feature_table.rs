//! Validated, read-only table of annotated protein features.

use crate::{
    canvas_frame::compute_frame,
    error::{LayoutError, LayoutResult},
    track_layout::TrackLayout,
};
use itertools::Itertools;
use protrack_protocol::{CanvasFrame, FeatureRow, FeatureType};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    /// Validates `rows` and wraps them.
    ///
    /// Track indices start at 1. Every track must have exactly one CHAIN
    /// row, every row on a track must agree with its chain on `length`,
    /// `accession`, `entryName` and `taxid`, and present coordinates must
    /// satisfy `1 <= begin <= end <= length`.
    pub fn new(rows: Vec<FeatureRow>) -> LayoutResult<Self> {
        if let Some(row) = rows.iter().find(|row| row.order == 0) {
            return Err(LayoutError::invalid_coordinate(
                row.feature_type,
                0,
                "track index must be at least 1",
            ));
        }

        let mut chains: HashMap<u32, &FeatureRow> = HashMap::new();
        for row in rows.iter().filter(|row| row.is_chain()) {
            if chains.insert(row.order, row).is_some() {
                return Err(LayoutError::DuplicateTrack { order: row.order });
            }
        }
        if chains.is_empty() {
            return Err(LayoutError::EmptyInput);
        }

        for row in &rows {
            let chain = chains
                .get(&row.order)
                .ok_or(LayoutError::UnknownTrack { order: row.order })?;
            check_same_protein(row, chain)?;
            check_coordinates(row)?;
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn rows_of(&self, feature_type: FeatureType) -> impl Iterator<Item = &FeatureRow> {
        self.rows
            .iter()
            .filter(move |row| row.feature_type == feature_type)
    }

    pub fn chains(&self) -> impl Iterator<Item = &FeatureRow> {
        self.rows_of(FeatureType::Chain)
    }

    pub fn max_order(&self) -> u32 {
        self.rows.iter().map(|row| row.order).max().unwrap_or(0)
    }

    /// Distinct track indices, ascending.
    pub fn orders(&self) -> Vec<u32> {
        self.chains().map(|row| row.order).sorted().collect()
    }

    pub fn frame(&self) -> LayoutResult<CanvasFrame> {
        compute_frame(&self.rows)
    }

    pub fn track_layout(&self) -> TrackLayout {
        TrackLayout::from_rows(&self.rows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn check_same_protein(row: &FeatureRow, chain: &FeatureRow) -> LayoutResult<()> {
    let fields = [
        ("length", chain.length.to_string(), row.length.to_string()),
        ("accession", chain.accession.clone(), row.accession.clone()),
        ("entryName", chain.entry_name.clone(), row.entry_name.clone()),
        ("taxid", chain.taxid.clone(), row.taxid.clone()),
    ];
    for (field, expected, found) in fields {
        if expected != found {
            return Err(LayoutError::InconsistentProtein {
                order: row.order,
                field,
                expected,
                found,
            });
        }
    }
    Ok(())
}

fn check_coordinates(row: &FeatureRow) -> LayoutResult<()> {
    let invalid =
        |reason: String| LayoutError::invalid_coordinate(row.feature_type, row.order, reason);
    if row.length < 1 {
        return Err(invalid(format!("length {} is not positive", row.length)));
    }
    for (name, value) in [("begin", row.begin), ("end", row.end)] {
        if let Some(value) = value {
            if value < 1 || value > row.length {
                return Err(invalid(format!(
                    "{name} {value} outside 1..={}",
                    row.length
                )));
            }
        }
    }
    if let (Some(begin), Some(end)) = (row.begin, row.end) {
        if begin > end {
            return Err(invalid(format!("begin {begin} > end {end}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(order: u32, length: i64) -> FeatureRow {
        FeatureRow::new(FeatureType::Chain, order, 1, length, length)
            .with_identity(format!("P{order:05}"), format!("PROT{order}"), "9606")
    }

    fn feature(t: FeatureType, order: u32, begin: i64, end: i64, length: i64) -> FeatureRow {
        FeatureRow::new(t, order, begin, end, length).with_identity(
            format!("P{order:05}"),
            format!("PROT{order}"),
            "9606",
        )
    }

    #[test]
    fn accepts_consistent_table() {
        let table = FeatureTable::new(vec![
            chain(2, 300),
            chain(1, 500),
            feature(FeatureType::Domain, 1, 50, 120, 500),
            feature(FeatureType::Repeat, 2, 10, 40, 300),
        ])
        .unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.orders(), vec![1, 2]);
        assert_eq!(table.max_order(), 2);
        assert_eq!(table.rows_of(FeatureType::Domain).count(), 1);
        assert_eq!(table.rows_of(FeatureType::Motif).count(), 0);
    }

    #[test]
    fn rejects_missing_chain() {
        assert!(matches!(
            FeatureTable::new(vec![]),
            Err(LayoutError::EmptyInput)
        ));
        assert!(matches!(
            FeatureTable::new(vec![feature(FeatureType::Domain, 1, 1, 2, 10)]),
            Err(LayoutError::EmptyInput)
        ));
    }

    #[test]
    fn rejects_orphan_and_duplicate_tracks() {
        assert!(matches!(
            FeatureTable::new(vec![chain(1, 100), feature(FeatureType::Motif, 2, 1, 2, 100)]),
            Err(LayoutError::UnknownTrack { order: 2 })
        ));
        assert!(matches!(
            FeatureTable::new(vec![chain(1, 100), chain(1, 100)]),
            Err(LayoutError::DuplicateTrack { order: 1 })
        ));
    }

    #[test]
    fn rejects_bad_coordinates() {
        let reversed = feature(FeatureType::Region, 1, 80, 20, 100);
        assert!(matches!(
            FeatureTable::new(vec![chain(1, 100), reversed]),
            Err(LayoutError::InvalidCoordinate { .. })
        ));
        let beyond = feature(FeatureType::Region, 1, 80, 101, 100);
        assert!(matches!(
            FeatureTable::new(vec![chain(1, 100), beyond]),
            Err(LayoutError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn rejects_inconsistent_length() {
        let other_length = feature(FeatureType::Domain, 1, 1, 10, 90);
        assert!(matches!(
            FeatureTable::new(vec![chain(1, 100), other_length]),
            Err(LayoutError::InconsistentProtein { field: "length", .. })
        ));
    }

    #[test]
    fn rejects_inconsistent_identity() {
        let renamed = feature(FeatureType::Domain, 1, 1, 10, 100).with_identity(
            "P00001",
            "OTHER_HUMAN",
            "9606",
        );
        assert!(matches!(
            FeatureTable::new(vec![chain(1, 100), renamed]),
            Err(LayoutError::InconsistentProtein { field: "entryName", .. })
        ));
        let mouse = feature(FeatureType::Domain, 1, 1, 10, 100).with_identity(
            "P00001",
            "PROT1",
            "10090",
        );
        assert!(matches!(
            FeatureTable::new(vec![chain(1, 100), mouse]),
            Err(LayoutError::InconsistentProtein { field: "taxid", .. })
        ));
    }

    #[test]
    fn rejects_track_zero() {
        let result = FeatureTable::new(vec![chain(0, 100)]);
        assert!(matches!(
            result,
            Err(LayoutError::InvalidCoordinate { order: 0, .. })
        ));
        assert!(matches!(
            FeatureTable::new(vec![chain(1, 100), feature(FeatureType::Motif, 0, 1, 2, 100)]),
            Err(LayoutError::InvalidCoordinate { order: 0, .. })
        ));
    }

    #[test]
    fn frame_height_matches_track_count() {
        let table = FeatureTable::new(vec![chain(1, 100), chain(2, 80)]).unwrap();
        assert_eq!(table.frame().unwrap().height(), table.orders().len() as f64);
    }

    #[test]
    fn missing_coordinates_pass_validation() {
        let mut open_ended = feature(FeatureType::Region, 1, 5, 5, 100);
        open_ended.end = None;
        assert!(FeatureTable::new(vec![chain(1, 100), open_ended]).is_ok());
    }
}
