//! Vertical placement of features inside their protein's track.

use crate::error::{LayoutError, LayoutResult};
use protrack_protocol::{Band, FeatureRow, FeatureType};
use std::collections::BTreeMap;

const CHAIN_HALF_HEIGHT: f64 = 0.2;
const OVERLAY_HALF_HEIGHT: f64 = 0.25;
/// Phosphorylation sites sit above the track center.
const POINT_OFFSET: f64 = 0.25;

/// Half of the band height a feature type occupies. Chains are slimmer than
/// overlays so the backbone stays visible around overlay rectangles.
pub fn half_height(feature_type: FeatureType) -> f64 {
    match feature_type {
        FeatureType::Chain => CHAIN_HALF_HEIGHT,
        FeatureType::Domain
        | FeatureType::Region
        | FeatureType::Motif
        | FeatureType::Repeat
        | FeatureType::TopoDom
        | FeatureType::Transmem => OVERLAY_HALF_HEIGHT,
    }
}

/// Tracks known from the CHAIN rows of a table, keyed by `order`, with the
/// protein length of each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackLayout {
    tracks: BTreeMap<u32, i64>,
}

impl TrackLayout {
    pub fn from_rows(rows: &[FeatureRow]) -> Self {
        let tracks = rows
            .iter()
            .filter(|row| row.is_chain())
            .map(|row| (row.order, row.length))
            .collect();
        Self { tracks }
    }

    pub fn band_for(&self, feature_type: FeatureType, order: u32) -> LayoutResult<Band> {
        self.check_track(order)?;
        let half = half_height(feature_type);
        let center = order as f64;
        Ok(Band {
            ymin: center - half,
            ymax: center + half,
        })
    }

    pub fn point_offset_for(&self, order: u32) -> LayoutResult<f64> {
        self.check_track(order)?;
        Ok(order as f64 + POINT_OFFSET)
    }

    pub fn length_of(&self, order: u32) -> LayoutResult<i64> {
        self.tracks
            .get(&order)
            .copied()
            .ok_or(LayoutError::UnknownTrack { order })
    }

    pub fn orders(&self) -> impl Iterator<Item = u32> + '_ {
        self.tracks.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    fn check_track(&self, order: u32) -> LayoutResult<()> {
        if self.tracks.contains_key(&order) {
            Ok(())
        } else {
            Err(LayoutError::UnknownTrack { order })
        }
    }
}
