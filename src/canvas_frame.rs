//! Data-space bounds for a stack of protein tracks.

use crate::error::{LayoutError, LayoutResult};
use protrack_protocol::{CanvasFrame, FeatureRow};

/// Share of the longest sequence reserved left of position 0 for track labels.
const LEFT_MARGIN_FRACTION: f64 = 0.2;
const RIGHT_MARGIN_FRACTION: f64 = 0.1;
/// Padding above the top track and below the bottom one, in track units.
const TRACK_PADDING: f64 = 0.5;

/// Computes the frame shared by all tracks.
///
/// The x-range depends only on the largest `end` among all rows, so proteins
/// of different lengths stay comparable on one plot. Missing `end` values
/// are ignored.
pub fn compute_frame(rows: &[FeatureRow]) -> LayoutResult<CanvasFrame> {
    if !rows.iter().any(FeatureRow::is_chain) {
        return Err(LayoutError::EmptyInput);
    }

    let mut max_end: Option<i64> = None;
    for row in rows {
        let Some(end) = row.end else {
            continue;
        };
        if end < 0 {
            return Err(LayoutError::invalid_coordinate(
                row.feature_type,
                row.order,
                format!("end {end} is negative"),
            ));
        }
        max_end = Some(max_end.map_or(end, |m| m.max(end)));
    }
    let Some(max_end) = max_end else {
        return Err(LayoutError::invalid_coordinate(
            "table",
            0,
            "no row has an end coordinate",
        ));
    };
    let max_order = rows.iter().map(|row| row.order).max().unwrap_or(0);

    let max_end = max_end as f64;
    Ok(CanvasFrame {
        x_min: -LEFT_MARGIN_FRACTION * max_end,
        x_max: max_end + max_end * RIGHT_MARGIN_FRACTION,
        y_min: TRACK_PADDING,
        y_max: max_order as f64 + TRACK_PADDING,
    })
}
