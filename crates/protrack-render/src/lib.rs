//! Rendering backends for protrack scenes.

pub mod palette;
pub mod svg_export;

pub use palette::CategoryPalette;
pub use svg_export::{SvgOptions, SvgRenderer};
