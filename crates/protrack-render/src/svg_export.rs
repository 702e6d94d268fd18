use crate::palette::CategoryPalette;
use protrack_protocol::{CanvasFrame, Layer, Primitive, Scene, SceneLayer};
use serde::{Deserialize, Serialize};
use svg::Document;
use svg::node::element::{Circle, Group, Rectangle, Text};

const PAD: f32 = 12.0;
const TITLE_HEIGHT: f32 = 28.0;
const LEGEND_WIDTH: f32 = 180.0;
const LEGEND_ROW_HEIGHT: f32 = 16.0;
const LEGEND_SWATCH: f32 = 10.0;
/// Label sizes are given in the plotting unit of the classic drawing
/// functions (millimetres); this converts to pixels.
const FONT_SCALE: f64 = 2.845;
const POINT_SCALE: f64 = 1.5;
const STROKE_SCALE: f64 = 2.0;
const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgOptions {
    pub width: f32,
    /// Vertical space of one track in pixels.
    pub track_height: f32,
    pub show_legend: bool,
    pub title: Option<String>,
    pub background: String,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            width: 1000.0,
            track_height: 60.0,
            show_legend: true,
            title: None,
            background: "#ffffff".to_string(),
        }
    }
}

/// Maps data coordinates to pixels. Lower track indices end up lower on
/// the canvas.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    frame: CanvasFrame,
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Viewport {
    fn x(&self, x: f64) -> f32 {
        let width = self.frame.width();
        if width <= 0.0 {
            return self.left as f32;
        }
        (self.left + (x - self.frame.x_min) / width * (self.right - self.left)) as f32
    }

    fn y(&self, y: f64) -> f32 {
        let height = self.frame.height();
        if height <= 0.0 {
            return self.bottom as f32;
        }
        (self.bottom - (y - self.frame.y_min) / height * (self.bottom - self.top)) as f32
    }
}

#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    options: SvgOptions,
}

impl SvgRenderer {
    pub fn new(options: SvgOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SvgOptions {
        &self.options
    }

    /// Draws the scene layer by layer; later layers paint over earlier ones.
    pub fn render(&self, scene: &Scene) -> String {
        self.document(scene).to_string()
    }

    pub fn document(&self, scene: &Scene) -> Document {
        let palette = CategoryPalette::for_scene(scene);
        let show_legend = self.options.show_legend && !palette.is_empty();
        let frame = *scene.frame();

        let title_height = if self.options.title.is_some() { TITLE_HEIGHT } else { 0.0 };
        let plot_height = (frame.height() as f32).max(1.0) * self.options.track_height;
        let legend_height = palette.len() as f32 * LEGEND_ROW_HEIGHT;
        let width = self.options.width;
        let content_height = if show_legend {
            plot_height.max(legend_height)
        } else {
            plot_height
        };
        let height = title_height + content_height + 2.0 * PAD;
        let plot_right = width - PAD - if show_legend { LEGEND_WIDTH } else { 0.0 };

        let viewport = Viewport {
            frame,
            left: PAD as f64,
            right: plot_right as f64,
            top: (PAD + title_height) as f64,
            bottom: (PAD + title_height + plot_height) as f64,
        };

        let mut doc = Document::new()
            .set("viewBox", (0, 0, width, height))
            .set("width", width)
            .set("height", height);

        for layer in scene.draw_order() {
            doc = match layer {
                SceneLayer::Canvas(_) => doc.add(
                    Rectangle::new()
                        .set("x", 0)
                        .set("y", 0)
                        .set("width", width)
                        .set("height", height)
                        .set("fill", self.options.background.as_str()),
                ),
                SceneLayer::Shapes(layer) => doc.add(self.layer_group(layer, &viewport, &palette)),
            };
        }

        if let Some(title) = &self.options.title {
            doc = doc.add(
                Text::new(title.clone())
                    .set("x", PAD)
                    .set("y", PAD + 16.0)
                    .set("font-family", FONT_FAMILY)
                    .set("font-size", 16)
                    .set("fill", "#111111"),
            );
        }
        if show_legend {
            doc = doc.add(legend(&palette, plot_right + PAD, PAD + title_height));
        }
        doc
    }

    fn layer_group(&self, layer: &Layer, viewport: &Viewport, palette: &CategoryPalette) -> Group {
        let stroke_width = layer.style.stroke_width * STROKE_SCALE;
        let mut group = Group::new().set("class", layer.source.as_str());
        for primitive in &layer.primitives {
            group = match primitive {
                Primitive::Rect {
                    xmin,
                    xmax,
                    ymin,
                    ymax,
                    fill,
                    outline,
                } => {
                    let x1 = viewport.x(*xmin);
                    let x2 = viewport.x(*xmax).max(x1 + 1.0);
                    let top = viewport.y(*ymax);
                    let bottom = viewport.y(*ymin);
                    group.add(
                        Rectangle::new()
                            .set("x", x1)
                            .set("y", top)
                            .set("width", x2 - x1)
                            .set("height", bottom - top)
                            .set("fill", palette.resolve(fill))
                            .set("stroke", palette.resolve(outline))
                            .set("stroke-width", stroke_width),
                    )
                }
                Primitive::Point { x, y, fill, outline } => group.add(
                    Circle::new()
                        .set("cx", viewport.x(*x))
                        .set("cy", viewport.y(*y))
                        .set("r", layer.style.point_size * POINT_SCALE)
                        .set("fill", palette.resolve(fill))
                        .set("stroke", palette.resolve(outline))
                        .set("stroke-width", stroke_width),
                ),
                Primitive::Label {
                    x,
                    y,
                    text,
                    size,
                    anchor,
                } => group.add(
                    Text::new(text.clone())
                        .set("x", viewport.x(*x))
                        .set("y", viewport.y(*y))
                        .set("text-anchor", anchor.as_svg())
                        .set("dominant-baseline", "middle")
                        .set("font-family", FONT_FAMILY)
                        .set("font-size", size * FONT_SCALE)
                        .set("fill", "#111111"),
                ),
            };
        }
        group
    }
}

fn legend(palette: &CategoryPalette, left: f32, top: f32) -> Group {
    let mut group = Group::new().set("class", "legend");
    for (idx, (key, color)) in palette.entries().enumerate() {
        let y = top + idx as f32 * LEGEND_ROW_HEIGHT;
        group = group
            .add(
                Rectangle::new()
                    .set("x", left)
                    .set("y", y)
                    .set("width", LEGEND_SWATCH)
                    .set("height", LEGEND_SWATCH)
                    .set("fill", color)
                    .set("stroke", "#444444")
                    .set("stroke-width", 0.5),
            )
            .add(
                Text::new(key.to_string())
                    .set("x", left + LEGEND_SWATCH + 6.0)
                    .set("y", y + LEGEND_SWATCH * 0.5)
                    .set("dominant-baseline", "middle")
                    .set("font-family", FONT_FAMILY)
                    .set("font-size", 11)
                    .set("fill", "#111111"),
            );
    }
    group
}
