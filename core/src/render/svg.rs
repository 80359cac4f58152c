use super::color::Rgba;
use super::heatmap::HeatMap;
use super::scene::{Layer, Polyline, Scene, StrokeStyle};
use crate::field::Bounds;
use crate::prelude::{ExportConfig, FieldResult};
use log::info;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Fraction of the viewport width reserved for the colorbar.
const LEGEND_FRACTION: f64 = 0.15;

/// Serialises a [`Scene`] into a standalone SVG document.
pub struct SvgExporter<'a> {
    config: &'a ExportConfig,
}

impl<'a> SvgExporter<'a> {
    pub fn new(config: &'a ExportConfig) -> Self {
        Self { config }
    }

    pub fn write(&self, scene: &Scene, path: &Path) -> FieldResult<()> {
        fs::write(path, self.to_svg(scene))?;
        info!("scene exported to {}", path.display());
        Ok(())
    }

    pub fn to_svg(&self, scene: &Scene) -> String {
        let view = scene.viewport;
        let legend = scene.heatmap();
        let legend_width = if legend.is_some() {
            view.width() * LEGEND_FRACTION
        } else {
            0.0
        };
        let total_width = view.width() + legend_width;
        let size = f64::from(self.config.size_px);
        let pixel_width = (size * total_width / view.width()).round();

        let mut svg = String::new();
        let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(
            svg,
            r#"<svg width="{pixel_width}" height="{size}" viewBox="{} {} {} {}" xmlns="http://www.w3.org/2000/svg">"#,
            view.min_x,
            -view.max_y,
            total_width,
            view.height()
        );
        let _ = writeln!(
            svg,
            r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#ffffff"/>"##,
            view.min_x,
            -view.max_y,
            total_width,
            view.height()
        );
        // data space has y up; flip once for every layer
        let _ = writeln!(svg, r#"  <g transform="scale(1,-1)">"#);
        for layer in &scene.layers {
            match layer {
                Layer::FieldLines(layer) => {
                    self.push_paths(&mut svg, layer.lines.iter(), layer.style)
                }
                Layer::Equipotentials(layer) => self.push_paths(&mut svg, layer.paths(), layer.style),
                Layer::HeatMap(map) => self.push_heatmap(&mut svg, map),
                Layer::Charges(markers) => {
                    for marker in markers {
                        let _ = writeln!(
                            svg,
                            r#"    <circle cx="{:.4}" cy="{:.4}" r="{:.4}" fill="{}"/>"#,
                            marker.x,
                            marker.y,
                            marker.radius,
                            marker.color.to_hex()
                        );
                    }
                }
            }
        }
        let _ = writeln!(svg, "  </g>");

        if let Some(map) = legend {
            push_legend(&mut svg, map, view, legend_width);
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn push_paths<'p>(
        &self,
        svg: &mut String,
        paths: impl Iterator<Item = &'p Polyline>,
        style: StrokeStyle,
    ) {
        let _ = writeln!(
            svg,
            r#"    <g fill="none" stroke="{}" stroke-opacity="{}" stroke-width="{}" vector-effect="non-scaling-stroke">"#,
            style.color.to_hex(),
            style.color.a,
            style.width
        );
        for path in paths {
            if path.points.len() < 2 {
                continue;
            }
            let points = path
                .points
                .iter()
                .map(|(x, y)| format!("{x:.4},{y:.4}"))
                .collect::<Vec<_>>()
                .join(" ");
            let element = if path.closed { "polygon" } else { "polyline" };
            let _ = writeln!(
                svg,
                r#"      <{element} points="{points}" vector-effect="non-scaling-stroke"/>"#
            );
        }
        let _ = writeln!(svg, "    </g>");
    }

    fn push_heatmap(&self, svg: &mut String, map: &HeatMap) {
        let _ = writeln!(
            svg,
            r#"    <g shape-rendering="crispEdges" fill-opacity="{}">"#,
            map.alpha
        );
        for cell in map.cells(self.config.heatmap_cells) {
            let _ = writeln!(
                svg,
                r#"      <rect x="{:.4}" y="{:.4}" width="{:.4}" height="{:.4}" fill="{}"/>"#,
                cell.bounds.min_x,
                cell.bounds.min_y,
                cell.bounds.width(),
                cell.bounds.height(),
                cell.color.to_hex()
            );
        }
        let _ = writeln!(svg, "    </g>");
    }
}

fn push_legend(svg: &mut String, map: &HeatMap, view: Bounds, legend_width: f64) {
    let bar_x = view.max_x + legend_width * 0.25;
    let bar_width = legend_width * 0.25;
    let bar_top = -view.max_y + view.height() * 0.1;
    let bar_height = view.height() * 0.8;
    let font_size = view.height() * 0.03;

    let _ = writeln!(svg, "  <defs>");
    let _ = writeln!(
        svg,
        r#"    <linearGradient id="colorbar" x1="0" y1="1" x2="0" y2="0">"#
    );
    for stop in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let color: Rgba = map.colormap.map(stop);
        let _ = writeln!(
            svg,
            r#"      <stop offset="{stop}" stop-color="{}"/>"#,
            color.to_hex()
        );
    }
    let _ = writeln!(svg, "    </linearGradient>");
    let _ = writeln!(svg, "  </defs>");
    let _ = writeln!(
        svg,
        r##"  <rect x="{bar_x:.4}" y="{bar_top:.4}" width="{bar_width:.4}" height="{bar_height:.4}" fill="url(#colorbar)" fill-opacity="{}" stroke="#333333" stroke-width="0.02"/>"##,
        map.alpha
    );
    for tick in &map.legend.ticks {
        let y = bar_top + bar_height * (1.0 - tick.position);
        let _ = writeln!(
            svg,
            r#"  <text x="{:.4}" y="{y:.4}" font-size="{font_size:.4}" font-family="sans-serif" dominant-baseline="middle">{}</text>"#,
            bar_x + bar_width * 1.3,
            tick.label
        );
    }
}
