pub mod color;
pub mod contour;
pub mod heatmap;
pub mod pipeline;
pub mod scene;
pub mod streamline;
pub mod svg;

pub use color::{Colormap, Rgba};
pub use contour::{ContourExtractor, ContourLevel};
pub use heatmap::{HeatCell, HeatMap, Legend, LegendTick};
pub use pipeline::{render_frame, RenderPipeline};
pub use scene::{
    ChargeMarker, EquipotentialLayer, FieldLineLayer, Layer, Polyline, Scene, SceneSummary,
    StrokeStyle,
};
pub use streamline::StreamlineTracer;
pub use svg::SvgExporter;
