use crate::Message;
use fieldcore::field::Bounds;
use fieldcore::interaction::{InputEvent, PointerButton};
use fieldcore::render::{HeatMap, Layer, Polyline, Rgba, Scene, StrokeStyle};
use iced::{
    keyboard, mouse,
    widget::canvas::{self, Cache, Frame, Geometry, Path, Stroke},
    Color, Pixels, Point, Rectangle, Renderer, Size, Theme,
};

const LEGEND_WIDTH: f32 = 14.0;
const LEGEND_STEPS: usize = 64;
const HEATMAP_CELLS: usize = 200;

/// Square, equal-aspect mapping between the scene viewport and a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    viewport: Bounds,
    origin: Point,
    side: f32,
}

impl ViewTransform {
    pub fn fit(viewport: Bounds, size: Size) -> Self {
        let side = size.width.min(size.height);
        Self {
            viewport,
            origin: Point::new((size.width - side) / 2.0, (size.height - side) / 2.0),
            side,
        }
    }

    pub fn to_screen(&self, x: f64, y: f64) -> Point {
        let u = (x - self.viewport.min_x) / self.viewport.width();
        let v = (self.viewport.max_y - y) / self.viewport.height();
        Point::new(
            self.origin.x + u as f32 * self.side,
            self.origin.y + v as f32 * self.side,
        )
    }

    /// Data coordinates under `point`, or `None` outside the square.
    pub fn to_data(&self, point: Point) -> Option<(f64, f64)> {
        if self.side <= 0.0 {
            return None;
        }
        let u = f64::from((point.x - self.origin.x) / self.side);
        let v = f64::from((point.y - self.origin.y) / self.side);
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return None;
        }
        Some((
            self.viewport.min_x + u * self.viewport.width(),
            self.viewport.max_y - v * self.viewport.height(),
        ))
    }

    pub fn scale(&self) -> f32 {
        self.side / self.viewport.width() as f32
    }
}

#[derive(Debug, Default)]
pub struct CanvasState {
    modifiers: keyboard::Modifiers,
}

/// Draws a [`Scene`] and reports clicks and key presses as [`InputEvent`]s.
pub struct FieldCanvas<'a> {
    pub scene: &'a Scene,
    pub cache: &'a Cache,
}

impl canvas::Program<Message> for FieldCanvas<'_> {
    type State = CanvasState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let input = match event {
            canvas::Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                state.modifiers = *modifiers;
                return None;
            }
            canvas::Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => {
                match key.as_ref() {
                    keyboard::Key::Character(c) => InputEvent::Key(c.chars().next()?.to_ascii_lowercase()),
                    _ => return None,
                }
            }
            canvas::Event::Mouse(mouse::Event::ButtonPressed(button)) => {
                let button = match button {
                    mouse::Button::Left => PointerButton::Primary,
                    mouse::Button::Right => PointerButton::Secondary,
                    _ => return None,
                };
                let position = cursor.position_in(bounds)?;
                let (x, y) = ViewTransform::fit(self.scene.viewport, bounds.size()).to_data(position)?;
                InputEvent::Pointer {
                    button,
                    modifier: state.modifiers.shift(),
                    x,
                    y,
                }
            }
            _ => return None,
        };
        Some(canvas::Action::publish(Message::Input(input)).and_capture())
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let geometry = self.cache.draw(renderer, bounds.size(), |frame| {
            let view = ViewTransform::fit(self.scene.viewport, bounds.size());
            frame.fill_rectangle(
                view.to_screen(self.scene.viewport.min_x, self.scene.viewport.max_y),
                Size::new(view.side, view.side),
                Color::WHITE,
            );

            for layer in &self.scene.layers {
                match layer {
                    Layer::FieldLines(layer) => stroke_paths(frame, &view, layer.lines.iter(), layer.style),
                    Layer::Equipotentials(layer) => stroke_paths(frame, &view, layer.paths(), layer.style),
                    Layer::HeatMap(map) => {
                        fill_heatmap(frame, &view, map);
                        draw_legend(frame, &view, map);
                    }
                    Layer::Charges(markers) => {
                        for marker in markers {
                            let disc = Path::circle(
                                view.to_screen(marker.x, marker.y),
                                (marker.radius as f32 * view.scale()).max(2.0),
                            );
                            frame.fill(&disc, color(marker.color));
                        }
                    }
                }
            }
        });

        vec![geometry]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

fn color(rgba: Rgba) -> Color {
    Color::from_rgba(rgba.r, rgba.g, rgba.b, rgba.a)
}

fn stroke_paths<'p>(
    frame: &mut Frame,
    view: &ViewTransform,
    paths: impl Iterator<Item = &'p Polyline>,
    style: StrokeStyle,
) {
    let stroke = Stroke::default()
        .with_width(style.width.max(1.0))
        .with_color(color(style.color));
    for polyline in paths {
        let Some((&(x0, y0), rest)) = polyline.points.split_first() else {
            continue;
        };
        let path = Path::new(|builder| {
            builder.move_to(view.to_screen(x0, y0));
            for &(x, y) in rest {
                builder.line_to(view.to_screen(x, y));
            }
            if polyline.closed {
                builder.close();
            }
        });
        frame.stroke(&path, stroke);
    }
}

fn fill_heatmap(frame: &mut Frame, view: &ViewTransform, map: &HeatMap) {
    for cell in map.cells(HEATMAP_CELLS) {
        let top_left = view.to_screen(cell.bounds.min_x, cell.bounds.max_y);
        let bottom_right = view.to_screen(cell.bounds.max_x, cell.bounds.min_y);
        // Pad by half a pixel so neighbouring cells leave no seams.
        frame.fill_rectangle(
            top_left,
            Size::new(
                bottom_right.x - top_left.x + 0.5,
                bottom_right.y - top_left.y + 0.5,
            ),
            color(cell.color),
        );
    }
}

fn draw_legend(frame: &mut Frame, view: &ViewTransform, map: &HeatMap) {
    let top = view.to_screen(map.bounds.max_x, map.bounds.max_y);
    let x = top.x - LEGEND_WIDTH - 28.0;
    let height = view.side * 0.6;
    let y0 = top.y + view.side * 0.2;
    let step = height / LEGEND_STEPS as f32;

    for k in 0..LEGEND_STEPS {
        let t = 1.0 - (k as f64 + 0.5) / LEGEND_STEPS as f64;
        frame.fill_rectangle(
            Point::new(x, y0 + k as f32 * step),
            Size::new(LEGEND_WIDTH, step + 0.5),
            color(map.colormap.map(t).with_alpha(map.alpha)),
        );
    }
    frame.stroke(
        &Path::rectangle(Point::new(x, y0), Size::new(LEGEND_WIDTH, height)),
        Stroke::default().with_width(1.0).with_color(Color::BLACK),
    );

    for tick in &map.legend.ticks {
        frame.fill_text(canvas::Text {
            content: tick.label.to_string(),
            position: Point::new(
                x + LEGEND_WIDTH + 4.0,
                y0 + (1.0 - tick.position as f32) * height - 7.0,
            ),
            color: Color::BLACK,
            size: Pixels(14.0),
            ..canvas::Text::default()
        });
    }
}
