use crate::Message;
use chaoscore::model::{SafetyCarPoint, TrendPoint};
use chaoscore::view::{ComparisonRow, RadarAxis};
use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke},
    Color, Point, Rectangle, Renderer, Size, Theme,
};
use std::f32::consts::PI;

const BACKGROUND: Color = Color::from_rgb(0.05, 0.05, 0.07);
const GRID: Color = Color::from_rgb(0.25, 0.25, 0.3);
const LABEL: Color = Color::from_rgb(0.7, 0.7, 0.75);
pub const ACCENT: Color = Color::from_rgb(0.88, 0.1, 0.1);
const WEATHER: Color = Color::from_rgb(0.18, 0.72, 0.89);
const SAFETY_CAR: Color = Color::from_rgb(0.95, 0.75, 0.2);

/// Season labels paired with the values that are actually present.
pub fn trend_series(points: &[TrendPoint]) -> Vec<(String, f32)> {
    points
        .iter()
        .filter_map(|p| Some((season_label(p.season), p.score? as f32)))
        .collect()
}

pub fn safety_car_series(points: &[SafetyCarPoint]) -> Vec<(String, f32)> {
    points
        .iter()
        .filter_map(|p| Some((season_label(p.season), p.deployments? as f32)))
        .collect()
}

fn season_label(season: Option<i32>) -> String {
    season.map_or_else(String::new, |s| s.to_string())
}

/// Vertex `index` of a regular `count`-gon starting at twelve o'clock.
pub fn radial_point(center: Point, radius: f32, index: usize, count: usize) -> Point {
    let angle = -PI / 2.0 + index as f32 * 2.0 * PI / count.max(1) as f32;
    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Bar height for `value` on a `0..=max` axis, clamped to the plot.
pub fn bar_height(value: f32, max: f32, height: f32) -> f32 {
    if max <= 0.0 {
        return 0.0;
    }
    (value / max).clamp(0.0, 1.0) * height
}

fn background(renderer: &Renderer, bounds: Rectangle) -> Frame {
    let mut frame = Frame::new(renderer, bounds.size());
    frame.fill_rectangle(Point::ORIGIN, bounds.size(), BACKGROUND);
    frame
}

fn label(frame: &mut Frame, content: &str, position: Point, color: Color) {
    frame.fill_text(canvas::Text {
        content: content.to_string(),
        position,
        color,
        size: 11.0.into(),
        ..canvas::Text::default()
    });
}

#[derive(Clone)]
pub struct RadarChart {
    pub axes: [RadarAxis; 5],
}

impl canvas::Program<Message> for RadarChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = background(renderer, bounds);
        let center = Point::new(bounds.width / 2.0, bounds.height / 2.0);
        let radius = (bounds.width.min(bounds.height) / 2.0 - 30.0).max(10.0);
        let count = self.axes.len();

        for ring in 1..=4 {
            let ring_radius = radius * ring as f32 / 4.0;
            let ring_path = Path::new(|builder| {
                builder.move_to(radial_point(center, ring_radius, 0, count));
                for idx in 1..count {
                    builder.line_to(radial_point(center, ring_radius, idx, count));
                }
                builder.close();
            });
            frame.stroke(&ring_path, Stroke::default().with_color(GRID));
        }

        let spokes = Path::new(|builder| {
            for idx in 0..count {
                builder.move_to(center);
                builder.line_to(radial_point(center, radius, idx, count));
            }
        });
        frame.stroke(&spokes, Stroke::default().with_color(GRID).with_width(1.0));

        let shape = Path::new(|builder| {
            for (idx, axis) in self.axes.iter().enumerate() {
                let ratio = (axis.value.unwrap_or(0.0) / axis.full_mark).clamp(0.0, 1.0) as f32;
                let point = radial_point(center, radius * ratio, idx, count);
                if idx == 0 {
                    builder.move_to(point);
                } else {
                    builder.line_to(point);
                }
            }
            builder.close();
        });
        frame.fill(&shape, Color { a: 0.35, ..ACCENT });
        frame.stroke(&shape, Stroke::default().with_width(2.0).with_color(ACCENT));

        for (idx, axis) in self.axes.iter().enumerate() {
            let anchor = radial_point(center, radius + 14.0, idx, count);
            let offset = axis.label.len() as f32 * 2.8;
            label(
                &mut frame,
                axis.label,
                Point::new(anchor.x - offset, anchor.y - 6.0),
                LABEL,
            );
        }

        vec![frame.into_geometry()]
    }
}

/// Unpredictability score per season on a fixed 0-100 axis.
#[derive(Clone)]
pub struct TrendChart {
    pub points: Vec<(String, f32)>,
}

impl canvas::Program<Message> for TrendChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = background(renderer, bounds);
        let plot = Size::new(bounds.width - 24.0, bounds.height - 28.0);

        for step in 0..=4 {
            let y = 8.0 + plot.height * step as f32 / 4.0;
            let line = Path::line(Point::new(16.0, y), Point::new(16.0 + plot.width, y));
            frame.stroke(&line, Stroke::default().with_color(GRID).with_width(0.5));
        }

        if self.points.len() > 1 {
            let step = plot.width / (self.points.len() as f32 - 1.0);
            let at = |idx: usize, value: f32| {
                Point::new(
                    16.0 + idx as f32 * step,
                    8.0 + plot.height - bar_height(value, 100.0, plot.height),
                )
            };
            let path = Path::new(|builder| {
                for (idx, (_, value)) in self.points.iter().enumerate() {
                    if idx == 0 {
                        builder.move_to(at(idx, *value));
                    } else {
                        builder.line_to(at(idx, *value));
                    }
                }
            });
            frame.stroke(&path, Stroke::default().with_width(2.5).with_color(ACCENT));

            for (idx, (season, value)) in self.points.iter().enumerate() {
                let point = at(idx, *value);
                frame.fill(&Path::circle(point, 3.0), ACCENT);
                if idx % 2 == 0 {
                    label(
                        &mut frame,
                        season,
                        Point::new(point.x - 12.0, bounds.height - 16.0),
                        LABEL,
                    );
                }
            }
        }

        vec![frame.into_geometry()]
    }
}

/// Safety-car deployments per season, scaled to the busiest season.
#[derive(Clone)]
pub struct DeploymentBars {
    pub points: Vec<(String, f32)>,
}

impl canvas::Program<Message> for DeploymentBars {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = background(renderer, bounds);
        if self.points.is_empty() {
            return vec![frame.into_geometry()];
        }

        let max = self
            .points
            .iter()
            .map(|(_, value)| *value)
            .fold(0.0, f32::max)
            .max(1.0);
        let plot_height = bounds.height - 28.0;
        let slot = (bounds.width - 16.0) / self.points.len() as f32;
        let width = (slot * 0.6).max(2.0);

        for (idx, (season, value)) in self.points.iter().enumerate() {
            let height = bar_height(*value, max, plot_height);
            let x = 8.0 + idx as f32 * slot + (slot - width) / 2.0;
            frame.fill_rectangle(
                Point::new(x, 8.0 + plot_height - height),
                Size::new(width, height),
                SAFETY_CAR,
            );
            if idx % 2 == 0 {
                label(
                    &mut frame,
                    season,
                    Point::new(x - 4.0, bounds.height - 16.0),
                    LABEL,
                );
            }
        }

        vec![frame.into_geometry()]
    }
}

/// Score, weather and scaled safety-car bars per compared circuit.
#[derive(Clone)]
pub struct ComparisonChart {
    pub rows: Vec<ComparisonRow>,
}

impl canvas::Program<Message> for ComparisonChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = background(renderer, bounds);
        let legend = [("Score", ACCENT), ("Weather", WEATHER), ("Safety Car", SAFETY_CAR)];
        for (idx, (name, color)) in legend.iter().enumerate() {
            let x = 12.0 + idx as f32 * 90.0;
            frame.fill_rectangle(Point::new(x, 8.0), Size::new(10.0, 10.0), *color);
            label(&mut frame, name, Point::new(x + 14.0, 6.0), LABEL);
        }

        if self.rows.is_empty() {
            return vec![frame.into_geometry()];
        }

        let top = 28.0;
        let plot_height = bounds.height - top - 22.0;
        let slot = (bounds.width - 16.0) / self.rows.len() as f32;
        let width = (slot / 4.0).max(2.0);

        for (idx, row) in self.rows.iter().enumerate() {
            let origin = 8.0 + idx as f32 * slot + (slot - 3.0 * width) / 2.0;
            let values = [
                (row.score, ACCENT),
                (row.weather, WEATHER),
                (row.safety_car, SAFETY_CAR),
            ];
            for (bar, (value, color)) in values.iter().enumerate() {
                let height = bar_height(value.unwrap_or(0.0) as f32, 100.0, plot_height);
                frame.fill_rectangle(
                    Point::new(origin + bar as f32 * width, top + plot_height - height),
                    Size::new(width * 0.9, height),
                    *color,
                );
            }
            label(
                &mut frame,
                &row.label,
                Point::new(origin, bounds.height - 16.0),
                LABEL,
            );
        }

        vec![frame.into_geometry()]
    }
}
