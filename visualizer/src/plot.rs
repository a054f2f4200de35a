use bzcore::render::{ProjectedScene, Rgba};
use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke},
    Color, Point, Rectangle, Renderer, Theme,
};

/// Canvas program for a projected figure.
///
/// Built only from `RenderView::Ready`, whose coordinates were checked inside
/// the render guard; the draw pass itself cannot fail.
#[derive(Clone)]
pub struct PlotCanvas {
    scene: ProjectedScene,
}

impl PlotCanvas {
    pub fn new(scene: &ProjectedScene) -> Self {
        Self {
            scene: scene.clone(),
        }
    }
}

impl<Message> canvas::Program<Message> for PlotCanvas {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), Color::WHITE);

        let (width, height) = (bounds.width as f64, bounds.height as f64);
        let point = |p: [f64; 2]| {
            let (x, y) = self.scene.to_screen(p, width, height);
            Point::new(x as f32, y as f32)
        };

        for face in &self.scene.faces {
            let [a, b, c] = face.corners;
            let triangle = Path::new(|builder| {
                builder.move_to(point(a));
                builder.line_to(point(b));
                builder.line_to(point(c));
                builder.close();
            });
            frame.fill(&triangle, color(face.color));
        }

        for segment in &self.scene.segments {
            let line = Path::line(point(segment.from), point(segment.to));
            frame.stroke(
                &line,
                Stroke::default()
                    .with_width(segment.width.max(1.0))
                    .with_color(color(segment.color)),
            );
        }

        for marker in &self.scene.markers {
            let dot = Path::circle(point(marker.at), (marker.size / 2.0).max(1.5));
            frame.fill(&dot, color(marker.color));
        }

        for label in &self.scene.labels {
            let anchor = point(label.at);
            let offset = label.size * 0.4;
            frame.fill_text(canvas::Text {
                content: label.text.clone(),
                position: Point::new(anchor.x + offset, anchor.y - offset),
                color: color(label.color),
                size: label.size.into(),
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}

fn color(c: Rgba) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}
