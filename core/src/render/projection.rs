use crate::math::{MatrixHelper, StatsHelper};
use crate::prelude::{RenderError, RenderResult};
use crate::render::camera::{Camera, ProjectionKind};
use crate::render::color::Rgba;
use crate::render::scene::Scene;
use ndarray::Array2;

/// Fraction of the shorter viewport side the scene may occupy at zoom 1.
const FILL: f64 = 0.9;

#[derive(Debug, Clone, PartialEq)]
pub struct Segment2 {
    pub from: [f64; 2],
    pub to: [f64; 2],
    pub depth: f64,
    pub color: Rgba,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker2 {
    pub at: [f64; 2],
    pub depth: f64,
    pub color: Rgba,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label2 {
    pub at: [f64; 2],
    pub text: String,
    pub color: Rgba,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Face2 {
    pub corners: [[f64; 2]; 3],
    pub depth: f64,
    pub color: Rgba,
}

/// Scene flattened to 2-D, coordinates within `[-1, 1]` on both axes.
///
/// One scale factor is shared by all three data axes and by both screen
/// axes, so the figure keeps its true proportions. Faces, segments and
/// markers are sorted far to near.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedScene {
    pub segments: Vec<Segment2>,
    pub markers: Vec<Marker2>,
    pub labels: Vec<Label2>,
    pub faces: Vec<Face2>,
    pub zoom: f64,
}

impl ProjectedScene {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
            && self.markers.is_empty()
            && self.labels.is_empty()
            && self.faces.is_empty()
    }

    /// Every coordinate must be finite before the scene is handed to a canvas or exporter.
    pub fn check_drawable(&self) -> RenderResult<()> {
        let finite = |p: &[f64; 2]| p[0].is_finite() && p[1].is_finite();
        if !self.faces.iter().all(|f| f.corners.iter().all(finite)) {
            return Err(RenderError::NonFinite("face"));
        }
        if !self.segments.iter().all(|s| finite(&s.from) && finite(&s.to)) {
            return Err(RenderError::NonFinite("segment"));
        }
        if !self.markers.iter().all(|m| finite(&m.at)) {
            return Err(RenderError::NonFinite("marker"));
        }
        if !self.labels.iter().all(|l| finite(&l.at)) {
            return Err(RenderError::NonFinite("label"));
        }
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(RenderError::NonFinite("zoom"));
        }
        Ok(())
    }

    /// Maps a normalized point into a `width x height` viewport with y pointing down.
    pub fn to_screen(&self, point: [f64; 2], width: f64, height: f64) -> (f64, f64) {
        let scale = width.min(height) / 2.0 * FILL * self.zoom;
        (
            width / 2.0 + point[0] * scale,
            height / 2.0 - point[1] * scale,
        )
    }
}

pub fn project(scene: &Scene, camera: &Camera) -> ProjectedScene {
    let mut projected = ProjectedScene {
        zoom: camera.zoom,
        ..Default::default()
    };
    let Some(bounds) = StatsHelper::bounds(scene.points()) else {
        return projected;
    };
    let center = bounds.center();
    let scale = 1.0 / bounds.max_half_extent();

    let points: Vec<[f64; 3]> = scene
        .points()
        .map(|p| [0, 1, 2].map(|axis| (p[axis] - center[axis]) * scale))
        .collect();
    let rotation = MatrixHelper::view_rotation(camera.azimuth, camera.elevation);
    let rotated =
        MatrixHelper::rotate_rows(MatrixHelper::from_points(&points).view(), rotation.view());
    let flat = flatten(&rotated, camera);

    let fit = flat
        .iter()
        .map(|(p, _)| p[0].abs().max(p[1].abs()))
        .fold(0.0, f64::max);
    let fit = if fit > f64::EPSILON { 1.0 / fit } else { 1.0 };
    let mut cursor = flat.into_iter().map(|(p, depth)| ([p[0] * fit, p[1] * fit], depth));

    // Consumes points in the order `Scene::points` yields them.
    let mut next = || cursor.next().unwrap_or(([0.0, 0.0], 0.0));
    for segment in &scene.segments {
        let (from, d0) = next();
        let (to, d1) = next();
        projected.segments.push(Segment2 {
            from,
            to,
            depth: (d0 + d1) / 2.0,
            color: segment.color,
            width: segment.width,
        });
    }
    for marker in &scene.markers {
        let (at, depth) = next();
        projected.markers.push(Marker2 {
            at,
            depth,
            color: marker.color,
            size: marker.size,
        });
    }
    for label in &scene.labels {
        let (at, _) = next();
        projected.labels.push(Label2 {
            at,
            text: label.text.clone(),
            color: label.color,
            size: label.size,
        });
    }
    for face in &scene.faces {
        let (a, da) = next();
        let (b, db) = next();
        let (c, dc) = next();
        projected.faces.push(Face2 {
            corners: [a, b, c],
            depth: (da + db + dc) / 3.0,
            color: face.color,
        });
    }

    let by_depth = |a: &f64, b: &f64| a.total_cmp(b);
    projected.faces.sort_by(|a, b| by_depth(&a.depth, &b.depth));
    projected.segments.sort_by(|a, b| by_depth(&a.depth, &b.depth));
    projected.markers.sort_by(|a, b| by_depth(&a.depth, &b.depth));
    projected
}

/// Drops the depth axis, applying the perspective divide when asked to.
fn flatten(rotated: &Array2<f64>, camera: &Camera) -> Vec<([f64; 2], f64)> {
    rotated
        .rows()
        .into_iter()
        .map(|row| {
            let (x, y, depth) = (row[0], row[1], row[2]);
            match camera.projection {
                ProjectionKind::Orthographic => ([x, y], depth),
                ProjectionKind::Perspective => {
                    let distance = camera.distance.max(1.0 + 1e-3) * 2.0;
                    let factor = distance / (distance - depth).max(1e-3);
                    ([x * factor, y * factor], depth)
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::scene::Segment;

    fn side_camera() -> Camera {
        Camera {
            azimuth: -std::f64::consts::FRAC_PI_2,
            elevation: 0.0,
            distance: 2.0,
            zoom: 1.0,
            projection: ProjectionKind::Orthographic,
        }
    }

    fn segment(from: [f64; 3], to: [f64; 3]) -> Segment {
        Segment {
            from,
            to,
            color: Rgba::BLACK,
            width: 1.0,
        }
    }

    fn length(s: &Segment2) -> f64 {
        (s.to[0] - s.from[0]).hypot(s.to[1] - s.from[1])
    }

    #[test]
    fn data_aspect_is_preserved() {
        let scene = Scene {
            segments: vec![
                segment([0.0, 0.0, 0.0], [4.0, 0.0, 0.0]),
                segment([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ],
            ..Default::default()
        };
        let projected = project(&scene, &side_camera());
        let mut lengths: Vec<f64> = projected.segments.iter().map(length).collect();
        lengths.sort_by(f64::total_cmp);
        let ratio = lengths[1] / lengths[0];
        assert!((ratio - 4.0).abs() < 1e-9, "ratio was {ratio}");
    }

    #[test]
    fn nan_segment_is_not_drawable() {
        let mut projected = project(
            &Scene {
                segments: vec![segment([0.0, 0.0, 0.0], [1.0, 1.0, 1.0])],
                ..Default::default()
            },
            &Camera::default(),
        );
        assert_eq!(projected.check_drawable(), Ok(()));
        projected.segments[0].to = [f64::NAN, 0.0];
        assert_eq!(
            projected.check_drawable(),
            Err(RenderError::NonFinite("segment"))
        );
    }

    #[test]
    fn coordinates_fit_unit_square() {
        let scene = Scene {
            segments: vec![segment([-3.0, 1.0, 2.0], [5.0, -7.0, 0.5])],
            ..Default::default()
        };
        let projected = project(&scene, &Camera::default());
        for s in &projected.segments {
            for p in [s.from, s.to] {
                assert!(p[0].abs() <= 1.0 + 1e-9 && p[1].abs() <= 1.0 + 1e-9);
            }
        }
    }

    #[test]
    fn screen_mapping_uses_shorter_side() {
        let projected = ProjectedScene {
            zoom: 1.0,
            ..Default::default()
        };
        let (x, y) = projected.to_screen([1.0, 1.0], 400.0, 200.0);
        assert!((x - (200.0 + 90.0)).abs() < 1e-9);
        assert!((y - (100.0 - 90.0)).abs() < 1e-9);
    }

    #[test]
    fn empty_scene_projects_to_nothing() {
        assert!(project(&Scene::default(), &Camera::default()).is_empty());
    }
}
