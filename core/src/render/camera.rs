use serde_json::{Map, Value};

/// Plotly's default eye position.
const DEFAULT_EYE: [f64; 3] = [1.25, 1.25, 1.25];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    Orthographic,
    Perspective,
}

/// Orbit camera around the scene centre.
///
/// Angles are radians. `distance` is measured in units of the scene's largest
/// half-extent and only matters for perspective projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub azimuth: f64,
    pub elevation: f64,
    pub distance: f64,
    pub zoom: f64,
    pub projection: ProjectionKind,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_eye(DEFAULT_EYE, ProjectionKind::Perspective)
    }
}

impl Camera {
    pub fn from_eye(eye: [f64; 3], projection: ProjectionKind) -> Self {
        let [x, y, z] = eye;
        let horizontal = x.hypot(y);
        let distance = (horizontal.hypot(z)).max(0.5);
        Self {
            azimuth: y.atan2(x),
            elevation: z.atan2(horizontal),
            distance,
            zoom: 1.0,
            projection,
        }
    }

    /// Reads `scene.camera.eye` and `scene.camera.projection.type` from a figure layout.
    pub fn from_layout(layout: &Map<String, Value>) -> Self {
        let camera = layout.get("scene").and_then(|scene| scene.get("camera"));
        let eye = camera
            .and_then(|camera| camera.get("eye"))
            .and_then(|eye| {
                let axis = |key: &str| eye.get(key).and_then(Value::as_f64);
                Some([axis("x")?, axis("y")?, axis("z")?])
            })
            .unwrap_or(DEFAULT_EYE);
        let projection = match camera
            .and_then(|camera| camera.get("projection"))
            .and_then(|projection| projection.get("type"))
            .and_then(Value::as_str)
        {
            Some("orthographic") => ProjectionKind::Orthographic,
            _ => ProjectionKind::Perspective,
        };
        Self::from_eye(eye, projection)
    }

    pub fn orbit(&mut self, delta_azimuth: f64, delta_elevation: f64) {
        let limit = std::f64::consts::FRAC_PI_2 - 1e-3;
        self.azimuth = (self.azimuth + delta_azimuth).rem_euclid(std::f64::consts::TAU);
        self.elevation = (self.elevation + delta_elevation).clamp(-limit, limit);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(0.2, 5.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn layout_projection_and_eye_are_read() {
        let layout = json!({
            "scene": {
                "camera": {
                    "eye": {"x": 0.0, "y": 2.0, "z": 0.0},
                    "projection": {"type": "orthographic"}
                }
            }
        });
        let camera = Camera::from_layout(layout.as_object().unwrap());
        assert_eq!(camera.projection, ProjectionKind::Orthographic);
        assert!((camera.azimuth - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(camera.elevation.abs() < 1e-12);
        assert!((camera.distance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_layout_uses_default_eye() {
        let camera = Camera::from_layout(&Map::new());
        assert_eq!(camera, Camera::default());
        assert_eq!(camera.projection, ProjectionKind::Perspective);
    }

    #[test]
    fn orbit_clamps_elevation() {
        let mut camera = Camera::default();
        camera.orbit(0.0, 10.0);
        assert!(camera.elevation < std::f64::consts::FRAC_PI_2);
        camera.set_zoom(100.0);
        assert_eq!(camera.zoom, 5.0);
    }
}
