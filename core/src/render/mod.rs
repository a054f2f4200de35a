//! Figure to screen: trace extraction, data-aspect projection, fault guard and export.

pub mod camera;
pub mod color;
pub mod export;
pub mod guard;
pub mod projection;
pub mod scene;

pub use camera::{Camera, ProjectionKind};
pub use color::Rgba;
pub use export::{export_scene, ExportFormat};
pub use guard::RenderGuard;
pub use projection::{project, ProjectedScene};
pub use scene::Scene;

use crate::model::PlotResponse;
use serde_json::Value;

/// What the plot pane should show.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderView {
    /// Nothing generated yet.
    Empty,
    /// A figure arrived but lacks `data` or `layout`.
    Invalid(String),
    /// Drawing failed; retry through the guard.
    Faulted(String),
    Ready(ProjectedScene),
}

/// Runs the render call for `figure` inside `guard`.
///
/// A `Ready` scene has passed [`ProjectedScene::check_drawable`], so drawing
/// it onto a canvas has no failure path of its own.
pub fn prepare(figure: Option<&Value>, camera: &Camera, guard: &mut RenderGuard) -> RenderView {
    let Some(raw) = figure else {
        return RenderView::Empty;
    };
    if let Err(err) = PlotResponse::check_shape(raw) {
        return RenderView::Invalid(err.user_message());
    }
    match guard.run(|| {
        let scene = Scene::from_value(raw)?;
        let projected = project(&scene, camera);
        projected.check_drawable()?;
        Ok(projected)
    }) {
        Ok(projected) => RenderView::Ready(projected),
        Err(err) => RenderView::Faulted(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_figure_is_empty() {
        let mut guard = RenderGuard::new();
        assert_eq!(prepare(None, &Camera::default(), &mut guard), RenderView::Empty);
    }

    #[test]
    fn figure_without_layout_is_invalid_not_drawn() {
        let mut guard = RenderGuard::new();
        let view = prepare(Some(&json!({"data": []})), &Camera::default(), &mut guard);
        assert!(matches!(view, RenderView::Invalid(_)));
        assert!(!guard.is_faulted());
    }

    #[test]
    fn fault_recovers_after_reset_without_new_data() {
        let broken = json!({
            "data": [{"type": "scatter3d", "x": ["?"], "y": [0], "z": [0]}],
            "layout": {}
        });
        let mut guard = RenderGuard::new();
        let camera = Camera::default();
        assert!(matches!(prepare(Some(&broken), &camera, &mut guard), RenderView::Faulted(_)));

        let good = json!({
            "data": [{"type": "scatter3d", "x": [0, 1], "y": [0, 1], "z": [0, 1]}],
            "layout": {}
        });
        assert!(matches!(prepare(Some(&good), &camera, &mut guard), RenderView::Faulted(_)));
        guard.reset();
        assert!(matches!(prepare(Some(&good), &camera, &mut guard), RenderView::Ready(_)));
    }
}
