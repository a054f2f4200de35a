use crate::model::PlotResponse;
use crate::prelude::{RenderError, RenderResult};
use crate::render::color::Rgba;
use serde_json::Value;

const DEFAULT_LINE_WIDTH: f32 = 2.0;
const DEFAULT_MARKER_SIZE: f32 = 6.0;
const DEFAULT_TEXT_SIZE: f32 = 14.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub from: [f64; 3],
    pub to: [f64; 3],
    pub color: Rgba,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub at: [f64; 3],
    pub color: Rgba,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub at: [f64; 3],
    pub text: String,
    pub color: Rgba,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub corners: [[f64; 3]; 3],
    pub color: Rgba,
}

/// 3-D primitives pulled out of a figure's `data` traces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub segments: Vec<Segment>,
    pub markers: Vec<Marker>,
    pub labels: Vec<Label>,
    pub faces: Vec<Face>,
}

impl Scene {
    pub fn from_figure(plot: &PlotResponse) -> RenderResult<Scene> {
        Self::from_value(plot.as_value())
    }

    /// Same as [`Scene::from_figure`] for a figure whose shape was checked elsewhere.
    pub fn from_value(figure: &Value) -> RenderResult<Scene> {
        let traces = figure
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let mut scene = Scene::default();
        for (index, trace) in traces.iter().enumerate() {
            if trace.get("visible").and_then(Value::as_bool) == Some(false) {
                continue;
            }
            match trace.get("type").and_then(Value::as_str) {
                Some("scatter3d") => scene.add_scatter(index, trace)?,
                Some("mesh3d") => scene.add_mesh(index, trace)?,
                other => log::debug!("skipping trace {index} of type {other:?}"),
            }
        }
        Ok(scene)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
            && self.markers.is_empty()
            && self.labels.is_empty()
            && self.faces.is_empty()
    }

    /// Every 3-D position the scene references.
    pub fn points(&self) -> impl Iterator<Item = &[f64; 3]> {
        self.segments
            .iter()
            .flat_map(|s| [&s.from, &s.to])
            .chain(self.markers.iter().map(|m| &m.at))
            .chain(self.labels.iter().map(|l| &l.at))
            .chain(self.faces.iter().flat_map(|f| f.corners.iter()))
    }

    fn add_scatter(&mut self, index: usize, trace: &Value) -> RenderResult<()> {
        let points = xyz(index, trace)?;
        let mode = trace
            .get("mode")
            .and_then(Value::as_str)
            .unwrap_or("lines+markers");
        let opacity = trace_opacity(trace);

        if mode.contains("lines") {
            let line = trace.get("line");
            let color = Rgba::parse_or(
                line.and_then(|l| l.get("color")).and_then(first_color),
                Rgba::BLACK,
            )
            .with_alpha(opacity);
            let width = line
                .and_then(|l| l.get("width"))
                .and_then(Value::as_f64)
                .map(|w| w as f32)
                .unwrap_or(DEFAULT_LINE_WIDTH);
            // A null coordinate breaks the polyline.
            for pair in points.windows(2) {
                if let (Some(from), Some(to)) = (pair[0], pair[1]) {
                    self.segments.push(Segment {
                        from,
                        to,
                        color,
                        width,
                    });
                }
            }
        }

        if mode.contains("markers") {
            let marker = trace.get("marker");
            let color = Rgba::parse_or(
                marker.and_then(|m| m.get("color")).and_then(first_color),
                Rgba::GRAY,
            )
            .with_alpha(opacity);
            let size = marker
                .and_then(|m| m.get("size"))
                .and_then(first_number)
                .map(|s| s as f32)
                .unwrap_or(DEFAULT_MARKER_SIZE);
            self.markers.extend(
                points
                    .iter()
                    .flatten()
                    .map(|&at| Marker { at, color, size }),
            );
        }

        if mode.contains("text") {
            let font = trace.get("textfont");
            let color = Rgba::parse_or(
                font.and_then(|f| f.get("color")).and_then(first_color),
                Rgba::BLACK,
            );
            let size = font
                .and_then(|f| f.get("size"))
                .and_then(first_number)
                .map(|s| s as f32)
                .unwrap_or(DEFAULT_TEXT_SIZE);
            let texts = trace.get("text");
            for (i, at) in points.iter().enumerate() {
                let (Some(at), Some(text)) = (at, text_at(texts, i)) else {
                    continue;
                };
                self.labels.push(Label {
                    at: *at,
                    text,
                    color,
                    size,
                });
            }
        }
        Ok(())
    }

    fn add_mesh(&mut self, index: usize, trace: &Value) -> RenderResult<()> {
        let vertices = xyz(index, trace)?;
        let (Some(i), Some(j), Some(k)) = (trace.get("i"), trace.get("j"), trace.get("k")) else {
            log::debug!("mesh trace {index} has no explicit triangles, skipping");
            return Ok(());
        };
        let (i, j, k) = (
            indices(index, "i", i)?,
            indices(index, "j", j)?,
            indices(index, "k", k)?,
        );
        if i.len() != j.len() || j.len() != k.len() {
            return Err(malformed(index, "triangle index arrays differ in length"));
        }

        let color = Rgba::parse_or(
            trace.get("color").and_then(first_color),
            Rgba::rgb(173, 216, 230),
        )
        .with_alpha(trace_opacity(trace));
        let vertex = |n: usize| -> RenderResult<[f64; 3]> {
            vertices
                .get(n)
                .copied()
                .flatten()
                .ok_or_else(|| malformed(index, format!("triangle references missing vertex {n}")))
        };
        for ((a, b), c) in i.into_iter().zip(j).zip(k) {
            self.faces.push(Face {
                corners: [vertex(a)?, vertex(b)?, vertex(c)?],
                color,
            });
        }
        Ok(())
    }
}

fn malformed(trace: usize, reason: impl Into<String>) -> RenderError {
    RenderError::MalformedTrace {
        trace,
        reason: reason.into(),
    }
}

/// Zips `x`, `y`, `z`; `None` marks a gap.
fn xyz(index: usize, trace: &Value) -> RenderResult<Vec<Option<[f64; 3]>>> {
    let x = coordinates(index, trace, "x")?;
    let y = coordinates(index, trace, "y")?;
    let z = coordinates(index, trace, "z")?;
    if x.len() != y.len() || y.len() != z.len() {
        return Err(malformed(index, "x, y and z differ in length"));
    }
    Ok(x.into_iter()
        .zip(y)
        .zip(z)
        .map(|((x, y), z)| Some([x?, y?, z?]))
        .collect())
}

fn coordinates(index: usize, trace: &Value, key: &str) -> RenderResult<Vec<Option<f64>>> {
    match trace.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => values
            .iter()
            .map(|value| match value {
                Value::Null => Ok(None),
                Value::Number(n) => Ok(n.as_f64()),
                other => Err(malformed(index, format!("non-numeric {key} value {other}"))),
            })
            .collect(),
        Some(_) => Err(malformed(index, format!("{key} is not an array"))),
    }
}

fn indices(index: usize, key: &str, value: &Value) -> RenderResult<Vec<usize>> {
    value
        .as_array()
        .ok_or_else(|| malformed(index, format!("{key} is not an array")))?
        .iter()
        .map(|v| {
            v.as_u64()
                .map(|n| n as usize)
                .ok_or_else(|| malformed(index, format!("{key} holds a non-index value {v}")))
        })
        .collect()
}

fn trace_opacity(trace: &Value) -> f32 {
    trace
        .get("opacity")
        .and_then(Value::as_f64)
        .map(|o| o.clamp(0.0, 1.0) as f32)
        .unwrap_or(1.0)
}

/// A colour may be a single string or a per-point array; the first entry wins.
fn first_color(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        Value::Array(items) => items.iter().find_map(Value::as_str),
        _ => None,
    }
}

fn first_number(value: &Value) -> Option<f64> {
    match value {
        Value::Array(items) => items.iter().find_map(Value::as_f64),
        other => other.as_f64(),
    }
}

fn text_at(texts: Option<&Value>, i: usize) -> Option<String> {
    match texts? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => match items.get(i)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scene_of(data: Value) -> RenderResult<Scene> {
        let plot = PlotResponse::from_value(json!({"data": data, "layout": {}})).unwrap();
        Scene::from_figure(&plot)
    }

    #[test]
    fn lines_break_on_null() {
        let scene = scene_of(json!([{
            "type": "scatter3d", "mode": "lines",
            "x": [0, 1, null, 2, 3], "y": [0, 0, null, 0, 0], "z": [0, 0, null, 0, 0],
            "line": {"color": "#ff0000", "width": 5}
        }]))
        .unwrap();
        assert_eq!(scene.segments.len(), 2);
        assert_eq!(scene.segments[0].color, Rgba::rgb(255, 0, 0));
        assert_eq!(scene.segments[0].width, 5.0);
    }

    #[test]
    fn markers_and_text_are_extracted() {
        let scene = scene_of(json!([{
            "type": "scatter3d", "mode": "markers+text",
            "x": [0, 0.5], "y": [0, 0], "z": [0, 0.5],
            "text": ["Γ", "X"], "marker": {"size": 8, "color": "red"},
            "textfont": {"size": 22}
        }]))
        .unwrap();
        assert_eq!(scene.markers.len(), 2);
        assert_eq!(scene.labels[1].text, "X");
        assert_eq!(scene.labels[1].size, 22.0);
        assert!(scene.segments.is_empty());
    }

    #[test]
    fn mesh_triangles_carry_opacity() {
        let scene = scene_of(json!([{
            "type": "mesh3d", "x": [0, 1, 0], "y": [0, 0, 1], "z": [0, 0, 0],
            "i": [0], "j": [1], "k": [2], "color": "#add8e6", "opacity": 0.3
        }]))
        .unwrap();
        assert_eq!(scene.faces.len(), 1);
        assert!((scene.faces[0].color.a - 0.3).abs() < 1e-6);
    }

    #[test]
    fn hidden_and_unknown_traces_are_skipped() {
        let scene = scene_of(json!([
            {"type": "scatter3d", "visible": false, "x": [0, 1], "y": [0, 1], "z": [0, 1]},
            {"type": "surface", "z": [[1, 2], [3, 4]]}
        ]))
        .unwrap();
        assert!(scene.is_empty());
    }

    #[test]
    fn malformed_arrays_fault() {
        let err = scene_of(json!([{"type": "scatter3d", "x": [0, "a"], "y": [0, 1], "z": [0, 1]}]))
            .unwrap_err();
        assert!(matches!(err, RenderError::MalformedTrace { trace: 0, .. }));

        let err = scene_of(json!([{
            "type": "mesh3d", "x": [0], "y": [0], "z": [0], "i": [0], "j": [1], "k": [2]
        }]))
        .unwrap_err();
        assert!(matches!(err, RenderError::MalformedTrace { .. }));
    }
}
