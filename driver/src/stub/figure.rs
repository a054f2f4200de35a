use anyhow::bail;
use bzcore::model::{PlotRequest, VisualizationConfig};
use serde_json::{json, Value};

/// Corners of the fractional cell centred on Γ.
const CELL: [[f64; 3]; 8] = [
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
];

const CELL_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

const CELL_TRIANGLES: [[usize; 3]; 12] = [
    [0, 1, 2],
    [0, 2, 3],
    [4, 5, 6],
    [4, 6, 7],
    [0, 1, 5],
    [0, 5, 4],
    [1, 2, 6],
    [1, 6, 5],
    [2, 3, 7],
    [2, 7, 6],
    [3, 0, 4],
    [3, 4, 7],
];

/// Styling with every absent field filled from the standard defaults.
struct Style {
    requested: VisualizationConfig,
    fallback: VisualizationConfig,
}

impl Style {
    fn new(requested: Option<&VisualizationConfig>) -> Self {
        Self {
            requested: requested.cloned().unwrap_or_else(VisualizationConfig::empty),
            fallback: VisualizationConfig::default(),
        }
    }

    fn flag(&self, pick: impl Fn(&VisualizationConfig) -> Option<bool>) -> bool {
        pick(&self.requested).or(pick(&self.fallback)).unwrap_or(false)
    }

    fn number(&self, pick: impl Fn(&VisualizationConfig) -> Option<f64>) -> f64 {
        pick(&self.requested).or(pick(&self.fallback)).unwrap_or(1.0)
    }

    fn color(&self, pick: impl Fn(&VisualizationConfig) -> Option<&String>) -> String {
        pick(&self.requested)
            .or(pick(&self.fallback))
            .cloned()
            .unwrap_or_else(|| "#000000".into())
    }
}

/// Echo figure for a request.
///
/// This is not a Brillouin zone: k-points are drawn at their fractional
/// coordinates inside a unit cell centred on Γ. `layout.meta.config` carries
/// the request's config back verbatim.
pub fn build_figure(request: &PlotRequest) -> anyhow::Result<Value> {
    if let Some(label) = request.unresolved_labels().first() {
        bail!("Unknown k-point label '{label}' in path");
    }
    let style = Style::new(request.config.as_ref());
    let mut data = Vec::new();

    if style.flag(|c| c.show_faces) {
        let [x, y, z] = columns(&CELL);
        data.push(json!({
            "type": "mesh3d",
            "x": x, "y": y, "z": z,
            "i": CELL_TRIANGLES.iter().map(|t| t[0]).collect::<Vec<_>>(),
            "j": CELL_TRIANGLES.iter().map(|t| t[1]).collect::<Vec<_>>(),
            "k": CELL_TRIANGLES.iter().map(|t| t[2]).collect::<Vec<_>>(),
            "color": style.color(|c| c.face_color.as_ref()),
            "opacity": style.number(|c| c.face_opacity),
        }));
    }

    let mut edges = Vec::new();
    for (a, b) in CELL_EDGES {
        edges.push(Some(CELL[a]));
        edges.push(Some(CELL[b]));
        edges.push(None);
    }
    data.push(polyline(
        "cell",
        &edges,
        style.color(|c| c.edge_color.as_ref()),
        style.number(|c| c.edge_width),
    ));

    let stops: Vec<Option<[f64; 3]>> = request
        .path
        .labels()
        .iter()
        .map(|label| request.kpoints.get(label).copied())
        .collect();
    if style.flag(|c| c.show_path) && stops.len() > 1 {
        data.push(polyline(
            "path",
            &stops,
            style.color(|c| c.path_color.as_ref()),
            style.number(|c| c.path_width),
        ));
    }

    if style.flag(|c| c.show_points) && !request.kpoints.is_empty() {
        let points: Vec<[f64; 3]> = request.kpoints.iter().map(|(_, p)| *p).collect();
        let labels: Vec<&String> = request.kpoints.iter().map(|(label, _)| label).collect();
        let [x, y, z] = columns(&points);
        let mode = if style.flag(|c| c.show_text) {
            "markers+text"
        } else {
            "markers"
        };
        data.push(json!({
            "type": "scatter3d",
            "name": "kpoints",
            "mode": mode,
            "x": x, "y": y, "z": z,
            "text": labels,
            "marker": {
                "color": style.color(|c| c.point_color.as_ref()),
                "size": style.number(|c| c.point_size),
            },
            "textfont": {"size": style.number(|c| c.text_size)},
        }));
    }

    if style.flag(|c| c.show_axes) {
        let length = style.number(|c| c.axes_factor);
        for (name, tip) in [
            ("kx", [length, 0.0, 0.0]),
            ("ky", [0.0, length, 0.0]),
            ("kz", [0.0, 0.0, length]),
        ] {
            data.push(polyline(name, &[Some([0.0; 3]), Some(tip)], "#555555".into(), 2.0));
        }
    }

    let projection = if style.flag(|c| c.orthographic) {
        "orthographic"
    } else {
        "perspective"
    };
    Ok(json!({
        "data": data,
        "layout": {
            "showlegend": false,
            "scene": {
                "aspectmode": "data",
                "camera": {"projection": {"type": projection}},
            },
            "meta": {"config": request.config},
        },
    }))
}

fn polyline(name: &str, points: &[Option<[f64; 3]>], color: String, width: f64) -> Value {
    let axis = |i: usize| -> Vec<Option<f64>> { points.iter().map(|p| p.map(|p| p[i])).collect() };
    json!({
        "type": "scatter3d",
        "name": name,
        "mode": "lines",
        "x": axis(0), "y": axis(1), "z": axis(2),
        "line": {"color": color, "width": width},
    })
}

fn columns(points: &[[f64; 3]]) -> [Vec<f64>; 3] {
    [0, 1, 2].map(|i| points.iter().map(|p| p[i]).collect())
}
