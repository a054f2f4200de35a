use crate::prelude::{ExportError, ExportResult};
use crate::render::color::Rgba;
use crate::render::projection::ProjectedScene;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const EXPORT_WIDTH: u32 = 1000;
pub const EXPORT_HEIGHT: u32 = 800;
/// Raster exports are drawn at this multiple of the target size.
pub const PNG_SCALE: u32 = 2;

const FILE_PREFIX: &str = "brillouin_zone";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Svg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "svg" => Ok(ExportFormat::Svg),
            other => Err(format!("unsupported export format {other:?}, expected png or svg")),
        }
    }
}

/// Writes a snapshot of `scene` into `dir`, named after the current time.
pub fn export_scene(
    scene: &ProjectedScene,
    format: ExportFormat,
    dir: &Path,
) -> ExportResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name(format, timestamp_millis()));
    match format {
        ExportFormat::Png => {
            let size = (EXPORT_WIDTH * PNG_SCALE, EXPORT_HEIGHT * PNG_SCALE);
            let area = BitMapBackend::new(&path, size).into_drawing_area();
            draw_scene(&area, scene, PNG_SCALE as f64)?;
        }
        ExportFormat::Svg => {
            let area = SVGBackend::new(&path, (EXPORT_WIDTH, EXPORT_HEIGHT)).into_drawing_area();
            draw_scene(&area, scene, 1.0)?;
        }
    }
    log::info!("exported {}", path.display());
    Ok(path)
}

pub fn file_name(format: ExportFormat, millis: u128) -> String {
    format!("{FILE_PREFIX}_{millis}.{}", format.extension())
}

fn timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

fn draw_scene<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scene: &ProjectedScene,
    scale: f64,
) -> ExportResult<()> {
    area.fill(&WHITE).map_err(draw_error)?;
    let (width, height) = area.dim_in_pixel();
    let (width, height) = (width as f64, height as f64);
    let pixel = |p: [f64; 2]| {
        let (x, y) = scene.to_screen(p, width, height);
        (x.round() as i32, y.round() as i32)
    };

    for face in &scene.faces {
        let corners: Vec<(i32, i32)> = face.corners.iter().map(|c| pixel(*c)).collect();
        area.draw(&Polygon::new(corners, color(face.color).filled()))
            .map_err(draw_error)?;
    }
    for segment in &scene.segments {
        let stroke = (segment.width as f64 * scale).round().max(1.0) as u32;
        area.draw(&PathElement::new(
            vec![pixel(segment.from), pixel(segment.to)],
            color(segment.color).stroke_width(stroke),
        ))
        .map_err(draw_error)?;
    }
    for marker in &scene.markers {
        let radius = (marker.size as f64 * scale / 2.0).round().max(1.0) as i32;
        area.draw(&Circle::new(pixel(marker.at), radius, color(marker.color).filled()))
            .map_err(draw_error)?;
    }
    for label in &scene.labels {
        let (x, y) = pixel(label.at);
        let offset = (label.size as f64 * scale * 0.4) as i32;
        let font = ("sans-serif", label.size as f64 * scale)
            .into_font()
            .color(&color(label.color));
        area.draw(&Text::new(label.text.clone(), (x + offset, y - offset), font))
            .map_err(draw_error)?;
    }
    area.present().map_err(draw_error)
}

fn color(c: Rgba) -> RGBAColor {
    RGBAColor(c.r, c.g, c.b, c.a as f64)
}

fn draw_error<E: std::fmt::Display>(err: E) -> ExportError {
    ExportError::Draw(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::projection::{Face2, Marker2, Segment2};

    fn scene() -> ProjectedScene {
        ProjectedScene {
            segments: vec![Segment2 {
                from: [-1.0, -1.0],
                to: [1.0, 1.0],
                depth: 0.0,
                color: Rgba::BLACK,
                width: 3.0,
            }],
            markers: vec![Marker2 {
                at: [0.0, 0.0],
                depth: 0.0,
                color: Rgba::rgb(255, 0, 0),
                size: 6.0,
            }],
            faces: vec![Face2 {
                corners: [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
                depth: -1.0,
                color: Rgba::rgb(173, 216, 230).with_alpha(0.3),
            }],
            labels: Vec::new(),
            zoom: 1.0,
        }
    }

    #[test]
    fn file_name_carries_timestamp_and_extension() {
        assert_eq!(file_name(ExportFormat::Svg, 42), "brillouin_zone_42.svg");
        assert_eq!("PNG".parse::<ExportFormat>(), Ok(ExportFormat::Png));
        assert!("jpeg".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn svg_export_writes_vector_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_scene(&scene(), ExportFormat::Svg, dir.path()).unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("svg"));
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("<svg"));
    }

    #[test]
    fn png_export_writes_raster_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_scene(&scene(), ExportFormat::Png, &dir.path().join("nested")).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
