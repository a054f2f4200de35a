use ndarray::{arr2, Array2, ArrayView2};

pub struct MatrixHelper;

impl MatrixHelper {
    /// Multiply two 2D arrays.
    pub fn multiply(lhs: ArrayView2<f64>, rhs: ArrayView2<f64>) -> Array2<f64> {
        lhs.dot(&rhs)
    }

    /// Rows are screen-right, screen-up and the direction towards the viewer
    /// for a camera orbiting the origin at `azimuth`/`elevation` (radians).
    pub fn view_rotation(azimuth: f64, elevation: f64) -> Array2<f64> {
        let (sin_az, cos_az) = azimuth.sin_cos();
        let (sin_el, cos_el) = elevation.sin_cos();
        arr2(&[
            [-sin_az, cos_az, 0.0],
            [-sin_el * cos_az, -sin_el * sin_az, cos_el],
            [cos_el * cos_az, cos_el * sin_az, sin_el],
        ])
    }

    /// Packs points as rows of an `n x 3` matrix.
    pub fn from_points(points: &[[f64; 3]]) -> Array2<f64> {
        let mut out = Array2::zeros((points.len(), 3));
        for (mut row, point) in out.rows_mut().into_iter().zip(points) {
            row[0] = point[0];
            row[1] = point[1];
            row[2] = point[2];
        }
        out
    }

    /// Applies `rotation` to every row of `points`.
    pub fn rotate_rows(points: ArrayView2<f64>, rotation: ArrayView2<f64>) -> Array2<f64> {
        Self::multiply(points, rotation.t())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_rotation_is_orthonormal() {
        let rotation = MatrixHelper::view_rotation(0.7, 0.3);
        let identity = MatrixHelper::multiply(rotation.view(), rotation.t());
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((identity[[i, j]] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn side_view_keeps_x_horizontal_and_z_vertical() {
        let rotation = MatrixHelper::view_rotation(-std::f64::consts::FRAC_PI_2, 0.0);
        let points = MatrixHelper::from_points(&[[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        let rotated = MatrixHelper::rotate_rows(points.view(), rotation.view());
        assert!((rotated[[0, 0]] - 1.0).abs() < 1e-12);
        assert!(rotated[[0, 1]].abs() < 1e-12);
        assert!((rotated[[1, 1]] - 1.0).abs() < 1e-12);
    }
}
