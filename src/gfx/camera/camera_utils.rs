use cgmath::{Matrix4, Point3, Vector4};

use crate::error::{Result, ViewError};

/// Pixel dimensions of the drawing surface.
///
/// Construction fails for a zero width or height, so every `Viewport` in
/// circulation yields a finite aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ViewError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl TryFrom<(u32, u32)> for Viewport {
    type Error = ViewError;

    fn try_from((width, height): (u32, u32)) -> Result<Self> {
        Self::new(width, height)
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct ViewportUniform {
    /// Surface size in pixels.
    ///
    /// Padded to a `vec4` to fulfill the 16 byte alignment requirement.
    pub size: [f32; 4],
}

impl ViewportUniform {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            size: [viewport.width() as f32, viewport.height() as f32, 0.0, 0.0],
        }
    }
}

impl Default for ViewportUniform {
    fn default() -> Self {
        Self { size: [1.0, 1.0, 0.0, 0.0] }
    }
}

const PERSPECTIVE_EPSILON: f64 = 1e-12;

/// Transforms a point by `matrix` in homogeneous coordinates, dividing by `w`
/// when it is not degenerate.
pub fn transform_point(matrix: &Matrix4<f64>, point: Point3<f64>) -> Point3<f64> {
    let v = matrix * Vector4::new(point.x, point.y, point.z, 1.0);
    if v.w.abs() < PERSPECTIVE_EPSILON {
        Point3::new(v.x, v.y, v.z)
    } else {
        Point3::new(v.x / v.w, v.y / v.w, v.z / v.w)
    }
}

/// Transforms `(x, y, z, 1)` by `matrix` and keeps `x, y, z`; `w` is
/// discarded without dividing.
pub fn transform_point_affine(matrix: &Matrix4<f64>, point: Point3<f64>) -> Point3<f64> {
    let v = matrix * Vector4::new(point.x, point.y, point.z, 1.0);
    Point3::new(v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    #[test]
    fn test_viewport_rejects_zero_dimensions() {
        assert!(matches!(
            Viewport::new(0, 600),
            Err(ViewError::InvalidViewport { width: 0, height: 600 })
        ));
        assert!(Viewport::new(800, 0).is_err());
        assert!(Viewport::try_from((0, 0)).is_err());
    }

    #[test]
    fn test_viewport_aspect() {
        let viewport = Viewport::new(1200, 800).unwrap();
        assert_eq!(viewport.aspect(), 1.5);
        assert_eq!(ViewportUniform::new(viewport).size, [1200.0, 800.0, 0.0, 0.0]);
    }

    #[test]
    fn test_transform_point_divides_by_w() {
        let mut matrix = Matrix4::identity();
        matrix.w.w = 2.0;
        let p = transform_point(&matrix, Point3::new(2.0, 4.0, 6.0));
        assert_eq!(p, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_affine_transform_ignores_w() {
        let mut matrix = Matrix4::from_translation(cgmath::Vector3::new(1.0, 0.0, 0.0));
        matrix.w.w = 4.0;
        matrix.z.w = 3.0;
        let p = transform_point_affine(&matrix, Point3::new(2.0, 4.0, 6.0));
        assert_eq!(p, Point3::new(3.0, 4.0, 6.0));
    }
}
