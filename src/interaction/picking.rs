//! Pointer to world-space ray.

use crate::float_types::{Real, parry3d::query::Ray};
use nalgebra::{Matrix4, Point3};

/// Pointer position in pixels, origin at the top-left of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: Real,
    pub y: Real,
}

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: Real,
    pub height: Real,
}

/// A camera reduced to its combined projection * view matrix. Perspective and
/// orthographic projections are both handled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub view_projection: Matrix4<Real>,
}

impl Camera {
    pub fn new(projection: &Matrix4<Real>, view: &Matrix4<Real>) -> Self {
        Camera {
            view_projection: projection * view,
        }
    }
}

/// Ray through the pointer, starting on the near plane, with a unit direction.
///
/// The pointer is mapped to normalized device coordinates and unprojected at
/// the near and far planes. For a perspective camera the two points diverge
/// from the eye; for an orthographic one they share the view direction.
/// `None` for an empty viewport, a non-finite pointer or a singular camera.
pub fn pointer_ray(pointer: &Pointer, viewport: &Viewport, camera: &Camera) -> Option<Ray> {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return None;
    }
    if !pointer.x.is_finite() || !pointer.y.is_finite() {
        return None;
    }
    let x = 2.0 * pointer.x / viewport.width - 1.0;
    let y = 1.0 - 2.0 * pointer.y / viewport.height;

    let inverse = camera.view_projection.try_inverse()?;
    let near = inverse.transform_point(&Point3::new(x, y, -1.0));
    let far = inverse.transform_point(&Point3::new(x, y, 1.0));
    let dir = (far - near).try_normalize(Real::EPSILON)?;

    Some(Ray::new(near, dir))
}
