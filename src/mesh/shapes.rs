//! Box solids: the slab volumes and test fixtures are all axis-aligned boxes.

use crate::errors::ValidationError;
use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::mesh::{Mesh, polygon::Polygon, vertex::Vertex};
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;
use std::sync::OnceLock;

// Corner indices into `[min, max]` per axis, one quad per face, CCW seen from outside.
const FACES: [([usize; 4], [Real; 3]); 6] = [
    ([0, 3, 2, 1], [0.0, 0.0, -1.0]), // bottom
    ([4, 5, 6, 7], [0.0, 0.0, 1.0]),  // top
    ([0, 1, 5, 4], [0.0, -1.0, 0.0]), // front
    ([3, 7, 6, 2], [0.0, 1.0, 0.0]),  // back
    ([0, 4, 7, 3], [-1.0, 0.0, 0.0]), // left
    ([1, 2, 6, 5], [1.0, 0.0, 0.0]),  // right
];

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Create a right prism (a box) that spans from (0, 0, 0)
    /// to (width, length, height). All dimensions must be positive.
    ///
    /// ## Errors
    /// Propagates [`ValidationError`] when a face collapses (zero extent) or a
    /// dimension is not finite.
    pub fn cuboid(
        width: Real,
        length: Real,
        height: Real,
        metadata: Option<S>,
    ) -> Result<Mesh<S>, ValidationError> {
        let aabb = Aabb::new(Point3::origin(), Point3::new(width, length, height));
        Self::from_aabb(&aabb, metadata)
    }

    /// Closed box over `aabb`, outward-facing. Every face polygon carries
    /// `metadata`.
    pub fn from_aabb(aabb: &Aabb, metadata: Option<S>) -> Result<Mesh<S>, ValidationError> {
        let (min, max) = (aabb.mins, aabb.maxs);
        let corners = [
            Point3::new(min.x, min.y, min.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(min.x, max.y, min.z),
            Point3::new(min.x, min.y, max.z),
            Point3::new(max.x, min.y, max.z),
            Point3::new(max.x, max.y, max.z),
            Point3::new(min.x, max.y, max.z),
        ];

        let polygons = FACES
            .iter()
            .map(|(idx, n)| {
                let normal = Vector3::new(n[0], n[1], n[2]);
                let vertices = idx.iter().map(|&i| Vertex::new(corners[i], normal)).collect();
                Polygon::new(vertices, metadata.clone())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Mesh {
            polygons,
            bounding_box: OnceLock::new(),
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::CSGOps;

    #[test]
    fn cuboid_faces_point_outward() {
        let cube: Mesh<()> = Mesh::cuboid(2.0, 3.0, 4.0, None).expect("cuboid");
        assert_eq!(cube.polygons.len(), 6);
        let center = Point3::new(1.0, 1.5, 2.0);
        for poly in &cube.polygons {
            assert!(poly.plane.signed_distance(&center) < 0.0);
        }
        assert!((cube.volume() - 24.0).abs() < 1e-9);
        assert!((cube.surface_area() - 52.0).abs() < 1e-9);
        assert_eq!(cube.bounding_box().maxs, Point3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn flat_box_is_rejected() {
        let flat = Mesh::<()>::cuboid(1.0, 1.0, 0.0, None);
        assert!(matches!(flat, Err(ValidationError::DegeneratePolygon(_))));
    }
}
