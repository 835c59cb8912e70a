//! Convex planar polygons with an attached tag.

use crate::errors::ValidationError;
use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use std::sync::OnceLock;

/// A polygon: an ordered ring of coplanar vertices, its plane, and a tag.
///
/// The tag (`metadata`) is opaque to the geometry engine. Every piece cut from a
/// polygon carries a clone of it, so results can be traced back to their source.
#[derive(Debug, Clone)]
pub struct Polygon<S: Clone> {
    pub vertices: Vec<Vertex>,

    /// The plane on which this polygon lies, used for splitting
    pub plane: Plane,

    /// Lazily-computed bounding box
    pub bounding_box: OnceLock<Aabb>,

    /// Generic metadata
    pub metadata: Option<S>,
}

impl<S: Clone + PartialEq> PartialEq for Polygon<S> {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
            && self.plane == other.plane
            && self.metadata == other.metadata
    }
}

impl<S: Clone + Send + Sync> Polygon<S> {
    /// Create a polygon from a vertex ring, deriving its plane.
    ///
    /// ## Errors
    /// - [`ValidationError::TooFewPoints`] for fewer than three vertices
    /// - [`ValidationError::InvalidCoordinate`] for NaN or infinite positions
    /// - [`ValidationError::DegeneratePolygon`] when the ring has no area
    pub fn new(vertices: Vec<Vertex>, metadata: Option<S>) -> Result<Self, ValidationError> {
        let first = vertices.first().map(|v| v.pos).unwrap_or_else(Point3::origin);
        if vertices.len() < 3 {
            return Err(ValidationError::TooFewPoints(first));
        }
        if let Some(bad) = vertices.iter().find(|v| !v.is_finite()) {
            return Err(ValidationError::InvalidCoordinate(bad.pos));
        }
        let plane =
            Plane::from_vertices(&vertices).ok_or(ValidationError::DegeneratePolygon(first))?;

        Ok(Polygon {
            vertices,
            plane,
            bounding_box: OnceLock::new(),
            metadata,
        })
    }

    /// Build a triangle from three positions; vertex normals are set to the
    /// face normal.
    pub fn triangle(points: [Point3<Real>; 3], metadata: Option<S>) -> Result<Self, ValidationError> {
        let mut polygon = Self::new(
            points
                .iter()
                .map(|p| Vertex::new(*p, Vector3::zeros()))
                .collect(),
            metadata,
        )?;
        polygon.set_new_normal();
        Ok(polygon)
    }

    /// A piece of this polygon: same plane, same tag, new ring.
    pub(crate) fn with_vertices(&self, vertices: Vec<Vertex>) -> Self {
        debug_assert!(vertices.len() >= 3, "split produced a degenerate piece");
        Polygon {
            vertices,
            plane: self.plane.clone(),
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        }
    }

    /// Reverse winding order, flip vertex normals, and flip the plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    /// Assign the plane normal to every vertex.
    pub fn set_new_normal(&mut self) {
        let normal = self.plane.normal();
        for v in &mut self.vertices {
            v.normal = normal;
        }
    }

    /// Fan triangulation from vertex 0. Polygons in this crate are convex
    /// (triangles and pieces cut from them), so the fan is exact.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        if self.vertices.len() < 3 {
            return Vec::new();
        }
        let anchor = self.vertices[0];
        self.vertices
            .windows(2)
            .skip(1)
            .map(|pair| [anchor, pair[0], pair[1]])
            .collect()
    }

    /// Area of the polygon, measured in its own plane.
    pub fn area(&self) -> Real {
        if self.vertices.len() < 3 {
            return 0.0;
        }
        let origin = self.vertices[0].pos;
        let doubled = self
            .vertices
            .windows(2)
            .skip(1)
            .fold(Vector3::zeros(), |acc, pair| {
                acc + (pair[0].pos - origin).cross(&(pair[1].pos - origin))
            });
        0.5 * doubled.dot(&self.plane.normal()).abs()
    }

    /// Iterate over the ring's edges as `(start, end)` pairs, closing the loop.
    pub fn edges(&self) -> impl Iterator<Item = (&Vertex, &Vertex)> {
        self.vertices.iter().zip(self.vertices.iter().cycle().skip(1))
    }

    /// Axis-aligned bounds of the vertex ring, computed once.
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for v in &self.vertices {
                mins = mins.inf(&v.pos);
                maxs = maxs.sup(&v.pos);
            }
            Aabb::new(mins, maxs)
        })
    }
}
