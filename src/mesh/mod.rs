//! `Mesh` struct and implementations of the `CSGOps` trait for `Mesh`

use crate::errors::ValidationError;
use crate::float_types::{
    Real,
    parry3d::{
        bounding_volume::{Aabb, BoundingVolume},
        query::{Ray, RayCast},
        shape::Triangle,
    },
    tolerance,
};
use crate::mesh::{bsp::Node, plane::Plane, polygon::Polygon, vertex::Vertex};
use crate::traits::CSGOps;
use nalgebra::{Matrix4, Point3, Vector3};
use std::{fmt::Debug, sync::OnceLock};

pub mod bsp;
pub mod plane;
pub mod polygon;
pub mod shapes;
pub mod vertex;

/// A polygon soup bounding a solid, plus an optional mesh-level tag.
#[derive(Clone, Debug)]
pub struct Mesh<S: Clone + Send + Sync + Debug> {
    /// 3D polygons for volumetric shapes
    pub polygons: Vec<Polygon<S>>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<Aabb>,

    /// Metadata
    pub metadata: Option<S>,
}

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Build a Mesh from an existing polygon list
    pub fn from_polygons(polygons: &[Polygon<S>], metadata: Option<S>) -> Self {
        Mesh {
            polygons: polygons.to_vec(),
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Build a Mesh from world-space triangles, tagging every polygon with
    /// `metadata`. Triangles without area are skipped.
    ///
    /// ## Errors
    /// [`ValidationError::InvalidCoordinate`] if any corner is NaN or infinite.
    pub fn from_triangles(
        triangles: &[[Point3<Real>; 3]],
        metadata: Option<S>,
    ) -> Result<Self, ValidationError> {
        let mut polygons = Vec::with_capacity(triangles.len());
        for tri in triangles {
            match Polygon::triangle(*tri, metadata.clone()) {
                Ok(polygon) => polygons.push(polygon),
                Err(ValidationError::DegeneratePolygon(at)) => {
                    log::trace!("skipping degenerate triangle at {at}");
                },
                Err(err) => return Err(err),
            }
        }
        Ok(Mesh {
            polygons,
            bounding_box: OnceLock::new(),
            metadata,
        })
    }

    /// `true` when the mesh has no polygons.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Build the boundary solid of this mesh.
    pub fn to_bsp(&self) -> Node<S> {
        Node::from_polygons(&self.polygons)
    }

    /// Helper to collect all vertices from the Mesh.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.polygons
            .iter()
            .flat_map(|p| p.vertices.iter().copied())
            .collect()
    }

    /// Triangulate each polygon in the Mesh returning a Mesh containing triangles
    pub fn triangulate(&self) -> Mesh<S> {
        let triangles = self
            .polygons
            .iter()
            .flat_map(|poly| {
                poly.triangulate()
                    .into_iter()
                    .map(move |triangle| poly.with_vertices(triangle.to_vec()))
            })
            .collect::<Vec<_>>();

        Mesh::from_polygons(&triangles, self.metadata.clone())
    }

    /// Extracts vertices and indices from the Mesh's tessellated polygons,
    /// ready for a host render buffer. Vertices are not shared between triangles.
    pub fn vertices_and_indices(&self) -> (Vec<Point3<Real>>, Vec<[u32; 3]>) {
        let triangles: Vec<[Vertex; 3]> =
            self.polygons.iter().flat_map(|p| p.triangulate()).collect();
        let vertices = triangles
            .iter()
            .flat_map(|t| [t[0].pos, t[1].pos, t[2].pos])
            .collect();
        let indices = (0..triangles.len())
            .map(|i| {
                let offset = i as u32 * 3;
                [offset, offset + 1, offset + 2]
            })
            .collect();

        (vertices, indices)
    }

    /// Casts a ray defined by `origin` + t * `direction` against all triangles
    /// of this Mesh and returns a list of (intersection_point, distance),
    /// sorted by ascending distance.
    ///
    /// # Returns
    /// A `Vec` of `(Point3<Real>, Real)` where:
    /// - `Point3<Real>` is the intersection coordinate in 3D,
    /// - `Real` is the ray parameter t (a distance when `direction` is unit).
    pub fn ray_intersections(
        &self,
        origin: &Point3<Real>,
        direction: &Vector3<Real>,
    ) -> Vec<(Point3<Real>, Real)> {
        let ray = Ray::new(*origin, *direction);
        let mut hits = Vec::new();

        for poly in &self.polygons {
            for tri in poly.triangulate() {
                let triangle = Triangle::new(tri[0].pos, tri[1].pos, tri[2].pos);
                if let Some(toi) = triangle.cast_local_ray(&ray, Real::MAX, true) {
                    hits.push((ray.point_at(toi), toi));
                }
            }
        }

        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        // neighbouring triangles report the same hit along shared edges
        hits.dedup_by(|a, b| (a.1 - b.1).abs() < tolerance());

        hits
    }

    /// Enclosed volume, by the divergence theorem over the triangulated surface.
    /// Meaningful for closed, outward-facing meshes.
    pub fn volume(&self) -> Real {
        self.polygons
            .iter()
            .flat_map(|p| p.triangulate())
            .map(|t| t[0].pos.coords.dot(&t[1].pos.coords.cross(&t[2].pos.coords)) / 6.0)
            .sum()
    }

    /// Total area of the boundary surface.
    pub fn surface_area(&self) -> Real {
        self.polygons.iter().map(|p| p.area()).sum()
    }
}

impl<S: Clone + Send + Sync + Debug> CSGOps for Mesh<S> {
    /// Returns a new empty Mesh
    fn new() -> Self {
        Mesh {
            polygons: Vec::new(),
            bounding_box: OnceLock::new(),
            metadata: None,
        }
    }

    fn union(&self, other: &Mesh<S>) -> Mesh<S> {
        let result = self.to_bsp().union(&other.to_bsp());
        Mesh::from_polygons(&result.all_polygons(), self.metadata.clone())
    }

    fn difference(&self, other: &Mesh<S>) -> Mesh<S> {
        let result = self.to_bsp().subtract(&other.to_bsp());
        Mesh::from_polygons(&result.all_polygons(), self.metadata.clone())
    }

    fn intersection(&self, other: &Mesh<S>) -> Mesh<S> {
        let result = self.to_bsp().intersect(&other.to_bsp());
        Mesh::from_polygons(&result.all_polygons(), self.metadata.clone())
    }

    fn xor(&self, other: &Mesh<S>) -> Mesh<S> {
        let a_sub_b = self.difference(other);
        let b_sub_a = other.difference(self);
        a_sub_b.union(&b_sub_a)
    }

    /// Apply an affine transform to every vertex. Normals use the inverse
    /// transpose; planes are re-derived and polygons that collapse are dropped.
    fn transform(&self, mat: &Matrix4<Real>) -> Mesh<S> {
        let mat_inv_transpose = mat
            .try_inverse()
            .map(|inv| inv.transpose())
            .unwrap_or_else(Matrix4::identity);

        let polygons = self
            .polygons
            .iter()
            .filter_map(|poly| {
                let vertices: Vec<Vertex> = poly
                    .vertices
                    .iter()
                    .map(|v| {
                        let normal = mat_inv_transpose.transform_vector(&v.normal);
                        let normal = normal.try_normalize(Real::EPSILON).unwrap_or(normal);
                        Vertex::new(mat.transform_point(&v.pos), normal)
                    })
                    .collect();
                let plane = Plane::from_vertices(&vertices)?;
                let mut moved = poly.with_vertices(vertices);
                moved.plane = plane;
                Some(moved)
            })
            .collect::<Vec<_>>();

        Mesh::from_polygons(&polygons, self.metadata.clone())
    }

    /// Returns a [`parry3d::bounding_volume::Aabb`] indicating the 3D bounds of all `polygons`.
    fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            self.polygons
                .iter()
                .map(|p| p.bounding_box())
                .reduce(|acc, bb| acc.merged(&bb))
                // no polygons: a trivial AABB at the origin
                .unwrap_or_else(|| Aabb::new(Point3::origin(), Point3::origin()))
        })
    }

    /// Invalidates object's cached bounding box.
    fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// Invert this Mesh (flip inside vs. outside)
    fn inverse(&self) -> Mesh<S> {
        let mut mesh = self.clone();
        for p in &mut mesh.polygons {
            p.flip();
        }
        mesh
    }
}
