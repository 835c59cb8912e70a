//! Planes and the polygon splitting they drive.

use crate::float_types::{Real, tolerance};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

// Classification bitmask: SPANNING == FRONT | BACK
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// Result of [`Plane::split_polygon`]: `(coplanar_front, coplanar_back, front, back)`.
pub type SplitPolygons<S> = (
    Vec<Polygon<S>>,
    Vec<Polygon<S>>,
    Vec<Polygon<S>>,
    Vec<Polygon<S>>,
);

/// An oriented plane `n · p = w` with unit normal `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vector3<Real>,
    pub w: Real,
}

impl Plane {
    /// Create a plane from a (not necessarily unit) normal and its offset along
    /// that normal. The offset is rescaled with the normal. `None` for a
    /// zero or non-finite normal, or a non-finite offset.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Option<Self> {
        let len = normal.norm();
        if !len.is_finite() || !w.is_finite() || len <= tolerance() * tolerance() {
            return None;
        }
        Some(Plane {
            normal: normal / len,
            w: w / len,
        })
    }

    /// Plane through three points, oriented by the right-hand rule
    /// `(b - a) × (c - a)`. `None` when the points are (nearly) collinear.
    pub fn from_points(a: &Point3<Real>, b: &Point3<Real>, c: &Point3<Real>) -> Option<Self> {
        let normal = (b - a).cross(&(c - a));
        let len = normal.norm();
        if !len.is_finite() || len <= tolerance() * tolerance() {
            return None;
        }
        let normal = normal / len;
        Some(Plane {
            normal,
            w: normal.dot(&a.coords),
        })
    }

    /// Derive the plane of a polygon from its vertices.
    ///
    /// The first three vertices are tried first. When they happen to be
    /// collinear, Newell's method over the whole ring picks the normal, so a
    /// valid quad whose leading corner is straight still yields its plane.
    /// Returns `None` for rings without area.
    pub fn from_vertices(vertices: &[Vertex]) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        if let Some(plane) =
            Self::from_points(&vertices[0].pos, &vertices[1].pos, &vertices[2].pos)
        {
            return Some(plane);
        }

        let newell = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .fold(Vector3::zeros(), |acc, (curr, next)| {
                acc + curr.pos.coords.cross(&next.pos.coords)
            });
        let len = newell.norm();
        if !len.is_finite() || len <= tolerance() * tolerance() {
            return None;
        }
        let normal = newell / len;
        let centroid = vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.pos.coords)
            / vertices.len() as Real;
        Some(Plane {
            normal,
            w: normal.dot(&centroid),
        })
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Flip the plane (reverse normal and offset)
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    pub fn flipped(&self) -> Self {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Signed distance of `point` from the plane; positive in front.
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as `FRONT`, `BACK` or `COPLANAR` using the crate tolerance.
    /// The test is symmetric, so a flipped plane swaps `FRONT` and `BACK` exactly.
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let t = self.signed_distance(point);
        let eps = tolerance();
        if t < -eps {
            BACK
        } else if t > eps {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Classify a polygon with respect to the plane.
    /// Returns a bitmask of `COPLANAR`, `FRONT` and `BACK`.
    pub fn classify_polygon<S: Clone>(&self, polygon: &Polygon<S>) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos))
    }

    /// Splits a polygon by this plane, returning four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    ///
    /// Coplanar polygons land in `coplanar_front` when they face the same way as
    /// the plane. Spanning polygons are cut at the edge crossings; pieces with
    /// fewer than three vertices are dropped. Every piece keeps the parent's
    /// plane and tag.
    pub fn split_polygon<S: Clone + Send + Sync + Debug>(
        &self,
        polygon: &Polygon<S>,
    ) -> SplitPolygons<S> {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let count = polygon.vertices.len();
                let mut split_front = Vec::with_capacity(count + 1);
                let mut split_back = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let (type_i, type_j) = (types[i], types[j]);
                    let vertex_i = &polygon.vertices[i];
                    let vertex_j = &polygon.vertices[j];

                    if type_i != BACK {
                        split_front.push(*vertex_i);
                    }
                    if type_i != FRONT {
                        split_back.push(*vertex_i);
                    }

                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vertex_j.pos - vertex_i.pos));
                        // a spanning edge always has a non-zero projection
                        if denom.abs() > Real::EPSILON {
                            let t = (self.w - self.normal.dot(&vertex_i.pos.coords)) / denom;
                            let crossing = vertex_i.interpolate(vertex_j, t);
                            split_front.push(crossing);
                            split_back.push(crossing);
                        }
                    }
                }

                if split_front.len() >= 3 {
                    front.push(polygon.with_vertices(split_front));
                }
                if split_back.len() >= 3 {
                    back.push(polygon.with_vertices(split_back));
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }

    /// Clip a polygon against the plane, returning `(front, back)`.
    ///
    /// Coplanar input goes to `front` when it faces the same way as the plane
    /// and to `back` otherwise, matching how BSP clipping routes it.
    pub fn clip_polygon<S: Clone + Send + Sync + Debug>(
        &self,
        polygon: &Polygon<S>,
    ) -> (Vec<Polygon<S>>, Vec<Polygon<S>>) {
        let (coplanar_front, coplanar_back, mut front, mut back) = self.split_polygon(polygon);
        front.extend(coplanar_front);
        back.extend(coplanar_back);
        (front, back)
    }
}
