//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use nalgebra::{Matrix4, Point3, Vector3};
use wall_detector::{
    Mesh,
    float_types::{Real, parry3d::bounding_volume::Aabb},
    mesh::{polygon::Polygon, vertex::Vertex},
    scene::{NodeId, RenderBuffer, memory::MemoryScene},
};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Returns the bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// of a set of polygons.
pub fn bounding_box<S: Clone>(polygons: &[Polygon<S>]) -> [Real; 6] {
    let mut min = Point3::new(Real::MAX, Real::MAX, Real::MAX);
    let mut max = Point3::new(Real::MIN, Real::MIN, Real::MIN);
    for v in polygons.iter().flat_map(|p| &p.vertices) {
        min = min.inf(&v.pos);
        max = max.sup(&v.pos);
    }
    [min.x, min.y, min.z, max.x, max.y, max.z]
}

pub fn aabb(min: [Real; 3], max: [Real; 3]) -> Aabb {
    Aabb::new(Point3::from(min), Point3::from(max))
}

/// Closed box mesh spanning `min..max`, every face tagged with `tag`.
pub fn box_mesh<S: Clone + Send + Sync + std::fmt::Debug>(
    min: [Real; 3],
    max: [Real; 3],
    tag: S,
) -> Mesh<S> {
    Mesh::from_aabb(&aabb(min, max), Some(tag)).expect("non-degenerate box")
}

/// Helper to make a simple Polygon in 3D with given vertices.
pub fn make_polygon_3d(points: &[[Real; 3]]) -> Polygon<()> {
    let verts = points
        .iter()
        .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), Vector3::z()))
        .collect();
    Polygon::new(verts, None).expect("valid polygon")
}

/// A flat, two-triangle square at height `z`, as a floor plate would render.
pub fn plate_buffer(z: f32, min_xy: [f32; 2], max_xy: [f32; 2]) -> RenderBuffer {
    let [x0, y0] = min_xy;
    let [x1, y1] = max_xy;
    RenderBuffer {
        positions: vec![x0, y0, z, x1, y0, z, x1, y1, z, x0, y1, z],
        indices: vec![0, 1, 2, 0, 2, 3],
        stride: 3,
        draw_ranges: Vec::new(),
        world_matrix: Matrix4::identity(),
    }
}

/// A model with a `Floors` group of three plates at z = 0, 1.5 and 3 and a
/// `Walls` group holding one 1×1×3 wall. Returns the scene and the wall id.
pub fn single_wall_model() -> (MemoryScene, NodeId) {
    let mut scene = MemoryScene::new();
    let floors = scene.add_node(MemoryScene::ROOT, "Floors");
    for (name, z) in [("Level 0", 0.0), ("Level 1", 1.5), ("Roof", 3.0)] {
        let floor = scene.add_node(floors, name);
        scene.add_fragment(floor, plate_buffer(z, [-1.0, -1.0], [2.0, 2.0]));
    }
    let walls = scene.add_node(MemoryScene::ROOT, "Walls");
    let wall = scene
        .add_box(walls, "Wall A", &aabb([0.0, 0.0, 0.0], [1.0, 1.0, 3.0]))
        .expect("wall box");
    (scene, wall)
}
