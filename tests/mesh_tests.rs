mod support;

use nalgebra::{Matrix4, Point3, Vector3};
use wall_detector::{CSGOps, Mesh, errors::ValidationError};

use crate::support::{approx_eq, box_mesh};

#[test]
fn cuboid_measures() {
    let cube: Mesh<()> = Mesh::cuboid(1.0, 2.0, 3.0, None).expect("cuboid");
    assert!(approx_eq(cube.volume(), 6.0, 1e-12));
    assert!(approx_eq(cube.surface_area(), 22.0, 1e-12));
    let bb = cube.bounding_box();
    assert_eq!(bb.mins, Point3::origin());
    assert_eq!(bb.maxs, Point3::new(1.0, 2.0, 3.0));
}

#[test]
fn empty_mesh() {
    let mesh: Mesh<()> = Mesh::new();
    assert!(mesh.is_empty());
    assert_eq!(mesh.volume(), 0.0);
    assert_eq!(mesh.bounding_box().mins, Point3::origin());
    assert!(mesh.ray_intersections(&Point3::origin(), &Vector3::x()).is_empty());
}

#[test]
fn triangulate_keeps_area_and_tags() {
    let cube = box_mesh([0.0, 0.0, 0.0], [2.0, 2.0, 2.0], 5u8);
    let tris = cube.triangulate();
    assert_eq!(tris.polygons.len(), 12);
    assert!(tris.polygons.iter().all(|p| p.vertices.len() == 3));
    assert!(tris.polygons.iter().all(|p| p.metadata == Some(5)));
    assert!(approx_eq(tris.surface_area(), cube.surface_area(), 1e-12));
    assert!(approx_eq(tris.volume(), 8.0, 1e-12));
}

#[test]
fn vertices_and_indices_export() {
    let cube = box_mesh([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], ());
    let (vertices, indices) = cube.vertices_and_indices();
    assert_eq!(indices.len(), 12);
    assert_eq!(vertices.len(), 36);
    assert_eq!(indices[11], [33, 34, 35]);
    assert_eq!(cube.vertices().len(), 24);
}

#[test]
fn ray_intersections_are_sorted() {
    let cube = box_mesh([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], ());
    let hits = cube.ray_intersections(&Point3::new(-2.0, 0.3, 0.6), &Vector3::x());
    assert_eq!(hits.len(), 2);
    assert!(approx_eq(hits[0].1, 2.0, 1e-9));
    assert!(approx_eq(hits[1].1, 3.0, 1e-9));
    assert!(approx_eq(hits[1].0.x, 1.0, 1e-9));

    let miss = cube.ray_intersections(&Point3::new(-2.0, 3.0, 0.5), &Vector3::x());
    assert!(miss.is_empty());
}

#[test]
fn transform_moves_and_reorients() {
    let cube = box_mesh([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], ());
    let moved = cube.translate(2.0, 0.0, -1.0);
    let bb = moved.bounding_box();
    assert_eq!(bb.mins, Point3::new(2.0, 0.0, -1.0));
    assert!(approx_eq(moved.volume(), 1.0, 1e-12));

    // mirroring turns the solid inside out
    let mirrored = cube.transform(&Matrix4::new_nonuniform_scaling(&Vector3::new(-1.0, 1.0, 1.0)));
    assert!(approx_eq(mirrored.volume(), -1.0, 1e-12));
    assert!(approx_eq(mirrored.inverse().volume(), 1.0, 1e-12));

    let centered = box_mesh([2.0, 2.0, 2.0], [4.0, 6.0, 4.0], ()).center();
    assert_eq!(centered.bounding_box().mins, Point3::new(-1.0, -2.0, -1.0));
}

#[test]
fn flattening_transform_drops_collapsed_faces() {
    let cube = box_mesh([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], ());
    let flat = cube.scale(1.0, 1.0, 0.0);
    // only top and bottom survive
    assert_eq!(flat.polygons.len(), 2);
}

#[test]
fn triangles_without_area_are_skipped() {
    let tris = [
        [Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
        [Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)],
    ];
    let mesh: Mesh<u8> = Mesh::from_triangles(&tris, Some(1)).expect("mesh");
    assert_eq!(mesh.polygons.len(), 1);

    let bad = [[
        Point3::origin(),
        Point3::new(f64::NAN, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ]];
    assert!(matches!(
        Mesh::<u8>::from_triangles(&bad, None),
        Err(ValidationError::InvalidCoordinate(_))
    ));
}
