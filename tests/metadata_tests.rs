mod support;

use wall_detector::mesh::bsp::Node;
use wall_detector::mesh::plane::Plane;
use nalgebra::Vector3;

use crate::support::box_mesh;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Wall(u32),
    Slab(u32),
}

#[test]
fn intersection_keeps_every_tag() {
    let wall = Node::from_polygons(&box_mesh([0.0, 0.0, 0.0], [1.0, 0.3, 3.0], Source::Wall(4)).polygons);
    let slab = Node::from_polygons(&box_mesh([-1.0, -1.0, 1.0], [2.0, 2.0, 2.0], Source::Slab(0)).polygons);

    let result = slab.intersect(&wall).all_polygons();
    assert!(!result.is_empty());
    let mut saw_wall = false;
    let mut saw_slab = false;
    for poly in &result {
        match poly.metadata {
            Some(Source::Wall(4)) => saw_wall = true,
            Some(Source::Slab(0)) => saw_slab = true,
            other => panic!("unexpected tag {other:?}"),
        }
    }
    // side faces come from the wall, the cut caps from the slab
    assert!(saw_wall && saw_slab);
}

#[test]
fn caps_come_from_the_slab() {
    let wall = Node::from_polygons(&box_mesh([0.0, 0.0, 0.0], [1.0, 0.3, 3.0], Source::Wall(1)).polygons);
    let slab = Node::from_polygons(&box_mesh([-1.0, -1.0, 1.0], [2.0, 2.0, 2.0], Source::Slab(2)).polygons);

    for poly in slab.intersect(&wall).all_polygons() {
        let horizontal = poly.plane.normal().z.abs() > 0.5;
        let expected = if horizontal { Source::Slab(2) } else { Source::Wall(1) };
        assert_eq!(poly.metadata, Some(expected));
    }
}

#[test]
fn union_and_subtract_keep_tags() {
    let a = Node::from_polygons(&box_mesh([0.0, 0.0, 0.0], [2.0, 2.0, 2.0], Source::Wall(1)).polygons);
    let b = Node::from_polygons(&box_mesh([1.0, 1.0, 1.0], [3.0, 3.0, 3.0], Source::Wall(2)).polygons);
    for poly in a.union(&b).all_polygons().iter().chain(&a.subtract(&b).all_polygons()) {
        assert!(matches!(poly.metadata, Some(Source::Wall(1 | 2))));
    }
}

#[test]
fn clipping_keeps_tags() {
    let cube = box_mesh([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], Source::Wall(9));
    let plane = Plane::from_normal(Vector3::new(1.0, 1.0, 1.0), 1.5).expect("plane");
    for poly in &cube.polygons {
        let (front, back) = plane.clip_polygon(poly);
        for piece in front.iter().chain(&back) {
            assert_eq!(piece.metadata, Some(Source::Wall(9)));
        }
    }

    let tree = Node::from_polygons(&cube.polygons);
    let other = box_mesh([0.5, 0.5, 0.5], [2.0, 2.0, 2.0], Source::Slab(3));
    for piece in tree.clip_polygons(&other.polygons) {
        assert_eq!(piece.metadata, Some(Source::Slab(3)));
    }
}
