mod support;

use nalgebra::{Point3, Vector3};
use wall_detector::{
    float_types::Real,
    mesh::{
        bsp::{BalancedSplittingStrategy, Node, SerialBspOps},
        plane::Plane,
        polygon::Polygon,
        vertex::Vertex,
    },
};

use crate::support::{approx_eq, box_mesh, make_polygon_3d};

fn triangle() -> Polygon<()> {
    make_polygon_3d(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
}

#[test]
fn new_and_build() {
    let p = triangle();
    let node: Node<()> = Node::from_polygons(&[p.clone()]);
    // one polygon: it becomes the splitter and the only coplanar entry
    assert_eq!(node.plane.as_ref(), Some(&p.plane));
    assert_eq!(node.polygons.len(), 1);
    assert!(node.front.is_none());
    assert!(node.back.is_none());
}

#[test]
fn first_polygon_is_the_splitter() {
    let cube = box_mesh([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], ());
    let node = Node::from_polygons(&cube.polygons);
    assert_eq!(node.plane.as_ref(), Some(&cube.polygons[0].plane));
    assert_eq!(node.polygon_count(), 6);
    // a convex solid chains down one side of each splitter
    assert_eq!(node.depth(), 6);
}

#[test]
fn invert() {
    let p = triangle();
    let mut node: Node<()> = Node::from_polygons(&[p.clone()]);
    let original_normal = node.plane.as_ref().map(Plane::normal).expect("plane");
    node.invert();
    let flipped_normal = node.plane.as_ref().map(Plane::normal).expect("plane");
    assert_eq!(flipped_normal, -original_normal);
    assert_eq!(node.polygons.len(), 1);
    assert_eq!(node.polygons[0].plane.normal(), -p.plane.normal());
}

#[test]
fn invert_twice_is_identity() {
    let cube = box_mesh([0.0, 0.0, 0.0], [2.0, 1.0, 1.0], ());
    let original = Node::from_polygons(&cube.polygons);
    let mut node = original.clone();
    node.invert();
    node.invert();
    assert_eq!(node.all_polygons(), original.all_polygons());
}

#[test]
fn clip_polygons_removes_inside_parts() {
    let cube = box_mesh([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], ());
    let node = Node::from_polygons(&cube.polygons);

    // a square crossing the cube at z = 0.5, twice as wide as the cube
    let square = make_polygon_3d(&[
        [-0.5, 0.25, 0.5],
        [1.5, 0.25, 0.5],
        [1.5, 0.75, 0.5],
        [-0.5, 0.75, 0.5],
    ]);
    let kept = node.clip_polygons(&[square.clone()]);
    let area: Real = kept.iter().map(|p| p.area()).sum();
    // the middle half lies inside the cube and is removed
    assert!(approx_eq(area, square.area() / 2.0, 1e-9));
    for p in &kept {
        for v in &p.vertices {
            assert!(v.pos.x <= 1e-9 || v.pos.x >= 1.0 - 1e-9);
        }
    }
}

#[test]
fn clip_to_empties_contained_tree() {
    let outer = Node::from_polygons(&box_mesh([0.0, 0.0, 0.0], [4.0, 4.0, 4.0], ()).polygons);
    let mut inner = Node::from_polygons(&box_mesh([1.0, 1.0, 1.0], [2.0, 2.0, 2.0], ()).polygons);
    inner.clip_to(&outer);
    assert!(inner.is_empty());
    assert!(inner.all_polygons().is_empty());
}

#[test]
fn all_polygons_is_deterministic() {
    let cube = box_mesh([0.0, 0.0, 0.0], [1.0, 2.0, 3.0], ());
    let a = Node::from_polygons(&cube.polygons).all_polygons();
    let b = Node::from_polygons(&cube.polygons).all_polygons();
    assert_eq!(a, b);
}

#[test]
fn balanced_strategy_builds_equivalent_solid() {
    let a = box_mesh([0.0, 0.0, 0.0], [2.0, 2.0, 2.0], ());
    let b = box_mesh([1.0, 1.0, 1.0], [3.0, 3.0, 3.0], ());
    let ops = SerialBspOps::with_strategy(BalancedSplittingStrategy::default());
    let balanced_a = Node::from_polygons_with(&a.polygons, &ops);
    let balanced_b = Node::from_polygons_with(&b.polygons, &ops);

    let default_volume = Node::from_polygons(&a.polygons)
        .intersect(&Node::from_polygons(&b.polygons))
        .to_mesh(None)
        .volume();
    let balanced_volume = balanced_a.intersect(&balanced_b).to_mesh(None).volume();
    assert!(approx_eq(default_volume, 1.0, 1e-9));
    assert!(approx_eq(balanced_volume, 1.0, 1e-9));
}

#[test]
fn build_extends_existing_tree() {
    let mut node: Node<()> = Node::new();
    node.build(&[triangle()]);
    let above: Polygon<()> = Polygon::new(
        vec![
            Vertex::new(Point3::new(0.0, 0.0, 1.0), Vector3::z()),
            Vertex::new(Point3::new(1.0, 0.0, 1.0), Vector3::z()),
            Vertex::new(Point3::new(0.0, 1.0, 1.0), Vector3::z()),
        ],
        None,
    )
    .expect("triangle");
    node.build(&[above]);
    assert_eq!(node.polygon_count(), 2);
    assert!(node.front.is_some());
    assert!(node.back.is_none());
}
