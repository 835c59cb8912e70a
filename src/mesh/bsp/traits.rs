//! Traits defining BSP tree operations for dependency inversion

use crate::float_types::Real;
use crate::mesh::bsp::node::Node;
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane};
use crate::mesh::polygon::Polygon;
use std::fmt::Debug;

/// Core BSP operations trait - implements algorithms on BSP nodes
pub trait BspOps<S: Clone + Send + Sync + Debug> {
    /// Invert all polygons in the BSP tree, swapping solid and empty space
    fn invert(&self, node: &mut Node<S>);

    /// Remove all parts of `polygons` that lie inside the solid of `node`
    fn clip_polygons(&self, node: &Node<S>, polygons: &[Polygon<S>]) -> Vec<Polygon<S>>;

    /// Remove all polygons of `node` that are inside the `other` tree
    fn clip_to(&self, node: &mut Node<S>, other: &Node<S>);

    /// Insert polygons into the tree, splitting them along existing planes
    fn build(&self, node: &mut Node<S>, polygons: &[Polygon<S>]);

    /// Pre-order collection of every node's polygons
    fn all_polygons(&self, node: &Node<S>) -> Vec<Polygon<S>>;

    /// Union of two solids. Both inputs are left untouched.
    ///
    /// ```text
    ///     +-------+            +-------+
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          +-------+            +-------+
    /// ```
    fn union(&self, a: &Node<S>, b: &Node<S>) -> Node<S> {
        if a.is_empty() {
            return b.clone();
        }
        if b.is_empty() {
            return a.clone();
        }
        let mut a = a.clone();
        let mut b = b.clone();

        self.clip_to(&mut a, &b);
        self.clip_to(&mut b, &a);
        self.invert(&mut b);
        self.clip_to(&mut b, &a);
        self.invert(&mut b);
        let b_polygons = self.all_polygons(&b);
        self.build(&mut a, &b_polygons);
        a
    }

    /// Solid of `a` with the solid of `b` removed.
    ///
    /// ```text
    ///     +-------+            +-------+
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          +-------+
    /// ```
    fn subtract(&self, a: &Node<S>, b: &Node<S>) -> Node<S> {
        if a.is_empty() {
            return Node::new();
        }
        if b.is_empty() {
            return a.clone();
        }
        let mut a = a.clone();
        let mut b = b.clone();

        self.invert(&mut a);
        self.clip_to(&mut a, &b);
        self.clip_to(&mut b, &a);
        self.invert(&mut b);
        self.clip_to(&mut b, &a);
        self.invert(&mut b);
        let b_polygons = self.all_polygons(&b);
        self.build(&mut a, &b_polygons);
        self.invert(&mut a);
        a
    }

    /// Space shared by both solids.
    ///
    /// ```text
    ///     +-------+
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          +-------+
    /// ```
    fn intersect(&self, a: &Node<S>, b: &Node<S>) -> Node<S> {
        if a.is_empty() || b.is_empty() {
            return Node::new();
        }
        let mut a = a.clone();
        let mut b = b.clone();

        self.invert(&mut a);
        self.clip_to(&mut b, &a);
        self.invert(&mut b);
        self.clip_to(&mut a, &b);
        self.clip_to(&mut b, &a);
        let b_polygons = self.all_polygons(&b);
        self.build(&mut a, &b_polygons);
        self.invert(&mut a);
        a
    }
}

/// Trait for picking the splitting plane of a node.
/// Only tree shape depends on it; boolean results do not.
pub trait SplittingPlaneStrategy<S: Clone> {
    /// Pick a splitting plane from a non-empty set of polygons
    fn pick_splitting_plane(&self, polygons: &[Polygon<S>]) -> Plane;
}

/// Default strategy: the first polygon's plane. Deterministic and O(1).
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPolygonStrategy;

impl<S: Clone> SplittingPlaneStrategy<S> for FirstPolygonStrategy {
    fn pick_splitting_plane(&self, polygons: &[Polygon<S>]) -> Plane {
        polygons[0].plane.clone()
    }
}

/// Least-splits heuristic: scores a sample of candidate planes by the number
/// of polygons they would cut and by front/back imbalance.
#[derive(Debug, Clone, Copy)]
pub struct BalancedSplittingStrategy {
    pub span_weight: Real,
    pub balance_weight: Real,
    pub sample_size: usize,
}

impl Default for BalancedSplittingStrategy {
    fn default() -> Self {
        Self {
            span_weight: 8.0,
            balance_weight: 1.0,
            sample_size: 20,
        }
    }
}

impl<S: Clone> SplittingPlaneStrategy<S> for BalancedSplittingStrategy {
    fn pick_splitting_plane(&self, polygons: &[Polygon<S>]) -> Plane {
        let mut best_plane = &polygons[0].plane;
        let mut best_score = Real::MAX;

        for candidate in polygons.iter().take(self.sample_size.max(1)) {
            let plane = &candidate.plane;
            let (num_front, num_back, num_spanning) = polygons.iter().fold(
                (0isize, 0isize, 0isize),
                |(f, b, s), poly| match plane.classify_polygon(poly) {
                    COPLANAR => (f, b, s),
                    FRONT => (f + 1, b, s),
                    BACK => (f, b + 1, s),
                    _ => (f, b, s + 1),
                },
            );

            let score = self.span_weight * num_spanning as Real
                + self.balance_weight * (num_front - num_back).abs() as Real;

            // strict comparison keeps the earliest candidate on ties
            if score < best_score {
                best_score = score;
                best_plane = plane;
            }
        }

        best_plane.clone()
    }
}
