//! Binary Space Partitioning (BSP) tree implementation
//!
//! A tree bounds a solid with the polygons stored at its nodes. Boolean
//! operations clip one tree's polygons against the other's planes, so a wall
//! tree can be built once and intersected with any number of slab trees.
//!
//! Algorithms live behind [`BspOps`] and splitter selection behind
//! [`SplittingPlaneStrategy`], so either can be swapped without touching the
//! node type.

pub mod node;
pub mod serial;
pub mod traits;

pub use node::Node;
pub use serial::SerialBspOps;
pub use traits::{BalancedSplittingStrategy, BspOps, FirstPolygonStrategy, SplittingPlaneStrategy};

use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use std::fmt::Debug;

impl<S: Clone + Send + Sync + Debug> Node<S> {
    const fn ops() -> SerialBspOps<FirstPolygonStrategy, S> {
        SerialBspOps::new()
    }

    /// Creates a new BSP tree from polygons using the default splitter
    pub fn from_polygons(polygons: &[Polygon<S>]) -> Self {
        Self::from_polygons_with(polygons, &Self::ops())
    }

    /// Creates a new BSP tree from polygons with explicit operations,
    /// e.g. `SerialBspOps::with_strategy(BalancedSplittingStrategy::default())`
    pub fn from_polygons_with<O: BspOps<S>>(polygons: &[Polygon<S>], ops: &O) -> Self {
        let mut node = Self::new();
        if !polygons.is_empty() {
            ops.build(&mut node, polygons);
        }
        node
    }

    /// Invert all polygons in the BSP tree
    pub fn invert(&mut self) {
        Self::ops().invert(self);
    }

    /// Remove the parts of `polygons` that lie inside this tree's solid
    pub fn clip_polygons(&self, polygons: &[Polygon<S>]) -> Vec<Polygon<S>> {
        Self::ops().clip_polygons(self, polygons)
    }

    /// Remove all polygons in this BSP tree that are inside the other BSP tree
    pub fn clip_to(&mut self, bsp: &Node<S>) {
        Self::ops().clip_to(self, bsp);
    }

    /// Return all polygons in this BSP tree, pre-order
    pub fn all_polygons(&self) -> Vec<Polygon<S>> {
        Self::ops().all_polygons(self)
    }

    /// Build (or extend) this tree with the given polygons
    pub fn build(&mut self, polygons: &[Polygon<S>]) {
        Self::ops().build(self, polygons);
    }

    /// New tree bounding the intersection of both solids
    pub fn intersect(&self, other: &Node<S>) -> Node<S> {
        Self::ops().intersect(self, other)
    }

    /// New tree bounding the union of both solids
    pub fn union(&self, other: &Node<S>) -> Node<S> {
        Self::ops().union(self, other)
    }

    /// New tree bounding this solid minus the other
    pub fn subtract(&self, other: &Node<S>) -> Node<S> {
        Self::ops().subtract(self, other)
    }

    /// Flatten the tree into a triangulated [`Mesh`]
    pub fn to_mesh(&self, metadata: Option<S>) -> Mesh<S> {
        Mesh::from_polygons(&self.all_polygons(), metadata).triangulate()
    }
}
