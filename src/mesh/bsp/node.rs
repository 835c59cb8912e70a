//! BSP tree node data structure

use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;
use std::fmt::Debug;

/// A BSP tree node, containing polygons plus optional front/back subtrees.
///
/// Children are owned boxes: a tree is never shared and never cyclic, and
/// dropping the root tears the whole tree down.
#[derive(Debug, Clone)]
pub struct Node<S: Clone> {
    /// Splitting plane for this node *or* **None** for an empty tree.
    pub plane: Option<Plane>,

    /// Subtree in front of `plane`.
    pub front: Option<Box<Node<S>>>,

    /// Subtree behind `plane`.
    pub back: Option<Box<Node<S>>>,

    /// Polygons that lie on `plane` (within tolerance).
    pub polygons: Vec<Polygon<S>>,
}

impl<S: Clone + Send + Sync + Debug> Default for Node<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + Send + Sync + Debug> Node<S> {
    /// Create a new empty BSP node
    pub const fn new() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    /// `true` when no node of the tree holds a polygon, i.e. the tree bounds
    /// no solid. A tree can keep its planes after every polygon was clipped away.
    pub fn is_empty(&self) -> bool {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if !node.polygons.is_empty() {
                return false;
            }
            stack.extend(node.front.as_deref());
            stack.extend(node.back.as_deref());
        }
        true
    }

    /// Number of polygons stored across the whole tree.
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
            + self.front.as_ref().map_or(0, |n| n.polygon_count())
            + self.back.as_ref().map_or(0, |n| n.polygon_count())
    }

    /// Longest root-to-leaf path, counting the root.
    pub fn depth(&self) -> usize {
        if self.plane.is_none() {
            return 0;
        }
        1 + self
            .front
            .as_ref()
            .map_or(0, |n| n.depth())
            .max(self.back.as_ref().map_or(0, |n| n.depth()))
    }
}
