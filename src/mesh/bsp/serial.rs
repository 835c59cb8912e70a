//! Serial implementation of BSP operations

use crate::mesh::bsp::node::Node;
use crate::mesh::bsp::traits::{BspOps, FirstPolygonStrategy, SplittingPlaneStrategy};
use crate::mesh::polygon::Polygon;
use std::fmt::Debug;
use std::marker::PhantomData;

/// Serial implementation of BSP operations, parameterised by splitter choice
pub struct SerialBspOps<SP: SplittingPlaneStrategy<S> = FirstPolygonStrategy, S: Clone = ()> {
    splitting_strategy: SP,
    _phantom: PhantomData<S>,
}

impl<S: Clone> SerialBspOps<FirstPolygonStrategy, S> {
    pub const fn new() -> Self {
        Self {
            splitting_strategy: FirstPolygonStrategy,
            _phantom: PhantomData,
        }
    }
}

impl<S: Clone> Default for SerialBspOps<FirstPolygonStrategy, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<SP: SplittingPlaneStrategy<S>, S: Clone> SerialBspOps<SP, S> {
    pub const fn with_strategy(strategy: SP) -> Self {
        Self {
            splitting_strategy: strategy,
            _phantom: PhantomData,
        }
    }
}

impl<SP: SplittingPlaneStrategy<S>, S: Clone + Send + Sync + Debug> BspOps<S>
    for SerialBspOps<SP, S>
{
    fn invert(&self, node: &mut Node<S>) {
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            current.polygons.iter_mut().for_each(|p| p.flip());
            if let Some(ref mut plane) = current.plane {
                plane.flip();
            }

            std::mem::swap(&mut current.front, &mut current.back);

            if let Some(ref mut front) = current.front {
                stack.push(front.as_mut());
            }
            if let Some(ref mut back) = current.back {
                stack.push(back.as_mut());
            }
        }
    }

    fn clip_polygons(&self, node: &Node<S>, polygons: &[Polygon<S>]) -> Vec<Polygon<S>> {
        let Some(plane) = node.plane.as_ref() else {
            debug_assert!(
                node.polygons.is_empty() && node.front.is_none() && node.back.is_none(),
                "BSP node holds geometry without a splitting plane"
            );
            return polygons.to_vec();
        };

        let mut front_polys = Vec::with_capacity(polygons.len());
        let mut back_polys = Vec::with_capacity(polygons.len());

        for polygon in polygons {
            let (mut front_parts, mut back_parts) = plane.clip_polygon(polygon);
            front_polys.append(&mut front_parts);
            back_polys.append(&mut back_parts);
        }

        let mut result = match &node.front {
            Some(front_node) => self.clip_polygons(front_node, &front_polys),
            None => front_polys,
        };

        // no back child: the back half-space is solid, so those parts are clipped
        if let Some(back_node) = &node.back {
            result.extend(self.clip_polygons(back_node, &back_polys));
        }

        result
    }

    fn clip_to(&self, node: &mut Node<S>, bsp: &Node<S>) {
        node.polygons = self.clip_polygons(bsp, &node.polygons);

        if let Some(ref mut front) = node.front {
            self.clip_to(front, bsp);
        }
        if let Some(ref mut back) = node.back {
            self.clip_to(back, bsp);
        }
    }

    fn all_polygons(&self, node: &Node<S>) -> Vec<Polygon<S>> {
        let mut result = Vec::new();
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            result.extend_from_slice(&current.polygons);

            // push back first so the front subtree is visited first
            stack.extend(current.back.as_deref());
            stack.extend(current.front.as_deref());
        }
        result
    }

    fn build(&self, node: &mut Node<S>, polygons: &[Polygon<S>]) {
        if polygons.is_empty() {
            return;
        }

        let plane = node
            .plane
            .get_or_insert_with(|| self.splitting_strategy.pick_splitting_plane(polygons))
            .clone();

        let mut front = Vec::with_capacity(polygons.len() / 2);
        let mut back = Vec::with_capacity(polygons.len() / 2);

        for polygon in polygons {
            let (coplanar_front, coplanar_back, mut front_parts, mut back_parts) =
                plane.split_polygon(polygon);

            node.polygons.extend(coplanar_front);
            node.polygons.extend(coplanar_back);
            front.append(&mut front_parts);
            back.append(&mut back_parts);
        }

        if !front.is_empty() {
            let front_node = node.front.get_or_insert_with(|| Box::new(Node::new()));
            self.build(front_node, &front);
        }

        if !back.is_empty() {
            let back_node = node.back.get_or_insert_with(|| Box::new(Node::new()));
            self.build(back_node, &back);
        }
    }
}
