//! Floor slabs: the vertical gaps between consecutive floors, as boxes.

use crate::float_types::{Real, parry3d::bounding_volume::Aabb, tolerance};
use crate::scene::NodeId;
use nalgebra::Point3;

/// A floor component as the pipeline sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Floor {
    pub id: NodeId,
    pub name: String,
}

/// The volume between the top of `lower` and the bottom of `upper`, spanning
/// the model's whole X/Y footprint. `index` counts from the lowest slab.
#[derive(Debug, Clone, PartialEq)]
pub struct Slab<T> {
    pub index: usize,
    pub lower: T,
    pub upper: T,
    pub aabb: Aabb,
}

impl<T> Slab<T> {
    pub fn height(&self) -> Real {
        self.aabb.maxs.z - self.aabb.mins.z
    }

    /// A slab whose floors touch or overlap bounds no volume.
    pub fn is_degenerate(&self) -> bool {
        self.height() <= tolerance()
    }
}

/// Build the slabs between consecutive floors.
///
/// Floors are sorted by ascending min-Z (ties keep input order). Slab `i` spans
/// `(model.min.x, model.min.y, floor[i].max.z)` to
/// `(model.max.x, model.max.y, floor[i + 1].min.z)`. Fewer than two floors
/// give no slabs. Degenerate slabs are kept so slab indices stay aligned with
/// floor order; see [`Slab::is_degenerate`].
pub fn build_slabs<T: Clone>(mut floors: Vec<(T, Aabb)>, model: &Aabb) -> Vec<Slab<T>> {
    floors.sort_by(|a, b| a.1.mins.z.total_cmp(&b.1.mins.z));

    floors
        .windows(2)
        .enumerate()
        .map(|(index, pair)| {
            let (lower, lower_box) = &pair[0];
            let (upper, upper_box) = &pair[1];
            Slab {
                index,
                lower: lower.clone(),
                upper: upper.clone(),
                aabb: Aabb::new(
                    Point3::new(model.mins.x, model.mins.y, lower_box.maxs.z),
                    Point3::new(model.maxs.x, model.maxs.y, upper_box.mins.z),
                ),
            }
        })
        .collect()
}
