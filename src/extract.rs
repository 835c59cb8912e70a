//! Turning host render buffers into world-space triangle lists.

use crate::errors::{ExtractError, ValidationError};
use crate::float_types::{
    Real,
    parry3d::bounding_volume::{Aabb, BoundingVolume},
};
use crate::mesh::Mesh;
use crate::scene::{DrawRange, FragmentId, NodeId, RenderBuffer, SceneHost};
use futures_util::future::join_all;
use nalgebra::Point3;

/// All triangles of one model component in world coordinates, tagged with
/// the component's node id. Winding is the host's; nothing is deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentMesh {
    pub tag: NodeId,
    pub triangles: Vec<[Point3<Real>; 3]>,
}

impl ComponentMesh {
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Polygon mesh ready for BSP construction; every polygon carries the tag.
    /// Zero-area triangles are dropped.
    pub fn to_mesh(&self) -> Result<Mesh<NodeId>, ValidationError> {
        Mesh::from_triangles(&self.triangles, Some(self.tag))
    }
}

/// World-space triangles of one fragment.
///
/// Each draw range (the whole index buffer when none are declared) is walked in
/// index triples; index `i` fetches the position at `(range.index + i) * stride`.
/// A trailing partial triple is ignored.
///
/// ## Errors
/// Any [`ExtractError`] rejects the whole fragment so a half-read buffer never
/// reaches the solid.
pub fn fragment_triangles(
    fragment: FragmentId,
    buffer: &RenderBuffer,
) -> Result<Vec<[Point3<Real>; 3]>, ExtractError> {
    if buffer.positions.is_empty() {
        return Err(ExtractError::MissingPositions(fragment));
    }
    if buffer.indices.is_empty() {
        return Err(ExtractError::MissingIndices(fragment));
    }
    if buffer.stride < 3 {
        return Err(ExtractError::BadStride {
            fragment,
            stride: buffer.stride,
        });
    }

    let whole = [DrawRange {
        start: 0,
        count: buffer.indices.len(),
        index: 0,
    }];
    let ranges = if buffer.draw_ranges.is_empty() { &whole[..] } else { &buffer.draw_ranges[..] };

    let fetch = |base: usize, i: u32| -> Result<Point3<Real>, ExtractError> {
        let vertex = base.saturating_add(i as usize);
        let p = vertex
            .checked_mul(buffer.stride)
            .and_then(|offset| Some(offset..offset.checked_add(3)?))
            .and_then(|span| buffer.positions.get(span))
            .ok_or(ExtractError::IndexOutOfRange { fragment, vertex })?;
        let local = Point3::new(p[0] as Real, p[1] as Real, p[2] as Real);
        Ok(buffer.world_matrix.transform_point(&local))
    };

    let mut triangles = Vec::new();
    for range in ranges {
        let end = range.start.saturating_add(range.count);
        let indices = buffer.indices.get(range.start..end).ok_or(
            ExtractError::RangeOutOfBounds {
                fragment,
                start: range.start,
                end,
                len: buffer.indices.len(),
            },
        )?;
        for triple in indices.chunks_exact(3) {
            triangles.push([
                fetch(range.index, triple[0])?,
                fetch(range.index, triple[1])?,
                fetch(range.index, triple[2])?,
            ]);
        }
    }
    Ok(triangles)
}

/// Gather every fragment of `node` into one [`ComponentMesh`].
///
/// Buffer requests are issued together. Fragments whose data is missing or
/// unreadable are skipped and contribute nothing.
pub async fn extract_component_mesh<H: SceneHost>(host: &H, node: NodeId) -> ComponentMesh {
    let fragments = host.fragment_ids(node).await;
    let buffers = join_all(fragments.iter().map(|&f| host.render_buffer(f))).await;

    let mut triangles = Vec::new();
    for (fragment, buffer) in fragments.into_iter().zip(buffers) {
        let Some(buffer) = buffer else {
            log::debug!("{fragment} of {node} has no render buffer, skipping");
            continue;
        };
        match fragment_triangles(fragment, &buffer) {
            Ok(tris) => triangles.extend(tris),
            Err(err) => log::debug!("skipping {fragment} of {node}: {err}"),
        }
    }

    ComponentMesh {
        tag: node,
        triangles,
    }
}

/// World bounds of a component: the merge of its fragments' boxes.
/// `None` when no fragment reports a box.
pub async fn component_bounding_box<H: SceneHost>(host: &H, node: NodeId) -> Option<Aabb> {
    let fragments = host.fragment_ids(node).await;
    join_all(fragments.iter().map(|&f| host.world_bounding_box(f)))
        .await
        .into_iter()
        .flatten()
        .reduce(|acc, bb| acc.merged(&bb))
}
