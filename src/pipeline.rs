//! Wall-floor intersection: cut every wall by every floor slab.
//!
//! [`detect`] runs once per loaded model. It resolves the floor and wall groups
//! under the model root, builds the slabs between consecutive floors, turns each
//! wall into a BSP solid and intersects it with each slab. Host queries are
//! issued together and joined; the geometry work that follows is synchronous
//! (or spread over rayon with the `parallel` feature).

use crate::color::{Color, Gradient};
use crate::errors::PipelineError;
use crate::extract::{component_bounding_box, extract_component_mesh};
use crate::float_types::{
    Real,
    parry3d::bounding_volume::{Aabb, BoundingVolume},
};
use crate::floors::{Floor, Slab, build_slabs};
use crate::mesh::{Mesh, bsp::Node};
use crate::scene::{NodeId, SceneHost};
use crate::traits::CSGOps;
use futures_util::future::join_all;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Knobs for one detection run.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Name of the root child holding the floor components
    pub floor_group: String,
    /// Name of the root child holding the wall components
    pub wall_group: String,
    pub gradient: Gradient,
    /// Alpha of the legend fill colour, clamped to `[0, 1]` when formatted
    pub fill_alpha: Real,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            floor_group: "Floors".to_string(),
            wall_group: "Walls".to_string(),
            gradient: Gradient::default(),
            fill_alpha: 0.3,
        }
    }
}

/// Shared flag telling a running pipeline whether its model is still loaded.
/// Clones observe the same flag.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    pub fn new() -> Self {
        Liveness(Arc::new(AtomicBool::new(true)))
    }

    /// Mark the model as unloaded; pending results are discarded.
    pub fn cancel(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// A wall turned into a solid, built once and reused for every slab.
#[derive(Debug, Clone)]
pub struct WallRecord {
    pub id: NodeId,
    pub mesh: Mesh<NodeId>,
    pub bsp: Node<NodeId>,
}

impl WallRecord {
    pub fn new(id: NodeId, mesh: Mesh<NodeId>) -> Self {
        let bsp = mesh.to_bsp();
        WallRecord { id, mesh, bsp }
    }
}

/// The part of one wall inside one slab. Polygons cut from the wall carry the
/// wall id; caps cut from the slab carry the lower floor's id.
#[derive(Debug, Clone)]
pub struct WallSegment {
    pub wall: NodeId,
    pub mesh: Mesh<NodeId>,
}

impl WallSegment {
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }

    pub fn volume(&self) -> Real {
        self.mesh.volume()
    }
}

/// All wall segments of one slab, as offered to the user.
#[derive(Debug, Clone)]
pub struct FloorResult {
    /// The floor below the slab
    pub floor: NodeId,
    pub name: String,
    pub color: Color,
    pub slab_index: usize,
    /// One entry per wall, in wall order; empty where a wall misses the slab
    pub segments: Vec<WallSegment>,
    pub active: bool,
}

/// Intersect one slab with every wall.
pub fn intersect_slab(slab: &Slab<Floor>, walls: &[WallRecord]) -> Vec<WallSegment> {
    let slab_bsp = if slab.is_degenerate() {
        log::debug!("slab {} above {} has no height", slab.index, slab.lower.name);
        None
    } else {
        match Mesh::from_aabb(&slab.aabb, Some(slab.lower.id)) {
            Ok(mesh) => Some((mesh.bounding_box(), mesh.to_bsp())),
            Err(err) => {
                log::warn!("slab {} above {} is unusable: {err}", slab.index, slab.lower.name);
                None
            },
        }
    };

    walls
        .iter()
        .map(|wall| {
            let polygons = match &slab_bsp {
                Some((bounds, bsp)) if bounds.intersects(&wall.mesh.bounding_box()) => {
                    bsp.intersect(&wall.bsp).all_polygons()
                },
                _ => Vec::new(),
            };
            WallSegment {
                wall: wall.id,
                mesh: Mesh::from_polygons(&polygons, Some(wall.id)).triangulate(),
            }
        })
        .collect()
}

/// Cut `walls` by `slabs` and group the pieces per slab, topmost slab first.
///
/// `colors[i]` colours slab `i`. Liveness is checked before each slab's
/// segments are committed, so a cancelled run never returns partial floors.
pub fn segment_walls(
    slabs: &[Slab<Floor>],
    walls: &[WallRecord],
    colors: &[Color],
    liveness: &Liveness,
) -> Result<Vec<FloorResult>, PipelineError> {
    let total = slabs.len();

    #[cfg(feature = "parallel")]
    let mut pending = slabs
        .par_iter()
        .map(|slab| intersect_slab(slab, walls))
        .collect::<Vec<_>>()
        .into_iter();

    let mut results = Vec::with_capacity(total);
    for (completed, slab) in slabs.iter().enumerate() {
        #[cfg(feature = "parallel")]
        let segments = pending.next().unwrap_or_default();
        #[cfg(not(feature = "parallel"))]
        let segments = intersect_slab(slab, walls);

        if !liveness.is_alive() {
            return Err(PipelineError::Cancelled { completed, total });
        }

        results.push(FloorResult {
            floor: slab.lower.id,
            name: slab.lower.name.clone(),
            color: colors.get(slab.index).copied().unwrap_or(Color::new(0, 0, 0)),
            slab_index: slab.index,
            segments,
            active: false,
        });
    }

    results.reverse();
    Ok(results)
}

async fn group_leaves<H: SceneHost>(
    host: &H,
    groups: &[(NodeId, Option<String>)],
    name: &str,
) -> Vec<NodeId> {
    match groups.iter().find(|(_, n)| n.as_deref() == Some(name)) {
        Some((group, _)) => host.leaf_ids(*group).await,
        None => {
            log::warn!("no \"{name}\" group under the model root");
            Vec::new()
        },
    }
}

/// Run the whole pipeline against `host`.
///
/// Missing groups, floors without geometry and unreadable walls shrink the
/// result instead of failing it.
///
/// ## Errors
/// [`PipelineError::Cancelled`] when `liveness` is cancelled before the last
/// slab is committed.
pub async fn detect<H: SceneHost>(
    host: &H,
    config: &DetectorConfig,
    liveness: &Liveness,
) -> Result<Vec<FloorResult>, PipelineError> {
    let root = host.root_id();
    let children = host.child_ids(root).await;
    let names = join_all(children.iter().map(|&c| host.node_name(c))).await;
    let groups: Vec<(NodeId, Option<String>)> = children.into_iter().zip(names).collect();

    let (floor_ids, wall_ids) = futures_util::join!(
        group_leaves(host, &groups, &config.floor_group),
        group_leaves(host, &groups, &config.wall_group),
    );

    let (floor_boxes, floor_names, model_box, components) = futures_util::join!(
        join_all(floor_ids.iter().map(|&f| component_bounding_box(host, f))),
        join_all(floor_ids.iter().map(|&f| host.node_name(f))),
        component_bounding_box(host, root),
        join_all(wall_ids.iter().map(|&w| extract_component_mesh(host, w))),
    );

    if !liveness.is_alive() {
        return Err(PipelineError::Cancelled {
            completed: 0,
            total: floor_ids.len().saturating_sub(1),
        });
    }

    let floors: Vec<(Floor, Aabb)> = floor_ids
        .iter()
        .zip(floor_boxes)
        .zip(floor_names)
        .filter_map(|((&id, aabb), name)| {
            let name = name.unwrap_or_else(|| id.to_string());
            match aabb {
                Some(aabb) => Some((Floor { id, name }, aabb)),
                None => {
                    log::warn!("floor {name} ({id}) has no geometry, skipping");
                    None
                },
            }
        })
        .collect();

    let slabs = match model_box {
        Some(model) => build_slabs(floors, &model),
        None => Vec::new(),
    };

    let meshes: Vec<(NodeId, Mesh<NodeId>)> = components
        .into_iter()
        .filter_map(|component| match component.to_mesh() {
            Ok(mesh) if !mesh.is_empty() => Some((component.tag, mesh)),
            Ok(_) => {
                log::warn!("wall {} has no usable triangles, skipping", component.tag);
                None
            },
            Err(err) => {
                log::warn!("wall {} skipped: {err}", component.tag);
                None
            },
        })
        .collect();

    #[cfg(feature = "parallel")]
    let walls: Vec<WallRecord> = meshes
        .into_par_iter()
        .map(|(id, mesh)| WallRecord::new(id, mesh))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let walls: Vec<WallRecord> = meshes
        .into_iter()
        .map(|(id, mesh)| WallRecord::new(id, mesh))
        .collect();

    let colors = config.gradient.palette(slabs.len());
    let results = segment_walls(&slabs, &walls, &colors, liveness)?;

    log::info!(
        "segmented {} walls into {} floors ({} non-empty segments)",
        walls.len(),
        results.len(),
        results
            .iter()
            .flat_map(|r| &r.segments)
            .filter(|s| !s.is_empty())
            .count()
    );
    Ok(results)
}
