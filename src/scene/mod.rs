//! The host viewer, seen through two traits.
//!
//! [`SceneHost`] answers questions about the loaded model: hierarchy, names,
//! fragment bounds and render buffers. Queries are `async` because hosts resolve
//! them across a worker boundary. [`SceneSink`] receives the few mutations the
//! detector makes: showing result meshes, hiding the original model, switching
//! slab materials to wireframe and asking for a redraw.

use crate::color::Color;
use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::mesh::Mesh;
use crate::pipeline::WallSegment;
use nalgebra::Matrix4;
use std::fmt::{self, Debug, Display};

pub mod memory;

/// Identifier of a node in the host's model hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Identifier of a renderable fragment (one render buffer) in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentId(pub u32);

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

impl Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fragment#{}", self.0)
    }
}

/// A slice of the index buffer drawn as one batch.
///
/// `start` and `count` address the index buffer; `index` is added to every
/// index read from it before the vertex is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawRange {
    pub start: usize,
    pub count: usize,
    pub index: usize,
}

/// Geometry of one fragment as the host renders it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBuffer {
    /// Interleaved vertex data; the position is the first three floats of each vertex
    pub positions: Vec<f32>,
    pub indices: Vec<u32>,
    /// Floats per vertex
    pub stride: usize,
    /// Empty means the whole index buffer is one range
    pub draw_ranges: Vec<DrawRange>,
    pub world_matrix: Matrix4<Real>,
}

impl RenderBuffer {
    /// Tightly packed, untransformed buffer holding the triangles of `mesh`.
    pub fn from_mesh<S: Clone + Send + Sync + Debug>(mesh: &Mesh<S>) -> Self {
        let (vertices, triangles) = mesh.vertices_and_indices();
        RenderBuffer {
            positions: vertices
                .iter()
                .flat_map(|p| [p.x as f32, p.y as f32, p.z as f32])
                .collect(),
            indices: triangles.iter().flatten().copied().collect(),
            stride: 3,
            draw_ranges: Vec::new(),
            world_matrix: Matrix4::identity(),
        }
    }

    /// Same buffer placed by `world_matrix`.
    pub fn with_world_matrix(mut self, world_matrix: Matrix4<Real>) -> Self {
        self.world_matrix = world_matrix;
        self
    }
}

/// Where a result segment lives: the slab it was cut by and its source wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentHandle {
    pub slab: usize,
    pub wall: NodeId,
}

/// Read access to the loaded model.
#[allow(async_fn_in_trait)]
pub trait SceneHost {
    /// Root of the model hierarchy.
    fn root_id(&self) -> NodeId;

    /// Direct children of `node`, in host order.
    async fn child_ids(&self, node: NodeId) -> Vec<NodeId>;

    /// Every descendant of `node` that has no children.
    async fn leaf_ids(&self, node: NodeId) -> Vec<NodeId>;

    async fn node_name(&self, node: NodeId) -> Option<String>;

    /// Fragments rendering `node` and all of its descendants.
    async fn fragment_ids(&self, node: NodeId) -> Vec<FragmentId>;

    /// World-space bounds of one fragment, `None` when the host has no geometry for it.
    async fn world_bounding_box(&self, fragment: FragmentId) -> Option<Aabb>;

    /// `None` when the fragment's buffers are not loaded.
    async fn render_buffer(&self, fragment: FragmentId) -> Option<RenderBuffer>;
}

/// Scene mutations requested by the interaction layer.
pub trait SceneSink {
    /// Make a result segment visible and ray-intersectable.
    fn add_to_scene(&mut self, handle: SegmentHandle, segment: &WallSegment, color: Color);

    fn remove_from_scene(&mut self, handle: SegmentHandle);

    fn set_node_visible(&mut self, node: NodeId, visible: bool);

    /// Switch the material of one slab between filled and wireframe.
    fn set_wireframe(&mut self, slab: usize, wireframe: bool);

    fn request_redraw(&mut self);
}
