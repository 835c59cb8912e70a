//! An in-memory model that implements both host traits. Used by the tests and
//! by headless callers that already hold their geometry.

use super::{FragmentId, NodeId, RenderBuffer, SceneHost, SceneSink, SegmentHandle};
use crate::color::Color;
use crate::errors::ValidationError;
use crate::extract::fragment_triangles;
use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::mesh::Mesh;
use crate::pipeline::WallSegment;
use hashbrown::{HashMap, HashSet};

#[derive(Debug, Clone)]
struct SceneNode {
    name: String,
    children: Vec<NodeId>,
    fragments: Vec<FragmentId>,
}

/// Hierarchy, buffers and the mutations applied through [`SceneSink`].
#[derive(Debug, Clone)]
pub struct MemoryScene {
    nodes: HashMap<NodeId, SceneNode>,
    buffers: HashMap<FragmentId, RenderBuffer>,
    next_node: u32,
    next_fragment: u32,

    shown: HashMap<SegmentHandle, (usize, Color)>,
    hidden: HashSet<NodeId>,
    wireframe: HashMap<usize, bool>,
    redraws: usize,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScene {
    pub const ROOT: NodeId = NodeId(0);

    /// A scene holding only its root node.
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            Self::ROOT,
            SceneNode {
                name: "root".to_string(),
                children: Vec::new(),
                fragments: Vec::new(),
            },
        );
        MemoryScene {
            nodes,
            buffers: HashMap::new(),
            next_node: 1,
            next_fragment: 0,
            shown: HashMap::new(),
            hidden: HashSet::new(),
            wireframe: HashMap::new(),
            redraws: 0,
        }
    }

    /// Add an empty node under `parent`. An unknown parent adopts the node at the root.
    pub fn add_node(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(
            id,
            SceneNode {
                name: name.into(),
                children: Vec::new(),
                fragments: Vec::new(),
            },
        );
        let parent = if self.nodes.contains_key(&parent) { parent } else { Self::ROOT };
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(id);
        }
        id
    }

    /// Attach a loaded render buffer to `node`.
    pub fn add_fragment(&mut self, node: NodeId, buffer: RenderBuffer) -> FragmentId {
        let id = self.add_unloaded_fragment(node);
        self.buffers.insert(id, buffer);
        id
    }

    /// Attach a fragment whose buffers never arrive.
    pub fn add_unloaded_fragment(&mut self, node: NodeId) -> FragmentId {
        let id = FragmentId(self.next_fragment);
        self.next_fragment += 1;
        if let Some(node) = self.nodes.get_mut(&node) {
            node.fragments.push(id);
        }
        id
    }

    /// Add a node rendered as one closed box.
    pub fn add_box(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        aabb: &Aabb,
    ) -> Result<NodeId, ValidationError> {
        let mesh: Mesh<()> = Mesh::from_aabb(aabb, None)?;
        let node = self.add_node(parent, name);
        self.add_fragment(node, RenderBuffer::from_mesh(&mesh));
        Ok(node)
    }

    /// `false` once the node was hidden through [`SceneSink::set_node_visible`].
    pub fn is_visible(&self, node: NodeId) -> bool {
        !self.hidden.contains(&node)
    }

    pub fn is_shown(&self, handle: SegmentHandle) -> bool {
        self.shown.contains_key(&handle)
    }

    /// Number of result segments currently in the scene.
    pub fn shown_count(&self) -> usize {
        self.shown.len()
    }

    /// Colour a shown segment was added with.
    pub fn shown_color(&self, handle: SegmentHandle) -> Option<Color> {
        self.shown.get(&handle).map(|(_, color)| *color)
    }

    /// Triangle count of a shown segment.
    pub fn shown_triangles(&self, handle: SegmentHandle) -> Option<usize> {
        self.shown.get(&handle).map(|(triangles, _)| *triangles)
    }

    pub fn is_wireframe(&self, slab: usize) -> bool {
        self.wireframe.get(&slab).copied().unwrap_or(false)
    }

    pub const fn redraw_count(&self) -> usize {
        self.redraws
    }

    fn collect_leaves(&self, node: NodeId, out: &mut Vec<NodeId>) {
        let Some(entry) = self.nodes.get(&node) else {
            return;
        };
        for &child in &entry.children {
            match self.nodes.get(&child) {
                Some(c) if c.children.is_empty() => out.push(child),
                Some(_) => self.collect_leaves(child, out),
                None => {},
            }
        }
    }

    fn collect_fragments(&self, node: NodeId, out: &mut Vec<FragmentId>) {
        let Some(entry) = self.nodes.get(&node) else {
            return;
        };
        out.extend_from_slice(&entry.fragments);
        for &child in &entry.children {
            self.collect_fragments(child, out);
        }
    }
}

impl SceneHost for MemoryScene {
    fn root_id(&self) -> NodeId {
        Self::ROOT
    }

    async fn child_ids(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    async fn leaf_ids(&self, node: NodeId) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        self.collect_leaves(node, &mut leaves);
        leaves
    }

    async fn node_name(&self, node: NodeId) -> Option<String> {
        self.nodes.get(&node).map(|n| n.name.clone())
    }

    async fn fragment_ids(&self, node: NodeId) -> Vec<FragmentId> {
        let mut fragments = Vec::new();
        self.collect_fragments(node, &mut fragments);
        fragments
    }

    async fn world_bounding_box(&self, fragment: FragmentId) -> Option<Aabb> {
        let buffer = self.buffers.get(&fragment)?;
        let triangles = match fragment_triangles(fragment, buffer) {
            Ok(triangles) => triangles,
            Err(err) => {
                log::debug!("no bounds for {fragment}: {err}");
                return None;
            }
        };
        triangles.iter().flatten().fold(None, |bounds, p| {
            Some(match bounds {
                Some(b) => Aabb::new(b.mins.inf(p), b.maxs.sup(p)),
                None => Aabb::new(*p, *p),
            })
        })
    }

    async fn render_buffer(&self, fragment: FragmentId) -> Option<RenderBuffer> {
        self.buffers.get(&fragment).cloned()
    }
}

impl SceneSink for MemoryScene {
    fn add_to_scene(&mut self, handle: SegmentHandle, segment: &WallSegment, color: Color) {
        let triangles = segment.mesh.polygons.len();
        self.shown.insert(handle, (triangles, color));
    }

    fn remove_from_scene(&mut self, handle: SegmentHandle) {
        self.shown.remove(&handle);
    }

    fn set_node_visible(&mut self, node: NodeId, visible: bool) {
        if visible {
            self.hidden.remove(&node);
        } else {
            self.hidden.insert(node);
        }
    }

    fn set_wireframe(&mut self, slab: usize, wireframe: bool) {
        self.wireframe.insert(slab, wireframe);
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }
}
