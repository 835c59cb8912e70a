//! Floor toggling, wireframe mode and picking over the detected floors.

use crate::errors::InteractionError;
use crate::float_types::{Real, parry3d::query::Ray};
use crate::pipeline::{DetectorConfig, FloorResult};
use crate::scene::{NodeId, SceneSink, SegmentHandle};
use nalgebra::Point3;

pub mod picking;

pub use picking::{Camera, Pointer, Viewport, pointer_ray};

/// What the floor list shows for one floor.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorView {
    pub name: String,
    /// `#rrggbb`
    pub stroke_color: String,
    /// `rgba(r,g,b,a)` with the configured fill alpha
    pub fill_color: String,
    pub active: bool,
}

/// Nearest wall segment under a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    pub wall: NodeId,
    pub floor: NodeId,
    pub slab_index: usize,
    pub distance: Real,
    pub point: Point3<Real>,
}

/// Owns the detection results and keeps the host scene in step with them.
#[derive(Debug, Clone)]
pub struct FloorSelector {
    floors: Vec<FloorResult>,
    model: NodeId,
    fill_alpha: Real,
    wireframe: bool,
}

impl FloorSelector {
    /// `model` is the node hidden while any floor is active.
    pub fn new(floors: Vec<FloorResult>, model: NodeId, config: &DetectorConfig) -> Self {
        FloorSelector {
            floors,
            model,
            fill_alpha: config.fill_alpha,
            wireframe: false,
        }
    }

    /// Results in display order, topmost floor first.
    pub fn floors(&self) -> &[FloorResult] {
        &self.floors
    }

    pub fn views(&self) -> Vec<FloorView> {
        self.floors
            .iter()
            .map(|f| FloorView {
                name: f.name.clone(),
                stroke_color: f.color.to_hex(),
                fill_color: f.color.to_rgba_string(self.fill_alpha),
                active: f.active,
            })
            .collect()
    }

    pub fn any_active(&self) -> bool {
        self.floors.iter().any(|f| f.active)
    }

    pub const fn wireframe(&self) -> bool {
        self.wireframe
    }

    /// Flip the floor at `index` (display order). Its segments enter or leave the
    /// scene; the original model is hidden while any floor is active.
    /// Returns the floor's new state.
    pub fn toggle_floor<K: SceneSink>(
        &mut self,
        index: usize,
        sink: &mut K,
    ) -> Result<bool, InteractionError> {
        let len = self.floors.len();
        let floor = self
            .floors
            .get_mut(index)
            .ok_or(InteractionError::UnknownFloor { index, len })?;

        floor.active = !floor.active;
        for segment in floor.segments.iter().filter(|s| !s.is_empty()) {
            let handle = SegmentHandle {
                slab: floor.slab_index,
                wall: segment.wall,
            };
            if floor.active {
                sink.add_to_scene(handle, segment, floor.color);
            } else {
                sink.remove_from_scene(handle);
            }
        }
        let active = floor.active;
        log::debug!("floor {} is now {}", floor.name, if active { "on" } else { "off" });

        sink.set_node_visible(self.model, !self.any_active());
        sink.request_redraw();
        Ok(active)
    }

    /// [`Self::toggle_floor`] addressed by the floor's node id.
    pub fn toggle_floor_node<K: SceneSink>(
        &mut self,
        floor: NodeId,
        sink: &mut K,
    ) -> Result<bool, InteractionError> {
        let index = self
            .floors
            .iter()
            .position(|f| f.floor == floor)
            .ok_or(InteractionError::UnknownFloorNode(floor))?;
        self.toggle_floor(index, sink)
    }

    /// Switch every slab material to wireframe or back. Geometry is untouched.
    pub fn set_wireframe<K: SceneSink>(&mut self, wireframe: bool, sink: &mut K) {
        self.wireframe = wireframe;
        for floor in &self.floors {
            sink.set_wireframe(floor.slab_index, wireframe);
        }
        sink.request_redraw();
    }

    /// Nearest hit among the segments of active floors. Hits behind the ray
    /// origin are ignored.
    pub fn pick(&self, ray: &Ray) -> Option<Pick> {
        self.floors
            .iter()
            .filter(|f| f.active)
            .flat_map(|floor| {
                floor.segments.iter().filter_map(move |segment| {
                    let (point, distance) = segment
                        .mesh
                        .ray_intersections(&ray.origin, &ray.dir)
                        .into_iter()
                        .find(|(_, d)| *d >= 0.0)?;
                    Some(Pick {
                        wall: segment.wall,
                        floor: floor.floor,
                        slab_index: floor.slab_index,
                        distance,
                        point,
                    })
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Pick under the pointer; the click and hover paths both end here.
    pub fn pick_at(&self, pointer: &Pointer, viewport: &Viewport, camera: &Camera) -> Option<Pick> {
        let ray = pointer_ray(pointer, viewport, camera)?;
        self.pick(&ray)
    }
}
