//! Per-floor wall segmentation for building models, built on **Constructive
//! Solid Geometry (CSG)** with [BSP](mesh::bsp) trees.
//!
//! A host viewer exposes its model through [`SceneHost`](scene::SceneHost). The
//! [`pipeline`] reads the floor and wall components, derives the slab between
//! each pair of consecutive floors and intersects every wall with every slab.
//! The [`interaction`] layer then lets a user switch floors on and off, pick
//! wall segments and toggle wireframe rendering through
//! [`SceneSink`](scene::SceneSink).
//!
//! # Features
//! #### Optional
//! - **parallel**: use rayon to build wall trees and intersect slabs concurrently
//!
//! # Tolerance
//! Front/back/on classification uses [`float_types::tolerance`], `1e-5` model
//! units unless overridden at build time (`WALL_DETECTOR_TOLERANCE`) or at
//! runtime with [`float_types::set_tolerance`].

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod color;
pub mod errors;
pub mod extract;
pub mod float_types;
pub mod floors;
pub mod interaction;
pub mod mesh;
pub mod pipeline;
pub mod scene;
pub mod traits;

pub use color::{Color, Gradient};
pub use interaction::{FloorSelector, FloorView, Pick};
pub use mesh::Mesh;
pub use pipeline::{DetectorConfig, FloorResult, Liveness, WallSegment, detect};
pub use scene::{NodeId, SceneHost, SceneSink};
pub use traits::CSGOps;
