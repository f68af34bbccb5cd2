//! Robot Model Exporter Core
//!
//! This crate turns a CAD assembly into the simulator's robot formats:
//! - RigidNode tree: bodies connected by rotational, sliding or fixed joints
//! - Configuration: drivers, sensors and weights keyed by joint name
//! - Legacy export: per-node meshes plus an XML skeleton (BXDJ)
//! - JSON export: a single document describing the node tree
//! - Robot description: file-based input standing in for a CAD session

pub mod config;
pub mod description;
pub mod driver;
pub mod export;
pub mod joint;
pub mod matcher;
pub mod math;
pub mod mesh;
pub mod sensor;
pub mod settings;
pub mod tree;
pub mod xml;

pub use config::*;
pub use description::*;
pub use driver::*;
pub use export::*;
pub use joint::*;
pub use matcher::*;
pub use math::*;
pub use mesh::*;
pub use sensor::*;
pub use settings::*;
pub use tree::*;
pub use xml::*;
