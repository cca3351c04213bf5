//! Top down drawing of a map and its BSP tree. Every position goes through a
//! single `MapProjection` built from the map's vertexes, so the whole map is
//! always in view at one scale.

mod bsp;
mod colour;
mod error;
mod projection;

pub use bsp::{BspRenderer, RenderOptions, TraversalDepth};
pub use colour::*;
pub use error::RenderError;
pub use projection::MapProjection;
