//! Letterfall core library.
//!
//! Headless pieces of the cube-lettering demo: the body store, the text
//! rasterizer and surface sampler that produce target points, the assignment
//! controller that moves cubes between physics and animation, and the frame
//! loop that keeps visual poses in sync. The Bevy client drives all of it
//! through [`simulation::Simulation`].

pub mod body;
pub mod config;
pub mod controller;
pub mod error;
pub mod font;
pub mod frame;
pub mod outline;
pub mod physics;
pub mod pose;
pub mod simulation;
pub mod surface;
pub mod targets;
pub mod text_mesh;
pub mod tween;

#[cfg(test)]
mod testing;

pub use error::LetterfallError;
