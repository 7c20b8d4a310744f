mod camera;
mod character_controller;
mod collaborators;
mod config;
mod crouch;
mod grapple;
mod gravity;
mod input_plugin;
mod movement;
mod physics;
mod smoothing;

pub use camera::*;
pub use character_controller::*;
pub use collaborators::*;
pub use config::*;
pub use crouch::*;
pub use grapple::*;
pub use gravity::*;
pub use input_plugin::*;
pub use movement::*;
pub use physics::*;
pub use smoothing::*;
