//! Scene generation: physical state to drawable primitives.

pub mod builder;
pub mod cloud;
pub mod primitive;
pub mod shapes;
pub mod style;

pub use builder::GeometryBuilder;
pub use primitive::{CloudPoint, GeometryPrimitive, Rgba, Scene};
pub use style::{Detail, Style};
