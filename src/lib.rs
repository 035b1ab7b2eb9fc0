pub mod draw;
pub mod geom;
pub mod io;
pub mod scene;
pub mod sim;
pub mod site;
pub mod vecutils;

// Prelude
pub use geom::grid::{TriangleIndex, VertexGrid};
pub use geom::point::Point;
pub use geom::vector::Vector;
pub use io::RunConfig;
pub use scene::{Detail, GeometryBuilder, GeometryPrimitive, Scene, Style};
pub use sim::config::IncidentParams;
pub use sim::phase::PhaseModel;
pub use sim::playback::Playback;
pub use sim::state::{BlastConsequence, DangerLevel, Phase, PhysicalState};
pub use site::SiteLayout;
// Drawing utility
pub use draw::{RerunConfig, animate, draw_scene, start_session};
