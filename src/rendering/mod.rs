//! Rendering module - the snapshot handed to the renderer, and the bevy renderer itself.

mod plugin;
mod snapshot;

pub use plugin::{FrameSnapshot, RenderingPlugin};
pub use snapshot::{HudLine, RenderSnapshot, SpriteDraw, TileDraw};
