pub mod content;
pub mod index;
pub mod render;
pub mod seed;
pub mod streaming;
pub mod types;

pub use content::{ContentBackend, PlacedContent, Placement};
pub use index::{ChunkRecord, SpatialIndex};
pub use render::{ChunkStreamer, StreamingStats, TrackedPositionXz};
pub use seed::cell_seed;
pub use streaming::{StreamAction, StreamError, StreamWindow, StreamingController};
pub use types::*;

use bevy::prelude::*;

/// Fixed streaming rate, in ticks per second.
pub const STREAMING_TICK_HZ: f64 = 50.0;

pub struct ChunkStreamingPlugin {
    pub params: types::GenerationParams,
}

impl Plugin for ChunkStreamingPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ChunkStreamer(StreamingController::new(self.params.clone())))
            .insert_resource(Time::<Fixed>::from_hz(STREAMING_TICK_HZ))
            .init_resource::<TrackedPositionXz>()
            .init_resource::<StreamingStats>()
            .add_systems(Startup, render::setup_content_assets)
            .add_systems(FixedUpdate, render::stream_chunks);
    }
}
