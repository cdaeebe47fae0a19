use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};
use chunks::{ChunkStreamer, StreamingStats, TrackedPositionXz};

pub fn streaming_stats_window(
    mut contexts: EguiContexts,
    streamer: Res<ChunkStreamer>,
    stats: Res<StreamingStats>,
    tracked: Res<TrackedPositionXz>,
) {
    let ctx = match contexts.ctx_mut() {
        Ok(ctx) => ctx,
        Err(_) => return,
    };

    let params = streamer.0.params();
    let expected = streamer.0.window_at(tracked.0).cell_count();
    let center = stats
        .center
        .map(|c| format!("({}, {})", c.x, c.y))
        .unwrap_or_else(|| "-".to_string());

    egui::Window::new("Chunks")
        .default_pos(egui::pos2(10.0, 10.0))
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!("Tracked: ({:.1}, {:.1})", tracked.0.x, tracked.0.y));
            ui.label(format!("Center cell: {center}"));
            ui.label(format!(
                "Live chunks: {} / {}",
                stats.live_chunks, expected
            ));
            ui.label(format!(
                "Spawned: {}  Despawned: {}",
                stats.spawned_total, stats.despawned_total
            ));
            ui.separator();
            ui.label(format!(
                "Chunk size {}  Window {}  Salt {}",
                params.chunk_size(),
                params.window_size(),
                params.salt()
            ));
            ui.small("WASD pan, Shift fast, Q/E rotate, wheel zoom, T teleport");
        });
}
