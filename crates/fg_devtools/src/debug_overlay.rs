//! Debug overlay rendered via egui on top of the game.
//!
//! egui needs a split render: `prepare()` runs the UI and tessellates,
//! `upload()` pushes textures and buffers through the encoder, `paint()` draws
//! into a separate render pass, and `cleanup()` frees textures egui dropped.
//!
//! UI logic only runs while `visible` (toggled by F3). Window events are always
//! forwarded so the overlay can capture clicks when it is shown.

use fg_core::time::TimeState;
use winit::window::Window;

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub window_size: (u32, u32),
    pub scale: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub character_state: String,
    /// Milliseconds until the character returns to idle, if casting.
    pub cast_remaining_ms: Option<u64>,
    pub cast_timer_mode: String,
    pub button_state: String,
    /// Assets replaced by a generated placeholder at startup.
    pub placeholder_count: u32,
    pub audio_status: String,
    pub draw_calls: u32,
    pub texture_memory_kb: f32,
}

pub struct DebugOverlay {
    egui_ctx: egui::Context,
    egui_winit_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    visible: bool,
}

impl DebugOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            visible: false,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Debug overlay: {}", if self.visible { "ON" } else { "OFF" });
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        time: &TimeState,
        stats: &OverlayStats,
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let visible = self.visible;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if visible {
                egui::Window::new("Fishing Game")
                    .default_pos([10.0, 10.0])
                    .resizable(false)
                    .show(ctx, |ui| stats_grid(ui, time, stats));
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn stats_grid(ui: &mut egui::Ui, time: &TimeState, stats: &OverlayStats) {
    let row = |ui: &mut egui::Ui, name: &str, value: String| {
        ui.label(name);
        ui.monospace(value);
        ui.end_row();
    };

    egui::Grid::new("fg_stats")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            row(ui, "FPS", format!("{:.1}", time.smoothed_fps));
            row(ui, "Frame", format!("{:.2} ms", time.smoothed_frame_time_ms));
            row(
                ui,
                "Steps",
                format!("{} ({} total)", time.steps_this_frame, time.fixed_step_count),
            );
            row(
                ui,
                "Window",
                format!("{}x{}", stats.window_size.0, stats.window_size.1),
            );
            row(
                ui,
                "Scale",
                format!(
                    "{:.4} (x {:.4}, y {:.4})",
                    stats.scale, stats.scale_x, stats.scale_y
                ),
            );
            row(ui, "Draw calls", stats.draw_calls.to_string());
            row(ui, "Textures", format!("{:.1} KB", stats.texture_memory_kb));

            let character = match stats.cast_remaining_ms {
                Some(ms) => format!("{} ({ms} ms left)", stats.character_state),
                None => stats.character_state.clone(),
            };
            row(ui, "Character", character);
            row(ui, "Cast timer", stats.cast_timer_mode.clone());
            row(ui, "Button", stats.button_state.clone());
            row(ui, "Placeholders", stats.placeholder_count.to_string());
            row(ui, "Audio", stats.audio_status.clone());
        });
}
