//! Fishing Game: main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. Each redraw:
//!
//!   1. `begin_frame()` measures wall-clock time and feeds the fixed-step accumulator
//!   2. `while should_step()` applies queued pointer events and ticks the character timer
//!   3. If anything changed, the three sprite quads are rebuilt and uploaded
//!   4. The sprite pass is drawn, then the egui debug overlay on top
//!
//! Redraws are paced to the configured rate with `ControlFlow::WaitUntil`.
//!
//! Configuration and the scale mapping are computed once before the window
//! opens. Every asset is loaded once at startup; missing or broken files fall
//! back to solid colours or silence.

mod assets;
mod config;
#[cfg(test)]
mod replay;
mod session;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use assets::{GameAssets, ImageAsset, SoundBank, TextureKey};
use config::{load_config_or_default, GameConfig, CONFIG_PATH};
use fg_audio::AudioSystem;
use fg_core::input::{InputState, Key, MouseBtn};
use fg_core::layout::{ScaleMapping, SceneLayout};
use fg_core::time::{FramePacer, TimeState, FIXED_DT_US};
use fg_devtools::{DebugOverlay, OverlayStats};
use fg_platform::ResourceLocator;
use fg_render::{Camera2D, DrawCall, GpuContext, SpriteBatch, SpritePipeline, SpriteVertex, Texture};
use session::{Session, SoundCue};

/// Background, character and button.
const QUAD_CAPACITY: usize = 3;

struct GpuSpriteTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// All mutable game state. Constructed in `ApplicationHandler::resumed` once
/// the window and GPU surface exist.
struct GameState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    pacer: FramePacer,
    input: InputState,
    camera: Camera2D,
    sprite_pipeline: SpritePipeline,
    debug_overlay: DebugOverlay,

    mapping: ScaleMapping,
    session: Session,
    audio: Option<AudioSystem>,
    sounds: SoundBank,
    placeholder_count: u32,
    textures: HashMap<TextureKey, GpuSpriteTexture>,

    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    draw_calls: Vec<DrawCall<TextureKey>>,
    mesh_dirty: bool,
}

impl GameState {
    fn new(window: Arc<Window>, config: &GameConfig, locator: &ResourceLocator) -> Self {
        let gpu = GpuContext::new(window.clone());
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let debug_overlay = DebugOverlay::new(&gpu.device, gpu.surface_format, &window);

        let mapping = config.scale_mapping();
        let session = Session::new(
            SceneLayout::compute(&mapping),
            config.cast_duration_us(),
            config.cast_timer,
        );
        log::debug!("Layout: {:?}", session.layout());

        let assets = GameAssets::load(locator, session.layout());
        let mut textures = HashMap::new();
        for key in TextureKey::ALL {
            let texture = upload_image(&gpu, assets.image(key), key);
            let bind_group = sprite_pipeline.create_texture_bind_group(&gpu.device, &texture);
            textures.insert(
                key,
                GpuSpriteTexture {
                    texture,
                    bind_group,
                },
            );
        }

        let mut audio = AudioSystem::new();
        if let Some(audio) = audio.as_mut() {
            if assets.music_path.exists() {
                if let Err(err) = audio.play_music_loop(&assets.music_path, config.music_volume) {
                    log::error!("Music loading error: {err}");
                }
            } else {
                log::info!("No background music at '{}'", assets.music_path.display());
            }
        }

        // The camera works in logical pixels so the layout stays valid on HiDPI
        // displays where the surface is larger.
        let window_size = mapping.window();
        let camera = Camera2D::new(window_size.width, window_size.height);
        let camera_buffer = create_buffer_init(
            &gpu.device,
            "Camera Uniform Buffer",
            bytemuck::cast_slice(&[camera.build_uniform()]),
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, QUAD_CAPACITY * 4);
        let index_buffer = create_index_buffer(&gpu.device, QUAD_CAPACITY * 6);

        Self {
            window,
            gpu,
            time: TimeState::new(),
            pacer: FramePacer::new(config.target_fps, Instant::now()),
            input: InputState::new(),
            camera,
            sprite_pipeline,
            debug_overlay,
            mapping,
            session,
            audio,
            placeholder_count: assets.placeholder_image_count() + assets.silent_sound_count(),
            sounds: assets.sounds,
            textures,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            draw_calls: Vec::new(),
            mesh_dirty: true,
        }
    }

    fn play_cue(&self, cue: SoundCue) {
        let Some(audio) = &self.audio else {
            return;
        };
        match cue {
            SoundCue::ButtonClick => audio.play(self.sounds.click.as_ref()),
            SoundCue::Cast => audio.play(self.sounds.cast.as_ref()),
        }
    }

    fn rebuild_mesh(&mut self) {
        let mut batch = SpriteBatch::with_capacity(QUAD_CAPACITY);
        for quad in self.session.quads() {
            batch.push_quad(quad);
        }
        self.gpu
            .queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&batch.vertices));
        self.gpu
            .queue
            .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&batch.indices));
        self.draw_calls = batch.draw_calls;
        self.mesh_dirty = false;
    }

    fn texture_memory_kb(&self) -> f32 {
        let bytes: usize = self
            .textures
            .values()
            .map(|t| (t.texture.size.0 as usize) * (t.texture.size.1 as usize) * 4)
            .sum();
        bytes as f32 / 1024.0
    }

    fn overlay_stats(&self) -> OverlayStats {
        let window = self.mapping.window();
        let character = self.session.character();
        OverlayStats {
            window_size: (window.width, window.height),
            scale: self.mapping.scale(),
            scale_x: self.mapping.scale_x(),
            scale_y: self.mapping.scale_y(),
            character_state: character.state().to_string(),
            cast_remaining_ms: character.remaining_us().map(|us| us / 1000),
            cast_timer_mode: format!("{:?}", character.mode()),
            button_state: self.session.button().state().label().to_string(),
            placeholder_count: self.placeholder_count,
            audio_status: match &self.audio {
                Some(audio) if audio.is_music_playing() => "on, music playing".to_string(),
                Some(_) => "on".to_string(),
                None => "unavailable".to_string(),
            },
            draw_calls: self.draw_calls.len() as u32,
            texture_memory_kb: self.texture_memory_kb(),
        }
    }

    /// Returns false when the game should exit.
    fn update(&mut self) -> bool {
        self.time.begin_frame();

        if self.input.is_just_pressed(Key::Escape) {
            return false;
        }
        if self.input.is_just_pressed(Key::F3) {
            self.debug_overlay.toggle();
        }

        while self.time.should_step() {
            for event in self.input.drain_pointer_events() {
                let button_before = self.session.button().state();
                let character_before = self.session.character().state();
                for cue in self.session.handle_pointer(event) {
                    self.play_cue(cue);
                }
                if self.session.button().state() != button_before
                    || self.session.character().state() != character_before
                {
                    self.mesh_dirty = true;
                }
            }
            if self.session.step(FIXED_DT_US) {
                self.mesh_dirty = true;
            }
        }
        // A stalled loop (window drag, minimised window) still counts toward
        // the cast duration.
        if self.time.dropped_us > 0 && self.session.step(self.time.dropped_us) {
            self.mesh_dirty = true;
        }
        self.input.end_frame();
        true
    }

    fn render(&mut self) {
        if self.mesh_dirty {
            self.rebuild_mesh();
        }
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera.build_uniform()]),
        );

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let stats = self.overlay_stats();
        let (egui_primitives, egui_textures_delta) =
            self.debug_overlay.prepare(&self.window, &self.time, &stats);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sprite Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for draw in &self.draw_calls {
                if let Some(texture) = self.textures.get(&draw.texture_key) {
                    render_pass.set_bind_group(1, &texture.bind_group, &[]);
                    render_pass.draw_indexed(
                        draw.index_start..(draw.index_start + draw.index_count),
                        0,
                        0..1,
                    );
                }
            }
        }

        self.debug_overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.debug_overlay
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.debug_overlay.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

struct App {
    config: GameConfig,
    locator: ResourceLocator,
    state: Option<GameState>,
}

impl App {
    fn new(config: GameConfig, locator: ResourceLocator) -> Self {
        Self {
            config,
            locator,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = fg_platform::window::create_window(event_loop, &self.config.platform_config());
        self.state = Some(GameState::new(window, &self.config, &self.locator));
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let now = Instant::now();
        if state.pacer.is_due(now) {
            state.pacer.frame_started(now);
            state.window.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(state.pacer.deadline()));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                state.gpu.resize(physical_size.width, physical_size.height);
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(state.window.scale_factor());
                state.input.mouse_position = Vec2::new(logical.x, logical.y);
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                // Releases always reach the game so a press is never left stuck
                // when the overlay grabs the pointer mid-drag.
                if let Some(btn) = map_mouse_button(button) {
                    match button_state {
                        ElementState::Pressed if !egui_consumed => state.input.mouse_down(btn),
                        ElementState::Pressed => {}
                        ElementState::Released => state.input.mouse_up(btn),
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if !state.update() {
                    log::info!("Escape pressed, exiting.");
                    event_loop.exit();
                    return;
                }
                state.render();
            }

            _ => {}
        }
    }
}

fn upload_image(gpu: &GpuContext, image: Option<&ImageAsset>, key: TextureKey) -> Texture {
    match image {
        Some(ImageAsset::Decoded {
            width,
            height,
            rgba,
        }) => Texture::from_rgba8(&gpu.device, &gpu.queue, rgba, *width, *height, key.label()),
        Some(ImageAsset::Placeholder { color }) => {
            Texture::solid_color(&gpu.device, &gpu.queue, *color, key.label())
        }
        None => Texture::solid_color(
            &gpu.device,
            &gpu.queue,
            key.placeholder_color(),
            key.label(),
        ),
    }
}

fn create_buffer_init(
    device: &wgpu::Device,
    label: &str,
    contents: &[u8],
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    use wgpu::util::DeviceExt;
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents,
        usage,
    })
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

fn map_mouse_button(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        MouseButton::Middle => Some(MouseBtn::Middle),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Fishing Game starting...");

    let locator = ResourceLocator::discover();
    let config = load_config_or_default(&locator.resolve(CONFIG_PATH));
    let mapping = config.scale_mapping();
    log::info!("Scale: {:.3}", mapping.scale());
    log::info!("Window size: {}x{}", config.window.width, config.window.height);

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, locator);
    event_loop.run_app(&mut app).expect("Event loop error");
}
