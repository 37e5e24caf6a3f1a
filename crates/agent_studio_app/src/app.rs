// SPDX-License-Identifier: MIT OR Apache-2.0
//! Main studio application setup and event loop.

use crate::chrome::{Header, Palette, StatusBar};
use crate::settings::StudioSettings;
use agent_studio_graph::panel::ConfigurationPanel;
use agent_studio_graph::ui::CanvasView;
use agent_studio_graph::NodeEditor;
use egui_wgpu::wgpu;
use std::sync::Arc;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Studio application errors
#[derive(Debug, Error)]
pub enum StudioError {
    /// Event loop error
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Window creation failed
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// Graphics initialization failed
    #[error("Failed to initialize graphics: {0}")]
    Graphics(String),

    /// Settings could not be parsed or written
    #[error("Invalid settings: {0}")]
    Settings(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for studio operations
pub type Result<T> = std::result::Result<T, StudioError>;

/// Graphics state for wgpu rendering
struct GraphicsState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

impl GraphicsState {
    fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| StudioError::Graphics(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| StudioError::Graphics("no suitable GPU adapter".to_string()))?;

        tracing::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Agent Studio Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))
        .map_err(|e| StudioError::Graphics(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| StudioError::Graphics("surface has no supported formats".to_string()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            egui_renderer,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn render(
        &mut self,
        egui_ctx: &egui::Context,
        full_output: egui::FullOutput,
        window: &Window,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Studio Encoder"),
        });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Studio Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: 0.05,
                                g: 0.05,
                                b: 0.08,
                                a: 1.0,
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        Ok(())
    }
}

/// Running state of the studio
struct StudioRunning {
    window: Arc<Window>,
    graphics: GraphicsState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    studio: StudioInner,
}

/// Canvas, panels and chrome
struct StudioInner {
    editor: NodeEditor,
    canvas: CanvasView,
    configuration: ConfigurationPanel,
    palette: Palette,
}

impl StudioInner {
    fn new(settings: &StudioSettings) -> Self {
        Self {
            editor: NodeEditor::new(settings.canvas.metrics),
            canvas: CanvasView {
                show_grid: settings.canvas.show_grid,
                grid_spacing: settings.canvas.grid_spacing,
            },
            configuration: ConfigurationPanel::new(),
            palette: Palette::new(),
        }
    }

    fn update(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, Header::ui);

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let selected = self.editor.selected_node().map(|node| node.data.label.as_str());
            StatusBar::ui(ui, self.editor.graph(), selected);
        });

        egui::SidePanel::left("palette")
            .resizable(false)
            .default_width(256.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.palette.ui(ui));
            });

        if let Some(action) = self.configuration.show(ctx, self.editor.panel_request()) {
            self.editor.panel_action(action);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().inner_margin(8.0))
            .show(ctx, |ui| {
                self.canvas.ui(ui, &mut self.editor);
            });
    }
}

/// Main studio application
pub struct StudioApp {
    settings: StudioSettings,
    running: Option<StudioRunning>,
    /// First fatal error raised inside the event loop
    failure: Option<StudioError>,
}

impl StudioApp {
    /// Create a new studio application
    pub fn new(settings: StudioSettings) -> Self {
        Self {
            settings,
            running: None,
            failure: None,
        }
    }

    /// Run the studio until its window closes
    pub fn run(settings: StudioSettings) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = StudioApp::new(settings);
        event_loop.run_app(&mut app)?;

        match app.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<StudioRunning> {
        tracing::info!("Creating studio window...");

        let window_settings = &self.settings.window;
        let window_attrs = Window::default_attributes()
            .with_title(window_settings.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                window_settings.size[0],
                window_settings.size[1],
            ))
            .with_min_inner_size(winit::dpi::LogicalSize::new(
                window_settings.min_size[0],
                window_settings.min_size[1],
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        tracing::info!("Initializing graphics...");
        let graphics = GraphicsState::new(window.clone())?;

        let egui_ctx = egui::Context::default();
        egui_ctx.set_visuals(egui::Visuals::dark());

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2 * 1024),
        );

        tracing::info!("Studio initialized, window size {:?}", window.inner_size());

        Ok(StudioRunning {
            window,
            graphics,
            egui_ctx,
            egui_state,
            studio: StudioInner::new(&self.settings),
        })
    }
}

impl ApplicationHandler for StudioApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(e) => {
                tracing::error!("Failed to start studio: {e}");
                self.failure = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        let response = running.egui_state.on_window_event(&running.window, &event);
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!("Window resized to {:?}", new_size);
                running.graphics.resize(new_size);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let raw_input = running.egui_state.take_egui_input(&running.window);
                let full_output = running.egui_ctx.run(raw_input, |ctx| {
                    running.studio.update(ctx);
                });

                running
                    .egui_state
                    .handle_platform_output(&running.window, full_output.platform_output.clone());

                match running.graphics.render(&running.egui_ctx, full_output, &running.window) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = running.window.inner_size();
                        running.graphics.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("Out of GPU memory!");
                        self.failure = Some(StudioError::Graphics("out of GPU memory".to_string()));
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        tracing::warn!("Surface timeout");
                    }
                }

                running.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}
