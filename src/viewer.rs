use anyhow::{anyhow, Context};
use futures::executor::block_on;
use log::{info, warn};
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use crate::config::MazeConfig;
use crate::generators::prim::RandPrims;
use crate::generators::{Generator, LastSnapshot, SnapshotSink};
use crate::render::{grid_vertices, Palette};
use crate::renderer::GraphicsContext;

pub struct State {
    pub gfx_ctx: GraphicsContext,
    pub maze_generator: RandPrims,
    pub palette: Palette,
    pub frame: LastSnapshot,
    pub steps_per_frame: usize,
}

impl State {
    fn update(&mut self) -> anyhow::Result<()> {
        if self.maze_generator.is_done() {
            return Ok(());
        }

        for _ in 0..self.steps_per_frame.max(1) {
            if self.maze_generator.step_with(&mut self.frame)?.is_none() {
                break;
            }
        }

        // finished maze, nothing highlighted
        if self.maze_generator.is_done() {
            self.frame.snapshot(self.maze_generator.grid(), None);
        }

        Ok(())
    }

    fn render(&mut self, view: &wgpu::TextureView, device: &wgpu::Device, queue: &wgpu::Queue) {
        self.gfx_ctx.start(view, device);

        let size = (self.gfx_ctx.size.width, self.gfx_ctx.size.height);
        let grid = self
            .frame
            .grid()
            .unwrap_or_else(|| self.maze_generator.grid());
        let verts = grid_vertices(grid, self.frame.highlight(), &self.palette, size);
        self.gfx_ctx.draw(&verts, view, device);

        self.gfx_ctx.render(queue);
    }
}

fn swap_chain_desc(size: winit::dpi::PhysicalSize<u32>) -> wgpu::SwapChainDescriptor {
    wgpu::SwapChainDescriptor {
        usage: wgpu::TextureUsage::OUTPUT_ATTACHMENT,
        format: wgpu::TextureFormat::Bgra8UnormSrgb,
        width: size.width,
        height: size.height,
        present_mode: wgpu::PresentMode::Fifo,
    }
}

/// Opens a window and animates generation until the window is closed.
/// Closing early abandons the maze between two steps.
pub fn run(config: &MazeConfig) -> anyhow::Result<()> {
    let maze_generator = config.generator()?;

    let event_loop = EventLoop::new();
    let (width, height) = config.window_size();
    let window = WindowBuilder::new()
        .with_title("maze")
        .with_inner_size(winit::dpi::PhysicalSize::new(width, height))
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to open the maze window: {}", err))?;

    let instance = wgpu::Instance::new(wgpu::BackendBit::PRIMARY);
    let surface = unsafe { instance.create_surface(&window) };
    let size = window.inner_size();

    // Since main can't be async, we're going to need to block
    let adapter = block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::Default,
        compatible_surface: Some(&surface),
    }))
    .context("no compatible graphics adapter")?;

    let (device, queue) = block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            features: wgpu::Features::empty(),
            limits: wgpu::Limits::default(),
            shader_validation: true,
        },
        None, // Trace path
    ))
    .map_err(|err| anyhow!("failed to create graphics device: {:?}", err))?;

    let sc_desc = swap_chain_desc(size);
    let mut swap_chain = device.create_swap_chain(&surface, &sc_desc);

    let gfx_ctx = GraphicsContext::new(&window, &device, &sc_desc);

    let mut state = State {
        gfx_ctx,
        maze_generator,
        palette: Palette::default(),
        frame: LastSnapshot::default(),
        steps_per_frame: config.steps_per_frame,
    };

    event_loop.run(move |event, _, control_flow| match event {
        Event::RedrawRequested(_) => {
            if let Err(err) = state.update() {
                warn!("generation stopped: {}", err);
                *control_flow = ControlFlow::Exit;
                return;
            }

            let frame = match swap_chain.get_current_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("dropped frame: {:?}", e);
                    return;
                }
            };
            state.render(&frame.output.view, &device, &queue);
        }
        Event::MainEventsCleared => {
            // the finished maze stays up without redrawing until something changes
            if !state.maze_generator.is_done() || state.frame.highlight().is_some() {
                window.request_redraw();
            } else if *control_flow != ControlFlow::Exit {
                *control_flow = ControlFlow::Wait;
            }
        }
        Event::WindowEvent {
            ref event,
            window_id,
        } if window_id == window.id() => match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state: ElementState::Pressed,
                        virtual_keycode: Some(VirtualKeyCode::Escape),
                        ..
                    },
                ..
            } => {
                if !state.maze_generator.is_done() {
                    info!(
                        "window closed after {} steps, maze left unfinished",
                        state.maze_generator.steps()
                    );
                }
                *control_flow = ControlFlow::Exit;
            }
            WindowEvent::Resized(physical_size) => {
                // minimised, nothing to draw into
                if physical_size.width == 0 || physical_size.height == 0 {
                    return;
                }
                swap_chain = device.create_swap_chain(&surface, &swap_chain_desc(*physical_size));
                state.gfx_ctx.resize(*physical_size);
                window.request_redraw();
            }
            WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                // new_inner_size is &&mut so we have to dereference it twice
                swap_chain =
                    device.create_swap_chain(&surface, &swap_chain_desc(**new_inner_size));
                state.gfx_ctx.resize(**new_inner_size);
                window.request_redraw();
            }
            _ => {}
        },
        _ => {}
    });
}
