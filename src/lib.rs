use winit::event::{ElementState, VirtualKeyCode};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod chain;
mod context;
mod pass;
mod primitives;
mod time;
mod window;

use crate::{
    chain::Chain,
    context::GraphicsContext,
    pass::{
        chain::{ChainPass, ChainPassConfig},
        Pass,
    },
    time::FrameClock,
    window::{Window, WindowEvents},
};

// Node count of the rendered chain
const NUM_NODES: usize = 5;

struct State {
    ctx: GraphicsContext,
    pass: ChainPass,
    chain: Chain,
    clock: FrameClock,
    // Window size
    size: winit::dpi::PhysicalSize<u32>,
}

impl State {
    // Initialize the state
    async fn new(window: &Window) -> anyhow::Result<Self> {
        let size = window.window.inner_size();

        // Initialize the graphic context
        let ctx = GraphicsContext::new(window).await?;

        // The animated model: a fixed-size chain of default nodes
        let chain = Chain::new(NUM_NODES);

        // Initialize the pass
        let pass = ChainPass::new(
            &ChainPassConfig::default(),
            &ctx.device,
            &ctx.queue,
            &ctx.config,
        );

        Ok(Self {
            ctx,
            pass,
            chain,
            clock: FrameClock::new(),
            size,
        })
    }

    // Keeps state in sync with window size when changed
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.ctx.config.width = new_size.width;
            self.ctx.config.height = new_size.height;
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.pass.resize(&self.ctx.queue, &self.ctx.config);
        }
    }

    // One model tick: advance every node by the real elapsed time
    fn update(&mut self) {
        let dt = self.clock.tick();
        self.chain.update(dt);
    }

    // Primary render flow
    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.pass
            .draw(&self.ctx.surface, &self.ctx.device, &self.ctx.queue, &self.chain)
    }
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub async fn run() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            console_log::init_with_level(log::Level::Warn).expect("Couldn't initialize logger");
        } else {
            env_logger::init();
        }
    }

    let window = Window::new();

    #[cfg(target_arch = "wasm32")]
    {
        // Winit prevents sizing with CSS, so we have to set
        // the size manually when on web.
        use winit::dpi::PhysicalSize;
        window.window.set_inner_size(PhysicalSize::new(450, 400));

        use winit::platform::web::WindowExtWebSys;
        web_sys::window()
            .and_then(|win| win.document())
            .and_then(|doc| {
                let dst = doc.body()?;
                let canvas = web_sys::Element::from(window.window.canvas());
                dst.append_child(&canvas).ok()?;
                Some(())
            })
            .expect("Couldn't append canvas to document body.");
    }

    // State::new uses async code, so we're going to wait for it to finish
    let mut state = match State::new(&window).await {
        Ok(state) => state,
        Err(err) => {
            // No adapter/device/surface means nothing can ever be drawn
            log::error!("failed to initialize graphics: {err:#}");
            return;
        }
    };

    window.run(move |event| match event {
        WindowEvents::Resized { width, height } => {
            state.resize(winit::dpi::PhysicalSize { width, height });
        }
        WindowEvents::Draw => {
            state.update();
            match state.render() {
                Ok(_) => {}
                // Reconfigure the surface if it's lost or outdated
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    state.resize(state.size)
                }
                // The system is out of memory; nothing sensible left to do
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    panic!("render surface is out of memory")
                }
                Err(wgpu::SurfaceError::Timeout) => log::warn!("Surface timeout"),
            }
        }
        WindowEvents::Keyboard {
            state: key_state,
            virtual_keycode,
        } => {
            // Toggle the connecting lines between nodes
            if key_state == ElementState::Pressed && *virtual_keycode == VirtualKeyCode::L {
                state.pass.draw_lines = !state.pass.draw_lines;
                log::info!("draw_lines: {}", state.pass.draw_lines);
            }
        }
    });
}
