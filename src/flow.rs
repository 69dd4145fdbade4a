//! Flow control and application event loop.
//!
//! A "flow" represents a scene that reacts to window input, updates its state
//! every frame and provides renderable objects. The engine owns the window,
//! the GPU [`Context`] and any number of flows and drives them from the winit
//! event loop.
//!
//! # User-facing types
//!
//! - [`GraphicsFlow<S>`] is the trait for scenes that handle events and rendering
//! - [`Out`] lets a hook reconfigure the context or stop the viewer
//! - [`Viewer`] starts the loop, [`RenderHandle`] stops it from anywhere
//!
//! # Lifecycle Flow
//!
//! The event loop follows this pattern each frame:
//! 1. Distribute window events to the orbit controls and `on_window_events`
//! 2. Call `on_update` so flows advance their state and refresh GPU buffers
//! 3. Advance the orbit controls and upload the camera uniform
//! 4. Call flows' `on_render()` to collect renderable objects
//! 5. Render to the frame buffer with the Phong pipeline and present
//! 6. Request the next frame

use std::{
    fmt::Debug,
    iter,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use instant::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    context::{Context, InitContext, Settings, apply_resize},
    data_structures::model::DrawModel,
    render::{Instanced, Render},
};

/// Output of every lifecycle hook.
///
/// `Out::Configure` can be used to modify the Context during runtime, for
/// instance to change the clear colour or the lights.
///
/// `Out::Exit` closes the viewer after the current event.
///
/// `Empty` is the default output used when nothing needs to happen.
pub enum Out {
    Configure(Box<dyn FnOnce(&mut Context)>),
    Exit,
    Empty,
}

impl Default for Out {
    fn default() -> Self {
        Self::Empty
    }
}

/// Trait for implementing a renderable scene.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once when the flow is created; configure the context here
/// 2. `on_window_events()` is called for each winit window event
/// 3. `on_update()` is called every frame before anything is drawn
/// 4. `on_render()` is called each frame and specifies how to render `self`
pub trait GraphicsFlow<S> {
    /// Initialize the flow and configure the context.
    fn on_init(&mut self, _ctx: &mut Context, _state: &mut S) -> Out {
        Out::Empty
    }

    /// Update state every frame.
    ///
    /// Called with the time `dt` elapsed since the previous frame. Transforms
    /// changed here must be written to the GPU here as well, the frame that
    /// follows draws whatever the buffers hold.
    fn on_update(&mut self, ctx: &Context, state: &mut S, dt: Duration) -> Out;

    /// Handle window events (keyboard, mouse, window resizing, etc.).
    fn on_window_events(&mut self, _ctx: &Context, _state: &mut S, _event: &WindowEvent) -> Out {
        Out::Empty
    }

    /// Return renderable objects for this flow.
    fn on_render(&self) -> Render<'_>;
}

impl<S> Debug for dyn GraphicsFlow<S> + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraphicsFlow")
    }
}

/// Type alias for a flow constructor (factory function).
///
/// A flow constructor takes an [`InitContext`] and asynchronously returns a
/// boxed `GraphicsFlow`. Building the scene may fail, which aborts startup.
pub type FlowConstructor<S> = Box<
    dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow<S>>>>>>,
>;

/// Stops a running [`Viewer`]. Clones share the same flag and may be used
/// from any thread.
#[derive(Clone, Debug, Default)]
pub struct RenderHandle {
    stop: Arc<AtomicBool>,
}

impl RenderHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the render loop to exit. The loop observes the flag before its next frame.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

/// Application state bundle: GPU context and app state.
#[derive(Debug)]
pub struct AppState<State: 'static> {
    pub(crate) ctx: Context,
    state: State,
}

impl<State: Default> AppState<State> {
    async fn new(window: Arc<Window>, settings: &Settings) -> anyhow::Result<Self> {
        let ctx = Context::new(window, settings).await?;
        ctx.surface.configure(&ctx.device, &ctx.config);
        Ok(Self {
            ctx,
            state: State::default(),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        let ctx = &mut self.ctx;
        if !apply_resize(
            &mut ctx.viewport,
            &mut ctx.projection,
            ctx.camera.controls.as_mut(),
            width,
            height,
        ) {
            return;
        }
        log::debug!("Resizing surface to {}x{}", width, height);
        ctx.config.width = width;
        ctx.config.height = height;
        ctx.surface.configure(&ctx.device, &ctx.config);
        ctx.recreate_attachments();
    }

    fn render(
        &self,
        graphics_flows: &[Box<dyn GraphicsFlow<State>>],
    ) -> Result<(), wgpu::SurfaceError> {
        let ctx = &self.ctx;
        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // With MSAA the frame is drawn into the multisampled texture and
        // resolved into the surface texture at the end of the pass.
        let (target, resolve_target, store) = match &ctx.msaa_texture {
            Some(msaa) => (&msaa.view, Some(&view), wgpu::StoreOp::Discard),
            None => (&view, None, wgpu::StoreOp::Store),
        };

        let mut encoder: wgpu::CommandEncoder =
            ctx.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let mut render_pass: wgpu::RenderPass<'_> =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(ctx.clear_colour),
                            store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        view: &ctx.depth_texture.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });

            let mut basics: Vec<Instanced> = Vec::new();
            graphics_flows
                .iter()
                .for_each(|flow| flow.on_render().flatten_into(&mut basics));

            render_pass.set_pipeline(&ctx.pipeline);
            for instanced in basics {
                if instanced.amount == 0 || instanced.instance.size() == 0 {
                    log::warn!("you attempted to render {} with zero instances", instanced.mesh.name);
                    continue;
                }
                render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                render_pass.draw_mesh_instanced(
                    instanced.mesh,
                    instanced.material,
                    0..instanced.amount as u32,
                    &ctx.camera.bind_group,
                    &ctx.light.bind_group,
                );
            }
        }

        ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App<State: 'static> {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[cfg(target_arch = "wasm32")]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent<State>>,
    settings: Settings,
    handle: RenderHandle,
    state: Option<AppState<State>>,
    // This will hold the fully initialized flows once they are ready.
    graphics_flows: Vec<Box<dyn GraphicsFlow<State>>>,
    // This holds the constructors at the start.
    // We use Option to `take()` it after use.
    constructors: Option<Vec<FlowConstructor<State>>>,
    init_error: Option<anyhow::Error>,
    last_time: Instant,
}

impl<State: 'static> App<State> {
    fn new(
        #[cfg(target_arch = "wasm32")] event_loop: &EventLoop<FlowEvent<State>>,
        settings: Settings,
        handle: RenderHandle,
        constructors: Vec<FlowConstructor<State>>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            #[cfg(target_arch = "wasm32")]
            proxy: event_loop.create_proxy(),
            settings,
            handle,
            state: None,
            graphics_flows: Vec::new(),
            constructors: Some(constructors),
            init_error: None,
            last_time: Instant::now(),
        })
    }

    /// Runs `on_init` of every flow once context and flows are ready.
    fn start(
        &mut self,
        event_loop: &ActiveEventLoop,
        mut app_state: AppState<State>,
        flows: Vec<Box<dyn GraphicsFlow<State>>>,
    ) {
        self.graphics_flows = flows;
        self.graphics_flows.iter_mut().for_each(|flow| {
            let out = flow.on_init(&mut app_state.ctx, &mut app_state.state);
            handle_flow_output(event_loop, &mut app_state.ctx, out);
        });
        self.last_time = Instant::now();
        app_state.ctx.window.request_redraw();
        log::info!("{} flow(s) running", self.graphics_flows.len());
        self.state = Some(app_state);
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("App initialization failed: {:#}", err);
        self.init_error = Some(err);
        event_loop.exit();
    }
}

pub(crate) enum FlowEvent<State: 'static> {
    #[allow(dead_code)]
    Initialized {
        state: AppState<State>,
        flows: Vec<Box<dyn GraphicsFlow<State>>>,
    },
}

impl<State> Debug for FlowEvent<State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { state: _, flows } => {
                f.debug_struct("Initialized").field("flows", flows).finish()
            }
        }
    }
}

async fn init<State: Default + 'static>(
    window: Arc<Window>,
    settings: Settings,
    constructors: Vec<FlowConstructor<State>>,
) -> anyhow::Result<(AppState<State>, Vec<Box<dyn GraphicsFlow<State>>>)> {
    let app_state = AppState::new(window, &settings).await?;
    let flow_futures: Vec<_> = constructors
        .into_iter()
        // The clone in into() leverages the internal Arcs of Device and Queue and thus only clones the ref
        .map(|constructor| constructor((&app_state.ctx).into()))
        .collect();
    let flows = futures::future::join_all(flow_futures)
        .await
        .into_iter()
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok((app_state, flows))
}

impl<State: 'static + Default> ApplicationHandler<FlowEvent<State>> for App<State> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(constructors) = self.constructors.take() else {
            // Already initialised; resumed fires again on some platforms.
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title(&self.settings.title);

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(CANVAS_ID));
            window_attributes = match canvas {
                Some(canvas) => window_attributes.with_canvas(Some(canvas.unchecked_into())),
                None => {
                    log::info!("No #{} element found, appending a canvas to the body", CANVAS_ID);
                    window_attributes.with_append(true)
                }
            };
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                let err = anyhow::anyhow!("Cannot create a window: {}", e);
                return self.fail(event_loop, err);
            }
        };

        let init_future = init(window, self.settings.clone(), constructors);

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(init_future) {
                Ok((app_state, flows)) => self.start(event_loop, app_state, flows),
                Err(e) => self.fail(event_loop, e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match init_future.await {
                    Ok((state, flows)) => {
                        if proxy
                            .send_event(FlowEvent::Initialized { state, flows })
                            .is_err()
                        {
                            log::error!("Event loop closed before initialization finished");
                        }
                    }
                    Err(e) => log::error!("App initialization failed: {:#}", e),
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent<State>) {
        match event {
            FlowEvent::Initialized { mut state, flows } => {
                // This is the message from our wasm `spawn_local`
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                self.start(event_loop, state, flows);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        let ctx = &mut state.ctx;
        if let Some(controls) = ctx.camera.controls.as_mut() {
            controls.handle_window_event(&event, &ctx.camera.camera, &ctx.projection);
        }

        self.graphics_flows.iter_mut().for_each(|f| {
            let out = f.on_window_events(&state.ctx, &mut state.state, &event);
            handle_flow_output(event_loop, &mut state.ctx, out);
        });

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                if self.handle.is_stopped() {
                    log::info!("Render handle stopped, leaving the render loop");
                    event_loop.exit();
                    return;
                }

                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                self.graphics_flows.iter_mut().for_each(|f| {
                    let out = f.on_update(&state.ctx, &mut state.state, dt);
                    handle_flow_output(event_loop, &mut state.ctx, out);
                });
                state.ctx.update_camera();

                match state.render(&self.graphics_flows) {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }

                // invoke main render loop
                state.ctx.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.handle.is_stopped() {
            event_loop.exit();
        }
    }
}

fn handle_flow_output(event_loop: &ActiveEventLoop, ctx: &mut Context, out: Out) {
    match out {
        Out::Configure(f) => f(ctx),
        Out::Exit => event_loop.exit(),
        Out::Empty => (),
    }
}

/// A window (or canvas) running a set of flows.
pub struct Viewer<State: 'static> {
    settings: Settings,
    handle: RenderHandle,
    constructors: Vec<FlowConstructor<State>>,
}

impl<State: 'static + Default> Viewer<State> {
    pub fn new(settings: Settings, constructors: Vec<FlowConstructor<State>>) -> Self {
        Self {
            settings,
            handle: RenderHandle::new(),
            constructors,
        }
    }

    /// A handle that stops the render loop of this viewer.
    pub fn handle(&self) -> RenderHandle {
        self.handle.clone()
    }

    /// Opens the window and blocks until it is closed or the handle is stopped.
    ///
    /// On the web the loop is handed to the browser and this returns right away.
    pub fn run(self) -> anyhow::Result<()> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Err(e) = env_logger::try_init() {
                println!("Warning: Could not initialize logger: {}", e);
            };
        }

        #[cfg(target_arch = "wasm32")]
        {
            // A second viewer on the same page keeps the logger of the first.
            console_log::init_with_level(log::Level::Info).ok();
        }

        log::info!("Starting {}", self.settings.title);
        let event_loop: EventLoop<FlowEvent<State>> = EventLoop::with_user_event().build()?;

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = App::new(self.settings, self.handle, self.constructors)?;
            event_loop.run_app(&mut app)?;
            if let Some(err) = app.init_error.take() {
                return Err(err);
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;

            let app = App::new(&event_loop, self.settings, self.handle, self.constructors)?;
            event_loop.spawn_app(app);
        }

        Ok(())
    }
}

/// Shorthand for `Viewer::new(settings, constructors).run()`.
pub fn run<State: 'static + Default>(
    settings: Settings,
    constructors: Vec<FlowConstructor<State>>,
) -> anyhow::Result<()> {
    Viewer::new(settings, constructors).run()
}
