//! Browser wiring for the particle field.
//!
//! [`Background`] binds the field to a canvas: it sizes the canvas to the
//! window, listens for `resize`, and drives the render loop with
//! `requestAnimationFrame`. [`ParticleFieldCanvas`] is the Leptos component
//! that renders a full-viewport canvas and attaches a `Background` to it.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::error::SetupError;
use super::particles::ParticleField;
use super::render::{FrameScheduler, LoopHandle, RenderLoop};
use super::surface::{CanvasSurface, WindowViewport};
use super::theme::FieldStyle;
use super::viewport::ViewportBinding;

/// Id of the canvas a static page provides for the background.
pub const DEFAULT_CANVAS_ID: &str = "particles-canvas";

/// Schedules frames with `window.requestAnimationFrame`.
pub struct AnimationFrames {
	window: Window,
}

impl FrameScheduler for AnimationFrames {
	fn request_frame(&self, callback: Box<dyn FnOnce()>) {
		// frees itself once invoked
		let callback = Closure::once_into_js(callback);
		if let Err(e) = self.window.request_animation_frame(callback.unchecked_ref()) {
			warn!("ambient-particles: requestAnimationFrame failed: {:?}", e);
		}
	}
}

fn random_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64
}

fn find_canvas(id: &str) -> Result<HtmlCanvasElement, SetupError> {
	let document = web_sys::window()
		.ok_or(SetupError::NoWindow)?
		.document()
		.ok_or(SetupError::NoDocument)?;
	let element = document
		.get_element_by_id(id)
		.ok_or_else(|| SetupError::CanvasNotFound(id.to_string()))?;
	element
		.dyn_into::<HtmlCanvasElement>()
		.map_err(|_| SetupError::NotACanvas(id.to_string()))
}

/// A running particle background. Dropping it stops the animation and
/// removes the resize listener.
pub struct Background {
	window: Window,
	handle: LoopHandle,
	on_resize: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Background {
	/// Starts the background on `canvas`, sized to the window.
	pub fn attach(canvas: HtmlCanvasElement, style: FieldStyle) -> Result<Self, SetupError> {
		let window = web_sys::window().ok_or(SetupError::NoWindow)?;
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or(SetupError::NoContext)?
			.dyn_into()
			.map_err(|_| SetupError::NoContext)?;

		let surface = Rc::new(RefCell::new(CanvasSurface::new(canvas, ctx)));
		let field =
			ParticleField::new(style.particles, SmallRng::seed_from_u64(random_seed())).into_shared();

		let on_resize = ViewportBinding::new(
			field.clone(),
			surface.clone(),
			WindowViewport::new(window.clone()),
		)
		.install(|binding| -> Result<Closure<dyn FnMut()>, SetupError> {
			let on_resize: Closure<dyn FnMut()> = Closure::new(move || binding.on_resize());
			window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
			Ok(on_resize)
		})?;

		let render = Rc::new(RenderLoop::new(field, surface, style.links));
		let handle = render.start(Rc::new(AnimationFrames {
			window: window.clone(),
		}));
		info!("ambient-particles: background attached");

		Ok(Self {
			window,
			handle,
			on_resize: RefCell::new(Some(on_resize)),
		})
	}

	/// Starts the background on the canvas with the given id. A missing or
	/// unusable canvas disables the background: nothing is scheduled and
	/// `None` is returned.
	pub fn attach_by_id(id: &str, style: FieldStyle) -> Option<Self> {
		match find_canvas(id).and_then(|canvas| Self::attach(canvas, style)) {
			Ok(background) => Some(background),
			Err(e) => {
				info!("ambient-particles: background disabled: {}", e);
				None
			}
		}
	}

	/// Stops drawing and detaches from the window. Idempotent.
	pub fn stop(&self) {
		self.handle.stop();
		if let Some(cb) = self.on_resize.borrow_mut().take() {
			let _ = self
				.window
				.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	}

	/// Keeps the background running until the page unloads.
	pub fn keep_for_page_lifetime(self) {
		std::mem::forget(self);
	}
}

impl Drop for Background {
	fn drop(&mut self) {
		self.stop();
	}
}

/// Renders a fixed, full-viewport canvas behind the page content and runs
/// the particle background on it.
#[component]
pub fn ParticleFieldCanvas(
	/// Visual configuration; defaults to the violet style.
	#[prop(optional)]
	style: Option<FieldStyle>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let background: Rc<RefCell<Option<Background>>> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if background.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		match Background::attach(canvas, style.clone().unwrap_or_default()) {
			Ok(bg) => *background.borrow_mut() = Some(bg),
			Err(e) => warn!("ambient-particles: failed to attach background: {}", e),
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			id=DEFAULT_CANVAS_ID
			class="particles-canvas"
			style="position: fixed; inset: 0; display: block; pointer-events: none; z-index: 0;"
		/>
	}
}
