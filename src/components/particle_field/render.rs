//! Per-frame drawing and the animation loop that drives it.
//!
//! Each frame clears the surface, advances and paints every particle, then
//! draws the links over the updated positions. The loop reschedules itself
//! through a [`FrameScheduler`] until its [`LoopHandle`] is stopped.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, info, warn};
use rand::Rng;
use rand::rngs::SmallRng;

use super::connections::draw_connections;
use super::particles::SharedField;
use super::surface::DrawingSurface;
use super::theme::LinkStyle;

/// Host primitive that runs a callback before the next repaint.
pub trait FrameScheduler {
	/// Queues `callback` to run once on the next frame.
	fn request_frame(&self, callback: Box<dyn FnOnce()>);
}

/// Stop switch for a [`RenderLoop`]. Cloning shares the switch.
#[derive(Clone, Debug, Default)]
pub struct LoopHandle {
	stopped: Rc<Cell<bool>>,
}

impl LoopHandle {
	/// Prevents any further frame from being drawn or scheduled. Safe to call
	/// any number of times, before the loop starts or from inside a frame.
	pub fn stop(&self) {
		if !self.stopped.replace(true) {
			info!("ambient-particles: render loop stopped");
		}
	}

	/// Whether [`stop`](Self::stop) has been called on any clone.
	pub fn is_stopped(&self) -> bool {
		self.stopped.get()
	}
}

/// Draws the field onto a surface, one frame at a time.
pub struct RenderLoop<S, R = SmallRng> {
	field: SharedField<R>,
	surface: Rc<RefCell<S>>,
	links: LinkStyle,
	handle: LoopHandle,
	started: Cell<bool>,
}

impl<S: DrawingSurface + 'static, R: Rng + 'static> RenderLoop<S, R> {
	/// Creates an idle loop. Nothing is drawn until [`start`](Self::start).
	pub fn new(field: SharedField<R>, surface: Rc<RefCell<S>>, links: LinkStyle) -> Self {
		Self {
			field,
			surface,
			links,
			handle: LoopHandle::default(),
			started: Cell::new(false),
		}
	}

	/// The loop's stop switch. Stopping it before `start` keeps the loop idle.
	pub fn handle(&self) -> LoopHandle {
		self.handle.clone()
	}

	/// Draws a single frame.
	pub fn render_frame(&self) {
		let mut surface = self.surface.borrow_mut();
		let mut field = self.field.borrow_mut();
		let bounds = field.bounds();

		let (width, height) = (surface.width(), surface.height());
		surface.clear_rect(0.0, 0.0, width, height);

		for particle in field.particles_mut() {
			particle.advance(bounds);
			particle.paint(&mut *surface);
		}

		draw_connections(field.particles(), &mut *surface, &self.links);
	}

	/// Begins drawing on every frame the scheduler hands out. Returns the
	/// loop's handle; a loop whose handle was already stopped never starts.
	pub fn start<F: FrameScheduler + 'static>(self: Rc<Self>, scheduler: Rc<F>) -> LoopHandle {
		let handle = self.handle();
		if handle.is_stopped() {
			debug!("ambient-particles: render loop stopped before start");
			return handle;
		}
		if self.started.replace(true) {
			warn!("ambient-particles: render loop already running");
			return handle;
		}

		info!("ambient-particles: render loop started");
		Self::schedule(self, scheduler);
		handle
	}

	fn schedule<F: FrameScheduler + 'static>(this: Rc<Self>, scheduler: Rc<F>) {
		let next = scheduler.clone();
		scheduler.request_frame(Box::new(move || {
			if this.handle.is_stopped() {
				return;
			}
			this.render_frame();
			if !this.handle.is_stopped() {
				Self::schedule(this, next);
			}
		}));
	}
}

#[cfg(test)]
mod tests {
	use std::collections::VecDeque;

	use super::*;
	use crate::components::particle_field::particles::{Particle, ParticleField};
	use crate::components::particle_field::surface::recording::{Op, RecordingSurface};
	use crate::components::particle_field::theme::{ParticleStyle, VIOLET};

	/// Scheduler whose frames only fire when the test asks.
	#[derive(Default)]
	struct ManualFrames {
		pending: RefCell<VecDeque<Box<dyn FnOnce()>>>,
	}

	impl ManualFrames {
		fn pending(&self) -> usize {
			self.pending.borrow().len()
		}

		/// Fires the oldest pending frame; false if none was queued.
		fn fire(&self) -> bool {
			let next = self.pending.borrow_mut().pop_front();
			match next {
				Some(callback) => {
					callback();
					true
				}
				None => false,
			}
		}
	}

	impl FrameScheduler for ManualFrames {
		fn request_frame(&self, callback: Box<dyn FnOnce()>) {
			self.pending.borrow_mut().push_back(callback);
		}
	}

	fn at(x: f64, y: f64, vx: f64) -> Particle {
		Particle {
			x,
			y,
			vx,
			vy: 0.0,
			size: 1.5,
			alpha: 0.2,
			color: VIOLET.with_alpha(0.2),
		}
	}

	type Fixture = (
		Rc<RenderLoop<RecordingSurface>>,
		SharedField,
		Rc<RefCell<RecordingSurface>>,
	);

	fn setup(width: u32, height: u32) -> Fixture {
		let field = ParticleField::seeded(ParticleStyle::default(), 5).into_shared();
		field.borrow_mut().resize(width as f64, height as f64);
		let surface = Rc::new(RefCell::new(RecordingSurface::new(width, height)));
		let render = Rc::new(RenderLoop::new(
			field.clone(),
			surface.clone(),
			LinkStyle::default(),
		));
		(render, field, surface)
	}

	#[test]
	fn frame_clears_then_paints_then_links() {
		let (render, field, surface) = setup(300, 300);
		field
			.borrow_mut()
			.replace(vec![at(0.0, 0.0, 1.0), at(100.0, 0.0, 1.0), at(249.0, 0.0, 1.0)]);

		render.render_frame();

		let surface = surface.borrow();
		assert_eq!(surface.ops[0], Op::Clear(0.0, 0.0, 300.0, 300.0));

		let circles = surface.circles();
		let xs: Vec<f64> = circles.iter().map(|c| c.x).collect();
		assert_eq!(xs, vec![1.0, 101.0, 250.0]);
		assert!(circles.iter().all(|c| c.radius == 1.5 && c.color == VIOLET.with_alpha(0.2)));

		// links use positions after the move
		let lines = surface.lines();
		assert_eq!(lines.len(), 2);
		assert_eq!((lines[0].from, lines[0].to), ((1.0, 0.0), (101.0, 0.0)));
		assert_eq!((lines[1].from, lines[1].to), ((101.0, 0.0), (250.0, 0.0)));

		let last_fill = surface.ops.iter().rposition(|op| *op == Op::Fill).unwrap();
		let first_stroke = surface.ops.iter().position(|op| *op == Op::Stroke).unwrap();
		assert!(last_fill < first_stroke);
	}

	#[test]
	fn empty_field_only_clears() {
		let (render, field, surface) = setup(0, 0);
		assert!(field.borrow().is_empty());

		render.render_frame();
		render.render_frame();

		let surface = surface.borrow();
		assert_eq!(surface.clears(), 2);
		assert_eq!(surface.ops.len(), 2);
	}

	#[test]
	fn loop_reschedules_after_every_frame() {
		let (render, _field, surface) = setup(640, 480);
		let frames = Rc::new(ManualFrames::default());

		let handle = render.clone().start(frames.clone());
		assert!(!handle.is_stopped());
		assert_eq!(frames.pending(), 1);

		for _ in 0..10 {
			assert!(frames.fire());
			assert_eq!(frames.pending(), 1);
		}
		assert_eq!(surface.borrow().clears(), 10);
	}

	#[test]
	fn stop_halts_rescheduling() {
		let (render, _field, surface) = setup(640, 480);
		let frames = Rc::new(ManualFrames::default());
		let handle = render.clone().start(frames.clone());

		frames.fire();
		handle.stop();
		handle.stop();

		// the frame already queued fires but draws nothing and queues nothing
		assert!(frames.fire());
		assert!(!frames.fire());
		assert_eq!(surface.borrow().clears(), 1);
	}

	#[test]
	fn stop_from_inside_a_frame_finishes_it_without_rescheduling() {
		let (render, _field, surface) = setup(640, 480);
		surface.borrow_mut().stop_on_clear = Some(render.handle());
		let frames = Rc::new(ManualFrames::default());
		let handle = render.clone().start(frames.clone());

		assert!(frames.fire());

		assert!(handle.is_stopped());
		assert_eq!(frames.pending(), 0);
		assert!(!frames.fire());
		// the interrupted frame is still drawn in full
		let surface = surface.borrow();
		assert_eq!(surface.clears(), 1);
		assert_eq!(surface.circles().len(), 10);
	}

	#[test]
	fn stop_before_start_schedules_nothing() {
		let (render, _field, surface) = setup(640, 480);
		let frames = Rc::new(ManualFrames::default());

		render.handle().stop();
		let handle = render.clone().start(frames.clone());

		assert!(handle.is_stopped());
		assert_eq!(frames.pending(), 0);
		assert!(surface.borrow().ops.is_empty());
	}

	#[test]
	fn starting_twice_keeps_a_single_chain() {
		let (render, _field, _surface) = setup(640, 480);
		let frames = Rc::new(ManualFrames::default());

		render.clone().start(frames.clone());
		render.clone().start(frames.clone());

		assert_eq!(frames.pending(), 1);
	}

	#[test]
	fn resize_between_frames_swaps_population() {
		let (render, field, _surface) = setup(1920, 1080);
		let frames = Rc::new(ManualFrames::default());
		render.clone().start(frames.clone());

		frames.fire();
		assert_eq!(field.borrow().len(), 69);

		field.borrow_mut().resize(300.0, 300.0);
		frames.fire();

		let field = field.borrow();
		assert_eq!(field.len(), 3);
		assert!(field.particles().iter().all(|p| p.x < 300.0 && p.y < 300.0));
	}
}
