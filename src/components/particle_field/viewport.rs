//! Keeps the surface and the field in step with the viewport size.

use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;
use rand::rngs::SmallRng;

use super::particles::SharedField;
use super::surface::{DrawingSurface, Viewport};

/// Reacts to viewport resize notifications by resizing the drawing surface
/// and regenerating the field for the new dimensions.
pub struct ViewportBinding<S, V, R = SmallRng> {
	field: SharedField<R>,
	surface: Rc<RefCell<S>>,
	viewport: V,
}

impl<S: DrawingSurface, V: Viewport, R: Rng> ViewportBinding<S, V, R> {
	/// Binds `field` and `surface` to `viewport`. Nothing is resized yet.
	pub fn new(field: SharedField<R>, surface: Rc<RefCell<S>>, viewport: V) -> Self {
		Self {
			field,
			surface,
			viewport,
		}
	}

	/// Registers the binding for resize notifications through `listen`, then
	/// applies the current viewport size once. If `listen` fails, the error
	/// is returned and neither the surface nor the field is touched.
	pub fn install<T, E>(self, listen: impl FnOnce(Rc<Self>) -> Result<T, E>) -> Result<T, E> {
		let binding = Rc::new(self);
		let registration = listen(binding.clone())?;
		binding.on_resize();
		Ok(registration)
	}

	/// Handles one resize notification. Every call is applied in full; there
	/// is no coalescing.
	pub fn on_resize(&self) {
		let (width, height) = self.viewport.size();
		// canvas dimensions are whole pixels; `as` saturates negatives and NaN to 0
		let (width, height) = (width as u32, height as u32);

		self.surface.borrow_mut().set_size(width, height);
		self.field.borrow_mut().resize(width as f64, height as f64);
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::*;
	use crate::components::particle_field::particles::{Bounds, ParticleField};
	use crate::components::particle_field::surface::recording::{FixedViewport, Op, RecordingSurface};
	use crate::components::particle_field::theme::ParticleStyle;

	fn wired(
		size: (f64, f64),
	) -> (
		ViewportBinding<RecordingSurface, Rc<FixedViewport>>,
		SharedField,
		Rc<RefCell<RecordingSurface>>,
		Rc<FixedViewport>,
	) {
		let field = ParticleField::seeded(ParticleStyle::default(), 8).into_shared();
		let surface = Rc::new(RefCell::new(RecordingSurface::default()));
		let viewport = Rc::new(FixedViewport(Cell::new(size)));
		let binding = ViewportBinding::new(field.clone(), surface.clone(), viewport.clone());
		(binding, field, surface, viewport)
	}

	#[test]
	fn resize_applies_size_to_surface_and_field() {
		let (binding, field, surface, _) = wired((1920.0, 1080.0));
		binding.on_resize();

		assert_eq!(surface.borrow().ops, vec![Op::SetSize(1920, 1080)]);
		assert_eq!(field.borrow().bounds(), Bounds::new(1920.0, 1080.0));
		assert_eq!(field.borrow().len(), 69);
	}

	#[test]
	fn fractional_sizes_are_truncated_to_pixels() {
		let (binding, field, surface, _) = wired((640.7, 480.2));
		binding.on_resize();

		assert_eq!(surface.borrow().width, 640);
		assert_eq!(field.borrow().bounds(), Bounds::new(640.0, 480.0));
	}

	#[test]
	fn every_event_in_a_flood_is_applied() {
		let (binding, field, surface, viewport) = wired((800.0, 600.0));

		for step in 0..50 {
			let size = (800.0 + step as f64 * 10.0, 600.0 - step as f64 * 5.0);
			viewport.0.set(size);
			binding.on_resize();

			let expected = (size.0 * size.1 / 30_000.0).floor() as usize;
			assert_eq!(field.borrow().len(), expected);
		}
		assert_eq!(surface.borrow().ops.len(), 50);
	}

	#[test]
	fn install_sizes_after_the_listener_is_registered() {
		let (binding, field, surface, viewport) = wired((1920.0, 1080.0));
		let registered = binding
			.install(|binding| {
				assert!(surface.borrow().ops.is_empty());
				Ok::<_, ()>(binding)
			})
			.unwrap();

		assert_eq!(surface.borrow().ops, vec![Op::SetSize(1920, 1080)]);
		assert_eq!(field.borrow().len(), 69);

		viewport.0.set((300.0, 300.0));
		registered.on_resize();
		assert_eq!(field.borrow().len(), 3);
	}

	#[test]
	fn failed_listener_leaves_surface_and_field_untouched() {
		let (binding, field, surface, _) = wired((1920.0, 1080.0));
		let result = binding.install(|_| Err::<(), _>("no listener"));

		assert_eq!(result, Err("no listener"));
		assert!(surface.borrow().ops.is_empty());
		assert!(field.borrow().is_empty());
		assert_eq!(field.borrow().bounds(), Bounds::default());
	}

	#[test]
	fn degenerate_viewport_empties_the_field() {
		let (binding, field, _surface, viewport) = wired((1024.0, 768.0));
		binding.on_resize();
		assert!(!field.borrow().is_empty());

		viewport.0.set((0.0, 0.0));
		binding.on_resize();
		assert!(field.borrow().is_empty());

		viewport.0.set((-5.0, f64::NAN));
		binding.on_resize();
		assert!(field.borrow().is_empty());

		viewport.0.set((1024.0, 768.0));
		binding.on_resize();
		assert_eq!(field.borrow().len(), 26);
	}
}
