//! Host seams: the raster surface particles are drawn on and the viewport it
//! is sized from.
//!
//! The core only talks to these traits. [`CanvasSurface`] and
//! [`WindowViewport`] are the browser implementations.

use std::f64::consts::PI;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::theme::Color;

/// The subset of the 2D canvas API the field draws with.
pub trait DrawingSurface {
	/// Raster width in pixels.
	fn width(&self) -> f64;
	/// Raster height in pixels.
	fn height(&self) -> f64;
	/// Resizes the backing raster. Clears it as a side effect on canvases.
	fn set_size(&mut self, width: u32, height: u32);

	/// Erases a rectangle to transparent.
	fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
	/// Color used by subsequent [`fill`](Self::fill) calls.
	fn set_fill_color(&mut self, color: Color);
	/// Color used by subsequent [`stroke`](Self::stroke) calls.
	fn set_stroke_color(&mut self, color: Color);
	/// Width used by subsequent [`stroke`](Self::stroke) calls.
	fn set_line_width(&mut self, width: f64);

	/// Starts a new path, discarding the current one.
	fn begin_path(&mut self);
	/// Adds an arc around `(x, y)` from `start` to `end` radians.
	fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64);
	/// Fills the current path.
	fn fill(&mut self);
	/// Moves the pen without drawing.
	fn move_to(&mut self, x: f64, y: f64);
	/// Adds a segment from the pen to `(x, y)`.
	fn line_to(&mut self, x: f64, y: f64);
	/// Strokes the current path.
	fn stroke(&mut self);

	/// Fills a full circle.
	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color) {
		self.set_fill_color(color);
		self.begin_path();
		self.arc(x, y, radius, 0.0, PI * 2.0);
		self.fill();
	}

	/// Strokes a single straight segment.
	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Color) {
		self.set_stroke_color(color);
		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
	}
}

/// Source of the current viewport dimensions.
pub trait Viewport {
	/// Current `(width, height)` in CSS pixels.
	fn size(&self) -> (f64, f64);
}

impl<V: Viewport + ?Sized> Viewport for std::rc::Rc<V> {
	fn size(&self) -> (f64, f64) {
		(**self).size()
	}
}

/// An HTML canvas and its 2D context.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	/// Wraps `canvas` and a 2D context obtained from it.
	pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
		Self { canvas, ctx }
	}
}

impl DrawingSurface for CanvasSurface {
	fn width(&self) -> f64 {
		self.canvas.width() as f64
	}

	fn height(&self) -> f64 {
		self.canvas.height() as f64
	}

	fn set_size(&mut self, width: u32, height: u32) {
		self.canvas.set_width(width);
		self.canvas.set_height(height);
	}

	fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
		self.ctx.clear_rect(x, y, width, height);
	}

	fn set_fill_color(&mut self, color: Color) {
		self.ctx.set_fill_style_str(&color.to_css());
	}

	fn set_stroke_color(&mut self, color: Color) {
		self.ctx.set_stroke_style_str(&color.to_css());
	}

	fn set_line_width(&mut self, width: f64) {
		self.ctx.set_line_width(width);
	}

	fn begin_path(&mut self) {
		self.ctx.begin_path();
	}

	fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
		let _ = self.ctx.arc(x, y, radius, start, end);
	}

	fn fill(&mut self) {
		self.ctx.fill();
	}

	fn move_to(&mut self, x: f64, y: f64) {
		self.ctx.move_to(x, y);
	}

	fn line_to(&mut self, x: f64, y: f64) {
		self.ctx.line_to(x, y);
	}

	fn stroke(&mut self) {
		self.ctx.stroke();
	}
}

/// Browser window inner size.
pub struct WindowViewport {
	window: Window,
}

impl WindowViewport {
	/// Reads sizes from `window`.
	pub fn new(window: Window) -> Self {
		Self { window }
	}
}

impl Viewport for WindowViewport {
	fn size(&self) -> (f64, f64) {
		let read = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
			v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
		};
		(read(self.window.inner_width()), read(self.window.inner_height()))
	}
}


#[cfg(test)]
mod tests {
	use super::recording::{Circle, Line, RecordingSurface};
	use super::*;

	#[test]
	fn circle_helper_emits_a_closed_arc() {
		let mut surface = RecordingSurface::new(10, 10);
		surface.fill_circle(1.0, 2.0, 0.5, Color::rgb(1, 2, 3));

		assert_eq!(
			surface.circles(),
			vec![Circle {
				x: 1.0,
				y: 2.0,
				radius: 0.5,
				color: Color::rgb(1, 2, 3),
			}]
		);
		assert!(surface.lines().is_empty());
	}

	#[test]
	fn line_helper_sets_width_and_color() {
		let mut surface = RecordingSurface::new(10, 10);
		surface.stroke_line((0.0, 0.0), (3.0, 4.0), 0.5, Color::rgba(1, 2, 3, 0.1));

		assert_eq!(
			surface.lines(),
			vec![Line {
				from: (0.0, 0.0),
				to: (3.0, 4.0),
				width: 0.5,
				color: Color::rgba(1, 2, 3, 0.1),
			}]
		);
	}
}
