//! Errors raised while attaching the field to a browser canvas.
//!
//! Nothing past attachment can fail: the per-frame path has no error cases.

use std::fmt;

use wasm_bindgen::JsValue;

/// Reasons the background could not be attached to the page.
#[derive(Debug, PartialEq)]
pub enum SetupError {
	/// No global `window` (not running in a browser).
	NoWindow,
	/// The window has no document.
	NoDocument,
	/// No element with the given id.
	CanvasNotFound(String),
	/// The element with the given id is not a `<canvas>`.
	NotACanvas(String),
	/// The canvas refused a 2D context.
	NoContext,
	/// A DOM call threw.
	Js(String),
}

impl fmt::Display for SetupError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SetupError::NoWindow => write!(f, "no window available"),
			SetupError::NoDocument => write!(f, "window has no document"),
			SetupError::CanvasNotFound(id) => write!(f, "no element with id \"{}\"", id),
			SetupError::NotACanvas(id) => write!(f, "element \"{}\" is not a canvas", id),
			SetupError::NoContext => write!(f, "canvas has no 2d context"),
			SetupError::Js(msg) => write!(f, "DOM call failed: {}", msg),
		}
	}
}

impl std::error::Error for SetupError {}

impl From<JsValue> for SetupError {
	fn from(e: JsValue) -> Self {
		SetupError::Js(format!("{:?}", e))
	}
}
