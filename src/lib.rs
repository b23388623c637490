//! ambient-particles: drifting particle background for web pages.
//!
//! This crate renders a field of slowly drifting, softly linked dots on an
//! HTML canvas behind the page content. It can be mounted as a Leptos
//! component or started on an existing `<canvas>` from JavaScript.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::particle_field::{
	Background, DEFAULT_CANVAS_ID, FieldStyle, LinkStyle, ParticleFieldCanvas, ParticleStyle,
};

/// Id of the optional `<script type="application/json">` holding style overrides.
pub const CONFIG_SCRIPT_ID: &str = "particle-config";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("ambient-particles: logging initialized");
}

/// Parses a style override document. Missing keys keep their defaults.
pub fn parse_field_style(json: &str) -> Result<FieldStyle, serde_json::Error> {
	serde_json::from_str(json)
}

/// Load style overrides from a script element with id="particle-config".
/// Falls back to the default style when absent or malformed.
pub fn load_field_style() -> FieldStyle {
	let Some(json_text) = read_config_script() else {
		return FieldStyle::default();
	};

	match parse_field_style(&json_text) {
		Ok(style) => {
			info!("ambient-particles: loaded style overrides");
			style
		}
		Err(e) => {
			warn!("ambient-particles: failed to parse style overrides: {}", e);
			FieldStyle::default()
		}
	}
}

fn read_config_script() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(CONFIG_SCRIPT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Starts the background on an existing canvas and keeps it running for the
/// lifetime of the page. Returns false, doing nothing, when the canvas is
/// missing.
#[wasm_bindgen(js_name = startParticles)]
pub fn start_particles(canvas_id: Option<String>) -> bool {
	let id = canvas_id.as_deref().unwrap_or(DEFAULT_CANVAS_ID);
	match Background::attach_by_id(id, load_field_style()) {
		Some(background) => {
			background.keep_for_page_lifetime();
			true
		}
		None => false,
	}
}

/// Main application component.
/// Loads style overrides from the DOM and renders the particle background.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let style = load_field_style();

	view! {
		<Title text="Ambient Particles" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<ParticleFieldCanvas style=style />
	}
}
