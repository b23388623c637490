//! Visual style for the particle field.
//!
//! Every struct deserializes with `#[serde(default)]`, so a page only needs to
//! list the values it wants to override.

use serde::Deserialize;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Color {
	/// Red channel
	pub r: u8,
	/// Green channel
	pub g: u8,
	/// Blue channel
	pub b: u8,
	/// Alpha in `[0, 1]`; opaque when omitted from config
	#[serde(default = "opaque")]
	pub a: f64,
}

fn opaque() -> f64 {
	1.0
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same channels, new alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS color string: hex when opaque, `rgba(..)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Soft violet used for both dots and links.
pub const VIOLET: Color = Color::rgb(139, 92, 246);

/// How particles are spawned.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleStyle {
	/// Surface area (in square pixels) per particle
	pub density: f64,
	/// Minimum particle radius
	pub size_min: f64,
	/// Maximum particle radius
	pub size_max: f64,
	/// Per-frame velocity bound on each axis
	pub speed: f64,
	/// Minimum particle opacity
	pub opacity_min: f64,
	/// Maximum particle opacity
	pub opacity_max: f64,
	/// Base color; the per-particle opacity replaces its alpha
	pub color: Color,
}

impl Default for ParticleStyle {
	fn default() -> Self {
		Self {
			density: 30_000.0,
			size_min: 0.3,
			size_max: 1.8,
			speed: 0.1,
			opacity_min: 0.1,
			opacity_max: 0.4,
			color: VIOLET,
		}
	}
}

/// How neighbouring pairs are found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStrategy {
	/// Check every unordered pair.
	#[default]
	Pairwise,
	/// Bucket particles into cells one threshold wide and only compare
	/// neighbouring cells.
	Grid,
}

/// Connective line configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LinkStyle {
	/// Pairs closer than this are linked
	pub distance: f64,
	/// Opacity of a link between coincident particles
	pub opacity: f64,
	/// Stroke width
	pub line_width: f64,
	/// Stroke color (alpha is replaced per link)
	pub color: Color,
	/// Pair search used each frame
	pub strategy: LinkStrategy,
}

impl Default for LinkStyle {
	fn default() -> Self {
		Self {
			distance: 150.0,
			opacity: 0.15,
			line_width: 0.5,
			color: VIOLET,
			strategy: LinkStrategy::Pairwise,
		}
	}
}

/// Complete visual configuration of the background.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldStyle {
	/// Spawning and appearance of the dots
	pub particles: ParticleStyle,
	/// Lines between nearby dots
	pub links: LinkStyle,
}
