//! Ambient particles and the field that owns them.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::surface::DrawingSurface;
use super::theme::{Color, ParticleStyle};

/// Field shared between the render loop and the viewport binding.
pub type SharedField<R = SmallRng> = Rc<RefCell<ParticleField<R>>>;

/// Surface extent used for population sizing and wraparound.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
	/// Horizontal extent, never negative
	pub width: f64,
	/// Vertical extent, never negative
	pub height: f64,
}

impl Bounds {
	/// Negative and NaN extents collapse to zero.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width: width.max(0.0),
			height: height.max(0.0),
		}
	}

	/// Surface area in square pixels.
	pub fn area(&self) -> f64 {
		self.width * self.height
	}
}

/// Number of particles for a surface: one per `density` square pixels.
pub fn population_for(bounds: Bounds, density: f64) -> usize {
	let area = bounds.area();
	if !(density > 0.0) || !area.is_finite() || area <= 0.0 {
		return 0;
	}
	(area / density).floor() as usize
}

/// Uniform sample from `[low, high)`; an empty or unbounded range yields `low`.
fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
	if high > low && (high - low).is_finite() {
		rng.gen_range(low..high)
	} else {
		low
	}
}

/// Sends a coordinate that left `[0, extent)` to the opposite edge. The
/// overflow is dropped, not carried over.
fn wrap(value: f64, extent: f64) -> f64 {
	if value >= extent {
		0.0
	} else if value < 0.0 {
		// closest value below the extent
		extent * (1.0 - f64::EPSILON)
	} else {
		value
	}
}

/// A single drifting dot.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Horizontal position
	pub x: f64,
	/// Vertical position
	pub y: f64,
	/// Horizontal velocity per frame
	pub vx: f64,
	/// Vertical velocity per frame
	pub vy: f64,
	/// Radius
	pub size: f64,
	/// Opacity in `[0, 1]`
	pub alpha: f64,
	/// Base color with `alpha` baked in.
	pub color: Color,
}

impl Particle {
	/// Spawns a particle with every attribute drawn uniformly from `style`.
	pub fn initialize<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds, style: &ParticleStyle) -> Self {
		let x = uniform(rng, 0.0, bounds.width);
		let y = uniform(rng, 0.0, bounds.height);
		let size = uniform(rng, style.size_min, style.size_max);
		let vx = uniform(rng, -style.speed, style.speed);
		let vy = uniform(rng, -style.speed, style.speed);
		let alpha = uniform(rng, style.opacity_min, style.opacity_max);

		Self {
			x,
			y,
			vx,
			vy,
			size,
			alpha,
			color: style.color.with_alpha(alpha),
		}
	}

	/// Moves one tick along the velocity, wrapping at the surface edges.
	pub fn advance(&mut self, bounds: Bounds) {
		self.x = wrap(self.x + self.vx, bounds.width);
		self.y = wrap(self.y + self.vy, bounds.height);
	}

	/// Draws the particle as a filled circle.
	pub fn paint<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
		surface.fill_circle(self.x, self.y, self.size, self.color);
	}
}

/// The live particle population, regenerated from scratch on every resize.
pub struct ParticleField<R = SmallRng> {
	particles: Vec<Particle>,
	bounds: Bounds,
	style: ParticleStyle,
	rng: R,
}

impl ParticleField<SmallRng> {
	/// Field with a reproducible random source.
	pub fn seeded(style: ParticleStyle, seed: u64) -> Self {
		Self::new(style, SmallRng::seed_from_u64(seed))
	}
}

impl<R: Rng> ParticleField<R> {
	/// Empty field with zero bounds. Call [`resize`](Self::resize) to populate.
	pub fn new(style: ParticleStyle, rng: R) -> Self {
		Self {
			particles: Vec::new(),
			bounds: Bounds::default(),
			style,
			rng,
		}
	}

	/// Discards the current population and spawns a fresh one sized for the
	/// new bounds.
	pub fn resize(&mut self, width: f64, height: f64) {
		let bounds = Bounds::new(width, height);
		let count = population_for(bounds, self.style.density);
		let (rng, style) = (&mut self.rng, &self.style);
		let fresh: Vec<Particle> = (0..count)
			.map(|_| Particle::initialize(rng, bounds, style))
			.collect();

		self.bounds = bounds;
		self.particles = fresh;
		debug!(
			"ambient-particles: field resized to {}x{}, {} particles",
			bounds.width, bounds.height, count
		);
	}

	/// Wraps the field for sharing between the loop and the resize binding.
	pub fn into_shared(self) -> SharedField<R> {
		Rc::new(RefCell::new(self))
	}
}

impl<R> ParticleField<R> {
	/// Current population.
	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Current population, for in-place updates.
	pub fn particles_mut(&mut self) -> &mut [Particle] {
		&mut self.particles
	}

	/// Bounds of the last resize.
	pub fn bounds(&self) -> Bounds {
		self.bounds
	}

	/// Number of particles.
	pub fn len(&self) -> usize {
		self.particles.len()
	}

	/// True when the field holds no particles.
	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	#[cfg(test)]
	pub(crate) fn replace(&mut self, particles: Vec<Particle>) {
		self.particles = particles;
	}
}
