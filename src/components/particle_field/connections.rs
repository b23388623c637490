//! Faint lines between nearby particles.
//!
//! A pair is linked when the particles are closer than [`LinkStyle::distance`].
//! Link opacity falls off linearly from [`LinkStyle::opacity`] at distance zero
//! to nothing at the threshold. Two strategies find the pairs:
//!
//! - [`LinkStrategy::Pairwise`] compares every unordered pair.
//! - [`LinkStrategy::Grid`] buckets particles into cells one threshold wide,
//!   so only particles in the same or adjacent cells are compared.
//!
//! Both report the same pairs with the same opacities; only the order differs.

use std::collections::HashMap;

use super::particles::Particle;
use super::surface::DrawingSurface;
use super::theme::{LinkStrategy, LinkStyle};

/// Cell coordinates are clamped to this magnitude so neighbour offsets
/// cannot overflow.
const MAX_CELL: f64 = (1u64 << 40) as f64;

/// A visible connection between two particles, `from < to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
	/// Index of the lower particle
	pub from: usize,
	/// Index of the higher particle
	pub to: usize,
	/// Stroke opacity for this pair
	pub opacity: f64,
}

/// Opacity of a link at `distance`, or `None` when the pair is too far apart.
pub fn link_opacity(distance: f64, style: &LinkStyle) -> Option<f64> {
	(distance < style.distance).then(|| (1.0 - distance / style.distance) * style.opacity)
}

fn link_between(particles: &[Particle], from: usize, to: usize, style: &LinkStyle) -> Option<Link> {
	let (a, b) = (&particles[from], &particles[to]);
	let (dx, dy) = (a.x - b.x, a.y - b.y);
	let distance = (dx * dx + dy * dy).sqrt();
	link_opacity(distance, style).map(|opacity| Link { from, to, opacity })
}

/// Calls `emit` once for every linked pair.
pub fn for_each_link(particles: &[Particle], style: &LinkStyle, mut emit: impl FnMut(Link)) {
	if particles.len() < 2 {
		return;
	}
	match style.strategy {
		LinkStrategy::Grid if style.distance > 0.0 && style.distance.is_finite() => {
			SpatialGrid::build(particles, style.distance).visit_pairs(|i, j| {
				if let Some(link) = link_between(particles, i, j, style) {
					emit(link);
				}
			});
		}
		_ => {
			for from in 0..particles.len() {
				for to in from + 1..particles.len() {
					if let Some(link) = link_between(particles, from, to, style) {
						emit(link);
					}
				}
			}
		}
	}
}

/// Collects every linked pair.
pub fn links(particles: &[Particle], style: &LinkStyle) -> Vec<Link> {
	let mut out = Vec::new();
	for_each_link(particles, style, |link| out.push(link));
	out
}

/// Strokes a line for every linked pair.
pub fn draw_connections<S: DrawingSurface + ?Sized>(
	particles: &[Particle],
	surface: &mut S,
	style: &LinkStyle,
) {
	for_each_link(particles, style, |link| {
		let (a, b) = (&particles[link.from], &particles[link.to]);
		surface.stroke_line(
			(a.x, a.y),
			(b.x, b.y),
			style.line_width,
			style.color.with_alpha(link.opacity),
		);
	});
}

/// Sparse bucket grid over particle indices. Only occupied cells are
/// stored, so the cost follows the population, not the cell size.
struct SpatialGrid {
	buckets: HashMap<(i64, i64), Vec<usize>>,
}

impl SpatialGrid {
	fn cell_of(value: f64, cell_size: f64) -> i64 {
		// NaN lands in cell 0, huge values saturate
		let cell = (value / cell_size).floor();
		if cell.is_nan() {
			0
		} else {
			cell.clamp(-MAX_CELL, MAX_CELL) as i64
		}
	}

	fn build(particles: &[Particle], cell_size: f64) -> Self {
		let mut buckets: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
		for (idx, p) in particles.iter().enumerate() {
			let cell = (Self::cell_of(p.x, cell_size), Self::cell_of(p.y, cell_size));
			buckets.entry(cell).or_default().push(idx);
		}
		Self { buckets }
	}

	/// Visits each unordered pair of particles in the same or adjacent cells
	/// exactly once, as `(lower, higher)` indices.
	fn visit_pairs(&self, mut visit: impl FnMut(usize, usize)) {
		// same cell is handled separately; these cover the other half of the
		// 3x3 neighbourhood so each cell pair is seen once
		const FORWARD: [(i64, i64); 4] = [(1, 0), (-1, 1), (0, 1), (1, 1)];

		for (&(cx, cy), here) in &self.buckets {
			for (n, &i) in here.iter().enumerate() {
				for &j in &here[n + 1..] {
					visit(i, j);
				}
			}

			for (ox, oy) in FORWARD {
				let Some(there) = self.buckets.get(&(cx + ox, cy + oy)) else {
					continue;
				};
				for &i in here {
					for &j in there {
						visit(i.min(j), i.max(j));
					}
				}
			}
		}
	}
}
