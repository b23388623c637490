//! Ambient particle field drawn behind page content.
//!
//! Small translucent dots drift across a canvas and wrap at its edges, and
//! pairs closer than a threshold are joined by faint lines:
//! - Population sized from the viewport area and regenerated on resize
//! - Per-frame drift with toroidal wraparound
//! - Proximity links with linear opacity falloff
//!
//! The simulation and drawing code only sees the [`DrawingSurface`],
//! [`Viewport`] and [`FrameScheduler`] traits, so it runs anywhere; the
//! browser side lives in [`Background`] and [`ParticleFieldCanvas`].
//!
//! # Example
//!
//! ```ignore
//! use ambient_particles::{FieldStyle, ParticleFieldCanvas};
//!
//! view! { <ParticleFieldCanvas style=FieldStyle::default() /> }
//! ```

mod component;
pub mod connections;
mod error;
pub mod particles;
pub mod render;
pub mod surface;
pub mod theme;
pub mod viewport;

pub use component::{AnimationFrames, Background, DEFAULT_CANVAS_ID, ParticleFieldCanvas};
pub use error::SetupError;
pub use particles::{Particle, ParticleField, SharedField};
pub use render::{FrameScheduler, LoopHandle, RenderLoop};
pub use surface::{DrawingSurface, Viewport};
pub use theme::{Color, FieldStyle, LinkStrategy, LinkStyle, ParticleStyle};
pub use viewport::ViewportBinding;
