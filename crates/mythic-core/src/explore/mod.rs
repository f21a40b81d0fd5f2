//! Theme exploration: the flow that produces insights.
//!
//! A user picks a theme, types a key element and asks a [`Generator`] for a
//! passage. Each passage advances the theme's stage and can be captured as
//! an unassigned [`Insight`](crate::model::Insight) ready to be dragged into
//! a collection.

mod generator;
mod session;
mod theme;

pub use generator::{DEFAULT_GENERATION_DELAY, Generator, MockGenerator};
pub use session::{ExplorationSession, GenerationRequest};
pub use theme::{Theme, ThemeCatalog};

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Generation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("No theme selected")]
    NoThemeSelected,
    #[error("Input is empty")]
    EmptyInput,
    #[error("A generation is already in progress")]
    Busy,
    #[error("Generation failed: {0}")]
    Failed(String),
}

/// Result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Boxed future for generator calls. No runtime is assumed.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
