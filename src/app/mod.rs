// Application layer - Use case interactors

pub mod container;
pub mod trim_interactor;

// Re-export interactors
pub use container::AppContainer;
pub use trim_interactor::{KeyframeReport, TrimInteractor};
