//! Core business logic abstractions

pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod kv;
pub mod log;
pub mod rates;
pub mod session;
pub mod theme;
pub mod tracked;

// Re-export main types for cleaner imports
pub use coordinator::{CoordinatorHandle, RefreshCoordinator};
pub use rates::{RateFetchError, RateSnapshot, RateSource};
pub use session::{Session, SessionView};
