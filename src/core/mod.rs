//! Core business logic module
//!
//! This module contains the concurrent consolidation components:
//! - `traits` - Seams for account sources, consolidation, views and reporters
//! - `engine` - Fan-out/fan-in batch consolidation engine
//! - `owner` - Owner execution context that alone touches the view
//! - `notifier` - Marshals run outcomes onto the owner context
//! - `controller` - Owner-side trigger/present flow
//! - `consolidator` - Default movement consolidation function
//! - `reporter` - Progress reporting through tracing

pub mod consolidator;
pub mod controller;
pub mod engine;
pub mod notifier;
pub mod owner;
pub mod reporter;
pub mod traits;

pub use consolidator::MovementConsolidator;
pub use controller::ConsolidationController;
pub use engine::{ConsolidationEngine, RunHandle, RunOptions};
pub use notifier::notify_on_owner;
pub use owner::{OwnerContext, OwnerHandle};
pub use reporter::TracingReporter;
pub use traits::{AccountSource, Consolidate, ConsolidationView, ProgressReporter};
