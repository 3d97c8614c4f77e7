//! Delegated training backends.

pub mod ultralytics;

pub use ultralytics::{training_args, UltralyticsLoader, UltralyticsModel};
