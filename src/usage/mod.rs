/// Breadth-first usage-level expansion from entry points.
pub mod expander;

/// Re-admission of inheritance links for the hybrid view.
pub mod hybrid;

/// Prefix slicing of an expansion down to one usage level.
pub mod projector;

pub use expander::{expand, Expansion, LevelCount, UsageDirection};
pub use hybrid::HybridAugmenter;
pub use projector::{clamp_level, project, UsageView};
