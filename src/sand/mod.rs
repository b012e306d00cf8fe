//! Falling-sand animation shown in the idle view.
//!
//! Every timer owns a [`animator::SandAnimator`]: a small grid that fills
//! with sand at a pace derived from the timer's duration.

pub mod animator;
pub mod grid;
pub mod manager;

pub use manager::AnimationManager;
