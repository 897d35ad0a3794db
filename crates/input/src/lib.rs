//! Scene-view input: raw editor events, the shortcuts the tools bind, and the
//! cursor conversion from GUI points to camera pixels.
//!
//! # Invariants
//! - A consumed event is never acted on again by a later handler.
//! - Tools consume actions and events, never window-system input.

pub mod action;
pub mod event;

pub use action::Action;
pub use event::{EventKind, InputEvent, Key, MouseButton, cursor_to_pixel, pixel_to_viewport};
