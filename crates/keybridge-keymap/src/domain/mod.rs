//! Domain entities for the KeyBridge keyboard-translation core.
//!
//! This module contains the pure key vocabulary with no infrastructure
//! dependencies: it can be compiled and tested on any platform without an
//! X server, a display connection, or any other external setup.  Everything
//! that touches a real OS lives behind the traits in [`crate::ports`].

pub mod keys;
pub mod keystroke;
pub mod modifiers;

pub use keys::{KeyButton, KeyId, KeySym};
pub use keystroke::Keystroke;
pub use modifiers::{ModifierMask, ModifierRole};
