//! # keybridge-keymap
//!
//! The keyboard-translation core of KeyBridge, a cross-host input-sharing
//! utility.  Given an abstract, platform-independent key identifier and a
//! desired modifier state, this crate produces the concrete sequence of
//! native press/release events the local input subsystem must receive to
//! reproduce that key — including any temporary modifier adjustments and
//! their restoration afterward.
//!
//! This crate has zero dependencies on OS APIs, network sockets, or UI
//! frameworks.  The network transport that delivers identifiers, the raw
//! platform queries, and the component that owns live modifier state are
//! all external collaborators reached through the traits in [`ports`].
//!
//! # Architecture overview
//!
//! - **`domain`** – The pure key vocabulary: abstract identifiers,
//!   symbolic keys, physical keycodes, modifier masks, keystrokes.
//!
//! - **`topology`** – The per-layout table of which physical keys produce
//!   which symbols at which shift/mode-switch levels, plus the learned
//!   assignment of abstract modifier roles to raw platform modifier
//!   slots.  Rebuilt wholesale from the raw platform tables on every
//!   runtime snapshot.
//!
//! - **`resolve`** – Maps an abstract identifier to a symbolic key:
//!   reserved media and function bands, direct printable Latin ranges,
//!   Unicode fallback, and the keypad/left-tab backup substitutions.
//!
//! - **`translator`** – The stateful engine: [`KeyTranslator::refresh`]
//!   snapshots the platform and rebuilds the topology;
//!   [`KeyTranslator::translate`] runs the synthesis state machine and
//!   returns a bracketed keystroke sequence.
//!
//! Execution is single-threaded and synchronous throughout; callers
//! serialize all access to one [`KeyTranslator`] instance.

pub mod domain;
pub mod ports;
pub mod resolve;
pub mod topology;
pub mod translator;

// Re-export the most-used types at the crate root so callers can write
// `keybridge_keymap::KeyTranslator` instead of the full module path.
pub use domain::{KeyButton, KeyId, KeySym, Keystroke, ModifierMask, ModifierRole};
pub use ports::{
    ComposeKeySource, KeyState, PlatformKeyboard, RawKeymap, RawModifierSlots,
    UnicodeKeysymSource, KEY_BITMAP_LEN,
};
pub use topology::{LayoutTopology, SymbolEntry};
pub use translator::{KeyTranslator, TranslateError, TranslatedKey};
