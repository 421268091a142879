//! Collaborator traits and the raw platform snapshot payloads.
//!
//! The translation core never talks to the OS directly.  Everything it
//! needs from the outside world arrives through the traits below, which
//! the surrounding application implements in its infrastructure layer:
//!
//! - [`PlatformKeyboard`] wraps the platform keyboard-mapping, keyboard-
//!   control, and pointer queries.
//! - [`KeyState`] is the authoritative owner of "which keys are down and
//!   which modifiers are active".  The core only reads it and asks it to
//!   produce modifier toggles; it never mutates modifier state directly.
//! - [`ComposeKeySource`] and [`UnicodeKeysymSource`] are lookup-only
//!   helpers for dead-key composition and Unicode-to-symbol mapping.

use crate::domain::{KeyButton, KeySym, Keystroke, ModifierMask, ModifierRole};

/// Length in bytes of the pressed-key and auto-repeat bitmaps (one bit
/// per possible physical keycode).
pub const KEY_BITMAP_LEN: usize = 32;

// ── Raw platform payloads ─────────────────────────────────────────────────────

/// The platform's raw per-physical-key symbol table.
///
/// `symbols` is a flat row-major table: `symbols_per_key` consecutive
/// entries per keycode, starting at `min_keycode`.  Platforms may report
/// more than four symbols per key; the topology rebuild only consumes the
/// first four (levels beyond that are out of scope by design).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawKeymap {
    /// Lowest keycode described by `symbols`.
    pub min_keycode: u16,
    /// Table stride: symbols reported per keycode.
    pub symbols_per_key: usize,
    /// Flat symbol table, `key_count() * symbols_per_key` entries.
    pub symbols: Vec<KeySym>,
}

impl RawKeymap {
    /// Number of keycodes described by the table.
    pub fn key_count(&self) -> usize {
        if self.symbols_per_key == 0 {
            0
        } else {
            self.symbols.len() / self.symbols_per_key
        }
    }

    /// The symbol bound to the `index`-th keycode at `level`, or
    /// [`KeySym::NONE`] when the level is beyond the table stride.
    pub fn symbol(&self, index: usize, level: usize) -> KeySym {
        if level >= self.symbols_per_key {
            return KeySym::NONE;
        }
        self.symbols
            .get(index * self.symbols_per_key + level)
            .copied()
            .unwrap_or(KeySym::NONE)
    }

    /// The keycode of the `index`-th table row.
    pub fn button(&self, index: usize) -> KeyButton {
        KeyButton(self.min_keycode + index as u16)
    }
}

/// The platform's raw modifier grouping: eight slots, each listing the
/// physical keys that set that raw modifier bit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawModifierSlots {
    /// Member keycodes per slot; unassigned positions are omitted.
    pub slots: [Vec<KeyButton>; 8],
}

// ── Platform query collaborator ───────────────────────────────────────────────

/// Synchronous read-only access to the platform keyboard state, consumed
/// by the runtime snapshot.
pub trait PlatformKeyboard {
    /// The raw per-physical-key multi-level symbol table.
    fn keymap(&self) -> RawKeymap;

    /// The raw modifier-slot-to-physical-key grouping.
    fn modifier_slots(&self) -> RawModifierSlots;

    /// Bitmap of currently pressed physical keys, one bit per keycode.
    fn pressed_keys(&self) -> [u8; KEY_BITMAP_LEN];

    /// Bitmap of hardware auto-repeat capability, one bit per keycode.
    fn auto_repeat_mask(&self) -> [u8; KEY_BITMAP_LEN];

    /// The raw modifier state word reported by the pointer query.  Decoded
    /// with the learned slot masks after each rebuild.
    fn pointer_modifier_state(&self) -> u16;
}

// ── Modifier-state collaborator ───────────────────────────────────────────────

/// The authoritative "currently active modifiers" component.
///
/// The snapshot pushes observed state into it (`set_key_down`,
/// `set_toggled`, `add_modifier`); synthesis reads `active_modifiers` and
/// requests toggles via `map_modifier`.
pub trait KeyState {
    /// Records that `button` was observed down in the startup snapshot.
    fn set_key_down(&mut self, button: KeyButton);

    /// Records that the lock modifier for `role` was observed toggled on.
    fn set_toggled(&mut self, role: ModifierRole);

    /// Registers the physical keys that actuate the modifier `mask`.
    fn add_modifier(&mut self, mask: ModifierMask, buttons: Vec<KeyButton>);

    /// The currently active abstract modifier mask.
    fn active_modifiers(&self) -> ModifierMask;

    /// Appends the keystrokes that bring the modifier `role` to `active`
    /// onto `forward`, and the exact inverse keystrokes onto `undo`.
    ///
    /// Returns `false` when no physical key is available to actuate the
    /// modifier, in which case neither list may be modified.
    fn map_modifier(
        &self,
        role: ModifierRole,
        active: bool,
        forward: &mut Vec<Keystroke>,
        undo: &mut Vec<Keystroke>,
    ) -> bool;
}

// ── Lookup collaborators ──────────────────────────────────────────────────────

/// Dead-key decomposition: expresses one symbol as an ordered sequence of
/// simpler symbols (e.g. dead-acute + `e` for `é`).
#[cfg_attr(test, mockall::automock)]
pub trait ComposeKeySource {
    /// The ordered constituent symbols that compose `sym`, or `None` if
    /// the symbol has no known decomposition.
    fn decompose(&self, sym: KeySym) -> Option<Vec<KeySym>>;
}

/// Unicode code point to platform symbol mapping for identifiers outside
/// the directly-mapped Latin ranges.
#[cfg_attr(test, mockall::automock)]
pub trait UnicodeKeysymSource {
    /// The symbol for `code_point`, or `None` if the platform defines none.
    fn keysym_for_code_point(&self, code_point: u32) -> Option<KeySym>;
}

// ── Tests ─────────────────────────────────────────────────────────────────────
