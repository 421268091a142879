//! The keystroke synthesizer and the runtime snapshot.
//!
//! [`KeyTranslator`] is the stateful engine the surrounding application
//! drives: [`refresh`](KeyTranslator::refresh) snapshots the platform and
//! rebuilds the topology; [`translate`](KeyTranslator::translate) turns an
//! abstract identifier plus a desired modifier mask into the primitive
//! keystroke sequence the platform dispatcher must inject.
//!
//! Synthesis brackets every transient modifier change: keystrokes that
//! adjust Shift or Mode-Switch are emitted before the primary event and
//! their exact inverses after it, so the receiving application observes
//! no modifier change beyond the intended key.  The whole call is
//! all-or-nothing — on any failure the caller receives an error and no
//! keystrokes.
//!
//! Single-threaded by design: the topology is rebuilt destructively in
//! place by `refresh`, so callers must serialize all access to one
//! instance (typically the application's event-dispatch thread).

use thiserror::Error;
use tracing::debug;

use crate::domain::{KeyButton, KeyId, KeySym, Keystroke, ModifierMask, ModifierRole};
use crate::ports::{
    ComposeKeySource, KeyState, PlatformKeyboard, UnicodeKeysymSource, KEY_BITMAP_LEN,
};
use crate::resolve::resolve_key_id;
use crate::topology::{LayoutTopology, SymbolEntry};

// ── Errors ────────────────────────────────────────────────────────────────────

/// Why a `translate` call produced no keystrokes.
///
/// All variants are local and non-fatal; the surrounding application is
/// expected to drop or log the unsupported key request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranslateError {
    /// The identifier does not map to any symbol on this platform.
    #[error("identifier {0:?} does not map to any symbol")]
    UnknownKey(KeyId),

    /// The symbol has no key binding and no viable decomposition.
    #[error("symbol {0:?} is not bound to any key")]
    UnmappedSymbol(KeySym),

    /// A decomposition constituent is missing from the layout.
    #[error("decomposition constituent {0:?} is not bound to any key")]
    IncompleteDecomposition(KeySym),

    /// Auto-repeat was requested for a key whose hardware auto-repeat is
    /// disabled.  A deliberate no-op, not a fault.
    #[error("key {0:?} does not auto-repeat")]
    AutoRepeatDisabled(KeyButton),

    /// The modifier-state collaborator cannot produce the required toggle.
    #[error("no key available to toggle {0:?}")]
    ModifierAdjustment(ModifierRole),
}

/// A successful synthesis: the physical key carrying the primary event
/// and the full ordered keystroke sequence (modifier adjustments, primary
/// event, reverse-order restoration).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedKey {
    pub button: KeyButton,
    pub keystrokes: Vec<Keystroke>,
}

// ── The translator ────────────────────────────────────────────────────────────

/// The keyboard-translation engine.
///
/// Owns the rebuildable layout topology and the captured auto-repeat
/// capability bitmap; reads live modifier state from the [`KeyState`]
/// collaborator passed into each call and never mutates it directly.
pub struct KeyTranslator {
    topology: LayoutTopology,
    auto_repeat: [u8; KEY_BITMAP_LEN],
    unicode: Box<dyn UnicodeKeysymSource>,
    compose: Box<dyn ComposeKeySource>,
}

impl KeyTranslator {
    /// Creates an engine with empty topology.  [`refresh`](Self::refresh)
    /// must run before the first [`translate`](Self::translate).
    pub fn new(unicode: Box<dyn UnicodeKeysymSource>, compose: Box<dyn ComposeKeySource>) -> Self {
        KeyTranslator {
            topology: LayoutTopology::new(),
            auto_repeat: [0; KEY_BITMAP_LEN],
            unicode,
            compose,
        }
    }

    /// The current layout topology (read-only between refreshes).
    pub fn topology(&self) -> &LayoutTopology {
        &self.topology
    }

    /// Runtime snapshot: queries the platform, rebuilds the topology and
    /// modifier slot map, and pushes the observed pressed keys and lock
    /// toggles into `key_state`.
    ///
    /// Run once at startup and again on every platform keymap-change
    /// notification.
    pub fn refresh(&mut self, platform: &dyn PlatformKeyboard, key_state: &mut dyn KeyState) {
        let pressed = platform.pressed_keys();
        self.auto_repeat = platform.auto_repeat_mask();
        let raw_state = platform.pointer_modifier_state();

        self.topology
            .rebuild(&platform.keymap(), &platform.modifier_slots(), key_state);

        for (byte, &bits) in pressed.iter().enumerate() {
            for bit in 0..8 {
                if bits & (1 << bit) != 0 {
                    key_state.set_key_down(KeyButton((byte * 8 + bit) as u16));
                }
            }
        }

        // Lock toggles are decoded with the masks just learned, so a
        // layout may bind NumLock or ScrollLock to any slot.
        let locks = self.topology.slot_map().decode(raw_state);
        if locks.caps_lock() {
            key_state.set_toggled(ModifierRole::CapsLock);
        }
        if locks.num_lock() {
            key_state.set_toggled(ModifierRole::NumLock);
        }
        if locks.scroll_lock() {
            key_state.set_toggled(ModifierRole::ScrollLock);
        }
    }

    /// Converts a raw platform modifier state word into the abstract mask,
    /// using the slot roles learned by the last refresh.
    pub fn decode_live_modifiers(&self, raw_state: u16) -> ModifierMask {
        self.topology.slot_map().decode(raw_state)
    }

    /// The main synthesis entry point.
    ///
    /// Resolves `id` against the current layout, selects a physical key
    /// and level, reconciles live modifier state with what the key needs
    /// (bracketed with undo keystrokes), and returns the ordered sequence.
    ///
    /// # Errors
    ///
    /// Returns a [`TranslateError`]; in every error case the caller
    /// receives no keystrokes, including when a modifier toggle fails
    /// after an earlier one was already queued.
    pub fn translate(
        &self,
        id: KeyId,
        desired: ModifierMask,
        auto_repeat: bool,
        key_state: &dyn KeyState,
    ) -> Result<TranslatedKey, TranslateError> {
        let sym = resolve_key_id(id, desired, &self.topology, self.unicode.as_ref())
            .ok_or(TranslateError::UnknownKey(id))?;

        let mut keystrokes = Vec::new();

        // Direct lookup, with opposite-case fallback for layouts that only
        // bind one case of a letter.
        if let Some((sym, entry)) = self.lookup_with_case_fallback(sym) {
            let button = self.synthesize(sym, entry, auto_repeat, key_state, &mut keystrokes)?;
            return Ok(TranslatedKey { button, keystrokes });
        }

        // No binding at all: try composing the symbol from constituents
        // (e.g. dead accent + base letter).  Every constituent must
        // resolve or the whole call fails with nothing emitted.
        let constituents = self
            .compose
            .decompose(sym)
            .ok_or(TranslateError::UnmappedSymbol(sym))?;
        debug!(symbol = sym.0, count = constituents.len(), "decomposed symbol");

        let mut button = KeyButton::NONE;
        for part in constituents {
            let entry = self
                .topology
                .entry(part)
                .ok_or(TranslateError::IncompleteDecomposition(part))?;
            button = self.synthesize(part, entry, auto_repeat, key_state, &mut keystrokes)?;
        }
        if button.is_none() {
            // Empty decomposition composes nothing
            return Err(TranslateError::UnmappedSymbol(sym));
        }
        Ok(TranslatedKey { button, keystrokes })
    }

    // ── Synthesis steps ───────────────────────────────────────────────────────

    fn lookup_with_case_fallback(&self, sym: KeySym) -> Option<(KeySym, &SymbolEntry)> {
        if let Some(entry) = self.topology.entry(sym) {
            return Some((sym, entry));
        }
        let other = sym.opposite_case()?;
        self.topology.entry(other).map(|entry| (other, entry))
    }

    /// Runs the pick-level / invert / gate / reconcile / emit pipeline for
    /// one symbol, appending to `keystrokes`.  Returns the physical key of
    /// the primary event.
    fn synthesize(
        &self,
        sym: KeySym,
        entry: &SymbolEntry,
        auto_repeat: bool,
        key_state: &dyn KeyState,
        keystrokes: &mut Vec<Keystroke>,
    ) -> Result<KeyButton, TranslateError> {
        let live = key_state.active_modifiers();

        // Deterministic level choice: the lowest-numbered bound level.
        // Level bit 0 means Shift engaged, bit 1 means Mode-Switch engaged.
        let mut level = entry
            .first_bound_level()
            .ok_or(TranslateError::UnmappedSymbol(sym))?;
        let mut button = entry.buttons[level];

        // An active NumLock inverts the shift sense of keypad symbols;
        // an active CapsLock does the same for cased letters.  A symbol is
        // never sensitive to both.  If the flipped level has no keycode
        // (some keymaps bind only the upper-case symbols) keep the
        // original keycode but compute the mask against the flipped level.
        let inverted = if entry.num_lock_sensitive {
            live.num_lock()
        } else {
            entry.caps_lock_sensitive && live.caps_lock()
        };
        if inverted {
            debug!(symbol = sym.0, "shift sense inverted by lock state");
            level ^= 1;
            if !entry.buttons[level].is_none() {
                button = entry.buttons[level];
            }
        }

        // Auto-repeat requests are suppressed for keys whose hardware
        // auto-repeat capability is disabled.
        if auto_repeat && !self.can_auto_repeat(button) {
            return Err(TranslateError::AutoRepeatDisabled(button));
        }

        // Desired mask: force Shift/Mode-Switch to match the chosen level,
        // but never when the key being synthesized is that modifier itself
        // and never when the level is insensitive to the modifier
        // (otherwise shift+Home would collapse to plain Home).
        let mut target = live;
        if entry.modifier_mask != ModifierRole::Shift.mask() && entry.shift_sensitive[level] {
            target = target.set(ModifierMask::SHIFT, level & 1 != 0);
        }
        if entry.modifier_mask != ModifierRole::ModeSwitch.mask()
            && entry.mode_switch_sensitive[level]
        {
            target = target.set(ModifierMask::MODE_SWITCH, level & 2 != 0);
        }

        let mut undo = Vec::new();
        self.adjust_modifiers(key_state, live, target, keystrokes, &mut undo)?;

        // Primary event: a fresh press, or a release/press refresh pair
        // for auto-repeat.
        if auto_repeat {
            keystrokes.push(Keystroke::repeat(button, false));
            keystrokes.push(Keystroke::repeat(button, true));
        } else {
            keystrokes.push(Keystroke::press(button));
        }

        // Restore adjusted modifiers in reverse order.
        while let Some(keystroke) = undo.pop() {
            keystrokes.push(keystroke);
        }

        Ok(button)
    }

    /// Appends the keystrokes that bring live modifier state to `target`,
    /// with inverses collected into `undo`.
    ///
    /// Mode-Switch is reconciled before Shift: the key that actuates
    /// Mode-Switch may itself be shift-sensitive, requiring a transient
    /// Shift change first.
    fn adjust_modifiers(
        &self,
        key_state: &dyn KeyState,
        live: ModifierMask,
        target: ModifierMask,
        forward: &mut Vec<Keystroke>,
        undo: &mut Vec<Keystroke>,
    ) -> Result<(), TranslateError> {
        let mut current = live;

        let want_mode = target.mode_switch();
        if want_mode != current.mode_switch() {
            debug!("adjusting mode switch");
            let mode_entry = self
                .topology
                .entry(self.topology.mode_switch_symbol())
                .ok_or(TranslateError::ModifierAdjustment(ModifierRole::ModeSwitch))?;

            if mode_entry.shift_sensitive[0] && current.shift() {
                debug!("releasing shift for mode switch");
                if !key_state.map_modifier(ModifierRole::Shift, false, forward, undo) {
                    return Err(TranslateError::ModifierAdjustment(ModifierRole::Shift));
                }
                current = current.without(ModifierMask::SHIFT);
            }

            if !key_state.map_modifier(ModifierRole::ModeSwitch, want_mode, forward, undo) {
                return Err(TranslateError::ModifierAdjustment(ModifierRole::ModeSwitch));
            }
            current = current.set(ModifierMask::MODE_SWITCH, want_mode);
        }

        let want_shift = target.shift();
        if want_shift != current.shift() {
            debug!("adjusting shift");
            if !key_state.map_modifier(ModifierRole::Shift, want_shift, forward, undo) {
                return Err(TranslateError::ModifierAdjustment(ModifierRole::Shift));
            }
        }

        Ok(())
    }

    fn can_auto_repeat(&self, button: KeyButton) -> bool {
        let byte = (button.0 >> 3) as usize;
        self.auto_repeat
            .get(byte)
            .is_some_and(|&bits| bits & (1 << (button.0 & 7)) != 0)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
