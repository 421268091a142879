//! The layout topology table: which physical keys produce which symbols,
//! at which levels, and the learned raw-modifier-slot roles.
//!
//! The table is rebuilt wholesale from the raw platform tables on every
//! runtime snapshot (clear-then-rebuild, never patched incrementally) and
//! is read-only between snapshots.  The rebuild runs in two ordered
//! phases: the modifier-slot pass populates entries for modifier symbols
//! first (and those entries are never overwritten later), then the
//! general pass fills every remaining symbol/level pair.  The phase order
//! is a real invariant: it is what makes `modifier_mask` first-writer-wins.
//!
//! # Levels (for beginners)
//!
//! A physical key carries up to four symbols, one per *level*.  The level
//! index encodes the modifier combination that selects it: bit 0 is
//! Shift, bit 1 is Mode-Switch.  So level 0 is the plain symbol, level 1
//! the shifted one, and levels 2/3 the Mode-Switch pair.  A layout with
//! no Mode-Switch key simply never binds levels 2 and 3.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{KeyButton, KeySym, ModifierMask, ModifierRole};
use crate::ports::{KeyState, RawKeymap, RawModifierSlots};

/// Symbol levels per physical key understood by the core.
pub const MAX_LEVELS: usize = 4;

/// Number of raw modifier slots reported by the platform.
pub const MODIFIER_SLOTS: usize = 8;

/// Canonical symbol preferences for modifiers the synthesizer must be
/// able to name: `(role, preferred symbol, fallback symbol)`.  Processed
/// uniformly after every rebuild; a left-hand binding wins over a
/// right-hand one when both exist.
const MODIFIER_SYMBOL_PREFS: &[(ModifierRole, KeySym, KeySym)] =
    &[(ModifierRole::ModeSwitch, KeySym::MODE_SWITCH, KeySym::NONE)];

// ── Per-symbol record ─────────────────────────────────────────────────────────

/// Everything the layout knows about one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    /// Physical key per level; [`KeyButton::NONE`] where unbound.
    pub buttons: [KeyButton; MAX_LEVELS],
    /// Whether toggling Shift changes what the key at this level produces.
    pub shift_sensitive: [bool; MAX_LEVELS],
    /// Whether toggling Mode-Switch changes what the key at this level produces.
    pub mode_switch_sensitive: [bool; MAX_LEVELS],
    /// Non-zero only if this symbol *is* a modifier key; the mask it sets.
    pub modifier_mask: ModifierMask,
    /// An active CapsLock inverts this symbol's effective shift sense.
    pub caps_lock_sensitive: bool,
    /// An active NumLock inverts this symbol's effective shift sense.
    pub num_lock_sensitive: bool,
}

impl Default for SymbolEntry {
    fn default() -> Self {
        SymbolEntry {
            buttons: [KeyButton::NONE; MAX_LEVELS],
            shift_sensitive: [false; MAX_LEVELS],
            mode_switch_sensitive: [false; MAX_LEVELS],
            modifier_mask: ModifierMask::EMPTY,
            caps_lock_sensitive: false,
            num_lock_sensitive: false,
        }
    }
}

impl SymbolEntry {
    /// The lowest-numbered level with a bound physical key.
    pub fn first_bound_level(&self) -> Option<usize> {
        (0..MAX_LEVELS).find(|&level| !self.buttons[level].is_none())
    }
}

// ── Learned modifier slot map ─────────────────────────────────────────────────

/// The learned assignment of abstract roles to raw modifier slots.
///
/// Slots 0–2 are fixed by convention (Shift, CapsLock, Control); slots
/// 3–7 are inferred from the symbols bound to their member keys and may
/// carry no role at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierSlotMap {
    roles: [Option<ModifierRole>; MODIFIER_SLOTS],
}

impl ModifierSlotMap {
    /// The role learned for `slot`, if any.
    pub fn role(&self, slot: usize) -> Option<ModifierRole> {
        self.roles.get(slot).copied().flatten()
    }

    /// Decodes a raw platform modifier state word into the abstract mask.
    pub fn decode(&self, raw_state: u16) -> ModifierMask {
        let mut mask = ModifierMask::EMPTY;
        for (slot, role) in self.roles.iter().enumerate() {
            if raw_state & (1 << slot) != 0 {
                if let Some(role) = role {
                    mask = mask.with(role.mask().0);
                }
            }
        }
        mask
    }
}

// ── The topology table ────────────────────────────────────────────────────────

/// Per-layout symbol topology plus the learned modifier slot map.
///
/// Owned by the [`crate::translator::KeyTranslator`] instance and replaced
/// wholesale on each refresh; no global state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutTopology {
    entries: HashMap<KeySym, SymbolEntry>,
    slot_map: ModifierSlotMap,
    /// Canonical Mode-Switch symbol; [`KeySym::NONE`] when the layout
    /// binds none (levels 2/3 are then purged).
    mode_switch: KeySym,
}

impl LayoutTopology {
    /// An empty topology; unusable until the first [`rebuild`](Self::rebuild).
    pub fn new() -> Self {
        Self::default()
    }

    /// The record for `sym`, if the layout defines it.
    pub fn entry(&self, sym: KeySym) -> Option<&SymbolEntry> {
        self.entries.get(&sym)
    }

    /// Returns `true` if the layout defines `sym`.
    pub fn contains(&self, sym: KeySym) -> bool {
        self.entries.contains_key(&sym)
    }

    /// The canonical Mode-Switch symbol, or [`KeySym::NONE`] if unbound.
    pub fn mode_switch_symbol(&self) -> KeySym {
        self.mode_switch
    }

    /// The learned raw-slot role assignment.
    pub fn slot_map(&self) -> &ModifierSlotMap {
        &self.slot_map
    }

    /// Number of symbols in the table (including the sentinel).
    pub fn symbol_count(&self) -> usize {
        self.entries.len()
    }

    /// Rebuilds the table from the raw platform tables.
    ///
    /// Role-bearing modifier slots are reported to `key_state` via
    /// [`KeyState::add_modifier`] so the collaborator can later produce
    /// toggles for them.  Deterministic and idempotent: identical raw
    /// tables always yield an identical topology.
    pub fn rebuild(
        &mut self,
        keymap: &RawKeymap,
        slots: &RawModifierSlots,
        key_state: &mut dyn KeyState,
    ) {
        let levels = keymap.symbols_per_key.min(MAX_LEVELS);
        let key_count = keymap.key_count();

        // Per-physical-key usage flags: a key uses mode-switch if it binds
        // any symbol at level 2 or 3; it uses shift if shift visibly
        // changes the produced symbol (level 1 vs 0, else level 3 vs 2).
        let mut uses_shift = vec![false; key_count];
        let mut uses_mode_switch = vec![false; key_count];
        for index in 0..key_count {
            let sym = |level| keymap.symbol(index, level);
            if !sym(2).is_none() || !sym(3).is_none() {
                uses_mode_switch[index] = true;
            }
            if !sym(0).is_none() && !sym(1).is_none() && sym(1) != sym(0) {
                uses_shift[index] = true;
            } else if !sym(2).is_none() && !sym(3).is_none() && sym(3) != sym(2) {
                uses_shift[index] = true;
            }
        }

        self.entries.clear();
        self.slot_map = ModifierSlotMap::default();
        self.mode_switch = KeySym::NONE;

        // Slots 0-2 carry their conventional roles even when the grouping
        // lists no member keys for them; decode must still honor the bits.
        self.slot_map.roles[0] = Some(ModifierRole::Shift);
        self.slot_map.roles[1] = Some(ModifierRole::CapsLock);
        self.slot_map.roles[2] = Some(ModifierRole::Control);

        // Phase 1: modifier slots, in slot order.  The first member whose
        // primary symbol is recognized determines the slot's role; earlier
        // unrecognized members are skipped without disqualifying the slot.
        for slot in 0..MODIFIER_SLOTS {
            let mut role: Option<ModifierRole> = None;
            let mut member_buttons: Vec<KeyButton> = Vec::new();

            for &button in &slots.slots[slot] {
                if button.is_none() || button.0 < keymap.min_keycode {
                    continue;
                }
                let index = (button.0 - keymap.min_keycode) as usize;
                if index >= key_count {
                    continue;
                }
                let sym = keymap.symbol(index, 0);

                let slot_role = match role {
                    Some(r) => r,
                    None => match role_for_slot(slot, sym) {
                        Some(r) => {
                            role = Some(r);
                            r
                        }
                        None => continue,
                    },
                };

                member_buttons.push(button);

                // Fill level-0 data for the member's primary symbol;
                // first-writer-wins across members and across slots.
                let entry = self.entries.entry(sym).or_default();
                if !entry.buttons[0].is_none() {
                    continue;
                }
                entry.buttons[0] = button;
                entry.shift_sensitive[0] = uses_shift[index];
                entry.mode_switch_sensitive[0] = uses_mode_switch[index];
                entry.modifier_mask = slot_role.mask();
                entry.caps_lock_sensitive = false;
                entry.num_lock_sensitive = false;
            }

            if let Some(role) = role {
                self.slot_map.roles[slot] = Some(role);
                key_state.add_modifier(role.mask(), member_buttons);
            }
        }

        // The sentinel replaces whatever a NoSymbol-bound modifier member
        // may have written above; "no symbol" never owns a keycode.
        self.entries.insert(KeySym::NONE, SymbolEntry::default());

        // Phase 2: general population.  Modifier-originated level-0 data
        // from phase 1 is never overwritten.
        for index in 0..key_count {
            for level in 0..levels {
                let sym = keymap.symbol(index, level);
                if sym.is_none() {
                    continue;
                }
                let entry = self.entries.entry(sym).or_default();
                if !entry.buttons[level].is_none() {
                    continue;
                }
                if entry.buttons[0].is_none() {
                    // Fresh entry created by this pass: not a modifier.
                    entry.modifier_mask = ModifierMask::EMPTY;
                }
                entry.buttons[level] = keymap.button(index);
                entry.shift_sensitive[level] = uses_shift[index];
                entry.mode_switch_sensitive[level] = uses_mode_switch[index];
                entry.num_lock_sensitive = sym.is_keypad();
                entry.caps_lock_sensitive = sym.is_case_convertible();
            }
        }

        // Resolve canonical modifier symbols from the preference list.
        for &(role, preferred, fallback) in MODIFIER_SYMBOL_PREFS {
            let mut sym = preferred;
            let mut found = self.entries.get(&sym);
            if found.is_none() && !fallback.is_none() {
                sym = fallback;
                found = self.entries.get(&sym);
            }
            let bound = matches!(found, Some(entry) if !entry.modifier_mask.is_empty());
            if bound && role == ModifierRole::ModeSwitch {
                self.mode_switch = sym;
            }
        }

        // Without a Mode-Switch key nothing can reach levels 2/3: purge
        // them and drop symbols that only existed there.  The sentinel is
        // exempt from deletion.
        if self.mode_switch.is_none() {
            debug!("no mode switch in keymap");
            self.entries.retain(|&sym, entry| {
                entry.buttons[2] = KeyButton::NONE;
                entry.buttons[3] = KeyButton::NONE;
                entry.mode_switch_sensitive = [false; MAX_LEVELS];
                sym.is_none() || !entry.buttons[0].is_none() || !entry.buttons[1].is_none()
            });
        }
    }
}

/// The abstract role a modifier slot carries, given the symbol bound to
/// one of its member keys.  Slots 0–2 are fixed by convention regardless
/// of the bound symbol.
fn role_for_slot(slot: usize, sym: KeySym) -> Option<ModifierRole> {
    match slot {
        0 => Some(ModifierRole::Shift),
        1 => Some(ModifierRole::CapsLock),
        2 => Some(ModifierRole::Control),
        _ => match sym {
            KeySym::SHIFT_L | KeySym::SHIFT_R => Some(ModifierRole::Shift),
            KeySym::CONTROL_L | KeySym::CONTROL_R => Some(ModifierRole::Control),
            KeySym::ALT_L | KeySym::ALT_R => Some(ModifierRole::Alt),
            KeySym::META_L | KeySym::META_R => Some(ModifierRole::Meta),
            KeySym::SUPER_L | KeySym::SUPER_R => Some(ModifierRole::Super),
            KeySym::MODE_SWITCH => Some(ModifierRole::ModeSwitch),
            KeySym::CAPS_LOCK => Some(ModifierRole::CapsLock),
            KeySym::NUM_LOCK => Some(ModifierRole::NumLock),
            KeySym::SCROLL_LOCK => Some(ModifierRole::ScrollLock),
            _ => None,
        },
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
