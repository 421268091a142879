//! Abstract modifier mask and modifier roles.
//!
//! A [`ModifierMask`] describes which abstract modifiers are engaged,
//! independent of which raw platform modifier slot implements each one.
//! The raw-slot-to-role assignment is learned at refresh time by the
//! topology rebuild (`crate::topology`); this module only defines the
//! abstract vocabulary.

use serde::{Deserialize, Serialize};

// ── Modifier mask ─────────────────────────────────────────────────────────────

/// Bitmask of abstract modifier states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierMask(pub u16);

impl ModifierMask {
    pub const SHIFT: u16 = 1 << 0;
    pub const CAPS_LOCK: u16 = 1 << 1;
    pub const CONTROL: u16 = 1 << 2;
    pub const ALT: u16 = 1 << 3;
    pub const META: u16 = 1 << 4;
    pub const SUPER: u16 = 1 << 5;
    pub const MODE_SWITCH: u16 = 1 << 6;
    pub const NUM_LOCK: u16 = 1 << 7;
    pub const SCROLL_LOCK: u16 = 1 << 8;

    /// The empty mask.
    pub const EMPTY: ModifierMask = ModifierMask(0);

    /// Returns `true` if no modifier bit is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every bit of `bits` is set in this mask.
    pub fn contains(self, bits: u16) -> bool {
        self.0 & bits == bits
    }

    /// Returns this mask with `bits` added.
    pub fn with(self, bits: u16) -> ModifierMask {
        ModifierMask(self.0 | bits)
    }

    /// Returns this mask with `bits` removed.
    pub fn without(self, bits: u16) -> ModifierMask {
        ModifierMask(self.0 & !bits)
    }

    /// Returns this mask with `bits` set or cleared according to `on`.
    pub fn set(self, bits: u16, on: bool) -> ModifierMask {
        if on {
            self.with(bits)
        } else {
            self.without(bits)
        }
    }

    /// Returns `true` if Shift is engaged.
    pub fn shift(self) -> bool {
        self.contains(Self::SHIFT)
    }

    /// Returns `true` if CapsLock is toggled on.
    pub fn caps_lock(self) -> bool {
        self.contains(Self::CAPS_LOCK)
    }

    /// Returns `true` if Mode-Switch is engaged.
    pub fn mode_switch(self) -> bool {
        self.contains(Self::MODE_SWITCH)
    }

    /// Returns `true` if NumLock is toggled on.
    pub fn num_lock(self) -> bool {
        self.contains(Self::NUM_LOCK)
    }

    /// Returns `true` if ScrollLock is toggled on.
    pub fn scroll_lock(self) -> bool {
        self.contains(Self::SCROLL_LOCK)
    }
}

// ── Modifier roles ────────────────────────────────────────────────────────────

/// The abstract modifier roles a raw platform modifier slot can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierRole {
    Shift,
    CapsLock,
    Control,
    Alt,
    Meta,
    Super,
    ModeSwitch,
    NumLock,
    ScrollLock,
}

impl ModifierRole {
    /// The abstract mask bit this role sets.
    pub fn mask(self) -> ModifierMask {
        let bits = match self {
            ModifierRole::Shift => ModifierMask::SHIFT,
            ModifierRole::CapsLock => ModifierMask::CAPS_LOCK,
            ModifierRole::Control => ModifierMask::CONTROL,
            ModifierRole::Alt => ModifierMask::ALT,
            ModifierRole::Meta => ModifierMask::META,
            ModifierRole::Super => ModifierMask::SUPER,
            ModifierRole::ModeSwitch => ModifierMask::MODE_SWITCH,
            ModifierRole::NumLock => ModifierMask::NUM_LOCK,
            ModifierRole::ScrollLock => ModifierMask::SCROLL_LOCK,
        };
        ModifierMask(bits)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
