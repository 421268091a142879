//! Key identifier types: abstract key IDs, symbolic keys, and physical keycodes.
//!
//! # Three kinds of "key" (for beginners)
//!
//! Keyboard translation juggles three distinct identifier spaces, and mixing
//! them up is the classic source of bugs in input-sharing code:
//!
//! | Type          | Identifies                              | Example            |
//! |---------------|-----------------------------------------|--------------------|
//! | [`KeyId`]     | a key as carried between hosts          | `0xEF50` (Home)    |
//! | [`KeySym`]    | a platform symbol (layout-dependent)    | `0x0061` (`a`)     |
//! | [`KeyButton`] | a physical keycode on local hardware    | `38`               |
//!
//! A [`KeyId`] is what the sending host puts on the wire: a Unicode code
//! point for printable keys, or a value in one of the reserved private
//! bands for function, navigation, and media keys.  A [`KeySym`] is the
//! receiving platform's name for a key meaning, irrespective of which
//! physical key produces it.  A [`KeyButton`] is one physical key on the
//! local keyboard; several buttons can produce the same symbol and one
//! button produces different symbols at different shift levels.
//!
//! Symbol constants follow the X11 `keysymdef.h` values, which is the
//! symbol space the rest of this crate's tables are written against.

use serde::{Deserialize, Serialize};

// ── Physical keycode ──────────────────────────────────────────────────────────

/// A physical key on the local keyboard hardware.
///
/// The value `0` means "no key" and is used as the empty slot marker in
/// per-level keycode arrays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyButton(pub u16);

impl KeyButton {
    /// The "no key" marker.
    pub const NONE: KeyButton = KeyButton(0);

    /// Returns `true` if this is the "no key" marker.
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

// ── Abstract key identifier ───────────────────────────────────────────────────

/// Platform-independent key identifier carried between hosts.
///
/// Printable keys use their Unicode code point directly.  Non-printable
/// keys live in reserved private bands:
///
/// - `0xE000–0xE0FF`: vendor/media keys (browser, audio, launch)
/// - `0xEE00–0xEEFF`: ISO 9995 function and modifier keys
/// - `0xEF00–0xEFFF`: miscellany (function, navigation, keypad, modifiers);
///   maps by arithmetic offset onto the `0xFF00` symbol page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyId(pub u32);

impl KeyId {
    // Miscellany band (0xEF00 + (keysym - 0xFF00))
    pub const TAB: KeyId = KeyId(0xEF09);
    pub const RETURN: KeyId = KeyId(0xEF0D);
    pub const HOME: KeyId = KeyId(0xEF50);
    pub const LEFT: KeyId = KeyId(0xEF51);
    pub const UP: KeyId = KeyId(0xEF52);
    pub const RIGHT: KeyId = KeyId(0xEF53);
    pub const DOWN: KeyId = KeyId(0xEF54);
    pub const PAGE_UP: KeyId = KeyId(0xEF55);
    pub const PAGE_DOWN: KeyId = KeyId(0xEF56);
    pub const END: KeyId = KeyId(0xEF57);
    pub const INSERT: KeyId = KeyId(0xEF63);
    pub const DELETE: KeyId = KeyId(0xEFFF);
    pub const KP_HOME: KeyId = KeyId(0xEF95);
    pub const KP_LEFT: KeyId = KeyId(0xEF96);
    pub const KP_UP: KeyId = KeyId(0xEF97);
    pub const KP_RIGHT: KeyId = KeyId(0xEF98);
    pub const KP_DOWN: KeyId = KeyId(0xEF99);
    pub const KP_PAGE_UP: KeyId = KeyId(0xEF9A);
    pub const KP_PAGE_DOWN: KeyId = KeyId(0xEF9B);
    pub const KP_END: KeyId = KeyId(0xEF9C);
    pub const KP_INSERT: KeyId = KeyId(0xEF9E);
    pub const KP_DELETE: KeyId = KeyId(0xEF9F);

    // ISO 9995 band
    pub const LEFT_TAB: KeyId = KeyId(0xEE20);

    // Media band (0xE0A6–0xE0B7; see `resolve`)
    pub const BROWSER_BACK: KeyId = KeyId(0xE0A6);
    pub const BROWSER_FORWARD: KeyId = KeyId(0xE0A7);
    pub const BROWSER_REFRESH: KeyId = KeyId(0xE0A8);
    pub const BROWSER_STOP: KeyId = KeyId(0xE0A9);
    pub const BROWSER_SEARCH: KeyId = KeyId(0xE0AA);
    pub const BROWSER_FAVORITES: KeyId = KeyId(0xE0AB);
    pub const BROWSER_HOME: KeyId = KeyId(0xE0AC);
    pub const AUDIO_MUTE: KeyId = KeyId(0xE0AD);
    pub const AUDIO_DOWN: KeyId = KeyId(0xE0AE);
    pub const AUDIO_UP: KeyId = KeyId(0xE0AF);
    pub const AUDIO_NEXT: KeyId = KeyId(0xE0B0);
    pub const AUDIO_PREV: KeyId = KeyId(0xE0B1);
    pub const AUDIO_STOP: KeyId = KeyId(0xE0B2);
    pub const AUDIO_PLAY: KeyId = KeyId(0xE0B3);
    pub const MAIL: KeyId = KeyId(0xE0B4);
    pub const MEDIA_SELECT: KeyId = KeyId(0xE0B5);
    pub const LAUNCH_APP1: KeyId = KeyId(0xE0B6);
    pub const LAUNCH_APP2: KeyId = KeyId(0xE0B7);

    /// Returns `true` if this identifier lies in the reserved `0xExxx`
    /// private area (media, ISO, or miscellany band).
    pub fn is_reserved(self) -> bool {
        self.0 & 0xFFFF_F000 == 0xE000
    }
}

// ── Symbolic key ──────────────────────────────────────────────────────────────

/// A platform-defined key meaning, irrespective of which physical key
/// produces it.
///
/// Values follow X11 `keysymdef.h`.  [`KeySym::NONE`] (`NoSymbol`) is the
/// sentinel for "no symbol bound".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeySym(pub u32);

impl KeySym {
    /// `NoSymbol`: no symbol bound at this position.
    pub const NONE: KeySym = KeySym(0);

    // Editing and motion
    pub const TAB: KeySym = KeySym(0xFF09); // XK_Tab
    pub const RETURN: KeySym = KeySym(0xFF0D); // XK_Return
    pub const SCROLL_LOCK: KeySym = KeySym(0xFF14); // XK_Scroll_Lock
    pub const HOME: KeySym = KeySym(0xFF50); // XK_Home
    pub const LEFT: KeySym = KeySym(0xFF51); // XK_Left
    pub const UP: KeySym = KeySym(0xFF52); // XK_Up
    pub const RIGHT: KeySym = KeySym(0xFF53); // XK_Right
    pub const DOWN: KeySym = KeySym(0xFF54); // XK_Down
    pub const PAGE_UP: KeySym = KeySym(0xFF55); // XK_Prior
    pub const PAGE_DOWN: KeySym = KeySym(0xFF56); // XK_Next
    pub const END: KeySym = KeySym(0xFF57); // XK_End
    pub const INSERT: KeySym = KeySym(0xFF63); // XK_Insert
    pub const DELETE: KeySym = KeySym(0xFFFF); // XK_Delete

    // Keypad
    pub const KP_HOME: KeySym = KeySym(0xFF95); // XK_KP_Home
    pub const KP_LEFT: KeySym = KeySym(0xFF96); // XK_KP_Left
    pub const KP_UP: KeySym = KeySym(0xFF97); // XK_KP_Up
    pub const KP_RIGHT: KeySym = KeySym(0xFF98); // XK_KP_Right
    pub const KP_DOWN: KeySym = KeySym(0xFF99); // XK_KP_Down
    pub const KP_PAGE_UP: KeySym = KeySym(0xFF9A); // XK_KP_Prior
    pub const KP_PAGE_DOWN: KeySym = KeySym(0xFF9B); // XK_KP_Next
    pub const KP_END: KeySym = KeySym(0xFF9C); // XK_KP_End
    pub const KP_INSERT: KeySym = KeySym(0xFF9E); // XK_KP_Insert
    pub const KP_DELETE: KeySym = KeySym(0xFF9F); // XK_KP_Delete

    // Modifiers
    pub const MODE_SWITCH: KeySym = KeySym(0xFF7E); // XK_Mode_switch
    pub const NUM_LOCK: KeySym = KeySym(0xFF7F); // XK_Num_Lock
    pub const SHIFT_L: KeySym = KeySym(0xFFE1); // XK_Shift_L
    pub const SHIFT_R: KeySym = KeySym(0xFFE2); // XK_Shift_R
    pub const CONTROL_L: KeySym = KeySym(0xFFE3); // XK_Control_L
    pub const CONTROL_R: KeySym = KeySym(0xFFE4); // XK_Control_R
    pub const CAPS_LOCK: KeySym = KeySym(0xFFE5); // XK_Caps_Lock
    pub const META_L: KeySym = KeySym(0xFFE7); // XK_Meta_L
    pub const META_R: KeySym = KeySym(0xFFE8); // XK_Meta_R
    pub const ALT_L: KeySym = KeySym(0xFFE9); // XK_Alt_L
    pub const ALT_R: KeySym = KeySym(0xFFEA); // XK_Alt_R
    pub const SUPER_L: KeySym = KeySym(0xFFEB); // XK_Super_L
    pub const SUPER_R: KeySym = KeySym(0xFFEC); // XK_Super_R

    // ISO 9995
    pub const ISO_LEFT_TAB: KeySym = KeySym(0xFE20); // XK_ISO_Left_Tab

    // Media / vendor page (XF86)
    pub const BROWSER_BACK: KeySym = KeySym(0x1008_FF26); // XF86XK_Back
    pub const BROWSER_FORWARD: KeySym = KeySym(0x1008_FF27); // XF86XK_Forward
    pub const BROWSER_STOP: KeySym = KeySym(0x1008_FF28); // XF86XK_Stop
    pub const BROWSER_REFRESH: KeySym = KeySym(0x1008_FF29); // XF86XK_Refresh
    pub const BROWSER_SEARCH: KeySym = KeySym(0x1008_FF1B); // XF86XK_Search
    pub const BROWSER_FAVORITES: KeySym = KeySym(0x1008_FF30); // XF86XK_Favorites
    pub const BROWSER_HOME: KeySym = KeySym(0x1008_FF18); // XF86XK_HomePage
    pub const AUDIO_MUTE: KeySym = KeySym(0x1008_FF12); // XF86XK_AudioMute
    pub const AUDIO_DOWN: KeySym = KeySym(0x1008_FF11); // XF86XK_AudioLowerVolume
    pub const AUDIO_UP: KeySym = KeySym(0x1008_FF13); // XF86XK_AudioRaiseVolume
    pub const AUDIO_NEXT: KeySym = KeySym(0x1008_FF17); // XF86XK_AudioNext
    pub const AUDIO_PREV: KeySym = KeySym(0x1008_FF16); // XF86XK_AudioPrev
    pub const AUDIO_STOP: KeySym = KeySym(0x1008_FF15); // XF86XK_AudioStop
    pub const AUDIO_PLAY: KeySym = KeySym(0x1008_FF14); // XF86XK_AudioPlay
    pub const MAIL: KeySym = KeySym(0x1008_FF19); // XF86XK_Mail
    pub const MEDIA_SELECT: KeySym = KeySym(0x1008_FF32); // XF86XK_AudioMedia
    pub const LAUNCH_APP1: KeySym = KeySym(0x1008_FF40); // XF86XK_Launch0
    pub const LAUNCH_APP2: KeySym = KeySym(0x1008_FF41); // XF86XK_Launch1

    /// Returns `true` if this is the `NoSymbol` sentinel.
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if this is a numeric-keypad symbol.
    ///
    /// Keypad symbols are the `0xFF80–0xFFBD` block (`XK_KP_Space` through
    /// `XK_KP_Equal`) plus the vendor-private keypad page.  Keypad symbols
    /// are exactly the symbols whose effective shift sense is inverted by
    /// an active NumLock.
    pub fn is_keypad(self) -> bool {
        matches!(self.0, 0xFF80..=0xFFBD | 0x1100_0000..=0x1100_FFFF)
    }

    /// Returns the lowercase and uppercase forms of this symbol.
    ///
    /// Covers ASCII letters and the Latin-1 letter block, which is the
    /// range the direct-mapped printable identifiers occupy.  Symbols
    /// with no case distinction (including `ß` and `ÿ`, whose uppercase
    /// forms live outside Latin-1) return themselves for both forms.
    pub fn convert_case(self) -> (KeySym, KeySym) {
        match self.0 {
            // ASCII letters
            0x41..=0x5A => (KeySym(self.0 + 0x20), self),
            0x61..=0x7A => (self, KeySym(self.0 - 0x20)),
            // Latin-1 letters; 0xD7 is the multiplication sign, 0xF7 division
            0xC0..=0xDE if self.0 != 0xD7 => (KeySym(self.0 + 0x20), self),
            0xE0..=0xFE if self.0 != 0xF7 => (self, KeySym(self.0 - 0x20)),
            _ => (self, self),
        }
    }

    /// Returns the opposite-case form of this symbol, or `None` if the
    /// symbol has no case distinction.
    pub fn opposite_case(self) -> Option<KeySym> {
        let (lower, upper) = self.convert_case();
        if lower == upper {
            None
        } else if self == lower {
            Some(upper)
        } else {
            Some(lower)
        }
    }

    /// Returns `true` if swapping this symbol's letter case yields a
    /// different symbol.  Such symbols have their effective shift sense
    /// inverted by an active CapsLock.
    pub fn is_case_convertible(self) -> bool {
        let (lower, upper) = self.convert_case();
        lower != upper
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
