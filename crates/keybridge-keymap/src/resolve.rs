//! Abstract key identifier to symbolic key resolution.
//!
//! Identifiers arrive from the remote host in one of four forms, tried in
//! priority order: the reserved media band (fixed lookup), the reserved
//! ISO and miscellany bands (explicit case and arithmetic offset), the
//! directly-mapped printable Latin ranges, and everything else through
//! the platform Unicode symbol table.
//!
//! Two substitutions smooth over layout differences between hosts:
//! shifted Tab prefers the dedicated left-tab symbol (for layouts that
//! bind it as its own symbol rather than via Shift), and keypad
//! navigation symbols fall back to their plain-key twins when the local
//! keyboard has no numeric pad.

use tracing::debug;

use crate::domain::{KeyId, KeySym, ModifierMask};
use crate::ports::UnicodeKeysymSource;
use crate::topology::LayoutTopology;

/// Resolves an abstract identifier plus the desired modifier mask to a
/// symbolic key, or `None` for unsupported identifiers.
pub fn resolve_key_id(
    id: KeyId,
    desired: ModifierMask,
    topology: &LayoutTopology,
    unicode: &dyn UnicodeKeysymSource,
) -> Option<KeySym> {
    let sym = if id.is_reserved() {
        match id.0 & 0xFF00 {
            0xE000 => {
                let sym = media_symbol(id);
                return (!sym.is_none()).then_some(sym);
            }
            // ISO 9995 function and modifier keys; only left-tab is carried
            0xEE00 => {
                if id == KeyId::LEFT_TAB {
                    KeySym::ISO_LEFT_TAB
                } else {
                    KeySym::NONE
                }
            }
            // Miscellany: arithmetic offset onto the 0xFF00 symbol page
            0xEF00 => KeySym(id.0 - 0xEF00 + 0xFF00),
            _ => KeySym::NONE,
        }
    } else if matches!(id.0, 0x0020..=0x007E | 0x00A0..=0x00FF) {
        // Printable Latin ranges map directly
        return Some(KeySym(id.0));
    } else {
        return unicode.keysym_for_code_point(id.0);
    };

    if sym.is_none() {
        return None;
    }

    // Shifted Tab prefers the dedicated left-tab symbol; if the layout
    // lacks it, the backup substitution below returns to plain Tab with
    // Shift still desired.
    let sym = if sym == KeySym::TAB && desired.shift() {
        KeySym::ISO_LEFT_TAB
    } else {
        sym
    };

    let backup = backup_symbol(sym);
    if backup != sym && topology.entry(sym).is_none() && topology.entry(backup).is_some() {
        debug!(symbol = sym.0, backup = backup.0, "substituting backup symbol");
        return Some(backup);
    }

    Some(sym)
}

/// Fixed lookup for the reserved vendor/media band (`0xE0xx`).
fn media_symbol(id: KeyId) -> KeySym {
    match id.0 & 0xFF {
        0xA6 => KeySym::BROWSER_BACK,
        0xA7 => KeySym::BROWSER_FORWARD,
        0xA8 => KeySym::BROWSER_REFRESH,
        0xA9 => KeySym::BROWSER_STOP,
        0xAA => KeySym::BROWSER_SEARCH,
        0xAB => KeySym::BROWSER_FAVORITES,
        0xAC => KeySym::BROWSER_HOME,
        0xAD => KeySym::AUDIO_MUTE,
        0xAE => KeySym::AUDIO_DOWN,
        0xAF => KeySym::AUDIO_UP,
        0xB0 => KeySym::AUDIO_NEXT,
        0xB1 => KeySym::AUDIO_PREV,
        0xB2 => KeySym::AUDIO_STOP,
        0xB3 => KeySym::AUDIO_PLAY,
        0xB4 => KeySym::MAIL,
        0xB5 => KeySym::MEDIA_SELECT,
        0xB6 => KeySym::LAUNCH_APP1,
        0xB7 => KeySym::LAUNCH_APP2,
        _ => KeySym::NONE,
    }
}

/// The designated plain-key backup for symbols most keyboards can lack
/// (keypad navigation on laptops without a numeric pad, left-tab on
/// layouts that reach it through Shift instead).
fn backup_symbol(sym: KeySym) -> KeySym {
    match sym {
        KeySym::KP_HOME => KeySym::HOME,
        KeySym::KP_LEFT => KeySym::LEFT,
        KeySym::KP_UP => KeySym::UP,
        KeySym::KP_RIGHT => KeySym::RIGHT,
        KeySym::KP_DOWN => KeySym::DOWN,
        KeySym::KP_PAGE_UP => KeySym::PAGE_UP,
        KeySym::KP_PAGE_DOWN => KeySym::PAGE_DOWN,
        KeySym::KP_END => KeySym::END,
        KeySym::KP_INSERT => KeySym::INSERT,
        KeySym::KP_DELETE => KeySym::DELETE,
        KeySym::ISO_LEFT_TAB => KeySym::TAB,
        _ => sym,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
