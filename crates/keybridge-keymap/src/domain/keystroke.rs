//! The primitive keystroke instruction emitted by synthesis.

use serde::{Deserialize, Serialize};

use super::keys::KeyButton;

/// One primitive key instruction for the platform dispatch collaborator.
///
/// `repeat` distinguishes the release/press pair that refreshes an
/// auto-repeating key from a fresh press; some platforms suppress the
/// intermediate release for repeat refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keystroke {
    /// The physical key to actuate.
    pub button: KeyButton,
    /// `true` for press, `false` for release.
    pub press: bool,
    /// `true` if this instruction is part of an auto-repeat refresh.
    pub repeat: bool,
}

impl Keystroke {
    /// A fresh (non-repeat) press of `button`.
    pub fn press(button: KeyButton) -> Keystroke {
        Keystroke { button, press: true, repeat: false }
    }

    /// A fresh (non-repeat) release of `button`.
    pub fn release(button: KeyButton) -> Keystroke {
        Keystroke { button, press: false, repeat: false }
    }

    /// A repeat-refresh instruction for `button`.
    pub fn repeat(button: KeyButton, press: bool) -> Keystroke {
        Keystroke { button, press, repeat: true }
    }
}
