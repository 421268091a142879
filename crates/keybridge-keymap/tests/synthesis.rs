//! Integration tests for the keybridge-keymap translation core.
//!
//! These tests drive the public API end-to-end: a scripted platform
//! keyboard feeds `refresh`, a recording key-state collaborator observes
//! the snapshot and answers modifier queries, and `translate` produces
//! the keystroke sequences the platform dispatcher would inject.

use keybridge_keymap::{
    ComposeKeySource, KeyButton, KeyId, KeyState, KeySym, KeyTranslator, Keystroke, ModifierMask,
    ModifierRole, PlatformKeyboard, RawKeymap, RawModifierSlots, TranslateError,
    UnicodeKeysymSource, KEY_BITMAP_LEN,
};

const SHIFT_BUTTON: KeyButton = KeyButton(8);
const LETTER_BUTTON: KeyButton = KeyButton(38);
const HOME_BUTTON: KeyButton = KeyButton(20);
const NO_REPEAT_BUTTON: KeyButton = KeyButton(21);

// ── Collaborator fakes ────────────────────────────────────────────────────────

/// Unicode table stub: nothing beyond the direct ranges resolves.
struct NoUnicode;

impl UnicodeKeysymSource for NoUnicode {
    fn keysym_for_code_point(&self, _code_point: u32) -> Option<KeySym> {
        None
    }
}

/// Compose-key stub with a fixed decomposition table.
struct TableCompose(Vec<(KeySym, Vec<KeySym>)>);

impl ComposeKeySource for TableCompose {
    fn decompose(&self, sym: KeySym) -> Option<Vec<KeySym>> {
        self.0
            .iter()
            .find(|(composed, _)| *composed == sym)
            .map(|(_, parts)| parts.clone())
    }
}

/// Records everything the snapshot pushes into it and produces Shift
/// toggles on demand.
#[derive(Default)]
struct RecordingKeyState {
    active: ModifierMask,
    downs: Vec<KeyButton>,
    toggles: Vec<ModifierRole>,
    registered: Vec<(ModifierMask, Vec<KeyButton>)>,
}

impl KeyState for RecordingKeyState {
    fn set_key_down(&mut self, button: KeyButton) {
        self.downs.push(button);
    }

    fn set_toggled(&mut self, role: ModifierRole) {
        self.toggles.push(role);
    }

    fn add_modifier(&mut self, mask: ModifierMask, buttons: Vec<KeyButton>) {
        self.registered.push((mask, buttons));
    }

    fn active_modifiers(&self) -> ModifierMask {
        self.active
    }

    fn map_modifier(
        &self,
        role: ModifierRole,
        active: bool,
        forward: &mut Vec<Keystroke>,
        undo: &mut Vec<Keystroke>,
    ) -> bool {
        if role != ModifierRole::Shift {
            return false;
        }
        if active {
            forward.push(Keystroke::press(SHIFT_BUTTON));
            undo.push(Keystroke::release(SHIFT_BUTTON));
        } else {
            forward.push(Keystroke::release(SHIFT_BUTTON));
            undo.push(Keystroke::press(SHIFT_BUTTON));
        }
        true
    }
}

/// A scripted platform: Shift_L in slot 0, `a`/`A` on key 38, Home on
/// key 20 (no keypad twin), Return on a key with auto-repeat disabled.
struct ScriptedPlatform {
    pressed: [u8; KEY_BITMAP_LEN],
    raw_state: u16,
}

impl Default for ScriptedPlatform {
    fn default() -> Self {
        ScriptedPlatform { pressed: [0; KEY_BITMAP_LEN], raw_state: 0 }
    }
}

impl PlatformKeyboard for ScriptedPlatform {
    fn keymap(&self) -> RawKeymap {
        let mut rows = vec![[KeySym::NONE; 4]; 31];
        rows[0] = [KeySym::SHIFT_L, KeySym::NONE, KeySym::NONE, KeySym::NONE];
        rows[12] = [KeySym::HOME, KeySym::NONE, KeySym::NONE, KeySym::NONE];
        rows[13] = [KeySym::RETURN, KeySym::NONE, KeySym::NONE, KeySym::NONE];
        rows[30] = [KeySym(0x61), KeySym(0x41), KeySym::NONE, KeySym::NONE];
        RawKeymap {
            min_keycode: 8,
            symbols_per_key: 4,
            symbols: rows.into_iter().flatten().collect(),
        }
    }

    fn modifier_slots(&self) -> RawModifierSlots {
        let mut slots = RawModifierSlots::default();
        slots.slots[0] = vec![SHIFT_BUTTON];
        slots
    }

    fn pressed_keys(&self) -> [u8; KEY_BITMAP_LEN] {
        self.pressed
    }

    fn auto_repeat_mask(&self) -> [u8; KEY_BITMAP_LEN] {
        let mut mask = [0xFF; KEY_BITMAP_LEN];
        mask[(NO_REPEAT_BUTTON.0 >> 3) as usize] &= !(1 << (NO_REPEAT_BUTTON.0 & 7));
        mask
    }

    fn pointer_modifier_state(&self) -> u16 {
        self.raw_state
    }
}

fn translator_with_compose(table: Vec<(KeySym, Vec<KeySym>)>) -> KeyTranslator {
    let mut translator = KeyTranslator::new(Box::new(NoUnicode), Box::new(TableCompose(table)));
    translator.refresh(&ScriptedPlatform::default(), &mut RecordingKeyState::default());
    translator
}

fn translator() -> KeyTranslator {
    translator_with_compose(Vec::new())
}

// ── Shift bracketing and substitution scenarios ───────────────────────────────

#[test]
fn test_uppercase_request_with_shift_off_brackets_shift_around_press() {
    let translator = translator();
    let key_state = RecordingKeyState::default();

    let result = translator
        .translate(KeyId(b'A' as u32), ModifierMask::EMPTY, false, &key_state)
        .expect("A must synthesize");

    assert_eq!(result.button, LETTER_BUTTON);
    assert_eq!(
        result.keystrokes,
        vec![
            Keystroke::press(SHIFT_BUTTON),
            Keystroke::press(LETTER_BUTTON),
            Keystroke::release(SHIFT_BUTTON),
        ]
    );
}

#[test]
fn test_lowercase_request_with_shift_on_releases_and_restores_shift() {
    let translator = translator();
    let key_state = RecordingKeyState {
        active: ModifierMask(ModifierMask::SHIFT),
        ..Default::default()
    };

    let result = translator
        .translate(KeyId(b'a' as u32), ModifierMask::EMPTY, false, &key_state)
        .expect("a must synthesize");

    assert_eq!(result.button, LETTER_BUTTON);
    assert_eq!(
        result.keystrokes,
        vec![
            Keystroke::release(SHIFT_BUTTON),
            Keystroke::press(LETTER_BUTTON),
            Keystroke::press(SHIFT_BUTTON),
        ]
    );
}

#[test]
fn test_keypad_home_substitutes_plain_home_binding() {
    let translator = translator();
    let key_state = RecordingKeyState::default();

    let result = translator
        .translate(KeyId::KP_HOME, ModifierMask::EMPTY, false, &key_state)
        .expect("keypad Home must fall back to Home");

    assert_eq!(result.button, HOME_BUTTON);
    assert_eq!(result.keystrokes, vec![Keystroke::press(HOME_BUTTON)]);
}

#[test]
fn test_auto_repeat_fails_for_key_with_repeat_capability_cleared() {
    let translator = translator();
    let key_state = RecordingKeyState::default();

    // Regardless of the requested mask
    for mask in [ModifierMask::EMPTY, ModifierMask(ModifierMask::SHIFT)] {
        let result = translator.translate(KeyId::RETURN, mask, true, &key_state);
        assert_eq!(
            result,
            Err(TranslateError::AutoRepeatDisabled(NO_REPEAT_BUTTON))
        );
    }
}

#[test]
fn test_auto_repeat_succeeds_for_repeating_key() {
    let translator = translator();
    let key_state = RecordingKeyState::default();

    let result = translator
        .translate(KeyId(b'a' as u32), ModifierMask::EMPTY, true, &key_state)
        .expect("repeating key must refresh");

    assert_eq!(
        result.keystrokes,
        vec![
            Keystroke::repeat(LETTER_BUTTON, false),
            Keystroke::repeat(LETTER_BUTTON, true),
        ]
    );
}

// ── Decomposition atomicity ───────────────────────────────────────────────────

#[test]
fn test_decomposition_with_missing_constituent_emits_nothing() {
    // é decomposes into dead-acute + e, neither of which this layout binds
    let translator = translator_with_compose(vec![(
        KeySym(0xE9),
        vec![KeySym(0xFE51), KeySym(0x65)],
    )]);
    let key_state = RecordingKeyState::default();

    let result = translator.translate(KeyId(0xE9), ModifierMask::EMPTY, false, &key_state);

    assert_eq!(
        result,
        Err(TranslateError::IncompleteDecomposition(KeySym(0xFE51)))
    );
}

// ── Rebuild properties ────────────────────────────────────────────────────────

#[test]
fn test_consecutive_refreshes_yield_identical_topology() {
    let platform = ScriptedPlatform::default();
    let mut translator = KeyTranslator::new(Box::new(NoUnicode), Box::new(TableCompose(Vec::new())));

    translator.refresh(&platform, &mut RecordingKeyState::default());
    let first = translator.topology().clone();

    translator.refresh(&platform, &mut RecordingKeyState::default());

    assert_eq!(&first, translator.topology());
}

#[test]
fn test_sentinel_entry_survives_rebuild() {
    let translator = translator();

    let sentinel = translator
        .topology()
        .entry(KeySym::NONE)
        .expect("sentinel must exist after rebuild");
    assert!(sentinel.buttons.iter().all(|b| b.is_none()));
}

#[test]
fn test_layout_without_mode_switch_has_no_upper_level_bindings() {
    // ScriptedPlatform binds no Mode_switch key at all
    let translator = translator();

    assert_eq!(translator.topology().mode_switch_symbol(), KeySym::NONE);
    for sym in [KeySym(0x61), KeySym(0x41), KeySym::HOME, KeySym::SHIFT_L] {
        if let Some(entry) = translator.topology().entry(sym) {
            assert!(entry.buttons[2].is_none());
            assert!(entry.buttons[3].is_none());
            assert_eq!(entry.mode_switch_sensitive, [false; 4]);
        }
    }
}

// ── Snapshot delivery ─────────────────────────────────────────────────────────

#[test]
fn test_refresh_delivers_pressed_keys_locks_and_modifier_groups() {
    let mut platform = ScriptedPlatform::default();
    platform.pressed[4] = 0b0100_0000; // button 38 held
    platform.raw_state = 1 << 1; // CapsLock toggled

    let mut key_state = RecordingKeyState::default();
    let mut translator = KeyTranslator::new(Box::new(NoUnicode), Box::new(TableCompose(Vec::new())));
    translator.refresh(&platform, &mut key_state);

    assert_eq!(key_state.downs, vec![LETTER_BUTTON]);
    assert_eq!(key_state.toggles, vec![ModifierRole::CapsLock]);
    assert_eq!(
        key_state.registered,
        vec![(ModifierRole::Shift.mask(), vec![SHIFT_BUTTON])]
    );
}

#[test]
fn test_decode_live_modifiers_honours_conventional_slots() {
    let translator = translator();

    let mask = translator.decode_live_modifiers((1 << 0) | (1 << 2));

    assert!(mask.shift());
    assert!(mask.contains(ModifierMask::CONTROL));
    assert!(!mask.caps_lock());
}
