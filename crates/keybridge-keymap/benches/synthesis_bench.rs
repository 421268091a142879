//! Criterion benchmarks for topology rebuild and keystroke synthesis.
//!
//! Measures the latency of the two hot paths: `refresh` (runs on every
//! keyboard-layout change) and `translate` (runs per key event, so it
//! must stay in the table-lookup class).
//!
//! Run with:
//! ```bash
//! cargo bench --package keybridge-keymap --bench synthesis_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keybridge_keymap::{
    ComposeKeySource, KeyButton, KeyId, KeyState, KeySym, KeyTranslator, Keystroke, ModifierMask,
    ModifierRole, PlatformKeyboard, RawKeymap, RawModifierSlots, UnicodeKeysymSource,
    KEY_BITMAP_LEN,
};

// ── Minimal collaborators ─────────────────────────────────────────────────────

struct NoUnicode;

impl UnicodeKeysymSource for NoUnicode {
    fn keysym_for_code_point(&self, _code_point: u32) -> Option<KeySym> {
        None
    }
}

struct NoCompose;

impl ComposeKeySource for NoCompose {
    fn decompose(&self, _sym: KeySym) -> Option<Vec<KeySym>> {
        None
    }
}

struct BenchKeyState {
    active: ModifierMask,
}

impl KeyState for BenchKeyState {
    fn set_key_down(&mut self, _button: KeyButton) {}
    fn set_toggled(&mut self, _role: ModifierRole) {}
    fn add_modifier(&mut self, _mask: ModifierMask, _buttons: Vec<KeyButton>) {}

    fn active_modifiers(&self) -> ModifierMask {
        self.active
    }

    fn map_modifier(
        &self,
        _role: ModifierRole,
        active: bool,
        forward: &mut Vec<Keystroke>,
        undo: &mut Vec<Keystroke>,
    ) -> bool {
        if active {
            forward.push(Keystroke::press(KeyButton(8)));
            undo.push(Keystroke::release(KeyButton(8)));
        } else {
            forward.push(Keystroke::release(KeyButton(8)));
            undo.push(Keystroke::press(KeyButton(8)));
        }
        true
    }
}

/// A full-size keyboard: 248 keycodes with the ASCII letter/digit rows
/// bound, Shift/Control/Alt modifier slots populated.
struct BenchPlatform;

impl PlatformKeyboard for BenchPlatform {
    fn keymap(&self) -> RawKeymap {
        let mut rows = vec![[KeySym::NONE; 4]; 248];
        rows[0] = [KeySym::SHIFT_L, KeySym::NONE, KeySym::NONE, KeySym::NONE];
        rows[1] = [KeySym::CONTROL_L, KeySym::NONE, KeySym::NONE, KeySym::NONE];
        rows[2] = [KeySym::ALT_L, KeySym::NONE, KeySym::NONE, KeySym::NONE];
        for (i, letter) in (b'a'..=b'z').enumerate() {
            rows[10 + i] = [
                KeySym(letter as u32),
                KeySym((letter - 0x20) as u32),
                KeySym::NONE,
                KeySym::NONE,
            ];
        }
        for (i, digit) in (b'0'..=b'9').enumerate() {
            rows[40 + i] = [KeySym(digit as u32), KeySym::NONE, KeySym::NONE, KeySym::NONE];
        }
        RawKeymap {
            min_keycode: 8,
            symbols_per_key: 4,
            symbols: rows.into_iter().flatten().collect(),
        }
    }

    fn modifier_slots(&self) -> RawModifierSlots {
        let mut slots = RawModifierSlots::default();
        slots.slots[0] = vec![KeyButton(8)];
        slots.slots[2] = vec![KeyButton(9)];
        slots.slots[3] = vec![KeyButton(10)];
        slots
    }

    fn pressed_keys(&self) -> [u8; KEY_BITMAP_LEN] {
        [0; KEY_BITMAP_LEN]
    }

    fn auto_repeat_mask(&self) -> [u8; KEY_BITMAP_LEN] {
        [0xFF; KEY_BITMAP_LEN]
    }

    fn pointer_modifier_state(&self) -> u16 {
        0
    }
}

fn refreshed_translator() -> KeyTranslator {
    let mut translator = KeyTranslator::new(Box::new(NoUnicode), Box::new(NoCompose));
    translator.refresh(&BenchPlatform, &mut BenchKeyState { active: ModifierMask::EMPTY });
    translator
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("refresh");

    group.bench_function("full_keyboard_rebuild", |b| {
        let mut translator = KeyTranslator::new(Box::new(NoUnicode), Box::new(NoCompose));
        let mut key_state = BenchKeyState { active: ModifierMask::EMPTY };
        b.iter(|| translator.refresh(black_box(&BenchPlatform), &mut key_state))
    });

    group.finish();
}

fn bench_translate(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate");
    let translator = refreshed_translator();

    // No modifier adjustment needed (typical per-event cost)
    group.bench_function("plain_letter", |b| {
        let key_state = BenchKeyState { active: ModifierMask::EMPTY };
        b.iter(|| {
            translator.translate(
                black_box(KeyId(b'a' as u32)),
                ModifierMask::EMPTY,
                false,
                &key_state,
            )
        })
    });

    // One bracketed shift adjustment each way
    group.bench_function("shifted_letter", |b| {
        let key_state = BenchKeyState { active: ModifierMask::EMPTY };
        b.iter(|| {
            translator.translate(
                black_box(KeyId(b'A' as u32)),
                ModifierMask::EMPTY,
                false,
                &key_state,
            )
        })
    });

    // Burst of 36 diverse identifiers (simulates fast typing)
    let burst: Vec<KeyId> = (b'a'..=b'z')
        .chain(b'0'..=b'9')
        .map(|c| KeyId(c as u32))
        .collect();
    group.bench_function("burst_36", |b| {
        let key_state = BenchKeyState { active: ModifierMask::EMPTY };
        b.iter(|| {
            burst
                .iter()
                .map(|&id| translator.translate(black_box(id), ModifierMask::EMPTY, false, &key_state))
                .collect::<Vec<_>>()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_refresh, bench_translate);
criterion_main!(benches);
