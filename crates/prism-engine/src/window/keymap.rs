use winit::keyboard::{KeyCode, PhysicalKey};

use crate::input::Key;

/// Maps a physical key to an engine `Key` plus its winit `KeyCode` index.
///
/// The index is stable across platforms; it is not an OS scancode.
pub(crate) fn map_key(pk: PhysicalKey) -> (Key, u32) {
    match pk {
        PhysicalKey::Code(code) => {
            let key = match code {
                KeyCode::Escape => Key::Escape,
                KeyCode::Enter => Key::Enter,
                KeyCode::Tab => Key::Tab,
                KeyCode::Backspace => Key::Backspace,
                KeyCode::Space => Key::Space,

                KeyCode::ArrowUp => Key::ArrowUp,
                KeyCode::ArrowDown => Key::ArrowDown,
                KeyCode::ArrowLeft => Key::ArrowLeft,
                KeyCode::ArrowRight => Key::ArrowRight,

                KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
                KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
                KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
                KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,

                other => letter(other).unwrap_or(Key::Unknown(other as u32)),
            };

            (key, code as u32)
        }

        // NativeKeyCode has no stable numeric form.
        PhysicalKey::Unidentified(_) => (Key::Unknown(0), 0),
    }
}

fn letter(code: KeyCode) -> Option<Key> {
    const LETTERS: [(KeyCode, Key); 26] = [
        (KeyCode::KeyA, Key::A), (KeyCode::KeyB, Key::B), (KeyCode::KeyC, Key::C),
        (KeyCode::KeyD, Key::D), (KeyCode::KeyE, Key::E), (KeyCode::KeyF, Key::F),
        (KeyCode::KeyG, Key::G), (KeyCode::KeyH, Key::H), (KeyCode::KeyI, Key::I),
        (KeyCode::KeyJ, Key::J), (KeyCode::KeyK, Key::K), (KeyCode::KeyL, Key::L),
        (KeyCode::KeyM, Key::M), (KeyCode::KeyN, Key::N), (KeyCode::KeyO, Key::O),
        (KeyCode::KeyP, Key::P), (KeyCode::KeyQ, Key::Q), (KeyCode::KeyR, Key::R),
        (KeyCode::KeyS, Key::S), (KeyCode::KeyT, Key::T), (KeyCode::KeyU, Key::U),
        (KeyCode::KeyV, Key::V), (KeyCode::KeyW, Key::W), (KeyCode::KeyX, Key::X),
        (KeyCode::KeyY, Key::Y), (KeyCode::KeyZ, Key::Z),
    ];

    LETTERS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|&(_, key)| key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::NativeKeyCode;

    #[test]
    fn escape_maps_with_keycode_index() {
        let (key, code) = map_key(PhysicalKey::Code(KeyCode::Escape));
        assert_eq!(key, Key::Escape);
        assert_eq!(code, KeyCode::Escape as u32);
    }

    #[test]
    fn letters_map() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyW)).0, Key::W);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyA)).0, Key::A);
    }

    #[test]
    fn both_shift_keys_are_shift() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ShiftLeft)).0, Key::Shift);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ShiftRight)).0, Key::Shift);
    }

    #[test]
    fn unmapped_key_keeps_its_code() {
        let (key, code) = map_key(PhysicalKey::Code(KeyCode::F5));
        assert_eq!(key, Key::Unknown(KeyCode::F5 as u32));
        assert_eq!(code, KeyCode::F5 as u32);
    }

    #[test]
    fn unidentified_key_is_unknown_zero() {
        let (key, code) = map_key(PhysicalKey::Unidentified(NativeKeyCode::Unidentified));
        assert_eq!((key, code), (Key::Unknown(0), 0));
    }
}
