use evdev::KeyCode;

/// Соответствие имён клавиш из конфигурации их evdev-кодам.
/// Покрывает клавиши, которые осмысленно назначать стоп-клавишей
const KEY_TABLE: &[(&str, KeyCode)] = &[
    ("f1", KeyCode::KEY_F1),
    ("f2", KeyCode::KEY_F2),
    ("f3", KeyCode::KEY_F3),
    ("f4", KeyCode::KEY_F4),
    ("f5", KeyCode::KEY_F5),
    ("f6", KeyCode::KEY_F6),
    ("f7", KeyCode::KEY_F7),
    ("f8", KeyCode::KEY_F8),
    ("f9", KeyCode::KEY_F9),
    ("f10", KeyCode::KEY_F10),
    ("f11", KeyCode::KEY_F11),
    ("f12", KeyCode::KEY_F12),
    ("esc", KeyCode::KEY_ESC),
    ("pause", KeyCode::KEY_PAUSE),
    ("scrolllock", KeyCode::KEY_SCROLLLOCK),
    ("insert", KeyCode::KEY_INSERT),
    ("home", KeyCode::KEY_HOME),
    ("end", KeyCode::KEY_END),
];

/// Получить evdev-код по имени клавиши (регистронезависимо)
pub fn key_code_by_name(name: &str) -> Option<u16> {
    let name_lower = name.to_lowercase();
    KEY_TABLE
        .iter()
        .find(|(key_name, _)| *key_name == name_lower)
        .map(|(_, code)| code.0)
}

/// Получить имя по evdev-коду - для логирования
#[allow(dead_code)]
pub fn key_name_by_code(code: u16) -> Option<&'static str> {
    KEY_TABLE
        .iter()
        .find(|(_, key_code)| key_code.0 == code)
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_resolve() {
        assert_eq!(key_code_by_name("f1"), Some(KeyCode::KEY_F1.0));
        assert_eq!(key_code_by_name("esc"), Some(KeyCode::KEY_ESC.0));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(key_code_by_name("F1"), key_code_by_name("f1"));
        assert_eq!(key_code_by_name("ScrollLock"), key_code_by_name("scrolllock"));
    }

    #[test]
    fn test_unknown_key_is_none() {
        assert_eq!(key_code_by_name("hyper"), None);
        assert_eq!(key_code_by_name(""), None);
    }

    #[test]
    fn test_roundtrip() {
        let code = key_code_by_name("pause").unwrap();
        assert_eq!(key_name_by_code(code), Some("pause"));
    }
}
