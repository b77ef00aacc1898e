use once_cell::sync::Lazy;
use regex::Regex;

/// Грамматика динамического заголовка Cookie Clicker:
/// "<count> [<unit>] cookies - Cookie Clicker", регистронезависимо,
/// с якорями по обоим концам.
///
/// <count> - чисто лексический паттерн [0-9,.]+ без числовой валидации:
/// ",,." тоже проходит. Это намеренно - легаси-поведение принимает
/// синтаксически странные, но визуально числовые строки, и ужесточать
/// его до настоящего числового формата нельзя.
static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[0-9,.]+ +(?:(?:million|billion|trillion|quadrillion|quintillion) +)?cookies *- *cookie clicker$",
    )
    .expect("паттерн заголовка должен компилироваться")
});

/// Проверить, соответствует ли заголовок окну Cookie Clicker
pub fn is_cookie_clicker_title(title: &str) -> bool {
    TITLE_RE.is_match(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_cookie_count() {
        assert!(is_cookie_clicker_title("245 cookies - Cookie Clicker"));
        assert!(is_cookie_clicker_title("1 cookies - Cookie Clicker"));
        assert!(is_cookie_clicker_title("999 cookies - Cookie Clicker"));
    }

    #[test]
    fn test_count_with_commas() {
        assert!(is_cookie_clicker_title("1,234 cookies - Cookie Clicker"));
        assert!(is_cookie_clicker_title("1,234,567 cookies - Cookie Clicker"));
    }

    #[test]
    fn test_count_with_decimals_and_units() {
        assert!(is_cookie_clicker_title("72.197 million cookies - Cookie Clicker"));
        assert!(is_cookie_clicker_title("13.564 billion cookies - Cookie Clicker"));
        assert!(is_cookie_clicker_title("6.432 trillion cookies - Cookie Clicker"));
        assert!(is_cookie_clicker_title("1.5 quadrillion cookies - Cookie Clicker"));
        assert!(is_cookie_clicker_title("2.3 quintillion cookies - Cookie Clicker"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_cookie_clicker_title("245 COOKIES - Cookie Clicker"));
        assert!(is_cookie_clicker_title("1.5 MILLION cookies - Cookie Clicker"));
        assert!(is_cookie_clicker_title("245 cookies - COOKIE CLICKER"));
    }

    #[test]
    fn test_invalid_titles() {
        assert!(!is_cookie_clicker_title("Cookie Clicker"));
        assert!(!is_cookie_clicker_title("Steam"));
        assert!(!is_cookie_clicker_title("Google Chrome"));
        assert!(!is_cookie_clicker_title(""));
        assert!(!is_cookie_clicker_title("cookies - Cookie Clicker"));
        assert!(!is_cookie_clicker_title("abc cookies - Cookie Clicker"));
    }

    #[test]
    fn test_unknown_unit_rejected() {
        assert!(!is_cookie_clicker_title("1.5 gazillion cookies - Cookie Clicker"));
    }

    #[test]
    fn test_edge_cases() {
        // Повторные пробелы допустимы (грамматика намеренно ослаблена)
        assert!(is_cookie_clicker_title("245  cookies - Cookie Clicker"));
        assert!(is_cookie_clicker_title("245 cookies -Cookie Clicker"));
        assert!(is_cookie_clicker_title("245 cookies- Cookie Clicker"));
        // Без дефиса совпадения нет
        assert!(!is_cookie_clicker_title("245 cookies Cookie Clicker"));
        // Неверный суффикс: заголовок обязан кончаться на "Cookie Clicker"
        assert!(!is_cookie_clicker_title("245 cookies - Cookie"));
        assert!(!is_cookie_clicker_title("245 cookies - Cookie Clicker 2"));
    }

    #[test]
    fn test_count_is_purely_lexical() {
        // Числовая валидация отсутствует намеренно
        assert!(is_cookie_clicker_title(",,. cookies - Cookie Clicker"));
        assert!(is_cookie_clicker_title("1,2,3.4.5 cookies - Cookie Clicker"));
    }
}
