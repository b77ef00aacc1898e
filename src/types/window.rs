use std::fmt;

/// Непрозрачный идентификатор окна (X11 window id).
///
/// Просто значение, копируемое между компонентами: не подсчитывается,
/// не отслеживается. Если окно закрылось, хэндл молча устаревает и
/// следующая операция с ним вернёт ошибку бэкенда.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

impl WindowHandle {
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Разобрать идентификатор из вывода утилит: wmctrl печатает hex
    /// ("0x04000007"), xdotool - десятичное число
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some(hex) = raw.strip_prefix("0x") {
            u64::from_str_radix(hex, 16).ok().map(Self)
        } else {
            raw.parse::<u64>().ok().map(Self)
        }
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// Информация о найденном окне
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    pub title: String,
}

impl WindowInfo {
    pub fn new(handle: WindowHandle, title: String) -> Self {
        Self { handle, title }
    }
}

impl fmt::Display for WindowInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ({})", self.title, self.handle)
    }
}

/// Геометрия окна в экранных координатах
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}
