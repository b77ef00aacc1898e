use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub click: ClickConfig,
    pub overlay: OverlayConfig,
    pub hotkey: HotkeyConfig,
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

/// Настройки клика: скорость и относительная позиция "большой печеньки"
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClickConfig {
    pub cps: u32,
    pub relative_x: f64,
    pub relative_y: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OverlayConfig {
    pub enabled: bool,
    pub size_px: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HotkeyConfig {
    pub stop_key: String,
    pub device_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowConfig {
    pub backend: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                filter: "cclicker_rust=info".to_string(),
            },
            click: ClickConfig {
                cps: 15,
                relative_x: 0.15,
                relative_y: 0.39,
            },
            overlay: OverlayConfig {
                enabled: true,
                size_px: 40,
            },
            hotkey: HotkeyConfig {
                stop_key: "f1".to_string(),
                device_path: "auto".to_string(),
            },
            window: WindowConfig {
                backend: "auto".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("CLICKER_"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация настроек клика: rate > 0 и доли в пределах [0,1]
        // проверяются здесь, на границе, а не внутри ClickEngine
        if self.click.cps < 1 {
            anyhow::bail!("cps должно быть минимум 1");
        }

        if !(0.0..=1.0).contains(&self.click.relative_x) {
            anyhow::bail!(
                "relative_x должно быть в диапазоне [0, 1], получено {}",
                self.click.relative_x
            );
        }

        if !(0.0..=1.0).contains(&self.click.relative_y) {
            anyhow::bail!(
                "relative_y должно быть в диапазоне [0, 1], получено {}",
                self.click.relative_y
            );
        }

        // Валидация оверлея
        if self.overlay.size_px < 16 {
            anyhow::bail!("size_px оверлея должно быть минимум 16");
        }

        // Валидация стоп-клавиши
        if self.hotkey.stop_key.is_empty() {
            anyhow::bail!("stop_key не может быть пустой");
        }

        if crate::utils::key_names::key_code_by_name(&self.hotkey.stop_key).is_none() {
            anyhow::bail!("Неизвестная стоп-клавиша: {}", self.hotkey.stop_key);
        }

        // Валидация бэкенда окон
        match self.window.backend.as_str() {
            "auto" | "xdotool" | "wmctrl" => {}
            _ => anyhow::bail!("Неверный бэкенд окон: {}", self.window.backend),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_cps_rejected() {
        let mut config = Config::default();
        config.click.cps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_relative_position_out_of_range_rejected() {
        let mut config = Config::default();
        config.click.relative_x = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.click.relative_y = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_stop_key_rejected() {
        let mut config = Config::default();
        config.hotkey.stop_key = "hyper".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let mut config = Config::default();
        config.window.backend = "kwin".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[click]\ncps = 25\nrelative_x = 0.5\n\n[overlay]\nenabled = false\nsize_px = 40"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.click.cps, 25);
        assert_eq!(config.click.relative_x, 0.5);
        // Не указанные значения берутся из умолчаний
        assert_eq!(config.click.relative_y, 0.39);
        assert!(!config.overlay.enabled);
        assert_eq!(config.hotkey.stop_key, "f1");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load("/non/existent/clicker.toml").unwrap();
        assert_eq!(config.click.cps, 15);
        assert!(config.overlay.enabled);
    }
}
