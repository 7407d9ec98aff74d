use serde::{Deserialize, Serialize};

fn default_backend_url() -> String {
    "http://127.0.0.1:8900/calculate".to_string()
}

fn default_stroke_width() -> u32 {
    3
}

fn default_overlay_delay_ms() -> u64 {
    1000
}

fn default_toasts() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    3.5
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Endpoint of the recognition/evaluation service.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Pen stroke width in pixels.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: u32,
    /// Delay between submission and the appearance of result overlays.
    #[serde(default = "default_overlay_delay_ms")]
    pub overlay_delay_ms: u64,
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Enable toast notifications in the UI.
    #[serde(default = "default_toasts")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            stroke_width: default_stroke_width(),
            overlay_delay_ms: default_overlay_delay_ms(),
            debug_logging: false,
            enable_toasts: default_toasts(),
            toast_duration: default_toast_duration(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn overlay_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.overlay_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        let settings = Settings::load(path.to_str().expect("path")).expect("load");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_fills_remaining_fields_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"backend_url": "http://example.test/eval"}"#).expect("write");

        let settings = Settings::load(path.to_str().expect("path")).expect("load");
        assert_eq!(settings.backend_url, "http://example.test/eval");
        assert_eq!(settings.stroke_width, 3);
        assert_eq!(settings.overlay_delay_ms, 1000);
        assert!(!settings.debug_logging);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        let mut settings = Settings::default();
        settings.stroke_width = 5;
        settings.debug_logging = true;

        settings.save(path.to_str().expect("path")).expect("save");
        let loaded = Settings::load(path.to_str().expect("path")).expect("load");
        assert_eq!(loaded, settings);
    }
}
