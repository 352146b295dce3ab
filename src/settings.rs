use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted equalizer settings: one dB gain per band plus the two tuning
/// knobs the host exposes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EqSettings {
    pub gains: [i32; 10],
    pub filter_length: usize,
    pub frame_rate: u32,
}

impl Default for EqSettings {
    fn default() -> Self {
        Self {
            gains: [0; 10],
            filter_length: 100,
            frame_rate: 15,
        }
    }
}

impl EqSettings {
    pub fn validate(&self) -> Result<(), String> {
        for (i, gain) in self.gains.iter().enumerate() {
            if !(-10..=10).contains(gain) {
                return Err(format!(
                    "Band {} gain {} dB out of range [-10, 10]",
                    i, gain
                ));
            }
        }
        if !(1..=500).contains(&self.filter_length) {
            return Err(format!(
                "Filter length {} out of range [1, 500]",
                self.filter_length
            ));
        }
        if !(15..=100).contains(&self.frame_rate) {
            return Err(format!(
                "Frame rate {} out of range [15, 100]",
                self.frame_rate
            ));
        }
        Ok(())
    }
}

pub fn get_settings_path() -> PathBuf {
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".octaveq").join("settings.json")
}

pub fn save_settings(settings: &EqSettings) {
    if let Ok(serialized) = serde_json::to_string_pretty(settings) {
        let settings_path = get_settings_path();
        if let Some(parent) = settings_path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Err(e) = fs::write(settings_path, serialized) {
            eprintln!("Failed to save settings: {}", e);
        }
    }
}

pub fn load_settings() -> Option<EqSettings> {
    let settings_path = get_settings_path();
    if let Ok(contents) = fs::read_to_string(settings_path) {
        if let Ok(settings) = serde_json::from_str::<EqSettings>(&contents) {
            return Some(settings);
        }
    }
    None
}
