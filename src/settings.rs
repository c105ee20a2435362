//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web.

use serde::{Deserialize, Serialize};

/// Which synthesized background track plays during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SoundtrackVariant {
    /// Mono base track
    #[default]
    Urgent,
    Punchy,
    Rhythmic,
    MetallicStereo,
    Dynamic,
}

impl SoundtrackVariant {
    pub const ALL: [SoundtrackVariant; 5] = [
        SoundtrackVariant::Urgent,
        SoundtrackVariant::Punchy,
        SoundtrackVariant::Rhythmic,
        SoundtrackVariant::MetallicStereo,
        SoundtrackVariant::Dynamic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundtrackVariant::Urgent => "Urgent",
            SoundtrackVariant::Punchy => "Punchy",
            SoundtrackVariant::Rhythmic => "Rhythmic",
            SoundtrackVariant::MetallicStereo => "Metallic Stereo",
            SoundtrackVariant::Dynamic => "Dynamic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "urgent" | "base" => Some(SoundtrackVariant::Urgent),
            "punchy" => Some(SoundtrackVariant::Punchy),
            "rhythmic" => Some(SoundtrackVariant::Rhythmic),
            "metallicstereo" | "metallic" => Some(SoundtrackVariant::MetallicStereo),
            "dynamic" => Some(SoundtrackVariant::Dynamic),
            _ => None,
        }
    }

    /// File name written by the soundtrack tool
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundtrackVariant::Urgent => "urgent_bgm.wav",
            SoundtrackVariant::Punchy => "urgent_bgm_punchy.wav",
            SoundtrackVariant::Rhythmic => "urgent_bgm_rhythmic.wav",
            SoundtrackVariant::MetallicStereo => "urgent_bgm_metallic_stereo.wav",
            SoundtrackVariant::Dynamic => "urgent_bgm_dynamic.wav",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
    /// Background track
    pub soundtrack: SoundtrackVariant,

    // === HUD ===
    /// Show the movement hint at the start of a run
    pub show_control_hint: bool,

    // === Accessibility ===
    /// Reduced motion (skip the halo flash)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 0.6,
            muted: false,
            soundtrack: SoundtrackVariant::Urgent,

            show_control_hint: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Gain applied to the looping soundtrack
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.music_volume * self.master_volume).clamp(0.0, 1.0)
        }
    }

    /// Gain applied to sound effects
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.sfx_volume * self.master_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective halo flash (respects reduced_motion)
    pub fn effective_halo_flash(&self) -> bool {
        !self.reduced_motion
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "airdrop_survival_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_music_volume() {
        let settings = Settings::default();
        assert!((settings.effective_music_volume() - 0.6).abs() < 1e-6);
        assert_eq!(settings.soundtrack, SoundtrackVariant::Urgent);
    }

    #[test]
    fn test_muted_silences_everything() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effective_music_volume(), 0.0);
        assert_eq!(settings.effective_sfx_volume(), 0.0);
    }

    #[test]
    fn test_variant_names_round_trip() {
        for variant in SoundtrackVariant::ALL {
            assert_eq!(SoundtrackVariant::from_str(variant.as_str()), Some(variant));
        }
        assert_eq!(
            SoundtrackVariant::from_str("metallic_stereo"),
            Some(SoundtrackVariant::MetallicStereo)
        );
        assert_eq!(SoundtrackVariant::from_str("loud"), None);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"muted":true}"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.music_volume, 0.6);
        assert!(settings.show_control_hint);
    }
}
