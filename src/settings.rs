//! Simulation tuning and player preferences
//!
//! Loaded from a JSON file on native and from LocalStorage in the browser.
//! Every field has a default, so partial documents are accepted.

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Variant;

/// One-time change of gravity and bounce coefficient after a fixed elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityShiftConfig {
    /// Fires on the first tick whose elapsed time exceeds this (ms)
    pub after_ms: f64,
    /// New gravity magnitude (sign of each ball is kept)
    pub gravity: f32,
    /// New wall bounce coefficient
    pub bounce: f32,
}

/// Physics tunables for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Which ball set is seeded
    pub variant: Variant,
    /// Window size; the arena is centered in it
    pub window_width: f32,
    pub window_height: f32,
    pub arena_radius: f32,
    /// Shared by every ball, never per-ball
    pub ball_radius: f32,
    /// Launch speed (px/tick)
    pub speed: f32,
    /// Initial gravity magnitude (px/tick²)
    pub gravity: f32,
    /// Initial wall bounce coefficient (negative, |b| > 1 gains energy)
    pub bounce: f32,
    pub gravity_shift: Option<GravityShiftConfig>,
    /// Clone a ball on every Nth wall bounce
    pub clone_every: Option<u32>,
    /// Different-kind balls that overlap are both removed
    pub annihilation: bool,
    /// Reset command re-seeds the run while running
    pub allow_reset: bool,
    /// RNG seed for launch momentum
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::gems()
    }
}

impl SimConfig {
    /// Diamond vs emerald: gravity shift, cloning, annihilation, reset
    pub fn gems() -> Self {
        Self {
            variant: Variant::Gems,
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            arena_radius: ARENA_RADIUS,
            ball_radius: BALL_RADIUS,
            speed: SPEED,
            gravity: INITIAL_GRAVITY,
            bounce: INITIAL_BOUNCE,
            gravity_shift: Some(GravityShiftConfig {
                after_ms: GRAVITY_CHANGE_MS,
                gravity: UPDATED_GRAVITY,
                bounce: UPDATED_BOUNCE,
            }),
            clone_every: Some(CLONE_EVERY),
            annihilation: true,
            allow_reset: true,
            seed: 0x5eed,
        }
    }

    /// Country flags around the rim: constant gravity, no cloning or annihilation
    pub fn flags() -> Self {
        Self {
            variant: Variant::Flags,
            gravity_shift: None,
            clone_every: None,
            annihilation: false,
            allow_reset: false,
            ..Self::gems()
        }
    }

    /// Preset defaults for a variant
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Gems => Self::gems(),
            Variant::Flags => Self::flags(),
        }
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("window_width", self.window_width),
            ("window_height", self.window_height),
            ("arena_radius", self.arena_radius),
            ("ball_radius", self.ball_radius),
            ("speed", self.speed),
            ("gravity", self.gravity),
            ("bounce", self.bounce),
        ] {
            ensure!(value.is_finite(), "{name} must be finite, got {value}");
        }
        ensure!(
            self.window_width > 0.0 && self.window_height > 0.0,
            "window size must be positive, got {}x{}",
            self.window_width,
            self.window_height
        );
        ensure!(self.ball_radius > 0.0, "ball_radius must be positive");
        ensure!(
            self.arena_radius > self.ball_radius,
            "arena_radius ({}) must exceed ball_radius ({})",
            self.arena_radius,
            self.ball_radius
        );
        ensure!(self.speed >= 0.0, "speed must not be negative");
        ensure!(
            self.bounce < 0.0,
            "bounce coefficient must be negative, got {}",
            self.bounce
        );
        if let Some(shift) = &self.gravity_shift {
            ensure!(
                shift.after_ms.is_finite() && shift.after_ms >= 0.0,
                "gravity_shift.after_ms must be finite and not negative, got {}",
                shift.after_ms
            );
            // Each ball keeps its own sign; the shift only sets the magnitude
            ensure!(
                shift.gravity.is_finite() && shift.gravity >= 0.0,
                "gravity_shift.gravity must be a finite magnitude, got {}",
                shift.gravity
            );
            ensure!(
                shift.bounce.is_finite() && shift.bounce < 0.0,
                "gravity_shift.bounce must be finite and negative, got {}",
                shift.bounce
            );
        }
        if let Some(n) = self.clone_every {
            ensure!(n > 0, "clone_every must be at least 1");
        }
        Ok(())
    }
}

/// Rendering preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Drop shadow offset (px)
    pub shadow_offset: f32,
    /// Arena ring stroke width (px)
    pub ring_width: f32,
    /// Draw country codes on flag balls
    pub show_labels: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            shadow_offset: SHADOW_OFFSET,
            ring_width: RING_WIDTH,
            show_labels: true,
        }
    }
}

/// Settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sim: SimConfig,
    pub display: DisplayConfig,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            display: DisplayConfig::default(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Create settings from a variant preset
    pub fn from_preset(variant: Variant) -> Self {
        Self {
            sim: SimConfig::for_variant(variant),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let settings: Self = serde_json::from_str(json).context("parsing settings JSON")?;
        settings.sim.validate().context("invalid simulation config")?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "gem_bounce_settings";

    /// Load settings from LocalStorage, falling back to the variant preset
    #[cfg(target_arch = "wasm32")]
    pub fn load(variant: Variant) -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(mut settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        if settings.sim.variant != variant {
                            settings.sim = SimConfig::for_variant(variant);
                        }
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e:#}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::from_preset(variant)
    }

    /// Save settings to LocalStorage
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

    /// Effective sound effect volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }
}
