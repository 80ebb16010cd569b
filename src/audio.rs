//! Bounce audio
//!
//! Sound selection is platform-free; playback uses procedurally generated
//! Web Audio tones on wasm32, so no sound files are needed.

use crate::sim::{BallKind, SimEvent};

/// Voices started per tick at most; further bounces in the same tick are silent
pub const MAX_VOICES_PER_TICK: usize = 8;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Diamond hits the wall - bright ping
    Pling,
    /// Emerald hits the wall - plucked harp
    Harp,
}

impl SoundEffect {
    /// Sound for a wall bounce of this kind; flags are silent
    pub fn for_kind(kind: BallKind) -> Option<Self> {
        match kind {
            BallKind::Diamond => Some(SoundEffect::Pling),
            BallKind::Emerald => Some(SoundEffect::Harp),
            BallKind::Flag(_) => None,
        }
    }

    /// Per-effect gain; the pling is played at half volume
    pub fn volume_scale(&self) -> f32 {
        match self {
            SoundEffect::Pling => 0.5,
            SoundEffect::Harp => 1.0,
        }
    }
}

/// Sounds to play for one tick's events, capped at `MAX_VOICES_PER_TICK`
pub fn sounds_for_events(events: &[SimEvent]) -> impl Iterator<Item = SoundEffect> + '_ {
    events
        .iter()
        .filter_map(|event| match event {
            SimEvent::WallBounce { kind, .. } => SoundEffect::for_kind(*kind),
            _ => None,
        })
        .take(MAX_VOICES_PER_TICK)
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    /// Audio manager
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        /// Combined master/sfx gain, 0 when muted
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume: 0.8 }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Set the effective sound effect volume (0.0 - 1.0)
        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume * effect.volume_scale();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Pling => self.play_pling(ctx, vol),
                SoundEffect::Harp => self.play_harp(ctx, vol),
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Pling - short high sine with a faint octave shimmer
        fn play_pling(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 1318.5, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.4, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.3).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 2637.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.1, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }

        /// Harp - rolled major triad, plucked triangle tones
        fn play_harp(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [523.25, 659.25, 783.99].iter().enumerate() {
                let delay = i as f64 * 0.04;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.7).ok();
                }
            }
        }
    }
}
