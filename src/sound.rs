//! Sound effects.
//!
//! Assets are validated once at startup; a missing file is a configuration
//! error. After that, playback problems are logged and the game carries on
//! silently.

use crate::config::ConfigError;
use crate::spin::SpinResult;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Payout at or above this many times the bet plays the big-win effect.
pub const BIG_WIN_FACTOR: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    Spin,
    Win,
    BigWin,
    Jackpot,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 4] =
        [SoundEffect::Spin, SoundEffect::Win, SoundEffect::BigWin, SoundEffect::Jackpot];

    pub const fn file_name(self) -> &'static str {
        match self {
            SoundEffect::Spin => "spin.wav",
            SoundEffect::Win => "win.wav",
            SoundEffect::BigWin => "bigwin.wav",
            SoundEffect::Jackpot => "jackpot.wav",
        }
    }

    /// Effect announcing a settled spin, if any.
    pub fn for_result(result: &SpinResult) -> Option<SoundEffect> {
        if result.is_jackpot() {
            Some(SoundEffect::Jackpot)
        } else if result.payout >= result.bet.saturating_mul(BIG_WIN_FACTOR) && result.payout > 0 {
            Some(SoundEffect::BigWin)
        } else if result.is_win() {
            Some(SoundEffect::Win)
        } else {
            None
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SoundError {
    #[error("no clip loaded for {0:?}")]
    NotLoaded(SoundEffect),
    #[error("playback failed: {0}")]
    Playback(#[from] io::Error),
}

/// Decoded metadata of a WAV asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clip {
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: u32,
}

impl Clip {
    pub fn open(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingSoundAsset { path: path.to_path_buf() });
        }
        let reader = hound::WavReader::open(path).map_err(|e| ConfigError::InvalidSoundAsset {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let spec = reader.spec();
        Ok(Self {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            frames: reader.duration(),
        })
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames as f64 / self.sample_rate as f64)
    }
}

/// Output device for sound effects.
pub trait SoundBackend: fmt::Debug {
    fn play(&mut self, effect: SoundEffect, clip: &Clip) -> Result<(), SoundError>;
}

/// Rings the terminal bell for wins. The bell is a control character, so it
/// does not disturb the drawn frame.
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TerminalBell<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + fmt::Debug> SoundBackend for TerminalBell<W> {
    fn play(&mut self, effect: SoundEffect, _clip: &Clip) -> Result<(), SoundError> {
        let rings = match effect {
            SoundEffect::Spin => 0,
            SoundEffect::Win => 1,
            SoundEffect::BigWin => 2,
            SoundEffect::Jackpot => 3,
        };
        for _ in 0..rings {
            self.out.write_all(b"\x07")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Plays effects through a backend, or does nothing when disabled.
pub struct SoundManager {
    clips: HashMap<SoundEffect, Clip>,
    backend: Option<Box<dyn SoundBackend>>,
    failures: u32,
}

impl fmt::Debug for SoundManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoundManager")
            .field("enabled", &self.enabled())
            .field("clips", &self.clips.len())
            .field("failures", &self.failures)
            .finish()
    }
}

impl Default for SoundManager {
    fn default() -> Self {
        Self::disabled()
    }
}

impl SoundManager {
    pub fn disabled() -> Self {
        Self { clips: HashMap::new(), backend: None, failures: 0 }
    }

    /// Load every effect from `dir`. Any missing or unreadable asset is fatal.
    pub fn load(dir: &Path, backend: Box<dyn SoundBackend>) -> Result<Self, ConfigError> {
        let mut clips = HashMap::with_capacity(SoundEffect::ALL.len());
        for effect in SoundEffect::ALL {
            let clip = Clip::open(&dir.join(effect.file_name()))?;
            debug!(?effect, frames = clip.frames, "loaded sound effect");
            clips.insert(effect, clip);
        }
        info!(dir = %dir.display(), "sound effects loaded");
        Ok(Self { clips, backend: Some(backend), failures: 0 })
    }

    pub fn enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Number of playback failures swallowed so far.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn play(&mut self, effect: SoundEffect) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        let outcome = match self.clips.get(&effect) {
            Some(clip) => backend.play(effect, clip),
            None => Err(SoundError::NotLoaded(effect)),
        };
        if let Err(err) = outcome {
            self.failures += 1;
            warn!(?effect, %err, "sound playback failed");
        }
    }
}
