//! Playback state and the playback-time cursor
//!
//! No audio device is driven from here. [`PlaybackClock`] tracks where a
//! player of the clip would be, which is all the extractor needs to pick the
//! frame for a tick. Every time-dependent method has an `*_at` form taking the
//! current [`Instant`] so behaviour can be tested without sleeping.

use std::fmt;
use std::time::{Duration, Instant};

/// Explicit playback status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// Not playing; the offset is back at the start
    Stopped,
    /// Playback halted, position retained
    Paused,
    /// Active playback in progress
    Playing,
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "Stopped"),
            Self::Paused => write!(f, "Paused"),
            Self::Playing => write!(f, "Playing"),
        }
    }
}

impl PlaybackStatus {
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Wall-clock playback cursor for a clip of known duration.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    duration: Duration,
    looping: bool,
    volume: f32,
    state: PlaybackStatus,
    /// Position reached before `started_at`.
    elapsed: Duration,
    started_at: Option<Instant>,
}

impl PlaybackClock {
    /// A stopped clock for a clip lasting `duration`.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            looping: false,
            volume: 100.0,
            state: PlaybackStatus::Stopped,
            elapsed: Duration::ZERO,
            started_at: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Volume in `[0, 100]`.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set the volume, clamped to `[0, 100]`.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 100.0)
        };
    }

    fn raw_elapsed_at(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(start) => self.elapsed + now.saturating_duration_since(start),
            None => self.elapsed,
        }
    }

    /// A non-looping clip that has played past its end.
    fn finished_at(&self, now: Instant) -> bool {
        self.state == PlaybackStatus::Playing
            && !self.looping
            && self.raw_elapsed_at(now) >= self.duration
    }

    pub fn status_at(&self, now: Instant) -> PlaybackStatus {
        if self.finished_at(now) {
            PlaybackStatus::Stopped
        } else {
            self.state
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status_at(Instant::now())
    }

    /// Position within the clip. Wraps when looping; zero once a non-looping
    /// clip has ended.
    pub fn position_at(&self, now: Instant) -> Duration {
        let raw = self.raw_elapsed_at(now);
        if raw < self.duration {
            return raw;
        }
        if self.duration.is_zero() || !self.looping {
            return if self.state == PlaybackStatus::Playing {
                Duration::ZERO
            } else {
                raw.min(self.duration)
            };
        }
        Duration::from_secs_f64(raw.as_secs_f64() % self.duration.as_secs_f64())
    }

    /// Seconds since the start of the clip.
    pub fn playing_offset_at(&self, now: Instant) -> f64 {
        self.position_at(now).as_secs_f64()
    }

    pub fn playing_offset(&self) -> f64 {
        self.playing_offset_at(Instant::now())
    }

    pub fn play_at(&mut self, now: Instant) {
        let finished = self.finished_at(now);
        if self.state == PlaybackStatus::Playing && !finished {
            return;
        }
        if finished {
            self.elapsed = Duration::ZERO;
        }
        self.started_at = Some(now);
        self.state = PlaybackStatus::Playing;
    }

    pub fn play(&mut self) {
        self.play_at(Instant::now());
    }

    pub fn pause_at(&mut self, now: Instant) {
        if self.status_at(now) != PlaybackStatus::Playing {
            return;
        }
        self.elapsed = self.position_at(now);
        self.started_at = None;
        self.state = PlaybackStatus::Paused;
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    /// Stop and rewind to the start.
    pub fn stop(&mut self) {
        self.state = PlaybackStatus::Stopped;
        self.elapsed = Duration::ZERO;
        self.started_at = None;
    }

    /// Pause when playing, play otherwise.
    pub fn toggle_at(&mut self, now: Instant) {
        if self.status_at(now).is_playing() {
            self.pause_at(now);
        } else {
            self.play_at(now);
        }
    }

    pub fn toggle(&mut self) {
        self.toggle_at(Instant::now());
    }

    /// Move the cursor to `position`, clamped to the clip duration.
    ///
    /// A stopped clock becomes paused at the new position.
    pub fn seek_at(&mut self, position: Duration, now: Instant) {
        self.elapsed = position.min(self.duration);
        match self.status_at(now) {
            PlaybackStatus::Playing => self.started_at = Some(now),
            PlaybackStatus::Paused | PlaybackStatus::Stopped => {
                self.started_at = None;
                self.state = PlaybackStatus::Paused;
            }
        }
    }

    pub fn seek(&mut self, position: Duration) {
        self.seek_at(position, Instant::now());
    }
}
