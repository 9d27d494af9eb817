//! # Render Loop Policy
//!
//! Decides when the next redraw is requested. Frame production
//! ([`crate::slicing::FrameAssembler`]) knows nothing about pacing; the
//! application asks this policy after every presented frame.

use std::time::{Duration, Instant};

use winit::event_loop::ControlFlow;

/// How often frames are produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FramePacing {
    /// Redraw as soon as the previous frame is done.
    #[default]
    Continuous,
    /// Redraw at most once per interval.
    FixedRate(Duration),
}

/// Pacing state of the event loop.
#[derive(Debug, Clone)]
pub struct RenderLoop {
    pacing: FramePacing,
    last_frame: Option<Instant>,
    frames: u64,
}

impl RenderLoop {
    pub fn new(pacing: FramePacing) -> Self {
        Self {
            pacing,
            last_frame: None,
            frames: 0,
        }
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    /// Records that a frame was presented at `now`.
    pub fn frame_presented(&mut self, now: Instant) {
        self.last_frame = Some(now);
        self.frames += 1;
    }

    /// When the next frame is due, if pacing imposes one.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.pacing {
            FramePacing::Continuous => None,
            FramePacing::FixedRate(interval) => self.last_frame.map(|last| last + interval),
        }
    }

    /// Whether a redraw should be requested at `now`.
    pub fn should_redraw(&self, now: Instant) -> bool {
        self.next_deadline().map_or(true, |deadline| now >= deadline)
    }

    /// Control flow for the event loop while waiting at `now`.
    pub fn control_flow(&self, now: Instant) -> ControlFlow {
        match self.next_deadline() {
            Some(deadline) if deadline > now => ControlFlow::WaitUntil(deadline),
            _ => ControlFlow::Poll,
        }
    }
}

/// Session start time, recorded once.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    start: Instant,
}

impl SessionClock {
    pub fn start() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { start }
    }

    /// Milliseconds since the session started.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms_at(Instant::now())
    }

    /// Milliseconds between the session start and `now`; never negative.
    pub fn elapsed_ms_at(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.start).as_secs_f64() * 1000.0
    }
}
