//! Fixed-rate frame loop
//!
//! Drives `Game::frame` + render at a target rate until stopped. Only one
//! loop may run per driver at a time; a second `run` call while the first is
//! active is rejected rather than spawning a duplicate tick source.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::game::{Game, Renderer};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DriverError {
    #[error("frame loop already running")]
    AlreadyRunning,
}

/// Stops a running frame loop from anywhere (other threads, teardown hooks)
#[derive(Debug, Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Marks the loop as stopped however `run` exits
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct FrameDriver {
    frame_time: Duration,
    running: Arc<AtomicBool>,
}

impl FrameDriver {
    /// Driver targeting `fps` frames per second
    pub fn new(fps: u32) -> Self {
        Self {
            frame_time: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            running: self.running.clone(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run frames until stopped or until `on_frame` breaks.
    ///
    /// `on_frame` runs before each tick with mutable access to the game
    /// (menu actions, autopilot input). Returns the number of frames run.
    pub fn run<F>(
        &self,
        game: &mut Game,
        renderer: &mut dyn Renderer,
        mut on_frame: F,
    ) -> Result<u64, DriverError>
    where
        F: FnMut(&mut Game) -> ControlFlow<()>,
    {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("Refusing to start a second frame loop");
            return Err(DriverError::AlreadyRunning);
        }
        let _guard = RunGuard(&self.running);

        let start = Instant::now();
        let mut frames = 0u64;
        log::info!("Frame loop started ({:?}/frame)", self.frame_time);

        while self.is_running() {
            let frame_start = Instant::now();
            if on_frame(game).is_break() {
                break;
            }

            let now_ms = start.elapsed().as_millis() as u64;
            game.frame(now_ms);
            game.render(renderer);
            frames += 1;

            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }
        }

        log::info!("Frame loop stopped after {} frames", frames);
        Ok(frames)
    }
}
