//! Cell Rider entry point
//!
//! The native build runs a headless attract-mode session: the autopilot
//! plays, waves advance automatically, and the HUD is written to the log.
//! Usage: `cell-rider [settings.json] [max_seconds] [low|medium|high]`
//!
//! A settings path that does not exist yet is created with the settings used
//! for the run.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::ops::ControlFlow;
    use std::path::PathBuf;

    use cell_rider::audio::{AudioManager, LogBackend};
    use cell_rider::driver::FrameDriver;
    use cell_rider::sim::{Action, GameStatus, Session, World, autopilot};
    use cell_rider::{Game, QualityPreset, Renderer, Settings, Tuning};

    const FPS: u32 = 60;
    const DEFAULT_SECONDS: u64 = 120;

    /// Writes a one-line HUD to the log once per second and on status changes
    struct LogRenderer {
        last_status: GameStatus,
    }

    impl Renderer for LogRenderer {
        fn draw(&mut self, world: &World, session: &Session) {
            if session.status != self.last_status || world.frame % FPS as u64 == 0 {
                log::info!(
                    "[{:?}] wave {} score {} lives {} | enemies {} bullets {} barriers {} particles {}",
                    session.status,
                    session.level,
                    session.score,
                    session.lives,
                    world.active_enemy_count(),
                    world.bullets.len(),
                    world.barriers.len(),
                    world.particles.len()
                );
                self.last_status = session.status;
            }
        }
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Cell Rider (native, attract mode) starting...");

        let mut args = std::env::args().skip(1);
        let settings_path = args.next().map(PathBuf::from);
        let max_frames = args
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_SECONDS)
            * FPS as u64;
        let quality = args.next().and_then(|q| {
            let preset = QualityPreset::parse(&q);
            if preset.is_none() {
                log::warn!("Unknown quality preset {:?}, ignoring", q);
            }
            preset
        });

        let mut settings = settings_path
            .as_deref()
            .map(Settings::load)
            .unwrap_or_default();
        if let Some(preset) = quality {
            settings.quality = preset;
        }
        log::info!(
            "Quality {} (up to {} particles)",
            settings.quality.as_str(),
            settings.max_particles()
        );
        if let Some(path) = settings_path.as_deref().filter(|p| !p.exists()) {
            settings.save(path);
        }

        let audio = AudioManager::new(Box::new(LogBackend));
        let mut game = Game::new(settings, Tuning::default(), audio);
        let controls = game.controls();
        game.apply(Action::Start);

        let driver = FrameDriver::new(FPS);
        let mut renderer = LogRenderer {
            last_status: GameStatus::Start,
        };

        let result = driver.run(&mut game, &mut renderer, |game| {
            if game.world().frame >= max_frames {
                return ControlFlow::Break(());
            }
            match game.status() {
                GameStatus::LevelComplete => {
                    game.apply(Action::NextWave);
                }
                GameStatus::GameOver => return ControlFlow::Break(()),
                _ => {}
            }
            controls.replace(autopilot(game.world()));
            ControlFlow::Continue(())
        });

        match result {
            Ok(frames) => log::info!(
                "Finished after {} frames: wave {}, score {}",
                frames,
                game.session().level,
                game.session().score
            ),
            Err(e) => log::error!("{}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host embeds the library directly; nothing to do here
}
