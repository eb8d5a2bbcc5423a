//! Wing Dash entry point
//!
//! Headless driver: feeds frames through the fixed-step accumulator, optionally
//! lets a simple autopilot fly, and prints a JSON run summary.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use serde::Serialize;

    use wing_dash::Tuning;
    use wing_dash::consts::*;
    use wing_dash::sim::{EntityKind, GameEvent, GameOverCause, GamePhase, TickInput, World, tick};

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Run the Wing Dash simulation headless", long_about = None)]
    pub struct Args {
        /// RNG seed (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,
        /// Tuning JSON; missing fields keep their defaults
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Wall-clock seconds to simulate
        #[arg(long, default_value_t = 60.0)]
        seconds: f32,
        /// Host frame rate fed into the accumulator
        #[arg(long, default_value_t = 60.0)]
        fps: f32,
        /// Let the built-in pilot fly
        #[arg(long)]
        autopilot: bool,
        /// Print every event as a JSON line
        #[arg(long)]
        events: bool,
    }

    #[derive(Debug, Default, Serialize)]
    struct Summary {
        seed: u64,
        phase: Option<GamePhase>,
        elapsed: f32,
        score: u64,
        coins: u32,
        cause: Option<GameOverCause>,
        final_speed: f32,
        obstacles_spawned: u32,
        hazards_spawned: u32,
        coins_spawned: u32,
        ticks: u64,
    }

    /// Driver state around one world
    struct Game {
        world: World,
        accumulator: f32,
        /// Edges collected since the last tick
        input: TickInput,
        autopilot: bool,
        print_events: bool,
        summary: Summary,
    }

    impl Game {
        fn new(world: World, autopilot: bool, print_events: bool) -> Self {
            let summary = Summary {
                seed: world.seed,
                ..Default::default()
            };
            Self {
                world,
                accumulator: 0.0,
                input: TickInput::default(),
                autopilot,
                print_events,
                summary,
            }
        }

        /// Run simulation ticks for one host frame
        fn update(&mut self, dt: f32) -> Result<()> {
            let dt = dt.min(MAX_FRAME_DT);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                if self.autopilot {
                    self.steer();
                }
                let input = self.input;
                tick(&mut self.world, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
                self.summary.ticks += 1;

                // Edges are one-shot
                self.input = TickInput::default();
                self.handle_events()?;
            }
            Ok(())
        }

        /// Hover toward the open lane: the gate passage when one is tracked,
        /// otherwise whichever height is furthest from nearby obstacles.
        fn steer(&mut self) {
            let world = &self.world;
            let player = &world.player;
            let target = match world.band.peek() {
                Some(band) => band.mid(),
                None => open_lane(world),
            };
            let want_press = player.pos.y > target;
            if want_press && !player.pressing {
                self.input.press_begin = true;
            } else if !want_press && player.pressing {
                self.input.press_end = true;
            }
        }

        fn handle_events(&mut self) -> Result<()> {
            for event in self.world.drain_events() {
                if self.print_events {
                    println!("{}", serde_json::to_string(&event).context("serialize event")?);
                }
                match event {
                    GameEvent::Spawned { kind, .. } => match kind {
                        EntityKind::Obstacle(_) => self.summary.obstacles_spawned += 1,
                        EntityKind::Hazard => self.summary.hazards_spawned += 1,
                        EntityKind::Coin => self.summary.coins_spawned += 1,
                    },
                    GameEvent::GameOver { cause, .. } => self.summary.cause = Some(cause),
                    _ => {}
                }
            }
            Ok(())
        }

        fn finish(mut self) -> Summary {
            self.summary.phase = Some(self.world.phase);
            self.summary.elapsed = self.world.elapsed;
            self.summary.score = self.world.score;
            self.summary.coins = self.world.coin_count;
            self.summary.final_speed = self.world.speed.current;
            self.summary
        }
    }

    /// Candidate height with the most clearance from obstacles just ahead
    fn open_lane(world: &World) -> f32 {
        let t = &world.tuning.world;
        let x = world.player.pos.x;
        let ahead: Vec<_> = world
            .obstacles
            .iter()
            .map(|o| o.rect())
            .filter(|r| r.max.x > x - 20.0 && r.min.x < x + 260.0)
            .collect();

        let lanes = 12;
        let mut best = (t.height * 0.5, f32::MIN);
        for i in 1..lanes {
            let y = t.height * i as f32 / lanes as f32;
            let clearance = ahead
                .iter()
                .map(|r| {
                    if y < r.min.y {
                        r.min.y - y
                    } else if y > r.max.y {
                        y - r.max.y
                    } else {
                        0.0
                    }
                })
                .fold(t.height, f32::min);
            // Prefer the middle when clearances tie
            let score = clearance - (y - t.height * 0.5).abs() * 0.01;
            if score > best.1 {
                best = (y, score);
            }
        }
        best.0
    }

    fn time_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(42)
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();
        if !(args.fps > 0.0) {
            anyhow::bail!("--fps must be positive (got {})", args.fps);
        }

        let tuning = match &args.tuning {
            Some(path) => {
                let (tuning, err) = Tuning::load_or_default(path);
                if let Some(err) = err {
                    log::warn!("{err}; using default tuning");
                }
                tuning
            }
            None => Tuning::default(),
        };
        for warning in tuning.validate() {
            log::warn!("tuning: {warning}");
        }

        let seed = args.seed.unwrap_or_else(time_seed);
        log::info!("Wing Dash starting (seed {seed}, {}s at {} fps)", args.seconds, args.fps);

        let mut game = Game::new(World::new(seed, tuning), args.autopilot, args.events);
        let frame_dt = 1.0 / args.fps;
        let frames = (args.seconds.max(0.0) * args.fps).ceil() as u64;
        for _ in 0..frames {
            game.update(frame_dt)?;
            if game.world.is_game_over() {
                break;
            }
        }

        let summary = game.finish();
        log::info!(
            "Run finished: {:?}, score {}, coins {}, {:.1}s",
            summary.phase,
            summary.score,
            summary.coins,
            summary.elapsed
        );
        println!("{}", serde_json::to_string_pretty(&summary).context("serialize summary")?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is a library on the web; the host drives `sim::tick`
}
