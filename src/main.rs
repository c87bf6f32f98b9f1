//! Bullseye headless runner
//!
//! Plays one run with the autoplayer at a fixed frame rate, logging the HUD
//! and persisting a qualifying score to a JSON best-score file.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::{Parser, ValueEnum};

    use bullseye::autoplay::{AutoplayConfig, Autoplayer};
    use bullseye::highscores::JsonFileStore;
    use bullseye::presentation::LogSink;
    use bullseye::sim::Arena;
    use bullseye::{GameMode, RunSettings, Session, Tuning, format_percent, platform};

    #[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
    enum CliMode {
        Timed,
        Tracking,
    }

    impl From<CliMode> for GameMode {
        fn from(mode: CliMode) -> Self {
            match mode {
                CliMode::Timed => GameMode::Timed,
                CliMode::Tracking => GameMode::Tracking,
            }
        }
    }

    #[derive(Parser, Debug)]
    #[command(name = "bullseye")]
    #[command(about = "Headless Bullseye aim-trainer run driven by a seeded autoplayer")]
    struct Cli {
        #[arg(long, value_enum, default_value_t = CliMode::Timed)]
        mode: CliMode,
        /// Spawn curve difficulty (1..=10)
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=10))]
        difficulty: u8,
        /// Give Tracking targets shields
        #[arg(long)]
        shields: bool,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Simulated display refresh rate (at least 10, the frame step clamp)
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(10..))]
        fps: u32,
        /// Autoplayer skill (0..=1)
        #[arg(long, default_value_t = 0.7)]
        skill: f32,
        #[arg(long, default_value_t = bullseye::consts::ARENA_WIDTH)]
        width: f32,
        #[arg(long, default_value_t = bullseye::consts::ARENA_HEIGHT)]
        height: f32,
        /// Balance overrides (JSON); missing file means defaults
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Best-score file
        #[arg(long, default_value = "bullseye_scores.json")]
        scores: PathBuf,
    }

    pub fn run() -> Result<()> {
        platform::init_logging();
        let cli = Cli::parse();

        let tuning = match &cli.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?,
            None => Tuning::default(),
        };
        let settings = RunSettings::new(cli.mode.into(), cli.shields, cli.difficulty);
        let frame_ms = 1000.0 / f64::from(cli.fps);

        let mut session = Session::with_sink(JsonFileStore::new(&cli.scores), LogSink::new(cli.fps))
            .with_tuning(tuning)
            .with_arena(Arena::new(cli.width, cli.height))
            .with_seed(cli.seed);
        let mut bot = Autoplayer::new(AutoplayConfig::from_skill(cli.skill), cli.seed ^ 0x5eed);

        session.start(settings, 0.0);
        log::info!("Spawn curves: {}", session.curves().describe());

        let mut now = 0.0;
        let report = loop {
            now += frame_ms;
            if let Some(report) = session.advance(now) {
                break report;
            }
            bot.act(&mut session, now);
        };

        println!(
            "{} {}: {} pts, accuracy {}, center {}, outer {}, shield {}, misses {}, expired {}",
            report.mode.as_str(),
            report.outcome.as_str(),
            report.record.points,
            format_percent(report.record.accuracy),
            report.stats.hits_center,
            report.stats.hits_outer,
            report.stats.hits_shield,
            report.stats.click_misses,
            report.stats.expired_misses,
        );
        if report.new_best() {
            println!("New best score saved to {}", cli.scores.display());
        } else if !report.outcome.records_score() {
            println!("Scores are not recorded unless the full run is completed.");
        }
        for mode in GameMode::ALL {
            let best = session
                .best(mode)
                .map(|r| r.summary())
                .unwrap_or_else(|| "none".to_string());
            println!("Best {}: {}", mode.as_str(), best);
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `bullseye::Session` directly
}
