use std::path::Path;

use anyhow::Result;
use lngsim::draw::{animate, start_session};
use lngsim::io::read_config;
use lngsim::RunConfig;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

fn main() -> Result<()> {
    init_tracing();

    // Optional JSON run config as the only argument
    let config = match std::env::args().nth(1) {
        Some(path) => read_config(Path::new(&path))?,
        None => RunConfig::default(),
    };
    let seed = config.seed.unwrap_or_else(rand::random);
    info!(detail = ?config.detail, seed, "starting LNG incident replay");

    let model = config.model()?;
    let builder = config.builder()?;
    let playback = config.playback.to_playback()?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let session = start_session(&config.viewer)?;
    let frames = animate(&session, &model, &builder, &playback, &mut rng, &config.viewer)?;
    info!(frames, "replay finished");
    Ok(())
}
