//! Headless driver for the backdrop simulation
//!
//! Runs the renderer against an in-memory surface with a synthetic pointer
//! circling the middle of the surface, pausing it halfway as if the canvas
//! had been scrolled out of view.
//!
//! Run with: cargo run --features cli --bin backdrop-cli
//!
//! Environment:
//! - BACKDROP_CONFIG: path to a JSON config file
//! - BACKDROP_VARIANT: circuit | drift
//! - BACKDROP_SEED, BACKDROP_FRAMES, BACKDROP_WIDTH, BACKDROP_HEIGHT

#[cfg(not(target_arch = "wasm32"))]
fn env_parse<T>(name: &str) -> Result<Option<T>, Box<dyn std::error::Error>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| format!("{name}={raw:?}: {e}").into()),
        Err(_) => Ok(None),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use circuit_canvas::core::{Backdrop, BackdropConfig, RecordingSurface, Variant};
    use circuit_canvas::time::now_seconds;
    use tracing::info;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,circuit_canvas=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let mut config = match std::env::var("BACKDROP_CONFIG") {
        Ok(path) => {
            info!(path = %path, "Loading config");
            BackdropConfig::from_file(&path)?
        }
        Err(_) => BackdropConfig::default(),
    };
    if let Some(variant) = env_parse::<Variant>("BACKDROP_VARIANT")? {
        config.variant = variant;
    }
    if let Some(seed) = env_parse::<u64>("BACKDROP_SEED")? {
        config.seed = Some(seed);
    }

    let frames = env_parse::<u64>("BACKDROP_FRAMES")?.unwrap_or(600);
    let width = env_parse::<f32>("BACKDROP_WIDTH")?.unwrap_or(1440.0);
    let height = env_parse::<f32>("BACKDROP_HEIGHT")?.unwrap_or(900.0);

    let mut backdrop = Backdrop::from_config(config)?;
    backdrop.initialize(width, height);
    let mut surface = RecordingSurface::new();

    // Hidden for a tenth of the run, starting halfway
    let pause = (frames / 2)..(frames / 2 + frames / 10);
    let start = now_seconds();
    let mut rendered = 0u64;

    for tick in 0..frames {
        backdrop.set_visible(!pause.contains(&tick));

        let angle = tick as f32 * 0.02;
        let radius = width.min(height) * 0.3;
        backdrop.pointer_moved(
            width / 2.0 + radius * angle.cos(),
            height / 2.0 + radius * angle.sin(),
        );

        if backdrop.frame(&mut surface) {
            rendered += 1;
        }

        if tick > 0 && tick % 120 == 0 {
            let stats = backdrop.stats();
            info!(
                tick,
                points = stats.points,
                edges = stats.edges,
                signals = stats.signals,
                running = stats.running,
                draw_calls = surface.commands().len(),
                "stats"
            );
        }
    }

    let elapsed = now_seconds() - start;
    info!(
        rendered,
        skipped = frames - rendered,
        total_draw_calls = surface.total_commands(),
        "/sec" = format!("{:.0}", rendered as f64 / elapsed.max(1e-9)),
        "done"
    );

    println!("{}", serde_json::to_string(&backdrop.stats())?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
