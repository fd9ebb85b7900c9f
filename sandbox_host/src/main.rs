use log::{error, info};
use physics_sandbox::{ProjectilePreset, Sandbox, SandboxConfig, SandboxInput};
use std::env;

mod visual;

fn load_config(path: Option<&String>) -> physics_sandbox::Result<SandboxConfig> {
    match path {
        Some(path) => SandboxConfig::load(path),
        None => Ok(SandboxConfig::default()),
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    // `headless <ticks> [config.json]` runs without a window
    if args.len() > 1 && args[1] == "headless" {
        let ticks = args
            .get(2)
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(600);
        match load_config(args.get(3)) {
            Ok(config) => run_headless(&config, ticks),
            Err(e) => error!("Error loading config: {}", e),
        }
        return;
    }

    // Otherwise the optional first argument is a config file
    let config = match load_config(args.get(1)) {
        Ok(config) => config,
        Err(e) => {
            error!("Error loading config: {}", e);
            return;
        }
    };

    if let Err(e) = visual::run_visual(config) {
        error!("Error running sandbox window: {}", e);
    }
}

/// Fires every preset in turn and reports the projectile count.
fn run_headless(config: &SandboxConfig, ticks: u32) {
    let mut sandbox = match Sandbox::from_config(config) {
        Ok(sandbox) => sandbox,
        Err(e) => {
            error!("Invalid config: {}", e);
            return;
        }
    };

    let fps = config.target_fps.max(1);
    let mut presets = ProjectilePreset::ALL.iter().cycle();
    for tick in 0..ticks {
        let input = if tick % (fps / 2).max(1) == 0 {
            presets
                .next()
                .map(|preset| SandboxInput::preset(*preset))
                .unwrap_or_default()
        } else {
            SandboxInput::default()
        };
        sandbox.tick(&input);

        if tick % fps == 0 {
            info!(
                "tick {}: {} projectiles, {} contacts",
                tick,
                sandbox.dynamic_count(),
                sandbox.world().last_contacts()
            );
        }
    }
    info!("Headless run finished: {} projectiles alive", sandbox.dynamic_count());
}
