use clap::Parser;
use flowpilot::cli::Args;
use flowpilot::host::ShellHost;
use flowpilot::shell::Shell;
use flowpilot::{init_logging, open_params, BUILD_DATE, VERSION};
use flowpilot_params::{MemoryStore, Params};
use flowpilot_settings::{AppConfig, SettingsScreen, TextRenderer};
use std::io;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_options())?;
    tracing::info!("flowpilot-settings {} (built {})", VERSION, BUILD_DATE);

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => AppConfig::default_path()?,
    };
    let mut config = AppConfig::load_or_default(&config_path)?;
    args.apply_to(&mut config);
    config.validate()?;

    if args.save_config {
        config.save_to_file(&config_path)?;
        println!("Saved configuration to {}", config_path.display());
        return Ok(());
    }

    let params = match &args.seed {
        Some(seed) => {
            let json = std::fs::read_to_string(seed)?;
            Params::new(MemoryStore::from_json(&json)?)
        }
        None => open_params(&config)?,
    };

    let host = ShellHost::new(&config);
    let (mut screen, _state) = SettingsScreen::standard(
        params,
        host.host.clone(),
        host.sensors.clone(),
        Box::new(TextRenderer::new(io::stdout())),
        config.screen_options(),
    )?;
    let (width, height) = args.window_size(&config);
    screen.resize(width, height)?;

    let mut shell = Shell::new(screen, host.navigator.clone(), io::stdout());
    shell.run(io::stdin().lock())?;

    Ok(())
}
