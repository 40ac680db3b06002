use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use steam_screenshot_organizer::catalog::{CatalogLoader, HttpSource};
use steam_screenshot_organizer::cli::{Cli, Commands};
use steam_screenshot_organizer::config::Config;
use steam_screenshot_organizer::dispatcher::Dispatcher;
use steam_screenshot_organizer::{organizer, prompt};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("failed to load config, using defaults: {}", e);
        Config::default()
    });
    cli.apply_to(&mut config);

    let code = match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\nError: {}", e);
            for cause in e.chain().skip(1) {
                eprintln!("Details: {}", cause);
            }
            ExitCode::FAILURE
        }
    };

    // 成功・失敗に関係なく終了前にEnterを待つ
    if config.pause_on_exit {
        prompt::wait_for_enter();
    }
    code
}

fn init_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Warn)
            .filter_module("steam_screenshot_organizer", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }
}

fn run(cli: &Cli, config: &Config) -> Result<()> {
    match cli.command.clone().unwrap_or(Commands::Organize) {
        Commands::Organize => organize_command(cli, config),
        Commands::Catalog { info, clear, refresh } => catalog_command(cli, config, info, clear, refresh),
        Commands::Config { show, init } => config_command(config, show, init),
    }
}

fn catalog_loader(cli: &Cli, config: &Config) -> CatalogLoader<HttpSource> {
    CatalogLoader::new(cli.cache_path(config), HttpSource::from_config(config))
}

fn organize_command(cli: &Cli, config: &Config) -> Result<()> {
    let loader = catalog_loader(cli, config);
    let catalog = loader
        .load()
        .inspect_err(|_| {
            if loader.cache_path().exists() {
                println!("Consider deleting {} and trying again.", loader.cache_path().display());
            }
        })
        .context("Catalog unavailable, nothing was organized")?;
    println!("Loaded {} games from {}", catalog.len(), loader.cache_path().display());

    let layout = match cli.mode {
        Some(layout) => layout,
        None => prompt::select_layout().context("Failed to read folder type")?,
    };

    let dispatcher = Dispatcher::from_config(config);
    let summary = organizer::organize(&cli.dir, Arc::new(catalog), layout, &dispatcher)
        .with_context(|| format!("Failed to organize {}", cli.dir.display()))?;

    println!(
        "\nOrganization completed! ({} processed, {} failed)",
        summary.succeeded, summary.failed
    );
    Ok(())
}

fn catalog_command(cli: &Cli, config: &Config, info: bool, clear: bool, refresh: bool) -> Result<()> {
    let loader = catalog_loader(cli, config);
    let cache_path = loader.cache_path().display().to_string();

    if clear {
        if loader.clear()? {
            println!("✔ Deleted {}", cache_path);
        } else {
            println!("Cache file does not exist: {}", cache_path);
        }
    }

    if refresh {
        let catalog = loader.refresh().context("Failed to refresh app list")?;
        println!("✔ Saved {} games to {}", catalog.len(), cache_path);
    }

    if info || !(clear || refresh) {
        match loader.info()? {
            Some(info) => {
                println!("Catalog cache:");
                println!("  Path: {}", info.path.display());
                println!("  Entries: {}", info.entries);
                println!("  Size: {} bytes", info.size);
            }
            None => println!("Cache file does not exist: {}", cache_path),
        }
    }
    Ok(())
}

fn config_command(config: &Config, show: bool, init: bool) -> Result<()> {
    if init {
        // 上書き指定は含めず既定値だけを書く
        let path = Config::default().save().context("Failed to write config file")?;
        println!("✔ Wrote {}", path.display());
    }

    if show || !init {
        println!("Config ({}):", Config::config_path()?.display());
        println!("{}", serde_json::to_string_pretty(config)?);
    }
    Ok(())
}
