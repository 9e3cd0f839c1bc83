use std::path::{Path, PathBuf};
use std::process::ExitCode;

use citycast_core::{AppError, Config, ValidationResult};
use citycast_dashboard::{render, WeatherViewController};
use citycast_weather::{City, WeatherCache, WeatherClient};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Current weather for Ottawa, Bogota and Buenos Aires
#[derive(Parser)]
#[command(name = "citycast", about = "Current weather for a handful of cities")]
struct Cli {
    /// City to show ("Ottawa", "Bogota", "Buenos Aires"). Defaults to the configured city.
    #[arg(long)]
    city: Option<City>,

    /// Keep running and refresh on the configured interval. Reads commands
    /// from stdin: a city name switches city, `r` retries, `q` quits.
    #[arg(long)]
    watch: bool,

    /// Config file to use instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Tracing is not installed yet, so a bad config file goes straight to stderr.
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.user_message());
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

/// Load and validate the config file. Warnings stay in the result until
/// logging is initialized.
fn load_config(path: Option<&Path>) -> Result<(Config, ValidationResult), AppError> {
    let loaded = match path {
        Some(path) => Config::load_validated_from(path)?,
        None => Config::load_validated()?,
    };
    Ok(loaded)
}

async fn run(cli: Cli, (config, validation): (Config, ValidationResult)) -> Result<ExitCode, AppError> {
    citycast_core::init(&config.logging.filter)?;
    validation.log_warnings();

    let client = WeatherClient::new(
        &config.weather.api_base_url,
        config.weather.request_timeout(),
        WeatherCache::new(config.weather.cache_ttl()),
    )?;
    let city = cli.city.unwrap_or(config.weather.default_city);

    tracing::info!("Citycast started for {}", city);

    if cli.watch {
        let controller = WeatherViewController::new(client, city, config.weather.refresh_interval());
        watch(&controller).await?;
        controller.shutdown();
        return Ok(ExitCode::SUCCESS);
    }

    let controller = WeatherViewController::new(client, city, None);
    if let Some(cycle) = controller.start() {
        cycle.finished().await;
    }

    let state = controller.state();
    println!("{}", render(&state));

    if state.error.is_some() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

async fn watch(controller: &WeatherViewController) -> Result<(), AppError> {
    let mut updates = controller.subscribe();
    let mut commands = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    controller.start();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let text = render(&updates.borrow_and_update());
                if !text.is_empty() {
                    println!("{}\n", text);
                }
            }
            line = commands.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        if !handle_command(controller, line.trim()) {
                            break;
                        }
                    }
                    None => stdin_open = false,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Returns false when the user asked to quit.
fn handle_command(controller: &WeatherViewController, command: &str) -> bool {
    match command {
        "" => {}
        "q" | "quit" => return false,
        "r" | "retry" => {
            controller.retry();
        }
        other => match other.parse::<City>() {
            Ok(city) => {
                controller.select_city(city);
            }
            Err(e) => eprintln!("{}", e),
        },
    }
    true
}
