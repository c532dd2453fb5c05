use std::env;
use std::error::Error;
use std::str::FromStr;
use veogen::logger::{self, LogLevel, LoggerConfig};
use veogen::{GenerationInputs, GenerationReport, ModelId, ProgressEvent, VeoClient, VeoConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let level = env_parse::<LogLevel>("VEO_LOG_LEVEL")?.unwrap_or(LogLevel::Info);
    logger::init_with_config(LoggerConfig::default().with_level(level))?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = VeoConfig::from_env();
    logger::log_config_info(&config);

    let inputs = inputs_from_env()?;

    log::info!("📚 Available models:");
    for (id, name, note) in ModelId::supported_models() {
        log::info!("  {} - {} ({})", id, name, note);
    }

    let client = match VeoClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let report = client
        .run(inputs, |event: &ProgressEvent| println!("{}", event.message()))
        .await;

    match report {
        GenerationReport::Success(outcome) => {
            if let Some(substitution) = &outcome.substitution {
                println!("{}", substitution.notice());
            }
            println!("{}", outcome.message);

            let output_dir = env::var("VEO_OUTPUT_DIR").unwrap_or_else(|_| ".".to_string());
            let path = outcome.video.save_to(&output_dir).await?;
            println!("Saved {}", path.display());
            Ok(())
        }
        GenerationReport::Failure { reason } => {
            eprintln!("{}", reason);
            std::process::exit(1);
        }
    }
}

/// Prompt comes from the command line (or `VEO_PROMPT`); everything else from
/// `VEO_*` variables.
fn inputs_from_env() -> Result<GenerationInputs, Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let prompt = if args.is_empty() {
        env::var("VEO_PROMPT").unwrap_or_default()
    } else {
        args.join(" ")
    };

    let mut inputs = GenerationInputs::text(prompt)
        .with_negative_prompt(env::var("VEO_NEGATIVE_PROMPT").unwrap_or_default());

    if let Ok(model) = env::var("VEO_MODEL") {
        inputs = inputs.with_model(model);
    }
    if let Some(mode) = env_parse("VEO_MODE")? {
        inputs = inputs.with_mode(mode);
    }
    if let Some(aspect_ratio) = env_parse("VEO_ASPECT_RATIO")? {
        inputs = inputs.with_aspect_ratio(aspect_ratio);
    }
    if let Some(duration) = env_parse("VEO_DURATION")? {
        inputs = inputs.with_duration(duration);
    }
    if let Some(resolution) = env_parse("VEO_RESOLUTION")? {
        inputs = inputs.with_resolution(resolution);
    }

    let fit = env_parse("VEO_FIT")?.unwrap_or_default();
    let anchor = env_parse("VEO_CROP_ANCHOR")?.unwrap_or_default();
    inputs = inputs.with_fit(fit, anchor);

    if let Ok(path) = env::var("VEO_START_IMAGE") {
        inputs = inputs.with_start_image(std::fs::read(&path)?);
    }
    if let Ok(path) = env::var("VEO_END_IMAGE") {
        inputs = inputs.with_end_image(std::fs::read(&path)?);
    }

    Ok(inputs)
}

fn env_parse<T>(key: &str) -> Result<Option<T>, String>
where
    T: FromStr<Err = String>,
{
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .parse()
            .map(Some)
            .map_err(|e| format!("{key}: {e}")),
        _ => Ok(None),
    }
}
