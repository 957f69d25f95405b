use std::path::PathBuf;
use std::thread::sleep;
use std::time::{Duration, Instant};

use ambimix_lib::mix::MixStore;
use ambimix_lib::playback::{AudioOutput, EngineConfig, PlaybackEngine};
use ambimix_lib::MixerError;
use clap::Parser;
use log::{error, info, LevelFilter};

const DEFAULT_SOUNDS_DIR: &str = "sounds";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Sounds to mix, as `id` or `id:volume`
    #[arg(value_name = "SOUND")]
    sounds: Vec<String>,

    /// Load a preset instead of (or before) the listed sounds
    #[arg(short, long, value_name = "ID")]
    preset: Option<String>,

    /// Master volume, 0-100
    #[arg(short, long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
    master: u8,

    /// Start and stop without fading
    #[arg(long)]
    no_fade: bool,

    /// Directory holding the sound files
    #[arg(long, value_name = "DIR")]
    sounds_dir: Option<PathBuf>,

    /// Stop after this many seconds instead of playing forever
    #[arg(short = 't', long, value_name = "SECONDS")]
    seconds: Option<u64>,

    /// Print the now-playing projection as JSON lines
    #[arg(long)]
    json: bool,

    /// Do not open an audio device
    #[arg(long)]
    silent: bool,
}

fn main() {
    if let Err(err) = simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
    {
        eprintln!("failed to install logger: {}", err);
    }

    let args = Cli::parse();

    // Any error exits with -1.
    let code = match run(&args) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err.to_string().to_lowercase());
            -1
        }
    };

    std::process::exit(code)
}

/// Split `id[:volume]`.
fn parse_sound(spec: &str) -> Result<(&str, Option<u8>), String> {
    match spec.split_once(':') {
        None => Ok((spec, None)),
        Some((id, volume)) => volume
            .trim()
            .parse::<u8>()
            .map(|volume| (id, Some(volume.min(100))))
            .map_err(|_| format!("bad volume in {:?}", spec)),
    }
}

fn format_time(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    )
}

fn run(args: &Cli) -> Result<i32, MixerError> {
    let sounds_dir = args
        .sounds_dir
        .clone()
        .or_else(|| std::env::var_os("AMBIMIX_SOUNDS_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOUNDS_DIR));

    let output = if args.silent {
        AudioOutput::silent()
    } else {
        AudioOutput::open_default_or_silent()
    };
    let config = EngineConfig {
        fade_in_out: !args.no_fade,
        master_volume: args.master,
        ..EngineConfig::default()
    };
    let engine = PlaybackEngine::new(output.backend(), config);
    let mut store = MixStore::new(engine, sounds_dir);
    store.set_fade_in_out(!args.no_fade);
    store.set_master_volume(args.master);

    if let Some(id) = &args.preset {
        let report = store.load_preset_by_id(id)?;
        info!("preset {}: {} started, {} skipped", id, report.started.len(), report.skipped.len());
    }
    for spec in &args.sounds {
        let (id, volume) = match parse_sound(spec) {
            Ok(parsed) => parsed,
            Err(message) => {
                error!("{}", message);
                return Ok(-1);
            }
        };
        if let Err(err) = store.play_ambient(id, volume) {
            error!("{}", err.to_string().to_lowercase());
        }
    }

    if store.active_sounds().is_empty() {
        error!("nothing is playing");
        return Ok(-1);
    }

    let started = Instant::now();
    let limit = args.seconds.map(Duration::from_secs);
    loop {
        let elapsed = started.elapsed();
        if let Some(now) = store.now_playing() {
            if args.json {
                println!("{}", serde_json::to_string(now)?);
            } else {
                println!(
                    "{}  {}  (master {}%)",
                    format_time(elapsed),
                    now.name,
                    now.volume
                );
            }
        }
        if limit.is_some_and(|limit| elapsed >= limit) {
            break;
        }
        sleep(Duration::from_secs(1));
    }

    store.stop_all_ambient();
    if !args.no_fade {
        sleep(config.fade_duration + config.tick * 2);
    }
    store.engine().release_all();
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sound_specs() {
        assert_eq!(parse_sound("rain"), Ok(("rain", None)));
        assert_eq!(parse_sound("rain:80"), Ok(("rain", Some(80))));
        assert_eq!(parse_sound("rain:250"), Ok(("rain", Some(100))));
        assert_eq!(parse_sound("rain:300"), Err("bad volume in \"rain:300\"".to_string()));
        assert!(parse_sound("rain:loud").is_err());
    }

    #[test]
    fn formats_elapsed_time() {
        assert_eq!(format_time(Duration::from_secs(3725)), "01:02:05");
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
