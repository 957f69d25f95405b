//! Non-interactive subcommands.

use ambimix_lib::catalog::{alarm_sounds, built_in_presets, grouped, resolve_locator, SoundCategory};
use ambimix_lib::probe::probe_resource;
use ambimix_lib::settings::{StateFile, STATE_VERSION};
use ambimix_lib::MixerError;
use clap::ArgMatches;
use log::{error, info};

use crate::config::Config;

pub fn run_catalog(args: &ArgMatches) -> Result<i32, MixerError> {
    let category = args.get_one::<String>("category");
    let groups: Vec<_> = grouped()
        .into_iter()
        .filter(|(group, _)| category.map_or(true, |key| group.key() == key.as_str()))
        .collect();
    if groups.is_empty() {
        if let Some(key) = category {
            let known: Vec<&str> = SoundCategory::ALL.iter().map(|c| c.key()).collect();
            error!("unknown category {}", key);
            eprintln!("unknown category {} (known: {})", key, known.join(", "));
            return Ok(-1);
        }
    }

    if args.get_flag("json") {
        let sounds: Vec<_> = groups.iter().flat_map(|(_, sounds)| sounds.iter()).collect();
        println!("{}", serde_json::to_string_pretty(&sounds)?);
        return Ok(0);
    }

    for (group, sounds) in &groups {
        println!("{} ({})", group.label(), group.vn());
        for sound in sounds {
            println!(
                "  {} {:<18} {:<20} {}",
                sound.icon, sound.id, sound.label, sound.vn
            );
        }
    }
    Ok(0)
}

pub fn run_presets(args: &ArgMatches, config: &Config) -> Result<i32, MixerError> {
    let loaded = StateFile::in_dir(&config.state_dir).load()?;
    let mut presets = built_in_presets();
    presets.extend(loaded.state.presets);

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&presets)?);
        return Ok(0);
    }

    for preset in &presets {
        let sounds: Vec<String> = preset
            .sounds
            .iter()
            .map(|sound| format!("{} {}", sound.id, sound.volume))
            .collect();
        println!(
            "{} {:<12} {:<14} {}{}",
            preset.icon.as_deref().unwrap_or(" "),
            preset.id,
            preset.name,
            sounds.join(", "),
            if preset.is_built_in { "" } else { "  (saved)" }
        );
    }
    Ok(0)
}

pub fn run_alarms() -> Result<i32, MixerError> {
    for alarm in alarm_sounds() {
        println!("{:<8} {:<8} {}", alarm.id, alarm.label, alarm.url);
    }
    Ok(0)
}

/// Probe every catalog file. Exit code 1 when any is missing or unreadable.
pub fn run_check(config: &Config) -> Result<i32, MixerError> {
    let mut failures = 0;
    for (_, sounds) in grouped() {
        for sound in sounds {
            let path = resolve_locator(&config.sounds_dir, sound.url);
            match probe_resource(&path) {
                Ok(info) => println!(
                    "ok    {:<18} {:>7.1}s {}ch {}Hz {}",
                    sound.id, info.duration_secs, info.channels, info.sample_rate, info.codec
                ),
                Err(err) => {
                    failures += 1;
                    println!("fail  {:<18} {} ({})", sound.id, path.display(), err);
                }
            }
        }
    }
    info!("check finished with {} failures", failures);
    Ok(if failures == 0 { 0 } else { 1 })
}

pub fn run_state(args: &ArgMatches, config: &Config) -> Result<i32, MixerError> {
    let file = StateFile::in_dir(&config.state_dir);
    match args.subcommand() {
        Some(("path", _)) => println!("{}", file.path().display()),
        Some(("show", _)) => {
            let loaded = file.load()?;
            match loaded.stored_version {
                Some(version) => println!("# {} (v{})", file.path().display(), version),
                None => println!("# {} (missing, defaults)", file.path().display()),
            }
            println!("{}", serde_json::to_string_pretty(&loaded.state)?);
        }
        Some(("migrate", _)) => {
            let loaded = file.load()?;
            match loaded.stored_version {
                None => println!("no state file at {}", file.path().display()),
                Some(version) => {
                    file.save(&loaded.state)?;
                    if loaded.migrated() {
                        println!("migrated v{} -> v{}", version, STATE_VERSION);
                    } else {
                        println!("already at v{}", version);
                    }
                }
            }
        }
        Some(("reset", _)) => {
            file.reset()?;
            println!("removed {}", file.path().display());
        }
        _ => return Ok(-1),
    }
    Ok(0)
}
