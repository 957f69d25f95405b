//! CLI argument definitions for `amx`.

use clap::{Arg, ArgAction, Command};

/// Build the CLI argument parser and command definitions.
pub fn build_cli() -> Command {
    Command::new("Ambimix")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Mix looping ambient sounds in the terminal")
        .arg(
            Arg::new("sounds-dir")
                .long("sounds-dir")
                .value_name("DIR")
                .global(true)
                .help("Directory holding the sound files (env: AMBIMIX_SOUNDS_DIR)"),
        )
        .arg(
            Arg::new("state-dir")
                .long("state-dir")
                .value_name("DIR")
                .global(true)
                .help("Directory holding the state file (env: AMBIMIX_STATE_DIR)"),
        )
        .arg(
            Arg::new("silent")
                .long("silent")
                .action(ArgAction::SetTrue)
                .help("Do not open an audio device"),
        )
        .arg(
            Arg::new("preset")
                .long("preset")
                .short('p')
                .value_name("ID")
                .help("Load a preset on startup"),
        )
        .subcommand(
            Command::new("catalog")
                .about("List the ambient sound catalog")
                .arg(
                    Arg::new("category")
                        .long("category")
                        .short('c')
                        .value_name("CATEGORY")
                        .help("Only list one category"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print JSON instead of a table"),
                ),
        )
        .subcommand(
            Command::new("presets")
                .about("List built-in and saved presets")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print JSON instead of a table"),
                ),
        )
        .subcommand(
            Command::new("alarms").about("List alarm sounds"),
        )
        .subcommand(
            Command::new("check")
                .about("Probe every catalog sound file under the sounds directory"),
        )
        .subcommand(
            Command::new("state")
                .about("Inspect or maintain the persisted state file")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Print the state after migration"))
                .subcommand(
                    Command::new("migrate")
                        .about("Rewrite the state file at the current version"),
                )
                .subcommand(Command::new("reset").about("Delete the state file"))
                .subcommand(Command::new("path").about("Print the state file path")),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn global_dirs_reach_subcommands() {
        let matches = build_cli()
            .try_get_matches_from(["amx", "state", "show", "--state-dir", "/tmp/x"])
            .unwrap();
        let (_, state) = matches.subcommand().unwrap();
        let (_, show) = state.subcommand().unwrap();
        assert_eq!(
            show.get_one::<String>("state-dir").map(String::as_str),
            Some("/tmp/x")
        );
    }
}
