//! Command dispatch

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::EditOutcome;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Run {
            script,
            quiet,
            check,
            output,
        }) => cmd_run(cli, script, *quiet, *check, output.as_deref()),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        None => Err(CliError::Usage(
            "no command given, see `svisuelte --help`".to_string(),
        )),
    }
}

/// Directory searched for the local config file.
fn project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) if !dir.is_dir() => Err(CliError::InvalidArgs(format!(
            "not a directory: {}",
            dir.display()
        ))),
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().map_err(|e| CliError::io("current directory", e)),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = project_dir(cli)?;
    Ok(Settings::load(Some(dir.as_path()))?)
}

#[instrument(skip(cli))]
fn cmd_run(
    cli: &Cli,
    script: &Path,
    quiet: bool,
    check: bool,
    output_path: Option<&Path>,
) -> CliResult<()> {
    let mut settings = load_settings(cli)?;
    settings.check |= check;
    debug!(?settings, "effective settings");

    let container = ServiceContainer::new(settings);
    let service = container.edit_service();

    let outcome: EditOutcome = if script == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| CliError::io("read script from stdin", e))?;
        service.run_script(&text)?
    } else {
        service.run_file(script)?
    };

    for out in &outcome.outputs {
        print!("{out}");
    }

    match output_path {
        Some(path) => {
            service.write_markup(path, &outcome.markup)?;
            if !quiet {
                output::action("Wrote", &path.display());
            }
        }
        None if !quiet => print!("{}", outcome.markup),
        None => {}
    }
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            let dir = project_dir(cli)?;
            match global_config_path() {
                Some(path) => print_config_path("global", &path),
                None => output::warning("cannot determine global config directory"),
            }
            print_config_path("local", &local_config_path(&dir));
        }
    }
    Ok(())
}

fn print_config_path(label: &str, path: &Path) {
    if path.exists() {
        output::success(&format!("{label}: {}", path.display()));
    } else {
        output::failure(&format!("{label}: {} (not found)", path.display()));
    }
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
