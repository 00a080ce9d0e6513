//! Command dispatch: one handler per subcommand.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{check_round_trip, load_forest, resolve_relations};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings, LOCAL_CONFIG_FILE};
use crate::domain::{DomainError, Forest, NodeRef};
use crate::exitcode;
use crate::infrastructure::{read_text, write_text};
use crate::tree_traits::TreeNodeConvert;

/// Run the selected subcommand and return the process exit code.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    let Some(command) = &cli.command else {
        let mut cmd = Cli::command();
        cmd.print_help().map_err(|e| CliError::Usage(e.to_string()))?;
        return Ok(exitcode::USAGE);
    };

    // completions must work without any config in place
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(exitcode::OK);
    }

    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "settings loaded");

    match command {
        Commands::Render { file, output } => {
            let forest = open(cli, &settings, file)?;
            emit(&forest.render(), output.as_deref(), &settings)
        }
        Commands::Tree { file, record_type } => {
            let forest = open(cli, &settings, file)?;
            cmd_tree(&forest, record_type.as_deref())
        }
        Commands::Count { file, prefix } => {
            let forest = open(cli, &settings, file)?;
            let count = match prefix {
                Some(prefix) => forest.size_by_type_prefix(prefix),
                None => forest.size(),
            };
            output::info(&count);
            Ok(exitcode::OK)
        }
        Commands::Find {
            file,
            record_type,
            first,
        } => {
            let forest = open(cli, &settings, file)?;
            cmd_find(&forest, record_type, *first)
        }
        Commands::Filter {
            file,
            drop: dropped,
            output,
        } => {
            let mut forest = open(cli, &settings, file)?;
            let before = forest.size();
            forest.retain(|node| !dropped.iter().any(|t| t == node.type_tag()));
            debug!(before, after = forest.size(), "filtered");
            emit(&forest.render(), output.as_deref(), &settings)
        }
        Commands::Check { file } => cmd_check(cli, &settings, file),
        Commands::Config { command } => cmd_config(command, &settings),
        Commands::Completion { .. } => Ok(exitcode::OK),
    }
}

fn open(cli: &Cli, settings: &Settings, file: &Path) -> CliResult<Forest> {
    let relations = resolve_relations(cli.relations.as_deref(), settings)?;
    Ok(load_forest(file, &relations, settings)?)
}

/// Write rendered records to `output`, or print them when no file is given.
fn emit(text: &str, output: Option<&Path>, settings: &Settings) -> CliResult<i32> {
    match output {
        Some(path) => {
            write_text(path, text, settings.encoding)?;
            debug!("written {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(exitcode::OK)
}

#[instrument(level = "debug", skip(forest))]
fn cmd_tree(forest: &Forest, record_type: Option<&str>) -> CliResult<i32> {
    match record_type {
        None => output::info(&forest.to_tree_string()),
        Some(record_type) => {
            let matches: Vec<NodeRef<'_>> = forest.nodes_of_type(record_type).collect();
            if matches.is_empty() {
                return Err(DomainError::NotFound.into());
            }
            for node in matches {
                output::info(&node.to_tree_string());
            }
        }
    }
    Ok(exitcode::OK)
}

#[instrument(level = "debug", skip(forest))]
fn cmd_find(forest: &Forest, record_type: &str, first: bool) -> CliResult<i32> {
    if first {
        print!("{}", forest.first_node_of_type(record_type)?);
        return Ok(exitcode::OK);
    }
    let mut found = 0usize;
    for node in forest.nodes_of_type(record_type) {
        print!("{}", node);
        found += 1;
    }
    if found == 0 {
        return Err(DomainError::NotFound.into());
    }
    debug!(found, "subtrees printed");
    Ok(exitcode::OK)
}

#[instrument(level = "debug", skip(cli, settings))]
fn cmd_check(cli: &Cli, settings: &Settings, file: &Path) -> CliResult<i32> {
    let relations = resolve_relations(cli.relations.as_deref(), settings)?;
    let text = read_text(file, settings.encoding)?;
    let report = check_round_trip(&text, &relations, settings.line_format())?;

    if report.ignored_lines > 0 {
        output::warning(&format!(
            "{} line(s) after the last record ignored",
            report.ignored_lines
        ));
    }
    match &report.mismatch {
        None => {
            output::success(&format!(
                "{}: {} records round-trip unchanged",
                file.display(),
                report.records
            ));
            Ok(exitcode::OK)
        }
        Some(mismatch) => {
            output::failure(&format!(
                "{}: rendered output differs at record line {}",
                file.display(),
                mismatch.line
            ));
            if let Some(expected) = &mismatch.expected {
                output::diff_remove(expected);
            }
            if let Some(actual) = &mismatch.actual {
                output::diff_add(actual);
            }
            Ok(exitcode::NO_MATCH)
        }
    }
}

fn cmd_config(command: &ConfigCommands, settings: &Settings) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => {
            output::header("# merged settings");
            print!("{}", settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "" } else { " (not found)" };
                    output::info(&format!("global: {}{}", path.display(), state));
                }
                None => output::info(&"global: <no config directory>"),
            }
            let local = Path::new(LOCAL_CONFIG_FILE);
            let state = if local.exists() { "" } else { " (not found)" };
            output::info(&format!("local:  {}{}", local.display(), state));
        }
    }
    Ok(exitcode::OK)
}
