//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, SortArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{DeadlineStatus, SortDirection, SortKey, TimelineScale, TreeOptions};
use crate::infrastructure::{InfraError, ServiceContainer};
use crate::tree_traits::ForestConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| InfraError::io("resolve current directory", e))?,
    };

    match &cli.command {
        Some(Commands::Tree { file, sort }) => {
            let container = container(&config_dir)?;
            tree(&container, file.as_deref(), sort)
        }
        Some(Commands::List { file, sort }) => {
            let container = container(&config_dir)?;
            list(&container, file.as_deref(), sort)
        }
        Some(Commands::Timeline {
            project,
            file,
            today,
        }) => {
            let container = container(&config_dir)?;
            timeline(&container, project, file.as_deref(), today.as_deref())
        }
        Some(Commands::Config { command }) => config(&config_dir, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

fn container(config_dir: &Path) -> CliResult<ServiceContainer> {
    let settings = Settings::load(Some(config_dir))?;
    Ok(ServiceContainer::new(settings))
}

/// Command line flags override configured sort settings.
pub fn resolve_options(settings: &Settings, args: &SortArgs) -> CliResult<TreeOptions> {
    let mut options = settings.tree_options();
    if let Some(key) = &args.sort {
        options.sort_key = key.parse::<SortKey>()?;
    }
    if let Some(direction) = &args.direction {
        options.sort_direction = direction.parse::<SortDirection>()?;
    }
    options.show_completed |= args.show_completed;
    Ok(options)
}

pub fn resolve_data_file(file: Option<&Path>, settings: &Settings) -> CliResult<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| settings.data_file.clone())
        .ok_or_else(|| {
            CliError::Usage("no data file given and data_file is not configured".to_string())
        })
}

#[instrument(skip(container))]
fn tree(container: &ServiceContainer, file: Option<&Path>, args: &SortArgs) -> CliResult<()> {
    let file = resolve_data_file(file, &container.settings)?;
    let options = resolve_options(&container.settings, args)?;
    debug!("tree: {} with {:?}", file.display(), options);

    let forest = container.hierarchy.goal_tree(&file, &options)?;
    if forest.is_empty() {
        output::warning("no goals or projects to show");
        return Ok(());
    }
    for tree in forest.to_tree_strings() {
        print!("{}", tree);
    }
    Ok(())
}

#[instrument(skip(container))]
fn list(container: &ServiceContainer, file: Option<&Path>, args: &SortArgs) -> CliResult<()> {
    let file = resolve_data_file(file, &container.settings)?;
    let options = resolve_options(&container.settings, args)?;

    let forest = container.hierarchy.goal_tree(&file, &options)?;
    for (_, node) in forest.iter() {
        output::info(&format!(
            "{}{:<8} {}",
            "  ".repeat(node.depth),
            node.data.kind(),
            node.data
        ));
    }
    Ok(())
}

#[instrument(skip(container))]
fn timeline(
    container: &ServiceContainer,
    project: &str,
    file: Option<&Path>,
    today: Option<&str>,
) -> CliResult<()> {
    let file = resolve_data_file(file, &container.settings)?;
    let today = today
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|e| CliError::InvalidArgs(format!("--today {}: {}", s, e)))
        })
        .transpose()?;

    let timeline = container.hierarchy.timeline(&file, project, today)?;
    let bounds = &timeline.bounds;

    output::header(&format!("Timeline of {}", project));
    output::action("Range", &format!("{} .. {}", bounds.start, bounds.end));
    let scale = match bounds.scale {
        TimelineScale::Weekly => "weekly",
        TimelineScale::Monthly => "monthly",
    };
    output::action(
        "Scale",
        &format!("{} ({} .. {})", scale, bounds.line_start, bounds.line_end),
    );
    output::action("Phase", timeline.phase.as_str());
    if !timeline.phase.is_displayed_on_timeline() {
        output::warning(&format!("{} projects get no timeline bar", timeline.phase.as_str()));
    }
    if let Some(next) = &timeline.next {
        output::action("Next", &next.title);
    }

    for (milestone, status) in &timeline.milestones {
        let line = match milestone.deadline_at {
            Some(deadline) => format!(
                "{} ({}, {:.0}%): {}",
                milestone.title,
                deadline,
                bounds.offset_percent(deadline),
                status
            ),
            None => format!("{}: {}", milestone.title, status),
        };
        match status {
            DeadlineStatus::Done => output::success_detail(&line),
            DeadlineStatus::Overdue { .. } => output::failure(&line),
            DeadlineStatus::DueIn { .. } | DeadlineStatus::NoDeadline => output::detail(&line),
        }
    }
    Ok(())
}

fn config(config_dir: &Path, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(config_dir))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("Global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            output::action("Local", &local_config_path(config_dir).display());
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_flags_when_resolving_then_override_settings() {
        let settings = Settings::default();
        let args = SortArgs {
            sort: Some("progress".into()),
            direction: Some("desc".into()),
            show_completed: true,
        };

        let options = resolve_options(&settings, &args).unwrap();

        assert_eq!(options.sort_key, SortKey::Progress);
        assert_eq!(options.sort_direction, SortDirection::Descending);
        assert!(options.show_completed);
    }

    #[test]
    fn given_unknown_sort_flag_when_resolving_then_usage_error() {
        let args = SortArgs {
            sort: Some("size".into()),
            ..SortArgs::default()
        };
        let err = resolve_options(&Settings::default(), &args).unwrap_err();
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
        assert!(err.to_string().contains("unsupported sort key: size"));
    }

    #[test]
    fn given_no_file_and_no_config_when_resolving_then_usage_error() {
        let result = resolve_data_file(None, &Settings::default());
        assert!(matches!(result, Err(CliError::Usage(_))));
    }

    #[test]
    fn given_configured_file_when_resolving_then_falls_back_to_it() {
        let settings = Settings {
            data_file: Some(PathBuf::from("/tmp/goals.toml")),
            ..Settings::default()
        };
        assert_eq!(
            resolve_data_file(None, &settings).unwrap(),
            PathBuf::from("/tmp/goals.toml")
        );
        assert_eq!(
            resolve_data_file(Some(Path::new("other.toml")), &settings).unwrap(),
            PathBuf::from("other.toml")
        );
    }
}
