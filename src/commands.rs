//! Text commands the terminal front end understands, and what they print.

use std::{fmt::Write as _, str::FromStr};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    error::{HydrationError, ValidationError},
    state::HydrationState,
    storage::KeyValueStore,
    structs::{
        cup::{Cup, DEFAULT_CUP_SIZES},
        cup_icon::CupIcon,
        profile::{Profile, ProfileUpdate},
        theme::Theme,
    },
};

pub const HELP: &str = "\
Commands:
  status                         intake so far against the daily target
  drink                          log a drink of the selected cup
  undo                           remove the last logged drink
  cups                           list cup sizes
  select <ml>                    use a cup size from the list
  add-cup <ml> [icon]            add (and select) a custom cup, 1-2000ml
  remove-cup <ml>                remove every cup of that size
  profile [weight=<kg>] [climate=hot|humid|mild|cold] [gender=female|male|other]
  history                        intake per day
  theme [light|dark|system]      set or cycle the colour theme
  help                           show this text
  quit                           exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Status,
    Drink,
    Undo,
    Cups,
    Select(u32),
    AddCup { size: u32, icon: CupIcon },
    RemoveCup(u32),
    /// An empty update only shows the profile
    Profile(ProfileUpdate),
    History,
    /// `None` cycles to the next theme
    Theme(Option<Theme>),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command `{0}`, try `help`")]
    Unknown(String),

    #[error("`{command}` needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("`{0}` is not a number")]
    NotANumber(String),

    #[error("Unknown profile field `{0}`, expected weight, climate or gender")]
    UnknownProfileField(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

fn parse_size(arg: Option<&str>, command: &'static str) -> Result<u32, CommandError> {
    let raw = arg.ok_or(CommandError::MissingArgument {
        command,
        what: "a size in ml",
    })?;
    let raw = raw.trim_end_matches("ml");

    // Negative or oversized input still gets the friendly range message
    match raw.parse::<i64>() {
        Ok(size) => u32::try_from(size).map_err(|_| {
            ValidationError::CupSizeOutOfRange(if size < 0 { 0 } else { u32::MAX }).into()
        }),
        Err(_) => Err(CommandError::NotANumber(raw.to_string())),
    }
}

fn parse_profile<'a>(args: impl Iterator<Item = &'a str>) -> Result<ProfileUpdate, CommandError> {
    let mut update = ProfileUpdate::default();

    for arg in args {
        let (field, value) = arg
            .split_once('=')
            .ok_or_else(|| CommandError::UnknownProfileField(arg.to_string()))?;

        match field.to_lowercase().as_str() {
            "weight" => {
                let weight = value
                    .trim_end_matches("kg")
                    .parse::<f64>()
                    .map_err(|_| CommandError::NotANumber(value.to_string()))?;
                update.weight = Some(weight);
            }
            "climate" => update.climate = Some(value.parse()?),
            "gender" => update.gender = Some(value.parse()?),
            _ => return Err(CommandError::UnknownProfileField(field.to_string())),
        }
    }

    update.validate()?;
    Ok(update)
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(Command::Status);
        };

        let command = match name.to_lowercase().as_str() {
            "status" => Command::Status,
            "drink" | "+" => Command::Drink,
            "undo" | "-" => Command::Undo,
            "cups" => Command::Cups,
            "select" => Command::Select(parse_size(words.next(), "select")?),
            "add-cup" => {
                let size = parse_size(words.next(), "add-cup")?;
                let icon: CupIcon = match words.next() {
                    Some(icon) => icon.parse()?,
                    None => DEFAULT_CUP_SIZES[0].icon,
                };
                Command::AddCup { size, icon }
            }
            "remove-cup" => Command::RemoveCup(parse_size(words.next(), "remove-cup")?),
            "profile" => Command::Profile(parse_profile(words)?),
            "history" => Command::History,
            "theme" => Command::Theme(words.next().map(str::parse::<Theme>).transpose()?),
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

fn describe_cup(cup: &Cup) -> String {
    format!("{}ml {}", cup.size, cup.icon)
}

fn progress_bar(progress: f64) -> String {
    const WIDTH: usize = 20;
    let filled = ((progress * WIDTH as f64).round() as usize).min(WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(WIDTH - filled))
}

pub fn render_status<S>(state: &HydrationState<S>) -> String {
    let progress = state.progress();
    format!(
        "{}ml / {}ml ({:.0}%)\n{}\nSelected cup: {}",
        state.total_intake(),
        state.daily_target(),
        progress * 100.0,
        progress_bar(progress),
        describe_cup(&state.selected_cup()),
    )
}

pub fn render_cups<S>(state: &HydrationState<S>) -> String {
    let selected = state.selected_cup();
    let mut out = String::new();

    for cup in state.sorted_catalog() {
        let marker = if cup.same_configuration(&selected) { "*" } else { " " };
        let _ = writeln!(out, "{marker} {}", describe_cup(&cup));
    }
    if out.is_empty() {
        out.push_str("No cups, add one with `add-cup`\n");
    }

    out.trim_end().to_string()
}

pub fn render_profile(profile: &Profile, daily_target: u32) -> String {
    let unset = || "not set".to_string();
    format!(
        "Weight: {}\nClimate: {}\nGender: {}\nRecommended daily water intake: {daily_target}ml",
        profile.weight.map(|w| format!("{w}kg")).unwrap_or_else(unset),
        profile.climate.map(|c| c.to_string()).unwrap_or_else(unset),
        profile.gender.map(|g| g.to_string()).unwrap_or_else(unset),
    )
}

pub fn render_history<S>(state: &HydrationState<S>) -> String {
    let grouped = state.intake_by_day();
    if grouped.is_empty() {
        return "No drinks logged yet".to_string();
    }

    let mut out = String::new();
    for (day, total) in grouped {
        let _ = writeln!(out, "{day}  {total}ml");
    }
    if let Some(latest) = state.latest_drink().and_then(|cup| cup.timestamp) {
        let _ = write!(
            out,
            "Last drink at {}",
            latest.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
        );
    }

    out.trim_end().to_string()
}

/// Runs `command` and returns the text to show. `Quit` is left to the caller.
#[instrument(skip(state))]
pub async fn run_command<S: KeyValueStore>(
    state: &mut HydrationState<S>,
    command: Command,
) -> Result<String, HydrationError> {
    debug!("Running command");

    let output = match command {
        Command::Status => render_status(state),
        Command::Drink => {
            let drink = state.log_drink().await;
            format!("Drank {}\n{}", describe_cup(&drink), render_status(state))
        }
        Command::Undo => match state.undo_last_drink().await {
            Some(cup) => format!("Removed {}\n{}", describe_cup(&cup), render_status(state)),
            None => "Nothing to undo".to_string(),
        },
        Command::Cups => render_cups(state),
        Command::Select(size) => {
            let cup = state.select_cup_by_size(size).await?;
            format!("Selected {}", describe_cup(&cup))
        }
        Command::AddCup { size, icon } => {
            let cup = state.add_and_select_custom_cup(size, icon).await?;
            format!("Added and selected {}", describe_cup(&cup))
        }
        Command::RemoveCup(size) => {
            let wanted = Cup::new(size, DEFAULT_CUP_SIZES[0].icon);
            match state.remove_cup(&wanted).await {
                0 => format!("No {size}ml cup to remove"),
                n => format!(
                    "Removed {n} cup(s) of {size}ml\nSelected cup: {}",
                    describe_cup(&state.selected_cup())
                ),
            }
        }
        Command::Profile(update) => {
            if !update.is_empty() {
                state.update_profile(update).await?;
            }
            render_profile(&state.profile(), state.daily_target())
        }
        Command::History => render_history(state),
        Command::Theme(theme) => {
            let theme = theme.unwrap_or_else(|| state.theme().next());
            state.set_theme(theme).await;
            format!("Theme: {theme}")
        }
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        storage::MemoryStore,
        structs::profile::{Climate, Gender},
    };

    #[test]
    fn parses_commands() {
        assert_eq!("".parse::<Command>().unwrap(), Command::Status);
        assert_eq!(" DRINK ".parse::<Command>().unwrap(), Command::Drink);
        assert_eq!("select 300ml".parse::<Command>().unwrap(), Command::Select(300));
        assert_eq!(
            "add-cup 350 flask".parse::<Command>().unwrap(),
            Command::AddCup {
                size: 350,
                icon: CupIcon::Flask
            }
        );
        assert_eq!(
            "add-cup 350".parse::<Command>().unwrap(),
            Command::AddCup {
                size: 350,
                icon: CupIcon::Coffee
            }
        );
        assert_eq!(
            "profile weight=70kg climate=Hot gender=male"
                .parse::<Command>()
                .unwrap(),
            Command::Profile(ProfileUpdate {
                weight: Some(70.0),
                climate: Some(Climate::Hot),
                gender: Some(Gender::Male),
            })
        );
        assert_eq!("theme".parse::<Command>().unwrap(), Command::Theme(None));
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!(
            "dance".parse::<Command>(),
            Err(CommandError::Unknown("dance".to_string()))
        );
        assert!(matches!(
            "select".parse::<Command>(),
            Err(CommandError::MissingArgument { .. })
        ));
        assert_eq!(
            "select lots".parse::<Command>(),
            Err(CommandError::NotANumber("lots".to_string()))
        );
        assert_eq!(
            "add-cup -5".parse::<Command>(),
            Err(CommandError::Invalid(ValidationError::CupSizeOutOfRange(0)))
        );
        assert!(matches!(
            "profile weight=0".parse::<Command>(),
            Err(CommandError::Invalid(ValidationError::InvalidWeight(_)))
        ));
        assert!(matches!(
            "profile height=180".parse::<Command>(),
            Err(CommandError::UnknownProfileField(_))
        ));
        assert!(matches!(
            "theme neon".parse::<Command>(),
            Err(CommandError::Invalid(ValidationError::UnknownTheme(_)))
        ));
    }

    #[tokio::test]
    async fn drink_and_status_output() {
        let mut state = HydrationState::initialize(Arc::new(MemoryStore::new())).await;

        let out = run_command(&mut state, Command::Drink).await.unwrap();
        assert!(out.starts_with("Drank 200ml wine-glass"));
        assert!(out.contains("200ml / 2500ml (8%)"));

        let out = run_command(&mut state, Command::Undo).await.unwrap();
        assert!(out.contains("0ml / 2500ml (0%)"));
        assert_eq!(
            run_command(&mut state, Command::Undo).await.unwrap(),
            "Nothing to undo"
        );
    }

    #[tokio::test]
    async fn out_of_range_cup_surfaces_message() {
        let mut state = HydrationState::initialize(Arc::new(MemoryStore::new())).await;

        let err = run_command(
            &mut state,
            Command::AddCup {
                size: 2500,
                icon: CupIcon::Glass,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Please enter a size between 1 and 2000 ml (got 2500)"
        );
    }

    #[tokio::test]
    async fn cups_marks_selection() {
        let mut state = HydrationState::initialize(Arc::new(MemoryStore::new())).await;
        run_command(&mut state, Command::Select(400)).await.unwrap();

        let out = run_command(&mut state, Command::Cups).await.unwrap();
        assert!(out.contains("* 400ml flask"));
        assert!(out.contains("  200ml wine-glass"));

        let out = run_command(&mut state, Command::RemoveCup(400)).await.unwrap();
        assert!(out.contains("Selected cup: 200ml wine-glass"));
    }

    #[tokio::test]
    async fn profile_and_theme() {
        let mut state = HydrationState::initialize(Arc::new(MemoryStore::new())).await;

        let out = run_command(&mut state, Command::Profile(ProfileUpdate::weight(70.0)))
            .await
            .unwrap();
        assert!(out.contains("Weight: 70kg"));
        assert!(out.contains("Climate: not set"));
        assert!(out.contains("2310ml"));

        let out = run_command(&mut state, Command::Theme(None)).await.unwrap();
        assert_eq!(out, "Theme: light");
    }

    #[test]
    fn progress_bar_is_bounded() {
        assert_eq!(progress_bar(0.0), format!("[{}]", "-".repeat(20)));
        assert_eq!(progress_bar(1.0), format!("[{}]", "#".repeat(20)));
        assert_eq!(progress_bar(0.5).matches('#').count(), 10);
    }
}
