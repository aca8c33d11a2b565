//! Habit command implementations.

use crate::cli::args::{HabitCommands, OutputFormat};
use crate::cli::commands::AppContext;
use crate::error::TetherError;
use crate::output;

/// Execute habit subcommands.
///
/// # Errors
///
/// Returns an error if the request fails for any reason other than
/// "mutation failed while offline" (which is reported as queued).
pub async fn habits(
    ctx: &AppContext,
    cmd: HabitCommands,
    format: OutputFormat,
) -> Result<String, TetherError> {
    match cmd {
        HabitCommands::List => {
            let habits = ctx.resources.list_habits().await?;
            output::format_habits(&habits, format)
        }
        HabitCommands::Log { id } => {
            let dispatch = ctx.resources.log_habit(&id).await?;
            output::format_dispatch(&dispatch, "Habit logged", format)
        }
    }
}
