//! Task command implementations.

use crate::api::types::NewTask;
use crate::cli::args::{OutputFormat, TaskCommands};
use crate::cli::commands::AppContext;
use crate::error::TetherError;
use crate::output;

/// Execute task subcommands.
///
/// # Errors
///
/// Returns an error if the request fails for any reason other than
/// "mutation failed while offline" (which is reported as queued).
pub async fn tasks(
    ctx: &AppContext,
    cmd: TaskCommands,
    format: OutputFormat,
) -> Result<String, TetherError> {
    match cmd {
        TaskCommands::List => {
            let tasks = ctx.resources.list_tasks().await?;
            output::format_tasks(&tasks, format)
        }
        TaskCommands::Add {
            title,
            notes,
            due,
            project,
            tags,
        } => {
            let task = NewTask {
                title,
                notes,
                due_date: due,
                project_id: project,
                tags,
            };
            let dispatch = ctx.resources.create_task(&task).await?;
            output::format_dispatch(&dispatch, "Task created", format)
        }
        TaskCommands::Complete { id } => {
            let dispatch = ctx.resources.complete_task(&id).await?;
            output::format_dispatch(&dispatch, "Task completed", format)
        }
        TaskCommands::Delete { id } => {
            let dispatch = ctx.resources.delete_task(&id).await?;
            output::format_dispatch(&dispatch, "Task deleted", format)
        }
    }
}
