//! Project listing command.

use crate::cli::args::OutputFormat;
use crate::cli::commands::AppContext;
use crate::error::TetherError;
use crate::output;

/// List projects.
///
/// # Errors
///
/// Returns an error if the request fails; reads are never queued.
pub async fn projects(ctx: &AppContext, format: OutputFormat) -> Result<String, TetherError> {
    let projects = ctx.resources.list_projects().await?;
    output::format_projects(&projects, format)
}
