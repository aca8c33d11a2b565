//! Contact listing command.

use crate::cli::args::OutputFormat;
use crate::cli::commands::AppContext;
use crate::error::TetherError;
use crate::output;

/// List contacts.
///
/// # Errors
///
/// Returns an error if the request fails; reads are never queued.
pub async fn contacts(ctx: &AppContext, format: OutputFormat) -> Result<String, TetherError> {
    let contacts = ctx.resources.list_contacts().await?;
    output::format_contacts(&contacts, format)
}
