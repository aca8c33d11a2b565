//! Credential management commands.

use colored::Colorize;

use crate::cli::args::{AuthCommands, OutputFormat};
use crate::cli::commands::AppContext;
use crate::error::TetherError;
use crate::output::to_json;

/// Execute auth subcommands.
///
/// # Errors
///
/// Returns an error if the config file cannot be written.
pub fn auth(
    ctx: &AppContext,
    cmd: AuthCommands,
    format: OutputFormat,
) -> Result<String, TetherError> {
    match cmd {
        AuthCommands::Login { token } => {
            let mut config = ctx.config.clone();
            config.api.auth_token = Some(token);
            config.save_to_path(&ctx.paths.config_file)?;

            match format {
                OutputFormat::Json => to_json(&serde_json::json!({ "logged_in": true })),
                OutputFormat::Pretty => Ok(format!(
                    "{} Token saved. Requests will be authenticated from now on.",
                    "✓".green()
                )),
            }
        }
        AuthCommands::Logout => {
            // Abandoning pending mutations on logout is deliberate: they
            // were authorized by the departing account's token.
            let abandoned = ctx.queue.clear()?;

            let mut config = ctx.config.clone();
            config.api.auth_token = None;
            config.save_to_path(&ctx.paths.config_file)?;

            match format {
                OutputFormat::Json => to_json(&serde_json::json!({
                    "logged_in": false,
                    "abandoned_requests": abandoned,
                })),
                OutputFormat::Pretty => {
                    let mut line = format!("{} Token forgotten.", "✓".green());
                    if abandoned > 0 {
                        line.push_str(&format!(
                            " {}",
                            format!("{abandoned} pending offline request(s) were abandoned.")
                                .yellow()
                        ));
                    }
                    Ok(line)
                }
            }
        }
    }
}
