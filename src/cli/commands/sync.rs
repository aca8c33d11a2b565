//! Offline queue management commands.

use std::time::Duration;

use colored::Colorize;

use crate::cli::args::{OutputFormat, SyncCommands};
use crate::cli::commands::AppContext;
use crate::error::TetherError;
use crate::output::{self, to_json};
use crate::sync::QueueEventKind;

/// Execute sync subcommands.
///
/// # Errors
///
/// Returns an error if queue operations fail.
pub async fn sync(
    ctx: &AppContext,
    cmd: SyncCommands,
    format: OutputFormat,
) -> Result<String, TetherError> {
    match cmd {
        SyncCommands::Status => output::format_queue_status(&ctx.queue.status(), format),
        SyncCommands::Now => sync_now(ctx, format).await,
        SyncCommands::Remove { id } => remove(ctx, &id, format),
        SyncCommands::Clear { force } => clear(ctx, force, format),
    }
}

/// Probe the service, replay the queue, and report what happened.
async fn sync_now(ctx: &AppContext, format: OutputFormat) -> Result<String, TetherError> {
    let before = ctx.queue.queue_length();

    // Progress lines go to stderr so stdout stays scriptable
    let progress = (format == OutputFormat::Pretty).then(|| {
        ctx.queue.add_listener(|event| match event.kind {
            QueueEventKind::Processing => {
                if let Some(request) = &event.request {
                    eprintln!("  {} {} {}", "→".dimmed(), request.method, request.url);
                }
            }
            QueueEventKind::Failed => {
                if let Some(request) = &event.request {
                    eprintln!(
                        "  {} {} {} abandoned: {}",
                        "✗".red(),
                        request.method,
                        request.url,
                        event.error.as_deref().unwrap_or("unknown error")
                    );
                }
            }
            _ => {}
        })
    });

    let reachable = ctx.gateway.probe().await;

    if reachable {
        // The online flag flips on the watcher edge, which hops through
        // the runtime; wait briefly for it before forcing a pass of our own
        let mut waited = Duration::ZERO;
        while !ctx.queue.is_online() && waited < Duration::from_secs(1) {
            tokio::time::sleep(Duration::from_millis(10)).await;
            waited += Duration::from_millis(10);
        }

        // The edge may already be draining in the background; run a pass
        // ourselves and then wait for the queue to settle
        ctx.queue.drain().await;
        while ctx.queue.is_draining() {
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    }

    if let Some(id) = progress {
        ctx.queue.remove_listener(id);
    }

    let after = ctx.queue.queue_length();
    let replayed = before.saturating_sub(after);

    match format {
        OutputFormat::Json => to_json(&serde_json::json!({
            "reachable": reachable,
            "replayed": replayed,
            "remaining": after,
        })),
        OutputFormat::Pretty => {
            if !reachable {
                return Ok(format!(
                    "{} Service unreachable; {} request(s) left queued",
                    "○".yellow(),
                    after
                ));
            }
            if before == 0 {
                return Ok(format!("{} Nothing to sync", "✓".green()));
            }
            let mut line = format!("{} Replayed {replayed} request(s)", "✓".green());
            if after > 0 {
                line.push_str(&format!(", {} remaining", after.to_string().yellow()));
            }
            Ok(line)
        }
    }
}

/// Cancel one pending request out-of-band.
fn remove(ctx: &AppContext, id: &str, format: OutputFormat) -> Result<String, TetherError> {
    let removed = ctx.queue.remove(id)?;

    match format {
        OutputFormat::Json => to_json(&serde_json::json!({
            "removed": removed,
            "id": id,
        })),
        OutputFormat::Pretty => {
            if removed {
                Ok(format!("{} Removed {id}", "✓".green()))
            } else {
                Ok(format!("{} No queued request with id {id}", "✗".red()))
            }
        }
    }
}

/// Abandon all pending requests.
fn clear(ctx: &AppContext, force: bool, format: OutputFormat) -> Result<String, TetherError> {
    let pending = ctx.queue.queue_length();

    if pending > 0 && !force {
        return Ok(format!(
            "{} {pending} pending request(s) would be lost for good. \
             Re-run with --force to confirm.",
            "!".yellow()
        ));
    }

    let cleared = ctx.queue.clear()?;

    match format {
        OutputFormat::Json => to_json(&serde_json::json!({ "cleared": cleared })),
        OutputFormat::Pretty => Ok(format!(
            "{} Abandoned {cleared} pending request(s)",
            "✓".green()
        )),
    }
}
