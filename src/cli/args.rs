use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "tether")]
#[command(about = "An offline-first command-line client for the Tether productivity service")]
#[command(long_about = "tether - an offline-first productivity client

Works against the Tether service API for tasks, habits, projects, and
contacts. Mutations issued while the service is unreachable are saved to a
durable offline queue and replayed in order the next time the service can
be reached.

QUICK START:
  tether tasks list                 Show your tasks
  tether tasks add \"Buy milk\"       Create a task (works offline)
  tether sync status                Inspect the offline queue
  tether sync now                   Probe the service and replay the queue

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  tether <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage tasks
    ///
    /// Listing requires connectivity; add/complete/delete work offline and
    /// are queued for replay when the service is unreachable.
    ///
    /// # Examples
    ///
    ///   tether tasks list
    ///   tether tasks add "Call mom" --due 2026-08-10
    ///   tether tasks complete t-123
    #[command(alias = "t")]
    Tasks(TasksArgs),

    /// Manage habits
    #[command(alias = "h")]
    Habits(HabitsArgs),

    /// List projects
    #[command(alias = "p")]
    Projects,

    /// List contacts
    Contacts,

    /// Manage the offline sync queue
    ///
    /// The queue holds mutations that failed while the service was
    /// unreachable. Requests replay oldest-first; a request that keeps
    /// failing is retried with growing delays and abandoned after the
    /// retry ceiling.
    ///
    /// # Examples
    ///
    ///   tether sync status        Show connectivity and pending requests
    ///   tether sync now           Probe the service and replay the queue
    ///   tether sync remove <id>   Cancel one pending request
    ///   tether sync clear --force Abandon all pending requests
    #[command(alias = "s")]
    Sync(SyncArgs),

    /// Manage credentials
    Auth(AuthArgs),

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   tether completions bash > /etc/bash_completion.d/tether
    ///   tether completions zsh > ~/.zfunc/_tether
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TaskCommands,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List all tasks
    #[command(alias = "ls")]
    List,

    /// Add a new task
    Add {
        /// Task title
        title: String,
        /// Notes for the task
        #[arg(short, long)]
        notes: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
        /// Project id to file the task under
        #[arg(short, long)]
        project: Option<String>,
        /// Tags to apply
        #[arg(long)]
        tags: Vec<String>,
    },

    /// Mark a task completed
    #[command(alias = "done")]
    Complete {
        /// Task id
        id: String,
    },

    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        /// Task id
        id: String,
    },
}

#[derive(Args)]
pub struct HabitsArgs {
    #[command(subcommand)]
    pub command: HabitCommands,
}

#[derive(Subcommand)]
pub enum HabitCommands {
    /// List all habits
    #[command(alias = "ls")]
    List,

    /// Log a habit for today
    Log {
        /// Habit id
        id: String,
    },
}

#[derive(Args)]
pub struct SyncArgs {
    #[command(subcommand)]
    pub command: SyncCommands,
}

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Show connectivity and pending requests
    Status,

    /// Probe the service and replay the queue
    Now,

    /// Cancel one pending request by id
    Remove {
        /// Queued request id (see 'tether sync status')
        id: String,
    },

    /// Abandon all pending requests
    ///
    /// Pending mutations are lost for good; the server never sees them.
    Clear {
        /// Skip the confirmation safeguard
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store an API token for authenticated requests
    Login {
        /// Bearer token issued by the service
        token: String,
    },

    /// Forget the stored token and abandon any pending offline mutations
    Logout,
}
