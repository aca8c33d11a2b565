use chrono::Utc;
use colored::Colorize;

use crate::api::types::{Contact, Habit, Project, Task};
use crate::api::Dispatch;
use crate::sync::QueueStatus;

/// Format a list of tasks as a pretty table
pub fn format_tasks_pretty(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "Tasks (0 items)\n  No tasks".to_string();
    }

    let mut output = format!("Tasks ({} items)\n", tasks.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for task in tasks {
        let status_icon = if task.completed {
            "[x]".green()
        } else {
            "[ ]".white()
        };

        let mut line = format!("{} {}", status_icon, task.title.bold());

        if let Some(project) = &task.project_id {
            line.push_str(&format!("  {}", project.dimmed()));
        }

        if let Some(due) = &task.due_date {
            line.push_str(&format!("  {}", due.yellow()));
        }

        if !task.tags.is_empty() {
            let tags_str = task
                .tags
                .iter()
                .map(|t| format!("#{t}"))
                .collect::<Vec<_>>()
                .join(" ");
            line.push_str(&format!("  {}", tags_str.cyan()));
        }

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format a list of habits as pretty output
pub fn format_habits_pretty(habits: &[Habit]) -> String {
    if habits.is_empty() {
        return "Habits (0)\n  No habits".to_string();
    }

    let mut output = format!("Habits ({})\n", habits.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for habit in habits {
        let mut line = format!("{} {}", "•".white(), habit.name.bold());
        line.push_str(&format!("  {}", format!("streak {}", habit.streak).cyan()));

        if let Some(last) = &habit.last_logged {
            line.push_str(&format!("  {}", format!("last {last}").dimmed()));
        }

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format a list of projects as pretty output
pub fn format_projects_pretty(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "Projects (0)\n  No projects".to_string();
    }

    let mut output = format!("Projects ({})\n", projects.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for project in projects {
        let mut line = format!("{} {}", "▸".blue(), project.name.bold());
        line.push_str(&format!(
            "  {}",
            format!("{} tasks", project.task_count).dimmed()
        ));

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format a list of contacts as pretty output
pub fn format_contacts_pretty(contacts: &[Contact]) -> String {
    if contacts.is_empty() {
        return "Contacts (0)\n  No contacts".to_string();
    }

    let mut output = format!("Contacts ({})\n", contacts.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for contact in contacts {
        let mut line = format!("{} {}", "@".magenta(), contact.name.bold());

        if let Some(email) = &contact.email {
            line.push_str(&format!("  {}", email.dimmed()));
        }

        if let Some(phone) = &contact.phone {
            line.push_str(&format!("  {}", phone.dimmed()));
        }

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format the offline queue status as pretty output
pub fn format_queue_status_pretty(status: &QueueStatus) -> String {
    let mut lines = Vec::new();

    lines.push("Offline Queue".bold().to_string());
    lines.push("─".repeat(40));

    let connectivity = if status.is_online {
        "online".green()
    } else {
        "offline".red()
    };
    lines.push(format!("  Connectivity:  {connectivity}"));
    lines.push(format!("  Pending:       {}", status.queue_length));

    for request in &status.queue {
        let age = Utc::now().signed_duration_since(request.timestamp);
        let age_str = if age.num_hours() > 0 {
            format!("{}h ago", age.num_hours())
        } else if age.num_minutes() > 0 {
            format!("{}m ago", age.num_minutes())
        } else {
            "just now".to_string()
        };

        let mut line = format!(
            "    {} {} {}  {}",
            request.id.dimmed(),
            request.method,
            request.url,
            age_str.dimmed()
        );
        if request.retries > 0 {
            line.push_str(&format!("  {}", format!("{} retries", request.retries).yellow()));
        }
        lines.push(line);
    }

    if status.queue_length > 0 {
        lines.push(String::new());
        lines.push(
            "Run 'tether sync now' to replay pending requests"
                .dimmed()
                .to_string(),
        );
    }

    lines.join("\n")
}

/// Format a mutation dispatch result as pretty output
pub fn format_dispatch_pretty(dispatch: &Dispatch, success_message: &str) -> String {
    match dispatch {
        Dispatch::Delivered(_) => format!("{} {}", "✓".green(), success_message),
        Dispatch::Queued {
            request_id,
            message,
        } => format!(
            "{} {}\n  {}",
            "○".yellow(),
            message.yellow(),
            format!("queued as {request_id}").dimmed()
        ),
    }
}
