//! WhatsApp bot command parsing and reply templates
//!
//! Pure text-in/text-out: classifies an inbound message into an intent and
//! renders the fixed reply for each. Persistence and delivery belong to the
//! backend; this module never touches I/O, so the same parser runs on the
//! server and in the browser terminal via WASM.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::models::{BotTask, BotTaskStatus};

/// The bot trigger token looked for anywhere in a message
pub const BOT_TRIGGER: &str = "@bot";

static TRIGGER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)@bot").unwrap());

// Ordered task-creation phrasings, first match wins.
static CREATE_TASK_PATTERNS: LazyLock<[Regex; 5]> = LazyLock::new(|| {
    [
        // "remind Jan to call Ponti"
        Regex::new(r"(?i)remind\s+(\w+)\s+to\s+(.+)").unwrap(),
        // "task for Jan: call Ponti" / "task for Jan call Ponti"
        Regex::new(r"(?i)task\s+for\s+(\w+):?\s*(.+)").unwrap(),
        // "tell Jan to call Ponti"
        Regex::new(r"(?i)tell\s+(\w+)\s+to\s+(.+)").unwrap(),
        // "Jan needs to call Ponti" / "Jan need to call Ponti"
        Regex::new(r"(?i)(\w+)\s+needs?\s+to\s+(.+)").unwrap(),
        // "assign Jan: call Ponti" / "assign Jan call Ponti"
        Regex::new(r"(?i)assign\s+(\w+):?\s*(.+)").unwrap(),
    ]
});

const LIST_TASK_KEYWORDS: [&str; 4] = [
    "my tasks",
    "what are my tasks",
    "show tasks",
    "list tasks",
];

/// Classified intent of an inbound message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum BotCommand {
    Help,
    ListTasks,
    CreateTask { assignee: String, task_text: String },
    Unknown,
}

/// Result of parsing one inbound message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedMessage {
    #[serde(flatten)]
    pub command: BotCommand,
    /// Message text with the trigger token removed and trimmed
    pub raw_text: String,
}

/// True when the text addresses the bot (case-insensitive trigger match).
/// Callers check this before parsing; `parse_message` does not re-check.
pub fn is_bot_message(text: &str) -> bool {
    text.to_lowercase().contains(BOT_TRIGGER)
}

/// Classify a message into an intent and extract its fields.
///
/// Intent priority is fixed: help, then list-tasks, then the ordered
/// task-creation patterns, then unknown. Never fails; worst case is
/// `BotCommand::Unknown` with the cleaned text.
pub fn parse_message(text: &str) -> ParsedMessage {
    let clean_text = TRIGGER_RE.replace_all(text, "").trim().to_string();
    let lower_text = clean_text.to_lowercase();

    if lower_text.contains("help") || lower_text == "?" || lower_text.contains("what can you do") {
        return ParsedMessage {
            command: BotCommand::Help,
            raw_text: clean_text,
        };
    }

    if LIST_TASK_KEYWORDS.iter().any(|kw| lower_text.contains(kw)) {
        return ParsedMessage {
            command: BotCommand::ListTasks,
            raw_text: clean_text,
        };
    }

    for pattern in CREATE_TASK_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(&clean_text) {
            let assignee = caps[1].to_string();
            let task_text = caps[2].trim().to_string();
            return ParsedMessage {
                command: BotCommand::CreateTask {
                    assignee,
                    task_text,
                },
                raw_text: clean_text,
            };
        }
    }

    ParsedMessage {
        command: BotCommand::Unknown,
        raw_text: clean_text,
    }
}

/// Fixed help reply listing the supported commands
pub fn format_help_response() -> String {
    r#"🤖 Trade Desk Bot Commands:

📌 CREATE A TASK
  @bot remind [name] to [task]
  @bot task for [name]: [task]
  @bot assign [name]: [task]
  Example: @bot remind Jan to call Ponti about the melon offer

📋 YOUR TASKS
  @bot my tasks

❓ HELP
  @bot help or @bot ?"#
        .to_string()
}

/// Confirmation reply echoing the created task verbatim
pub fn format_task_created(assignee: &str, task: &str) -> String {
    format!("✅ Task created for {}: \"{}\"", assignee, task)
}

/// Task-list reply, one line per task in input order
pub fn format_task_list(tasks: &[BotTask]) -> String {
    if tasks.is_empty() {
        return "You have no pending tasks.".to_string();
    }

    let mut lines = Vec::with_capacity(tasks.len() + 1);
    lines.push("Your tasks:".to_string());
    for task in tasks {
        let marker = if task.status == BotTaskStatus::Completed {
            '✓'
        } else {
            '□'
        };
        lines.push(format!("{} {}", marker, task.title));
    }
    lines.join("\n")
}

/// Fallback reply for messages the parser could not classify
pub fn format_unknown_response() -> String {
    "Sorry, I didn't understand that. Try \"@bot help\" to see what I can do.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn task(title: &str, status: BotTaskStatus) -> BotTask {
        BotTask {
            id: Uuid::new_v4(),
            title: title.to_string(),
            assignee_name: "jan".to_string(),
            status,
            source_message_id: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    #[test]
    fn test_trigger_detection_case_insensitive() {
        assert!(is_bot_message("Hey @BOT help"));
        assert!(is_bot_message("@bot my tasks"));
        assert!(is_bot_message("could you @Bot do this"));
        assert!(!is_bot_message("hello"));
        assert!(!is_bot_message("bot help"));
    }

    #[test]
    fn test_parse_help_variants() {
        assert_eq!(parse_message("@bot help").command, BotCommand::Help);
        assert_eq!(parse_message("@bot ?").command, BotCommand::Help);
        assert_eq!(
            parse_message("@bot what can you do").command,
            BotCommand::Help
        );
        // "help" anywhere outranks a task phrasing
        assert_eq!(
            parse_message("@bot help me remind Jan to call").command,
            BotCommand::Help
        );
    }

    #[test]
    fn test_parse_list_tasks() {
        assert_eq!(
            parse_message("@bot what are my tasks").command,
            BotCommand::ListTasks
        );
        assert_eq!(parse_message("@bot show tasks").command, BotCommand::ListTasks);
        assert_eq!(parse_message("@bot list tasks").command, BotCommand::ListTasks);
    }

    #[test]
    fn test_parse_create_task_remind() {
        let parsed = parse_message("@bot remind Jan to call Ponti");
        assert_eq!(
            parsed.command,
            BotCommand::CreateTask {
                assignee: "Jan".to_string(),
                task_text: "call Ponti".to_string(),
            }
        );
        assert_eq!(parsed.raw_text, "remind Jan to call Ponti");
    }

    #[test]
    fn test_parse_create_task_other_phrasings() {
        let parsed = parse_message("@bot task for Maria: check the Rotterdam route");
        assert_eq!(
            parsed.command,
            BotCommand::CreateTask {
                assignee: "Maria".to_string(),
                task_text: "check the Rotterdam route".to_string(),
            }
        );

        let parsed = parse_message("@bot tell Piet to update supplier prices");
        assert_eq!(
            parsed.command,
            BotCommand::CreateTask {
                assignee: "Piet".to_string(),
                task_text: "update supplier prices".to_string(),
            }
        );

        let parsed = parse_message("@bot Anna needs to confirm the packaging spec");
        assert_eq!(
            parsed.command,
            BotCommand::CreateTask {
                assignee: "Anna".to_string(),
                task_text: "confirm the packaging spec".to_string(),
            }
        );

        let parsed = parse_message("@bot assign Luis: refresh the price list");
        assert_eq!(
            parsed.command,
            BotCommand::CreateTask {
                assignee: "Luis".to_string(),
                task_text: "refresh the price list".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_unknown_keeps_clean_text() {
        let parsed = parse_message("@bot xyz nonsense");
        assert_eq!(parsed.command, BotCommand::Unknown);
        assert_eq!(parsed.raw_text, "xyz nonsense");
    }

    #[test]
    fn test_trigger_stripped_everywhere() {
        let parsed = parse_message("@bot remind Jan to ping @bot later");
        assert_eq!(
            parsed.command,
            BotCommand::CreateTask {
                assignee: "Jan".to_string(),
                task_text: "ping  later".to_string(),
            }
        );
    }

    #[test]
    fn test_format_task_created_echoes_verbatim() {
        let reply = format_task_created("Jan", "call Ponti");
        assert!(reply.contains("Jan"));
        assert!(reply.contains("\"call Ponti\""));
    }

    #[test]
    fn test_format_task_list_markers_and_order() {
        let tasks = vec![
            task("A", BotTaskStatus::Pending),
            task("B", BotTaskStatus::Completed),
        ];
        assert_eq!(format_task_list(&tasks), "Your tasks:\n□ A\n✓ B");
    }

    #[test]
    fn test_format_task_list_empty() {
        assert_eq!(format_task_list(&[]), "You have no pending tasks.");
    }

    #[test]
    fn test_format_unknown_points_at_help() {
        assert!(format_unknown_response().contains("@bot help"));
    }
}
