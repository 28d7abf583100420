//! Bot command parsing and reply template tests
//!
//! The parser is a total function over arbitrary message text: every input
//! classifies into help, list-tasks, create-task, or unknown, in that fixed
//! priority order. Replies are fixed templates shared between the WhatsApp
//! webhook and the browser terminal.

use chrono::Utc;
use proptest::prelude::*;
use uuid::Uuid;

use shared::chatbot::{
    format_help_response, format_task_created, format_task_list, format_unknown_response,
    is_bot_message, parse_message, BotCommand, BOT_TRIGGER,
};
use shared::models::{BotTask, BotTaskStatus};

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

// =============================================================================
// Trigger Detection
// =============================================================================

mod trigger_detection {
    use super::*;

    #[test]
    fn trigger_matches_any_case() {
        assert!(is_bot_message("Hey @BOT help"));
        assert!(is_bot_message("@bot my tasks"));
        assert!(is_bot_message("@Bot ?"));
        assert!(is_bot_message("@bOt remind Jan to call"));
    }

    #[test]
    fn trigger_matches_anywhere_in_text() {
        assert!(is_bot_message("could someone ask @bot to list tasks"));
        assert!(is_bot_message("trailing @bot"));
    }

    #[test]
    fn plain_chat_is_not_for_the_bot() {
        assert!(!is_bot_message("hello"));
        assert!(!is_bot_message("bot help"));
        assert!(!is_bot_message("the robot is down"));
        assert!(!is_bot_message(""));
    }
}

// =============================================================================
// Intent Priority
// =============================================================================

mod intent_priority {
    use super::*;

    #[test]
    fn help_outranks_everything() {
        // "help" present alongside a valid create-task phrasing
        assert_eq!(
            parse_message("@bot help me remind Jan to call Ponti").command,
            BotCommand::Help
        );
        // and alongside a list phrasing
        assert_eq!(
            parse_message("@bot help with my tasks").command,
            BotCommand::Help
        );
    }

    #[test]
    fn list_outranks_create() {
        // "my tasks" present alongside a "needs to" phrasing
        assert_eq!(
            parse_message("@bot what are my tasks, Jan needs to know").command,
            BotCommand::ListTasks
        );
    }

    #[test]
    fn question_mark_alone_is_help() {
        assert_eq!(parse_message("@bot ?").command, BotCommand::Help);
    }

    #[test]
    fn what_can_you_do_is_help() {
        assert_eq!(
            parse_message("@bot what can you do").command,
            BotCommand::Help
        );
    }

    #[test]
    fn unmatched_text_is_unknown() {
        let parsed = parse_message("@bot xyz nonsense");
        assert_eq!(parsed.command, BotCommand::Unknown);
        assert_eq!(parsed.raw_text, "xyz nonsense");
    }
}

// =============================================================================
// Create-Task Phrasings
// =============================================================================

mod create_task_phrasings {
    use super::*;

    fn assert_creates(text: &str, assignee: &str, task_text: &str) {
        let parsed = parse_message(text);
        assert_eq!(
            parsed.command,
            BotCommand::CreateTask {
                assignee: assignee.to_string(),
                task_text: task_text.to_string(),
            },
            "failed for input: {}",
            text
        );
    }

    #[test]
    fn remind_phrasing() {
        assert_creates("@bot remind Jan to call Ponti", "Jan", "call Ponti");
    }

    #[test]
    fn task_for_phrasing_with_and_without_colon() {
        assert_creates("@bot task for Jan: call Ponti", "Jan", "call Ponti");
        assert_creates("@bot task for Jan call Ponti", "Jan", "call Ponti");
    }

    #[test]
    fn tell_phrasing() {
        assert_creates("@bot tell Jan to call Ponti", "Jan", "call Ponti");
    }

    #[test]
    fn needs_to_phrasing() {
        assert_creates("@bot Jan needs to call Ponti", "Jan", "call Ponti");
        // Singular "need" matches too
        assert_creates("@bot Jan need to call Ponti", "Jan", "call Ponti");
    }

    #[test]
    fn assign_phrasing_with_and_without_colon() {
        assert_creates("@bot assign Jan: call Ponti", "Jan", "call Ponti");
        assert_creates("@bot assign Jan call Ponti", "Jan", "call Ponti");
    }

    #[test]
    fn phrasings_match_case_insensitively() {
        assert_creates("@bot REMIND Jan TO call Ponti", "Jan", "call Ponti");
        assert_creates("@bot Task For Jan: call Ponti", "Jan", "call Ponti");
    }

    #[test]
    fn task_text_is_trimmed() {
        assert_creates("@bot remind Jan to   call Ponti  ", "Jan", "call Ponti");
    }

    #[test]
    fn multi_word_assignee_defeats_the_patterns() {
        // Every phrasing captures a single-word name; a surname in between
        // breaks the match and the message falls through to unknown
        let parsed = parse_message("@bot remind Jan Pieterszoon to call Ponti");
        assert_eq!(parsed.command, BotCommand::Unknown);
        assert_eq!(parsed.raw_text, "remind Jan Pieterszoon to call Ponti");
    }
}

// =============================================================================
// JSON Wire Shape
// =============================================================================

mod json_shape {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn create_task_serializes_with_intent_tag() {
        let parsed = parse_message("@bot remind Jan to call Ponti");
        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(
            value,
            json!({
                "intent": "create_task",
                "assignee": "Jan",
                "task_text": "call Ponti",
                "raw_text": "remind Jan to call Ponti",
            })
        );
    }

    #[test]
    fn unit_intents_serialize_flat() {
        let value = serde_json::to_value(parse_message("@bot what are my tasks")).unwrap();
        assert_eq!(value["intent"], Value::from("list_tasks"));

        let value = serde_json::to_value(parse_message("@bot ?")).unwrap();
        assert_eq!(value["intent"], Value::from("help"));

        let value = serde_json::to_value(parse_message("@bot xyz nonsense")).unwrap();
        assert_eq!(value["intent"], Value::from("unknown"));
        assert_eq!(value["raw_text"], Value::from("xyz nonsense"));
    }
}

// =============================================================================
// Reply Templates
// =============================================================================

mod reply_templates {
    use super::*;

    #[test]
    fn task_list_uses_status_markers() {
        let tasks = vec![
            task("A", BotTaskStatus::Pending),
            task("B", BotTaskStatus::Completed),
        ];
        assert_eq!(format_task_list(&tasks), "Your tasks:\n□ A\n✓ B");
    }

    #[test]
    fn task_list_preserves_input_order() {
        let tasks = vec![
            task("call Ponti", BotTaskStatus::Pending),
            task("check Rotterdam route", BotTaskStatus::Pending),
            task("update prices", BotTaskStatus::Completed),
        ];
        assert_eq!(
            format_task_list(&tasks),
            "Your tasks:\n□ call Ponti\n□ check Rotterdam route\n✓ update prices"
        );
    }

    #[test]
    fn empty_task_list_has_its_own_message() {
        assert_eq!(format_task_list(&[]), "You have no pending tasks.");
    }

    #[test]
    fn task_created_confirmation_quotes_the_task() {
        assert_eq!(
            format_task_created("Jan", "call Ponti"),
            "✅ Task created for Jan: \"call Ponti\""
        );
    }

    #[test]
    fn help_lists_every_command_family() {
        let help = format_help_response();
        assert!(help.contains("remind"));
        assert!(help.contains("task for"));
        assert!(help.contains("assign"));
        assert!(help.contains("my tasks"));
        assert!(help.contains("@bot help"));
    }

    #[test]
    fn unknown_reply_points_at_help() {
        assert!(format_unknown_response().contains("@bot help"));
    }
}

// =============================================================================
// Property-Based Tests
// =============================================================================

mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The parser is total: any text classifies without panicking
        #[test]
        fn prop_parse_never_panics(text in ".{0,200}") {
            let _ = parse_message(&text);
        }

        /// Trigger detection is case-insensitive and position-independent
        #[test]
        fn prop_trigger_detected_in_any_case(
            prefix in "[a-z ]{0,20}",
            suffix in "[a-z ]{0,20}",
            upcase_mask in proptest::collection::vec(any::<bool>(), 4),
        ) {
            let trigger: String = BOT_TRIGGER
                .chars()
                .zip(upcase_mask.iter().chain(std::iter::repeat(&false)))
                .map(|(c, up)| if *up { c.to_ascii_uppercase() } else { c })
                .collect();
            let text = format!("{}{}{}", prefix, trigger, suffix);
            prop_assert!(is_bot_message(&text));
        }

        /// Text without the trigger is never treated as a bot message
        #[test]
        fn prop_no_trigger_no_bot(text in "[a-zA-Z0-9 .,!?]{0,100}") {
            prop_assume!(!text.to_lowercase().contains(BOT_TRIGGER));
            prop_assert!(!is_bot_message(&text));
        }

        /// The remind phrasing always extracts assignee and task verbatim
        #[test]
        fn prop_remind_extracts_fields(
            assignee in "[A-Za-z]{2,12}",
            task_text in "[a-z][a-z ]{0,40}[a-z]",
        ) {
            let message = format!("@bot remind {} to {}", assignee, task_text);

            // A help or list phrase anywhere in the message would outrank
            // the create-task patterns
            let lower = message.to_lowercase();
            prop_assume!(!lower.contains("help"));
            prop_assume!(!lower.contains("tasks"));
            prop_assume!(!lower.contains("what can you do"));

            let parsed = parse_message(&message);
            prop_assert_eq!(
                parsed.command,
                BotCommand::CreateTask {
                    assignee,
                    task_text: task_text.trim().to_string(),
                }
            );
        }

        /// The trigger token is stripped wherever it sits in the message
        #[test]
        fn prop_raw_text_has_trigger_stripped(
            prefix in "[a-zA-Z0-9 .,]{0,50}",
            suffix in "[a-zA-Z0-9 .,]{0,50}",
        ) {
            let parsed = parse_message(&format!("{}@BoT{}", prefix, suffix));
            prop_assert!(!parsed.raw_text.to_lowercase().contains(BOT_TRIGGER));
        }

        /// One line per task plus the header, in input order
        #[test]
        fn prop_task_list_line_count(
            titles in proptest::collection::vec("[a-z]{1,20}", 1..10)
        ) {
            let tasks: Vec<BotTask> = titles
                .iter()
                .map(|t| task(t, BotTaskStatus::Pending))
                .collect();
            let reply = format_task_list(&tasks);
            prop_assert_eq!(reply.lines().count(), titles.len() + 1);
        }
    }
}
