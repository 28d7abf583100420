//! WebAssembly module for the Produce Trading Platform
//!
//! Provides client-side computation for the trading terminal:
//! - Readiness scoring and labels for trade potentials
//! - Bot command parsing and reply previews
//! - Offline data validation

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::chatbot;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn parse_potential(potential_json: &str) -> Result<TradePotential, JsValue> {
    serde_json::from_str(potential_json).map_err(|e| {
        let message = format!("Invalid potential JSON: {}", e);
        web_sys::console::error_1(&JsValue::from_str(&message));
        JsValue::from_str(&message)
    })
}

/// Compute the readiness score for a JSON-encoded trade potential
#[wasm_bindgen]
pub fn compute_readiness_score(potential_json: &str) -> Result<i32, JsValue> {
    let potential = parse_potential(potential_json)?;
    Ok(readiness_score(&potential))
}

/// Priority label for a readiness score, e.g. "Hot Lead"
#[wasm_bindgen]
pub fn readiness_label_for(score: i32) -> String {
    format!("{}", readiness_label(score))
}

/// Display color tag for a readiness score, e.g. "red"
#[wasm_bindgen]
pub fn readiness_color_for(score: i32) -> String {
    readiness_label(score).color().to_string()
}

/// Score and label a JSON-encoded trade potential in one call
#[wasm_bindgen]
pub fn describe_potential(potential_json: &str) -> Result<String, JsValue> {
    let potential = parse_potential(potential_json)?;
    let score = readiness_score(&potential);
    let label = readiness_label(score);

    let description = serde_json::json!({
        "score": score,
        "label": format!("{}", label),
        "color": label.color(),
    });
    Ok(description.to_string())
}

/// Sort a JSON array of trade potentials by descending readiness score
#[wasm_bindgen]
pub fn sort_potentials(potentials_json: &str) -> Result<String, JsValue> {
    let potentials: Vec<TradePotential> = serde_json::from_str(potentials_json).map_err(|e| {
        let message = format!("Invalid potentials JSON: {}", e);
        web_sys::console::error_1(&JsValue::from_str(&message));
        JsValue::from_str(&message)
    })?;

    let sorted = sort_by_readiness_score(&potentials);
    serde_json::to_string(&sorted)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// True when the text addresses the bot (case-insensitive trigger match)
#[wasm_bindgen]
pub fn is_bot_message(text: &str) -> bool {
    chatbot::is_bot_message(text)
}

/// Parse a bot message into its intent as a JSON string
#[wasm_bindgen]
pub fn parse_bot_message(text: &str) -> Result<String, JsValue> {
    let parsed = chatbot::parse_message(text);
    serde_json::to_string(&parsed)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Render the task-list reply the bot would send for these tasks
#[wasm_bindgen]
pub fn preview_task_list(tasks_json: &str) -> Result<String, JsValue> {
    let tasks: Vec<BotTask> = serde_json::from_str(tasks_json).map_err(|e| {
        let message = format!("Invalid tasks JSON: {}", e);
        web_sys::console::error_1(&JsValue::from_str(&message));
        JsValue::from_str(&message)
    })?;
    Ok(chatbot::format_task_list(&tasks))
}

/// The fixed help reply listing the supported bot commands
#[wasm_bindgen]
pub fn bot_help_text() -> String {
    chatbot::format_help_response()
}

/// Whether a price validity window covers the given date (ISO dates in, so
/// the browser supplies its own notion of today)
#[wasm_bindgen]
pub fn price_is_current(valid_from: &str, valid_until: Option<String>, today: &str) -> bool {
    let Ok(from) = valid_from.parse() else {
        return false;
    };
    let Ok(on) = today.parse() else {
        return false;
    };
    let until = match valid_until {
        Some(s) => match s.parse() {
            Ok(d) => Some(d),
            Err(_) => return false,
        },
        None => None,
    };
    validity_covers(from, until, on)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_label_for() {
        assert_eq!(readiness_label_for(90), "Hot Lead");
        assert_eq!(readiness_label_for(55), "High Priority");
        assert_eq!(readiness_label_for(35), "Ready");
        assert_eq!(readiness_label_for(15), "Needs Work");
        assert_eq!(readiness_label_for(0), "Low Priority");
    }

    #[test]
    fn test_readiness_color_for() {
        assert_eq!(readiness_color_for(90), "red");
        assert_eq!(readiness_color_for(0), "gray");
    }

    #[test]
    fn test_compute_score_from_json() {
        let json = r#"{
            "id": "6f8ff2b0-82ec-4c43-90a4-0d1df9ab1e01",
            "status": "complete",
            "supplier_price": null,
            "opportunity": null,
            "has_opportunity": false,
            "is_active_opportunity": false
        }"#;
        assert_eq!(compute_readiness_score(json).unwrap(), 40);
    }

    #[test]
    fn test_sort_potentials() {
        let json = r#"[
            {
                "id": "11111111-1111-1111-1111-111111111111",
                "status": "missing_both",
                "supplier_price": null,
                "opportunity": null,
                "has_opportunity": false,
                "is_active_opportunity": false
            },
            {
                "id": "22222222-2222-2222-2222-222222222222",
                "status": "complete",
                "supplier_price": null,
                "opportunity": null,
                "has_opportunity": false,
                "is_active_opportunity": false
            }
        ]"#;
        let sorted = sort_potentials(json).unwrap();
        let complete = sorted.find("22222222").unwrap();
        let missing = sorted.find("11111111").unwrap();
        assert!(complete < missing);
    }

    #[test]
    fn test_is_bot_message() {
        assert!(is_bot_message("Hey @BOT help"));
        assert!(!is_bot_message("hello"));
    }

    #[test]
    fn test_parse_bot_message_to_json() {
        let json = parse_bot_message("@bot what are my tasks").unwrap();
        assert!(json.contains("\"intent\":\"list_tasks\""));
    }

    #[test]
    fn test_describe_potential() {
        let json = r#"{
            "id": "6f8ff2b0-82ec-4c43-90a4-0d1df9ab1e01",
            "status": "missing_both",
            "supplier_price": null,
            "opportunity": null,
            "has_opportunity": false,
            "is_active_opportunity": false
        }"#;
        let description = describe_potential(json).unwrap();
        assert!(description.contains("\"score\":0"));
        assert!(description.contains("\"label\":\"Low Priority\""));
        assert!(description.contains("\"color\":\"gray\""));
    }

    #[test]
    fn test_price_is_current() {
        assert!(price_is_current("2025-03-01", None, "2025-06-01"));
        assert!(!price_is_current(
            "2025-03-01",
            Some("2025-03-31".to_string()),
            "2025-06-01"
        ));
        assert!(!price_is_current("not-a-date", None, "2025-06-01"));
    }
}
