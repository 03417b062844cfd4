//! Test fixtures and factory functions for creating test data.

use serde_json::json;

/// Create a user register request body.
pub fn register_request(name: Option<&str>) -> serde_json::Value {
    match name {
        Some(n) => json!({ "name": n }),
        None => json!({ "name": null }),
    }
}

/// Create a deck request body.
pub fn create_deck_request(title: &str) -> serde_json::Value {
    json!({ "title": title })
}

/// Create a card request body.
pub fn card_request(question: &str, answer: &str) -> serde_json::Value {
    json!({ "question": question, "answer": answer })
}

/// Create a bulk import request body from (q, a) pairs.
pub fn import_request(pairs: &[(&str, &str)]) -> serde_json::Value {
    let items: Vec<serde_json::Value> =
        pairs.iter().map(|(q, a)| json!({ "q": q, "a": a })).collect();
    json!({ "data": serde_json::to_string(&items).unwrap() })
}

/// Create a study start request body.
pub fn study_start_request(mode: &str) -> serde_json::Value {
    json!({ "mode": mode, "direction": "normal", "shuffle": false })
}

/// Create a test start request body.
pub fn test_start_request(question_count: usize, typing_ratio: u32) -> serde_json::Value {
    json!({ "question_count": question_count, "typing_ratio": typing_ratio })
}
