//! Blocking client for the AnkiConnect add-on.

use crate::error::{DUPLICATE_ERROR, Result, SyncError};
use crate::sync::{ExternalId, SyncClient};
use crate::types::Card;
use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

/// AnkiConnect API version spoken by this client.
pub const API_VERSION: u8 = 6;

/// Where AnkiConnect listens by default.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8765";

#[derive(Serialize)]
struct Request<'a, P> {
    action: &'a str,
    version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<P>,
}

#[derive(Debug, Deserialize)]
struct Response<R> {
    result: Option<R>,
    error: Option<String>,
}

/// Client bound to one deck and note type.
#[derive(Debug, Clone)]
pub struct AnkiConnect {
    client: Client,
    endpoint: String,
    deck: String,
    model: String,
}

impl AnkiConnect {
    pub fn new(
        endpoint: impl Into<String>,
        deck: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            deck: deck.into(),
            model: model.into(),
        })
    }

    pub fn deck(&self) -> &str {
        &self.deck
    }

    /// API version reported by the add-on. Doubles as a connection check.
    pub fn version(&self) -> Result<u32> {
        self.invoke::<(), u32>("version", None)?
            .ok_or_else(|| missing_result("version"))
    }

    /// Create the target deck. A no-op on the Anki side when it exists.
    pub fn create_deck(&self) -> Result<i64> {
        self.invoke::<_, i64>("createDeck", Some(json!({ "deck": self.deck })))?
            .ok_or_else(|| missing_result("createDeck"))
    }

    fn invoke<P: Serialize, R: DeserializeOwned>(
        &self,
        action: &str,
        params: Option<P>,
    ) -> Result<Option<R>> {
        let request = Request {
            action,
            version: API_VERSION,
            params,
        };
        debug!("AnkiConnect {} -> {}", action, self.endpoint);

        let body = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()?
            .error_for_status()?
            .text()?;

        let response: Response<R> =
            serde_json::from_str(&body).map_err(|e| SyncError::MalformedResponse {
                action: action.to_string(),
                message: e.to_string(),
            })?;

        match response.error {
            Some(message) => Err(SyncError::Store {
                action: action.to_string(),
                message,
            }),
            None => Ok(response.result),
        }
    }
}

impl SyncClient for AnkiConnect {
    fn find_notes(&self, front: &str) -> Result<Vec<ExternalId>> {
        let query = front_query(&self.deck, front);
        let ids = self.invoke::<_, Vec<ExternalId>>("findNotes", Some(json!({ "query": query })))?;
        Ok(ids.unwrap_or_default())
    }

    fn create(&self, card: &Card) -> Result<ExternalId> {
        let params = json!({
            "note": {
                "deckName": self.deck,
                "modelName": self.model,
                "fields": { "Front": card.front, "Back": card.back },
                "tags": card.tags,
            }
        });

        match self.invoke::<_, ExternalId>("addNote", Some(params)) {
            Ok(Some(id)) => Ok(id),
            Ok(None) => Err(missing_result("addNote")),
            Err(SyncError::Store { message, .. }) if message == DUPLICATE_ERROR => {
                Err(SyncError::DuplicateNote(card.front.clone()))
            }
            Err(e) => Err(e),
        }
    }

    fn update(&self, id: ExternalId, card: &Card) -> Result<()> {
        let params = json!({
            "note": {
                "id": id,
                "fields": { "Back": card.back },
                "tags": card.tags,
            }
        });
        self.invoke::<_, serde_json::Value>("updateNote", Some(params))?;
        Ok(())
    }
}

fn missing_result(action: &str) -> SyncError {
    SyncError::MalformedResponse {
        action: action.to_string(),
        message: "response has neither result nor error".to_string(),
    }
}

/// Anki search query matching notes in `deck` whose Front field equals `front`.
pub fn front_query(deck: &str, front: &str) -> String {
    format!(
        "deck:\"{}\" \"Front:{}\"",
        escape_search(deck),
        escape_search(front)
    )
}

// Inside a quoted search term, `*` and `_` are wildcards and `"` ends the term.
fn escape_search(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '"' | '*' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TagSet;

    #[test]
    fn test_front_query() {
        assert_eq!(
            front_query("Default", "Rust Ownership"),
            r#"deck:"Default" "Front:Rust Ownership""#
        );
    }

    #[test]
    fn test_front_query_escapes_specials() {
        assert_eq!(
            front_query("My \"Deck\"", r"snake_case * a\b"),
            r#"deck:"My \"Deck\"" "Front:snake\_case \* a\\b""#
        );
    }

    #[test]
    fn test_request_serialization() {
        let request = Request {
            action: "version",
            version: API_VERSION,
            params: None::<()>,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({ "action": "version", "version": 6 }));
    }

    #[test]
    fn test_response_parsing() {
        let ok: Response<ExternalId> =
            serde_json::from_str(r#"{"result": 1496198395707, "error": null}"#).unwrap();
        assert_eq!(ok.result, Some(1496198395707));
        assert!(ok.error.is_none());

        let err: Response<ExternalId> =
            serde_json::from_str(&format!(r#"{{"result": null, "error": "{}"}}"#, DUPLICATE_ERROR))
                .unwrap();
        assert!(err.result.is_none());
        assert_eq!(err.error.as_deref(), Some(DUPLICATE_ERROR));

        let unit: Response<serde_json::Value> =
            serde_json::from_str(r#"{"result": null, "error": null}"#).unwrap();
        assert!(unit.result.is_none());
    }

    #[test]
    fn test_tags_serialize_as_list() {
        let tags: TagSet = ["b".to_string(), "a".to_string()].into_iter().collect();
        assert_eq!(json!({ "tags": tags }), json!({ "tags": ["a", "b"] }));
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to run AnkiConnect
        let client = AnkiConnect::new(
            "http://127.0.0.1:9",
            "Default",
            "Basic",
            Duration::from_millis(500),
        )
        .unwrap();
        let err = client.version().unwrap_err();
        assert!(matches!(err, SyncError::Transport(_)));
    }
}
