//! Client for the Gemini generative endpoints (recipe content and chat)

use crate::error::{AppError, Result};
use crate::models::{AppMode, GeneratedContent};
use crate::prompts;
use log::info;
use serde_json::{json, Value};
use std::collections::HashSet;

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Talks to the generative service. One instance per process; the HTTP
/// client itself is created per request.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self { api_key, model }
    }

    /// Fetches the definition, process flowchart and playlist id for a recipe
    pub async fn fetch_preserve_details(
        &self,
        preserve_name: &str,
        mode: AppMode,
    ) -> Result<GeneratedContent> {
        if preserve_name.trim().is_empty() {
            return Err(AppError::ContentFetch("empty recipe name".to_string()));
        }

        let body = json!({
            "contents": [{
                "parts": [{ "text": prompts::content_prompt(preserve_name, mode) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": content_schema(),
            }
        });

        let raw = self.generate(body).await.map_err(AppError::ContentFetch)?;
        let content = parse_generated_content(&raw).map_err(AppError::ContentFetch)?;
        info!(
            "[content] received {} process steps for '{}'",
            content.process.len(),
            preserve_name
        );
        Ok(content)
    }

    /// Answers a free-text question about the current recipe
    pub async fn fetch_chat_reply(&self, query: &str, preserve_name: &str) -> Result<String> {
        let body = json!({
            "contents": [{
                "parts": [{ "text": prompts::chat_prompt(query, preserve_name) }]
            }]
        });
        self.generate(body).await.map_err(AppError::ChatFetch)
    }

    /// Posts one generateContent request and extracts the reply text
    async fn generate(&self, body: Value) -> std::result::Result<String, String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| "API key not configured".to_string())?;
        let url = format!("{}/models/{}:generateContent", API_BASE_URL, self.model);

        let client = reqwest::Client::new();
        let response = client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("API request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(format!("API error {}: {}", status, error_text));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse API response: {}", e))?;

        response_json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|text| text.to_string())
            .ok_or_else(|| "API response contained no text".to_string())
    }
}

/// Response schema sent with every content request, mirroring `GeneratedContent`
fn content_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "definition": {
                "type": "STRING",
                "description": "La definición oficial del producto según el Código Alimentario Argentino. Debe ser concisa y precisa."
            },
            "process": {
                "type": "ARRAY",
                "description": "El proceso de elaboración paso a paso, diseñado para conservas caseras seguras.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": {
                            "type": "NUMBER",
                            "description": "Un identificador numérico secuencial para el paso, comenzando en 1."
                        },
                        "title": {
                            "type": "STRING",
                            "description": "Un título breve para el paso del proceso."
                        },
                        "description": {
                            "type": "STRING",
                            "description": "Una explicación detallada del paso, enfocada en la seguridad y las buenas prácticas."
                        },
                        "shape": {
                            "type": "STRING",
                            "description": "La forma para el diagrama de flujo. Usa 'terminator' para inicio/fin, 'rectangle' para procesos, y 'diamond' para puntos de control o decisiones críticas."
                        }
                    },
                    "required": ["id", "title", "description", "shape"]
                }
            },
            "youtubePlaylistId": {
                "type": "STRING",
                "description": "El ID de una lista de reproducción de YouTube relevante con tutoriales para hacer esta conserva. Por ejemplo: 'PLASDFGHJKL12345'."
            }
        },
        "required": ["definition", "process", "youtubePlaylistId"]
    })
}

fn extract_json_object(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if start >= end {
        return None;
    }
    Some(raw[start..=end].to_string())
}

/// Parses and validates a structured content reply, sorting steps by id.
/// The service enforces the schema best-effort only, so the shape is
/// checked again here before it is accepted.
fn parse_generated_content(raw: &str) -> std::result::Result<GeneratedContent, String> {
    let trimmed = raw.trim();
    let mut content = serde_json::from_str::<GeneratedContent>(trimmed).or_else(|_| {
        let maybe_json = extract_json_object(trimmed)
            .ok_or_else(|| "Response did not contain a JSON object".to_string())?;
        serde_json::from_str::<GeneratedContent>(&maybe_json)
            .map_err(|e| format!("Failed to parse content JSON: {}", e))
    })?;

    if content.definition.trim().is_empty() {
        return Err("Response has an empty definition".to_string());
    }
    if content.process.is_empty() {
        return Err("Response has no process steps".to_string());
    }
    let mut seen = HashSet::new();
    for step in &content.process {
        if !seen.insert(step.id) {
            return Err(format!("Duplicate step id {} in response", step.id));
        }
    }

    content.process.sort_by_key(|step| step.id);
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StepShape;

    fn raw_content(process: &str) -> String {
        format!(
            r#"{{
                "definition": "Se entiende por mermelada de frutilla...",
                "process": {},
                "youtubePlaylistId": "PL123"
            }}"#,
            process
        )
    }

    #[test]
    fn test_steps_sorted_ascending_by_id() {
        let raw = raw_content(
            r#"[
                { "id": 3, "title": "Fin", "description": "d", "shape": "terminator" },
                { "id": 1, "title": "Inicio", "description": "d", "shape": "terminator" },
                { "id": 2, "title": "Cocinar", "description": "d", "shape": "rectangle" }
            ]"#,
        );
        let content = parse_generated_content(&raw).unwrap();
        let ids: Vec<u32> = content.process.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(content.process[0].shape, StepShape::Terminator);
        assert_eq!(content.process[1].title, "Cocinar");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let raw = raw_content(
            r#"[
                { "id": 1, "title": "a", "description": "d", "shape": "terminator" },
                { "id": 1, "title": "b", "description": "d", "shape": "rectangle" }
            ]"#,
        );
        let err = parse_generated_content(&raw).unwrap_err();
        assert!(err.contains("Duplicate step id 1"));
    }

    #[test]
    fn test_empty_process_rejected() {
        let raw = raw_content("[]");
        assert!(parse_generated_content(&raw).is_err());
    }

    #[test]
    fn test_empty_definition_rejected() {
        let raw = r#"{
            "definition": "   ",
            "process": [{ "id": 1, "title": "a", "description": "d", "shape": "oval" }],
            "youtubePlaylistId": "PL123"
        }"#;
        assert!(parse_generated_content(raw).is_err());
    }

    #[test]
    fn test_fenced_reply_recovered_by_brace_window() {
        let raw = format!(
            "```json\n{}\n```",
            raw_content(r#"[{ "id": 1, "title": "a", "description": "d", "shape": "terminator" }]"#)
        );
        let content = parse_generated_content(&raw).unwrap();
        assert_eq!(content.youtube_playlist_id, "PL123");
    }

    #[test]
    fn test_plain_text_reply_rejected() {
        assert!(parse_generated_content("no JSON here").is_err());
    }

    #[test]
    fn test_extract_json_object_window() {
        assert_eq!(
            extract_json_object("prefix {\"a\": 1} suffix").as_deref(),
            Some("{\"a\": 1}")
        );
        assert!(extract_json_object("}{").is_none());
        assert!(extract_json_object("nothing").is_none());
    }
}
