use std::time::Duration;

use doodle_engine::command::fallback::{CommandFallback, FallbackError};
use doodle_engine::command::tables::color_hex;
use doodle_engine::scene::is_hex_color;
use shared::ParsedCommand;

use crate::config::ServerConfig;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 512;

const SYSTEM_PROMPT: &str = r##"
You translate requests for a 3D sketching tool into a single JSON command.

Respond with ONLY a JSON object, no prose and no code fences:
{
    "action": "create" | "delete" | "modify" | "clear" | "unknown",
    "objectKind": "cube" | "sphere" | "cylinder" | "cone" | "torus" | "pyramid" | "plane" | "text3d" | "molecule",
    "properties": {
        "color": "#RRGGBB",
        "size": f64,
        "position": [x, y, z],
        "text": string,
        "moleculeName": string,
        "count": integer 1-20,
        "arrangement": "line" | "circle" | "grid",
        "materialHints": { "metallic": bool, "transparent": bool, "glowing": bool, "wireframe": bool }
    }
}

Omit fields you do not need. "delete" and "modify" act on the most recent
object of objectKind. If the request cannot be expressed, answer
{"action": "unknown", "error": "<short reason>"}.

Example: "put three shiny golden balls next to each other" ->
{"action": "create", "objectKind": "sphere", "properties": {"color": "#FFD700", "count": 3, "arrangement": "line", "materialHints": {"metallic": true}}}
"##;

/// Command fallback backed by the Anthropic messages API.
pub struct AnthropicFallback {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl AnthropicFallback {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &ServerConfig) -> Option<Self> {
        let api_key = config.ai_api_key.as_ref()?;
        Some(Self::new(api_key, &config.ai_model, config.ai_timeout))
    }

    async fn request(&self, input: &str) -> Result<String, FallbackError> {
        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "model": self.model,
                "max_tokens": MAX_TOKENS,
                "system": SYSTEM_PROMPT,
                "messages": [
                    { "role": "user", "content": input }
                ]
            }))
            .send()
            .await
            .map_err(|e| FallbackError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FallbackError::Request(format!("HTTP {}", status)));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| FallbackError::InvalidResponse(e.to_string()))?;

        // Извлекаем текст из ответа Claude
        body["content"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|block| block["text"].as_str())
            .map(str::to_string)
            .ok_or_else(|| FallbackError::InvalidResponse("no text block".into()))
    }
}

impl CommandFallback for AnthropicFallback {
    async fn interpret(&self, input: &str) -> Result<ParsedCommand, FallbackError> {
        let text = self.request(input).await?;
        parse_fallback_reply(&text)
    }
}

/// Turn the model's reply into a command.
///
/// Code fences around the JSON are tolerated. Colors given by name are
/// mapped through the color table; anything else that is not `#RRGGBB` is
/// dropped.
pub fn parse_fallback_reply(text: &str) -> Result<ParsedCommand, FallbackError> {
    let json = strip_code_fence(text);
    let mut command: ParsedCommand = serde_json::from_str(json)
        .map_err(|e| FallbackError::InvalidResponse(e.to_string()))?;

    if let Some(props) = command.properties.as_mut() {
        props.color = props.color.take().and_then(|color| {
            if is_hex_color(&color) {
                Some(color.to_uppercase())
            } else {
                color_hex(&color.to_lowercase()).map(str::to_string)
            }
        });
        if props.is_empty() {
            command.properties = None;
        }
    }
    Ok(command)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip an optional language tag on the opening line.
    let rest = rest.split_once('\n').map_or(rest, |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Arrangement, CommandAction, CommandTarget};

    #[test]
    fn test_parse_plain_reply() {
        let cmd = parse_fallback_reply(
            r#"{"action": "create", "objectKind": "sphere", "properties": {"count": 3, "arrangement": "line"}}"#,
        )
        .unwrap();
        assert_eq!(cmd.action, CommandAction::Create);
        assert_eq!(cmd.object_kind, Some(CommandTarget::Sphere));
        let props = cmd.properties.unwrap();
        assert_eq!(props.count, Some(3));
        assert_eq!(props.arrangement, Some(Arrangement::Line));
    }

    #[test]
    fn test_parse_fenced_reply() {
        let cmd = parse_fallback_reply("```json\n{\"action\": \"clear\"}\n```").unwrap();
        assert_eq!(cmd.action, CommandAction::Clear);
    }

    #[test]
    fn test_color_names_are_mapped() {
        let cmd = parse_fallback_reply(
            r#"{"action": "modify", "properties": {"color": "Red"}}"#,
        )
        .unwrap();
        assert_eq!(
            cmd.properties.unwrap().color.as_deref(),
            color_hex("red")
        );

        let cmd = parse_fallback_reply(
            r##"{"action": "modify", "properties": {"color": "#ff8800"}}"##,
        )
        .unwrap();
        assert_eq!(cmd.properties.unwrap().color.as_deref(), Some("#FF8800"));
    }

    #[test]
    fn test_unusable_color_is_dropped() {
        let cmd = parse_fallback_reply(
            r#"{"action": "create", "objectKind": "cube", "properties": {"color": "sunset"}}"#,
        )
        .unwrap();
        assert_eq!(cmd.properties, None);
    }

    #[test]
    fn test_invalid_reply() {
        let err = parse_fallback_reply("I think you want a sphere").unwrap_err();
        assert!(matches!(err, FallbackError::InvalidResponse(_)));
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = ServerConfig::from_lookup(|_| None);
        assert!(AnthropicFallback::from_config(&config).is_none());

        let config = ServerConfig::from_lookup(|key| {
            (key == "ANTHROPIC_API_KEY").then(|| "sk-test".to_string())
        });
        assert!(AnthropicFallback::from_config(&config).is_some());
    }
}
