//! Wire types for the generative API.
//!
//! These mirror the REST `generateContent` and `predictLongRunning` payloads.
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use super::error::GenerationError;

// =============================================================================
// generateContent
// =============================================================================

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// A turn of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A user turn made of the given parts.
    #[must_use]
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }
}

/// One part of a content turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Inline binary data.
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    /// Plain text.
    Text { text: String },
    /// Anything else the model may emit; kept so unknown parts don't fail parsing.
    Other(serde_json::Value),
}

impl Part {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    #[must_use]
    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::InlineData {
            inline_data: Blob {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }
}

/// Base64 payload with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

/// Generation options.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<Modality>,
}

/// Output modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modality {
    Image,
    Text,
}

/// Response body of `generateContent`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// A response candidate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Prompt-level safety feedback.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
    #[serde(default)]
    pub block_reason_message: Option<String>,
}

impl GenerateContentResponse {
    /// Take the first inline image of the first candidate.
    ///
    /// # Errors
    ///
    /// - `ContentBlocked` if the prompt feedback carries a block reason
    /// - `NoImage` if candidates exist but none holds an image
    /// - `EmptyResponse` if there are no candidates and no block reason
    pub fn into_first_image(self) -> Result<Blob, GenerationError> {
        let Self {
            candidates,
            prompt_feedback,
        } = self;

        if let Some(blob) = candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| {
                content.parts.iter().find_map(|part| match part {
                    Part::InlineData { inline_data } => Some(inline_data.clone()),
                    _ => None,
                })
            })
        {
            return Ok(blob);
        }

        if let Some(feedback) = prompt_feedback {
            if let Some(reason) = feedback.block_reason {
                let reason = feedback
                    .block_reason_message
                    .map_or_else(|| reason.clone(), |msg| format!("{reason}: {msg}"));
                return Err(GenerationError::ContentBlocked { reason });
            }
        }

        match candidates.into_iter().next() {
            Some(candidate) => Err(GenerationError::NoImage {
                finish_reason: candidate.finish_reason,
            }),
            None => Err(GenerationError::EmptyResponse),
        }
    }
}

// =============================================================================
// predictLongRunning
// =============================================================================

/// Request body for `models/{model}:predictLongRunning`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictVideoRequest {
    pub instances: Vec<VideoInstance>,
    pub parameters: VideoParameters,
}

/// A single video prompt.
#[derive(Debug, Clone, Serialize)]
pub struct VideoInstance {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<VideoImage>,
}

/// Starting frame for image-to-video.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoImage {
    pub bytes_base64_encoded: String,
    pub mime_type: String,
}

/// Video generation options.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoParameters {
    pub aspect_ratio: String,
}

impl Default for VideoParameters {
    fn default() -> Self {
        Self {
            aspect_ratio: "9:16".to_string(),
        }
    }
}

/// A long-running operation handle.
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub response: Option<OperationResponse>,
    #[serde(default)]
    pub error: Option<OperationError>,
}

/// Payload of a finished video operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    #[serde(default)]
    pub generate_video_response: Option<GenerateVideoResponse>,
}

/// Generated samples.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
    #[serde(default)]
    pub rai_media_filtered_reasons: Vec<String>,
}

/// One generated sample.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedSample {
    #[serde(default)]
    pub video: Option<VideoRef>,
}

/// Downloadable video reference.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoRef {
    pub uri: String,
}

/// Operation failure.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl Operation {
    /// Resolve a finished operation to its video URI.
    ///
    /// # Errors
    ///
    /// - `ContentBlocked` if the output was filtered
    /// - `Api` if the operation failed
    /// - `NoVideo` if it finished without a sample
    pub fn into_video_uri(self) -> Result<String, GenerationError> {
        if let Some(error) = self.error {
            return Err(GenerationError::Api {
                status: error.code.to_string(),
                message: error.message,
            });
        }

        let response = self
            .response
            .and_then(|r| r.generate_video_response)
            .unwrap_or_default();

        if !response.rai_media_filtered_reasons.is_empty() {
            return Err(GenerationError::ContentBlocked {
                reason: response.rai_media_filtered_reasons.join("; "),
            });
        }

        response
            .generated_samples
            .into_iter()
            .find_map(|sample| sample.video.map(|v| v.uri))
            .ok_or(GenerationError::NoVideo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).expect("deserialize")
    }

    #[test]
    fn test_request_serialization() {
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::inline("image/png", "AAAA"),
                Part::text("dress her"),
            ])],
            generation_config: Some(GenerationConfig {
                response_modalities: vec![Modality::Image, Modality::Text],
            }),
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value["contents"][0]["parts"][0]["inlineData"]["mimeType"],
            "image/png"
        );
        assert_eq!(value["contents"][0]["parts"][1]["text"], "dress her");
        assert_eq!(
            value["generationConfig"]["responseModalities"],
            serde_json::json!(["IMAGE", "TEXT"])
        );
    }

    #[test]
    fn test_first_image_skips_text_parts() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"Here you go"},
                {"inlineData":{"mimeType":"image/png","data":"iVBORw0KGgo="}}
            ]},"finishReason":"STOP"}]}"#,
        );
        let blob = response.into_first_image().expect("image");
        assert_eq!(blob.mime_type, "image/png");
        assert_eq!(blob.data, "iVBORw0KGgo=");
    }

    #[test]
    fn test_block_reason_is_content_blocked() {
        let response = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        let err = response.into_first_image().unwrap_err();
        assert!(matches!(err, GenerationError::ContentBlocked { ref reason } if reason == "SAFETY"));
    }

    #[test]
    fn test_no_candidates_no_block_is_empty() {
        let err = parse("{}").into_first_image().unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[test]
    fn test_text_only_candidate_reports_finish_reason() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"I can't"}]},"finishReason":"IMAGE_SAFETY"}]}"#,
        );
        let err = response.into_first_image().unwrap_err();
        assert!(
            matches!(err, GenerationError::NoImage { finish_reason: Some(ref r) } if r == "IMAGE_SAFETY")
        );
    }

    #[test]
    fn test_unknown_parts_are_tolerated() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[
                {"functionCall":{"name":"x"}},
                {"inlineData":{"mimeType":"image/jpeg","data":"/9j/"}}
            ]}}]}"#,
        );
        assert_eq!(response.into_first_image().expect("image").mime_type, "image/jpeg");
    }

    #[test]
    fn test_operation_video_uri() {
        let op: Operation = serde_json::from_str(
            r#"{"name":"models/veo/operations/1","done":true,"response":{
                "generateVideoResponse":{"generatedSamples":[{"video":{"uri":"https://files/v.mp4"}}]}}}"#,
        )
        .expect("deserialize");
        assert_eq!(op.into_video_uri().expect("uri"), "https://files/v.mp4");
    }

    #[test]
    fn test_operation_filtered() {
        let op: Operation = serde_json::from_str(
            r#"{"name":"op","done":true,"response":{
                "generateVideoResponse":{"raiMediaFilteredReasons":["celebrity likeness"]}}}"#,
        )
        .expect("deserialize");
        assert!(matches!(
            op.into_video_uri(),
            Err(GenerationError::ContentBlocked { .. })
        ));
    }

    #[test]
    fn test_operation_without_samples() {
        let op: Operation =
            serde_json::from_str(r#"{"name":"op","done":true}"#).expect("deserialize");
        assert!(matches!(op.into_video_uri(), Err(GenerationError::NoVideo)));
    }
}
