//! Look animation via long-running video generation.
//!
//! A generation is started on the first model of the fallback chain and
//! polled with a capped exponential schedule. Failures that another model
//! could get past (quota, unknown model, empty result, timeout) move on to
//! the next model; anything else is returned immediately.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, instrument, warn};

use super::client::GeminiClient;
use super::error::GenerationError;
use super::types::{PredictVideoRequest, VideoImage, VideoInstance, VideoParameters};

/// Polling schedule for long-running operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollSchedule {
    /// First wait before polling.
    pub initial: Duration,
    /// Growth factor between waits.
    pub multiplier: f64,
    /// Longest single wait.
    pub ceiling: Duration,
    /// Overall budget per model.
    pub timeout: Duration,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(10),
            multiplier: 1.2,
            ceiling: Duration::from_secs(30),
            timeout: Duration::from_secs(300),
        }
    }
}

impl PollSchedule {
    /// The wait that follows `current`.
    #[must_use]
    pub fn next_delay(&self, current: Duration) -> Duration {
        current.mul_f64(self.multiplier).min(self.ceiling)
    }

    /// Successive waits whose sum stays within the timeout.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        let mut elapsed = Duration::ZERO;
        std::iter::successors(Some(self.initial.min(self.ceiling)), move |d| {
            Some(self.next_delay(*d))
        })
        .take_while(move |d| {
            elapsed += *d;
            elapsed <= self.timeout
        })
    }
}

/// A generated video.
#[derive(Debug, Clone)]
pub struct GeneratedVideo {
    /// Model that produced the video.
    pub model: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Runs image-to-video generation across a model fallback chain.
#[derive(Debug, Clone)]
pub struct VideoGenerator {
    client: GeminiClient,
    models: Vec<String>,
    schedule: PollSchedule,
}

impl VideoGenerator {
    /// Generator over the client's configured video models.
    #[must_use]
    pub fn new(client: GeminiClient) -> Self {
        let models = client.video_models().to_vec();
        Self {
            client,
            models,
            schedule: PollSchedule::default(),
        }
    }

    /// Override the polling schedule.
    #[must_use]
    pub const fn with_schedule(mut self, schedule: PollSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Models in fallback order.
    #[must_use]
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Override the model chain.
    #[must_use]
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    /// Animate a still image.
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` if no models are configured, otherwise the
    /// error of the last model tried, or the first error that does not allow
    /// falling back.
    #[instrument(skip(self, image_base64, prompt), fields(models = self.models.len()))]
    pub async fn animate(
        &self,
        image_base64: &str,
        mime_type: &str,
        prompt: &str,
    ) -> Result<GeneratedVideo, GenerationError> {
        let request = PredictVideoRequest {
            instances: vec![VideoInstance {
                prompt: prompt.to_string(),
                image: Some(VideoImage {
                    bytes_base64_encoded: image_base64.to_string(),
                    mime_type: mime_type.to_string(),
                }),
            }],
            parameters: VideoParameters::default(),
        };

        let mut last_error =
            GenerationError::ConfigMissing("GEMINI_VIDEO_MODELS is empty".to_string());

        for model in &self.models {
            match self.generate_with(model, &request).await {
                Ok(bytes) => {
                    info!(model = %model, bytes = bytes.len(), "Video generated");
                    return Ok(GeneratedVideo {
                        model: model.clone(),
                        mime_type: "video/mp4".to_string(),
                        bytes,
                    });
                }
                Err(e) if e.allows_fallback() => {
                    warn!(model = %model, error = %e, "Video model failed, trying next");
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error)
    }

    async fn generate_with(
        &self,
        model: &str,
        request: &PredictVideoRequest,
    ) -> Result<Vec<u8>, GenerationError> {
        let mut operation = self.client.start_video(model, request).await?;
        let started = Instant::now();
        let mut delay = self.schedule.initial.min(self.schedule.ceiling);

        while !operation.done {
            if started.elapsed() + delay > self.schedule.timeout {
                return Err(GenerationError::Timeout(self.schedule.timeout));
            }
            tokio::time::sleep(delay).await;
            delay = self.schedule.next_delay(delay);
            operation = self.client.get_operation(&operation.name).await?;
        }

        let uri = operation.into_video_uri()?;
        self.client.download(&uri).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn near(actual: Duration, expected_ms: u64) -> bool {
        actual.as_millis().abs_diff(u128::from(expected_ms)) <= 1
    }

    #[test]
    fn test_default_schedule_values() {
        let schedule = PollSchedule::default();
        let delays: Vec<Duration> = schedule.delays().take(3).collect();
        assert_eq!(delays.len(), 3);
        assert!(near(delays[0], 10_000));
        assert!(near(delays[1], 12_000));
        assert!(near(delays[2], 14_400));
    }

    #[test]
    fn test_schedule_caps_at_ceiling() {
        let schedule = PollSchedule::default();
        assert!(near(schedule.next_delay(Duration::from_secs(28)), 30_000));
        assert!(schedule.delays().all(|d| d <= Duration::from_secs(30)));
    }

    #[test]
    fn test_schedule_respects_timeout() {
        let schedule = PollSchedule::default();
        let total: Duration = schedule.delays().sum();
        assert!(total <= Duration::from_secs(300));
        assert!(total > Duration::from_secs(270));
    }

    fn fast_schedule() -> PollSchedule {
        PollSchedule {
            initial: Duration::from_millis(5),
            multiplier: 1.2,
            ceiling: Duration::from_millis(20),
            timeout: Duration::from_millis(500),
        }
    }

    fn generator_for(server: &MockServer, models: &[&str]) -> VideoGenerator {
        let mut config = GeminiConfig::with_api_key(SecretString::from("test-key-9f8e7d6c5b4a"));
        config.base_url = server.uri();
        config.timeout = Duration::from_secs(5);
        let client = GeminiClient::new(&config).expect("client");
        VideoGenerator::new(client)
            .with_models(models.iter().map(ToString::to_string).collect())
            .with_schedule(fast_schedule())
    }

    #[tokio::test]
    async fn test_polls_until_done_then_downloads() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/veo-a:predictLongRunning"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"name": "operations/op-1"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/operations/op-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "operations/op-1",
                "done": true,
                "response": {"generateVideoResponse": {"generatedSamples": [
                    {"video": {"uri": format!("{}/files/look.mp4", server.uri())}}
                ]}}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/look.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![9_u8, 9, 9]))
            .mount(&server)
            .await;

        let video = generator_for(&server, &["veo-a"])
            .animate("AAAA", "image/png", "walk")
            .await
            .expect("video");
        assert_eq!(video.model, "veo-a");
        assert_eq!(video.bytes, vec![9, 9, 9]);
    }

    #[tokio::test]
    async fn test_falls_back_to_next_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/veo-a:predictLongRunning"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/models/veo-b:predictLongRunning"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "operations/op-2",
                "done": true,
                "response": {"generateVideoResponse": {"generatedSamples": [
                    {"video": {"uri": format!("{}/files/b.mp4", server.uri())}}
                ]}}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/b.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1_u8]))
            .mount(&server)
            .await;

        let video = generator_for(&server, &["veo-a", "veo-b"])
            .animate("AAAA", "image/png", "walk")
            .await
            .expect("video");
        assert_eq!(video.model, "veo-b");
    }

    #[tokio::test]
    async fn test_content_block_stops_the_chain() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/veo-a:predictLongRunning"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "operations/op-3",
                "done": true,
                "response": {"generateVideoResponse": {"raiMediaFilteredReasons": ["minor"]}}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/models/veo-b:predictLongRunning"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let err = generator_for(&server, &["veo-a", "veo-b"])
            .animate("AAAA", "image/png", "walk")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::ContentBlocked { .. }));
    }

    #[tokio::test]
    async fn test_never_finishing_operation_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"name": "operations/slow"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/operations/slow"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"name": "operations/slow"})),
            )
            .mount(&server)
            .await;

        let mut generator = generator_for(&server, &["veo-a"]);
        generator.schedule.timeout = Duration::from_millis(60);
        let err = generator
            .animate("AAAA", "image/png", "walk")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_empty_chain_is_config_missing() {
        let server = MockServer::start().await;
        let err = generator_for(&server, &[])
            .animate("AAAA", "image/png", "walk")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::ConfigMissing(_)));
    }
}
