//! Categorization engine: one image in, one validated result out.
//!
//! The categorizer encodes an image, sends it with the taxonomy's instruction
//! and schema, and checks the answer: the JSON must parse, the category must be
//! a label of the taxonomy, and the provider's token total must add up. Nothing
//! is retried.

use super::provider::{LlmProvider, LlmRequest};
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::discovery::DiscoveredFile;
use crate::pipeline::encode::{ImageEncoder, MimePolicy};
use crate::taxonomy::Taxonomy;
use crate::types::{BatchFailure, BatchReport, Categorization};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Settings for the categorizer.
#[derive(Debug, Clone)]
pub struct CategorizeOptions {
    /// How the image MIME type is chosen
    pub mime_policy: MimePolicy,
}

impl Default for CategorizeOptions {
    fn default() -> Self {
        Self {
            mime_policy: MimePolicy::Content,
        }
    }
}

/// Settings for a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Skip images that fail instead of aborting. Token accounting faults
    /// still abort.
    pub keep_going: bool,
}

/// Progress notifications emitted while a batch runs.
#[derive(Debug)]
pub enum BatchEvent<'a, T> {
    /// An image was categorized
    Categorized(&'a Categorization<T>),
    /// An image failed and was skipped
    Skipped {
        path: &'a Path,
        error: &'a PipelineError,
    },
}

/// The `{category, reason}` shape the model is asked to return.
#[derive(Deserialize)]
struct Answer {
    category: String,
    reason: String,
}

/// Sequential categorization engine.
pub struct Categorizer {
    provider: Arc<dyn LlmProvider>,
    encoder: ImageEncoder,
}

impl Categorizer {
    pub fn new(provider: Box<dyn LlmProvider>, options: CategorizeOptions) -> Self {
        Self {
            provider: Arc::from(provider),
            encoder: ImageEncoder::new(options.mime_policy),
        }
    }

    /// Name and model of the underlying provider, for logging.
    pub fn describe(&self) -> String {
        format!("{}/{}", self.provider.name(), self.provider.model())
    }

    /// Categorize one image into taxonomy `T`.
    ///
    /// A missing file fails before the provider is called.
    pub async fn categorize<T: Taxonomy>(&self, path: &Path) -> PipelineResult<Categorization<T>> {
        let image = self.encoder.encode(path).await?;
        let request = LlmRequest::structured(image, T::INSTRUCTION, T::response_schema());

        let response = self
            .provider
            .generate(&request)
            .await
            .map_err(|e| match e {
                PipelineError::MalformedResponse(message) => schema_violation(path, &message),
                other => other,
            })?;

        let usage = response
            .usage
            .ok_or_else(|| schema_violation(path, "response carries no usage metadata"))?;
        if !usage.reconciles() {
            return Err(PipelineError::UsageMismatch {
                path: path.to_path_buf(),
                prompt: usage.prompt,
                candidates: usage.candidates,
                thoughts: usage.thoughts,
                total: usage.total,
            });
        }

        let answer: Answer = serde_json::from_str(&response.text).map_err(|e| {
            schema_violation(
                path,
                &format!("response is not a {{category, reason}} JSON object: {e}"),
            )
        })?;
        let category = T::from_label(&answer.category).ok_or_else(|| {
            schema_violation(
                path,
                &format!(
                    "category {:?} is not one of the {} categories",
                    answer.category,
                    T::PROPERTY
                ),
            )
        })?;

        tracing::debug!(
            "{:?} -> {category} ({} in / {} out tokens, {}ms)",
            path,
            usage.input_tokens(),
            usage.output_tokens(),
            response.latency_ms
        );

        Ok(Categorization {
            path: path.to_path_buf(),
            category,
            reason: answer.reason,
            input_tokens: usage.input_tokens(),
            output_tokens: usage.output_tokens(),
            model: response.model,
            latency_ms: response.latency_ms,
        })
    }

    /// Categorize files one after another, in the order given.
    ///
    /// Calls `on_event` as each image finishes. The first error aborts the
    /// batch unless `options.keep_going` is set and the error is not fatal.
    pub async fn categorize_batch<T, F>(
        &self,
        files: &[DiscoveredFile],
        options: &BatchOptions,
        mut on_event: F,
    ) -> PipelineResult<BatchReport<T>>
    where
        T: Taxonomy,
        F: FnMut(BatchEvent<'_, T>),
    {
        let mut report = BatchReport::default();

        for file in files {
            match self.categorize::<T>(&file.path).await {
                Ok(categorization) => {
                    on_event(BatchEvent::Categorized(&categorization));
                    report.results.push(categorization);
                }
                Err(e) if options.keep_going && !e.is_fatal() => {
                    tracing::error!("Failed: {:?} - {}", file.path, e);
                    on_event(BatchEvent::Skipped {
                        path: &file.path,
                        error: &e,
                    });
                    report.failures.push(BatchFailure {
                        path: file.path.clone(),
                        message: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }
}

fn schema_violation(path: &Path, message: &str) -> PipelineError {
    PipelineError::SchemaViolation {
        path: PathBuf::from(path),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::{LlmResponse, TokenUsage};
    use crate::taxonomy::{ApartmentCategory, HotelCategory};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// A configurable mock provider.
    ///
    /// Each call to `generate()` invokes the response factory with the current
    /// call index. Every request is recorded for post-hoc assertions.
    struct MockProvider {
        response_fn: Box<dyn Fn(u32) -> Result<LlmResponse, PipelineError> + Send + Sync>,
        call_count: Arc<AtomicU32>,
        requests: Arc<Mutex<Vec<LlmRequest>>>,
    }

    impl MockProvider {
        fn new(
            response_fn: impl Fn(u32) -> Result<LlmResponse, PipelineError> + Send + Sync + 'static,
        ) -> Self {
            Self {
                response_fn: Box::new(response_fn),
                call_count: Arc::new(AtomicU32::new(0)),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Always answer with `text` and the given usage.
        fn answering(text: &str, usage: TokenUsage) -> Self {
            let text = text.to_string();
            Self::new(move |_| Ok(response(&text, Some(usage))))
        }

        fn call_count_handle(&self) -> Arc<AtomicU32> {
            self.call_count.clone()
        }

        fn requests_handle(&self) -> Arc<Mutex<Vec<LlmRequest>>> {
            self.requests.clone()
        }
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-v1"
        }

        async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, PipelineError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            (self.response_fn)(idx)
        }
    }

    fn response(text: &str, usage: Option<TokenUsage>) -> LlmResponse {
        LlmResponse {
            text: text.to_string(),
            model: "mock-v1".to_string(),
            usage,
            latency_ms: 5,
        }
    }

    fn usage(prompt: u32, candidates: u32, thoughts: u32, total: u32) -> TokenUsage {
        TokenUsage {
            prompt,
            candidates,
            thoughts,
            total,
        }
    }

    fn categorizer(provider: MockProvider) -> Categorizer {
        Categorizer::new(Box::new(provider), CategorizeOptions::default())
    }

    /// Write a small PNG-signature file and return its path.
    fn write_image(dir: &Path, name: &str, marker: u8) -> PathBuf {
        let path = dir.join(name);
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.push(marker);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn discovered(paths: &[PathBuf]) -> Vec<DiscoveredFile> {
        paths
            .iter()
            .map(|p| DiscoveredFile {
                path: p.clone(),
                size: 9,
            })
            .collect()
    }

    const BEDROOM: &str = r#"{"category": "Bedroom", "reason": "Bed visible."}"#;

    #[tokio::test]
    async fn test_categorize_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "room1.png", 1);
        let provider = MockProvider::answering(BEDROOM, usage(100, 20, 5, 125));

        let result = categorizer(provider)
            .categorize::<ApartmentCategory>(&path)
            .await
            .unwrap();

        assert_eq!(result.category, ApartmentCategory::Bedroom);
        assert_eq!(result.reason, "Bed visible.");
        assert_eq!(result.input_tokens, 100);
        assert_eq!(result.output_tokens, 25);
        assert_eq!(result.model, "mock-v1");
        assert_eq!(result.path, path);
    }

    #[tokio::test]
    async fn test_request_carries_instruction_schema_and_zero_temperature() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "lobby.jpg", 1);
        let provider = MockProvider::answering(
            r#"{"category": "Lobby / Common Area", "reason": "Reception desk."}"#,
            usage(10, 5, 0, 15),
        );
        let requests = provider.requests_handle();

        let result = categorizer(provider)
            .categorize::<HotelCategory>(&path)
            .await
            .unwrap();
        assert_eq!(result.category, HotelCategory::LobbyCommonArea);

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, 0.0);
        assert_eq!(requests[0].prompt, HotelCategory::INSTRUCTION);
        assert_eq!(requests[0].response_schema, HotelCategory::response_schema());
        // PNG bytes behind a .jpg name are sent as PNG under the default policy
        assert_eq!(requests[0].image.media_type, "image/png");
    }

    #[tokio::test]
    async fn test_output_tokens_include_thoughts() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "bath.png", 1);

        let apartment = categorizer(MockProvider::answering(
            r#"{"category": "Bathroom", "reason": "Shower visible."}"#,
            usage(258, 14, 230, 502),
        ))
        .categorize::<ApartmentCategory>(&path)
        .await
        .unwrap();
        assert_eq!(apartment.output_tokens, 244);

        let hotel = categorizer(MockProvider::answering(
            r#"{"category": "Bathroom", "reason": "Shower visible."}"#,
            usage(258, 14, 230, 502),
        ))
        .categorize::<HotelCategory>(&path)
        .await
        .unwrap();
        assert_eq!(hotel.output_tokens, 244);
        assert_eq!(hotel.category, HotelCategory::Bathroom);
    }

    #[tokio::test]
    async fn test_unknown_category_is_schema_violation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "room.png", 1);
        // Valid hotel label, but not an apartment one
        let provider = MockProvider::answering(
            r#"{"category": "Guest Room", "reason": "Bed visible."}"#,
            usage(100, 20, 5, 125),
        );

        let err = categorizer(provider)
            .categorize::<ApartmentCategory>(&path)
            .await
            .unwrap_err();
        match err {
            PipelineError::SchemaViolation { message, .. } => {
                assert!(message.contains("Guest Room"), "Got: {message}");
            }
            other => panic!("Expected SchemaViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_is_schema_violation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "room.png", 1);

        for text in [
            "It is a bedroom.",
            r#"{"category": "Bedroom"}"#,
            r#"{"category": 3, "reason": "x"}"#,
        ] {
            let provider = MockProvider::answering(text, usage(1, 1, 0, 2));
            let err = categorizer(provider)
                .categorize::<ApartmentCategory>(&path)
                .await
                .unwrap_err();
            assert!(
                matches!(err, PipelineError::SchemaViolation { .. }),
                "{text:?} gave {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_usage_mismatch_is_fatal_fault() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "room.png", 1);
        let provider = MockProvider::answering(BEDROOM, usage(100, 20, 5, 130));

        let err = categorizer(provider)
            .categorize::<ApartmentCategory>(&path)
            .await
            .unwrap_err();
        assert!(err.is_fatal());
        match err {
            PipelineError::UsageMismatch {
                prompt,
                candidates,
                thoughts,
                total,
                ..
            } => {
                assert_eq!((prompt, candidates, thoughts, total), (100, 20, 5, 130));
            }
            other => panic!("Expected UsageMismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_usage_mismatch_reported_before_answer_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "room.png", 1);
        let provider = MockProvider::answering("not json", usage(100, 20, 5, 999));

        let err = categorizer(provider)
            .categorize::<ApartmentCategory>(&path)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::UsageMismatch { total: 999, .. }));
    }

    #[tokio::test]
    async fn test_missing_usage_is_schema_violation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "room.png", 1);
        let provider = MockProvider::new(|_| Ok(response(BEDROOM, None)));

        let err = categorizer(provider)
            .categorize::<ApartmentCategory>(&path)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::SchemaViolation { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "room.png", 1);
        let provider = MockProvider::new(|_| {
            Err(PipelineError::Llm {
                message: "Gemini HTTP 429: rate limited".to_string(),
                status_code: Some(429),
            })
        });
        let call_count = provider.call_count_handle();

        let err = categorizer(provider)
            .categorize::<ApartmentCategory>(&path)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Llm {
                status_code: Some(429),
                ..
            }
        ));
        // No retries
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_provider_body_is_schema_violation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "room.png", 1);
        let provider = MockProvider::new(|_| {
            Err(PipelineError::MalformedResponse(
                "Gemini response is not valid JSON".to_string(),
            ))
        });

        let err = categorizer(provider)
            .categorize::<ApartmentCategory>(&path)
            .await
            .unwrap_err();
        match err {
            PipelineError::SchemaViolation {
                path: reported,
                message,
            } => {
                assert_eq!(reported, path);
                assert!(message.contains("not valid JSON"), "Got: {message}");
            }
            other => panic!("Expected SchemaViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_file_never_calls_provider() {
        let provider = MockProvider::answering(BEDROOM, usage(100, 20, 5, 125));
        let call_count = provider.call_count_handle();

        let err = categorizer(provider)
            .categorize::<ApartmentCategory>(Path::new("/nonexistent/path/ghost.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::FileNotFound(_)));
        assert_eq!(call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "room.png", 1);
        let engine = categorizer(MockProvider::answering(BEDROOM, usage(100, 20, 5, 125)));

        let first = engine.categorize::<ApartmentCategory>(&path).await.unwrap();
        let second = engine.categorize::<ApartmentCategory>(&path).await.unwrap();
        assert_eq!(first.category, second.category);
        assert_eq!(first.reason, second.reason);
    }

    #[tokio::test]
    async fn test_batch_calls_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_image(dir.path(), "a.png", 1),
            write_image(dir.path(), "b.jpg", 2),
            write_image(dir.path(), "c.jpeg", 3),
        ];
        let provider = MockProvider::answering(BEDROOM, usage(100, 20, 5, 125));
        let call_count = provider.call_count_handle();
        let requests = provider.requests_handle();

        let mut seen = Vec::new();
        let report = categorizer(provider)
            .categorize_batch::<ApartmentCategory, _>(
                &discovered(&paths),
                &BatchOptions::default(),
                |event| {
                    if let BatchEvent::Categorized(c) = event {
                        seen.push(c.path.clone());
                    }
                },
            )
            .await
            .unwrap();

        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert_eq!(seen, paths);
        let result_paths: Vec<PathBuf> = report.results.iter().map(|c| c.path.clone()).collect();
        assert_eq!(result_paths, paths);

        // Each request carried the bytes of the matching file, in order
        let expected: Vec<String> = paths.iter().map(|p| encoded(p)).collect();
        let sent: Vec<String> = requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.image.data.clone())
            .collect();
        assert_eq!(sent, expected);

        let summary = report.summary();
        assert_eq!(summary.images, 3);
        assert_eq!(summary.input_tokens, 300);
        assert_eq!(summary.output_tokens, 75);
    }

    #[tokio::test]
    async fn test_discovered_directory_calls_once_per_match_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let c = write_image(dir.path(), "c.png", 3);
        let a = write_image(dir.path(), "a.JPG", 1);
        let b = write_image(dir.path(), "b.jpeg", 2);
        std::fs::write(dir.path().join("notes.txt"), b"not an image").unwrap();
        write_image(dir.path(), "d.webp", 4);

        let files = crate::pipeline::FileDiscovery::new(
            &crate::config::InputConfig::default().supported_formats,
        )
        .discover(dir.path())
        .unwrap();

        let provider = MockProvider::answering(BEDROOM, usage(100, 20, 5, 125));
        let call_count = provider.call_count_handle();
        let requests = provider.requests_handle();

        let report = categorizer(provider)
            .categorize_batch::<ApartmentCategory, _>(&files, &BatchOptions::default(), |_| {})
            .await
            .unwrap();

        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        let expected = vec![a, b, c];
        let result_paths: Vec<PathBuf> = report.results.iter().map(|r| r.path.clone()).collect();
        assert_eq!(result_paths, expected);
        let sent: Vec<String> = requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.image.data.clone())
            .collect();
        let expected_payloads: Vec<String> = expected.iter().map(|p| encoded(p)).collect();
        assert_eq!(sent, expected_payloads);
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_calls() {
        let provider = MockProvider::answering(BEDROOM, usage(100, 20, 5, 125));
        let call_count = provider.call_count_handle();

        let report = categorizer(provider)
            .categorize_batch::<HotelCategory, _>(&[], &BatchOptions::default(), |_| {})
            .await
            .unwrap();

        assert_eq!(call_count.load(Ordering::SeqCst), 0);
        assert_eq!(report.summary(), crate::types::BatchSummary::default());
    }

    /// Base64 payload the encoder produces for a file.
    fn encoded(path: &Path) -> String {
        let bytes = std::fs::read(path).unwrap();
        crate::llm::provider::ImageInput::from_bytes(&bytes, "image/png").data
    }

    #[tokio::test]
    async fn test_batch_aborts_on_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_image(dir.path(), "a.png", 1),
            write_image(dir.path(), "b.png", 2),
            write_image(dir.path(), "c.png", 3),
        ];
        let provider = MockProvider::new(|idx| {
            if idx == 1 {
                Ok(response("not json", Some(usage(1, 1, 0, 2))))
            } else {
                Ok(response(BEDROOM, Some(usage(100, 20, 5, 125))))
            }
        });
        let call_count = provider.call_count_handle();

        let result = categorizer(provider)
            .categorize_batch::<ApartmentCategory, _>(
                &discovered(&paths),
                &BatchOptions::default(),
                |_| {},
            )
            .await;

        assert!(matches!(result, Err(PipelineError::SchemaViolation { .. })));
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_batch_keep_going_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_image(dir.path(), "a.png", 1),
            dir.path().join("vanished.png"),
            write_image(dir.path(), "c.png", 3),
        ];
        let provider = MockProvider::answering(BEDROOM, usage(100, 20, 5, 125));
        let call_count = provider.call_count_handle();

        let mut skipped = 0;
        let report = categorizer(provider)
            .categorize_batch::<ApartmentCategory, _>(
                &discovered(&paths),
                &BatchOptions { keep_going: true },
                |event| {
                    if let BatchEvent::Skipped { .. } = event {
                        skipped += 1;
                    }
                },
            )
            .await
            .unwrap();

        assert_eq!(skipped, 1);
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].message.contains("File not found"));
        assert_eq!(report.summary().failed, 1);
    }

    #[tokio::test]
    async fn test_batch_keep_going_still_stops_on_usage_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_image(dir.path(), "a.png", 1),
            write_image(dir.path(), "b.png", 2),
        ];
        let provider = MockProvider::answering(BEDROOM, usage(100, 20, 5, 999));
        let call_count = provider.call_count_handle();

        let result = categorizer(provider)
            .categorize_batch::<ApartmentCategory, _>(
                &discovered(&paths),
                &BatchOptions { keep_going: true },
                |_| {},
            )
            .await;

        assert!(matches!(result, Err(PipelineError::UsageMismatch { .. })));
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }
}
