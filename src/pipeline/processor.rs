//! Batch orchestration — emails through the extraction pipeline, in order.
//!
//! Flow per email:
//! 1. Load `.eml` text (source collaborator)
//! 2. Build prompt
//! 3. Completion call (LLM collaborator)
//! 4. Interpret → normalize → project to row
//! 5. Append to the sink
//!
//! Strictly sequential: each email's row is fully computed and persisted
//! before the next email begins, so output row order equals input order.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{Error, LlmError};
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};
use crate::pipeline::interpret::interpret;
use crate::pipeline::mapper::project_row;
use crate::pipeline::normalize::normalize;
use crate::pipeline::prompt::build_prompt;
use crate::pipeline::types::{BatchSummary, NormalizedRecord};
use crate::schema::{HeaderMapping, Schema};
use crate::sink::TabularSink;
use crate::source;

/// Max tokens for the extraction call.
const EXTRACT_MAX_TOKENS: u32 = 512;

/// Temperature for extraction (deterministic).
const EXTRACT_TEMPERATURE: f32 = 0.0;

/// Drives batches of roster emails through extraction into a tabular sink.
pub struct RosterPipeline {
    llm: Arc<dyn LlmProvider>,
    schema: Schema,
    mapping: HeaderMapping,
}

impl RosterPipeline {
    pub fn new(llm: Arc<dyn LlmProvider>, schema: Schema, mapping: HeaderMapping) -> Self {
        Self {
            llm,
            schema,
            mapping,
        }
    }

    /// Extract a normalized record from one email's text.
    ///
    /// A completion with no usable structured content degrades to a
    /// fully-sentinel record; only transport failures surface as errors.
    pub async fn extract_record(&self, email_text: &str) -> Result<NormalizedRecord, LlmError> {
        let prompt = build_prompt(email_text, &self.schema);
        let request = CompletionRequest::new(vec![ChatMessage::user(prompt)])
            .with_temperature(EXTRACT_TEMPERATURE)
            .with_max_tokens(EXTRACT_MAX_TOKENS);

        let response = self.llm.complete(request).await?;
        debug!(
            model = self.llm.model_name(),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "completion received"
        );

        let candidate = interpret(&response.content);
        if candidate.is_empty() {
            warn!("completion contained no structured output; filling sentinels");
        }
        Ok(normalize(&candidate, &self.schema))
    }

    /// Run a batch of email sources through the pipeline into the sink.
    ///
    /// `batch_size` only groups progress reporting; processing stays
    /// one-email-at-a-time. Per-item failures (unreadable source, empty
    /// text, completion transport error) are logged and skipped. Sink
    /// failures are fatal: once an append fails, alignment with the
    /// persisted document can no longer be guaranteed.
    pub async fn run(
        &self,
        sources: &[PathBuf],
        sink: &mut dyn TabularSink,
        batch_size: usize,
    ) -> Result<BatchSummary, Error> {
        let headers: Vec<String> = sink.headers().to_vec();
        let batch_size = batch_size.max(1);

        let mut summary = BatchSummary {
            total: sources.len(),
            ..Default::default()
        };

        for (batch_index, batch) in sources.chunks(batch_size).enumerate() {
            info!(
                batch = batch_index + 1,
                files = batch.len(),
                "processing batch"
            );

            for path in batch {
                let document = match source::load_document(path) {
                    Ok(doc) => doc,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unreadable source");
                        summary.skipped += 1;
                        continue;
                    }
                };

                if document.text.is_empty() {
                    warn!(
                        id = %document.id,
                        path = %path.display(),
                        "skipping email with no extractable text"
                    );
                    summary.skipped += 1;
                    continue;
                }

                let record = match self.extract_record(&document.text).await {
                    Ok(record) => record,
                    Err(e) => {
                        warn!(id = %document.id, error = %e, "completion failed; skipping");
                        summary.skipped += 1;
                        continue;
                    }
                };

                let row = project_row(&record, &headers, &self.mapping);
                sink.append_row(&row)?;
                summary.rows_written += 1;
                info!(path = %path.display(), subject = document.subject.as_deref().unwrap_or(""), "processed");
            }
        }

        sink.persist()?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::SinkError;
    use crate::llm::CompletionResponse;
    use crate::schema::NOT_FOUND;

    /// Mock LLM returning scripted responses in call order.
    struct ScriptedLlm {
        responses: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn new(responses: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.iter().rev().map(|s| s.to_string()).collect()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            let content = self
                .responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| "{}".to_string());
            Ok(CompletionResponse {
                content,
                input_tokens: 100,
                output_tokens: 50,
            })
        }
    }

    /// Mock LLM that always fails at transport level.
    struct FailingLlm;

    #[async_trait]
    impl LlmProvider for FailingLlm {
        fn model_name(&self) -> &str {
            "failing"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            Err(LlmError::RequestFailed {
                provider: "failing".into(),
                reason: "connection refused".into(),
            })
        }
    }

    /// In-memory sink for assertions.
    struct MemorySink {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        fail_appends: bool,
    }

    impl MemorySink {
        fn new(headers: &[&str]) -> Self {
            Self {
                headers: headers.iter().map(|s| s.to_string()).collect(),
                rows: Vec::new(),
                fail_appends: false,
            }
        }
    }

    impl TabularSink for MemorySink {
        fn headers(&self) -> &[String] {
            &self.headers
        }

        fn append_row(&mut self, row: &[String]) -> Result<(), SinkError> {
            if self.fail_appends {
                return Err(SinkError::Io(std::io::Error::other("disk full")));
            }
            self.rows.push(row.to_vec());
            Ok(())
        }

        fn persist(&mut self) -> Result<(), SinkError> {
            Ok(())
        }
    }

    fn pipeline(llm: Arc<dyn LlmProvider>) -> RosterPipeline {
        RosterPipeline::new(
            llm,
            Schema::provider_roster(),
            HeaderMapping::provider_roster(),
        )
    }

    fn write_eml(dir: &std::path::Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "From: roster@payer.example\r\nSubject: {name}\r\nContent-Type: text/plain\r\n\r\n{body}\r\n"
        )
        .unwrap();
        path
    }

    #[tokio::test]
    async fn rows_arrive_in_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![
            write_eml(dir.path(), "e1.eml", "first provider"),
            write_eml(dir.path(), "e2.eml", "second provider"),
            write_eml(dir.path(), "e3.eml", "third provider"),
        ];

        let llm = ScriptedLlm::new(&[
            r#"{"provider_name": "One"}"#,
            r#"{"provider_name": "Two"}"#,
            r#"{"provider_name": "Three"}"#,
        ]);
        let mut sink = MemorySink::new(&["Provider Name"]);

        let summary = pipeline(llm).run(&sources, &mut sink, 1).await.unwrap();

        assert_eq!(summary.rows_written, 3);
        assert_eq!(summary.skipped, 0);
        let names: Vec<&str> = sink.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(names, vec!["One", "Two", "Three"]);
    }

    #[tokio::test]
    async fn batch_size_does_not_change_row_order() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![
            write_eml(dir.path(), "e1.eml", "a"),
            write_eml(dir.path(), "e2.eml", "b"),
            write_eml(dir.path(), "e3.eml", "c"),
        ];
        let responses = [
            r#"{"provider_name": "One"}"#,
            r#"{"provider_name": "Two"}"#,
            r#"{"provider_name": "Three"}"#,
        ];

        for batch_size in [1, 2, 3, 50] {
            let llm = ScriptedLlm::new(&responses);
            let mut sink = MemorySink::new(&["Provider Name"]);
            let summary = pipeline(llm)
                .run(&sources, &mut sink, batch_size)
                .await
                .unwrap();

            assert_eq!(summary.rows_written, 3, "batch_size {batch_size}");
            let names: Vec<&str> = sink.rows.iter().map(|r| r[0].as_str()).collect();
            assert_eq!(names, vec!["One", "Two", "Three"], "batch_size {batch_size}");
        }
    }

    #[tokio::test]
    async fn zero_batch_size_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![write_eml(dir.path(), "e1.eml", "a")];
        let llm = ScriptedLlm::new(&[r#"{"provider_name": "One"}"#]);
        let mut sink = MemorySink::new(&["Provider Name"]);

        let summary = pipeline(llm).run(&sources, &mut sink, 0).await.unwrap();
        assert_eq!(summary.rows_written, 1);
    }

    #[tokio::test]
    async fn unusable_completion_writes_sentinel_row() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![write_eml(dir.path(), "e1.eml", "noise")];

        let llm = ScriptedLlm::new(&["I could not find any JSON to return, sorry."]);
        let mut sink = MemorySink::new(&["Provider Name", "TIN", "Unknown Col"]);

        let summary = pipeline(llm).run(&sources, &mut sink, 1).await.unwrap();

        assert_eq!(summary.rows_written, 1);
        assert_eq!(sink.rows[0], vec![NOT_FOUND, NOT_FOUND, NOT_FOUND]);
    }

    #[tokio::test]
    async fn unreadable_source_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![
            dir.path().join("missing.eml"),
            write_eml(dir.path(), "ok.eml", "real content"),
        ];

        let llm = ScriptedLlm::new(&[r#"{"provider_name": "Jane"}"#]);
        let mut sink = MemorySink::new(&["Provider Name"]);

        let summary = pipeline(llm).run(&sources, &mut sink, 1).await.unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.rows_written, 1);
        assert_eq!(sink.rows[0][0], "Jane");
    }

    #[tokio::test]
    async fn empty_text_email_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.eml");
        std::fs::write(
            &empty,
            b"From: x@example.com\r\nSubject: empty\r\nContent-Type: text/plain\r\n\r\n\r\n",
        )
        .unwrap();
        let sources = vec![empty, write_eml(dir.path(), "ok.eml", "content")];

        let llm = ScriptedLlm::new(&[r#"{"provider_name": "Jane"}"#]);
        let mut sink = MemorySink::new(&["Provider Name"]);

        let summary = pipeline(llm).run(&sources, &mut sink, 1).await.unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.rows_written, 1);
    }

    #[tokio::test]
    async fn completion_transport_failure_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![write_eml(dir.path(), "e1.eml", "content")];

        let mut sink = MemorySink::new(&["Provider Name"]);
        let summary = pipeline(Arc::new(FailingLlm))
            .run(&sources, &mut sink, 1)
            .await
            .unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.rows_written, 0);
        assert!(sink.rows.is_empty());
    }

    #[tokio::test]
    async fn sink_append_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![write_eml(dir.path(), "e1.eml", "content")];

        let llm = ScriptedLlm::new(&[r#"{"provider_name": "Jane"}"#]);
        let mut sink = MemorySink::new(&["Provider Name"]);
        sink.fail_appends = true;

        let result = pipeline(llm).run(&sources, &mut sink, 1).await;
        assert!(matches!(result, Err(Error::Sink(_))));
    }

    #[tokio::test]
    async fn extract_record_covers_schema() {
        let llm = ScriptedLlm::new(&[
            r#"{"provider_name": "Jane Doe", "tin": "123456789", "ppg_id": ["P1", "P2"]}"#,
        ]);
        let record = pipeline(llm).extract_record("email text").await.unwrap();

        assert_eq!(record.len(), Schema::provider_roster().len());
        assert_eq!(record.get("provider_name"), Some("Jane Doe"));
        assert_eq!(record.get("ppg_id"), Some("P1, P2"));
        assert_eq!(record.get("term_reason"), Some(NOT_FOUND));
    }
}
