//! Orchestration client for the downstream extraction job.
//!
//! The trigger is a single "run now" call carrying the catalog, schema, the
//! three logical table names, the source document path, and a row-limit
//! bound. The service replies with a run identifier. Failures (quota, bad
//! parameters, unavailable service) surface to the caller with the
//! triggering path identified; there is no retry here — retry policy belongs
//! to the orchestrator or an external scheduler.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::config::Config;

/// A successfully started extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub run_id: u64,
}

/// Typed failure taxonomy for the trigger call.
#[derive(Debug)]
pub enum TriggerError {
    /// The service answered with a recognized error payload.
    Api {
        status: u16,
        error_code: String,
        message: String,
    },
    /// The body matched none of the known response shapes.
    UnrecognizedShape { status: u16, body: String },
}

impl std::fmt::Display for TriggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerError::Api {
                status,
                error_code,
                message,
            } => write!(f, "orchestrator error {} ({}): {}", status, error_code, message),
            TriggerError::UnrecognizedShape { status, body } => {
                write!(f, "unrecognized orchestrator response shape (HTTP {}): {}", status, body)
            }
        }
    }
}

impl std::error::Error for TriggerError {}

// Known response shapes, tried in fixed priority order.
#[derive(Deserialize)]
struct RunAccepted {
    run_id: u64,
}

#[derive(Deserialize)]
struct ApiErrorShape {
    error_code: String,
    message: String,
}

/// Decode a "run now" response body against the known shapes: the
/// accepted-run shape first, then the error shape. Anything else is a typed
/// unrecognized-shape failure — no field probing through fallback paths.
pub fn decode_run_now_response(status: u16, body: &str) -> Result<Run, TriggerError> {
    if let Ok(accepted) = serde_json::from_str::<RunAccepted>(body) {
        return Ok(Run {
            run_id: accepted.run_id,
        });
    }

    if let Ok(err) = serde_json::from_str::<ApiErrorShape>(body) {
        return Err(TriggerError::Api {
            status,
            error_code: err.error_code,
            message: err.message,
        });
    }

    // Keep a bounded excerpt; error pages are arbitrary text, so cut on a
    // char boundary rather than a byte offset.
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    Err(TriggerError::UnrecognizedShape {
        status,
        body: body[..end].to_string(),
    })
}

/// Client for the orchestration service's jobs API. Holds the parameter
/// bundle that is constant across triggers; only the source path varies.
pub struct JobsClient {
    http: reqwest::Client,
    host: String,
    token: String,
    job_id: u64,
    catalog: String,
    database: String,
    track_table: String,
    parsed_table: String,
    extract_table: String,
    row_limit: u32,
}

impl JobsClient {
    /// Build a client from config. The bearer token is read from the
    /// environment variable named in `orchestrator.token_env` (passthrough
    /// only).
    pub fn from_config(config: &Config) -> Result<Self> {
        let orch = config.orchestrator.as_ref().ok_or_else(|| {
            anyhow::anyhow!("Orchestrator not configured (missing [orchestrator] section)")
        })?;

        let token = std::env::var(&orch.token_env)
            .with_context(|| format!("{} environment variable not set", orch.token_env))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(orch.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            host: orch.host.trim_end_matches('/').to_string(),
            token,
            job_id: orch.job_id,
            catalog: config.tables.catalog.clone(),
            database: config.tables.database.clone(),
            track_table: config.tables.track.clone(),
            parsed_table: config.tables.parsed.clone(),
            extract_table: config.tables.extract.clone(),
            row_limit: orch.row_limit,
        })
    }

    /// Kick off one extraction run for a single source document.
    pub async fn run_now(&self, source_pdf_path: &str) -> Result<Run> {
        let body = serde_json::json!({
            "job_id": self.job_id,
            "notebook_params": {
                "catalog": self.catalog,
                "database": self.database,
                "trackTableName": self.track_table,
                "parsedTableName": self.parsed_table,
                "extractTableName": self.extract_table,
                "sourcePDFPath": source_pdf_path,
                "limit": self.row_limit.to_string(),
            }
        });

        let response = self
            .http
            .post(format!("{}/api/2.1/jobs/run-now", self.host))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Orchestrator unreachable triggering {}", source_pdf_path))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed reading orchestrator response for {}", source_pdf_path))?;

        let run = decode_run_now_response(status, &text)
            .with_context(|| format!("Extraction trigger failed for {}", source_pdf_path))?;

        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_run_shape_decodes() {
        let run = decode_run_now_response(200, r#"{"run_id": 4127}"#).unwrap();
        assert_eq!(run, Run { run_id: 4127 });
    }

    #[test]
    fn extra_fields_do_not_break_the_accepted_shape() {
        let run =
            decode_run_now_response(200, r#"{"run_id": 9, "number_in_job": 9}"#).unwrap();
        assert_eq!(run.run_id, 9);
    }

    #[test]
    fn api_error_shape_decodes_as_typed_error() {
        let err = decode_run_now_response(
            429,
            r#"{"error_code": "QUOTA_EXCEEDED", "message": "Too many concurrent runs"}"#,
        )
        .unwrap_err();

        match err {
            TriggerError::Api {
                status,
                error_code,
                message,
            } => {
                assert_eq!(status, 429);
                assert_eq!(error_code, "QUOTA_EXCEEDED");
                assert!(message.contains("concurrent"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_body_is_an_unrecognized_shape() {
        let err = decode_run_now_response(502, "<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, TriggerError::UnrecognizedShape { status: 502, .. }));
    }

    #[test]
    fn multibyte_body_truncates_on_a_char_boundary() {
        // Byte 200 of this body falls inside a two-byte character, as in a
        // non-ASCII HTML error page from a proxy.
        let page = format!("a{}", "é".repeat(150));
        let err = decode_run_now_response(502, &page).unwrap_err();

        match err {
            TriggerError::UnrecognizedShape { status, body } => {
                assert_eq!(status, 502);
                assert!(body.len() <= 200);
                assert!(page.starts_with(&body));
            }
            other => panic!("expected UnrecognizedShape, got {:?}", other),
        }
    }

    #[test]
    fn shapes_are_tried_in_priority_order() {
        // A body carrying run_id decodes as a run even if it also carries
        // error-looking fields.
        let run = decode_run_now_response(
            200,
            r#"{"run_id": 7, "error_code": "", "message": ""}"#,
        )
        .unwrap();
        assert_eq!(run.run_id, 7);
    }
}
