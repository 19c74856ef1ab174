//! JSONBin-style HTTP document backend.
//!
//! # Responsibility
//! - `GET` the bin and unwrap its `{ "record": ... }` envelope.
//! - `PUT` the full document body back to the same bin.
//!
//! # Invariants
//! - Every request carries the `X-Master-Key` header.
//! - Non-2xx responses surface as `DocumentError::Status`; nothing retries.
//! - Only a fully received body that fails to parse is a `Decode` error.
//! - The master key never appears in log lines.

use super::{DocumentError, DocumentResult, DocumentStore};
use crate::config::RemoteStoreConfig;
use crate::model::dataset::Dataset;
use log::{error, info};
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;
use std::time::Instant;

const MASTER_KEY_HEADER: &str = "X-Master-Key";

#[derive(Debug, Deserialize)]
struct BinEnvelope {
    #[serde(default)]
    record: Value,
}

/// Remote document store reached through a blocking HTTP client.
pub struct JsonBinStore {
    config: RemoteStoreConfig,
    client: Client,
}

impl JsonBinStore {
    /// Builds the HTTP client for `config`.
    ///
    /// # Errors
    /// - `Transport` when the TLS backend cannot be initialized.
    pub fn new(config: RemoteStoreConfig) -> DocumentResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RemoteStoreConfig {
        &self.config
    }

    fn log_failure(&self, op: &str, started_at: Instant, err: &DocumentError) {
        error!(
            "event=document_{op} module=document backend=http status=error duration_ms={} error_code={} error={}",
            started_at.elapsed().as_millis(),
            err.code(),
            err
        );
    }
}

fn ensure_success(response: Response) -> DocumentResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(DocumentError::Status {
            code: status.as_u16(),
        })
    }
}

fn decode_envelope(body: &str) -> DocumentResult<BinEnvelope> {
    serde_json::from_str(body).map_err(|err| DocumentError::Decode(err.to_string()))
}

impl DocumentStore for JsonBinStore {
    fn backend(&self) -> &'static str {
        "http"
    }

    fn fetch(&self) -> DocumentResult<Value> {
        let started_at = Instant::now();
        info!(
            "event=document_fetch module=document backend=http status=start bin={}",
            self.config.bin_id()
        );

        let result = self
            .client
            .get(self.config.document_url())
            .header(MASTER_KEY_HEADER, self.config.master_key())
            .send()
            .map_err(DocumentError::from)
            .and_then(ensure_success)
            // Body read failures (reset, truncation, timeout) stay transport errors.
            .and_then(|response| response.text().map_err(DocumentError::from))
            .and_then(|body| decode_envelope(&body));

        match result {
            Ok(envelope) => {
                info!(
                    "event=document_fetch module=document backend=http status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(envelope.record)
            }
            Err(err) => {
                self.log_failure("fetch", started_at, &err);
                Err(err)
            }
        }
    }

    fn replace(&self, document: &Dataset) -> DocumentResult<()> {
        let started_at = Instant::now();
        info!(
            "event=document_replace module=document backend=http status=start bin={} stores={} employees={} payslips={}",
            self.config.bin_id(),
            document.stores.len(),
            document.employees.len(),
            document.payslips.len()
        );

        let result = self
            .client
            .put(self.config.document_url())
            .header(CONTENT_TYPE, "application/json")
            .header(MASTER_KEY_HEADER, self.config.master_key())
            .json(document)
            .send()
            .map_err(DocumentError::from)
            .and_then(ensure_success);

        match result {
            Ok(_) => {
                info!(
                    "event=document_replace module=document backend=http status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                self.log_failure("replace", started_at, &err);
                Err(err)
            }
        }
    }
}
