use crate::prelude::*;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Longest error detail kept on a failed sample, in characters.
pub const MAX_ERROR_DETAIL_CHARS: usize = 512;

/// Metrics a response hook derived from the raw response.
pub type ResponseMetrics = IndexMap<String, serde_json::Value>;

/// Which virtual user and iteration produced a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SampleOrigin {
    pub virtual_user: usize,
    pub iteration: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum SampleErrorKind {
    #[display("timeout")]
    Timeout,
    #[display("remote")]
    Remote,
    #[display("connection_lost")]
    ConnectionLost,
    #[display("decode")]
    Decode,
}

/// Recorded outcome of one invocation attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, Builder)]
pub struct Sample {
    #[serde(flatten)]
    #[getset(get = "pub")]
    origin: SampleOrigin,

    /// Name of the invoked operation.
    #[getset(get = "pub")]
    #[builder(into)]
    label: String,

    #[getset(get = "pub")]
    start_time: DateTime<Utc>,

    #[getset(get = "pub")]
    end_time: DateTime<Utc>,

    #[getset(get = "pub")]
    #[serde(rename = "latency_ms", serialize_with = "serialize_millis")]
    latency: Duration,

    #[getset(get = "pub")]
    success: bool,

    #[getset(get = "pub")]
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<SampleErrorKind>,

    #[getset(get = "pub")]
    #[serde(skip_serializing_if = "Option::is_none")]
    error_detail: Option<String>,

    #[getset(get = "pub")]
    #[serde(skip_serializing_if = "Option::is_none")]
    response_metrics: Option<ResponseMetrics>,
}

impl Sample {
    /// A failed sample for an iteration that had no connection to run on.
    pub fn connection_unavailable(
        origin: SampleOrigin,
        label: impl Into<String>,
        reason: &RpcError,
    ) -> Self {
        let now = Utc::now();
        Sample::builder()
            .origin(origin)
            .label(label)
            .start_time(now)
            .end_time(now)
            .latency(Duration::ZERO)
            .success(false)
            .error_kind(SampleErrorKind::ConnectionLost)
            .error_detail(truncate_error_detail(
                &format!("connection unavailable: {reason}"),
                MAX_ERROR_DETAIL_CHARS,
            ))
            .build()
    }

    pub fn connection_lost(&self) -> bool {
        self.error_kind == Some(SampleErrorKind::ConnectionLost)
    }
}

fn serialize_millis<S: Serializer>(latency: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(latency.as_nanos() as f64 / 1_000_000.0)
}

/// Cuts `detail` down to `max_chars` characters, marking the cut with `...`.
pub fn truncate_error_detail(detail: &str, max_chars: usize) -> String {
    const ELLIPSIS: &str = "...";
    if detail.chars().count() <= max_chars {
        return detail.to_owned();
    }
    if max_chars < ELLIPSIS.len() {
        return detail.chars().take(max_chars).collect();
    }
    let mut truncated: String = detail.chars().take(max_chars - ELLIPSIS.len()).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
