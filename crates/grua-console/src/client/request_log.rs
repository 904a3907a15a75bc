use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use crate::error::ConsoleError;
use crate::models::RequestLogEntry;

use super::transport::Method;

const RECENT_CAPACITY: usize = 256;

/// Recent backend calls, optionally mirrored to a JSONL file.
#[derive(Debug, Default)]
pub struct RequestLog {
    path: Option<PathBuf>,
    recent: Mutex<VecDeque<RequestLogEntry>>,
}

impl RequestLog {
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            recent: Mutex::new(VecDeque::new()),
        }
    }

    pub(super) fn log_success(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        http_status: u16,
        started: Instant,
    ) {
        self.record(RequestLogEntry {
            request_id: Uuid::new_v4().to_string(),
            operation: operation.to_string(),
            method: method.as_str().to_string(),
            path: path.to_string(),
            status: "ok".to_string(),
            http_status: Some(http_status),
            latency_ms: started.elapsed().as_millis(),
            created_at: Utc::now().to_rfc3339(),
            error_code: None,
            error_message: None,
        });
    }

    pub(super) fn log_error(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        started: Instant,
        err: &ConsoleError,
    ) {
        let http_status = match err {
            ConsoleError::Rejected { status, .. } => Some(*status),
            _ => None,
        };
        self.record(RequestLogEntry {
            request_id: Uuid::new_v4().to_string(),
            operation: operation.to_string(),
            method: method.as_str().to_string(),
            path: path.to_string(),
            status: "error".to_string(),
            http_status,
            latency_ms: started.elapsed().as_millis(),
            created_at: Utc::now().to_rfc3339(),
            error_code: Some(err.code().to_string()),
            error_message: Some(err.to_string()),
        });
    }

    /// Never fails the surrounding call.
    fn record(&self, entry: RequestLogEntry) {
        if let Some(path) = &self.path
            && let Ok(serialized) = serde_json::to_string(&entry)
            && let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path)
        {
            let _ = writeln!(file, "{serialized}");
        }

        if let Ok(mut recent) = self.recent.lock() {
            if recent.len() == RECENT_CAPACITY {
                recent.pop_front();
            }
            recent.push_back(entry);
        }
    }

    #[must_use]
    pub fn recent(&self) -> Vec<RequestLogEntry> {
        self.recent
            .lock()
            .map(|recent| recent.iter().cloned().collect())
            .unwrap_or_default()
    }
}
