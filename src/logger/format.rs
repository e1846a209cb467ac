//! Access log line formats
//!
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format)
//! - `json`, one object per line
//! - anything else is a pattern with `$variables`

use chrono::{DateTime, Local};
use serde_json::json;

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One served request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    /// Percent-decoded request path, before normalization
    pub path: String,
    /// Raw query string, without the leading `?`
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    /// Bytes of body actually sent (0 for `HEAD`)
    pub body_bytes: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Entry stamped with the current local time
    pub fn new(remote_addr: impl Into<String>, method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            remote_addr: remote_addr.into(),
            time: Local::now(),
            method: method.into(),
            path: path.into(),
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => format!(
                "{} \"{}\" \"{}\"",
                self.format_common(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            "common" => self.format_common(),
            "json" => self.format_json(),
            pattern => self.format_pattern(pattern),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.request_uri(), self.http_version)
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Substitute `$remote_addr`, `$time_local`, `$time_iso8601`,
    /// `$request`, `$request_method`, `$request_uri`, `$request_time`
    /// (seconds), `$status`, `$body_bytes_sent`, `$http_referer`,
    /// `$http_user_agent`
    fn format_pattern(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;

        // longer names first, `$request_time` would otherwise match `$request`
        pattern
            .replace("$remote_addr", &self.remote_addr)
            .replace("$time_local", &self.time.format(CLF_TIME).to_string())
            .replace("$time_iso8601", &self.time.to_rfc3339())
            .replace("$request_time", &format!("{request_time:.3}"))
            .replace("$request_method", &self.method)
            .replace("$request_uri", &self.request_uri())
            .replace("$request", &self.request_line())
            .replace("$status", &self.status.to_string())
            .replace("$body_bytes_sent", &self.body_bytes.to_string())
            .replace("$http_referer", self.referer.as_deref().unwrap_or("-"))
            .replace("$http_user_agent", self.user_agent.as_deref().unwrap_or("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new("192.168.1.1", "GET", "/docs/readme.txt");
        entry.query = Some("raw".to_string());
        entry.status = 206;
        entry.body_bytes = 10;
        entry.referer = Some("https://example.com".to_string());
        entry.user_agent = Some("curl/8.0".to_string());
        entry.request_time_us = 1500;
        entry
    }

    #[test]
    fn test_format_combined() {
        let log = entry().format("combined");
        assert!(log.starts_with("192.168.1.1 - - ["));
        assert!(log.contains("\"GET /docs/readme.txt?raw HTTP/1.1\" 206 10"));
        assert!(log.ends_with("\"https://example.com\" \"curl/8.0\""));
    }

    #[test]
    fn test_format_common() {
        let log = entry().format("common");
        assert!(log.ends_with("\"GET /docs/readme.txt?raw HTTP/1.1\" 206 10"));
        assert!(!log.contains("curl"));
    }

    #[test]
    fn test_format_json() {
        let log = entry().format("json");
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["remote_addr"], "192.168.1.1");
        assert_eq!(value["status"], 206);
        assert_eq!(value["body_bytes"], 10);
        assert_eq!(value["query"], "raw");

        let mut bare = entry();
        bare.referer = None;
        let value: serde_json::Value = serde_json::from_str(&bare.format("json")).unwrap();
        assert!(value["referer"].is_null());
    }

    #[test]
    fn test_format_pattern() {
        let log = entry().format("$remote_addr $request_method $request_uri $status $request_time");
        // 1500us = 0.0015s, three decimals
        assert!(log.starts_with("192.168.1.1 GET /docs/readme.txt?raw 206 0.00"));
    }

    #[test]
    fn test_pattern_request_line() {
        let log = entry().format("[$request]");
        assert_eq!(log, "[GET /docs/readme.txt?raw HTTP/1.1]");
    }
}
