//! Client for the remote prayer timings service.
//!
//! The service is treated as a black box that, given a date, coordinates and a
//! calculation method, returns wall-clock strings for every prayer. Only
//! `data.timings.Maghrib` and `data.timings.Fajr` are consumed.
//!
//! [`TimingsSource`] is the seam between the computation and the network so
//! the orchestration can be exercised without a live service.

use chrono::NaiveDate;
use serde::Deserialize;
use std::thread;
use std::time::Duration;

use crate::cities::Location;
use crate::config::Config;
use crate::error::{NightError, Result};
use crate::logger::Log;

/// Parameters of one timings request.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingsQuery {
    pub date: NaiveDate,
    pub location: Location,
    pub method: u8,
}

/// The two anchors as returned by the service, not yet parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTimings {
    pub maghrib: String,
    pub fajr: String,
}

/// Anything that can answer a timings query.
#[cfg_attr(test, mockall::automock)]
pub trait TimingsSource {
    fn fetch(&self, query: &TimingsQuery) -> Result<RemoteTimings>;
}

// Wire shape: { "data": { "timings": { "Maghrib": "HH:MM", "Fajr": "HH:MM", ... } } }
#[derive(Debug, Deserialize)]
struct TimingsResponse {
    data: TimingsData,
}

#[derive(Debug, Deserialize)]
struct TimingsData {
    timings: TimingsFields,
}

#[derive(Debug, Deserialize)]
struct TimingsFields {
    #[serde(rename = "Maghrib")]
    maghrib: Option<String>,
    #[serde(rename = "Fajr")]
    fajr: Option<String>,
}

/// Extract the two anchors from a response body.
///
/// Any body that is not JSON, lacks `data.timings`, or lacks either field as a
/// string is a [`NightError::ResponseShape`]. Values are returned verbatim;
/// checking that they are valid `HH:MM` is the calculator's job.
pub fn parse_timings_body(body: &str) -> Result<RemoteTimings> {
    let response: TimingsResponse = serde_json::from_str(body)
        .map_err(|e| NightError::ResponseShape(e.to_string()))?;

    let TimingsFields { maghrib, fajr } = response.data.timings;
    match (maghrib, fajr) {
        (Some(maghrib), Some(fajr)) => Ok(RemoteTimings { maghrib, fajr }),
        (None, _) => Err(NightError::ResponseShape(
            "missing timings.Maghrib".to_string(),
        )),
        (_, None) => Err(NightError::ResponseShape("missing timings.Fajr".to_string())),
    }
}

/// Blocking HTTP client for the Aladhan timings endpoint.
pub struct AladhanClient {
    http: reqwest::blocking::Client,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl AladhanClient {
    /// Create a client from the loaded configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs()))
            .user_agent(concat!("lastthird/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NightError::fetch(e.to_string(), false))?;

        Ok(Self {
            http,
            base_url: config.api_url().trim_end_matches('/').to_string(),
            max_retries: config.max_retries(),
            retry_delay: Duration::from_millis(config.retry_delay_ms()),
        })
    }

    /// Full request URL for a query.
    ///
    /// The endpoint takes the date as `DD-MM-YYYY`.
    pub fn request_url(&self, query: &TimingsQuery) -> String {
        timings_url(&self.base_url, query)
    }

    fn fetch_once(&self, url: &str) -> Result<RemoteTimings> {
        let response = self.http.get(url).send().map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NightError::fetch(
                format!("HTTP {}", status),
                status.is_server_error(),
            ));
        }

        let body = response
            .text()
            .map_err(|e| NightError::fetch(format!("Failed to read body: {}", e), true))?;

        parse_timings_body(&body)
    }
}

impl TimingsSource for AladhanClient {
    /// Fetch with retries on transient failures.
    ///
    /// Timeouts, connection errors and 5xx responses are retried up to
    /// `max_retries` times. Client errors and malformed bodies are not.
    fn fetch(&self, query: &TimingsQuery) -> Result<RemoteTimings> {
        let url = self.request_url(query);
        if Log::is_debug() {
            Log::log_indented(&format!("Requesting {}", url));
        }

        let mut attempt = 0;
        loop {
            match self.fetch_once(&url) {
                Ok(timings) => return Ok(timings),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    if Log::is_debug() {
                        Log::log_warning(&format!(
                            "Attempt {}/{} failed: {}",
                            attempt,
                            self.max_retries + 1,
                            e
                        ));
                    }
                    thread::sleep(self.retry_delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

pub fn timings_url(base_url: &str, query: &TimingsQuery) -> String {
    format!(
        "{}/timings/{}?latitude={}&longitude={}&method={}",
        base_url.trim_end_matches('/'),
        query.date.format("%d-%m-%Y"),
        query.location.latitude,
        query.location.longitude,
        query.method
    )
}

/// Only timeouts and connection failures are worth retrying.
fn classify_transport_error(e: reqwest::Error) -> NightError {
    let transient = e.is_timeout() || e.is_connect();
    NightError::fetch(e.to_string(), transient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities::{Location, default_city};
    use crate::config::Language;
    use crate::summary::{Overrides, failure_message, run_once};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn query() -> TimingsQuery {
        TimingsQuery {
            date: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            location: Location::from(default_city()),
            method: 3,
        }
    }

    #[test]
    fn test_parse_full_body() {
        let body = r#"{
            "code": 200,
            "status": "OK",
            "data": {
                "timings": {
                    "Fajr": "05:41",
                    "Sunrise": "07:03",
                    "Dhuhr": "12:59",
                    "Asr": "16:19",
                    "Sunset": "18:54",
                    "Maghrib": "18:54",
                    "Isha": "20:10"
                },
                "date": { "readable": "07 Mar 2025" }
            }
        }"#;

        let timings = parse_timings_body(body).unwrap();
        assert_eq!(timings.maghrib, "18:54");
        assert_eq!(timings.fajr, "05:41");
    }

    #[test]
    fn test_parse_missing_fajr() {
        let body = r#"{ "data": { "timings": { "Maghrib": "18:54" } } }"#;
        assert_eq!(
            parse_timings_body(body),
            Err(NightError::ResponseShape("missing timings.Fajr".to_string()))
        );
    }

    #[test]
    fn test_parse_missing_maghrib() {
        let body = r#"{ "data": { "timings": { "Fajr": "05:41" } } }"#;
        assert!(matches!(
            parse_timings_body(body),
            Err(NightError::ResponseShape(_))
        ));
    }

    #[test]
    fn test_parse_wrong_structure_and_garbage() {
        for body in [
            "",
            "not json",
            r#"{ "data": "Invalid date" }"#,
            r#"{ "data": { "timings": { "Maghrib": 1854, "Fajr": "05:41" } } }"#,
            r#"{ "code": 400 }"#,
        ] {
            assert!(
                matches!(parse_timings_body(body), Err(NightError::ResponseShape(_))),
                "body {:?} should be a shape error",
                body
            );
        }
    }

    #[test]
    fn test_values_are_passed_through_verbatim() {
        let body = r#"{ "data": { "timings": { "Maghrib": "18:54 (CET)", "Fajr": "05:41" } } }"#;
        assert_eq!(parse_timings_body(body).unwrap().maghrib, "18:54 (CET)");
    }

    #[test]
    fn test_timings_url_format() {
        let url = timings_url("https://api.aladhan.com/v1/", &query());
        assert_eq!(
            url,
            "https://api.aladhan.com/v1/timings/07-03-2025?latitude=30.5102939&longitude=-2.8125926&method=3"
        );
    }

    #[test]
    fn test_mock_source_satisfies_trait() {
        let mut source = MockTimingsSource::new();
        source
            .expect_fetch()
            .withf(|q| q.method == 3)
            .times(1)
            .returning(|_| {
                Ok(RemoteTimings {
                    maghrib: "18:00".into(),
                    fajr: "05:00".into(),
                })
            });

        let timings = source.fetch(&query()).unwrap();
        assert_eq!(timings.fajr, "05:00");
    }

    /// Serve one canned `(status, body)` per connection, counting requests.
    fn serve(responses: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        thread::spawn(move || {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };

                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                counter.fetch_add(1, Ordering::SeqCst);

                let reason = match status {
                    200 => "OK",
                    404 => "Not Found",
                    _ => "Internal Server Error",
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        (format!("http://{}", addr), hits)
    }

    fn client_for(api_url: String, max_retries: u32) -> AladhanClient {
        AladhanClient::new(&Config {
            api_url: Some(api_url),
            max_retries: Some(max_retries),
            retry_delay_ms: Some(0),
            timeout_secs: Some(5),
            ..Default::default()
        })
        .unwrap()
    }

    const FULL_BODY: &str = r#"{ "data": { "timings": { "Maghrib": "18:00", "Fajr": "05:00" } } }"#;

    #[test]
    fn test_server_error_is_retried_until_success() {
        let (url, hits) = serve(vec![(500, "{}"), (200, FULL_BODY)]);
        let client = client_for(url, 2);

        let text = run_once(&client, &query(), &Overrides::default(), Language::En);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(text.contains("01:20"));
        assert!(text.contains("05:00"));
    }

    #[test]
    fn test_client_error_status_is_not_retried() {
        let (url, hits) = serve(vec![(404, "{}"), (404, "{}")]);
        let client = client_for(url, 2);

        let outcome = client.fetch(&query());
        assert!(matches!(
            outcome,
            Err(NightError::Fetch {
                transient: false,
                ..
            })
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let text = run_once(&client, &query(), &Overrides::default(), Language::En);
        assert_eq!(text, failure_message(Language::En));
    }

    #[test]
    fn test_body_without_fajr_is_failure() {
        let body = r#"{ "data": { "timings": { "Maghrib": "18:00" } } }"#;
        let (url, hits) = serve(vec![(200, body)]);
        let client = client_for(url, 2);

        let outcome = client.fetch(&query());
        assert_eq!(
            outcome,
            Err(NightError::ResponseShape("missing timings.Fajr".to_string()))
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_refused_connection_is_transient_failure() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = client_for(format!("http://127.0.0.1:{}", port), 1);

        let outcome = client.fetch(&query());
        assert!(matches!(
            outcome,
            Err(NightError::Fetch {
                transient: true,
                ..
            })
        ));

        let text = run_once(&client, &query(), &Overrides::default(), Language::En);
        assert_eq!(text, failure_message(Language::En));
    }
}
