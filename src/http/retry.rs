//! Bounded retry around a single request.

use log::{debug, warn};

use super::transport::{HttpRequest, Transport};
use crate::error::{PushError, Result};
use crate::logger::DebugLog;

/// Attempts per request, retried back to back with no delay.
pub const MAX_RETRIES: usize = 3;

/// Runs `request` until a 2xx response with a readable body arrives or the
/// budget runs out, and returns that body.
///
/// Transport failures, missing bodies, non-2xx statuses and body read errors
/// are retried; any other error returns at once. When every attempt fails the
/// last error is returned.
#[tracing::instrument(skip_all, fields(method = %request.method, url = %request.url))]
pub async fn execute_with_retry(
    transport: &dyn Transport,
    log: &dyn DebugLog,
    request: &HttpRequest,
) -> Result<Vec<u8>> {
    let mut last_error = None;

    for attempt in 1..=MAX_RETRIES {
        log.debug_fmt(format_args!(
            "{} request url: {}, body: {}",
            request.method,
            request.url,
            request.body.as_deref().unwrap_or_default()
        ));

        match attempt_once(transport, log, request, attempt).await {
            Ok(body) => {
                log.debug_fmt(format_args!("response: {}", String::from_utf8_lossy(&body)));
                return Ok(body);
            }
            Err(e) => {
                if !e.is_retryable() {
                    debug!("{} {}: non-retryable error: {}", request.method, request.url, e);
                    return Err(e);
                }

                if attempt < MAX_RETRIES {
                    warn!(
                        "{} {}: attempt {}/{} failed ({}), retrying...",
                        request.method, request.url, attempt, MAX_RETRIES, e
                    );
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        PushError::Request(format!("failed after {} attempts", MAX_RETRIES))
    }))
}

async fn attempt_once(
    transport: &dyn Transport,
    log: &dyn DebugLog,
    request: &HttpRequest,
    attempt: usize,
) -> Result<Vec<u8>> {
    let response = match transport.execute(request).await {
        Ok(response) => response,
        Err(e) => {
            log.debug_fmt(format_args!("error {}", e));
            return Err(e);
        }
    };

    log.debug_fmt(format_args!(
        "request time {}, status: {}",
        attempt, response.status
    ));

    let success = response.is_success();
    let body = response.body.ok_or(PushError::EmptyResponse)?;

    if !success {
        return Err(PushError::Status {
            status: response.status,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::transport::{HttpResponse, Method, MockTransport};
    use crate::logger::NopLogger;
    use mockall::Sequence;
    use std::fmt;
    use std::sync::Mutex;

    fn request() -> HttpRequest {
        HttpRequest {
            method: Method::Post,
            url: "https://api.example.com/v3/message/regid".to_string(),
            headers: Vec::new(),
            body: Some("title=hi".to_string()),
        }
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            body: Some(body.as_bytes().to_vec()),
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl DebugLog for Recorder {
        fn debug(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }

        fn debug_fmt(&self, args: fmt::Arguments<'_>) {
            self.0.lock().unwrap().push(args.to_string());
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_first_success_returns_immediately() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .returning(|_| Ok(ok(r#"{"code":0}"#)));

        let body = execute_with_retry(&transport, &NopLogger, &request())
            .await
            .unwrap();
        assert_eq!(body, br#"{"code":0}"#);
    }

    #[test_log::test(tokio::test)]
    async fn test_succeeds_on_third_attempt() {
        let mut seq = Sequence::new();
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(PushError::Request("connection refused".to_string())));
        transport
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ok("done")));

        let body = execute_with_retry(&transport, &NopLogger, &request())
            .await
            .unwrap();
        assert_eq!(body, b"done");
    }

    #[test_log::test(tokio::test)]
    async fn test_returns_last_error_after_exhausting_budget() {
        let mut seq = Sequence::new();
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(PushError::Request("connection reset".to_string())));
        transport
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(HttpResponse {
                    status: 503,
                    body: Some(b"busy".to_vec()),
                })
            });

        let err = execute_with_retry(&transport, &NopLogger, &request())
            .await
            .unwrap_err();
        match err {
            PushError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "busy");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_body_is_retried() {
        let mut transport = MockTransport::new();
        transport.expect_execute().times(MAX_RETRIES).returning(|_| {
            Ok(HttpResponse {
                status: 200,
                body: None,
            })
        });

        let err = execute_with_retry(&transport, &NopLogger, &request())
            .await
            .unwrap_err();
        assert!(matches!(err, PushError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_read_failure_is_retried() {
        let mut seq = Sequence::new();
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(PushError::ReadBody("unexpected eof".to_string())));
        transport
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ok("{}")));

        assert!(
            execute_with_retry(&transport, &NopLogger, &request())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_non_retryable_error_stops_immediately() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .returning(|_| Err(PushError::Validation("bad url".to_string())));

        let err = execute_with_retry(&transport, &NopLogger, &request())
            .await
            .unwrap_err();
        assert!(matches!(err, PushError::Validation(_)));
    }

    #[tokio::test]
    async fn test_every_attempt_is_logged() {
        let mut seq = Sequence::new();
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(HttpResponse {
                    status: 500,
                    body: Some(Vec::new()),
                })
            });
        transport
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ok("fine")));

        let recorder = Recorder::default();
        execute_with_retry(&transport, &recorder, &request())
            .await
            .unwrap();

        let lines = recorder.0.lock().unwrap();
        assert_eq!(
            *lines,
            vec![
                "POST request url: https://api.example.com/v3/message/regid, body: title=hi",
                "request time 1, status: 500",
                "POST request url: https://api.example.com/v3/message/regid, body: title=hi",
                "request time 2, status: 200",
                "response: fine",
            ]
        );
    }
}
