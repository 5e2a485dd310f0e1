#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::anyhow;
    use async_trait::async_trait;
    use reqwest::{Method, Request, Response, Url};
    use tokio_util::sync::CancellationToken;

    use crate::error::ThrottleError;
    use crate::rate::Rate;
    use crate::throttler::Throttler;
    use crate::transport::Transport;

    enum MockBehavior {
        Fixed(&'static str),
        EchoPath,
        Fail(&'static str),
    }

    struct MockTransport {
        behavior: MockBehavior,
        delay: Duration,
    }

    impl MockTransport {
        fn fixed(body: &'static str) -> Arc<dyn Transport> {
            Arc::new(MockTransport {
                behavior: MockBehavior::Fixed(body),
                delay: Duration::ZERO,
            })
        }

        fn echo_path() -> Arc<dyn Transport> {
            Arc::new(MockTransport {
                behavior: MockBehavior::EchoPath,
                delay: Duration::ZERO,
            })
        }

        fn failing(message: &'static str) -> Arc<dyn Transport> {
            Arc::new(MockTransport {
                behavior: MockBehavior::Fail(message),
                delay: Duration::ZERO,
            })
        }

        fn slow(body: &'static str, delay: Duration) -> Arc<dyn Transport> {
            Arc::new(MockTransport {
                behavior: MockBehavior::Fixed(body),
                delay,
            })
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn execute(&self, request: Request) -> anyhow::Result<Response> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let body = match &self.behavior {
                MockBehavior::Fixed(body) => body.to_string(),
                MockBehavior::EchoPath => request.url().path().to_string(),
                MockBehavior::Fail(message) => return Err(anyhow!(*message)),
            };
            let response = http::Response::builder()
                .status(http::StatusCode::OK)
                .body(body)
                .unwrap();
            Ok(Response::from(response))
        }
    }

    fn get_request(path: &str) -> Request {
        let url = Url::parse(&format!("https://example.com{path}")).unwrap();
        Request::new(Method::GET, url)
    }

    fn build_throttler(transport: Arc<dyn Transport>) -> Throttler {
        let rate = Rate::by_calls_per_second(2, Duration::from_millis(50)).unwrap();
        Throttler::new(rate, 5, false, Some(transport)).unwrap()
    }

    #[test]
    fn rejects_zero_queue_capacity() {
        let rate = Rate::by_calls_per_second(2, Duration::from_millis(50)).unwrap();
        let err = Throttler::new(rate, 0, false, None).unwrap_err();
        assert_eq!(err.to_string(), "reqChanCapacity must be greater than zero");
    }

    #[tokio::test]
    async fn queue_fails_before_start() {
        let throttler = build_throttler(MockTransport::fixed("body content"));
        let err = throttler
            .queue(
                &CancellationToken::new(),
                "too early",
                get_request("/"),
                Duration::from_secs(10),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "requestHandler has not been started");
    }

    #[tokio::test]
    async fn reports_calculated_rate() {
        let throttler = build_throttler(MockTransport::fixed("body content"));
        assert_eq!(throttler.rate(), Duration::from_millis(550));
    }

    #[tokio::test]
    async fn fulfills_a_single_request() {
        let mut throttler = build_throttler(MockTransport::fixed("body content"));
        throttler.start();

        let response = throttler
            .queue(
                &CancellationToken::new(),
                "single",
                get_request("/"),
                Duration::from_secs(10),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "body content");
    }

    #[tokio::test]
    async fn times_out_with_a_tiny_deadline() {
        let mut throttler = build_throttler(MockTransport::fixed("body content"));
        throttler.start();

        let err = throttler
            .queue(
                &CancellationToken::new(),
                "tiny deadline",
                get_request("/"),
                Duration::from_nanos(1),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ThrottleError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn caller_cancellation_stops_the_wait() {
        let mut throttler =
            build_throttler(MockTransport::slow("late", Duration::from_millis(500)));
        throttler.start();

        let ctx = CancellationToken::new();
        let trigger = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = throttler
            .queue(&ctx, "cancelled", get_request("/"), Duration::from_secs(10))
            .await
            .unwrap_err();
        assert!(matches!(err, ThrottleError::Cancelled));
    }

    #[tokio::test]
    async fn transport_errors_pass_through_verbatim() {
        let mut throttler = build_throttler(MockTransport::failing("connection refused"));
        throttler.start();

        let err = throttler
            .queue(
                &CancellationToken::new(),
                "failing",
                get_request("/"),
                Duration::from_secs(10),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ThrottleError::Transport(_)));
        assert_eq!(err.to_string(), "connection refused");
    }

    #[tokio::test]
    async fn concurrent_callers_each_get_their_own_response() {
        let rate = Rate::by_calls_per_second(100, Duration::ZERO).unwrap();
        let mut throttler =
            Throttler::new(rate, 10, false, Some(MockTransport::echo_path())).unwrap();
        throttler.start();
        let throttler = Arc::new(throttler);

        let mut handles = Vec::new();
        for i in 0..5 {
            let throttler = Arc::clone(&throttler);
            handles.push(tokio::spawn(async move {
                let ctx = CancellationToken::new();
                let path = format!("/task/{i}");
                let response = throttler
                    .queue(
                        &ctx,
                        &format!("Task {i}"),
                        get_request(&path),
                        Duration::from_secs(10),
                    )
                    .await
                    .unwrap();
                (path, response.text().await.unwrap())
            }));
        }

        for handle in handles {
            let (path, body) = handle.await.unwrap();
            assert_eq!(body, path);
        }
    }
}
