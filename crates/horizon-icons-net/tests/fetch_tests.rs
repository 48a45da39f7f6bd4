//! Integration tests for the redundant fetcher.

use std::time::Duration;

use horizon_icons_net::{NetworkError, RedundantFetcher};
use serde_json::{Value, json};
use tokio::time::timeout;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(delay: Duration) -> RedundantFetcher {
    RedundantFetcher::builder()
        .delay(delay)
        .timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to build fetcher")
}

#[tokio::test]
async fn test_failover_and_preference() {
    let failing = MockServer::start().await;
    let working = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&failing)
        .await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "host": "b" })))
        .expect(2)
        .mount(&working)
        .await;

    // A long delay: the second host must start because the first failed
    let fetcher = fetcher(Duration::from_secs(30));
    let hosts = vec![failing.uri(), working.uri()];

    let value: Value = timeout(Duration::from_secs(10), fetcher.fetch_json(&hosts, "/data.json"))
        .await
        .expect("Fetch timed out")
        .expect("Fetch failed");
    assert_eq!(value["host"], "b");
    assert_eq!(fetcher.preferred_host(&hosts), Some(1));

    // The working host is now tried first; the failing one is never reached
    let value: Value = timeout(Duration::from_secs(10), fetcher.fetch_json(&hosts, "/data.json"))
        .await
        .expect("Fetch timed out")
        .expect("Fetch failed");
    assert_eq!(value["host"], "b");
}

#[tokio::test]
async fn test_all_hosts_fail() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    for server in [&first, &second] {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(server)
            .await;
    }

    let fetcher = fetcher(Duration::from_millis(50));
    let hosts = vec![first.uri(), second.uri()];
    let err = fetcher
        .fetch_json::<Value>(&hosts, "/data.json")
        .await
        .unwrap_err();

    match err {
        NetworkError::Unreachable { attempts, last } => {
            assert_eq!(attempts, 2);
            assert!(matches!(*last, NetworkError::HttpStatus { status: 503, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fetcher.preferred_host(&hosts), None);
}

#[tokio::test]
async fn test_slow_host_is_overtaken_by_staggered_attempt() {
    let slow = MockServer::start().await;
    let fast = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "host": "slow" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&slow)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "host": "fast" })))
        .mount(&fast)
        .await;

    let fetcher = fetcher(Duration::from_millis(100));
    let hosts = vec![slow.uri(), fast.uri()];

    let value: Value = timeout(Duration::from_secs(2), fetcher.fetch_json(&hosts, "/data.json"))
        .await
        .expect("Staggered attempt did not win")
        .unwrap();
    assert_eq!(value["host"], "fast");
    assert_eq!(fetcher.preferred_host(&hosts), Some(1));
}

#[tokio::test]
async fn test_not_found_stops_failover() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&first)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&second)
        .await;

    let fetcher = fetcher(Duration::from_secs(30));
    let hosts = vec![first.uri(), second.uri()];
    let err = fetcher
        .fetch_json::<Value>(&hosts, "/data.json")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_invalid_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let fetcher = fetcher(Duration::from_millis(10));
    let err = fetcher
        .fetch_json::<Value>(&[server.uri()], "/data.json")
        .await
        .unwrap_err();

    let NetworkError::Unreachable { last, .. } = err else {
        panic!("expected all hosts to fail");
    };
    assert!(matches!(*last, NetworkError::Json(_)));
}
