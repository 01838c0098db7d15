use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

const FONT_PATH: &str = "tests/data/fonts/DejaVuSans.ttf";

fn font_bytes() -> Vec<u8> {
    std::fs::read(FONT_PATH).unwrap()
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        attempts: 3,
        base_delay: Duration::from_millis(1),
    }
}

#[test]
fn font_data_reads_family_name() {
    let font = FontData::from_bytes(font_bytes()).unwrap();
    assert_eq!(font.family(), "DejaVu Sans");
    assert_eq!(font.media_type(), "font/ttf");
    assert_eq!(font.database().len(), 1);
}

#[test]
fn font_data_rejects_empty_and_garbage() {
    assert!(matches!(
        FontData::from_bytes(Vec::new()),
        Err(PlaceholdError::FontFetch(_))
    ));
    assert!(matches!(
        FontData::from_bytes(b"definitely not a font".to_vec()),
        Err(PlaceholdError::FontFetch(_))
    ));
}

#[test]
fn source_from_str_distinguishes_urls() {
    assert!(matches!(
        "https://example.com/Inter.ttf".parse::<FontSource>().unwrap(),
        FontSource::Http(_)
    ));
    assert!(matches!(
        "fonts/Inter.ttf".parse::<FontSource>().unwrap(),
        FontSource::File(_)
    ));
}

#[test]
fn retry_delay_doubles_with_bounded_jitter() {
    let policy = RetryPolicy {
        attempts: 4,
        base_delay: Duration::from_millis(100),
    };
    for (attempt, base) in [(1u32, 100u64), (2, 200), (3, 400)] {
        let d = policy.delay(attempt).as_millis() as u64;
        assert!(d >= base && d <= base + base / 2, "attempt {attempt}: {d}ms");
    }
    assert_eq!(RetryPolicy::none().delay(1), Duration::ZERO);
}

#[tokio::test]
async fn static_and_file_sources_load() {
    let client = reqwest::Client::new();
    let font = FontSource::Static(Arc::from(font_bytes()))
        .load(&client, &fast_retry())
        .await
        .unwrap();
    assert_eq!(font.family(), "DejaVu Sans");

    let font = FontSource::File(PathBuf::from(FONT_PATH))
        .load(&client, &fast_retry())
        .await
        .unwrap();
    assert_eq!(font.bytes().len(), font_bytes().len());
}

#[tokio::test]
async fn missing_file_fails_without_retrying() {
    let client = reqwest::Client::new();
    let err = FontSource::File(PathBuf::from("tests/data/fonts/missing.ttf"))
        .load(&client, &fast_retry())
        .await
        .unwrap_err();
    let PlaceholdError::FontFetch(msg) = err else {
        panic!("expected font fetch error, got {err:?}");
    };
    assert!(msg.contains("attempt 1/3"), "{msg}");
}

fn serve_font(statuses: Vec<u16>) -> (String, Arc<AtomicUsize>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let status = statuses.get(n).copied().unwrap_or(200);
            let body = if status == 200 { font_bytes() } else { Vec::new() };
            let _ = request.respond(tiny_http::Response::from_data(body).with_status_code(status));
        }
    });
    (format!("http://{addr}/font.ttf"), hits)
}

#[tokio::test]
async fn http_source_retries_server_errors() {
    let (url, hits) = serve_font(vec![503, 500]);
    let font = FontSource::Http(url)
        .load(&reqwest::Client::new(), &fast_retry())
        .await
        .unwrap();
    assert_eq!(font.family(), "DejaVu Sans");
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn http_source_gives_up_after_bounded_attempts() {
    let (url, hits) = serve_font(vec![503, 503, 503, 503]);
    let err = FontSource::Http(url)
        .load(&reqwest::Client::new(), &fast_retry())
        .await
        .unwrap_err();
    assert!(matches!(err, PlaceholdError::FontFetch(_)));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn http_client_errors_are_not_retried() {
    let (url, hits) = serve_font(vec![404]);
    let err = FontSource::Http(url)
        .load(&reqwest::Client::new(), &fast_retry())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("HTTP 404"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
