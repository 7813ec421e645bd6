use hotpuppy_core::providers::image::{
    placeholder_url, GenerationPurpose, ImageClient, ImageGenerator, OpenAIImageClient,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use warp::http::StatusCode;
use warp::Filter;

type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

/// Stands in for the provider's images endpoint on an ephemeral port.
fn spawn_provider(status: StatusCode, reply: Value) -> (SocketAddr, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();

    let route = warp::path!("v1" / "images" / "generations")
        .and(warp::post())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::body::json())
        .map(move |auth: Option<String>, body: Value| {
            sink.lock().unwrap().push((auth, body));
            warp::reply::with_status(warp::reply::json(&reply), status)
        });

    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    (addr, captured)
}

fn client_for(addr: SocketAddr) -> OpenAIImageClient {
    OpenAIImageClient::new("dall-e-3".into(), "test-key".into())
        .with_api_base(&format!("http://{addr}/v1/"))
}

#[tokio::test]
async fn test_openai_happy_path() -> anyhow::Result<()> {
    let (addr, captured) = spawn_provider(
        StatusCode::OK,
        json!({"created": 1, "data": [{"url": "https://cdn.example/puppy.png"}]}),
    );

    let client = client_for(addr);
    let url = client
        .generate("a hot puppy", Duration::from_secs(5))
        .await?;
    assert_eq!(url, "https://cdn.example/puppy.png");

    let calls = captured.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (auth, body) = &calls[0];
    assert_eq!(auth.as_deref(), Some("Bearer test-key"));
    assert_eq!(body["model"], "dall-e-3");
    assert_eq!(body["prompt"], "a hot puppy");
    assert_eq!(body["n"], 1);
    assert_eq!(body["size"], "1024x1024");
    assert_eq!(body["quality"], "standard");
    Ok(())
}

#[tokio::test]
async fn test_openai_non_200_is_an_error() -> anyhow::Result<()> {
    let (addr, _) = spawn_provider(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"message": "rate limited"}}),
    );

    let err = client_for(addr)
        .generate("a hot puppy", Duration::from_secs(5))
        .await
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("429"), "unexpected error: {msg}");
    assert!(msg.contains("rate limited"));
    Ok(())
}

#[tokio::test]
async fn test_openai_other_2xx_is_an_error() -> anyhow::Result<()> {
    let (addr, _) = spawn_provider(
        StatusCode::ACCEPTED,
        json!({"data": [{"url": "https://cdn.example/queued.png"}]}),
    );

    let err = client_for(addr)
        .generate("a hot puppy", Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("202"), "unexpected error: {err}");
    Ok(())
}

#[tokio::test]
async fn test_openai_missing_url_is_an_error() -> anyhow::Result<()> {
    let (addr, _) = spawn_provider(StatusCode::OK, json!({"data": []}));

    let result = client_for(addr)
        .generate("a hot puppy", Duration::from_secs(5))
        .await;
    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn test_generator_falls_back_on_provider_error() -> anyhow::Result<()> {
    let (addr, captured) = spawn_provider(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": "boom"}),
    );

    let gen = ImageGenerator::new(Some(Arc::new(client_for(addr))));
    let out = gen
        .generate("a hot puppy", GenerationPurpose::Evolution, 4)
        .await;

    assert!(out.success);
    assert!(out.fallback);
    assert_eq!(out.image_url, placeholder_url(4));
    // one attempt, no retries
    assert_eq!(captured.lock().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_generator_falls_back_when_unreachable() {
    // Nothing listens on port 9 of the loopback interface.
    let client = OpenAIImageClient::new("dall-e-3".into(), "test-key".into())
        .with_api_base("http://127.0.0.1:9/v1");
    let gen = ImageGenerator::new(Some(Arc::new(client)));

    let out = gen.generate("a hot puppy", GenerationPurpose::Seed, 1).await;
    assert!(out.success && out.fallback);
    assert_eq!(out.image_url, placeholder_url(1));
}

#[tokio::test]
async fn test_generator_falls_back_on_slow_provider() -> anyhow::Result<()> {
    let route = warp::path!("v1" / "images" / "generations")
        .and(warp::post())
        .and_then(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Ok::<_, warp::Rejection>(warp::reply::json(
                &json!({"data": [{"url": "https://cdn.example/late.png"}]}),
            ))
        });
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    let gen = ImageGenerator::new(Some(Arc::new(client_for(addr))))
        .with_timeouts(Duration::from_millis(100), Duration::from_millis(100));
    let out = gen
        .generate("a hot puppy", GenerationPurpose::Evolution, 9)
        .await;

    assert!(out.fallback);
    assert_eq!(out.image_url, placeholder_url(9));
    Ok(())
}
