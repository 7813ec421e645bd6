use crate::app::AppContext;
use crate::handlers::{self, JsonReply};
use crate::session::COOKIE_NAME;
use futures::FutureExt;
use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

const MAX_FORM_BYTES: u64 = 16 * 1024;

fn with_ctx(
    ctx: Arc<AppContext>,
) -> impl Filter<Extract = (Arc<AppContext>,), Error = Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}

/// The whole HTTP surface. Every outcome, including rejections and handler
/// panics, leaves as a response.
pub fn routes(
    ctx: Arc<AppContext>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .and(with_ctx(ctx.clone()))
        .and(warp::cookie::optional(COOKIE_NAME))
        .then(|ctx: Arc<AppContext>, marker: Option<String>| {
            guarded("index", async move {
                match handlers::index(&ctx, marker.as_deref()).await {
                    Ok(page) => {
                        let html = warp::reply::html(page.html);
                        match page.set_cookie {
                            Some(c) => warp::reply::with_header(html, "set-cookie", c).into_response(),
                            None => html.into_response(),
                        }
                    }
                    Err(e) => handlers::internal_error("index", "Error loading home page", &e)
                        .into_response(),
                }
            })
        });

    let evolve = warp::path("evolve")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_ctx(ctx.clone()))
        .and(warp::body::content_length_limit(MAX_FORM_BYTES))
        .and(warp::body::form())
        .then(|ctx: Arc<AppContext>, form: HashMap<String, String>| {
            guarded("evolve", async move {
                handlers::evolve(&ctx, &form).await.into_response()
            })
        });

    let archive_page = warp::path("archive")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_ctx(ctx.clone()))
        .then(|ctx: Arc<AppContext>| {
            guarded("archive", async move {
                match handlers::archive_page(&ctx).await {
                    Ok(html) => warp::reply::html(html).into_response(),
                    Err(e) => handlers::internal_error("archive", "Error loading archive", &e)
                        .into_response(),
                }
            })
        });

    let api_current = warp::path!("api" / "current")
        .and(warp::get())
        .and(with_ctx(ctx.clone()))
        .then(|ctx: Arc<AppContext>| {
            guarded("api_current", async move { handlers::current(&ctx).await.into_response() })
        });

    let api_archive = warp::path!("api" / "archive")
        .and(warp::get())
        .and(with_ctx(ctx.clone()))
        .then(|ctx: Arc<AppContext>| {
            guarded("api_archive", async move { handlers::archive(&ctx).await.into_response() })
        });

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_ctx(ctx.clone()))
        .then(|ctx: Arc<AppContext>| {
            guarded("health", async move { handlers::health(&ctx).await.into_response() })
        });

    let assets = warp::path("static")
        .and(warp::get())
        .and(warp::fs::dir(ctx.cfg.static_dir.clone()))
        .map(|file: warp::fs::File| file.into_response());

    index
        .or(evolve)
        .unify()
        .or(archive_page)
        .unify()
        .or(api_current)
        .unify()
        .or(api_archive)
        .unify()
        .or(health)
        .unify()
        .or(assets)
        .unify()
        .recover(handle_rejection)
        .unify()
        .with(warp::trace::request())
}

/// Runs a handler, turning a panic into a logged 500 instead of a dropped
/// connection.
async fn guarded<F>(route: &'static str, fut: F) -> Response
where
    F: Future<Output = Response>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(resp) => resp,
        Err(panic) => {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(event = "handler_panic", route = route, error = %msg);
            JsonReply::error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                .into_response()
        }
    }
}

pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
    } else if err.find::<warp::body::BodyDeserializeError>().is_some()
        || err.find::<warp::reject::LengthRequired>().is_some()
        || err.find::<warp::reject::UnsupportedMediaType>().is_some()
    {
        (
            StatusCode::BAD_REQUEST,
            "Invalid form body: user_input is required",
        )
    } else {
        tracing::error!(event = "unhandled_rejection", rejection = ?err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    };

    Ok(JsonReply::error(status, message).into_response())
}
