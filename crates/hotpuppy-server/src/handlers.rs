use crate::app::AppContext;
use crate::config::SERVICE_NAME;
use crate::templates;
use serde_json::{json, Value};
use std::collections::HashMap;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Reply;

/// A JSON body with its status code.
#[derive(Debug)]
pub struct JsonReply {
    pub status: StatusCode,
    pub body: Value,
}

impl JsonReply {
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn error(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            body: json!({ "success": false, "error": message }),
        }
    }
}

impl Reply for JsonReply {
    fn into_response(self) -> Response {
        warp::reply::with_status(warp::reply::json(&self.body), self.status).into_response()
    }
}

/// Logs the full error chain and answers with a generic 500.
pub fn internal_error(route: &str, public_message: &str, err: &anyhow::Error) -> JsonReply {
    tracing::error!(event = "handler_error", route = route, error = %format!("{err:#}"));
    JsonReply::error(StatusCode::INTERNAL_SERVER_ERROR, public_message)
}

pub struct IndexPage {
    pub html: String,
    /// Present when the visitor has no valid marker yet.
    pub set_cookie: Option<String>,
}

pub async fn index(ctx: &AppContext, session_cookie: Option<&str>) -> anyhow::Result<IndexPage> {
    let (current, total) = ctx
        .store()
        .blocking(|s| Ok((s.latest()?, s.count()?)))
        .await?;
    match &current {
        Some(img) => tracing::debug!(event = "index", current_id = img.id),
        None => tracing::warn!(event = "index", "no current image found"),
    }

    let returning = ctx.session.is_visited(session_cookie);
    Ok(IndexPage {
        html: templates::render_index(current.as_ref(), total, !returning),
        set_cookie: (!returning).then(|| ctx.session.set_cookie_header()),
    })
}

pub async fn evolve(ctx: &AppContext, form: &HashMap<String, String>) -> JsonReply {
    let raw = form.get("user_input").map(String::as_str).unwrap_or("");
    tracing::info!(event = "evolve_request", user_input = %raw);

    match ctx.chain.evolve(raw).await {
        Ok(evo) => {
            tracing::info!(
                event = "evolve_saved",
                image_id = evo.image_id,
                parent_id = evo.parent_id,
                fallback = evo.fallback
            );
            JsonReply::ok(json!({
                "success": true,
                "image_id": evo.image_id,
                "image_url": evo.image_url,
                "user_input": evo.user_input,
                "fallback": evo.fallback,
            }))
        }
        Err(e) => {
            let status = StatusCode::from_u16(e.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let message = e.to_string();
            let code = e.code();
            if status.is_server_error() {
                let err = anyhow::Error::new(e);
                tracing::error!(event = "evolve_store_error", code = code, error = %format!("{err:#}"));
            } else {
                tracing::warn!(event = "evolve_rejected", code = code, reason = %message);
            }
            JsonReply::error(status, &message)
        }
    }
}

pub async fn archive_page(ctx: &AppContext) -> anyhow::Result<String> {
    let images = ctx.store().blocking(|s| s.all()).await?;
    tracing::debug!(event = "archive_page", images = images.len());
    Ok(templates::render_archive(&images))
}

pub async fn current(ctx: &AppContext) -> JsonReply {
    match ctx.store().blocking(|s| s.latest()).await {
        Ok(Some(img)) => match serde_json::to_value(&img) {
            Ok(v) => JsonReply::ok(v),
            Err(e) => internal_error("api_current", "Failed to load current image", &anyhow::Error::from(e)),
        },
        Ok(None) => JsonReply::ok(json!({ "error": "No images found" })),
        Err(e) => internal_error("api_current", "Failed to load current image", &e),
    }
}

pub async fn archive(ctx: &AppContext) -> JsonReply {
    match ctx.store().blocking(|s| s.all()).await {
        Ok(images) => {
            let total = images.len();
            JsonReply::ok(json!({ "images": images, "total": total }))
        }
        Err(e) => internal_error("api_archive", "Failed to load archive", &e),
    }
}

/// Liveness probe. A failing store is reported, never raised.
pub async fn health(ctx: &AppContext) -> JsonReply {
    match ctx.store().blocking(|s| s.count()).await {
        Ok(count) => {
            tracing::debug!(event = "health_check", total_evolutions = count);
            JsonReply::ok(json!({
                "status": "healthy",
                "service": SERVICE_NAME,
                "total_evolutions": count,
                "debug_mode": ctx.cfg.debug,
            }))
        }
        Err(e) => {
            tracing::error!(event = "health_check_failed", error = %format!("{e:#}"));
            JsonReply::ok(json!({
                "status": "unhealthy",
                "service": SERVICE_NAME,
                "error": e.to_string(),
            }))
        }
    }
}
