//! Core router: generic CRUD routes for a content type
//!
//! `create_core_router` wires the five CRUD actions of a content type to the
//! document store. Each action runs its configured middlewares, in order,
//! before the core handler sees the query.

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::middleware::{run_chain, MiddlewareId, RequestContext};
use super::query::parse_query;
use super::store::DocumentStore;
use crate::error::ApiError;

/// CRUD actions of a content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Find,
    FindOne,
    Create,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Find,
        Action::FindOne,
        Action::Create,
        Action::Update,
        Action::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Find => "find",
            Action::FindOne => "findOne",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-action middleware lists; actions without an entry run none
#[derive(Debug, Clone, Default)]
pub struct RouterConfig {
    middlewares: IndexMap<Action, Vec<MiddlewareId>>,
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_middlewares(mut self, action: Action, middlewares: Vec<MiddlewareId>) -> Self {
        self.middlewares.insert(action, middlewares);
        self
    }

    pub fn middlewares(&self, action: Action) -> &[MiddlewareId] {
        self.middlewares
            .get(&action)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

struct RouteState {
    content_type: String,
    config: RouterConfig,
    store: Arc<DocumentStore>,
}

impl RouteState {
    /// Run the middleware chain, then the core handler
    fn dispatch(&self, ctx: RequestContext) -> Result<Response, ApiError> {
        let action = ctx.action;
        let ctx = run_chain(self.config.middlewares(action), ctx)?;
        tracing::debug!("{}.{} with query {:?}", self.content_type, action, ctx.query);
        core_handler(&self.store, ctx)
    }
}

/// Generic CRUD handler
fn core_handler(store: &DocumentStore, ctx: RequestContext) -> Result<Response, ApiError> {
    let id = || {
        ctx.id
            .as_deref()
            .ok_or_else(|| ApiError::BadRequest("Missing document id".to_string()))
    };

    let response = match ctx.action {
        Action::Find => Json(store.find(&ctx.query)?).into_response(),
        Action::FindOne => Json(store.find_one(id()?, &ctx.query)?).into_response(),
        Action::Create => (
            StatusCode::CREATED,
            Json(store.create(ctx.body.clone(), &ctx.query)?),
        )
            .into_response(),
        Action::Update => {
            Json(store.update(id()?, ctx.body.clone(), &ctx.query)?).into_response()
        }
        Action::Delete => {
            store.delete(id()?)?;
            StatusCode::NO_CONTENT.into_response()
        }
    };
    Ok(response)
}

/// Routes for `content_type` under `/api/<plural>`
pub fn create_core_router(
    content_type: &str,
    plural: &str,
    config: RouterConfig,
    store: Arc<DocumentStore>,
) -> Router {
    for action in Action::ALL {
        let middlewares = config.middlewares(action);
        if !middlewares.is_empty() {
            tracing::debug!(
                "{}.{} middlewares: {}",
                content_type,
                action,
                middlewares
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    let state = Arc::new(RouteState {
        content_type: content_type.to_string(),
        config,
        store,
    });

    Router::new()
        .route(&format!("/api/{}", plural), get(find).post(create))
        .route(
            &format!("/api/{}/:id", plural),
            get(find_one).put(update).delete(delete),
        )
        .with_state(state)
}

fn context(
    action: Action,
    id: Option<String>,
    raw_query: Option<String>,
    body: Option<&Bytes>,
) -> Result<RequestContext, ApiError> {
    let query = parse_query(raw_query.as_deref().unwrap_or(""))?;
    let body = match body {
        Some(bytes) if !bytes.is_empty() => Some(
            serde_json::from_slice::<Value>(bytes)
                .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?,
        ),
        _ => None,
    };

    let mut ctx = RequestContext::new(action, query);
    ctx.id = id;
    ctx.body = body;
    Ok(ctx)
}

async fn find(
    State(state): State<Arc<RouteState>>,
    RawQuery(raw): RawQuery,
) -> Result<Response, ApiError> {
    state.dispatch(context(Action::Find, None, raw, None)?)
}

async fn find_one(
    State(state): State<Arc<RouteState>>,
    Path(id): Path<String>,
    RawQuery(raw): RawQuery,
) -> Result<Response, ApiError> {
    state.dispatch(context(Action::FindOne, Some(id), raw, None)?)
}

async fn create(
    State(state): State<Arc<RouteState>>,
    RawQuery(raw): RawQuery,
    body: Bytes,
) -> Result<Response, ApiError> {
    state.dispatch(context(Action::Create, None, raw, Some(&body))?)
}

async fn update(
    State(state): State<Arc<RouteState>>,
    Path(id): Path<String>,
    RawQuery(raw): RawQuery,
    body: Bytes,
) -> Result<Response, ApiError> {
    state.dispatch(context(Action::Update, Some(id), raw, Some(&body))?)
}

async fn delete(
    State(state): State<Arc<RouteState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    state.dispatch(context(Action::Delete, Some(id), None, None)?)
}
