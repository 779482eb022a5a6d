//! Route middleware chain
//!
//! A middleware receives the request context and a [`Next`] handle. The only
//! way to produce the [`Proceed`] value it must return is `next.run(ctx)`,
//! and `Next` is consumed by that call, so every middleware hands off to the
//! next stage exactly once.

use serde_json::Value;
use std::fmt;

use super::populate::PopulateArticle;
use super::query::Query;
use super::router::Action;
use crate::error::ApiError;

/// Per-request state passed through the chain to the core handler
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub action: Action,
    /// Document id from the path, for single-document actions
    pub id: Option<String>,
    pub query: Query,
    /// Parsed JSON body, for `create` and `update`
    pub body: Option<Value>,
}

impl RequestContext {
    pub fn new(action: Action, query: Query) -> Self {
        Self {
            action,
            id: None,
            query,
            body: None,
        }
    }
}

/// Continuation to the next stage of the chain
pub struct Next {
    _private: (),
}

impl Next {
    fn new() -> Self {
        Self { _private: () }
    }

    /// Hand the (possibly modified) context to the next stage
    pub fn run(self, ctx: RequestContext) -> Proceed {
        Proceed(ctx)
    }
}

/// Proof that a middleware continued the chain
pub struct Proceed(RequestContext);

pub trait Middleware: Send + Sync {
    fn name(&self) -> &'static str;

    fn handle(&self, ctx: RequestContext, next: Next) -> Result<Proceed, ApiError>;
}

/// Registered middlewares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MiddlewareId {
    PopulateArticle,
}

impl MiddlewareId {
    pub fn resolve(self) -> &'static dyn Middleware {
        match self {
            MiddlewareId::PopulateArticle => &PopulateArticle,
        }
    }
}

impl fmt::Display for MiddlewareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resolve().name())
    }
}

/// Run registered middlewares in order
pub fn run_chain(chain: &[MiddlewareId], ctx: RequestContext) -> Result<RequestContext, ApiError> {
    let middlewares: Vec<&dyn Middleware> = chain.iter().map(|id| id.resolve()).collect();
    run_middlewares(&middlewares, ctx)
}

/// Run middlewares in order; the first error stops the chain unchanged
pub fn run_middlewares(
    middlewares: &[&dyn Middleware],
    mut ctx: RequestContext,
) -> Result<RequestContext, ApiError> {
    for middleware in middlewares {
        tracing::debug!("Running middleware {}", middleware.name());
        let Proceed(next_ctx) = middleware.handle(ctx, Next::new())?;
        ctx = next_ctx;
    }
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Tag(&'static str);

    impl Middleware for Tag {
        fn name(&self) -> &'static str {
            self.0
        }

        fn handle(&self, mut ctx: RequestContext, next: Next) -> Result<Proceed, ApiError> {
            let seen = ctx
                .query
                .entry("seen")
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = seen {
                items.push(json!(self.0));
            }
            Ok(next.run(ctx))
        }
    }

    struct Reject;

    impl Middleware for Reject {
        fn name(&self) -> &'static str {
            "reject"
        }

        fn handle(&self, _ctx: RequestContext, _next: Next) -> Result<Proceed, ApiError> {
            Err(ApiError::BadRequest("rejected".to_string()))
        }
    }

    struct Counter(AtomicUsize);

    impl Middleware for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        fn handle(&self, ctx: RequestContext, next: Next) -> Result<Proceed, ApiError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(next.run(ctx))
        }
    }

    #[test]
    fn test_middlewares_run_in_order() {
        let ctx = RequestContext::new(Action::Find, Query::new());
        let ctx = run_middlewares(&[&Tag("first"), &Tag("second")], ctx).unwrap();
        assert_eq!(ctx.query["seen"], json!(["first", "second"]));
    }

    #[test]
    fn test_each_middleware_runs_once_per_request() {
        let counter = Counter(AtomicUsize::new(0));
        for _ in 0..3 {
            let ctx = RequestContext::new(Action::FindOne, Query::new());
            run_middlewares(&[&counter], ctx).unwrap();
        }
        assert_eq!(counter.0.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_error_stops_chain() {
        let counter = Counter(AtomicUsize::new(0));
        let ctx = RequestContext::new(Action::Find, Query::new());
        let err = run_middlewares(&[&Reject, &counter], ctx).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_registry_resolves_populate() {
        assert_eq!(
            MiddlewareId::PopulateArticle.to_string(),
            "api::article.populate-article"
        );

        let mut query = Query::new();
        query.insert("sort".to_string(), json!("title"));
        let ctx = run_chain(
            &[MiddlewareId::PopulateArticle],
            RequestContext::new(Action::Find, query),
        )
        .unwrap();
        assert_eq!(ctx.query["sort"], "title");
        assert!(ctx.query["populate"].get("cover").is_some());
        assert!(ctx.query["populate"]["blocks"]["on"]
            .get("shared.rich-text")
            .is_some());
    }
}
