//! Per-client-IP token bucket throttle.
//!
//! Mounted on `/auth/login` to slow down password guessing:
//!
//! ```ignore
//! Router::new()
//!     .route("/login", post(login).layer(RateLimitLayer::new(config.login_throttle)))
//! ```

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{HeaderValue, Request, Response};
use axum::response::IntoResponse;
use futures::future::BoxFuture;
use tokio::sync::RwLock;
use tower::{Layer, Service};

use crate::config::LoginThrottle;
use crate::error::AppError;

/// Tracked clients above which idle buckets are pruned on the next check.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: u32,
    last_refill: Instant,
}

impl TokenBucket {
    fn full(capacity: u32) -> Self {
        Self {
            tokens: capacity,
            last_refill: Instant::now(),
        }
    }

    /// Refill for the elapsed time, then take one token if any is left.
    fn try_take(&mut self, capacity: u32, window: Duration) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill);

        if elapsed >= window {
            self.tokens = capacity;
            self.last_refill = now;
        } else {
            let per_sec = f64::from(capacity) / window.as_secs_f64();
            let earned = (elapsed.as_secs_f64() * per_sec) as u32;
            if earned > 0 {
                self.tokens = self.tokens.saturating_add(earned).min(capacity);
                self.last_refill = now;
            }
        }

        if self.tokens == 0 {
            return false;
        }
        self.tokens -= 1;
        true
    }
}

/// Shared bucket table. Clones share the same state.
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<RwLock<HashMap<IpAddr, TokenBucket>>>,
    throttle: LoginThrottle,
}

impl RateLimiter {
    pub fn new(throttle: LoginThrottle) -> Self {
        Self {
            buckets: Arc::new(RwLock::new(HashMap::new())),
            throttle,
        }
    }

    fn window(&self) -> Duration {
        Duration::from_secs(self.throttle.window_secs)
    }

    /// Whether `ip` may make another attempt right now.
    pub async fn check(&self, ip: IpAddr) -> bool {
        let window = self.window();
        let capacity = self.throttle.attempts;
        let mut buckets = self.buckets.write().await;

        if buckets.len() > PRUNE_THRESHOLD {
            let now = Instant::now();
            buckets.retain(|_, bucket| now.duration_since(bucket.last_refill) < window);
        }

        buckets
            .entry(ip)
            .or_insert_with(|| TokenBucket::full(capacity))
            .try_take(capacity, window)
    }

    /// Number of clients currently tracked.
    pub async fn tracked(&self) -> usize {
        self.buckets.read().await.len()
    }
}

/// Tower layer wrapping a route in a [`RateLimiter`].
#[derive(Clone)]
pub struct RateLimitLayer {
    limiter: RateLimiter,
}

impl RateLimitLayer {
    pub fn new(throttle: LoginThrottle) -> Self {
        Self {
            limiter: RateLimiter::new(throttle),
        }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            limiter: self.limiter.clone(),
        }
    }
}

#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    limiter: RateLimiter,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let limiter = self.limiter.clone();
        let clone = self.inner.clone();
        // The instance that was polled ready handles this request.
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let ip = client_ip(&req);
            if !limiter.check(ip).await {
                tracing::warn!(%ip, path = %req.uri().path(), "Rate limit exceeded");
                return Ok(too_many_requests(limiter.throttle.window_secs));
            }
            inner.call(req).await
        })
    }
}

/// Resolve the caller's address.
///
/// Order: first `X-Forwarded-For` hop, `X-Real-IP`, the socket peer, then
/// loopback when none is available (e.g. in-process test requests).
fn client_ip<B>(req: &Request<B>) -> IpAddr {
    let header_ip = |name: &str, first_hop: bool| -> Option<IpAddr> {
        let value = req.headers().get(name)?.to_str().ok()?;
        let candidate = if first_hop {
            value.split(',').next()?
        } else {
            value
        };
        candidate.trim().parse().ok()
    };

    header_ip("x-forwarded-for", true)
        .or_else(|| header_ip("x-real-ip", false))
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip())
        })
        .unwrap_or(IpAddr::from([127, 0, 0, 1]))
}

fn too_many_requests(retry_after_secs: u64) -> Response<Body> {
    let mut response = AppError::TooManyRequests.into_response();
    if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
        response.headers_mut().insert("retry-after", value);
    }
    response
}
