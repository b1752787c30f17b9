//! Rate limiting middleware for form submissions.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::{Method, StatusCode, header::ContentType},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use blog_core::ports::RateLimiter;

use crate::templates;

/// Rate limiting middleware factory. Only POST requests count; without a
/// limiter every request passes through.
pub struct RateLimitMiddleware {
    limiter: Option<Arc<dyn RateLimiter>>,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Option<Arc<dyn RateLimiter>>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Option<Arc<dyn RateLimiter>>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        let limiter = match &self.limiter {
            Some(limiter) if req.method() == Method::POST => limiter.clone(),
            _ => {
                return Box::pin(async move { Ok(service.call(req).await?.map_into_left_body()) });
            }
        };

        // Forwarded headers are client-controlled; only the socket peer counts.
        let key = req
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        Box::pin(async move {
            match limiter.check(&key).await {
                Ok(result) if !result.allowed => {
                    tracing::warn!("Rate limit exceeded for key: {}", key);

                    // Round up so clients never retry early.
                    let retry_after = result.reset_after.as_secs()
                        + u64::from(result.reset_after.subsec_nanos() > 0);
                    let retry_after = retry_after.max(1);

                    let page = templates::error::page(
                        StatusCode::TOO_MANY_REQUESTS,
                        &format!("Too many submissions. Try again in {} seconds.", retry_after),
                    );
                    let response = HttpResponse::TooManyRequests()
                        .insert_header(("Retry-After", retry_after.to_string()))
                        .content_type(ContentType::html())
                        .body(page.into_string());

                    let (http_req, _payload) = req.into_parts();
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
                other => {
                    // Fail open on limiter errors.
                    if let Err(e) = other {
                        tracing::error!("Rate limiter error, failing open: {}", e);
                    }
                    Ok(service.call(req).await?.map_into_left_body())
                }
            }
        })
    }
}

#[cfg(all(test, feature = "rate-limit"))]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};
    use blog_infra::{InMemoryRateLimiter, RateLimitConfig};
    use std::time::Duration;

    fn limiter(max_requests: u32) -> Option<Arc<dyn RateLimiter>> {
        Some(Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
            max_requests,
            window: Duration::from_secs(60),
        })))
    }

    #[actix_web::test]
    async fn limits_posts_but_not_gets() {
        let app = test::init_service(
            App::new().wrap(RateLimitMiddleware::new(limiter(1))).route(
                "/",
                web::route().to(|| async { HttpResponse::Ok().finish() }),
            ),
        )
        .await;

        let first = test::call_service(&app, test::TestRequest::post().uri("/").to_request()).await;
        assert!(first.status().is_success());

        let second =
            test::call_service(&app, test::TestRequest::post().uri("/").to_request()).await;
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry_after: u64 = second
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap();
        assert!((1..=60).contains(&retry_after));

        let get = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(get.status().is_success());
    }

    #[actix_web::test]
    async fn forwarded_headers_do_not_reset_the_limit() {
        let app = test::init_service(
            App::new().wrap(RateLimitMiddleware::new(limiter(1))).route(
                "/",
                web::route().to(|| async { HttpResponse::Ok().finish() }),
            ),
        )
        .await;
        let peer: std::net::SocketAddr = "10.0.0.9:40000".parse().unwrap();

        let mut allowed = 0;
        for i in 0..5 {
            let req = test::TestRequest::post()
                .uri("/")
                .peer_addr(peer)
                .insert_header(("X-Forwarded-For", format!("1.2.3.{i}")))
                .to_request();
            if test::call_service(&app, req).await.status().is_success() {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 1);

        let other_peer = test::TestRequest::post()
            .uri("/")
            .peer_addr("10.0.0.10:40000".parse().unwrap())
            .to_request();
        assert!(test::call_service(&app, other_peer).await.status().is_success());
    }
}
