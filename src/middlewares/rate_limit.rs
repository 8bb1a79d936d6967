/*!
 * 速率限制中间件
 *
 * 固定窗口计数：每个限制键在窗口开始后的 `window_secs` 秒内最多放行 `max_requests` 次。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .route(web::post().to(login))
 *     .wrap(RateLimit::login())
 * ```
 *
 * 已认证请求按账号计数，未认证请求按客户端 IP 计数。
 * 放行的响应带 `X-RateLimit-Limit` / `X-RateLimit-Remaining`，拒绝时返回 429 与 `Retry-After`。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{HeaderName, HeaderValue, RETRY_AFTER},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, auth::AuthAccount};

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// 限制键 -> 当前窗口；长时间无访问的键自动淘汰
static WINDOWS: Lazy<Cache<String, Arc<Mutex<Window>>>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug, PartialEq)]
enum Decision {
    Allow { remaining: u32 },
    Deny { retry_after: u64 },
}

impl Window {
    fn new(now: Instant) -> Self {
        Self {
            started: now,
            count: 0,
        }
    }

    fn hit(&mut self, now: Instant, max_requests: u32, window: Duration) -> Decision {
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed >= window {
            self.started = now;
            self.count = 0;
        }

        if self.count >= max_requests {
            let left = window.saturating_sub(now.saturating_duration_since(self.started));
            // 向上取整，至少 1 秒
            let retry_after = left.as_secs() + u64::from(left.subsec_nanos() > 0);
            return Decision::Deny {
                retry_after: retry_after.max(1),
            };
        }

        self.count += 1;
        Decision::Allow {
            remaining: max_requests - self.count,
        }
    }
}

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    /// 区分不同端点的计数
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录：5次/分钟
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 注册：3次/分钟
    pub fn register() -> Self {
        Self::new(3, 60).with_prefix("register")
    }

    /// 忘记密码与重置密码：3次/分钟
    pub fn forgot_password() -> Self {
        Self::new(3, 60).with_prefix("forgot_password")
    }

    /// 通用 API：100次/分钟
    pub fn api() -> Self {
        Self::new(100, 60).with_prefix("api")
    }
}

/// 客户端 IP
///
/// 优先使用连接信息；部署在反向代理后时依赖 X-Forwarded-For / X-Real-IP，
/// 直接暴露在不可信网络中时这些头可被伪造。
fn client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(str::to_string);
    if let Some(ip) = connection_ip.as_deref().filter(|ip| is_ip(ip)) {
        return ip.to_string();
    }

    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next());
    let real_ip = req
        .headers()
        .get("X-Real-IP")
        .and_then(|v| v.to_str().ok());

    forwarded
        .into_iter()
        .chain(real_ip)
        .map(str::trim)
        .find(|ip| is_ip(ip))
        .map(str::to_string)
        .or(connection_ip)
        .unwrap_or_else(|| "unknown".to_string())
}

fn is_ip(s: &str) -> bool {
    s.trim().parse::<IpAddr>().is_ok()
}

fn limit_key(prefix: &str, req: &ServiceRequest) -> String {
    // 先释放扩展的借用，connection_info 需要可变借用
    let account_id = req.extensions().get::<AuthAccount>().map(|a| a.id);
    let identifier = match account_id {
        Some(id) => format!("account:{id}"),
        None => format!("ip:{}", client_ip(req)),
    };

    if prefix.is_empty() {
        identifier
    } else {
        format!("{prefix}:{identifier}")
    }
}

fn too_many_requests(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((RETRY_AFTER, retry_after.to_string()))
        .insert_header((REMAINING_HEADER, "0"))
        .json(ApiResponse::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            config: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    config: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let config = self.config.clone();

        Box::pin(async move {
            let key = limit_key(&config.key_prefix, &req);
            let window = WINDOWS
                .get_with(key.clone(), async {
                    Arc::new(Mutex::new(Window::new(Instant::now())))
                })
                .await;

            let decision = {
                let mut window = window.lock().unwrap_or_else(|p| p.into_inner());
                window.hit(
                    Instant::now(),
                    config.max_requests,
                    Duration::from_secs(config.window_secs),
                )
            };

            match decision {
                Decision::Deny { retry_after } => {
                    warn!(
                        "Rate limit exceeded for {} ({} per {}s)",
                        key, config.max_requests, config.window_secs
                    );
                    Ok(req.into_response(too_many_requests(retry_after).map_into_right_body()))
                }
                Decision::Allow { remaining } => {
                    let mut res = srv.call(req).await?;
                    let headers = res.headers_mut();
                    headers.insert(
                        HeaderName::from_static(LIMIT_HEADER),
                        HeaderValue::from(config.max_requests),
                    );
                    headers.insert(
                        HeaderName::from_static(REMAINING_HEADER),
                        HeaderValue::from(remaining),
                    );
                    Ok(res.map_into_left_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key_prefix, "login");

        let register = RateLimit::register();
        assert_eq!(register.max_requests, 3);

        let forgot = RateLimit::forgot_password();
        assert_eq!(forgot.max_requests, 3);
        assert_eq!(forgot.key_prefix, "forgot_password");

        assert_eq!(RateLimit::api().max_requests, 100);
    }

    #[test]
    fn test_window_counts_and_resets() {
        let start = Instant::now();
        let window = Duration::from_secs(60);
        let mut w = Window::new(start);

        assert_eq!(w.hit(start, 2, window), Decision::Allow { remaining: 1 });
        assert_eq!(w.hit(start, 2, window), Decision::Allow { remaining: 0 });
        assert_eq!(
            w.hit(start + Duration::from_secs(15), 2, window),
            Decision::Deny { retry_after: 45 }
        );

        // 窗口结束后重新计数
        assert_eq!(
            w.hit(start + Duration::from_secs(60), 2, window),
            Decision::Allow { remaining: 1 }
        );
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let start = Instant::now();
        let mut w = Window::new(start);
        w.hit(start, 1, Duration::from_secs(10));

        let decision = w.hit(
            start + Duration::from_millis(9_500),
            1,
            Duration::from_secs(10),
        );
        assert_eq!(decision, Decision::Deny { retry_after: 1 });
    }

    #[actix_web::test]
    async fn test_blocks_after_limit() {
        use actix_web::{App, test, web};

        let app = test::init_service(
            App::new().service(
                web::resource("/ping")
                    .route(web::get().to(|| async { HttpResponse::Ok().finish() }))
                    .wrap(RateLimit::new(2, 60).with_prefix("test_blocks")),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/ping").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert_eq!(resp.headers().get("x-ratelimit-remaining").unwrap(), "1");

        let req = test::TestRequest::get().uri("/ping").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::get().uri("/ping").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key(RETRY_AFTER));
    }
}
