use actix_web::{
    Error, HttpMessage, ResponseError,
    body::{EitherBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use uuid::Uuid;

use crate::{
    api::{access, context, csrf},
    app_state::AppState,
    errors::AppError,
};

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id per request, stored in extensions and echoed as `X-Request-Id`.
#[derive(Clone, Debug)]
pub struct RequestIdValue(pub String);

/// Middleware adding a trace/request id
pub struct RequestId;

impl<S, B> Transform<S, ServiceRequest> for RequestId
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestIdMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestIdMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let id = Uuid::new_v4().to_string();
        req.extensions_mut().insert(RequestIdValue(id.clone()));
        log::debug!("request_id={} {} {}", id, req.method(), req.path());
        let fut = self.service.call(req);
        Box::pin(async move {
            let mut resp = fut.await?;
            if let Ok(value) = HeaderValue::from_str(&id) {
                resp.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            Ok(resp)
        })
    }
}

/// Role and CSRF gate in front of every route.
///
/// Looks up the role required by [`access::required_role`], checks the CSRF token on
/// state-changing requests, resolves the caller and rejects with 403 before the handler
/// runs. The resolved [`context::Principal`] is stored in request extensions.
pub struct AccessGate;

impl<S, B> Transform<S, ServiceRequest> for AccessGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessGateMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AccessGateMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AccessGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
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
        match authorize(&req) {
            Ok(principal) => {
                if let Some(principal) = principal {
                    req.extensions_mut().insert(principal);
                }
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Err(err) => {
                let response = req.into_response(err.error_response());
                Box::pin(async move { Ok(response.map_into_right_body()) })
            }
        }
    }
}

fn authorize(req: &ServiceRequest) -> Result<Option<context::Principal>, AppError> {
    // The router matches the decoded path, so `/%61pi/...` must be gated like `/api/...`.
    let routed_path = req.match_info().as_str();
    let Some(required) = access::required_role(req.method(), routed_path) else {
        return Ok(None);
    };

    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        log::error!("AppState is not registered; denying {}", req.path());
        AppError::Internal
    })?;

    if access::is_state_changing(req.method()) {
        csrf::verify(req.request())?;
    }

    let principal = context::resolve_principal(req.request(), &state.config).ok_or_else(|| {
        log::warn!("Anonymous request to {} {} denied", req.method(), req.path());
        AppError::access_denied()
    })?;

    if !principal.has_role(required) {
        log::warn!(
            "{} lacks {:?} for {} {}",
            principal.email,
            required,
            req.method(),
            req.path()
        );
        return Err(AppError::access_denied());
    }

    Ok(Some(principal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    use crate::{config::Config, repositories::Repositories};

    fn state() -> web::Data<AppState> {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: None,
            auto_create_schema: None,
            jwt_secret: "secret".to_string(),
            jwt_expiry_hours: None,
            admin_emails: None,
            max_body_bytes: None,
        };
        web::Data::new(AppState::new(config, Repositories::in_memory()))
    }

    #[test]
    fn encoded_api_paths_are_not_public() {
        let req = TestRequest::get()
            .uri("/%61pi/articles/all")
            .app_data(state())
            .to_srv_request();

        assert!(matches!(authorize(&req), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn paths_outside_the_api_pass_without_a_session() {
        let req = TestRequest::get()
            .uri("/swagger-ui/index.html")
            .app_data(state())
            .to_srv_request();

        assert!(matches!(authorize(&req), Ok(None)));
    }
}
