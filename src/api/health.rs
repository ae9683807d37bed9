//! Health check endpoints for Kubernetes liveness and readiness probes

use actix_web::{HttpResponse, Responder, get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::VerificationService;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ReadinessStatus {
    pub status: String,
    pub version: String,
    pub dependencies: DependencyHealth,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct DependencyHealth {
    /// `healthy`, `unhealthy` or `disabled`
    pub cache: String,
}

/// Liveness probe endpoint
///
/// Always returns 200 OK if the service is running.
/// Used by Kubernetes to determine if the pod should be restarted.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive", body = HealthStatus)
    ),
    tag = "health"
)]
#[get("/health/live")]
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness probe endpoint
///
/// The cache is optional, so an unreachable cache degrades the service
/// without taking it out of rotation.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessStatus)
    ),
    tag = "health"
)]
#[get("/health/ready")]
pub async fn readiness(service: web::Data<VerificationService>) -> impl Responder {
    let cache_status = match service.cache_healthy().await {
        Some(true) => "healthy",
        Some(false) => {
            tracing::warn!("Cache health check failed");
            "unhealthy"
        }
        None => "disabled",
    };

    let status = if cache_status == "unhealthy" {
        "degraded"
    } else {
        "ready"
    };

    HttpResponse::Ok().json(ReadinessStatus {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dependencies: DependencyHealth {
            cache: cache_status.to_string(),
        },
    })
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(liveness).service(readiness);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use actix_web::{App, test};

    use super::*;
    use crate::model::{PipelineConfig, SourceFilterConfig};
    use crate::service::testing::{StubFactCheck, StubOracle, StubSearch};
    use crate::service::{MemoryCacheStore, VerificationCache};

    fn service(cache: Option<VerificationCache>) -> web::Data<VerificationService> {
        web::Data::new(VerificationService::new(
            Arc::new(StubOracle::classifying("verified_fact", 0.9)),
            Arc::new(StubSearch::default()),
            Arc::new(StubFactCheck::default()),
            SourceFilterConfig::default(),
            PipelineConfig::default(),
            cache,
        ))
    }

    #[actix_web::test]
    async fn test_readiness_reports_disabled_cache() {
        let app = test::init_service(App::new().app_data(service(None)).configure(configure)).await;

        let req = test::TestRequest::get().uri("/health/ready").to_request();
        let body: ReadinessStatus = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.status, "ready");
        assert_eq!(body.dependencies.cache, "disabled");
    }

    #[actix_web::test]
    async fn test_readiness_reports_healthy_cache() {
        let cache = VerificationCache::new(Arc::new(MemoryCacheStore::new()), Duration::from_secs(60));
        let app =
            test::init_service(App::new().app_data(service(Some(cache))).configure(configure)).await;

        let req = test::TestRequest::get().uri("/health/ready").to_request();
        let body: ReadinessStatus = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.dependencies.cache, "healthy");
    }
}
