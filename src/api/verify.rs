//! Verification endpoints

use actix_web::{HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::{QuickVerifyResult, VerificationResult, VerifyRequest};
use crate::service::VerificationService;

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuickVerifyRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClearCacheResponse {
    /// Number of cached verifications removed
    pub removed: usize,
}

/// Run the full verification pipeline on a piece of text
///
/// Decomposes the text, extracts check-worthy claims, gathers evidence,
/// classifies every claim and aggregates an overall verdict.
#[utoipa::path(
    post,
    path = "/api/v1/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verification completed", body = VerificationResult),
        (status = 400, description = "Empty or oversized input", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    tag = "verification"
)]
#[post("/api/v1/verify")]
pub async fn verify(
    service: web::Data<VerificationService>,
    request: web::Json<VerifyRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    tracing::info!(
        text_len = request.text.len(),
        skip_cache = request.skip_cache,
        "Received verification request"
    );

    let result = service.verify(&request).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// Classify text against published fact-checks only
///
/// Skips decomposition, claim extraction and web search.
#[utoipa::path(
    post,
    path = "/api/v1/verify/quick",
    request_body = QuickVerifyRequest,
    responses(
        (status = 200, description = "Quick verdict", body = QuickVerifyResult),
        (status = 400, description = "Empty or oversized input", body = ErrorResponse)
    ),
    tag = "verification"
)]
#[post("/api/v1/verify/quick")]
pub async fn quick_verify(
    service: web::Data<VerificationService>,
    request: web::Json<QuickVerifyRequest>,
) -> Result<HttpResponse, ApiError> {
    let result = service.quick_verify(&request.text).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// Remove every cached verification result
#[utoipa::path(
    delete,
    path = "/api/v1/cache",
    responses(
        (status = 200, description = "Cache cleared", body = ClearCacheResponse),
        (status = 503, description = "Cache backend unavailable", body = ErrorResponse)
    ),
    tag = "cache"
)]
#[delete("/api/v1/cache")]
pub async fn clear_cache(
    service: web::Data<VerificationService>,
) -> Result<HttpResponse, ApiError> {
    let removed = service.clear_cache().await?;
    tracing::info!(removed, "Verification cache cleared");
    Ok(HttpResponse::Ok().json(ClearCacheResponse { removed }))
}

/// Configure verification routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(verify)
        .service(quick_verify)
        .service(clear_cache);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};

    use super::*;
    use crate::model::{PipelineConfig, SourceFilterConfig, VerdictCategory};
    use crate::service::testing::{StubFactCheck, StubOracle, StubSearch, fact_check};
    use crate::service::{MemoryCacheStore, VerificationCache};

    fn service(
        oracle: StubOracle,
        fact_checks: StubFactCheck,
        cache: Option<VerificationCache>,
    ) -> web::Data<VerificationService> {
        web::Data::new(VerificationService::new(
            Arc::new(oracle),
            Arc::new(StubSearch::default()),
            Arc::new(fact_checks),
            SourceFilterConfig::default(),
            PipelineConfig::default(),
            cache,
        ))
    }

    #[actix_web::test]
    async fn test_verify_rejects_empty_text() {
        let data = service(
            StubOracle::classifying("verified_fact", 0.9),
            StubFactCheck::default(),
            None,
        );
        let app = test::init_service(App::new().app_data(data).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/verify")
            .set_json(json!({ "text": "   " }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "bad_request");
    }

    #[actix_web::test]
    async fn test_quick_verify_returns_fact_check_verdict() {
        let data = service(
            StubOracle::classifying("disputed", 0.6),
            StubFactCheck::with_records(vec![fact_check("PolitiFact", "False")]),
            None,
        );
        let app = test::init_service(App::new().app_data(data).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/verify/quick")
            .set_json(json!({ "text": "The moon is made of cheese" }))
            .to_request();
        let body: QuickVerifyResult = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.category, VerdictCategory::LikelyFalse);
        assert_eq!(body.confidence, 75);
    }

    #[actix_web::test]
    async fn test_clear_cache_without_cache_removes_nothing() {
        let data = service(
            StubOracle::classifying("verified_fact", 0.9),
            StubFactCheck::default(),
            None,
        );
        let app = test::init_service(App::new().app_data(data).configure(configure)).await;

        let req = test::TestRequest::delete().uri("/api/v1/cache").to_request();
        let body: ClearCacheResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.removed, 0);
    }

    #[actix_web::test]
    async fn test_clear_cache_counts_removed_entries() {
        let cache = VerificationCache::new(
            Arc::new(MemoryCacheStore::new()),
            std::time::Duration::from_secs(60),
        );
        let data = service(
            StubOracle::classifying("verified_fact", 0.9)
                .with_claims(&[("Water boils at 100C at sea level", "factual", 0.9)]),
            StubFactCheck::default(),
            Some(cache),
        );
        let app = test::init_service(App::new().app_data(data).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/verify")
            .set_json(json!({ "text": "Water boils at 100C at sea level." }))
            .to_request();
        let result: VerificationResult = test::call_and_read_body_json(&app, req).await;
        assert!(!result.partial);

        let req = test::TestRequest::delete().uri("/api/v1/cache").to_request();
        let body: ClearCacheResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.removed, 1);
    }
}
