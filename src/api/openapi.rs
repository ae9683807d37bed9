//! OpenAPI specification endpoints

use actix_web::{HttpResponse, Responder, get};
use utoipa::OpenApi;

use crate::api::error::ErrorResponse;
use crate::api::health::{self, DependencyHealth, HealthStatus, ReadinessStatus};
use crate::api::verify::{self, ClearCacheResponse, QuickVerifyRequest};
use crate::model::{
    Claim, ClaimComponent, ClaimType, ClaimVerdict, ClassificationResult, ComponentType,
    Decomposition, DecompositionSummary, FactCheckRecord, GuardrailRule, QuickVerifyResult,
    Source, SourceType, VerdictCategory, VerificationResult, VerifyRequest,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Epistemic Verdict API",
        description = "Claim decomposition, evidence-grounded classification and verdict aggregation"
    ),
    paths(
        verify::verify,
        verify::quick_verify,
        verify::clear_cache,
        health::liveness,
        health::readiness
    ),
    components(schemas(
        VerifyRequest,
        QuickVerifyRequest,
        VerificationResult,
        QuickVerifyResult,
        ClaimVerdict,
        Claim,
        ClaimType,
        ClaimComponent,
        ComponentType,
        Decomposition,
        DecompositionSummary,
        ClassificationResult,
        VerdictCategory,
        GuardrailRule,
        Source,
        SourceType,
        FactCheckRecord,
        ClearCacheResponse,
        ErrorResponse,
        HealthStatus,
        ReadinessStatus,
        DependencyHealth
    )),
    tags(
        (name = "verification", description = "Claim verification"),
        (name = "cache", description = "Result cache administration"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> impl Responder {
    match ApiDoc::openapi().to_yaml() {
        Ok(yaml) => HttpResponse::Ok().content_type("text/yaml").body(yaml),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render OpenAPI YAML");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
