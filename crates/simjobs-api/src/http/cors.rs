//! Cross-origin request policy.

use axum::http::HeaderValue;
use simjobs_config::CorsConfig;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

use crate::error::InterfaceError;

/// Build the CORS layer.
///
/// `["*"]` allows any origin, method and header. An explicit origin list
/// mirrors the requested method and headers, which is what credentialed
/// requests require.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, InterfaceError> {
    if config.allows_any_origin() {
        if config.allow_credentials {
            return Err(InterfaceError::InvalidCors(
                "credentials cannot be allowed for any origin".to_string(),
            ));
        }
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    if config.allowed_origins.is_empty() {
        return Err(InterfaceError::InvalidCors(
            "no allowed origins configured".to_string(),
        ));
    }

    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| InterfaceError::InvalidCors(format!("invalid origin: {}", origin)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.allow_credentials))
}
