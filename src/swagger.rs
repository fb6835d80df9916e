use axum::Router;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use utoipa::{
	Modify, OpenApi,
	openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::controllers::{
	auth::AuthApiDoc, debug::DebugApiDoc, photos::PhotosApiDoc, search::SearchApiDoc, stream::StreamApiDoc,
};

#[derive(OpenApi)]
#[openapi(
	modifiers(&SecurityAddon),
	security(
		(),
		("bearer"=[])
	),
    info(
    	title="Restaurant Search API",
    	description = "Public API documentation for the restaurant search orchestrator."
    ),
    nest(
    	(path="/api/v1/auth", api=AuthApiDoc),
    	(path="/api/v1", api=SearchApiDoc),
    	(path="/api/v1", api=StreamApiDoc),
    	(path="/api/v1", api=PhotosApiDoc),
    	(path="/api/v1", api=DebugApiDoc)
    ),
    servers(
    	(url="http://localhost:3001", description="Local host server for development"),
    )
)]
#[allow(dead_code)]
struct ApiDoc;

#[allow(dead_code)]
pub struct SecurityAddon;

impl Modify for SecurityAddon {
	fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
		if let Some(components) = openapi.components.as_mut() {
			components.add_security_scheme(
                "bearer",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                	"session",
                 	"Either the signed session cookie or a Bearer JWT in the Authorization header."
                ))),
            )
		}
	}
}

/// Merges swagger with the current routes
#[allow(dead_code)]
pub fn merge_swagger(router: OpenApiRouter) -> Router {
	let doc = ApiDoc::openapi();
	let docs_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("docs");
	fs::create_dir_all(&docs_path).unwrap();
	let mut file = File::create(docs_path.join("openapi.json")).unwrap();
	file.write_all(doc.to_pretty_json().unwrap().as_bytes())
		.unwrap();
	let (router, api) = OpenApiRouter::with_openapi(doc)
		.merge(router)
		.split_for_parts();
	router.merge(SwaggerUi::new("/swagger").url("/docs/openapi.json", api.clone()))
}
