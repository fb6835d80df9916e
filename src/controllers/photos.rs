//! Photo proxy (spec §6 `/photos`). The provider API key is attached to the
//! outbound request inside `PlacesProvider::fetch_photo` and never reaches
//! the response body or a URL handed back to a client.

use axum::{
	Extension,
	extract::{Path, Query},
	http::header,
	response::{IntoResponse, Response},
	routing::get,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::controllers::AxumRouter;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PhotoQuery {
	#[serde(default = "default_max_width")]
	pub max_width_px: u32,
}

fn default_max_width() -> u32 {
	800
}

#[derive(OpenApi)]
#[openapi(paths(get_photo), tags((name = "Photos")))]
pub struct PhotosApiDoc;

/// `GET /api/v1/photos/places/:placeId/photos/:photoId?maxWidthPx=…` (spec §6).
#[utoipa::path(
	get,
	path = "/photos/places/{placeId}/photos/{photoId}",
	summary = "Proxy a place photo",
	params(
		("placeId" = String, Path),
		("photoId" = String, Path),
		("maxWidthPx" = Option<u32>, Query),
	),
	responses(
		(status = 200, description = "Photo bytes"),
		(status = 502, description = "Provider returned an error")
	),
	tag = "Photos"
)]
pub async fn get_photo(
	Extension(state): Extension<Arc<AppState>>,
	Path((place_id, photo_id)): Path<(String, String)>,
	Query(query): Query<PhotoQuery>,
) -> ApiResult<Response> {
	let photo_reference = format!("places/{place_id}/photos/{photo_id}");
	let (bytes, content_type) = state.provider.fetch_photo(&photo_reference, query.max_width_px).await?;

	Ok((
		[
			(header::CONTENT_TYPE, content_type),
			(header::CACHE_CONTROL, "public, max-age=86400".to_string()),
		],
		bytes,
	)
		.into_response())
}

pub fn photos_routes() -> AxumRouter {
	AxumRouter::new().route("/photos/places/{placeId}/photos/{photoId}", get(get_photo))
}
