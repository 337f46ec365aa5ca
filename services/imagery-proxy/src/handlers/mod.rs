//! HTTP request handlers.

pub mod health;
pub mod pipeline;
pub mod satellite;
pub mod terrain;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use crate::upstream::UpstreamImage;

/// Rendered tiles for a scene never change.
const IMAGE_CACHE_CONTROL: &str = "public, max-age=31536000";

pub(crate) fn image_response(image: UpstreamImage) -> Response {
    (
        [(header::CONTENT_TYPE, image.content_type)],
        [(header::CACHE_CONTROL, IMAGE_CACHE_CONTROL)],
        image.bytes,
    )
        .into_response()
}
