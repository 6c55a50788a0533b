use axum::extract::Path;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use axum_extra::extract::Query;

use super::Result;

use crate::{
    placeholder::{PlaceholderOptions, parse_dimensions, render_svg},
    state::AppState,
};

/// `GET /placeholder/{*dimensions}`：按尺寸生成 SVG 占位图
pub fn setup_route() -> Router<AppState> {
    Router::new().route("/placeholder/{*dimensions}", get(placeholder))
}

async fn placeholder(
    Path(dimensions): Path<String>,
    Query(options): Query<PlaceholderOptions>,
) -> Result<impl IntoResponse> {
    let segments: Vec<&str> = dimensions.split('/').collect();
    let dims = parse_dimensions(&segments)?;
    let svg = render_svg(dims, &options)?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=31536000, immutable"),
        ],
        svg,
    ))
}
