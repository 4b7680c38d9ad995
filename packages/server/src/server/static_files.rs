use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

// Embed the plain-text pages (robots.txt, humans.txt) at compile time
#[derive(RustEmbed)]
#[folder = "assets/text"]
pub struct TextAssets;

/// Serve a root-level text file such as /robots.txt
///
/// Only names ending in .txt are served; anything else is a 404 so this
/// can sit behind the static routes as the last match at the root.
pub async fn send_text_file(Path(filename): Path<String>) -> Response {
    if !filename.ends_with(".txt") || filename.len() == ".txt".len() {
        return (StatusCode::NOT_FOUND, "404 Not Found").into_response();
    }

    match TextAssets::get(&filename) {
        Some(content) => {
            let mime = mime_guess::from_path(&filename).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}
