//! Embed-URL derivation for project video pitches.
//!
//! Projects are submitted with a plain watch-page URL. We store the player
//! URL alongside it so the front end can drop the value straight into an
//! iframe. Only YouTube and Vimeo are recognized; anything else is a hard
//! validation failure and the project is not saved.

use lazy_static::lazy_static;
use regex::Regex;

use super::errors::CatalogError;

lazy_static! {
    static ref YOUTUBE_ID: Regex =
        Regex::new(r"(?:v=|youtu\.be/|/embed/|/shorts/)([A-Za-z0-9_-]{6,})").unwrap();
    static ref VIMEO_ID: Regex = Regex::new(r"vimeo\.com/(?:video/)?(\d+)").unwrap();
}

/// Derive the iframe player URL for a submitted video URL.
pub fn embed_url(video_url: &str) -> Result<String, CatalogError> {
    if video_url.contains("youtube") || video_url.contains("youtu.be") {
        let id = YOUTUBE_ID
            .captures(video_url)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| CatalogError::MalformedVideoUrl(video_url.to_string()))?;
        Ok(format!("https://www.youtube.com/embed/{}", id.as_str()))
    } else if video_url.contains("vimeo") {
        let id = VIMEO_ID
            .captures(video_url)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| CatalogError::MalformedVideoUrl(video_url.to_string()))?;
        Ok(format!(
            "https://player.vimeo.com/video/{}?byline=0&portrait=0&title=0",
            id.as_str()
        ))
    } else {
        Err(CatalogError::UnsupportedVideoHost(video_url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_watch_url() {
        let embed = embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
        assert_eq!(embed, "https://www.youtube.com/embed/dQw4w9WgXcQ");
    }

    #[test]
    fn test_youtube_watch_url_with_extra_params() {
        let embed = embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s").unwrap();
        assert_eq!(embed, "https://www.youtube.com/embed/dQw4w9WgXcQ");
    }

    #[test]
    fn test_youtube_short_link() {
        let embed = embed_url("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(embed, "https://www.youtube.com/embed/dQw4w9WgXcQ");
    }

    #[test]
    fn test_vimeo_url() {
        let embed = embed_url("https://vimeo.com/148751763").unwrap();
        assert_eq!(
            embed,
            "https://player.vimeo.com/video/148751763?byline=0&portrait=0&title=0"
        );
    }

    #[test]
    fn test_vimeo_video_path() {
        let embed = embed_url("https://vimeo.com/video/148751763").unwrap();
        assert_eq!(
            embed,
            "https://player.vimeo.com/video/148751763?byline=0&portrait=0&title=0"
        );
    }

    #[test]
    fn test_other_host_is_rejected() {
        let err = embed_url("https://www.dailymotion.com/video/x2hwqn9").unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedVideoHost(_)));
    }

    #[test]
    fn test_youtube_url_without_id_is_rejected() {
        let err = embed_url("https://www.youtube.com/").unwrap_err();
        assert!(matches!(err, CatalogError::MalformedVideoUrl(_)));
    }
}
