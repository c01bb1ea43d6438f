use url::Url;

use crate::error::{AppError, AppResult};

/// Hosts that serve embeddable YouTube videos
const ACCEPTED_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtu.be",
];

/// Checks that `link` is an http(s) URL pointing at a video on an accepted YouTube host
///
/// Fails with [`AppError::Validation`] otherwise.
pub fn validate_youtube_link(link: &str) -> AppResult<()> {
    let invalid = || AppError::Validation(format!("'{}' is not a YouTube link", link));

    let url = Url::parse(link.trim()).map_err(|_| invalid())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }

    let host = url.host_str().ok_or_else(invalid)?.to_ascii_lowercase();
    if !ACCEPTED_HOSTS.contains(&host.as_str()) {
        return Err(invalid());
    }

    // A bare domain is not a video
    if url.path() == "/" && url.query().is_none() {
        return Err(invalid());
    }

    Ok(())
}

/// Rejects blank recommendation names
pub fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation(
            "Recommendation name must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_watch_links() {
        assert!(validate_youtube_link("https://youtube.com/watch?v=1").is_ok());
        assert!(validate_youtube_link("https://www.youtube.com/watch?v=chwyjJbcs1Y").is_ok());
        assert!(validate_youtube_link("http://m.youtube.com/watch?v=abc").is_ok());
    }

    #[test]
    fn test_accepts_short_links_and_mixed_case_host() {
        assert!(validate_youtube_link("https://youtu.be/chwyjJbcs1Y").is_ok());
        assert!(validate_youtube_link("https://WWW.YouTube.com/watch?v=1").is_ok());
    }

    #[test]
    fn test_rejects_other_hosts() {
        let err = validate_youtube_link("https://google.com").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(validate_youtube_link("https://youtube.com.evil.net/watch?v=1").is_err());
        assert!(validate_youtube_link("https://notyoutube.com/watch?v=1").is_err());
    }

    #[test]
    fn test_rejects_non_http_schemes() {
        assert!(validate_youtube_link("ftp://youtube.com/watch?v=1").is_err());
        assert!(validate_youtube_link("javascript://youtube.com/%0Aalert(1)").is_err());
    }

    #[test]
    fn test_rejects_malformed_and_bare_domain() {
        assert!(validate_youtube_link("").is_err());
        assert!(validate_youtube_link("youtube.com/watch?v=1").is_err());
        assert!(validate_youtube_link("https://youtube.com").is_err());
        assert!(validate_youtube_link("https://youtube.com/").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Falamansa - Xote dos Milagres").is_ok());
        assert!(matches!(
            validate_name("   ").unwrap_err(),
            AppError::Validation(_)
        ));
    }
}
