//! Source platform detection.

use crate::types::SourceType;

/// Where a recipe URL points. Video platforms get the transcript flow;
/// everything else is treated as a web page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    YouTube,
    TikTok,
    Instagram,
    Web,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::TikTok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Web => "web",
        }
    }

    /// Video platforms go through the transcript flow.
    pub fn is_video(&self) -> bool {
        !matches!(self, Platform::Web)
    }

    pub fn source_type(&self) -> SourceType {
        if self.is_video() {
            SourceType::Video
        } else {
            SourceType::Webpage
        }
    }
}

/// Pluggable platform detection, swappable in tests.
pub trait PlatformDetector: Send + Sync {
    fn detect(&self, url: &str) -> Platform;
}

/// Default detector: classify by hostname.
///
/// Matching is on the parsed host, not a substring of the whole URL, so a
/// query string mentioning a platform can't misroute extraction.
#[derive(Debug, Default)]
pub struct HostPlatformDetector;

impl PlatformDetector for HostPlatformDetector {
    fn detect(&self, url: &str) -> Platform {
        let Some(host) = get_host(url) else {
            return Platform::Web;
        };

        if host == "youtu.be" || host_matches(&host, "youtube.com") {
            Platform::YouTube
        } else if host_matches(&host, "tiktok.com") {
            Platform::TikTok
        } else if host_matches(&host, "instagram.com") {
            Platform::Instagram
        } else {
            Platform::Web
        }
    }
}

/// Extract the host from a URL, lowercased.
fn get_host(url: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

/// True when `host` is `domain` or a subdomain of it.
fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(url: &str) -> Platform {
        HostPlatformDetector.detect(url)
    }

    #[test]
    fn test_youtube_forms() {
        assert_eq!(
            detect("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Platform::YouTube
        );
        assert_eq!(detect("https://youtube.com/shorts/abc123"), Platform::YouTube);
        assert_eq!(detect("https://youtu.be/dQw4w9WgXcQ"), Platform::YouTube);
        assert_eq!(detect("https://m.youtube.com/watch?v=x"), Platform::YouTube);
    }

    #[test]
    fn test_tiktok_forms() {
        assert_eq!(
            detect("https://www.tiktok.com/@chef/video/7012345"),
            Platform::TikTok
        );
        assert_eq!(detect("https://vm.tiktok.com/ZMabcdef/"), Platform::TikTok);
    }

    #[test]
    fn test_instagram_forms() {
        assert_eq!(
            detect("https://www.instagram.com/reel/Cabcdef/"),
            Platform::Instagram
        );
        assert_eq!(
            detect("https://instagram.com/p/Cabcdef/"),
            Platform::Instagram
        );
    }

    #[test]
    fn test_everything_else_is_web() {
        assert_eq!(detect("https://smittenkitchen.com/recipe"), Platform::Web);
        assert_eq!(detect("https://example.com/?v=youtube.com"), Platform::Web);
        // Lookalike domains don't count as subdomains.
        assert_eq!(detect("https://notyoutube.com/watch"), Platform::Web);
        assert_eq!(detect("not a url"), Platform::Web);
    }

    #[test]
    fn test_source_type() {
        assert_eq!(Platform::YouTube.source_type(), SourceType::Video);
        assert_eq!(Platform::Web.source_type(), SourceType::Webpage);
    }
}
