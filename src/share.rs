use thiserror::Error;

/// Share-action failures. All of these degrade to a notification; none
/// are fatal to the reader.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Article has no canonical URL to share")]
    NoCanonicalUrl,
    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),
    #[error("Failed to open browser: {0}")]
    BrowserFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePlatform {
    Twitter,
    LinkedIn,
    Telegram,
}

impl SharePlatform {
    pub fn label(self) -> &'static str {
        match self {
            SharePlatform::Twitter => "Twitter",
            SharePlatform::LinkedIn => "LinkedIn",
            SharePlatform::Telegram => "Telegram",
        }
    }
}

/// What gets shared: the article's canonical URL plus its title.
#[derive(Debug, Clone)]
pub struct ShareContext {
    pub url: String,
    pub title: String,
}

impl ShareContext {
    pub fn new(url: Option<&str>, title: &str) -> Result<Self, ShareError> {
        let url = url.ok_or(ShareError::NoCanonicalUrl)?;
        Ok(Self {
            url: url.to_string(),
            title: title.to_string(),
        })
    }
}

/// Build the platform's share URL with both components percent-encoded.
pub fn share_url(platform: SharePlatform, context: &ShareContext) -> String {
    let url = urlencoding::encode(&context.url);
    let title = urlencoding::encode(&context.title);
    match platform {
        SharePlatform::Twitter => {
            format!("https://twitter.com/intent/tweet?url={url}&text={title}")
        }
        SharePlatform::LinkedIn => {
            format!("https://www.linkedin.com/sharing/share-offsite/?url={url}")
        }
        SharePlatform::Telegram => {
            format!("https://t.me/share/url?url={url}&text={title}")
        }
    }
}

/// Open the platform's share page in the system browser.
pub fn open_share(platform: SharePlatform, context: &ShareContext) -> Result<(), ShareError> {
    let target = share_url(platform, context);
    open::that(&target).map_err(|e| ShareError::BrowserFailed(e.to_string()))
}

/// Copy the canonical link to the system clipboard.
pub fn copy_link(context: &ShareContext) -> Result<(), ShareError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| ShareError::ClipboardUnavailable(e.to_string()))?;
    clipboard
        .set_text(context.url.clone())
        .map_err(|e| ShareError::ClipboardUnavailable(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ShareContext {
        ShareContext {
            url: "https://example.com/trends?id=1&lang=en".to_string(),
            title: "AI Trends & Outlook 2026".to_string(),
        }
    }

    #[test]
    fn test_share_urls_are_percent_encoded() {
        let url = share_url(SharePlatform::Twitter, &context());
        assert!(url.starts_with("https://twitter.com/intent/tweet?url="));
        assert!(url.contains("https%3A%2F%2Fexample.com%2Ftrends%3Fid%3D1%26lang%3Den"));
        assert!(url.contains("AI%20Trends%20%26%20Outlook%202026"));
        assert!(!url.contains("?id=1&lang=en"));
    }

    #[test]
    fn test_linkedin_omits_title() {
        let url = share_url(SharePlatform::LinkedIn, &context());
        assert!(url.starts_with("https://www.linkedin.com/sharing/share-offsite/?url="));
        assert!(!url.contains("text="));
    }

    #[test]
    fn test_telegram_carries_both_components() {
        let url = share_url(SharePlatform::Telegram, &context());
        assert!(url.starts_with("https://t.me/share/url?url="));
        assert!(url.contains("&text="));
    }

    #[test]
    fn test_context_requires_canonical_url() {
        let missing = ShareContext::new(None, "Title");
        assert!(matches!(missing, Err(ShareError::NoCanonicalUrl)));

        let present = ShareContext::new(Some("https://example.com"), "Title").unwrap();
        assert_eq!(present.url, "https://example.com");
    }
}
