use anyhow::{Context, Result};

use crate::options::StudyOption;

/// Open a URL in the user's default browser
///
/// # Errors
/// Returns error if browser cannot be opened (e.g., no browser available)
pub fn open_url(url: &str) -> Result<()> {
    webbrowser::open(url)
        .with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}

/// The option's website with a scheme, or None when it has none on record
pub fn website_url(option: &StudyOption) -> Option<String> {
    let site = option.website.trim();
    if site.is_empty() {
        None
    } else if site.starts_with("http://") || site.starts_with("https://") {
        Some(site.to_string())
    } else {
        Some(format!("https://{}", site))
    }
}
