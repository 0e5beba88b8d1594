use url::Url;

use super::Page;
use crate::error::HarvestError;

/// Absolute URL of the full-text PDF linked from a conference paper page.
///
/// The first anchor whose text mentions `pdf` wins; its `href` is joined onto `base_url` the
/// way a browser would resolve it.
pub fn pdf_url(page: &Page, base_url: &str, page_url: &str) -> Result<String, HarvestError> {
    let href = page
        .anchors()
        .into_iter()
        .find(|a| a.mentions_pdf())
        .map(|a| a.href)
        .ok_or_else(|| HarvestError::PdfLinkNotFound {
            url: page_url.to_string(),
        })?;
    absolutise(base_url, &href)
}

fn absolutise(base_url: &str, href: &str) -> Result<String, HarvestError> {
    let base = Url::parse(base_url).map_err(|source| HarvestError::InvalidUrl {
        url: base_url.to_string(),
        source,
    })?;
    base.join(href)
        .map(|u| u.to_string())
        .map_err(|source| HarvestError::InvalidUrl {
            url: href.to_string(),
            source,
        })
}
