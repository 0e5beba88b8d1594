use super::Page;
use crate::error::HarvestError;

/// Internal conference id linked from a conference paper page.
///
/// Taken from the first anchor that is not the PDF link: its `href` is split on `/` and the
/// second non-empty segment is the id, so `/contrib/001` gives `001`.
pub fn internal_id(markup: &str, identifier: &str) -> Result<String, HarvestError> {
    if markup.trim().is_empty() {
        return Err(HarvestError::EmptyPaperPage {
            identifier: identifier.to_string(),
        });
    }
    let not_found = || HarvestError::ProceedingsLinkNotFound {
        identifier: identifier.to_string(),
    };
    let page = Page::parse(markup);
    let href = page
        .anchors()
        .into_iter()
        .find(|a| !a.mentions_pdf())
        .map(|a| a.href)
        .ok_or_else(not_found)?;
    href.split('/')
        .filter(|segment| !segment.is_empty())
        .nth(1)
        .map(str::to_string)
        .ok_or_else(not_found)
}

/// `base_proceedings_url` followed by the internal conference id, nothing else.
pub fn proceedings_url(base_proceedings_url: &str, internal_id: &str) -> String {
    format!("{base_proceedings_url}{internal_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "PoS(LATTICE 2013)001";

    #[test]
    fn second_segment_of_first_non_pdf_anchor() {
        let markup = r#"<a href="/999/pdf">pdf</a><a href="/contrib/001">details</a>"#;
        let id = internal_id(markup, ID).unwrap();
        assert_eq!(id, "001");
        assert_eq!(
            proceedings_url("https://pos.sissa.it/cgi-bin/reader/conf.cgi?confid=", &id),
            "https://pos.sissa.it/cgi-bin/reader/conf.cgi?confid=001"
        );
    }

    #[test]
    fn empty_page_is_reported_as_such() {
        assert!(matches!(
            internal_id("  \n", ID),
            Err(HarvestError::EmptyPaperPage { .. })
        ));
    }

    #[test]
    fn only_pdf_anchors_means_no_proceedings_link() {
        let markup = r#"<a href="/999/pdf">pdf</a>"#;
        assert!(matches!(
            internal_id(markup, ID),
            Err(HarvestError::ProceedingsLinkNotFound { .. })
        ));
    }

    #[test]
    fn href_without_second_segment_means_no_proceedings_link() {
        let markup = r#"<a href="/187">conference</a>"#;
        assert!(matches!(
            internal_id(markup, ID),
            Err(HarvestError::ProceedingsLinkNotFound { .. })
        ));
    }

    #[test]
    fn trailing_slash_does_not_make_a_second_segment() {
        let markup = r#"<a href="/999/pdf">pdf</a><a href="/187/">conference</a>"#;
        assert!(matches!(
            internal_id(markup, ID),
            Err(HarvestError::ProceedingsLinkNotFound { .. })
        ));
    }
}
