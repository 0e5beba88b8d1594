//! Structural queries over fetched HTML pages.
//!
//! Extractors never walk the DOM themselves; they ask a [`Page`] for the first or all nodes
//! matching a CSS pattern and work with the plain strings that come back.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

pub mod paper;
pub mod proceedings;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// An `<a>` element reduced to what the extractors look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    /// All text below the anchor, concatenated.
    pub text: String,
}

impl Anchor {
    pub fn mentions_pdf(&self) -> bool {
        self.text.contains("pdf")
    }
}

pub struct Page {
    html: Html,
}

impl Page {
    pub fn parse(markup: &str) -> Self {
        Page {
            html: Html::parse_document(markup),
        }
    }

    pub fn select_all<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html.select(selector)
    }

    pub fn select_first<'a>(&'a self, selector: &'a Selector) -> Option<ElementRef<'a>> {
        self.html.select(selector).next()
    }

    /// Every anchor carrying an `href`, in document order.
    pub fn anchors(&self) -> Vec<Anchor> {
        self.select_all(&ANCHOR)
            .filter_map(|a| {
                let href = a.value().attr("href")?;
                Some(Anchor {
                    href: href.to_string(),
                    text: a.text().collect(),
                })
            })
            .collect()
    }
}

/// Text nodes that are direct children of `element`, skipping nested markup.
pub fn own_text(element: ElementRef<'_>) -> Vec<&str> {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_keep_document_order_and_skip_missing_href() {
        let page = Page::parse(
            r#"<html><body>
                <a name="top">no href</a>
                <a href="/999/pdf"><b>p</b>df</a>
                <a href="/contrib/001">details</a>
            </body></html>"#,
        );
        let anchors = page.anchors();
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[0].href, "/999/pdf");
        assert_eq!(anchors[0].text, "pdf");
        assert!(anchors[0].mentions_pdf());
        assert!(!anchors[1].mentions_pdf());
    }

    #[test]
    fn own_text_ignores_nested_elements() {
        let page = Page::parse("<div id='x'>a<span>b</span>c</div>");
        let sel = Selector::parse("#x").unwrap();
        let div = page.select_first(&sel).unwrap();
        assert_eq!(own_text(div), vec!["a", "c"]);
    }
}
