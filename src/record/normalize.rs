//! Builders turning source metadata and fetched pages into output records.
//!
//! Nothing here touches the network; every function takes what it needs and returns either a
//! record or the reason it could not build one.

use once_cell::sync::Lazy;
use scraper::Selector;

use super::date::PublicationDate;
use super::journal::JournalReference;
use super::license::LicensePolicy;
use super::{
    Affiliation, AttachedFile, Author, ConferencePaperRecord, ExternalSystemNumber,
    ProceedingsRecord,
};
use crate::error::HarvestError;
use crate::page::{Page, own_text};
use crate::source::{Creator, SourceRecord};

pub const CONFERENCE_PAPER_COLLECTION: &str = "conferencepaper";
pub const PROCEEDINGS_COLLECTION: &str = "proceeding";
pub const EXTERNAL_INSTITUTE: &str = "pos";

static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static CONFERENCE_DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[class="conference_date"]"#).unwrap());

/// Where the paper record's links come from.
#[derive(Debug, Clone, Copy)]
pub struct PaperLinks<'a> {
    pub page_url: &'a str,
    pub pdf_url: &'a str,
}

pub fn conference_paper(
    record: &SourceRecord,
    links: PaperLinks<'_>,
    default_language: &str,
    licenses: &dyn LicensePolicy,
) -> Result<ConferencePaperRecord, HarvestError> {
    let journal = JournalReference::parse(&record.identifier)?;
    let date = PublicationDate::parse(record.date.as_deref().unwrap_or_default())?;

    Ok(ConferencePaperRecord {
        title: record.title.clone(),
        authors: authors(&record.creators),
        date_published: date.iso,
        journal_year: date.year,
        journal_title: journal.title,
        journal_volume: journal.volume,
        journal_artid: journal.artid,
        license: record
            .rights
            .as_deref()
            .and_then(|r| licenses.match_license(r)),
        language: language(record.language.as_deref(), default_language),
        source: record.publisher.clone(),
        external_system_numbers: vec![ExternalSystemNumber {
            institute: EXTERNAL_INSTITUTE.to_string(),
            value: record.identifier.clone(),
        }],
        collections: vec![CONFERENCE_PAPER_COLLECTION.to_string()],
        urls: vec![links.page_url.to_string()],
        attached_files: vec![AttachedFile {
            path: links.pdf_url.to_string(),
        }],
    })
}

/// Proceedings record from the proceedings page of the conference `identifier` belongs to.
pub fn proceedings(
    markup: &str,
    identifier: &str,
    venue_name: &str,
) -> Result<ProceedingsRecord, HarvestError> {
    let journal = JournalReference::parse(identifier)?;
    let page = Page::parse(markup);
    Ok(ProceedingsRecord {
        collections: vec![PROCEEDINGS_COLLECTION.to_string()],
        title: proceedings_title(&page),
        subtitle: proceedings_subtitle(&page),
        journal_title: venue_name.to_string(),
        journal_volume: journal.volume,
    })
}

/// First non-blank text directly inside a top-level heading.
pub fn proceedings_title(page: &Page) -> Option<String> {
    page.select_all(&HEADING)
        .flat_map(own_text)
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(str::to_string)
}

/// Date and place of the conference, the text nodes of the date block glued together as-is.
pub fn proceedings_subtitle(page: &Page) -> String {
    page.select_all(&CONFERENCE_DATE).flat_map(own_text).collect()
}

/// Creators in feed order; a creator with neither name nor affiliation is dropped.
pub fn authors(creators: &[Creator]) -> Vec<Author> {
    creators
        .iter()
        .filter(|c| !c.is_empty())
        .map(|c| Author {
            raw_name: c.raw_name.clone(),
            affiliations: c
                .affiliations
                .iter()
                .map(|value| Affiliation {
                    value: value.clone(),
                })
                .collect(),
        })
        .collect()
}

/// The language code, unless it is the default one.
pub fn language(code: Option<&str>, default_language: &str) -> Option<String> {
    code.filter(|c| *c != default_language).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::license::CreativeCommons;

    fn sample_record() -> SourceRecord {
        SourceRecord {
            identifier: "JHEP01(2016)001".into(),
            title: Some("A title".into()),
            creators: vec![
                Creator {
                    raw_name: "Doe, J.".into(),
                    affiliations: vec!["CERN".into(), "DESY".into()],
                },
                Creator::default(),
                Creator {
                    raw_name: String::new(),
                    affiliations: vec!["Nowhere".into()],
                },
            ],
            date: Some("2016-03-04".into()),
            language: Some("fr".into()),
            rights: Some("CC-BY-4.0".into()),
            publisher: Some("SISSA".into()),
        }
    }

    const LINKS: PaperLinks<'static> = PaperLinks {
        page_url: "https://pos.sissa.it/contribution?id=JHEP01(2016)001",
        pdf_url: "https://pos.sissa.it/999/pdf",
    };

    #[test]
    fn builds_conference_paper() {
        let rec = conference_paper(&sample_record(), LINKS, "en", &CreativeCommons).unwrap();
        assert_eq!(rec.journal_title, "JHEP01");
        assert_eq!(rec.journal_volume, "2016");
        assert_eq!(rec.journal_artid, "001");
        assert_eq!(rec.date_published, "2016-03-04");
        assert_eq!(rec.journal_year, 2016);
        assert_eq!(rec.language.as_deref(), Some("fr"));
        assert_eq!(rec.source.as_deref(), Some("SISSA"));
        assert_eq!(rec.license.unwrap().license, "CC-BY-4.0");
        assert_eq!(rec.collections, vec!["conferencepaper"]);
        assert_eq!(rec.urls, vec![LINKS.page_url]);
        assert_eq!(rec.attached_files[0].path, LINKS.pdf_url);
        assert_eq!(rec.external_system_numbers[0].institute, "pos");
        assert_eq!(rec.external_system_numbers[0].value, "JHEP01(2016)001");
    }

    #[test]
    fn drops_only_empty_authors() {
        let got = authors(&sample_record().creators);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].raw_name, "Doe, J.");
        assert_eq!(
            got[0].affiliations,
            vec![
                Affiliation { value: "CERN".into() },
                Affiliation { value: "DESY".into() }
            ]
        );
        assert_eq!(got[1].raw_name, "");
        assert_eq!(got[1].affiliations.len(), 1);
    }

    #[test]
    fn bad_date_stops_the_paper_record() {
        let mut rec = sample_record();
        rec.date = Some("sometime".into());
        assert!(matches!(
            conference_paper(&rec, LINKS, "en", &CreativeCommons),
            Err(HarvestError::DateParse { .. })
        ));
        rec.date = None;
        assert!(matches!(
            conference_paper(&rec, LINKS, "en", &CreativeCommons),
            Err(HarvestError::DateParse { .. })
        ));
    }

    #[test]
    fn language_is_absent_only_for_default() {
        assert_eq!(language(Some("en"), "en"), None);
        assert_eq!(language(Some("fr"), "en").as_deref(), Some("fr"));
        proptest::proptest!(|(code in "[a-z]{2}")| {
            let got = language(Some(&code), "en");
            proptest::prop_assert_eq!(got.is_none(), code == "en");
        })
    }

    #[test]
    fn builds_proceedings_from_page() {
        let markup = r#"<html><body>
            <h1>The 31st International Symposium on Lattice Field Theory<small>LATTICE 2013</small></h1>
            <div class="conference_date">29 July - 3 August, 2013<br/>Mainz, Germany</div>
            </body></html>"#;
        let rec = proceedings(markup, "PoS(LATTICE 2013)001", "PoS").unwrap();
        assert_eq!(rec.collections, vec!["proceeding"]);
        assert_eq!(
            rec.title.as_deref(),
            Some("The 31st International Symposium on Lattice Field Theory")
        );
        assert_eq!(rec.subtitle, "29 July - 3 August, 2013Mainz, Germany");
        assert_eq!(rec.journal_title, "PoS");
        assert_eq!(rec.journal_volume, "LATTICE 2013");
    }

    #[test]
    fn proceedings_page_without_heading_or_date() {
        let rec = proceedings("<p>nothing</p>", "PoS(X)1", "PoS").unwrap();
        assert_eq!(rec.title, None);
        assert_eq!(rec.subtitle, "");
    }
}
