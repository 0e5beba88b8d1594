use serde::Serialize;

pub mod date;
pub mod journal;
pub mod license;
pub mod normalize;

pub use license::License;

/// Output record for one conference contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConferencePaperRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub authors: Vec<Author>,
    pub date_published: String,
    pub journal_year: i32,
    pub journal_title: String,
    pub journal_volume: String,
    pub journal_artid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    /// `None` stands for the default language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub external_system_numbers: Vec<ExternalSystemNumber>,
    pub collections: Vec<String>,
    pub urls: Vec<String>,
    pub attached_files: Vec<AttachedFile>,
}

/// Output record for the proceedings volume a contribution belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProceedingsRecord {
    pub collections: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub subtitle: String,
    pub journal_title: String,
    pub journal_volume: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub raw_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub affiliations: Vec<Affiliation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Affiliation {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalSystemNumber {
    pub institute: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachedFile {
    pub path: String,
}

/// Anything a chain hands to the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HarvestedRecord {
    ConferencePaper(ConferencePaperRecord),
    Proceedings(ProceedingsRecord),
}

impl HarvestedRecord {
    pub fn kind(&self) -> &'static str {
        match self {
            HarvestedRecord::ConferencePaper(_) => "conference paper",
            HarvestedRecord::Proceedings(_) => "proceedings",
        }
    }
}
