use crate::error::HarvestError;

pub mod oai;

/// One contribution as delivered by the metadata feed, before its identifier is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    /// The record element exactly as it appeared in the feed.
    pub markup: String,
    pub identifier: Option<String>,
    pub title: Option<String>,
    pub creators: Vec<Creator>,
    pub date: Option<String>,
    pub language: Option<String>,
    pub rights: Option<String>,
    pub publisher: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    /// Contribution identifier such as `PoS(LATTICE 2013)001`.
    pub identifier: String,
    pub title: Option<String>,
    pub creators: Vec<Creator>,
    pub date: Option<String>,
    pub language: Option<String>,
    pub rights: Option<String>,
    pub publisher: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Creator {
    pub raw_name: String,
    pub affiliations: Vec<String>,
}

impl Creator {
    pub fn is_empty(&self) -> bool {
        self.raw_name.is_empty() && self.affiliations.is_empty()
    }
}

impl Envelope {
    /// Split into the typed record and the raw markup it came from.
    pub fn into_record(self) -> Result<(SourceRecord, String), HarvestError> {
        let identifier = self
            .identifier
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(HarvestError::MissingIdentifier)?;
        let record = SourceRecord {
            identifier,
            title: self.title,
            creators: self.creators,
            date: self.date,
            language: self.language,
            rights: self.rights,
            publisher: self.publisher,
        };
        Ok((record, self.markup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_identifier_is_missing() {
        let env = Envelope {
            identifier: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(
            env.into_record(),
            Err(HarvestError::MissingIdentifier)
        ));
    }

    #[test]
    fn identifier_is_trimmed() {
        let env = Envelope {
            markup: "<record/>".into(),
            identifier: Some(" PoS(ICHEP2016)001\n".into()),
            ..Default::default()
        };
        let (record, markup) = env.into_record().unwrap();
        assert_eq!(record.identifier, "PoS(ICHEP2016)001");
        assert_eq!(markup, "<record/>");
    }
}
