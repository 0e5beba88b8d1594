use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::HarvestError;

/// The three parts of a contribution identifier such as `PoS(LATTICE 2013)001`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalReference {
    pub title: String,
    pub volume: String,
    pub artid: String,
}

impl JournalReference {
    /// Split `identifier` on parentheses. Anything other than exactly three parts is rejected.
    pub fn parse(identifier: &str) -> Result<Self, HarvestError> {
        static PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[()]").unwrap());

        let parts: Vec<&str> = PARENS.split(identifier).collect();
        match parts.as_slice() {
            [title, volume, artid] => Ok(JournalReference {
                title: title.to_string(),
                volume: volume.to_string(),
                artid: artid.to_string(),
            }),
            _ => Err(HarvestError::MalformedIdentifier {
                identifier: identifier.to_string(),
                parts: parts.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_title_volume_artid() {
        let r = JournalReference::parse("JHEP01(2016)001").unwrap();
        assert_eq!(r.title, "JHEP01");
        assert_eq!(r.volume, "2016");
        assert_eq!(r.artid, "001");
    }

    #[test]
    fn volume_may_contain_spaces() {
        let r = JournalReference::parse("PoS(LATTICE 2013)001").unwrap();
        assert_eq!(r.title, "PoS");
        assert_eq!(r.volume, "LATTICE 2013");
        assert_eq!(r.artid, "001");
    }

    #[test]
    fn rejects_identifiers_without_volume() {
        let err = JournalReference::parse("PoS-001").unwrap_err();
        assert!(matches!(err, HarvestError::MalformedIdentifier { parts: 1, .. }));
    }

    #[test]
    fn rejects_nested_parentheses() {
        let err = JournalReference::parse("PoS(EPS-HEP(2017))001").unwrap_err();
        assert!(matches!(err, HarvestError::MalformedIdentifier { parts: 5, .. }));
    }

    #[test]
    fn well_formed_identifiers_roundtrip() {
        proptest::proptest!(|(t in "[A-Za-z0-9 ]{0,12}", v in "[A-Za-z0-9 ._-]{0,16}", a in "[0-9]{0,4}")| {
            let id = format!("{t}({v}){a}");
            let r = JournalReference::parse(&id).expect("three parts");
            proptest::prop_assert_eq!(r.title, t);
            proptest::prop_assert_eq!(r.volume, v);
            proptest::prop_assert_eq!(r.artid, a);
        })
    }
}
