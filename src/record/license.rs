use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct License {
    pub license: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Maps the free-text rights statement of a record to a license.
pub trait LicensePolicy: Send + Sync {
    fn match_license(&self, rights: &str) -> Option<License>;
}

/// Recognises Creative Commons licenses however the rights text spells them.
///
/// Handles `creativecommons.org` URLs, tokens like `CC-BY-NC-SA-3.0` or `CC BY 4.0`, and the
/// long form "Creative Commons Attribution-NonCommercial 4.0 International". Any other non-empty
/// text is kept verbatim without a URL.
#[derive(Debug, Default, Clone, Copy)]
pub struct CreativeCommons;

impl LicensePolicy for CreativeCommons {
    fn match_license(&self, rights: &str) -> Option<License> {
        let rights = rights.trim();
        if rights.is_empty() {
            return None;
        }
        let found = from_url(rights)
            .or_else(|| from_token(rights))
            .or_else(|| from_prose(rights));
        Some(match found {
            Some((elements, version)) => cc_license(&elements, &version),
            None => License {
                license: rights.to_string(),
                url: None,
            },
        })
    }
}

fn cc_license(elements: &[String], version: &str) -> License {
    let lower = elements
        .iter()
        .map(|e| e.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    let upper = elements
        .iter()
        .map(|e| e.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join("-");
    License {
        license: format!("CC-{upper}-{version}"),
        url: Some(format!(
            "https://creativecommons.org/licenses/{lower}/{version}/"
        )),
    }
}

fn from_url(rights: &str) -> Option<(Vec<String>, String)> {
    let url = Url::parse(rights).ok()?;
    if !url.host_str()?.ends_with("creativecommons.org") {
        return None;
    }
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    if segments.next()? != "licenses" {
        return None;
    }
    let elements = segments.next()?.split('-').map(str::to_string).collect();
    let version = segments.next()?.to_string();
    Some((elements, version))
}

fn from_token(rights: &str) -> Option<(Vec<String>, String)> {
    static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)\bCC[- ]((?:BY|NC|ND|SA)(?:[- ](?:BY|NC|ND|SA))*)[- ](\d\.\d)\b").unwrap()
    });
    let caps = TOKEN_RE.captures(rights)?;
    let elements = caps[1]
        .split(['-', ' '])
        .map(str::to_string)
        .collect();
    Some((elements, caps[2].to_string()))
}

fn from_prose(rights: &str) -> Option<(Vec<String>, String)> {
    static PROSE_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)creative\s+commons\s+attribution([-\w\s]*?)\s+(\d\.\d)").unwrap()
    });
    let caps = PROSE_RE.captures(rights)?;
    let terms = caps[1].to_ascii_lowercase();
    let mut elements = vec!["by".to_string()];
    if terms.contains("noncommercial") || terms.contains("non-commercial") {
        elements.push("nc".to_string());
    }
    if terms.contains("noderiv") {
        elements.push("nd".to_string());
    }
    if terms.contains("sharealike") || terms.contains("share-alike") || terms.contains("share alike") {
        elements.push("sa".to_string());
    }
    Some((elements, caps[2].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(rights: &str) -> Option<License> {
        CreativeCommons.match_license(rights)
    }

    #[test]
    fn spdx_like_token() {
        let l = matched("CC-BY-NC-SA-3.0").unwrap();
        assert_eq!(l.license, "CC-BY-NC-SA-3.0");
        assert_eq!(
            l.url.as_deref(),
            Some("https://creativecommons.org/licenses/by-nc-sa/3.0/")
        );
    }

    #[test]
    fn spaced_token() {
        assert_eq!(matched("cc by 4.0").unwrap().license, "CC-BY-4.0");
    }

    #[test]
    fn license_url() {
        let l = matched("https://creativecommons.org/licenses/by-nd/4.0/").unwrap();
        assert_eq!(l.license, "CC-BY-ND-4.0");
    }

    #[test]
    fn long_form() {
        let l = matched(
            "Creative Commons Attribution-NonCommercial-ShareAlike 4.0 International License",
        )
        .unwrap();
        assert_eq!(l.license, "CC-BY-NC-SA-4.0");
    }

    #[test]
    fn unknown_text_is_kept_verbatim() {
        let l = matched("  All rights reserved ").unwrap();
        assert_eq!(l.license, "All rights reserved");
        assert_eq!(l.url, None);
    }

    #[test]
    fn empty_rights_has_no_license() {
        assert_eq!(matched(" "), None);
    }
}
