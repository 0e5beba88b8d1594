//! Decoder for OAI-PMH feeds carrying `pex-dc` metadata.
//!
//! Namespace prefixes are ignored throughout: `dc:title`, `pex:title` and `title` are the same
//! field. Every `record` element becomes one [`Envelope`]; records without metadata still produce
//! an envelope so the caller can report them.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::Event;

use super::{Creator, Envelope};
use crate::error::HarvestError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Identifier,
    Title,
    Date,
    Language,
    Rights,
    Publisher,
}

impl Field {
    fn from_local(name: &[u8]) -> Option<Self> {
        match name {
            b"identifier" => Some(Field::Identifier),
            b"title" => Some(Field::Title),
            b"date" => Some(Field::Date),
            b"language" => Some(Field::Language),
            b"rights" => Some(Field::Rights),
            b"publisher" => Some(Field::Publisher),
            _ => None,
        }
    }
}

fn local(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

fn is_local(name: &[u8], target: &str) -> bool {
    local(name).eq_ignore_ascii_case(target.as_bytes())
}

fn non_empty(text: &str) -> Option<String> {
    let t = text.trim();
    (!t.is_empty()).then(|| t.to_string())
}

/// Decode every `record` element in `xml`.
pub fn decode(xml: &str) -> Result<Vec<Envelope>, HarvestError> {
    let mut reader = Reader::from_str(xml);

    let mut envelopes = Vec::new();
    let mut current: Option<Envelope> = None;
    let mut record_start = 0usize;
    let mut in_metadata = false;
    let mut creator: Option<Creator> = None;
    let mut in_name = false;
    let mut in_affiliation = false;
    let mut field: Option<Field> = None;
    // Inline elements open inside the field being captured.
    let mut nested = 0usize;
    let mut cur_text = String::new();

    let mut buf = Vec::new();
    loop {
        let before = reader.buffer_position() as usize;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(_)) if field.is_some() || in_name || in_affiliation => {
                nested += 1;
            }
            Ok(Event::End(_)) if nested > 0 => {
                nested -= 1;
            }
            Ok(Event::Start(e)) => {
                let name = e.name();
                let name = name.as_ref();
                if is_local(name, "record") {
                    current = Some(Envelope::default());
                    record_start = before;
                    in_metadata = false;
                } else if current.is_some() && is_local(name, "metadata") {
                    in_metadata = true;
                } else if in_metadata && is_local(name, "creator") {
                    creator = Some(Creator::default());
                } else if creator.is_some() && is_local(name, "name") {
                    in_name = true;
                } else if creator.is_some() && is_local(name, "affiliation") {
                    in_affiliation = true;
                } else if in_metadata && creator.is_none() {
                    field = Field::from_local(&local(name).to_ascii_lowercase());
                }
                cur_text.clear();
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                let name = name.as_ref();
                if is_local(name, "record") {
                    if let Some(mut envelope) = current.take() {
                        let end = (reader.buffer_position() as usize).min(xml.len());
                        envelope.markup = xml[record_start.min(end)..end].to_string();
                        envelopes.push(envelope);
                    }
                    in_metadata = false;
                } else if is_local(name, "metadata") {
                    in_metadata = false;
                } else if is_local(name, "creator") {
                    if let (Some(c), Some(env)) = (creator.take(), current.as_mut()) {
                        env.creators.push(c);
                    }
                } else if in_name && is_local(name, "name") {
                    if let Some(c) = creator.as_mut()
                        && c.raw_name.is_empty()
                        && let Some(text) = non_empty(&cur_text)
                    {
                        c.raw_name = text;
                    }
                    in_name = false;
                } else if in_affiliation && is_local(name, "affiliation") {
                    if let Some(c) = creator.as_mut()
                        && let Some(text) = non_empty(&cur_text)
                    {
                        c.affiliations.push(text);
                    }
                    in_affiliation = false;
                } else if let (Some(f), Some(env)) = (field.take(), current.as_mut()) {
                    let slot = match f {
                        Field::Identifier => &mut env.identifier,
                        Field::Title => &mut env.title,
                        Field::Date => &mut env.date,
                        Field::Language => &mut env.language,
                        Field::Rights => &mut env.rights,
                        Field::Publisher => &mut env.publisher,
                    };
                    if slot.is_none() {
                        *slot = non_empty(&cur_text);
                    }
                }
                cur_text.clear();
            }
            Ok(Event::Text(t)) => {
                cur_text.push_str(&String::from_utf8_lossy(t.as_ref()));
            }
            Ok(Event::CData(t)) => {
                cur_text.push_str(&String::from_utf8_lossy(t.as_ref()));
            }
            Ok(Event::GeneralRef(r)) => {
                if let Ok(Some(ch)) = r.resolve_char_ref() {
                    cur_text.push(ch);
                } else {
                    let entity: Cow<'_, str> = r.decode().unwrap_or_default();
                    match quick_xml::escape::resolve_predefined_entity(&entity) {
                        Some(resolved) => cur_text.push_str(resolved),
                        None => {
                            cur_text.push('&');
                            cur_text.push_str(&entity);
                            cur_text.push(';');
                        }
                    }
                }
            }
            Err(e) => {
                return Err(HarvestError::Envelope(format!(
                    "XML parse error at byte {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(envelopes)
}
