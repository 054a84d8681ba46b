//! Android `strings.xml` parser.
//!
//! Reads direct children of `<resources>`:
//! - `<string name="k">` becomes key `k`, with a preceding comment as `metadata.comment`
//! - `<string-array name="k">` items become `k[0]`, `k[1]`, ...
//! - `<plurals name="k">` items become `k:one`, `k:other`, ...

use std::path::Path;

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use super::{ParseError, TranslationFormat};
use crate::core::types::TranslationEntry;

const FORMAT: TranslationFormat = TranslationFormat::AndroidXml;

pub fn parse(content: &str, source_file: &Path) -> Result<Vec<TranslationEntry>, ParseError> {
    let err = |e: quick_xml::Error| ParseError::malformed(FORMAT, source_file, e);

    let mut reader = Reader::from_str(content);
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut pending_comment: Option<String> = None;

    loop {
        match reader.read_event().map_err(err)? {
            Event::Start(e) if depth == 1 => {
                let name = name_attribute(&e, "name", source_file)?;
                match e.name().as_ref() {
                    b"string" => {
                        let text = read_text(&mut reader, source_file)?;
                        if let Some(key) = name {
                            let mut entry = TranslationEntry::new(key, text, source_file);
                            if let Some(comment) = pending_comment.take() {
                                entry = entry.with_metadata("comment", comment);
                            }
                            entries.push(entry);
                        }
                    }
                    b"string-array" => {
                        let items = read_items(&mut reader, source_file)?;
                        if let Some(array) = name {
                            for (index, (_, text)) in items.into_iter().enumerate() {
                                entries.push(
                                    TranslationEntry::new(
                                        format!("{}[{}]", array, index),
                                        text,
                                        source_file,
                                    )
                                    .with_metadata("array", array.as_str())
                                    .with_metadata("index", index),
                                );
                            }
                        }
                    }
                    b"plurals" => {
                        let items = read_items(&mut reader, source_file)?;
                        if let Some(plural) = name {
                            for (quantity, text) in items {
                                let quantity = quantity.unwrap_or_default();
                                entries.push(
                                    TranslationEntry::new(
                                        format!("{}:{}", plural, quantity),
                                        text,
                                        source_file,
                                    )
                                    .with_metadata("plural", plural.as_str())
                                    .with_metadata("quantity", quantity),
                                );
                            }
                        }
                    }
                    _ => {
                        reader.read_to_end(e.name()).map_err(err)?;
                    }
                }
                pending_comment = None;
            }
            Event::Empty(e) if depth == 1 => {
                if e.name().as_ref() == b"string" {
                    if let Some(key) = name_attribute(&e, "name", source_file)? {
                        let mut entry = TranslationEntry::new(key, "", source_file);
                        if let Some(comment) = pending_comment.take() {
                            entry = entry.with_metadata("comment", comment);
                        }
                        entries.push(entry);
                    }
                }
                pending_comment = None;
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Comment(c) if depth == 1 => {
                pending_comment = Some(String::from_utf8_lossy(&c).trim().to_string());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}

fn name_attribute(
    e: &BytesStart,
    attribute: &str,
    source_file: &Path,
) -> Result<Option<String>, ParseError> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| ParseError::malformed(FORMAT, source_file, e))?;
        if attr.key.as_ref() == attribute.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| ParseError::malformed(FORMAT, source_file, e))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Collect the text of the current element up to its end tag.
///
/// Inline markup such as `<b>` is dropped and its text kept.
fn read_text(reader: &mut Reader<&[u8]>, source_file: &Path) -> Result<String, ParseError> {
    let err = |e: quick_xml::Error| ParseError::malformed(FORMAT, source_file, e);
    let mut text = String::new();
    let mut nested = 0usize;

    loop {
        match reader.read_event().map_err(err)? {
            Event::Text(t) => text.push_str(&t.unescape().map_err(err)?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
            Event::Start(_) => nested += 1,
            Event::End(_) if nested == 0 => break,
            Event::End(_) => nested -= 1,
            Event::Eof => {
                return Err(ParseError::malformed(
                    FORMAT,
                    source_file,
                    "unexpected end of file",
                ));
            }
            _ => {}
        }
    }

    Ok(unescape(&text))
}

/// Read `<item>` children as `(quantity, text)` up to the parent's end tag.
fn read_items(
    reader: &mut Reader<&[u8]>,
    source_file: &Path,
) -> Result<Vec<(Option<String>, String)>, ParseError> {
    let err = |e: quick_xml::Error| ParseError::malformed(FORMAT, source_file, e);
    let mut items = Vec::new();

    loop {
        match reader.read_event().map_err(err)? {
            Event::Start(e) if e.name().as_ref() == b"item" => {
                let quantity = name_attribute(&e, "quantity", source_file)?;
                items.push((quantity, read_text(reader, source_file)?));
            }
            Event::Empty(e) if e.name().as_ref() == b"item" => {
                let quantity = name_attribute(&e, "quantity", source_file)?;
                items.push((quantity, String::new()));
            }
            Event::Start(e) => {
                reader.read_to_end(e.name()).map_err(err)?;
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(ParseError::malformed(
                    FORMAT,
                    source_file,
                    "unexpected end of file",
                ));
            }
            _ => {}
        }
    }

    Ok(items)
}

/// Resolve Android backslash escapes: `\'`, `\"`, `\n`, `\t`, `\@`, `\?`.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(q @ ('\'' | '"' | '@' | '?')) => out.push(q),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
