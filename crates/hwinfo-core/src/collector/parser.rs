//! Parsers for diagnostic tool output.
//!
//! These are pure functions over already-materialized text. They never fail:
//! a line that does not look like `key: value` simply yields an empty
//! [`Field`], and it is up to the caller to decide whether a missing field
//! matters.

/// Separator used by `dmidecode`, `/proc/cpuinfo` and `smartctl`.
pub const KEY_VALUE_SEPARATOR: char = ':';

/// Upper bound on parenthesis-stripping passes for a single line.
const MAX_PAREN_PASSES: usize = 100;

/// A normalized `key: value` pair extracted from one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    pub value: String,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// True for lines that carried no field.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && self.value.is_empty()
    }
}

/// Removes `(...)` annotations and collapses runs of whitespace.
///
/// An opening parenthesis without a matching closing one is left alone.
pub fn strip_annotations(text: &str) -> String {
    let mut s = text.to_string();
    for _ in 0..MAX_PAREN_PASSES {
        let Some(open) = s.find('(') else {
            break;
        };
        let Some(close) = s[open..].find(')').map(|i| open + i) else {
            break;
        };
        s.replace_range(open..=close, "");
    }
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits one line into a normalized key and value.
///
/// `"Size:   4096 MB (No ECC)"` becomes `("Size", "4096 MB")`. Lines without
/// `sep` give an empty field.
pub fn normalize_line(line: &str, sep: char) -> Field {
    let line = strip_annotations(line);
    match line.split_once(sep) {
        Some((key, value)) => Field::new(key.trim(), value.trim()),
        None => Field::default(),
    }
}

/// Iterates over the non-empty fields of `lines`.
pub fn parse_fields<'a, I>(lines: I) -> impl Iterator<Item = Field> + 'a
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: 'a,
{
    lines
        .into_iter()
        .map(|line| normalize_line(line, KEY_VALUE_SEPARATOR))
        .filter(|field| !field.key.is_empty())
}

/// Returns the value of the first line whose key is `key`.
pub fn find_value<'a, I>(lines: I, key: &str) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: 'a,
{
    parse_fields(lines)
        .find(|field| field.key == key)
        .map(|field| field.value)
}

/// How the start of a record is recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker<'a> {
    /// A line that reads exactly this text, e.g. `Memory Device`.
    Sentinel(&'a str),
    /// A field with this key whose value differs from the last one seen,
    /// e.g. `processor`.
    Field(&'a str),
}

/// The fields of one logical record, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordBlock {
    fields: Vec<Field>,
}

impl RecordBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Value of the first field named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a RecordBlock {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Rebuilds repeated records from a flat line stream.
///
/// A new block opens at every `marker`. Lines before the first marker belong
/// to no block, lines without a field are skipped, and the block still open
/// at end of input is kept. With `merge_key`, consecutive blocks that share
/// that field's value are collapsed into the first of them (see
/// [`merge_consecutive`]).
pub fn split_records<'a, I>(lines: I, marker: Marker<'_>, merge_key: Option<&str>) -> Vec<RecordBlock>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut blocks = Vec::new();
    let mut current: Option<RecordBlock> = None;
    let mut last_id: Option<String> = None;

    for line in lines {
        if let Marker::Sentinel(sentinel) = marker
            && line.trim_end() == sentinel
        {
            blocks.extend(current.replace(RecordBlock::new()));
            continue;
        }

        let field = normalize_line(line, KEY_VALUE_SEPARATOR);
        if field.key.is_empty() {
            continue;
        }

        if let Marker::Field(name) = marker
            && field.key == name
            && last_id.as_deref() != Some(field.value.as_str())
        {
            last_id = Some(field.value.clone());
            blocks.extend(current.replace(RecordBlock::new()));
        }

        if let Some(block) = current.as_mut() {
            block.push(field);
        }
    }
    blocks.extend(current);

    match merge_key {
        Some(key) => merge_consecutive(blocks, key),
        None => blocks,
    }
}

/// Collapses runs of blocks that share the value of `key`, keeping the first
/// block of each run. A block without `key` counts as an empty value.
pub fn merge_consecutive(blocks: Vec<RecordBlock>, key: &str) -> Vec<RecordBlock> {
    let mut merged: Vec<RecordBlock> = Vec::with_capacity(blocks.len());
    let mut last: Option<String> = None;

    for block in blocks {
        let id = block.get(key).unwrap_or_default();
        if last.as_deref() == Some(id) {
            continue;
        }
        last = Some(id.to_string());
        merged.push(block);
    }
    merged
}

/// Splits a `nmcli -t` line on unescaped `:`. `\:` and `\\` are unescaped.
pub fn split_terse(line: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next) => current.push(next),
                None => current.push('\\'),
            },
            ':' => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}
