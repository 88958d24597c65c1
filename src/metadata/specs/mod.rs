// Human-readable labels for format-specific tag keys
// Tables are built once and handed around by reference

mod id3;
mod itunes;
mod long_form;

use super::{MetadataEntry, MetadataKeyType, MetadataType};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

#[derive(Debug, Default)]
struct FormatSpec {
    by_key: HashMap<String, &'static str>,
    by_id: HashMap<String, &'static str>,
}

impl FormatSpec {
    fn build(table: &[(&str, &'static str)], identifier: impl Fn(&str) -> String) -> Self {
        let mut spec = FormatSpec::default();
        for &(key, label) in table {
            spec.by_key.insert(key.to_string(), label);
            spec.by_id.insert(identifier(key), label);
        }
        spec
    }

    fn lookup(&self, key: &str, key_type: MetadataKeyType) -> Option<&'static str> {
        match key_type {
            MetadataKeyType::Key => self.by_key.get(key).copied(),
            MetadataKeyType::Id => self.by_id.get(key).copied(),
        }
    }
}

/// Key-to-label tables for every tag format the readers produce.
#[derive(Debug)]
pub struct MetadataKeySpecs {
    id3: FormatSpec,
    itunes: FormatSpec,
    long_form: HashMap<&'static str, &'static str>,
    fallback_lookups: AtomicU64,
}

impl Default for MetadataKeySpecs {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataKeySpecs {
    pub fn new() -> Self {
        Self {
            id3: FormatSpec::build(id3::FRAMES, |key| format!("{}{}", id3::ID_PREFIX, key)),
            itunes: FormatSpec::build(itunes::ATOMS, itunes::identifier),
            long_form: long_form::KEYS.iter().copied().collect(),
            fallback_lookups: AtomicU64::new(0),
        }
    }

    /// Pure lookup. ID3 and iTunes misses fall through to the long-form table.
    /// Common-space keys have no table: their label is the split camelCase key.
    pub fn readable_key(
        &self,
        key: &str,
        format: MetadataType,
        key_type: MetadataKeyType,
    ) -> Option<String> {
        match format {
            MetadataType::Common => Some(split_camel_case(key)),
            MetadataType::Id3 => self
                .id3
                .lookup(key, key_type)
                .or_else(|| self.long_form_label(key))
                .map(str::to_string),
            MetadataType::ITunes => self
                .itunes
                .lookup(key, key_type)
                .or_else(|| self.long_form_label(key))
                .map(str::to_string),
            MetadataType::ITunesLongForm => self.long_form_label(key).map(str::to_string),
            MetadataType::Other => None,
        }
    }

    /// Display label for an entry.
    ///
    /// **This is a mutating lookup.** When no table knows the key, the entry
    /// is reclassified as [`MetadataType::Other`] and its raw key is returned;
    /// later calls on the same entry skip every table.
    pub fn formatted_key(&self, entry: &mut MetadataEntry) -> String {
        if entry.format == MetadataType::Other {
            return entry.key.clone();
        }

        match self.readable_key(&entry.key, entry.format, entry.key_type) {
            Some(label) => label,
            None => {
                debug!("no label for {:?} key '{}', treating as other", entry.format, entry.key);
                entry.format = MetadataType::Other;
                entry.key.clone()
            }
        }
    }

    /// Labels every entry (reclassifying unknown ones), then orders the pairs
    /// by format priority. Entries of equal priority keep their read order.
    pub fn labelled_entries(&self, entries: &mut [MetadataEntry]) -> Vec<(String, String)> {
        let mut labelled: Vec<(u8, String, String)> = entries
            .iter_mut()
            .map(|entry| {
                let label = self.formatted_key(entry);
                (entry.format.sort_order(), label, entry.value.clone())
            })
            .collect();

        labelled.sort_by_key(|(order, _, _)| *order);
        labelled.into_iter().map(|(_, label, value)| (label, value)).collect()
    }

    /// How many times the long-form fallback chain has been consulted.
    pub fn fallback_lookups(&self) -> u64 {
        self.fallback_lookups.load(Ordering::Relaxed)
    }

    fn long_form_label(&self, key: &str) -> Option<&'static str> {
        self.fallback_lookups.fetch_add(1, Ordering::Relaxed);
        let normalized = normalize_long_form_key(key)?;
        self.long_form.get(normalized.as_str()).copied()
    }
}

/// Stable display ordering by format priority.
pub fn sort_for_display(entries: &mut [MetadataEntry]) {
    entries.sort_by_key(|entry| entry.format.sort_order());
}

/// "com.apple.iTunes:iTunNORM" -> "itunnorm".
///
/// Lowercases, keeps whatever follows the last `com.apple.itunes` namespace,
/// then trims whitespace and `:` `;` `.` from both ends.
pub fn normalize_long_form_key(key: &str) -> Option<String> {
    let lower = key.to_lowercase();
    let token = lower
        .split(long_form::NAMESPACE)
        .filter(|token| !token.is_empty())
        .last()?;

    let trimmed = token
        .trim()
        .trim_matches(|c: char| matches!(c, ':' | ';' | '.'))
        .trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// "albumName" -> "Album Name".
pub fn split_camel_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len() + 4);
    let mut prev: Option<char> = None;

    for c in word.chars() {
        match prev {
            None => out.extend(c.to_uppercase()),
            Some(p) => {
                if c.is_uppercase() && (p.is_lowercase() || p.is_ascii_digit()) {
                    out.push(' ');
                }
                out.push(c);
            }
        }
        prev = Some(c);
    }

    out
}
