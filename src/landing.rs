use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::Namespace;
use crate::error::KiraError;
use crate::links::LinkOrigin;

pub const SYNONYMS_TRUNCATE_AT: usize = 16;
pub const FUNCTION_TRUNCATE_AT: usize = 260;
const OMISSION: &str = "...";

/// Expand/collapse flags for one landing box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowMore {
    pub full: bool,
    pub function: bool,
    pub synonyms: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Disclosure {
    Full,
    Function,
    Synonyms,
}

impl fmt::Display for Disclosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disclosure::Full => write!(f, "full"),
            Disclosure::Function => write!(f, "function"),
            Disclosure::Synonyms => write!(f, "synonyms"),
        }
    }
}

impl FromStr for Disclosure {
    type Err = KiraError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "full" => Ok(Disclosure::Full),
            "function" => Ok(Disclosure::Function),
            "synonyms" => Ok(Disclosure::Synonyms),
            _ => Err(KiraError::InvalidDisclosure(value.to_string())),
        }
    }
}

/// A display-ready gene record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingBox {
    #[serde(rename = "databaseID")]
    pub database_id: String,
    pub name: String,
    pub function: String,
    pub hgnc_symbol: Option<String>,
    pub other_names: String,
    pub links: BTreeMap<Namespace, String>,
    pub show_more: ShowMore,
    pub source: LinkOrigin,
    pub query_alias: Option<String>,
}

impl LandingBox {
    pub fn is_disclosed(&self, field: Disclosure) -> bool {
        match field {
            Disclosure::Full => self.show_more.full,
            Disclosure::Function => self.show_more.function,
            Disclosure::Synonyms => self.show_more.synonyms,
        }
    }

    pub fn toggle(&mut self, field: Disclosure) {
        let flag = match field {
            Disclosure::Full => &mut self.show_more.full,
            Disclosure::Function => &mut self.show_more.function,
            Disclosure::Synonyms => &mut self.show_more.synonyms,
        };
        *flag = !*flag;
    }

    pub fn function_is_truncatable(&self) -> bool {
        self.function.chars().count() > FUNCTION_TRUNCATE_AT
    }

    pub fn synonyms_are_truncatable(&self) -> bool {
        self.other_names.chars().count() > SYNONYMS_TRUNCATE_AT
    }

    /// Function text as currently disclosed.
    pub fn function_display(&self) -> String {
        if self.show_more.function {
            return self.function.clone();
        }
        truncate_at(&self.function, FUNCTION_TRUNCATE_AT, char::is_whitespace)
    }

    /// Other names as currently disclosed.
    pub fn synonyms_display(&self) -> String {
        if self.show_more.synonyms {
            return self.other_names.clone();
        }
        truncate_at(&self.other_names, SYNONYMS_TRUNCATE_AT, |ch| ch == ',')
    }
}

/// Flips one flag of the record at `index`; other records are untouched.
pub fn toggle_disclosure(records: &mut [LandingBox], index: usize, field: Disclosure) -> bool {
    match records.get_mut(index) {
        Some(record) => {
            record.toggle(field);
            true
        }
        None => false,
    }
}

/// Concatenates NCBI and UniProt records; several records start collapsed.
pub fn assemble(ncbi: Vec<LandingBox>, uniprot: Vec<LandingBox>) -> Vec<LandingBox> {
    let mut records = ncbi;
    records.extend(uniprot);
    if records.len() > 1 {
        for record in &mut records {
            record.show_more.full = false;
        }
    }
    records
}

/// Identifiers used as the source of an interactions view for these records.
pub fn interaction_sources(records: &[LandingBox]) -> Vec<&str> {
    records
        .iter()
        .map(|record| record.database_id.as_str())
        .collect()
}

/// Shortens `text` to at most `length` characters including a trailing
/// `...`, never cutting inside a token.
///
/// If the character right after the cut is a separator the cut stands;
/// otherwise it moves back to the last separator inside the kept part.
pub fn truncate_at<F>(text: &str, length: usize, is_separator: F) -> String
where
    F: Fn(char) -> bool,
{
    let chars = text.chars().collect::<Vec<_>>();
    if chars.len() <= length {
        return text.to_string();
    }
    let end = length.saturating_sub(OMISSION.len());
    let mut kept = &chars[..end];
    let cut_on_separator = chars.get(end).is_some_and(|ch| is_separator(*ch));
    if !cut_on_separator {
        if let Some(index) = kept.iter().rposition(|ch| is_separator(*ch)) {
            kept = &kept[..index];
        }
    }
    let mut result = kept.iter().collect::<String>();
    result.push_str(OMISSION);
    result
}
