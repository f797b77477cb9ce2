use std::io::{self, Write};

use serde::Serialize;

use crate::app::{ProgressEvent, ProgressSink, SearchResult};
use crate::landing::LandingBox;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_search(result: &SearchResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

/// Plain-text rendering of landing boxes for a terminal.
pub struct TextOutput;

impl TextOutput {
    pub fn print_search(result: &SearchResult) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(Self::render(result).as_bytes())
    }

    pub fn render(result: &SearchResult) -> String {
        let mut out = String::new();
        if result.records.is_empty() {
            out.push_str(&format!("No genes matched \"{}\".\n", result.term));
        }
        let multiple = result.records.len() > 1;
        for record in &result.records {
            render_box(&mut out, record, multiple);
        }
        if multiple {
            out.push_str(&format!(
                "Interactions between entities: {}\n",
                crate::landing::interaction_sources(&result.records).join(",")
            ));
        }
        if !result.unresolved.is_empty() {
            out.push_str(&format!("Unresolved: {}\n", result.unresolved.join(", ")));
        }
        out
    }
}

fn render_box(out: &mut String, record: &LandingBox, multiple: bool) {
    let marker = match (multiple, record.show_more.full) {
        (false, _) => "",
        (true, true) => " [-]",
        (true, false) => " [+]",
    };
    out.push_str(&format!("{} ({}){marker}\n", record.name, record.database_id));
    if !record.show_more.full {
        return;
    }
    if let Some(symbol) = &record.hgnc_symbol {
        out.push_str(&format!("  Official Symbol: {symbol}\n"));
    }
    if !record.other_names.is_empty() {
        out.push_str(&format!("  Other Names: {}", record.synonyms_display()));
        if record.synonyms_are_truncatable() {
            out.push_str(toggle_hint(record.show_more.synonyms));
        }
        out.push('\n');
    }
    if !record.function.is_empty() {
        out.push_str(&format!("  {}", record.function_display()));
        if record.function_is_truncatable() {
            out.push_str(toggle_hint(record.show_more.function));
        }
        out.push('\n');
    }
    for (namespace, url) in &record.links {
        out.push_str(&format!("  {namespace}: {url}\n"));
    }
}

fn toggle_hint(expanded: bool) -> &'static str {
    if expanded { " « hide" } else { " show »" }
}

pub struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => eprintln!("{} ({} ms)", event.message, elapsed.as_millis()),
            None => eprintln!("{}", event.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::Namespace;
    use crate::landing::ShowMore;
    use crate::links::LinkOrigin;

    fn result(records: Vec<LandingBox>) -> SearchResult {
        SearchResult {
            term: "TP53".to_string(),
            resolved_at: "2026-01-01T00:00:00+00:00".to_string(),
            records,
            unresolved: Vec::new(),
        }
    }

    fn tp53(full: bool) -> LandingBox {
        let mut links = BTreeMap::new();
        links.insert(
            Namespace::NcbiGene,
            "http://identifiers.org/ncbigene/7157".to_string(),
        );
        LandingBox {
            database_id: "7157".to_string(),
            name: "tumor protein p53".to_string(),
            function: "Tumor suppressor.".to_string(),
            hgnc_symbol: Some("TP53".to_string()),
            other_names: "BCC7, LFS1, P53, TRP53".to_string(),
            links,
            show_more: ShowMore {
                full,
                ..ShowMore::default()
            },
            source: LinkOrigin::Ncbi,
            query_alias: Some("TP53".to_string()),
        }
    }

    #[test]
    fn single_box_renders_details() {
        let text = TextOutput::render(&result(vec![tp53(true)]));
        assert!(text.starts_with("tumor protein p53 (7157)\n"));
        assert!(text.contains("Official Symbol: TP53"));
        assert!(text.contains("Other Names: BCC7, LFS1... show »"));
        assert!(text.contains("NCBI Gene: http://identifiers.org/ncbigene/7157"));
    }

    #[test]
    fn collapsed_boxes_render_titles_only() {
        let mut second = tp53(false);
        second.database_id = "P04637".to_string();
        let text = TextOutput::render(&result(vec![tp53(false), second]));
        assert!(text.contains("tumor protein p53 (7157) [+]"));
        assert!(!text.contains("Official Symbol"));
        assert!(text.contains("Interactions between entities: 7157,P04637"));
    }

    #[test]
    fn empty_result_says_so() {
        let text = TextOutput::render(&result(Vec::new()));
        assert_eq!(text, "No genes matched \"TP53\".\n");
    }
}
