use kira_gene_resolver::domain::{AliasMap, GeneIdentifiers, Namespace};
use kira_gene_resolver::gene_query::{GeneInfo, RawNamespaceResult, resolve_aliases};
use kira_gene_resolver::merge::{MergedGenes, merge_alias_maps};
use kira_gene_resolver::pathways::uniprot_accession_from_uri;

fn raw(pairs: &[(&str, &str)], unrecognized: &[&str]) -> RawNamespaceResult {
    RawNamespaceResult {
        gene_info: pairs
            .iter()
            .map(|(initial, converted)| GeneInfo {
                initial_alias: initial.to_string(),
                converted_alias: converted.to_string(),
            })
            .collect(),
        unrecognized: unrecognized.iter().map(|term| term.to_string()).collect(),
    }
}

#[test]
fn namespaces_merge_per_alias() {
    let merged = MergedGenes::from_namespaces(vec![
        resolve_aliases(Namespace::NcbiGene, raw(&[("TP53", "7157")], &["BCC7"])),
        resolve_aliases(Namespace::GeneCards, raw(&[("TP53", "TP53")], &[])),
        resolve_aliases(Namespace::Uniprot, raw(&[("MDM2", "Q00987")], &["OTHER"])),
        resolve_aliases(Namespace::Hgnc, raw(&[("TP53", "11998")], &[])),
    ]);

    assert_eq!(merged.len(), 2);
    let tp53 = merged.get("TP53").unwrap();
    assert_eq!(tp53.len(), 3);
    assert_eq!(tp53[&Namespace::NcbiGene], "7157");
    assert_eq!(tp53[&Namespace::GeneCards], "TP53");
    assert_eq!(tp53[&Namespace::Hgnc], "11998");
    assert_eq!(merged.get("MDM2").unwrap()[&Namespace::Uniprot], "Q00987");
    assert_eq!(merged.unrecognized(), ["BCC7".to_string()]);
}

#[test]
fn union_keeps_existing_entries() {
    let mut base = AliasMap::new();
    let mut ids = GeneIdentifiers::new();
    ids.insert(Namespace::NcbiGene, "7157".to_string());
    base.insert("TP53".to_string(), ids);

    let mut other = AliasMap::new();
    let mut ids = GeneIdentifiers::new();
    ids.insert(Namespace::NcbiGene, "9999".to_string());
    ids.insert(Namespace::Uniprot, "P04637".to_string());
    other.insert("TP53".to_string(), ids);
    other.insert("MDM2".to_string(), GeneIdentifiers::new());

    merge_alias_maps(&mut base, other);
    assert_eq!(base.keys().collect::<Vec<_>>(), vec!["TP53", "MDM2"]);
    assert_eq!(base["TP53"][&Namespace::NcbiGene], "7157");
    assert_eq!(base["TP53"][&Namespace::Uniprot], "P04637");
}

#[test]
fn fallback_accession_is_uniprot_only() {
    let merged = MergedGenes::default().with_fallback_accession("BCC7", "P04637");
    let ids = merged.get("BCC7").unwrap();
    assert_eq!(ids.len(), 1);
    assert_eq!(ids[&Namespace::Uniprot], "P04637");
}

#[test]
fn accession_comes_from_uniprot_uris_only() {
    assert_eq!(
        uniprot_accession_from_uri("http://identifiers.org/uniprot/P04637"),
        Some("P04637")
    );
    assert_eq!(
        uniprot_accession_from_uri("http://identifiers.org/ncbigene/7157"),
        None
    );
    assert_eq!(uniprot_accession_from_uri("http://identifiers.org/uniprot/"), None);
}
