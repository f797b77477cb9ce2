use tracing::{debug, info};

use crate::domain::{AliasMap, GeneIdentifiers, Namespace, SearchTerm};
use crate::error::KiraError;
use crate::gene_query::{NamespaceAliases, NamespaceQuery, resolve_aliases};
use crate::join::try_join_all;

/// Genes resolved for one search, keyed by the alias they were found under.
///
/// This is the accumulator threaded through the pipeline: the merge stage
/// creates it, the fallback stage extends it, and enrichment reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedGenes {
    genes: AliasMap,
    unrecognized: Vec<String>,
}

impl MergedGenes {
    /// Merges per-namespace results in the order given.
    ///
    /// Only the first result's unrecognized terms are kept; the other
    /// namespaces' unrecognized lists are not consulted.
    pub fn from_namespaces(results: Vec<NamespaceAliases>) -> Self {
        let mut results = results.into_iter();
        let Some(first) = results.next() else {
            return Self::default();
        };
        let mut genes = first.aliases;
        for result in results {
            merge_alias_maps(&mut genes, result.aliases);
        }
        Self {
            genes,
            unrecognized: first.unrecognized,
        }
    }

    pub fn genes(&self) -> &AliasMap {
        &self.genes
    }

    pub fn get(&self, alias: &str) -> Option<&GeneIdentifiers> {
        self.genes.get(alias)
    }

    pub fn contains_alias(&self, alias: &str) -> bool {
        self.genes.contains_key(alias)
    }

    pub fn unrecognized(&self) -> &[String] {
        &self.unrecognized
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &GeneIdentifiers)> {
        self.genes.iter()
    }

    /// Records a UniProt accession found for an alias by the fallback search.
    pub fn with_fallback_accession(mut self, alias: &str, accession: &str) -> Self {
        let mut ids = GeneIdentifiers::new();
        ids.insert(Namespace::Uniprot, accession.to_string());
        self.genes.insert(alias.to_string(), ids);
        self
    }
}

/// Key-wise additive union: namespace entries from `other` are added next to
/// those already present for the same alias.
pub fn merge_alias_maps(base: &mut AliasMap, other: AliasMap) {
    for (alias, ids) in other {
        let entry = base.entry(alias).or_default();
        for (namespace, id) in ids {
            entry.entry(namespace).or_insert(id);
        }
    }
}

/// Queries every namespace concurrently and merges the answers.
///
/// All four queries must succeed; the first failure (in namespace order)
/// aborts the merge.
pub fn resolve_term<Q: NamespaceQuery>(
    client: &Q,
    term: &SearchTerm,
) -> Result<MergedGenes, KiraError> {
    let tasks = Namespace::ALL
        .into_iter()
        .map(|namespace| {
            move || -> Result<NamespaceAliases, KiraError> {
                debug!(term = %term, namespace = %namespace, "querying namespace");
                let raw = client.query(term, namespace)?;
                Ok(resolve_aliases(namespace, raw))
            }
        })
        .collect::<Vec<_>>();
    let results = try_join_all(tasks)?;
    let merged = MergedGenes::from_namespaces(results);
    info!(
        term = %term,
        genes = merged.len(),
        unrecognized = merged.unrecognized().len(),
        "merged namespace results"
    );
    Ok(merged)
}
