use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::domain::{GeneIdentifiers, Namespace};
use crate::error::KiraError;
use crate::join::try_join;
use crate::landing::{LandingBox, ShowMore, assemble};
use crate::links::{LinkOrigin, LinkTemplates};
use crate::merge::MergedGenes;
use crate::ncbi::{BulkNcbiInfo, NcbiSummaryResult};
use crate::uniprot::{BulkUniprotInfo, UniprotEntry};

/// Identifiers to send to each bulk service; every gene lands in at most one
/// list, NCBI Gene taking priority over UniProt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub ncbi_ids: Vec<String>,
    pub uniprot_ids: Vec<String>,
    /// Aliases with neither identifier; they are not enriched.
    pub skipped: Vec<String>,
}

pub fn partition(genes: &MergedGenes) -> Partition {
    let mut partition = Partition::default();
    for (alias, ids) in genes.iter() {
        if let Some(id) = ids.get(&Namespace::NcbiGene) {
            partition.ncbi_ids.push(id.clone());
        } else if let Some(id) = ids.get(&Namespace::Uniprot) {
            partition.uniprot_ids.push(id.clone());
        } else {
            partition.skipped.push(alias.clone());
        }
    }
    partition
}

/// Maps an identifier of one namespace back to the alias it was merged under.
/// When several aliases carry the same identifier the first one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseIndex {
    by_id: HashMap<String, String>,
}

impl ReverseIndex {
    pub fn build(genes: &MergedGenes, namespace: Namespace) -> Self {
        let mut by_id = HashMap::new();
        for (alias, ids) in genes.iter() {
            if let Some(id) = ids.get(&namespace) {
                by_id.entry(id.clone()).or_insert_with(|| alias.clone());
            }
        }
        Self { by_id }
    }

    pub fn alias(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }
}

/// NCBI Gene path: the merged identifiers become the links, names come from
/// the gene summary.
pub struct NcbiEnrichment<'a> {
    pub genes: &'a MergedGenes,
    pub index: ReverseIndex,
    pub templates: &'a LinkTemplates,
}

impl<'a> NcbiEnrichment<'a> {
    pub const ORIGIN: LinkOrigin = LinkOrigin::Ncbi;

    pub fn new(genes: &'a MergedGenes, templates: &'a LinkTemplates) -> Self {
        Self {
            genes,
            index: ReverseIndex::build(genes, Namespace::NcbiGene),
            templates,
        }
    }

    pub fn build(&self, result: &NcbiSummaryResult) -> Result<Vec<LandingBox>, KiraError> {
        let expand = result.uids.len() == 1;
        let mut records = Vec::with_capacity(result.uids.len());
        for uid in &result.uids {
            let Some(alias) = self.index.alias(uid) else {
                warn!(uid = %uid, "NCBI returned a gene that was not requested");
                continue;
            };
            let Some(summary) = result.summary(uid) else {
                warn!(uid = %uid, "NCBI response has no summary for gene");
                continue;
            };
            let ids = self.genes.get(alias).cloned().unwrap_or_default();
            records.push(LandingBox {
                database_id: uid.clone(),
                name: summary.nomenclaturename.clone(),
                function: summary.summary.clone(),
                hgnc_symbol: ids.get(&Namespace::GeneCards).cloned(),
                other_names: summary.otheraliases.clone(),
                links: self.templates.render_all(&ids, Self::ORIGIN)?,
                show_more: ShowMore {
                    full: expand,
                    function: false,
                    synonyms: false,
                },
                source: Self::ORIGIN,
                query_alias: Some(alias.to_string()),
            });
        }
        Ok(records)
    }
}

/// UniProt path: links are rebuilt from the entry's cross-references, and the
/// record always starts expanded.
pub struct UniprotEnrichment<'a> {
    pub index: ReverseIndex,
    pub templates: &'a LinkTemplates,
}

impl<'a> UniprotEnrichment<'a> {
    pub const ORIGIN: LinkOrigin = LinkOrigin::Uniprot;

    pub fn new(genes: &MergedGenes, templates: &'a LinkTemplates) -> Self {
        Self {
            index: ReverseIndex::build(genes, Namespace::Uniprot),
            templates,
        }
    }

    pub fn build(&self, entries: &[UniprotEntry]) -> Result<Vec<LandingBox>, KiraError> {
        entries
            .iter()
            .map(|entry| {
                let alias = self.index.alias(&entry.accession);
                if alias.is_none() {
                    debug!(accession = %entry.accession, "no merged alias for accession");
                }
                let ids = cross_reference_ids(entry);
                Ok(LandingBox {
                    database_id: entry.accession.clone(),
                    name: entry.gene_name().unwrap_or_default().to_string(),
                    function: entry.function_text().unwrap_or_default().to_string(),
                    hgnc_symbol: ids.get(&Namespace::Hgnc).cloned(),
                    other_names: entry.gene_synonyms().join(", "),
                    links: self.templates.render_all(&ids, Self::ORIGIN)?,
                    show_more: ShowMore {
                        full: true,
                        function: false,
                        synonyms: false,
                    },
                    source: Self::ORIGIN,
                    query_alias: alias.map(str::to_string),
                })
            })
            .collect()
    }
}

/// The accession itself plus the recognized cross-reference databases.
pub fn cross_reference_ids(entry: &UniprotEntry) -> GeneIdentifiers {
    let mut ids = GeneIdentifiers::new();
    ids.insert(Namespace::Uniprot, entry.accession.clone());
    for reference in &entry.db_references {
        let namespace = match reference.kind.as_str() {
            "GeneCards" => Namespace::GeneCards,
            "HGNC" => Namespace::Hgnc,
            "GeneID" => Namespace::NcbiGene,
            _ => continue,
        };
        ids.insert(namespace, reference.id.clone());
    }
    ids
}

/// Fetches annotation for every partitioned gene and assembles the records.
///
/// The two bulk calls run concurrently and both must succeed. A path with no
/// identifiers makes no call.
pub fn enrich<N, U>(
    ncbi: &N,
    uniprot: &U,
    genes: &MergedGenes,
    templates: &LinkTemplates,
) -> Result<Vec<LandingBox>, KiraError>
where
    N: BulkNcbiInfo,
    U: BulkUniprotInfo,
{
    let partition = partition(genes);
    if !partition.skipped.is_empty() {
        debug!(aliases = ?partition.skipped, "genes without NCBI or UniProt identifiers");
    }
    let ncbi_strategy = NcbiEnrichment::new(genes, templates);
    let uniprot_strategy = UniprotEnrichment::new(genes, templates);

    let ncbi_ids = &partition.ncbi_ids;
    let uniprot_ids = &partition.uniprot_ids;
    let (ncbi_result, uniprot_entries) = try_join(
        || -> Result<Option<NcbiSummaryResult>, KiraError> {
            if ncbi_ids.is_empty() {
                return Ok(None);
            }
            Ok(Some(ncbi.gene_summaries(ncbi_ids)?))
        },
        || -> Result<Vec<UniprotEntry>, KiraError> {
            if uniprot_ids.is_empty() {
                return Ok(Vec::new());
            }
            uniprot.proteins(uniprot_ids)
        },
    )?;

    let ncbi_records = match ncbi_result {
        Some(result) => ncbi_strategy.build(&result)?,
        None => Vec::new(),
    };
    let uniprot_records = uniprot_strategy.build(&uniprot_entries)?;
    info!(
        ncbi = ncbi_records.len(),
        uniprot = uniprot_records.len(),
        "enriched genes"
    );
    Ok(assemble(ncbi_records, uniprot_records))
}
