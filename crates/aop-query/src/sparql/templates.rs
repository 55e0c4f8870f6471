//! SPARQL query templates for AOP-Wiki RDF and Bgee
//!
//! Projected variable names are the binding keys read by
//! `aop_core::processors`, so a template and its processor change together.

use crate::error::{QueryError, Result};
use aop_core::constants::{AOP_URI_PREFIX, KE_URI_PREFIX};
use std::str::FromStr;

// ============================================================================
// Prefixes
// ============================================================================

const AOP_WIKI_PREFIXES: &str = "\
PREFIX aopo: <http://aopkb.org/aop_ontology#>
PREFIX dc: <http://purl.org/dc/elements/1.1/>
PREFIX edam: <http://edamontology.org/>
PREFIX skos: <http://www.w3.org/2004/02/skos/core#>
PREFIX nci: <http://ncicb.nci.nih.gov/xml/owl/EVS/Thesaurus.owl#>
PREFIX cheminf: <http://semanticscience.org/resource/CHEMINF_>
";

const BGEE_PREFIXES: &str = "\
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX orth: <http://purl.org/net/orth#>
PREFIX genex: <http://purl.org/genex#>
PREFIX obo: <http://purl.obolibrary.org/obo/>
PREFIX dcterms: <http://purl.org/dc/terms/>
";

/// PubChem compound namespace used by AOP-Wiki chemical mappings
const PUBCHEM_COMPOUND_PREFIX: &str = "https://identifiers.org/pubchem.compound/";

/// Gene Ontology term namespace
const GO_TERM_PREFIX: &str = "http://purl.obolibrary.org/obo/GO_";

// Bgee confidence classes
const CIO_HIGH: &str = "obo:CIO_0000029";
const CIO_MEDIUM: &str = "obo:CIO_0000031";
const CIO_LOW: &str = "obo:CIO_0000030";

// ============================================================================
// Identifier queries
// ============================================================================

/// Entity the starting identifiers of a network query refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    Aop,
    Mie,
    /// Every AOP containing a relationship that starts at the key event
    KeUpstream,
    /// Every AOP containing a relationship that ends at the key event
    KeDownstream,
}

impl QueryType {
    pub const ALL: [QueryType; 4] = [
        QueryType::Aop,
        QueryType::Mie,
        QueryType::KeUpstream,
        QueryType::KeDownstream,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Aop => "aop",
            QueryType::Mie => "mie",
            QueryType::KeUpstream => "ke_upstream",
            QueryType::KeDownstream => "ke_downstream",
        }
    }

    /// Expand a bare numeric id to the full identifiers.org URI
    pub fn expand_identifier(&self, value: &str) -> String {
        let value = value.trim().trim_start_matches('<').trim_end_matches('>');
        if value.contains("://") {
            return value.to_string();
        }
        match self {
            QueryType::Aop => format!("{}{}", AOP_URI_PREFIX, value),
            _ => format!("{}{}", KE_URI_PREFIX, value),
        }
    }
}

impl FromStr for QueryType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        QueryType::ALL
            .into_iter()
            .find(|query_type| query_type.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QueryError::UnknownQueryType(s.to_string()))
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Wrap each URI in angle brackets, leaving already bracketed ones alone
pub fn format_uris<S: AsRef<str>>(uris: &[S]) -> String {
    uris.iter()
        .map(AsRef::as_ref)
        .filter(|uri| !uri.is_empty())
        .map(|uri| {
            if uri.starts_with('<') {
                uri.to_string()
            } else {
                format!("<{}>", uri)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn quoted_literals<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.as_ref().trim_matches('"'))
        .filter(|value| !value.is_empty())
        .map(|value| format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect()
}

/// Quote each value as a SPARQL string literal
pub fn format_literals<S: AsRef<str>>(values: &[S]) -> String {
    quoted_literals(values).join(" ")
}

const IDENTIFIER_SELECT: &str = "SELECT DISTINCT ?aop ?aop_title ?MIEtitle ?MIE ?KE_downstream ?KE_downstream_title ?KER ?ao ?ao_title ?KE_upstream ?KE_upstream_title";

const AOP_PATTERN: &str = "\
  ?aop a aopo:AdverseOutcomePathway ;
       dc:title ?aop_title ;
       aopo:has_adverse_outcome ?ao ;
       aopo:has_molecular_initiating_event ?MIE .
  ?ao dc:title ?ao_title .
  ?MIE dc:title ?MIEtitle .
";

/// AOP network query seeded by AOP, MIE or key event identifiers
///
/// `values` are whitespace separated URIs or bare ids. An empty `statuses`
/// slice disables the AOP status filter.
pub fn aop_identifier_query(query_type: QueryType, values: &str, statuses: &[String]) -> String {
    let identifiers: Vec<String> = values
        .split_whitespace()
        .map(|value| query_type.expand_identifier(value))
        .collect();
    let uris = format_uris(&identifiers);

    let mut query = String::from(AOP_WIKI_PREFIXES);
    query.push_str(&format!("{}\n", IDENTIFIER_SELECT));
    query.push_str("WHERE {\n");

    match query_type {
        QueryType::Aop | QueryType::Mie => {
            let var = if query_type == QueryType::Aop { "?aop" } else { "?MIE" };
            query.push_str(&format!("  VALUES {} {{ {} }}\n", var, uris));
            query.push_str(AOP_PATTERN);
            query.push_str(
                "  OPTIONAL {
    ?aop aopo:has_key_event_relationship ?KER .
    ?KER a aopo:KeyEventRelationship ;
         aopo:has_upstream_key_event ?KE_upstream ;
         aopo:has_downstream_key_event ?KE_downstream .
    ?KE_upstream dc:title ?KE_upstream_title .
    ?KE_downstream dc:title ?KE_downstream_title .
  }
",
            );
        },
        QueryType::KeUpstream | QueryType::KeDownstream => {
            let (var, predicate) = if query_type == QueryType::KeUpstream {
                ("?KE_upstream_x", "aopo:has_upstream_key_event")
            } else {
                ("?KE_downstream_x", "aopo:has_downstream_key_event")
            };
            query.push_str(&format!("  VALUES {} {{ {} }}\n", var, uris));
            query.push_str(&format!("  ?KERx a aopo:KeyEventRelationship ;\n        {} {} .\n", predicate, var));
            query.push_str(
                "  ?aop aopo:has_key_event_relationship ?KERx .
  ?aop aopo:has_key_event_relationship ?KER .
  ?KER aopo:has_downstream_key_event ?KE_downstream ;
       aopo:has_upstream_key_event ?KE_upstream .
  ?KE_upstream dc:title ?KE_upstream_title .
  ?KE_downstream dc:title ?KE_downstream_title .
",
            );
            query.push_str(AOP_PATTERN);
        },
    }

    if !statuses.is_empty() {
        query.push_str(&format!(
            "  ?aop nci:C25688 ?status .\n  FILTER(STR(?status) IN ({}))\n",
            quoted_literals(statuses).join(", ")
        ));
    }

    query.push('}');
    query
}

// ============================================================================
// Enrichment queries
// ============================================================================

/// Genes (and optionally proteins) mapped to key events
pub fn gene_query<S: AsRef<str>>(ke_uris: &[S], include_proteins: bool) -> String {
    let mut query = String::from(AOP_WIKI_PREFIXES);
    let select = if include_proteins { "?ke ?gene ?protein" } else { "?ke ?gene" };
    query.push_str(&format!(
        "SELECT DISTINCT {} WHERE {{
  VALUES ?ke {{ {} }}
  ?ke a aopo:KeyEvent ; edam:data_1025 ?object .
  ?object skos:exactMatch ?id .
  ?id a edam:data_1033 ; edam:data_1033 ?gene .
",
        select,
        format_uris(ke_uris)
    ));
    if include_proteins {
        query.push_str(
            "  OPTIONAL {
    ?object skos:exactMatch ?prot .
    ?prot a edam:data_2291 ;
          edam:data_2291 ?protein .
  }
",
        );
    }
    query.push('}');
    query
}

/// Chemical stressors of AOPs with PubChem mappings
pub fn compound_query<S: AsRef<str>>(aop_uris: &[S]) -> String {
    let mut query = String::from(AOP_WIKI_PREFIXES);
    query.push_str(&format!(
        "SELECT DISTINCT ?aop ?compound_name ?cid ?pubchem_compound ?mie ?chemical
WHERE {{
  VALUES ?aop {{ {} }}
  FILTER(STRSTARTS(STR(?pubchem_compound), \"{}\"))
  ?aop a aopo:AdverseOutcomePathway ;
       nci:C54571 ?stressor ;
       aopo:has_molecular_initiating_event ?mie .
  ?chemical skos:exactMatch ?pubchem_compound ;
            dc:title ?compound_name .
  ?stressor a nci:C54571 ;
            aopo:has_chemical_entity ?chemical .
  ?pubchem_compound cheminf:000140 ?cid .
}}
ORDER BY ?compound_name",
        format_uris(aop_uris),
        PUBCHEM_COMPOUND_PREFIX
    ));
    query
}

/// Biological process, object and action annotations of key events
pub fn component_query<S: AsRef<str>>(ke_uris: &[S], go_only: bool) -> String {
    let go_filter = if go_only {
        format!("  FILTER(STRSTARTS(STR(?process), \"{}\"))\n", GO_TERM_PREFIX)
    } else {
        String::new()
    };

    let mut query = String::from(AOP_WIKI_PREFIXES);
    query.push_str(&format!(
        "SELECT DISTINCT ?ke ?ke_name ?bioEvent ?process ?processName ?object ?objectName ?action ?objectType
WHERE {{
{}  VALUES ?ke {{ {} }}
  ?ke a aopo:KeyEvent ;
      dc:title ?ke_name .
  OPTIONAL {{ ?ke aopo:hasBiologicalEvent ?bioEvent . ?bioEvent aopo:hasProcess ?process . ?process dc:title ?processName . }}
  OPTIONAL {{ ?ke aopo:hasBiologicalEvent ?bioEvent . ?bioEvent aopo:hasObject ?object . ?object dc:title ?objectName ; a ?objectType . }}
  OPTIONAL {{ ?ke aopo:hasBiologicalEvent ?bioEvent . ?bioEvent aopo:hasAction ?action . }}
}}
ORDER BY ?ke",
        go_filter,
        format_uris(ke_uris)
    ));
    query
}

/// Organ context of key events
pub fn organ_query<S: AsRef<str>>(ke_uris: &[S]) -> String {
    let mut query = String::from(AOP_WIKI_PREFIXES);
    query.push_str(&format!(
        "SELECT DISTINCT ?ke ?organ ?organ_name WHERE {{
  VALUES ?ke {{ {} }}
  ?ke a aopo:KeyEvent ; aopo:OrganContext ?organ .
  ?organ dc:title ?organ_name .
}}",
        format_uris(ke_uris)
    ));
    query
}

/// Bgee confidence restriction for a minimum confidence percentage
///
/// 80 and above keeps high confidence calls, 50 and above adds medium,
/// 20 and above adds low. Lower values or `None` do not filter.
pub fn confidence_filter(min_confidence: Option<u8>) -> String {
    let classes: &[&str] = match min_confidence {
        Some(level) if level >= 80 => &[CIO_HIGH],
        Some(level) if level >= 50 => &[CIO_HIGH, CIO_MEDIUM],
        Some(level) if level >= 20 => &[CIO_HIGH, CIO_MEDIUM, CIO_LOW],
        _ => &[],
    };

    match classes {
        [] => String::new(),
        [single] => format!("  ?expr genex:hasConfidenceLevel {} .\n", single),
        many => {
            let branches: Vec<String> = many
                .iter()
                .map(|class| format!("{{ ?expr genex:hasConfidenceLevel {} . }}", class))
                .collect();
            format!("  {}\n", branches.join(" UNION "))
        },
    }
}

/// Bgee expression calls for genes in anatomical entities given by name
pub fn gene_expression_query<S: AsRef<str>, T: AsRef<str>>(
    gene_ids: &[S],
    organ_names: &[T],
    min_confidence: Option<u8>,
) -> String {
    let mut query = String::from(BGEE_PREFIXES);
    query.push_str(
        "SELECT ?gene_idI ?gene_id ?anatomical_entity_id ?anatomical_entity_name
  ?developmental_stage_id ?developmental_stage_name ?expression_level
  ?confidence_level_id ?confidence_level_name ?expr
WHERE {
",
    );
    if !gene_ids.is_empty() {
        query.push_str(&format!("  VALUES ?gene_id {{ {} }}\n", format_literals(gene_ids)));
    }
    if !organ_names.is_empty() {
        query.push_str(&format!(
            "  VALUES ?anatomical_entity_name {{ {} }}\n",
            format_literals(organ_names)
        ));
    }
    query.push_str(
        "  ?gene_idI a orth:Gene ;
            dcterms:identifier ?gene_id .
  ?expr genex:hasSequenceUnit ?gene_idI ;
        a genex:Expression .
",
    );
    query.push_str(&confidence_filter(min_confidence));
    query.push_str(
        "  ?expr genex:hasConfidenceLevel ?confidence_level_id .
  ?confidence_level_id rdfs:label ?confidence_level_label .
  BIND(STR(?confidence_level_label) AS ?confidence_level_name)
  ?expr genex:hasExpressionLevel ?expression_level ;
        genex:hasExpressionCondition ?cond .
  ?cond genex:hasDevelopmentalStage ?developmental_stage_id ;
        genex:hasAnatomicalEntity ?anatomical_entity_id .
  ?developmental_stage_id rdfs:label ?developmental_stage_name .
  ?anatomical_entity_id rdfs:label ?anatomical_entity_name .
}",
    );
    query
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_query_type_parsing() {
        assert_eq!("aop".parse::<QueryType>().unwrap(), QueryType::Aop);
        assert_eq!("KE_UPSTREAM".parse::<QueryType>().unwrap(), QueryType::KeUpstream);
        assert!(matches!(
            "gene".parse::<QueryType>(),
            Err(QueryError::UnknownQueryType(t)) if t == "gene"
        ));
    }

    #[test]
    fn test_expand_identifier() {
        assert_eq!(QueryType::Aop.expand_identifier("3"), "https://identifiers.org/aop/3");
        assert_eq!(
            QueryType::Mie.expand_identifier("201"),
            "https://identifiers.org/aop.events/201"
        );
        assert_eq!(
            QueryType::Mie.expand_identifier("<https://identifiers.org/aop.events/201>"),
            "https://identifiers.org/aop.events/201"
        );
    }

    #[test]
    fn test_format_uris() {
        assert_eq!(format_uris(&["http://a", "<http://b>", ""]), "<http://a> <http://b>");
    }

    #[test]
    fn test_format_literals_escapes_quotes() {
        assert_eq!(format_literals(&["liver", "\"heart\"", "a\"b"]), "\"liver\" \"heart\" \"a\\\"b\"");
    }

    #[test]
    fn test_mie_query() {
        let query = aop_identifier_query(QueryType::Mie, "201 https://identifiers.org/aop.events/18", &[]);
        assert!(query.contains(
            "VALUES ?MIE { <https://identifiers.org/aop.events/201> <https://identifiers.org/aop.events/18> }"
        ));
        assert!(query.contains("OPTIONAL"));
        assert!(!query.contains("nci:C25688"));
        assert!(query.trim_end().ends_with('}'));
    }

    #[test]
    fn test_ke_downstream_query() {
        let query = aop_identifier_query(QueryType::KeDownstream, "888", &[]);
        assert!(query.contains("VALUES ?KE_downstream_x { <https://identifiers.org/aop.events/888> }"));
        assert!(query.contains("aopo:has_downstream_key_event ?KE_downstream_x"));
        assert!(!query.contains("OPTIONAL"));
    }

    #[test]
    fn test_status_filter() {
        let statuses = vec!["WPHA/WNT Endorsed".to_string(), "Under Development".to_string()];
        let query = aop_identifier_query(QueryType::Aop, "3", &statuses);
        assert!(query.contains("FILTER(STR(?status) IN (\"WPHA/WNT Endorsed\", \"Under Development\"))"));
    }

    #[test]
    fn test_gene_query_protein_toggle() {
        let kes = ["https://identifiers.org/aop.events/888"];
        let with = gene_query(&kes, true);
        assert!(with.contains("SELECT DISTINCT ?ke ?gene ?protein"));
        assert!(with.contains("edam:data_2291"));

        let without = gene_query(&kes, false);
        assert!(without.contains("SELECT DISTINCT ?ke ?gene WHERE"));
        assert!(!without.contains("?protein"));
    }

    #[test]
    fn test_component_query_go_filter() {
        let kes = ["https://identifiers.org/aop.events/888"];
        assert!(component_query(&kes, true).contains("STRSTARTS(STR(?process), \"http://purl.obolibrary.org/obo/GO_\")"));
        assert!(!component_query(&kes, false).contains("FILTER"));
        assert!(component_query(&kes, false).contains("dc:title ?ke_name"));
    }

    #[test]
    fn test_compound_and_organ_queries() {
        let compound = compound_query(&["https://identifiers.org/aop/3"]);
        assert!(compound.contains("VALUES ?aop { <https://identifiers.org/aop/3> }"));
        assert!(compound.contains("ORDER BY ?compound_name"));

        let organ = organ_query(&["https://identifiers.org/aop.events/888"]);
        assert!(organ.contains("aopo:OrganContext ?organ"));
    }

    #[test]
    fn test_confidence_filter_levels() {
        assert_eq!(confidence_filter(None), "");
        assert_eq!(confidence_filter(Some(10)), "");
        assert!(confidence_filter(Some(90)).contains(CIO_HIGH));
        assert!(!confidence_filter(Some(90)).contains("UNION"));
        assert_eq!(confidence_filter(Some(50)).matches("UNION").count(), 1);
        assert_eq!(confidence_filter(Some(20)).matches("UNION").count(), 2);
    }

    #[test]
    fn test_gene_expression_query() {
        let query = gene_expression_query(&["ENSG00000012048"], &["liver"], Some(80));
        assert!(query.contains("VALUES ?gene_id { \"ENSG00000012048\" }"));
        assert!(query.contains("VALUES ?anatomical_entity_name { \"liver\" }"));
        assert!(query.contains("?expr genex:hasConfidenceLevel obo:CIO_0000029 ."));
    }
}
