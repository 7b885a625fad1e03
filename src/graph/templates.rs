//! SPARQL query templates.
//!
//! Each backend operation has one template. Placeholders are substituted
//! with escaped request values:
//!
//! | Placeholder   | Value                                   | Escaping        |
//! |---------------|-----------------------------------------|-----------------|
//! | `{resource}`  | the `r` parameter                       | IRI             |
//! | `{text}`      | the `r` parameter                       | string literal  |
//! | `{resources}` | the resource set, as `<iri> <iri> ...`  | IRI             |
//! | `{begin}`     | the `b` parameter                       | string literal  |
//! | `{end}`       | the `e` parameter                       | string literal  |
//! | `{host}`      | the resolved request host               | string literal  |
//!
//! Any other brace sequence is left as-is, so graph patterns need no quoting.

use serde::{Deserialize, Serialize};

use crate::routing::Operation;

/// One SPARQL query template per backend operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryTemplates {
    pub ressetdetails: String,
    pub ressetpeople: String,
    pub details: String,
    pub resdetails: String,
    pub temporal: String,
    pub logo: String,
    pub describe: String,
    pub orgsearch: String,
}

impl QueryTemplates {
    pub fn get(&self, operation: Operation) -> &str {
        match operation {
            Operation::ResourceSetDetails => &self.ressetdetails,
            Operation::ResourceSetPeople => &self.ressetpeople,
            Operation::Details => &self.details,
            Operation::ResourceDetails => &self.resdetails,
            Operation::Temporal => &self.temporal,
            Operation::Logo => &self.logo,
            Operation::Describe => &self.describe,
            Operation::Organizations => &self.orgsearch,
        }
    }
}

const RESSET_DETAILS: &str = r#"PREFIX schema: <https://schema.org/>
SELECT DISTINCT ?s ?name ?description ?url ?link WHERE {
  VALUES ?s { {resources} }
  OPTIONAL { ?s schema:name ?name }
  OPTIONAL { ?s schema:description ?description }
  OPTIONAL { ?s schema:url ?url }
  BIND(CONCAT("https://{host}/id?r=", ENCODE_FOR_URI(STR(?s))) AS ?link)
}"#;

const RESSET_PEOPLE: &str = r#"PREFIX schema: <https://schema.org/>
SELECT DISTINCT ?s ?role ?person ?name WHERE {
  VALUES ?s { {resources} }
  VALUES ?role { schema:creator schema:author schema:contributor }
  ?s ?role ?person .
  OPTIONAL { ?person schema:name ?name }
}"#;

const DETAILS: &str = r#"PREFIX schema: <https://schema.org/>
SELECT DISTINCT ?name ?description ?url ?datePublished ?link WHERE {
  OPTIONAL { <{resource}> schema:name ?name }
  OPTIONAL { <{resource}> schema:description ?description }
  OPTIONAL { <{resource}> schema:url ?url }
  OPTIONAL { <{resource}> schema:datePublished ?datePublished }
  BIND(CONCAT("https://{host}/id?r=", ENCODE_FOR_URI("{text}")) AS ?link)
}"#;

const RES_DETAILS: &str = r#"PREFIX schema: <https://schema.org/>
SELECT DISTINCT ?parameter ?name ?unit ?description WHERE {
  <{resource}> schema:variableMeasured ?parameter .
  OPTIONAL { ?parameter schema:name ?name }
  OPTIONAL { ?parameter schema:unitText ?unit }
  OPTIONAL { ?parameter schema:description ?description }
}"#;

const TEMPORAL: &str = r#"PREFIX schema: <https://schema.org/>
SELECT DISTINCT ?s ?coverage WHERE {
  ?s schema:temporalCoverage ?coverage .
  FILTER(STR(?coverage) >= "{begin}" && STR(?coverage) <= "{end}")
}"#;

const LOGO: &str = r#"PREFIX schema: <https://schema.org/>
SELECT DISTINCT ?logo WHERE {
  { <{resource}> schema:logo ?logo }
  UNION
  { <{resource}> schema:publisher/schema:logo ?logo }
}"#;

const DESCRIBE: &str = r#"SELECT ?p ?o WHERE {
  <{resource}> ?p ?o
}"#;

const ORGSEARCH: &str = r#"PREFIX schema: <https://schema.org/>
SELECT DISTINCT ?org ?name ?description WHERE {
  ?org a schema:Organization ;
       schema:name ?name .
  OPTIONAL { ?org schema:description ?description }
  FILTER(CONTAINS(LCASE(CONCAT(STR(?name), " ", COALESCE(STR(?description), ""))), LCASE("{text}")))
}"#;

impl Default for QueryTemplates {
    fn default() -> Self {
        Self {
            ressetdetails: RESSET_DETAILS.to_string(),
            ressetpeople: RESSET_PEOPLE.to_string(),
            details: DETAILS.to_string(),
            resdetails: RES_DETAILS.to_string(),
            temporal: TEMPORAL.to_string(),
            logo: LOGO.to_string(),
            describe: DESCRIBE.to_string(),
            orgsearch: ORGSEARCH.to_string(),
        }
    }
}

/// Request values available to a template.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryArgs<'a> {
    pub resource: &'a str,
    pub resources: &'a [String],
    pub begin: &'a str,
    pub end: &'a str,
    pub host: &'a str,
}

/// Substitute the known placeholders in `template`.
pub fn render(template: &str, args: &QueryArgs<'_>) -> String {
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let value = placeholder(&after[..close], args)?;
            Some((value, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(&value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn placeholder(name: &str, args: &QueryArgs<'_>) -> Option<String> {
    let value = match name {
        "resource" => escape_iri(args.resource),
        "text" => escape_literal(args.resource),
        "resources" => args
            .resources
            .iter()
            .map(|r| format!("<{}>", escape_iri(r)))
            .collect::<Vec<_>>()
            .join(" "),
        "begin" => escape_literal(args.begin),
        "end" => escape_literal(args.end),
        "host" => escape_literal(args.host),
        _ => return None,
    };
    Some(value)
}

/// Percent-encode characters not allowed inside a SPARQL `IRIREF`.
pub fn escape_iri(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c <= ' ' || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\') {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{byte:02X}"));
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Escape a value for use between double quotes in a SPARQL literal.
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
