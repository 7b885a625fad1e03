//! Route table definitions.
//!
//! # Responsibilities
//! - Declare the production and development surfaces
//! - Bind each (method, path) to one backend operation
//! - Describe parameters and media types for documentation
//!
//! # Design Decisions
//! - Tables are plain values built at startup, never mutated
//! - Every operation appears in exactly one table

use serde::Serialize;

/// Media type for JSON request and response bodies.
pub const MIME_JSON: &str = "application/json";

/// Media type of the form-framed POST bodies.
pub const MIME_FORM: &str = "application/x-www-form-urlencoded";

/// Backend operation classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    #[serde(rename = "ResourceSetCall")]
    ResourceSetDetails,
    #[serde(rename = "ResourceSetPeopleCall")]
    ResourceSetPeople,
    #[serde(rename = "Details")]
    Details,
    #[serde(rename = "ResourceCall")]
    ResourceDetails,
    #[serde(rename = "Temporal")]
    Temporal,
    #[serde(rename = "Logo")]
    Logo,
    #[serde(rename = "Describe")]
    Describe,
    #[serde(rename = "Organizations")]
    Organizations,
}

/// How a backend operation hands back its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultShape {
    /// A value the gateway serializes to JSON.
    Structured,
    /// Pre-serialized JSON bytes written as-is.
    Raw,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::ResourceSetDetails,
        Operation::ResourceSetPeople,
        Operation::Details,
        Operation::ResourceDetails,
        Operation::Temporal,
        Operation::Logo,
        Operation::Describe,
        Operation::Organizations,
    ];

    /// Stable operation name used in docs, logs and metrics.
    pub fn name(self) -> &'static str {
        match self {
            Operation::ResourceSetDetails => "ResourceSetCall",
            Operation::ResourceSetPeople => "ResourceSetPeopleCall",
            Operation::Details => "Details",
            Operation::ResourceDetails => "ResourceCall",
            Operation::Temporal => "Temporal",
            Operation::Logo => "Logo",
            Operation::Describe => "Describe",
            Operation::Organizations => "Organizations",
        }
    }

    /// Key of this operation's query template in `[sparql.queries]`.
    pub fn template_key(self) -> &'static str {
        match self {
            Operation::ResourceSetDetails => "ressetdetails",
            Operation::ResourceSetPeople => "ressetpeople",
            Operation::Details => "details",
            Operation::ResourceDetails => "resdetails",
            Operation::Temporal => "temporal",
            Operation::Logo => "logo",
            Operation::Describe => "describe",
            Operation::Organizations => "orgsearch",
        }
    }

    pub fn shape(self) -> ResultShape {
        match self {
            Operation::Organizations => ResultShape::Raw,
            _ => ResultShape::Structured,
        }
    }
}

/// HTTP methods used by the gateway routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RouteMethod {
    Get,
    Post,
}

/// Where a route parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Query,
    Body,
}

/// A declared route parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    pub kind: ParamKind,
    pub name: &'static str,
    pub description: &'static str,
    pub data_type: &'static str,
}

impl ParamSpec {
    pub fn query(name: &'static str, description: &'static str) -> Self {
        Self {
            kind: ParamKind::Query,
            name,
            description,
            data_type: "string",
        }
    }

    pub fn body(name: &'static str, description: &'static str) -> Self {
        Self {
            kind: ParamKind::Body,
            name,
            description,
            data_type: "string",
        }
    }
}

/// One (method, path) binding within a surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSpec {
    pub method: RouteMethod,
    pub path: &'static str,
    pub operation: Operation,
    pub doc: &'static str,
    pub params: Vec<ParamSpec>,
    pub consumes: &'static str,
    pub produces: &'static str,
}

impl RouteSpec {
    fn get(path: &'static str, operation: Operation, doc: &'static str) -> Self {
        Self {
            method: RouteMethod::Get,
            path,
            operation,
            doc,
            params: Vec::new(),
            consumes: MIME_JSON,
            produces: MIME_JSON,
        }
    }

    fn post(path: &'static str, operation: Operation, doc: &'static str) -> Self {
        Self {
            method: RouteMethod::Post,
            path,
            operation,
            doc,
            params: Vec::new(),
            consumes: MIME_FORM,
            produces: MIME_JSON,
        }
    }

    fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn shape(&self) -> ResultShape {
        self.operation.shape()
    }
}

/// The two mounted service surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Production,
    Development,
}

impl Surface {
    pub fn prefix(self) -> &'static str {
        match self {
            Surface::Production => "/api/v1/graph",
            Surface::Development => "/api/dev/graph",
        }
    }

    pub fn doc(self) -> &'static str {
        match self {
            Surface::Production => "Graph query services",
            Surface::Development => "DEV: Graph query services",
        }
    }
}

/// A surface and the routes mounted under its prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteTable {
    pub surface: Surface,
    pub path: &'static str,
    pub doc: &'static str,
    pub routes: Vec<RouteSpec>,
}

impl RouteTable {
    fn new(surface: Surface, routes: Vec<RouteSpec>) -> Self {
        Self {
            surface,
            path: surface.prefix(),
            doc: surface.doc(),
            routes,
        }
    }

    /// Routes under `/api/v1/graph`.
    pub fn production() -> Self {
        Self::new(
            Surface::Production,
            vec![
                RouteSpec::post(
                    "/ressetdetails",
                    Operation::ResourceSetDetails,
                    "Call for details on an array of resources from the triplestore (graph)",
                )
                .param(ParamSpec::body(
                    "body",
                    "The body containing an array of URIs to obtain parameter values from",
                )),
                RouteSpec::post(
                    "/ressetpeople",
                    Operation::ResourceSetPeople,
                    "Call for people associated with an array of resources from the triplestore (graph)",
                )
                .param(ParamSpec::body(
                    "body",
                    "The body containing an array of URIs to obtain people relation values from",
                )),
                RouteSpec::get(
                    "/details",
                    Operation::Details,
                    "Call for details on a resource from the triplestore (graph)",
                )
                .param(ParamSpec::query("r", "Resource ID")),
                RouteSpec::get(
                    "/resdetails",
                    Operation::ResourceDetails,
                    "Call for measurement and parameter details",
                )
                .param(ParamSpec::query("r", "Resource ID")),
            ],
        )
    }

    /// Routes under `/api/dev/graph`.
    pub fn development() -> Self {
        Self::new(
            Surface::Development,
            vec![
                RouteSpec::get(
                    "/temporal",
                    Operation::Temporal,
                    "Dev call for temporal data in the graph",
                )
                .param(ParamSpec::query("b", "Begin of the time range"))
                .param(ParamSpec::query("e", "End of the time range")),
                RouteSpec::get(
                    "/logo",
                    Operation::Logo,
                    "Call for logo URL on a resource from the triplestore (graph)",
                )
                .param(ParamSpec::query("r", "Resource ID")),
                RouteSpec::get("/describe", Operation::Describe, "Describe a triple store resource")
                    .param(ParamSpec::query("r", "Resource ID")),
                RouteSpec::get(
                    "/orgsearch",
                    Operation::Organizations,
                    "Search an organization based on its description",
                )
                .param(ParamSpec::query("r", "Search text")),
            ],
        )
    }

    /// Absolute path of a route in this table.
    pub fn full_path(&self, route: &RouteSpec) -> String {
        format!("{}{}", self.path, route.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_surfaces_are_disjoint_and_cover_every_operation() {
        let prod = RouteTable::production();
        let dev = RouteTable::development();

        assert_eq!(prod.routes.len(), 4);
        assert_eq!(dev.routes.len(), 4);

        let mut seen = HashSet::new();
        for route in prod.routes.iter().chain(dev.routes.iter()) {
            assert!(seen.insert(route.operation), "{:?} bound twice", route.operation);
        }
        assert_eq!(seen.len(), Operation::ALL.len());
    }

    #[test]
    fn test_post_routes_take_a_form_body() {
        let prod = RouteTable::production();
        let posts: Vec<_> = prod
            .routes
            .iter()
            .filter(|r| r.method == RouteMethod::Post)
            .collect();

        assert_eq!(posts.len(), 2);
        for route in posts {
            assert_eq!(route.consumes, MIME_FORM);
            assert_eq!(route.params.len(), 1);
            assert_eq!(route.params[0].kind, ParamKind::Body);
            assert_eq!(route.params[0].name, "body");
        }
    }

    #[test]
    fn test_full_paths() {
        let dev = RouteTable::development();
        let paths: Vec<_> = dev.routes.iter().map(|r| dev.full_path(r)).collect();
        assert_eq!(
            paths,
            vec![
                "/api/dev/graph/temporal",
                "/api/dev/graph/logo",
                "/api/dev/graph/describe",
                "/api/dev/graph/orgsearch",
            ]
        );
    }

    #[test]
    fn test_only_orgsearch_is_raw() {
        let raw: Vec<_> = Operation::ALL
            .into_iter()
            .filter(|op| op.shape() == ResultShape::Raw)
            .collect();
        assert_eq!(raw, vec![Operation::Organizations]);
    }

    #[test]
    fn test_table_serializes_operation_names() {
        let json = serde_json::to_value(RouteTable::production()).unwrap();
        assert_eq!(json["path"], "/api/v1/graph");
        assert_eq!(json["routes"][0]["method"], "POST");
        assert_eq!(json["routes"][0]["operation"], "ResourceSetCall");
        assert_eq!(json["routes"][2]["params"][0]["kind"], "query");
    }
}
