mod client;
pub mod plurals;

pub use client::LocalClient;

use std::fmt;

/// Group/version/kind identifying a Kubernetes resource type.
/// An empty group means the core API group (`/api/v1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gvk {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl Gvk {
    pub fn new(group: &str, version: &str, kind: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Core v1 shorthand (Pod, Namespace, ...).
    pub fn core(kind: &str) -> Self {
        Self::new("", "v1", kind)
    }

    /// Parse an `apiVersion` string ("v1", "apps/v1") plus a kind.
    pub fn from_api_version(api_version: &str, kind: &str) -> Self {
        match api_version.split_once('/') {
            Some((group, version)) => Self::new(group, version, kind),
            None => Self::new("", api_version, kind),
        }
    }
}

/// The operation kind carried by a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    List,
    Get,
    Create,
    Update,
    Delete,
    Logs,
}

impl Verb {
    /// True for verbs that change cluster state.
    pub fn is_mutating(self) -> bool {
        matches!(self, Verb::Create | Verb::Update | Verb::Delete)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verb::List => "list",
            Verb::Get => "get",
            Verb::Create => "create",
            Verb::Update => "update",
            Verb::Delete => "delete",
            Verb::Logs => "logs",
        };
        f.write_str(s)
    }
}

/// Options for a pod log request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Container to read from; None lets the API server pick the default.
    pub container: Option<String>,
    /// Tail-line count; 0 means "from the beginning" and omits the parameter.
    pub tail_lines: i64,
}

/// A fully-validated description of one API operation, immutable once built
/// from caller arguments. The dispatcher routes it, the path builder turns it
/// into a REST path, and the local client executes it directly.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDescriptor {
    pub verb: Verb,
    pub gvk: Option<Gvk>,
    pub namespace: Option<String>,
    pub name: Option<String>,
    pub label_selector: Option<String>,
    pub log: Option<LogOptions>,
}

impl OperationDescriptor {
    pub fn new(verb: Verb, gvk: Gvk) -> Self {
        Self {
            verb,
            gvk: Some(gvk),
            namespace: None,
            name: None,
            label_selector: None,
            log: None,
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn label_selector(mut self, selector: impl Into<String>) -> Self {
        self.label_selector = Some(selector.into());
        self
    }

}
