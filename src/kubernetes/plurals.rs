// Copyright (c) 2025 k8smux contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Kind to REST resource-name mapping.
//!
//! The Kubernetes API addresses resources by their lowercase plural name
//! ("pods", "ingresses"), not by kind. Discovery would give the authoritative
//! answer, but the tunnel path builder must work without talking to the
//! remote cluster, so a fixed table covers the common built-in kinds.
//!
//! Kinds missing from the table fall back to lowercasing the kind and
//! appending "s". That is wrong for irregular plurals (e.g. a CRD kind
//! "NetworkPolicy" would become "networkpolicys"); it is a documented
//! limitation, not something we try to guess around.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Fixed kind -> plural table for built-in kinds.
static PLURALS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("Pod", "pods"),
        ("Service", "services"),
        ("Deployment", "deployments"),
        ("Namespace", "namespaces"),
        ("Node", "nodes"),
        ("ConfigMap", "configmaps"),
        ("Secret", "secrets"),
        ("Event", "events"),
        ("ReplicaSet", "replicasets"),
        ("StatefulSet", "statefulsets"),
        ("DaemonSet", "daemonsets"),
        ("Ingress", "ingresses"),
        ("PersistentVolume", "persistentvolumes"),
        ("PersistentVolumeClaim", "persistentvolumeclaims"),
        ("ServiceAccount", "serviceaccounts"),
        ("Role", "roles"),
        ("RoleBinding", "rolebindings"),
        ("ClusterRole", "clusterroles"),
        ("ClusterRoleBinding", "clusterrolebindings"),
    ])
});

/// Map a kind to its REST plural name.
pub fn plural_for_kind(kind: &str) -> String {
    if let Some(plural) = PLURALS.get(kind) {
        return (*plural).to_string();
    }
    // Naive fallback for unknown kinds: lowercase + "s".
    format!("{}s", kind.to_lowercase())
}

/// Kinds that are cluster-scoped among the built-ins we know about.
/// Used by the local client to pick Api::all vs Api::namespaced.
pub fn is_cluster_scoped(kind: &str) -> bool {
    matches!(
        kind,
        "Namespace" | "Node" | "PersistentVolume" | "ClusterRole" | "ClusterRoleBinding"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_kinds() {
        assert_eq!(plural_for_kind("Pod"), "pods");
        assert_eq!(plural_for_kind("Ingress"), "ingresses");
        assert_eq!(plural_for_kind("PersistentVolumeClaim"), "persistentvolumeclaims");
        assert_eq!(plural_for_kind("ClusterRoleBinding"), "clusterrolebindings");
    }

    #[test]
    fn test_naive_fallback() {
        assert_eq!(plural_for_kind("Certificate"), "certificates");
        // Known-incorrect for irregular plurals; pinned so a change is deliberate.
        assert_eq!(plural_for_kind("NetworkPolicy"), "networkpolicys");
    }

    #[test]
    fn test_cluster_scoped() {
        assert!(is_cluster_scoped("Namespace"));
        assert!(is_cluster_scoped("Node"));
        assert!(!is_cluster_scoped("Pod"));
        assert!(!is_cluster_scoped("Deployment"));
    }
}
