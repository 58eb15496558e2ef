//! End-to-end tests for the forwarding path.
//!
//! The mock server plays both roles the hub normally plays: it serves the
//! route-discovery object (whose spec.host points back at the mock itself)
//! and the forwarded Kubernetes API paths behind `/{cluster}`. The local
//! kubeconfig points at a dead address, so any operation that reaches the
//! local cluster fails loudly; tests use that to prove nothing is misrouted.

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::str::contains;
use std::fs;
use tempfile::TempDir;

const ROUTE_PATH: &str =
    "/apis/route.openshift.io/v1/namespaces/multicluster-engine/routes/cluster-proxy-addon-user";

/// Minimal kubeconfig pointing at a dead local API server.
fn write_kubeconfig(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("kubeconfig");
    fs::write(
        &path,
        concat!(
            "apiVersion: v1\n",
            "kind: Config\n",
            "clusters:\n",
            "- cluster:\n",
            "    server: http://127.0.0.1:1\n",
            "  name: dead\n",
            "contexts:\n",
            "- context:\n",
            "    cluster: dead\n",
            "    user: dead\n",
            "  name: dead\n",
            "current-context: dead\n",
            "users:\n",
            "- name: dead\n",
            "  user:\n",
            "    token: unused\n",
        ),
    )
    .expect("write kubeconfig");
    path
}

fn k8smux(server: &MockServer, kubeconfig: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("k8smux").expect("k8smux binary");
    cmd.env("KUBECONFIG", kubeconfig)
        .env_remove("K8SMUX_TOKEN")
        .env("HOME", kubeconfig.parent().unwrap())
        .arg("--multi-cluster")
        .arg("--hub-url")
        .arg(server.base_url())
        .arg("--token")
        .arg("test-token");
    cmd
}

fn mock_route(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET)
            .path(ROUTE_PATH)
            .header("authorization", "Bearer test-token");
        then.status(200)
            .json_body(serde_json::json!({"spec": {"host": server.address().to_string()}}));
    })
}

#[test]
fn forwarded_pod_list_hits_route_based_url() {
    let server = MockServer::start();
    let tmp = TempDir::new().unwrap();
    let kubeconfig = write_kubeconfig(&tmp);

    let route = mock_route(&server);
    let pods = server.mock(|when, then| {
        when.method(GET)
            .path("/c1/api/v1/namespaces/ns/pods")
            .header("authorization", "Bearer test-token")
            .header("accept", "application/json");
        then.status(200).json_body(serde_json::json!({
            "kind": "PodList",
            "items": [{"metadata": {"name": "web-0", "namespace": "ns"}}]
        }));
    });

    k8smux(&server, &kubeconfig)
        .args(["pods", "-n", "ns", "--cluster", "c1", "-o", "json"])
        .assert()
        .success()
        .stdout(contains("web-0"));

    route.assert();
    pods.assert();
}

#[test]
fn forwarded_list_encodes_label_selector() {
    let server = MockServer::start();
    let tmp = TempDir::new().unwrap();
    let kubeconfig = write_kubeconfig(&tmp);

    mock_route(&server);
    let pods = server.mock(|when, then| {
        when.method(GET)
            .path("/c1/api/v1/namespaces/ns/pods")
            .query_param("labelSelector", "app=foo");
        then.status(200)
            .json_body(serde_json::json!({"kind": "PodList", "items": []}));
    });

    k8smux(&server, &kubeconfig)
        .args(["pods", "-n", "ns", "-l", "app=foo", "--cluster", "c1", "-o", "json"])
        .assert()
        .success();

    pods.assert();
}

#[test]
fn remote_404_reports_status_and_cluster() {
    let server = MockServer::start();
    let tmp = TempDir::new().unwrap();
    let kubeconfig = write_kubeconfig(&tmp);

    mock_route(&server);
    server.mock(|when, then| {
        when.method(GET).path("/c1/api/v1/namespaces/ns/pods");
        then.status(404).body("pods not found");
    });

    k8smux(&server, &kubeconfig)
        .args(["pods", "-n", "ns", "--cluster", "c1"])
        .assert()
        .failure()
        .stderr(contains("404"))
        .stderr(contains("c1"))
        .stderr(contains("pods not found"));
}

#[test]
fn malformed_json_response_is_decode_error() {
    let server = MockServer::start();
    let tmp = TempDir::new().unwrap();
    let kubeconfig = write_kubeconfig(&tmp);

    mock_route(&server);
    server.mock(|when, then| {
        when.method(GET).path("/c1/api/v1/namespaces/ns/pods");
        then.status(200).body("<html>not json</html>");
    });

    k8smux(&server, &kubeconfig)
        .args(["pods", "-n", "ns", "--cluster", "c1"])
        .assert()
        .failure()
        .stderr(contains("invalid JSON response"));
}

#[test]
fn missing_route_host_surfaces_discovery_error() {
    let server = MockServer::start();
    let tmp = TempDir::new().unwrap();
    let kubeconfig = write_kubeconfig(&tmp);

    server.mock(|when, then| {
        when.method(GET).path(ROUTE_PATH);
        then.status(200).json_body(serde_json::json!({"spec": {}}));
    });

    k8smux(&server, &kubeconfig)
        .args(["pods", "-n", "ns", "--cluster", "c1"])
        .assert()
        .failure()
        .stderr(contains("tunnel route not discovered"))
        .stderr(contains("c1"));
}

#[test]
fn forwarded_logs_use_log_subresource_with_tail() {
    let server = MockServer::start();
    let tmp = TempDir::new().unwrap();
    let kubeconfig = write_kubeconfig(&tmp);

    mock_route(&server);
    let logs = server.mock(|when, then| {
        when.method(GET)
            .path("/c1/api/v1/namespaces/ns/pods/web-0/log")
            .query_param("container", "app")
            .query_param("tailLines", "50")
            .header("accept", "text/plain");
        then.status(200).body("line one\nline two\n");
    });

    k8smux(&server, &kubeconfig)
        .args([
            "logs", "web-0", "-n", "ns", "-C", "app", "--tail", "50", "--cluster", "c1",
        ])
        .assert()
        .success()
        .stdout(contains("line two"));

    logs.assert();
}

#[test]
fn forwarded_delete_is_rejected_not_run_locally() {
    let server = MockServer::start();
    let tmp = TempDir::new().unwrap();
    let kubeconfig = write_kubeconfig(&tmp);

    let route = mock_route(&server);

    k8smux(&server, &kubeconfig)
        .args(["delete", "Pod", "web-0", "-n", "ns", "--cluster", "c1"])
        .assert()
        .failure()
        .stderr(contains("delete is not supported over the tunnel"))
        .stderr(contains("c1"));

    // The rejection happens at the decision layer; nothing reaches the wire.
    route.assert_hits(0);
}

#[test]
fn no_cluster_argument_never_touches_the_tunnel() {
    let server = MockServer::start();
    let tmp = TempDir::new().unwrap();
    let kubeconfig = write_kubeconfig(&tmp);

    let route = mock_route(&server);

    // Local execution fails (dead kubeconfig server), but the point is that
    // the tunnel stays untouched.
    k8smux(&server, &kubeconfig)
        .args(["pods", "-n", "ns"])
        .assert()
        .failure()
        .stderr(contains("Failed to list Pod"));

    route.assert_hits(0);
}

#[test]
fn forwarding_disabled_routes_local_even_with_cluster() {
    let server = MockServer::start();
    let tmp = TempDir::new().unwrap();
    let kubeconfig = write_kubeconfig(&tmp);

    let route = mock_route(&server);

    let mut cmd = Command::cargo_bin("k8smux").expect("k8smux binary");
    cmd.env("KUBECONFIG", &kubeconfig)
        .env_remove("K8SMUX_TOKEN")
        .env("HOME", kubeconfig.parent().unwrap());
    // No --multi-cluster: the cluster argument is present but the gate is closed.
    cmd.args(["pods", "-n", "ns", "--cluster", "c1"])
        .assert()
        .failure()
        .stderr(contains("Failed to list Pod"));

    route.assert_hits(0);
}

#[test]
fn clusters_subcommand_lists_managed_cluster_names() {
    let server = MockServer::start();
    let tmp = TempDir::new().unwrap();
    let kubeconfig = write_kubeconfig(&tmp);

    let list = server.mock(|when, then| {
        when.method(GET)
            .path("/apis/cluster.open-cluster-management.io/v1/managedclusters")
            .header("authorization", "Bearer test-token");
        then.status(200).json_body(serde_json::json!({
            "kind": "ManagedClusterList",
            "items": [
                {"metadata": {"name": "c1"}},
                {"metadata": {"name": "c2"}},
            ]
        }));
    });

    k8smux(&server, &kubeconfig)
        .arg("clusters")
        .assert()
        .success()
        .stdout(contains("c1"))
        .stdout(contains("c2"));

    list.assert();
}

#[test]
fn validate_probes_cluster_api_root_through_tunnel() {
    let server = MockServer::start();
    let tmp = TempDir::new().unwrap();
    let kubeconfig = write_kubeconfig(&tmp);

    mock_route(&server);
    let probe = server.mock(|when, then| {
        when.method(GET).path("/c1/api/v1");
        then.status(200)
            .json_body(serde_json::json!({"kind": "APIResourceList", "resources": []}));
    });

    k8smux(&server, &kubeconfig)
        .args(["validate", "c1"])
        .assert()
        .success()
        .stdout(contains("reachable"));

    probe.assert();
}

#[test]
fn get_forwards_to_named_group_path() {
    let server = MockServer::start();
    let tmp = TempDir::new().unwrap();
    let kubeconfig = write_kubeconfig(&tmp);

    mock_route(&server);
    let deploy = server.mock(|when, then| {
        when.method(GET)
            .path("/c1/apis/apps/v1/namespaces/ns/deployments/web");
        then.status(200).json_body(serde_json::json!({
            "kind": "Deployment",
            "metadata": {"name": "web", "namespace": "ns"}
        }));
    });

    k8smux(&server, &kubeconfig)
        .args([
            "get",
            "Deployment",
            "web",
            "--api-version",
            "apps/v1",
            "-n",
            "ns",
            "--cluster",
            "c1",
            "-o",
            "yaml",
        ])
        .assert()
        .success()
        .stdout(contains("name: web"));

    deploy.assert();
}
