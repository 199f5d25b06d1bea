use std::time::Duration;

use crate::common::test_helper;

#[test]
#[ignore = "needs k8s cluster"]
fn smi_extension_is_healthy() {
    let Some(helper) = test_helper() else {
        return;
    };

    let out = helper
        .retry_for(Duration::from_secs(120), || helper.linkerd_smi_run(&["check"]))
        .unwrap_or_else(|err| panic!("'linkerd smi check' command failed: {err}"));

    assert!(out.contains("linkerd-smi"), "unexpected output:\n{out}");
}

#[test]
#[ignore = "needs k8s cluster"]
fn linkerd_version_reports_client_and_server() {
    let Some(helper) = test_helper() else {
        return;
    };

    let out = helper
        .linkerd_run(&["version"])
        .unwrap_or_else(|err| panic!("'linkerd version' command failed: {err}"));

    assert!(out.contains("Client version"), "unexpected output:\n{out}");
    assert!(out.contains("Server version"), "unexpected output:\n{out}");
}
