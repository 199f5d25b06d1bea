//! Runs the helper against well-known system binaries standing in for linkerd, no cluster needed.
use std::path::Path;
use std::time::Duration;

use linkerd_smi_testutil::cli::TestHelperConfig;
use linkerd_smi_testutil::command::ProcessRunner;
use linkerd_smi_testutil::k8s::client::ServiceProfileGetter;
use linkerd_smi_testutil::k8s::service_profile::{ServiceProfile, ServiceProfileSpec};
use linkerd_smi_testutil::k8s::Error as K8sError;
use linkerd_smi_testutil::logging::LoggingConfig;
use linkerd_smi_testutil::{LinkerdError, TestHelper};

struct EmptyProfiles;

impl ServiceProfileGetter for EmptyProfiles {
    fn get_service_profile(&self, _: &str, name: &str) -> Result<ServiceProfile, K8sError> {
        Ok(ServiceProfile::new(name, ServiceProfileSpec::default()))
    }
}

fn helper_for(binary: &str) -> Option<TestHelper<ProcessRunner, EmptyProfiles>> {
    let linkerd = ["/bin", "/usr/bin"]
        .iter()
        .map(|dir| Path::new(dir).join(binary))
        .find(|path| path.exists())?;

    Some(TestHelper::from_parts(
        TestHelperConfig {
            linkerd,
            namespace: "linkerd".to_string(),
            k8s_context: "kind-smi".to_string(),
            logging: LoggingConfig::from_verbose(true),
        },
        ProcessRunner,
        EmptyProfiles,
    ))
}

#[test]
fn linkerd_run_returns_stdout() {
    let Some(helper) = helper_for("echo") else {
        return;
    };

    let out = helper.linkerd_run(&["viz", "stat", "deploy"]).unwrap();

    assert_eq!(
        out,
        "--linkerd-namespace linkerd --context=kind-smi viz stat deploy\n"
    );
}

#[test]
fn linkerd_smi_run_returns_stdout() {
    let Some(helper) = helper_for("echo") else {
        return;
    };

    let out = helper.linkerd_smi_run(&["version"]).unwrap();

    assert_eq!(out, "smi --linkerd-namespace linkerd --context=kind-smi version\n");
}

#[test]
fn linkerd_run_reports_failures() {
    let Some(helper) = helper_for("false") else {
        return;
    };

    let err = helper.linkerd_run(&["check", "--pre"]).unwrap_err();

    let LinkerdError::CommandFailed { command, source, .. } = &err;
    assert_eq!(command, "linkerd check --pre");
    assert_eq!(source.to_string(), "exit status: 1");
    assert!(err.to_string().starts_with("command failed: linkerd check --pre\n"));
}

#[test]
fn retry_for_gives_up_with_the_last_error() {
    let Some(helper) = helper_for("false") else {
        return;
    };

    let err = helper
        .retry_for(Duration::from_millis(1500), || helper.linkerd_smi_run(&["check"]))
        .unwrap_err();

    assert!(err.to_string().starts_with("command failed: linkerd smi check\n"));
}

#[test]
fn service_profiles_come_from_the_getter() {
    let Some(helper) = helper_for("echo") else {
        return;
    };

    let sp = helper.get_service_profile("smi-test", "backend").unwrap();

    assert_eq!(sp.metadata.name.as_deref(), Some("backend"));
    assert!(helper.linkerd_path().ends_with("echo"));
}
