use std::error::Error;
use std::time::Duration;

use crate::common::{kubectl, test_helper, TestNamespace};

const NAMESPACE: &str = "linkerd-smi-traffic-split-test";

fn manifests(ns: &str) -> String {
    format!(
        r#"
apiVersion: v1
kind: Service
metadata:
  name: backend-svc
  namespace: {ns}
spec:
  selector:
    app: backend
  ports:
  - port: 8080
---
apiVersion: v1
kind: Service
metadata:
  name: failing-svc
  namespace: {ns}
spec:
  selector:
    app: failing
  ports:
  - port: 8080
---
apiVersion: split.smi-spec.io/v1alpha2
kind: TrafficSplit
metadata:
  name: backend-split
  namespace: {ns}
spec:
  service: backend-svc
  backends:
  - service: backend-svc
    weight: 500
  - service: failing-svc
    weight: 500
"#
    )
}

#[test]
#[ignore = "needs k8s cluster"]
fn traffic_split_is_reflected_in_service_profile() {
    let Some(helper) = test_helper() else {
        return;
    };
    let ns = TestNamespace::create(&helper, NAMESPACE);

    kubectl(&helper, &manifests(&ns.name), &["apply", "-f", "-"])
        .unwrap_or_else(|err| panic!("applying TrafficSplit: {err}\n{}", err.stderr()));

    let sp_name = format!("backend-svc.{}.svc.cluster.local", ns.name);
    let expected = [
        format!("backend-svc.{}.svc.cluster.local:8080", ns.name),
        format!("failing-svc.{}.svc.cluster.local:8080", ns.name),
    ];

    helper
        .retry_for(Duration::from_secs(60), || -> Result<(), Box<dyn Error>> {
            let sp = helper.get_service_profile(&ns.name, &sp_name)?;
            let mut authorities = sp
                .spec
                .dst_overrides
                .iter()
                .map(|dst| dst.authority.clone())
                .collect::<Vec<_>>();
            authorities.sort();
            if authorities != expected {
                return Err(format!("unexpected dstOverrides authorities: {authorities:?}").into());
            }
            Ok(())
        })
        .unwrap_or_else(|err| panic!("ServiceProfile {sp_name} never matched: {err}"));
}
