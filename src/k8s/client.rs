use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use k8s_openapi::NamespaceResourceScope;
use kube::config::KubeConfigOptions;
use kube::{Api, Client, Config, Resource};
use serde::de::DeserializeOwned;
use tokio::runtime::Runtime;
use tracing::debug;

use super::error::K8sError;
use super::service_profile::ServiceProfile;

/// Constructs a new Kubernetes client for the given kubeconfig context.
///
/// This will respect the `$KUBECONFIG` envvar, but otherwise default to `~/.kube/config`.
/// An empty `k8s_context` selects the current context of the kubeconfig.
pub async fn create_client(k8s_context: &str) -> Result<Client, K8sError> {
    debug!(k8s_context, "loading kubeconfig for k8s client");
    let options = KubeConfigOptions {
        context: (!k8s_context.is_empty()).then(|| k8s_context.to_string()),
        ..Default::default()
    };

    let config = Config::from_kubeconfig(&options).await?;
    let client = Client::try_from(config)?;
    debug!("k8s client creation succeeded");
    Ok(client)
}

/// Read access to `ServiceProfile` resources.
#[cfg_attr(test, mockall::automock)]
pub trait ServiceProfileGetter {
    fn get_service_profile(&self, namespace: &str, name: &str)
        -> Result<ServiceProfile, K8sError>;
}

/// Blocking wrapper over a [kube::Client]. Each call is driven to completion on the owned
/// runtime, so it must not be used from within another tokio runtime.
pub struct SyncK8sClient {
    client: Client,
    runtime: Arc<Runtime>,
}

impl Debug for SyncK8sClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncK8sClient")
            .field("client", &"kube::Client")
            .field("runtime", &self.runtime)
            .finish()
    }
}

impl SyncK8sClient {
    pub fn try_new(k8s_context: &str) -> Result<Self, K8sError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("k8s-client")
            .enable_all()
            .build()
            .map_err(K8sError::UnableToSetupClient)?;

        Self::try_new_with_runtime(Arc::new(runtime), k8s_context)
    }

    pub fn try_new_with_runtime(runtime: Arc<Runtime>, k8s_context: &str) -> Result<Self, K8sError> {
        Ok(Self {
            client: runtime.block_on(create_client(k8s_context))?,
            runtime,
        })
    }

    /// Gets the namespaced resource `name` of kind `K`.
    pub fn get_namespaced<K>(&self, namespace: &str, name: &str) -> Result<K, K8sError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        Ok(self.runtime.block_on(api.get(name))?)
    }
}

impl ServiceProfileGetter for SyncK8sClient {
    fn get_service_profile(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ServiceProfile, K8sError> {
        self.get_namespaced(namespace, name)
    }
}
