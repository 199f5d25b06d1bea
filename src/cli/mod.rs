//! Configuration of the integration test run.
//!
//! Every flag can also be set through an environment variable, since `cargo test` owns the
//! command line of the test binaries.
use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::Parser;

use crate::k8s::Error as K8sError;
use crate::logging::LoggingConfig;

/// All possible errors that can happen while setting up the test helper.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("integration tests not enabled: enable with --integration-tests")]
    NotEnabled,

    #[error("--linkerd flag is required")]
    MissingLinkerd,

    #[error("--linkerd path must be absolute: {}", .0.display())]
    LinkerdNotAbsolute(PathBuf),

    #[error("--linkerd binary does not exist: {}", .0.display())]
    LinkerdNotFound(PathBuf),

    #[error("error creating kubernetes client: {0}")]
    K8sClient(#[from] K8sError),

    #[error("invalid arguments: {0}")]
    Args(#[from] clap::Error),
}

impl InitError {
    /// Exit code of a test binary which cannot go on. A run with integration tests disabled is
    /// not a failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            InitError::NotEnabled => 0,
            InitError::Args(err) => err.exit_code(),
            _ => 1,
        }
    }
}

/// Flags of the linkerd SMI integration tests, as parsed by [`clap`].
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "linkerd-smi-tests", about, long_about = None)]
pub struct TestHelperArgs {
    /// Kubernetes context associated with the test cluster
    #[arg(long, env = "LINKERD_TEST_K8S_CONTEXT", default_value = "")]
    pub k8s_context: String,

    /// Path to the linkerd binary to test
    #[arg(long, env = "LINKERD_TEST_BINARY")]
    pub linkerd: Option<PathBuf>,

    /// The namespace where linkerd is installed
    #[arg(long, env = "LINKERD_TEST_NAMESPACE", default_value = "linkerd")]
    pub linkerd_namespace: String,

    /// Turn on debug logging
    #[arg(long, env = "LINKERD_TEST_VERBOSE", value_parser = BoolishValueParser::new())]
    pub verbose: bool,

    /// Must be provided to run the integration tests
    #[arg(long, env = "LINKERD_TEST_INTEGRATION", value_parser = BoolishValueParser::new())]
    pub integration_tests: bool,
}

/// Validated [TestHelperArgs].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestHelperConfig {
    pub linkerd: PathBuf,
    pub namespace: String,
    pub k8s_context: String,
    pub logging: LoggingConfig,
}

impl TestHelperArgs {
    /// Reads the configuration from the environment only.
    pub fn from_env() -> Result<Self, InitError> {
        Ok(Self::try_parse_from(["linkerd-smi-tests"])?)
    }

    pub fn validate(self) -> Result<TestHelperConfig, InitError> {
        if !self.integration_tests {
            return Err(InitError::NotEnabled);
        }

        let linkerd = self
            .linkerd
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(InitError::MissingLinkerd)?;

        if !linkerd.is_absolute() {
            return Err(InitError::LinkerdNotAbsolute(linkerd));
        }

        if !linkerd.exists() {
            return Err(InitError::LinkerdNotFound(linkerd));
        }

        Ok(TestHelperConfig {
            linkerd,
            namespace: self.linkerd_namespace,
            k8s_context: self.k8s_context,
            logging: LoggingConfig::from_verbose(self.verbose),
        })
    }
}
