use std::fmt::Display;
use std::path::Path;
use std::time::Duration;

use crate::cli::{InitError, TestHelperArgs, TestHelperConfig};
use crate::command::{CommandError, CommandOutput, CommandRunner, Invocation, ProcessRunner};
use crate::k8s::client::{ServiceProfileGetter, SyncK8sClient};
use crate::k8s::service_profile::ServiceProfile;
use crate::k8s::Error as K8sError;
use crate::logging::Logger;
use crate::retry::retry_for;

/// Error returned by the linkerd wrappers of [TestHelper].
#[derive(Debug, thiserror::Error)]
pub enum LinkerdError {
    #[error("command failed: {command}\n{source}\n{stderr}")]
    CommandFailed {
        command: String,
        #[source]
        source: CommandError,
        stdout: String,
        stderr: String,
    },
}

impl LinkerdError {
    /// Standard output of the failed command.
    pub fn stdout(&self) -> &str {
        match self {
            LinkerdError::CommandFailed { stdout, .. } => stdout,
        }
    }
}

/// Entry point of the SMI integration tests: runs the linkerd binary under test and reads the
/// resources it manages from the test cluster.
#[derive(Debug)]
pub struct TestHelper<R = ProcessRunner, G = SyncK8sClient> {
    linkerd: std::path::PathBuf,
    namespace: String,
    k8s_context: String,
    runner: R,
    sp_client: G,
    logger: Logger,
}

impl TestHelper {
    /// Builds the helper from the environment. See [TestHelperArgs] for the available settings.
    pub fn from_env() -> Result<Self, InitError> {
        Self::try_new(TestHelperArgs::from_env()?.validate()?)
    }

    pub fn try_new(config: TestHelperConfig) -> Result<Self, InitError> {
        let sp_client = SyncK8sClient::try_new(&config.k8s_context)?;
        Ok(Self::from_parts(config, ProcessRunner, sp_client))
    }
}

/// Creates the [TestHelper] from the environment or terminates the process, the same way
/// the test binary would when misconfigured.
pub fn init_or_exit() -> TestHelper {
    TestHelper::from_env().unwrap_or_else(|err| {
        eprintln!("{err}");
        std::process::exit(err.exit_code())
    })
}

impl<R, G> TestHelper<R, G>
where
    R: CommandRunner,
    G: ServiceProfileGetter,
{
    pub fn from_parts(config: TestHelperConfig, runner: R, sp_client: G) -> Self {
        Self {
            linkerd: config.linkerd,
            namespace: config.namespace,
            k8s_context: config.k8s_context,
            runner,
            sp_client,
            logger: Logger::new(config.logging),
        }
    }

    pub fn linkerd_path(&self) -> &Path {
        &self.linkerd
    }

    pub fn linkerd_namespace(&self) -> &str {
        &self.namespace
    }

    pub fn k8s_context(&self) -> &str {
        &self.k8s_context
    }

    /// Runs `linkerd <args>` and returns its standard output.
    pub fn linkerd_run<S: AsRef<str>>(&self, args: &[S]) -> Result<String, LinkerdError> {
        self.pipe_to_linkerd_run("", args)
            .map(|output| output.stdout)
            .map_err(|err| command_failed("linkerd", args, err))
    }

    /// Runs `linkerd smi <args>` and returns its standard output.
    pub fn linkerd_smi_run<S: AsRef<str>>(&self, args: &[S]) -> Result<String, LinkerdError> {
        let with_params = ["smi".to_string()]
            .into_iter()
            .chain(self.global_flags())
            .chain(args.iter().map(|arg| arg.as_ref().to_string()));

        self.run(Invocation::new(&self.linkerd).with_args(with_params))
            .map(|output| output.stdout)
            .map_err(|err| command_failed("linkerd smi", args, err))
    }

    /// Runs linkerd with the `--linkerd-namespace` and `--context` flags of the test run followed
    /// by `args`, feeding it `stdin`.
    pub fn pipe_to_linkerd_run<S: AsRef<str>>(
        &self,
        stdin: &str,
        args: &[S],
    ) -> Result<CommandOutput, CommandError> {
        let with_params = self
            .global_flags()
            .into_iter()
            .chain(args.iter().map(|arg| arg.as_ref().to_string()));

        self.run(
            Invocation::new(&self.linkerd)
                .with_args(with_params)
                .with_stdin(stdin),
        )
    }

    pub fn get_service_profile(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ServiceProfile, K8sError> {
        self.logger
            .in_scope(|| self.sp_client.get_service_profile(namespace, name))
    }

    /// [retry_for] logging through this helper's logger.
    pub fn retry_for<F, T, E>(&self, timeout: Duration, f: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: Display,
    {
        self.logger.in_scope(|| retry_for(timeout, f))
    }

    fn run(&self, invocation: Invocation) -> Result<CommandOutput, CommandError> {
        self.logger.in_scope(|| self.runner.run(invocation))
    }

    fn global_flags(&self) -> [String; 3] {
        [
            "--linkerd-namespace".to_string(),
            self.namespace.clone(),
            format!("--context={}", self.k8s_context),
        ]
    }
}

fn command_failed<S: AsRef<str>>(prefix: &str, args: &[S], err: CommandError) -> LinkerdError {
    let args = args.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ");
    LinkerdError::CommandFailed {
        command: format!("{prefix} {args}"),
        stdout: err.stdout().to_string(),
        stderr: err.stderr().to_string(),
        source: err,
    }
}
