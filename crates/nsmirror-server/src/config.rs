//! Process configuration.
//!
//! The only required value is the source namespace to watch. Without it the
//! process must not proceed.

/// How the source namespace was determined.
#[derive(Debug, Clone, Copy)]
pub enum NamespaceSource {
    /// From the --namespace CLI argument
    CliArgument,
    /// From the NAMESPACE environment variable
    EnvironmentVariable,
}

impl std::fmt::Display for NamespaceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--namespace)"),
            Self::EnvironmentVariable => write!(f, "environment variable (NAMESPACE)"),
        }
    }
}

/// Configuration errors. All fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Neither --namespace nor NAMESPACE provided a value.
    #[error("no source namespace specified: pass --namespace <name> or set NAMESPACE")]
    MissingSourceNamespace,
}

/// Resolved process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace whose secrets are watched and replicated out.
    pub source_namespace: String,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// Priority order:
    /// 1. CLI argument: --namespace <name>
    /// 2. Environment variable: NAMESPACE
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingSourceNamespace` when neither source
    /// yields a non-empty value.
    pub fn load() -> Result<(Self, NamespaceSource), ConfigError> {
        let cli = parse_namespace_arg(std::env::args().skip(1));
        let env = std::env::var("NAMESPACE").ok();
        let (source_namespace, source) = resolve_source_namespace(cli, env)?;
        Ok((Self { source_namespace }, source))
    }
}

/// Picks the source namespace from the candidate values, CLI first.
/// Empty strings count as absent.
fn resolve_source_namespace(
    cli: Option<String>,
    env: Option<String>,
) -> Result<(String, NamespaceSource), ConfigError> {
    if let Some(ns) = cli.filter(|s| !s.is_empty()) {
        return Ok((ns, NamespaceSource::CliArgument));
    }
    if let Some(ns) = env.filter(|s| !s.is_empty()) {
        return Ok((ns, NamespaceSource::EnvironmentVariable));
    }
    Err(ConfigError::MissingSourceNamespace)
}

/// Extracts the value of `--namespace <name>` or `--namespace=<name>`.
fn parse_namespace_arg(mut args: impl Iterator<Item = String>) -> Option<String> {
    while let Some(arg) = args.next() {
        if arg == "--namespace" {
            return args.next();
        }
        if let Some(value) = arg.strip_prefix("--namespace=") {
            return Some(value.to_string());
        }
    }
    None
}
