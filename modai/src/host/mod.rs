//! Host module protocol.
//!
//! A host invokes a module binary with the path of a JSON argument file
//! (or pipes the arguments on stdin), and reads one JSON result document
//! from stdout. Logs go to stderr so they never corrupt that document.

pub mod args;
pub mod output;

pub use args::{ArgKind, ArgSpec, ArgValue, ArgumentError, ArgumentSpec, Params};
pub use output::{mask_values, ModuleOutput, Outcome};

use anyhow::{bail, Context};
use serde_json::{Map, Value};
use std::ffi::OsString;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Key wrapping the arguments in host-generated argument files
const WRAPPER_KEY: &str = "ANSIBLE_MODULE_ARGS";

/// Prefix of host-internal arguments
const INTERNAL_PREFIX: &str = "_ansible_";

/// Install the stderr log subscriber, filtered by `RUST_LOG` (default `warn`)
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Where the module arguments come from
#[derive(Debug, Clone)]
pub enum ArgSource {
    /// JSON file named on the command line
    File(PathBuf),
    /// JSON piped on stdin
    Stdin,
    /// Already-parsed JSON
    Json(Value),
}

impl ArgSource {
    /// `argv[1]` when present, stdin otherwise
    pub fn from_args(args: impl IntoIterator<Item = OsString>) -> Self {
        args.into_iter()
            .nth(1)
            .map(|path| ArgSource::File(PathBuf::from(path)))
            .unwrap_or(ArgSource::Stdin)
    }

    fn load(self) -> anyhow::Result<Map<String, Value>> {
        let value = match self {
            ArgSource::File(path) => {
                let raw = std::fs::read_to_string(&path).with_context(|| {
                    format!("unable to read module arguments from {}", path.display())
                })?;
                serde_json::from_str(&raw).context("module arguments are not valid JSON")?
            }
            ArgSource::Stdin => {
                let mut raw = String::new();
                std::io::stdin()
                    .read_to_string(&mut raw)
                    .context("unable to read module arguments from stdin")?;
                serde_json::from_str(&raw).context("module arguments are not valid JSON")?
            }
            ArgSource::Json(value) => value,
        };

        let mut object = match value {
            Value::Object(object) => object,
            _ => bail!("module arguments must be a JSON object"),
        };

        match object.remove(WRAPPER_KEY) {
            Some(Value::Object(inner)) => Ok(inner),
            Some(_) => bail!("{} must be a JSON object", WRAPPER_KEY),
            None => Ok(object),
        }
    }
}

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// A module as the host sees it: a name, an argument spec and capabilities
#[derive(Clone)]
pub struct HostModule {
    name: &'static str,
    spec: ArgumentSpec,
    supports_check_mode: bool,
    env: EnvLookup,
}

impl std::fmt::Debug for HostModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostModule")
            .field("name", &self.name)
            .field("spec", &self.spec)
            .field("supports_check_mode", &self.supports_check_mode)
            .finish()
    }
}

impl HostModule {
    /// Create a module reading fallbacks from the process environment
    pub fn new(name: &'static str, spec: ArgumentSpec) -> Self {
        Self {
            name,
            spec,
            supports_check_mode: false,
            env: Arc::new(|name: &str| std::env::var(name).ok()),
        }
    }

    /// Declare check mode support
    pub fn supports_check_mode(mut self, supported: bool) -> Self {
        self.supports_check_mode = supported;
        self
    }

    /// Replace the environment used for argument fallbacks
    pub fn with_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(env);
        self
    }

    /// Module name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Load and validate the arguments.
    ///
    /// `Err` carries the outcome to report without running the module:
    /// a validation failure or a check-mode skip.
    pub fn parse(&self, source: ArgSource) -> Result<Invocation, Outcome> {
        let raw = source
            .load()
            .map_err(|e| Outcome::failure(format!("{:#}", e), None))?;

        let (args, check_mode) = split_internal(raw);

        let params = self
            .spec
            .resolve(self.name, &args, |name| (self.env)(name))
            .map_err(|e| Outcome::failure(e.to_string(), None))?;

        if check_mode && !self.supports_check_mode {
            return Err(Outcome::skipped(format!(
                "remote module ({}) does not support check mode",
                self.name
            )));
        }

        tracing::debug!(module = self.name, args = ?params, "module arguments resolved");

        Ok(Invocation {
            no_log_values: params.no_log_values(),
            params,
        })
    }
}

/// Drop host-internal keys, keeping only the check mode flag
fn split_internal(raw: Map<String, Value>) -> (Map<String, Value>, bool) {
    let mut check_mode = false;
    let args = raw
        .into_iter()
        .filter(|(key, value)| {
            if key == "_ansible_check_mode" {
                check_mode = is_truthy(value);
            }
            !key.starts_with(INTERNAL_PREFIX)
        })
        .collect();
    (args, check_mode)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => matches!(
            s.to_ascii_lowercase().as_str(),
            "yes" | "on" | "1" | "true" | "y" | "t"
        ),
        _ => false,
    }
}

/// Validated arguments of one run
pub struct Invocation {
    params: Params,
    no_log_values: Vec<String>,
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl Invocation {
    /// Resolved arguments
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Finish successfully with `message`
    pub fn exit(&self, changed: bool, message: &str) -> Outcome {
        Outcome::success(
            changed,
            mask_values(message, &self.no_log_values),
            Some(self.params.masked()),
        )
    }

    /// Finish with a failure
    pub fn fail(&self, msg: &str) -> Outcome {
        Outcome::failure(
            mask_values(msg, &self.no_log_values),
            Some(self.params.masked()),
        )
    }
}
