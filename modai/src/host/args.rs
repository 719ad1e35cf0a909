//! Declarative argument specs and their resolution.
//!
//! A value is taken from the module arguments first, then from the first
//! environment fallback that is set, then from the default.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Type of a module argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Str,
    Int,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKind::Str => f.write_str("str"),
            ArgKind::Int => f.write_str("int"),
        }
    }
}

/// A resolved argument value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    Str(String),
    Int(i64),
}

impl ArgValue {
    fn as_plain_string(&self) -> String {
        match self {
            ArgValue::Str(s) => s.clone(),
            ArgValue::Int(i) => i.to_string(),
        }
    }
}

/// Definition of one module argument
#[derive(Debug, Clone)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
    pub required: bool,
    pub default: Option<ArgValue>,
    pub no_log: bool,
    pub env_fallback: Vec<&'static str>,
}

impl ArgSpec {
    /// Optional string argument
    pub fn str(name: &'static str) -> Self {
        Self {
            name,
            kind: ArgKind::Str,
            required: false,
            default: None,
            no_log: false,
            env_fallback: Vec::new(),
        }
    }

    /// Optional integer argument
    pub fn int(name: &'static str) -> Self {
        Self {
            kind: ArgKind::Int,
            ..Self::str(name)
        }
    }

    /// Mark as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default value
    pub fn default_value(mut self, value: ArgValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Keep the value out of logs and output
    pub fn no_log(mut self) -> Self {
        self.no_log = true;
        self
    }

    /// Read the value from these environment variables when not given
    pub fn env_fallback(mut self, names: &[&'static str]) -> Self {
        self.env_fallback = names.to_vec();
        self
    }
}

/// Argument validation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("missing required arguments: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error(
        "Unsupported parameters for ({module}) module: {}. Supported parameters include: {}.",
        .unsupported.join(", "),
        .supported.join(", ")
    )]
    Unsupported {
        module: String,
        unsupported: Vec<String>,
        supported: Vec<String>,
    },

    #[error("argument '{name}' is of type {found} and we were unable to convert to {expected}")]
    WrongType {
        name: String,
        found: &'static str,
        expected: ArgKind,
    },
}

/// Ordered set of argument definitions for one module
#[derive(Debug, Clone, Default)]
pub struct ArgumentSpec {
    args: Vec<ArgSpec>,
}

impl ArgumentSpec {
    /// Create an empty spec
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument
    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.args.push(spec);
        self
    }

    /// Names of every declared argument, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.args.iter().map(|a| a.name.to_string()).collect();
        names.sort();
        names
    }

    /// Resolve `raw` against the spec.
    ///
    /// `raw` must already be stripped of host-internal keys.
    pub fn resolve<E>(
        &self,
        module: &str,
        raw: &Map<String, Value>,
        env: E,
    ) -> Result<Params, ArgumentError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let mut unsupported: Vec<String> = raw
            .keys()
            .filter(|key| !self.args.iter().any(|a| a.name == key.as_str()))
            .cloned()
            .collect();
        if !unsupported.is_empty() {
            unsupported.sort();
            return Err(ArgumentError::Unsupported {
                module: module.to_string(),
                unsupported,
                supported: self.names(),
            });
        }

        let mut values = BTreeMap::new();
        let mut no_log = BTreeMap::new();
        let mut missing = Vec::new();

        for spec in &self.args {
            let value = match raw.get(spec.name).filter(|v| !v.is_null()) {
                Some(v) => Some(convert(spec, v)?),
                None => spec
                    .env_fallback
                    .iter()
                    .find_map(|name| env(name))
                    .map(|v| convert(spec, &Value::String(v)))
                    .transpose()?
                    .or_else(|| spec.default.clone()),
            };

            if value.is_none() && spec.required {
                missing.push(spec.name.to_string());
            }
            no_log.insert(spec.name, spec.no_log);
            values.insert(spec.name, value);
        }

        if !missing.is_empty() {
            return Err(ArgumentError::Missing(missing));
        }

        Ok(Params { values, no_log })
    }
}

fn convert(spec: &ArgSpec, value: &Value) -> Result<ArgValue, ArgumentError> {
    let wrong_type = || ArgumentError::WrongType {
        name: spec.name.to_string(),
        found: json_type(value),
        expected: spec.kind,
    };

    match spec.kind {
        ArgKind::Str => match value {
            Value::String(s) => Ok(ArgValue::Str(s.clone())),
            Value::Number(n) => Ok(ArgValue::Str(n.to_string())),
            Value::Bool(b) => Ok(ArgValue::Str(b.to_string())),
            _ => Err(wrong_type()),
        },
        ArgKind::Int => match value {
            Value::Number(n) => n.as_i64().map(ArgValue::Int).ok_or_else(wrong_type),
            Value::String(s) => s.trim().parse().map(ArgValue::Int).map_err(|_| wrong_type()),
            _ => Err(wrong_type()),
        },
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "int",
        Value::Number(_) => "float",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Placeholder shown for `no_log` values in the echoed invocation
pub const NO_LOG_PLACEHOLDER: &str = "VALUE_SPECIFIED_IN_NO_LOG_PARAMETER";

/// Resolved module arguments
#[derive(Clone, Default)]
pub struct Params {
    values: BTreeMap<&'static str, Option<ArgValue>>,
    no_log: BTreeMap<&'static str, bool>,
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.masked()).finish()
    }
}

impl Params {
    /// String value of `name`
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(Some(ArgValue::Str(s))) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Integer value of `name`
    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(Some(ArgValue::Int(i))) => Some(*i),
            _ => None,
        }
    }

    /// Values of every `no_log` argument that is set
    pub fn no_log_values(&self) -> Vec<String> {
        self.values
            .iter()
            .filter(|(name, _)| self.no_log.get(*name).copied().unwrap_or(false))
            .filter_map(|(_, value)| value.as_ref().map(ArgValue::as_plain_string))
            .filter(|value| !value.is_empty())
            .collect()
    }

    /// Arguments as echoed back in `invocation.module_args`
    pub fn masked(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|(name, value)| {
                let hidden = self.no_log.get(name).copied().unwrap_or(false);
                let json = match value {
                    Some(_) if hidden => Value::String(NO_LOG_PLACEHOLDER.to_string()),
                    Some(v) => serde_json::to_value(v).unwrap_or(Value::Null),
                    None => Value::Null,
                };
                (name.to_string(), json)
            })
            .collect()
    }
}
