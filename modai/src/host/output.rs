//! Result documents written back to the host.

use modai_core::SECRET_MASK;
use serde::Serialize;
use serde_json::{Map, Value};
use std::process::ExitCode;

/// JSON document printed on stdout when a module finishes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleOutput {
    pub changed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
    /// Module result text on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure or skip reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invocation: Option<InvocationEcho>,
}

/// Arguments the module ran with, `no_log` values hidden
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvocationEcho {
    pub module_args: Map<String, Value>,
}

/// Final state of one module run
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    output: ModuleOutput,
    exit_code: u8,
}

impl Outcome {
    /// Successful run
    pub fn success(
        changed: bool,
        message: impl Into<String>,
        module_args: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            output: ModuleOutput {
                changed,
                failed: false,
                skipped: false,
                message: Some(message.into()),
                msg: None,
                invocation: module_args.map(|module_args| InvocationEcho { module_args }),
            },
            exit_code: 0,
        }
    }

    /// Failed run
    pub fn failure(msg: impl Into<String>, module_args: Option<Map<String, Value>>) -> Self {
        Self {
            output: ModuleOutput {
                changed: false,
                failed: true,
                skipped: false,
                message: None,
                msg: Some(msg.into()),
                invocation: module_args.map(|module_args| InvocationEcho { module_args }),
            },
            exit_code: 1,
        }
    }

    /// The module did not run
    pub fn skipped(msg: impl Into<String>) -> Self {
        Self {
            output: ModuleOutput {
                changed: false,
                failed: false,
                skipped: true,
                message: None,
                msg: Some(msg.into()),
                invocation: None,
            },
            exit_code: 0,
        }
    }

    /// Document to be printed
    pub fn output(&self) -> &ModuleOutput {
        &self.output
    }

    /// Process exit status
    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    /// Serialized document
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.output).unwrap_or_else(|_| {
            r#"{"changed": false, "failed": true, "msg": "failed to encode module output"}"#
                .to_string()
        })
    }

    /// Print the document on stdout and hand back the exit status
    pub fn emit(self) -> ExitCode {
        println!("{}", self.to_json());
        ExitCode::from(self.exit_code)
    }
}

/// Replace every `no_log` value inside `text` with the mask
pub fn mask_values(text: &str, values: &[String]) -> String {
    let mut values: Vec<&String> = values.iter().filter(|v| !v.is_empty()).collect();
    // longest first so a value containing another is masked whole
    values.sort_by_key(|v| std::cmp::Reverse(v.len()));

    values
        .into_iter()
        .fold(text.to_string(), |acc, value| acc.replace(value.as_str(), SECRET_MASK))
}
