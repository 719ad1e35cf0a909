//! `echo` module: hand `input_value` back with a prefix.

use crate::host::{ArgSource, ArgSpec, ArgumentSpec, HostModule, Outcome};

/// Module name as the host knows it
pub const NAME: &str = "echo";

/// Argument spec of the `echo` module
pub fn argument_spec() -> ArgumentSpec {
    ArgumentSpec::new().arg(ArgSpec::str("input_value").required())
}

/// The `echo` module
pub fn module() -> HostModule {
    HostModule::new(NAME, argument_spec())
}

/// `Received value: {input}`
pub fn message(input: &str) -> String {
    format!("Received value: {}", input)
}

/// Run the module end to end and produce the host result document
pub fn run(module: &HostModule, source: ArgSource) -> Outcome {
    let invocation = match module.parse(source) {
        Ok(invocation) => invocation,
        Err(outcome) => return outcome,
    };

    let input = invocation.params().get_str("input_value").unwrap_or_default();
    invocation.exit(false, &message(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_echo() {
        let outcome = run(&module(), ArgSource::Json(json!({"input_value": "hello"})));

        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(
            outcome.output().message.as_deref(),
            Some("Received value: hello")
        );
        assert!(!outcome.output().changed);
    }

    #[test]
    fn test_echo_keeps_input_verbatim() {
        let outcome = run(
            &module(),
            ArgSource::Json(json!({"input_value": "  メモリー {{ x }} "})),
        );
        assert_eq!(
            outcome.output().message.as_deref(),
            Some("Received value:   メモリー {{ x }} ")
        );
    }

    #[test]
    fn test_echo_requires_input() {
        let outcome = run(&module(), ArgSource::Json(json!({})));

        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(
            outcome.output().msg.as_deref(),
            Some("missing required arguments: input_value")
        );
    }

    #[test]
    fn test_echo_rejects_unknown_arguments() {
        let outcome = run(
            &module(),
            ArgSource::Json(json!({"input_value": "x", "extra": 1})),
        );

        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(
            outcome.output().msg.as_deref(),
            Some("Unsupported parameters for (echo) module: extra. Supported parameters include: input_value.")
        );
    }
}
