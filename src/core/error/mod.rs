use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationMissingArgument,
    ValidationInvalidArgument,
    ValidationInvalidJson,

    ManifestNotFound,
    ManifestMissingName,
    ManifestInvalidYaml,

    CacheParseError,

    RefreshCommandFailed,

    RenameFailed,

    InternalIoError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",
            ErrorCode::ValidationInvalidJson => "validation.invalid_json",

            ErrorCode::ManifestNotFound => "manifest.not_found",
            ErrorCode::ManifestMissingName => "manifest.missing_name",
            ErrorCode::ManifestInvalidYaml => "manifest.invalid_yaml",

            ErrorCode::CacheParseError => "cache.parse_error",

            ErrorCode::RefreshCommandFailed => "refresh.command_failed",

            ErrorCode::RenameFailed => "rename.failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathDetails {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandFailedDetails {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameFailedDetails {
    pub stage: String,
    pub old_name: String,
    pub new_name: String,
    pub cause_code: String,
    pub cause: String,
    pub cause_details: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            to_details(MissingArgumentDetails { args }),
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        let problem = problem.into();
        Self::new(
            ErrorCode::ValidationInvalidArgument,
            format!("Invalid argument: {}", problem),
            to_details(InvalidArgumentDetails {
                field: field.into(),
                problem,
                value,
            }),
        )
    }

    pub fn validation_invalid_json(err: serde_json::Error, context: Option<String>) -> Self {
        let details = serde_json::json!({
            "error": err.to_string(),
            "context": context,
        });

        Self::new(ErrorCode::ValidationInvalidJson, "Invalid JSON", details)
    }

    pub fn manifest_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::ManifestNotFound,
            format!("Manifest not found at {}", path),
            to_details(PathDetails {
                path,
                name: None,
                error: None,
            }),
        )
        .with_hint("Run pubrename from a package root or pass --path <dir>")
    }

    pub fn manifest_missing_name(path: impl Into<String>, name: Option<String>) -> Self {
        let path = path.into();
        let message = match &name {
            Some(name) => format!("'name: {}' not found in {}", name, path),
            None => format!("No top-level 'name' field in {}", path),
        };
        Self::new(
            ErrorCode::ManifestMissingName,
            message,
            to_details(PathDetails {
                path,
                name,
                error: None,
            }),
        )
    }

    pub fn manifest_invalid_yaml(path: impl Into<String>, error: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::ManifestInvalidYaml,
            format!("Manifest {} is not valid YAML", path),
            to_details(PathDetails {
                path,
                name: None,
                error: Some(error.into()),
            }),
        )
    }

    pub fn cache_parse_error(path: impl Into<String>, error: impl Into<String>) -> Self {
        let path = path.into();
        let error = error.into();
        Self::new(
            ErrorCode::CacheParseError,
            format!("Could not parse package cache {}: {}", path, error),
            to_details(PathDetails {
                path,
                name: None,
                error: Some(error),
            }),
        )
        .with_hint("Run 'flutter pub get' to regenerate the package cache")
    }

    pub fn refresh_command_failed(
        command: impl Into<String>,
        exit_code: Option<i32>,
        error: Option<String>,
    ) -> Self {
        let command = command.into();
        let message = match (exit_code, &error) {
            (Some(code), _) => format!("'{}' exited with status {}", command, code),
            (None, Some(err)) => format!("'{}' could not be run: {}", command, err),
            (None, None) => format!("'{}' was terminated by a signal", command),
        };
        Self::new(
            ErrorCode::RefreshCommandFailed,
            message,
            to_details(CommandFailedDetails {
                command,
                exit_code,
                error,
            }),
        )
    }

    /// Wrap a fatal step failure with the transaction context it happened in.
    pub fn rename_failed(stage: &str, old_name: &str, new_name: &str, cause: Error) -> Self {
        let message = format!(
            "Renaming '{}' to '{}' failed while {}: {}",
            old_name, new_name, stage, cause.message
        );
        let hints = cause.hints.clone();
        let mut err = Self::new(
            ErrorCode::RenameFailed,
            message,
            to_details(RenameFailedDetails {
                stage: stage.to_string(),
                old_name: old_name.to_string(),
                new_name: new_name.to_string(),
                cause_code: cause.code.as_str().to_string(),
                cause: cause.message,
                cause_details: cause.details,
            }),
        );
        err.hints = hints;
        err.with_hint("Steps completed before the failure are not rolled back")
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let error = error.into();
        let message = match &context {
            Some(context) => format!("IO error ({}): {}", context, error),
            None => format!("IO error: {}", error),
        };
        Self::new(
            ErrorCode::InternalIoError,
            message,
            to_details(InternalIoErrorDetails { error, context }),
        )
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalJsonError,
            "JSON error",
            to_details(InternalIoErrorDetails {
                error: error.into(),
                context,
            }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_failed_keeps_cause_context() {
        let cause = Error::internal_io("permission denied", Some("write lib/a.dart".to_string()));
        let err = Error::rename_failed("updating imports", "old_app", "new_app", cause);

        assert_eq!(err.code, ErrorCode::RenameFailed);
        assert!(err.message.contains("old_app"));
        assert!(err.message.contains("new_app"));
        assert!(err.message.contains("permission denied"));
        assert_eq!(err.details["stage"], "updating imports");
        assert_eq!(err.details["causeCode"], "internal.io_error");
        assert_eq!(err.details["causeDetails"]["context"], "write lib/a.dart");
    }

    #[test]
    fn manifest_not_found_names_path() {
        let err = Error::manifest_not_found("/tmp/app/pubspec.yaml");
        assert_eq!(err.code.as_str(), "manifest.not_found");
        assert!(err.message.contains("/tmp/app/pubspec.yaml"));
        assert_eq!(err.hints.len(), 1);
    }

    #[test]
    fn refresh_failure_message_includes_status() {
        let err = Error::refresh_command_failed("flutter clean", Some(3), None);
        assert!(err.message.contains("flutter clean"));
        assert!(err.message.contains('3'));
        assert_eq!(err.details["exitCode"], 3);
    }
}
