//! Save results and the error message shown when a save fails.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::NppatchError;
use crate::labels::{self, LabelCatalog, COMMON_UNKNOWN_ERROR};

/// Outcome of a record save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResult {
    #[serde(default)]
    pub success: bool,
    /// Missing in the payload = no errors.
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,
}

impl SaveResult {
    /// Parse a save result from its JSON form.
    pub fn from_json(content: &str) -> Result<Self, NppatchError> {
        Ok(serde_json::from_str(content)?)
    }
}

/// One problem reported by a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub message: String,
    /// API names of the fields the message applies to.
    #[serde(default)]
    pub fields: Vec<String>,
}

impl ErrorEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields<I, S>(message: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message: message.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// `"<field> - <message>"` for each field, or the bare message when the
    /// entry names no fields.
    pub fn display_strings(&self) -> Vec<String> {
        if self.fields.is_empty() {
            return vec![self.message.clone()];
        }
        self.fields
            .iter()
            .map(|field| format!("{field} - {}", self.message))
            .collect()
    }
}

/// Header and detail text for a failed save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub header: String,
    pub detail: String,
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.header)
        } else {
            write!(f, "{}\n{}", self.header, self.detail)
        }
    }
}

/// Build the error message for `save_result` using the process-wide labels.
pub fn construct_error_message(save_result: &SaveResult) -> ErrorInfo {
    construct_error_message_with(labels::catalog(), save_result)
}

/// Build the error message for `save_result` using `catalog` for the header.
///
/// The `success` flag is not consulted.
pub fn construct_error_message_with(
    catalog: &LabelCatalog,
    save_result: &SaveResult,
) -> ErrorInfo {
    let detail = save_result
        .errors
        .iter()
        .flat_map(ErrorEntry::display_strings)
        .collect::<Vec<_>>()
        .join(", ");

    ErrorInfo {
        header: catalog.resolve(COMMON_UNKNOWN_ERROR).to_string(),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unknown_error() -> String {
        LabelCatalog::bundled()
            .resolve(COMMON_UNKNOWN_ERROR)
            .to_string()
    }

    fn failed(errors: Vec<ErrorEntry>) -> SaveResult {
        SaveResult {
            success: false,
            errors,
        }
    }

    #[test]
    fn test_single_error_without_fields() {
        let result = failed(vec![ErrorEntry::new("Invalid endpoint.")]);
        let info = construct_error_message(&result);
        assert_eq!(info.detail, "Invalid endpoint.");
        assert_eq!(info.header, unknown_error());
    }

    #[test]
    fn test_multiple_errors_without_fields() {
        let result = failed(vec![
            ErrorEntry::new("Amount must be greater than 1"),
            ErrorEntry::new("Recurring period must not be 1st and 15th"),
        ]);
        let info = construct_error_message(&result);
        assert_eq!(
            info.detail,
            "Amount must be greater than 1, Recurring period must not be 1st and 15th"
        );
        assert_eq!(info.header, unknown_error());
    }

    #[test]
    fn test_multiple_errors_with_fields() {
        let result = failed(vec![
            ErrorEntry::with_fields("Amount must be greater than 1", ["Amount__c"]),
            ErrorEntry::with_fields(
                "Recurring period must not be 1st and 15th",
                ["Installment_Period__c"],
            ),
        ]);
        let info = construct_error_message(&result);
        assert_eq!(
            info.detail,
            "Amount__c - Amount must be greater than 1, \
             Installment_Period__c - Recurring period must not be 1st and 15th"
        );
        assert_eq!(info.header, unknown_error());
    }

    #[test]
    fn test_no_errors_gives_empty_detail() {
        let info = construct_error_message(&failed(vec![]));
        assert_eq!(info.detail, "");
        assert_eq!(info.header, unknown_error());
    }

    #[test]
    fn test_message_repeats_for_each_field() {
        let result = failed(vec![
            ErrorEntry::with_fields("Date is required", ["Start_Date__c", "End_Date__c"]),
            ErrorEntry::new("Record is locked"),
        ]);
        let info = construct_error_message(&result);
        assert_eq!(
            info.detail,
            "Start_Date__c - Date is required, End_Date__c - Date is required, Record is locked"
        );
    }

    #[test]
    fn test_success_flag_is_ignored() {
        let mut result = failed(vec![ErrorEntry::new("Invalid endpoint.")]);
        let on_failure = construct_error_message(&result);
        result.success = true;
        assert_eq!(construct_error_message(&result), on_failure);
    }

    #[test]
    fn test_is_idempotent() {
        let result = failed(vec![ErrorEntry::with_fields("Bad", ["A__c"])]);
        assert_eq!(
            construct_error_message(&result),
            construct_error_message(&result)
        );
    }

    #[test]
    fn test_header_comes_from_catalog() {
        let catalog: LabelCatalog = [(COMMON_UNKNOWN_ERROR, "Unbekannter Fehler")]
            .into_iter()
            .collect();
        let info =
            construct_error_message_with(&catalog, &failed(vec![ErrorEntry::new("x")]));
        assert_eq!(info.header, "Unbekannter Fehler");
        assert_eq!(info.detail, "x");
    }

    #[test]
    fn test_header_falls_back_to_key_without_label() {
        let info = construct_error_message_with(&LabelCatalog::default(), &failed(vec![]));
        assert_eq!(info.header, COMMON_UNKNOWN_ERROR);
    }

    #[test]
    fn test_from_json_with_fields() {
        let json = r#"{
            "success": false,
            "errors": [
                { "message": "Amount must be greater than 1", "fields": ["Amount__c"] }
            ]
        }"#;
        let result = SaveResult::from_json(json).unwrap();
        assert!(!result.success);
        assert_eq!(result.errors[0].fields, vec!["Amount__c".to_string()]);
    }

    #[test]
    fn test_from_json_missing_errors_is_empty() {
        let result = SaveResult::from_json(r#"{ "success": false }"#).unwrap();
        assert!(result.errors.is_empty());
        assert_eq!(construct_error_message(&result).detail, "");
    }

    #[test]
    fn test_from_json_missing_fields_is_empty() {
        let result =
            SaveResult::from_json(r#"{ "errors": [ { "message": "Invalid endpoint." } ] }"#)
                .unwrap();
        assert!(result.errors[0].fields.is_empty());
        assert_eq!(construct_error_message(&result).detail, "Invalid endpoint.");
    }

    #[test]
    fn test_from_json_requires_message() {
        let err =
            SaveResult::from_json(r#"{ "errors": [ { "fields": ["A__c"] } ] }"#).unwrap_err();
        assert!(matches!(err, NppatchError::Serialization(_)));
    }

    #[test]
    fn test_display() {
        let info = ErrorInfo {
            header: "An unknown error occurred.".into(),
            detail: "Invalid endpoint.".into(),
        };
        assert_eq!(info.to_string(), "An unknown error occurred.\nInvalid endpoint.");

        let bare = ErrorInfo {
            header: "An unknown error occurred.".into(),
            detail: String::new(),
        };
        assert_eq!(bare.to_string(), "An unknown error occurred.");
    }
}
