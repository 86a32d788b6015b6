//! Structural validation of dispatch API response bodies.

use dispatch_map_dispatch_models::{DataType, DispatchResponse};

use crate::{FetchError, body_preview};

/// Validates `body` against the envelope for `data_type`.
///
/// With `debug` set, mismatches are logged with a preview of the offending
/// body and successes are logged with their record count. `debug` never
/// changes the outcome.
///
/// # Errors
///
/// Returns [`FetchError::Schema`] if the body is not valid JSON or does not
/// match the expected shape exactly.
pub fn validate(
    data_type: DataType,
    body: &str,
    debug: bool,
) -> Result<DispatchResponse, FetchError> {
    match DispatchResponse::parse(data_type, body) {
        Ok(response) => {
            if debug {
                log::info!(
                    "Validated {data_type} response: success={}, {} record(s)",
                    response.success(),
                    response.record_count()
                );
            }
            Ok(response)
        }
        Err(e) => {
            if debug {
                log::warn!(
                    "{data_type} response failed validation: {e}\n  body preview: {}",
                    body_preview(body)
                );
            } else {
                log::debug!("{data_type} response failed validation: {e}");
            }
            Err(FetchError::Schema {
                message: format!("{data_type} response: {e}"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_empty_units_list() {
        let body = r#"{"Success": true, "Units": []}"#;
        let response = validate(DataType::Units, body, false).unwrap();
        assert_eq!(response.record_count(), 0);
    }

    #[test]
    fn rejects_non_json_body() {
        let err = validate(DataType::Incidents, "<html>gateway</html>", false).unwrap_err();
        assert!(matches!(err, FetchError::Schema { .. }));
    }

    #[test]
    fn debug_does_not_change_outcome() {
        let body = r#"{"Success": true, "Units": "nope"}"#;
        assert!(validate(DataType::Units, body, false).is_err());
        assert!(validate(DataType::Units, body, true).is_err());

        let body = r#"{"Success": false, "Error": "down", "Incidents": null}"#;
        assert!(validate(DataType::Incidents, body, false).is_ok());
        assert!(validate(DataType::Incidents, body, true).is_ok());
    }

    #[test]
    fn schema_error_names_data_type() {
        let err = validate(DataType::Units, "{}", false).unwrap_err();
        assert!(err.to_string().contains("units response"), "{err}");
    }
}
