//! JSON Schema documents describing the connector's input and output.
//!
//! The hosting runtime asks for these on demand (to render a config form
//! and to describe emitted records) without running the pipeline, so every
//! function here is pure.

use dispatch_map_dispatch_models::DataType;
use serde_json::{Value, json};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which schema is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SchemaKind {
    /// The stored run configuration.
    Input,
    /// One emitted record.
    Output,
}

/// Direction of the data flow the schema applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DataFlow {
    /// Data pulled from the dispatch API into the map.
    #[default]
    Incoming,
    /// Data pushed from the map outward. Not supported by this connector.
    Outgoing,
}

/// Returns the schema for `kind` and `flow`.
///
/// The output schema depends on the configured `data_type`. Outgoing flows
/// have no fields.
#[must_use]
pub fn schema(kind: SchemaKind, flow: DataFlow, data_type: DataType) -> Value {
    match (flow, kind) {
        (DataFlow::Outgoing, _) => empty_object(),
        (DataFlow::Incoming, SchemaKind::Input) => input_schema(),
        (DataFlow::Incoming, SchemaKind::Output) => output_schema(data_type),
    }
}

fn empty_object() -> Value {
    json!({ "type": "object", "properties": {} })
}

/// Schema of the stored run configuration.
#[must_use]
pub fn input_schema() -> Value {
    let data_types: Vec<&str> = DataType::ALL.iter().map(AsRef::as_ref).collect();
    let default_type = DataType::default().to_string();

    json!({
        "type": "object",
        "required": ["API_URL", "API_Token", "Agencies"],
        "properties": {
            "API_URL": {
                "type": "string",
                "description": "The URL of the API to fetch data from (Typically ends with /Production)"
            },
            "API_Token": {
                "type": "string",
                "description": "The API token for authentication"
            },
            "DataType": {
                "type": "string",
                "enum": data_types,
                "default": default_type,
                "description": "The type of data to fetch"
            },
            "Agencies": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "name"],
                    "properties": {
                        "id": { "type": "string", "description": "The agency ID" },
                        "name": { "type": "string", "description": "The agency name" }
                    }
                }
            },
            "DEBUG": {
                "type": "boolean",
                "default": false,
                "description": "Print results in logs"
            }
        }
    })
}

/// Schema of one emitted record for `data_type`.
#[must_use]
pub fn output_schema(data_type: DataType) -> Value {
    match data_type {
        DataType::Incidents => incident_schema(),
        DataType::Units => unit_schema(),
    }
}

fn string() -> Value {
    json!({ "type": "string" })
}

fn nullable(ty: &str) -> Value {
    json!({ "type": [ty, "null"] })
}

/// Builds an object schema where every listed property is required.
fn object(properties: Vec<(&str, Value)>) -> Value {
    let required: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();
    let properties: serde_json::Map<String, Value> = properties
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect();
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": required,
        "properties": properties,
    })
}

fn nullable_strings(names: &[&'static str]) -> Vec<(&'static str, Value)> {
    names.iter().map(|name| (*name, nullable("string"))).collect()
}

fn incident_schema() -> Value {
    object(vec![
        ("IncidentId", json!({ "type": "integer" })),
        ("ShortcutId", nullable("string")),
        ("Master_Incident_Number", nullable("string")),
        ("CaseNumbers", json!({ "type": "array", "items": string() })),
        ("Response_Date", string()),
        (
            "IncidentType",
            object(vec![
                ("Incident_Type", nullable("string")),
                ("Problem", nullable("string")),
                ("Priority", nullable("number")),
                ("PriorityDescription", nullable("string")),
                ("Response_Plan", nullable("string")),
                ("Determinant", nullable("string")),
            ]),
        ),
        (
            "IncidentHierarchy",
            object(vec![
                ("Agency_Type", string()),
                ("Jurisdiction", string()),
                ("Division", nullable("string")),
                ("Battalion", nullable("string")),
                ("Response_Area", nullable("string")),
            ]),
        ),
        (
            "CallerInformation",
            object(nullable_strings(&[
                "Caller_Name",
                "Call_Back_Phone",
                "MethodOfCallRcvd",
            ])),
        ),
        (
            "LocationInformation",
            object(vec![
                ("Address", nullable("string")),
                ("Apartment", nullable("string")),
                ("City", nullable("string")),
                ("Location_Name", nullable("string")),
                ("Cross_Street", nullable("string")),
                ("Latitude", nullable("number")),
                ("Longitude", nullable("number")),
            ]),
        ),
        (
            "IncidentTimes",
            object(nullable_strings(&[
                "Time_PhonePickUp",
                "Time_FirstCallTakingKeystroke",
                "Time_CallEnteredQueue",
                "Time_CallTakingComplete",
                "Time_CallClosed",
                "Fixed_Time_CallEnteredQueue",
                "Fixed_Time_CallClosed",
                "Time_FirstUnitAssigned",
                "Time_FirstUnitEnroute",
                "Time_FirstUnitStaged",
                "Time_FirstUnitArrived",
            ])),
        ),
        ("CallTaking_Performed_By", nullable("string")),
        ("CallClosing_Performed_By", nullable("string")),
        ("Call_Disposition", nullable("string")),
        ("Cancel_Reason", nullable("string")),
        ("WhichQueue", string()),
        ("Call_Is_Active", json!({ "type": "boolean" })),
        ("RequestToCancel", json!({ "type": "boolean" })),
        ("Stacked", json!({ "type": "boolean" })),
        ("Reopened", json!({ "type": "boolean" })),
    ])
}

fn unit_schema() -> Value {
    object(vec![
        ("UnitID", json!({ "type": "integer" })),
        ("UnitName", string()),
        ("VehicleID", json!({ "type": "integer" })),
        ("VehicleName", string()),
        ("StatusName", string()),
        ("Latitude", json!({ "type": "number" })),
        ("Longitude", json!({ "type": "number" })),
        ("IncidentID", nullable("integer")),
        ("Agency", string()),
        ("Jurisdiction", string()),
        ("JurisdictionCode", string()),
        ("CurrentLocation", string()),
        ("Speed", nullable("number")),
        ("DestinationLatitude", nullable("number")),
        ("DestinationLongitude", nullable("number")),
        ("Heading", nullable("number")),
        ("Personel", json!({ "type": "array", "items": string() })),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_schema_lists_data_types() {
        let schema = input_schema();
        assert_eq!(
            schema["properties"]["DataType"]["enum"],
            json!(["incidents", "units"])
        );
        assert_eq!(schema["properties"]["DataType"]["default"], "incidents");
        assert_eq!(schema["properties"]["DEBUG"]["default"], false);
    }

    #[test]
    fn output_schema_follows_data_type() {
        let incidents = schema(SchemaKind::Output, DataFlow::Incoming, DataType::Incidents);
        assert!(incidents["properties"].get("IncidentId").is_some());
        assert!(incidents["properties"].get("UnitID").is_none());

        let units = schema(SchemaKind::Output, DataFlow::Incoming, DataType::Units);
        assert!(units["properties"].get("UnitID").is_some());
        assert_eq!(units["properties"]["Latitude"]["type"], "number");
    }

    #[test]
    fn incident_coordinates_and_priority_are_nullable() {
        let schema = output_schema(DataType::Incidents);
        assert_eq!(
            schema["properties"]["LocationInformation"]["properties"]["Latitude"]["type"],
            json!(["number", "null"])
        );
        assert_eq!(
            schema["properties"]["IncidentType"]["properties"]["Priority"]["type"],
            json!(["number", "null"])
        );
    }

    #[test]
    fn every_incident_property_is_required() {
        let schema = output_schema(DataType::Incidents);
        let required = schema["required"].as_array().unwrap().len();
        let properties = schema["properties"].as_object().unwrap().len();
        assert_eq!(required, properties);
    }

    #[test]
    fn outgoing_flow_is_empty() {
        let schema = schema(SchemaKind::Input, DataFlow::Outgoing, DataType::Units);
        assert_eq!(schema, json!({ "type": "object", "properties": {} }));
    }

    #[test]
    fn parses_kind_and_flow() {
        assert_eq!("OUTPUT".parse::<SchemaKind>().unwrap(), SchemaKind::Output);
        assert_eq!("incoming".parse::<DataFlow>().unwrap(), DataFlow::Incoming);
    }
}
