#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dispatch API record types and agency configuration types.
//!
//! The dispatch API exposes two endpoints, one for active incidents and one
//! for active units, both scoped by jurisdiction code. Responses are
//! deserialized strictly: unknown fields and missing required fields reject
//! the whole response rather than being coerced. Fields that the API marks
//! as nullable must still be present in the payload (as `null`).

use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Deserializes a field that must be present but may be `null`.
///
/// Plain `Option<T>` fields treat a missing key as `None`. Routing the field
/// through `deserialize_with` makes serde report the key as missing instead.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Which kind of entity a run fetches.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DataType {
    /// Active calls for service.
    #[default]
    Incidents,
    /// Live vehicle/crew positions.
    Units,
}

impl DataType {
    /// Every supported data type, in declaration order.
    pub const ALL: &[Self] = &[Self::Incidents, Self::Units];

    /// API path (relative to the configured base URL) for this data type.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Incidents => "/v1/GetActiveIncidentsByJurisdiction",
            Self::Units => "/v1/GetActiveUnitsByJurisdiction",
        }
    }
}

/// How agency requests are issued.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FetchMode {
    /// One request per agency. A failing agency never affects the others.
    #[default]
    PerAgency,
    /// A single request carrying every jurisdiction code.
    Batch,
}

/// A configured agency (jurisdiction) to query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgencyRef {
    /// Jurisdiction code sent to the API (e.g., `"JC"`).
    pub id: String,
    /// Human-readable agency name, used only for logging and error context.
    pub name: String,
}

impl AgencyRef {
    /// Creates a new agency reference.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Label used in log lines and run errors, e.g. `"Jefferson County (JC)"`.
    #[must_use]
    pub fn label(&self) -> String {
        if self.name.trim().is_empty() {
            self.id.clone()
        } else {
            format!("{} ({})", self.name, self.id)
        }
    }
}

/// Request body shared by both dispatch endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionRequest {
    /// Jurisdiction codes to query.
    #[serde(rename = "JurisdictionCodes")]
    pub jurisdiction_codes: Vec<String>,
}

/// Classification of an incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncidentType {
    #[serde(rename = "Incident_Type", deserialize_with = "nullable")]
    pub incident_type: Option<String>,
    #[serde(rename = "Problem", deserialize_with = "nullable")]
    pub problem: Option<String>,
    /// Any JSON number, integral or not.
    #[serde(rename = "Priority", deserialize_with = "nullable")]
    pub priority: Option<f64>,
    #[serde(rename = "PriorityDescription", deserialize_with = "nullable")]
    pub priority_description: Option<String>,
    #[serde(rename = "Response_Plan", deserialize_with = "nullable")]
    pub response_plan: Option<String>,
    #[serde(rename = "Determinant", deserialize_with = "nullable")]
    pub determinant: Option<String>,
}

/// Where an incident sits in the dispatch hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncidentHierarchy {
    #[serde(rename = "Agency_Type")]
    pub agency_type: String,
    #[serde(rename = "Jurisdiction")]
    pub jurisdiction: String,
    #[serde(rename = "Division", deserialize_with = "nullable")]
    pub division: Option<String>,
    #[serde(rename = "Battalion", deserialize_with = "nullable")]
    pub battalion: Option<String>,
    #[serde(rename = "Response_Area", deserialize_with = "nullable")]
    pub response_area: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallerInformation {
    #[serde(rename = "Caller_Name", deserialize_with = "nullable")]
    pub caller_name: Option<String>,
    #[serde(rename = "Call_Back_Phone", deserialize_with = "nullable")]
    pub call_back_phone: Option<String>,
    #[serde(rename = "MethodOfCallRcvd", deserialize_with = "nullable")]
    pub method_of_call_received: Option<String>,
}

/// Address and coordinates of an incident. Coordinates are WGS84 and may
/// be `null` when the call has not been geocoded yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationInformation {
    #[serde(rename = "Address", deserialize_with = "nullable")]
    pub address: Option<String>,
    #[serde(rename = "Apartment", deserialize_with = "nullable")]
    pub apartment: Option<String>,
    #[serde(rename = "City", deserialize_with = "nullable")]
    pub city: Option<String>,
    #[serde(rename = "Location_Name", deserialize_with = "nullable")]
    pub location_name: Option<String>,
    #[serde(rename = "Cross_Street", deserialize_with = "nullable")]
    pub cross_street: Option<String>,
    #[serde(rename = "Latitude", deserialize_with = "nullable")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude", deserialize_with = "nullable")]
    pub longitude: Option<f64>,
}

/// Call lifecycle timestamps, passed through as the API formats them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncidentTimes {
    #[serde(rename = "Time_PhonePickUp", deserialize_with = "nullable")]
    pub phone_pick_up: Option<String>,
    #[serde(rename = "Time_FirstCallTakingKeystroke", deserialize_with = "nullable")]
    pub first_call_taking_keystroke: Option<String>,
    #[serde(rename = "Time_CallEnteredQueue", deserialize_with = "nullable")]
    pub call_entered_queue: Option<String>,
    #[serde(rename = "Time_CallTakingComplete", deserialize_with = "nullable")]
    pub call_taking_complete: Option<String>,
    #[serde(rename = "Time_CallClosed", deserialize_with = "nullable")]
    pub call_closed: Option<String>,
    #[serde(rename = "Fixed_Time_CallEnteredQueue", deserialize_with = "nullable")]
    pub fixed_call_entered_queue: Option<String>,
    #[serde(rename = "Fixed_Time_CallClosed", deserialize_with = "nullable")]
    pub fixed_call_closed: Option<String>,
    #[serde(rename = "Time_FirstUnitAssigned", deserialize_with = "nullable")]
    pub first_unit_assigned: Option<String>,
    #[serde(rename = "Time_FirstUnitEnroute", deserialize_with = "nullable")]
    pub first_unit_enroute: Option<String>,
    #[serde(rename = "Time_FirstUnitStaged", deserialize_with = "nullable")]
    pub first_unit_staged: Option<String>,
    #[serde(rename = "Time_FirstUnitArrived", deserialize_with = "nullable")]
    pub first_unit_arrived: Option<String>,
}

/// One active call for service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncidentRecord {
    /// Identity of the incident within the dispatch system.
    #[serde(rename = "IncidentId")]
    pub incident_id: i64,
    #[serde(rename = "ShortcutId", deserialize_with = "nullable")]
    pub shortcut_id: Option<String>,
    #[serde(rename = "Master_Incident_Number", deserialize_with = "nullable")]
    pub master_incident_number: Option<String>,
    #[serde(rename = "CaseNumbers")]
    pub case_numbers: Vec<String>,
    #[serde(rename = "Response_Date")]
    pub response_date: String,
    #[serde(rename = "IncidentType")]
    pub incident_type: IncidentType,
    #[serde(rename = "IncidentHierarchy")]
    pub hierarchy: IncidentHierarchy,
    #[serde(rename = "CallerInformation")]
    pub caller: CallerInformation,
    #[serde(rename = "LocationInformation")]
    pub location: LocationInformation,
    #[serde(rename = "IncidentTimes")]
    pub times: IncidentTimes,
    #[serde(rename = "CallTaking_Performed_By", deserialize_with = "nullable")]
    pub call_taking_performed_by: Option<String>,
    #[serde(rename = "CallClosing_Performed_By", deserialize_with = "nullable")]
    pub call_closing_performed_by: Option<String>,
    #[serde(rename = "Call_Disposition", deserialize_with = "nullable")]
    pub call_disposition: Option<String>,
    #[serde(rename = "Cancel_Reason", deserialize_with = "nullable")]
    pub cancel_reason: Option<String>,
    #[serde(rename = "WhichQueue")]
    pub which_queue: String,
    #[serde(rename = "Call_Is_Active")]
    pub call_is_active: bool,
    #[serde(rename = "RequestToCancel")]
    pub request_to_cancel: bool,
    #[serde(rename = "Stacked")]
    pub stacked: bool,
    #[serde(rename = "Reopened")]
    pub reopened: bool,
}

/// One live vehicle or crew. Units always carry a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitRecord {
    /// Identity of the unit within the dispatch system.
    #[serde(rename = "UnitID")]
    pub unit_id: i64,
    #[serde(rename = "UnitName")]
    pub unit_name: String,
    #[serde(rename = "VehicleID")]
    pub vehicle_id: i64,
    #[serde(rename = "VehicleName")]
    pub vehicle_name: String,
    #[serde(rename = "StatusName")]
    pub status_name: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    /// Incident the unit is assigned to, `null` when available.
    #[serde(rename = "IncidentID", deserialize_with = "nullable")]
    pub incident_id: Option<i64>,
    #[serde(rename = "Agency")]
    pub agency: String,
    #[serde(rename = "Jurisdiction")]
    pub jurisdiction: String,
    #[serde(rename = "JurisdictionCode")]
    pub jurisdiction_code: String,
    #[serde(rename = "CurrentLocation")]
    pub current_location: String,
    #[serde(rename = "Speed", deserialize_with = "nullable")]
    pub speed: Option<f64>,
    #[serde(rename = "DestinationLatitude", deserialize_with = "nullable")]
    pub destination_latitude: Option<f64>,
    #[serde(rename = "DestinationLongitude", deserialize_with = "nullable")]
    pub destination_longitude: Option<f64>,
    #[serde(rename = "Heading", deserialize_with = "nullable")]
    pub heading: Option<f64>,
    /// Crew members on board. The API spells this key `Personel`.
    #[serde(rename = "Personel")]
    pub personnel: Vec<String>,
}

/// Envelope returned by `GetActiveIncidentsByJurisdiction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncidentsResponse {
    #[serde(rename = "Success")]
    pub success: bool,
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// `null` when the jurisdiction has no active incidents.
    #[serde(rename = "Incidents", deserialize_with = "nullable")]
    pub incidents: Option<Vec<IncidentRecord>>,
}

/// Envelope returned by `GetActiveUnitsByJurisdiction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitsResponse {
    #[serde(rename = "Success")]
    pub success: bool,
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "Units")]
    pub units: Vec<UnitRecord>,
}

/// A validated response from either endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResponse {
    Incidents(IncidentsResponse),
    Units(UnitsResponse),
}

impl DispatchResponse {
    /// Validates a raw response body against the envelope expected for
    /// `data_type`.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] describing the first structural
    /// mismatch (bad JSON, wrong type, unknown field, or missing field).
    pub fn parse(data_type: DataType, body: &str) -> Result<Self, serde_json::Error> {
        match data_type {
            DataType::Incidents => serde_json::from_str(body).map(Self::Incidents),
            DataType::Units => serde_json::from_str(body).map(Self::Units),
        }
    }

    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::Incidents(_) => DataType::Incidents,
            Self::Units(_) => DataType::Units,
        }
    }

    /// Whether the API reported the request as successful.
    #[must_use]
    pub const fn success(&self) -> bool {
        match self {
            Self::Incidents(r) => r.success,
            Self::Units(r) => r.success,
        }
    }

    /// The API-reported error message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Incidents(r) => r.error.as_deref(),
            Self::Units(r) => r.error.as_deref(),
        }
    }

    /// Number of records carried by the response.
    #[must_use]
    pub fn record_count(&self) -> usize {
        match self {
            Self::Incidents(r) => r.incidents.as_ref().map_or(0, Vec::len),
            Self::Units(r) => r.units.len(),
        }
    }
}
