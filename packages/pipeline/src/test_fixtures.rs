//! JSON builders for dispatch API payloads used across the pipeline tests.

use serde_json::{Value, json};

pub fn incident(
    id: i64,
    incident_type: Option<&str>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Value {
    json!({
        "IncidentId": id,
        "ShortcutId": null,
        "Master_Incident_Number": format!("2024-{id:06}"),
        "CaseNumbers": [],
        "Response_Date": "2024-01-15T14:30:00",
        "IncidentType": {
            "Incident_Type": incident_type,
            "Problem": null,
            "Priority": 2,
            "PriorityDescription": null,
            "Response_Plan": null,
            "Determinant": null
        },
        "IncidentHierarchy": {
            "Agency_Type": "Fire",
            "Jurisdiction": "JC",
            "Division": null,
            "Battalion": null,
            "Response_Area": null
        },
        "CallerInformation": {
            "Caller_Name": null,
            "Call_Back_Phone": null,
            "MethodOfCallRcvd": null
        },
        "LocationInformation": {
            "Address": "100 MAIN ST",
            "Apartment": null,
            "City": "GOLDEN",
            "Location_Name": null,
            "Cross_Street": null,
            "Latitude": latitude,
            "Longitude": longitude
        },
        "IncidentTimes": {
            "Time_PhonePickUp": null,
            "Time_FirstCallTakingKeystroke": null,
            "Time_CallEnteredQueue": null,
            "Time_CallTakingComplete": null,
            "Time_CallClosed": null,
            "Fixed_Time_CallEnteredQueue": null,
            "Fixed_Time_CallClosed": null,
            "Time_FirstUnitAssigned": null,
            "Time_FirstUnitEnroute": null,
            "Time_FirstUnitStaged": null,
            "Time_FirstUnitArrived": null
        },
        "CallTaking_Performed_By": null,
        "CallClosing_Performed_By": null,
        "Call_Disposition": null,
        "Cancel_Reason": null,
        "WhichQueue": "Fire",
        "Call_Is_Active": true,
        "RequestToCancel": false,
        "Stacked": false,
        "Reopened": false
    })
}

pub fn unit(id: i64, name: &str, status: &str, latitude: f64, longitude: f64) -> Value {
    json!({
        "UnitID": id,
        "UnitName": name,
        "VehicleID": id + 100,
        "VehicleName": format!("Vehicle {id}"),
        "StatusName": status,
        "Latitude": latitude,
        "Longitude": longitude,
        "IncidentID": null,
        "Agency": "Golden Fire",
        "Jurisdiction": "Golden",
        "JurisdictionCode": "GC",
        "CurrentLocation": "STATION 1",
        "Speed": null,
        "DestinationLatitude": null,
        "DestinationLongitude": null,
        "Heading": null,
        "Personel": []
    })
}

pub fn incidents_body(success: bool, error: Option<&str>, incidents: &[Value]) -> Value {
    let mut body = json!({ "Success": success, "Incidents": incidents });
    if let Some(error) = error {
        body["Error"] = json!(error);
    }
    body
}

pub fn units_body(success: bool, error: Option<&str>, units: &[Value]) -> Value {
    let mut body = json!({ "Success": success, "Units": units });
    if let Some(error) = error {
        body["Error"] = json!(error);
    }
    body
}
