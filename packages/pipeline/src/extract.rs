//! Maps validated dispatch records to map features.
//!
//! Incidents are placed only when both coordinates are present and
//! non-zero; units always carry a position and are always placed. Output
//! coordinates are longitude first.

use dispatch_map_dispatch_models::{DispatchResponse, IncidentRecord, UnitRecord};
use dispatch_map_feature_models::MapFeature;

/// Callsign used for incidents whose type has not been classified yet.
pub const UNKNOWN_INCIDENT_CALLSIGN: &str = "Unknown Incident";

/// Returns `Some((longitude, latitude))` when both values are present and
/// non-zero.
#[must_use]
pub fn incident_position(incident: &IncidentRecord) -> Option<(f64, f64)> {
    let latitude = incident.location.latitude?;
    let longitude = incident.location.longitude?;
    if latitude == 0.0 || longitude == 0.0 || latitude.is_nan() || longitude.is_nan() {
        return None;
    }
    Some((longitude, latitude))
}

/// Builds the feature for an incident, or `None` if it cannot be placed.
#[must_use]
pub fn incident_feature(incident: &IncidentRecord) -> Option<MapFeature> {
    let (longitude, latitude) = incident_position(incident)?;
    let callsign = incident
        .incident_type
        .incident_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(UNKNOWN_INCIDENT_CALLSIGN);

    Some(MapFeature::point(
        incident.incident_id.to_string(),
        callsign,
        "",
        longitude,
        latitude,
    ))
}

/// Builds the feature for a unit.
#[must_use]
pub fn unit_feature(unit: &UnitRecord) -> MapFeature {
    MapFeature::point(
        unit.unit_id.to_string(),
        unit.unit_name.as_str(),
        unit.status_name.as_str(),
        unit.longitude,
        unit.latitude,
    )
}

/// Extracts every placeable feature from `response`, in record order.
///
/// Records are extracted regardless of the response's `Success` flag.
#[must_use]
pub fn extract(response: &DispatchResponse) -> Vec<MapFeature> {
    match response {
        DispatchResponse::Incidents(r) => {
            let incidents = r.incidents.as_deref().unwrap_or_default();
            let features: Vec<MapFeature> =
                incidents.iter().filter_map(incident_feature).collect();
            let skipped = incidents.len() - features.len();
            if skipped > 0 {
                log::debug!("Skipped {skipped} incident(s) without coordinates");
            }
            features
        }
        DispatchResponse::Units(r) => r.units.iter().map(unit_feature).collect(),
    }
}

#[cfg(test)]
mod tests {
    use dispatch_map_dispatch_models::DataType;

    use super::*;
    use crate::test_fixtures::{incident, incidents_body, unit, units_body};

    fn parse(data_type: DataType, body: &serde_json::Value) -> DispatchResponse {
        DispatchResponse::parse(data_type, &body.to_string()).unwrap()
    }

    #[test]
    fn incident_coordinates_are_longitude_first() {
        let records = [incident(1, Some("FIRE"), Some(39.755), Some(-105.221))];
        let body = incidents_body(true, None, &records);
        let features = extract(&parse(DataType::Incidents, &body));
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].coordinates(), [-105.221, 39.755]);
        assert_eq!(features[0].id, "1");
        assert_eq!(features[0].callsign, "FIRE");
        assert_eq!(features[0].remarks, "");
    }

    #[test]
    fn skips_incident_with_null_latitude_but_keeps_siblings() {
        let body = incidents_body(
            true,
            None,
            &[
                incident(1, Some("FIRE"), Some(39.7), Some(-105.2)),
                incident(2, Some("MEDICAL"), None, Some(-105.2)),
                incident(3, Some("TRAFFIC"), Some(39.8), Some(-105.3)),
            ],
        );
        let ids: Vec<String> = extract(&parse(DataType::Incidents, &body))
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn skips_incident_with_zero_coordinates() {
        let body = incidents_body(
            true,
            None,
            &[
                incident(1, Some("FIRE"), Some(0.0), Some(-105.2)),
                incident(2, Some("FIRE"), Some(39.7), Some(0.0)),
            ],
        );
        assert!(extract(&parse(DataType::Incidents, &body)).is_empty());
    }

    #[test]
    fn unclassified_incident_gets_fallback_callsign() {
        let body = incidents_body(true, None, &[incident(9, None, Some(39.7), Some(-105.2))]);
        let features = extract(&parse(DataType::Incidents, &body));
        assert_eq!(features[0].callsign, UNKNOWN_INCIDENT_CALLSIGN);
    }

    #[test]
    fn null_incident_list_yields_nothing() {
        let body = serde_json::json!({"Success": true, "Incidents": null});
        assert!(extract(&parse(DataType::Incidents, &body)).is_empty());
    }

    #[test]
    fn every_unit_becomes_a_feature() {
        let body = units_body(
            true,
            None,
            &[
                unit(1, "E1", "Available", 39.7, -105.2),
                unit(2, "M2", "Enroute", 39.8, -105.3),
                unit(3, "L3", "On Scene", 0.0, 0.0),
            ],
        );
        let features = extract(&parse(DataType::Units, &body));
        assert_eq!(features.len(), 3);
        let callsigns: Vec<&str> = features.iter().map(|f| f.callsign.as_str()).collect();
        assert_eq!(callsigns, vec!["E1", "M2", "L3"]);
        assert_eq!(features[1].remarks, "Enroute");
        assert_eq!(features[1].coordinates(), [-105.3, 39.8]);
    }

    #[test]
    fn extracts_records_from_unsuccessful_response() {
        let body = incidents_body(
            false,
            Some("partial outage"),
            &[incident(5, Some("FIRE"), Some(39.7), Some(-105.2))],
        );
        assert_eq!(extract(&parse(DataType::Incidents, &body)).len(), 1);
    }
}
