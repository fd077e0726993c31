//! Turns a raw provider body into a [`PhaseInfo`].

use crate::{
    config::ErrorPolicy,
    error::PhaseError,
    model::{ClosestPhase, ExternalPhaseDocument, MoonEvents, PhaseInfo, Phenomenon},
};

/// Parse, validate and project a provider response body.
pub fn map_response(body: &[u8], policy: ErrorPolicy) -> Result<PhaseInfo, PhaseError> {
    let doc = parse_document(body)?;
    let events = validate(&doc, policy)?;
    Ok(project(&doc, events))
}

/// A literal `null` body parses as an empty document.
pub fn parse_document(body: &[u8]) -> Result<ExternalPhaseDocument, PhaseError> {
    let doc: Option<ExternalPhaseDocument> = serde_json::from_slice(body)?;
    Ok(doc.unwrap_or_default())
}

/// Check the document can be projected and bind the moon events by name.
pub fn validate(doc: &ExternalPhaseDocument, policy: ErrorPolicy) -> Result<MoonEvents, PhaseError> {
    if doc.error && policy == ErrorPolicy::Reject {
        return Err(PhaseError::ProviderReported);
    }

    match doc.moon_data.as_slice() {
        [rise, upper_transit, set, ..] => Ok(MoonEvents {
            rise: rise.clone(),
            upper_transit: upper_transit.clone(),
            set: set.clone(),
        }),
        _ => Err(PhaseError::InsufficientData { moon_data: doc.moon_data.clone() }),
    }
}

pub fn project(doc: &ExternalPhaseDocument, events: MoonEvents) -> PhaseInfo {
    PhaseInfo {
        city: format!("{}, {}", doc.city, doc.state),
        lat: format!("{:.6}", doc.lat),
        lon: format!("{:.6}", doc.lon),
        closest_phase: closest_phase_summary(&doc.closest_phase),
        rise: phenomenon_summary(&events.rise),
        upper_transit: phenomenon_summary(&events.upper_transit),
        set: phenomenon_summary(&events.set),
    }
}

fn closest_phase_summary(closest: &ClosestPhase) -> String {
    format!("{}: {} {}", closest.phase, closest.date, closest.time)
}

fn phenomenon_summary(p: &Phenomenon) -> String {
    format!("{} - {}", p.phen, p.time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(moondata: serde_json::Value) -> Vec<u8> {
        json!({
            "error": false,
            "apiversion": "2.0.0",
            "city": "Seattle",
            "state": "WA",
            "lat": 47.5,
            "lon": -122.25,
            "moondata": moondata,
            "closestphase": {"phase": "Full Moon", "date": "2024-01-25", "time": "17:54"}
        })
        .to_string()
        .into_bytes()
    }

    fn three_events() -> serde_json::Value {
        json!([
            {"phen": "Rise", "time": "06:12"},
            {"phen": "Upper Transit", "time": "13:40"},
            {"phen": "Set", "time": "21:03"}
        ])
    }

    #[test]
    fn projects_a_full_document() {
        let info = map_response(&document(three_events()), ErrorPolicy::Ignore).unwrap();

        assert_eq!(
            info,
            PhaseInfo {
                city: "Seattle, WA".into(),
                lat: "47.500000".into(),
                lon: "-122.250000".into(),
                closest_phase: "Full Moon: 2024-01-25 17:54".into(),
                rise: "Rise - 06:12".into(),
                upper_transit: "Upper Transit - 13:40".into(),
                set: "Set - 21:03".into(),
            }
        );
    }

    #[test]
    fn extra_moon_events_are_ignored() {
        let moondata = json!([
            {"phen": "Set", "time": "00:27"},
            {"phen": "Rise", "time": "10:02"},
            {"phen": "Upper Transit", "time": "16:30"},
            {"phen": "Set", "time": "23:58"}
        ]);

        let info = map_response(&document(moondata), ErrorPolicy::Ignore).unwrap();

        assert_eq!(info.rise, "Set - 00:27");
        assert_eq!(info.upper_transit, "Rise - 10:02");
        assert_eq!(info.set, "Upper Transit - 16:30");
    }

    #[test]
    fn fewer_than_three_moon_events_is_insufficient() {
        for moondata in [
            json!([]),
            json!([{"phen": "Rise", "time": "06:12"}]),
            json!([{"phen": "Rise", "time": "06:12"}, {"phen": "Upper Transit", "time": "13:40"}]),
        ] {
            let expected = moondata.as_array().unwrap().len();
            let err = map_response(&document(moondata), ErrorPolicy::Ignore).unwrap_err();

            match err {
                PhaseError::InsufficientData { moon_data } => assert_eq!(moon_data.len(), expected),
                other => panic!("expected InsufficientData, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_and_null_moondata_is_insufficient() {
        let err = map_response(br#"{"city": "Seattle"}"#, ErrorPolicy::Ignore).unwrap_err();
        assert!(matches!(err, PhaseError::InsufficientData { ref moon_data } if moon_data.is_empty()));

        let err = map_response(&document(json!(null)), ErrorPolicy::Ignore).unwrap_err();
        assert!(matches!(err, PhaseError::InsufficientData { .. }));
    }

    #[test]
    fn null_strings_in_entries_format_as_empty() {
        let body = br#"{
            "city": "Seattle",
            "state": "WA",
            "moondata": [
                {"phen": "R", "time": null},
                {"phen": null, "time": "13:40"},
                {"phen": "S", "time": "21:03"}
            ],
            "closestphase": {"phase": "Full Moon", "date": null, "time": "17:54"}
        }"#;

        let info = map_response(body, ErrorPolicy::Ignore).unwrap();

        assert_eq!(info.rise, "R - ");
        assert_eq!(info.upper_transit, " - 13:40");
        assert_eq!(info.closest_phase, "Full Moon:  17:54");
    }

    #[test]
    fn null_body_is_an_empty_document() {
        let err = map_response(b"null", ErrorPolicy::Ignore).unwrap_err();
        assert!(matches!(err, PhaseError::InsufficientData { ref moon_data } if moon_data.is_empty()));
    }

    #[test]
    fn huge_coordinates_are_malformed() {
        let body = json!({"lat": 1e40, "moondata": three_events()}).to_string();

        let err = map_response(body.as_bytes(), ErrorPolicy::Ignore).unwrap_err();
        assert!(matches!(err, PhaseError::MalformedPayload(_)), "got {err:?}");
    }

    #[test]
    fn malformed_bodies_fail_to_parse() {
        for body in [
            &b"<html><body>502 Bad Gateway</body></html>"[..],
            &b"{\"moondata\": "[..],
            &b"{\"moondata\": \"soon\"}"[..],
            &b"{\"lat\": \"north\"}"[..],
            &b""[..],
        ] {
            let err = map_response(body, ErrorPolicy::Ignore).unwrap_err();
            assert!(matches!(err, PhaseError::MalformedPayload(_)), "body {body:?} gave {err:?}");
        }
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let body = json!({
            "city": "Seattle",
            "state": "WA",
            "moondata": three_events(),
            "fracillum": "99%",
            "curphase": "Waxing Gibbous",
        })
        .to_string();

        let info = map_response(body.as_bytes(), ErrorPolicy::Ignore).unwrap();
        assert_eq!(info.city, "Seattle, WA");
        assert_eq!(info.lat, "0.000000");
        assert_eq!(info.closest_phase, ":  ");
    }

    #[test]
    fn provider_error_flag_follows_policy() {
        let body = json!({
            "error": true,
            "moondata": three_events(),
        })
        .to_string();

        let info = map_response(body.as_bytes(), ErrorPolicy::Ignore).unwrap();
        assert_eq!(info.rise, "Rise - 06:12");

        let err = map_response(body.as_bytes(), ErrorPolicy::Reject).unwrap_err();
        assert!(matches!(err, PhaseError::ProviderReported));
    }
}
