//! DTOs for decoding FEMA DisasterDeclarationsSummaries responses.
//!
//! The adapter decodes into these transport DTOs first, then maps into domain
//! records (`DeclarationRecord`) in one pass. Upstream program indicators are
//! loosely typed (0/1 integers or booleans depending on API vintage), so the
//! DTO resolves truthiness here.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::ports::DeclarationRecord;

#[derive(Debug, Deserialize)]
pub(super) struct FemaResponseDto {
    #[serde(rename = "DisasterDeclarationsSummaries", default)]
    pub(super) summaries: Vec<FemaDeclarationDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct FemaDeclarationDto {
    pub(super) declaration_title: Option<String>,
    pub(super) designated_area: Option<String>,
    pub(super) state: Option<String>,
    pub(super) incident_type: Option<String>,
    pub(super) declaration_type: Option<String>,
    pub(super) ih_program_declared: Option<Value>,
    pub(super) ia_program_declared: Option<Value>,
    pub(super) pa_program_declared: Option<Value>,
    pub(super) hm_program_declared: Option<Value>,
    pub(super) last_refresh: Option<String>,
    pub(super) disaster_number: Option<Value>,
}

fn flag_set(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_i64().is_some_and(|n| n != 0),
        _ => false,
    }
}

fn value_to_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    }
}

impl FemaResponseDto {
    pub(super) fn into_domain_records(self) -> Vec<DeclarationRecord> {
        self.summaries
            .into_iter()
            .map(FemaDeclarationDto::into_domain_record)
            .collect()
    }
}

impl FemaDeclarationDto {
    fn into_domain_record(self) -> DeclarationRecord {
        let assistance_declared = flag_set(self.ih_program_declared.as_ref())
            || flag_set(self.ia_program_declared.as_ref())
            || flag_set(self.pa_program_declared.as_ref())
            || flag_set(self.hm_program_declared.as_ref());
        // Older feed snapshots carry `state` instead of `designatedArea`.
        let designated_area = self
            .designated_area
            .filter(|area| !area.is_empty())
            .or(self.state)
            .unwrap_or_default();

        DeclarationRecord {
            title: self.declaration_title.unwrap_or_default(),
            designated_area,
            incident_type: self.incident_type,
            declaration_type: self.declaration_type,
            assistance_declared,
            last_refresh: self.last_refresh,
            disaster_number: value_to_string(self.disaster_number.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_the_summaries_collection() {
        let body = r#"{
            "DisasterDeclarationsSummaries": [
                {
                    "declarationTitle": "Severe Flooding",
                    "state": "CA",
                    "incidentType": "Flood",
                    "declarationType": "DR",
                    "ihProgramDeclared": 0,
                    "iaProgramDeclared": 1,
                    "paProgramDeclared": 0,
                    "hmProgramDeclared": 0,
                    "lastRefresh": "2024-03-01T00:00:00.000000Z",
                    "disasterNumber": 4700
                }
            ]
        }"#;

        let decoded: FemaResponseDto = serde_json::from_str(body).expect("body decodes");
        let records = decoded.into_domain_records();
        assert_eq!(records.len(), 1);

        let record = records.first().expect("one record");
        assert_eq!(record.title, "Severe Flooding");
        assert_eq!(record.designated_area, "CA");
        assert_eq!(record.incident_type.as_deref(), Some("Flood"));
        assert!(record.assistance_declared);
        assert_eq!(record.disaster_number.as_deref(), Some("4700"));
    }

    #[test]
    fn designated_area_wins_over_state() {
        let body = r#"{
            "DisasterDeclarationsSummaries": [
                {
                    "declarationTitle": "Hurricane Landfall",
                    "designatedArea": "Monroe (County)",
                    "state": "FL"
                }
            ]
        }"#;

        let decoded: FemaResponseDto = serde_json::from_str(body).expect("body decodes");
        let records = decoded.into_domain_records();
        assert_eq!(
            records.first().expect("one record").designated_area,
            "Monroe (County)"
        );
    }

    #[test]
    fn missing_collection_decodes_as_empty() {
        let decoded: FemaResponseDto = serde_json::from_str("{}").expect("body decodes");
        assert!(decoded.into_domain_records().is_empty());
    }

    #[test]
    fn boolean_program_flags_are_accepted() {
        let body = r#"{
            "DisasterDeclarationsSummaries": [
                { "declarationTitle": "T", "state": "TX", "hmProgramDeclared": true }
            ]
        }"#;

        let decoded: FemaResponseDto = serde_json::from_str(body).expect("body decodes");
        assert!(decoded.into_domain_records().first().expect("record").assistance_declared);
    }

    #[test]
    fn unset_program_flags_mean_no_assistance() {
        let body = r#"{
            "DisasterDeclarationsSummaries": [
                { "declarationTitle": "T", "state": "TX" }
            ]
        }"#;

        let decoded: FemaResponseDto = serde_json::from_str(body).expect("body decodes");
        assert!(!decoded.into_domain_records().first().expect("record").assistance_declared);
    }
}
