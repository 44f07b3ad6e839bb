//! Session and scan records supplied by the acquisition front end.
//!
//! Both records are open mappings: only a handful of keys are known to this crate and are
//! modelled as named fields; everything else is carried through untouched in a flattened
//! `serde_json::Map` so it can be written back into `metadata.json`.

use crate::constants::{FILE_NAME_KEY, METADATA_INDENT, NAME_STRING_KEY};
use crate::{MirrorError, MirrorResult};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Session record describing the subject and study.
///
/// Only `subject_id` is read. The whole record is embedded into the metadata file with its
/// values unchanged and its other keys in input order; `subject_id` is always written first,
/// and an explicit `"subject_id": null` reads as absent so it is not written back.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,

    /// Every other key of the session record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionInfo {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: Some(subject_id.into()),
            extra: Map::new(),
        }
    }
}

/// Parameter record of a completed scan.
///
/// `name_string` (acquisition timestamp) and `fileName` (primary output file) are required
/// by the mirror but optional here, so a malformed record still deserializes and the
/// mirror can report which field is missing.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScanInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_string: Option<String>,

    #[serde(rename = "fileName", default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Remaining scan parameters; values may be any JSON (numbers, arrays, objects, null).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScanInfo {
    pub fn new(name_string: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            name_string: Some(name_string.into()),
            file_name: Some(file_name.into()),
            extra: Map::new(),
        }
    }

    /// Returns every scan parameter, named fields included, with its value coerced to a
    /// string.
    pub fn scan_parameters(&self) -> BTreeMap<String, String> {
        let mut params: BTreeMap<String, String> = self
            .extra
            .iter()
            .map(|(key, value)| (key.clone(), value_to_string(value)))
            .collect();

        if let Some(name_string) = &self.name_string {
            params.insert(NAME_STRING_KEY.to_string(), name_string.clone());
        }
        if let Some(file_name) = &self.file_name {
            params.insert(FILE_NAME_KEY.to_string(), file_name.clone());
        }

        params
    }
}

/// String representation of a parameter value.
///
/// Strings are taken as-is (no surrounding quotes); any other value is rendered as compact
/// JSON text, e.g. `[1,2,3]` or `null`.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The record written to `metadata.json` in every session directory.
#[derive(Debug, Serialize)]
pub struct MetadataRecord<'a> {
    pub session_info: &'a SessionInfo,
    pub scan_parameters: BTreeMap<String, String>,
}

impl<'a> MetadataRecord<'a> {
    pub fn new(session_info: &'a SessionInfo, scan_info: &ScanInfo) -> Self {
        Self {
            session_info,
            scan_parameters: scan_info.scan_parameters(),
        }
    }

    /// Renders the record as pretty-printed JSON with 4-space indentation.
    pub fn to_pretty_json(&self) -> MirrorResult<Vec<u8>> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(METADATA_INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)
            .map_err(MirrorError::Serialization)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scan_from(value: Value) -> ScanInfo {
        serde_json::from_value(value).expect("valid scan record")
    }

    #[test]
    fn test_scan_info_splits_known_keys() {
        let scan = scan_from(json!({
            "name_string": "2024.03.15.09.30.00.123456",
            "fileName": "RARE.2024.03.15.09.30.00.123456.mat",
            "seqName": "RARE",
            "nScans": 4,
        }));

        assert_eq!(scan.name_string.as_deref(), Some("2024.03.15.09.30.00.123456"));
        assert_eq!(
            scan.file_name.as_deref(),
            Some("RARE.2024.03.15.09.30.00.123456.mat")
        );
        assert_eq!(scan.extra.len(), 2);
        assert!(!scan.extra.contains_key("fileName"));
    }

    #[test]
    fn test_scan_parameters_keep_key_set_and_stringify_values() {
        let scan = scan_from(json!({
            "name_string": "2024.03.15.09.30.00.123456",
            "fileName": "scan.mat",
            "seqName": "RARE",
            "nScans": 4,
            "larmorFreq": 3.066,
            "fov": [120.0, 120.0, 120.0],
            "shimming": {"x": 0, "y": 1},
            "dummy": null,
            "rdGradAmplitude": true,
        }));

        let params = scan.scan_parameters();

        let keys: Vec<&str> = params.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "dummy",
                "fileName",
                "fov",
                "larmorFreq",
                "nScans",
                "name_string",
                "rdGradAmplitude",
                "seqName",
                "shimming",
            ]
        );
        assert_eq!(params["seqName"], "RARE");
        assert_eq!(params["nScans"], "4");
        assert_eq!(params["larmorFreq"], "3.066");
        assert_eq!(params["fov"], "[120.0,120.0,120.0]");
        assert_eq!(params["shimming"], r#"{"x":0,"y":1}"#);
        assert_eq!(params["dummy"], "null");
        assert_eq!(params["rdGradAmplitude"], "true");
        assert_eq!(params["fileName"], "scan.mat");
    }

    #[test]
    fn test_session_info_serializes_verbatim() {
        let original = json!({
            "subject_id": "Jane Doe",
            "study_id": "STUDY-7",
            "scanner": {"field": 0.08, "site": "lab"},
        });
        let session: SessionInfo = serde_json::from_value(original.clone()).unwrap();

        assert_eq!(session.subject_id.as_deref(), Some("Jane Doe"));
        assert_eq!(serde_json::to_value(&session).unwrap(), original);
    }

    #[test]
    fn test_session_info_keeps_key_order() {
        let input = r#"{"subject_id":"S01","zeta":1,"alpha":{"b":2,"a":1},"mid":"x"}"#;
        let session: SessionInfo = serde_json::from_str(input).unwrap();

        assert_eq!(serde_json::to_string(&session).unwrap(), input);
    }

    #[test]
    fn test_null_subject_id_reads_as_absent() {
        let session: SessionInfo =
            serde_json::from_str(r#"{"subject_id":null,"study_id":"STUDY-7"}"#).unwrap();

        assert_eq!(session.subject_id, None);
        assert_eq!(
            serde_json::to_string(&session).unwrap(),
            r#"{"study_id":"STUDY-7"}"#
        );
    }

    #[test]
    fn test_absent_subject_id_is_not_emitted() {
        let original = json!({"study_id": "STUDY-7"});
        let session: SessionInfo = serde_json::from_value(original.clone()).unwrap();

        assert_eq!(session.subject_id, None);
        assert_eq!(serde_json::to_value(&session).unwrap(), original);
    }

    #[test]
    fn test_metadata_record_uses_four_space_indent() {
        let session = SessionInfo::new("S01");
        let scan = ScanInfo::new("2024.03.15.09.30.00.123456", "scan.mat");
        let bytes = MetadataRecord::new(&session, &scan).to_pretty_json().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("{\n    \"session_info\": {\n        \"subject_id\": \"S01\""));
        assert!(text.contains("\n    \"scan_parameters\": {"));

        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["scan_parameters"]["fileName"], "scan.mat");
    }
}
