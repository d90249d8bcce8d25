//! Load family members from JSON

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use super::FamilyMember;
use crate::error::LoadError;

/// Either the stored `family_info_data` envelope or a bare member list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FamilyDocument {
    Envelope {
        #[serde(alias = "family-info-data")]
        family_info_data: Vec<FamilyMember>,
    },
    Members(Vec<FamilyMember>),
}

impl FamilyDocument {
    fn into_members(self) -> Vec<FamilyMember> {
        match self {
            FamilyDocument::Envelope { family_info_data } => family_info_data,
            FamilyDocument::Members(members) => members,
        }
    }
}

/// Load family members from a JSON file
pub fn load_family<P: AsRef<Path>>(path: P) -> Result<Vec<FamilyMember>, LoadError> {
    let file = File::open(path)?;
    load_family_from_reader(BufReader::new(file))
}

/// Load family members from any reader
pub fn load_family_from_reader<R: Read>(reader: R) -> Result<Vec<FamilyMember>, LoadError> {
    let document: FamilyDocument = serde_json::from_reader(reader)?;
    let members = document.into_members();
    log::debug!("loaded {} family members", members.len());
    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_envelope() {
        let json = r#"{"family_info_data": [
            {"id": "m1", "name": "Alex", "date_of_birth": "1985-02-01", "retirement_age": 65},
            {"id": "m2", "date-of-birth": "1987-09-12", "retirement-age": 60}
        ]}"#;
        let members = load_family_from_reader(json.as_bytes()).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name.as_deref(), Some("Alex"));
        assert_eq!(members[1].retirement_age, 60);
    }

    #[test]
    fn test_load_bare_array() {
        let json = r#"[{"id": "m1", "date_of_birth": "1985-02-01", "retirement_age": 65}]"#;
        let members = load_family_from_reader(json.as_bytes()).unwrap();
        assert_eq!(members[0].id, "m1");
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let err = load_family_from_reader("{\"family_info_data\": [".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }
}
