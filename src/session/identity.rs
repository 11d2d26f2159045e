use serde::{Deserialize, Serialize};

/// Who the examinee says they are. Captured at login, echoed into every
/// real-mode result record. Aliases accept the original deployment's field
/// names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ExamineeIdentity {
    #[serde(alias = "username")]
    pub(crate) name: String,
    #[serde(alias = "doituong")]
    pub(crate) category: String,
    #[serde(alias = "capbac")]
    pub(crate) rank: String,
    #[serde(alias = "chucvu")]
    pub(crate) role: String,
    #[serde(alias = "donvi")]
    pub(crate) unit: String,
}

impl ExamineeIdentity {
    pub(crate) fn validate(&self) -> Result<(), String> {
        let fields = [
            ("name", &self.name),
            ("category", &self.category),
            ("rank", &self.rank),
            ("role", &self.role),
            ("unit", &self.unit),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(format!("{field} must not be empty"));
            }
        }
        Ok(())
    }
}

/// Admin-session marker persisted for session restoration; `expires_at` is a
/// unix timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct AdminMarker {
    pub(crate) username: String,
    pub(crate) expires_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_identity_fields() {
        let identity = ExamineeIdentity {
            name: "Nguyen Van A".to_string(),
            category: "Siquan-QNCN".to_string(),
            rank: " ".to_string(),
            role: "Trung đội trưởng".to_string(),
            unit: "d1".to_string(),
        };
        assert!(identity.validate().is_err());
    }

    #[test]
    fn identity_accepts_legacy_field_names() {
        let identity: ExamineeIdentity = serde_json::from_value(serde_json::json!({
            "username": "Nguyen Van A",
            "doituong": "Chiensimoi",
            "capbac": "Binh nhì",
            "chucvu": "Chiến sĩ",
            "donvi": "c2"
        }))
        .expect("legacy identity");
        assert_eq!(identity.name, "Nguyen Van A");
        assert_eq!(identity.category, "Chiensimoi");
    }

    #[test]
    fn admin_marker_round_trips() {
        let marker = AdminMarker { username: "admin".to_string(), expires_at: 1_735_000_000 };
        let json = serde_json::to_value(&marker).expect("serialize");
        let back: AdminMarker = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, marker);
    }
}
