use serde::{Deserialize, Serialize};

use crate::form::FormError;

/// Macro to generate a document-type enum with slug, display label,
/// template key and a `std::str::FromStr` accepting either slug or label.
macro_rules! document_enum {
    ($name:ident {
        $($variant:ident => ($slug:literal, $label:literal, $key:literal)),+ $(,)?
    }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All variants in selector order.
            pub fn all() -> &'static [$name] {
                &[$(Self::$variant),+]
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $slug),+
                }
            }

            /// German label shown in the document-type selector.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Configuration key under which the instruction template is stored.
            pub fn template_key(&self) -> &'static str {
                match self {
                    $(Self::$variant => $key),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = FormError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($slug | $label => Ok(Self::$variant)),+,
                    _ => Err(FormError::InvalidDocumentType(s.into())),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

document_enum!(DocumentType {
    InitialOutpatient => ("initial_outpatient", "Ambulanter Erstbericht", "ERSTBERICHT_PROMPT"),
    FollowUpOutpatient => ("follow_up_outpatient", "Ambulanter Verlaufsbericht", "VERLAUF_PROMPT"),
    MedicationApproval => ("medication_approval", "Kostengutsprache Medikament", "KOSTENGUT_MED_PROMPT"),
    RehabilitationApproval => ("rehabilitation_approval", "Kostengutsprache Rehabilitation", "KOSTENGUT_REHA_PROMPT"),
    InpatientReport => ("inpatient_report", "Stationärer Bericht", "STATIONAER_PROMPT"),
});

impl Default for DocumentType {
    fn default() -> Self {
        Self::InitialOutpatient
    }
}

impl DocumentType {
    /// Reverse lookup from a template configuration key.
    pub fn from_template_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.template_key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn document_type_round_trip() {
        for (variant, slug, label) in [
            (DocumentType::InitialOutpatient, "initial_outpatient", "Ambulanter Erstbericht"),
            (DocumentType::FollowUpOutpatient, "follow_up_outpatient", "Ambulanter Verlaufsbericht"),
            (DocumentType::MedicationApproval, "medication_approval", "Kostengutsprache Medikament"),
            (
                DocumentType::RehabilitationApproval,
                "rehabilitation_approval",
                "Kostengutsprache Rehabilitation",
            ),
            (DocumentType::InpatientReport, "inpatient_report", "Stationärer Bericht"),
        ] {
            assert_eq!(variant.as_str(), slug);
            assert_eq!(variant.label(), label);
            assert_eq!(DocumentType::from_str(slug).unwrap(), variant);
            assert_eq!(DocumentType::from_str(label).unwrap(), variant);
        }
    }

    #[test]
    fn unknown_selector_is_rejected() {
        let err = DocumentType::from_str("Arztbrief").unwrap_err();
        assert!(matches!(err, FormError::InvalidDocumentType(ref s) if s == "Arztbrief"));
    }

    #[test]
    fn template_keys_are_distinct() {
        let mut keys: Vec<_> = DocumentType::all().iter().map(|t| t.template_key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 5);
    }

    #[test]
    fn from_template_key_finds_variant() {
        assert_eq!(
            DocumentType::from_template_key("KOSTENGUT_REHA_PROMPT"),
            Some(DocumentType::RehabilitationApproval)
        );
        assert_eq!(DocumentType::from_template_key("UNKNOWN_PROMPT"), None);
    }

    #[test]
    fn serializes_as_slug() {
        let json = serde_json::to_string(&DocumentType::MedicationApproval).unwrap();
        assert_eq!(json, "\"medication_approval\"");
        let parsed: DocumentType = serde_json::from_str("\"inpatient_report\"").unwrap();
        assert_eq!(parsed, DocumentType::InpatientReport);
    }

    #[test]
    fn default_is_first_in_selector() {
        assert_eq!(DocumentType::default(), DocumentType::all()[0]);
    }
}
