//! Fixed per-type field schemas.
//!
//! Each document type has exactly one schema. Emission order in the case
//! narrative is the order of the slice returned by [`schema_for`].

use serde::Serialize;

use crate::models::DocumentType;

/// One entry of a document type's form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Stable key used by callers to address the field.
    pub name: &'static str,
    /// Label written in front of the value in the case narrative.
    pub label: &'static str,
    /// Label shown next to the input, including hints for the author.
    pub prompt: &'static str,
    /// Rendered as a text area rather than a single-line input.
    pub multiline: bool,
}

const fn field(
    name: &'static str,
    label: &'static str,
    prompt: &'static str,
    multiline: bool,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        prompt,
        multiline,
    }
}

const INITIAL_OUTPATIENT: &[FieldSpec] = &[
    field("referral", "Zuweisung", "Zuweisung (Wer, Datum, Anlass)", false),
    field("complaints", "Aktuelle Beschwerden", "Aktuelle Beschwerden", true),
    field("history", "Anamnese", "Anamnese (persönlich, Medikamente, Sozial)", true),
    field("status", "Status", "Klinischer Status", true),
    field("suspected_diagnosis", "Verdachtsdiagnose", "Klinische Verdachtsdiagnose", false),
    field("findings", "Befunde", "Befunde (Labor, Bilder, Untersuchung)", true),
    field("assessment", "Einschätzung", "Klinische Einschätzung", true),
    field("plan", "Therapeutisches Vorgehen", "Therapeutisches Vorgehen", true),
];

const FOLLOW_UP_OUTPATIENT: &[FieldSpec] = &[
    field("patient", "Patient", "Patient", false),
    field("course", "Verlauf", "Verlauf seit letzter Konsultation", true),
    field("new_findings", "Neue Befunde", "Neue Befunde", true),
    field("assessment", "Beurteilung", "Beurteilung", true),
    field("plan", "Therapie", "Therapie / Weiteres Vorgehen", true),
];

const MEDICATION_APPROVAL: &[FieldSpec] = &[
    field("context", "Klinischer Kontext", "Klinischer Kontext (Diagnose, Verlauf)", true),
    field("medication", "Beantragtes Medikament", "Beantragtes Medikament / Indikation", false),
    field("dosage", "Dosierung", "Dosierung und Therapiedauer", false),
    field("prior_therapies", "Bisherige Therapien", "Bisherige Therapien und Verträglichkeit", true),
    field("justification", "Begründung", "Begründung der Kostengutsprache", true),
];

const REHABILITATION_APPROVAL: &[FieldSpec] = &[
    field("patient", "Patient", "Patient", false),
    field("context", "Klinischer Kontext", "Klinischer Kontext (Diagnose, Verlauf)", true),
    field("rehabilitation", "Beantragte Rehabilitation", "Rehabilitationsmassnahme (Art, Klinik, Dauer)", false),
    field("goals", "Rehabilitationsziele", "Rehabilitationsziele", true),
    field("justification", "Begründung", "Begründung der Kostengutsprache", true),
];

const INPATIENT_REPORT: &[FieldSpec] = &[
    field("patient", "Patient", "Patient", false),
    field("admission_reason", "Anlass", "Anlass / Aufnahmegrund", true),
    field("findings", "Befunde", "Befunde (Labor, Bilder, Untersuchung)", true),
    field("course", "Verlauf", "Stationärer Verlauf", true),
    field("therapy", "Therapie", "Therapie / Weiteres Vorgehen", true),
];

/// The fixed field schema for a document type.
pub fn schema_for(document_type: DocumentType) -> &'static [FieldSpec] {
    match document_type {
        DocumentType::InitialOutpatient => INITIAL_OUTPATIENT,
        DocumentType::FollowUpOutpatient => FOLLOW_UP_OUTPATIENT,
        DocumentType::MedicationApproval => MEDICATION_APPROVAL,
        DocumentType::RehabilitationApproval => REHABILITATION_APPROVAL,
        DocumentType::InpatientReport => INPATIENT_REPORT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_type_has_a_non_empty_schema() {
        for t in DocumentType::all() {
            assert!(!schema_for(*t).is_empty(), "{t} has no fields");
        }
    }

    #[test]
    fn field_names_unique_within_schema() {
        for t in DocumentType::all() {
            let schema = schema_for(*t);
            let names: HashSet<_> = schema.iter().map(|f| f.name).collect();
            assert_eq!(names.len(), schema.len(), "duplicate field name in {t}");
        }
    }

    #[test]
    fn medication_schema_order() {
        let labels: Vec<_> = schema_for(DocumentType::MedicationApproval)
            .iter()
            .map(|f| f.label)
            .collect();
        assert_eq!(
            &labels[..3],
            &["Klinischer Kontext", "Beantragtes Medikament", "Dosierung"]
        );
    }

    #[test]
    fn initial_outpatient_starts_with_referral_and_ends_with_plan() {
        let schema = schema_for(DocumentType::InitialOutpatient);
        assert_eq!(schema.first().unwrap().name, "referral");
        assert_eq!(schema.last().unwrap().label, "Therapeutisches Vorgehen");
        assert_eq!(schema.len(), 8);
    }
}
