use std::fmt;

use serde::Serialize;

use super::schema::{schema_for, FieldSpec};
use super::FormError;
use crate::models::DocumentType;

/// Ordered field values for one document type.
///
/// Values are held by schema position, so iteration order is always
/// the narrative emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    document_type: DocumentType,
    values: Vec<String>,
}

impl FieldSet {
    /// All fields of `document_type`, each set to the empty string.
    pub fn empty(document_type: DocumentType) -> Self {
        Self {
            document_type,
            values: vec![String::new(); schema_for(document_type).len()],
        }
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.values[i].as_str())
    }

    /// `(spec, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldSpec, &str)> + '_ {
        schema_for(self.document_type)
            .iter()
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn is_blank(&self) -> bool {
        self.values.iter().all(|v| v.trim().is_empty())
    }

    fn position(&self, name: &str) -> Option<usize> {
        schema_for(self.document_type)
            .iter()
            .position(|f| f.name == name)
    }

    fn set(&mut self, name: &str, value: String) -> Result<(), FormError> {
        let idx = self.position(name).ok_or_else(|| FormError::UnknownField {
            document_type: self.document_type,
            field: name.to_string(),
        })?;
        self.values[idx] = value;
        Ok(())
    }
}

/// Plain-text block sent as the content the completion service acts on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CaseNarrative(String);

impl CaseNarrative {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Blank narratives mean "nothing to generate"; callers skip the call.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for CaseNarrative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CaseNarrative {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CaseNarrative {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Holds the active document type and its field values for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormAssembler {
    fields: FieldSet,
}

impl Default for FormAssembler {
    fn default() -> Self {
        Self::new(DocumentType::default())
    }
}

impl FormAssembler {
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            fields: FieldSet::empty(document_type),
        }
    }

    pub fn document_type(&self) -> DocumentType {
        self.fields.document_type()
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name)
    }

    /// Parse `selector` (slug or German label) and switch to that type.
    ///
    /// On success the field set is reinitialised, also when the same type is
    /// selected again. On failure the current type and values are kept.
    pub fn select_document_type(&mut self, selector: &str) -> Result<DocumentType, FormError> {
        let document_type: DocumentType = selector.parse()?;
        self.select(document_type);
        Ok(document_type)
    }

    pub fn select(&mut self, document_type: DocumentType) {
        self.fields = FieldSet::empty(document_type);
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        self.fields.set(name, value.into())
    }

    /// Render the case narrative: one `"<label>: <value>"` line per field,
    /// in schema order. Empty when every field is blank.
    pub fn build_narrative(&self) -> CaseNarrative {
        if self.fields.is_blank() {
            return CaseNarrative::default();
        }

        let lines: Vec<String> = self
            .fields
            .iter()
            .map(|(spec, value)| format!("{}: {}", spec.label, value))
            .collect();

        CaseNarrative(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_form_has_all_fields_empty() {
        let form = FormAssembler::new(DocumentType::FollowUpOutpatient);
        assert_eq!(form.fields().iter().count(), 5);
        assert!(form.fields().iter().all(|(_, v)| v.is_empty()));
    }

    #[test]
    fn empty_form_yields_blank_narrative_for_every_type() {
        let mut form = FormAssembler::default();
        for t in DocumentType::all() {
            form.select(*t);
            let narrative = form.build_narrative();
            assert_eq!(narrative.as_str().trim(), "", "{t}");
            assert!(narrative.is_blank());
        }
    }

    #[test]
    fn whitespace_only_values_count_as_blank() {
        let mut form = FormAssembler::new(DocumentType::InpatientReport);
        form.set_field("patient", "   ").unwrap();
        form.set_field("findings", "\n\t").unwrap();
        assert!(form.build_narrative().is_blank());
    }

    #[test]
    fn build_narrative_is_deterministic() {
        let mut form = FormAssembler::new(DocumentType::InitialOutpatient);
        form.set_field("referral", "Hausarzt, 03.02., Thoraxschmerz").unwrap();
        form.set_field("findings", "EKG unauffällig").unwrap();
        let first = form.build_narrative();
        let second = form.build_narrative();
        assert_eq!(first.as_str().as_bytes(), second.as_str().as_bytes());
    }

    #[test]
    fn medication_narrative_lists_fields_in_order() {
        let mut form = FormAssembler::default();
        form.select_document_type("Kostengutsprache Medikament").unwrap();
        form.set_field("context", "72yo patient with osteoporosis").unwrap();
        form.set_field("medication", "Drug A").unwrap();
        form.set_field("dosage", "10mg weekly").unwrap();

        let narrative = form.build_narrative().into_string();
        let lines: Vec<&str> = narrative.lines().collect();
        assert_eq!(lines[0], "Klinischer Kontext: 72yo patient with osteoporosis");
        assert_eq!(lines[1], "Beantragtes Medikament: Drug A");
        assert_eq!(lines[2], "Dosierung: 10mg weekly");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn partially_filled_form_keeps_blank_lines() {
        let mut form = FormAssembler::new(DocumentType::InpatientReport);
        form.set_field("therapy", "Antibiose").unwrap();
        assert_eq!(
            form.build_narrative().as_str(),
            "Patient: \nAnlass: \nBefunde: \nVerlauf: \nTherapie: Antibiose"
        );
    }

    #[test]
    fn unknown_field_is_rejected_without_mutation() {
        let mut form = FormAssembler::new(DocumentType::MedicationApproval);
        form.set_field("medication", "Drug A").unwrap();
        let before = form.fields().clone();

        let err = form.set_field("referral", "Hausarzt").unwrap_err();
        assert_eq!(
            err,
            FormError::UnknownField {
                document_type: DocumentType::MedicationApproval,
                field: "referral".into(),
            }
        );
        assert_eq!(form.fields(), &before);
    }

    #[test]
    fn invalid_document_type_keeps_previous_state() {
        let mut form = FormAssembler::new(DocumentType::InpatientReport);
        form.set_field("patient", "Frau M., 81").unwrap();
        let before = form.clone();

        let err = form.select_document_type("Arztbrief").unwrap_err();
        assert!(matches!(err, FormError::InvalidDocumentType(_)));
        assert_eq!(form, before);
    }

    #[test]
    fn selecting_resets_fields_even_for_same_type() {
        let mut form = FormAssembler::new(DocumentType::FollowUpOutpatient);
        form.set_field("course", "stabil").unwrap();
        form.select_document_type("follow_up_outpatient").unwrap();
        assert_eq!(form.field("course"), Some(""));
    }

    #[test]
    fn field_lookup_by_name() {
        let mut form = FormAssembler::new(DocumentType::RehabilitationApproval);
        form.set_field("goals", "Gehfähigkeit").unwrap();
        assert_eq!(form.field("goals"), Some("Gehfähigkeit"));
        assert_eq!(form.field("dosage"), None);
    }
}
