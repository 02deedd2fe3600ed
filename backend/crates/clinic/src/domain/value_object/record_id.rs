//! Human-readable ids of clinic records
//!
//! Every id is `{prefix}-{sequence}-{suffix}` as built by
//! [`kernel::id::generate`], with one prefix per record kind.

use kernel::id;

macro_rules! clinic_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            derive_more::Display,
        )]
        #[serde(transparent)]
        #[display("{_0}")]
        pub struct $name(String);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Mint the id for the `sequence`-th record of this kind.
            pub fn generate(sequence: i64) -> Self {
                Self(id::generate(Self::PREFIX, sequence))
            }

            pub fn from_db(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

clinic_id!(
    /// `patient-001-xxxxxxxx`
    PatientId,
    "patient"
);
clinic_id!(
    /// `appointment-001-xxxxxxxx`
    AppointmentId,
    "appointment"
);
clinic_id!(
    /// `record-001-xxxxxxxx`
    MedicalRecordId,
    "record"
);
clinic_id!(
    /// `assessment-001-xxxxxxxx`
    AssessmentId,
    "assessment"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert!(PatientId::generate(5).as_str().starts_with("patient-005-"));
        assert!(AppointmentId::generate(12).as_str().starts_with("appointment-012-"));
        assert!(MedicalRecordId::generate(1).as_str().starts_with("record-001-"));
        assert!(AssessmentId::generate(100).as_str().starts_with("assessment-100-"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = PatientId::from_db("patient-001-abcdEFGH");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"patient-001-abcdEFGH\"");
    }
}
