//! Scoring service input
//!
//! The eleven numeric features the prediction service expects, derived
//! from an assessment's free-form `answers` object. The outbound key names
//! are fixed by the service, including the odd one out, `DALYs`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentFeatures {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub schizophrenia_share: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub anxiety_share: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub bipolar_share: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub eating_disorder_share: f64,
    #[serde(rename = "DALYs", default, deserialize_with = "null_as_zero")]
    pub dalys: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub suicide_rate: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub depression_dalys: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub schizophrenia_dalys: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub bipolar_dalys: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub eating_dalys: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub anxiety_dalys: f64,
}

impl AssessmentFeatures {
    /// Missing keys become `0.0`; unrelated keys are ignored. Fails when a
    /// feature key holds anything but a number or `null`.
    pub fn from_answers(answers: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(answers)
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_keys_default_to_zero() {
        let features = AssessmentFeatures::from_answers(&json!({
            "anxiety_share": 4.2,
            "DALYs": 1500,
            "mood": "ok"
        }))
        .unwrap();

        assert_eq!(features.anxiety_share, 4.2);
        assert_eq!(features.dalys, 1500.0);
        assert_eq!(features.suicide_rate, 0.0);
    }

    #[test]
    fn test_non_numeric_feature_fails() {
        let result = AssessmentFeatures::from_answers(&json!({ "suicide_rate": "high" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_outbound_keys() {
        let value = serde_json::to_value(AssessmentFeatures::default()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 11);
        assert!(object.contains_key("DALYs"));
        assert!(object.contains_key("eating_disorder_share"));
        assert!(!object.contains_key("dalys"));
    }
}
