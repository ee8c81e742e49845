//! Response schema: rendered for the scoring service and enforced on its replies.
//!
//! The remote reply is untyped JSON. Nothing is promoted to an `AnalysisResult`
//! until every required field is present with the right type and the score is a
//! number within 0..=100.

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::screening::models::{AnalysisResult, ReviewResult, ScreeningResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    String,
    StringArray,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
}

/// Which typed result a conforming reply is promoted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    Review,
    Screening,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub shape: ResultShape,
    pub fields: Vec<SchemaField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("score {0} is outside 0-100")]
    ScoreOutOfRange(String),
}

impl SchemaDescriptor {
    pub fn review() -> Self {
        Self {
            shape: ResultShape::Review,
            fields: vec![
                SchemaField {
                    name: "score",
                    kind: FieldKind::Number,
                    description: "Overall ATS score from 0 to 100.",
                },
                SchemaField {
                    name: "summary",
                    kind: FieldKind::String,
                    description: "An encouraging summary of the candidate.",
                },
                SchemaField {
                    name: "pros",
                    kind: FieldKind::StringArray,
                    description: "Strengths of the resume.",
                },
                SchemaField {
                    name: "cons",
                    kind: FieldKind::StringArray,
                    description: "Actionable improvements for the resume.",
                },
            ],
        }
    }

    pub fn screening() -> Self {
        Self {
            shape: ResultShape::Screening,
            fields: vec![
                SchemaField {
                    name: "score",
                    kind: FieldKind::Number,
                    description: "Score from 0 to 100 based on the analysis.",
                },
                SchemaField {
                    name: "summary",
                    kind: FieldKind::String,
                    description: "A brief summary justifying the score.",
                },
            ],
        }
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Renders the descriptor in the `responseSchema` dialect of the Gemini API.
    pub fn to_response_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let property = match field.kind {
                FieldKind::Number => json!({"type": "NUMBER", "description": field.description}),
                FieldKind::String => json!({"type": "STRING", "description": field.description}),
                FieldKind::StringArray => json!({
                    "type": "ARRAY",
                    "items": {"type": "STRING"},
                    "description": field.description,
                }),
            };
            properties.insert(field.name.to_string(), property);
        }

        json!({
            "type": "OBJECT",
            "properties": properties,
            "required": self.required_fields().collect::<Vec<_>>(),
        })
    }

    /// Checks a decoded reply and promotes it to a typed result.
    pub fn validate(&self, value: &Value) -> Result<AnalysisResult, SchemaViolation> {
        let object = value.as_object().ok_or(SchemaViolation::NotAnObject)?;

        for field in &self.fields {
            let present = object
                .get(field.name)
                .ok_or(SchemaViolation::MissingField(field.name))?;
            check_kind(field, present)?;
        }

        let score = read_score(object)?;
        let summary = read_string(object, "summary")?;

        Ok(match self.shape {
            ResultShape::Review => AnalysisResult::Review(ReviewResult {
                score,
                summary,
                pros: read_string_array(object, "pros")?,
                cons: read_string_array(object, "cons")?,
            }),
            ResultShape::Screening => AnalysisResult::Screening(ScreeningResult { score, summary }),
        })
    }
}

fn check_kind(field: &SchemaField, value: &Value) -> Result<(), SchemaViolation> {
    let ok = match field.kind {
        FieldKind::Number => value.is_number(),
        FieldKind::String => value.is_string(),
        FieldKind::StringArray => value
            .as_array()
            .map(|items| items.iter().all(Value::is_string))
            .unwrap_or(false),
    };
    if ok {
        Ok(())
    } else {
        Err(SchemaViolation::WrongType {
            field: field.name,
            expected: match field.kind {
                FieldKind::Number => "a number",
                FieldKind::String => "a string",
                FieldKind::StringArray => "an array of strings",
            },
        })
    }
}

/// Fractional scores are rounded to the nearest integer after the range check.
fn read_score(object: &Map<String, Value>) -> Result<u8, SchemaViolation> {
    let raw = object
        .get("score")
        .ok_or(SchemaViolation::MissingField("score"))?;
    let score = raw.as_f64().ok_or(SchemaViolation::WrongType {
        field: "score",
        expected: "a number",
    })?;
    if !score.is_finite() || !(0.0..=100.0).contains(&score) {
        return Err(SchemaViolation::ScoreOutOfRange(raw.to_string()));
    }
    Ok(score.round() as u8)
}

fn read_string(object: &Map<String, Value>, field: &'static str) -> Result<String, SchemaViolation> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(SchemaViolation::MissingField(field))
}

fn read_string_array(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, SchemaViolation> {
    let items = object
        .get(field)
        .and_then(Value::as_array)
        .ok_or(SchemaViolation::MissingField(field))?;
    Ok(items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_schema_renders_required_fields() {
        let schema = SchemaDescriptor::review().to_response_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["required"], json!(["score", "summary", "pros", "cons"]));
        assert_eq!(schema["properties"]["pros"]["type"], "ARRAY");
        assert_eq!(schema["properties"]["pros"]["items"]["type"], "STRING");
        assert_eq!(schema["properties"]["score"]["type"], "NUMBER");
    }

    #[test]
    fn test_screening_schema_renders_two_fields() {
        let schema = SchemaDescriptor::screening().to_response_schema();
        assert_eq!(schema["required"], json!(["score", "summary"]));
        assert!(schema["properties"].get("pros").is_none());
    }

    #[test]
    fn test_valid_review_is_promoted() {
        let reply = json!({
            "score": 81,
            "summary": "Clear story",
            "pros": ["Quantified impact"],
            "cons": ["Trim the objective", "Add links"]
        });
        let result = SchemaDescriptor::review().validate(&reply).unwrap();
        assert_eq!(
            result,
            AnalysisResult::Review(ReviewResult {
                score: 81,
                summary: "Clear story".to_string(),
                pros: vec!["Quantified impact".to_string()],
                cons: vec!["Trim the objective".to_string(), "Add links".to_string()],
            })
        );
    }

    #[test]
    fn test_valid_screening_ignores_extra_fields() {
        let reply = json!({"score": 64, "summary": "Generalist", "notes": "extra"});
        let result = SchemaDescriptor::screening().validate(&reply).unwrap();
        assert_eq!(result.score(), 64);
        assert_eq!(result.summary(), "Generalist");
    }

    #[test]
    fn test_missing_field_is_violation() {
        let reply = json!({"score": 70, "summary": "ok", "pros": []});
        let err = SchemaDescriptor::review().validate(&reply).unwrap_err();
        assert_eq!(err, SchemaViolation::MissingField("cons"));
    }

    #[test]
    fn test_score_out_of_range_is_violation() {
        let reply = json!({"score": 130, "summary": "too good"});
        let err = SchemaDescriptor::screening().validate(&reply).unwrap_err();
        assert!(matches!(err, SchemaViolation::ScoreOutOfRange(_)));

        let reply = json!({"score": -1, "summary": "too bad"});
        assert!(SchemaDescriptor::screening().validate(&reply).is_err());
    }

    #[test]
    fn test_score_as_string_is_violation() {
        let reply = json!({"score": "90", "summary": "stringly"});
        let err = SchemaDescriptor::screening().validate(&reply).unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::WrongType {
                field: "score",
                expected: "a number"
            }
        );
    }

    #[test]
    fn test_fractional_score_is_rounded() {
        let reply = json!({"score": 87.6, "summary": "close"});
        let result = SchemaDescriptor::screening().validate(&reply).unwrap();
        assert_eq!(result.score(), 88);
    }

    #[test]
    fn test_non_string_array_items_are_violation() {
        let reply = json!({"score": 50, "summary": "s", "pros": [1, 2], "cons": []});
        let err = SchemaDescriptor::review().validate(&reply).unwrap_err();
        assert!(matches!(err, SchemaViolation::WrongType { field: "pros", .. }));
    }

    #[test]
    fn test_non_object_is_violation() {
        let err = SchemaDescriptor::screening()
            .validate(&json!([1, 2, 3]))
            .unwrap_err();
        assert_eq!(err, SchemaViolation::NotAnObject);
    }
}
