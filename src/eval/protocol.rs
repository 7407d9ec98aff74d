use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One submission to the evaluation service: the surface as a base64 PNG and
/// the accumulated variable bindings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EvalRequest {
    pub image: String,
    pub variables: HashMap<String, String>,
}

/// One unit of service output. `is_assignment` means the pair is folded into
/// the binding store instead of being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionResult {
    pub expression: String,
    pub answer: String,
    pub is_assignment: bool,
}

impl ExpressionResult {
    /// Display-ready string handed to the text renderer.
    pub fn display_text(&self) -> String {
        format!("{} = {}", self.expression, self.answer)
    }
}

#[derive(Debug, Deserialize)]
struct WireResult {
    expr: String,
    result: serde_json::Value,
    #[serde(default)]
    assign: bool,
}

impl WireResult {
    fn into_result(self) -> ExpressionResult {
        let answer = match self.result {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        ExpressionResult {
            expression: self.expr,
            answer,
            is_assignment: self.assign,
        }
    }
}

/// Decode a response body into expression results. Accepts either a top-level
/// array or an object with a `data` array. Malformed records are discarded
/// individually; valid records in the same batch still apply.
pub fn decode_results(body: &str) -> anyhow::Result<Vec<ExpressionResult>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let records = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("data") {
            Some(serde_json::Value::Array(items)) => items,
            _ => anyhow::bail!("evaluation response has no result array"),
        },
        _ => anyhow::bail!("evaluation response is not an array"),
    };

    Ok(records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<WireResult>(record) {
            Ok(wire) => Some(wire.into_result()),
            Err(err) => {
                tracing::warn!(%err, "discarding malformed expression result");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_array_in_order() {
        let body = r#"[
            {"expr": "2+2", "result": "4", "assign": false},
            {"expr": "x", "result": "3", "assign": true}
        ]"#;
        let results = decode_results(body).expect("decode");
        assert_eq!(
            results,
            vec![
                ExpressionResult {
                    expression: "2+2".into(),
                    answer: "4".into(),
                    is_assignment: false,
                },
                ExpressionResult {
                    expression: "x".into(),
                    answer: "3".into(),
                    is_assignment: true,
                },
            ]
        );
    }

    #[test]
    fn decodes_data_wrapped_responses() {
        let body = r#"{"message": "ok", "data": [{"expr": "1+1", "result": "2"}]}"#;
        let results = decode_results(body).expect("decode");
        assert_eq!(results.len(), 1);
        assert!(!results[0].is_assignment);
    }

    #[test]
    fn numeric_answers_are_stringified() {
        let body = r#"[{"expr": "2+2", "result": 4}]"#;
        let results = decode_results(body).expect("decode");
        assert_eq!(results[0].answer, "4");
    }

    #[test]
    fn malformed_records_are_discarded_without_losing_the_batch() {
        let body = r#"[
            {"result": "orphan"},
            {"expr": "2+2", "result": "4"},
            "not even an object"
        ]"#;
        let results = decode_results(body).expect("decode");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].expression, "2+2");
    }

    #[test]
    fn non_array_body_is_an_error() {
        assert!(decode_results(r#"{"message": "no data"}"#).is_err());
        assert!(decode_results("42").is_err());
        assert!(decode_results("not json").is_err());
    }

    #[test]
    fn display_text_combines_expression_and_answer() {
        let result = ExpressionResult {
            expression: "2+2".into(),
            answer: "4".into(),
            is_assignment: false,
        };
        assert_eq!(result.display_text(), "2+2 = 4");
    }
}
