// ============================================================
// EXTRACTION CONTRACT
// ============================================================
// The five fields requested from the model. The request schema and the
// response parser are both built from this file.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

use super::error::{AppError, Result};

/// One field the model is asked to fill in.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// JSON key in the model response
    pub key: &'static str,
    /// Korean description placed in the response schema
    pub description: &'static str,
}

pub const EXTRACTION_FIELDS: [FieldSpec; 5] = [
    FieldSpec {
        key: "requestingOrg",
        description: "문서를 발송한 요청 기관 (예: 서울강남경찰서)",
    },
    FieldSpec {
        key: "requestorName",
        description: "요청자(담당 수사관)의 이름",
    },
    FieldSpec {
        key: "warrantNumber",
        description: "접수번호 또는 영장번호",
    },
    FieldSpec {
        key: "email",
        description: "회신용 이메일 주소",
    },
    FieldSpec {
        key: "itemsToSeize",
        description: "압수할 물건에 대한 설명",
    },
];

pub const EXTRACTION_INSTRUCTION: &str = "첨부된 문서는 경찰 기관에서 발송한 공문(압수수색검증영장 또는 자료 제공 요청서)입니다. \
문서에서 다음 정보를 찾아 JSON으로 반환하세요: 요청 기관(requestingOrg), 요청자 이름(requestorName), \
접수번호 또는 영장번호(warrantNumber), 이메일 주소(email), 압수할 물건(itemsToSeize). \
문서에 없는 항목은 추측하지 말고 빈 문자열(\"\")로 반환하세요.";

/// Fields as returned by the model. Missing or `null` fields become empty
/// strings; numbers and booleans are coerced to their string form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExtraction {
    #[serde(default, deserialize_with = "lenient_string")]
    pub requesting_org: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub requestor_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub warrant_number: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub items_to_seize: String,
}

impl RawExtraction {
    /// Gemini `responseSchema` for the five fields.
    pub fn response_schema() -> Value {
        let mut properties = Map::new();
        for field in EXTRACTION_FIELDS.iter() {
            properties.insert(
                field.key.to_string(),
                json!({ "type": "STRING", "description": field.description }),
            );
        }
        let keys: Vec<&str> = EXTRACTION_FIELDS.iter().map(|f| f.key).collect();

        json!({
            "type": "OBJECT",
            "properties": properties,
            "required": keys,
            "propertyOrdering": keys,
        })
    }

    /// Parse the JSON text emitted by the model.
    pub fn from_model_text(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AppError::ParseError("Model returned empty text".to_string()));
        }
        let value: Value = serde_json::from_str(trimmed)
            .map_err(|e| AppError::ParseError(format!("Invalid extraction JSON: {}", e)))?;
        if !value.is_object() {
            return Err(AppError::ParseError(
                "Extraction JSON is not an object".to_string(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| AppError::ParseError(format!("Invalid extraction JSON: {}", e)))
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    })
}
