//! Wire format for procedure calls
//!
//! Single call: `GET /trpc/hello.world?input=<json>` or `POST /trpc/user.upsert`
//! with a JSON body. Batched calls add `batch=1`, join procedure names with
//! commas and key inputs by call index (`{"0": .., "1": ..}`). Every call is
//! answered with one envelope; a batch is answered with an array of them in
//! request order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RpcError, RpcErrorCode};

/// Query parameter that marks a batched request
pub const BATCH_PARAM: &str = "batch";

/// Query parameter carrying JSON input for GET requests
pub const INPUT_PARAM: &str = "input";

/// Separator between procedure names in a batched path
pub const PATH_SEPARATOR: char = ',';

/// HTTP status used when calls in one batch ended differently
pub const MULTI_STATUS: u16 = 207;

/// One response envelope per procedure call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    Result { result: ResultData },
    Error { error: ErrorShape },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultData {
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorShape {
    pub message: String,
    /// JSON-RPC numeric code
    pub code: i32,
    pub data: ErrorData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorData {
    pub code: RpcErrorCode,
    #[serde(rename = "httpStatus")]
    pub http_status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Envelope {
    pub fn ok(data: Value) -> Self {
        Self::Result {
            result: ResultData { data },
        }
    }

    pub fn from_error(err: &RpcError) -> Self {
        Self::Error {
            error: ErrorShape {
                message: err.message.clone(),
                code: err.code.json_rpc_code(),
                data: ErrorData {
                    code: err.code,
                    http_status: err.code.http_status(),
                    path: err.path.clone(),
                },
            },
        }
    }

    /// HTTP status this envelope would be answered with on its own
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Result { .. } => 200,
            Self::Error { error } => error.data.http_status,
        }
    }

    pub fn into_result(self) -> Result<Value, RpcError> {
        match self {
            Self::Result { result } => Ok(result.data),
            Self::Error { error } => Err(RpcError {
                code: error.data.code,
                message: error.message,
                path: error.data.path,
            }),
        }
    }
}

impl From<Result<Value, RpcError>> for Envelope {
    fn from(outcome: Result<Value, RpcError>) -> Self {
        match outcome {
            Ok(data) => Self::ok(data),
            Err(err) => Self::from_error(&err),
        }
    }
}

/// Status for a whole batch: the shared status if every call agrees,
/// otherwise 207.
pub fn batch_status(envelopes: &[Envelope]) -> u16 {
    let mut statuses = envelopes.iter().map(Envelope::http_status);
    match statuses.next() {
        None => 200,
        Some(first) if statuses.all(|s| s == first) => first,
        Some(_) => MULTI_STATUS,
    }
}

/// Join procedure names into a batched path segment
pub fn join_paths<S: AsRef<str>>(paths: &[S]) -> String {
    paths
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join(&PATH_SEPARATOR.to_string())
}

/// Split a batched path segment into procedure names
pub fn split_paths(raw: &str) -> Vec<&str> {
    raw.split(PATH_SEPARATOR).collect()
}

/// Encode per-call inputs as an index-keyed object. `null` inputs are left
/// out, matching how a call without input is sent.
pub fn encode_batch_input(inputs: &[Value]) -> Value {
    let map: Map<String, Value> = inputs
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_null())
        .map(|(i, v)| (i.to_string(), v.clone()))
        .collect();
    Value::Object(map)
}

/// Decode an index-keyed batch input into one value per call.
///
/// Missing entries become `null`. Anything other than an object (or no
/// input at all) is a bad request.
pub fn decode_batch_input(raw: Option<Value>, calls: usize) -> Result<Vec<Value>, RpcError> {
    let mut map = match raw {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(RpcError::bad_request(format!(
                "batch input must be an object keyed by call index, got {}",
                json_kind(&other)
            )))
        }
    };

    Ok((0..calls)
        .map(|i| map.remove(&i.to_string()).unwrap_or(Value::Null))
        .collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_envelope_shape() {
        let env = Envelope::ok(json!("hi"));
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({"result": {"data": "hi"}})
        );
    }

    #[test]
    fn error_envelope_shape() {
        let env = Envelope::from_error(&RpcError::not_found("a.b"));
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["error"]["code"], json!(-32004));
        assert_eq!(value["error"]["data"]["code"], json!("NOT_FOUND"));
        assert_eq!(value["error"]["data"]["httpStatus"], json!(404));
        assert_eq!(value["error"]["data"]["path"], json!("a.b"));
    }

    #[test]
    fn error_envelope_parses_back_into_rpc_error() {
        let raw = json!({
            "error": {
                "message": "nope",
                "code": -32005,
                "data": {"code": "METHOD_NOT_SUPPORTED", "httpStatus": 405, "path": "user.upsert"}
            }
        });
        let env: Envelope = serde_json::from_value(raw).unwrap();
        let err = env.into_result().unwrap_err();
        assert_eq!(err.code, RpcErrorCode::MethodNotSupported);
        assert_eq!(err.path.as_deref(), Some("user.upsert"));
    }

    #[test]
    fn batch_status_rules() {
        assert_eq!(batch_status(&[]), 200);
        assert_eq!(batch_status(&[Envelope::ok(json!(1)), Envelope::ok(json!(2))]), 200);

        let missing = Envelope::from_error(&RpcError::not_found("x"));
        assert_eq!(batch_status(&[missing.clone(), missing.clone()]), 404);
        assert_eq!(batch_status(&[Envelope::ok(json!(1)), missing]), 207);
    }

    #[test]
    fn batch_input_skips_null_and_fills_gaps() {
        let encoded = encode_batch_input(&[Value::Null, json!({"name": "a"})]);
        assert_eq!(encoded, json!({"1": {"name": "a"}}));

        let decoded = decode_batch_input(Some(encoded), 3).unwrap();
        assert_eq!(decoded, vec![Value::Null, json!({"name": "a"}), Value::Null]);
    }

    #[test]
    fn batch_input_rejects_non_object() {
        let err = decode_batch_input(Some(json!([1, 2])), 2).unwrap_err();
        assert_eq!(err.code, RpcErrorCode::BadRequest);
        assert!(err.message.contains("array"));
    }

    #[test]
    fn paths_join_and_split() {
        let joined = join_paths(&["hello.world", "user.list"]);
        assert_eq!(joined, "hello.world,user.list");
        assert_eq!(split_paths(&joined), vec!["hello.world", "user.list"]);
    }
}
