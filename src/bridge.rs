//! Bridge response normalization
//!
//! Native bridge calls resolve to `{ data: <payload> }` where the payload is
//! either a success (`resultData`, `resultCode == 0`) or a failure
//! (`errorData`, non-zero `resultCode`). [`wrap_future`] folds a failed call
//! into a canonical empty failure, so callers only ever match on
//! [`BridgeResult`] and never see an error.

use std::fmt;
use std::future::IntoFuture;

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};

/// Result code of a successful call
pub const RESULT_OK: i32 = 0;
/// Result code of the canonical failure
pub const RESULT_FAILED: i32 = -1;

/// Successful payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataOk<T> {
    pub result_data: T,
    pub result_code: i32,
}

impl<T> DataOk<T> {
    pub fn new(result_data: T) -> Self {
        Self {
            result_data,
            result_code: RESULT_OK,
        }
    }
}

/// Error details of a failed call
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorData {
    pub msg: String,
    pub code: String,
}

impl fmt::Display for ErrorData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code.is_empty() {
            write!(f, "bridge call failed")?;
        } else {
            write!(f, "bridge call failed ({})", self.code)?;
        }
        if !self.msg.is_empty() {
            write!(f, ": {}", self.msg)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorData {}

/// Failed payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFail {
    pub error_data: ErrorData,
    pub result_code: i32,
}

impl DataFail {
    pub fn new(code: i32, msg: impl Into<String>, error_code: impl Into<String>) -> Self {
        Self {
            error_data: ErrorData {
                msg: msg.into(),
                code: error_code.into(),
            },
            result_code: code,
        }
    }

    /// `resultCode: -1` with an empty message and code
    pub fn empty() -> Self {
        Self {
            error_data: ErrorData::default(),
            result_code: RESULT_FAILED,
        }
    }
}

/// Exactly one of the two payload shapes.
///
/// Deserialization picks `Ok` when `resultData` is present and `Fail`
/// otherwise. Serialization writes the inner payload unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BridgeResult<T> {
    Ok(DataOk<T>),
    Fail(DataFail),
}

impl<T> BridgeResult<T> {
    pub fn ok(data: T) -> Self {
        BridgeResult::Ok(DataOk::new(data))
    }

    /// True for the success shape
    pub fn is_ok(&self) -> bool {
        matches!(self, BridgeResult::Ok(_))
    }

    pub fn result_code(&self) -> i32 {
        match self {
            BridgeResult::Ok(ok) => ok.result_code,
            BridgeResult::Fail(fail) => fail.result_code,
        }
    }

    pub fn into_result(self) -> Result<T, ErrorData> {
        match self {
            BridgeResult::Ok(ok) => Ok(ok.result_data),
            BridgeResult::Fail(fail) => Err(fail.error_data),
        }
    }
}

impl<T> From<DataFail> for BridgeResult<T> {
    fn from(fail: DataFail) -> Self {
        BridgeResult::Fail(fail)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for BridgeResult<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.get("resultData").is_some() {
            serde_json::from_value(value)
                .map(BridgeResult::Ok)
                .map_err(D::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(BridgeResult::Fail)
                .map_err(D::Error::custom)
        }
    }
}

/// What a bridge call resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct BridgeResponse<T> {
    pub data: BridgeResult<T>,
}

impl<T> BridgeResponse<T> {
    pub fn new(data: impl Into<BridgeResult<T>>) -> Self {
        Self { data: data.into() }
    }
}

impl<T> From<DataOk<T>> for BridgeResult<T> {
    fn from(ok: DataOk<T>) -> Self {
        BridgeResult::Ok(ok)
    }
}

/// Await a bridge call and normalize its outcome.
///
/// Never fails: a completed call passes its payload through untouched, a
/// failed one becomes [`DataFail::empty`]. The failure cause is only logged.
pub async fn wrap_future<T, E, F>(source: F) -> BridgeResult<T>
where
    F: IntoFuture<Output = Result<BridgeResponse<T>, E>>,
    E: fmt::Display,
{
    match source.await {
        Ok(response) => {
            if response.data.result_code() != RESULT_OK {
                log::debug!("Bridge call returned code {}", response.data.result_code());
            }
            response.data
        }
        Err(e) => {
            log::debug!("Bridge call failed: {e}");
            DataFail::empty().into()
        }
    }
}

/// Decode a bridge response from its JSON text
pub fn decode_response<T: DeserializeOwned>(json: &str) -> Result<BridgeResponse<T>, String> {
    serde_json::from_str(json).map_err(|e| format!("undecodable response: {e}"))
}

/// Await a JS promise resolving to a bridge response (WASM only).
///
/// Rejections and values that don't decode as a bridge response both become
/// [`DataFail::empty`].
#[cfg(target_arch = "wasm32")]
pub async fn wrap_promise<T: DeserializeOwned>(promise: js_sys::Promise) -> BridgeResult<T> {
    wrap_future(async move {
        let value = wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(|e| format!("rejected: {:?}", e))?;
        let json: String = js_sys::JSON::stringify(&value)
            .map_err(|e| format!("unserializable: {:?}", e))?
            .into();
        decode_response(&json)
    })
    .await
}

/// `wrapPromise(promise)` for page scripts: resolves to the normalized
/// `DataOk`/`DataFail` object and never rejects.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(js_name = wrapPromise)]
pub async fn wrap_promise_js(promise: js_sys::Promise) -> wasm_bindgen::JsValue {
    let result = wrap_promise::<serde_json::Value>(promise).await;
    serde_json::to_string(&result)
        .ok()
        .and_then(|json| js_sys::JSON::parse(&json).ok())
        .unwrap_or(wasm_bindgen::JsValue::NULL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn resolve<T>(data: BridgeResult<T>) -> Result<BridgeResponse<T>, String> {
        Ok(BridgeResponse::new(data))
    }

    async fn reject<T>(cause: &str) -> Result<BridgeResponse<T>, String> {
        Err(cause.to_string())
    }

    #[test]
    fn test_is_ok() {
        assert!(BridgeResult::ok("hello").is_ok());
        assert!(!BridgeResult::<&str>::Fail(DataFail::new(-1, "error", "error")).is_ok());
    }

    #[test]
    fn test_wire_shape() {
        let ok = serde_json::to_value(BridgeResult::ok("hello")).unwrap();
        assert_eq!(ok, json!({ "resultData": "hello", "resultCode": 0 }));

        let fail = serde_json::to_value(BridgeResult::<String>::from(DataFail::empty())).unwrap();
        assert_eq!(
            fail,
            json!({ "errorData": { "msg": "", "code": "" }, "resultCode": -1 })
        );
    }

    #[test]
    fn test_discriminates_on_result_data() {
        let ok: BridgeResult<Option<u32>> =
            serde_json::from_value(json!({ "resultData": null, "resultCode": 0 })).unwrap();
        assert_eq!(ok, BridgeResult::ok(None));

        // Without `resultData` this is a failure even for an optional payload
        let fail: BridgeResult<Option<u32>> = serde_json::from_value(
            json!({ "errorData": { "msg": "m", "code": "c" }, "resultCode": 3 }),
        )
        .unwrap();
        assert_eq!(fail, BridgeResult::Fail(DataFail::new(3, "m", "c")));

        let bad = serde_json::from_value::<BridgeResult<u32>>(json!({ "resultCode": 0 }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_response_deserialize() {
        let response: BridgeResponse<Vec<u32>> =
            serde_json::from_str(r#"{"data":{"resultData":[1,2],"resultCode":0}}"#).unwrap();
        assert_eq!(response.data.into_result(), Ok(vec![1, 2]));
    }

    #[test]
    fn test_into_result() {
        let fail: BridgeResult<u32> = DataFail::new(5, "boom", "E_BOOM").into();
        let err = fail.into_result().unwrap_err();
        assert_eq!(err.code, "E_BOOM");
        assert_eq!(err.to_string(), "bridge call failed (E_BOOM): boom");
        assert_eq!(ErrorData::default().to_string(), "bridge call failed");
    }

    #[tokio::test]
    async fn test_wrap_success() {
        let result = wrap_future(resolve(BridgeResult::ok("hello".to_string()))).await;
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "resultData": "hello", "resultCode": 0 })
        );
    }

    #[tokio::test]
    async fn test_wrap_failure_passes_through() {
        let fake = DataFail::new(-1, "error", "error");
        let result = wrap_future(resolve::<String>(fake.clone().into())).await;
        assert_eq!(result, BridgeResult::Fail(fake));
    }

    #[tokio::test]
    async fn test_wrap_failure_keeps_code() {
        let result = wrap_future(resolve::<String>(DataFail::new(42, "", "").into())).await;
        assert_eq!(result.result_code(), 42);
    }

    #[tokio::test]
    async fn test_wrap_rejection() {
        let result = wrap_future(reject::<String>("error")).await;
        assert_eq!(result, BridgeResult::Fail(DataFail::empty()));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "errorData": { "code": "", "msg": "" }, "resultCode": -1 })
        );
    }

    #[tokio::test]
    async fn test_wrap_decode_error() {
        let source = async {
            serde_json::from_str::<BridgeResponse<u32>>(r#"{"data":"nonsense"}"#)
        };
        let result = wrap_future(source).await;
        assert_eq!(result, BridgeResult::Fail(DataFail::empty()));
    }

    #[tokio::test]
    async fn test_wrap_decoded_json() {
        // Same path a resolved JS promise takes after `JSON.stringify`
        let ok = wrap_future(async {
            decode_response::<serde_json::Value>(
                r#"{"data":{"resultData":"hello","resultCode":0}}"#,
            )
        })
        .await;
        assert_eq!(ok, BridgeResult::ok(json!("hello")));

        let fail = wrap_future(async {
            decode_response::<serde_json::Value>(
                r#"{"data":{"errorData":{"msg":"error","code":"error"},"resultCode":-1}}"#,
            )
        })
        .await;
        assert_eq!(fail, BridgeResult::Fail(DataFail::new(-1, "error", "error")));

        for junk in ["undefined", "null", "42", r#"{"data":null}"#] {
            let result = wrap_future(async { decode_response::<serde_json::Value>(junk) }).await;
            assert_eq!(result, BridgeResult::Fail(DataFail::empty()), "{junk}");
        }
    }
}
