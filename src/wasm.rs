//! JavaScript boundary. Requests and responses cross as plain JS objects.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::ServiceConfig;
use crate::model::{ModelRegistry, UniformScorer};
use crate::service::{ErrorBody, PredictRequest, PredictService};

/// Status used when a request body does not match `PredictRequest`.
const UNPROCESSABLE: u16 = 422;

#[wasm_bindgen]
pub struct OthelloApi {
    service: PredictService,
}

#[wasm_bindgen]
impl OthelloApi {
    /// `config` may be `undefined`, `null` or a partial `ServiceConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<OthelloApi, JsValue> {
        let config: ServiceConfig = if config.is_undefined() || config.is_null() {
            ServiceConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|err| {
                error_value(&ErrorBody {
                    status: UNPROCESSABLE,
                    detail: err.to_string(),
                })
            })?
        };

        Ok(Self {
            service: PredictService::new(ModelRegistry::new(), config),
        })
    }

    /// Registers `NTRV` weights under `key`; rejects with `{status, detail}`.
    #[wasm_bindgen(js_name = loadModel)]
    pub fn load_model(&mut self, key: &str, bytes: &[u8]) -> Result<(), JsValue> {
        self.service
            .registry_mut()
            .load_weights(key, bytes)
            .map_err(|err| error_value(&ErrorBody::from(&err)))
    }

    /// Registers the baseline model that plays the lowest-index legal square.
    #[wasm_bindgen(js_name = loadUniformModel)]
    pub fn load_uniform_model(&mut self, key: &str) {
        self.service.registry_mut().insert(key, UniformScorer);
    }

    pub fn root(&self) -> Result<JsValue, JsValue> {
        to_js(&self.service.root())
    }

    pub fn status(&self) -> Result<JsValue, JsValue> {
        to_js(&self.service.status())
    }

    /// Resolves to `{x, y}` or `{pass: true}`; rejects with `{status, detail}`.
    pub fn predict(&self, request: JsValue) -> Result<JsValue, JsValue> {
        let request: PredictRequest = serde_wasm_bindgen::from_value(request).map_err(|err| {
            error_value(&ErrorBody {
                status: UNPROCESSABLE,
                detail: err.to_string(),
            })
        })?;

        match self.service.predict(&request) {
            Ok(response) => to_js(&response),
            Err(err) => Err(error_value(&err.to_body())),
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn error_value(body: &ErrorBody) -> JsValue {
    serde_wasm_bindgen::to_value(body).unwrap_or_else(|_| JsValue::from_str(&body.detail))
}
