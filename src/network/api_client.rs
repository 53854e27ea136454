//! REST API client.
//!
//! One shared `fetch_json` drives every endpoint.  Non-2xx responses become
//! `Err` carrying the status plus the backend's `detail` string when the
//! error body has one, so callers can surface it in a toast as-is.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

pub struct ApiClient;

impl ApiClient {
    fn api_base_url() -> String {
        super::get_api_base_url()
    }

    // ---------------- Credential slots ----------------

    /// Masked status of one token slot.  404 means the slot is unset.
    pub async fn get_token_status(agent_id: u32, token_type: &str) -> Result<String, JsValue> {
        let url = format!(
            "{}/api/agents/{}/tokens/{}",
            Self::api_base_url(),
            agent_id,
            token_type
        );
        Self::fetch_json(&url, "GET", None).await
    }

    pub async fn set_token(agent_id: u32, token_type: &str, token: &str) -> Result<String, JsValue> {
        let url = format!(
            "{}/api/agents/{}/tokens/{}",
            Self::api_base_url(),
            agent_id,
            token_type
        );
        let body = serde_json::json!({ "token": token }).to_string();
        Self::fetch_json(&url, "POST", Some(&body)).await
    }

    pub async fn delete_token(agent_id: u32, token_type: &str) -> Result<(), JsValue> {
        let url = format!(
            "{}/api/agents/{}/tokens/{}",
            Self::api_base_url(),
            agent_id,
            token_type
        );
        let _ = Self::fetch_json(&url, "DELETE", None).await?;
        Ok(())
    }

    // ---------------- Workflow persistence ----------------

    pub async fn get_workflow(workflow_id: u32) -> Result<String, JsValue> {
        let url = format!("{}/api/workflows/{}", Self::api_base_url(), workflow_id);
        Self::fetch_json(&url, "GET", None).await
    }

    pub async fn update_workflow(workflow_id: u32, payload: &str) -> Result<String, JsValue> {
        let url = format!("{}/api/workflows/{}", Self::api_base_url(), workflow_id);
        Self::fetch_json(&url, "PUT", Some(payload)).await
    }

    // ---------------- Shared fetch helper ----------------

    pub async fn fetch_json(url: &str, method: &str, body: Option<&str>) -> Result<String, JsValue> {
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);

        let headers = Headers::new()?;
        if let Some(data) = body {
            opts.set_body(&JsValue::from_str(data));
            headers.append("Content-Type", "application/json")?;
        }
        opts.set_headers(&headers);

        let request = Request::new_with_str_and_init(url, &opts)?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
        let resp: Response = resp_value.dyn_into()?;

        if !resp.ok() {
            let status = resp.status();
            // Best-effort: prefer the backend's `detail` string over the
            // bare status text.
            let detail = match resp.text() {
                Ok(promise) => JsFuture::from(promise)
                    .await
                    .ok()
                    .and_then(|v| v.as_string())
                    .and_then(|text| {
                        serde_json::from_str::<serde_json::Value>(&text)
                            .ok()
                            .and_then(|v| {
                                v.get("detail").and_then(|d| d.as_str()).map(str::to_string)
                            })
                    }),
                Err(_) => None,
            };
            let message = detail.unwrap_or_else(|| resp.status_text());
            return Err(JsValue::from_str(&format!("{}: {}", status, message)));
        }

        let text = JsFuture::from(resp.text()?).await?;
        Ok(text.as_string().unwrap_or_default())
    }
}
