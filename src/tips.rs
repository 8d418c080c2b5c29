//! Post-game marketing tip
//!
//! One sentence from a hosted text model, tailored to the business and its
//! biggest challenge. Any failure degrades to a canned tip so the lead flow
//! never stalls.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// No API key configured
pub const FALLBACK_NO_KEY: &str = "Focus on consistent branding to build trust with your audience.";
/// Service answered with no text
pub const FALLBACK_EMPTY: &str = "Consistent effort is the key to marketing success!";
/// Network or service failure
pub const FALLBACK_ERROR: &str = "Optimize your funnel to convert more leads into customers.";

const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipRequest {
    pub business_name: String,
    pub challenge: String,
    /// Final revenue
    pub score: u64,
}

impl TipRequest {
    pub fn prompt(&self) -> String {
        format!(
            "You are a senior marketing strategist.\n\
             A business owner named \"{}\" just played a game testing their marketing skills.\n\
             They scored {} ROI points.\n\
             Their current biggest real-world challenge is: \"{}\".\n\n\
             Generate a single, punchy, encouraging, and actionable 1-sentence marketing tip \
             specifically for their challenge.\n\
             Do not include quotes.",
            self.business_name, self.score, self.challenge
        )
    }

    /// `generateContent` request body
    pub fn body(&self) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(self.prompt()),
                }],
            }],
        };
        Ok(serde_json::to_string(&body)?)
    }
}

pub fn endpoint_url(model: &str) -> String {
    format!("{}/{}:generateContent", ENDPOINT, model)
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

/// Pull the first candidate's text out of a `generateContent` response.
///
/// `Ok(None)` means the response was well formed but carried no text.
pub fn extract_text(json: &str) -> Result<Option<String>> {
    let response: GenerateResponse = serde_json::from_str(json)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();
    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}

/// Collapse a fetch outcome into the tip to show
pub fn resolve(outcome: Result<Option<String>>) -> String {
    match outcome {
        Ok(Some(tip)) => tip,
        Ok(None) => {
            log::warn!("Tip service returned no text");
            FALLBACK_EMPTY.to_string()
        }
        Err(e) => {
            log::error!("Tip generation failed: {}", e);
            FALLBACK_ERROR.to_string()
        }
    }
}

/// Fetch a tip, never failing
#[cfg(target_arch = "wasm32")]
pub async fn request_tip(api_key: Option<&str>, model: &str, request: &TipRequest) -> String {
    let Some(api_key) = api_key else {
        log::info!("No tip API key, using canned tip");
        return FALLBACK_NO_KEY.to_string();
    };
    resolve(fetch_tip(api_key, model, request).await)
}

#[cfg(target_arch = "wasm32")]
async fn fetch_tip(api_key: &str, model: &str, request: &TipRequest) -> Result<Option<String>> {
    use crate::Error;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let js_err = |e: JsValue| Error::TipService(Error::describe_js(&e));

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&request.body()?));

    let http = Request::new_with_str_and_init(&endpoint_url(model), &opts).map_err(js_err)?;
    http.headers()
        .set("Content-Type", "application/json")
        .map_err(js_err)?;
    http.headers().set("x-goog-api-key", api_key).map_err(js_err)?;

    let window = web_sys::window().ok_or_else(|| Error::TipService("no window".to_string()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&http))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;

    if !response.ok() {
        return Err(Error::TipService(format!("HTTP {}", response.status())));
    }

    let text = JsFuture::from(response.text().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .as_string()
        .unwrap_or_default();
    extract_text(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn request() -> TipRequest {
        TipRequest {
            business_name: "Unity Clinic".to_string(),
            challenge: "Need More Leads".to_string(),
            score: 37_500,
        }
    }

    #[test]
    fn test_prompt_mentions_inputs() {
        let prompt = request().prompt();
        assert!(prompt.contains("\"Unity Clinic\""));
        assert!(prompt.contains("37500 ROI points"));
        assert!(prompt.contains("\"Need More Leads\""));
    }

    #[test]
    fn test_body_shape() {
        let body: serde_json::Value = serde_json::from_str(&request().body().unwrap()).unwrap();
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("You are a senior marketing strategist."));
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            endpoint_url("gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_extract_text() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":" Mail your regulars. "}],"role":"model"}}]}"#;
        assert_eq!(extract_text(json).unwrap().as_deref(), Some("Mail your regulars."));
    }

    #[test]
    fn test_extract_joins_parts() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"Post "},{"text":"weekly."}]}}]}"#;
        assert_eq!(extract_text(json).unwrap().as_deref(), Some("Post weekly."));
    }

    #[test]
    fn test_extract_empty() {
        assert_eq!(extract_text(r#"{"candidates":[]}"#).unwrap(), None);
        assert_eq!(extract_text(r#"{}"#).unwrap(), None);
        assert_eq!(
            extract_text(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#).unwrap(),
            None
        );
        assert!(extract_text("<html>").is_err());
    }

    #[test]
    fn test_resolve_fallbacks() {
        assert_eq!(resolve(Ok(Some("Go.".to_string()))), "Go.");
        assert_eq!(resolve(Ok(None)), FALLBACK_EMPTY);
        assert_eq!(
            resolve(Err(Error::TipService("HTTP 500".to_string()))),
            FALLBACK_ERROR
        );
    }
}
