//! Gemini collaborator client
//!
//! Wraps the three LLM flows the dashboard consumes as black boxes:
//! auto-labeling a CSV, generating trade signals from labeled data, and
//! acknowledging a training hand-off. Each flow is raw text in, structured
//! JSON out; the model's reply may wrap its JSON in code fences, which are
//! stripped before deserializing.

use std::time::Duration;

use candlemark_rs::annotate::PointAnnotation;
use serde::{Deserialize, Serialize};
use shared::SignalBatch;
use tracing::info;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model_name: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

/// The training collaborator's acknowledgement
#[derive(Debug, Deserialize)]
pub struct TrainingAck {
    /// Confirmation message or job id for tracking
    pub label: String,
    pub confidence: f64,
}

impl GeminiClient {
    pub fn with_config(
        api_key: String,
        model_name: String,
        base_url: String,
        timeout_secs: u64,
    ) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            api_key,
            model_name,
            base_url,
            client,
        })
    }

    fn build_api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model_name,
            self.api_key
        )
    }

    /// One round trip: prompt in, first candidate's text out.
    async fn generate(&self, prompt: String) -> Result<String, anyhow::Error> {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.build_api_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!("Gemini API error ({}): {}", status, error_text));
        }

        let gemini_response: GeminiResponse = response.json().await?;
        gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| anyhow::anyhow!("No response from Gemini API"))
    }

    /// Analyze raw OHLC CSV text and return candidate structural points.
    ///
    /// The prompt pins the marker styling contract so the returned points
    /// render like hand-placed ones. The collaborator promises that every
    /// `time` matches a row of the input, but the workbench re-validates
    /// that on apply.
    pub async fn auto_label(&self, csv_data: &str) -> Result<Vec<PointAnnotation>, anyhow::Error> {
        let prompt = format!(
            r#"You are an expert financial technical analyst specializing in price action and smart money concepts.
Your task is to analyze the provided OHLC data and identify key structural points.

Analyze the data and identify points for the following categories:
- 'BOS': Break of Structure. Identify significant swing highs or lows that are broken.
- 'CHOCH': Change of Character. Identify the first sign of a potential trend reversal, where a minor structure is broken against the trend.
- 'BUY': A potential buy entry point, often after a CHOCH or near a key support level.
- 'SELL': A potential sell entry point, often after a CHOCH or near a key resistance level.

For each point you identify, you must provide the following information in the output format:
- 'id': A unique ID string, like "point-1719543200". Use the timestamp in the ID.
- 'time': The exact UNIX timestamp (UTC) of the candle where the event occurs. This MUST match a timestamp from the input data.
- 'position': Place 'BOS', 'CHOCH', and 'SELL' markers 'aboveBar'. Place 'BUY' markers 'belowBar'.
- 'color': Use '#3b82f6' for 'BOS', '#f97316' for 'CHOCH', '#22c55e' for 'BUY', and '#ef4444' for 'SELL'.
- 'shape': Use 'circle' for 'BOS' and 'CHOCH'. Use 'arrowUp' for 'BUY' and 'arrowDown' for 'SELL'.
- 'text': The label of the point ('BOS', 'CHOCH', 'BUY', 'SELL').

Return ONLY a JSON array of these labeled points, no prose. Ensure the 'time' for each point corresponds exactly to a time in the provided CSV data.

CSV Data:
{}
"#,
            csv_data
        );

        let reply = self.generate(prompt).await?;
        let points: Vec<PointAnnotation> = serde_json::from_str(extract_json(&reply))?;
        info!(points = points.len(), "auto-labeling complete");
        Ok(points)
    }

    /// Generate trade signals from labeled CSV data with a named model.
    pub async fn trade_signals(
        &self,
        labeled_data: &str,
        model_name: &str,
    ) -> Result<SignalBatch, anyhow::Error> {
        let prompt = format!(
            r#"You are a financial expert tasked with generating trade signals based on labeled data and a pre-trained model.

You will receive labeled data and the name of a pre-trained model. Use this information to generate trade signals (BUY, SELL, or HOLD) with a confidence level for each signal. Also return some statistics about the model, such as accuracy and F1 score.

Reply with ONLY a JSON object of the shape:
{{"tradeSignals": [{{"symbol": "...", "signalType": "BUY|SELL|HOLD", "confidence": 0.0, "timestamp": "ISO timestamp"}}], "modelStatistics": "..."}}

Labeled Data: {}
Model Name: {}"#,
            labeled_data, model_name
        );

        let reply = self.generate(prompt).await?;
        let batch: SignalBatch = serde_json::from_str(extract_json(&reply))?;
        Ok(batch)
    }

    /// Hand labeled data off for training and get a job acknowledgement.
    pub async fn start_training(
        &self,
        data: &str,
        model_description: &str,
    ) -> Result<TrainingAck, anyhow::Error> {
        let prompt = format!(
            r#"You are an AI model training coordinator. You have received a batch of labeled data to start a training process.

Model Description: {}
Data Provided:
{}

Acknowledge the receipt of the data and confirm that the training process will begin. Provide a job ID for tracking. Reply with ONLY a JSON object of the shape:
{{"label": "job id or confirmation", "confidence": 0.99}}"#,
            model_description, data
        );

        let reply = self.generate(prompt).await?;
        let ack: TrainingAck = serde_json::from_str(extract_json(&reply))?;
        Ok(ack)
    }
}

/// Pull the JSON payload out of a model reply that may wrap it in
/// Markdown code fences.
fn extract_json(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the language tag on the opening fence line
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or(rest);
    body.rsplit_once("```").map(|(b, _)| b).unwrap_or(body).trim()
}
