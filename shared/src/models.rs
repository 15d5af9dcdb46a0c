use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of an uploaded dataset. Created `Raw`; a training hand-off
/// flips it to `Processing`; the external job's completion callback sets
/// `Labeled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetStatus {
    Raw,
    Processing,
    Labeled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub status: DatasetStatus,
    pub item_count: usize,
    pub created_at: DateTime<Utc>,
}

impl Dataset {
    pub fn new(id: String, name: String, item_count: usize) -> Self {
        Self {
            id,
            name,
            status: DatasetStatus::Raw,
            item_count,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
    Buy,
    Sell,
    Hold,
}

/// One generated trade signal from the collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSignal {
    pub symbol: String,
    pub signal_type: SignalType,
    /// 0..=1
    pub confidence: f64,
    /// ISO timestamp as returned by the collaborator
    pub timestamp: String,
}

/// The signal-generation collaborator's full response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalBatch {
    pub trade_signals: Vec<TradeSignal>,
    pub model_statistics: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelStatus {
    Training,
    Deployed,
    Archived,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub version: String,
    pub status: ModelStatus,
    pub accuracy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f1_score: Option<String>,
}

/// The static catalog of pre-trained models offered for signal generation.
pub fn model_catalog() -> Vec<ModelInfo> {
    vec![
        ModelInfo {
            id: "m-001".to_string(),
            name: "LSTM_v1.2".to_string(),
            version: "1.2".to_string(),
            status: ModelStatus::Deployed,
            accuracy: 92.5,
            f1_score: Some("0.91".to_string()),
        },
        ModelInfo {
            id: "m-002".to_string(),
            name: "CNN_GRU_v2.1".to_string(),
            version: "2.1".to_string(),
            status: ModelStatus::Training,
            accuracy: 88.0,
            f1_score: None,
        },
        ModelInfo {
            id: "m-003".to_string(),
            name: "Transformer_v0.9".to_string(),
            version: "0.9".to_string(),
            status: ModelStatus::Deployed,
            accuracy: 94.2,
            f1_score: Some("0.93".to_string()),
        },
        ModelInfo {
            id: "m-004".to_string(),
            name: "LSTM_v1.1".to_string(),
            version: "1.1".to_string(),
            status: ModelStatus::Archived,
            accuracy: 90.1,
            f1_score: Some("0.89".to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_wire_shape() {
        let dataset = Dataset::new("d-1".to_string(), "eurusd".to_string(), 42);
        let json = serde_json::to_value(&dataset).unwrap();

        assert_eq!(json["itemCount"], 42);
        assert_eq!(json["status"], "Raw");
    }

    #[test]
    fn test_signal_batch_roundtrip() {
        let raw = r#"{
            "tradeSignals": [
                {"symbol": "EURUSD", "signalType": "BUY", "confidence": 0.82, "timestamp": "2023-06-01T09:00:00Z"}
            ],
            "modelStatistics": "accuracy 92.5%, F1 0.91"
        }"#;
        let batch: SignalBatch = serde_json::from_str(raw).unwrap();

        assert_eq!(batch.trade_signals.len(), 1);
        assert_eq!(batch.trade_signals[0].signal_type, SignalType::Buy);
    }

    #[test]
    fn test_model_catalog_is_stable() {
        let models = model_catalog();
        assert_eq!(models.len(), 4);
        assert!(models.iter().any(|m| m.status == ModelStatus::Deployed));
        // the training model has no F1 yet
        assert!(models.iter().any(|m| m.f1_score.is_none()));
    }
}
