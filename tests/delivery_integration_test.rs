use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use httpmock::prelude::*;
use serde_json::json;

use daily_phrase::domain::ports::MailCourier;
use daily_phrase::utils::error::{DailyPhraseError, DispatchError, ProviderError};
use daily_phrase::{DeliveryEngine, GeminiProvider, PhraseRecord};

const MODEL_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

#[derive(Clone, Default)]
struct RecordingCourier {
    delivered: Arc<Mutex<Vec<PhraseRecord>>>,
}

#[async_trait]
impl MailCourier for RecordingCourier {
    async fn deliver(&self, record: &PhraseRecord) -> Result<(), DispatchError> {
        self.delivered.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[tokio::test]
async fn test_end_to_end_fetch_and_deliver() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path(MODEL_PATH);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "candidates": [
                    {
                        "content": {
                            "parts": [
                                { "text": "{\"phrase\": \"Be the change you wish to see.\", \
                                            \"author\": \"Mahatma Gandhi\", \
                                            \"location\": \"India\"}" }
                            ],
                            "role": "model"
                        }
                    }
                ]
            }));
    });

    let provider = GeminiProvider::new("test-key").with_base_url(server.base_url());
    let courier = RecordingCourier::default();
    let engine = DeliveryEngine::new(provider, courier.clone());

    let record = engine.run().await.unwrap();

    api_mock.assert();
    assert_eq!(record.author, "Mahatma Gandhi");

    let delivered = courier.delivered.lock().unwrap();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].location.as_deref(), Some("India"));
}

#[tokio::test]
async fn test_no_email_is_sent_when_fetch_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(MODEL_PATH);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({ "candidates": [] }));
    });

    let provider = GeminiProvider::new("test-key").with_base_url(server.base_url());
    let courier = RecordingCourier::default();
    let engine = DeliveryEngine::new(provider, courier.clone());

    let err = engine.run().await.unwrap_err();

    assert!(matches!(
        err,
        DailyPhraseError::Provider(ProviderError::EmptyResponse)
    ));
    assert_eq!(err.stage(), "fetch");
    assert!(courier.delivered.lock().unwrap().is_empty());
}
