//! Location search for the autocomplete dropdown.

use std::sync::Arc;

use skylog_services::{ApiError, Suggestion, WeatherApiClient};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

use super::{send, ServiceMessage};
use crate::models::FieldId;

#[derive(Debug)]
pub enum SuggestionServiceMessage {
    /// Search finished for the keystroke numbered `seq`
    SearchDone {
        field: FieldId,
        seq: u64,
        result: Result<Vec<Suggestion>, ApiError>,
    },
}

/// Search locations matching `query`. Sends `SearchDone` when complete.
pub fn request_search(
    tx: &UnboundedSender<ServiceMessage>,
    runtime: &Handle,
    client: Arc<WeatherApiClient>,
    field: FieldId,
    seq: u64,
    query: String,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = client.search_locations(&query).await;
        send(&tx, SuggestionServiceMessage::SearchDone { field, seq, result });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn search_reports_field_and_sequence() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/locations/search"))
            .and(query_param("q", "Lyon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = Arc::new(WeatherApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap());
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        request_search(&tx, &Handle::current(), client, FieldId::HISTORY, 7, "Lyon".into());

        match rx.recv().await {
            Some(ServiceMessage::Suggestion(SuggestionServiceMessage::SearchDone {
                field,
                seq,
                result,
            })) => {
                assert_eq!(field, FieldId::HISTORY);
                assert_eq!(seq, 7);
                assert!(result.unwrap().is_empty());
            }
            other => unreachable!("unexpected message: {:?}", other),
        }
    }
}
