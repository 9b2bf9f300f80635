//! History CRUD, export and the frontend config endpoint.

use std::sync::Arc;

use skylog_services::{
    ApiError, ClearHistoryResponse, CreateResponse, ExportFormat, HistoryRecord, RecordId,
    RemoteConfig, WeatherApiClient, WeatherRangeRequest,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

use super::{send, ServiceMessage};
use crate::models::FieldId;

#[derive(Debug)]
pub enum HistoryServiceMessage {
    FetchDone {
        seq: u64,
        result: Result<Vec<HistoryRecord>, ApiError>,
    },
    /// Record created from the form that owns `field`
    CreateDone {
        field: FieldId,
        result: Result<CreateResponse, ApiError>,
    },
    UpdateDone {
        id: RecordId,
        result: Result<(), ApiError>,
    },
    DeleteDone {
        id: RecordId,
        result: Result<String, ApiError>,
    },
    ClearDone(Result<ClearHistoryResponse, ApiError>),
    ExportDone {
        format: ExportFormat,
        result: Result<String, ApiError>,
    },
    ConfigDone(Result<RemoteConfig, ApiError>),
}

pub fn request_fetch(
    tx: &UnboundedSender<ServiceMessage>,
    runtime: &Handle,
    client: Arc<WeatherApiClient>,
    seq: u64,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = client.list_history().await;
        send(&tx, HistoryServiceMessage::FetchDone { seq, result });
    });
}

pub fn request_create(
    tx: &UnboundedSender<ServiceMessage>,
    runtime: &Handle,
    client: Arc<WeatherApiClient>,
    field: FieldId,
    request: WeatherRangeRequest,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = client.create_record(&request).await;
        send(&tx, HistoryServiceMessage::CreateDone { field, result });
    });
}

pub fn request_update(
    tx: &UnboundedSender<ServiceMessage>,
    runtime: &Handle,
    client: Arc<WeatherApiClient>,
    id: RecordId,
    request: WeatherRangeRequest,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = client.update_record(&id, &request).await;
        send(&tx, HistoryServiceMessage::UpdateDone { id, result });
    });
}

pub fn request_delete(
    tx: &UnboundedSender<ServiceMessage>,
    runtime: &Handle,
    client: Arc<WeatherApiClient>,
    id: RecordId,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = client.delete_record(&id).await;
        send(&tx, HistoryServiceMessage::DeleteDone { id, result });
    });
}

pub fn request_clear(
    tx: &UnboundedSender<ServiceMessage>,
    runtime: &Handle,
    client: Arc<WeatherApiClient>,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = client.clear_history().await;
        send(&tx, HistoryServiceMessage::ClearDone(result));
    });
}

pub fn request_export(
    tx: &UnboundedSender<ServiceMessage>,
    runtime: &Handle,
    client: Arc<WeatherApiClient>,
    format: ExportFormat,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = client.export(format).await;
        send(&tx, HistoryServiceMessage::ExportDone { format, result });
    });
}

pub fn request_config(
    tx: &UnboundedSender<ServiceMessage>,
    runtime: &Handle,
    client: Arc<WeatherApiClient>,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = client.fetch_config().await;
        send(&tx, HistoryServiceMessage::ConfigDone(result));
    });
}
