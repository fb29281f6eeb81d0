//! Typed client for record collections.
//!
//! ## Paths
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/{collection}` | List records |
//! | GET    | `/api/{collection}/{id}` | Get by id |
//! | PUT    | `/api/{collection}/{id}` | Replace a record |
//! | POST   | `/api/{collection}` | Create a record |
//!
//! `{collection}` is [`Record::COLLECTION`], e.g. `disputes`.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use reqwest::Method;
use vox_core::RecordId;
use vox_records::Record;

use crate::envelope::{decode, decode_required, ListData};
use crate::error::ApiError;
use crate::transport::Transport;

/// Backend operations the console controller needs for one collection.
///
/// Implemented by [`RecordClient`] over HTTP; tests substitute in-memory
/// fakes.
pub trait RecordApi<R: Record>: Send + Sync {
    /// Fetch the whole collection.
    fn list(&self) -> impl Future<Output = Result<Vec<R>, ApiError>> + Send;

    /// Persist a modified record.
    fn update(&self, record: &R) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Persist a newly created record.
    fn create(&self, record: &R) -> impl Future<Output = Result<(), ApiError>> + Send;
}

impl<R: Record, A: RecordApi<R>> RecordApi<R> for Arc<A> {
    fn list(&self) -> impl Future<Output = Result<Vec<R>, ApiError>> + Send {
        (**self).list()
    }

    fn update(&self, record: &R) -> impl Future<Output = Result<(), ApiError>> + Send {
        (**self).update(record)
    }

    fn create(&self, record: &R) -> impl Future<Output = Result<(), ApiError>> + Send {
        (**self).create(record)
    }
}

/// Client for one record collection.
#[derive(Debug)]
pub struct RecordClient<R> {
    transport: Transport,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for RecordClient<R> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record> RecordClient<R> {
    pub(crate) fn new(transport: Transport) -> Self {
        Self {
            transport,
            _record: PhantomData,
        }
    }

    /// Get one record by id. Returns `Ok(None)` on 404.
    ///
    /// Calls `GET {base_url}api/{collection}/{id}`.
    pub async fn get(&self, id: &RecordId) -> Result<Option<R>, ApiError> {
        let endpoint = format!("GET /api/{}/{id}", R::COLLECTION);
        let url = self.transport.url(&[R::COLLECTION, id.as_str()])?;
        let (status, body) = self
            .transport
            .execute(&endpoint, Method::GET, &url, |req| req)
            .await?;
        if status == 404 {
            return Ok(None);
        }
        decode(&endpoint, status, &body)
    }
}

impl<R: Record> RecordApi<R> for RecordClient<R> {
    /// Calls `GET {base_url}api/{collection}`.
    async fn list(&self) -> Result<Vec<R>, ApiError> {
        let endpoint = format!("GET /api/{}", R::COLLECTION);
        let url = self.transport.url(&[R::COLLECTION])?;
        let (status, body) = self
            .transport
            .execute(&endpoint, Method::GET, &url, |req| req)
            .await?;
        let data: ListData<R> = decode_required(&endpoint, status, &body)?;
        let items = data.into_items();
        tracing::info!(collection = R::COLLECTION, count = items.len(), "records listed");
        Ok(items)
    }

    /// Calls `PUT {base_url}api/{collection}/{id}` with the full record.
    async fn update(&self, record: &R) -> Result<(), ApiError> {
        let id = record.id().as_str();
        let endpoint = format!("PUT /api/{}/{id}", R::COLLECTION);
        let url = self.transport.url(&[R::COLLECTION, id])?;
        let (status, body) = self
            .transport
            .execute(&endpoint, Method::PUT, &url, |req| req.json(record))
            .await?;
        decode::<serde_json::Value>(&endpoint, status, &body)?;
        Ok(())
    }

    /// Calls `POST {base_url}api/{collection}` with the full record.
    async fn create(&self, record: &R) -> Result<(), ApiError> {
        let endpoint = format!("POST /api/{}", R::COLLECTION);
        let url = self.transport.url(&[R::COLLECTION])?;
        let (status, body) = self
            .transport
            .execute(&endpoint, Method::POST, &url, |req| req.json(record))
            .await?;
        decode::<serde_json::Value>(&endpoint, status, &body)?;
        Ok(())
    }
}
