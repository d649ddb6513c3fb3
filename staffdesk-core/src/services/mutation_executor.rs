//! 批量变更执行器
//!
//! Create, update, and chunked bulk delete. The executor never touches page state;
//! the controller applies the results.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::list_loader::decode;
use crate::config::ControllerConfig;
use crate::error::{CoreError, CoreResult};
use crate::traits::{EntityResource, Record, Transport};
use crate::types::{
    BatchDeleteFailure, BatchDeleteReport, Filters, ListQuery, RecordId, SaveKind,
};

/// Only the id of a listed record is needed to resolve delete targets
#[derive(Deserialize)]
struct IdOnly {
    id: RecordId,
}

/// Mutation side of the entity page
pub struct MutationExecutor {
    transport: Arc<dyn Transport>,
    config: ControllerConfig,
}

impl MutationExecutor {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, config: ControllerConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Create (no `target`) or update `target` from the form values.
    ///
    /// Validation is the caller's job; this always talks to the transport.
    pub async fn save<R: EntityResource>(
        &self,
        resource: &R,
        target: Option<&R::Entity>,
        form: &R::FormData,
    ) -> CoreResult<(R::Entity, SaveKind)> {
        let endpoint = resource.endpoint();
        match target {
            Some(target) => {
                let id = target.id();
                let body = to_body(&resource.to_update_request(target, form))?;
                log::info!("Updating {endpoint}/{id}");
                let saved = decode(self.transport.update(endpoint, id, body).await?)?;
                Ok((saved, SaveKind::Update))
            }
            None => {
                let body = to_body(&resource.to_create_request(form))?;
                log::info!("Creating record in {endpoint}");
                let saved: R::Entity = decode(self.transport.create(endpoint, body).await?)?;
                log::debug!("Created {endpoint}/{}", saved.id());
                Ok((saved, SaveKind::Create))
            }
        }
    }

    /// Collect the id of every record matching `filters`, paging the list endpoint.
    ///
    /// Stops once the reported total is reached or a page comes back empty, so `N`
    /// matching records cost `ceil(N / resolve_batch_size)` list calls.
    pub async fn resolve_all_matching(
        &self,
        endpoint: &str,
        filters: &Filters,
    ) -> CoreResult<Vec<RecordId>> {
        let limit = self.config.resolve_batch_size;
        if limit == 0 {
            return Err(CoreError::ConfigError(
                "resolve_batch_size must be greater than zero".to_string(),
            ));
        }
        let mut ids: Vec<RecordId> = Vec::new();
        let mut offset: u32 = 0;

        loop {
            let query = ListQuery::new(limit, offset, filters.clone());
            let page = self.transport.list(endpoint, &query).await?;
            let fetched = page.items.len();
            let total = usize::try_from(page.total).unwrap_or(usize::MAX);

            for item in page.items {
                let IdOnly { id } = decode::<IdOnly>(item)?;
                ids.push(id);
            }

            if fetched == 0 || ids.len() >= total {
                break;
            }
            offset = offset.saturating_add(u32::try_from(fetched).unwrap_or(u32::MAX));
        }

        log::debug!("Resolved {} ids matching filters on {endpoint}", ids.len());
        Ok(ids)
    }

    /// Delete `ids` in rounds of `delete_batch_size` concurrent requests.
    ///
    /// Each round is awaited as a whole before the next starts. The first round with
    /// a failure is the last one attempted; deletions that already succeeded, including
    /// the successful ones inside the failing round, stay deleted and are reported.
    pub async fn delete_in_batches(&self, endpoint: &str, ids: &[RecordId]) -> BatchDeleteReport {
        let chunks: Vec<&[RecordId]> = ids.chunks(self.config.delete_batch_size.max(1)).collect();
        let mut report = BatchDeleteReport {
            requested: ids.len(),
            batches_total: chunks.len(),
            ..BatchDeleteReport::default()
        };

        for (batch_index, chunk) in chunks.into_iter().enumerate() {
            report.batches_attempted += 1;

            // 并行删除本批次所有记录
            let transport = &self.transport;
            let delete_futures = chunk.iter().map(|&id| async move {
                let result = transport.delete(endpoint, id).await;
                (id, result)
            });
            let results = futures::future::join_all(delete_futures).await;

            let mut failure: Option<BatchDeleteFailure> = None;
            for (id, result) in results {
                match result {
                    Ok(()) => report.deleted.push(id),
                    Err(e) => {
                        if e.is_expected() {
                            log::warn!("Delete {endpoint}/{id} failed: {e}");
                        } else {
                            log::error!("Delete {endpoint}/{id} failed: {e}");
                        }
                        if failure.is_none() {
                            failure = Some(BatchDeleteFailure {
                                record_id: id,
                                batch_index,
                                error: e,
                            });
                        }
                    }
                }
            }

            if let Some(failure) = failure {
                log::warn!(
                    "Aborting bulk delete on {endpoint} after batch {} of {}",
                    batch_index + 1,
                    report.batches_total
                );
                report.failure = Some(failure);
                break;
            }
        }

        log::info!(
            "Bulk delete on {endpoint}: {} of {} deleted",
            report.deleted.len(),
            report.requested
        );
        report
    }
}

fn to_body<T: Serialize>(request: &T) -> CoreResult<Value> {
    serde_json::to_value(request).map_err(|e| CoreError::SerializationError(e.to_string()))
}
