use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::RecordService;
use crate::domain::BaseDomain;
use crate::error::{describe_error, ServiceError, ServiceResult};
use crate::http::pagination::PageInfo;
use crate::repo::RecordManager;

/// 通用业务服务：统一写入时间戳，其余全部委托给持久化管理器。
///
/// 服务本身无状态，时间戳只写在调用方传入的记录上；批量操作只取一次当前时间。
/// 管理器的任何失败都原样以 `Err` 返回。
///
/// Generic record service: applies the timestamp rules and delegates everything
/// else to the manager. Stateless; timestamps are written on caller-owned values,
/// batches capture `now` once. Every manager failure is returned as `Err`.
pub struct GenericRecordService<T, ID, M> {
    manager: Arc<M>,
    resource: &'static str,
    _marker: PhantomData<fn() -> (T, ID)>,
}

impl<T, ID, M> GenericRecordService<T, ID, M> {
    pub fn new(manager: Arc<M>, resource: &'static str) -> Self {
        Self {
            manager,
            resource,
            _marker: PhantomData,
        }
    }

    pub fn manager(&self) -> &Arc<M> {
        &self.manager
    }

    fn report<V>(&self, op: &str, result: ServiceResult<V>) -> ServiceResult<V> {
        if let Err(e) = &result {
            match e {
                ServiceError::Manager(_) => {
                    tracing::warn!(resource = self.resource, op, "{}", describe_error(e))
                }
                _ => tracing::debug!(resource = self.resource, op, "{}", describe_error(e)),
            }
        }
        result
    }
}

impl<T, ID, M> Clone for GenericRecordService<T, ID, M> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
            resource: self.resource,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T, ID, M> RecordService<T, ID> for GenericRecordService<T, ID, M>
where
    T: BaseDomain + Send + Sync,
    ID: Send + 'static,
    M: RecordManager<T, ID>,
{
    async fn list(&self, filter: &T) -> ServiceResult<Vec<T>> {
        let result = self.manager.list(filter).await;
        self.report("list", result)
    }

    async fn list_page(
        &self,
        filter: &T,
        page_num: i64,
        page_size: i64,
    ) -> ServiceResult<PageInfo<T>> {
        let result = self.manager.list_page(filter, page_num, page_size).await;
        self.report("list_page", result)
    }

    async fn get(&self, id: ID) -> ServiceResult<Option<T>> {
        let result = self.manager.get(id).await;
        self.report("get", result)
    }

    async fn insert(&self, record: &mut T) -> ServiceResult<()> {
        record.set_create_date(Utc::now());
        let result = self.manager.insert(record).await;
        let affected = self.report("insert", result)?;
        tracing::debug!(resource = self.resource, affected, "插入完成 / inserted");
        Ok(())
    }

    async fn update(&self, record: &mut T) -> ServiceResult<()> {
        record.set_modify_date(Utc::now());
        let result = self.manager.update(record).await;
        let affected = self.report("update", result)?;
        tracing::debug!(resource = self.resource, affected, "更新完成 / updated");
        Ok(())
    }

    async fn delete(&self, id: ID) -> ServiceResult<()> {
        let result = self.manager.delete(id).await;
        let affected = self.report("delete", result)?;
        tracing::debug!(resource = self.resource, affected, "物理删除完成 / deleted");
        Ok(())
    }

    async fn delete_logic(&self, id: ID) -> ServiceResult<()> {
        let result = self.manager.delete_logic(id).await;
        let affected = self.report("delete_logic", result)?;
        tracing::debug!(resource = self.resource, affected, "逻辑删除完成 / logically deleted");
        Ok(())
    }

    async fn insert_batch(&self, records: &mut [T]) -> ServiceResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        let now = Utc::now();
        for record in records.iter_mut() {
            record.set_create_date(now);
        }
        let result = self.manager.insert_batch(records).await;
        let affected = self.report("insert_batch", result)?;
        tracing::debug!(resource = self.resource, affected, "批量插入完成 / batch inserted");
        Ok(())
    }

    async fn update_batch(&self, records: &mut [T]) -> ServiceResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        let now = Utc::now();
        for record in records.iter_mut() {
            record.set_modify_date(now);
        }
        let result = self.manager.update_batch(records).await;
        let affected = self.report("update_batch", result)?;
        tracing::debug!(resource = self.resource, affected, "批量更新完成 / batch updated");
        Ok(())
    }

    async fn delete_batch(&self, records: &[T]) -> ServiceResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        let result = self.manager.delete_batch(records).await;
        let affected = self.report("delete_batch", result)?;
        tracing::debug!(resource = self.resource, affected, "批量物理删除完成 / batch deleted");
        Ok(())
    }

    async fn delete_logic_batch(&self, records: &[T]) -> ServiceResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        let result = self.manager.delete_logic_batch(records).await;
        let affected = self.report("delete_logic_batch", result)?;
        tracing::debug!(
            resource = self.resource,
            affected,
            "批量逻辑删除完成 / batch logically deleted"
        );
        Ok(())
    }
}
