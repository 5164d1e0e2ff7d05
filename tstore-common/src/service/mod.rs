//! 通用业务服务模块
//!
//! - RecordService: 对外暴露的通用 CRUD 契约
//! - GenericRecordService: 委托给持久化管理器的标准实现

use async_trait::async_trait;

use crate::error::ServiceResult;
use crate::http::pagination::PageInfo;

pub mod base_service;
pub use base_service::GenericRecordService;

/// 通用 CRUD 服务契约，由 HTTP 端点层调用。
/// Generic CRUD service contract, invoked by the HTTP endpoint layer.
///
/// - `delete` / `delete_batch`：物理删除 / physical removal
/// - `delete_logic` / `delete_logic_batch`：逻辑删除 / logical removal
#[async_trait]
pub trait RecordService<T, ID>: Send + Sync
where
    T: Send + Sync,
    ID: Send,
{
    async fn list(&self, filter: &T) -> ServiceResult<Vec<T>>;

    async fn list_page(
        &self,
        filter: &T,
        page_num: i64,
        page_size: i64,
    ) -> ServiceResult<PageInfo<T>>;

    async fn get(&self, id: ID) -> ServiceResult<Option<T>>;

    /// 写入创建时间后插入 / Stamp the creation time, then insert
    async fn insert(&self, record: &mut T) -> ServiceResult<()>;

    /// 写入修改时间后更新 / Stamp the modification time, then update
    async fn update(&self, record: &mut T) -> ServiceResult<()>;

    async fn delete(&self, id: ID) -> ServiceResult<()>;

    async fn delete_logic(&self, id: ID) -> ServiceResult<()>;

    async fn insert_batch(&self, records: &mut [T]) -> ServiceResult<()>;

    async fn update_batch(&self, records: &mut [T]) -> ServiceResult<()>;

    async fn delete_batch(&self, records: &[T]) -> ServiceResult<()>;

    async fn delete_logic_batch(&self, records: &[T]) -> ServiceResult<()>;
}
