use crate::error::ServiceResult as Result;
use crate::http::pagination::PageInfo;
use async_trait::async_trait;

pub mod memory;
pub use memory::*;

/// 持久化管理器 Trait，通用服务层把所有存储操作委托给它。
/// 该 Trait 不依赖具体数据库类型；变更类操作返回影响行数。
///
/// Persistence manager trait the generic service delegates every storage call to.
/// Storage agnostic; mutations return the affected row count.
///
/// `delete` 为物理删除，`delete_logic` 为逻辑删除（仅翻转删除标记）。
/// `delete` removes physically, `delete_logic` only flips the deletion flag.
#[async_trait]
pub trait RecordManager<T, ID>: Send + Sync
where
    T: Send + Sync,
    ID: Send,
{
    /// 按条件查询全部记录 / Query every record matching the filter
    async fn list(&self, filter: &T) -> Result<Vec<T>>;

    /// 按条件分页查询，`page_num` 从 1 开始 / Paged query, `page_num` is 1-based
    async fn list_page(&self, filter: &T, page_num: i64, page_size: i64) -> Result<PageInfo<T>>;

    /// 按主键读取，未找到返回 `None` / Read by id, `None` when absent
    async fn get(&self, id: ID) -> Result<Option<T>>;

    async fn insert(&self, record: &T) -> Result<u64>;

    async fn update(&self, record: &T) -> Result<u64>;

    /// 物理删除 / Physical removal
    async fn delete(&self, id: ID) -> Result<u64>;

    /// 逻辑删除 / Logical removal
    async fn delete_logic(&self, id: ID) -> Result<u64>;

    async fn insert_batch(&self, records: &[T]) -> Result<u64>;

    async fn update_batch(&self, records: &[T]) -> Result<u64>;

    /// 批量物理删除（传入完整记录）/ Batch physical removal (full records)
    async fn delete_batch(&self, records: &[T]) -> Result<u64>;

    /// 批量逻辑删除（传入完整记录）/ Batch logical removal (full records)
    async fn delete_logic_batch(&self, records: &[T]) -> Result<u64>;
}
