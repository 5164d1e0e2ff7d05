//! 内存持久化管理器，用于测试与本地开发
//! In-memory record manager for tests and local development

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::RecordManager;
use crate::domain::BaseDomain;
use crate::error::{ServiceError, ServiceResult as Result};
use crate::http::pagination::PageInfo;

/// 额外的条件匹配函数 `(filter, candidate) -> bool`
/// Extra filter matcher `(filter, candidate) -> bool`
pub type Matcher<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// 基于 BTreeMap 的内存管理器，主键为 `i64`，按主键升序返回。
///
/// 过滤条件的 `deleted` 标记选择分区：为 true 时只返回已逻辑删除的记录，
/// 否则只返回未删除的记录。按主键读取时不返回已逻辑删除的记录。
///
/// BTreeMap-backed manager with `i64` ids, returned in ascending id order.
/// The filter's `deleted` flag selects the partition: true shows only
/// logically deleted records, false only live ones. `get` hides logically
/// deleted records.
pub struct InMemoryManager<T> {
    resource: String,
    rows: RwLock<BTreeMap<i64, T>>,
    seq: AtomicI64,
    matcher: Option<Matcher<T>>,
}

impl<T> InMemoryManager<T>
where
    T: BaseDomain<Id = i64> + Clone + Send + Sync,
{
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            rows: RwLock::new(BTreeMap::new()),
            seq: AtomicI64::new(0),
            matcher: None,
        }
    }

    /// 设置额外的条件匹配函数 / Install an extra filter matcher
    pub fn with_matcher<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        self.matcher = Some(Arc::new(matcher));
        self
    }

    /// 当前存储的记录总数（含逻辑删除）/ Stored rows, logically deleted included
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    fn visible(&self, filter: &T, row: &T) -> bool {
        if row.is_deleted() != filter.is_deleted() {
            return false;
        }
        self.matcher.as_ref().map_or(true, |m| m(filter, row))
    }

    fn select(&self, filter: &T) -> Vec<T> {
        self.rows
            .read()
            .values()
            .filter(|row| self.visible(filter, row))
            .cloned()
            .collect()
    }

    fn next_id(&self) -> i64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn not_found(&self, id: i64) -> ServiceError {
        ServiceError::not_found(format!("{}#{}", self.resource, id))
    }

    fn require_id(record: &T) -> Result<i64> {
        record
            .id()
            .copied()
            .ok_or_else(|| ServiceError::validation("id", "主键不能为空 / id is required"))
    }

    /// 写入一行；调用方持有写锁 / Store one row; caller holds the write lock
    fn put_new(&self, rows: &mut BTreeMap<i64, T>, record: &T) -> Result<()> {
        let mut row = record.clone();
        let id = match row.id().copied() {
            Some(id) => {
                if rows.contains_key(&id) {
                    return Err(ServiceError::validation(
                        "id",
                        format!("主键重复 / duplicate id {}", id),
                    ));
                }
                self.seq.fetch_max(id, Ordering::SeqCst);
                id
            }
            None => {
                let id = self.next_id();
                row.set_id(id);
                id
            }
        };
        rows.insert(id, row);
        Ok(())
    }

    /// 覆盖一行，保留创建时间与删除标记 / Replace a row, keeping creation time and deletion flag
    fn replace(rows: &mut BTreeMap<i64, T>, id: i64, record: &T) {
        if let Some(existing) = rows.get_mut(&id) {
            let create_date = existing.create_date();
            let deleted = existing.is_deleted();
            *existing = record.clone();
            existing.meta_mut().create_date = create_date;
            existing.set_deleted(deleted);
        }
    }

    fn flag_deleted(rows: &mut BTreeMap<i64, T>, id: i64) -> u64 {
        match rows.get_mut(&id) {
            Some(row) if !row.is_deleted() => {
                row.set_deleted(true);
                1
            }
            _ => 0,
        }
    }
}

#[async_trait]
impl<T> RecordManager<T, i64> for InMemoryManager<T>
where
    T: BaseDomain<Id = i64> + Clone + Send + Sync,
{
    async fn list(&self, filter: &T) -> Result<Vec<T>> {
        Ok(self.select(filter))
    }

    async fn list_page(&self, filter: &T, page_num: i64, page_size: i64) -> Result<PageInfo<T>> {
        if page_num < 1 {
            return Err(ServiceError::validation("pageNum", "必须 >= 1 / must be >= 1"));
        }
        if page_size < 1 {
            return Err(ServiceError::validation("pageSize", "必须 >= 1 / must be >= 1"));
        }
        let all = self.select(filter);
        let total = all.len() as u64;
        let offset = ((page_num - 1) as usize).saturating_mul(page_size as usize);
        let list = all.into_iter().skip(offset).take(page_size as usize).collect();
        Ok(PageInfo::new(page_num, page_size, total, list))
    }

    async fn get(&self, id: i64) -> Result<Option<T>> {
        Ok(self
            .rows
            .read()
            .get(&id)
            .filter(|row| !row.is_deleted())
            .cloned())
    }

    async fn insert(&self, record: &T) -> Result<u64> {
        let mut rows = self.rows.write();
        self.put_new(&mut rows, record)?;
        Ok(1)
    }

    async fn update(&self, record: &T) -> Result<u64> {
        let id = Self::require_id(record)?;
        let mut rows = self.rows.write();
        if !rows.contains_key(&id) {
            return Err(self.not_found(id));
        }
        Self::replace(&mut rows, id, record);
        Ok(1)
    }

    async fn delete(&self, id: i64) -> Result<u64> {
        Ok(self.rows.write().remove(&id).map_or(0, |_| 1))
    }

    async fn delete_logic(&self, id: i64) -> Result<u64> {
        Ok(Self::flag_deleted(&mut self.rows.write(), id))
    }

    async fn insert_batch(&self, records: &[T]) -> Result<u64> {
        let mut rows = self.rows.write();
        // 先校验整批，避免写入一半 / Validate the whole batch before writing
        let mut seen = std::collections::HashSet::new();
        for id in records.iter().filter_map(|r| r.id().copied()) {
            if rows.contains_key(&id) || !seen.insert(id) {
                return Err(ServiceError::validation(
                    "id",
                    format!("主键重复 / duplicate id {}", id),
                ));
            }
        }
        // 生成的主键必须越过本批显式主键 / Generated ids must skip past the batch's explicit ids
        if let Some(max) = seen.iter().max() {
            self.seq.fetch_max(*max, Ordering::SeqCst);
        }
        for record in records {
            self.put_new(&mut rows, record)?;
        }
        Ok(records.len() as u64)
    }

    async fn update_batch(&self, records: &[T]) -> Result<u64> {
        let ids = records
            .iter()
            .map(Self::require_id)
            .collect::<Result<Vec<_>>>()?;
        let mut rows = self.rows.write();
        if let Some(missing) = ids.iter().find(|id| !rows.contains_key(*id)) {
            return Err(self.not_found(*missing));
        }
        for (id, record) in ids.into_iter().zip(records) {
            Self::replace(&mut rows, id, record);
        }
        Ok(records.len() as u64)
    }

    async fn delete_batch(&self, records: &[T]) -> Result<u64> {
        let mut rows = self.rows.write();
        Ok(records
            .iter()
            .filter_map(|r| r.id())
            .filter(|id| rows.remove(*id).is_some())
            .count() as u64)
    }

    async fn delete_logic_batch(&self, records: &[T]) -> Result<u64> {
        let mut rows = self.rows.write();
        Ok(records
            .iter()
            .filter_map(|r| r.id().copied())
            .map(|id| Self::flag_deleted(&mut rows, id))
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainMeta;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Shelf {
        id: Option<i64>,
        label: String,
        #[serde(flatten)]
        meta: DomainMeta,
    }

    crate::impl_base_domain!(Shelf, id: i64, meta);

    fn shelf(label: &str) -> Shelf {
        Shelf {
            label: label.to_string(),
            ..Default::default()
        }
    }

    fn live() -> Shelf {
        Shelf::default()
    }

    fn tombstoned() -> Shelf {
        let mut f = Shelf::default();
        f.set_deleted(true);
        f
    }

    #[tokio::test]
    async fn test_insert_assigns_ids_in_order() {
        let mgr = InMemoryManager::<Shelf>::new("shelf");
        mgr.insert(&shelf("a")).await.unwrap();
        mgr.insert(&shelf("b")).await.unwrap();

        let rows = mgr.list(&live()).await.unwrap();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![Some(1), Some(2)]);
    }

    #[tokio::test]
    async fn test_explicit_id_advances_sequence() {
        let mgr = InMemoryManager::<Shelf>::new("shelf");
        let mut s = shelf("x");
        s.set_id(10);
        mgr.insert(&s).await.unwrap();
        mgr.insert(&shelf("y")).await.unwrap();

        assert!(mgr.get(11).await.unwrap().is_some());
        assert!(matches!(
            mgr.insert(&s).await,
            Err(ServiceError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_matcher_filters_rows() {
        let mgr = InMemoryManager::<Shelf>::new("shelf")
            .with_matcher(|f: &Shelf, r: &Shelf| f.label.is_empty() || f.label == r.label);
        mgr.insert_batch(&[shelf("a"), shelf("b"), shelf("a")]).await.unwrap();

        let mut filter = live();
        filter.label = "a".to_string();
        assert_eq!(mgr.list(&filter).await.unwrap().len(), 2);
        assert_eq!(mgr.list(&live()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_paging_and_validation() {
        let mgr = InMemoryManager::<Shelf>::new("shelf");
        for i in 0..5 {
            mgr.insert(&shelf(&i.to_string())).await.unwrap();
        }
        let page = mgr.list_page(&live(), 2, 2).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.pages, 3);
        assert_eq!(page.list.iter().map(|r| r.id).collect::<Vec<_>>(), vec![Some(3), Some(4)]);

        let beyond = mgr.list_page(&live(), 9, 2).await.unwrap();
        assert!(beyond.list.is_empty());

        assert!(matches!(
            mgr.list_page(&live(), 0, 2).await,
            Err(ServiceError::Validation { .. })
        ));
        assert!(matches!(
            mgr.list_page(&live(), 1, 0).await,
            Err(ServiceError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_keeps_create_date_and_flag() {
        let mgr = InMemoryManager::<Shelf>::new("shelf");
        let mut s = shelf("a");
        s.set_create_date(chrono::Utc::now());
        mgr.insert(&s).await.unwrap();

        let mut changed = shelf("b");
        changed.set_id(1);
        mgr.update(&changed).await.unwrap();

        let stored = mgr.get(1).await.unwrap().unwrap();
        assert_eq!(stored.label, "b");
        assert_eq!(stored.create_date(), s.create_date());

        let mut ghost = shelf("ghost");
        ghost.set_id(99);
        assert!(matches!(mgr.update(&ghost).await, Err(ServiceError::NotFound { .. })));
        assert!(matches!(
            mgr.update(&shelf("no-id")).await,
            Err(ServiceError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_logical_and_physical_delete() {
        let mgr = InMemoryManager::<Shelf>::new("shelf");
        mgr.insert_batch(&[shelf("a"), shelf("b")]).await.unwrap();

        assert_eq!(mgr.delete_logic(1).await.unwrap(), 1);
        assert_eq!(mgr.delete_logic(1).await.unwrap(), 0);
        assert!(mgr.get(1).await.unwrap().is_none());
        assert_eq!(mgr.list(&tombstoned()).await.unwrap().len(), 1);

        assert_eq!(mgr.delete(2).await.unwrap(), 1);
        assert_eq!(mgr.delete(2).await.unwrap(), 0);
        assert_eq!(mgr.len(), 1);
    }

    #[tokio::test]
    async fn test_batch_failures_write_nothing() {
        let mgr = InMemoryManager::<Shelf>::new("shelf");
        let mut dup = shelf("dup");
        dup.set_id(5);
        let result = mgr.insert_batch(&[shelf("ok"), dup.clone(), dup]).await;
        assert!(result.is_err());
        assert!(mgr.is_empty());

        mgr.insert(&shelf("a")).await.unwrap();
        let mut known = shelf("a2");
        known.set_id(1);
        let mut unknown = shelf("z");
        unknown.set_id(42);
        assert!(mgr.update_batch(&[known, unknown]).await.is_err());
        assert_eq!(mgr.get(1).await.unwrap().unwrap().label, "a");
    }

    #[tokio::test]
    async fn test_mixed_batch_keeps_generated_ids_clear_of_explicit_ones() {
        let mgr = InMemoryManager::<Shelf>::new("shelf");
        let mut pinned = shelf("pinned");
        pinned.set_id(1);

        assert_eq!(mgr.insert_batch(&[shelf("auto"), pinned]).await.unwrap(), 2);
        assert_eq!(mgr.len(), 2);
        assert_eq!(mgr.get(1).await.unwrap().unwrap().label, "pinned");
        assert_eq!(mgr.get(2).await.unwrap().unwrap().label, "auto");

        let mut taken = shelf("taken");
        taken.set_id(2);
        assert!(mgr.insert_batch(&[shelf("late"), taken]).await.is_err());
        assert_eq!(mgr.len(), 2);
    }
}
