//! 领域基类能力 / Base domain capability
//!
//! 所有由通用 CRUD 层管理的记录都携带创建时间、修改时间与逻辑删除标记。
//! Every record managed by the generic CRUD layer carries a creation time,
//! a modification time and a logical-deletion flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 公共列（嵌入到具体记录中，配合 `#[serde(flatten)]`）
/// Common columns, embedded into concrete records with `#[serde(flatten)]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainMeta {
    /// 创建时间，仅在插入时由服务层写入一次
    /// Creation time, written once by the service layer on insert
    #[serde(default)]
    pub create_date: Option<DateTime<Utc>>,
    /// 修改时间，仅由更新路径写入
    /// Modification time, written only by the update path
    #[serde(default)]
    pub modify_date: Option<DateTime<Utc>>,
    /// 逻辑删除标记 / Logical-deletion flag
    #[serde(default)]
    pub deleted: bool,
}

/// 领域记录能力 Trait / Record capability trait
///
/// 主键由存储层分配，插入前可以为空。
/// The id is assigned by the storage layer and may be absent before insert.
pub trait BaseDomain {
    type Id;

    fn id(&self) -> Option<&Self::Id>;
    fn set_id(&mut self, id: Self::Id);

    fn meta(&self) -> &DomainMeta;
    fn meta_mut(&mut self) -> &mut DomainMeta;

    fn create_date(&self) -> Option<DateTime<Utc>> {
        self.meta().create_date
    }

    fn set_create_date(&mut self, at: DateTime<Utc>) {
        self.meta_mut().create_date = Some(at);
    }

    fn modify_date(&self) -> Option<DateTime<Utc>> {
        self.meta().modify_date
    }

    fn set_modify_date(&mut self, at: DateTime<Utc>) {
        self.meta_mut().modify_date = Some(at);
    }

    fn is_deleted(&self) -> bool {
        self.meta().deleted
    }

    fn set_deleted(&mut self, deleted: bool) {
        self.meta_mut().deleted = deleted;
    }
}

/// 便捷宏：为记录实现 BaseDomain（主键字段为 `Option<Id>`，公共列字段为 `DomainMeta`）
/// Helper macro: implement BaseDomain (id field is `Option<Id>`, meta field is `DomainMeta`)
#[macro_export]
macro_rules! impl_base_domain {
    ($ty:ty, $id_field:ident: $id_ty:ty, $meta_field:ident) => {
        impl $crate::domain::BaseDomain for $ty {
            type Id = $id_ty;

            fn id(&self) -> Option<&Self::Id> {
                self.$id_field.as_ref()
            }

            fn set_id(&mut self, id: Self::Id) {
                self.$id_field = Some(id);
            }

            fn meta(&self) -> &$crate::domain::DomainMeta {
                &self.$meta_field
            }

            fn meta_mut(&mut self) -> &mut $crate::domain::DomainMeta {
                &mut self.$meta_field
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Sku {
        id: Option<i64>,
        code: String,
        #[serde(flatten)]
        meta: DomainMeta,
    }

    crate::impl_base_domain!(Sku, id: i64, meta);

    #[test]
    fn test_meta_accessors() {
        let mut sku = Sku::default();
        assert!(sku.id().is_none());
        assert!(!sku.is_deleted());

        let now = Utc::now();
        sku.set_id(7);
        sku.set_create_date(now);
        sku.set_deleted(true);

        assert_eq!(sku.id(), Some(&7));
        assert_eq!(sku.create_date(), Some(now));
        assert!(sku.modify_date().is_none());
        assert!(sku.is_deleted());
    }

    #[test]
    fn test_flattened_camel_case_columns() {
        let sku: Sku = serde_json::from_str(r#"{"id":null,"code":"A-1","deleted":true}"#).unwrap();
        assert_eq!(sku.code, "A-1");
        assert!(sku.is_deleted());
        assert!(sku.create_date().is_none());

        let json = serde_json::to_value(&sku).unwrap();
        assert!(json.get("createDate").is_some());
        assert!(json.get("modifyDate").is_some());
        assert_eq!(json["deleted"], serde_json::Value::Bool(true));
    }
}
