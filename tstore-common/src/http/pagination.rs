use serde::{Deserialize, Serialize};

/// 分页结果 / Page result
///
/// `page_num` 从 1 开始；服务层原样转发分页参数，不做解释。
/// `page_num` is 1-based; the service layer forwards paging inputs uninterpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo<T> {
    pub page_num: i64,
    pub page_size: i64,
    pub total: u64,
    pub pages: u64,
    pub list: Vec<T>,
}

impl<T> PageInfo<T> {
    pub fn new(page_num: i64, page_size: i64, total: u64, list: Vec<T>) -> Self {
        let pages = if page_size <= 0 {
            0
        } else {
            total.div_ceil(page_size as u64)
        };
        Self {
            page_num,
            page_size,
            total,
            pages,
            list,
        }
    }

    pub fn empty(page_num: i64, page_size: i64) -> Self {
        Self::new(page_num, page_size, 0, Vec::new())
    }

    pub fn has_next(&self) -> bool {
        self.page_num >= 1 && (self.page_num as u64) < self.pages
    }

    pub fn has_previous(&self) -> bool {
        self.page_num > 1
    }
}

/// 构建分页 Link 头（路径风格：`{base}/{pageNum}/{pageSize}`）
/// Build the paging Link header (path style: `{base}/{pageNum}/{pageSize}`)
pub fn build_link_header(base_url: &str, page_num: i64, page_size: i64, pages: u64) -> String {
    let mut links: Vec<String> = Vec::new();
    let last = pages.max(1);

    links.push(format!("<{}/{}/{}>; rel=\"first\"", base_url, 1, page_size));
    links.push(format!("<{}/{}/{}>; rel=\"last\"", base_url, last, page_size));
    if page_num >= 1 && (page_num as u64) < pages {
        links.push(format!("<{}/{}/{}>; rel=\"next\"", base_url, page_num + 1, page_size));
    }
    if page_num > 1 {
        links.push(format!("<{}/{}/{}>; rel=\"prev\"", base_url, page_num - 1, page_size));
    }
    links.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_rounds_up() {
        let page = PageInfo::new(2, 30, 95, vec![1, 2, 3]);
        assert_eq!(page.pages, 4);
        assert!(page.has_next());
        assert!(page.has_previous());

        let last = PageInfo::<i32>::new(4, 30, 95, vec![]);
        assert!(!last.has_next());

        let zero = PageInfo::<i32>::new(1, 0, 10, vec![]);
        assert_eq!(zero.pages, 0);
    }

    #[test]
    fn test_link_header_build() {
        let h = build_link_header("/api/sku/list", 2, 30, 4);
        assert!(h.contains("rel=\"next\""));
        assert!(h.contains("rel=\"prev\""));
        assert!(h.contains("rel=\"last\""));
        assert!(h.contains("</api/sku/list/3/30>"));
        assert!(h.contains("</api/sku/list/1/30>"));
        assert!(h.contains("</api/sku/list/4/30>"));
    }

    #[test]
    fn test_link_header_single_page() {
        let h = build_link_header("/api/sku/list", 1, 10, 0);
        assert!(!h.contains("rel=\"next\""));
        assert!(!h.contains("rel=\"prev\""));
    }

    #[test]
    fn test_camel_case_serialization() {
        let json = serde_json::to_value(PageInfo::new(1, 10, 1, vec!["a"])).unwrap();
        assert_eq!(json["pageNum"], 1);
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["list"][0], "a");
    }
}
