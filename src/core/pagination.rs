use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// 每頁顯示筆數；`All` 代表顯示全部
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSize {
    Fixed(usize),
    All,
}

impl PageSize {
    pub const DEFAULT: PageSize = PageSize::Fixed(5);

    /// 下拉選單提供的選項
    pub const OPTIONS: [PageSize; 6] = [
        PageSize::Fixed(5),
        PageSize::Fixed(10),
        PageSize::Fixed(25),
        PageSize::Fixed(50),
        PageSize::Fixed(100),
        PageSize::All,
    ];

    pub fn value(&self) -> usize {
        match self {
            PageSize::Fixed(size) => *size,
            PageSize::All => usize::MAX,
        }
    }

    pub fn resolve(&self, total: usize) -> usize {
        match self {
            PageSize::Fixed(size) => *size,
            PageSize::All => total,
        }
    }

    pub fn label(&self) -> String {
        match self {
            PageSize::Fixed(size) => size.to_string(),
            PageSize::All => "All".to_string(),
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::DEFAULT
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(PageSize::All);
        }
        trimmed
            .parse::<usize>()
            .map(PageSize::Fixed)
            .map_err(|_| format!("invalid page size '{}', expected a number or 'all'", s))
    }
}

/// 一頁資料的檢視，不複製元素；可重複迭代
#[derive(Debug)]
pub struct Page<'a, T> {
    items: &'a [T],
    range: Range<usize>,
    index: usize,
}

impl<'a, T> Clone for Page<'a, T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items,
            range: self.range.clone(),
            index: self.index,
        }
    }
}

impl<'a, T> Page<'a, T> {
    pub fn iter(&self) -> std::slice::Iter<'a, T> {
        self.items[self.range.clone()].iter()
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// 從 0 起算的頁碼
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<'a, T> IntoIterator for Page<'a, T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, 'p, T> IntoIterator for &'p Page<'a, T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// 取出第 `page_index` 頁；超出範圍時夾到最後一頁
pub fn paginate<T>(items: &[T], page_size: usize, page_index: usize) -> Page<'_, T> {
    let pages = page_count(items.len(), page_size);
    let index = page_index.min(pages.saturating_sub(1));
    let start = index.saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    Page {
        items,
        range: start..end,
        index,
    }
}

/// "Showing X out of Y results."，X = min(每頁筆數, 總數)
pub fn results_summary(page_size: usize, total: usize) -> String {
    format!("Showing {} out of {} results.", page_size.min(total), total)
}
