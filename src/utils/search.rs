//! 列表搜索
//!
//! SQLite 的 `LOWER()` 只折叠 ASCII，带重音的姓名（`Álvaro`、`Ação`）在 SQL 侧无法做到
//! 不区分大小写。搜索因此在取出候选 id 与文本列之后于内存中匹配，再按 id 分页。

use uuid::Uuid;

/// 折叠后的搜索词
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// 空白搜索词视为未搜索
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let folded = raw?.trim().to_lowercase();
        (!folded.is_empty()).then_some(Self(folded))
    }

    pub fn matches(&self, field: &str) -> bool {
        field.to_lowercase().contains(&self.0)
    }

    pub fn matches_any<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        fields.into_iter().any(|f| self.matches(f))
    }
}

/// 取第 `page` 页（从 1 开始）的 id
pub fn page_of(ids: &[Uuid], page: u64, size: u64) -> Vec<Uuid> {
    let start = ((page.saturating_sub(1)) * size) as usize;
    ids.iter()
        .skip(start)
        .take(size as usize)
        .copied()
        .collect()
}

/// 按 `ids` 的顺序重排，`IN (...)` 查询不保证顺序
pub fn order_by_ids<T>(mut items: Vec<T>, ids: &[Uuid], id_of: impl Fn(&T) -> Uuid) -> Vec<T> {
    items.sort_by_key(|item| {
        let id = id_of(item);
        ids.iter().position(|i| *i == id).unwrap_or(usize::MAX)
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_search_is_ignored() {
        assert_eq!(SearchTerm::parse(None), None);
        assert_eq!(SearchTerm::parse(Some("   ")), None);
    }

    #[test]
    fn test_matches_accented_text_in_any_case() {
        let term = SearchTerm::parse(Some(" Álvaro ")).unwrap();
        assert!(term.matches("Álvaro Souza"));
        assert!(term.matches("ÁLVARO"));
        assert!(!term.matches("Alvaro"));

        let term = SearchTerm::parse(Some("ação")).unwrap();
        assert!(term.matches_any(["Login", "Integração da AÇÃO"]));
        assert!(!term.matches_any(["Login", "Cadastro"]));
    }

    #[test]
    fn test_wildcards_are_literal() {
        let term = SearchTerm::parse(Some("50%")).unwrap();
        assert!(term.matches("desconto de 50%"));
        assert!(!term.matches("desconto de 500"));
    }

    #[test]
    fn test_page_of_and_reorder() {
        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        assert_eq!(page_of(&ids, 1, 2), ids[0..2].to_vec());
        assert_eq!(page_of(&ids, 3, 2), ids[4..5].to_vec());
        assert!(page_of(&ids, 4, 2).is_empty());

        let shuffled = vec![ids[2], ids[0], ids[1]];
        let ordered = order_by_ids(shuffled, &ids, |id| *id);
        assert_eq!(ordered, vec![ids[0], ids[1], ids[2]]);
    }
}
