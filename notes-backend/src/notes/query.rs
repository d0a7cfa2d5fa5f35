//! Owner-scoped list query: filter, order and page window.
//!
//! The owner predicate is always the first term of the generated clause and is
//! joined to the optional filters with `AND`, so no filter can widen the result
//! set beyond the caller's own notes.

use rusqlite::types::Value;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Caller-supplied list options after coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub tag: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: None,
            tag: None,
        }
    }
}

impl ListParams {
    /// Coerce raw query-string values. `page` and `limit` take their leading
    /// run of digits (`"2.5"` is 2, `"20abc"` is 20), saturating at `u32::MAX`;
    /// no digits or zero falls back to the default. Blank `search`/`tag`
    /// values are dropped.
    pub fn from_raw(
        page: Option<&str>,
        limit: Option<&str>,
        search: Option<&str>,
        tag: Option<&str>,
    ) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            limit: positive_or(limit, DEFAULT_LIMIT),
            search: non_blank(search),
            tag: non_blank(tag),
        }
    }
}

fn positive_or(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(leading_integer)
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

fn leading_integer(raw: &str) -> Option<u32> {
    let s = raw.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    // all digits, so parsing can only fail on overflow
    Some(s[..len].parse::<u32>().unwrap_or(u32::MAX))
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parameterised `WHERE` clause with its positional values, in order.
#[derive(Debug, Clone)]
pub struct SqlFilter {
    pub clause: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct NoteQuery {
    owner_id: String,
    params: ListParams,
}

impl NoteQuery {
    /// Pinned first, then most recently updated. `id` makes the order total.
    pub const ORDER_BY: &'static str = "is_pinned DESC, updated_at DESC, id DESC";

    pub fn new(owner_id: &str, params: ListParams) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            params,
        }
    }

    pub fn page(&self) -> u32 {
        self.params.page
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.params.limit)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.params.page - 1).saturating_mul(self.limit())
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.params.limit))
    }

    pub fn filter(&self) -> SqlFilter {
        let mut terms = vec!["owner_id = ?".to_string()];
        let mut params = vec![Value::Text(self.owner_id.clone())];

        if let Some(search) = &self.params.search {
            // instr() matches literally; LIKE would give % and _ wildcard meaning
            let needle = search.to_lowercase();
            terms.push(
                "(instr(casefold(title), ?) > 0 OR instr(casefold(content), ?) > 0)".to_string(),
            );
            params.push(Value::Text(needle.clone()));
            params.push(Value::Text(needle));
        }

        if let Some(tag) = &self.params.tag {
            terms.push("EXISTS (SELECT 1 FROM json_each(notes.tags) WHERE json_each.value = ?)".to_string());
            params.push(Value::Text(tag.clone()));
        }

        SqlFilter {
            clause: terms.join(" AND "),
            params,
        }
    }
}
