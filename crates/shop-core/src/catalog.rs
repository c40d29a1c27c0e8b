//! # Catalog Rules
//!
//! Storage-independent pieces of the catalog: product code allocation and
//! normalisation of the shop's category/search filters.
//!
//! ## Code Allocation
//! ```text
//! existing codes: ["1001", "1002", "GPU-01", "1010"]
//!                    │       │        ✗        │
//!                    └───────┴── numeric ──────┘
//!                             max = 1010
//!                                 │
//!                                 ▼
//!                        next code = "1011"
//! ```
//! Allocation is read-then-insert and not atomic: two managers adding
//! products at the same moment can be handed the same code. The UNIQUE
//! constraint on `products.code` rejects the second insert.

use crate::{ALL_CATEGORIES, DEFAULT_CATEGORY, SEED_PRODUCT_CODE};

/// One more than the largest all-digit code, or `"1001"` when there is none.
///
/// ```rust
/// use shop_core::catalog::next_product_code;
///
/// assert_eq!(next_product_code(["1001", "1009", "ABC"]), "1010");
/// assert_eq!(next_product_code(Vec::<String>::new()), "1001");
/// ```
pub fn next_product_code<I, S>(codes: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    codes
        .into_iter()
        .filter_map(|code| {
            let code = code.as_ref().trim();
            if !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit()) {
                code.parse::<u64>().ok()
            } else {
                None
            }
        })
        .max()
        .and_then(|max| max.checked_add(1))
        .map(|next| next.to_string())
        .unwrap_or_else(|| SEED_PRODUCT_CODE.to_string())
}

/// Category to store for a new product; blank means `"General"`.
pub fn normalize_category(category: &str) -> String {
    let category = category.trim();
    if category.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        category.to_string()
    }
}

/// Category filter for listings. `None`, blank and `"All"` disable it.
pub fn category_filter(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES))
        .map(str::to_string)
}

/// Search filter for listings. `None` and blank disable it.
pub fn search_filter(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Builds a `LIKE ... ESCAPE '\'` pattern matching `term` anywhere.
///
/// ```rust
/// use shop_core::catalog::like_pattern;
///
/// assert_eq!(like_pattern("ssd"), "%ssd%");
/// assert_eq!(like_pattern("100%_"), "%100\\%\\_%");
/// ```
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
