//! Search, sort and pagination state for one listing.
//!
//! [`ListViewState`] owns the loaded items and the view parameters (search text,
//! sort key, sort direction, offset, page size). Everything shown on screen is
//! derived from those on read. The filtered and sorted order is memoized under a
//! hash of its inputs and dropped by every setter, so a read never observes
//! stale data.
//!
//! Pagination counts come from `total_items`, not from the filtered length.
//! Changing the search or the sort keeps `offset` where it was, which can leave
//! the visible page empty after a narrowing search.

use crate::entities::{Field, Listable};
use color_eyre::eyre::{bail, Result};
use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Rows per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 12;

struct Derived {
    key: u64,
    order: Vec<usize>,
}

pub struct ListViewState<T: Listable> {
    items: Vec<T>,
    /// Bumped by every load; part of the memo key.
    generation: u64,
    search_value: String,
    sort_key: Option<T::Field>,
    sort_reverse: bool,
    total_items: usize,
    offset: usize,
    limit: usize,
    derived: RefCell<Option<Derived>>,
    #[cfg(test)]
    recomputations: std::cell::Cell<u64>,
}

impl<T: Listable> Default for ListViewState<T> {
    fn default() -> Self {
        Self::with_limit(DEFAULT_PAGE_SIZE)
    }
}

impl<T: Listable> ListViewState<T> {
    /// Fails when `limit` is zero.
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 {
            bail!("Page size must be at least 1");
        }
        Ok(Self::with_limit(limit))
    }

    fn with_limit(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            generation: 0,
            search_value: String::new(),
            sort_key: None,
            sort_reverse: false,
            total_items: 0,
            offset: 0,
            limit,
            derived: RefCell::new(None),
            #[cfg(test)]
            recomputations: std::cell::Cell::new(0),
        }
    }

    // ── Parameters ──

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn search_value(&self) -> &str {
        &self.search_value
    }

    pub fn sort_key(&self) -> Option<T::Field> {
        self.sort_key
    }

    pub fn sort_reverse(&self) -> bool {
        self.sort_reverse
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    // ── Mutations ──

    /// Replace the items wholesale. `total_items` follows the new length.
    pub fn load_items(&mut self, items: Vec<T>) {
        tracing::debug!(count = items.len(), "list view: load");
        self.total_items = items.len();
        self.items = items;
        self.generation = self.generation.wrapping_add(1);
        self.invalidate();
        self.clamp_offset();
    }

    /// Override the pagination total, for data paged by the backend.
    pub fn set_total_items(&mut self, total: usize) {
        self.total_items = total;
        self.clamp_offset();
    }

    pub fn set_search_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        if value != self.search_value {
            self.search_value = value;
            self.invalidate();
        }
    }

    pub fn clear_search(&mut self) {
        self.set_search_value(String::new());
    }

    /// Sort by the attribute called `key`; an empty key clears the sort.
    /// An unknown key is rejected and leaves the state unchanged.
    pub fn set_sort_value(&mut self, key: &str) -> Result<()> {
        let field = if key.is_empty() {
            None
        } else {
            Some(key.parse::<T::Field>()?)
        };
        self.set_sort_field(field);
        Ok(())
    }

    pub fn set_sort_field(&mut self, field: Option<T::Field>) {
        if field != self.sort_key {
            self.sort_key = field;
            self.invalidate();
        }
    }

    /// Advance the sort key: unsorted, then each attribute in column order.
    pub fn cycle_sort_field(&mut self) {
        let all = <T::Field as Field>::ALL;
        let next = match self.sort_key {
            None => all.first().copied(),
            Some(current) => all
                .iter()
                .position(|&f| f == current)
                .and_then(|i| all.get(i + 1))
                .copied(),
        };
        self.set_sort_field(next);
    }

    pub fn toggle_sort(&mut self) {
        self.sort_reverse = !self.sort_reverse;
        self.invalidate();
    }

    pub fn first_page(&mut self) {
        self.offset = 0;
    }

    pub fn last_page(&mut self) {
        self.offset = self.max_offset();
    }

    pub fn next_page(&mut self) {
        if self.page_number() < self.total_pages() {
            self.offset += self.limit;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page_number() > 1 {
            self.offset -= self.limit;
        }
    }

    // ── Pagination ──

    pub fn total_pages(&self) -> usize {
        self.total_items / self.limit + usize::from(self.total_items % self.limit != 0)
    }

    /// 1-based.
    pub fn page_number(&self) -> usize {
        self.offset / self.limit + 1
    }

    pub fn is_first_page(&self) -> bool {
        self.page_number() == 1
    }

    pub fn is_last_page(&self) -> bool {
        self.page_number() >= self.total_pages()
    }

    fn max_offset(&self) -> usize {
        self.total_pages().saturating_sub(1) * self.limit
    }

    fn clamp_offset(&mut self) {
        let clamped = self.offset.min(self.max_offset());
        self.offset = clamped - clamped % self.limit;
    }

    // ── Derived views ──

    pub fn filtered_sorted_items(&self) -> Vec<&T> {
        self.with_order(|order| order.iter().map(|&i| &self.items[i]).collect())
    }

    pub fn filtered_len(&self) -> usize {
        self.with_order(<[usize]>::len)
    }

    /// The slice `[offset, offset + limit)` of the filtered items, clipped.
    pub fn current_page(&self) -> Vec<&T> {
        self.with_order(|order| {
            let start = self.offset.min(order.len());
            let end = self.offset.saturating_add(self.limit).min(order.len());
            order[start..end].iter().map(|&i| &self.items[i]).collect()
        })
    }

    pub fn current_page_len(&self) -> usize {
        self.with_order(|order| {
            let start = self.offset.min(order.len());
            let end = self.offset.saturating_add(self.limit).min(order.len());
            end - start
        })
    }

    /// Row `row` of the current page.
    pub fn item_on_page(&self, row: usize) -> Option<&T> {
        if row >= self.limit {
            return None;
        }
        self.with_order(|order| {
            order
                .get(self.offset.saturating_add(row))
                .map(|&i| &self.items[i])
        })
    }

    fn invalidate(&mut self) {
        *self.derived.get_mut() = None;
    }

    fn memo_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.generation.hash(&mut hasher);
        self.search_value.hash(&mut hasher);
        self.sort_key.hash(&mut hasher);
        self.sort_reverse.hash(&mut hasher);
        hasher.finish()
    }

    fn with_order<R>(&self, f: impl FnOnce(&[usize]) -> R) -> R {
        let key = self.memo_key();
        let mut slot = self.derived.borrow_mut();
        if slot.as_ref().map_or(true, |d| d.key != key) {
            #[cfg(test)]
            self.recomputations.set(self.recomputations.get() + 1);
            *slot = Some(Derived {
                key,
                order: self.compute_order(),
            });
        }
        f(slot.as_ref().map_or(&[][..], |d| d.order.as_slice()))
    }

    fn compute_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.items.len()).collect();

        if let Some(field) = self.sort_key {
            let keys: Vec<String> = self
                .items
                .iter()
                .map(|item| item.field_text(field).to_lowercase())
                .collect();
            // `sort_by` is stable in both directions, so ties keep load order.
            if self.sort_reverse {
                order.sort_by(|&a, &b| keys[b].cmp(&keys[a]));
            } else {
                order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
            }
        }

        if !self.search_value.is_empty() {
            let query = self.search_value.to_lowercase();
            order.retain(|&i| self.items[i].matches_search(&query));
        }

        order
    }

    #[cfg(test)]
    fn recompute_count(&self) -> u64 {
        self.recomputations.get()
    }
}

/// Item-type-independent controls, so the UI can drive whichever listing is
/// on screen without knowing its record kind.
pub trait ListControls {
    fn search_value(&self) -> &str;
    fn set_search_value(&mut self, value: String);
    fn sort_label(&self) -> Option<&'static str>;
    fn sort_reverse(&self) -> bool;
    fn cycle_sort_field(&mut self);
    fn toggle_sort(&mut self);
    fn first_page(&mut self);
    fn last_page(&mut self);
    fn next_page(&mut self);
    fn prev_page(&mut self);
    fn page_number(&self) -> usize;
    fn total_pages(&self) -> usize;
    fn item_count(&self) -> usize;
    fn filtered_len(&self) -> usize;
    fn current_page_len(&self) -> usize;
}

impl<T: Listable> ListControls for ListViewState<T> {
    fn search_value(&self) -> &str {
        ListViewState::search_value(self)
    }

    fn set_search_value(&mut self, value: String) {
        ListViewState::set_search_value(self, value);
    }

    fn sort_label(&self) -> Option<&'static str> {
        self.sort_key.map(Field::label)
    }

    fn sort_reverse(&self) -> bool {
        self.sort_reverse
    }

    fn cycle_sort_field(&mut self) {
        ListViewState::cycle_sort_field(self);
    }

    fn toggle_sort(&mut self) {
        ListViewState::toggle_sort(self);
    }

    fn first_page(&mut self) {
        ListViewState::first_page(self);
    }

    fn last_page(&mut self) {
        ListViewState::last_page(self);
    }

    fn next_page(&mut self) {
        ListViewState::next_page(self);
    }

    fn prev_page(&mut self) {
        ListViewState::prev_page(self);
    }

    fn page_number(&self) -> usize {
        ListViewState::page_number(self)
    }

    fn total_pages(&self) -> usize {
        ListViewState::total_pages(self)
    }

    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn filtered_len(&self) -> usize {
        ListViewState::filtered_len(self)
    }

    fn current_page_len(&self) -> usize {
        ListViewState::current_page_len(self)
    }
}
