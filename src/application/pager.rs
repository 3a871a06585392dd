use crate::domain::filter::OrderFilter;
use crate::domain::order::Order;

/// Browsing position over a filtered order list. Pages are 0-based.
#[derive(Debug, Clone)]
pub struct Pager {
    page: usize,
    page_size: usize,
    filter: OrderFilter,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            filter: OrderFilter::default(),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn filter(&self) -> &OrderFilter {
        &self.filter
    }

    pub fn skip(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }

    /// Replacing the filter always returns to the first page.
    pub fn apply_filter(&mut self, filter: OrderFilter) {
        self.filter = filter;
        self.page = 0;
    }

    pub fn reset_filter(&mut self) {
        self.apply_filter(OrderFilter::default());
    }

    pub fn go_to(&mut self, page: usize) {
        self.page = page;
    }

    pub fn prev(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.page -= 1;
        true
    }

    pub(crate) fn advance(&mut self) {
        self.page += 1;
    }
}

#[derive(Debug, Clone)]
pub struct OrderPage {
    pub items: Vec<Order>,
    pub page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl OrderPage {
    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }
}

/// Number of pages needed for `total` items; never less than one.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}
