// ---------------------------------------------------------------------------
// Page registry
// ---------------------------------------------------------------------------

/// Pages reachable from the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    Welcome,
    #[default]
    Sales,
    Overview,
    Records,
}

impl Page {
    /// Navigation order.
    pub const ALL: [Page; 4] = [Page::Welcome, Page::Sales, Page::Overview, Page::Records];

    pub fn title(self) -> &'static str {
        match self {
            Page::Welcome => "Welcome",
            Page::Sales => "Sales",
            Page::Overview => "Overview",
            Page::Records => "Records",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Page::Welcome => "What the dashboard shows and where the data comes from.",
            Page::Sales => "Sales of one product over time, filtered by region and year.",
            Page::Overview => "Profit by region and city, sales by category and by region.",
            Page::Records => "Rows matching the current filters.",
        }
    }

    /// Whether the filter side panel is shown next to this page.
    pub fn uses_filters(self) -> bool {
        matches!(self, Page::Sales | Page::Records)
    }
}
