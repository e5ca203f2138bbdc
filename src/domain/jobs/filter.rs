//! Job listing filter

/// Narrows a job listing by keyword and by place.
///
/// Blank parts are dropped, so an empty filter lists everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub query: Option<String>,
    pub location: Option<String>,
}

impl JobFilter {
    pub fn new(query: &str, location: &str) -> Self {
        Self {
            query: non_blank(query),
            location: non_blank(location),
        }
    }

    /// Keyword-only filter
    pub fn keyword(query: &str) -> Self {
        Self::new(query, "")
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.location.is_none()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
