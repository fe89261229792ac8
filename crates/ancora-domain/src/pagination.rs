//! Pagination parameters for list endpoints and provider listings.

use serde::{Deserialize, Serialize};

/// Page/size pair shared by the admin list endpoints and the identity
/// provider listing port.
///
/// - `per_page`: 1–100, default 50
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_per_page", rename = "per-page")]
    pub per_page: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_per_page() -> u32 {
    50
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            page: default_page(),
        }
    }
}

impl PageRequest {
    /// Clamp `per_page` to 1–100 and `page` to ≥ 1.
    pub fn clamped(self) -> Self {
        Self {
            per_page: self.per_page.clamp(1, 100),
            page: self.page.max(1),
        }
    }

    /// The next page, for walking a provider listing to its end.
    pub fn next(self) -> Self {
        Self {
            page: self.page + 1,
            ..self
        }
    }
}
