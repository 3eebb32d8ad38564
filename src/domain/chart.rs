// Chart description handed to the renderer

use crate::domain::sample::Series;

/// Everything the renderer needs for a two-series line chart. The primary
/// series draws grey when a secondary overlay is present so the overlay
/// stands out in black.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title_lines: Vec<String>,
    pub x_label: String,
    pub y_label: String,
    pub primary: Series,
    pub secondary: Option<Series>,
}

impl ChartSpec {
    pub fn primary_color(&self) -> &'static str {
        if self.secondary.is_some() {
            "grey"
        } else {
            "black"
        }
    }
}
