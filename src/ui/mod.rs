//! UI components for Forecast Map.
//!
//! This module contains the forecast result panel and the alert dialog.

pub mod alert;
pub mod result_panel;

pub use alert::AlertQueue;
pub use result_panel::ResultPanel;
