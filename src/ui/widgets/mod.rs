// src/ui/widgets/mod.rs

pub mod error_banner;
pub mod footer;
pub mod input;
pub mod output_view;
pub mod progress;
pub mod running_view;
pub mod selection;
pub mod tool_step;
