pub mod app;
pub mod board_view;
pub mod controls_panel;
pub mod status_panel;
