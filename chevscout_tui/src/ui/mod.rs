pub mod main_view;
pub mod report_view;
