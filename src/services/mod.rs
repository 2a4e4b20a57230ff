pub mod chart_service;
pub mod export_service;
pub mod series_service;
