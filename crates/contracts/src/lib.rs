pub mod dashboards;
pub mod enums;
pub mod projections;
