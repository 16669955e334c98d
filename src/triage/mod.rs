//! 贷款定价排查：接口访问、数据解析、聚合流程与定价差异

pub mod api;
pub mod parser;
pub mod pricing_diff;
pub mod session;
pub mod workflow;
