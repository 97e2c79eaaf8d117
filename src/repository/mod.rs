// ==========================================
// 贸易公司后台管理系统 - 仓储层
// ==========================================
// 职责: SQLite 数据访问; 引擎层不直接接触数据库
// ==========================================

pub mod error;
pub mod order_line_repo;
pub mod static_param_repo;

// 重导出核心类型
pub use error::{RepositoryError, RepositoryResult};
pub use order_line_repo::OrderLineRepository;
pub use static_param_repo::{StaticParamRepository, PRODUCT_UNIT_CATEGORY};
