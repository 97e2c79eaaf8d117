// ==========================================
// 贸易公司后台管理系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口, 供后台前端调用
// ==========================================

pub mod batch_api;
pub mod error;
pub mod validator;

// 重导出核心类型
pub use batch_api::{BatchApi, OrderLineView};
pub use error::{ApiError, ApiResult, ValidationViolation};
pub use validator::{CommitValidator, ValidationMode};
