// ==========================================
// 贸易公司后台管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod batch;
pub mod order;
pub mod types;
pub mod unit;

// 重导出核心类型
pub use batch::{BatchDefaults, ShipmentBatch};
pub use order::OrderLine;
pub use types::BatchStatus;
pub use unit::{UnitDefinition, UnitTable};
