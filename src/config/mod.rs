// ==========================================
// 贸易公司后台管理系统 - 配置层
// ==========================================
// 职责: 分配策略配置加载与默认值管理
// ==========================================

pub mod allocation_config;

// 重导出核心类型
pub use allocation_config::AllocationConfig;
