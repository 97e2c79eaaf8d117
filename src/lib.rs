// ==========================================
// 贸易公司后台管理系统 - 出运批次分配引擎核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 后台业务支撑库 (订单行出运批次的数量分配与核对)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 分配策略配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::BatchStatus;

// 领域实体
pub use domain::{BatchDefaults, OrderLine, ShipmentBatch, UnitDefinition, UnitTable};

// 引擎
pub use engine::{
    AutoDistributor, BatchChange, BatchMutator, ReconciliationCalculator, ReconciliationSummary,
};

// API
pub use api::{BatchApi, CommitValidator};

// 配置
pub use config::AllocationConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "贸易公司后台管理系统";

// 基准单位数量核对容差（见 ReconciliationCalculator）
pub const QUANTITY_EPSILON: f64 = 0.01;
