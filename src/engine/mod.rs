// ==========================================
// 贸易公司后台管理系统 - 引擎层
// ==========================================
// 职责: 实现批次分配业务规则, 不拼 SQL
// 红线: 引擎为无状态纯计算, 无 I/O, 无内部事件系统 (按需拉取式调用)
// ==========================================

pub mod distributor;
pub mod mutator;
pub mod reconciliation;

// 重导出核心引擎
pub use distributor::AutoDistributor;
pub use mutator::{BatchChange, BatchMutator};
pub use reconciliation::{ReconciliationCalculator, ReconciliationSummary};
