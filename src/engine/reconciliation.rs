// ==========================================
// 贸易公司后台管理系统 - 数量核对引擎
// ==========================================
// 职责: 订单行与批次数量折算到基准单位后的汇总、差额与不平衡判定
// 红线: 纯函数, 无副作用, 可重复调用; 空批次列表返回 0 而非错误
// ==========================================
// 输入: 订单行 (含批次集合) + 单位换算表
// 输出: 基准单位汇总数量 / 剩余数量 / 不平衡标志
// ==========================================

use crate::domain::batch::ShipmentBatch;
use crate::domain::order::OrderLine;
use crate::domain::unit::UnitTable;
use crate::QUANTITY_EPSILON;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// ReconciliationSummary - 核对结果
// ==========================================
/// 数量核对结果（供前端展示与保存前校验使用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    /// 订单行数量折算到基准单位
    pub order_quantity_base: f64,
    /// 批次数量合计折算到基准单位
    pub batch_quantity_base: f64,
    /// 剩余数量 (正=欠配, 负=超配, 0=平衡)
    pub remaining_quantity: f64,
    /// 是否不平衡 (|remaining| > 容差)
    pub has_mismatch: bool,
}

// ==========================================
// ReconciliationCalculator - 数量核对引擎
// ==========================================
/// 数量核对引擎
///
/// 单位换算表为构造注入的共享只读数据；引擎自身无状态。
pub struct ReconciliationCalculator {
    units: Arc<UnitTable>,
}

impl ReconciliationCalculator {
    /// 构造函数
    ///
    /// # 参数
    /// - `units`: 单位换算表（共享只读）
    pub fn new(units: Arc<UnitTable>) -> Self {
        Self { units }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 批次数量合计（基准单位）
    ///
    /// Σ 批次数量 × 批次单位倍数。空列表返回 0。
    pub fn total_batch_quantity_base(&self, batches: &[ShipmentBatch]) -> f64 {
        batches
            .iter()
            .map(|b| b.quantity * self.units.multiplier_of(&b.unit_code))
            .sum()
    }

    /// 订单行数量（基准单位）
    pub fn order_quantity_base(&self, line: &OrderLine) -> f64 {
        line.quantity * self.units.multiplier_of(&line.unit_code)
    }

    /// 剩余数量（基准单位）
    ///
    /// 正数=欠配, 负数=超配, 0=刚好平衡。
    pub fn remaining_quantity(&self, line: &OrderLine) -> f64 {
        self.order_quantity_base(line) - self.total_batch_quantity_base(&line.batches)
    }

    /// 是否数量不平衡
    ///
    /// |剩余数量| > QUANTITY_EPSILON (0.01 基准单位, 统一容差, 吸收浮点噪声)
    pub fn has_mismatch(&self, line: &OrderLine) -> bool {
        self.remaining_quantity(line).abs() > QUANTITY_EPSILON
    }

    /// 汇总核对结果
    #[instrument(skip(self, line), fields(
        product_part_no = %line.product_part_no,
        batch_count = line.batches.len()
    ))]
    pub fn summarize(&self, line: &OrderLine) -> ReconciliationSummary {
        let order_quantity_base = self.order_quantity_base(line);
        let batch_quantity_base = self.total_batch_quantity_base(&line.batches);
        let remaining_quantity = order_quantity_base - batch_quantity_base;

        ReconciliationSummary {
            order_quantity_base,
            batch_quantity_base,
            remaining_quantity,
            has_mismatch: remaining_quantity.abs() > QUANTITY_EPSILON,
        }
    }
}
