// ==========================================
// 贸易公司后台管理系统 - 保存前校验器
// ==========================================
// 职责: 批次保存前的两项独立校验
//   1) 完整性: 每个批次 quantity > 0 且计划出运日期非空 (逐批次报告)
//   2) 数量平衡: 基准单位剩余数量在容差内为 0 (带方向的差额报告)
// 说明: 保存时校验而非逐键击校验; 两项校验相互独立, 违规合并上报
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::domain::batch::ShipmentBatch;
use crate::domain::order::OrderLine;
use crate::domain::unit::UnitTable;
use crate::engine::reconciliation::ReconciliationCalculator;

/// 违规类型: 批次数据不完整
pub const VIOLATION_INCOMPLETE_BATCH: &str = "INCOMPLETE_BATCH";

/// 违规类型: 数量不平衡
pub const VIOLATION_QUANTITY_MISMATCH: &str = "QUANTITY_MISMATCH";

// ==========================================
// ValidationMode - 校验模式
// ==========================================

/// 校验模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationMode {
    /// 严格模式：任何违规都返回错误
    Strict,
    /// 告警模式：记录告警但允许操作（数据补录场景）
    WarnOnly,
}

// ==========================================
// CommitValidator - 保存前校验器
// ==========================================

/// 保存前校验器
///
/// 职责：
/// 1. 批次完整性校验（数量/日期）
/// 2. 数量平衡校验（基准单位核对）
/// 3. 汇总违规明细供前端逐项展示
pub struct CommitValidator {
    calculator: ReconciliationCalculator,
}

impl CommitValidator {
    /// 创建新的CommitValidator实例
    pub fn new(units: Arc<UnitTable>) -> Self {
        Self {
            calculator: ReconciliationCalculator::new(units),
        }
    }

    /// 批次完整性校验
    ///
    /// # 返回
    /// 逐批次的违规列表（quantity <= 0 或缺少计划出运日期）
    pub fn check_completeness(&self, batches: &[ShipmentBatch]) -> Vec<ValidationViolation> {
        let mut violations = Vec::new();

        for batch in batches {
            if batch.quantity <= 0.0 {
                violations.push(ValidationViolation {
                    violation_type: VIOLATION_INCOMPLETE_BATCH.to_string(),
                    batch_id: Some(batch.id.clone()),
                    batch_no: Some(batch.batch_no),
                    reason: format!("批次{}数量必须大于0", batch.batch_no),
                    details: Some(serde_json::json!({ "quantity": batch.quantity })),
                });
            }
            if batch.planned_ship_date.is_none() {
                violations.push(ValidationViolation {
                    violation_type: VIOLATION_INCOMPLETE_BATCH.to_string(),
                    batch_id: Some(batch.id.clone()),
                    batch_no: Some(batch.batch_no),
                    reason: format!("批次{}缺少计划出运日期", batch.batch_no),
                    details: None,
                });
            }
        }

        violations
    }

    /// 数量平衡校验
    ///
    /// # 返回
    /// - None: 基准单位剩余数量在容差内
    /// - Some(violation): 带符号差额与方向 (欠配/超配) 的违规
    pub fn check_reconciliation(&self, line: &OrderLine) -> Option<ValidationViolation> {
        let summary = self.calculator.summarize(line);
        if !summary.has_mismatch {
            return None;
        }

        let direction = if summary.remaining_quantity > 0.0 {
            "欠配"
        } else {
            "超配"
        };

        Some(ValidationViolation {
            violation_type: VIOLATION_QUANTITY_MISMATCH.to_string(),
            batch_id: None,
            batch_no: None,
            reason: format!(
                "批次合计与订单数量不一致: {}{}个基准单位",
                direction,
                summary.remaining_quantity.abs()
            ),
            details: Some(serde_json::json!({
                "order_quantity_base": summary.order_quantity_base,
                "batch_quantity_base": summary.batch_quantity_base,
                "remaining_quantity": summary.remaining_quantity,
                "direction": direction,
            })),
        })
    }

    /// 保存前整体校验（两项独立校验合并上报）
    ///
    /// # 返回
    /// - Ok(()): 校验通过, 允许保存
    /// - Err(ApiError::CommitValidationError): 校验失败, 阻断保存
    pub fn validate_commit(&self, line: &OrderLine, mode: ValidationMode) -> ApiResult<()> {
        let mut violations = self.check_completeness(&line.batches);
        if let Some(mismatch) = self.check_reconciliation(line) {
            violations.push(mismatch);
        }

        if violations.is_empty() {
            return Ok(());
        }

        match mode {
            ValidationMode::Strict => {
                let incomplete = violations
                    .iter()
                    .filter(|v| v.violation_type == VIOLATION_INCOMPLETE_BATCH)
                    .count();
                let mismatch = violations.len() - incomplete;
                Err(ApiError::CommitValidationError {
                    reason: format!(
                        "{}项批次不完整, {}项数量不平衡",
                        incomplete, mismatch
                    ),
                    violations,
                })
            }
            ValidationMode::WarnOnly => {
                warn!(
                    product_part_no = %line.product_part_no,
                    violation_count = violations.len(),
                    "告警模式: 忽略保存前校验违规"
                );
                Ok(())
            }
        }
    }
}
