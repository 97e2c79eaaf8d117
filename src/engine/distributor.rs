// ==========================================
// 贸易公司后台管理系统 - 批次均分引擎
// ==========================================
// 职责: 将订单行基准单位总量在现有批次间平均分配
// 红线: 批次各自单位保持不变, 分配量按该批次倍数折回
// ==========================================
// 输入: 订单行 + 批次集合 (至少 1 个批次, 空集合为 no-op)
// 输出: 就地更新各批次 quantity (并刷新 unit_multiplier 快照)
// ==========================================
// 说明: 批次间单位倍数不一致时本引擎只做近似分配, 残余差额
// 由数量核对引擎的不平衡标志呈现, 交由人工修正。
// ==========================================

use crate::domain::batch::ShipmentBatch;
use crate::domain::order::OrderLine;
use crate::domain::unit::UnitTable;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, instrument};

// ==========================================
// AutoDistributor - 批次均分引擎
// ==========================================
/// 批次均分引擎
///
/// 确定性算法: 相同输入重复调用产生相同结果（幂等）。
pub struct AutoDistributor {
    units: Arc<UnitTable>,
}

impl AutoDistributor {
    /// 构造函数
    pub fn new(units: Arc<UnitTable>) -> Self {
        Self { units }
    }

    /// 平均分配订单总量到现有批次
    ///
    /// 算法:
    /// 1) total = 订单行数量折算到基准单位
    /// 2) avg = floor(total / 批次数), remainder = total mod 批次数
    /// 3) 第 i 个批次 (0 起始, 集合顺序): quantity = floor(avg / 该批次倍数);
    ///    i < remainder 时追加 ceil(1 / 该批次倍数)，余量落在前 remainder 个批次
    /// 4) 每个批次结果数量下限钳制为 1 (不给现存批次自动分配 0)
    ///
    /// # 边界
    /// - 批次数为 0: no-op
    #[instrument(skip(self, line, batches), fields(
        product_part_no = %line.product_part_no,
        batch_count = batches.len()
    ))]
    pub fn distribute(&self, line: &OrderLine, batches: &mut [ShipmentBatch]) {
        if batches.is_empty() {
            debug!("无批次可分配, 跳过");
            return;
        }

        let total = line.quantity * self.units.multiplier_of(&line.unit_code);
        let count = batches.len() as f64;
        let avg_per_batch = (total / count).floor();
        let remainder = total - avg_per_batch * count;

        let now = Utc::now();
        for (i, batch) in batches.iter_mut().enumerate() {
            let multiplier = self.units.multiplier_of(&batch.unit_code);
            let mut quantity = (avg_per_batch / multiplier).floor();
            if (i as f64) < remainder {
                quantity += (1.0 / multiplier).ceil();
            }

            // 下限钳制: 现存批次不自动分配 0
            batch.quantity = quantity.max(1.0);
            batch.unit_multiplier = multiplier;
            batch.updated_at = now;
        }

        debug!(
            total_base = total,
            avg_per_batch = avg_per_batch,
            remainder = remainder,
            "批次均分完成"
        );
    }
}
