// ==========================================
// 贸易公司后台管理系统 - 批次编辑引擎
// ==========================================
// 职责: 批次集合的新增/修改/删除 (内存内同步变更)
// 红线: 删除批次不回溯重排剩余批次的 batch_no
//       (batch_no 创建时分配, 非人工显式修改不变)
// ==========================================

use crate::domain::batch::{BatchDefaults, ShipmentBatch};
use crate::domain::types::BatchStatus;
use crate::domain::unit::UnitTable;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::debug;

// ==========================================
// BatchChange - 批次字段变更
// ==========================================
/// 批次单字段变更（显式类型化，替代动态字段名访问）
#[derive(Debug, Clone)]
pub enum BatchChange {
    Quantity(f64),
    /// 单位变更会同时重算 unit_multiplier 快照
    Unit(String),
    BatchNo(i32),
    PlannedShipDate(Option<NaiveDate>),
    ActualShipDate(Option<NaiveDate>),
    EstimatedArrivalDate(Option<NaiveDate>),
    Status(BatchStatus),
    Notes(Option<String>),
}

// ==========================================
// BatchMutator - 批次编辑引擎
// ==========================================
/// 批次编辑引擎
///
/// 所有变更作用于调用方持有的内存集合；持久化由外部协作方负责。
pub struct BatchMutator {
    units: Arc<UnitTable>,
}

impl BatchMutator {
    /// 构造函数
    pub fn new(units: Arc<UnitTable>) -> Self {
        Self { units }
    }

    /// 新增批次
    ///
    /// batch_no = 当前批次数 + 1, quantity = 0, status = PENDING。
    /// 单位与计划出运日期默认值由调用方策略 (BatchDefaults) 提供。
    pub fn add_batch(
        &self,
        batches: &mut Vec<ShipmentBatch>,
        defaults: &BatchDefaults,
    ) -> ShipmentBatch {
        let batch_no = batches.len() as i32 + 1;
        let batch = ShipmentBatch::new(batch_no, defaults);
        debug!(batch_id = %batch.id, batch_no, "新增批次");
        batches.push(batch.clone());
        batch
    }

    /// 修改批次单字段
    ///
    /// # 返回
    /// - true: 找到并修改
    /// - false: 批次ID不存在 (集合不变)
    pub fn update_batch(
        &self,
        batches: &mut [ShipmentBatch],
        id: &str,
        change: BatchChange,
    ) -> bool {
        let Some(batch) = batches.iter_mut().find(|b| b.id == id) else {
            debug!(batch_id = %id, "修改批次: 批次ID不存在");
            return false;
        };

        match change {
            BatchChange::Quantity(quantity) => batch.quantity = quantity,
            BatchChange::Unit(unit_code) => {
                // 同步刷新倍数快照, 避免后续计算依赖换算表的并发变化
                batch.unit_multiplier = self.units.multiplier_of(&unit_code);
                batch.unit_code = unit_code;
            }
            BatchChange::BatchNo(batch_no) => batch.batch_no = batch_no,
            BatchChange::PlannedShipDate(date) => batch.planned_ship_date = date,
            BatchChange::ActualShipDate(date) => batch.actual_ship_date = date,
            BatchChange::EstimatedArrivalDate(date) => batch.estimated_arrival_date = date,
            BatchChange::Status(status) => batch.status = status,
            BatchChange::Notes(notes) => batch.notes = notes,
        }
        batch.updated_at = Utc::now();
        true
    }

    /// 删除批次
    ///
    /// 剩余批次的 batch_no 不回溯重排。
    ///
    /// # 返回
    /// - true: 找到并删除
    /// - false: 批次ID不存在 (集合不变)
    pub fn remove_batch(&self, batches: &mut Vec<ShipmentBatch>, id: &str) -> bool {
        let before = batches.len();
        batches.retain(|b| b.id != id);
        let removed = batches.len() < before;
        if removed {
            debug!(batch_id = %id, "删除批次");
        }
        removed
    }
}
