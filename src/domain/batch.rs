// ==========================================
// 贸易公司后台管理系统 - 出运批次实体
// ==========================================
// 职责: 出运批次 (ShipmentBatch) 与新增批次默认策略 (BatchDefaults)
// 所有权: 批次归属唯一订单行, 不跨订单行共享
// ==========================================

use crate::domain::types::BatchStatus;
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 订单录入场景下的默认计划出运提前期（天）
pub const DEFAULT_LEAD_DAYS: i64 = 30;

// ==========================================
// ShipmentBatch - 出运批次
// ==========================================
/// 出运批次实体
///
/// batch_no 为订单行内 1 起始的顺序号，创建时分配后不变
/// （删除批次不回溯重排，除非人工显式修改）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentBatch {
    /// 批次ID (UUID, 创建时分配, 不复用)
    pub id: String,
    /// 批次顺序号 (订单行内 1 起始)
    pub batch_no: i32,
    /// 数量 (以 unit_code 计), 非负
    pub quantity: f64,
    /// 计量单位代码
    pub unit_code: String,
    /// 单位倍数快照 (单位变更时由 Mutator 重算, 供持久化/展示使用)
    pub unit_multiplier: f64,
    /// 计划出运日期 (保存前必填)
    pub planned_ship_date: Option<NaiveDate>,
    /// 实际出运日期 (出运后填写)
    pub actual_ship_date: Option<NaiveDate>,
    /// 预计到达日期 (出运后填写)
    pub estimated_arrival_date: Option<NaiveDate>,
    /// 批次状态
    pub status: BatchStatus,
    /// 备注
    pub notes: Option<String>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl ShipmentBatch {
    /// 创建新批次（自动生成 UUID 和时间戳）
    ///
    /// 初始: quantity=0, status=PENDING
    pub fn new(batch_no: i32, defaults: &BatchDefaults) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            batch_no,
            quantity: 0.0,
            unit_code: defaults.unit_code.clone(),
            unit_multiplier: defaults.unit_multiplier,
            planned_ship_date: defaults.planned_ship_date,
            actual_ship_date: None,
            estimated_arrival_date: None,
            status: BatchStatus::Pending,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// ==========================================
// BatchDefaults - 新增批次默认策略
// ==========================================
/// 新增批次的默认值策略
///
/// 计划出运日期的默认值是调用方策略而非模块不变式：
/// 订单录入场景默认"今天+30天"，出运跟踪场景留空。
#[derive(Debug, Clone)]
pub struct BatchDefaults {
    pub unit_code: String,
    pub unit_multiplier: f64,
    pub planned_ship_date: Option<NaiveDate>,
}

impl BatchDefaults {
    /// 订单录入策略: 计划出运日期默认今天 + 30 天
    pub fn order_entry(unit_code: &str, unit_multiplier: f64) -> Self {
        Self {
            unit_code: unit_code.to_string(),
            unit_multiplier,
            planned_ship_date: Some(Local::now().date_naive() + Duration::days(DEFAULT_LEAD_DAYS)),
        }
    }

    /// 出运跟踪策略: 计划出运日期留空, 由用户补填
    pub fn shipment_tracking(unit_code: &str, unit_multiplier: f64) -> Self {
        Self {
            unit_code: unit_code.to_string(),
            unit_multiplier,
            planned_ship_date: None,
        }
    }
}
