// ==========================================
// 贸易公司后台管理系统 - 订单行实体
// ==========================================
// 职责: 订单行 (OrderLine) 及其独占的出运批次集合
// ==========================================

use crate::domain::batch::ShipmentBatch;
use serde::{Deserialize, Serialize};

// ==========================================
// OrderLine - 订单行
// ==========================================
/// 订单行
///
/// 订单行独占其批次集合（批次不跨订单行共享），batches 的插入顺序即展示顺序。
/// 订单行自身的单位与批次单位相互独立。
///
/// 软性不变式（以告警而非错误呈现）：
/// Σ(批次数量 × 批次单位倍数) 应等于 订单行数量 × 订单行单位倍数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// 产品货号 (挂入订单后不变)
    pub product_part_no: String,
    /// 产品名称 (挂入订单后不变)
    pub product_name: String,
    /// 订单数量 (以 unit_code 计), 非负
    pub quantity: f64,
    /// 订单行计量单位代码
    pub unit_code: String,
    /// 出运批次集合 (插入顺序 = 展示顺序)
    pub batches: Vec<ShipmentBatch>,
}

impl OrderLine {
    pub fn new(product_part_no: &str, product_name: &str, quantity: f64, unit_code: &str) -> Self {
        Self {
            product_part_no: product_part_no.to_string(),
            product_name: product_name.to_string(),
            quantity,
            unit_code: unit_code.to_string(),
            batches: Vec::new(),
        }
    }
}
