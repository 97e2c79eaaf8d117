// ==========================================
// 贸易公司后台管理系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 出运批次状态 (Batch Status)
// ==========================================
// 生命周期: PENDING -> SHIPPED -> DELIVERED, 任意阶段可标记 DELAYED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Pending,   // 待出运
    Shipped,   // 已出运
    Delivered, // 已送达
    Delayed,   // 延误
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::Pending => write!(f, "PENDING"),
            BatchStatus::Shipped => write!(f, "SHIPPED"),
            BatchStatus::Delivered => write!(f, "DELIVERED"),
            BatchStatus::Delayed => write!(f, "DELAYED"),
        }
    }
}

impl BatchStatus {
    /// 从字符串解析状态
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "PENDING" => BatchStatus::Pending,
            "SHIPPED" => BatchStatus::Shipped,
            "DELIVERED" => BatchStatus::Delivered,
            "DELAYED" => BatchStatus::Delayed,
            _ => BatchStatus::Pending, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            BatchStatus::Pending => "PENDING",
            BatchStatus::Shipped => "SHIPPED",
            BatchStatus::Delivered => "DELIVERED",
            BatchStatus::Delayed => "DELAYED",
        }
    }
}
