// ==========================================
// 贸易公司后台管理系统 - 分配策略配置
// ==========================================
// 职责: 新增批次默认单位与提前期等策略项
// 存储: static_param 表 (category="allocation_config", key="default")
// 说明: 配置缺失时回落到内置默认值, 不报错
// ==========================================

use crate::domain::batch::{BatchDefaults, DEFAULT_LEAD_DAYS};
use crate::domain::unit::UnitTable;
use crate::repository::error::RepositoryResult;
use crate::repository::static_param_repo::{StaticParamRepository, ALLOCATION_CONFIG_CATEGORY};
use chrono::{Duration, Local};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 配置在 static_param 表中的键
pub const ALLOCATION_CONFIG_KEY: &str = "default";

// ==========================================
// AllocationConfig - 分配策略配置
// ==========================================
/// 分配策略配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// 新增批次默认单位代码 (为空时取单位表首个条目)
    #[serde(default)]
    pub default_unit_code: Option<String>,
    /// 订单录入场景的计划出运提前期 (天)
    #[serde(default = "default_lead_days")]
    pub order_entry_lead_days: i64,
}

fn default_lead_days() -> i64 {
    DEFAULT_LEAD_DAYS
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            default_unit_code: None,
            order_entry_lead_days: DEFAULT_LEAD_DAYS,
        }
    }
}

impl AllocationConfig {
    /// 从静态参数仓储加载配置（缺失时回落到默认值）
    pub fn load(repo: &StaticParamRepository) -> RepositoryResult<Self> {
        match repo.find_value(ALLOCATION_CONFIG_CATEGORY, ALLOCATION_CONFIG_KEY)? {
            Some(raw) => {
                let config: AllocationConfig = serde_json::from_str(&raw)?;
                Ok(config)
            }
            None => {
                debug!("分配策略配置缺失, 使用内置默认值");
                Ok(Self::default())
            }
        }
    }

    /// 保存配置到静态参数仓储
    pub fn save(&self, repo: &StaticParamRepository) -> RepositoryResult<()> {
        let payload = serde_json::to_string(self)?;
        repo.upsert(ALLOCATION_CONFIG_CATEGORY, ALLOCATION_CONFIG_KEY, &payload, 0)
    }

    /// 解析默认单位代码 (配置优先, 其次单位表首个条目, 最后 "PCS")
    pub fn resolve_default_unit<'a>(&'a self, units: &'a UnitTable) -> &'a str {
        if let Some(code) = self.default_unit_code.as_deref() {
            return code;
        }
        units
            .default_unit()
            .map(|u| u.code.as_str())
            .unwrap_or("PCS")
    }

    /// 订单录入场景的批次默认值 (计划出运日期 = 今天 + 提前期)
    pub fn order_entry_defaults(&self, units: &UnitTable) -> BatchDefaults {
        let code = self.resolve_default_unit(units);
        BatchDefaults {
            unit_code: code.to_string(),
            unit_multiplier: units.multiplier_of(code),
            planned_ship_date: Some(
                Local::now().date_naive() + Duration::days(self.order_entry_lead_days),
            ),
        }
    }

    /// 出运跟踪场景的批次默认值 (计划出运日期留空)
    pub fn tracking_defaults(&self, units: &UnitTable) -> BatchDefaults {
        let code = self.resolve_default_unit(units);
        BatchDefaults::shipment_tracking(code, units.multiplier_of(code))
    }
}
