// ==========================================
// 贸易公司后台管理系统 - 计量单位换算表
// ==========================================
// 职责: 单位代码 -> 基准单位倍数的查询
// 红线: 未知单位代码不是错误, 按倍数=1 降级处理 (单位主数据可能不全)
// ==========================================

use serde::{Deserialize, Serialize};
use tracing::warn;

// ==========================================
// UnitDefinition - 单位定义
// ==========================================
/// 计量单位定义（来自静态参数表 category="product_unit"）
///
/// 例: MPCS(千个, multiplier=1000), PCS(个, multiplier=1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDefinition {
    /// 单位代码
    pub code: String,
    /// 显示名称
    pub display_name: String,
    /// 基准单位倍数（1 个该单位 = multiplier 个基准单位），必须 > 0
    pub multiplier: f64,
}

// ==========================================
// UnitTable - 单位换算表
// ==========================================
/// 单位换算表
///
/// 由调用方注入（构造参数，不做模块级单例），作为共享只读参考数据。
/// 集合中至少应包含一个可作为默认值的单位（首个条目）。
#[derive(Debug, Clone, Default)]
pub struct UnitTable {
    units: Vec<UnitDefinition>,
}

impl UnitTable {
    /// 从单位定义列表构造（顺序即默认顺序）
    pub fn new(units: Vec<UnitDefinition>) -> Self {
        Self { units }
    }

    /// 按代码查找单位定义
    pub fn find(&self, code: &str) -> Option<&UnitDefinition> {
        self.units.iter().find(|u| u.code == code)
    }

    /// 查询基准单位倍数
    ///
    /// 未知代码按 1.0 降级处理（fail-open），并记录告警。
    pub fn multiplier_of(&self, code: &str) -> f64 {
        match self.find(code) {
            Some(unit) => unit.multiplier,
            None => {
                warn!(unit_code = %code, "未知单位代码, 按倍数=1降级处理");
                1.0
            }
        }
    }

    /// 查询显示名称
    ///
    /// 未知代码原样返回（fail-open）。
    pub fn name_of(&self, code: &str) -> String {
        match self.find(code) {
            Some(unit) => unit.display_name.clone(),
            None => code.to_string(),
        }
    }

    /// 默认单位（列表首个条目）
    pub fn default_unit(&self) -> Option<&UnitDefinition> {
        self.units.first()
    }

    /// 所有单位定义
    pub fn all(&self) -> &[UnitDefinition] {
        &self.units
    }

    /// 是否为空表
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
