// ==========================================
// 贸易公司后台管理系统 - 出运批次 API
// ==========================================
// 职责: 订单行批次查询、均分预览、保存前校验与落库
// 说明: 批次编辑发生在调用方内存集合上 (BatchMutator);
//       本层负责把校验通过的批次数组交给仓储原子落库
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{CommitValidator, ValidationMode};
use crate::domain::batch::ShipmentBatch;
use crate::domain::order::OrderLine;
use crate::domain::unit::{UnitDefinition, UnitTable};
use crate::engine::distributor::AutoDistributor;
use crate::engine::reconciliation::{ReconciliationCalculator, ReconciliationSummary};
use crate::repository::order_line_repo::OrderLineRepository;
use crate::repository::static_param_repo::StaticParamRepository;

// ==========================================
// OrderLineView - 订单行视图
// ==========================================
/// 用于前端展示的订单行完整信息（行头 + 批次 + 核对结果）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineView {
    pub product_part_no: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit_code: String,
    /// 单位显示名 (未知单位代码原样返回)
    pub unit_name: String,
    pub batches: Vec<ShipmentBatch>,
    pub summary: ReconciliationSummary,
}

// ==========================================
// BatchApi - 出运批次 API
// ==========================================

/// 出运批次API
///
/// 职责：
/// 1. 订单行查询（行头 + 批次 + 派生核对数字）
/// 2. 批次均分预览（不落库）
/// 3. 保存前校验 + 批次整组落库
pub struct BatchApi {
    order_repo: Arc<OrderLineRepository>,
    units: Arc<UnitTable>,
    calculator: ReconciliationCalculator,
    distributor: AutoDistributor,
    validator: CommitValidator,
}

impl BatchApi {
    /// 创建新的BatchApi实例
    ///
    /// 单位换算表从静态参数仓储加载 (category="product_unit") 后注入各引擎。
    ///
    /// # 参数
    /// - order_repo: 订单行仓储
    /// - param_repo: 静态参数仓储
    pub fn new(
        order_repo: Arc<OrderLineRepository>,
        param_repo: Arc<StaticParamRepository>,
    ) -> ApiResult<Self> {
        let units = Arc::new(param_repo.load_unit_table()?);
        if units.is_empty() {
            warn!("单位主数据为空, 所有单位代码将按倍数=1降级处理");
        }
        Ok(Self::with_units(order_repo, units))
    }

    /// 以既有单位换算表构造（测试或调用方自备单位数据时使用）
    pub fn with_units(order_repo: Arc<OrderLineRepository>, units: Arc<UnitTable>) -> Self {
        Self {
            order_repo,
            calculator: ReconciliationCalculator::new(units.clone()),
            distributor: AutoDistributor::new(units.clone()),
            validator: CommitValidator::new(units.clone()),
            units,
        }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 单位主数据列表
    pub fn list_units(&self) -> Vec<UnitDefinition> {
        self.units.all().to_vec()
    }

    /// 按产品货号查询订单行（含批次与核对结果）
    pub fn get_order_line(&self, part_no: &str) -> ApiResult<OrderLineView> {
        if part_no.trim().is_empty() {
            return Err(ApiError::InvalidInput("产品货号不能为空".to_string()));
        }

        let line = self
            .order_repo
            .find_by_part_no(part_no)?
            .ok_or_else(|| ApiError::NotFound(format!("OrderLine(id={})不存在", part_no)))?;

        Ok(self.build_view(line))
    }

    /// 查询全部订单行
    pub fn list_order_lines(&self) -> ApiResult<Vec<OrderLineView>> {
        let mut views = Vec::new();
        for part_no in self.order_repo.list_part_nos()? {
            if let Some(line) = self.order_repo.find_by_part_no(&part_no)? {
                views.push(self.build_view(line));
            }
        }
        Ok(views)
    }

    // ==========================================
    // 变更接口
    // ==========================================

    /// 创建或更新订单行头
    pub fn upsert_order_line(&self, line: &OrderLine) -> ApiResult<()> {
        if line.product_part_no.trim().is_empty() {
            return Err(ApiError::InvalidInput("产品货号不能为空".to_string()));
        }
        if line.quantity < 0.0 {
            return Err(ApiError::InvalidInput("订单数量不能为负".to_string()));
        }
        self.order_repo.upsert_line(line)?;
        Ok(())
    }

    /// 均分预览：将订单总量平均分配到现有批次（不落库）
    ///
    /// 返回分配后的视图供前端展示，保存仍需走 save_batches 的校验路径。
    pub fn distribute_preview(&self, part_no: &str) -> ApiResult<OrderLineView> {
        let mut line = self
            .order_repo
            .find_by_part_no(part_no)?
            .ok_or_else(|| ApiError::NotFound(format!("OrderLine(id={})不存在", part_no)))?;

        if line.batches.is_empty() {
            debug!(product_part_no = %part_no, "均分预览: 无批次, 原样返回");
        } else {
            let mut batches = std::mem::take(&mut line.batches);
            self.distributor.distribute(&line, &mut batches);
            line.batches = batches;
        }

        Ok(self.build_view(line))
    }

    /// 保存订单行批次（"更新订单行批次"操作）
    ///
    /// 流程: 读取行头 -> 保存前校验 (完整性 + 数量平衡) -> 单事务整组替换。
    ///
    /// # 返回
    /// - Ok(ReconciliationSummary): 保存成功, 返回核对结果
    /// - Err(ApiError::CommitValidationError): 校验失败, 保存被阻断
    pub fn save_batches(
        &self,
        part_no: &str,
        batches: Vec<ShipmentBatch>,
        mode: ValidationMode,
    ) -> ApiResult<ReconciliationSummary> {
        let mut line = self
            .order_repo
            .find_by_part_no(part_no)?
            .ok_or_else(|| ApiError::NotFound(format!("OrderLine(id={})不存在", part_no)))?;
        line.batches = batches;

        if let Err(err) = self.validator.validate_commit(&line, mode) {
            warn!(product_part_no = %part_no, error = %err, "保存被校验阻断");
            return Err(err);
        }

        self.order_repo.replace_batches(part_no, &line.batches)?;
        let summary = self.calculator.summarize(&line);
        info!(
            product_part_no = %part_no,
            batch_count = line.batches.len(),
            remaining = summary.remaining_quantity,
            "批次保存成功"
        );
        Ok(summary)
    }

    // ==========================================
    // 视图构建
    // ==========================================

    fn build_view(&self, line: OrderLine) -> OrderLineView {
        let summary = self.calculator.summarize(&line);
        OrderLineView {
            unit_name: self.units.name_of(&line.unit_code),
            product_part_no: line.product_part_no,
            product_name: line.product_name,
            quantity: line.quantity,
            unit_code: line.unit_code,
            batches: line.batches,
            summary,
        }
    }
}
