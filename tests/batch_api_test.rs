// ==========================================
// BatchApi 端到端集成测试
// ==========================================
// 测试目标: 单位加载 -> 批次编辑 -> 均分预览 -> 校验保存 的完整链路
// 覆盖范围: 视图派生数字、保存阻断、配置默认值
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;
use trade_shipment_batch::api::validator::ValidationMode;
use trade_shipment_batch::api::{ApiError, BatchApi};
use trade_shipment_batch::config::AllocationConfig;
use trade_shipment_batch::domain::order::OrderLine;
use trade_shipment_batch::domain::unit::UnitDefinition;
use trade_shipment_batch::engine::{BatchChange, BatchMutator};
use trade_shipment_batch::repository::{OrderLineRepository, StaticParamRepository};

// ==========================================
// 测试辅助函数
// ==========================================

struct TestContext {
    _dir: TempDir,
    api: BatchApi,
    param_repo: Arc<StaticParamRepository>,
}

/// 搭建带单位主数据与一条订单行的测试环境
fn setup() -> TestContext {
    let dir = TempDir::new().expect("创建临时目录失败");
    let db_path = dir.path().join("test.db").to_string_lossy().to_string();

    let param_repo = Arc::new(StaticParamRepository::new(&db_path).unwrap());
    param_repo
        .upsert_unit(
            &UnitDefinition {
                code: "MPCS".to_string(),
                display_name: "千个".to_string(),
                multiplier: 1000.0,
            },
            1,
        )
        .unwrap();
    param_repo
        .upsert_unit(
            &UnitDefinition {
                code: "PCS".to_string(),
                display_name: "个".to_string(),
                multiplier: 1.0,
            },
            2,
        )
        .unwrap();

    let order_repo = Arc::new(OrderLineRepository::new(&db_path).unwrap());
    let api = BatchApi::new(order_repo, param_repo.clone()).unwrap();

    api.upsert_order_line(&OrderLine::new("PN-1001", "硅胶杯垫", 1000.0, "PCS"))
        .unwrap();

    TestContext {
        _dir: dir,
        api,
        param_repo,
    }
}

// ==========================================
// 测试用例 1: 单位主数据随 API 构造加载
// ==========================================

#[test]
fn test_api_loads_units_from_static_params() {
    let ctx = setup();

    let units = ctx.api.list_units();
    assert_eq!(units.len(), 2);
    assert_eq!(units[0].code, "MPCS"); // sort_no 序
}

// ==========================================
// 测试用例 2: 订单行视图携带派生核对数字
// ==========================================

#[test]
fn test_view_carries_reconciliation_summary() {
    let ctx = setup();

    let view = ctx.api.get_order_line("PN-1001").unwrap();
    assert_eq!(view.unit_name, "个");
    assert_eq!(view.summary.order_quantity_base, 1000.0);
    assert_eq!(view.summary.batch_quantity_base, 0.0);
    assert_eq!(view.summary.remaining_quantity, 1000.0);
    assert!(view.summary.has_mismatch);
}

// ==========================================
// 测试用例 3: 编辑 -> 均分预览 -> 保存 完整链路
// ==========================================

#[test]
fn test_edit_distribute_save_flow() {
    let ctx = setup();
    let units = Arc::new(
        ctx.param_repo.load_unit_table().unwrap(),
    );
    let mutator = BatchMutator::new(units.clone());

    // 调用方内存内新增 2 个批次
    let config = AllocationConfig::default();
    let mut line = OrderLine::new("PN-1001", "硅胶杯垫", 1000.0, "PCS");
    let defaults = config.tracking_defaults(&units);
    mutator.add_batch(&mut line.batches, &defaults);
    mutator.add_batch(&mut line.batches, &defaults);

    // 补齐必填项后先落库一版 (数量暂为均分前)
    let date = NaiveDate::from_ymd_opt(2026, 9, 20).unwrap();
    let ids: Vec<String> = line.batches.iter().map(|b| b.id.clone()).collect();
    for id in &ids {
        mutator.update_batch(&mut line.batches, id, BatchChange::PlannedShipDate(Some(date)));
        mutator.update_batch(&mut line.batches, id, BatchChange::Quantity(500.0));
    }

    // 保存通过 (500+500 = 1000)
    let summary = ctx
        .api
        .save_batches("PN-1001", line.batches.clone(), ValidationMode::Strict)
        .unwrap();
    assert_eq!(summary.remaining_quantity, 0.0);
    assert!(!summary.has_mismatch);

    // 均分预览与已保存数量一致 (1000/2 = 500)
    let preview = ctx.api.distribute_preview("PN-1001").unwrap();
    assert_eq!(preview.batches[0].quantity, 500.0);
    assert_eq!(preview.batches[1].quantity, 500.0);
    assert!(!preview.summary.has_mismatch);

    // 预览不落库: 重新读取仍为已保存状态
    let view = ctx.api.get_order_line("PN-1001").unwrap();
    assert_eq!(view.batches.len(), 2);
    assert_eq!(view.summary.batch_quantity_base, 1000.0);
}

// ==========================================
// 测试用例 4: 数量不平衡阻断保存且不落库
// ==========================================

#[test]
fn test_mismatch_blocks_save_and_keeps_store_untouched() {
    let ctx = setup();
    let units = Arc::new(ctx.param_repo.load_unit_table().unwrap());
    let mutator = BatchMutator::new(units.clone());

    let config = AllocationConfig::default();
    let mut batches = Vec::new();
    let id = mutator
        .add_batch(&mut batches, &config.tracking_defaults(&units))
        .id;
    let date = NaiveDate::from_ymd_opt(2026, 9, 20).unwrap();
    mutator.update_batch(&mut batches, &id, BatchChange::PlannedShipDate(Some(date)));
    mutator.update_batch(&mut batches, &id, BatchChange::Quantity(400.0));

    // 400 vs 1000: 欠配 600, 保存被阻断
    let err = ctx
        .api
        .save_batches("PN-1001", batches, ValidationMode::Strict)
        .unwrap_err();
    assert!(matches!(err, ApiError::CommitValidationError { .. }));

    // 阻断后仓储未变
    let view = ctx.api.get_order_line("PN-1001").unwrap();
    assert!(view.batches.is_empty());
}

// ==========================================
// 测试用例 5: 均分预览对无批次订单行为 no-op
// ==========================================

#[test]
fn test_distribute_preview_without_batches() {
    let ctx = setup();

    let preview = ctx.api.distribute_preview("PN-1001").unwrap();
    assert!(preview.batches.is_empty());
    assert_eq!(preview.summary.remaining_quantity, 1000.0);
}

// ==========================================
// 测试用例 6: 未知货号与非法输入
// ==========================================

#[test]
fn test_unknown_part_no_and_invalid_input() {
    let ctx = setup();

    assert!(matches!(
        ctx.api.get_order_line("PN-9999"),
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        ctx.api.get_order_line("  "),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        ctx.api
            .upsert_order_line(&OrderLine::new("PN-2", "X", -1.0, "PCS")),
        Err(ApiError::InvalidInput(_))
    ));
}

// ==========================================
// 测试用例 7: 配置默认单位落到单位表首位
// ==========================================

#[test]
fn test_allocation_config_roundtrip_and_defaults() {
    let ctx = setup();
    let units = ctx.param_repo.load_unit_table().unwrap();

    // 未保存配置: 加载得到内置默认值, 默认单位为表首 MPCS
    let config = AllocationConfig::load(&ctx.param_repo).unwrap();
    assert_eq!(config.resolve_default_unit(&units), "MPCS");

    // 保存覆写后生效
    let mut config = config;
    config.default_unit_code = Some("PCS".to_string());
    config.order_entry_lead_days = 45;
    config.save(&ctx.param_repo).unwrap();

    let loaded = AllocationConfig::load(&ctx.param_repo).unwrap();
    assert_eq!(loaded.resolve_default_unit(&units), "PCS");
    assert_eq!(loaded.order_entry_lead_days, 45);

    let defaults = loaded.order_entry_defaults(&units);
    assert_eq!(defaults.unit_code, "PCS");
    assert!(defaults.planned_ship_date.is_some());
}

// ==========================================
// 测试用例 8: 订单行列表
// ==========================================

#[test]
fn test_list_order_lines() {
    let ctx = setup();
    ctx.api
        .upsert_order_line(&OrderLine::new("PN-1002", "硅胶餐盘", 5.0, "MPCS"))
        .unwrap();

    let views = ctx.api.list_order_lines().unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].product_part_no, "PN-1001");
    assert_eq!(views[1].summary.order_quantity_base, 5000.0);
}
