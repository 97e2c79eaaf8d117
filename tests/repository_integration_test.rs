// ==========================================
// 仓储层集成测试 (SQLite)
// ==========================================
// 测试目标: 验证静态参数仓储与订单行仓储的读写行为
// 覆盖范围: 单位主数据加载顺序、批次整组替换事务、级联删除
// ==========================================

use chrono::NaiveDate;
use tempfile::TempDir;
use trade_shipment_batch::domain::batch::{BatchDefaults, ShipmentBatch};
use trade_shipment_batch::domain::order::OrderLine;
use trade_shipment_batch::domain::types::BatchStatus;
use trade_shipment_batch::domain::unit::UnitDefinition;
use trade_shipment_batch::repository::error::RepositoryError;
use trade_shipment_batch::repository::{OrderLineRepository, StaticParamRepository};

// ==========================================
// 测试辅助函数
// ==========================================

/// 创建测试用的临时数据库路径
fn create_test_db() -> (TempDir, String) {
    let dir = TempDir::new().expect("创建临时目录失败");
    let path = dir.path().join("test.db").to_string_lossy().to_string();
    (dir, path)
}

fn unit(code: &str, name: &str, multiplier: f64) -> UnitDefinition {
    UnitDefinition {
        code: code.to_string(),
        display_name: name.to_string(),
        multiplier,
    }
}

fn create_test_batch(batch_no: i32, quantity: f64) -> ShipmentBatch {
    let defaults = BatchDefaults::shipment_tracking("PCS", 1.0);
    let mut batch = ShipmentBatch::new(batch_no, &defaults);
    batch.quantity = quantity;
    batch.planned_ship_date = NaiveDate::from_ymd_opt(2026, 9, 20);
    batch
}

// ==========================================
// 测试用例 1: 单位主数据写入与按序加载
// ==========================================

#[test]
fn test_unit_table_roundtrip_ordered_by_sort_no() {
    let (_dir, db_path) = create_test_db();
    let repo = StaticParamRepository::new(&db_path).unwrap();

    // 乱序写入, sort_no 决定默认单位 (首位)
    repo.upsert_unit(&unit("PCS", "个", 1.0), 2).unwrap();
    repo.upsert_unit(&unit("MPCS", "千个", 1000.0), 1).unwrap();

    let table = repo.load_unit_table().unwrap();
    assert_eq!(table.all().len(), 2);
    assert_eq!(table.default_unit().unwrap().code, "MPCS");
    assert_eq!(table.multiplier_of("MPCS"), 1000.0);
    assert_eq!(table.name_of("PCS"), "个");
}

// ==========================================
// 测试用例 2: 非法单位倍数被拒绝
// ==========================================

#[test]
fn test_upsert_unit_rejects_non_positive_multiplier() {
    let (_dir, db_path) = create_test_db();
    let repo = StaticParamRepository::new(&db_path).unwrap();

    let result = repo.upsert_unit(&unit("BAD", "坏单位", 0.0), 0);
    assert!(matches!(
        result,
        Err(RepositoryError::FieldValueError { .. })
    ));
}

// ==========================================
// 测试用例 3: 通用参数的增删改查
// ==========================================

#[test]
fn test_static_param_crud() {
    let (_dir, db_path) = create_test_db();
    let repo = StaticParamRepository::new(&db_path).unwrap();

    assert!(repo.find_value("misc", "k1").unwrap().is_none());

    repo.upsert("misc", "k1", "v1", 0).unwrap();
    repo.upsert("misc", "k1", "v2", 0).unwrap();
    assert_eq!(repo.find_value("misc", "k1").unwrap().as_deref(), Some("v2"));

    assert!(repo.delete("misc", "k1").unwrap());
    assert!(!repo.delete("misc", "k1").unwrap());
}

// ==========================================
// 测试用例 4: 订单行头 upsert 与查询
// ==========================================

#[test]
fn test_order_line_upsert_and_find() {
    let (_dir, db_path) = create_test_db();
    let repo = OrderLineRepository::new(&db_path).unwrap();

    let line = OrderLine::new("PN-1001", "硅胶杯垫", 1000.0, "PCS");
    repo.upsert_line(&line).unwrap();

    let loaded = repo.find_by_part_no("PN-1001").unwrap().unwrap();
    assert_eq!(loaded.product_name, "硅胶杯垫");
    assert_eq!(loaded.quantity, 1000.0);
    assert!(loaded.batches.is_empty());

    // upsert 更新数量
    let mut line = line;
    line.quantity = 2000.0;
    repo.upsert_line(&line).unwrap();
    let loaded = repo.find_by_part_no("PN-1001").unwrap().unwrap();
    assert_eq!(loaded.quantity, 2000.0);

    assert!(repo.find_by_part_no("PN-9999").unwrap().is_none());
}

// ==========================================
// 测试用例 5: 批次整组替换与按序读回
// ==========================================

#[test]
fn test_replace_batches_roundtrip() {
    let (_dir, db_path) = create_test_db();
    let repo = OrderLineRepository::new(&db_path).unwrap();

    let line = OrderLine::new("PN-1001", "硅胶杯垫", 1000.0, "PCS");
    repo.upsert_line(&line).unwrap();

    let mut batch2 = create_test_batch(2, 400.0);
    batch2.status = BatchStatus::Shipped;
    batch2.notes = Some("海运".to_string());
    let batches = vec![create_test_batch(1, 600.0), batch2];

    repo.replace_batches("PN-1001", &batches).unwrap();

    let loaded = repo.find_by_part_no("PN-1001").unwrap().unwrap();
    assert_eq!(loaded.batches.len(), 2);
    assert_eq!(loaded.batches[0].batch_no, 1);
    assert_eq!(loaded.batches[0].quantity, 600.0);
    assert_eq!(loaded.batches[1].status, BatchStatus::Shipped);
    assert_eq!(loaded.batches[1].notes.as_deref(), Some("海运"));
    assert_eq!(
        loaded.batches[1].planned_ship_date,
        NaiveDate::from_ymd_opt(2026, 9, 20)
    );

    // 再次替换为单批次: 旧批次整组清除
    repo.replace_batches("PN-1001", &[create_test_batch(1, 1000.0)])
        .unwrap();
    let loaded = repo.find_by_part_no("PN-1001").unwrap().unwrap();
    assert_eq!(loaded.batches.len(), 1);
}

// ==========================================
// 测试用例 6: 不存在的订单行不可替换批次
// ==========================================

#[test]
fn test_replace_batches_unknown_line_is_not_found() {
    let (_dir, db_path) = create_test_db();
    let repo = OrderLineRepository::new(&db_path).unwrap();

    let result = repo.replace_batches("PN-9999", &[create_test_batch(1, 1.0)]);
    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
}

// ==========================================
// 测试用例 7: 删除订单行级联删除批次
// ==========================================

#[test]
fn test_delete_line_cascades_batches() {
    let (_dir, db_path) = create_test_db();
    let repo = OrderLineRepository::new(&db_path).unwrap();

    repo.upsert_line(&OrderLine::new("PN-1001", "硅胶杯垫", 1000.0, "PCS"))
        .unwrap();
    repo.replace_batches("PN-1001", &[create_test_batch(1, 1000.0)])
        .unwrap();

    assert!(repo.delete_line("PN-1001").unwrap());
    assert!(repo.find_by_part_no("PN-1001").unwrap().is_none());
    assert!(!repo.delete_line("PN-1001").unwrap());
}

// ==========================================
// 测试用例 8: 货号列表
// ==========================================

#[test]
fn test_list_part_nos_sorted() {
    let (_dir, db_path) = create_test_db();
    let repo = OrderLineRepository::new(&db_path).unwrap();

    repo.upsert_line(&OrderLine::new("PN-2", "B", 1.0, "PCS")).unwrap();
    repo.upsert_line(&OrderLine::new("PN-1", "A", 1.0, "PCS")).unwrap();

    assert_eq!(repo.list_part_nos().unwrap(), vec!["PN-1", "PN-2"]);
}
