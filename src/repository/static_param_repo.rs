// ==========================================
// 贸易公司后台管理系统 - 静态参数仓储
// ==========================================
// 职责: 管理 static_param 表 (按 category + param_key 的通用键值存储)
// 说明: 单位主数据存放于 category="product_unit", 值为 UnitDefinition 的 JSON
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::unit::{UnitDefinition, UnitTable};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// 单位主数据所在的参数分类
pub const PRODUCT_UNIT_CATEGORY: &str = "product_unit";

/// 分配策略配置所在的参数分类
pub const ALLOCATION_CONFIG_CATEGORY: &str = "allocation_config";

pub struct StaticParamRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StaticParamRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS static_param (
              category TEXT NOT NULL,
              param_key TEXT NOT NULL,
              param_value TEXT NOT NULL,
              sort_no INTEGER NOT NULL DEFAULT 0,
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              updated_at TEXT NOT NULL DEFAULT (datetime('now')),
              PRIMARY KEY (category, param_key)
            );

            CREATE INDEX IF NOT EXISTS idx_static_param_category
              ON static_param(category, sort_no);
            "#,
        )?;
        Ok(())
    }

    /// 创建或更新参数（Upsert 操作）
    pub fn upsert(
        &self,
        category: &str,
        param_key: &str,
        param_value: &str,
        sort_no: i32,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO static_param (category, param_key, param_value, sort_no, updated_at)
            VALUES (?1, ?2, ?3, ?4, datetime('now'))
            ON CONFLICT(category, param_key) DO UPDATE SET
                param_value = excluded.param_value,
                sort_no = excluded.sort_no,
                updated_at = excluded.updated_at
            "#,
            params![category, param_key, param_value, sort_no],
        )?;
        Ok(())
    }

    /// 按分类+键查找参数值
    pub fn find_value(&self, category: &str, param_key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT param_value FROM static_param WHERE category = ?1 AND param_key = ?2",
                params![category, param_key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 按分类列出参数值（按 sort_no 排序）
    pub fn list_values(&self, category: &str) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT param_value
            FROM static_param
            WHERE category = ?1
            ORDER BY sort_no ASC, param_key ASC
            "#,
        )?;

        let rows = stmt.query_map(params![category], |row| row.get::<_, String>(0))?;
        let mut values = Vec::new();
        for row in rows {
            values.push(row?);
        }
        Ok(values)
    }

    /// 删除参数
    pub fn delete(&self, category: &str, param_key: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM static_param WHERE category = ?1 AND param_key = ?2",
            params![category, param_key],
        )?;
        Ok(affected > 0)
    }

    // ==========================================
    // 单位主数据
    // ==========================================

    /// 写入一条单位定义 (category="product_unit", key=单位代码)
    pub fn upsert_unit(&self, unit: &UnitDefinition, sort_no: i32) -> RepositoryResult<()> {
        if unit.multiplier <= 0.0 {
            return Err(RepositoryError::FieldValueError {
                field: "multiplier".to_string(),
                message: format!("单位倍数必须大于0 (code={})", unit.code),
            });
        }
        let payload = serde_json::to_string(unit)?;
        self.upsert(PRODUCT_UNIT_CATEGORY, &unit.code, &payload, sort_no)
    }

    /// 加载单位换算表 (按 sort_no 排序, 首个条目即默认单位)
    pub fn load_unit_table(&self) -> RepositoryResult<UnitTable> {
        let mut units = Vec::new();
        for value in self.list_values(PRODUCT_UNIT_CATEGORY)? {
            let unit: UnitDefinition = serde_json::from_str(&value)?;
            units.push(unit);
        }
        Ok(UnitTable::new(units))
    }
}
