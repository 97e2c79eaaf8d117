// ==========================================
// 贸易公司后台管理系统 - 订单行仓储
// ==========================================
// 职责: 管理 order_line / shipment_batch 表
// 说明: "更新订单行批次"以产品货号定位, 在单事务内整组替换,
//       保证外部持久化的原子性 (引擎层只做内存计算与校验)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::batch::ShipmentBatch;
use crate::domain::order::OrderLine;
use crate::domain::types::BatchStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

pub struct OrderLineRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderLineRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_tables()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_tables()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_tables(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS order_line (
              product_part_no TEXT PRIMARY KEY,
              product_name TEXT NOT NULL,
              quantity REAL NOT NULL,
              unit_code TEXT NOT NULL,
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS shipment_batch (
              id TEXT PRIMARY KEY,
              product_part_no TEXT NOT NULL,
              batch_no INTEGER NOT NULL,
              quantity REAL NOT NULL,
              unit_code TEXT NOT NULL,
              unit_multiplier REAL NOT NULL,
              planned_ship_date TEXT,
              actual_ship_date TEXT,
              estimated_arrival_date TEXT,
              status TEXT NOT NULL,
              notes TEXT,
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL,
              FOREIGN KEY (product_part_no) REFERENCES order_line(product_part_no) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_shipment_batch_part_no
              ON shipment_batch(product_part_no, batch_no);
            "#,
        )?;
        Ok(())
    }

    /// 创建或更新订单行头 (Upsert 操作, 不触碰批次)
    pub fn upsert_line(&self, line: &OrderLine) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO order_line (product_part_no, product_name, quantity, unit_code, updated_at)
            VALUES (?1, ?2, ?3, ?4, datetime('now'))
            ON CONFLICT(product_part_no) DO UPDATE SET
                product_name = excluded.product_name,
                quantity = excluded.quantity,
                unit_code = excluded.unit_code,
                updated_at = excluded.updated_at
            "#,
            params![
                line.product_part_no,
                line.product_name,
                line.quantity,
                line.unit_code,
            ],
        )?;
        Ok(())
    }

    /// 按产品货号查找订单行（含批次, 按 batch_no 升序）
    pub fn find_by_part_no(&self, part_no: &str) -> RepositoryResult<Option<OrderLine>> {
        let conn = self.get_conn()?;

        let header = conn
            .query_row(
                r#"
                SELECT product_part_no, product_name, quantity, unit_code
                FROM order_line
                WHERE product_part_no = ?1
                "#,
                params![part_no],
                |row| {
                    Ok(OrderLine {
                        product_part_no: row.get(0)?,
                        product_name: row.get(1)?,
                        quantity: row.get(2)?,
                        unit_code: row.get(3)?,
                        batches: Vec::new(),
                    })
                },
            )
            .optional()?;

        let Some(mut line) = header else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            r#"
            SELECT id, batch_no, quantity, unit_code, unit_multiplier,
                   planned_ship_date, actual_ship_date, estimated_arrival_date,
                   status, notes, created_at, updated_at
            FROM shipment_batch
            WHERE product_part_no = ?1
            ORDER BY batch_no ASC, created_at ASC
            "#,
        )?;

        let rows = stmt.query_map(params![part_no], Self::map_batch_row)?;
        for row in rows {
            line.batches.push(row?);
        }

        Ok(Some(line))
    }

    /// 列出全部产品货号
    pub fn list_part_nos(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT product_part_no FROM order_line ORDER BY product_part_no ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut part_nos = Vec::new();
        for row in rows {
            part_nos.push(row?);
        }
        Ok(part_nos)
    }

    /// 整组替换订单行批次（"更新订单行批次"操作, 单事务）
    ///
    /// 订单行不存在时返回 NotFound, 不做隐式建行。
    pub fn replace_batches(
        &self,
        part_no: &str,
        batches: &[ShipmentBatch],
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;

        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM order_line WHERE product_part_no = ?1 LIMIT 1",
                params![part_no],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        if !exists {
            return Err(RepositoryError::NotFound {
                entity: "OrderLine".to_string(),
                id: part_no.to_string(),
            });
        }

        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            "DELETE FROM shipment_batch WHERE product_part_no = ?1",
            params![part_no],
        )?;

        for batch in batches {
            tx.execute(
                r#"
                INSERT INTO shipment_batch (
                    id, product_part_no, batch_no, quantity, unit_code, unit_multiplier,
                    planned_ship_date, actual_ship_date, estimated_arrival_date,
                    status, notes, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
                params![
                    batch.id,
                    part_no,
                    batch.batch_no,
                    batch.quantity,
                    batch.unit_code,
                    batch.unit_multiplier,
                    batch.planned_ship_date,
                    batch.actual_ship_date,
                    batch.estimated_arrival_date,
                    batch.status.to_db_str(),
                    batch.notes,
                    batch.created_at,
                    batch.updated_at,
                ],
            )?;
        }

        tx.execute(
            "UPDATE order_line SET updated_at = datetime('now') WHERE product_part_no = ?1",
            params![part_no],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    /// 删除订单行（批次随外键级联删除）
    pub fn delete_line(&self, part_no: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM order_line WHERE product_part_no = ?1",
            params![part_no],
        )?;
        Ok(affected > 0)
    }

    // ==========================================
    // 行映射
    // ==========================================

    fn map_batch_row(row: &Row<'_>) -> rusqlite::Result<ShipmentBatch> {
        let status: String = row.get(8)?;
        Ok(ShipmentBatch {
            id: row.get(0)?,
            batch_no: row.get(1)?,
            quantity: row.get(2)?,
            unit_code: row.get(3)?,
            unit_multiplier: row.get(4)?,
            planned_ship_date: row.get(5)?,
            actual_ship_date: row.get(6)?,
            estimated_arrival_date: row.get(7)?,
            status: BatchStatus::from_str(&status),
            notes: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }
}
