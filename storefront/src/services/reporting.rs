//! Reporting Service
//!
//! Per-plant sales rows derived by joining order items (optionally
//! date-filtered through their orders) to the catalog, plus a CSV export.
//! Read-only: this module consumes the core's query surface and never
//! mutates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared::{AppResult, SessionUser};

use super::ensure_admin;
use crate::core::Store;
use crate::db::repository::{OrderRepository, PlantRepository};

/// One row of the sales report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReportRow {
    /// Plant id in `"plants:key"` form
    pub plant_id: String,
    pub name: String,
    /// Units ever stocked (`original_quantity`, reconstructed for legacy rows)
    pub stocked_qty: i64,
    /// Units currently available
    pub current_stock: i64,
    /// Units sold in the reported range
    pub sold_qty: i64,
    /// Current base price; 0 when the plant was deleted
    pub price: i64,
    pub discount: i32,
    /// Revenue in the range, at the order lines' snapshot prices
    pub revenue: i64,
}

#[derive(Clone)]
pub struct ReportingService {
    store: Store,
}

impl ReportingService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Per-plant sales, optionally restricted to orders dated in
    /// `[from, to]` (epoch ms, inclusive). Admin only.
    pub async fn sales_report(
        &self,
        actor: &SessionUser,
        range: Option<(i64, i64)>,
    ) -> AppResult<Vec<SalesReportRow>> {
        ensure_admin(actor)?;

        let orders_repo = OrderRepository::new(self.store.db.clone());
        let plants_repo = PlantRepository::new(self.store.db.clone());

        let orders = match range {
            Some((from, to)) => orders_repo.find_in_range(from, to).await?,
            None => orders_repo.find_all().await?,
        };
        let order_ids = orders.iter().filter_map(|o| o.id.clone()).collect();
        let items = orders_repo.items_for_orders(order_ids).await?;

        // Aggregate sold units and revenue per plant, keyed for stable output
        let mut sold: BTreeMap<String, (String, i64, i64)> = BTreeMap::new();
        for item in &items {
            let entry = sold
                .entry(item.plant.to_string())
                .or_insert_with(|| (item.name.clone(), 0, 0));
            entry.1 += item.qty;
            entry.2 += item.line_total();
        }

        let mut rows = Vec::with_capacity(sold.len());
        for (plant_id, (snapshot_name, sold_qty, revenue)) in sold {
            let plant = plants_repo.find_by_id(&plant_id).await?;
            let row = match plant {
                Some(p) => SalesReportRow {
                    plant_id,
                    name: p.name.clone(),
                    stocked_qty: p.stocked_quantity(),
                    current_stock: p.quantity,
                    sold_qty,
                    price: p.price,
                    discount: p.discount,
                    revenue,
                },
                // Deleted plant: the line snapshots are all that is left
                None => SalesReportRow {
                    plant_id,
                    name: snapshot_name,
                    stocked_qty: 0,
                    current_stock: 0,
                    sold_qty,
                    price: 0,
                    discount: 0,
                    revenue,
                },
            };
            rows.push(row);
        }
        Ok(rows)
    }

    /// Render report rows as CSV text
    pub fn to_csv(rows: &[SalesReportRow]) -> String {
        let mut out =
            String::from("plant_id,name,stocked_qty,current_stock,sold_qty,price,discount,revenue\n");
        for row in rows {
            out.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                row.plant_id,
                csv_field(&row.name),
                row.stocked_qty,
                row.current_stock,
                row.sold_qty,
                row.price,
                row.discount,
                row.revenue
            ));
        }
        out
    }
}

/// Quote a field when it contains CSV metacharacters
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
