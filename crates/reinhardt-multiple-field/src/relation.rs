//! Many-to-many relation through a sorted pivot table
//!
//! Every multiple field stores its selection in a pivot table named
//! `<entry_table>_<field_name>`:
//!
//! | column       | meaning                         |
//! |--------------|---------------------------------|
//! | `entry_id`   | owning entry                    |
//! | `related_id` | selected related record         |
//! | `sort_order` | position of the selection       |
//!
//! Reads are always ordered by `sort_order` ascending so the editor's
//! ordering survives a round trip.

use crate::record::{Record, RecordKey};
use sea_query::{Alias, Asterisk, Expr, ExprTrait, Order, PostgresQueryBuilder, Query};
use serde::{Deserialize, Serialize};

/// Pivot column referencing the owning entry
pub const ENTRY_KEY: &str = "entry_id";
/// Pivot column referencing the related record
pub const RELATED_KEY: &str = "related_id";
/// Pivot column holding the selection position
pub const SORT_COLUMN: &str = "sort_order";

/// One row of a pivot table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotRow {
	pub entry_id: RecordKey,
	pub related_id: RecordKey,
	pub sort_order: i64,
}

/// Definition of the entry → related many-to-many association.
///
/// # Examples
///
/// ```
/// use reinhardt_multiple_field::relation::BelongsToMany;
///
/// let relation = BelongsToMany::new("blog_posts", "tags", "blog_tags", "id");
/// assert_eq!(relation.pivot_table(), "blog_posts_tags");
/// assert_eq!(relation.order_column(), "blog_posts_tags.sort_order");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BelongsToMany {
	related_table: String,
	related_key: String,
	pivot_table: String,
}

impl BelongsToMany {
	/// Build the relation for `field` on entries stored in `entry_table`
	pub fn new(
		entry_table: &str,
		field: &str,
		related_table: impl Into<String>,
		related_key: impl Into<String>,
	) -> Self {
		Self {
			related_table: related_table.into(),
			related_key: related_key.into(),
			pivot_table: Self::pivot_table_name(entry_table, field),
		}
	}

	/// Pivot table name for a field of an entry table
	pub fn pivot_table_name(entry_table: &str, field: &str) -> String {
		format!("{}_{}", entry_table, field)
	}

	pub fn pivot_table(&self) -> &str {
		&self.pivot_table
	}

	pub fn related_table(&self) -> &str {
		&self.related_table
	}

	pub fn related_key(&self) -> &str {
		&self.related_key
	}

	pub fn foreign_pivot_key(&self) -> &str {
		ENTRY_KEY
	}

	pub fn related_pivot_key(&self) -> &str {
		RELATED_KEY
	}

	/// Fully qualified ordering column
	pub fn order_column(&self) -> String {
		format!("{}.{}", self.pivot_table, SORT_COLUMN)
	}

	/// SQL selecting the related records of one entry in pivot order
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_multiple_field::RecordKey;
	/// use reinhardt_multiple_field::relation::BelongsToMany;
	///
	/// let relation = BelongsToMany::new("posts", "tags", "tags", "id");
	/// let sql = relation.select_statement(&RecordKey::Int(7));
	///
	/// assert!(sql.contains(r#""posts_tags"."entry_id" = 7"#));
	/// assert!(sql.ends_with(r#"ORDER BY "posts_tags"."sort_order" ASC"#));
	/// ```
	pub fn select_statement(&self, entry_id: &RecordKey) -> String {
		let mut query = Query::select();
		query
			.column((ident(&self.related_table), Asterisk))
			.from(ident(&self.related_table))
			.inner_join(
				ident(&self.pivot_table),
				Expr::col((ident(&self.related_table), ident(&self.related_key)))
					.equals((ident(&self.pivot_table), ident(RELATED_KEY))),
			)
			.and_where(Expr::col((ident(&self.pivot_table), ident(ENTRY_KEY))).eq(key_expr(entry_id)))
			.order_by((ident(&self.pivot_table), ident(SORT_COLUMN)), Order::Asc);

		query.to_string(PostgresQueryBuilder)
	}

	/// Pivot rows for a selection, `sort_order` following the given order
	pub fn pivot_rows(&self, entry_id: &RecordKey, related: &[RecordKey]) -> Vec<PivotRow> {
		related
			.iter()
			.enumerate()
			.map(|(position, related_id)| PivotRow {
				entry_id: entry_id.clone(),
				related_id: related_id.clone(),
				sort_order: position as i64,
			})
			.collect()
	}

	/// SQL replacing the stored selection of one entry.
	///
	/// The first statement clears the entry's pivot rows; the second, present
	/// only for a non-empty selection, inserts the new rows in order.
	pub fn sync_statements(&self, entry_id: &RecordKey, related: &[RecordKey]) -> Vec<String> {
		let delete = Query::delete()
			.from_table(ident(&self.pivot_table))
			.and_where(Expr::col(ident(ENTRY_KEY)).eq(key_expr(entry_id)))
			.to_owned();

		let mut statements = vec![delete.to_string(PostgresQueryBuilder)];

		let rows = self.pivot_rows(entry_id, related);
		if rows.is_empty() {
			return statements;
		}

		let mut insert = Query::insert();
		insert
			.into_table(ident(&self.pivot_table))
			.columns([ident(ENTRY_KEY), ident(RELATED_KEY), ident(SORT_COLUMN)]);
		for row in &rows {
			insert.values_panic([
				key_expr(&row.entry_id),
				key_expr(&row.related_id),
				Expr::val(row.sort_order),
			]);
		}
		statements.push(insert.to_string(PostgresQueryBuilder));

		statements
	}

	/// Order records the way the pivot table says.
	///
	/// Only rows belonging to `entry_id` are considered. Pivot rows pointing
	/// at records that are not in `records` are skipped.
	pub fn order_records(
		&self,
		entry_id: &RecordKey,
		pivot: &[PivotRow],
		records: &[Record],
	) -> Vec<Record> {
		let mut rows: Vec<&PivotRow> = pivot
			.iter()
			.filter(|row| same_key(&row.entry_id, entry_id))
			.collect();
		rows.sort_by_key(|row| row.sort_order);

		rows.into_iter()
			.filter_map(|row| {
				records
					.iter()
					.find(|record| {
						record
							.get(&self.related_key)
							.and_then(RecordKey::from_value)
							.is_some_and(|key| same_key(&key, &row.related_id))
					})
					.cloned()
			})
			.collect()
	}
}

fn ident(name: &str) -> Alias {
	Alias::new(name.to_string())
}

fn key_expr(key: &RecordKey) -> Expr {
	match key {
		RecordKey::Int(i) => Expr::val(*i),
		RecordKey::Str(s) => Expr::val(s.clone()),
	}
}

// Keys posted back as text must still match integer primary keys.
fn same_key(a: &RecordKey, b: &RecordKey) -> bool {
	a == b || a.to_string() == b.to_string()
}
