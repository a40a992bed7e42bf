//! Column-pruning resolver.
//!
//! Walks a DataFusion logical plan and collects every base-table column the
//! query references anywhere: projected outputs, join keys and join filters,
//! pre- and post-aggregation filters, grouping keys and ordering keys. The
//! union grouped by table is the required column set handed to each origin.
//!
//! Exhaustiveness is a correctness invariant, not an optimization: a column
//! missed here is a column the origin never fetches, and the query fails
//! downstream with a missing-column error.

use std::collections::{HashMap, HashSet};

use datafusion::logical_expr::{Expr, LogicalPlan};
use lakefeed_core::Predicate;

/// Collect the columns a plan references, grouped by base table name.
///
/// Expects an optimized plan: projection pushdown has already narrowed each
/// `TableScan` to the columns the query actually uses and rewritten alias
/// qualifiers, so scan projections carry the authoritative per-table set and
/// the expression walk adds any qualified reference above the scans.
/// Unqualified references (aliases of derived expressions, aggregate
/// outputs) resolve to no base table and are ignored; truly unknown columns
/// never get this far because planning already rejects them.
pub fn required_columns(plan: &LogicalPlan) -> HashMap<String, HashSet<String>> {
    let mut out = HashMap::new();
    visit(plan, &mut out);
    out
}

fn visit(plan: &LogicalPlan, out: &mut HashMap<String, HashSet<String>>) {
    for expr in plan.expressions() {
        collect_refs(&expr, out);
    }

    // A scan's projection is a column requirement even when no expression
    // above it repeats the names (e.g. SELECT *).
    if let LogicalPlan::TableScan(scan) = plan {
        let table = scan.table_name.table().to_string();
        let columns = out.entry(table).or_default();
        for field in scan.projected_schema.fields() {
            columns.insert(field.name().clone());
        }
    }

    for input in plan.inputs() {
        visit(input, out);
    }
}

fn collect_refs(expr: &Expr, out: &mut HashMap<String, HashSet<String>>) {
    for column in expr.column_refs() {
        if let Some(relation) = &column.relation {
            out.entry(relation.table().to_string())
                .or_default()
                .insert(column.name.clone());
        }
    }
}

/// Recover per-table row-filter hints from a plan's filter nodes.
///
/// Only filters whose column references all belong to a single table are
/// pushed down; anything spanning tables stays with the engine. The hints
/// affect partition selection efficiency, never filtering correctness.
pub fn table_predicates(plan: &LogicalPlan) -> HashMap<String, Predicate> {
    let mut out = HashMap::new();
    visit_filters(plan, &mut out);
    out
}

fn visit_filters(plan: &LogicalPlan, out: &mut HashMap<String, Predicate>) {
    if let LogicalPlan::Filter(filter) = plan {
        let tables: HashSet<&str> = filter
            .predicate
            .column_refs()
            .iter()
            .filter_map(|c| c.relation.as_ref().map(|r| r.table()))
            .collect();
        if tables.len() == 1 {
            let table = tables.into_iter().next().unwrap_or_default().to_string();
            out.entry(table)
                .or_insert_with(|| Predicate::new(filter.predicate.to_string()));
        }
    }

    for input in plan.inputs() {
        visit_filters(input, out);
    }
}
