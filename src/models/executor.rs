//! Executes merged options against a [`MemoryModel`]'s rows.
//!
//! Stages run in SQL evaluation order: source table, joins, conditions,
//! grouping, having, ordering, offset/limit, eager loading, projection, then
//! the readonly/lock flags.

use super::association::{Association, AssociationKind};
use super::memory::{row_id, MemoryModel};
use super::record::Record;
use crate::constants::{params, switches};
use crate::error::{Result, ScopeError};
use crate::scopes::QueryOptions;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashSet;

type Row = Map<String, Value>;

pub(crate) fn execute(model: &MemoryModel, options: &QueryOptions) -> Result<Vec<Record>> {
    let db = model.database();

    let source = match options.present(params::FROM) {
        None => model.table_name().to_string(),
        Some(Value::String(table)) => table.clone(),
        Some(other) => {
            return Err(ScopeError::invalid_option(
                params::FROM,
                format!("expected a table name, got {other}"),
            ))
        }
    };
    let mut rows = db.rows(&source)?;

    for name in options.string_list(params::JOINS)?.unwrap_or_default() {
        let association = lookup(model, params::JOINS, &name)?;
        let targets = db.rows(&association.table)?;
        rows.retain(|row| !associated(association, row, &targets).is_empty());
    }

    if let Some(conditions) = options.present(params::CONDITIONS) {
        rows = retain_matching(rows, conditions, params::CONDITIONS)?;
    }

    let group = options
        .string_list(params::GROUP)?
        .map(|entries| split_columns(&entries))
        .unwrap_or_default();
    if !group.is_empty() {
        let mut seen = HashSet::new();
        rows.retain(|row| {
            let key: Vec<Value> = group
                .iter()
                .map(|column| lookup_column(row, column).cloned().unwrap_or(Value::Null))
                .collect();
            seen.insert(Value::Array(key).to_string())
        });
    }

    if let Some(having) = options.present(params::HAVING) {
        if group.is_empty() {
            return Err(ScopeError::invalid_option(
                params::HAVING,
                "having requires a group",
            ));
        }
        rows = retain_matching(rows, having, params::HAVING)?;
    }

    if let Some(entries) = options.string_list(params::ORDER)? {
        let terms = order_terms(&entries)?;
        rows.sort_by(|a, b| {
            terms
                .iter()
                .map(|(column, descending)| {
                    let ordering = compare(lookup_column(a, column), lookup_column(b, column));
                    if *descending {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                })
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
    }

    let offset = options.non_negative(params::OFFSET)?.unwrap_or(0);
    let limit = options.non_negative(params::LIMIT)?;
    let rows: Vec<Row> = rows
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(limit.map_or(usize::MAX, |limit| {
            usize::try_from(limit).unwrap_or(usize::MAX)
        }))
        .collect();

    let includes: Vec<&Association> = options
        .string_list(params::INCLUDE)?
        .unwrap_or_default()
        .iter()
        .map(|name| lookup(model, params::INCLUDE, name))
        .collect::<Result<_>>()?;
    let included_rows = includes
        .iter()
        .map(|association| db.rows(&association.table))
        .collect::<Result<Vec<_>>>()?;

    let projection = options
        .string_list(params::SELECT)?
        .map(|entries| split_columns(&entries))
        .filter(|columns| !columns.iter().any(|column| column == "*"));

    let readonly = flag(options, switches::READONLY)?;
    let locked = flag(options, switches::LOCK)?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let mut record = to_record(&source, &row)?;

        for (association, targets) in includes.iter().zip(&included_rows) {
            let loaded = associated(association, &row, targets)
                .into_iter()
                .map(|target| to_record(&association.table, target))
                .collect::<Result<Vec<_>>>()?;
            record.load_association(&association.name, loaded);
        }

        if let Some(columns) = &projection {
            record.project(columns);
        }
        if let Some(readonly) = readonly {
            record.mark_readonly(readonly);
        }
        if let Some(locked) = locked {
            record.mark_locked(locked);
        }
        records.push(record);
    }

    Ok(records)
}

fn lookup<'m>(model: &'m MemoryModel, key: &str, name: &str) -> Result<&'m Association> {
    model
        .association(name)
        .ok_or_else(|| ScopeError::invalid_option(key, format!("unknown association '{name}'")))
}

fn to_record(table: &str, row: &Row) -> Result<Record> {
    let id = row_id(row).ok_or_else(|| {
        ScopeError::invalid_option("id", format!("row in {table} has no integer id"))
    })?;
    Ok(Record::new(table, id, row.clone()))
}

fn associated<'t>(association: &Association, owner: &Row, targets: &'t [Row]) -> Vec<&'t Row> {
    match association.kind {
        AssociationKind::BelongsTo => {
            let Some(foreign) = owner.get(&association.foreign_key).filter(|v| !v.is_null()) else {
                return Vec::new();
            };
            targets
                .iter()
                .filter(|target| target.get("id") == Some(foreign))
                .collect()
        }
        AssociationKind::HasMany => {
            let Some(id) = owner.get("id") else {
                return Vec::new();
            };
            targets
                .iter()
                .filter(|target| target.get(&association.foreign_key) == Some(id))
                .collect()
        }
    }
}

fn retain_matching(rows: Vec<Row>, filter: &Value, key: &str) -> Result<Vec<Row>> {
    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        if matches_filter(&row, filter, key)? {
            kept.push(row);
        }
    }
    Ok(kept)
}

/// Column mappings match on equality (sequence = membership, null = missing);
/// a sequence of filters matches when all of them do
fn matches_filter(row: &Row, filter: &Value, key: &str) -> Result<bool> {
    match filter {
        Value::Object(columns) => Ok(columns.iter().all(|(column, expected)| {
            let actual = lookup_column(row, column);
            match expected {
                Value::Array(candidates) => actual.is_some_and(|value| candidates.contains(value)),
                Value::Null => actual.map_or(true, Value::is_null),
                expected => actual == Some(expected),
            }
        })),
        Value::Array(filters) => {
            for filter in filters {
                if !matches_filter(row, filter, key)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        other => Err(ScopeError::invalid_option(
            key,
            format!("in-memory filters must be column mappings, got {other}"),
        )),
    }
}

/// Accepts table-qualified names such as `posts.published`
fn lookup_column<'r>(row: &'r Row, column: &str) -> Option<&'r Value> {
    row.get(column)
        .or_else(|| column.rsplit_once('.').and_then(|(_, bare)| row.get(bare)))
}

fn split_columns(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| entry.split(','))
        .map(str::trim)
        .filter(|column| !column.is_empty())
        .map(str::to_string)
        .collect()
}

fn order_terms(entries: &[String]) -> Result<Vec<(String, bool)>> {
    let mut terms = Vec::new();
    for term in split_columns(entries) {
        let mut words = term.split_whitespace();
        let Some(column) = words.next() else {
            continue;
        };
        let descending = match words.next().map(str::to_ascii_uppercase).as_deref() {
            None | Some("ASC") => false,
            Some("DESC") => true,
            Some(other) => {
                return Err(ScopeError::invalid_option(
                    params::ORDER,
                    format!("unknown direction '{other}' in '{term}'"),
                ))
            }
        };
        if words.next().is_some() {
            return Err(ScopeError::invalid_option(
                params::ORDER,
                format!("cannot order by expression '{term}'"),
            ));
        }
        terms.push((column.to_string(), descending));
    }
    Ok(terms)
}

fn rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Nulls sort first, then booleans, numbers, strings
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn flag(options: &QueryOptions, key: &str) -> Result<Option<bool>> {
    match options.get(key) {
        None => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        // Lock clauses such as "FOR SHARE" only mean something to SQL hosts
        Some(Value::String(_)) if key == switches::LOCK => Ok(Some(true)),
        Some(other) => Err(ScopeError::invalid_option(
            key,
            format!("expected a boolean, got {other}"),
        )),
    }
}
