//! Labeled probability tables
//!
//! The workhorse representation behind joint and conditional
//! distributions: named variables and one probability per combination of
//! states, kept sorted for deterministic iteration. Every transform
//! returns a new table; nothing mutates in place.

use crate::{DiscreteError, Filter, State};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A labeled probability table over one or more categorical variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbTable {
    variables: Vec<String>,
    rows: Vec<(Vec<State>, f64)>,
}

impl ProbTable {
    /// Build a table, merging duplicate keys by summing and sorting rows.
    pub fn new(
        variables: Vec<String>,
        rows: Vec<(Vec<State>, f64)>,
    ) -> Result<Self, DiscreteError> {
        if variables.is_empty() {
            return Err(DiscreteError::invalid_argument(
                "a table needs at least one variable",
            ));
        }
        for (i, name) in variables.iter().enumerate() {
            if variables[..i].contains(name) {
                return Err(DiscreteError::invalid_argument(format!(
                    "duplicate variable name '{}'",
                    name
                )));
            }
        }
        let mut merged: BTreeMap<Vec<State>, f64> = BTreeMap::new();
        for (key, value) in rows {
            if key.len() != variables.len() {
                return Err(DiscreteError::invalid_argument(format!(
                    "key {:?} has {} states for {} variables",
                    key.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
                    key.len(),
                    variables.len()
                )));
            }
            *merged.entry(key).or_insert(0.0) += value;
        }
        Ok(Self {
            variables,
            rows: merged.into_iter().collect(),
        })
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn rows(&self) -> &[(Vec<State>, f64)] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.rows.iter().map(|(_, v)| v).sum()
    }

    /// The probability stored under an exact key.
    pub fn get(&self, key: &[State]) -> Option<f64> {
        self.rows
            .binary_search_by(|(k, _)| k.as_slice().cmp(key))
            .ok()
            .map(|i| self.rows[i].1)
    }

    fn position(&self, name: &str) -> Result<usize, DiscreteError> {
        self.variables
            .iter()
            .position(|v| v == name)
            .ok_or_else(|| DiscreteError::unknown_variable(name))
    }

    fn positions(&self, names: &[&str]) -> Result<Vec<usize>, DiscreteError> {
        let mut positions = Vec::with_capacity(names.len());
        for name in names {
            let position = self.position(name)?;
            if positions.contains(&position) {
                return Err(DiscreteError::invalid_argument(format!(
                    "variable '{}' listed twice",
                    name
                )));
            }
            positions.push(position);
        }
        Ok(positions)
    }

    fn project(key: &[State], positions: &[usize]) -> Vec<State> {
        positions.iter().map(|&i| key[i].clone()).collect()
    }

    /// Divide every probability by the grand total.
    pub fn normalized(&self) -> Result<ProbTable, DiscreteError> {
        let total = self.total();
        if total == 0.0 {
            return Err(DiscreteError::ZeroProbability(
                "cannot normalize a table summing to zero".to_string(),
            ));
        }
        let rows = self
            .rows
            .iter()
            .map(|(k, v)| (k.clone(), v / total))
            .collect();
        ProbTable::new(self.variables.clone(), rows)
    }

    /// Marginalize onto `keep`, summing probability over every other
    /// variable. `keep` must be a non-empty strict subset of the
    /// table's variables.
    pub fn margin(&self, keep: &[&str]) -> Result<ProbTable, DiscreteError> {
        if keep.is_empty() {
            return Err(DiscreteError::invalid_argument(
                "margin requires at least one variable to keep",
            ));
        }
        let positions = self.positions(keep)?;
        if positions.len() == self.variables.len() {
            return Err(DiscreteError::invalid_argument(
                "margin must sum out at least one variable",
            ));
        }
        tracing::debug!(keep = ?keep, "marginalizing");
        let mut groups: BTreeMap<Vec<State>, f64> = BTreeMap::new();
        for (key, value) in &self.rows {
            *groups.entry(Self::project(key, &positions)).or_insert(0.0) += value;
        }
        ProbTable::new(
            keep.iter().map(|s| s.to_string()).collect(),
            groups.into_iter().collect(),
        )
    }

    /// Re-express the table as `P(rest | cond_vars)` for every
    /// combination of the conditioning variables at once: each row is
    /// divided by the total probability of its conditioning-state
    /// combination. Result variables are reordered to
    /// `[rest..., cond_vars...]`.
    pub fn condition(&self, cond_vars: &[&str]) -> Result<ProbTable, DiscreteError> {
        let cond_positions = self.positions(cond_vars)?;
        let rest_positions: Vec<usize> = (0..self.variables.len())
            .filter(|i| !cond_positions.contains(i))
            .collect();
        tracing::debug!(conditionals = ?cond_vars, "conditioning");

        let mut group_totals: BTreeMap<Vec<State>, f64> = BTreeMap::new();
        for (key, value) in &self.rows {
            *group_totals
                .entry(Self::project(key, &cond_positions))
                .or_insert(0.0) += value;
        }

        let mut rows = Vec::with_capacity(self.rows.len());
        for (key, value) in &self.rows {
            let cond_key = Self::project(key, &cond_positions);
            let total = group_totals[&cond_key];
            if total == 0.0 {
                return Err(DiscreteError::ZeroProbability(format!(
                    "conditioning combination ({}) has zero total probability",
                    cond_key
                        .iter()
                        .map(|s| s.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                )));
            }
            let mut new_key = Self::project(key, &rest_positions);
            new_key.extend(cond_key);
            rows.push((new_key, value / total));
        }

        let mut variables: Vec<String> = rest_positions
            .iter()
            .map(|&i| self.variables[i].clone())
            .collect();
        variables.extend(cond_vars.iter().map(|s| s.to_string()));
        ProbTable::new(variables, rows)
    }

    /// Fix or restrict variables, renormalize what survives, and drop
    /// the exactly-fixed variables from the key.
    ///
    /// The result is a standalone distribution over the remaining
    /// variables: unfiltered ones first, then range-filtered ones in
    /// filter order.
    pub fn given(&self, filters: &[Filter]) -> Result<ProbTable, DiscreteError> {
        let mut filter_positions = Vec::with_capacity(filters.len());
        for filter in filters {
            filter_positions.push(self.position(filter.variable())?);
        }
        tracing::debug!(
            filters = %filters.iter().map(|f| f.to_string()).collect::<Vec<_>>().join(", "),
            "filtering"
        );

        let matching: Vec<&(Vec<State>, f64)> = self
            .rows
            .iter()
            .filter(|(key, _)| {
                filters
                    .iter()
                    .zip(&filter_positions)
                    .all(|(filter, &position)| filter.matches(&key[position]))
            })
            .collect();
        let total: f64 = matching.iter().map(|(_, v)| v).sum();
        if total == 0.0 {
            return Err(DiscreteError::ZeroProbability(format!(
                "no probability mass satisfies [{}]",
                filters
                    .iter()
                    .map(|f| f.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        // exactly-fixed variables leave the key; range-filtered ones stay
        let fixed: Vec<&str> = filters
            .iter()
            .filter(|f| f.fixes_variable())
            .map(Filter::variable)
            .collect();
        let mut kept: Vec<&str> = self
            .variables
            .iter()
            .map(String::as_str)
            .filter(|v| !filters.iter().any(|f| f.variable() == *v))
            .collect();
        for filter in filters {
            let name = filter.variable();
            if !fixed.contains(&name) && !kept.contains(&name) {
                kept.push(name);
            }
        }
        if kept.is_empty() {
            return Err(DiscreteError::invalid_argument(
                "conditioning fixed every variable; no distribution remains",
            ));
        }
        let kept_positions = self.positions(&kept)?;

        let rows = matching
            .into_iter()
            .map(|(key, value)| (Self::project(key, &kept_positions), value / total))
            .collect();
        ProbTable::new(kept.iter().map(|s| s.to_string()).collect(), rows)
    }

    /// Probability mass satisfying every filter.
    pub fn p(&self, filters: &[Filter]) -> Result<f64, DiscreteError> {
        let mut filter_positions = Vec::with_capacity(filters.len());
        for filter in filters {
            filter_positions.push(self.position(filter.variable())?);
        }
        Ok(self
            .rows
            .iter()
            .filter(|(key, _)| {
                filters
                    .iter()
                    .zip(&filter_positions)
                    .all(|(filter, &position)| filter.matches(&key[position]))
            })
            .map(|(_, v)| v)
            .sum())
    }

    /// Chain rule: treat `self` as `P(rest | marginal_vars)` and multiply
    /// by `P(marginal_vars)`, producing the joint over all variables.
    /// Rows whose conditioning combination has no marginal probability
    /// are dropped (inner alignment).
    pub fn chain_multiply(&self, marginal: &ProbTable) -> Result<ProbTable, DiscreteError> {
        let marginal_names: Vec<&str> =
            marginal.variables.iter().map(String::as_str).collect();
        let marginal_positions = self.positions(&marginal_names).map_err(|_| {
            DiscreteError::incompatible(format!(
                "marginal variables {:?} are not all present in {:?}",
                marginal.variables, self.variables
            ))
        })?;
        let rest_positions: Vec<usize> = (0..self.variables.len())
            .filter(|i| !marginal_positions.contains(i))
            .collect();

        let mut rows = Vec::with_capacity(self.rows.len());
        for (key, value) in &self.rows {
            let marginal_key = Self::project(key, &marginal_positions);
            if let Some(marginal_value) = marginal.get(&marginal_key) {
                let mut new_key = Self::project(key, &rest_positions);
                new_key.extend(marginal_key);
                rows.push((new_key, value * marginal_value));
            }
        }

        let mut variables: Vec<String> = rest_positions
            .iter()
            .map(|&i| self.variables[i].clone())
            .collect();
        variables.extend(marginal.variables.iter().cloned());
        ProbTable::new(variables, rows)
    }

    /// Elementwise division by a table over a subset of the variables:
    /// `P(A,B) / P(B)`. A missing or zero divisor row fails.
    pub fn divide(&self, divisor: &ProbTable) -> Result<ProbTable, DiscreteError> {
        let divisor_names: Vec<&str> =
            divisor.variables.iter().map(String::as_str).collect();
        let divisor_positions = self.positions(&divisor_names).map_err(|_| {
            DiscreteError::incompatible(format!(
                "divisor variables {:?} are not all present in {:?}",
                divisor.variables, self.variables
            ))
        })?;
        let rows = self
            .rows
            .iter()
            .map(|(key, value)| {
                let divisor_key = Self::project(key, &divisor_positions);
                match divisor.get(&divisor_key) {
                    Some(d) if d != 0.0 => Ok((key.clone(), value / d)),
                    _ => Err(DiscreteError::ZeroProbability(format!(
                        "divisor has no probability mass at ({})",
                        divisor_key
                            .iter()
                            .map(|s| s.to_string())
                            .collect::<Vec<_>>()
                            .join(",")
                    ))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        ProbTable::new(self.variables.clone(), rows)
    }

    /// Product of tables over disjoint variables (independence).
    pub fn product(&self, other: &ProbTable) -> Result<ProbTable, DiscreteError> {
        if other
            .variables
            .iter()
            .any(|v| self.variables.contains(v))
        {
            return Err(DiscreteError::incompatible(format!(
                "variable sets overlap: {:?} and {:?}",
                self.variables, other.variables
            )));
        }
        let mut variables = self.variables.clone();
        variables.extend(other.variables.iter().cloned());
        let mut rows = Vec::with_capacity(self.rows.len() * other.rows.len());
        for (key_1, value_1) in &self.rows {
            for (key_2, value_2) in &other.rows {
                let mut key = key_1.clone();
                key.extend(key_2.iter().cloned());
                rows.push((key, value_1 * value_2));
            }
        }
        ProbTable::new(variables, rows)
    }

    /// Compare tables up to variable order and `tolerance`, treating
    /// missing rows as zero.
    pub fn equivalent(&self, other: &ProbTable, tolerance: f64) -> bool {
        let mut self_sorted: Vec<&str> = self.variables.iter().map(String::as_str).collect();
        let mut other_sorted: Vec<&str> =
            other.variables.iter().map(String::as_str).collect();
        self_sorted.sort_unstable();
        other_sorted.sort_unstable();
        if self_sorted != other_sorted {
            return false;
        }
        let reorder = |table: &ProbTable, order: &[&str]| -> BTreeMap<Vec<State>, f64> {
            let positions: Vec<usize> = order
                .iter()
                .map(|name| {
                    table
                        .variables
                        .iter()
                        .position(|v| v == name)
                        .expect("sorted names come from the table")
                })
                .collect();
            table
                .rows
                .iter()
                .map(|(key, value)| (Self::project(key, &positions), *value))
                .collect()
        };
        let left = reorder(self, &self_sorted);
        let right = reorder(other, &self_sorted);
        let covered = |a: &BTreeMap<Vec<State>, f64>, b: &BTreeMap<Vec<State>, f64>| {
            a.iter().all(|(key, &value)| {
                if value == 0.0 {
                    return true;
                }
                b.get(key).is_some_and(|&v| (v - value).abs() <= tolerance)
            })
        };
        covered(&left, &right) && covered(&right, &left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // a small joint over two binary variables
    fn joint() -> ProbTable {
        ProbTable::new(
            vec!["a".to_string(), "b".to_string()],
            vec![
                (vec![0.into(), 0.into()], 0.1),
                (vec![0.into(), 1.into()], 0.2),
                (vec![1.into(), 0.into()], 0.3),
                (vec![1.into(), 1.into()], 0.4),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_keys_merge() {
        let t = ProbTable::new(
            vec!["x".to_string()],
            vec![
                (vec!["u".into()], 0.25),
                (vec!["u".into()], 0.25),
                (vec!["v".into()], 0.5),
            ],
        )
        .unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(&["u".into()]), Some(0.5));
    }

    #[test]
    fn test_margin_sums_out() {
        let m = joint().margin(&["a"]).unwrap();
        assert_eq!(m.variables(), &["a".to_string()]);
        assert!((m.get(&[0.into()]).unwrap() - 0.3).abs() < 1e-12);
        assert!((m.get(&[1.into()]).unwrap() - 0.7).abs() < 1e-12);
        assert!((m.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_margin_preconditions() {
        assert!(joint().margin(&[]).is_err());
        assert!(joint().margin(&["a", "b"]).is_err());
        assert!(joint().margin(&["missing"]).is_err());
    }

    #[test]
    fn test_condition_normalizes_groups() {
        let c = joint().condition(&["a"]).unwrap();
        assert_eq!(c.variables(), &["b".to_string(), "a".to_string()]);
        // within a = 1: 0.3 and 0.4 normalize to 3/7 and 4/7
        let p0 = c.get(&[0.into(), 1.into()]).unwrap();
        let p1 = c.get(&[1.into(), 1.into()]).unwrap();
        assert!((p0 - 3.0 / 7.0).abs() < 1e-12);
        assert!((p1 - 4.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_condition_times_margin_restores_joint() {
        let j = joint();
        let c = j.condition(&["a"]).unwrap();
        let m = j.margin(&["a"]).unwrap();
        let restored = c.chain_multiply(&m).unwrap();
        assert!(restored.equivalent(&j, 1e-12));
    }

    #[test]
    fn test_given_fixing_filter_drops_variable() {
        let g = joint().given(&[Filter::eq("a", 1)]).unwrap();
        assert_eq!(g.variables(), &["b".to_string()]);
        assert!((g.get(&[0.into()]).unwrap() - 3.0 / 7.0).abs() < 1e-12);
        assert!((g.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_given_range_filter_keeps_variable() {
        let g = joint().given(&[Filter::ne("a", 0)]).unwrap();
        assert_eq!(g.variables(), &["b".to_string(), "a".to_string()]);
        assert!((g.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_given_zero_mass_fails() {
        let err = joint().given(&[Filter::eq("a", 7)]).unwrap_err();
        assert!(matches!(err, DiscreteError::ZeroProbability(_)));
    }

    #[test]
    fn test_divide_by_margin_matches_condition() {
        let j = joint();
        let m = j.margin(&["a"]).unwrap();
        let divided = j.divide(&m).unwrap();
        let conditioned = j.condition(&["a"]).unwrap();
        assert!(divided.equivalent(&conditioned, 1e-12));
    }

    #[test]
    fn test_divide_missing_row_fails() {
        let j = joint();
        let partial = ProbTable::new(
            vec!["a".to_string()],
            vec![(vec![0.into()], 0.3)],
        )
        .unwrap();
        assert!(matches!(
            j.divide(&partial),
            Err(DiscreteError::ZeroProbability(_))
        ));
    }

    #[test]
    fn test_product_requires_disjoint_variables() {
        let j = joint();
        assert!(j.product(&j).is_err());
    }

    #[test]
    fn test_equivalent_ignores_variable_order_and_zeros() {
        let forward = joint();
        let mut swapped_rows = Vec::new();
        for (key, value) in forward.rows() {
            swapped_rows.push((vec![key[1].clone(), key[0].clone()], *value));
        }
        swapped_rows.push((vec![7.into(), 7.into()], 0.0));
        let swapped =
            ProbTable::new(vec!["b".to_string(), "a".to_string()], swapped_rows).unwrap();
        assert!(forward.equivalent(&swapped, 1e-12));
    }
}
