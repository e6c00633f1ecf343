//! Conditional probability tables

use crate::discrete::Discrete;
use crate::state::IntoStateKey;
use crate::{DiscreteError, Filter, ProbTable, State};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A conditional probability table `P(joint | conditional)`.
///
/// Rows are keyed `[joint states..., conditional states...]` and sum to
/// 1 within each combination of conditioning states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditional {
    joint_variables: Vec<String>,
    conditional_variables: Vec<String>,
    table: ProbTable,
    states: BTreeMap<String, Vec<State>>,
}

/// What remains after fixing some or all conditioning variables.
pub enum GivenResult {
    /// Every conditioning variable was fixed.
    Distribution(Discrete),
    /// Some conditioning variables remain.
    Table(Conditional),
}

fn cartesian(state_lists: &[Vec<State>]) -> Vec<Vec<State>> {
    let mut combos: Vec<Vec<State>> = vec![vec![]];
    for list in state_lists {
        let mut next = Vec::with_capacity(combos.len() * list.len());
        for combo in &combos {
            for state in list {
                let mut extended = combo.clone();
                extended.push(state.clone());
                next.push(extended);
            }
        }
        combos = next;
    }
    combos
}

impl Conditional {
    pub(crate) fn from_parts(
        table: ProbTable,
        joint_variables: Vec<String>,
        conditional_variables: Vec<String>,
        states: BTreeMap<String, Vec<State>>,
    ) -> Self {
        Self {
            joint_variables,
            conditional_variables,
            table,
            states,
        }
    }

    /// Build from conditional probabilities keyed
    /// `[joint states..., conditional states...]`.
    pub fn from_probs<K: IntoStateKey>(
        data: impl IntoIterator<Item = (K, f64)>,
        joint_variables: &[&str],
        conditional_variables: &[&str],
    ) -> Result<Conditional, DiscreteError> {
        let variables: Vec<String> = joint_variables
            .iter()
            .chain(conditional_variables.iter())
            .map(|s| s.to_string())
            .collect();
        let rows = data
            .into_iter()
            .map(|(key, value)| (key.into_key(), value))
            .collect();
        let table = ProbTable::new(variables, rows)?;
        let mut states: BTreeMap<String, Vec<State>> = BTreeMap::new();
        for (position, variable) in table.variables().iter().enumerate() {
            let mut seen: Vec<State> = Vec::new();
            for (key, _) in table.rows() {
                if !seen.contains(&key[position]) {
                    seen.push(key[position].clone());
                }
            }
            seen.sort();
            states.insert(variable.clone(), seen);
        }
        Ok(Self::from_parts(
            table,
            joint_variables.iter().map(|s| s.to_string()).collect(),
            conditional_variables.iter().map(|s| s.to_string()).collect(),
            states,
        ))
    }

    /// Build a table for a binary joint variable from
    /// `P(variable = 1 | conditionals)`, keyed by conditioning states;
    /// the complement rows are filled in.
    pub fn binary_from_probs<K: IntoStateKey>(
        data: impl IntoIterator<Item = (K, f64)>,
        joint_variable: &str,
        conditional_variables: &[&str],
    ) -> Result<Conditional, DiscreteError> {
        let mut rows: Vec<(Vec<State>, f64)> = Vec::new();
        for (cond_key, prob) in data {
            let cond_key = cond_key.into_key();
            let mut one = vec![State::Int(1)];
            one.extend(cond_key.iter().cloned());
            rows.push((one, prob));
            let mut zero = vec![State::Int(0)];
            zero.extend(cond_key);
            rows.push((zero, 1.0 - prob));
        }
        Self::from_probs(rows, &[joint_variable], conditional_variables)
    }

    pub fn joint_variables(&self) -> &[String] {
        &self.joint_variables
    }

    pub fn conditional_variables(&self) -> &[String] {
        &self.conditional_variables
    }

    /// All variables, joint first.
    pub fn variables(&self) -> Vec<&str> {
        self.table.variables().iter().map(String::as_str).collect()
    }

    pub fn states(&self) -> &BTreeMap<String, Vec<State>> {
        &self.states
    }

    pub fn data(&self) -> &ProbTable {
        &self.table
    }

    /// The conditional probability stored under
    /// `[joint states..., conditional states...]`.
    pub fn prob(&self, key: &[State]) -> Option<f64> {
        self.table.get(key)
    }

    /// Compare tables up to variable order and `tolerance`.
    pub fn equivalent(&self, other: &Conditional, tolerance: f64) -> bool {
        let mut self_joints: Vec<&String> = self.joint_variables.iter().collect();
        let mut other_joints: Vec<&String> = other.joint_variables.iter().collect();
        self_joints.sort();
        other_joints.sort();
        self_joints == other_joints && self.table.equivalent(&other.table, tolerance)
    }

    /// Fix conditioning variables to exact values. Fixing all of them
    /// yields the selected distribution; fixing a subset narrows the
    /// table.
    pub fn given(&self, filters: &[Filter]) -> Result<GivenResult, DiscreteError> {
        for filter in filters {
            if !self
                .conditional_variables
                .iter()
                .any(|v| v == filter.variable())
            {
                return Err(DiscreteError::invalid_argument(format!(
                    "'{}' is not a conditioning variable of {}",
                    filter.variable(),
                    self
                )));
            }
            if !filter.fixes_variable() {
                return Err(DiscreteError::InvalidFilter(format!(
                    "conditioning tables take exact values only, got {}",
                    filter
                )));
            }
        }
        let joint_count = self.joint_variables.len();
        let cond_position = |name: &str| {
            joint_count
                + self
                    .conditional_variables
                    .iter()
                    .position(|v| v == name)
                    .expect("validated above")
        };

        let matching: Vec<(Vec<State>, f64)> = self
            .table
            .rows()
            .iter()
            .filter(|(key, _)| {
                filters
                    .iter()
                    .all(|f| f.matches(&key[cond_position(f.variable())]))
            })
            .cloned()
            .collect();
        if matching.is_empty() {
            return Err(DiscreteError::ZeroProbability(format!(
                "no table entries satisfy [{}]",
                filters
                    .iter()
                    .map(|f| f.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        let mut fixed: Vec<&str> = Vec::new();
        for filter in filters {
            if !fixed.contains(&filter.variable()) {
                fixed.push(filter.variable());
            }
        }
        if fixed.len() == self.conditional_variables.len() {
            // every conditioning variable fixed: a plain distribution
            // over the joint variables remains
            let joint_names: Vec<&str> =
                self.joint_variables.iter().map(String::as_str).collect();
            let rows = matching
                .into_iter()
                .map(|(key, value)| (key[..joint_count].to_vec(), value));
            let distribution = Discrete::from_probs(rows, &joint_names)?;
            return Ok(GivenResult::Distribution(distribution));
        }

        // drop the fixed conditioning variables from the key
        let remaining: Vec<String> = self
            .conditional_variables
            .iter()
            .filter(|v| !fixed.contains(&v.as_str()))
            .cloned()
            .collect();
        let kept_positions: Vec<usize> = (0..joint_count)
            .chain(
                self.conditional_variables
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| !fixed.contains(&v.as_str()))
                    .map(|(i, _)| joint_count + i),
            )
            .collect();
        let rows: Vec<(Vec<State>, f64)> = matching
            .into_iter()
            .map(|(key, value)| {
                let projected: Vec<State> =
                    kept_positions.iter().map(|&i| key[i].clone()).collect();
                (projected, value)
            })
            .collect();
        let mut variables = self.joint_variables.clone();
        variables.extend(remaining.iter().cloned());
        let table = ProbTable::new(variables, rows)?;
        let states = self
            .states
            .iter()
            .filter(|(name, _)| !fixed.contains(&name.as_str()))
            .map(|(name, list)| (name.clone(), list.clone()))
            .collect();
        Ok(GivenResult::Table(Conditional::from_parts(
            table,
            self.joint_variables.clone(),
            remaining,
            states,
        )))
    }

    /// Chain rule: `P(joint | cond) * P(cond)`, producing the joint
    /// distribution over all variables. The marginal must cover exactly
    /// the conditioning variables.
    pub fn checked_mul(&self, marginal: &Discrete) -> Result<Discrete, DiscreteError> {
        let mut marginal_names: Vec<&String> = marginal.variables().iter().collect();
        let mut cond_names: Vec<&String> = self.conditional_variables.iter().collect();
        marginal_names.sort();
        cond_names.sort();
        if marginal_names != cond_names {
            return Err(DiscreteError::incompatible(format!(
                "{} expects a marginal over its conditioning variables, got {}",
                self, marginal
            )));
        }
        let table = self.table.chain_multiply(marginal.data())?;
        let mut states = self.states.clone();
        for (name, list) in marginal.states() {
            states.insert(name.clone(), list.clone());
        }
        Ok(Discrete::from_table(table, states))
    }

    /// Product of two conditional tables. Each side is replicated over
    /// the conditioning variables it lacks, then joint states multiply
    /// pairwise per shared conditioning combination. Joint and
    /// conditioning variables both end up sorted by name.
    pub fn checked_mul_conditional(
        &self,
        other: &Conditional,
    ) -> Result<Conditional, DiscreteError> {
        for joint in &other.joint_variables {
            if self.joint_variables.contains(joint) {
                return Err(DiscreteError::incompatible(format!(
                    "joint variable '{}' appears on both sides",
                    joint
                )));
            }
        }

        // union of conditioning variables, with states for each
        let mut union_conds: Vec<String> = self.conditional_variables.clone();
        for cond in &other.conditional_variables {
            if !union_conds.contains(cond) {
                union_conds.push(cond.clone());
            }
        }
        union_conds.sort();
        let union_states: Vec<Vec<State>> = union_conds
            .iter()
            .map(|name| {
                self.states
                    .get(name)
                    .or_else(|| other.states.get(name))
                    .cloned()
                    .ok_or_else(|| {
                        DiscreteError::invalid_argument(format!(
                            "no states known for conditioning variable '{}'",
                            name
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let project = |combo: &[State], conds: &[String]| -> Vec<State> {
            conds
                .iter()
                .map(|name| {
                    let position = union_conds
                        .iter()
                        .position(|v| v == name)
                        .expect("conds come from the union");
                    combo[position].clone()
                })
                .collect()
        };
        let side_rows = |table: &Conditional, cond_key: &[State]| -> Vec<(Vec<State>, f64)> {
            let joint_count = table.joint_variables.len();
            table
                .table
                .rows()
                .iter()
                .filter(|(key, _)| &key[joint_count..] == cond_key)
                .map(|(key, value)| (key[..joint_count].to_vec(), *value))
                .collect()
        };

        let mut rows: Vec<(Vec<State>, f64)> = Vec::new();
        for combo in cartesian(&union_states) {
            let self_key = project(&combo, &self.conditional_variables);
            let other_key = project(&combo, &other.conditional_variables);
            for (joint_1, value_1) in side_rows(self, &self_key) {
                for (joint_2, value_2) in side_rows(other, &other_key) {
                    let mut key = joint_1.clone();
                    key.extend(joint_2.iter().cloned());
                    key.extend(combo.iter().cloned());
                    rows.push((key, value_1 * value_2));
                }
            }
        }

        // sort joint variables by name, reordering keys to match
        let mut joints: Vec<String> = self
            .joint_variables
            .iter()
            .chain(other.joint_variables.iter())
            .cloned()
            .collect();
        let unsorted = joints.clone();
        joints.sort();
        let joint_order: Vec<usize> = joints
            .iter()
            .map(|name| {
                unsorted
                    .iter()
                    .position(|v| v == name)
                    .expect("name comes from the same list")
            })
            .collect();
        let joint_count = joints.len();
        let rows = rows
            .into_iter()
            .map(|(key, value)| {
                let mut reordered: Vec<State> = joint_order
                    .iter()
                    .map(|&i| key[i].clone())
                    .collect();
                reordered.extend(key[joint_count..].iter().cloned());
                (reordered, value)
            })
            .collect();

        let mut variables = joints.clone();
        variables.extend(union_conds.iter().cloned());
        let table = ProbTable::new(variables, rows)?;
        let mut states = self.states.clone();
        for (name, list) in &other.states {
            states.entry(name.clone()).or_insert_with(|| list.clone());
        }
        Ok(Conditional::from_parts(table, joints, union_conds, states))
    }
}

impl fmt::Display for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p({}|{})",
            self.joint_variables.join(","),
            self.conditional_variables.join(",")
        )
    }
}

/// Chain rule `P(A|B) * P(B)`.
///
/// # Panics
///
/// Panics when the marginal does not cover the conditioning variables;
/// use [`checked_mul`](Conditional::checked_mul) for the fallible form.
impl std::ops::Mul<&Discrete> for &Conditional {
    type Output = Discrete;
    fn mul(self, rhs: &Discrete) -> Discrete {
        match self.checked_mul(rhs) {
            Ok(result) => result,
            Err(e) => panic!("cannot multiply {} by {}: {}", self, rhs, e),
        }
    }
}

/// Product of conditional tables.
///
/// # Panics
///
/// Panics when the tables are incompatible; use
/// [`checked_mul_conditional`](Conditional::checked_mul_conditional) for
/// the fallible form.
impl std::ops::Mul<&Conditional> for &Conditional {
    type Output = Conditional;
    fn mul(self, rhs: &Conditional) -> Conditional {
        match self.checked_mul_conditional(rhs) {
            Ok(result) => result,
            Err(e) => panic!("cannot multiply {} by {}: {}", self, rhs, e),
        }
    }
}
