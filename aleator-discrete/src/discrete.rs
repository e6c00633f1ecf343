//! Joint distributions over categorical variables

use crate::conditional::Conditional;
use crate::state::IntoStateKey;
use crate::{DiscreteError, Filter, ProbTable, State};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A joint probability distribution over named categorical variables.
///
/// Values sum to 1; every transformation returns a new distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discrete {
    table: ProbTable,
    states: BTreeMap<String, Vec<State>>,
}

fn inferred_states(table: &ProbTable) -> BTreeMap<String, Vec<State>> {
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
    states
}

impl Discrete {
    pub(crate) fn from_table(table: ProbTable, states: BTreeMap<String, Vec<State>>) -> Self {
        Self { table, states }
    }

    /// Build a joint distribution from counts of variable-value
    /// combinations; counts are normalized to probabilities.
    pub fn from_counts<K: IntoStateKey>(
        data: impl IntoIterator<Item = (K, f64)>,
        variables: &[&str],
    ) -> Result<Discrete, DiscreteError> {
        let rows = data
            .into_iter()
            .map(|(key, count)| (key.into_key(), count))
            .collect();
        let table = ProbTable::new(
            variables.iter().map(|s| s.to_string()).collect(),
            rows,
        )?
        .normalized()?;
        let states = inferred_states(&table);
        Ok(Self::from_table(table, states))
    }

    /// [`from_counts`](Self::from_counts) with explicit per-variable
    /// state sets, for states not present in the data.
    pub fn from_counts_with_states<K: IntoStateKey>(
        data: impl IntoIterator<Item = (K, f64)>,
        variables: &[&str],
        states: BTreeMap<String, Vec<State>>,
    ) -> Result<Discrete, DiscreteError> {
        let mut distribution = Self::from_counts(data, variables)?;
        let names: Vec<&String> = states.keys().collect();
        if names.len() != variables.len()
            || !variables.iter().all(|v| states.contains_key(*v))
        {
            return Err(DiscreteError::invalid_argument(
                "state names do not match variable names",
            ));
        }
        distribution.states = states;
        Ok(distribution)
    }

    /// Build a joint distribution from probabilities (normalizing, so
    /// slightly-off inputs are tolerated).
    pub fn from_probs<K: IntoStateKey>(
        data: impl IntoIterator<Item = (K, f64)>,
        variables: &[&str],
    ) -> Result<Discrete, DiscreteError> {
        Self::from_counts(data, variables)
    }

    /// Build a joint distribution from column-major observations: one
    /// named column of equal length per variable, one row per
    /// observation.
    pub fn from_observations(
        columns: Vec<(&str, Vec<State>)>,
    ) -> Result<Discrete, DiscreteError> {
        if columns.is_empty() {
            return Err(DiscreteError::invalid_argument(
                "observations need at least one column",
            ));
        }
        let length = columns[0].1.len();
        if length == 0 {
            return Err(DiscreteError::invalid_argument(
                "observations need at least one row",
            ));
        }
        for (name, column) in &columns {
            if column.len() != length {
                return Err(DiscreteError::invalid_argument(format!(
                    "column '{}' has {} rows, expected {}",
                    name,
                    column.len(),
                    length
                )));
            }
        }
        let variables: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        let rows = (0..length).map(|i| {
            let key: Vec<State> = columns.iter().map(|(_, col)| col[i].clone()).collect();
            (key, 1.0)
        });
        Self::from_counts(rows, &variables)
    }

    /// A single binary variable with `P(variable = 1) = prob`.
    pub fn binary(prob: f64, variable: &str) -> Result<Discrete, DiscreteError> {
        if !(0.0..=1.0).contains(&prob) {
            return Err(DiscreteError::invalid_argument(format!(
                "binary probability must lie in [0, 1], got {}",
                prob
            )));
        }
        Self::from_probs(vec![(0i64, 1.0 - prob), (1i64, prob)], &[variable])
    }

    pub fn variables(&self) -> &[String] {
        self.table.variables()
    }

    pub fn states(&self) -> &BTreeMap<String, Vec<State>> {
        &self.states
    }

    pub fn data(&self) -> &ProbTable {
        &self.table
    }

    fn states_subset(&self, variables: &[String]) -> BTreeMap<String, Vec<State>> {
        self.states
            .iter()
            .filter(|(name, _)| variables.contains(name))
            .map(|(name, list)| (name.clone(), list.clone()))
            .collect()
    }

    /// Probability mass satisfying every filter.
    pub fn p(&self, filters: &[Filter]) -> Result<f64, DiscreteError> {
        self.table.p(filters)
    }

    /// Condition on fixed or restricted variable values, producing a
    /// standalone distribution over the remaining variables.
    pub fn given(&self, filters: &[Filter]) -> Result<Discrete, DiscreteError> {
        let table = self.table.given(filters)?;
        let states = self.states_subset(table.variables());
        Ok(Self::from_table(table, states))
    }

    /// Marginal distribution over `keep`, summing out the rest.
    pub fn marginal(&self, keep: &[&str]) -> Result<Discrete, DiscreteError> {
        let table = self.table.margin(keep)?;
        let states = self.states_subset(table.variables());
        Ok(Self::from_table(table, states))
    }

    /// The full conditional table `P(rest | cond_vars)` over every
    /// conditioning combination.
    pub fn conditional(&self, cond_vars: &[&str]) -> Result<Conditional, DiscreteError> {
        let table = self.table.condition(cond_vars)?;
        let joint_count = table.variables().len() - cond_vars.len();
        let joint_variables: Vec<String> = table.variables()[..joint_count].to_vec();
        let conditional_variables: Vec<String> = table.variables()[joint_count..].to_vec();
        let states = self.states_subset(table.variables());
        Ok(Conditional::from_parts(
            table,
            joint_variables,
            conditional_variables,
            states,
        ))
    }

    /// Product with an independent distribution over disjoint variables.
    pub fn checked_mul(&self, other: &Discrete) -> Result<Discrete, DiscreteError> {
        let table = self.table.product(&other.table)?;
        let mut states = self.states.clone();
        states.extend(other.states.clone());
        Ok(Self::from_table(table, states))
    }

    /// Division by a marginal over a subset of this distribution's
    /// variables: `P(A,B) / P(B)`.
    pub fn checked_div(&self, other: &Discrete) -> Result<Discrete, DiscreteError> {
        let table = self.table.divide(&other.table)?;
        Ok(Self::from_table(table, self.states.clone()))
    }

    /// Compare distributions up to variable order and `tolerance`.
    pub fn equivalent(&self, other: &Discrete, tolerance: f64) -> bool {
        self.table.equivalent(&other.table, tolerance)
    }
}

impl fmt::Display for Discrete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p({})", self.variables().join(","))
    }
}

/// Independence product.
///
/// # Panics
///
/// Panics when the variable sets overlap; use
/// [`checked_mul`](Discrete::checked_mul) for the fallible form.
impl std::ops::Mul<&Discrete> for &Discrete {
    type Output = Discrete;
    fn mul(self, rhs: &Discrete) -> Discrete {
        match self.checked_mul(rhs) {
            Ok(result) => result,
            Err(e) => panic!("cannot multiply {} by {}: {}", self, rhs, e),
        }
    }
}

/// Chain rule `P(A|B) * P(B)` with the conditional on the right.
///
/// # Panics
///
/// Panics when the tables are incompatible; use
/// [`Conditional::checked_mul`] for the fallible form.
impl std::ops::Mul<&Conditional> for &Discrete {
    type Output = Discrete;
    fn mul(self, rhs: &Conditional) -> Discrete {
        match rhs.checked_mul(self) {
            Ok(result) => result,
            Err(e) => panic!("cannot multiply {} by {}: {}", self, rhs, e),
        }
    }
}

/// Marginal division `P(A,B) / P(B)`.
///
/// # Panics
///
/// Panics when the divisor is incompatible or has zero mass somewhere;
/// use [`checked_div`](Discrete::checked_div) for the fallible form.
impl std::ops::Div<&Discrete> for &Discrete {
    type Output = Discrete;
    fn div(self, rhs: &Discrete) -> Discrete {
        match self.checked_div(rhs) {
            Ok(result) => result,
            Err(e) => panic!("cannot divide {} by {}: {}", self, rhs, e),
        }
    }
}
