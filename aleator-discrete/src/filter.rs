//! Variable filters
//!
//! Conditioning arguments name a variable either bare (`fruit`, an
//! equality that fixes the variable) or with a comparator suffix
//! (`region__ne`, `count__le`). A bare equality determines the variable
//! exactly, so conditioning drops it from the result; suffixed filters
//! keep the variable, since several of its states can survive.

use crate::{DiscreteError, State};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison applied by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    In,
    NotIn,
}

/// Recognized comparator suffix codes, in match order.
const MATCH_CODES: [(&str, Comparator); 8] = [
    ("eq", Comparator::Eq),
    ("ne", Comparator::Ne),
    ("lt", Comparator::Lt),
    ("gt", Comparator::Gt),
    ("le", Comparator::Le),
    ("ge", Comparator::Ge),
    ("in", Comparator::In),
    ("not_in", Comparator::NotIn),
];

impl Comparator {
    pub fn code(&self) -> &'static str {
        match self {
            Comparator::Eq => "eq",
            Comparator::Ne => "ne",
            Comparator::Lt => "lt",
            Comparator::Gt => "gt",
            Comparator::Le => "le",
            Comparator::Ge => "ge",
            Comparator::In => "in",
            Comparator::NotIn => "not_in",
        }
    }
}

/// The value side of a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
    One(State),
    Many(Vec<State>),
}

/// A single conditioning filter on one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    variable: String,
    comparator: Comparator,
    value: FilterValue,
    /// True for bare-name equality, which fixes the variable exactly and
    /// drops it from a conditioned result.
    fixes_variable: bool,
}

impl Filter {
    fn one(
        variable: impl Into<String>,
        comparator: Comparator,
        value: impl Into<State>,
        fixes_variable: bool,
    ) -> Self {
        Self {
            variable: variable.into(),
            comparator,
            value: FilterValue::One(value.into()),
            fixes_variable,
        }
    }

    /// Bare equality: fixes the variable to one state.
    pub fn eq(variable: impl Into<String>, value: impl Into<State>) -> Self {
        Self::one(variable, Comparator::Eq, value, true)
    }

    pub fn ne(variable: impl Into<String>, value: impl Into<State>) -> Self {
        Self::one(variable, Comparator::Ne, value, false)
    }

    pub fn lt(variable: impl Into<String>, value: impl Into<State>) -> Self {
        Self::one(variable, Comparator::Lt, value, false)
    }

    pub fn gt(variable: impl Into<String>, value: impl Into<State>) -> Self {
        Self::one(variable, Comparator::Gt, value, false)
    }

    pub fn le(variable: impl Into<String>, value: impl Into<State>) -> Self {
        Self::one(variable, Comparator::Le, value, false)
    }

    pub fn ge(variable: impl Into<String>, value: impl Into<State>) -> Self {
        Self::one(variable, Comparator::Ge, value, false)
    }

    pub fn is_in(
        variable: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<State>>,
    ) -> Self {
        Self {
            variable: variable.into(),
            comparator: Comparator::In,
            value: FilterValue::Many(values.into_iter().map(Into::into).collect()),
            fixes_variable: false,
        }
    }

    pub fn not_in(
        variable: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<State>>,
    ) -> Self {
        Self {
            variable: variable.into(),
            comparator: Comparator::NotIn,
            value: FilterValue::Many(values.into_iter().map(Into::into).collect()),
            fixes_variable: false,
        }
    }

    /// Parse a `{name}` or `{name}__{comparator}` argument against the
    /// known variables. A variable whose literal name contains `__` is
    /// matched before suffix interpretation.
    pub fn parse(
        name_comparator: &str,
        value: FilterValue,
        var_names: &[String],
    ) -> Result<Filter, DiscreteError> {
        if var_names.iter().any(|v| v == name_comparator) {
            return Ok(Filter {
                variable: name_comparator.to_string(),
                comparator: Comparator::Eq,
                value,
                fixes_variable: true,
            });
        }
        for (code, comparator) in MATCH_CODES {
            if let Some(variable) = name_comparator.strip_suffix(&format!("__{}", code)) {
                if var_names.iter().any(|v| v == variable) {
                    return Ok(Filter {
                        variable: variable.to_string(),
                        comparator,
                        value,
                        fixes_variable: false,
                    });
                }
            }
        }
        Err(DiscreteError::InvalidFilter(format!(
            "'{}' names no variable in {:?}, with or without a comparator suffix",
            name_comparator, var_names
        )))
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    /// Whether conditioning on this filter drops the variable from the
    /// result.
    pub fn fixes_variable(&self) -> bool {
        self.fixes_variable
    }

    /// Test one state against the filter.
    pub fn matches(&self, state: &State) -> bool {
        match (&self.value, self.comparator) {
            (FilterValue::One(v), Comparator::Eq) => state == v,
            (FilterValue::One(v), Comparator::Ne) => state != v,
            (FilterValue::One(v), Comparator::Lt) => state < v,
            (FilterValue::One(v), Comparator::Gt) => state > v,
            (FilterValue::One(v), Comparator::Le) => state <= v,
            (FilterValue::One(v), Comparator::Ge) => state >= v,
            (FilterValue::Many(vs), Comparator::In) => vs.contains(state),
            (FilterValue::Many(vs), Comparator::NotIn) => !vs.contains(state),
            // a multi-value payload only pairs with In/NotIn
            (FilterValue::Many(_), _) | (FilterValue::One(_), Comparator::In) => false,
            (FilterValue::One(_), Comparator::NotIn) => false,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self.comparator {
            Comparator::Eq => "=",
            Comparator::Ne => "≠",
            Comparator::Lt => "<",
            Comparator::Gt => ">",
            Comparator::Le => "≤",
            Comparator::Ge => "≥",
            Comparator::In => "∈",
            Comparator::NotIn => "∉",
        };
        match &self.value {
            FilterValue::One(v) => write!(f, "{}{}{}", self.variable, symbol, v),
            FilterValue::Many(vs) => {
                let list = vs
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "{}{}{{{}}}", self.variable, symbol, list)
            }
        }
    }
}

/// Whether `name_comparator` names one of `var_names`, bare or with a
/// recognized comparator suffix.
pub fn valid_name_comparator(name_comparator: &str, var_names: &[String]) -> bool {
    if var_names.iter().any(|v| v == name_comparator) {
        return true;
    }
    var_names.iter().any(|v| {
        MATCH_CODES
            .iter()
            .any(|(code, _)| name_comparator == format!("{}__{}", v, code))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> Vec<String> {
        vec!["box".to_string(), "region".to_string()]
    }

    #[test]
    fn test_valid_name_comparator() {
        assert!(valid_name_comparator("box", &vars()));
        assert!(valid_name_comparator("region__ne", &vars()));
        assert!(valid_name_comparator("region__not_in", &vars()));
        assert!(!valid_name_comparator("regions__ne", &vars()));
        assert!(!valid_name_comparator("region__neq", &vars()));
        assert!(!valid_name_comparator("fruit", &vars()));
    }

    #[test]
    fn test_parse_bare_name_is_fixing_equality() {
        let f = Filter::parse("box", FilterValue::One("red".into()), &vars()).unwrap();
        assert_eq!(f.variable(), "box");
        assert_eq!(f.comparator(), Comparator::Eq);
        assert!(f.fixes_variable());
    }

    #[test]
    fn test_parse_suffix_keeps_variable() {
        let f = Filter::parse("region__ne", FilterValue::One(20.into()), &vars()).unwrap();
        assert_eq!(f.variable(), "region");
        assert_eq!(f.comparator(), Comparator::Ne);
        assert!(!f.fixes_variable());
    }

    #[test]
    fn test_parse_typo_fails() {
        let err = Filter::parse("region__nee", FilterValue::One(20.into()), &vars());
        assert!(matches!(err, Err(DiscreteError::InvalidFilter(_))));
    }

    #[test]
    fn test_matches_ordering() {
        let f = Filter::le("region", 5);
        assert!(f.matches(&5.into()));
        assert!(f.matches(&1.into()));
        assert!(!f.matches(&6.into()));
    }

    #[test]
    fn test_matches_membership() {
        let f = Filter::is_in("box", ["red", "green"]);
        assert!(f.matches(&"red".into()));
        assert!(!f.matches(&"blue".into()));
        let f = Filter::not_in("box", ["red"]);
        assert!(f.matches(&"blue".into()));
    }
}
