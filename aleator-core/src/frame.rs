//! Labeled 2-D sample tables
//!
//! A `SampleFrame` is an ordered set of equally-long labeled columns,
//! one per component of a multivariate draw. Row alignment is positional.

use crate::{AleatorError, Samples};
use serde::{Deserialize, Serialize};

/// An ordered collection of equally-long labeled sample columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleFrame {
    columns: Vec<Samples>,
}

impl SampleFrame {
    /// Build a frame from columns, which must all share one length.
    pub fn new(columns: Vec<Samples>) -> Result<Self, AleatorError> {
        if let Some(first) = columns.first() {
            for column in &columns[1..] {
                if column.len() != first.len() {
                    return Err(AleatorError::LengthMismatch {
                        left: first.len(),
                        right: column.len(),
                    });
                }
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Samples] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Samples> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.len())
    }

    /// Apply `f` to every column, producing a same-shaped frame.
    ///
    /// `f` must preserve column length; the constructor re-checks.
    pub fn map_columns(
        &self,
        f: impl Fn(&Samples) -> Samples,
    ) -> Result<SampleFrame, AleatorError> {
        SampleFrame::new(self.columns.iter().map(f).collect())
    }

    /// Fallible variant of [`map_columns`](Self::map_columns).
    pub fn try_map_columns(
        &self,
        f: impl Fn(&Samples) -> Result<Samples, AleatorError>,
    ) -> Result<SampleFrame, AleatorError> {
        let columns = self
            .columns
            .iter()
            .map(f)
            .collect::<Result<Vec<_>, _>>()?;
        SampleFrame::new(columns)
    }

    /// Row-wise sum across all columns, labeled `name`.
    pub fn sum_rows(&self, name: impl Into<String>) -> Samples {
        let mut totals = vec![0.0; self.num_rows()];
        for column in &self.columns {
            for (total, &v) in totals.iter_mut().zip(column.values()) {
                *total += v;
            }
        }
        Samples::new(name, totals)
    }
}
