//! Length, range and sign bounds shared by strings, numbers, temporal
//! values and containers.

use std::fmt::Display;

use sieve_core::{Issue, IssueKind};

/// Exact, minimum, maximum and non-empty length checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LengthBounds {
    pub(crate) exact: Option<usize>,
    pub(crate) min: Option<usize>,
    pub(crate) max: Option<usize>,
    pub(crate) non_empty: bool,
}

impl LengthBounds {
    /// First failing bound, checked as exact, min, max, non-empty.
    pub(crate) fn check(&self, len: usize, unit: &str) -> Option<Issue> {
        if let Some(n) = self.exact {
            if len != n {
                return Some(Issue::new(
                    IssueKind::LengthMismatch,
                    format!("expected exactly {n} {unit}, received {len}"),
                ));
            }
        }
        if let Some(n) = self.min {
            if len < n {
                return Some(Issue::constraint(format!(
                    "expected at least {n} {unit}, received {len}"
                )));
            }
        }
        if let Some(n) = self.max {
            if len > n {
                return Some(Issue::constraint(format!(
                    "expected at most {n} {unit}, received {len}"
                )));
            }
        }
        if self.non_empty && len == 0 {
            return Some(Issue::constraint("must not be empty"));
        }
        None
    }
}

/// Inclusive and exclusive bounds on an ordered value.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Range<N> {
    pub(crate) min: Option<N>,
    pub(crate) max: Option<N>,
    pub(crate) gt: Option<N>,
    pub(crate) lt: Option<N>,
}

impl<N> Default for Range<N> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            gt: None,
            lt: None,
        }
    }
}

impl<N: PartialOrd + Display> Range<N> {
    /// First failing bound, checked as min, max, gt, lt.
    pub(crate) fn check(&self, value: &N) -> Option<Issue> {
        if let Some(min) = &self.min {
            if value < min {
                return Some(Issue::constraint(format!("must be at least {min}")));
            }
        }
        if let Some(max) = &self.max {
            if value > max {
                return Some(Issue::constraint(format!("must be at most {max}")));
            }
        }
        if let Some(gt) = &self.gt {
            if value <= gt {
                return Some(Issue::constraint(format!("must be greater than {gt}")));
            }
        }
        if let Some(lt) = &self.lt {
            if value >= lt {
                return Some(Issue::constraint(format!("must be less than {lt}")));
            }
        }
        None
    }
}

/// Sign constraint on a numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sign {
    Positive,
    Negative,
    NonNegative,
    NonPositive,
}

impl Sign {
    /// Check a value given its ordering against zero.
    pub(crate) fn check(&self, vs_zero: std::cmp::Ordering) -> Option<Issue> {
        use std::cmp::Ordering::{Greater, Less};
        let (ok, message) = match self {
            Sign::Positive => (vs_zero == Greater, "must be positive"),
            Sign::Negative => (vs_zero == Less, "must be negative"),
            Sign::NonNegative => (vs_zero != Less, "must not be negative"),
            Sign::NonPositive => (vs_zero != Greater, "must not be positive"),
        };
        if ok {
            None
        } else {
            Some(Issue::constraint(message))
        }
    }
}
