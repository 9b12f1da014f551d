use crate::types::Cost;

pub(crate) const INVALID_NODE: usize = usize::MAX;
pub(crate) const INVALID_LINK: usize = usize::MAX;
pub(crate) const MAX_COST: Cost = f64::INFINITY;

/// Number of settled nodes between two polls of the cancellation flag.
pub(crate) const CANCELLATION_CHECK_INTERVAL: usize = 4096;

pub(crate) const AB_SUFFIX: &str = "_ab";
pub(crate) const BA_SUFFIX: &str = "_ba";
