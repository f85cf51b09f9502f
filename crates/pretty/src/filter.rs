//! User hooks deciding whether an event, or only its body, gets printed.
//!
//! A [`Filter`] runs once per print, before anything is extracted from the
//! event. Returning `Ok(true)` skips the whole event: not a single byte is
//! written for it. Returning an error replaces the event with one error line
//! (`> error: <msg>` or `< error: <msg>`).
//!
//! A [`BodyFilter`] only vetoes the body of an event whose start line and
//! headers are printed as usual.
//!
//! # Examples
//!
//! ```
//! use micro_pretty::filter::{any_filter, fn_filter, path_prefix_filter};
//!
//! // skip health checks and anything sent to the metrics endpoint
//! let mut filter = any_filter();
//! filter.or(path_prefix_filter("/health")).or(fn_filter(|event| {
//!     Ok(event.host().is_some_and(|host| host.starts_with("metrics.")))
//! }));
//! ```

use std::error::Error;

use thiserror::Error;

use crate::event::TraceEvent;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("{reason}")]
    Custom { reason: String },

    #[error(transparent)]
    Other(#[from] Box<dyn Error + Send + Sync>),
}

impl FilterError {
    pub fn custom<S: ToString>(str: S) -> Self {
        Self::Custom { reason: str.to_string() }
    }
}

/// Decides whether an event is printed at all.
pub trait Filter: Send + Sync {
    /// Returns `Ok(true)` when the event must be skipped.
    fn filter(&self, event: &TraceEvent<'_>) -> Result<bool, FilterError>;
}

/// Decides whether the body of an event is printed.
pub trait BodyFilter: Send + Sync {
    /// Returns `Ok(true)` when the body must be omitted.
    fn skip_body(&self, event: &TraceEvent<'_>) -> Result<bool, FilterError>;
}

struct FnFilter<F>(F);

impl<F> Filter for FnFilter<F>
where
    F: Fn(&TraceEvent<'_>) -> Result<bool, FilterError> + Send + Sync,
{
    #[inline]
    fn filter(&self, event: &TraceEvent<'_>) -> Result<bool, FilterError> {
        (self.0)(event)
    }
}

/// Creates a [`Filter`] from a closure.
pub fn fn_filter<F>(f: F) -> impl Filter
where
    F: Fn(&TraceEvent<'_>) -> Result<bool, FilterError> + Send + Sync,
{
    FnFilter(f)
}

struct FnBodyFilter<F>(F);

impl<F> BodyFilter for FnBodyFilter<F>
where
    F: Fn(&TraceEvent<'_>) -> Result<bool, FilterError> + Send + Sync,
{
    #[inline]
    fn skip_body(&self, event: &TraceEvent<'_>) -> Result<bool, FilterError> {
        (self.0)(event)
    }
}

/// Creates a [`BodyFilter`] from a closure.
pub fn fn_body_filter<F>(f: F) -> impl BodyFilter
where
    F: Fn(&TraceEvent<'_>) -> Result<bool, FilterError> + Send + Sync,
{
    FnBodyFilter(f)
}

/// Skips requests whose path starts with the given prefix.
///
/// Responses are never skipped by this filter.
#[derive(Debug, Clone)]
pub struct PathPrefixFilter(String);

impl Filter for PathPrefixFilter {
    fn filter(&self, event: &TraceEvent<'_>) -> Result<bool, FilterError> {
        Ok(event.uri().is_some_and(|uri| uri.path().starts_with(self.0.as_str())))
    }
}

pub fn path_prefix_filter<S: Into<String>>(prefix: S) -> PathPrefixFilter {
    PathPrefixFilter(prefix.into())
}

pub fn any_filter() -> AnyFilter {
    AnyFilter::new()
}

/// compose filters with *OR* logic: the event is skipped as soon as one inner filter skips it.
///
/// Inner filters run in insertion order and the first error stops the evaluation.
pub struct AnyFilter {
    filters: Vec<Box<dyn Filter>>,
}

impl AnyFilter {
    fn new() -> Self {
        Self { filters: vec![] }
    }

    pub fn or<F: Filter + 'static>(&mut self, filter: F) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl Filter for AnyFilter {
    fn filter(&self, event: &TraceEvent<'_>) -> Result<bool, FilterError> {
        for filter in &self.filters {
            if filter.filter(event)? {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

impl std::fmt::Debug for AnyFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyFilter").field("filters", &self.filters.len()).finish()
    }
}
