// src/report/counter.rs

//! Implements [`PrefixMatchingCounter`], the grouping and counting
//! primitive for HTTP verbs, status codes, and request paths.
//!
//! A value is counted under the _first_ configured key that is a prefix of
//! the value. Configured key order is the priority order, so given keys
//! `["/docs/api", "/docs"]` the value `"/docs/api/v1"` is counted under
//! `"/docs/api"`, while given keys `["/docs", "/docs/api"]` the same value
//! is counted under `"/docs"`.
//!
//! If no keys are configured then each distinct value becomes its own
//! group, in first-seen order.

use crate::common::Count;

use std::collections::HashMap;
use std::fmt;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Display string of [`GroupKey::Unmatched`].
pub const UNMATCHED_STR: &str = "(other)";

/// The key of a group of a [`PrefixMatchingCounter`].
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum GroupKey {
    /// A configured key, or an auto-vivified exact value.
    Key(String),
    /// Values for which no configured key is a prefix.
    Unmatched,
}

impl GroupKey {
    /// Returns `true` if this is [`GroupKey::Unmatched`].
    #[inline(always)]
    pub const fn is_unmatched(&self) -> bool {
        matches!(*self, GroupKey::Unmatched)
    }

    pub fn as_str(&self) -> &str {
        match self {
            GroupKey::Key(key) => key.as_str(),
            GroupKey::Unmatched => UNMATCHED_STR,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where [`PrefixMatchingCounter::record`] counted a value.
///
/// A `GroupIndex` is only meaningful to the counter that returned it, or to
/// another counter created with the same keys.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GroupIndex {
    /// Index of the group in [`PrefixMatchingCounter::counts`] order.
    Group(usize),
    Unmatched,
}

/// Ordered, prefix-based grouping counter.
///
/// Invariant: the sum of all group counts, including the unmatched count,
/// equals the number of calls to [`record`].
///
/// Each `record` is a linear scan of the configured keys. Key lists are
/// short and the first match must win, not the longest match.
///
/// [`record`]: PrefixMatchingCounter::record
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrefixMatchingCounter {
    /// group keys and counts; configured order, or first-seen order if
    /// `auto`
    groups: Vec<(String, Count)>,
    /// lookup of `groups` index by key, only used if `auto`
    auto_index: HashMap<String, usize>,
    /// no keys were configured, group by exact value
    auto: bool,
    /// count of values matching no configured key
    unmatched: Count,
}

impl PrefixMatchingCounter {
    /// Create a new `PrefixMatchingCounter` with `keys` in priority order.
    ///
    /// A repeated key is ignored; the first occurrence already matches every
    /// value the repeat would.
    /// No `keys` means "group by exact value".
    pub fn new<I, S>(keys: I) -> PrefixMatchingCounter
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut groups: Vec<(String, Count)> = Vec::new();
        for key in keys.into_iter() {
            let key: String = key.into();
            if groups
                .iter()
                .any(|(key_, _)| key_ == &key)
            {
                defñ!("ignore repeated key {:?}", key);
                continue;
            }
            groups.push((key, 0));
        }
        let auto: bool = groups.is_empty();
        defñ!("keys {:?}, auto {}", groups, auto);

        PrefixMatchingCounter {
            groups,
            auto_index: HashMap::new(),
            auto,
            unmatched: 0,
        }
    }

    /// Find the group for `value` without counting it.
    ///
    /// In "group by exact value" mode a value never seen before returns
    /// `None`.
    pub fn find(
        &self,
        value: &str,
    ) -> Option<GroupIndex> {
        if self.auto {
            return self
                .auto_index
                .get(value)
                .map(|index| GroupIndex::Group(*index));
        }
        for (index, (key, _count)) in self.groups.iter().enumerate() {
            if value.starts_with(key.as_str()) {
                return Some(GroupIndex::Group(index));
            }
        }

        Some(GroupIndex::Unmatched)
    }

    /// Count `value` under the first configured key that is a prefix of
    /// `value`, or under the unmatched group.
    ///
    /// In "group by exact value" mode, count `value` under itself.
    pub fn record(
        &mut self,
        value: &str,
    ) -> GroupIndex {
        let groupindex: GroupIndex = match self.find(value) {
            Some(groupindex) => groupindex,
            None => {
                // first sighting of an exact value
                let index: usize = self.groups.len();
                self.groups.push((String::from(value), 0));
                self.auto_index.insert(String::from(value), index);

                GroupIndex::Group(index)
            }
        };
        match groupindex {
            GroupIndex::Group(index) => self.groups[index].1 += 1,
            GroupIndex::Unmatched => self.unmatched += 1,
        }

        groupindex
    }

    /// The [`GroupKey`] of a [`GroupIndex`] returned by this counter.
    ///
    /// `None` if `groupindex` is not a group of this counter.
    pub fn key(
        &self,
        groupindex: GroupIndex,
    ) -> Option<GroupKey> {
        match groupindex {
            GroupIndex::Group(index) => self
                .groups
                .get(index)
                .map(|(key, _count)| GroupKey::Key(key.clone())),
            GroupIndex::Unmatched => Some(GroupKey::Unmatched),
        }
    }

    /// Count for the group with `key`. Unknown keys have count 0.
    pub fn get(
        &self,
        key: &str,
    ) -> Count {
        match self
            .groups
            .iter()
            .find(|(key_, _)| key_ == key)
        {
            Some((_, count)) => *count,
            None => 0,
        }
    }

    /// Count of values matching no configured key.
    pub const fn unmatched(&self) -> Count {
        self.unmatched
    }

    /// Sum of all counts, i.e. the number of calls to `record`.
    pub fn total(&self) -> Count {
        self.groups
            .iter()
            .map(|(_, count)| count)
            .sum::<Count>()
            + self.unmatched
    }

    /// No keys were configured; values are grouped by exact value.
    pub const fn is_auto(&self) -> bool {
        self.auto
    }

    /// Ordered view of `(key, count)`.
    ///
    /// Groups are in configured order (including groups with count 0), or
    /// first-seen order if no keys were configured.
    /// Followed by the unmatched group if its count is not 0.
    pub fn counts(&self) -> Vec<(GroupKey, Count)> {
        let mut counts: Vec<(GroupKey, Count)> = self
            .groups
            .iter()
            .map(|(key, count)| (GroupKey::Key(key.clone()), *count))
            .collect();
        if self.unmatched != 0 {
            counts.push((GroupKey::Unmatched, self.unmatched));
        }

        counts
    }
}
