//! Key ranges derived from decomposed filters, for index seeks.
//!
//! Ranges are pruning hints: a [`RangeSet`] derived for a column always covers
//! every value a matching row can hold, but may cover more. Scans still apply
//! the full filter to candidate rows.

use std::{cmp::Ordering, ops::Bound, sync::Arc};

use crate::{
    expr::{Expr, ScalarValue},
    filter::{self, Decomposer, Evaluator, FilterSet, ValidateError},
    observability::log_debug,
};

/// Key types that can be derived from scalar literals.
pub trait ScanKey: Ord + Clone {
    /// Converts a literal into the key type, or `None` when it does not map.
    fn from_scalar(value: &ScalarValue) -> Option<Self>;
}

impl ScanKey for i64 {
    fn from_scalar(value: &ScalarValue) -> Option<Self> {
        value.as_i64()
    }
}

impl ScanKey for u64 {
    fn from_scalar(value: &ScalarValue) -> Option<Self> {
        value.as_i64().and_then(|v| u64::try_from(v).ok())
    }
}

impl ScanKey for bool {
    fn from_scalar(value: &ScalarValue) -> Option<Self> {
        value.as_bool()
    }
}

impl ScanKey for String {
    fn from_scalar(value: &ScalarValue) -> Option<Self> {
        value.as_utf8().map(str::to_owned)
    }
}

impl ScanKey for Vec<u8> {
    fn from_scalar(value: &ScalarValue) -> Option<Self> {
        value.as_binary().map(<[u8]>::to_vec)
    }
}

/// A key range with owned bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyRange<K> {
    /// Start bound (inclusive/exclusive/unbounded).
    pub start: Bound<K>,
    /// End bound (inclusive/exclusive/unbounded).
    pub end: Bound<K>,
}

impl<K> KeyRange<K> {
    /// Create an unbounded range (all keys).
    pub fn all() -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Unbounded,
        }
    }

    /// Create a new range from explicit bounds.
    pub fn new(start: Bound<K>, end: Bound<K>) -> Self {
        Self { start, end }
    }
}

impl<K: Ord> KeyRange<K> {
    /// Whether this range contains `key`.
    pub fn contains(&self, key: &K) -> bool {
        let start_ok = match &self.start {
            Bound::Unbounded => true,
            Bound::Included(bound) => key >= bound,
            Bound::Excluded(bound) => key > bound,
        };
        start_ok
            && match &self.end {
                Bound::Unbounded => true,
                Bound::Included(bound) => key <= bound,
                Bound::Excluded(bound) => key < bound,
            }
    }

    /// Whether no key can fall inside this range.
    pub fn is_empty(&self) -> bool {
        is_empty_range(&self.start, &self.end)
    }
}

/// A normalized set of disjoint, sorted key ranges.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RangeSet<K> {
    ranges: Vec<KeyRange<K>>,
}

impl<K: Ord> RangeSet<K> {
    /// Create an empty range set (matches nothing).
    pub fn empty() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Create a set containing a single unbounded range (matches all keys).
    pub fn all() -> Self {
        Self {
            ranges: vec![KeyRange::all()],
        }
    }

    /// Construct from raw ranges: drop empty ones, sort, merge overlaps/adjacents.
    pub fn from_ranges(mut ranges: Vec<KeyRange<K>>) -> Self {
        ranges.retain(|range| !range.is_empty());
        ranges.sort_by(|a, b| cmp_lower(&a.start, &b.start));
        let mut out: Vec<KeyRange<K>> = Vec::with_capacity(ranges.len());
        for range in ranges {
            if let Some(last) = out.last_mut() {
                if overlaps_or_adjacent(&last.end, &range.start) {
                    let end = std::mem::replace(&mut last.end, Bound::Unbounded);
                    last.end = max_upper(end, range.end);
                    continue;
                }
            }
            out.push(range);
        }
        Self { ranges: out }
    }

    /// Whether the set has no ranges.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Whether the set covers the whole key domain.
    pub fn is_all(&self) -> bool {
        matches!(
            self.ranges.as_slice(),
            [KeyRange {
                start: Bound::Unbounded,
                end: Bound::Unbounded
            }]
        )
    }

    /// Borrow the underlying normalized ranges as a slice.
    pub fn as_slice(&self) -> &[KeyRange<K>] {
        &self.ranges
    }

    /// Whether the set contains `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.ranges.iter().any(|range| range.contains(key))
    }

    /// Union with another set, returning a normalized result.
    pub fn union(self, other: RangeSet<K>) -> RangeSet<K> {
        if self.ranges.is_empty() {
            return other;
        }
        if other.ranges.is_empty() {
            return self;
        }
        let mut all = self.ranges;
        all.extend(other.ranges);
        RangeSet::from_ranges(all)
    }

    /// Intersection with another set, returning a normalized result.
    pub fn intersect(self, other: RangeSet<K>) -> RangeSet<K>
    where
        K: Clone,
    {
        let mut res = Vec::new();
        for a in &self.ranges {
            for b in &other.ranges {
                let start = max_lower(a.start.clone(), b.start.clone());
                let end = min_upper(a.end.clone(), b.end.clone());
                res.push(KeyRange::new(start, end));
            }
        }
        RangeSet::from_ranges(res)
    }

    /// Complement of this set over the full key domain.
    pub fn complement(self) -> RangeSet<K>
    where
        K: Clone,
    {
        let mut gaps = Vec::new();
        // Start of the next gap; `None` once a range reaches +inf.
        let mut cursor = Some(Bound::Unbounded);
        for range in &self.ranges {
            let Some(start) = cursor.take() else {
                break;
            };
            if let Some(end) = invert(&range.start) {
                gaps.push(KeyRange::new(start, end));
            }
            cursor = invert(&range.end);
        }
        if let Some(start) = cursor {
            gaps.push(KeyRange::new(start, Bound::Unbounded));
        }
        RangeSet::from_ranges(gaps)
    }
}

impl FilterSet {
    /// Key ranges on `column` admitted by this set's bounds.
    ///
    /// Bounds whose endpoints are neither literals convertible to `K` nor the
    /// unbounded sentinel do not narrow the result.
    #[must_use]
    pub fn key_ranges<K: ScanKey>(&self, column: &str) -> RangeSet<K> {
        self.bounds(column)
            .iter()
            .fold(RangeSet::all(), |acc, bound| {
                acc.intersect(bound_ranges(bound, column))
            })
    }
}

/// Key ranges on `column` admitted by the disjunction of `sets`.
#[must_use]
pub fn key_ranges<K: ScanKey>(sets: &[FilterSet], column: &str) -> RangeSet<K> {
    sets.iter().fold(RangeSet::empty(), |acc, set| {
        acc.union(set.key_ranges(column))
    })
}

fn bound_ranges<K: ScanKey>(bound: &filter::Bound, column: &str) -> RangeSet<K> {
    let start = endpoint(&bound.min, column, bound.inclusive);
    let end = endpoint(&bound.max, column, bound.inclusive);
    match (start, end, bound.negated) {
        (Some(start), Some(end), true) => {
            RangeSet::from_ranges(vec![KeyRange::new(start, end)]).complement()
        }
        // Complementing a widened range would drop matching keys.
        (_, _, true) => RangeSet::all(),
        (start, end, false) => RangeSet::from_ranges(vec![KeyRange::new(
            start.unwrap_or(Bound::Unbounded),
            end.unwrap_or(Bound::Unbounded),
        )]),
    }
}

fn endpoint<K: ScanKey>(expr: &Expr, column: &str, inclusive: bool) -> Option<Bound<K>> {
    if filter::Bound::is_sentinel(expr, column) {
        return Some(Bound::Unbounded);
    }
    let key = K::from_scalar(expr.as_literal()?)?;
    Some(if inclusive {
        Bound::Included(key)
    } else {
        Bound::Excluded(key)
    })
}

/// Decomposed filter plus the key ranges it admits on one key column.
#[derive(Clone, Debug)]
pub struct ScanPlan<K> {
    filters: Vec<FilterSet>,
    key_column: Arc<str>,
    key_ranges: RangeSet<K>,
}

impl<K: ScanKey> ScanPlan<K> {
    /// Decomposes `expr` and derives key ranges on `key_column`.
    ///
    /// # Panics
    ///
    /// Panics on a malformed tree, see [`filter::decompose`].
    pub fn new<N>(decomposer: &Decomposer, expr: Option<&Expr>, key_column: N) -> Self
    where
        N: Into<Arc<str>>,
    {
        Self::from_filters(decomposer.decompose(expr), key_column.into())
    }

    /// Validates, decomposes `expr` and derives key ranges on `key_column`.
    pub fn try_new<N>(
        decomposer: &Decomposer,
        expr: Option<&Expr>,
        key_column: N,
    ) -> Result<Self, ValidateError>
    where
        N: Into<Arc<str>>,
    {
        let filters = decomposer.try_decompose(expr)?;
        Ok(Self::from_filters(filters, key_column.into()))
    }

    fn from_filters(filters: Vec<FilterSet>, key_column: Arc<str>) -> Self {
        let key_ranges: RangeSet<K> = key_ranges(&filters, &key_column);
        log_debug!(
            component = "scan",
            event = "scan_planned",
            key_column = %key_column,
            disjuncts = filters.len(),
            key_ranges = key_ranges.as_slice().len(),
            full_scan = key_ranges.is_all(),
        );
        Self {
            filters,
            key_column,
            key_ranges,
        }
    }

    /// Disjuncts of the decomposed filter.
    pub fn filters(&self) -> &[FilterSet] {
        &self.filters
    }

    /// Column the key ranges apply to.
    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    /// Key ranges covering every row that can match.
    pub fn key_ranges(&self) -> &RangeSet<K> {
        &self.key_ranges
    }

    /// Applies the full filter to `row`.
    pub fn matches<E>(&self, evaluator: &E, row: &E::Row) -> Result<bool, E::Error>
    where
        E: Evaluator + ?Sized,
    {
        filter::matches_any(&self.filters, evaluator, row)
    }
}

// Lower bounds: Unbounded < Included(x) < Excluded(x) < Included(y) when x < y.
fn cmp_lower<K: Ord>(a: &Bound<K>, b: &Bound<K>) -> Ordering {
    match (a, b) {
        (Bound::Unbounded, Bound::Unbounded) => Ordering::Equal,
        (Bound::Unbounded, _) => Ordering::Less,
        (_, Bound::Unbounded) => Ordering::Greater,
        (Bound::Included(x), Bound::Excluded(y)) => x.cmp(y).then(Ordering::Less),
        (Bound::Excluded(x), Bound::Included(y)) => x.cmp(y).then(Ordering::Greater),
        (Bound::Included(x) | Bound::Excluded(x), Bound::Included(y) | Bound::Excluded(y)) => {
            x.cmp(y)
        }
    }
}

// Upper bounds: Excluded(x) < Included(x) < Excluded(y) when x < y; Unbounded last.
fn cmp_upper<K: Ord>(a: &Bound<K>, b: &Bound<K>) -> Ordering {
    match (a, b) {
        (Bound::Unbounded, Bound::Unbounded) => Ordering::Equal,
        (Bound::Unbounded, _) => Ordering::Greater,
        (_, Bound::Unbounded) => Ordering::Less,
        (Bound::Included(x), Bound::Excluded(y)) => x.cmp(y).then(Ordering::Greater),
        (Bound::Excluded(x), Bound::Included(y)) => x.cmp(y).then(Ordering::Less),
        (Bound::Included(x) | Bound::Excluded(x), Bound::Included(y) | Bound::Excluded(y)) => {
            x.cmp(y)
        }
    }
}

fn max_lower<K: Ord>(a: Bound<K>, b: Bound<K>) -> Bound<K> {
    if cmp_lower(&a, &b) == Ordering::Greater {
        a
    } else {
        b
    }
}

fn min_upper<K: Ord>(a: Bound<K>, b: Bound<K>) -> Bound<K> {
    if cmp_upper(&a, &b) == Ordering::Less {
        a
    } else {
        b
    }
}

fn max_upper<K: Ord>(a: Bound<K>, b: Bound<K>) -> Bound<K> {
    if cmp_upper(&a, &b) == Ordering::Greater {
        a
    } else {
        b
    }
}

// Whether a range ending at `end` touches or overlaps one starting at `start`.
fn overlaps_or_adjacent<K: Ord>(end: &Bound<K>, start: &Bound<K>) -> bool {
    match (end, start) {
        (Bound::Excluded(x), Bound::Excluded(y)) => x > y,
        (Bound::Included(x) | Bound::Excluded(x), Bound::Included(y) | Bound::Excluded(y)) => {
            x >= y
        }
        _ => true,
    }
}

fn is_empty_range<K: Ord>(start: &Bound<K>, end: &Bound<K>) -> bool {
    match (start, end) {
        (Bound::Included(a), Bound::Included(b)) => a > b,
        (Bound::Included(a) | Bound::Excluded(a), Bound::Included(b) | Bound::Excluded(b)) => {
            a >= b
        }
        _ => false,
    }
}

// Bound on the other side of the same key; `None` for an unbounded side.
fn invert<K: Clone>(bound: &Bound<K>) -> Option<Bound<K>> {
    match bound {
        Bound::Unbounded => None,
        Bound::Included(key) => Some(Bound::Excluded(key.clone())),
        Bound::Excluded(key) => Some(Bound::Included(key.clone())),
    }
}
