//! Value ordering used by the table view.
//!
//! The table sorts with a comparator that never reports two values as equal:
//! ascending is `a < b ? Less : Greater` and descending is
//! `a > b ? Less : Greater`. Such a comparator is not a total order, so the
//! standard library sorts are not used. [`sort_with`] is a run-detecting
//! binary insertion sort that gives a deterministic result for any
//! comparator.

use crate::table::SortDirection;
use serde_json::Value;
use std::cmp::Ordering;

/// Natural ordering of two field values.
///
/// Numbers compare numerically, strings by UTF-16 code units, booleans with
/// `false < true`. Any other pairing (mixed types, nulls, missing fields,
/// arrays, objects) is unordered.
pub fn natural_cmp(a: Option<&Value>, b: Option<&Value>) -> Option<Ordering> {
    match (a?, b?) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.encode_utf16().cmp(y.encode_utf16())),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// `a < b` under [`natural_cmp`].
pub fn value_lt(a: Option<&Value>, b: Option<&Value>) -> bool {
    natural_cmp(a, b) == Some(Ordering::Less)
}

/// `a > b` under [`natural_cmp`].
pub fn value_gt(a: Option<&Value>, b: Option<&Value>) -> bool {
    natural_cmp(a, b) == Some(Ordering::Greater)
}

/// The table comparator. Equal or unordered values yield `Greater`.
pub fn column_cmp(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    let first = match direction {
        SortDirection::Ascending => value_lt(a, b),
        SortDirection::Descending => value_gt(a, b),
    };
    if first {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// Sorts `items` in place with an arbitrary comparator.
///
/// The leading run is detected first (a strictly descending run is reversed),
/// then every remaining element is binary-inserted after all elements it does
/// not compare `Less` to. With [`column_cmp`] this keeps equal values in
/// their original relative order.
pub fn sort_with<T, F>(items: &mut [T], mut cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = items.len();
    if len < 2 {
        return;
    }

    let descending = cmp(&items[1], &items[0]) == Ordering::Less;
    let mut run = 2;
    while run < len {
        let order = cmp(&items[run], &items[run - 1]);
        let continues = if descending {
            order == Ordering::Less
        } else {
            order != Ordering::Less
        };
        if !continues {
            break;
        }
        run += 1;
    }
    if descending {
        items[..run].reverse();
    }

    for i in run..len {
        let (mut left, mut right) = (0, i);
        while left < right {
            let mid = left + (right - left) / 2;
            if cmp(&items[i], &items[mid]) == Ordering::Less {
                right = mid;
            } else {
                left = mid + 1;
            }
        }
        items[left..=i].rotate_right(1);
    }
}
