//! Column splitting.
//!
//! Column `i` of a stream split at key length `k` holds every character at a
//! position congruent to `i` modulo `k`, in original order. Under a correct
//! `k` each column was enciphered with a single key letter.

/// Splits a stream into `k` columns.
///
/// `k = 0` is treated as `k = 1`, so the result always has at least one
/// column. Columns may be empty when `k` exceeds the stream length.
pub fn split_columns(stream: &str, k: usize) -> Vec<String> {
    let k = k.max(1);
    let mut columns = vec![String::with_capacity(stream.len() / k + 1); k];

    for (i, c) in stream.chars().enumerate() {
        columns[i % k].push(c);
    }

    columns
}

/// Reassembles columns round-robin; the inverse of [`split_columns`].
///
/// Stops at the first column that has run out of characters, which is where
/// the original stream ended.
pub fn interleave_columns<S: AsRef<str>>(columns: &[S]) -> String {
    let total: usize = columns.iter().map(|c| c.as_ref().len()).sum();
    let mut iters: Vec<_> = columns.iter().map(|c| c.as_ref().chars()).collect();
    let mut stream = String::with_capacity(total);

    if iters.is_empty() {
        return stream;
    }

    'outer: loop {
        for it in iters.iter_mut() {
            match it.next() {
                Some(c) => stream.push(c),
                None => break 'outer,
            }
        }
    }

    stream
}
