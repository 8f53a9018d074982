use shared::domain::Employee;

/// Number of records revealed per advance of the visible window.
pub const CHUNK_SIZE: usize = 100;

/// Slice of the dataset that should be appended next, given how many records
/// are already visible. Stateless and idempotent: the same inputs always
/// yield the same slice.
pub fn next_chunk(visible_count: usize, all_data: &[Employee]) -> &[Employee] {
    next_chunk_with_size(visible_count, all_data, CHUNK_SIZE)
}

pub fn next_chunk_with_size(
    visible_count: usize,
    all_data: &[Employee],
    chunk_size: usize,
) -> &[Employee] {
    if chunk_size == 0 || visible_count >= all_data.len() {
        return &[];
    }
    // A partial final chunk leaves visible_count inside the last chunk
    // index, so exhaustion must be checked before the index math.
    let chunk_index = visible_count / chunk_size;
    let start = chunk_index * chunk_size;
    if start >= all_data.len() {
        return &[];
    }
    let end = (start + chunk_size).min(all_data.len());
    &all_data[start..end]
}

/// Whether an advance can still reveal anything. Callers should stop
/// observing the sentinel once this turns false.
pub fn has_more(visible_count: usize, total: usize) -> bool {
    visible_count < total
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
