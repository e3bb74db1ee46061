use std::collections::HashMap;

/// Normalizes a business key for comparison: trim, then case-fold.
/// `"001 "` and `"001"`, `"A01"` and `"a01"` all collide.
pub fn normalize_number(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Returns the normalized business keys that occur more than once, in
/// order of first appearance. Empty numbers never count as duplicates;
/// missing numbers are a validation problem, not a collision.
pub fn duplicate_keys<'a, I>(numbers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, u32> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for raw in numbers {
        let key = normalize_number(raw);
        if key.is_empty() {
            continue;
        }
        let count = counts.entry(key.clone()).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(key);
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_space_and_case_fold_collide() {
        let dups = duplicate_keys(["001", "001 ", "A01", "a01", "777"]);
        assert_eq!(dups, vec!["001".to_string(), "a01".to_string()]);
    }

    #[test]
    fn unique_numbers_are_clean() {
        assert!(duplicate_keys(["1/24", "2/24", "3/24"]).is_empty());
    }

    #[test]
    fn empty_numbers_are_not_collisions() {
        assert!(duplicate_keys(["", "  ", ""]).is_empty());
    }

    #[test]
    fn triplicates_reported_once() {
        assert_eq!(duplicate_keys(["9", "9", "9"]), vec!["9".to_string()]);
    }
}
