//! Limiting magnitude per Bortle sky-darkness class.

/// Limit used for any class outside 1..=9 (inner-city sky).
pub const BRIGHTEST_SKY_LIMIT: f64 = 9.5;

/// Faintest apparent magnitude considered visible under a Bortle class.
///
/// Unmapped classes fall back to the class-9 limit.
pub fn limiting_magnitude(bortle: u8) -> f64 {
    match bortle {
        1 | 2 => 15.5,
        3 | 4 => 14.5,
        5 => 13.5,
        6 => 12.5,
        7 => 11.5,
        8 => 10.5,
        _ => BRIGHTEST_SKY_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_values() {
        let expected = [15.5, 15.5, 14.5, 14.5, 13.5, 12.5, 11.5, 10.5, 9.5];
        for (class, limit) in (1u8..=9).zip(expected) {
            assert_eq!(limiting_magnitude(class), limit, "class {class}");
        }
    }

    #[test]
    fn test_unmapped_classes_use_class_nine_limit() {
        assert_eq!(limiting_magnitude(0), BRIGHTEST_SKY_LIMIT);
        assert_eq!(limiting_magnitude(10), BRIGHTEST_SKY_LIMIT);
        assert_eq!(limiting_magnitude(255), BRIGHTEST_SKY_LIMIT);
    }

    #[test]
    fn test_non_increasing_with_class() {
        for class in 1u8..9 {
            assert!(limiting_magnitude(class) >= limiting_magnitude(class + 1));
        }
    }
}
