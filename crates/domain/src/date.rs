pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

// month: January -> 1
pub fn get_month_length(year: i32, month: u32) -> u32 {
    match month - 1 {
        0 => 31,
        1 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        2 => 31,
        3 => 30,
        4 => 31,
        5 => 30,
        6 => 31,
        7 => 31,
        8 => 30,
        9 => 31,
        10 => 30,
        11 => 31,
        _ => panic!("Invalid month"),
    }
}

/// The calendar month `n` months after the given one, as a `(year, month)`
/// pair with `month` in `1..=12`.
pub fn shift_months(year: i32, month: u32, n: u32) -> (i32, u32) {
    let months_since_epoch = year * 12 + (month as i32 - 1) + n as i32;
    (
        months_since_epoch.div_euclid(12),
        (months_since_epoch.rem_euclid(12) + 1) as u32,
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_computes_month_lengths() {
        assert_eq!(get_month_length(2024, 2), 29);
        assert_eq!(get_month_length(2023, 2), 28);
        assert_eq!(get_month_length(2000, 2), 29);
        assert_eq!(get_month_length(1900, 2), 28);
        assert_eq!(get_month_length(2024, 1), 31);
        assert_eq!(get_month_length(2024, 4), 30);
        assert_eq!(get_month_length(2024, 12), 31);
    }

    #[test]
    fn it_shifts_months_across_year_boundaries() {
        assert_eq!(shift_months(2024, 1, 1), (2024, 2));
        assert_eq!(shift_months(2024, 12, 1), (2025, 1));
        assert_eq!(shift_months(2024, 11, 3), (2025, 2));
        assert_eq!(shift_months(2024, 6, 24), (2026, 6));
        assert_eq!(shift_months(2024, 6, 0), (2024, 6));
    }
}
