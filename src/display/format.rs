// Text formatting for the status line and the details panel.

/// Seconds as `m:ss`; minutes are not wrapped into hours
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Whole dollars with thousands separators, e.g. `$185,500`
pub fn format_price(dollars: u64) -> String {
    format!("${}", group_thousands(dollars))
}

pub fn format_mileage(miles: u64) -> String {
    format!("{} miles", group_thousands(miles))
}

/// Insert a comma every three digits from the right
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(9), "0:09");
        assert_eq!(format_time(90), "1:30");
        assert_eq!(format_time(180), "3:00");
        assert_eq!(format_time(3_725), "62:05");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0), "$0");
        assert_eq!(format_price(999), "$999");
        assert_eq!(format_price(185_500), "$185,500");
        assert_eq!(format_price(1_225_400), "$1,225,400");
    }

    #[test]
    fn test_format_mileage() {
        assert_eq!(format_mileage(450), "450 miles");
        assert_eq!(format_mileage(1_200), "1,200 miles");
    }
}
