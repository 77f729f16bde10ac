/// Formats an amount as US dollars with thousands separators.
///
/// ```rust
/// use pquote::format_currency;
///
/// assert_eq!(format_currency(1237.0), "$1,237.00");
/// assert_eq!(format_currency(8.99), "$8.99");
/// ```
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (index, digit) in dollars.chars().enumerate() {
        if index > 0 && (dollars.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}
