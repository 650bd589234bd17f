/// Normalises a phone number to international format.
///
/// Numbers with 10 digits are assumed to be US / Canada numbers.
/// Returns `None` if the number can not be normalised.
pub fn format_phone_number(phone_number: &str) -> Option<String> {
    let digits: String = phone_number.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 11 && digits.starts_with('1') {
        return Some(format!("+{}", digits));
    }
    if digits.len() == 10 {
        return Some(format!("+1{}", digits));
    }
    if phone_number.starts_with('+') {
        return Some(phone_number.to_string());
    }
    if (7..=15).contains(&digits.len()) {
        return Some(format!("+{}", digits));
    }

    None
}
