//! Outbound links: `mailto:` and `wa.me`
//!
//! Nothing is sent from here; the toolkit prints links the user opens in a
//! mail client or WhatsApp. Message bodies come from [`templates`].

pub mod templates;

/// Percent-encode a URL component
///
/// Unreserved characters (`A-Z a-z 0-9 - _ . ~`) pass through, every other
/// UTF-8 byte becomes `%XX`. Spaces are `%20`, which both mail clients and
/// wa.me accept.
pub fn percent_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char)
            }
            _ => result.push_str(&format!("%{:02X}", byte)),
        }
    }
    result
}

/// Decode a percent-encoded component; `+` is read as a space
///
/// Malformed escapes are kept literally. Returns `None` when the decoded
/// bytes are not UTF-8.
pub fn percent_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }

    String::from_utf8(out).ok()
}

/// Reduce a phone number to digits in international form
///
/// A leading `0` (local trunk prefix) is replaced by `country_code`.
pub fn normalize_phone(phone: &str, country_code: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    match digits.strip_prefix('0') {
        Some(rest) => format!("{}{}", country_code, rest),
        None => digits,
    }
}

/// Format an amount with thousands separators in Indonesian style
///
/// `format_money(3100.0, "Rp")` is `Rp 3.100`; a fractional part is kept
/// as two decimals after a comma.
pub fn format_money(amount: f64, currency: &str) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if frac > 0 {
        grouped.push_str(&format!(",{:02}", frac));
    }

    let sign = if negative { "-" } else { "" };
    if currency.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{} {}", sign, currency, grouped)
    }
}

/// `mailto:` link with subject and body
pub fn mailto_link(email: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        email.trim(),
        percent_encode(subject),
        percent_encode(body)
    )
}

/// `https://wa.me/` link with a prefilled message
pub fn whatsapp_link(phone: &str, country_code: &str, text: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        normalize_phone(phone, country_code),
        percent_encode(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_encode_unreserved_untouched() {
        assert_eq!(percent_encode("Abc-1_2.3~"), "Abc-1_2.3~");
    }

    #[test]
    fn test_percent_encode_reserved_and_space() {
        assert_eq!(percent_encode("a b&c=d?"), "a%20b%26c%3Dd%3F");
        assert_eq!(percent_encode("{\"q\":1}"), "%7B%22q%22%3A1%7D");
    }

    #[test]
    fn test_percent_encode_multibyte_per_byte() {
        assert_eq!(percent_encode("é"), "%C3%A9");
        assert_eq!(percent_encode("✓"), "%E2%9C%93");
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("a%20b+c").unwrap(), "a b c");
        assert_eq!(percent_decode("%C3%A9").unwrap(), "é");
        assert_eq!(percent_decode("100%").unwrap(), "100%");
        assert_eq!(percent_decode("%zz").unwrap(), "%zz");
        assert!(percent_decode("%FF").is_none());
    }

    #[test]
    fn test_decode_inverts_encode() {
        let text = "Pesanan: Indomie Goreng x100 @ Rp 3.100 ✓";
        assert_eq!(percent_decode(&percent_encode(text)).unwrap(), text);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(3100.0, "Rp"), "Rp 3.100");
        assert_eq!(format_money(18_500_000.0, "Rp"), "Rp 18.500.000");
        assert_eq!(format_money(999.0, "Rp"), "Rp 999");
        assert_eq!(format_money(0.0, "Rp"), "Rp 0");
        assert_eq!(format_money(1234.5, ""), "1.234,50");
        assert_eq!(format_money(-2500.0, "Rp"), "-Rp 2.500");
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("0812-3456-7890", "62"), "6281234567890");
        assert_eq!(normalize_phone("+62 812 3456 7890", "62"), "6281234567890");
        assert_eq!(normalize_phone("(021) 555 0101", "62"), "62215550101");
    }

    #[test]
    fn test_mailto_link() {
        let link = mailto_link(" sales@sumberpangan.co.id ", "PO 1", "Halo,\nTerima kasih");
        assert_eq!(
            link,
            "mailto:sales@sumberpangan.co.id?subject=PO%201&body=Halo%2C%0ATerima%20kasih"
        );
    }

    #[test]
    fn test_whatsapp_link() {
        let link = whatsapp_link("081234567890", "62", "Halo Bu Sari");
        assert_eq!(link, "https://wa.me/6281234567890?text=Halo%20Bu%20Sari");
    }
}
