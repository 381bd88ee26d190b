//! Text helpers for content streams
//!
//! Fonts are the standard Helvetica faces with WinAnsiEncoding, so text is
//! written as Latin-1 bytes. Turkish letters outside Latin-1 are mapped to
//! their closest ASCII letter.

use crate::constants::HELVETICA_CHAR_WIDTH_RATIO;

/// Resource name of the regular font
pub const FONT_REGULAR: &str = "F1";

/// Resource name of the bold font
pub const FONT_BOLD: &str = "F2";

/// Encode text as a PDF literal string, including the parentheses
pub fn pdf_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for ch in text.chars() {
        let ch = transliterate(ch);
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            c if (c as u32) >= 0xA0 && (c as u32) <= 0xFF => {
                out.push_str(&format!("\\{:03o}", c as u32));
            }
            _ => out.push('?'),
        }
    }
    out.push(')');
    out
}

/// Bytes of a document text string (Info entries). ASCII stays as is;
/// anything else is UTF-16BE with a byte order mark so viewers keep the
/// Turkish letters.
pub fn info_string(text: &str) -> Vec<u8> {
    if text.is_ascii() {
        return text.as_bytes().to_vec();
    }
    let mut out = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out
}

fn transliterate(ch: char) -> char {
    match ch {
        'ş' => 's',
        'Ş' => 'S',
        'ğ' => 'g',
        'Ğ' => 'G',
        'ı' => 'i',
        'İ' => 'I',
        '\n' | '\t' => ' ',
        other => other,
    }
}

/// Approximate rendered width of a string
pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * HELVETICA_CHAR_WIDTH_RATIO
}

/// Text drawn with its baseline starting at (x, y)
pub fn text_at(font: &str, size: f32, x: f32, y: f32, text: &str) -> String {
    format!(
        "BT /{} {} Tf {} {} Td {} Tj ET\n",
        font,
        size,
        x,
        y,
        pdf_string(text)
    )
}

/// Text centered horizontally on `center_x`
pub fn text_centered(font: &str, size: f32, center_x: f32, y: f32, text: &str) -> String {
    text_at(font, size, center_x - text_width(text, size) / 2.0, y, text)
}

/// Text ending at `right_x`
pub fn text_right(font: &str, size: f32, right_x: f32, y: f32, text: &str) -> String {
    text_at(font, size, right_x - text_width(text, size), y, text)
}

/// Text rotated by `degrees` around its starting point
pub fn text_rotated(font: &str, size: f32, x: f32, y: f32, degrees: f32, text: &str) -> String {
    let (sin, cos) = degrees.to_radians().sin_cos();
    format!(
        "BT /{} {} Tf {} {} {} {} {} {} Tm {} Tj ET\n",
        font,
        size,
        cos,
        sin,
        -sin,
        cos,
        x,
        y,
        pdf_string(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_string_escapes_delimiters() {
        assert_eq!(pdf_string("a(b)c\\"), "(a\\(b\\)c\\\\)");
    }

    #[test]
    fn test_pdf_string_latin1_and_turkish() {
        assert_eq!(pdf_string("ç"), "(\\347)");
        assert_eq!(pdf_string("ş"), "(s)");
        assert_eq!(pdf_string("İ"), "(I)");
        assert_eq!(pdf_string("😀"), "(?)");
    }

    #[test]
    fn test_info_string_utf16_for_turkish() {
        assert_eq!(info_string("Deneme"), b"Deneme".to_vec());
        assert_eq!(info_string("Şık"), vec![0xFE, 0xFF, 0x01, 0x5E, 0x01, 0x31, 0x00, 0x6B]);
    }
}
