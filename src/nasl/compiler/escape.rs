// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Decoding of escape sequences in string literals.

/// Decodes `\\ \' \" \a \b \f \n \r \t \0` and `\xHH`. Unknown escapes are
/// kept as they are.
pub fn decode(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut result = String::with_capacity(raw.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c != '\\' || i + 1 >= chars.len() {
            result.push(c);
            i += 1;
            continue;
        }
        let decoded = match chars[i + 1] {
            '\\' => Some('\\'),
            '\'' => Some('\''),
            '"' => Some('"'),
            'a' => Some('\u{07}'),
            'b' => Some('\u{08}'),
            'f' => Some('\u{0c}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            '0' => Some('\0'),
            'x' if i + 3 < chars.len() => {
                match (chars[i + 2].to_digit(16), chars[i + 3].to_digit(16)) {
                    (Some(high), Some(low)) => {
                        result.push(char::from((high * 16 + low) as u8));
                        i += 4;
                        continue;
                    }
                    _ => None,
                }
            }
            _ => None,
        };
        match decoded {
            Some(d) => {
                result.push(d);
                i += 2;
            }
            None => {
                result.push(c);
                i += 1;
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::decode;

    #[test]
    fn simple_escapes() {
        assert_eq!(decode(r"a\nb\tc"), "a\nb\tc");
        assert_eq!(decode(r#"\\ \' \""#), "\\ ' \"");
        assert_eq!(decode(r"\a\b\f\r\0"), "\u{07}\u{08}\u{0c}\r\0");
    }

    #[test]
    fn hex_escapes() {
        assert_eq!(decode(r"\x41"), "A");
        assert_eq!(decode(r"\x41\x42C"), "ABC");
        assert_eq!(decode(r"\xff"), "\u{ff}");
    }

    #[test]
    fn incomplete_or_invalid_hex_is_kept() {
        assert_eq!(decode(r"\x4"), r"\x4");
        assert_eq!(decode(r"\xzz"), r"\xzz");
        assert_eq!(decode(r"\x+1"), r"\x+1");
        assert_eq!(decode(r"\x-f"), r"\x-f");
    }

    #[test]
    fn unknown_escapes_are_kept() {
        assert_eq!(decode(r"\d\w"), r"\d\w");
        assert_eq!(decode("trailing\\"), "trailing\\");
    }
}
