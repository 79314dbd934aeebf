//! Mapping glyph names to file names.
//!
//! This follows the UFO 3 [user name to file name conversion][conv], which is
//! case-insensitive file system safe: uppercase characters are marked with a
//! trailing underscore.
//!
//! [conv]: https://unifiedfontobject.org/versions/ufo3/conventions/#common-user-name-to-file-name-algorithm

const MAX_FILE_NAME_LENGTH: usize = 255;

const RESERVED_NAMES: &[&str] = &[
    "con", "prn", "aux", "clock$", "nul", "com1", "com2", "com3", "com4", "lpt1", "lpt2", "lpt3",
];

fn is_illegal(c: char) -> bool {
    matches!(
        c,
        '"' | '*' | '+' | '/' | ':' | '<' | '>' | '?' | '[' | '\\' | ']' | '|' | '\0'..='\x1f' | '\x7f'
    )
}

fn is_uppercase(c: char) -> bool {
    let mut lower = c.to_lowercase();
    !(lower.next() == Some(c) && lower.next().is_none())
}

/// Convert a glyph name to the file name its source is stored under.
///
/// `suffix` is appended to the result and counts toward the maximum file
/// name length.
pub fn user_name_to_file_name(name: &str, suffix: &str) -> String {
    let mut filtered = String::with_capacity(name.len() + suffix.len());
    for (ix, c) in name.chars().enumerate() {
        if ix == 0 && c == '.' {
            filtered.push('_');
        } else if is_illegal(c) {
            filtered.push('_');
        } else {
            filtered.push(c);
            if is_uppercase(c) {
                filtered.push('_');
            }
        }
    }

    let max_len = MAX_FILE_NAME_LENGTH.saturating_sub(suffix.chars().count());
    let truncated: String = filtered.chars().take(max_len).collect();

    let mut result = truncated
        .split('.')
        .map(|part| {
            if RESERVED_NAMES.contains(&part.to_lowercase().as_str()) {
                format!("_{part}")
            } else {
                part.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(".");
    result.push_str(suffix);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(name: &str) -> String {
        user_name_to_file_name(name, ".glif")
    }

    // cases from the UFO 3 conventions
    #[test]
    fn ufo_conventions() {
        assert_eq!(convert("a"), "a.glif");
        assert_eq!(convert("A"), "A_.glif");
        assert_eq!(convert("AE"), "A_E_.glif");
        assert_eq!(convert("Ae"), "A_e.glif");
        assert_eq!(convert("ae"), "ae.glif");
        assert_eq!(convert("aE"), "aE_.glif");
        assert_eq!(convert("a.alt"), "a.alt.glif");
        assert_eq!(convert("A.alt"), "A_.alt.glif");
        assert_eq!(convert("A.Alt"), "A_.A_lt.glif");
        assert_eq!(convert("T_H"), "T__H_.glif");
        assert_eq!(convert("T_h"), "T__h.glif");
        assert_eq!(convert("t_h"), "t_h.glif");
        assert_eq!(convert("F_F_I"), "F__F__I_.glif");
        assert_eq!(convert("f_f_i"), "f_f_i.glif");
        assert_eq!(convert("Aacute_V.swash"), "A_acute_V_.swash.glif");
        assert_eq!(convert(".notdef"), "_notdef.glif");
        assert_eq!(convert("con"), "_con.glif");
        assert_eq!(convert("CON"), "C_O_N_.glif");
        assert_eq!(convert("con.alt"), "_con.alt.glif");
        assert_eq!(convert("alt.con"), "alt._con.glif");
    }

    #[test]
    fn illegal_characters() {
        assert_eq!(convert("a/b"), "a_b.glif");
        assert_eq!(convert("a|b*c?"), "a_b_c_.glif");
        assert_eq!(convert("tab\tname"), "tab_name.glif");
    }

    #[test]
    fn cjk_names_pass_through() {
        assert_eq!(convert("uni4E00"), "uni4E_00.glif");
        assert_eq!(convert("一"), "一.glif");
    }

    #[test]
    fn long_names_are_truncated() {
        let name = "a".repeat(300);
        let file_name = convert(&name);
        assert_eq!(file_name.chars().count(), MAX_FILE_NAME_LENGTH);
        assert!(file_name.ends_with(".glif"));
    }
}
