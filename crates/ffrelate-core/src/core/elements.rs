use phf::{Map, phf_map};
use std::num::NonZeroU8;

static PROTON_COUNTS: Map<&'static str, u8> = phf_map! {
    "H" => 1, "D" => 1, "HE" => 2,
    "LI" => 3, "BE" => 4, "B" => 5, "C" => 6, "N" => 7, "O" => 8, "F" => 9, "NE" => 10,
    "NA" => 11, "MG" => 12, "AL" => 13, "SI" => 14, "P" => 15, "S" => 16, "CL" => 17, "AR" => 18,
    "K" => 19, "CA" => 20, "SC" => 21, "TI" => 22, "V" => 23, "CR" => 24, "MN" => 25,
    "FE" => 26, "CO" => 27, "NI" => 28, "CU" => 29, "ZN" => 30, "GA" => 31, "GE" => 32,
    "AS" => 33, "SE" => 34, "BR" => 35, "KR" => 36,
    "RB" => 37, "SR" => 38, "Y" => 39, "ZR" => 40, "NB" => 41, "MO" => 42, "TC" => 43,
    "RU" => 44, "RH" => 45, "PD" => 46, "AG" => 47, "CD" => 48, "IN" => 49, "SN" => 50,
    "SB" => 51, "TE" => 52, "I" => 53, "XE" => 54,
    "CS" => 55, "BA" => 56, "PT" => 78, "AU" => 79, "HG" => 80, "PB" => 82, "U" => 92,
};

/// Returns the proton count for an element symbol, ignoring case and
/// surrounding whitespace.
pub fn proton_count(symbol: &str) -> Option<NonZeroU8> {
    let key = symbol.trim().to_ascii_uppercase();
    PROTON_COUNTS.get(key.as_str()).copied().and_then(NonZeroU8::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_organic_elements_are_known() {
        assert_eq!(proton_count("C").map(NonZeroU8::get), Some(6));
        assert_eq!(proton_count("N").map(NonZeroU8::get), Some(7));
        assert_eq!(proton_count("O").map(NonZeroU8::get), Some(8));
        assert_eq!(proton_count("S").map(NonZeroU8::get), Some(16));
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        assert_eq!(proton_count(" cl ").map(NonZeroU8::get), Some(17));
        assert_eq!(proton_count("Fe").map(NonZeroU8::get), Some(26));
    }

    #[test]
    fn unknown_symbols_yield_none() {
        assert_eq!(proton_count("XX"), None);
        assert_eq!(proton_count(""), None);
    }
}
