//! Indonesian spelled-out amounts ("terbilang") for printed invoices.
//!
//! The number is split into groups of three digits from the right; each
//! non-zero group is spelled out and followed by its scale word.

const ONES: [&str; 10] = [
    "", "satu", "dua", "tiga", "empat", "lima", "enam", "tujuh", "delapan", "sembilan",
];

const SCALES: [&str; 7] = ["", "ribu", "juta", "miliar", "triliun", "kuadriliun", "kuintiliun"];

fn push_below_hundred(words: &mut Vec<&'static str>, value: usize) {
    match value {
        0 => {}
        1..=9 => words.push(ONES[value]),
        10 => words.push("sepuluh"),
        11 => words.push("sebelas"),
        12..=19 => {
            words.push(ONES[value - 10]);
            words.push("belas");
        }
        _ => {
            words.push(ONES[value / 10]);
            words.push("puluh");
            if value % 10 != 0 {
                words.push(ONES[value % 10]);
            }
        }
    }
}

fn push_chunk(words: &mut Vec<&'static str>, chunk: usize) {
    let hundreds = chunk / 100;
    if hundreds > 0 {
        words.push(ONES[hundreds]);
        words.push("ratus");
    }
    push_below_hundred(words, chunk % 100);
}

pub fn to_words(value: u64) -> String {
    if value == 0 {
        return "nol".to_string();
    }

    let mut chunks = Vec::new();
    let mut rest = value;
    while rest > 0 {
        chunks.push((rest % 1000) as usize);
        rest /= 1000;
    }

    let mut words: Vec<&'static str> = Vec::new();
    for (scale, chunk) in chunks.iter().enumerate().rev() {
        if *chunk == 0 {
            continue;
        }
        push_chunk(&mut words, *chunk);
        if !SCALES[scale].is_empty() {
            words.push(SCALES[scale]);
        }
    }
    words.join(" ")
}

pub fn to_words_signed(value: i64) -> String {
    let words = to_words(value.unsigned_abs());
    if value < 0 {
        format!("minus {}", words)
    } else {
        words
    }
}

/// The "say" line on an invoice, e.g. `satu juta lima ratus ribu Rupiah`.
pub fn rupiah_words(amount: i64) -> String {
    format!("{} Rupiah", to_words_signed(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "nol")]
    #[case(7, "tujuh")]
    #[case(10, "sepuluh")]
    #[case(11, "sebelas")]
    #[case(15, "lima belas")]
    #[case(20, "dua puluh")]
    #[case(45, "empat puluh lima")]
    #[case(100, "satu ratus")]
    #[case(120, "satu ratus dua puluh")]
    #[case(1_000, "satu ribu")]
    #[case(2_011, "dua ribu sebelas")]
    #[case(1_500_000, "satu juta lima ratus ribu")]
    #[case(12_345_678, "dua belas juta tiga ratus empat puluh lima ribu enam ratus tujuh puluh delapan")]
    #[case(1_000_000_001, "satu miliar satu")]
    #[case(3_000_000_000_000, "tiga triliun")]
    fn spells_out_amounts(#[case] value: u64, #[case] expected: &str) {
        assert_eq!(to_words(value), expected);
    }

    #[test]
    fn covers_full_u64_range_without_gaps() {
        let words = to_words(u64::MAX);
        assert!(words.starts_with("delapan belas kuintiliun"));
        assert!(!words.contains("  "));
    }

    #[test]
    fn is_stable_across_calls() {
        for value in [0, 1, 999, 1_000, 1_234_567, 987_654_321_000] {
            assert_eq!(to_words(value), to_words(value));
        }
    }

    #[test]
    fn signed_and_rupiah_forms() {
        assert_eq!(to_words_signed(-2_500), "minus dua ribu lima ratus");
        assert_eq!(rupiah_words(1_500_000), "satu juta lima ratus ribu Rupiah");
        assert_eq!(rupiah_words(0), "nol Rupiah");
    }
}
