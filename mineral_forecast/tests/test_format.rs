use mineral_forecast::format::{format_magnitude, SCALE_WORDS};
use rstest::rstest;

#[rstest]
#[case(0.0, "0.0 ")]
#[case(999.0, "999.0 ")]
#[case(1500.0, "1.5 thousand")]
#[case(2_500_000.0, "2.5 million")]
#[case(447_600.0, "447.6 thousand")]
#[case(3.2e9, "3.2 billion")]
fn test_format_magnitude(#[case] number: f64, #[case] expected: &str) {
    assert_eq!(format_magnitude(number).unwrap(), expected);
}

#[test]
fn test_scale_word_grows_with_magnitude() {
    let word_index = |n: f64| {
        let text = format_magnitude(n).unwrap();
        let word = text.split(' ').nth(1).unwrap_or("").to_string();
        SCALE_WORDS.iter().position(|w| *w == word).unwrap()
    };

    let mut previous = 0;
    for n in [1.0, 12.0, 1.2e3, 4.0e4, 7.0e6, 9.9e8, 1.0e12, 5.0e15] {
        let index = word_index(n);
        assert!(index >= previous, "scale word shrank at {}", n);
        previous = index;
    }
}
