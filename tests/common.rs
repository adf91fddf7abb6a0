//! Integration tests for indenta-common crate.

use indenta_common::{
    BytePos, Interner, LanguageId, OffsetRange, OffsetRanges, Span, Token, Uncovered,
};

#[test]
fn test_span_contains_is_half_open() {
    let span = Span::from_usize(5, 15);
    assert_eq!(span.range(), 5..15);
    assert_eq!(span.len(), 10);
    assert!(span.contains(5));
    assert!(!span.contains(15));
    assert!(Span::from_usize(5, 5).is_empty());
}

#[test]
fn test_byte_pos_conversions() {
    assert_eq!(BytePos::from(42usize), BytePos(42));
    assert_eq!(usize::from(Span::from_usize(3, 9).end), 9);
}

#[test]
fn test_token_embedded_span() {
    let token = Token::new("delimiter", Span::from_usize(3, 9)).with_embedded(Span::from_usize(5, 8));
    assert_eq!(token.start(), 3);
    assert_eq!(token.end(), 9);
    assert_eq!(token.len(), 6);
    assert_eq!(token.embedded, Some(Span::from_usize(5, 8)));
}

#[test]
fn test_language_id() {
    const HTML: LanguageId = LanguageId::new("html");
    assert_eq!(HTML.name(), "html");
    assert_eq!(HTML.to_string(), "html");
    assert_ne!(HTML, LanguageId::new("css"));
}

// OffsetRanges tests

#[test]
fn test_ranges_sharing_an_offset_coalesce() {
    let mut ranges = OffsetRanges::new();
    ranges.add(10, 20);
    ranges.add(20, 30);
    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges.iter().next(), Some(&OffsetRange::new(10, 30)));
}

#[test]
fn test_ranges_stay_sorted() {
    let mut ranges = OffsetRanges::new();
    ranges.add(50, 60);
    ranges.add(0, 5);
    ranges.add(20, 30);
    let starts: Vec<usize> = ranges.iter().map(|r| r.start).collect();
    assert_eq!(starts, vec![0, 20, 50]);

    // one range swallowing two
    ranges.add(18, 55);
    let all: Vec<OffsetRange> = ranges.iter().copied().collect();
    assert_eq!(all, vec![OffsetRange::new(0, 5), OffsetRange::new(18, 60)]);
}

#[test]
fn test_reversed_insert_is_normalised() {
    let mut ranges = OffsetRanges::new();
    ranges.add(9, 3);
    assert!(ranges.contains(3, 9));
}

#[test]
fn test_line_trimmed_against_ranges() {
    let mut ranges = OffsetRanges::new();
    ranges.add(0, 9);
    ranges.add(30, 39);
    // a line from 5 to 35 loses both ends
    assert_eq!(ranges.uncovered(5, 35), Uncovered::Trimmed { start: 10, end: 29 });
    assert_eq!(ranges.uncovered(31, 38), Uncovered::Covered);
    assert_eq!(ranges.uncovered(12, 20), Uncovered::Unchanged);
}

// Interner tests

#[test]
fn test_interner_folds_case() {
    let mut interner = Interner::new();
    let a = interner.intern("DIV");
    let b = interner.intern("div");
    let c = interner.intern("span");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.get(a), "div");
    assert_eq!(interner.lookup("Span"), Some(c));
    assert_eq!(interner.lookup("p"), None);

    interner.clear();
    assert_eq!(interner.lookup("div"), None);
}
