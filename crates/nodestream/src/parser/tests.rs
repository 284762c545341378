use alloc::{string::String, vec, vec::Vec};

use rstest::rstest;

use super::{ParserOptions, StreamingParser, parse_str};
use crate::{ErrorSource, Event, ParserError, SyntaxError};

fn parse_all(text: &str) -> Vec<Event> {
    parse_str(text).collect()
}

fn syntax_error(err: SyntaxError, line: usize) -> Event {
    Event::Error(ParserError::new(err, line))
}

#[rstest]
#[case("r", Event::Root)]
#[case("^", Event::Up)]
#[case("c name", Event::node("name"))]
#[case("p type name", Event::property("type", "name"))]
#[case("v data with spaces", Event::value("data with spaces"))]
#[case("v data\\nwith\\nnewlines", Event::value("data\nwith\nnewlines"))]
#[case("v data\\\\with\\\\slashes", Event::value("data\\with\\slashes"))]
#[case(" r ", Event::Root)]
#[case(" ^ ", Event::Up)]
#[case(" c  name", Event::node("name"))]
#[case(" p  type  name", Event::property("type", "name"))]
#[case(" v  data", Event::value("data"))]
#[case("v \\ndata", Event::value("\ndata"))]
#[case("v \\\\data", Event::value("\\data"))]
#[case("x", Event::binary_value(""))]
#[case("x 0123456789abcdef", Event::binary_value("0123456789abcdef"))]
#[case(" x  F0", Event::binary_value("F0"))]
#[case("v ", Event::value(""))]
#[case("\tc\tname with spaces ", Event::node("name with spaces "))]
#[case("p String jcr:title", Event::property("String", "jcr:title"))]
fn parses_single_command(#[case] line: &str, #[case] expected: Event) {
    assert_eq!(parse_all(line), vec![expected.clone()]);

    let terminated = alloc::format!("{line}\n");
    assert_eq!(parse_all(&terminated), vec![expected]);
}

#[rstest]
#[case("v", "")]
#[case("v\n", "")]
#[case("v ", "")]
#[case("v \n", "")]
#[case(" v", "")]
#[case("v data", "data")]
#[case("v a\\\\n", "a\\n")]
#[case("v trailing  ", "trailing  ")]
fn value_payloads(#[case] line: &str, #[case] data: &str) {
    assert_eq!(parse_all(line), vec![Event::value(data)]);
}

#[rstest]
#[case("x", "")]
#[case("x\n", "")]
#[case("x \n", "")]
#[case(" x", "")]
#[case("x data", "data")]
#[case("x a\\n", "a\\n")]
fn binary_payloads_are_verbatim(#[case] line: &str, #[case] data: &str) {
    assert_eq!(parse_all(line), vec![Event::binary_value(data)]);
}

#[test]
fn parses_indented_document() {
    let text = "
	r
	c foo
	p string bar
	v baz
	^
	p binary foo
	x deadbeef
	^
	^
	^
	";
    assert_eq!(
        parse_all(text),
        vec![
            Event::Root,
            Event::node("foo"),
            Event::property("string", "bar"),
            Event::value("baz"),
            Event::Up,
            Event::property("binary", "foo"),
            Event::binary_value("deadbeef"),
            Event::Up,
            Event::Up,
            Event::Up,
        ]
    );
}

#[rstest]
#[case::empty("")]
#[case::blank_lines("\n\n  \n")]
fn empty_input_has_no_events(#[case] text: &str) {
    assert!(parse_all(text).is_empty());
}

#[rstest]
#[case::unknown_command("q", syntax_error(SyntaxError::InvalidCharacter('q'), 1))]
#[case::node_without_name("c\n", syntax_error(SyntaxError::UnexpectedNewline, 1))]
#[case::node_at_end("c", syntax_error(SyntaxError::UnexpectedEndOfInput, 1))]
#[case::node_space_at_end("c  ", syntax_error(SyntaxError::UnexpectedEndOfInput, 1))]
#[case::node_glued_name("cfoo", syntax_error(SyntaxError::InvalidCharacter('f'), 1))]
#[case::property_without_name("p string\n", syntax_error(SyntaxError::UnexpectedNewline, 1))]
#[case::property_without_type("p\n", syntax_error(SyntaxError::UnexpectedNewline, 1))]
#[case::property_name_at_end("p string ", syntax_error(SyntaxError::UnexpectedEndOfInput, 1))]
#[case::root_trailing("r x", syntax_error(SyntaxError::InvalidCharacter('x'), 1))]
#[case::up_trailing("^^", syntax_error(SyntaxError::InvalidCharacter('^'), 1))]
#[case::value_glued("vx", syntax_error(SyntaxError::InvalidCharacter('x'), 1))]
#[case::binary_glued("xx", syntax_error(SyntaxError::InvalidCharacter('x'), 1))]
#[case::bad_escape("v a\\t", syntax_error(SyntaxError::InvalidEscape('t'), 1))]
#[case::escape_at_eol("v a\\\n", syntax_error(SyntaxError::UnexpectedNewline, 1))]
#[case::escape_at_end("v a\\", syntax_error(SyntaxError::UnexpectedEndOfInput, 1))]
fn rejects_malformed_command(#[case] text: &str, #[case] expected: Event) {
    assert_eq!(parse_all(text), vec![expected]);
}

#[test]
fn error_is_reported_at_its_line_and_halts() {
    let events = parse_all("r\nc a\n?\nc b\n");
    assert_eq!(
        events,
        vec![
            Event::Root,
            Event::node("a"),
            syntax_error(SyntaxError::InvalidCharacter('?'), 3),
        ]
    );
}

#[test]
fn blank_lines_count_towards_line_numbers() {
    let events = parse_all("r\n\n\n  \nz");
    assert_eq!(
        events.last(),
        Some(&syntax_error(SyntaxError::InvalidCharacter('z'), 5))
    );
}

#[test]
fn chunks_may_split_anywhere() {
    let text = "r\nc foo\np String bar\nv a\\\\b\\nc\nx Zm9v\n^\n^\n^\n";
    let expected = parse_all(text);
    let chars: Vec<char> = text.chars().collect();

    for split in 0..=chars.len() {
        let head: String = chars[..split].iter().collect();
        let tail: String = chars[split..].iter().collect();

        let mut parser = StreamingParser::default();
        parser.feed(&head);
        let mut events: Vec<Event> = parser.by_ref().collect();
        parser.feed(&tail);
        events.extend(parser.by_ref());
        events.extend(parser.finish());
        assert_eq!(events, expected, "split at {split}");
    }
}

#[test]
fn pending_command_waits_for_more_input() {
    let mut parser = StreamingParser::default();
    parser.feed("r\nc fo");
    assert_eq!(parser.next(), Some(Event::Root));
    assert_eq!(parser.next(), None);
    assert_eq!(parser.line(), 2);

    let rest: Vec<_> = parser.finish().collect();
    assert_eq!(rest, vec![Event::node("fo")]);
}

#[test]
fn nothing_follows_an_error() {
    let mut parser = StreamingParser::default();
    parser.feed("c\n");
    assert!(parser.next().is_some_and(|event| event.is_error()));
    parser.feed("r\n");
    assert_eq!(parser.next(), None);
    assert_eq!(parser.finish().next(), None);
}

#[test]
fn unicode_whitespace_is_skipped_by_default() {
    assert_eq!(parse_all("c\u{a0}name"), vec![Event::node("name")]);
}

#[test]
fn ascii_whitespace_only_rejects_unicode_separators() {
    let mut parser = StreamingParser::new(ParserOptions {
        ascii_whitespace_only: true,
    });
    parser.feed("c\u{a0}name");
    let events: Vec<_> = parser.finish().collect();
    let [Event::Error(err)] = &events[..] else {
        panic!("expected a single error, got {events:?}");
    };
    assert_eq!(
        err.source,
        ErrorSource::Syntax(SyntaxError::InvalidCharacter('\u{a0}'))
    );

    let mut parser = StreamingParser::new(ParserOptions {
        ascii_whitespace_only: true,
    });
    parser.feed("c a\u{a0}b");
    let events: Vec<_> = parser.finish().collect();
    assert_eq!(events, vec![Event::node("a\u{a0}b")]);
}

#[test]
fn carriage_returns_stay_in_names() {
    assert_eq!(
        parse_all("c name\r\n^"),
        vec![Event::node("name\r"), Event::Up]
    );
}
