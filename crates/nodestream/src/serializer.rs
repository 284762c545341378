//! Renders events back into the export format.
use core::fmt;

use crate::{Event, SerializeError};

/// Writes one event as a line of the export format, newline included.
///
/// [`Event::Error`] has no textual form and is rejected by the callers before
/// reaching this function.
fn write_event<W: fmt::Write + ?Sized>(w: &mut W, event: &Event) -> fmt::Result {
    match event {
        Event::Root => w.write_str("r\n"),
        Event::Node { name } => writeln!(w, "c {name}"),
        Event::Property { ty, name } => writeln!(w, "p {ty} {name}"),
        Event::Value { data } => {
            w.write_str("v ")?;
            write_escaped(w, data)?;
            w.write_char('\n')
        }
        Event::BinaryValue { data } => writeln!(w, "x {data}"),
        Event::Up => w.write_str("^\n"),
        Event::Error(_) => Err(fmt::Error),
    }
}

fn write_escaped<W: fmt::Write + ?Sized>(w: &mut W, data: &str) -> fmt::Result {
    let mut rest = data;
    while let Some(pos) = rest.find(['\\', '\n']) {
        w.write_str(&rest[..pos])?;
        w.write_str(if rest.as_bytes()[pos] == b'\\' { "\\\\" } else { "\\n" })?;
        rest = &rest[pos + 1..];
    }
    w.write_str(rest)
}

/// Serializes `events` into `out`, one command per line.
///
/// ```rust
/// use nodestream::{Event, serialize};
///
/// let mut out = String::new();
/// serialize([Event::Root, Event::value("a\\b\nc"), Event::Up], &mut out)?;
/// assert_eq!(out, "r\nv a\\\\b\\nc\n^\n");
/// # Ok::<(), nodestream::SerializeError>(())
/// ```
///
/// # Errors
///
/// Stops at the first [`Event::Error`] and returns its error. Output written
/// before it is left in `out`.
pub fn serialize<I, W>(events: I, out: &mut W) -> Result<(), SerializeError>
where
    I: IntoIterator<Item = Event>,
    W: fmt::Write + ?Sized,
{
    for event in events {
        if let Event::Error(err) = event {
            return Err(err.into());
        }
        write_event(out, &event)?;
    }
    Ok(())
}

/// Serializes `events` into a byte sink.
///
/// The writer is not buffered here; wrap it in a `BufWriter` for large
/// exports.
///
/// # Errors
///
/// Stops at the first [`Event::Error`] or at the first failed write.
#[cfg(feature = "std")]
pub fn write_events<I, W>(events: I, mut writer: W) -> Result<(), SerializeError>
where
    I: IntoIterator<Item = Event>,
    W: std::io::Write,
{
    use alloc::string::String;

    let mut line = String::new();
    for event in events {
        if let Event::Error(err) = event {
            return Err(err.into());
        }
        line.clear();
        write_event(&mut line, &event)?;
        writer.write_all(line.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec, vec::Vec};

    use super::*;
    use crate::{ParserError, SyntaxError, parse_str};

    #[test]
    fn renders_every_command() {
        let mut out = String::new();
        serialize(
            vec![
                Event::Root,
                Event::node("a"),
                Event::property("b", "c"),
                Event::binary_value("d"),
                Event::value("e"),
                Event::value("a\\b\\"),
                Event::value("a\nb\n"),
                Event::Up,
            ],
            &mut out,
        )
        .unwrap();

        insta::assert_snapshot!(out, @r"
        r
        c a
        p b c
        x d
        v e
        v a\\b\\
        v a\nb\n
        ^
        ");
    }

    #[test]
    fn reparses_to_the_same_events() {
        let text = "r\nc a b\np String x\nv \\\\\\n\\\\n\nv \nx QQ==\n^\n^\n^\n";
        let events: Vec<_> = parse_str(text).collect();
        let mut out = String::new();
        serialize(events.clone(), &mut out).unwrap();
        assert_eq!(out, text);
        assert_eq!(parse_str(&out).collect::<Vec<_>>(), events);
    }

    #[test]
    fn stops_at_errors() {
        let err = ParserError::new(SyntaxError::UnexpectedEndOfInput, 2);
        let mut out = String::new();
        let result = serialize(vec![Event::Root, Event::Error(err.clone()), Event::Up], &mut out);
        assert!(matches!(result, Err(SerializeError::Parse(e)) if e == err));
        assert_eq!(out, "r\n");
    }

    #[cfg(feature = "std")]
    #[test]
    fn writes_bytes() {
        let mut out = Vec::new();
        write_events(parse_str("r\nc ä\n^\n^\n"), &mut out).unwrap();
        assert_eq!(out, "r\nc ä\n^\n^\n".as_bytes());
    }
}
