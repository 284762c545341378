#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use nodestream::{Event, EventsExt, ParserOptions, StreamingParser, parse_str, serialize, statistics};
use rand::rngs::SmallRng; // faster than StdRng
use rand::{Rng, RngCore, SeedableRng};

const HEADER: usize = 5; // 1 flag + 4-byte seed

thread_local! {
    // One SmallRng per thread, seeded once from the host OS
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&str] = &[" ", "\t", "\r", "\u{a0}", "\u{2003}", "\u{3000}"];

static NAMES: &[&str] = &["a", "b", "jcr:content", "sling:Folder", "x y", "\u{e9}t\u{e9}", "/"];

/// Helper: borrow the thread-local RNG and run a closure with it.
fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x03);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let export = with_rng(|rng| random_export(rng, 4));
        let len = export.len().min(max_size - HEADER);
        data[HEADER..HEADER + len].copy_from_slice(&export.as_bytes()[..len]);
        HEADER + len
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// A mostly well-formed export, with the occasional stray whitespace,
/// escape or missing operand.
fn random_export(rng: &mut SmallRng, depth: usize) -> String {
    let mut out = String::from("r\n");
    random_body(rng, depth, &mut out);
    out.push_str("^\n");
    out
}

fn random_body(rng: &mut SmallRng, depth: usize, out: &mut String) {
    for _ in 0..rng.random_range(0..3) {
        out.push_str(random_ws(rng));
        out.push_str("p String ");
        out.push_str(NAMES[rng.random_range(0..NAMES.len())]);
        out.push('\n');
        match rng.random_range(0..4) {
            0 => out.push_str("v plain\n"),
            1 => out.push_str("v a\\\\b\\nc\n"),
            2 => out.push_str("x aGVsbG8=\n"),
            _ => out.push_str("v \\t\n"),
        }
        out.push_str("^\n");
    }
    if depth == 0 {
        return;
    }
    for _ in 0..rng.random_range(0..3) {
        out.push('c');
        out.push_str(random_ws(rng));
        out.push_str(NAMES[rng.random_range(0..NAMES.len())]);
        out.push('\n');
        random_body(rng, depth - 1, out);
        out.push_str("^\n");
    }
}

fn random_ws(rng: &mut SmallRng) -> &'static str {
    WS_TABLE[rng.random_range(0..WS_TABLE.len())]
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug, Arbitrary)]
enum Filter {
    Prune,
    Subtree,
}

fn parser(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let split_seed = u32::from_le_bytes([data[1], data[2], data[3], data[4]]) as u64;
    let text = String::from_utf8_lossy(&data[HEADER..]).into_owned();

    let mut parser = StreamingParser::new(ParserOptions {
        ascii_whitespace_only: flags & 1 != 0,
    });
    let mut events = Vec::new();
    for chunk in split_into_safe_chunks(&text, split_seed) {
        parser.feed(chunk);
        events.extend(parser.by_ref());
    }
    events.extend(parser.finish());

    if let Some(i) = events.iter().position(Event::is_error) {
        assert_eq!(i, events.len() - 1, "events after an error");
    } else if flags & 1 == 0 {
        let mut rendered = String::new();
        serialize(events.iter().cloned(), &mut rendered).unwrap();
        let reparsed: Vec<_> = parse_str(&rendered).collect();
        assert_eq!(reparsed, events, "round trip through {rendered:?}");
    }

    let filter = Filter::arbitrary(&mut arbitrary::Unstructured::new(&data[..1]));
    let target = format!("/{}", NAMES[usize::from(flags >> 2) % NAMES.len()]);
    let filtered: Vec<_> = match filter {
        Ok(Filter::Prune) => events.iter().cloned().prune(&target).unwrap().collect(),
        Ok(Filter::Subtree) | Err(_) => events.iter().cloned().subtree(&target).unwrap().collect(),
    };
    let _ = statistics(filtered);
    let _ = statistics(events);
}

fuzz_target!(|data: &[u8]| parser(data));

/// Split a UTF-8 `&str` into boundary-safe chunks using a deterministic random
/// value to generate splits.
fn split_into_safe_chunks(serialized: &str, split_seed: u64) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let len = serialized.len();

    while start < len {
        let remaining = len - start;

        // Derive a candidate size from the fixed seed.
        let mut size = (split_seed as usize % remaining) + 1;

        // Bump `size` forward until it lands on a char boundary.
        while start + size < len && !serialized.is_char_boundary(start + size) {
            size += 1;
        }

        chunks.push(&serialized[start..start + size]);
        start += size;
    }

    chunks
}
