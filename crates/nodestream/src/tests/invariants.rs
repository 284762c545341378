use alloc::vec::Vec;

use base64::{
    Engine as _,
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
};
use quickcheck::{QuickCheck, TestResult};

use super::{arbitrary::Tree, quickcheck_tests};
use crate::{Event, PathStack, decoded_len, linear_bucket, logarithmic_bucket};

/// Property: the path stack always holds one segment per open node or
/// property, plus the root.
#[test]
fn path_stack_tracks_open_contexts_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(tree: Tree) -> bool {
        let mut stack = PathStack::new();
        let mut open = 0usize;
        for event in tree.events() {
            match event {
                Event::Root | Event::Node { .. } | Event::Property { .. } => open += 1,
                Event::Up => open -= 1,
                _ => {}
            }
            stack.apply(&event);
            if open != stack.depth() + usize::from(stack.is_rooted()) {
                return false;
            }
        }
        open == 0 && !stack.is_rooted()
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Tree) -> bool);
}

/// Property: stepping a depth by the bucket size moves it exactly one bucket.
#[test]
fn linear_buckets_are_monotonic_quickcheck() {
    fn prop(depth: u16, size: u8) -> TestResult {
        if size == 0 {
            return TestResult::discard();
        }
        let (depth, size) = (usize::from(depth), usize::from(size));
        let bucket = linear_bucket(depth, size);
        TestResult::from_bool(
            bucket <= depth
                && depth < bucket + size
                && bucket % size == 0
                && linear_bucket(depth + size, size) == bucket + size,
        )
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(u16, u8) -> TestResult);
}

/// Property: `scale^k` lands in bucket `k` and `scale^k - 1` in bucket
/// `k - 1`.
#[test]
fn logarithmic_bucket_edges_quickcheck() {
    fn prop(k: u8, scale: u16) -> TestResult {
        let scale = u64::from(scale);
        let k = u32::from(k % 8);
        if scale < 2 || k == 0 {
            return TestResult::discard();
        }
        let Some(edge) = scale.checked_pow(k) else {
            return TestResult::discard();
        };
        TestResult::from_bool(
            logarithmic_bucket(edge, scale) == k && logarithmic_bucket(edge - 1, scale) == k - 1,
        )
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(u8, u16) -> TestResult);
}

/// Property: binary payloads are sized by their decoded bytes, padded or not,
/// and with a trailing carriage return.
#[test]
fn decoded_len_counts_raw_bytes_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>) -> bool {
        let len = bytes.len() as u64;
        let padded = STANDARD.encode(&bytes);
        decoded_len(&padded) == len
            && decoded_len(&STANDARD_NO_PAD.encode(&bytes)) == len
            && decoded_len(&alloc::format!("{padded}\r")) == len
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>) -> bool);
}
