#![forbid(unsafe_code)]

//! Frame-string tokenizer.
//!
//! A frame string encodes a climb as a run of `p<digits>r<digits>` pairs,
//! e.g. `p1090r12p1164r13p1464r14`. The scanner yields every pair in
//! left-to-right order and skips anything that does not match the pattern;
//! it is the only well-formedness gate in the pipeline.

/// One `p<hole>r<role>` pair, in string order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameToken {
    pub hole_id: u32,
    pub role_id: u32,
}

/// Lazily scans a frame string for `p<digits>r<digits>` pairs. Empty input
/// and input without a single match both yield an empty sequence.
pub fn tokens(frames: &str) -> FrameTokens<'_> {
    FrameTokens {
        rest: frames.as_bytes(),
    }
}

#[derive(Clone, Debug)]
pub struct FrameTokens<'a> {
    rest: &'a [u8],
}

impl Iterator for FrameTokens<'_> {
    type Item = FrameToken;

    fn next(&mut self) -> Option<FrameToken> {
        while !self.rest.is_empty() {
            match scan_pair(self.rest) {
                Some((token, consumed)) => {
                    self.rest = &self.rest[consumed..];
                    return Some(token);
                }
                None => self.rest = &self.rest[1..],
            }
        }
        None
    }
}

/// Matches `p<digits>r<digits>` at the start of `input`. Returns the token
/// and the number of bytes consumed, or `None` when the prefix does not
/// match (including digit runs that overflow `u32`).
fn scan_pair(input: &[u8]) -> Option<(FrameToken, usize)> {
    let after_p = input.strip_prefix(b"p")?;
    let (hole_id, hole_len) = scan_number(after_p)?;
    let after_r = after_p[hole_len..].strip_prefix(b"r")?;
    let (role_id, role_len) = scan_number(after_r)?;
    let consumed = 1 + hole_len + 1 + role_len;
    Some((FrameToken { hole_id, role_id }, consumed))
}

fn scan_number(input: &[u8]) -> Option<(u32, usize)> {
    let len = input.iter().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return None;
    }
    let mut value: u32 = 0;
    for &byte in &input[..len] {
        value = value.checked_mul(10)?.checked_add(u32::from(byte - b'0'))?;
    }
    Some((value, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(frames: &str) -> Vec<(u32, u32)> {
        tokens(frames)
            .map(|t| (t.hole_id, t.role_id))
            .collect::<Vec<_>>()
    }

    #[test]
    fn yields_pairs_in_string_order() {
        assert_eq!(
            collect("p1090r12p1164r13p1464r14"),
            vec![(1090, 12), (1164, 13), (1464, 14)]
        );
    }

    #[test]
    fn empty_input_yields_empty_sequence() {
        assert_eq!(collect(""), Vec::new());
    }

    #[test]
    fn pattern_free_input_yields_empty_sequence() {
        assert_eq!(collect("no holds here"), Vec::new());
        assert_eq!(collect("p12x34"), Vec::new());
        assert_eq!(collect("r12p34"), Vec::new());
    }

    #[test]
    fn skips_garbage_between_matches() {
        assert_eq!(
            collect("xxp1090r12--p1091r13p"),
            vec![(1090, 12), (1091, 13)]
        );
    }

    #[test]
    fn preserves_duplicate_tokens() {
        assert_eq!(collect("p1090r12p1090r12"), vec![(1090, 12), (1090, 12)]);
    }

    #[test]
    fn iterator_is_restartable() {
        let scanner = tokens("p1090r12p1091r13");
        let first: Vec<_> = scanner.clone().collect();
        let second: Vec<_> = scanner.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn overflowing_digit_run_does_not_form_a_token() {
        assert_eq!(collect("p99999999999r12"), Vec::new());
        assert_eq!(collect("p99999999999r12p1090r13"), vec![(1090, 13)]);
    }

    #[test]
    fn incomplete_pair_before_a_match_is_skipped() {
        assert_eq!(collect("p12p1090r12"), vec![(1090, 12)]);
    }
}
