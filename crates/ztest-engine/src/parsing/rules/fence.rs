/// A fenced string block: a run of three or more identical fence characters,
/// verbatim content, and the same run again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringBlock<'a> {
    /// The opening run, e.g. `` ``` `` or `~~~~`.
    pub fence: &'a str,
    /// Everything between the opening and closing run, untouched.
    pub content: &'a str,
    /// Bytes consumed, including trailing blanks and one newline after the closer.
    pub len: usize,
}

pub struct StringFence;

impl StringFence {
    pub const MIN_RUN: usize = 3;

    /// Returns the opening run at the start of `rest` (after optional spaces
    /// or tabs), together with the offset where the content begins.
    pub fn opener(rest: &str, is_fence_char: impl Fn(char) -> bool) -> Option<(&str, usize)> {
        let indent = rest.len() - rest.trim_start_matches([' ', '\t']).len();
        let after = &rest[indent..];
        let c = after.chars().next().filter(|&c| is_fence_char(c))?;
        let run = after.len() - after.trim_start_matches(c).len();
        if run < Self::MIN_RUN * c.len_utf8() {
            return None;
        }
        Some((&after[..run], indent + run))
    }

    /// Matches a closed string block at the start of `rest`.
    ///
    /// The closer is the first later occurrence of exactly the opening run, so
    /// a block opened with `` ``` `` cannot be closed by `~~~`. An unclosed
    /// opener does not match.
    pub fn block(rest: &str, is_fence_char: impl Fn(char) -> bool) -> Option<StringBlock<'_>> {
        let (fence, body_start) = Self::opener(rest, is_fence_char)?;
        let close = rest[body_start..].find(fence)?;
        let content = &rest[body_start..body_start + close];

        let mut end = body_start + close + fence.len();
        let tail = &rest[end..];
        end += tail.len() - tail.trim_start_matches([' ', '\t', '\r']).len();
        if rest[end..].starts_with('\n') {
            end += 1;
        }

        Some(StringBlock {
            fence,
            content,
            len: end,
        })
    }
}
