// Text format configuration for weights.
//
// Simple weights print a single token. Composite weights (products) print
// their components joined by a separator, optionally wrapped in a pair of
// parentheses so that nested composites stay unambiguous.

use crate::WeightError;

/// Text layout used by [`crate::Weight::to_text`] and
/// [`crate::Weight::parse_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFormat {
    /// Separator between composite weight components.
    pub separator: char,
    /// Opening and closing characters around composite weights, if any.
    pub parentheses: Option<(char, char)>,
}

impl Default for TextFormat {
    fn default() -> Self {
        Self {
            separator: ',',
            parentheses: None,
        }
    }
}

impl TextFormat {
    /// Default separator with composites wrapped in `open` / `close`.
    pub fn with_parentheses(open: char, close: char) -> Self {
        Self {
            parentheses: Some((open, close)),
            ..Self::default()
        }
    }

    /// Join two component texts into one composite text.
    pub fn join(&self, left: &str, right: &str) -> String {
        match self.parentheses {
            Some((open, close)) => format!("{open}{left}{}{right}{close}", self.separator),
            None => format!("{left}{}{right}", self.separator),
        }
    }

    /// Split a composite text into its two component texts.
    ///
    /// Without parentheses the left component spans `left_arity` fields.
    /// With parentheses the outer pair is stripped and the text is split at
    /// the first separator that is not nested inside another pair.
    pub fn split<'a>(
        &self,
        text: &'a str,
        left_arity: usize,
    ) -> Result<(&'a str, &'a str), WeightError> {
        let malformed = |reason: &str| WeightError::MalformedComposite {
            text: text.to_string(),
            reason: reason.to_string(),
        };

        let (body, fields_before_split) = match self.parentheses {
            Some((open, close)) => {
                let inner = text
                    .strip_prefix(open)
                    .and_then(|t| t.strip_suffix(close))
                    .ok_or_else(|| malformed("missing parentheses"))?;
                (inner, 1)
            }
            None => (text, left_arity),
        };

        let mut depth: usize = 0;
        let mut seen = 0;
        for (idx, ch) in body.char_indices() {
            match self.parentheses {
                Some((open, _)) if ch == open => depth += 1,
                Some((_, close)) if ch == close => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| malformed("unbalanced parentheses"))?;
                }
                _ if ch == self.separator && depth == 0 => {
                    seen += 1;
                    if seen == fields_before_split {
                        let right = &body[idx + ch.len_utf8()..];
                        return Ok((&body[..idx], right));
                    }
                }
                _ => {}
            }
        }

        Err(malformed("too few components"))
    }
}
