//! Template placeholder protection.
//!
//! Documents and operation files often carry template markers such as
//! `{{ .Values.image }}` that are not valid YAML on their own. Before
//! decoding, each marker that follows whitespace is wrapped in single quotes so
//! it decodes as a plain string; after encoding, the quotes are taken off
//! again.

use std::borrow::Cow;

use regex::bytes::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaceholderError {
    #[error("placeholder delimiters must not be empty")]
    EmptyDelimiter,
    #[error("invalid placeholder pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Clone)]
pub struct PlaceholderWrapper {
    unwrapped: Regex,
    wrapped: Regex,
    wrap_with: String,
    unwrap_with: String,
}

/// Escape `$` so a delimiter can be used verbatim in a replacement string.
fn literal(s: &str) -> String {
    s.replace('$', "$$")
}

impl PlaceholderWrapper {
    pub fn new(left: &str, right: &str) -> Result<Self, PlaceholderError> {
        if left.is_empty() || right.is_empty() {
            return Err(PlaceholderError::EmptyDelimiter);
        }
        let l = regex::escape(left);
        let r = regex::escape(right);
        let unwrapped = Regex::new(&format!(r"(^|\s){l}([^{r}]+){r}"))?;
        let wrapped = Regex::new(&format!(r"(^|\s)'{l}([^{r}]+){r}'"))?;
        Ok(PlaceholderWrapper {
            unwrapped,
            wrapped,
            wrap_with: format!("${{1}}'{}${{2}}{}'", literal(left), literal(right)),
            unwrap_with: format!("${{1}}{}${{2}}{}", literal(left), literal(right)),
        })
    }

    /// Quote every bare placeholder.
    pub fn wrap<'a>(&self, bytes: &'a [u8]) -> Cow<'a, [u8]> {
        self.unwrapped.replace_all(bytes, self.wrap_with.as_bytes())
    }

    /// Remove the quotes added by [`wrap`](Self::wrap).
    pub fn unwrap<'a>(&self, bytes: &'a [u8]) -> Cow<'a, [u8]> {
        self.wrapped.replace_all(bytes, self.unwrap_with.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn braces() -> PlaceholderWrapper {
        PlaceholderWrapper::new("{{", "}}").unwrap()
    }

    fn wrap(w: &PlaceholderWrapper, s: &str) -> String {
        String::from_utf8(w.wrap(s.as_bytes()).into_owned()).unwrap()
    }

    fn unwrap(w: &PlaceholderWrapper, s: &str) -> String {
        String::from_utf8(w.unwrap(s.as_bytes()).into_owned()).unwrap()
    }

    #[test]
    fn wraps_values_after_whitespace() {
        let w = braces();
        assert_eq!(wrap(&w, "image: {{ image }}\n"), "image: '{{ image }}'\n");
        assert_eq!(wrap(&w, "- {{a}}\n- {{b}}\n"), "- '{{a}}'\n- '{{b}}'\n");
    }

    #[test]
    fn wraps_at_start_of_input_and_line() {
        let w = braces();
        assert_eq!(wrap(&w, "{{doc}}"), "'{{doc}}'");
        assert_eq!(wrap(&w, "a: 1\n{{extra}}\n"), "a: 1\n'{{extra}}'\n");
    }

    #[test]
    fn leaves_embedded_markers_alone() {
        let w = braces();
        let s = "url: http://{{host}}/path\n";
        assert_eq!(wrap(&w, s), s);
    }

    #[test]
    fn unwrap_reverses_wrap() {
        let w = braces();
        let s = "a: {{ x }}\nlist:\n- {{y}}\n";
        assert_eq!(unwrap(&w, &wrap(&w, s)), s);
    }

    #[test]
    fn unwrap_ignores_double_quotes() {
        let w = braces();
        let s = "a: \"{{x}}\"\n";
        assert_eq!(unwrap(&w, s), s);
    }

    #[test]
    fn custom_delimiters() {
        let w = PlaceholderWrapper::new("((", "))").unwrap();
        assert_eq!(wrap(&w, "key: ((secret))\n"), "key: '((secret))'\n");
        assert_eq!(unwrap(&w, "key: '((secret))'\n"), "key: ((secret))\n");

        let w = PlaceholderWrapper::new("$[", "]").unwrap();
        assert_eq!(wrap(&w, "v: $[x]"), "v: '$[x]'");
    }

    #[test]
    fn empty_delimiters_rejected() {
        assert!(matches!(
            PlaceholderWrapper::new("", "}}"),
            Err(PlaceholderError::EmptyDelimiter)
        ));
    }
}
