//! Filter chain assembly.

/// An ordered list of filter terms joined with `,`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterChain {
    terms: Vec<String>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a term.
    pub fn push(&mut self, term: impl Into<String>) {
        let term = term.into();
        if !term.is_empty() {
            self.terms.push(term);
        }
    }

    /// Append a term when the builder produced one.
    pub fn push_opt(&mut self, term: Option<String>) {
        if let Some(term) = term {
            self.push(term);
        }
    }

    /// Append every term of another chain.
    pub fn extend(&mut self, other: FilterChain) {
        self.terms.extend(other.terms);
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// The chain as ffmpeg syntax, or `None` when empty.
    pub fn build(&self) -> Option<String> {
        (!self.terms.is_empty()).then(|| self.terms.join(","))
    }

    /// The chain, or the `null`/`anull` pass-through when empty.
    pub fn build_or(&self, passthrough: &str) -> String {
        self.build().unwrap_or_else(|| passthrough.to_string())
    }
}

/// Format a number for filter arguments: at most 4 decimals, no trailing
/// zeros, no negative zero.
pub fn fmt_num(value: f64) -> String {
    let mut s = format!("{value:.4}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_chain_builds_none() {
        let chain = FilterChain::new();
        assert_eq!(chain.build(), None);
        assert_eq!(chain.build_or("null"), "null");
    }

    #[test]
    fn test_chain_joins_in_order() {
        let mut chain = FilterChain::new();
        chain.push("hflip");
        chain.push_opt(None);
        chain.push_opt(Some("vflip".to_string()));
        chain.push("");
        assert_eq!(chain.build().as_deref(), Some("hflip,vflip"));
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(0.25), "0.25");
        assert_eq!(fmt_num(1.0 / 3.0), "0.3333");
        assert_eq!(fmt_num(-0.00001), "0");
        assert_eq!(fmt_num(1080.0), "1080");
    }
}
