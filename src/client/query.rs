/// Ordered `key=value` pairs appended to an endpoint URL.
///
/// Pairs keep insertion order, values are percent-encoded, and an empty
/// query leaves the URL untouched (no dangling `?`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(&'static str, String)>,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &'static str, value: impl ToString) -> &mut Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    /// Push `value` if present.
    pub fn push_opt<T: ToString>(&mut self, key: &'static str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Push `value` if present and non-empty.
    pub fn push_non_empty(&mut self, key: &'static str, value: Option<&str>) -> &mut Self {
        self.push_opt(key, value.filter(|v| !v.is_empty()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Append this query to `url`.
    pub fn apply(&self, url: String) -> String {
        if self.pairs.is_empty() {
            return url;
        }
        format!("{}?{}", url, self)
    }
}

impl std::fmt::Display for QueryString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}={}", key, urlencoding::encode(value))?;
        }
        Ok(())
    }
}
