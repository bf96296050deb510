use std::fmt;

/// Location of a value inside a JSON document, from the document root.
///
/// Object keys are kept verbatim; array positions are kept as 1-based
/// `_N` marker segments, so the first element of `messages` lives at
/// `messages._1`. Paths are value types: two paths are equal iff their
/// segment sequences are equal, and they hash accordingly so they can
/// key the diff maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPath {
    segments: Vec<String>,
}

impl JsonPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Path of `key` under `self`.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        Self { segments }
    }

    /// Path of the array element at 0-based `index` under `self`,
    /// rendered as a 1-based `_N` segment.
    pub fn element(&self, index: usize) -> Self {
        self.child(&format!("_{}", index + 1))
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments joined with `.`, the form ignored-path configuration is
    /// matched against.
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dotted())
    }
}
