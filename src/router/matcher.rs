use regex::Regex;
use smallvec::SmallVec;
use tracing::debug;

/// Maximum number of path captures before heap allocation.
/// Most REST APIs have ≤4 path params (e.g., /users/{id}/posts/{postId}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Ordered path captures, one per placeholder, stack-allocated for ≤8 params.
pub type ParamVec = SmallVec<[String; MAX_INLINE_PARAMS]>;

/// One placeholder capture: a run of characters that are neither whitespace
/// nor `/`, so a capture can never swallow a neighbouring literal segment.
const CAPTURE: &str = r"([^/\s]+)";

/// Compiled form of a declared path template.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    template: String,
    regex: Regex,
    param_names: Vec<String>,
    literal_segments: usize,
}

impl PathMatcher {
    /// Compile `template` (e.g. `/pet/{petId}/uploadImage?x=1`).
    ///
    /// Everything from the first `?` is dropped, literal text is escaped,
    /// each `{name}` becomes one capture and the pattern is anchored at both
    /// ends so trailing segments cannot dangle.
    pub fn compile(template: &str) -> Result<Self, regex::Error> {
        let stripped = template.split('?').next().unwrap_or_default();
        let mut pattern = String::with_capacity(stripped.len() + 16);
        pattern.push('^');
        let mut param_names = Vec::with_capacity(stripped.matches('{').count());

        let mut rest = stripped;
        while let Some(open) = rest.find('{') {
            let Some(len) = rest[open..].find('}') else {
                break;
            };
            pattern.push_str(&regex::escape(&rest[..open]));
            pattern.push_str(CAPTURE);
            param_names.push(rest[open + 1..open + len].trim().to_string());
            rest = &rest[open + len + 1..];
        }
        pattern.push_str(&regex::escape(rest));
        pattern.push('$');

        let literal_segments = stripped
            .split('/')
            .filter(|segment| !segment.is_empty() && !segment.contains('{'))
            .count();

        Ok(Self {
            template: template.to_string(),
            regex: Regex::new(&pattern)?,
            param_names,
            literal_segments,
        })
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names in declaration order.
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Number of segments without a placeholder; higher means more specific.
    #[must_use]
    pub fn specificity(&self) -> usize {
        self.literal_segments
    }

    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Ordered captures if `path` matches, one per placeholder.
    ///
    /// Matching runs on the raw path so an encoded `/` stays inside its
    /// segment; each capture is percent-decoded afterwards.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<ParamVec> {
        let caps = self.regex.captures(path)?;
        Some(
            caps.iter()
                .skip(1)
                .flatten()
                .map(|m| decode_segment(m.as_str()))
                .collect(),
        )
    }
}

/// Percent-decode one path segment. Sequences that do not decode to UTF-8
/// are kept as sent.
fn decode_segment(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            debug!(segment = %raw, error = %e, "Path segment is not valid UTF-8 once decoded");
            raw.to_string()
        }
    }
}
