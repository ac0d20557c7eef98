use std::ffi::c_void;
use std::ptr;

/// One capability-extension record advertised by the host at instantiation.
///
/// The list a host passes is owned by the caller for the duration of the
/// instantiation call only; the core forwards it verbatim and never inspects
/// `data`.
#[derive(Clone, Debug)]
pub struct Feature {
    pub uri: String,
    pub data: *mut c_void,
}

impl Feature {
    pub fn new(uri: impl Into<String>, data: *mut c_void) -> Self {
        Self {
            uri: uri.into(),
            data,
        }
    }

    /// A feature advertised by URI alone.
    pub fn marker(uri: impl Into<String>) -> Self {
        Self::new(uri, ptr::null_mut())
    }
}

/// Look up a feature by URI.
pub fn find_feature<'a>(features: &'a [Feature], uri: &str) -> Option<&'a Feature> {
    features.iter().find(|feature| feature.uri == uri)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn find_matches_by_uri() {
        let features = vec![
            Feature::marker("http://example.org/feat#a"),
            Feature::marker("http://example.org/feat#b"),
        ];
        assert_eq!(
            find_feature(&features, "http://example.org/feat#b").map(|f| f.uri.as_str()),
            Some("http://example.org/feat#b")
        );
        assert_eq!(
            find_feature(&features, "http://example.org/feat#missing").map(|f| f.uri.as_str()),
            None
        );
    }
}
