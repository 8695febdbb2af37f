//! Provides the Location value type implementing the package location grammar.
//!
//! Locations name files and containers inside a package:
//!
//! ```text
//! /Doc_0/Pages/Page_0/Content.xml   absolute, from the package root
//! ./Res/image_1.png                 relative to the current container
//! ../Pages/Page_0/PageRes.xml       relative to the parent container
//! Pages/Page_0/PageRes.xml          relative (implicit current container)
//! ```
//!
//! Locations are case-sensitive and compared by string value.
use smallvec::SmallVec;

/// Separator between location segments
pub const SEPARATOR: char = '/';

/// Segments of a location, borrowed from its string.
pub type Parts<'a> = SmallVec<[&'a str; 8]>;

/// An immutable path value inside a package.
///
/// The wrapped string is stored trimmed. Derived operations such as
/// [`join`](Self::join) and [`parent_location`](Self::parent_location)
/// return new values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    /// The location string (e.g., "/Doc_0/Document.xml")
    loc: String,
}

impl Location {
    /// Parse a location string.
    ///
    /// Returns `None` for blank input: an absent location is not an error.
    pub fn parse(loc: &str) -> Option<Self> {
        let trimmed = loc.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self { loc: trimmed.to_string() })
        }
    }

    /// Wrap a string without trimming or blank checks.
    ///
    /// Used for derived values such as the empty parent of a bare file name.
    pub fn new<S: Into<String>>(loc: S) -> Self {
        Self { loc: loc.into() }
    }

    /// The package root location "/".
    pub fn root() -> Self {
        Self::new("/")
    }

    /// Get the full location string.
    pub fn as_str(&self) -> &str {
        &self.loc
    }

    /// Raw segments, including empty strings produced by leading, trailing
    /// or doubled separators. Prefer [`parts`](Self::parts).
    pub fn split(&self) -> std::str::Split<'_, char> {
        self.loc.split(SEPARATOR)
    }

    /// Ordered non-empty segments.
    ///
    /// `"/Doc_0//Pages/"` yields `["Doc_0", "Pages"]`.
    pub fn parts(&self) -> Parts<'_> {
        self.split().filter(|s| !s.trim().is_empty()).collect()
    }

    /// Everything before the last separator, or "" when there is none.
    ///
    /// For example, "/Pages/P1" for "/Pages/P1/Content.xml".
    pub fn parent(&self) -> &str {
        match self.loc.rfind(SEPARATOR) {
            Some(pos) => &self.loc[..pos],
            None => "",
        }
    }

    /// [`parent`](Self::parent) as a location value.
    pub fn parent_location(&self) -> Location {
        Location::new(self.parent())
    }

    /// Everything after the last separator.
    ///
    /// The full string when there is no separator, "" when the location ends
    /// with one.
    pub fn file_name(&self) -> &str {
        match self.loc.rfind(SEPARATOR) {
            Some(pos) => &self.loc[pos + 1..],
            None => &self.loc,
        }
    }

    /// Extension of the file name without the leading period, or "".
    pub fn extension(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(pos) if pos > 0 => &name[pos + 1..],
            _ => "",
        }
    }

    /// Join another location onto this one.
    ///
    /// Exactly one separator ends up between the two sides, whatever
    /// separators they already carry. Joining a blank location is a no-op.
    pub fn join<S: AsRef<str>>(&self, other: S) -> Location {
        let tail = other.as_ref().trim().trim_start_matches(SEPARATOR);
        if tail.is_empty() {
            return self.clone();
        }
        let head = self.loc.trim_end_matches(SEPARATOR);
        let mut joined = String::with_capacity(head.len() + 1 + tail.len());
        joined.push_str(head);
        joined.push(SEPARATOR);
        joined.push_str(tail);
        Location { loc: joined }
    }

    /// [`join`](Self::join) with an optional location; `None` is a no-op.
    pub fn join_opt(&self, other: Option<&Location>) -> Location {
        match other {
            Some(other) => self.join(other),
            None => self.clone(),
        }
    }

    /// True iff the location is absolute (starts with "/").
    pub fn is_root_path(&self) -> bool {
        self.loc.starts_with(SEPARATOR)
    }

    /// True for an empty or blank location.
    pub fn is_empty(&self) -> bool {
        self.loc.trim().is_empty()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.loc.starts_with(prefix)
    }

    pub fn ends_with(&self, suffix: &str) -> bool {
        self.loc.ends_with(suffix)
    }

    /// Lexically resolve "." and ".." segments and collapse separators.
    ///
    /// ".." never climbs above the first segment of an absolute location;
    /// leading ".." segments of a relative location are kept.
    pub fn normalize(&self) -> Location {
        let absolute = self.is_root_path();
        let mut parts: Parts<'_> = SmallVec::new();

        for part in self.parts() {
            match part {
                "." => {},
                ".." => match parts.last() {
                    Some(&last) if last != ".." => {
                        parts.pop();
                    },
                    _ if absolute => {},
                    _ => parts.push(".."),
                },
                _ => parts.push(part),
            }
        }

        let body = parts.join("/");
        if absolute {
            Location { loc: format!("/{}", body) }
        } else {
            Location { loc: body }
        }
    }

    /// Absolute form of this location when read from the container at `base`.
    ///
    /// Absolute locations are returned normalized and otherwise unchanged.
    pub fn resolve_against(&self, base: &Location) -> Location {
        if self.is_root_path() {
            self.normalize()
        } else {
            Location::root().join(base).join(self).normalize()
        }
    }

    /// Compare two location-like values by string value.
    pub fn equal<A: AsRef<str>, B: AsRef<str>>(a: A, b: B) -> bool {
        a.as_ref() == b.as_ref()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.loc)
    }
}

impl AsRef<str> for Location {
    fn as_ref(&self) -> &str {
        &self.loc
    }
}

impl From<&str> for Location {
    fn from(loc: &str) -> Self {
        Location::new(loc.trim())
    }
}

impl From<String> for Location {
    fn from(loc: String) -> Self {
        match Location::parse(&loc) {
            Some(parsed) => parsed,
            None => Location::new(String::new()),
        }
    }
}

impl PartialEq<str> for Location {
    fn eq(&self, other: &str) -> bool {
        self.loc == other
    }
}

impl PartialEq<&str> for Location {
    fn eq(&self, other: &&str) -> bool {
        self.loc == *other
    }
}

impl PartialEq<String> for Location {
    fn eq(&self, other: &String) -> bool {
        &self.loc == other
    }
}

impl PartialEq<Location> for str {
    fn eq(&self, other: &Location) -> bool {
        self == other.loc
    }
}

impl PartialEq<Location> for &str {
    fn eq(&self, other: &Location) -> bool {
        *self == other.loc
    }
}

impl PartialEq<Location> for String {
    fn eq(&self, other: &Location) -> bool {
        *self == other.loc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn loc(s: &str) -> Location {
        Location::parse(s).unwrap()
    }

    #[test]
    fn test_parse_blank_is_absent() {
        assert!(Location::parse("").is_none());
        assert!(Location::parse("   ").is_none());
        assert_eq!(loc("  /Doc_0/Document.xml "), "/Doc_0/Document.xml");
    }

    #[test]
    fn test_parent_and_file_name() {
        let l = loc("/Pages/P1/Content.xml");
        assert_eq!(l.parent(), "/Pages/P1");
        assert_eq!(l.parent_location(), "/Pages/P1");
        assert_eq!(l.file_name(), "Content.xml");
        assert_eq!(l.extension(), "xml");

        assert_eq!(loc("Pages/P1/").file_name(), "");
        assert_eq!(loc("Content.xml").parent(), "");
        assert_eq!(loc("Content.xml").file_name(), "Content.xml");
        assert_eq!(loc("/Content.xml").parent(), "");
    }

    #[test]
    fn test_parts_drop_empty_segments() {
        let l = loc("/Doc_0//Pages/Page_0/");
        assert_eq!(l.parts().as_slice(), &["Doc_0", "Pages", "Page_0"]);
        assert_eq!(l.split().count(), 6);
    }

    #[test]
    fn test_join() {
        assert_eq!(loc("/Doc_0/").join("/Res"), "/Doc_0/Res");
        assert_eq!(loc("/Doc_0").join("Res"), "/Doc_0/Res");
        assert_eq!(Location::root().join("Doc_0"), "/Doc_0");
        assert_eq!(loc("/Doc_0").join(""), "/Doc_0");
        assert_eq!(loc("/Doc_0").join_opt(None), "/Doc_0");
        assert_eq!(loc("Res").join(loc("a.png")), "Res/a.png");
    }

    #[test]
    fn test_root_path_and_equality() {
        assert!(loc("/Doc_0").is_root_path());
        assert!(!loc("Doc_0").is_root_path());
        assert!(Location::equal("Res", loc("Res")));
        assert!(Location::equal(loc("Res"), "Res"));
        assert!(!Location::equal("Res", "res"));
        assert_eq!("Res", loc("Res"));
        assert_eq!(String::from("Res"), loc("Res"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(loc("/Doc_0/Pages/../Res/./a.png").normalize(), "/Doc_0/Res/a.png");
        assert_eq!(loc("/../a.png").normalize(), "/a.png");
        assert_eq!(loc("../../Res/a.png").normalize(), "../../Res/a.png");
        assert_eq!(loc("Pages/../../x").normalize(), "../x");
        assert_eq!(loc("/").normalize(), "/");
    }

    #[test]
    fn test_resolve_against() {
        let base = loc("/Doc_0");
        assert_eq!(loc("Res/a.png").resolve_against(&base), "/Doc_0/Res/a.png");
        assert_eq!(loc("../OFD.xml").resolve_against(&base), "/OFD.xml");
        assert_eq!(loc("/Doc_1/x.xml").resolve_against(&base), "/Doc_1/x.xml");
    }

    fn segment() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_.]{1,8}"
    }

    fn raw_location() -> impl Strategy<Value = String> {
        (
            "/{0,2}",
            prop::collection::vec(segment(), 1..4),
            "/{0,2}",
        )
            .prop_map(|(lead, segs, trail)| format!("{}{}{}", lead, segs.join("/"), trail))
    }

    proptest! {
        #[test]
        fn prop_join_has_single_separator(a in raw_location(), b in raw_location()) {
            let joined = loc(&a).join(&b);
            let expected = format!(
                "{}/{}",
                a.trim_end_matches('/'),
                b.trim_start_matches('/'),
            );
            prop_assert_eq!(joined.as_str(), expected.as_str());
        }

        #[test]
        fn prop_parts_never_empty(a in raw_location()) {
            let l = loc(&a);
            prop_assert!(l.parts().iter().all(|p| !p.is_empty()));
        }
    }
}
