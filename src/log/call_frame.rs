use std::{
    fmt,
    panic::Location,
    path::{Path, PathBuf},
};

const UNKNOWN: &str = "?";

/// One entry of a captured call stack.
///
/// A frame is immutable once built. `type_name` is the owning path of the
/// function (`my_app::net::Client` for `my_app::net::Client::connect`),
/// `method` its last segment and `file` the bare source-file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    type_name: String,
    method: String,
    file: String,
    line: u32,
    path: Option<PathBuf>,
}

impl CallFrame {
    pub fn new(
        type_name: impl Into<String>,
        method: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            method: method.into(),
            file: file.into(),
            line,
            path: None,
        }
    }

    /// Builds a frame from a demangled symbol name and its debug location.
    pub(crate) fn from_symbol(symbol: &str, path: Option<&Path>, line: Option<u32>) -> Self {
        let (type_name, method) = split_symbol(symbol);
        let file = path
            .and_then(Path::file_name)
            .map_or_else(|| UNKNOWN.to_string(), |f| f.to_string_lossy().into_owned());
        Self {
            type_name,
            method,
            file,
            line: line.unwrap_or(0),
            path: path.map(Path::to_path_buf),
        }
    }

    /// Frame for a call site known only through `#[track_caller]`.
    pub(crate) fn from_location(location: &Location<'_>) -> Self {
        let path = Path::new(location.file());
        let file = path
            .file_name()
            .map_or_else(|| location.file().to_string(), |f| f.to_string_lossy().into_owned());
        Self {
            type_name: UNKNOWN.to_string(),
            method: UNKNOWN.to_string(),
            file,
            line: location.line(),
            path: Some(path.to_path_buf()),
        }
    }

    /// Takes file and line from `location` when debug info had none.
    pub(crate) fn or_location(mut self, location: &Location<'_>) -> Self {
        if self.line == 0 || self.file == UNKNOWN {
            let located = Self::from_location(location);
            self.file = located.file;
            self.line = located.line;
            self.path = located.path;
        }
        self
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Whether this frame sits on the given caller location.
    ///
    /// Compiler locations are crate-relative while debug info usually holds
    /// absolute paths, so the comparison is a path-suffix match.
    pub(crate) fn is_at(&self, location: &Location<'_>) -> bool {
        self.line == location.line()
            && self
                .path
                .as_deref()
                .is_some_and(|p| p.ends_with(location.file()))
    }

    /// `type::path::method` as the symbol was reported.
    pub(crate) fn qualified_name(&self) -> String {
        if self.type_name.is_empty() {
            self.method.clone()
        } else {
            format!("{}::{}", self.type_name, self.method)
        }
    }
}

/// Renders as `<type>.<method>(<file>:<line>)`.
impl fmt::Display for CallFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.type_name.is_empty() {
            write!(f, "{}({}:{})", self.method, self.file, self.line)
        } else {
            write!(
                f,
                "{}.{}({}:{})",
                self.type_name, self.method, self.file, self.line
            )
        }
    }
}

/// Splits `a::b::C::m` into (`a::b::C`, `m`).
///
/// Only separators outside of `<...>` count, so `<T as Trait>::m` keeps the
/// qualified self type intact. A wrapping `<Type>` left by v0 demangling is
/// unwrapped when it is not a trait cast.
fn split_symbol(symbol: &str) -> (String, String) {
    let mut depth: usize = 0;
    let mut split_at = None;
    let bytes = symbol.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            // `->` in an `fn(..) -> T` argument closes nothing.
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' => depth = depth.saturating_sub(1),
            // A turbofish `::<..>` belongs to the method name.
            b':' if depth == 0
                && bytes.get(i + 1) == Some(&b':')
                && bytes.get(i + 2) != Some(&b'<') =>
            {
                split_at = Some(i);
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }

    match split_at {
        Some(pos) => {
            let owner = &symbol[..pos];
            let owner = owner
                .strip_prefix('<')
                .and_then(|o| o.strip_suffix('>'))
                .filter(|o| !o.contains(" as "))
                .unwrap_or(owner);
            (owner.to_string(), symbol[pos + 2..].to_string())
        }
        None => (String::new(), symbol.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_paths() {
        let (t, m) = split_symbol("my_app::net::Client::connect");
        assert_eq!(t, "my_app::net::Client");
        assert_eq!(m, "connect");
    }

    #[test]
    fn keeps_trait_casts_together() {
        let (t, m) = split_symbol("<my_app::Foo as core::fmt::Display>::fmt");
        assert_eq!(t, "<my_app::Foo as core::fmt::Display>");
        assert_eq!(m, "fmt");
    }

    #[test]
    fn unwraps_v0_inherent_owner() {
        let (t, m) = split_symbol("<my_app::Foo>::bar");
        assert_eq!(t, "my_app::Foo");
        assert_eq!(m, "bar");
    }

    #[test]
    fn arrow_in_generic_args_is_not_a_closing_bracket() {
        let (t, m) = split_symbol("app::run::<fn() -> core::result::Result<(), E>>");
        assert_eq!(t, "app");
        assert_eq!(m, "run::<fn() -> core::result::Result<(), E>>");

        let (t, m) = split_symbol("app::Worker<fn(u8) -> u8>::poll");
        assert_eq!(t, "app::Worker<fn(u8) -> u8>");
        assert_eq!(m, "poll");
    }

    #[test]
    fn missing_debug_location_is_taken_from_the_caller() {
        let here = Location::caller();
        let frame = CallFrame::from_symbol("app::Screen::on_click", None, None).or_location(here);
        assert_eq!(frame.type_name(), "app::Screen");
        assert_eq!(frame.method(), "on_click");
        assert_eq!(frame.file(), "call_frame.rs");
        assert_eq!(frame.line(), here.line());
        assert!(frame.is_at(here));
    }

    #[test]
    fn known_debug_location_is_kept() {
        let frame = CallFrame::from_symbol(
            "app::Screen::on_click",
            Some(Path::new("/src/app/screen.rs")),
            Some(42),
        )
        .or_location(Location::caller());
        assert_eq!(frame.to_string(), "app::Screen.on_click(screen.rs:42)");
    }

    #[test]
    fn bare_function_has_no_owner() {
        let (t, m) = split_symbol("main");
        assert!(t.is_empty());
        assert_eq!(m, "main");
    }

    #[test]
    fn display_renders_type_dot_method() {
        let frame = CallFrame::new("app::Screen", "on_click", "screen.rs", 42);
        assert_eq!(frame.to_string(), "app::Screen.on_click(screen.rs:42)");
    }

    #[test]
    fn symbol_frame_keeps_file_name_only() {
        let frame = CallFrame::from_symbol(
            "app::Screen::on_click",
            Some(Path::new("/home/dev/app/src/screen.rs")),
            Some(7),
        );
        assert_eq!(frame.file(), "screen.rs");
        assert_eq!(frame.line(), 7);
        assert_eq!(frame.qualified_name(), "app::Screen::on_click");
    }

    #[test]
    fn location_frame_matches_its_own_location() {
        let here = Location::caller();
        let frame = CallFrame::from_location(here);
        assert!(frame.is_at(here));
        assert_eq!(frame.type_name(), "?");
    }
}
