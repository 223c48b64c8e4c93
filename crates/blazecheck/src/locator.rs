//! Symbolic element references.
//!
//! A [`Locator`] names one element of the storefront by one of four
//! strategies. A [`LocatorTemplate`] is a parameterized locator whose `{}`
//! placeholder is filled with a product name, price or index at lookup time.
//! Binding substitutes the argument verbatim: matching stays exact and
//! case-sensitive.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder token inside a [`LocatorTemplate`] pattern
pub const PLACEHOLDER: &str = "{}";

/// Lookup strategy of a selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Anchor whose trimmed text equals the value
    LinkText,
    /// Element id
    Id,
    /// CSS selector
    Css,
    /// XPath expression
    XPath,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LinkText => "link text",
            Self::Id => "id",
            Self::Css => "css",
            Self::XPath => "xpath",
        };
        f.write_str(name)
    }
}

/// Selector for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// Anchor with exact link text
    LinkText(String),
    /// Element id
    Id(String),
    /// CSS selector
    Css(String),
    /// XPath expression
    XPath(String),
}

impl Selector {
    /// Build a selector from a strategy and a value
    #[must_use]
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        let value = value.into();
        match strategy {
            Strategy::LinkText => Self::LinkText(value),
            Strategy::Id => Self::Id(value),
            Strategy::Css => Self::Css(value),
            Strategy::XPath => Self::XPath(value),
        }
    }

    /// Strategy of this selector
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        match self {
            Self::LinkText(_) => Strategy::LinkText,
            Self::Id(_) => Strategy::Id,
            Self::Css(_) => Strategy::Css,
            Self::XPath(_) => Strategy::XPath,
        }
    }

    /// Raw selector value
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::LinkText(v) | Self::Id(v) | Self::Css(v) | Self::XPath(v) => v,
        }
    }

    /// JavaScript expression evaluating to the first matching element or `null`
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::LinkText(t) => format!(
                "Array.from(document.querySelectorAll('a')).find(el => el.textContent.trim() === {t:?}) || null"
            ),
            Self::Id(id) => format!("document.getElementById({id:?})"),
            Self::Css(s) => format!("document.querySelector({s:?})"),
            Self::XPath(s) => {
                format!("document.evaluate({s:?}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue")
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

/// A named reference to one element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    selector: Selector,
    description: String,
}

impl Locator {
    /// Create a locator from a selector and a human-readable description
    #[must_use]
    pub fn new(selector: Selector, description: impl Into<String>) -> Self {
        Self {
            selector,
            description: description.into(),
        }
    }

    /// Locate an anchor by its exact link text
    #[must_use]
    pub fn link_text(text: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Selector::LinkText(text.into()), description)
    }

    /// Locate by element id
    #[must_use]
    pub fn id(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Selector::Id(id.into()), description)
    }

    /// Locate by CSS selector
    #[must_use]
    pub fn css(css: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Selector::Css(css.into()), description)
    }

    /// Locate by XPath
    #[must_use]
    pub fn xpath(xpath: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Selector::XPath(xpath.into()), description)
    }

    /// The selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The description used in logs and failure messages
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.description, self.selector)
    }
}

/// A locator with one `{}` placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorTemplate {
    strategy: Strategy,
    pattern: &'static str,
    description: &'static str,
}

impl LocatorTemplate {
    /// Create a template; `pattern` must contain [`PLACEHOLDER`]
    #[must_use]
    pub const fn new(strategy: Strategy, pattern: &'static str, description: &'static str) -> Self {
        Self {
            strategy,
            pattern,
            description,
        }
    }

    /// Template pattern
    #[must_use]
    pub const fn pattern(&self) -> &'static str {
        self.pattern
    }

    /// Fill every placeholder with `arg` exactly as given
    #[must_use]
    pub fn bind(&self, arg: impl fmt::Display) -> Locator {
        let arg = arg.to_string();
        let value = self.pattern.replace(PLACEHOLDER, &arg);
        Locator::new(
            Selector::new(self.strategy, value),
            format!("{} '{arg}'", self.description),
        )
    }
}

/// How an element's text is compared with an expectation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextMatch {
    /// Trimmed text equals the value
    Exact(String),
    /// Text contains the value
    Contains(String),
}

impl TextMatch {
    /// Exact match
    #[must_use]
    pub fn exact(text: impl Into<String>) -> Self {
        Self::Exact(text.into())
    }

    /// Substring match
    #[must_use]
    pub fn contains(text: impl Into<String>) -> Self {
        Self::Contains(text.into())
    }

    /// Expected text
    #[must_use]
    pub fn expected(&self) -> &str {
        match self {
            Self::Exact(t) | Self::Contains(t) => t,
        }
    }

    /// Whether `actual` satisfies this expectation
    #[must_use]
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            Self::Exact(t) => actual.trim() == t,
            Self::Contains(t) => actual.contains(t.as_str()),
        }
    }

    /// Failure message for a non-matching `actual`
    #[must_use]
    pub fn describe_mismatch(&self, actual: &str) -> String {
        match self {
            Self::Exact(t) => format!("Expected text '{t}' but got '{}'", actual.trim()),
            Self::Contains(t) => format!("Expected text containing '{t}' but got '{actual}'"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use super::Strategy;
    #[allow(unused_imports)]
    use proptest::strategy::Strategy as _;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_query() {
            let s = Selector::Css("#cartur".into());
            assert_eq!(s.to_query(), "document.querySelector(\"#cartur\")");
        }

        #[test]
        fn test_xpath_query() {
            let s = Selector::XPath("//h2[text()='Products']".into());
            assert!(s.to_query().contains("FIRST_ORDERED_NODE_TYPE"));
        }

        #[test]
        fn test_link_text_query_is_exact() {
            let s = Selector::LinkText("Add to cart".into());
            assert!(s.to_query().contains("=== \"Add to cart\""));
        }

        #[test]
        fn test_id_query() {
            let s = Selector::Id("recipient-email".into());
            assert_eq!(s.to_query(), "document.getElementById(\"recipient-email\")");
        }

        #[test]
        fn test_display() {
            let s = Selector::Id("name".into());
            assert_eq!(s.to_string(), "id=name");
        }
    }

    mod template_tests {
        use super::*;

        const PRICE: LocatorTemplate =
            LocatorTemplate::new(Strategy::XPath, "//h5[text()='{}']", "Product price");

        #[test]
        fn test_bind_price() {
            let loc = PRICE.bind("$360");
            assert_eq!(loc.selector(), &Selector::XPath("//h5[text()='$360']".into()));
            assert_eq!(loc.description(), "Product price '$360'");
        }

        #[test]
        fn test_bind_index() {
            let t = LocatorTemplate::new(Strategy::XPath, "(//a[text()='Delete'])[{}]", "Delete");
            assert_eq!(t.bind(2).selector().value(), "(//a[text()='Delete'])[2]");
        }

        #[test]
        fn test_bind_keeps_case() {
            let t = LocatorTemplate::new(Strategy::LinkText, "{}", "Product link");
            let loc = t.bind("Samsung galaxy s6");
            assert_eq!(loc.selector(), &Selector::LinkText("Samsung galaxy s6".into()));
            assert_ne!(loc.selector(), &Selector::LinkText("Samsung Galaxy S6".into()));
        }

        proptest! {
            #[test]
            fn prop_bind_embeds_argument(arg in "[A-Za-z0-9 $.]{1,24}") {
                let t = LocatorTemplate::new(Strategy::XPath, "//td[text()='{}']", "Cell");
                let loc = t.bind(&arg);
                let expected = format!("//td[text()='{arg}']");
                prop_assert_eq!(loc.selector().value(), expected.as_str());
                prop_assert_eq!(loc.selector().strategy(), Strategy::XPath);
            }

            #[test]
            fn prop_distinct_args_give_distinct_locators(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
                prop_assume!(a != b);
                let t = LocatorTemplate::new(Strategy::LinkText, "{}", "Link");
                prop_assert_ne!(t.bind(&a), t.bind(&b));
            }
        }
    }

    mod text_match_tests {
        use super::*;

        #[test]
        fn test_exact_trims_actual() {
            assert!(TextMatch::exact("Home").matches("  Home \n"));
            assert!(!TextMatch::exact("Home").matches("Home (current)"));
        }

        #[test]
        fn test_exact_is_case_sensitive() {
            assert!(!TextMatch::exact("Cart").matches("cart"));
        }

        #[test]
        fn test_contains() {
            let m = TextMatch::contains("$360");
            assert!(m.matches("$360 *includes tax"));
            assert!(!m.matches("$820 *includes tax"));
        }

        #[test]
        fn test_mismatch_message() {
            let msg = TextMatch::exact("Total").describe_mismatch("Sum");
            assert_eq!(msg, "Expected text 'Total' but got 'Sum'");
        }
    }
}
