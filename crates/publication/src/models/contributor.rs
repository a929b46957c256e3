use super::one_or_many;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Language tag preferred when flattening a language map to a single string.
const PREFERRED_LANGUAGE: &str = "en";

/// A string that is either plain or translated into several languages.
///
/// ```json
/// "Moby-Dick"
/// {"en": "Moby-Dick", "fr": "Moby Dick ou le Cachalot"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedString {
    Plain(String),
    /// Language tag to translation.
    Localized(BTreeMap<String, String>),
}
impl LocalizedString {
    /// The single best string to display.
    ///
    /// A language map resolves to its English entry, falling back to the
    /// first entry by language tag.
    ///
    /// ```
    /// use folio_publication::LocalizedString;
    /// use std::collections::BTreeMap;
    ///
    /// let map = BTreeMap::from([("fr".to_string(), "Le Titre".to_string()), ("en".to_string(), "The Title".to_string())]);
    /// assert_eq!(LocalizedString::Localized(map).text(), "The Title");
    /// assert_eq!(LocalizedString::from("Plain").text(), "Plain");
    /// ```
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Localized(translations) => translations
                .get(PREFERRED_LANGUAGE)
                .or_else(|| translations.values().next())
                .map(String::as_str)
                .unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }
}
impl Default for LocalizedString {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}
impl From<&str> for LocalizedString {
    fn from(value: &str) -> Self {
        Self::Plain(value.to_string())
    }
}
impl From<String> for LocalizedString {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}
impl Display for LocalizedString {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.text())
    }
}

/// A person or organisation credited on a publication (author, publisher,
/// narrator, ...).
///
/// In a manifest a contributor is either a bare name or an object; both
/// forms deserialize into this type. A contributor that is nothing but a
/// plain name serializes back to the bare string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ContributorRepr", into = "ContributorRepr")]
pub struct Contributor {
    pub name: LocalizedString,
    pub sort_as: Option<String>,
    pub roles: Vec<String>,
    pub identifier: Option<String>,
    /// Fields not modelled above (links, position, ...), kept for round-trips.
    pub additional: Map<String, Value>,
}
impl Contributor {
    pub fn new(name: impl Into<LocalizedString>) -> Self {
        Self {
            name: name.into(),
            sort_as: None,
            roles: Vec::new(),
            identifier: None,
            additional: Map::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.text()
    }

    fn is_name_only(&self) -> bool {
        matches!(self.name, LocalizedString::Plain(_))
            && self.sort_as.is_none()
            && self.roles.is_empty()
            && self.identifier.is_none()
            && self.additional.is_empty()
    }
}
impl Display for Contributor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ContributorRepr {
    Name(String),
    Object(ContributorObject),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributorObject {
    name: LocalizedString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sort_as: Option<String>,
    #[serde(
        default,
        rename = "role",
        deserialize_with = "one_or_many::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identifier: Option<String>,
    #[serde(flatten)]
    additional: Map<String, Value>,
}

impl From<ContributorRepr> for Contributor {
    fn from(repr: ContributorRepr) -> Self {
        match repr {
            ContributorRepr::Name(name) => Self::new(name),
            ContributorRepr::Object(object) => Self {
                name: object.name,
                sort_as: object.sort_as,
                roles: object.roles,
                identifier: object.identifier,
                additional: object.additional,
            },
        }
    }
}
impl From<Contributor> for ContributorRepr {
    fn from(contributor: Contributor) -> Self {
        if contributor.is_name_only() {
            return Self::Name(contributor.name.text().to_string());
        }
        Self::Object(ContributorObject {
            name: contributor.name,
            sort_as: contributor.sort_as,
            roles: contributor.roles,
            identifier: contributor.identifier,
            additional: contributor.additional,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!("Herman Melville"), "Herman Melville")]
    #[case(json!({"name": "Herman Melville", "sortAs": "Melville, Herman"}), "Herman Melville")]
    #[case(json!({"name": {"fr": "Jules Verne", "en": "Jules Verne (en)"}}), "Jules Verne (en)")]
    #[case(json!({"name": {"fr": "Jules Verne"}}), "Jules Verne")]
    fn test_contributor_forms(#[case] input: Value, #[case] expected: &str) {
        let contributor: Contributor = serde_json::from_value(input).unwrap();
        assert_eq!(contributor.display_name(), expected);
    }

    #[test]
    fn test_name_only_serializes_as_string() {
        let value = serde_json::to_value(Contributor::new("Herman Melville")).unwrap();
        assert_eq!(value, json!("Herman Melville"));
    }

    #[test]
    fn test_object_keeps_unknown_fields() {
        let input = json!({"name": "Penguin", "role": "publisher", "links": [{"href": "https://example.com"}]});
        let contributor: Contributor = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(contributor.roles, vec!["publisher".to_string()]);
        assert!(contributor.additional.contains_key("links"));
        let output = serde_json::to_value(&contributor).unwrap();
        assert_eq!(output, json!({"name": "Penguin", "role": ["publisher"], "links": [{"href": "https://example.com"}]}));
    }

    #[test]
    fn test_empty_language_map_is_empty() {
        assert!(LocalizedString::Localized(BTreeMap::new()).is_empty());
        assert!(LocalizedString::default().is_empty());
    }
}
