use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The JSON body of an LCP license (`license.lcpl`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseDocument {
    pub id: String,
    pub issued: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    pub provider: String,
    pub encryption: Encryption,
    #[serde(default)]
    pub links: Vec<LicenseLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rights: Option<Rights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    pub signature: Signature,
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}
impl LicenseDocument {
    /// The link to the License Status Document, if the provider publishes one.
    pub fn status_link(&self) -> Option<&LicenseLink> {
        self.links.iter().find(|link| link.rel.iter().any(|rel| rel == "status"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encryption {
    pub profile: String,
    pub content_key: ContentKey,
    pub user_key: UserKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentKey {
    pub algorithm: String,
    pub encrypted_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserKey {
    pub algorithm: String,
    /// Shown to the reader when prompting for their passphrase.
    pub text_hint: String,
    pub key_check: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseLink {
    /// Link relations; LCP allows a single string or an array.
    #[serde(deserialize_with = "crate::models::one_or_many::deserialize")]
    pub rel: Vec<String>,
    pub href: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// Usage rights granted by the license.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rights {
    /// Number of pages that may be printed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print: Option<u64>,
    /// Number of characters that may be copied to the clipboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Names of the fields above that are encrypted with the user key.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub encrypted: Vec<String>,
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub algorithm: String,
    pub certificate: String,
    pub value: String,
}
