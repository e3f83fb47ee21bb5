// Data Model
// Collection kinds, entry records and the wire decoding rules for each list

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The three server-held lists managed by the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CollectionKind {
    /// Blocked domains
    Domains,
    /// Trusted sites exempted from filtering
    Sites,
    /// Known devices and their filtering state
    Devices,
}

impl CollectionKind {
    /// Every kind, in panel order
    pub const ALL: [CollectionKind; 3] = [Self::Domains, Self::Sites, Self::Devices];

    /// Path segment of the collection resource on the appliance
    pub fn resource(self) -> &'static str {
        match self {
            Self::Domains => "domains",
            Self::Sites => "sites",
            Self::Devices => "devices",
        }
    }

    /// Form field carrying the new name on a create request
    pub fn form_field(self) -> Option<&'static str> {
        match self {
            Self::Domains => Some("domain"),
            Self::Sites => Some("site"),
            Self::Devices => None,
        }
    }

    /// Whether entries can be added and removed from the console
    pub fn is_editable(self) -> bool {
        self.form_field().is_some()
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown collection '{0}' (expected domains, sites or devices)")]
pub struct UnknownKind(pub String);

impl FromStr for CollectionKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "domains" | "domain" => Ok(Self::Domains),
            "sites" | "site" => Ok(Self::Sites),
            "devices" | "device" => Ok(Self::Devices),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

/// A blocked host or domain pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub name: String,
}

/// A trusted site exempted from filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub name: String,
}

/// A device known to the appliance
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Device {
    /// Stable identifier; empty when the server omitted it or sent null
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,

    /// Human-readable label
    #[serde(default, deserialize_with = "deserialize_text")]
    pub display_name: String,

    /// Whether DNS filtering applies to this device
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_filtered: bool,
}

impl Device {
    /// Label shown for the device, falling back to its identifier
    pub fn label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

/// A boolean as it may arrive from the appliance
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
    Other(serde_json::Value),
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Normalize a wire flag to a strict boolean.
///
/// Strings compare against `"true"` ignoring case and surrounding whitespace;
/// anything that is neither a boolean nor such a string is false.
pub fn parse_boolean(value: &FlagValue) -> bool {
    match value {
        FlagValue::Bool(b) => *b,
        FlagValue::Text(s) => s.trim().eq_ignore_ascii_case("true"),
        FlagValue::Other(_) => false,
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<FlagValue>::deserialize(deserializer)?;
    Ok(value.as_ref().map(parse_boolean).unwrap_or(false))
}

/// A text field where null or a non-string value reads as empty
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(text)) => Ok(text),
        _ => Ok(String::new()),
    }
}

/// Normalize a user-submitted name: trimmed, lowercase, never blank
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// The full set of entries of one kind, as last reported by the server
#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    Domains(Vec<Domain>),
    Sites(Vec<Site>),
    Devices(Vec<Device>),
}

impl Collection {
    pub fn kind(&self) -> CollectionKind {
        match self {
            Self::Domains(_) => CollectionKind::Domains,
            Self::Sites(_) => CollectionKind::Sites,
            Self::Devices(_) => CollectionKind::Devices,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Domains(v) => v.len(),
            Self::Sites(v) => v.len(),
            Self::Devices(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry identities in received order, blanks included
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Domains(v) => v.iter().map(|d| d.name.as_str()).collect(),
            Self::Sites(v) => v.iter().map(|s| s.name.as_str()).collect(),
            Self::Devices(v) => v.iter().map(|d| d.name.as_str()).collect(),
        }
    }

    /// Decode a listing body for the given kind
    pub fn decode(kind: CollectionKind, body: &str) -> Result<Self, serde_json::Error> {
        match kind {
            CollectionKind::Domains => Ok(Self::Domains(parse_domain_listing(body)?)),
            CollectionKind::Sites => Ok(Self::Sites(parse_sites(body)?)),
            CollectionKind::Devices => Ok(Self::Devices(parse_devices(body)?)),
        }
    }
}

/// A list element that is either a bare name or an object with a `name`
#[derive(Deserialize)]
#[serde(untagged)]
enum NamedRecord {
    Bare(String),
    Object {
        #[serde(default, deserialize_with = "deserialize_text")]
        name: String,
    },
    /// null, numbers and the like; no identity
    Other(serde_json::Value),
}

impl NamedRecord {
    fn into_name(self) -> String {
        match self {
            Self::Bare(name) | Self::Object { name } => name,
            Self::Other(_) => String::new(),
        }
    }
}

/// A device listing element; anything that is not a device record has no identity
#[derive(Deserialize)]
#[serde(untagged)]
enum DeviceRecord {
    Record(Device),
    Other(serde_json::Value),
}

impl DeviceRecord {
    fn into_device(self) -> Device {
        match self {
            Self::Record(device) => device,
            Self::Other(_) => Device::default(),
        }
    }
}

fn parse_named(body: &str) -> Result<Vec<String>, serde_json::Error> {
    let records: Vec<NamedRecord> = serde_json::from_str(body)?;
    Ok(records.into_iter().map(NamedRecord::into_name).collect())
}

fn looks_like_json(body: &str) -> bool {
    body.trim_start().starts_with('[')
}

/// Decode the domain listing, either a JSON array or newline-delimited text.
///
/// Text listings keep blank lines as empty names; the renderer drops them.
pub fn parse_domain_listing(body: &str) -> Result<Vec<Domain>, serde_json::Error> {
    let names = if looks_like_json(body) {
        parse_named(body)?
    } else {
        body.split('\n')
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect()
    };
    Ok(names.into_iter().map(|name| Domain { name }).collect())
}

/// Decode the trusted-site listing (JSON array of `{name}` or strings)
pub fn parse_sites(body: &str) -> Result<Vec<Site>, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(parse_named(body)?.into_iter().map(|name| Site { name }).collect())
}

/// Decode the device listing (JSON array of device records).
///
/// Elements that are not records decode to a nameless device, which the
/// renderer skips.
pub fn parse_devices(body: &str) -> Result<Vec<Device>, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let records: Vec<DeviceRecord> = serde_json::from_str(body)?;
    Ok(records.into_iter().map(DeviceRecord::into_device).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_boolean_accepts_strings_and_bools() {
        assert!(parse_boolean(&"True".into()));
        assert!(parse_boolean(&" TRUE ".into()));
        assert!(!parse_boolean(&"False".into()));
        assert!(!parse_boolean(&"yes".into()));
        assert!(parse_boolean(&true.into()));
        assert!(!parse_boolean(&false.into()));
        assert!(!parse_boolean(&FlagValue::Other(serde_json::json!(1))));
    }

    #[test]
    fn normalize_name_trims_and_lowercases() {
        assert_eq!(normalize_name("Example.COM"), Some("example.com".to_string()));
        assert_eq!(normalize_name("  Ads.Net \n"), Some("ads.net".to_string()));
        assert_eq!(normalize_name(""), None);
        assert_eq!(normalize_name(" \t "), None);
    }

    #[test]
    fn kind_from_str() {
        assert_eq!("Domains".parse::<CollectionKind>(), Ok(CollectionKind::Domains));
        assert_eq!("site".parse::<CollectionKind>(), Ok(CollectionKind::Sites));
        assert!("printers".parse::<CollectionKind>().is_err());
    }

    #[test]
    fn domain_listing_text_keeps_order_and_blanks() {
        let domains = parse_domain_listing("b.com\na.com\n").unwrap();
        let names: Vec<_> = domains.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["b.com", "a.com", ""]);
    }

    #[test]
    fn domain_listing_json_variants() {
        let domains = parse_domain_listing(r#"["a.com", {"name": "b.com"}]"#).unwrap();
        assert_eq!(domains.len(), 2);
        assert_eq!(domains[1].name, "b.com");
    }

    #[test]
    fn devices_normalize_flags_and_tolerate_missing_fields() {
        let body = r#"[
            {"name": "d1", "display_name": "D1", "is_filtered": "True"},
            {"name": "d2", "is_filtered": false},
            {"display_name": "D3"},
            {"name": "d4", "is_filtered": null}
        ]"#;
        let devices = parse_devices(body).unwrap();
        assert_eq!(devices.len(), 4);
        assert!(devices[0].is_filtered);
        assert!(!devices[1].is_filtered);
        assert_eq!(devices[1].label(), "d2");
        assert_eq!(devices[2].name, "");
        assert!(!devices[3].is_filtered);
    }

    #[test]
    fn null_fields_and_stray_elements_do_not_fail_the_listing() {
        let body = r#"[
            {"name": "d1", "display_name": null, "is_filtered": true},
            {"name": null, "display_name": "D2"},
            null,
            42,
            {"name": 7, "display_name": "D4"}
        ]"#;
        let devices = parse_devices(body).unwrap();
        let names: Vec<_> = devices.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["d1", "", "", "", ""]);
        assert_eq!(devices[0].label(), "d1");
        assert!(devices[0].is_filtered);
        assert_eq!(devices[1].display_name, "D2");

        let sites = parse_sites(r#"[{"name": "a.org"}, {"name": null}, null, 3, "b.org"]"#).unwrap();
        let names: Vec<_> = sites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a.org", "", "", "", "b.org"]);

        let domains = parse_domain_listing(r#"[null, "ads.com", {"name": null}, {}]"#).unwrap();
        let names: Vec<_> = domains.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["", "ads.com", "", ""]);
    }

    #[test]
    fn empty_bodies_decode_to_empty_collections() {
        assert!(Collection::decode(CollectionKind::Sites, "").unwrap().is_empty());
        assert!(Collection::decode(CollectionKind::Devices, "  ").unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Collection::decode(CollectionKind::Devices, "{not json").is_err());
    }
}
