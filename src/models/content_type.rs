//! Content type tags identifying the site's metadata documents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One logical JSON document in the object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentType {
    Notices,
    Recruitments,
    Faqs,
    Albums,
    MassSchedule,
    Sacraments,
    Catechism,
    Bulletins,
    OrganizationPosts,
    Backups,
}

impl ContentType {
    pub const ALL: [ContentType; 10] = [
        ContentType::Notices,
        ContentType::Recruitments,
        ContentType::Faqs,
        ContentType::Albums,
        ContentType::MassSchedule,
        ContentType::Sacraments,
        ContentType::Catechism,
        ContentType::Bulletins,
        ContentType::OrganizationPosts,
        ContentType::Backups,
    ];

    /// Wire name used in query parameters, request bodies and object keys.
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Notices => "notices",
            ContentType::Recruitments => "recruitments",
            ContentType::Faqs => "faqs",
            ContentType::Albums => "albums",
            ContentType::MassSchedule => "massSchedule",
            ContentType::Sacraments => "sacraments",
            ContentType::Catechism => "catechism",
            ContentType::Bulletins => "bulletins",
            ContentType::OrganizationPosts => "organizationPosts",
            ContentType::Backups => "backups",
        }
    }

    /// Whether the write endpoint accepts this type.
    pub fn is_writable(self) -> bool {
        match self {
            ContentType::Albums | ContentType::Bulletins => true,
            ContentType::Notices
            | ContentType::Recruitments
            | ContentType::Faqs
            | ContentType::MassSchedule
            | ContentType::Sacraments
            | ContentType::Catechism
            | ContentType::OrganizationPosts
            | ContentType::Backups => false,
        }
    }

    /// Object store key holding this type's document.
    pub fn object_key(self) -> String {
        format!("metadata/{}.json", self.as_str())
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The input did not name a known content type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown content type: {0:?}")]
pub struct UnknownContentType(pub String);

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|ct| ct.as_str() == s)
            .ok_or_else(|| UnknownContentType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_exact() {
        assert_eq!("massSchedule".parse(), Ok(ContentType::MassSchedule));
        assert!("MassSchedule".parse::<ContentType>().is_err());
        assert!("mass_schedule".parse::<ContentType>().is_err());
        assert!("".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_wire_names_match_serde() {
        for ct in ContentType::ALL {
            let json = serde_json::to_value(ct).unwrap();
            assert_eq!(json, ct.as_str());
            assert_eq!(ct.as_str().parse::<ContentType>().unwrap(), ct);
        }
    }

    #[test]
    fn test_object_key_layout() {
        assert_eq!(
            ContentType::OrganizationPosts.object_key(),
            "metadata/organizationPosts.json"
        );
    }

    #[test]
    fn test_writable_subset() {
        let writable: Vec<_> = ContentType::ALL
            .into_iter()
            .filter(|ct| ct.is_writable())
            .collect();
        assert_eq!(writable, vec![ContentType::Albums, ContentType::Bulletins]);
    }
}
