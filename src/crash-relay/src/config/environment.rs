use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Deployment environment tag. Only `Dev` changes behaviour; every other tag
/// is treated as production-like.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Environment {
    Dev,
    Uat,
    Qa,
    Stg,
    Live,
    Other(String),
}

impl Environment {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "dev" => Environment::Dev,
            "uat" => Environment::Uat,
            "qa" => Environment::Qa,
            "stg" => Environment::Stg,
            "live" => Environment::Live,
            other => Environment::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Environment::Dev => "dev",
            Environment::Uat => "uat",
            Environment::Qa => "qa",
            Environment::Stg => "stg",
            Environment::Live => "live",
            Environment::Other(tag) => tag,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Environment::Dev)
    }
}

impl FromStr for Environment {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Environment::parse(s))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Environment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Environment::parse(&tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("dev", Environment::Dev)]
    #[case("uat", Environment::Uat)]
    #[case("qa", Environment::Qa)]
    #[case("stg", Environment::Stg)]
    #[case("live", Environment::Live)]
    #[case("DEV", Environment::Other("DEV".into()))]
    #[case("sandbox", Environment::Other("sandbox".into()))]
    fn test_parse_tag(#[case] tag: &str, #[case] expected: Environment) {
        let parsed = Environment::parse(tag);
        assert_eq!(parsed, expected);
        assert_eq!(parsed.as_str(), tag);
    }

    #[test]
    fn test_only_dev_is_dev() {
        assert!(Environment::Dev.is_dev());
        assert!(!Environment::Live.is_dev());
        assert!(!Environment::Other("development".into()).is_dev());
    }
}
