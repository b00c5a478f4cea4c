//! Serviceable delivery cities.

use core::fmt;

use serde::{Deserialize, Serialize, de};

/// Error returned when a city is not in the serviceable set.
#[derive(thiserror::Error, Debug, Clone)]
pub enum CityError {
    /// The city is not one of the serviceable Tricity areas.
    #[error("city '{0}' is outside the serviceable area")]
    OutsideServiceArea(String),
}

/// A serviceable delivery city.
///
/// Trikart delivers only within the Tricity area. Parsing is
/// case-insensitive (`"chandigarh"`, `"CHANDIGARH"`, and `"Chandigarh"` are
/// all accepted); the canonical capitalized form is used for display,
/// serialization, and storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum City {
    Chandigarh,
    Mohali,
    Panchkula,
}

impl City {
    /// All serviceable cities.
    pub const ALL: [Self; 3] = [Self::Chandigarh, Self::Mohali, Self::Panchkula];

    /// The canonical name of the city.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chandigarh => "Chandigarh",
            Self::Mohali => "Mohali",
            Self::Panchkula => "Panchkula",
        }
    }

    /// Parse a `City` from a string, case-insensitively.
    ///
    /// Leading and trailing whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `CityError::OutsideServiceArea` if the input does not match
    /// any serviceable city.
    pub fn parse(s: &str) -> Result<Self, CityError> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|city| trimmed.eq_ignore_ascii_case(city.as_str()))
            .ok_or_else(|| CityError::OutsideServiceArea(trimmed.to_owned()))
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for City {
    type Err = CityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Deserialization goes through the case-insensitive parser so request
// bodies and stored rows share one validation path.
impl<'de> Deserialize<'de> for City {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}

// SQLx support (with sqlite feature)
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for City {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for City {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<'r, sqlx::Sqlite>>::decode(value)?;
        Ok(Self::parse(s)?)
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for City {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<'q, sqlx::Sqlite>>::encode(self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical() {
        assert_eq!(City::parse("Chandigarh").unwrap(), City::Chandigarh);
        assert_eq!(City::parse("Mohali").unwrap(), City::Mohali);
        assert_eq!(City::parse("Panchkula").unwrap(), City::Panchkula);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(City::parse("chandigarh").unwrap(), City::Chandigarh);
        assert_eq!(City::parse("MOHALI").unwrap(), City::Mohali);
        assert_eq!(City::parse("pAnChKuLa").unwrap(), City::Panchkula);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(City::parse("  Mohali ").unwrap(), City::Mohali);
    }

    #[test]
    fn test_parse_outside_service_area() {
        assert!(matches!(
            City::parse("Delhi"),
            Err(CityError::OutsideServiceArea(_))
        ));
        assert!(matches!(
            City::parse(""),
            Err(CityError::OutsideServiceArea(_))
        ));
    }

    #[test]
    fn test_display_canonical_form() {
        assert_eq!(City::Chandigarh.to_string(), "Chandigarh");
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&City::Mohali).unwrap();
        assert_eq!(json, "\"Mohali\"");

        let parsed: City = serde_json::from_str("\"mohali\"").unwrap();
        assert_eq!(parsed, City::Mohali);
    }

    #[test]
    fn test_deserialize_rejects_unknown() {
        assert!(serde_json::from_str::<City>("\"Delhi\"").is_err());
    }
}
