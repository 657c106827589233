//! Validated trip requests.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A city plus the interests a traveller selected, validated on construction.
///
/// The city is stored trimmed. Interests keep their selection order; blank
/// entries are rejected and repeated entries collapse onto the first
/// occurrence. Once built the request cannot be mutated.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTripRequest")]
pub struct TripRequest {
    city: String,
    interests: Vec<String>,
}

impl TripRequest {
    /// Builds a request from a city and the interests in selection order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the city is blank or if no non-blank
    /// interest was supplied.
    pub fn new<I, S>(city: impl AsRef<str>, interests: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        interests
            .into_iter()
            .try_fold(Self::builder(city.as_ref()), |builder, interest| {
                builder.interest(interest.as_ref())
            })?
            .build()
    }

    /// Starts building a request for the supplied city.
    #[must_use]
    pub fn builder(city: impl Into<String>) -> TripRequestBuilder {
        TripRequestBuilder {
            city: city.into(),
            interests: Vec::new(),
        }
    }

    /// Destination city, trimmed.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Interests in the order they were selected.
    #[must_use]
    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    /// Interests joined with `", "`, preserving selection order.
    #[must_use]
    pub fn joined_interests(&self) -> String {
        self.interests.join(", ")
    }
}

/// Builder for [`TripRequest`].
#[derive(Debug)]
pub struct TripRequestBuilder {
    city: String,
    interests: Vec<String>,
}

impl TripRequestBuilder {
    /// Appends an interest, ignoring it if it was already selected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the interest is blank.
    pub fn interest(mut self, interest: impl AsRef<str>) -> Result<Self> {
        let interest = interest.as_ref().trim();
        if interest.is_empty() {
            return Err(Error::validation("interests cannot contain blank entries"));
        }
        if !self.interests.iter().any(|existing| existing == interest) {
            self.interests.push(interest.to_owned());
        }
        Ok(self)
    }

    /// Finalises the request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the city is blank or no interest was
    /// added.
    pub fn build(self) -> Result<TripRequest> {
        let city = self.city.trim();
        if city.is_empty() {
            return Err(Error::validation("city cannot be empty"));
        }
        if self.interests.is_empty() {
            return Err(Error::validation("select at least one interest"));
        }

        Ok(TripRequest {
            city: city.to_owned(),
            interests: self.interests,
        })
    }
}

#[derive(Deserialize)]
struct RawTripRequest {
    city: String,
    #[serde(default)]
    interests: Vec<String>,
}

impl TryFrom<RawTripRequest> for TripRequest {
    type Error = Error;

    fn try_from(raw: RawTripRequest) -> Result<Self> {
        Self::new(raw.city, raw.interests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_order_and_collapses_duplicates() {
        let request =
            TripRequest::new("Lisbon", ["History", "Coffee", "History", " Viewpoints "]).unwrap();

        assert_eq!(request.city(), "Lisbon");
        assert_eq!(request.interests(), &["History", "Coffee", "Viewpoints"]);
        assert_eq!(request.joined_interests(), "History, Coffee, Viewpoints");
    }

    #[test]
    fn trims_city() {
        let request = TripRequest::new("  Tokyo \n", ["Food"]).unwrap();
        assert_eq!(request.city(), "Tokyo");
    }

    #[test]
    fn rejects_blank_city() {
        let err = TripRequest::new("   ", ["Art"]).expect_err("blank city");
        assert!(err.is_validation());
    }

    #[test]
    fn rejects_empty_interests_regardless_of_city() {
        for city in ["Lisbon", "", "Barcelona"] {
            let err = TripRequest::new(city, Vec::<String>::new()).expect_err("no interests");
            assert!(err.is_validation());
        }
    }

    #[test]
    fn rejects_blank_interest() {
        let err = TripRequest::builder("Vienna")
            .interest("Art")
            .unwrap()
            .interest("  ")
            .expect_err("blank interest");
        assert!(err.is_validation());
    }

    #[test]
    fn accepts_long_city_and_free_text_interest() {
        let city = "Llanfairpwllgwyngyllgogerychwyrndrobwllllantysiliogogogoch ".repeat(4);
        let interest = "Ça vaut le détour: cafés, librairies anciennes et marchés couverts ".repeat(2);

        let request = TripRequest::new(&city, [&interest]).unwrap();
        assert_eq!(request.city(), city.trim());
        assert_eq!(request.interests(), &[interest.trim()]);
    }

    #[test]
    fn deserialization_validates() {
        let ok: TripRequest =
            serde_json::from_str(r#"{"city":"Lisbon","interests":["Music"]}"#).unwrap();
        assert_eq!(ok.interests(), &["Music"]);

        let err = serde_json::from_str::<TripRequest>(r#"{"city":"Lisbon","interests":[]}"#);
        assert!(err.is_err());
    }
}
