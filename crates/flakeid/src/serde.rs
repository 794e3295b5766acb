//! `#[serde(with = "...")]` adapters for [`FlakeId`](crate::FlakeId) fields.
//!
//! `FlakeId` itself serializes as its raw `u64`. Use [`as_text`] to store the
//! 11-character text form instead, or [`as_integer`] to make the integer form
//! explicit at the field.

pub mod as_integer {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::FlakeId;

    /// Serialize an ID as its `u64` integer form.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &FlakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_integer().serialize(s)
    }

    /// Deserialize an ID from its `u64` integer form. Every `u64` is
    /// accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails.
    pub fn deserialize<'de, D>(d: D) -> Result<FlakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(d).map(FlakeId::from_integer)
    }
}

pub mod as_text {
    use core::{fmt, marker::PhantomData};

    use serde::{Deserializer, Serializer, de};

    use crate::FlakeId;

    /// Serialize an ID as its URL-safe base64 text form.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &FlakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&id.to_text())
    }

    /// Deserialize an ID from its URL-safe base64 text form.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not exactly 11 characters of unpadded URL-safe base64
    pub fn deserialize<'de, D>(d: D) -> Result<FlakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TextVisitor(PhantomData<FlakeId>);

        impl de::Visitor<'_> for TextVisitor {
            type Value = FlakeId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an 11 character URL-safe base64 string")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                FlakeId::from_text(v).map_err(de::Error::custom)
            }
        }

        d.deserialize_str(TextVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;
    use crate::{EncodingError, Error, FlakeId};

    const INTEGER: u64 = 6_335_079_166_850_929_824;

    #[test]
    fn bare_id_is_transparent() {
        let id = FlakeId::from_integer(INTEGER);
        assert_eq!(serde_json::to_value(id).unwrap(), json!(INTEGER));
        let back: FlakeId = serde_json::from_value(json!(INTEGER)).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn integer_roundtrip() {
        #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
        struct Row {
            #[serde(with = "as_integer")]
            event_id: FlakeId,
        }
        let row = Row {
            event_id: FlakeId::from_integer(42),
        };

        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(json, r#"{"event_id":42}"#);
        let back: Row = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, row);

        let any: Row = serde_json::from_value(json!({"event_id": u64::MAX})).unwrap();
        assert_eq!(any.event_id, FlakeId::MAX);
    }

    #[test]
    fn text_roundtrip() {
        #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
        struct Row {
            #[serde(with = "as_text")]
            event_id: FlakeId,
        }
        let row = Row {
            event_id: FlakeId::from_integer(INTEGER),
        };

        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(json, r#"{"event_id":"V-q48AQglKA"}"#);
        let back: Row = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, row);
    }

    #[test]
    fn text_rejects_bad_input() {
        #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
        struct Row {
            #[serde(with = "as_text")]
            event_id: FlakeId,
        }
        let err = serde_json::from_value::<Row>(json!({"event_id": "V-q48AQglK"}))
            .expect_err("should fail");
        assert_eq!(
            err.to_string(),
            Error::from(EncodingError::InvalidLength {
                expected: 11,
                actual: 10,
            })
            .to_string()
        );

        assert!(serde_json::from_value::<Row>(json!({"event_id": 42})).is_err());
    }
}
