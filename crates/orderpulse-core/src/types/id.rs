//! Typed identifiers for users, sessions, notifications, orders and events.
//!
//! All of them are UUIDs on the wire and in PostgreSQL (`sqlx` feature).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// A fresh random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// The inner UUID.
            pub fn into_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.hyphenated().fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }


        #[cfg(feature = "sqlx")]
        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <Uuid as sqlx::Type<sqlx::Postgres>>::type_info()
            }
        }

        #[cfg(feature = "sqlx")]
        impl<'q> sqlx::Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <Uuid as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        #[cfg(feature = "sqlx")]
        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                <Uuid as sqlx::Decode<'r, sqlx::Postgres>>::decode(value).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a user (customer or staff).
    UserId
);

uuid_id!(
    /// Unique identifier for one live realtime session.
    SessionId
);

uuid_id!(
    /// Unique identifier for a persisted notification.
    NotificationId
);

uuid_id!(
    /// Unique identifier for an order in the commerce system.
    OrderId
);

uuid_id!(
    /// Unique identifier for a domain event.
    EventId
);

impl OrderId {
    /// Short human-facing reference: the last `len` characters of the id.
    pub fn short_ref(&self, len: usize) -> String {
        let simple = self.0.simple().to_string();
        simple[simple.len().saturating_sub(len)..].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parses_back() {
        let uuid = Uuid::new_v4();
        let id = NotificationId::from_uuid(uuid);
        assert_eq!(id.to_string(), uuid.to_string());
        assert_eq!(id.to_string().parse::<NotificationId>().unwrap(), id);
        assert!("order-42".parse::<NotificationId>().is_err());
    }

    #[test]
    fn test_order_short_ref() {
        let uuid = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").expect("uuid");
        let order = OrderId::from_uuid(uuid);
        assert_eq!(order.short_ref(6), "5fe0c8");
        assert_eq!(order.short_ref(3), "0c8");
    }

    #[test]
    fn test_serializes_as_bare_string() {
        let id = UserId::new();
        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!(id.to_string()));
    }
}
