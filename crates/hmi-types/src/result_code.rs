//! Shared HMI result codes.
//!
//! Serialized as the integer values the bus uses on the wire; displayed with
//! their symbolic names.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::TypesError;

/// Outcome reported in every reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    Success,
    UnsupportedRequest,
    UnsupportedResource,
    Disallowed,
    Rejected,
    Aborted,
    Ignored,
    Retry,
    InUse,
    DataNotAvailable,
    TimedOut,
    InvalidData,
    CharLimitExceeded,
    InvalidId,
    DuplicateName,
    ApplicationNotRegistered,
    WrongLanguage,
    OutOfMemory,
    TooManyPendingRequests,
    NoAppsRegistered,
    NoDevicesConnected,
    Warnings,
    GenericError,
    UserDisallowed,
    TruncatedData,
    Saved,
    ReadOnly,
}

const ALL: [ResultCode; 27] = [
    ResultCode::Success,
    ResultCode::UnsupportedRequest,
    ResultCode::UnsupportedResource,
    ResultCode::Disallowed,
    ResultCode::Rejected,
    ResultCode::Aborted,
    ResultCode::Ignored,
    ResultCode::Retry,
    ResultCode::InUse,
    ResultCode::DataNotAvailable,
    ResultCode::TimedOut,
    ResultCode::InvalidData,
    ResultCode::CharLimitExceeded,
    ResultCode::InvalidId,
    ResultCode::DuplicateName,
    ResultCode::ApplicationNotRegistered,
    ResultCode::WrongLanguage,
    ResultCode::OutOfMemory,
    ResultCode::TooManyPendingRequests,
    ResultCode::NoAppsRegistered,
    ResultCode::NoDevicesConnected,
    ResultCode::Warnings,
    ResultCode::GenericError,
    ResultCode::UserDisallowed,
    ResultCode::TruncatedData,
    ResultCode::Saved,
    ResultCode::ReadOnly,
];

impl ResultCode {
    /// Integer value used on the wire.
    pub fn as_i64(&self) -> i64 {
        match self {
            ResultCode::Success => 0,
            ResultCode::UnsupportedRequest => 1,
            ResultCode::UnsupportedResource => 2,
            ResultCode::Disallowed => 3,
            ResultCode::Rejected => 4,
            ResultCode::Aborted => 5,
            ResultCode::Ignored => 6,
            ResultCode::Retry => 7,
            ResultCode::InUse => 8,
            ResultCode::DataNotAvailable => 9,
            ResultCode::TimedOut => 10,
            ResultCode::InvalidData => 11,
            ResultCode::CharLimitExceeded => 12,
            ResultCode::InvalidId => 13,
            ResultCode::DuplicateName => 14,
            ResultCode::ApplicationNotRegistered => 15,
            ResultCode::WrongLanguage => 16,
            ResultCode::OutOfMemory => 17,
            ResultCode::TooManyPendingRequests => 18,
            ResultCode::NoAppsRegistered => 19,
            ResultCode::NoDevicesConnected => 20,
            ResultCode::Warnings => 21,
            ResultCode::GenericError => 22,
            ResultCode::UserDisallowed => 23,
            ResultCode::TruncatedData => 24,
            ResultCode::Saved => 25,
            ResultCode::ReadOnly => 26,
        }
    }

    /// Symbolic name, e.g. `INVALID_DATA`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultCode::Success => "SUCCESS",
            ResultCode::UnsupportedRequest => "UNSUPPORTED_REQUEST",
            ResultCode::UnsupportedResource => "UNSUPPORTED_RESOURCE",
            ResultCode::Disallowed => "DISALLOWED",
            ResultCode::Rejected => "REJECTED",
            ResultCode::Aborted => "ABORTED",
            ResultCode::Ignored => "IGNORED",
            ResultCode::Retry => "RETRY",
            ResultCode::InUse => "IN_USE",
            ResultCode::DataNotAvailable => "DATA_NOT_AVAILABLE",
            ResultCode::TimedOut => "TIMED_OUT",
            ResultCode::InvalidData => "INVALID_DATA",
            ResultCode::CharLimitExceeded => "CHAR_LIMIT_EXCEEDED",
            ResultCode::InvalidId => "INVALID_ID",
            ResultCode::DuplicateName => "DUPLICATE_NAME",
            ResultCode::ApplicationNotRegistered => "APPLICATION_NOT_REGISTERED",
            ResultCode::WrongLanguage => "WRONG_LANGUAGE",
            ResultCode::OutOfMemory => "OUT_OF_MEMORY",
            ResultCode::TooManyPendingRequests => "TOO_MANY_PENDING_REQUESTS",
            ResultCode::NoAppsRegistered => "NO_APPS_REGISTERED",
            ResultCode::NoDevicesConnected => "NO_DEVICES_CONNECTED",
            ResultCode::Warnings => "WARNINGS",
            ResultCode::GenericError => "GENERIC_ERROR",
            ResultCode::UserDisallowed => "USER_DISALLOWED",
            ResultCode::TruncatedData => "TRUNCATED_DATA",
            ResultCode::Saved => "SAVED",
            ResultCode::ReadOnly => "READ_ONLY",
        }
    }

    pub fn is_success(&self) -> bool {
        *self == ResultCode::Success
    }
}

impl TryFrom<i64> for ResultCode {
    type Error = TypesError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        ALL.iter()
            .copied()
            .find(|code| code.as_i64() == value)
            .ok_or(TypesError::UnknownResultCode(value))
    }
}

impl FromStr for ResultCode {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL.iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| TypesError::UnknownResultCodeName(s.to_string()))
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ResultCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.as_i64())
    }
}

impl<'de> Deserialize<'de> for ResultCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ResultCodeVisitor;

        impl<'de> de::Visitor<'de> for ResultCodeVisitor {
            type Value = ResultCode;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an integer result code or its symbolic name")
            }

            fn visit_i64<E>(self, value: i64) -> Result<ResultCode, E>
            where
                E: de::Error,
            {
                ResultCode::try_from(value).map_err(de::Error::custom)
            }

            fn visit_u64<E>(self, value: u64) -> Result<ResultCode, E>
            where
                E: de::Error,
            {
                let value = i64::try_from(value).map_err(de::Error::custom)?;
                ResultCode::try_from(value).map_err(de::Error::custom)
            }

            fn visit_str<E>(self, value: &str) -> Result<ResultCode, E>
            where
                E: de::Error,
            {
                ResultCode::from_str(value).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(ResultCodeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_used_by_remote_control() {
        assert_eq!(ResultCode::Success.as_i64(), 0);
        assert_eq!(ResultCode::Rejected.as_i64(), 4);
        assert_eq!(ResultCode::Ignored.as_i64(), 6);
        assert_eq!(ResultCode::InvalidData.as_i64(), 11);
    }

    #[test]
    fn test_serialize_as_integer() {
        let json = serde_json::to_string(&ResultCode::InvalidData).unwrap();
        assert_eq!(json, "11");
    }

    #[test]
    fn test_deserialize_from_integer_or_name() {
        let code: ResultCode = serde_json::from_str("6").unwrap();
        assert_eq!(code, ResultCode::Ignored);

        let code: ResultCode = serde_json::from_str("\"REJECTED\"").unwrap();
        assert_eq!(code, ResultCode::Rejected);
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(
            ResultCode::try_from(99),
            Err(TypesError::UnknownResultCode(99))
        );
        assert!(serde_json::from_str::<ResultCode>("-1").is_err());
    }

    #[test]
    fn test_wire_values_are_unique() {
        for (i, code) in ALL.iter().enumerate() {
            assert_eq!(code.as_i64(), i as i64);
        }
    }
}
