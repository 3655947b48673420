//! Registration links
//!
//! Format: `{origin}?register={scheduleId}-{registrationKey}`. The key is
//! opaque and may itself contain hyphens, so the token splits only at the
//! first one.

use super::error::ScheduleError;
use std::fmt;
use std::str::FromStr;

/// Query parameter carrying the registration token
pub const REGISTER_PARAM: &str = "register";

/// Schedule id and capability key of a registration form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationLink {
    pub schedule_id: i64,
    pub registration_key: String,
}

impl RegistrationLink {
    pub fn new(schedule_id: i64, registration_key: impl Into<String>) -> Self {
        Self {
            schedule_id,
            registration_key: registration_key.into(),
        }
    }

    /// Full shareable URL; the key is percent-encoded
    pub fn to_url(&self, origin: &str) -> String {
        format!(
            "{}?{}={}-{}",
            origin,
            REGISTER_PARAM,
            self.schedule_id,
            urlencoding::encode(&self.registration_key)
        )
    }

    /// Parse a bare `{id}-{key}` token
    pub fn parse_token(token: &str) -> Result<Self, ScheduleError> {
        let (id, key) = token
            .split_once('-')
            .ok_or_else(|| ScheduleError::InvalidLink(format!("missing '-' in {:?}", token)))?;

        let schedule_id = id
            .parse::<i64>()
            .map_err(|_| ScheduleError::InvalidLink(format!("{:?} is not a schedule id", id)))?;

        Ok(Self::new(schedule_id, key))
    }

    /// Parse either a full URL carrying `register=` or a bare token
    pub fn parse(input: &str) -> Result<Self, ScheduleError> {
        let input = input.trim();

        match input.split_once('?') {
            Some((_, query)) => {
                let value = query
                    .split('&')
                    .filter_map(|pair| pair.split_once('='))
                    .find(|(name, _)| *name == REGISTER_PARAM)
                    .map(|(_, value)| value)
                    .ok_or_else(|| {
                        ScheduleError::InvalidLink(format!("no {} parameter in {:?}", REGISTER_PARAM, input))
                    })?;

                let decoded = urlencoding::decode(value)
                    .map_err(|e| ScheduleError::InvalidLink(e.to_string()))?;
                Self::parse_token(&decoded)
            }
            None => Self::parse_token(input),
        }
    }
}

impl fmt::Display for RegistrationLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.schedule_id, self.registration_key)
    }
}

impl FromStr for RegistrationLink {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
