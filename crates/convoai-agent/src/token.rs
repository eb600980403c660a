//! Channel token generation for agents and users.
//!
//! A single call grants everything a conversational agent needs in one
//! token: RTC channel access (plus publish rights for publishers), RTM
//! login and Chat user privileges, all expiring together.

use convoai_core::error::{ConvoAiError, Result};
use convoai_core::token::{AccessToken, Service, ServiceChat, ServiceRtc, ServiceRtm};

/// Role inside the RTC channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RtcRole {
    /// May join and publish audio, video and data streams. Agents publish
    /// synthesized audio, so this is the default.
    #[default]
    Publisher,
    /// May only join and subscribe.
    Subscriber,
}

/// Token generation entry point.
pub struct TokenBuilder;

impl TokenBuilder {
    /// Default validity window: 24 hours.
    pub const DEFAULT_EXPIRE_SECS: u32 = 86_400;

    /// Generate a publisher token valid for 24 hours, issued now.
    ///
    /// `uid` 0 is the wildcard ("any uid").
    pub fn generate(
        app_id: &str,
        app_certificate: &str,
        channel_name: &str,
        uid: u32,
    ) -> Result<String> {
        Self::generate_with(
            app_id,
            app_certificate,
            channel_name,
            uid,
            RtcRole::Publisher,
            Self::DEFAULT_EXPIRE_SECS,
        )
    }

    /// Generate a token with an explicit role and validity window, issued
    /// now with a random salt.
    pub fn generate_with(
        app_id: &str,
        app_certificate: &str,
        channel_name: &str,
        uid: u32,
        role: RtcRole,
        expire_secs: u32,
    ) -> Result<String> {
        let token = AccessToken::new(app_id, expire_secs);
        Self::finish(token, app_certificate, channel_name, uid, role, expire_secs)
    }

    /// Fully deterministic variant: the caller supplies the issue
    /// timestamp and salt. Two calls with identical arguments produce
    /// identical tokens.
    pub fn generate_at(
        app_id: &str,
        app_certificate: &str,
        channel_name: &str,
        uid: u32,
        role: RtcRole,
        expire_secs: u32,
        issue_ts: u32,
        salt: u32,
    ) -> Result<String> {
        let token = AccessToken::at(app_id, expire_secs, issue_ts, salt);
        Self::finish(token, app_certificate, channel_name, uid, role, expire_secs)
    }

    fn finish(
        mut token: AccessToken,
        app_certificate: &str,
        channel_name: &str,
        uid: u32,
        role: RtcRole,
        expire_secs: u32,
    ) -> Result<String> {
        if channel_name.is_empty() {
            return Err(ConvoAiError::Validation(
                "channel_name cannot be empty".into(),
            ));
        }

        let mut rtc = ServiceRtc::new(channel_name, uid);
        rtc.add_privilege(ServiceRtc::PRIVILEGE_JOIN_CHANNEL, expire_secs);
        if role == RtcRole::Publisher {
            rtc.add_privilege(ServiceRtc::PRIVILEGE_PUBLISH_AUDIO_STREAM, expire_secs);
            rtc.add_privilege(ServiceRtc::PRIVILEGE_PUBLISH_VIDEO_STREAM, expire_secs);
            rtc.add_privilege(ServiceRtc::PRIVILEGE_PUBLISH_DATA_STREAM, expire_secs);
        }

        let user_id = if uid == 0 {
            String::new()
        } else {
            uid.to_string()
        };
        let mut rtm = ServiceRtm::new(user_id.clone());
        rtm.add_privilege(ServiceRtm::PRIVILEGE_LOGIN, expire_secs);
        let mut chat = ServiceChat::new(user_id);
        chat.add_privilege(ServiceChat::PRIVILEGE_USER, expire_secs);

        token.add_service(Service::Rtc(rtc));
        token.add_service(Service::Rtm(rtm));
        token.add_service(Service::Chat(chat));
        token.build(app_certificate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoai_core::token::{self, ServiceRtc};

    const APP_ID: &str = "970CA35de60c44645bbae8a215061b33";
    const APP_CERT: &str = "5CFd2fd1755d40ecb72977518be15d3b";
    const ISSUE_TS: u32 = 1_700_000_000;

    #[test]
    fn test_default_expiry_is_24_hours_from_issue() {
        let built = TokenBuilder::generate_at(
            APP_ID,
            APP_CERT,
            "support",
            123_456,
            RtcRole::Publisher,
            TokenBuilder::DEFAULT_EXPIRE_SECS,
            ISSUE_TS,
            42,
        )
        .unwrap();

        let parsed = token::parse(&built).unwrap();
        assert_eq!(parsed.expire_at(), u64::from(ISSUE_TS) + 86_400);
        assert!(parsed.verify(APP_CERT));
    }

    #[test]
    fn test_publisher_token_grants_all_rtc_privileges() {
        let built = TokenBuilder::generate_at(
            APP_ID,
            APP_CERT,
            "support",
            7,
            RtcRole::Publisher,
            600,
            ISSUE_TS,
            1,
        )
        .unwrap();

        let parsed = token::parse(&built).unwrap();
        let rtc = parsed.rtc_service().unwrap();
        assert_eq!(rtc.channel_name, "support");
        assert_eq!(rtc.uid, "7");
        for privilege in [
            ServiceRtc::PRIVILEGE_JOIN_CHANNEL,
            ServiceRtc::PRIVILEGE_PUBLISH_AUDIO_STREAM,
            ServiceRtc::PRIVILEGE_PUBLISH_VIDEO_STREAM,
            ServiceRtc::PRIVILEGE_PUBLISH_DATA_STREAM,
        ] {
            assert_eq!(rtc.privileges.get(&privilege), Some(&600));
        }
    }

    #[test]
    fn test_subscriber_token_grants_join_only() {
        let built = TokenBuilder::generate_at(
            APP_ID,
            APP_CERT,
            "support",
            7,
            RtcRole::Subscriber,
            600,
            ISSUE_TS,
            1,
        )
        .unwrap();

        let rtc_privileges = token::parse(&built)
            .unwrap()
            .rtc_service()
            .unwrap()
            .privileges
            .clone();
        assert_eq!(rtc_privileges.len(), 1);
        assert!(rtc_privileges.contains_key(&ServiceRtc::PRIVILEGE_JOIN_CHANNEL));
    }

    #[test]
    fn test_token_grants_rtm_and_chat() {
        let built = TokenBuilder::generate_at(
            APP_ID,
            APP_CERT,
            "support",
            7,
            RtcRole::Publisher,
            600,
            ISSUE_TS,
            1,
        )
        .unwrap();

        let parsed = token::parse(&built).unwrap();
        let types: Vec<u16> = parsed.services.iter().map(|s| s.service_type()).collect();
        assert_eq!(types, vec![1, 2, 5]);
    }

    #[test]
    fn test_deterministic_for_fixed_issue_ts_and_salt() {
        let args = (APP_ID, APP_CERT, "support", 7u32);
        let a = TokenBuilder::generate_at(args.0, args.1, args.2, args.3, RtcRole::Publisher, 600, ISSUE_TS, 9).unwrap();
        let b = TokenBuilder::generate_at(args.0, args.1, args.2, args.3, RtcRole::Publisher, 600, ISSUE_TS, 9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_channel_rejected() {
        let err = TokenBuilder::generate(APP_ID, APP_CERT, "", 7).unwrap_err();
        assert!(matches!(err, ConvoAiError::Validation(_)));
        assert!(err.to_string().contains("channel_name"));
    }

    #[test]
    fn test_empty_app_id_rejected() {
        let err = TokenBuilder::generate("", APP_CERT, "support", 7).unwrap_err();
        assert!(err.to_string().contains("app_id"));
    }

    #[test]
    fn test_wildcard_uid() {
        let built = TokenBuilder::generate_at(
            APP_ID,
            APP_CERT,
            "support",
            0,
            RtcRole::Subscriber,
            600,
            ISSUE_TS,
            1,
        )
        .unwrap();
        assert_eq!(token::parse(&built).unwrap().rtc_service().unwrap().uid, "");
    }
}
