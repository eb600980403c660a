//! Signed channel access tokens.
//!
//! A token binds an app id, a channel, a uid and a set of per-service
//! privileges to a time window, authenticated with HMAC-SHA256 under the
//! app certificate. The wire layout must match the remote verifier
//! bit-for-bit:
//!
//! ```text
//! "007" + base64( zlib( len-prefixed signature || signed section ) )
//!
//! signed section :=
//!     string(app_id) u32(issue_ts) u32(expire) u32(salt)
//!     u16(service count) service*          -- services sorted by type
//! service :=
//!     u16(type) u16(privilege count) (u16(privilege) u32(expire))*
//!     + per-service fields (channel name, uid, user id)
//! ```
//!
//! All integers are little-endian; strings are u16-length-prefixed UTF-8;
//! privilege maps are sorted by privilege id. The signing key is derived in
//! two HMAC steps (issue timestamp, then salt) so each token signs under a
//! fresh key even for identical inputs.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use base64::Engine;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

use crate::error::{ConvoAiError, Result};

/// Version marker prepended to every token.
pub const TOKEN_VERSION: &str = "007";

/// Salt range matches the remote verifier's expectations (1..=99999999).
const SALT_MAX: u32 = 99_999_999;

// ─────────────────────────────────────────────
// Binary packing helpers (little-endian)
// ─────────────────────────────────────────────

fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_string(buf: &mut Vec<u8>, s: &[u8]) {
    put_u16(buf, s.len() as u16);
    buf.extend_from_slice(s);
}

fn put_privileges(buf: &mut Vec<u8>, privileges: &BTreeMap<u16, u32>) {
    put_u16(buf, privileges.len() as u16);
    for (privilege, expire) in privileges {
        put_u16(buf, *privilege);
        put_u32(buf, *expire);
    }
}

/// Cursor over a decoded token body. Every read is bounds-checked so a
/// truncated or corrupted token fails cleanly instead of panicking.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.buf.len() {
            return Err(ConvoAiError::Validation("token: truncated body".into()));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn get_u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn get_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn get_string(&mut self) -> Result<Vec<u8>> {
        let len = self.get_u16()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    fn get_privileges(&mut self) -> Result<BTreeMap<u16, u32>> {
        let count = self.get_u16()?;
        let mut privileges = BTreeMap::new();
        for _ in 0..count {
            let privilege = self.get_u16()?;
            let expire = self.get_u32()?;
            privileges.insert(privilege, expire);
        }
        Ok(privileges)
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }
}

// ─────────────────────────────────────────────
// Services
// ─────────────────────────────────────────────

/// Real-time communication service: joining and publishing in a channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceRtc {
    pub channel_name: String,
    /// Uid rendered as a decimal string; empty means "any uid".
    pub uid: String,
    pub privileges: BTreeMap<u16, u32>,
}

impl ServiceRtc {
    pub const SERVICE_TYPE: u16 = 1;
    pub const PRIVILEGE_JOIN_CHANNEL: u16 = 1;
    pub const PRIVILEGE_PUBLISH_AUDIO_STREAM: u16 = 2;
    pub const PRIVILEGE_PUBLISH_VIDEO_STREAM: u16 = 3;
    pub const PRIVILEGE_PUBLISH_DATA_STREAM: u16 = 4;

    /// `uid == 0` is the wildcard and packs as the empty string.
    pub fn new(channel_name: impl Into<String>, uid: u32) -> Self {
        Self {
            channel_name: channel_name.into(),
            uid: if uid == 0 { String::new() } else { uid.to_string() },
            privileges: BTreeMap::new(),
        }
    }

    pub fn add_privilege(&mut self, privilege: u16, expire: u32) {
        self.privileges.insert(privilege, expire);
    }

    fn pack(&self, buf: &mut Vec<u8>) {
        put_u16(buf, Self::SERVICE_TYPE);
        put_privileges(buf, &self.privileges);
        put_string(buf, self.channel_name.as_bytes());
        put_string(buf, self.uid.as_bytes());
    }
}

/// Real-time messaging service: signaling login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceRtm {
    pub user_id: String,
    pub privileges: BTreeMap<u16, u32>,
}

impl ServiceRtm {
    pub const SERVICE_TYPE: u16 = 2;
    pub const PRIVILEGE_LOGIN: u16 = 1;

    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            privileges: BTreeMap::new(),
        }
    }

    pub fn add_privilege(&mut self, privilege: u16, expire: u32) {
        self.privileges.insert(privilege, expire);
    }

    fn pack(&self, buf: &mut Vec<u8>) {
        put_u16(buf, Self::SERVICE_TYPE);
        put_privileges(buf, &self.privileges);
        put_string(buf, self.user_id.as_bytes());
    }
}

/// Chat service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceChat {
    pub user_id: String,
    pub privileges: BTreeMap<u16, u32>,
}

impl ServiceChat {
    pub const SERVICE_TYPE: u16 = 5;
    pub const PRIVILEGE_USER: u16 = 1;
    pub const PRIVILEGE_APP: u16 = 2;

    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            privileges: BTreeMap::new(),
        }
    }

    pub fn add_privilege(&mut self, privilege: u16, expire: u32) {
        self.privileges.insert(privilege, expire);
    }

    fn pack(&self, buf: &mut Vec<u8>) {
        put_u16(buf, Self::SERVICE_TYPE);
        put_privileges(buf, &self.privileges);
        put_string(buf, self.user_id.as_bytes());
    }
}

/// One granted service inside a token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Service {
    Rtc(ServiceRtc),
    Rtm(ServiceRtm),
    Chat(ServiceChat),
}

impl Service {
    pub fn service_type(&self) -> u16 {
        match self {
            Service::Rtc(_) => ServiceRtc::SERVICE_TYPE,
            Service::Rtm(_) => ServiceRtm::SERVICE_TYPE,
            Service::Chat(_) => ServiceChat::SERVICE_TYPE,
        }
    }

    fn pack(&self, buf: &mut Vec<u8>) {
        match self {
            Service::Rtc(s) => s.pack(buf),
            Service::Rtm(s) => s.pack(buf),
            Service::Chat(s) => s.pack(buf),
        }
    }

    fn unpack(reader: &mut Reader<'_>) -> Result<Self> {
        let service_type = reader.get_u16()?;
        let privileges = reader.get_privileges()?;
        match service_type {
            ServiceRtc::SERVICE_TYPE => {
                let channel_name = String::from_utf8(reader.get_string()?)
                    .map_err(|_| ConvoAiError::Validation("token: invalid channel name".into()))?;
                let uid = String::from_utf8(reader.get_string()?)
                    .map_err(|_| ConvoAiError::Validation("token: invalid uid".into()))?;
                Ok(Service::Rtc(ServiceRtc {
                    channel_name,
                    uid,
                    privileges,
                }))
            }
            ServiceRtm::SERVICE_TYPE => {
                let user_id = String::from_utf8(reader.get_string()?)
                    .map_err(|_| ConvoAiError::Validation("token: invalid user id".into()))?;
                Ok(Service::Rtm(ServiceRtm { user_id, privileges }))
            }
            ServiceChat::SERVICE_TYPE => {
                let user_id = String::from_utf8(reader.get_string()?)
                    .map_err(|_| ConvoAiError::Validation("token: invalid user id".into()))?;
                Ok(Service::Chat(ServiceChat { user_id, privileges }))
            }
            other => Err(ConvoAiError::Validation(format!(
                "token: unknown service type {other}"
            ))),
        }
    }
}

// ─────────────────────────────────────────────
// AccessToken
// ─────────────────────────────────────────────

/// An unsigned token under construction. Call [`AccessToken::build`] with
/// the app certificate to produce the transport-safe string.
#[derive(Clone, Debug)]
pub struct AccessToken {
    pub app_id: String,
    /// Unix seconds at which the token was issued.
    pub issue_ts: u32,
    /// Validity window in seconds, counted from `issue_ts`.
    pub expire: u32,
    /// Per-token salt folded into the signing key.
    pub salt: u32,
    services: BTreeMap<u16, Service>,
}

impl AccessToken {
    /// New token issued "now" with a random salt.
    pub fn new(app_id: impl Into<String>, expire: u32) -> Self {
        let issue_ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as u32;
        let salt = rand::thread_rng().gen_range(1..=SALT_MAX);
        Self::at(app_id, expire, issue_ts, salt)
    }

    /// New token with an explicit issue timestamp and salt. For a fixed
    /// timestamp and salt the built token is byte-for-byte deterministic,
    /// which is what tests rely on.
    pub fn at(app_id: impl Into<String>, expire: u32, issue_ts: u32, salt: u32) -> Self {
        Self {
            app_id: app_id.into(),
            issue_ts,
            expire,
            salt,
            services: BTreeMap::new(),
        }
    }

    /// Grant a service. At most one entry per service type; a later grant
    /// of the same type replaces the earlier one.
    pub fn add_service(&mut self, service: Service) {
        self.services.insert(service.service_type(), service);
    }

    /// Unix seconds at which the token stops being valid.
    pub fn expire_at(&self) -> u64 {
        u64::from(self.issue_ts) + u64::from(self.expire)
    }

    /// Sign and encode the token.
    pub fn build(&self, app_certificate: &str) -> Result<String> {
        if self.app_id.is_empty() {
            return Err(ConvoAiError::Validation("app_id cannot be empty".into()));
        }
        if app_certificate.is_empty() {
            return Err(ConvoAiError::Validation(
                "app_certificate cannot be empty".into(),
            ));
        }
        if self.services.is_empty() {
            return Err(ConvoAiError::Validation(
                "token must grant at least one service".into(),
            ));
        }

        let message = self.pack_message();
        let signature = sign(app_certificate, self.issue_ts, self.salt, &message);

        let mut body = Vec::with_capacity(message.len() + signature.len() + 2);
        put_string(&mut body, &signature);
        body.extend_from_slice(&message);

        let compressed = zlib_compress(&body);
        let encoded = base64::engine::general_purpose::STANDARD.encode(compressed);
        Ok(format!("{TOKEN_VERSION}{encoded}"))
    }

    /// The signed section: app id, timestamps, salt and all services in
    /// type order.
    fn pack_message(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        put_string(&mut buf, self.app_id.as_bytes());
        put_u32(&mut buf, self.issue_ts);
        put_u32(&mut buf, self.expire);
        put_u32(&mut buf, self.salt);
        put_u16(&mut buf, self.services.len() as u16);
        for service in self.services.values() {
            service.pack(&mut buf);
        }
        buf
    }
}

// ─────────────────────────────────────────────
// Signing
// ─────────────────────────────────────────────

type HmacSha256 = Hmac<Sha256>;

fn hmac_sha256(key: &[u8], message: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

/// Two-step key derivation, then a MAC over the signed section.
fn sign(app_certificate: &str, issue_ts: u32, salt: u32, message: &[u8]) -> Vec<u8> {
    let key = hmac_sha256(&issue_ts.to_le_bytes(), app_certificate.as_bytes());
    let key = hmac_sha256(&salt.to_le_bytes(), &key);
    hmac_sha256(&key, message)
}

fn zlib_compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .expect("writing to an in-memory buffer cannot fail");
    encoder
        .finish()
        .expect("writing to an in-memory buffer cannot fail")
}

fn zlib_decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|_| ConvoAiError::Validation("token: malformed compressed body".into()))?;
    Ok(out)
}

// ─────────────────────────────────────────────
// Parsing / verification
// ─────────────────────────────────────────────

/// A token decoded back into its signed fields.
#[derive(Clone, Debug)]
pub struct ParsedToken {
    pub app_id: String,
    pub issue_ts: u32,
    pub expire: u32,
    pub salt: u32,
    pub services: Vec<Service>,
    signature: Vec<u8>,
    message: Vec<u8>,
}

impl ParsedToken {
    /// Unix seconds at which the token stops being valid.
    pub fn expire_at(&self) -> u64 {
        u64::from(self.issue_ts) + u64::from(self.expire)
    }

    /// Recompute the signature under `app_certificate` and compare.
    pub fn verify(&self, app_certificate: &str) -> bool {
        let expected = sign(app_certificate, self.issue_ts, self.salt, &self.message);
        expected == self.signature
    }

    pub fn rtc_service(&self) -> Option<&ServiceRtc> {
        self.services.iter().find_map(|s| match s {
            Service::Rtc(rtc) => Some(rtc),
            _ => None,
        })
    }
}

/// Decode a token string into its fields without verifying the signature.
pub fn parse(token: &str) -> Result<ParsedToken> {
    let encoded = token
        .strip_prefix(TOKEN_VERSION)
        .ok_or_else(|| ConvoAiError::Validation("token: unsupported version".into()))?;

    let compressed = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| ConvoAiError::Validation("token: invalid base64".into()))?;
    let body = zlib_decompress(&compressed)?;

    let mut reader = Reader::new(&body);
    let signature = reader.get_string()?;
    let message = body[reader.pos..].to_vec();

    let app_id = String::from_utf8(reader.get_string()?)
        .map_err(|_| ConvoAiError::Validation("token: invalid app id".into()))?;
    let issue_ts = reader.get_u32()?;
    let expire = reader.get_u32()?;
    let salt = reader.get_u32()?;
    let service_count = reader.get_u16()?;

    let mut services = Vec::with_capacity(service_count as usize);
    for _ in 0..service_count {
        services.push(Service::unpack(&mut reader)?);
    }
    if !reader.is_empty() {
        return Err(ConvoAiError::Validation(
            "token: trailing bytes after services".into(),
        ));
    }

    Ok(ParsedToken {
        app_id,
        issue_ts,
        expire,
        salt,
        services,
        signature,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP_ID: &str = "970CA35de60c44645bbae8a215061b33";
    const APP_CERT: &str = "5CFd2fd1755d40ecb72977518be15d3b";

    fn sample_token() -> AccessToken {
        let mut rtc = ServiceRtc::new("test_channel", 2882341273);
        rtc.add_privilege(ServiceRtc::PRIVILEGE_JOIN_CHANNEL, 600);
        let mut token = AccessToken::at(APP_ID, 600, 1_111_111, 1);
        token.add_service(Service::Rtc(rtc));
        token
    }

    #[test]
    fn test_build_is_deterministic_for_fixed_inputs() {
        let a = sample_token().build(APP_CERT).unwrap();
        let b = sample_token().build(APP_CERT).unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with(TOKEN_VERSION));
    }

    #[test]
    fn test_fresh_tokens_differ_by_salt() {
        let mut first = AccessToken::new(APP_ID, 600);
        let mut second = AccessToken::new(APP_ID, 600);
        // Force distinct salts; issue_ts alone may collide within a second.
        first.salt = 1;
        second.salt = 2;
        let mut rtc = ServiceRtc::new("c", 1);
        rtc.add_privilege(ServiceRtc::PRIVILEGE_JOIN_CHANNEL, 600);
        first.add_service(Service::Rtc(rtc.clone()));
        second.add_service(Service::Rtc(rtc));
        assert_ne!(first.build(APP_CERT).unwrap(), second.build(APP_CERT).unwrap());
    }

    #[test]
    fn test_parse_round_trip() {
        let built = sample_token().build(APP_CERT).unwrap();
        let parsed = parse(&built).unwrap();

        assert_eq!(parsed.app_id, APP_ID);
        assert_eq!(parsed.issue_ts, 1_111_111);
        assert_eq!(parsed.expire, 600);
        assert_eq!(parsed.salt, 1);
        assert_eq!(parsed.expire_at(), 1_111_111 + 600);

        let rtc = parsed.rtc_service().unwrap();
        assert_eq!(rtc.channel_name, "test_channel");
        assert_eq!(rtc.uid, "2882341273");
        assert_eq!(rtc.privileges.get(&ServiceRtc::PRIVILEGE_JOIN_CHANNEL), Some(&600));
    }

    #[test]
    fn test_signature_verifies_only_with_right_certificate() {
        let built = sample_token().build(APP_CERT).unwrap();
        let parsed = parse(&built).unwrap();
        assert!(parsed.verify(APP_CERT));
        assert!(!parsed.verify("wrong_certificate"));
    }

    #[test]
    fn test_wildcard_uid_packs_as_empty_string() {
        let mut rtc = ServiceRtc::new("channel", 0);
        rtc.add_privilege(ServiceRtc::PRIVILEGE_JOIN_CHANNEL, 600);
        let mut token = AccessToken::at(APP_ID, 600, 1_111_111, 1);
        token.add_service(Service::Rtc(rtc));

        let parsed = parse(&token.build(APP_CERT).unwrap()).unwrap();
        assert_eq!(parsed.rtc_service().unwrap().uid, "");
    }

    #[test]
    fn test_multiple_services_round_trip_in_type_order() {
        let mut rtc = ServiceRtc::new("channel", 7);
        rtc.add_privilege(ServiceRtc::PRIVILEGE_JOIN_CHANNEL, 600);
        let mut rtm = ServiceRtm::new("7");
        rtm.add_privilege(ServiceRtm::PRIVILEGE_LOGIN, 600);
        let mut chat = ServiceChat::new("7");
        chat.add_privilege(ServiceChat::PRIVILEGE_USER, 600);

        let mut token = AccessToken::at(APP_ID, 600, 1_111_111, 1);
        // Insert out of order; the packed form sorts by service type.
        token.add_service(Service::Chat(chat));
        token.add_service(Service::Rtc(rtc));
        token.add_service(Service::Rtm(rtm));

        let parsed = parse(&token.build(APP_CERT).unwrap()).unwrap();
        let types: Vec<u16> = parsed.services.iter().map(|s| s.service_type()).collect();
        assert_eq!(types, vec![1, 2, 5]);
    }

    #[test]
    fn test_empty_app_id_rejected() {
        let mut token = AccessToken::at("", 600, 1_111_111, 1);
        token.add_service(Service::Rtm(ServiceRtm::new("u")));
        let err = token.build(APP_CERT).unwrap_err();
        assert!(err.to_string().contains("app_id"));
    }

    #[test]
    fn test_empty_certificate_rejected() {
        let mut token = AccessToken::at(APP_ID, 600, 1_111_111, 1);
        token.add_service(Service::Rtm(ServiceRtm::new("u")));
        let err = token.build("").unwrap_err();
        assert!(err.to_string().contains("app_certificate"));
    }

    #[test]
    fn test_no_services_rejected() {
        let token = AccessToken::at(APP_ID, 600, 1_111_111, 1);
        assert!(token.build(APP_CERT).is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("006abcdef").is_err());
        assert!(parse("007not-base64!!!").is_err());
        // Valid base64, but not a zlib stream.
        let bogus = format!(
            "007{}",
            base64::engine::general_purpose::STANDARD.encode(b"hello")
        );
        assert!(parse(&bogus).is_err());
    }
}
