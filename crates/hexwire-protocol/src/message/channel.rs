//! Chat channel messages.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::{
    MessageBody, check_name, check_text, check_token, names_from_wire,
    write_names, write_names_sep2,
};
use crate::error::{DecodeError, ParseError, ProtocolError, invalid};
use crate::field::{self, DebugFields, SEP2, TEXT_SEP, WireFields};

/// Single-name messages: `1001|ch name`, debug `channel=ch name`.
macro_rules! channel_name_message {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            channel: String,
        }

        impl $name {
            pub fn new(channel: impl Into<String>) -> Result<Self, ProtocolError> {
                let channel = channel.into();
                check_name("channel", &channel)?;
                Ok(Self { channel })
            }

            pub fn channel(&self) -> &str {
                &self.channel
            }
        }

        impl MessageBody for $name {
            fn write_wire(&self, out: &mut String) {
                out.push_str(&self.channel);
            }

            fn write_debug(&self, out: &mut String) {
                out.push_str("channel=");
                out.push_str(&self.channel);
            }

            fn parse_wire(data: &str) -> Result<Self, DecodeError> {
                let mut f = WireFields::new(data);
                let channel = f.name("channel")?;
                f.build(Self::new(channel))
            }

            fn parse_debug(body: &str) -> Result<Self, ParseError> {
                let mut f = DebugFields::new(body);
                let channel = f.string(&["channel"])?;
                f.finish()?;
                Ok(Self::new(channel)?)
            }
        }
    };
}

channel_name_message! {
    /// A channel was created.
    NewChannel
}

channel_name_message! {
    /// A channel was removed after its last member left.
    DeleteChannel
}

/// Member list of a channel, sent to a client that just joined it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelMembers {
    channel: String,
    members: Vec<String>,
}

impl ChannelMembers {
    pub fn new(
        channel: impl Into<String>,
        members: Vec<String>,
    ) -> Result<Self, ProtocolError> {
        let channel = channel.into();
        check_name("channel", &channel)?;
        check_members(&members)?;
        Ok(Self { channel, members })
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }
}

/// A member list has at least one name, and the names can't contain the
/// `", "` the debug list is split on.
pub(crate) fn check_members(members: &[String]) -> Result<(), ProtocolError> {
    if members.is_empty() {
        return Err(invalid("member list is empty"));
    }
    for member in members {
        check_name("member", member)?;
    }
    Ok(())
}

impl MessageBody for ChannelMembers {
    fn write_wire(&self, out: &mut String) {
        out.push_str(&self.channel);
        write_names_sep2(out, &self.members);
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "channel={}|members=", self.channel);
        write_names(out, &self.members);
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let channel = f.name("channel")?;
        let members = names_from_wire(&mut f)?;
        if members.is_empty() {
            return Err(DecodeError::ArityMismatch {
                expected: 2,
                found: 1,
            });
        }
        f.build(Self::new(channel, members))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let channel = f.string(&["channel"])?;
        let members = f.list(&["members"])?;
        f.finish()?;
        Ok(Self::new(channel, members)?)
    }
}

// ---------------------------------------------------------------------------
// Joining and leaving
// ---------------------------------------------------------------------------

/// Writes `password empty` or `password=***`; the debug form never shows
/// the password itself.
pub(crate) fn write_masked_password(out: &mut String, password: &str) {
    if password.is_empty() {
        out.push_str("password empty");
    } else {
        out.push_str("password=***");
    }
}

/// Reads the password piece back. A masked password comes back as `***`.
pub(crate) fn read_masked_password(
    f: &mut DebugFields<'_>,
) -> Result<String, ParseError> {
    let value = f.value(&["password"])?;
    Ok(if value == "password empty" {
        String::new()
    } else {
        value.to_string()
    })
}

/// Client asks to join (creating if needed) a chat channel.
///
/// Wire: `1004|nickname,password,host,channel` with an empty password
/// written as the tab sentinel. The host field is kept as sent, sentinel
/// included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinChannel {
    nickname: String,
    password: String,
    host: String,
    channel: String,
}

impl JoinChannel {
    pub fn new(
        nickname: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        channel: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let (nickname, password, host, channel) =
            (nickname.into(), password.into(), host.into(), channel.into());
        check_token("nickname", &nickname)?;
        check_token("password", &password)?;
        let host = normalize_host(host)?;
        check_name("channel", &channel)?;
        Ok(Self {
            nickname,
            password,
            host,
            channel,
        })
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

/// Hosts are stored as sent: an empty host becomes the tab sentinel, which
/// is otherwise a control character.
pub(crate) fn normalize_host(host: String) -> Result<String, ProtocolError> {
    if host.is_empty() || host == field::EMPTYSTR {
        Ok(field::EMPTYSTR.to_string())
    } else {
        check_token("host", &host)?;
        Ok(host)
    }
}

impl MessageBody for JoinChannel {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP2}{}{SEP2}{}{SEP2}{}",
            field::encode_str(&self.nickname),
            field::encode_str(&self.password),
            self.host,
            self.channel
        );
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "nickname={}|", self.nickname);
        write_masked_password(out, &self.password);
        let _ = write!(
            out,
            "|host={}|channel={}",
            self.host,
            self.channel
        );
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let nickname = f.string()?;
        let password = f.string()?;
        let host = f.raw()?.to_string();
        let channel = f.name("channel")?;
        f.build(Self::new(nickname, password, host, channel))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let nickname = f.string(&["nickname"])?;
        let password = read_masked_password(&mut f)?;
        let host = f.string(&["host"])?;
        let channel = f.string(&["channel"])?;
        f.finish()?;
        Ok(Self::new(nickname, password, host, channel)?)
    }
}

/// Server accepts a client into a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinChannelAuth {
    nickname: String,
    channel: String,
}

impl JoinChannelAuth {
    pub fn new(
        nickname: impl Into<String>,
        channel: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let (nickname, channel) = (nickname.into(), channel.into());
        check_name("nickname", &nickname)?;
        check_name("channel", &channel)?;
        Ok(Self { nickname, channel })
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl MessageBody for JoinChannelAuth {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(out, "{}{SEP2}{}", self.nickname, self.channel);
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "nickname={}|channel={}", self.nickname, self.channel);
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let nickname = f.name("nickname")?;
        let channel = f.name("channel")?;
        f.build(Self::new(nickname, channel))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let nickname = f.string(&["nickname"])?;
        let channel = f.string(&["channel"])?;
        f.finish()?;
        Ok(Self::new(nickname, channel)?)
    }
}

/// A member left a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaveChannel {
    nickname: String,
    host: String,
    channel: String,
}

impl LeaveChannel {
    pub fn new(
        nickname: impl Into<String>,
        host: impl Into<String>,
        channel: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let (nickname, host, channel) =
            (nickname.into(), host.into(), channel.into());
        check_name("nickname", &nickname)?;
        let host = normalize_host(host)?;
        check_name("channel", &channel)?;
        Ok(Self {
            nickname,
            host,
            channel,
        })
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl MessageBody for LeaveChannel {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP2}{}{SEP2}{}",
            self.nickname,
            self.host,
            self.channel
        );
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "nickname={}|host={}|channel={}",
            self.nickname,
            self.host,
            self.channel
        );
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let nickname = f.name("nickname")?;
        let host = f.raw()?.to_string();
        let channel = f.name("channel")?;
        f.build(Self::new(nickname, host, channel))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let nickname = f.string(&["nickname"])?;
        let host = f.string(&["host"])?;
        let channel = f.string(&["channel"])?;
        f.finish()?;
        Ok(Self::new(nickname, host, channel)?)
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// A line of chat in a channel.
///
/// Wire: `1005|channel\0nickname\0text`. The text may contain commas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelTextMsg {
    channel: String,
    nickname: String,
    text: String,
}

impl ChannelTextMsg {
    pub fn new(
        channel: impl Into<String>,
        nickname: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let (channel, nickname, text) =
            (channel.into(), nickname.into(), text.into());
        check_name("channel", &channel)?;
        check_name("nickname", &nickname)?;
        check_text("text", &text, Some(TEXT_SEP))?;
        Ok(Self {
            channel,
            nickname,
            text,
        })
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl MessageBody for ChannelTextMsg {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{TEXT_SEP}{}{TEXT_SEP}{}",
            self.channel,
            self.nickname,
            field::encode_str(&self.text)
        );
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "channel={}|nickname={}|text={}",
            self.channel, self.nickname, self.text
        );
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::with_separator(data, TEXT_SEP);
        let channel = f.name("channel")?;
        let nickname = f.name("nickname")?;
        let text = field::decode_str(f.rest()?).to_string();
        f.build(Self::new(channel, nickname, text))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let channel = f.string(&["channel"])?;
        let nickname = f.string(&["nickname"])?;
        let text = f.rest(&["text"])?;
        Ok(Self::new(channel, nickname, text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[test]
    fn test_join_channel_empty_password() {
        let msg = JoinChannel::new("m name", "", "-", "ch name").unwrap();
        let msg = Message::from(msg);
        assert_eq!(msg.to_wire(), "1004|m name,\t,-,ch name");
        assert_eq!(
            msg.to_debug(),
            "SOCJoinChannel:nickname=m name|password empty|host=-|channel=ch name"
        );
    }

    #[test]
    fn test_join_channel_password_is_masked() {
        let msg = JoinChannel::new("m name", "secret", "-", "ch name").unwrap();
        let mut debug = String::new();
        msg.write_debug(&mut debug);
        assert_eq!(debug, "nickname=m name|password=***|host=-|channel=ch name");

        let parsed = JoinChannel::parse_debug(&debug).unwrap();
        assert_eq!(parsed.password(), "***");
    }

    #[test]
    fn test_channel_members_list_forms() {
        let msg = ChannelMembers::parse_debug(
            "channel=cha|members=[player0, droid 1, debug]",
        )
        .unwrap();
        let legacy =
            ChannelMembers::parse_debug("channel=cha|members=player0,droid 1,debug")
                .unwrap();
        assert_eq!(msg, legacy);
        assert_eq!(msg.members().len(), 3);
        assert!(ChannelMembers::new("cha", vec![]).is_err());
        assert!(ChannelMembers::parse_wire("cha").is_err());
    }

    #[test]
    fn test_channel_text_keeps_delimiters() {
        let msg = ChannelTextMsg::new(
            "cha",
            "member name",
            "msg which may,have,delimiters",
        )
        .unwrap();
        let msg = Message::from(msg);
        assert_eq!(
            msg.to_wire(),
            "1005|cha\0member name\0msg which may,have,delimiters"
        );
        assert!(ChannelTextMsg::new("cha", "m", "bad\0text").is_err());
    }

    #[test]
    fn test_empty_names_do_not_decode() {
        assert!(matches!(
            NewChannel::parse_wire("\t"),
            Err(DecodeError::MalformedField { index: 0, .. })
        ));
        assert!(matches!(
            JoinChannelAuth::parse_wire("\t,\t"),
            Err(DecodeError::MalformedField { index: 0, .. })
        ));
        assert!(matches!(
            JoinChannelAuth::parse_wire("m,\t"),
            Err(DecodeError::MalformedField { index: 1, .. })
        ));
        assert!(ChannelTextMsg::parse_wire("\t\0m\0hi").is_err());
    }

    #[test]
    fn test_leave_channel_host_sentinel() {
        let msg = LeaveChannel::new("m", field::EMPTYSTR, "ch").unwrap();
        let mut wire = String::new();
        msg.write_wire(&mut wire);
        assert_eq!(wire, "m,\t,ch");
        assert_eq!(LeaveChannel::parse_wire(&wire).unwrap(), msg);
    }
}
