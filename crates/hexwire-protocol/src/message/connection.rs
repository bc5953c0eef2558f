//! Connection-level messages: version exchange, pings, robot setup, and
//! server-wide broadcasts. None of these are about one game.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::{MessageBody, check_name, check_text, check_token};
use crate::error::{DecodeError, ParseError, ProtocolError, invalid};
use crate::field::{self, DebugFields, SEP2, WireFields};

/// The debug form's stand-in for an absent optional string.
const NULL: &str = "(null)";

fn debug_opt(value: Option<&str>) -> &str {
    value.unwrap_or(NULL)
}

fn from_debug_opt(value: &str) -> Option<String> {
    (value != NULL && !value.is_empty()).then(|| value.to_string())
}

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// Version announcement, sent by both sides right after connecting.
///
/// Wire: `9998|2450,2.4.50,JM20200801,;6pl;sb;,en_US`. The client locale
/// is only written when present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    version: i32,
    version_str: String,
    build: Option<String>,
    features: Option<String>,
    locale: Option<String>,
}

impl Version {
    pub fn new(
        version: i32,
        version_str: impl Into<String>,
        build: Option<String>,
        features: Option<String>,
        locale: Option<String>,
    ) -> Result<Self, ProtocolError> {
        let version_str = version_str.into();
        check_name("version string", &version_str)?;
        let build = build.filter(|b| !b.is_empty());
        let features = features.filter(|f| !f.is_empty());
        let locale = locale.filter(|l| !l.is_empty());
        if build.is_none() && features.is_some() {
            return Err(invalid("features given without a build"));
        }
        for (what, value) in
            [("build", &build), ("features", &features), ("locale", &locale)]
        {
            if let Some(v) = value {
                check_token(what, v)?;
                if v == NULL {
                    return Err(invalid(format!("{what} is {NULL:?}")));
                }
            }
        }
        Ok(Self {
            version,
            version_str,
            build,
            features,
            locale,
        })
    }

    /// Version number such as `2450` for 2.4.50.
    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn version_str(&self) -> &str {
        &self.version_str
    }

    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }

    /// Active optional features, such as `;6pl;sb;`.
    pub fn features(&self) -> Option<&str> {
        self.features.as_deref()
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }
}

impl MessageBody for Version {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP2}{}{SEP2}{}{SEP2}{}",
            self.version,
            self.version_str,
            field::encode_opt(self.build.as_deref()),
            field::encode_opt(self.features.as_deref()),
        );
        if let Some(locale) = &self.locale {
            out.push(SEP2);
            out.push_str(locale);
        }
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}|str={}|verBuild={}|feats={}|cliLocale={}",
            self.version,
            self.version_str,
            debug_opt(self.build.as_deref()),
            debug_opt(self.features.as_deref()),
            debug_opt(self.locale.as_deref()),
        );
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let version = f.int()?;
        let version_str = f.name("version string")?;
        let mut optional = [None, None, None];
        for slot in &mut optional {
            if !f.has_more() {
                break;
            }
            *slot = field::decode_opt(f.raw()?);
        }
        let [build, features, locale] = optional;
        f.build(Self::new(version, version_str, build, features, locale))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let version = f.int(&["version"])?;
        let version_str = f.string(&["str"])?;
        let build = f.opt_value(&["verBuild"]).and_then(from_debug_opt);
        let features = f.opt_value(&["feats"]).and_then(from_debug_opt);
        let locale = f.opt_value(&["cliLocale"]).and_then(from_debug_opt);
        f.finish()?;
        Ok(Self::new(version, version_str, build, features, locale)?)
    }
}

// ---------------------------------------------------------------------------
// Pings and broadcasts
// ---------------------------------------------------------------------------

/// Keepalive from the server. The client echoes it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerPing {
    sleep_time: i32,
}

impl ServerPing {
    pub fn new(sleep_time: i32) -> Self {
        Self { sleep_time }
    }

    pub fn sleep_time(&self) -> i32 {
        self.sleep_time
    }
}

impl MessageBody for ServerPing {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(out, "{}", self.sleep_time);
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "sleepTime={}", self.sleep_time);
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let sleep_time = f.int()?;
        f.build(Ok(Self::new(sleep_time)))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let sleep_time = f.int(&["sleepTime"])?;
        f.finish()?;
        Ok(Self::new(sleep_time))
    }
}

/// The server refuses a connection. The debug form is the bare reason.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RejectConnection {
    text: String,
}

impl RejectConnection {
    pub fn new(text: impl Into<String>) -> Result<Self, ProtocolError> {
        let text = text.into();
        check_text("reason", &text, None)?;
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl MessageBody for RejectConnection {
    fn write_wire(&self, out: &mut String) {
        out.push_str(field::encode_str(&self.text));
    }

    fn write_debug(&self, out: &mut String) {
        out.push_str(&self.text);
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let text = field::decode_str(f.rest()?).to_string();
        f.build(Self::new(text))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        Ok(Self::new(body)?)
    }
}

/// Text broadcast to every connected client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BCastTextMsg {
    text: String,
}

impl BCastTextMsg {
    pub fn new(text: impl Into<String>) -> Result<Self, ProtocolError> {
        let text = text.into();
        check_text("text", &text, None)?;
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl MessageBody for BCastTextMsg {
    fn write_wire(&self, out: &mut String) {
        out.push_str(field::encode_str(&self.text));
    }

    fn write_debug(&self, out: &mut String) {
        out.push_str("text=");
        out.push_str(&self.text);
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let text = field::decode_str(f.rest()?).to_string();
        f.build(Self::new(text))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let text = f.rest(&["text"])?;
        Ok(Self::new(text)?)
    }
}

macro_rules! empty_message {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash,
            Serialize, Deserialize,
        )]
        pub struct $name;

        impl MessageBody for $name {
            fn write_wire(&self, _out: &mut String) {}

            fn write_debug(&self, _out: &mut String) {}

            fn parse_wire(data: &str) -> Result<Self, DecodeError> {
                WireFields::new(data).build(Ok(Self))
            }

            fn parse_debug(body: &str) -> Result<Self, ParseError> {
                DebugFields::new(body).finish()?;
                Ok(Self)
            }
        }
    };
}

empty_message! {
    /// The client is leaving every channel and game before disconnecting.
    LeaveAll
}

empty_message! {
    /// Admin command to reset the server's state.
    AdminReset
}

// ---------------------------------------------------------------------------
// Robots
// ---------------------------------------------------------------------------

/// A robot client introducing itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImARobot {
    nickname: String,
    cookie: String,
    robot_class: String,
}

impl ImARobot {
    pub fn new(
        nickname: impl Into<String>,
        cookie: impl Into<String>,
        robot_class: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let (nickname, cookie, robot_class) =
            (nickname.into(), cookie.into(), robot_class.into());
        check_name("nickname", &nickname)?;
        check_token("cookie", &cookie)?;
        check_name("robot class", &robot_class)?;
        Ok(Self {
            nickname,
            cookie,
            robot_class,
        })
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    /// Fully qualified class name of the robot implementation.
    pub fn robot_class(&self) -> &str {
        &self.robot_class
    }
}

impl MessageBody for ImARobot {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP2}{}{SEP2}{}",
            self.nickname,
            field::encode_str(&self.cookie),
            self.robot_class
        );
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "nickname={}|cookie={}|rbclass={}",
            self.nickname, self.cookie, self.robot_class
        );
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let nickname = f.name("nickname")?;
        let cookie = f.string()?;
        let robot_class = f.name("robot class")?;
        f.build(Self::new(nickname, cookie, robot_class))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let nickname = f.string(&["nickname"])?;
        let cookie = f.string(&["cookie"])?;
        let robot_class = f.string(&["rbclass"])?;
        f.finish()?;
        Ok(Self::new(nickname, cookie, robot_class)?)
    }
}

/// Tuning parameters for a robot's planner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotParameters {
    pub max_game_length: i32,
    pub max_eta: i32,
    pub eta_bonus_factor: f32,
    pub adversarial_factor: f32,
    pub leader_adversarial_factor: f32,
    pub dev_card_multiplier: f32,
    pub threat_multiplier: f32,
    pub strategy_type: i32,
    pub trade_flag: i32,
}

/// Server tells a robot which [`RobotParameters`] to use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpdateRobotParams {
    params: RobotParameters,
}

impl UpdateRobotParams {
    pub fn new(params: RobotParameters) -> Result<Self, ProtocolError> {
        let floats = [
            params.eta_bonus_factor,
            params.adversarial_factor,
            params.leader_adversarial_factor,
            params.dev_card_multiplier,
            params.threat_multiplier,
        ];
        if floats.iter().any(|f| !f.is_finite()) {
            return Err(invalid("robot parameter is not a finite number"));
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &RobotParameters {
        &self.params
    }
}

/// Formats a float the way the peers print them: always with a decimal
/// point, so `1.0` rather than `1`.
fn float_text(value: f32) -> String {
    if value.fract() == 0.0 && value.abs() < 1e7 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

impl MessageBody for UpdateRobotParams {
    fn write_wire(&self, out: &mut String) {
        let p = &self.params;
        let _ = write!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            p.max_game_length,
            p.max_eta,
            float_text(p.eta_bonus_factor),
            float_text(p.adversarial_factor),
            float_text(p.leader_adversarial_factor),
            float_text(p.dev_card_multiplier),
            float_text(p.threat_multiplier),
            p.strategy_type,
            p.trade_flag,
        );
    }

    fn write_debug(&self, out: &mut String) {
        let p = &self.params;
        let _ = write!(
            out,
            "mgl={}|me={}|ebf={}|af={}|laf={}|dcm={}|tm={}|st={}|tf={}",
            p.max_game_length,
            p.max_eta,
            float_text(p.eta_bonus_factor),
            float_text(p.adversarial_factor),
            float_text(p.leader_adversarial_factor),
            float_text(p.dev_card_multiplier),
            float_text(p.threat_multiplier),
            p.strategy_type,
            p.trade_flag,
        );
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let params = RobotParameters {
            max_game_length: f.int()?,
            max_eta: f.int()?,
            eta_bonus_factor: f.float()?,
            adversarial_factor: f.float()?,
            leader_adversarial_factor: f.float()?,
            dev_card_multiplier: f.float()?,
            threat_multiplier: f.float()?,
            strategy_type: f.int()?,
            trade_flag: f.int()?,
        };
        f.build(Self::new(params))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let params = RobotParameters {
            max_game_length: f.int(&["mgl"])?,
            max_eta: f.int(&["me"])?,
            eta_bonus_factor: f.float(&["ebf"])?,
            adversarial_factor: f.float(&["af"])?,
            leader_adversarial_factor: f.float(&["laf"])?,
            dev_card_multiplier: f.float(&["dcm"])?,
            threat_multiplier: f.float(&["tm"])?,
            strategy_type: f.int(&["st"])?,
            trade_flag: f.int(&["tf"])?,
        };
        f.finish()?;
        Ok(Self::new(params)?)
    }
}
