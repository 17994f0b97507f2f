//! Identifier and network-format type rules: URL, IP, UUID, timezone.

use super::Rule;
use crate::cache;
use crate::engine::context::Context;
use crate::value::Value;
use std::net::IpAddr;

/// Type rule: a valid URL; rebinds the value to its parsed form.
pub fn url() -> Box<dyn Rule> {
    Box::new(UrlType)
}

struct UrlType;

impl Rule for UrlType {
    fn name(&self) -> &'static str {
        "url"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        match &ctx.value {
            Value::Url(_) => true,
            Value::String(s) => match url::Url::parse(s) {
                Ok(parsed) => {
                    ctx.value = Value::Url(parsed);
                    true
                }
                Err(_) => false,
            },
            _ => false,
        }
    }

    fn is_type(&self) -> bool {
        true
    }

    fn expected_type(&self) -> Option<&'static str> {
        Some("url")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IpVariant {
    Any,
    V4,
    V6,
}

/// Type rule: a valid IP address (either family).
pub fn ip() -> Box<dyn Rule> {
    Box::new(IpType {
        name: "ip",
        variant: IpVariant::Any,
    })
}

/// Type rule: a valid IPv4 address.
pub fn ipv4() -> Box<dyn Rule> {
    Box::new(IpType {
        name: "ipv4",
        variant: IpVariant::V4,
    })
}

/// Type rule: a valid IPv6 address.
pub fn ipv6() -> Box<dyn Rule> {
    Box::new(IpType {
        name: "ipv6",
        variant: IpVariant::V6,
    })
}

struct IpType {
    name: &'static str,
    variant: IpVariant,
}

impl IpType {
    fn admits(&self, addr: &IpAddr) -> bool {
        match self.variant {
            IpVariant::Any => true,
            IpVariant::V4 => addr.is_ipv4(),
            IpVariant::V6 => addr.is_ipv6(),
        }
    }
}

impl Rule for IpType {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        match &ctx.value {
            Value::Ip(addr) => self.admits(addr),
            Value::String(s) => match s.parse::<IpAddr>() {
                Ok(addr) if self.admits(&addr) => {
                    ctx.value = Value::Ip(addr);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn is_type(&self) -> bool {
        true
    }

    fn expected_type(&self) -> Option<&'static str> {
        Some("ip")
    }
}

/// Type rule: a valid UUID of any version; rebinds to the parsed form.
pub fn uuid() -> Box<dyn Rule> {
    Box::new(UuidType {
        versions: Vec::new(),
    })
}

/// [`uuid`] restricted to the given versions.
pub fn uuid_versions(versions: &[usize]) -> Box<dyn Rule> {
    Box::new(UuidType {
        versions: versions.to_vec(),
    })
}

struct UuidType {
    versions: Vec<usize>,
}

impl UuidType {
    fn admits(&self, parsed: &uuid::Uuid) -> bool {
        self.versions.is_empty() || self.versions.contains(&parsed.get_version_num())
    }
}

impl Rule for UuidType {
    fn name(&self) -> &'static str {
        "uuid"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        match &ctx.value {
            Value::Uuid(parsed) => self.admits(parsed),
            Value::String(s) => match uuid::Uuid::parse_str(s) {
                Ok(parsed) if self.admits(&parsed) => {
                    ctx.value = Value::Uuid(parsed);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn is_type(&self) -> bool {
        true
    }

    fn message_placeholders(&self, _ctx: &Context) -> Vec<(String, String)> {
        let version = if self.versions.is_empty() {
            String::new()
        } else {
            format!(
                " v{}",
                self.versions
                    .iter()
                    .map(usize::to_string)
                    .collect::<Vec<_>>()
                    .join("/v")
            )
        };
        vec![(":version".to_string(), version)]
    }

    fn expected_type(&self) -> Option<&'static str> {
        Some("uuid")
    }
}

/// Type rule: a valid IANA timezone name; rebinds to the resolved zone.
pub fn timezone() -> Box<dyn Rule> {
    Box::new(TimezoneType)
}

struct TimezoneType;

impl Rule for TimezoneType {
    fn name(&self) -> &'static str {
        "timezone"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        match &ctx.value {
            Value::Timezone(_) => true,
            Value::String(s) => match cache::timezone(s) {
                Some(tz) => {
                    ctx.value = Value::Timezone(tz);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn is_type(&self) -> bool {
        true
    }

    fn expected_type(&self) -> Option<&'static str> {
        Some("timezone")
    }
}
