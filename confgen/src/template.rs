// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The config template language: `{{ port "id" }}`, `{{ var "name" }}` and
//! `{{ secrets "..." }}` directives embedded in otherwise literal text.
//! The directive set is fixed; dispatch is a closed enum, not an open
//! registry.

use crate::error::ConfigError;
use nom::{
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::consumed,
    multi::many0,
    sequence::{delimited, preceded},
    IResult,
};
use std::collections::BTreeMap;
use testbed::ResolvedDevice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirectiveKind {
    /// Substituted with the concrete interface resolved for the port.
    Port,
    /// Substituted from the spec's variable store.
    Var,
    /// Never substituted; emitted verbatim, directive syntax included.
    /// Secrets are resolved out of band at transmission time.
    Secrets,
}

impl DirectiveKind {
    fn lookup(name: &str) -> Option<Self> {
        match name {
            "port" => Some(DirectiveKind::Port),
            "var" => Some(DirectiveKind::Var),
            "secrets" => Some(DirectiveKind::Secrets),
            _ => None,
        }
    }
}

/// Expand every directive in `template` against the resolved device and
/// variable store. Pure: no side effects beyond the returned string.
pub fn expand(
    template: &str,
    device: &ResolvedDevice,
    vars: &BTreeMap<String, String>,
) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(i) = rest.find("{{") {
        out.push_str(&rest[..i]);
        rest = &rest[i..];
        let offset = template.len() - rest.len();

        let (remaining, (raw, (name, args))) = parse_directive(rest)
            .map_err(|e| ConfigError::Syntax {
                offset,
                detail: match e {
                    nom::Err::Incomplete(_) => "unterminated directive".into(),
                    nom::Err::Error(e) | nom::Err::Failure(e) => {
                        format!("malformed directive near {:?}", truncate(e.input))
                    }
                },
            })?;

        let kind = DirectiveKind::lookup(name)
            .ok_or_else(|| ConfigError::UnknownDirective(name.to_string()))?;
        match kind {
            DirectiveKind::Port => {
                let port = one_arg(name, &args, offset)?;
                let iface = device
                    .port(port)
                    .ok_or_else(|| ConfigError::PortNotFound(port.into()))?;
                out.push_str(iface);
            }
            DirectiveKind::Var => {
                let key = one_arg(name, &args, offset)?;
                let value = vars
                    .get(key)
                    .ok_or_else(|| ConfigError::NoValueForKey(key.into()))?;
                out.push_str(value);
            }
            DirectiveKind::Secrets => out.push_str(raw),
        }
        rest = remaining;
    }
    out.push_str(rest);
    Ok(out)
}

fn one_arg<'a>(
    name: &str,
    args: &[&'a str],
    offset: usize,
) -> Result<&'a str, ConfigError> {
    match args {
        [arg] => Ok(arg),
        _ => Err(ConfigError::Syntax {
            offset,
            detail: format!(
                "{} takes exactly one argument, got {}",
                name,
                args.len()
            ),
        }),
    }
}

/// `{{ name "arg" "arg" ... }}`. Returns the raw directive text alongside
/// the parsed name and arguments so secrets can pass through byte for byte.
fn parse_directive(input: &str) -> IResult<&str, (&str, (&str, Vec<&str>))> {
    consumed(directive_inner)(input)
}

fn directive_inner(input: &str) -> IResult<&str, (&str, Vec<&str>)> {
    let (rest, _) = tag("{{")(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, name) = identifier(rest)?;
    let (rest, args) = many0(preceded(multispace1, quoted))(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = tag("}}")(rest)?;
    Ok((rest, (name, args)))
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_while(|c| c != '"'), char('"'))(input)
}

fn truncate(s: &str) -> &str {
    let end = s
        .char_indices()
        .nth(16)
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    &s[..end]
}
