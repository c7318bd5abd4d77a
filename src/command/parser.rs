//! Parse client command lines into [`Command`] values
//!
//! Keywords are matched case-insensitively (RFC 3977 §3.1). Arguments are
//! parsed with nom following the ABNF in RFC 3977 §9 and RFC 4643 §2.3.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{multispace0, one_of, space0, space1},
    combinator::{all_consuming, map, map_res, opt, value},
    sequence::{preceded, terminated},
};

use super::types::{ArticlePart, ArticleSpec, Command, CommandError, ListKeyword, Selection};
use crate::protocol::MAX_COMMAND_LINE;
use crate::types::protocol::{parse_article_number, parse_article_range};
use crate::types::{GroupName, MessageId};

impl Command {
    /// Parse a raw line as read from the socket (CRLF included)
    ///
    /// Enforces the 512-octet line limit before decoding.
    pub fn parse_line(raw: &[u8]) -> Result<Self, CommandError> {
        if raw.len() > MAX_COMMAND_LINE {
            return Err(CommandError::LineTooLong {
                limit: MAX_COMMAND_LINE,
            });
        }
        Self::parse(&String::from_utf8_lossy(raw))
    }

    /// Parse a command line (trailing CRLF optional)
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let Ok((args, keyword)) = preceded(multispace0, parse_token).parse(line) else {
            return Err(CommandError::Empty);
        };
        let keyword = keyword.to_ascii_uppercase();

        let command = match keyword.as_str() {
            "CAPABILITIES" => arguments(args, value(Self::Capabilities, opt(parse_argument))),
            "MODE" => arguments(
                args,
                value(Self::ModeReader, preceded(space1, tag_no_case("READER"))),
            ),
            "QUIT" => no_arguments(args, Self::Quit),
            "HELP" => no_arguments(args, Self::Help),
            "DATE" => no_arguments(args, Self::Date),
            "LAST" => no_arguments(args, Self::Last),
            "NEXT" => no_arguments(args, Self::Next),
            "POST" => no_arguments(args, Self::Post),
            "GROUP" => arguments(args, map(parse_group, Self::Group)),
            "LISTGROUP" => arguments(args, parse_listgroup),
            "ARTICLE" => arguments(args, article(ArticlePart::Whole)),
            "HEAD" => arguments(args, article(ArticlePart::Head)),
            "BODY" => arguments(args, article(ArticlePart::Body)),
            "STAT" => arguments(args, article(ArticlePart::Stat)),
            "LIST" => arguments(
                args,
                map(opt(parse_list_keyword), |list| {
                    Self::List(list.unwrap_or(ListKeyword::Active(None)))
                }),
            ),
            "OVER" | "XOVER" => arguments(
                args,
                map(opt(preceded(space1, parse_selection)), |selection| {
                    Self::Over {
                        selection: selection.unwrap_or(Selection::Current),
                        legacy: keyword == "XOVER",
                    }
                }),
            ),
            "HDR" | "XHDR" => arguments(
                args,
                map(
                    (parse_argument, opt(preceded(space1, parse_selection))),
                    |(field, selection)| Self::Hdr {
                        field: field.to_string(),
                        selection: selection.unwrap_or(Selection::Current),
                        legacy: keyword == "XHDR",
                    },
                ),
            ),
            "NEWGROUPS" => arguments(
                args,
                map(
                    (parse_argument, parse_argument, parse_gmt),
                    |(date, time, gmt)| Self::NewGroups {
                        date: date.to_string(),
                        time: time.to_string(),
                        gmt,
                    },
                ),
            ),
            "NEWNEWS" => arguments(
                args,
                map(
                    (parse_argument, parse_argument, parse_argument, parse_gmt),
                    |(wildmat, date, time, gmt)| Self::NewNews {
                        wildmat: wildmat.to_string(),
                        date: date.to_string(),
                        time: time.to_string(),
                        gmt,
                    },
                ),
            ),
            "AUTHINFO" => arguments(args, parse_authinfo),
            "IHAVE" => arguments(args, map(preceded(space1, parse_message_id), Self::Ihave)),
            _ => return Err(CommandError::Unknown(keyword)),
        };

        command.ok_or_else(|| CommandError::syntax(usage(&keyword)))
    }
}

/// Run an argument parser over everything after the keyword
///
/// Trailing blanks are allowed; anything else left over is a syntax error.
fn arguments<'a, P>(input: &'a str, parser: P) -> Option<Command>
where
    P: Parser<&'a str, Output = Command, Error = nom::error::Error<&'a str>>,
{
    all_consuming(terminated(parser, space0))
        .parse(input)
        .ok()
        .map(|(_, command)| command)
}

fn no_arguments(input: &str, command: Command) -> Option<Command> {
    arguments(input, value(command, space0))
}

/// Expected form of each command, reported with 501
fn usage(keyword: &str) -> String {
    match keyword {
        "MODE" => "MODE READER".to_string(),
        "GROUP" => "GROUP newsgroup".to_string(),
        "LISTGROUP" => "LISTGROUP [newsgroup [range]]".to_string(),
        "ARTICLE" | "HEAD" | "BODY" | "STAT" => format!("{keyword} [message-id|number]"),
        "LIST" => "LIST [ACTIVE|ACTIVE.TIMES|NEWSGROUPS [wildmat]|OVERVIEW.FMT|HEADERS [MSGID|RANGE]]"
            .to_string(),
        "OVER" | "XOVER" => format!("{keyword} [message-id|range]"),
        "HDR" | "XHDR" => format!("{keyword} field [message-id|range]"),
        "NEWGROUPS" => "NEWGROUPS date time [GMT]".to_string(),
        "NEWNEWS" => "NEWNEWS wildmat date time [GMT]".to_string(),
        "AUTHINFO" => "AUTHINFO USER username|PASS password".to_string(),
        "IHAVE" => "IHAVE message-id".to_string(),
        _ => format!("{keyword} takes no arguments"),
    }
}

/// A run of non-blank characters (RFC 3977 §9.8 `token`)
fn parse_token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_ascii_whitespace()).parse(input)
}

/// One blank-separated argument
fn parse_argument(input: &str) -> IResult<&str, &str> {
    preceded(space1, parse_token).parse(input)
}

fn parse_gmt(input: &str) -> IResult<&str, bool> {
    map(opt(preceded(space1, tag_no_case("GMT"))), |gmt| gmt.is_some()).parse(input)
}

fn parse_group(input: &str) -> IResult<&str, GroupName> {
    map_res(parse_argument, |name: &str| GroupName::new(name.to_string())).parse(input)
}

fn parse_message_id(input: &str) -> IResult<&str, MessageId> {
    map_res(parse_token, |id: &str| MessageId::new(id.to_string())).parse(input)
}

/// `message-id` or `range`, as taken by OVER and HDR
fn parse_selection(input: &str) -> IResult<&str, Selection> {
    alt((
        map(parse_message_id, Selection::MessageId),
        map(parse_article_range, Selection::Range),
    ))
    .parse(input)
}

fn parse_listgroup(input: &str) -> IResult<&str, Command> {
    map(
        opt((parse_group, opt(preceded(space1, parse_article_range)))),
        |spec| match spec {
            Some((group, range)) => Command::ListGroup {
                group: Some(group),
                range,
            },
            None => Command::ListGroup {
                group: None,
                range: None,
            },
        },
    )
    .parse(input)
}

/// ARTICLE, HEAD, BODY and STAT: `[message-id|number]`
fn article<'a>(
    part: ArticlePart,
) -> impl Parser<&'a str, Output = Command, Error = nom::error::Error<&'a str>> {
    map(
        opt(preceded(
            space1,
            alt((
                map(parse_message_id, ArticleSpec::MessageId),
                map(parse_article_number, ArticleSpec::Number),
            )),
        )),
        move |spec| Command::Article {
            part,
            spec: spec.unwrap_or(ArticleSpec::Current),
        },
    )
}

fn parse_list_keyword(input: &str) -> IResult<&str, ListKeyword> {
    let wildmat = || opt(map(parse_argument, String::from));
    let (rest, keyword) = map(parse_argument, str::to_ascii_uppercase).parse(input)?;

    match keyword.as_str() {
        "ACTIVE" => map(wildmat(), ListKeyword::Active).parse(rest),
        "NEWSGROUPS" => map(wildmat(), ListKeyword::Newsgroups).parse(rest),
        "ACTIVE.TIMES" => map(wildmat(), ListKeyword::ActiveTimes).parse(rest),
        "OVERVIEW.FMT" => Ok((rest, ListKeyword::OverviewFmt)),
        "HEADERS" => value(
            ListKeyword::Headers,
            opt(preceded(
                space1,
                alt((tag_no_case("MSGID"), tag_no_case("RANGE"))),
            )),
        )
        .parse(rest),
        "DISTRIB.PATS" | "DISTRIBUTIONS" | "MOTD" | "SUBSCRIPTIONS" | "COUNTS" => {
            Ok(("", ListKeyword::Unsupported(keyword)))
        }
        _ => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Tag,
        ))),
    }
}

/// AUTHINFO USER/PASS (RFC 4643 §2.3)
///
/// The value is everything after the single separator, so credentials
/// keep any inner or trailing blanks.
fn parse_authinfo(input: &str) -> IResult<&str, Command> {
    let credential = || preceded(one_of(" \t"), take_while1(|c: char| c != '\r' && c != '\n'));

    preceded(
        space1,
        alt((
            map(preceded(tag_no_case("USER"), credential()), |user: &str| {
                Command::AuthinfoUser(user.to_string())
            }),
            map(preceded(tag_no_case("PASS"), credential()), |pass: &str| {
                Command::AuthinfoPass(pass.to_string())
            }),
        )),
    )
    .parse(input)
}
