//! NNTP status code constants per RFC 3977 and RFC 4643
//!
//! Only codes this server actually emits are listed.

// 1xx - Informational (RFC 3977 §3.2.1.1)

/// Help text follows (RFC 3977 §7.2)
pub const HELP_TEXT: u16 = 100;
/// Capability list follows (RFC 3977 §5.2)
pub const CAPABILITY_LIST: u16 = 101;
/// Server date and time (RFC 3977 §7.1)
pub const SERVER_DATE: u16 = 111;

// 2xx - Success (RFC 3977 §3.2.1.2)

/// Server ready, no posting (RFC 3977 §5.1.1)
pub const NO_POSTING: u16 = 201;
/// Connection closing (RFC 3977 §5.4)
pub const CONNECTION_CLOSING: u16 = 205;
/// Group selected (RFC 3977 §6.1.1)
pub const GROUP_SELECTED: u16 = 211;
/// Information follows (RFC 3977 §7.6.1)
pub const INFORMATION_FOLLOWS: u16 = 215;
/// Article follows (RFC 3977 §6.2.1)
pub const ARTICLE_FOLLOWS: u16 = 220;
/// Head follows (RFC 3977 §6.2.2)
pub const HEAD_FOLLOWS: u16 = 221;
/// Body follows (RFC 3977 §6.2.3)
pub const BODY_FOLLOWS: u16 = 222;
/// Article exists / selected (RFC 3977 §6.2.4)
pub const ARTICLE_EXISTS: u16 = 223;
/// Overview follows (RFC 3977 §8.3)
pub const OVERVIEW_FOLLOWS: u16 = 224;
/// Headers follow (RFC 3977 §8.5)
pub const HEADERS_FOLLOW: u16 = 225;
/// New articles follow (RFC 3977 §7.4)
pub const NEW_ARTICLES_FOLLOW: u16 = 230;
/// New groups follow (RFC 3977 §7.3)
pub const NEW_GROUPS_FOLLOW: u16 = 231;
/// Authentication accepted (RFC 4643 §2.3)
pub const AUTH_ACCEPTED: u16 = 281;

// 3xx - Continuation (RFC 3977 §3.2.1.3)

/// Password required (RFC 4643 §2.3)
pub const PASSWORD_REQUIRED: u16 = 381;

// 4xx - Temporary errors (RFC 3977 §3.2.1.4)

/// Service temporarily unavailable (RFC 3977 §3.2.1)
pub const SERVICE_UNAVAILABLE: u16 = 400;
/// No such newsgroup (RFC 3977 §6.1.1)
pub const NO_SUCH_GROUP: u16 = 411;
/// No newsgroup selected (RFC 3977 §6.1.1)
pub const NO_GROUP_SELECTED: u16 = 412;
/// No current article selected (RFC 3977 §6.2.4)
pub const NO_CURRENT_ARTICLE: u16 = 420;
/// No next article (RFC 3977 §6.1.4)
pub const NO_NEXT_ARTICLE: u16 = 421;
/// No previous article (RFC 3977 §6.1.3)
pub const NO_PREV_ARTICLE: u16 = 422;
/// No article with that number (RFC 3977 §6.2.1)
pub const NO_SUCH_ARTICLE_NUMBER: u16 = 423;
/// No article with that message-id (RFC 3977 §6.2.1)
pub const NO_SUCH_ARTICLE_ID: u16 = 430;
/// Article not wanted (RFC 3977 §6.3.2)
pub const ARTICLE_NOT_WANTED: u16 = 435;
/// Posting not permitted (RFC 3977 §6.3.1)
pub const POSTING_NOT_PERMITTED: u16 = 440;
/// Authentication required (RFC 4643 §2.3)
pub const AUTH_REQUIRED: u16 = 480;
/// Authentication rejected (RFC 4643 §2.3)
pub const AUTH_REJECTED: u16 = 481;
/// Authentication out of sequence (RFC 4643 §2.3)
pub const AUTH_OUT_OF_SEQUENCE: u16 = 482;

// 5xx - Permanent errors (RFC 3977 §3.2.1.5)

/// Command not recognized (RFC 3977 §3.2.1)
pub const COMMAND_NOT_RECOGNIZED: u16 = 500;
/// Command syntax error (RFC 3977 §3.2.1)
pub const COMMAND_SYNTAX_ERROR: u16 = 501;
/// Access denied / no permission (RFC 3977 §3.2.1)
pub const ACCESS_DENIED: u16 = 502;
/// Feature not supported (RFC 3977 §3.2.1)
pub const FEATURE_NOT_SUPPORTED: u16 = 503;
