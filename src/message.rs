//! Find, split and compose text messages that carry geo URIs
use crate::geo_uri;
use crate::gps::Location;
use crate::Error;
use log::debug;

static URI_MARKER: &str = "geo:";
/// Longest message, in characters, that fits in a single SMS
pub const MAX_MESSAGE_LENGTH: usize = 160;

/// A run of message text and the location that followed it
#[derive(Clone, Debug, PartialEq)]
pub struct MessagePart {
    text: Option<String>,
    location: Option<Location>,
}

impl MessagePart {
    /// Text written before the location, if any
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Location shared by this part, only the trailing part of a message has none
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

/// A message broken into text and location parts in the order they were written
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoMessage {
    parts: Vec<MessagePart>,
}

impl GeoMessage {
    pub fn parts(&self) -> &[MessagePart] {
        &self.parts
    }

    /// Iterate over all valid locations in the message
    pub fn locations(&self) -> impl Iterator<Item = &Location> + '_ {
        self.parts.iter().filter_map(|p| p.location())
    }

    pub fn has_locations(&self) -> bool {
        self.locations().next().is_some()
    }
}

/// Return the first geo URI in the message body if it decodes to a location
pub fn find_geo_uri(body: &str) -> Option<Location> {
    let pos = body.find(URI_MARKER)?;
    let word = body[pos..].split(' ').next()?;
    geo_uri::decode(word)
}

/// Break a message body into parts, one per valid geo URI plus any trailing text
pub fn parse_message(body: &str) -> GeoMessage {
    let mut message = GeoMessage::default();
    let mut text: Option<String> = None;
    let mut rest = body;

    while !rest.is_empty() {
        let pos = match rest.find(URI_MARKER) {
            Some(pos) => pos,
            None => {
                append_text(&mut text, rest);
                break;
            }
        };
        append_text(&mut text, &rest[..pos]);

        // the URI runs until the next space
        rest = &rest[pos..];
        let word = match rest.find(' ') {
            Some(end) => {
                let word = &rest[..end];
                rest = &rest[end + 1..];
                word
            }
            None => {
                let word = rest;
                rest = "";
                word
            }
        };

        match geo_uri::decode(word) {
            Some(location) => message.parts.push(MessagePart {
                text: text.take(),
                location: Some(location),
            }),
            None => {
                debug!("treating invalid geo URI as message text: {}", word);
                append_text(&mut text, word);
            }
        }
    }

    if text.is_some() {
        message.parts.push(MessagePart {
            text,
            location: None,
        });
    }
    message
}

/// Append a piece of text, trimmed of spaces, to the text collected so far
fn append_text(text: &mut Option<String>, piece: &str) {
    let piece = piece.trim_matches(' ');
    if piece.is_empty() {
        return;
    }
    match text {
        Some(existing) => {
            existing.push(' ');
            existing.push_str(piece);
        }
        None => *text = Some(piece.to_string()),
    }
}

/// Append the location as a geo URI to the message being composed
pub fn append_location(text: &str, location: &Location) -> String {
    let uri = geo_uri::encode(location);
    if text.is_empty() {
        uri
    } else if text.ends_with(' ') {
        format!("{}{}", text, uri)
    } else {
        format!("{} {}", text, uri)
    }
}

/// Whether the text already carries a geo URI, such messages are sent without a new location
pub fn has_geo_uri(text: &str) -> bool {
    text.contains(URI_MARKER)
}

/// Reject messages that won't fit in a single SMS
pub fn check_length(text: &str) -> Result<(), Error> {
    let length = text.chars().count();
    if length > MAX_MESSAGE_LENGTH {
        return Err(Error::MessageTooLong(length));
    }
    Ok(())
}
