//! Turns the raw RSS document into uniform [`TrendRecord`]s.
//!
//! The upstream schema is weakly typed: per-item fields come and go, and the
//! related-news slot holds either a single element or a repeated list. The
//! parse step keeps that ambiguity visible as [`RelatedSlot`]; the normalize
//! step flattens it so every consumer sees `related` as a plain list.

use common::{TrendsError, TrendsResult};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::models::{RelatedItem, TrendRecord};

/// The upstream's related-items slot, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RelatedSlot {
    #[default]
    Absent,
    One(RawRelated),
    Many(Vec<RawRelated>),
}

impl RelatedSlot {
    pub fn push(&mut self, item: RawRelated) {
        *self = match std::mem::take(self) {
            RelatedSlot::Absent => RelatedSlot::One(item),
            RelatedSlot::One(first) => RelatedSlot::Many(vec![first, item]),
            RelatedSlot::Many(mut items) => {
                items.push(item);
                RelatedSlot::Many(items)
            }
        };
    }

    pub fn into_list(self) -> Vec<RawRelated> {
        match self {
            RelatedSlot::Absent => Vec::new(),
            RelatedSlot::One(item) => vec![item],
            RelatedSlot::Many(items) => items,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRelated {
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeedItem {
    pub title: Option<String>,
    pub traffic: Option<String>,
    pub picture: Option<String>,
    pub picture_source: Option<String>,
    pub related: RelatedSlot,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeedDocument {
    pub items: Vec<RawFeedItem>,
}

/// Parse the raw feed text into its document shape. Fails with
/// `MalformedFeed` when the XML is unparseable or carries no `<channel>`;
/// individual missing fields are tolerated and defaulted later.
pub fn parse_document(xml: &str) -> TrendsResult<RawFeedDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut saw_channel = false;
    let mut items = Vec::new();
    let mut item: Option<RawFeedItem> = None;
    let mut related: Option<RawRelated> = None;
    let mut current_tag = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match name.as_str() {
                    "channel" => saw_channel = true,
                    "item" => item = Some(RawFeedItem::default()),
                    "ht:news_item" if item.is_some() => related = Some(RawRelated::default()),
                    _ => {}
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                match e.name().as_ref() {
                    b"item" => {
                        if let Some(finished) = item.take() {
                            items.push(finished);
                        }
                    }
                    b"ht:news_item" => {
                        if let (Some(parent), Some(finished)) = (item.as_mut(), related.take()) {
                            parent.related.push(finished);
                        }
                    }
                    _ => {}
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                // Unknown entities are left as-is rather than failing the item.
                let text = match e.unescape() {
                    Ok(cow) => cow.into_owned(),
                    Err(_) => String::from_utf8_lossy(e.as_ref()).into_owned(),
                };
                assign_field(&current_tag, &text, &mut item, &mut related);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                assign_field(&current_tag, &text, &mut item, &mut related);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(TrendsError::MalformedFeed(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
    }

    if !saw_channel {
        return Err(TrendsError::MalformedFeed(
            "document has no rss channel".to_string(),
        ));
    }

    Ok(RawFeedDocument { items })
}

fn assign_field(
    tag: &str,
    text: &str,
    item: &mut Option<RawFeedItem>,
    related: &mut Option<RawRelated>,
) {
    if let Some(rel) = related.as_mut() {
        match tag {
            "ht:news_item_title" => append(&mut rel.title, text),
            "ht:news_item_snippet" => append(&mut rel.snippet, text),
            "ht:news_item_url" => append(&mut rel.url, text),
            "ht:news_item_picture" => append(&mut rel.image, text),
            "ht:news_item_source" => append(&mut rel.source, text),
            _ => {}
        }
    } else if let Some(it) = item.as_mut() {
        match tag {
            "title" => append(&mut it.title, text),
            "ht:approx_traffic" => append(&mut it.traffic, text),
            "ht:picture" => append(&mut it.picture, text),
            "ht:picture_source" => append(&mut it.picture_source, text),
            _ => {}
        }
    }
}

fn append(slot: &mut Option<String>, text: &str) {
    slot.get_or_insert_with(String::new).push_str(text);
}

/// Flatten a parsed document into the stable record shape.
pub fn normalize(doc: RawFeedDocument) -> Vec<TrendRecord> {
    doc.items.into_iter().map(normalize_item).collect()
}

/// Parse and normalize in one step.
pub fn normalize_feed(xml: &str) -> TrendsResult<Vec<TrendRecord>> {
    Ok(normalize(parse_document(xml)?))
}

fn normalize_item(item: RawFeedItem) -> TrendRecord {
    TrendRecord {
        title: decode_entities(item.title.as_deref().unwrap_or_default()),
        traffic: item.traffic.unwrap_or_else(|| "Unknown".to_string()),
        image: item.picture.unwrap_or_default(),
        image_source: item.picture_source.unwrap_or_default(),
        related: item
            .related
            .into_list()
            .into_iter()
            .map(normalize_related)
            .collect(),
    }
}

fn normalize_related(raw: RawRelated) -> RelatedItem {
    RelatedItem {
        title: decode_entities(raw.title.as_deref().unwrap_or_default()),
        snippet: decode_entities(raw.snippet.as_deref().unwrap_or_default()),
        url: raw.url.unwrap_or_default(),
        image: raw.image.unwrap_or_default(),
        source: decode_entities(raw.source.as_deref().unwrap_or_default()),
    }
}

/// Decode the HTML character entities the upstream double-escapes into its
/// free-text fields. Replacement order matters: `&amp;` first, so that
/// `&amp;lt;` decodes the same way the upstream intended.
pub fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(items: &str) -> String {
        format!(
            "<rss version=\"2.0\" xmlns:ht=\"https://trends.google.com/trending/rss\">\
             <channel><title>Daily Search Trends</title>{items}</channel></rss>"
        )
    }

    fn news_item(title: &str) -> String {
        format!(
            "<ht:news_item>\
             <ht:news_item_title>{title}</ht:news_item_title>\
             <ht:news_item_snippet>snippet</ht:news_item_snippet>\
             <ht:news_item_url>https://example.com/a</ht:news_item_url>\
             <ht:news_item_picture>https://example.com/a.png</ht:news_item_picture>\
             <ht:news_item_source>Example News</ht:news_item_source>\
             </ht:news_item>"
        )
    }

    #[test]
    fn related_slot_promotes_one_to_many() {
        let mut slot = RelatedSlot::default();
        assert_eq!(slot.clone().into_list().len(), 0);

        slot.push(RawRelated::default());
        assert!(matches!(slot, RelatedSlot::One(_)));
        assert_eq!(slot.clone().into_list().len(), 1);

        slot.push(RawRelated::default());
        assert!(matches!(slot, RelatedSlot::Many(_)));
        assert_eq!(slot.into_list().len(), 2);
    }

    #[test]
    fn single_related_object_becomes_one_element_list() {
        let xml = feed(&format!(
            "<item><title>Eclipse</title><ht:approx_traffic>200K+</ht:approx_traffic>{}</item>",
            news_item("Watch the eclipse")
        ));
        let trends = normalize_feed(&xml).expect("feed should parse");
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].related.len(), 1);
        assert_eq!(trends[0].related[0].title, "Watch the eclipse");
        assert_eq!(trends[0].related[0].source, "Example News");
    }

    #[test]
    fn related_list_keeps_its_length() {
        let xml = feed(&format!(
            "<item><title>Storm</title>{}{}{}</item>",
            news_item("a"),
            news_item("b"),
            news_item("c")
        ));
        let trends = normalize_feed(&xml).expect("feed should parse");
        assert_eq!(trends[0].related.len(), 3);
    }

    #[test]
    fn absent_related_becomes_empty_list() {
        let xml = feed("<item><title>Quiet</title></item>");
        let trends = normalize_feed(&xml).expect("feed should parse");
        assert_eq!(trends[0].related.len(), 0);
    }

    #[test]
    fn mixed_item_shapes_normalize_independently() {
        let xml = feed(&format!(
            "<item><title>First</title>{}{}</item><item><title>Second</title></item>",
            news_item("a"),
            news_item("b")
        ));
        let trends = normalize_feed(&xml).expect("feed should parse");
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].related.len(), 2);
        assert_eq!(trends[1].related.len(), 0);
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let xml = feed("<item><title>Bare</title></item>");
        let trends = normalize_feed(&xml).expect("feed should parse");
        assert_eq!(trends[0].traffic, "Unknown");
        assert_eq!(trends[0].image, "");
        assert_eq!(trends[0].image_source, "");
    }

    #[test]
    fn fields_survive_the_parse() {
        let xml = feed(
            "<item><title>Derby</title>\
             <ht:approx_traffic>500K+</ht:approx_traffic>\
             <ht:picture>https://example.com/derby.png</ht:picture>\
             <ht:picture_source>Example Wire</ht:picture_source>\
             </item>",
        );
        let trends = normalize_feed(&xml).expect("feed should parse");
        assert_eq!(trends[0].title, "Derby");
        assert_eq!(trends[0].traffic, "500K+");
        assert_eq!(trends[0].image, "https://example.com/derby.png");
        assert_eq!(trends[0].image_source, "Example Wire");
    }

    #[test]
    fn double_escaped_titles_are_decoded() {
        // The XML layer unescapes once; the upstream escapes its text twice.
        let xml = feed("<item><title>Tom &amp;amp; Jerry&amp;#39;s &amp;quot;show&amp;quot;</title></item>");
        let trends = normalize_feed(&xml).expect("feed should parse");
        assert_eq!(trends[0].title, "Tom & Jerry's \"show\"");
    }

    #[test]
    fn decode_entities_reverses_all_five_escapes() {
        assert_eq!(
            decode_entities("Tom &amp; Jerry&#39;s &quot;show&quot;"),
            "Tom & Jerry's \"show\""
        );
        assert_eq!(decode_entities("&lt;b&gt;bold&lt;/b&gt;"), "<b>bold</b>");
    }

    #[test]
    fn decode_entities_is_idempotent_on_decoded_text() {
        let decoded = "Tom & Jerry's \"show\"";
        assert_eq!(decode_entities(decoded), decoded);
        assert_eq!(decode_entities(&decode_entities("A &amp; B")), "A & B");
    }

    #[test]
    fn document_without_channel_is_malformed() {
        let err = normalize_feed("<rss><junk/></rss>").unwrap_err();
        assert!(matches!(err, TrendsError::MalformedFeed(_)));
    }

    #[test]
    fn unparseable_document_is_malformed() {
        let err = normalize_feed("<rss><channel><item></rss>").unwrap_err();
        assert!(matches!(err, TrendsError::MalformedFeed(_)));
    }

    #[test]
    fn channel_with_no_items_is_an_empty_feed() {
        let trends = normalize_feed(&feed("")).expect("feed should parse");
        assert!(trends.is_empty());
    }
}
