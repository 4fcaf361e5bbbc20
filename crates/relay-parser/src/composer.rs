//! Composes yaml-rust2 parser events into a [`YamlNode`] tree.
//!
//! Only the first document of the stream is composed. Tags never construct
//! anything: `!!str` keeps a scalar a string and every other tag is dropped.
//! Aliases are replaced with a copy of the anchored node.

use crate::location::{LineIndex, Mark};
use crate::node::YamlNode;
use std::collections::HashMap;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};
use yaml_rust2::ScanError;

/// Compose `content` into a tree, `Ok(None)` when it holds no document
pub(crate) fn compose(content: &str, lines: &LineIndex) -> Result<Option<YamlNode>, ScanError> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = TreeBuilder::new(content, lines);

    parser.load(&mut builder, false)?;

    Ok(builder.root)
}

/// A collection whose end event has not arrived yet
enum OpenNode {
    Sequence {
        mark: Mark,
        anchor_id: usize,
        items: Vec<YamlNode>,
    },
    Mapping {
        mark: Mark,
        anchor_id: usize,
        entries: Vec<(YamlNode, YamlNode)>,
        /// Key whose value has not been composed yet
        key: Option<YamlNode>,
    },
}

struct TreeBuilder<'a> {
    chars: Vec<char>,
    lines: &'a LineIndex,
    stack: Vec<OpenNode>,
    anchors: HashMap<usize, YamlNode>,
    root: Option<YamlNode>,
}

impl<'a> TreeBuilder<'a> {
    fn new(content: &str, lines: &'a LineIndex) -> Self {
        Self {
            chars: content.chars().collect(),
            lines,
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
        }
    }

    fn mark(&self, marker: &Marker) -> Mark {
        self.lines.mark_at(marker.index())
    }

    /// Position of an empty scalar the parser implied rather than read
    ///
    /// yaml-rust2 reports it at the token that follows, which can be lines
    /// further down or past the end of the text. It belongs right after the
    /// `:` or `-` indicator it completes, or at its key when no indicator
    /// directly precedes that token.
    fn implied_mark(&self, marker: &Marker) -> Mark {
        let mut end = marker.index().min(self.chars.len());
        while end > 0 && self.chars[end - 1].is_whitespace() {
            end -= 1;
        }

        let pending_key = match self.stack.last() {
            Some(OpenNode::Mapping { key: Some(key), .. }) => Some(key.mark()),
            _ => None,
        };
        let indicator = end > 0 && matches!(self.chars[end - 1], ':' | '-');

        match pending_key {
            Some(key) if indicator && end > key.index => self.lines.mark_at(end),
            Some(key) => key,
            None if indicator => self.lines.mark_at(end),
            None => self.mark(marker),
        }
    }

    /// An implied scalar is plain and either empty or a `~` the text does
    /// not contain at its marker
    fn is_implied(&self, value: &str, style: &TScalarStyle, marker: &Marker) -> bool {
        matches!(style, TScalarStyle::Plain)
            && (value.is_empty()
                || (value == "~" && self.chars.get(marker.index()) != Some(&'~')))
    }

    fn complete(&mut self, node: YamlNode, anchor_id: usize) {
        if anchor_id > 0 {
            self.anchors.insert(anchor_id, node.clone());
        }

        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
            Some(OpenNode::Sequence { items, .. }) => items.push(node),
            Some(OpenNode::Mapping { entries, key, .. }) => match key.take() {
                Some(key) => entries.push((key, node)),
                None => *key = Some(node),
            },
        }
    }
}

impl<'a> MarkedEventReceiver for TreeBuilder<'a> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        match ev {
            Event::Nothing => {}
            Event::StreamStart => {}
            Event::StreamEnd => {}
            Event::DocumentStart => {}
            Event::DocumentEnd => {}

            Event::Scalar(value, style, anchor_id, tag) => {
                let mark = if self.is_implied(&value, &style, &marker) {
                    self.implied_mark(&marker)
                } else {
                    self.mark(&marker)
                };
                let plain =
                    matches!(style, TScalarStyle::Plain) && !tag.as_ref().is_some_and(is_str_tag);
                let node = YamlNode::Scalar {
                    mark,
                    value,
                    plain,
                };
                self.complete(node, anchor_id);
            }

            Event::SequenceStart(anchor_id, _tag) => {
                let mark = self.mark(&marker);
                self.stack.push(OpenNode::Sequence {
                    mark,
                    anchor_id,
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => {
                if let Some(OpenNode::Sequence {
                    mark,
                    anchor_id,
                    items,
                }) = self.stack.pop()
                {
                    self.complete(YamlNode::Sequence { mark, items }, anchor_id);
                }
            }

            Event::MappingStart(anchor_id, _tag) => {
                let mark = self.mark(&marker);
                self.stack.push(OpenNode::Mapping {
                    mark,
                    anchor_id,
                    entries: Vec::new(),
                    key: None,
                });
            }

            Event::MappingEnd => {
                if let Some(OpenNode::Mapping {
                    mark,
                    anchor_id,
                    entries,
                    ..
                }) = self.stack.pop()
                {
                    self.complete(YamlNode::Mapping { mark, entries }, anchor_id);
                }
            }

            Event::Alias(anchor_id) => {
                let mark = self.mark(&marker);
                let node = match self.anchors.get(&anchor_id) {
                    Some(anchored) => anchored.remarked(mark),
                    None => YamlNode::Scalar {
                        mark,
                        value: String::new(),
                        plain: true,
                    },
                };
                self.complete(node, 0);
            }
        }
    }
}

fn is_str_tag(tag: &Tag) -> bool {
    tag.suffix == "str" && (tag.handle == "!!" || tag.handle == "tag:yaml.org,2002:")
}
