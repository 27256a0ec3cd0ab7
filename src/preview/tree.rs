//! # Preview Visual Tree
//!
//! A small, serializable box tree describing the live preview. Frames lay out
//! their children along one axis (flexbox-style); leaves are text, images,
//! placeholders and spinners. The tree carries layout intent only; whoever
//! displays it (a web client, a test) decides how to paint it.
//!
//! ## Example
//!
//! ```
//! use insertprint::preview::tree::{Frame, Length, Node, TextNode, TextRole};
//! use insertprint::render::text::Weight;
//!
//! let node: Node = Frame::column()
//!     .size(Length::Fill, Length::Auto)
//!     .gap(6.0)
//!     .child(TextNode::new(TextRole::Headline, "Thanks!", 24.0, Weight::Bold, "#111827"))
//!     .into();
//!
//! assert_eq!(node.texts().count(), 1);
//! ```

use serde::Serialize;

use crate::render::text::Weight;

/// Size along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum Length {
    /// Fixed size in screen pixels.
    Px(f32),
    /// Fraction of the parent's size along the same axis.
    Fraction(f32),
    /// Take the remaining space.
    Fill,
    /// Size to content.
    Auto,
}

/// Padding on each side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Insets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Insets {
    pub const fn all(v: f32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Main axis of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
    Stretch,
}

/// A flex container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub direction: Direction,
    pub width: Length,
    pub height: Length,
    pub padding: Insets,
    pub gap: f32,
    /// Cross-axis alignment of children.
    pub align: Align,
    /// Main-axis alignment of children.
    pub justify: Align,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    pub radius: f32,
    pub children: Vec<Node>,
}

impl Frame {
    fn new(direction: Direction) -> Self {
        Self {
            direction,
            width: Length::Auto,
            height: Length::Auto,
            padding: Insets::default(),
            gap: 0.0,
            align: Align::Stretch,
            justify: Align::Start,
            background: None,
            radius: 0.0,
            children: Vec::new(),
        }
    }

    pub fn row() -> Self {
        Self::new(Direction::Row)
    }

    pub fn column() -> Self {
        Self::new(Direction::Column)
    }

    pub fn size(mut self, width: Length, height: Length) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn justify(mut self, justify: Align) -> Self {
        self.justify = justify;
        self
    }

    /// Center children on both axes.
    pub fn centered(self) -> Self {
        self.align(Align::Center).justify(Align::Center)
    }

    pub fn background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn child_opt(mut self, child: Option<impl Into<Node>>) -> Self {
        if let Some(child) = child {
            self.children.push(child.into());
        }
        self
    }
}

/// What a text node shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextRole {
    Headline,
    Subtitle,
    BrandUrl,
    /// Stand-in label ("QR Code") while there is nothing to show.
    Placeholder,
    /// Shown in place of a QR code that failed to generate.
    QrError,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextNode {
    pub role: TextRole,
    pub content: String,
    pub size: f32,
    pub weight: Weight,
    pub color: &'static str,
}

impl TextNode {
    pub fn new(
        role: TextRole,
        content: impl Into<String>,
        size: f32,
        weight: Weight,
        color: &'static str,
    ) -> Self {
        Self {
            role,
            content: content.into(),
            size,
            weight,
            color,
        }
    }
}

/// A bitmap scaled to fit its box, preserving aspect ratio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageNode {
    pub src: String,
    pub alt: &'static str,
    pub width: Length,
    pub height: Length,
}

/// Grey box with a label, standing in for a missing or broken image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceholderNode {
    pub label: &'static str,
    pub width: Length,
    pub height: Length,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpinnerNode {
    pub size: f32,
}

/// A node of the preview tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Frame(Frame),
    Text(TextNode),
    Image(ImageNode),
    Placeholder(PlaceholderNode),
    Spinner(SpinnerNode),
}

impl From<Frame> for Node {
    fn from(frame: Frame) -> Self {
        Node::Frame(frame)
    }
}

impl From<TextNode> for Node {
    fn from(text: TextNode) -> Self {
        Node::Text(text)
    }
}

impl From<ImageNode> for Node {
    fn from(image: ImageNode) -> Self {
        Node::Image(image)
    }
}

impl From<PlaceholderNode> for Node {
    fn from(placeholder: PlaceholderNode) -> Self {
        Node::Placeholder(placeholder)
    }
}

impl From<SpinnerNode> for Node {
    fn from(spinner: SpinnerNode) -> Self {
        Node::Spinner(spinner)
    }
}

impl Node {
    /// Depth-first, pre-order walk over this node and its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// All text nodes, in document order.
    pub fn texts(&self) -> impl Iterator<Item = &TextNode> {
        self.walk().filter_map(|node| match node {
            Node::Text(text) => Some(text),
            _ => None,
        })
    }

    /// First text node with the given role.
    pub fn find_text(&self, role: TextRole) -> Option<&TextNode> {
        self.texts().find(|text| text.role == role)
    }

    /// First image node with the given alt text.
    pub fn find_image(&self, alt: &str) -> Option<&ImageNode> {
        self.walk().find_map(|node| match node {
            Node::Image(image) if image.alt == alt => Some(image),
            _ => None,
        })
    }

    pub fn find_placeholder(&self, label: &str) -> Option<&PlaceholderNode> {
        self.walk().find_map(|node| match node {
            Node::Placeholder(p) if p.label == label => Some(p),
            _ => None,
        })
    }

    pub fn has_spinner(&self) -> bool {
        self.walk().any(|node| matches!(node, Node::Spinner(_)))
    }
}

/// Iterator returned by [`Node::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Node::Frame(frame) = node {
            self.stack.extend(frame.children.iter().rev());
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(role: TextRole, content: &str) -> TextNode {
        TextNode::new(role, content, 12.0, Weight::Regular, "#000000")
    }

    #[test]
    fn test_walk_is_document_order() {
        let tree: Node = Frame::row()
            .child(Frame::column().child(text(TextRole::Headline, "a")).child(text(TextRole::Subtitle, "b")))
            .child(text(TextRole::BrandUrl, "c"))
            .into();
        let contents: Vec<&str> = tree.texts().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, ["a", "b", "c"]);
    }

    #[test]
    fn test_child_opt() {
        let frame = Frame::column()
            .child_opt(None::<TextNode>)
            .child_opt(Some(text(TextRole::Headline, "x")));
        assert_eq!(frame.children.len(), 1);
    }

    #[test]
    fn test_find_helpers() {
        let tree: Node = Frame::row()
            .child(PlaceholderNode {
                label: "Logo",
                width: Length::Px(56.0),
                height: Length::Px(56.0),
            })
            .child(SpinnerNode { size: 24.0 })
            .into();
        assert!(tree.find_placeholder("Logo").is_some());
        assert!(tree.find_image("Logo").is_none());
        assert!(tree.has_spinner());
    }

    #[test]
    fn test_serialized_shape() {
        let node: Node = Frame::row()
            .size(Length::Fraction(0.5), Length::Fill)
            .child(text(TextRole::Placeholder, "QR Code"))
            .into();
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"], "frame");
        assert_eq!(json["width"]["unit"], "fraction");
        assert_eq!(json["width"]["value"], 0.5);
        assert_eq!(json["height"]["unit"], "fill");
        assert_eq!(json["children"][0]["kind"], "text");
        assert_eq!(json["children"][0]["role"], "placeholder");
        assert!(json.get("background").is_none());
    }
}
