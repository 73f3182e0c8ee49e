//! The call tree, the representation of parsed drawing operations.
//!
//! An upstream parser turns SVG elements into a tree of calls against a
//! canvas: "set this transform, and inside it fill this path", "open a
//! transparency group, and inside it draw this text".  Each node in the tree
//! is a [`Call`], with its nested calls as children.  The tree uses the
//! [rctree crate][rctree]; [`CallNode`] is a type alias for `rctree::Node<Call>`.
//!
//! The order of children is render order.  The interpreter only reads the
//! tree: rewrites produce new [`Arguments`] and never touch the nodes.
//!
//! [rctree]: https://crates.io/crates/rctree

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::canvas::Point;
use crate::error::UnknownOperation;

/// Strong reference to a call in the tree.
pub type CallNode = rctree::Node<Call>;

macro_rules! operations {
    ($($variant:ident => $name:literal,)+) => {
        /// The canvas capability that a [`Call`] invokes.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum Operation {
            $($variant,)+
        }

        impl Operation {
            /// The snake_case name of the operation, as the parser emits it.
            pub fn name(&self) -> &'static str {
                match *self {
                    $(Operation::$variant => $name,)+
                }
            }
        }

        impl FromStr for Operation {
            type Err = UnknownOperation;

            fn from_str(s: &str) -> Result<Operation, UnknownOperation> {
                match s {
                    $($name => Ok(Operation::$variant),)+
                    _ => Err(UnknownOperation(s.to_string())),
                }
            }
        }
    };
}

operations! {
    FillColor => "fill_color",
    StrokeColor => "stroke_color",
    LineWidth => "line_width",
    Fill => "fill",
    Stroke => "stroke",
    FillAndStroke => "fill_and_stroke",
    EndPath => "end_path",
    Clip => "clip",
    Save => "save",
    Restore => "restore",
    TransformationMatrix => "transformation_matrix",
    Translate => "translate",
    Rotate => "rotate",
    Scale => "scale",
    Transparent => "transparent",
    MoveTo => "move_to",
    LineTo => "line_to",
    CurveTo => "curve_to",
    ClosePath => "close_path",
    Rectangle => "rectangle",
    RoundedRectangle => "rounded_rectangle",
    Circle => "circle",
    Ellipse => "ellipse",
    Line => "line",
    Polygon => "polygon",
    TextGroup => "text_group",
    DrawText => "draw_text",
    RelativeDrawText => "relative_draw_text",
    Font => "font",
    CharacterSpacing => "character_spacing",
    Image => "image",
    Dash => "dash",
    Undash => "undash",
    CapStyle => "cap_style",
    JoinStyle => "join_style",
}

impl Operation {
    /// Whether the operation only makes sense when it wraps nested calls.
    ///
    /// A transparency group with nothing inside it would just be an empty
    /// group in the output, so such calls are dropped when they have no children.
    pub fn requires_block(&self) -> bool {
        matches!(*self, Operation::Transparent)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A positional argument or option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
    Point(Point),
    List(Vec<Value>),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match *self {
            Value::Text(ref s) => Some(s),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match *self {
            Value::Point(p) => Some(p),
            Value::List(ref v) => match v.as_slice() {
                [Value::Number(x), Value::Number(y)] => Some(Point::new(*x, *y)),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(ref s) => write!(f, "{s:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Point(p) => write!(f, "[{}, {}]", p.x, p.y),
            Value::List(ref v) => {
                f.write_str("[")?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<Point> for Value {
    fn from(p: Point) -> Value {
        Value::Point(p)
    }
}

/// The option key holding a text position.
pub const AT: &str = "at";

/// The option key holding the SVG `text-anchor` of a text call.
pub const TEXT_ANCHOR: &str = "text_anchor";

/// The option key that asks the canvas to kern text.
pub const KERNING: &str = "kerning";

/// The option key holding a font size.
pub const SIZE: &str = "size";

/// Keyed options that trail the positional arguments of a call.
///
/// Iteration order is the key order, so two recordings of the same call print
/// the same way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options(BTreeMap<String, Value>);

impl Options {
    pub fn new() -> Options {
        Options::default()
    }

    /// Builder-style insertion.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Options {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn at(&self) -> Option<Point> {
        self.get(AT).and_then(Value::as_point)
    }

    pub fn set_at(&mut self, p: Point) {
        self.insert(AT, p);
    }

    pub fn text_anchor(&self) -> Option<&str> {
        self.get(TEXT_ANCHOR).and_then(Value::as_text)
    }

    pub fn size(&self) -> Option<f64> {
        self.get(SIZE).and_then(Value::as_number)
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        f.write_str("}")
    }
}

/// Positional values plus an optional trailing options map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    pub values: Vec<Value>,
    pub options: Option<Options>,
}

impl Arguments {
    pub fn new(values: Vec<Value>) -> Arguments {
        Arguments {
            values,
            options: None,
        }
    }

    pub fn none() -> Arguments {
        Arguments::default()
    }

    /// Arguments made only of numbers, like those of `transformation_matrix` or `line_to`.
    pub fn numbers(numbers: &[f64]) -> Arguments {
        Arguments::new(numbers.iter().copied().map(Value::Number).collect())
    }

    /// The `(text, options)` shape of the text calls.
    pub fn text(text: &str, options: Options) -> Arguments {
        Arguments {
            values: vec![Value::from(text)],
            options: Some(options),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: Options) -> Arguments {
        self.options = Some(options);
        self
    }

    /// All positional values as numbers, or `None` if any of them is something else.
    pub fn as_numbers(&self) -> Option<Vec<f64>> {
        self.values.iter().map(Value::as_number).collect()
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        if let Some(ref options) = self.options {
            if !self.values.is_empty() {
                f.write_str(", ")?;
            }
            write!(f, "{options}")?;
        }
        f.write_str(")")
    }
}

/// Data for a single node in the call tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub operation: Operation,
    pub arguments: Arguments,
}

impl Call {
    pub fn new(operation: Operation, arguments: Arguments) -> Call {
        Call {
            operation,
            arguments,
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operation, self.arguments)
    }
}

/// Creates a tree node for `operation` with `children` appended in order.
pub fn call_node(operation: Operation, arguments: Arguments, children: Vec<CallNode>) -> CallNode {
    let node = CallNode::new(Call::new(operation, arguments));
    for child in children {
        node.append(child);
    }
    node
}

/// The ordered list of top-level calls handed over by the parser.
#[derive(Debug, Clone, Default)]
pub struct CallTree {
    calls: Vec<CallNode>,
}

impl CallTree {
    pub fn new(calls: Vec<CallNode>) -> CallTree {
        CallTree { calls }
    }

    pub fn calls(&self) -> &[CallNode] {
        &self.calls
    }

    pub fn push(&mut self, call: CallNode) {
        self.calls.push(call);
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

impl FromIterator<CallNode> for CallTree {
    fn from_iter<I: IntoIterator<Item = CallNode>>(iter: I) -> CallTree {
        CallTree::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_names_roundtrip() {
        for name in ["draw_text", "relative_draw_text", "transformation_matrix", "end_path"] {
            let op: Operation = name.parse().unwrap();
            assert_eq!(op.name(), name);
        }
    }

    #[test]
    fn unknown_operation_name_is_an_error() {
        assert_eq!(
            "send".parse::<Operation>(),
            Err(UnknownOperation("send".to_string()))
        );
    }

    #[test]
    fn only_transparent_requires_a_block() {
        assert!(Operation::Transparent.requires_block());
        assert!(!Operation::Clip.requires_block());
        assert!(!Operation::DrawText.requires_block());
    }

    #[test]
    fn at_accepts_points_and_number_pairs() {
        let o = Options::new().with(AT, Point::new(1.0, 2.0));
        assert_eq!(o.at(), Some(Point::new(1.0, 2.0)));

        let o = Options::new().with(AT, Value::List(vec![Value::Number(3.0), Value::Number(4.0)]));
        assert_eq!(o.at(), Some(Point::new(3.0, 4.0)));

        let o = Options::new().with(AT, "nowhere");
        assert_eq!(o.at(), None);
    }

    #[test]
    fn as_numbers_rejects_mixed_values() {
        assert_eq!(
            Arguments::numbers(&[1.0, 2.0]).as_numbers(),
            Some(vec![1.0, 2.0])
        );
        assert_eq!(Arguments::new(vec![Value::from("a")]).as_numbers(), None);
    }

    #[test]
    fn call_node_keeps_children_in_order() {
        let node = call_node(
            Operation::Save,
            Arguments::none(),
            vec![
                call_node(Operation::MoveTo, Arguments::numbers(&[0.0, 0.0]), vec![]),
                call_node(Operation::LineTo, Arguments::numbers(&[1.0, 1.0]), vec![]),
            ],
        );

        let ops: Vec<Operation> = node.children().map(|c| c.borrow().operation).collect();
        assert_eq!(ops, vec![Operation::MoveTo, Operation::LineTo]);
    }

    #[test]
    fn displays_calls() {
        let call = Call::new(
            Operation::DrawText,
            Arguments::text("hi", Options::new().with(AT, Point::new(1.0, 2.0)).with(SIZE, 12.0)),
        );
        assert_eq!(call.to_string(), r#"draw_text("hi", {at: [1, 2], size: 12})"#);
    }
}
